use jetimg_core::AxisRange;

/// Uniform bins over one image axis.
///
/// Bins are half-open `[edge_k, edge_k+1)` except the last, which also
/// holds the upper edge. Values outside the range (and NaN) have no bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinning {
    bins: usize,
    range: AxisRange,
    step: f64,
}

impl AxisBinning {
    pub fn new(bins: usize, range: AxisRange) -> Self {
        AxisBinning {
            bins,
            range,
            step: range.width() / bins as f64,
        }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Lower edge of bin `k`; `edge(bins)` is the upper range bound.
    pub fn edge(&self, k: usize) -> f64 {
        if k >= self.bins {
            self.range.hi
        } else {
            self.range.lo + k as f64 * self.step
        }
    }

    /// Bin holding `v`, or `None` if `v` lies outside the range.
    pub fn index(&self, v: f64) -> Option<usize> {
        if self.bins == 0 || !(v >= self.range.lo && v <= self.range.hi) {
            return None;
        }
        if v == self.range.hi {
            return Some(self.bins - 1);
        }
        let mut k = (((v - self.range.lo) / self.step) as usize).min(self.bins - 1);
        // settle against the stored edges so float error in the division
        // never disagrees with edge()
        if v < self.edge(k) {
            k -= 1;
        } else if v >= self.edge(k + 1) && k + 1 < self.bins {
            k += 1;
        }
        Some(k)
    }
}
