use crate::dtype::Float;
use crate::error::{JetImageError, JetImageResult};
use crate::shape::Shape;

use serde::{Deserialize, Serialize};

/// Dense floating-point array used for intensity grids and image batches.
///
/// Stores data in a flat contiguous `Vec<T>` with row-major (C-order) layout.
/// A single jet image is `[bins_eta, bins_phi]`; a batch is
/// `[n, bins_eta, bins_phi, 1]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound = "T: Float")]
pub struct Tensor<T: Float> {
    data: Vec<T>,
    shape: Shape,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl<T: Float> Tensor<T> {
    /// Create a tensor from raw data and shape.
    pub fn new(data: Vec<T>, shape: Vec<usize>) -> JetImageResult<Self> {
        let s = Shape::new(shape);
        if data.len() != s.numel() {
            return Err(JetImageError::ShapeMismatch {
                expected: s.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(Tensor { data, shape: s })
    }

    /// Create a tensor filled with zeros.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let s = Shape::new(shape);
        Tensor {
            data: vec![T::ZERO; s.numel()],
            shape: s,
        }
    }

    /// Stack equally shaped tensors along a new leading axis.
    ///
    /// `item_shape` fixes the result shape when `items` is empty.
    pub fn stack(items: &[Tensor<T>], item_shape: &Shape) -> JetImageResult<Tensor<T>> {
        let mut data = Vec::with_capacity(items.len() * item_shape.numel());
        for item in items {
            if item.shape() != item_shape {
                return Err(JetImageError::ShapeMismatch {
                    expected: item_shape.to_vec(),
                    got: item.shape_vec(),
                });
            }
            data.extend_from_slice(&item.data);
        }
        Ok(Tensor {
            data,
            shape: item_shape.batched(items.len()),
        })
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape.to_vec()
    }

    pub fn ndim(&self) -> usize {
        self.shape.ndim()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Read a single element.
    pub fn get(&self, indices: &[usize]) -> JetImageResult<T> {
        let offset = self.shape.offset(indices)?;
        Ok(self.data[offset])
    }

    /// Accumulate into a single element.
    pub fn add_at(&mut self, indices: &[usize], value: T) -> JetImageResult<()> {
        let offset = self.shape.offset(indices)?;
        self.data[offset] += value;
        Ok(())
    }

    /// Copy out item `i` along the leading axis.
    pub fn outer(&self, i: usize) -> JetImageResult<Tensor<T>> {
        let n = self.shape.dim(0)?;
        if i >= n {
            return Err(JetImageError::IndexOutOfBounds {
                index: i,
                axis: 0,
                size: n,
            });
        }
        let item_shape = self.shape.item()?;
        let len = item_shape.numel();
        Ok(Tensor {
            data: self.data[i * len..(i + 1) * len].to_vec(),
            shape: item_shape,
        })
    }

    // ─── Shape Manipulation ─────────────────────────────────────────────────

    /// Reshape the tensor (data remains the same, only shape changes).
    pub fn reshape(self, new_shape: Vec<usize>) -> JetImageResult<Tensor<T>> {
        let ns = Shape::new(new_shape);
        if self.numel() != ns.numel() {
            return Err(JetImageError::ShapeMismatch {
                expected: ns.to_vec(),
                got: self.shape_vec(),
            });
        }
        Ok(Tensor {
            data: self.data,
            shape: ns,
        })
    }

    // ─── Reductions ─────────────────────────────────────────────────────────

    /// Sum of all elements.
    pub fn sum_all(&self) -> T {
        self.data.iter().copied().sum()
    }

    /// Number of strictly positive elements.
    pub fn count_positive(&self) -> usize {
        self.data.iter().filter(|&&x| x > T::ZERO).count()
    }
}

impl<T: Float> PartialEq for Tensor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.shape == other.shape && self.data == other.data
    }
}
