use crate::error::{JetImageError, JetImageResult};
use serde::{Deserialize, Serialize};

/// Dimensions of a row-major array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    pub fn new(dims: Vec<usize>) -> Self {
        Shape { dims }
    }

    pub fn from_slice(dims: &[usize]) -> Self {
        Shape {
            dims: dims.to_vec(),
        }
    }

    /// Number of dimensions (rank).
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Size along a specific axis.
    pub fn dim(&self, axis: usize) -> JetImageResult<usize> {
        self.dims.get(axis).copied().ok_or(JetImageError::InvalidAxis {
            axis,
            ndim: self.ndim(),
        })
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        if self.dims.is_empty() {
            1
        } else {
            self.dims.iter().product()
        }
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.dims.clone()
    }

    /// Compute row-major (C-order) strides.
    pub fn strides(&self) -> Vec<usize> {
        if self.dims.is_empty() {
            return vec![];
        }
        let mut strides = vec![1usize; self.dims.len()];
        for i in (0..self.dims.len() - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }

    /// Flat offset of a multi-dimensional index, bounds-checked per axis.
    pub fn offset(&self, indices: &[usize]) -> JetImageResult<usize> {
        if indices.len() != self.ndim() {
            return Err(JetImageError::ShapeMismatch {
                expected: self.to_vec(),
                got: indices.to_vec(),
            });
        }
        let strides = self.strides();
        let mut offset = 0;
        for (axis, (&idx, &size)) in indices.iter().zip(&self.dims).enumerate() {
            if idx >= size {
                return Err(JetImageError::IndexOutOfBounds {
                    index: idx,
                    axis,
                    size,
                });
            }
            offset += idx * strides[axis];
        }
        Ok(offset)
    }

    /// Shape of a batch of `n` items of this shape: `[n, ..self]`.
    pub fn batched(&self, n: usize) -> Shape {
        let mut dims = Vec::with_capacity(self.ndim() + 1);
        dims.push(n);
        dims.extend_from_slice(&self.dims);
        Shape::new(dims)
    }

    /// Shape of one item along the leading axis.
    pub fn item(&self) -> JetImageResult<Shape> {
        if self.dims.is_empty() {
            return Err(JetImageError::InvalidAxis { axis: 0, ndim: 0 });
        }
        Ok(Shape::from_slice(&self.dims[1..]))
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, ")")
    }
}
