use crate::error::{JetImageError, JetImageResult};
use crate::shape::Shape;

use serde::{Deserialize, Serialize};

/// Dense array of 8-bit codes, the storage form of quantized jet images.
///
/// Code 0 always means an exactly empty cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteTensor {
    data: Vec<u8>,
    shape: Shape,
}

impl ByteTensor {
    pub fn new(data: Vec<u8>, shape: Vec<usize>) -> JetImageResult<Self> {
        let s = Shape::new(shape);
        if data.len() != s.numel() {
            return Err(JetImageError::ShapeMismatch {
                expected: s.to_vec(),
                got: vec![data.len()],
            });
        }
        Ok(ByteTensor { data, shape: s })
    }

    pub fn zeros(shape: Vec<usize>) -> Self {
        let s = Shape::new(shape);
        ByteTensor {
            data: vec![0; s.numel()],
            shape: s,
        }
    }

    /// Stack equally shaped code arrays along a new leading axis.
    pub fn stack(items: &[ByteTensor], item_shape: &Shape) -> JetImageResult<ByteTensor> {
        let mut data = Vec::with_capacity(items.len() * item_shape.numel());
        for item in items {
            if &item.shape != item_shape {
                return Err(JetImageError::ShapeMismatch {
                    expected: item_shape.to_vec(),
                    got: item.shape.to_vec(),
                });
            }
            data.extend_from_slice(&item.data);
        }
        Ok(ByteTensor {
            data,
            shape: item_shape.batched(items.len()),
        })
    }

    /// Join batches along the leading axis.
    pub fn concat(batches: &[ByteTensor], item_shape: &Shape) -> JetImageResult<ByteTensor> {
        let mut data = Vec::new();
        let mut n = 0;
        for batch in batches {
            if batch.shape.item()? != *item_shape {
                return Err(JetImageError::ShapeMismatch {
                    expected: item_shape.batched(batch.shape.dim(0)?).to_vec(),
                    got: batch.shape.to_vec(),
                });
            }
            n += batch.shape.dim(0)?;
            data.extend_from_slice(&batch.data);
        }
        Ok(ByteTensor {
            data,
            shape: item_shape.batched(n),
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn shape_vec(&self) -> Vec<usize> {
        self.shape.to_vec()
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, indices: &[usize]) -> JetImageResult<u8> {
        let offset = self.shape.offset(indices)?;
        Ok(self.data[offset])
    }

    /// Copy out item `i` along the leading axis.
    pub fn outer(&self, i: usize) -> JetImageResult<ByteTensor> {
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
        Ok(ByteTensor {
            data: self.data[i * len..(i + 1) * len].to_vec(),
            shape: item_shape,
        })
    }

    /// Number of non-empty cells.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&q| q != 0).count()
    }
}
