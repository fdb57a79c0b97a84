pub mod four_vector;
pub mod jet;
pub mod transform;

pub use four_vector::FourVector;
pub use jet::{Jet, RelativeJet, RelativeParticle};
pub use transform::{to_relative, CoordinateTransform};
