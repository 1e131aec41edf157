pub mod hole;
pub mod index;
pub mod round;
pub mod rounding;
pub mod system;

pub use system::*;
