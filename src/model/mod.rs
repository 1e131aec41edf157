pub mod course;
pub mod league;
pub mod round;

pub use course::*;
pub use league::*;
pub use round::*;
