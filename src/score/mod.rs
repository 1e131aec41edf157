pub mod match_scoring;
pub mod round_validation;
pub mod standings;

pub use match_scoring::*;
pub use round_validation::*;
pub use standings::*;
