pub mod aligner;
pub mod scorer;
pub mod window;

pub use aligner::*;
pub use scorer::*;
pub use window::*;
