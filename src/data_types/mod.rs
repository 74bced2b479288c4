pub mod point;
pub mod selection;
pub mod viewport;

pub use point::*;
pub use selection::*;
pub use viewport::*;
