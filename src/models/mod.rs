pub mod component;
pub mod detection;
pub mod enums;
pub mod timestamp;

pub use component::*;
pub use detection::*;
pub use enums::*;
