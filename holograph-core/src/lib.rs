pub mod color;
pub mod location;
pub mod math;
