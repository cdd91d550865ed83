pub mod rotation;
pub mod vector3;
