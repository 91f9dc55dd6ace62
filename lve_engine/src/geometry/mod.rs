/// Geometry module - vertex formats and procedural meshes

pub mod vertex;
pub mod sierpinski;
pub mod cube;

pub use vertex::*;
pub use sierpinski::*;
pub use cube::*;
