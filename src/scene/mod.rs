//! Scene entities: transforms, objects, the camera, and scene files

mod transform;
mod camera;
mod file;

pub use transform::*;
pub use camera::*;
pub use file::*;
