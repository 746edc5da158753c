//! Software rasterization
//!
//! The framebuffer owns the color and depth buffers; the render pass
//! walks a mesh's triangles through the model-view-projection pipeline,
//! scans their screen-space bounding boxes, and writes depth-tested
//! shaded pixels. Single-threaded, frame-at-a-time: the caller clears,
//! renders, then presents, and never resizes mid-frame.

mod color;
mod framebuffer;
mod shading;
mod raster;

pub use color::*;
pub use framebuffer::*;
pub use shading::*;
pub use raster::*;

/// Default render resolution
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// High resolution (2x)
pub const WIDTH_HI: usize = 640;
pub const HEIGHT_HI: usize = 480;
