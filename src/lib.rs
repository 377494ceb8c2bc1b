//! Soft Renderer: a CPU-only 3D rasterization pipeline
//!
//! `rasterizer` holds the pipeline itself; `scene` holds the demo's built-in
//! primitives and its RON configuration.

pub mod rasterizer;
pub mod scene;
