//! Demo scene: built-in primitives, the RON scene configuration and
//! frame-rate bookkeeping

mod config;
mod fps;
mod primitives;

pub use config::*;
pub use fps::*;
pub use primitives::*;
