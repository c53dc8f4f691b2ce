//! Systems for the camera director.
//!
//! Organized by functionality:
//! - command: Command queue processing
//! - director: Target registration, director tick, message forwarding
//! - cameras: Window aspect and per-region `Camera2d` sync (rendering only)

pub mod cameras;
pub mod command;
pub mod director;

pub use cameras::*;
pub use command::*;
pub use director::*;
