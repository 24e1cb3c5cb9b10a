//! Platform abstraction layer
//!
//! Everything the game needs from the host environment:
//! - Drawing surfaces (`Surface`)
//! - Input events (`HostInput`)
//! - Surface and visibility lifecycle (`Host`)

pub mod host;
pub mod input;
pub mod surface;

pub use host::Host;
pub use input::HostInput;
pub use surface::{HeadlessSurface, Surface, SurfaceMonitor};
