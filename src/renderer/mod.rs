//! Rendering output
//!
//! The game hands the host a flat list of boxes and text each frame.
//! Rasterization and asset decoding happen on the host side.

pub mod frame;

pub use frame::{Frame, Rect, Sprite, SpriteKind, TextAlign, TextLine, build_frame};
