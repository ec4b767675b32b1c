//! Platform abstraction layer
//!
//! Browser input is reduced to plain key codes here so the rest of the
//! crate never sees a DOM event.

pub mod input;

pub use input::KeyboardState;
