//! Offline replay of drag gestures against a scripted scene.

pub mod replay;
pub mod scenario;

pub use replay::*;
pub use scenario::*;
