//! Pointer interaction handlers for the globe viewer.

pub mod config;
pub mod drag;
pub mod error;
pub mod event;
pub mod resolver;
pub mod session;

pub use config::*;
pub use drag::*;
pub use error::*;
pub use event::*;
pub use resolver::*;
pub use session::*;
