//! Cairo-backed graphics driver for toolkit-style drawing APIs.
//!
//! The [`draw`] module holds the driver itself: surface/context management,
//! the matrix and clip stacks, primitives and the double-buffer compositor.
//! [`theme`] and [`widgets`] are consumers of the [`draw::Drawable`] trait.

pub mod config;
pub mod demo;
pub mod draw;
pub mod error;
pub mod theme;
pub mod util;
pub mod widgets;

pub use config::Config;
pub use error::{DriverError, ThemeError};
