//! Cairo-backed drawing.
//!
//! The layers, bottom up:
//! - [`color`], [`matrix`], [`clip`], [`path`]: value types and the state
//!   stacks the driver keeps
//! - [`sync`]: pixel alignment, line styles and antialiasing pushed onto the
//!   renderer
//! - [`context`]: render surfaces and contexts per window or buffer
//! - [`driver`]: the [`Drawable`] implementation every widget draws through
//! - [`compositor`]: per-window damage tracking and double-buffered flushing

pub mod clip;
pub mod color;
pub mod compositor;
pub mod context;
pub mod drawable;
pub mod driver;
pub mod image;
pub mod matrix;
pub mod path;
pub mod sync;

pub use clip::{ClipRegion, ClipStack};
pub use color::{Color, Palette, PaletteIndex, Rgba, add_alpha};
pub use compositor::{BufferState, Damage, Window};
pub use context::{DrawableHandle, HeadlessSurfaces, OffscreenBuffer, RenderContext, SurfaceFactory};
pub use drawable::Drawable;
pub use driver::{Driver, DriverOptions, OffscreenScope, RenderState};
pub use image::Image;
pub use matrix::TransformMatrix;
pub use path::ShapeKind;
pub use sync::{AntialiasMode, DashKind, LineStyle};
