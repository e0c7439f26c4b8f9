//! Widgets drawn entirely through [`Drawable`] and the theme registry.

pub mod dial;
pub mod panzoomer;

use crate::draw::{Damage, Drawable};
use crate::theme::ThemeRegistry;
use crate::util::Rect;

pub use dial::{Dial, DialStyle};
pub use panzoomer::Panzoomer;

pub trait Widget {
    fn bounds(&self) -> Rect;

    /// What changed since the last draw.
    fn damage(&self) -> Damage;

    /// Draws the widget and clears its damage.
    fn draw(&mut self, d: &mut dyn Drawable, themes: &ThemeRegistry);
}
