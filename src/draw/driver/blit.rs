//! Image and off-screen buffer transfers.

use cairo::Context;

use crate::draw::context::OffscreenBuffer;
use crate::draw::image::Image;
use crate::util::Rect;

/// Draws the part of `image` starting at `(srcx, srcy)` at `(x, y)`.
///
/// The requested area is clipped to the image first; nothing is drawn when
/// it is empty or the image has no pixels. Alpha-only images mask the
/// current source color.
#[allow(clippy::too_many_arguments)]
pub(super) fn image(
    cr: &Context,
    image: &Image,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    srcx: i32,
    srcy: i32,
) -> Result<(), cairo::Error> {
    let visible = Rect::new(srcx, srcy, w, h).intersect(&image.bounds());
    if visible.is_empty() {
        return Ok(());
    }
    let Some(surface) = image.to_surface() else {
        return Ok(());
    };

    // device position of the image origin
    let (ox, oy) = (x as f64 - srcx as f64, y as f64 - srcy as f64);
    cr.save()?;
    cr.new_path();
    cr.rectangle(
        ox + visible.x as f64,
        oy + visible.y as f64,
        visible.w as f64,
        visible.h as f64,
    );
    cr.clip();
    let painted = if image.is_mask() {
        cr.mask_surface(&surface, ox, oy)
    } else {
        cr.set_source_surface(&surface, ox, oy)
            .and_then(|()| cr.paint())
    };
    cr.restore()?;
    painted
}

/// Copies `w`×`h` pixels of `buffer` from `(srcx, srcy)` to `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub(super) fn offscreen(
    cr: &Context,
    buffer: &OffscreenBuffer,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
    srcx: i32,
    srcy: i32,
) -> Result<(), cairo::Error> {
    if w <= 0 || h <= 0 {
        return Ok(());
    }
    buffer.image().flush();
    cr.save()?;
    let filled = cr
        .set_source_surface(buffer.image(), x as f64 - srcx as f64, y as f64 - srcy as f64)
        .and_then(|()| {
            cr.new_path();
            cr.rectangle(x as f64, y as f64, w as f64, h as f64);
            cr.fill()
        });
    cr.restore()?;
    filled
}

/// Paints the whole buffer at the origin with source-copy blending, limited
/// to `region` when given, then goes back to over blending.
pub(super) fn composite(
    cr: &Context,
    buffer: &OffscreenBuffer,
    region: Option<Rect>,
) -> Result<(), cairo::Error> {
    buffer.image().flush();
    cr.save()?;
    cr.new_path();
    if let Some(r) = region {
        cr.rectangle(r.x as f64, r.y as f64, r.w.max(0) as f64, r.h.max(0) as f64);
        cr.clip();
    }
    let painted = cr.set_source_surface(buffer.image(), 0.0, 0.0).and_then(|()| {
        cr.set_operator(cairo::Operator::Source);
        cr.paint()
    });
    cr.set_operator(cairo::Operator::Over);
    cr.restore()?;
    cr.target().flush();
    painted
}
