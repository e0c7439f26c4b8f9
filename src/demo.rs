//! Demo scene rendered by the `cairo-chrome` binary: themed boxes, dials, a
//! pan/zoomer and a handful of raw primitives, flushed through a
//! double-buffered window into a headless surface.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::draw::{
    AntialiasMode, Color, Damage, DashKind, Drawable, DrawableHandle, Driver, DriverOptions, LineStyle, Window,
};
use crate::theme::{BoxStyle, BoxType, ThemeRegistry};
use crate::util::{Align, Rect};
use crate::widgets::{Dial, DialStyle, Panzoomer, Widget};

const MARGIN: i32 = 10;
const SHOWCASE_BOXES: [BoxType; 8] = [
    BoxType::UpBox,
    BoxType::DownBox,
    BoxType::ThinUpBox,
    BoxType::UpFrame,
    BoxType::RoundedBox,
    BoxType::RShadowBox,
    BoxType::BorderBox,
    BoxType::FlatBox,
];

/// Everything the demo render needs.
#[derive(Debug, Clone)]
pub struct DemoOptions {
    pub width: i32,
    pub height: i32,
    pub theme: String,
    pub scheme: String,
    pub box_style: BoxStyle,
    pub driver: DriverOptions,
}

impl Default for DemoOptions {
    fn default() -> Self {
        Self {
            width: 480,
            height: 360,
            theme: "Cairo".to_string(),
            scheme: "Gray".to_string(),
            box_style: BoxStyle::default(),
            driver: DriverOptions::default(),
        }
    }
}

pub struct DemoScene {
    width: i32,
    height: i32,
    dials: Vec<Dial>,
    panzoomer: Panzoomer,
}

impl DemoScene {
    pub fn new(width: i32, height: i32) -> Self {
        let cell = ((width - MARGIN * 4) / 3).clamp(1, (height / 3).max(1));
        let row_y = MARGIN * 2 + box_height(height);
        let dials = [DialStyle::Arc, DialStyle::Plastic, DialStyle::Burnished]
            .into_iter()
            .enumerate()
            .map(|(i, style)| {
                let mut dial = Dial::new(MARGIN + i as i32 * (cell + MARGIN), row_y, cell, cell)
                    .with_style(style);
                dial.set_value(0.25 + 0.25 * i as f64);
                dial
            })
            .collect();

        let pz_y = row_y + cell + MARGIN;
        let mut panzoomer = Panzoomer::new(
            MARGIN,
            pz_y,
            width - MARGIN * 2,
            (height - pz_y - MARGIN).max(1),
        );
        panzoomer.set_box(BoxType::DownBox);
        panzoomer.set_x_range(300, 200, 0, 1000);
        panzoomer.set_y_range(100, 150, 0, 400);

        Self {
            width,
            height,
            dials,
            panzoomer,
        }
    }

    pub fn dials(&self) -> &[Dial] {
        &self.dials
    }

    pub fn dials_mut(&mut self) -> &mut [Dial] {
        &mut self.dials
    }

    pub fn draw(&mut self, d: &mut dyn Drawable, themes: &ThemeRegistry) {
        d.rectf_color(0, 0, self.width, self.height, Color::BACKGROUND);

        let bh = box_height(self.height);
        let slot = (self.width - MARGIN) / SHOWCASE_BOXES.len() as i32;
        for (i, kind) in SHOWCASE_BOXES.into_iter().enumerate() {
            let x = MARGIN + i as i32 * slot;
            themes.draw_box(d, kind, x, MARGIN, slot - MARGIN, bh, Color::BACKGROUND);
        }

        for dial in &mut self.dials {
            dial.draw(d, themes);
        }
        self.panzoomer.draw(d, themes);
        self.draw_primitives(d);
    }

    /// A star, a dashed curve and a pie slice inside the pan/zoomer.
    fn draw_primitives(&self, d: &mut dyn Drawable) {
        let area = self.panzoomer.bounds();
        let r = (area.h.min(area.w) / 3) as f64;
        if r < 4.0 {
            return;
        }
        let (cx, cy) = ((area.x + area.w / 4) as f64, (area.y + area.h / 2) as f64);

        d.push_clip(area.x, area.y, area.w, area.h);
        d.set_antialias(AntialiasMode::On);
        d.set_color(Color::YELLOW);
        d.push_matrix();
        d.translate(cx, cy);
        d.begin_complex_polygon();
        for i in 0..5 {
            let angle = (i * 144) as f64;
            d.push_matrix();
            d.rotate(angle);
            d.vertex(0.0, -r);
            d.pop_matrix();
        }
        d.end_complex_polygon();
        d.pop_matrix();

        d.set_color(Color::BLUE);
        d.line_style(LineStyle::with_dash(DashKind::DashDot, 2));
        let x0 = (area.x + area.w / 2) as f64;
        d.curve(
            x0,
            cy + r,
            x0 + r,
            cy - 2.0 * r,
            x0 + 2.0 * r,
            cy + 2.0 * r,
            x0 + 3.0 * r,
            cy - r,
        );
        d.stroke_path();
        d.line_style(LineStyle::default());

        d.set_color(Color::RED);
        let side = r as i32;
        let corner = Align {
            right: true,
            top: true,
            ..Align::default()
        };
        let inner = area.inset(MARGIN, MARGIN, MARGIN * 2, MARGIN * 2);
        let slot = Rect::aligned_in(&inner, side, side, corner);
        d.pie(slot.x, slot.y, slot.w, slot.h, 30.0, 300.0);
        d.set_antialias(AntialiasMode::Default);
        d.pop_clip();
    }

    /// Where the overlay highlight goes: around the first dial.
    pub fn overlay_bounds(&self) -> Option<Rect> {
        self.dials.first().map(|dial| {
            let b = dial.bounds();
            Rect::new(b.x - 2, b.y - 2, b.w + 4, b.h + 4)
        })
    }
}

/// Dashed selection outline drawn straight onto the window.
fn draw_overlay(d: &mut dyn Drawable, bounds: Option<Rect>) {
    let Some(b) = bounds else {
        return;
    };
    d.set_color(Color::SELECTION);
    d.line_style(LineStyle::with_dash(DashKind::Dash, 1));
    d.rect(b.x, b.y, b.w, b.h);
    d.line_style(LineStyle::default());
}

fn box_height(height: i32) -> i32 {
    (height / 8).max(8)
}

/// Renders the demo scene and returns the window's visible surface.
///
/// The scene is drawn twice: a full redraw, then a partial one after a dial
/// changes, so the damage region path is exercised as well.
pub fn render(options: &DemoOptions) -> Result<cairo::ImageSurface> {
    let (mut driver, surfaces) = Driver::headless(options.driver);
    let mut themes = ThemeRegistry::with_defaults();
    themes.set_theme(&options.theme)?;
    *themes.style_mut() = options.box_style;
    themes.apply_scheme(&options.scheme, driver.palette_mut())?;

    let handle = DrawableHandle(1);
    let mut window = Window::new(handle, options.width, options.height);
    let mut scene = DemoScene::new(options.width, options.height);
    window.show();
    window.redraw_overlay();

    let overlay = scene.overlay_bounds();
    window.flush_with_overlay(
        &mut driver,
        |d| scene.draw(d, &themes),
        |d| draw_overlay(d, overlay),
    )?;
    debug!("first flush done, buffer {:?}", window.buffer_state());

    if let Some(dial) = scene.dials_mut().get_mut(1) {
        dial.set_value(0.9);
        let bounds = dial.bounds();
        window.expose(bounds);
        window.add_damage(Damage::CHILD);
    }
    window.flush_with_overlay(
        &mut driver,
        |d| scene.draw(d, &themes),
        |d| draw_overlay(d, overlay),
    )?;

    let surface = surfaces
        .visible(handle)
        .context("window has no visible surface after flushing")?;
    info!(
        "rendered {}x{} demo with theme {} and scheme {}",
        options.width, options.height, options.theme, options.scheme
    );
    window.hide(&mut driver);
    Ok(surface)
}
