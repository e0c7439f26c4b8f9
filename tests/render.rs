use std::cell::Cell;

use cairo_chrome::draw::{
    Color, Damage, Drawable, DrawableHandle, Driver, DriverOptions, Palette, Rgba, Window,
    add_alpha,
};
use cairo_chrome::theme::{BoxType, ThemeRegistry};
use cairo_chrome::util::Rect;
use cairo_chrome::widgets::{Dial, DialStyle, Panzoomer, Widget};

const OPAQUE_RED: u32 = 0xffff_0000;
const OPAQUE_BLUE: u32 = 0xff00_00ff;
const OPAQUE_WHITE: u32 = 0xffff_ffff;
const HANDLE: DrawableHandle = DrawableHandle(7);

fn argb(surface: &cairo::ImageSurface, x: i32, y: i32) -> u32 {
    surface.flush();
    let o = (y * surface.stride() + x * 4) as usize;
    let mut px = [0u8; 4];
    surface
        .with_data(|data| px.copy_from_slice(&data[o..o + 4]))
        .unwrap();
    u32::from_ne_bytes(px)
}

fn shown_window(w: i32, h: i32) -> Window {
    let mut window = Window::new(HANDLE, w, h);
    window.show();
    window
}

#[test]
fn partial_redraw_only_reaches_the_exposed_region() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = shown_window(40, 40);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 40, 40, Color::RED))
        .unwrap();

    window.expose(Rect::new(10, 10, 10, 10));
    window.add_damage(Damage::CHILD);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 40, 40, Color::BLUE))
        .unwrap();

    let visible = surfaces.visible(HANDLE).unwrap();
    assert_eq!(argb(&visible, 15, 15), OPAQUE_BLUE);
    assert_eq!(argb(&visible, 10, 10), OPAQUE_BLUE);
    assert_eq!(argb(&visible, 20, 20), OPAQUE_RED);
    assert_eq!(argb(&visible, 2, 2), OPAQUE_RED);
}

#[test]
fn expose_alone_recopies_without_drawing() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = shown_window(20, 20);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 20, 20, Color::RED))
        .unwrap();

    // scribble on the visible surface, as an obscuring window would
    let visible = surfaces.visible(HANDLE).unwrap();
    {
        let cr = cairo::Context::new(&visible).unwrap();
        cr.set_source_rgb(1.0, 1.0, 1.0);
        cr.paint().unwrap();
    }

    let drew = Cell::new(false);
    window.expose(Rect::new(0, 0, 5, 5));
    assert_eq!(window.expose_region(), Some(Rect::new(0, 0, 5, 5)));
    window.flush(&mut driver, |_| drew.set(true)).unwrap();
    assert_eq!(window.expose_region(), None);

    assert!(!drew.get());
    assert_eq!(argb(&visible, 2, 2), OPAQUE_RED);
    assert_eq!(argb(&visible, 10, 10), OPAQUE_WHITE);
}

#[test]
fn resized_window_is_redrawn_at_its_new_size() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = shown_window(30, 30);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 30, 30, Color::RED))
        .unwrap();

    window.resize(60, 20);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 60, 20, Color::BLUE))
        .unwrap();

    let visible = surfaces.visible(HANDLE).unwrap();
    assert_eq!((visible.width(), visible.height()), (60, 20));
    assert_eq!(argb(&visible, 55, 15), OPAQUE_BLUE);
}

#[test]
fn hidden_windows_ignore_flush() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = Window::new(HANDLE, 10, 10);
    assert!(!window.is_shown());
    let drew = Cell::new(false);
    window.flush(&mut driver, |_| drew.set(true)).unwrap();
    assert!(!drew.get());
    assert!(surfaces.visible(HANDLE).is_none());
}

#[test]
fn reparented_window_draws_into_its_new_drawable() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = shown_window(20, 20);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 20, 20, Color::RED))
        .unwrap();

    let moved = DrawableHandle(8);
    window.set_handle(moved);
    window
        .flush(&mut driver, |d| d.rectf_color(0, 0, 20, 20, Color::BLUE))
        .unwrap();

    assert_eq!(argb(&surfaces.visible(moved).unwrap(), 10, 10), OPAQUE_BLUE);
    assert_eq!(argb(&surfaces.visible(HANDLE).unwrap(), 10, 10), OPAQUE_RED);
}

#[test]
fn nested_clips_intersect_and_unwind() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut window = shown_window(40, 40);
    window
        .flush(&mut driver, |d| {
            d.rectf_color(0, 0, 40, 40, Color::WHITE);
            d.push_clip(0, 0, 20, 20);
            d.push_clip(10, 10, 20, 20);
            d.rectf_color(0, 0, 40, 40, Color::RED);
            d.pop_clip();
            d.pop_clip();
            d.rectf_color(30, 30, 10, 10, Color::BLUE);
        })
        .unwrap();

    let visible = surfaces.visible(HANDLE).unwrap();
    assert_eq!(argb(&visible, 15, 15), OPAQUE_RED);
    assert_eq!(argb(&visible, 5, 5), OPAQUE_WHITE);
    assert_eq!(argb(&visible, 25, 25), OPAQUE_WHITE);
    assert_eq!(argb(&visible, 35, 35), OPAQUE_BLUE);
}

#[test]
fn themed_boxes_stay_inside_their_bounds() {
    let (mut driver, surfaces) = Driver::headless(DriverOptions::default());
    let mut themes = ThemeRegistry::with_defaults();
    let mut window = shown_window(40, 40);

    for theme in ["Cairo", "Vector"] {
        themes.set_theme(theme).unwrap();
        window.redraw();
        window
            .flush(&mut driver, |d| {
                d.rectf_color(0, 0, 40, 40, Color::WHITE);
                themes.draw_box(d, BoxType::UpBox, 10, 10, 20, 20, Color::BACKGROUND);
            })
            .unwrap();

        let visible = surfaces.visible(HANDLE).unwrap();
        assert_eq!(argb(&visible, 7, 20), OPAQUE_WHITE, "{theme}");
        assert_eq!(argb(&visible, 32, 20), OPAQUE_WHITE, "{theme}");
        assert_ne!(argb(&visible, 20, 20), OPAQUE_WHITE, "{theme}");
    }
}

#[test]
fn dial_damage_is_cleared_by_drawing() {
    let (mut driver, _surfaces) = Driver::headless(DriverOptions::default());
    let themes = ThemeRegistry::with_defaults();
    let mut window = shown_window(64, 64);
    let mut dial = Dial::new(0, 0, 64, 64);
    window.flush(&mut driver, |d| dial.draw(d, &themes)).unwrap();
    assert!(dial.damage().is_empty());

    assert!(dial.set_value(0.75));
    assert!(!dial.damage().is_empty());
    window.add_damage(Damage::CHILD);
    window.flush(&mut driver, |d| dial.draw(d, &themes)).unwrap();
    assert!(dial.damage().is_empty());
}

#[test]
fn dial_and_panzoomer_settings_round_trip() {
    let mut dial = Dial::new(0, 0, 40, 40);
    dial.set_style(DialStyle::Arc);
    dial.set_angles(0.0, 180.0);
    dial.set_value(0.5);
    assert_eq!(dial.angle_for_value(), 90.0);
    dial.set_active(false);
    dial.set_selection_color(Color::RED);

    let (mut driver, _surfaces) = Driver::headless(DriverOptions::default());
    let themes = ThemeRegistry::with_defaults();
    let mut window = shown_window(40, 40);
    window.flush(&mut driver, |d| dial.draw(d, &themes)).unwrap();
    assert!(dial.damage().is_empty());

    let mut panzoomer = Panzoomer::new(0, 0, 100, 60);
    panzoomer.set_zoom_range(1, 3);
    assert_eq!(panzoomer.zoom_range(), (1, 3));
    assert!(panzoomer.set_zoom(7));
    assert_eq!(panzoomer.zoom(), 3);
}

#[test]
fn packed_colors_carry_alpha_through_the_palette() {
    let palette = Palette::default();

    let red = add_alpha(&palette, Color::RED.to_packed(), 128);
    assert_eq!(red, 0xff00_0080);
    assert_eq!(Color::from_packed(red), Color::Rgba(Rgba::new(255, 0, 0, 128)));

    let black = add_alpha(&palette, Color::BLACK.to_packed(), 64);
    assert_eq!(black, 0x0101_0140);
    assert_eq!(Color::from_packed(black), Color::Rgba(Rgba::new(0, 0, 0, 64)));

    assert_eq!(add_alpha(&palette, Color::RED.to_packed(), 0) & 0xff, 0xff);
}

#[test]
fn matrix_overflow_is_reported_once_per_extra_push() {
    let options = DriverOptions {
        matrix_stack_depth: 4,
        ..DriverOptions::default()
    };
    let (mut driver, _surfaces) = Driver::headless(options);
    for _ in 0..6 {
        driver.push_matrix();
    }
    assert_eq!(driver.state().stack_errors(), 2);
    assert_eq!(driver.state().matrices().depth(), 4);

    driver.translate(5.0, 0.0);
    assert!(!driver.state().matrices().current().is_identity());
    driver.load_identity();
    assert!(driver.state().matrices().current().is_identity());
}
