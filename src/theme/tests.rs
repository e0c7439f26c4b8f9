use super::*;
use crate::draw::{Driver, DriverOptions, OffscreenBuffer, PaletteIndex, Rgba};

fn canvas(w: i32, h: i32) -> (Driver, OffscreenBuffer) {
    let (mut driver, _surfaces) = Driver::headless(DriverOptions::default());
    let buffer = OffscreenBuffer::new(driver.factory(), w, h).unwrap();
    driver.make_current_offscreen(&buffer).unwrap();
    (driver, buffer)
}

/// (a, r, g, b) of one pixel.
fn pixel(surface: &::cairo::ImageSurface, x: i32, y: i32) -> [u8; 4] {
    surface.flush();
    let offset = (y * surface.stride() + x * 4) as usize;
    let mut px = 0u32;
    surface
        .with_data(|data| {
            px = u32::from_ne_bytes([
                data[offset],
                data[offset + 1],
                data[offset + 2],
                data[offset + 3],
            ]);
        })
        .unwrap();
    [(px >> 24) as u8, (px >> 16) as u8, (px >> 8) as u8, px as u8]
}

#[test]
fn register_defaults_is_idempotent() {
    let mut registry = ThemeRegistry::new();
    registry.register_defaults();
    registry.register_defaults();
    assert_eq!(registry.themes().len(), 2);
    assert_eq!(registry.schemes().len(), 8);
}

#[test]
fn lookups_ignore_case() {
    let mut registry = ThemeRegistry::with_defaults();
    assert_eq!(registry.find("cairo").map(|t| t.name.as_str()), Some("Cairo"));
    assert!(registry.find_scheme("washed OUT").is_some());
    registry.set_theme("VECTOR").unwrap();
    assert_eq!(registry.current().unwrap().name, "Vector");
}

#[test]
fn unknown_names_are_errors() {
    let mut registry = ThemeRegistry::with_defaults();
    assert_eq!(
        registry.set_theme("gleam"),
        Err(ThemeError::UnknownTheme("gleam".into()))
    );
    assert!(registry.current().is_none());
    let mut palette = Palette::default();
    assert_eq!(
        registry.apply_scheme("System", &mut palette),
        Err(ThemeError::UnknownScheme("System".into()))
    );
    assert_eq!(palette, Palette::default());
}

#[test]
fn adding_a_theme_with_a_known_name_replaces_it() {
    let mut registry = ThemeRegistry::with_defaults();
    registry.add(Theme::new("cairo", "replacement", "test"));
    assert_eq!(registry.themes().len(), 2);
    assert_eq!(registry.find("Cairo").unwrap().description, "replacement");
}

#[test]
fn insets_follow_the_current_theme() {
    let mut registry = ThemeRegistry::with_defaults();
    assert_eq!(registry.box_dx(BoxType::FlatBox), 0);
    assert_eq!(registry.box_dw(BoxType::UpBox), 4);

    registry.set_theme("Cairo").unwrap();
    assert_eq!(registry.box_dx(BoxType::UpBox), 1);
    assert_eq!(registry.box_dh(BoxType::UpBox), 2);
    assert_eq!(
        registry.interior(BoxType::RShadowBox, Rect::new(0, 0, 50, 30)),
        Rect::new(5, 5, 40, 20)
    );
    // not covered by Cairo
    assert_eq!(registry.box_dx(BoxType::BorderBox), 1);

    registry.set_theme("Vector").unwrap();
    assert_eq!(registry.box_dy(BoxType::DownBox), 2);
    assert_eq!(registry.box_dw(BoxType::BorderBox), 2);
}

#[test]
fn scheme_sets_base_colors() {
    let registry = ThemeRegistry::with_defaults();
    let mut palette = Palette::default();
    registry.apply_scheme("Black", &mut palette).unwrap();
    assert_eq!(palette.get(PaletteIndex::BACKGROUND), Rgba::rgb(4, 4, 4));
    assert_eq!(palette.get(PaletteIndex::BACKGROUND2), Rgba::rgb(20, 20, 20));
    assert_eq!(palette.get(PaletteIndex::FOREGROUND), Rgba::rgb(240, 240, 240));
    assert_eq!(palette.get(PaletteIndex::SELECTION), Rgba::rgb(255, 255, 0));
}

#[test]
fn box_types_pair_up_and_down() {
    assert_eq!(BoxType::UpBox.down(), BoxType::DownBox);
    assert_eq!(BoxType::FlatBox.down(), BoxType::FlatBox);
    assert!(BoxType::RoundDownBox.is_down());
    assert!(!BoxType::UpFrame.is_down());
}

#[test]
fn draw_box_restores_driver_color() {
    for theme in ["Cairo", "Vector"] {
        let mut registry = ThemeRegistry::with_defaults();
        registry.set_theme(theme).unwrap();
        let (mut d, buffer) = canvas(40, 20);
        d.set_color(Color::GREEN);
        registry.draw_box(&mut d, BoxType::UpBox, 0, 0, 40, 20, Color::BACKGROUND);
        assert_eq!(d.color(), Color::GREEN, "{theme}");
        assert_eq!(pixel(buffer.image(), 20, 10)[0], 255, "{theme}");
    }
}

#[test]
fn no_box_and_empty_boxes_draw_nothing() {
    let registry = ThemeRegistry::with_defaults();
    let (mut d, buffer) = canvas(10, 10);
    registry.draw_box(&mut d, BoxType::NoBox, 0, 0, 10, 10, Color::RED);
    registry.draw_box(&mut d, BoxType::UpBox, 0, 0, 0, 10, Color::RED);
    assert_eq!(pixel(buffer.image(), 5, 5), [0, 0, 0, 0]);
}

#[test]
fn fallback_flat_box_fills_exactly() {
    let registry = ThemeRegistry::with_defaults();
    let (mut d, buffer) = canvas(20, 20);
    registry.draw_box(&mut d, BoxType::FlatBox, 2, 2, 10, 10, Color::RED);
    assert_eq!(pixel(buffer.image(), 2, 2), [255, 255, 0, 0]);
    assert_eq!(pixel(buffer.image(), 11, 11), [255, 255, 0, 0]);
    assert_eq!(pixel(buffer.image(), 12, 12)[0], 0);
}

#[test]
fn cairo_gradient_brightens_toward_the_bottom() {
    let mut registry = ThemeRegistry::with_defaults();
    registry.set_theme("Cairo").unwrap();
    let (mut d, buffer) = canvas(40, 40);
    registry.draw_box(&mut d, BoxType::UpBox, 0, 0, 40, 40, Color::BACKGROUND);
    let top = pixel(buffer.image(), 20, 6);
    let bottom = pixel(buffer.image(), 20, 33);
    assert!(bottom[1] > top[1], "{top:?} vs {bottom:?}");

    registry.style_mut().gradients = false;
    let (mut d, buffer) = canvas(40, 40);
    registry.draw_box(&mut d, BoxType::UpBox, 0, 0, 40, 40, Color::BACKGROUND);
    assert_eq!(pixel(buffer.image(), 20, 6), pixel(buffer.image(), 20, 33));
}
