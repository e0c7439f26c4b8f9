use super::*;
use crate::draw::compositor::Window;
use crate::draw::context::DrawableHandle;

const OPAQUE_RED: u32 = 0xffff_0000;
const OPAQUE_BLUE: u32 = 0xff00_00ff;

fn canvas(w: i32, h: i32) -> (Driver, OffscreenBuffer) {
    let (mut driver, _surfaces) = Driver::headless(DriverOptions::default());
    let buffer = OffscreenBuffer::new(driver.factory(), w, h).unwrap();
    driver.make_current_offscreen(&buffer).unwrap();
    (driver, buffer)
}

fn pixels(surface: &cairo::ImageSurface) -> Vec<u32> {
    surface.flush();
    let stride = surface.stride() as usize;
    let (w, h) = (surface.width() as usize, surface.height() as usize);
    let mut out = Vec::with_capacity(w * h);
    surface
        .with_data(|data| {
            for y in 0..h {
                for x in 0..w {
                    let o = y * stride + x * 4;
                    out.push(u32::from_ne_bytes([
                        data[o],
                        data[o + 1],
                        data[o + 2],
                        data[o + 3],
                    ]));
                }
            }
        })
        .unwrap();
    out
}

fn argb(surface: &cairo::ImageSurface, x: i32, y: i32) -> u32 {
    pixels(surface)[(y * surface.width() + x) as usize]
}

fn alpha(surface: &cairo::ImageSurface, x: i32, y: i32) -> u8 {
    (argb(surface, x, y) >> 24) as u8
}

fn painted(surface: &cairo::ImageSurface) -> Vec<(i32, i32)> {
    let w = surface.width();
    pixels(surface)
        .into_iter()
        .enumerate()
        .filter(|(_, px)| px >> 24 != 0)
        .map(|(i, _)| (i as i32 % w, i as i32 / w))
        .collect()
}

#[test]
fn drawing_without_a_context_is_a_no_op() {
    let (mut d, _surfaces) = Driver::headless(DriverOptions::default());
    d.set_color(Color::RED);
    d.line(0, 0, 10, 10);
    d.rect(0, 0, 10, 10);
    d.pie(0, 0, 10, 10, 0.0, 90.0);
    d.push_clip(0, 0, 5, 5);
    d.begin_polygon();
    d.vertex(1.0, 1.0);
    d.end_polygon();
    d.curve(0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0);
    d.stroke_path();
    d.draw_image(&Image::new(1, 1, 3, vec![1, 2, 3]), 0, 0, 1, 1, 0, 0);
    d.pop_clip();
    assert!(d.cairo().is_none());
}

#[test]
fn horizontal_line_covers_exactly_one_row() {
    let (mut d, buffer) = canvas(80, 100);
    d.line(10, 50, 60, 50);
    let image = buffer.image();
    assert_eq!(alpha(image, 30, 50), 255);
    assert_eq!(alpha(image, 30, 49), 0);
    assert_eq!(alpha(image, 30, 51), 0);
    assert!(painted(image).iter().all(|&(_, y)| y == 50));
}

#[test]
fn vertical_line_covers_exactly_one_column() {
    let (mut d, buffer) = canvas(20, 20);
    d.yxline(5, 2, 15);
    assert!(painted(buffer.image()).iter().all(|&(x, _)| x == 5));
    assert_eq!(alpha(buffer.image(), 5, 10), 255);
}

#[test]
fn stroked_rect_stays_inside_filled_rect() {
    for width in [0, 1, 2, 3, 5] {
        let (mut d, buffer) = canvas(40, 40);
        d.line_style(LineStyle::solid(width));
        d.rect(7, 9, 20, 13);
        let inside = |&(x, y): &(i32, i32)| (7..27).contains(&x) && (9..22).contains(&y);
        let outline = painted(buffer.image());
        assert!(!outline.is_empty());
        assert!(outline.iter().all(inside), "width {width} leaks outside the fill");
        assert_eq!(alpha(buffer.image(), 7, 9), 255);
        assert_eq!(alpha(buffer.image(), 26, 21), 255);
    }
}

#[test]
fn rect_restores_configured_antialiasing() {
    let (mut d, _buffer) = canvas(20, 20);
    d.set_antialias(AntialiasMode::On);
    d.rect(2, 2, 10, 10);
    d.xyline2(1, 1, 8, 8);
    assert_eq!(d.cairo().unwrap().antialias(), cairo::Antialias::Gray);
}

#[test]
fn clip_limits_drawing_until_popped() {
    let (mut d, buffer) = canvas(40, 40);
    d.push_clip(0, 0, 10, 10);
    d.rectf(0, 0, 40, 40);
    assert_eq!(alpha(buffer.image(), 5, 5), 255);
    assert_eq!(alpha(buffer.image(), 20, 20), 0);
    d.pop_clip();
    d.rectf(0, 0, 40, 40);
    assert_eq!(alpha(buffer.image(), 39, 39), 255);
}

#[test]
fn clip_push_pop_round_trip_up_to_the_bound() {
    let (mut d, buffer) = canvas(40, 40);
    d.push_clip(1, 1, 30, 30);
    let before = d.state().clips().current();
    let n = d.state().clips().limit() - 1;
    for i in 0..n {
        d.push_clip(i as i32 % 7, 0, 35, 35);
    }
    for _ in 0..n {
        d.pop_clip();
    }
    assert_eq!(d.state().clips().current(), before);

    d.rectf(0, 0, 40, 40);
    assert_eq!(alpha(buffer.image(), 1, 1), 255);
    assert_eq!(alpha(buffer.image(), 30, 30), 255);
    assert_eq!(alpha(buffer.image(), 31, 31), 0);
    d.pop_clip();
}

#[test]
fn excess_clip_pushes_keep_renderer_balanced() {
    let (mut d, buffer) = canvas(20, 20);
    let limit = d.state().clips().limit();
    for _ in 0..limit + 3 {
        d.push_clip(0, 0, 4, 4);
    }
    for _ in 0..limit + 3 {
        d.pop_clip();
    }
    d.rectf(0, 0, 20, 20);
    assert_eq!(alpha(buffer.image(), 19, 19), 255);
}

#[test]
fn huge_clip_and_image_sizes_do_not_overflow() {
    let (mut d, buffer) = canvas(40, 40);
    d.push_clip(0, 0, 100, 100);
    d.push_clip(10, 10, i32::MAX, i32::MAX);
    assert_eq!(d.clip_box(0, 0, i32::MAX, i32::MAX), Some(Rect::new(10, 10, 90, 90)));

    let strip = Image::new(8, 1, 3, [0, 0, 255].repeat(8));
    d.draw_image(&strip, 10, 10, i32::MAX, 1, 5, 0);
    assert_eq!(argb(buffer.image(), 12, 10), OPAQUE_BLUE);
    assert_eq!(alpha(buffer.image(), 13, 10), 0);
    d.pop_clip();
    d.pop_clip();
    assert_eq!(d.state().clips().depth(), 0);
}

#[test]
fn clip_box_reports_visible_part() {
    let (mut d, _buffer) = canvas(40, 40);
    d.push_clip(10, 10, 10, 10);
    assert_eq!(d.clip_box(0, 0, 15, 15), Some(Rect::new(10, 10, 5, 5)));
    assert!(!d.not_clipped(0, 0, 5, 5));
    d.push_no_clip();
    assert!(d.not_clipped(0, 0, 5, 5));
    d.pop_clip();
    d.pop_clip();
}

#[test]
fn two_vertex_polygon_matches_open_line() {
    let (mut poly, poly_buf) = canvas(40, 40);
    poly.begin_polygon();
    poly.vertex(5.0, 5.0);
    poly.vertex(30.0, 22.0);
    poly.end_polygon();

    let (mut line, line_buf) = canvas(40, 40);
    line.begin_line();
    line.vertex(5.0, 5.0);
    line.vertex(30.0, 22.0);
    line.end_line();

    let drawn = pixels(poly_buf.image());
    assert!(drawn.iter().any(|px| px >> 24 != 0));
    assert_eq!(drawn, pixels(line_buf.image()));
}

#[test]
fn horizontal_two_vertex_polygon_matches_integer_line() {
    let (mut poly, poly_buf) = canvas(80, 80);
    poly.begin_polygon();
    poly.vertex(10.0, 50.0);
    poly.vertex(60.0, 50.0);
    poly.end_polygon();

    let (mut line, line_buf) = canvas(80, 80);
    line.line(10, 50, 60, 50);

    let drawn = painted(poly_buf.image());
    assert!(drawn.iter().all(|&(_, y)| y == 50));
    assert_eq!(pixels(poly_buf.image()), pixels(line_buf.image()));
}

#[test]
fn one_pixel_outlines_stay_visible() {
    let (mut d, buffer) = canvas(20, 20);
    d.rect(5, 5, 1, 1);
    assert_eq!(painted(buffer.image()), vec![(5, 5)]);

    let (mut d, buffer) = canvas(20, 20);
    d.rect(2, 8, 6, 1);
    let row: Vec<(i32, i32)> = (2..8).map(|x| (x, 8)).collect();
    assert_eq!(painted(buffer.image()), row);
}

#[test]
fn complex_polygon_fills_even_odd() {
    let (mut d, buffer) = canvas(30, 30);
    d.begin_complex_polygon();
    for (x, y) in [(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)] {
        d.vertex(x, y);
    }
    d.gap();
    for (x, y) in [(5.0, 5.0), (15.0, 5.0), (15.0, 15.0), (5.0, 15.0)] {
        d.vertex(x, y);
    }
    d.end_complex_polygon();
    assert_eq!(alpha(buffer.image(), 2, 2), 255);
    assert_eq!(alpha(buffer.image(), 10, 10), 0);
}

#[test]
fn loop_is_stroked_not_filled() {
    let (mut d, buffer) = canvas(30, 30);
    d.begin_loop();
    for (x, y) in [(2.0, 2.0), (25.0, 2.0), (25.0, 25.0), (2.0, 25.0)] {
        d.vertex(x, y);
    }
    d.end_loop();
    assert_eq!(alpha(buffer.image(), 13, 13), 0);
    assert!(alpha(buffer.image(), 13, 2) > 0);
}

#[test]
fn points_paint_single_pixels() {
    let (mut d, buffer) = canvas(10, 10);
    d.begin_points();
    d.vertex(3.0, 4.0);
    d.vertex(7.2, 1.9);
    d.end_points();
    assert_eq!(painted(buffer.image()), vec![(7, 1), (3, 4)]);
}

#[test]
fn vertices_go_through_the_matrix() {
    let (mut d, buffer) = canvas(30, 30);
    d.push_matrix();
    d.translate(10.0, 10.0);
    d.begin_polygon();
    for (x, y) in [(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)] {
        d.vertex(x, y);
    }
    d.end_polygon();
    d.pop_matrix();
    assert_eq!(alpha(buffer.image(), 12, 12), 255);
    assert_eq!(alpha(buffer.image(), 2, 2), 0);
    assert_eq!(d.transform_point(1.0, 1.0), (1.0, 1.0));
}

#[test]
fn matrix_overflow_is_reported_once_per_excess_push() {
    let options = DriverOptions {
        matrix_stack_depth: 4,
        ..DriverOptions::default()
    };
    let (mut d, _surfaces) = Driver::headless(options);
    d.translate(10.0, 0.0);
    for _ in 0..6 {
        d.push_matrix();
    }
    assert_eq!(d.state().stack_errors(), 2);
    assert_eq!(d.state().matrices().depth(), 4);
    assert_eq!(d.transform_point(1.0, 1.0), (11.0, 1.0));

    for _ in 0..6 {
        d.pop_matrix();
    }
    assert_eq!(d.state().stack_errors(), 2);
    assert_eq!(d.state().matrices().depth(), 0);
    assert_eq!(d.transform_point(1.0, 1.0), (11.0, 1.0));

    d.pop_matrix();
    assert_eq!(d.state().stack_errors(), 3);
}

#[test]
fn pie_covers_the_same_quadrant_in_either_order() {
    for (a1, a2) in [(0.0, 90.0), (90.0, 0.0)] {
        let (mut d, buffer) = canvas(40, 40);
        d.pie(0, 0, 40, 40, a1, a2);
        assert_eq!(alpha(buffer.image(), 30, 10), 255, "{a1}..{a2}");
        assert_eq!(alpha(buffer.image(), 10, 30), 0, "{a1}..{a2}");
        assert_eq!(alpha(buffer.image(), 10, 10), 0, "{a1}..{a2}");
    }
}

#[test]
fn zero_sized_arcs_draw_nothing() {
    let (mut d, buffer) = canvas(20, 20);
    d.arc(5, 5, 0, 10, 0.0, 360.0);
    d.pie(5, 5, 10, 0, 0.0, 360.0);
    assert!(painted(buffer.image()).is_empty());
}

#[test]
fn circle_fills_inside_polygon_and_strokes_otherwise() {
    let (mut d, buffer) = canvas(40, 40);
    d.circle(20.0, 20.0, 8.0);
    assert_eq!(alpha(buffer.image(), 20, 20), 0);
    assert!(alpha(buffer.image(), 28, 20) > 0);

    d.begin_polygon();
    d.circle(20.0, 20.0, 8.0);
    d.end_polygon();
    assert_eq!(alpha(buffer.image(), 20, 20), 255);
}

#[test]
fn curve_waits_for_an_explicit_stroke() {
    let (mut d, buffer) = canvas(30, 30);
    d.curve(2.0, 2.0, 10.0, 30.0, 20.0, -5.0, 28.0, 28.0);
    assert!(painted(buffer.image()).is_empty());
    d.stroke_path();
    assert!(!painted(buffer.image()).is_empty());
}

#[test]
fn arc_path_feeds_the_open_shape() {
    let (mut d, buffer) = canvas(40, 40);
    d.begin_polygon();
    d.arc_path(20.0, 20.0, 10.0, 0.0, 360.0);
    d.end_polygon();
    assert_eq!(alpha(buffer.image(), 20, 20), 255);
    assert_eq!(alpha(buffer.image(), 2, 2), 0);
}

#[test]
fn packed_colors_select_the_source() {
    let (mut d, buffer) = canvas(4, 4);
    d.set_packed(0xff00_0000);
    assert_eq!(d.color(), Color::rgb(255, 0, 0));
    d.rectf(0, 0, 4, 4);
    assert_eq!(argb(buffer.image(), 1, 1), OPAQUE_RED);
}

#[test]
fn rgb_image_is_blitted_at_offset() {
    let (mut d, buffer) = canvas(20, 20);
    let red = Image::new(2, 2, 3, [255, 0, 0].repeat(4));
    d.draw_image(&red, 5, 5, 2, 2, 0, 0);
    assert_eq!(argb(buffer.image(), 5, 5), OPAQUE_RED);
    assert_eq!(argb(buffer.image(), 6, 6), OPAQUE_RED);
    assert_eq!(alpha(buffer.image(), 7, 7), 0);
}

#[test]
fn image_source_rect_is_clipped_to_the_image() {
    let (mut d, buffer) = canvas(20, 20);
    let strip = Image::new(4, 1, 3, vec![255, 0, 0, 255, 0, 0, 0, 0, 0, 0, 0, 255]);
    d.draw_image(&strip, 10, 0, 6, 1, 2, 0);
    assert_eq!(argb(buffer.image(), 10, 0), 0xff00_0000);
    assert_eq!(argb(buffer.image(), 11, 0), OPAQUE_BLUE);
    assert_eq!(alpha(buffer.image(), 12, 0), 0);

    d.draw_image(&strip, 0, 5, 4, 4, 5, 5);
    d.draw_image(&Image::empty(4, 4, 3), 0, 10, 4, 4, 0, 0);
    assert!(painted(buffer.image()).iter().all(|&(_, y)| y == 0));
}

#[test]
fn mask_image_paints_current_color() {
    let (mut d, buffer) = canvas(10, 10);
    d.set_color(Color::BLUE);
    d.draw_image(&Image::new(2, 2, 1, vec![255; 4]), 1, 1, 2, 2, 0, 0);
    assert_eq!(argb(buffer.image(), 1, 1), OPAQUE_BLUE);
    assert_eq!(alpha(buffer.image(), 3, 3), 0);
}

#[test]
fn copy_offscreen_transfers_a_region() {
    let (mut d, target) = canvas(20, 20);
    let source = OffscreenBuffer::new(d.factory(), 10, 10).unwrap();
    d.with_offscreen(&source, |d| d.rectf_color(0, 0, 10, 10, Color::RED))
        .unwrap();
    d.copy_offscreen(5, 5, 4, 4, &source, 0, 0);
    assert_eq!(argb(target.image(), 5, 5), OPAQUE_RED);
    assert_eq!(alpha(target.image(), 10, 10), 0);
}

#[test]
fn make_current_is_idempotent_for_unchanged_windows() {
    let (mut d, _surfaces) = Driver::headless(DriverOptions::default());
    let mut window = Window::new(DrawableHandle(5), 30, 20);
    let first = d.make_current(&mut window).unwrap();
    let second = d.make_current(&mut window).unwrap();
    assert!(first.same_context(&second));
}

#[test]
fn failed_make_current_keeps_previous_context() {
    let (mut d, _surfaces) = Driver::headless(DriverOptions::default());
    let mut window = Window::new(DrawableHandle(5), 30, 20);
    let active = d.make_current(&mut window).unwrap();
    let mut unrealized = Window::new(DrawableHandle::NONE, 10, 10);
    assert!(matches!(
        d.make_current(&mut unrealized),
        Err(DriverError::SurfaceCreation { .. })
    ));
    assert!(d.current().unwrap().same_context(&active));
}

#[test]
fn offscreen_scope_restores_context_and_clip() {
    let (mut d, _surfaces) = Driver::headless(DriverOptions::default());
    let mut window = Window::new(DrawableHandle(9), 30, 30);
    let on_screen = d.make_current(&mut window).unwrap();
    d.push_clip(0, 0, 5, 5);
    let buffer = OffscreenBuffer::new(d.factory(), 20, 20).unwrap();
    {
        let mut scope = d.begin_offscreen(&buffer).unwrap();
        assert_eq!(scope.state().clips().current(), ClipRegion::NoClip);
        scope.rectf(0, 0, 20, 20);
    }
    assert!(d.current().unwrap().same_context(&on_screen));
    assert_eq!(
        d.state().clips().current(),
        ClipRegion::Rect(Rect::new(0, 0, 5, 5))
    );
    assert_eq!(alpha(buffer.image(), 19, 19), 255);
    d.pop_clip();
}
