use nalgebra::{Matrix3, Vector3};

use crate::canvas::Canvas;
use crate::glyph::GlyphBuffer;

/// Lifts one glyph pixel into 3D, rotates it and drops it back onto the
/// canvas plane.
///
/// The pixel position is normalized around the glyph-buffer center and
/// stretched to canvas size; brightness scaled by `height_scale` becomes z.
/// After rotation z is discarded (orthographic projection) and the point is
/// recentered by half the canvas size.
pub fn project_pixel(
    (x, y): (usize, usize),
    glyph_shape: (usize, usize),
    canvas_shape: (usize, usize),
    brightness: u32,
    rot: &Matrix3<f32>,
    height_scale: f32,
) -> [f32; 2] {
    let (gw, gh) = glyph_shape;
    let (cw, ch) = canvas_shape;
    let p = Vector3::new(
        (x as f32 / gw as f32 - 0.5) * cw as f32,
        (y as f32 / gh as f32 - 0.5) * ch as f32,
        brightness as f32 * height_scale,
    );
    let q = rot * p;
    [q.x + cw as f32 * 0.5, q.y + ch as f32 * 0.5]
}

/// Sweeps the glyph buffer and strokes the warped mesh onto the canvas.
///
/// Every grid point shares the same rotation matrix, so the mesh stays rigid.
/// Edges to the left and top neighbors are drawn as soon as a point is
/// computed; the y-outer/x-inner order guarantees both neighbors already
/// exist in the grid.
pub fn draw(
    glyph: &GlyphBuffer,
    rot: &Matrix3<f32>,
    height_scale: f32,
    canvas: &mut Canvas,
    color: [u8; 3],
) {
    let (gw, gh) = glyph.shape();
    let canvas_shape = canvas.shape();
    let mut grid = vec![[0f32; 2]; gw * gh];
    for (y, x) in itertools::iproduct!(0..gh, 0..gw) {
        let r0 = project_pixel(
            (x, y),
            (gw, gh),
            canvas_shape,
            glyph.brightness_at(x, y),
            rot,
            height_scale,
        );
        grid[y * gw + x] = r0;
        if y > 0 {
            // vertical edge
            canvas.line(grid[(y - 1) * gw + x], r0, color);
        }
        if x > 0 {
            // horizontal edge
            canvas.line(grid[y * gw + x - 1], r0, color);
        }
    }
}

#[cfg(test)]
fn checkerboard(shape: (usize, usize)) -> GlyphBuffer {
    let data = (0..shape.0 * shape.1)
        .map(|i| {
            if (i / shape.0 + i % shape.0) % 2 == 0 {
                [255u8; 3]
            } else {
                [0u8; 3]
            }
        })
        .collect();
    GlyphBuffer::from_pixels(shape, data)
}

#[test]
fn test_project_pixel_golden() {
    // glyph (50, 20) of a 100x40 buffer lands on the normalized origin, so
    // only the z column of the rotation matrix contributes
    let rot = crate::rotation::mat3_zxz(0.5, 1.0, 0.1);
    let r0 = project_pixel((50, 20), (100, 40), (400, 200), 600, &rot, 0.001);
    assert!((r0[0] - 200.0504).abs() < 1.0e-3);
    assert!((r0[1] - 99.49764).abs() < 1.0e-3);
}

#[test]
fn test_project_pixel_zero_brightness_center() {
    let rot = crate::rotation::mat3_zxz(0.5, 1.0, 0.1);
    let r0 = project_pixel((50, 20), (100, 40), (400, 200), 0, &rot, 0.001);
    assert!((r0[0] - 200f32).abs() < 1.0e-4);
    assert!((r0[1] - 100f32).abs() < 1.0e-4);
}

#[test]
fn test_all_dark_buffer_is_flat() {
    // zero brightness everywhere means z = 0 before rotation, so the drawn
    // mesh must be identical to one rendered with a zero height scale
    let glyph = GlyphBuffer::from_pixels((10, 6), vec![[0u8; 3]; 60]);
    let rot = crate::rotation::mat3_zxz(0.4, 1.1, 0.1);
    let mut canvas0 = Canvas::new(80, 50, [255, 255, 255]);
    let mut canvas1 = Canvas::new(80, 50, [255, 255, 255]);
    draw(&glyph, &rot, 0.02, &mut canvas0, [0, 228, 0]);
    draw(&glyph, &rot, 0f32, &mut canvas1, [0, 228, 0]);
    assert_eq!(canvas0.data(), canvas1.data());
}

#[test]
fn test_draw_deterministic() {
    use rand::SeedableRng;
    let glyph = checkerboard((12, 7));
    let mut rng0 = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let mut rng1 = rand_chacha::ChaCha8Rng::seed_from_u64(7);
    let p0 = crate::rotation::RenderParams::sample(&mut rng0);
    let p1 = crate::rotation::RenderParams::sample(&mut rng1);
    assert_eq!(p0, p1);
    let mut canvas0 = Canvas::new(120, 60, [255, 255, 255]);
    let mut canvas1 = Canvas::new(120, 60, [255, 255, 255]);
    draw(&glyph, &p0.matrix(), p0.height_scale, &mut canvas0, [0, 0, 0]);
    draw(&glyph, &p1.matrix(), p1.height_scale, &mut canvas1, [0, 0, 0]);
    assert_eq!(canvas0.data(), canvas1.data());
}

#[test]
fn test_draw_marks_canvas() {
    let glyph = checkerboard((8, 8));
    let rot = crate::rotation::mat3_zxz(0.3, 1.0, 0.1);
    let mut canvas = Canvas::new(64, 64, [255, 255, 255]);
    draw(&glyph, &rot, 0.01, &mut canvas, [0, 228, 0]);
    assert!(canvas.data().iter().any(|&p| p == [0, 228, 0]));
}
