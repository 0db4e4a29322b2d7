use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::Error;

/// Output raster. Origin top-left, y grows downward.
pub struct Canvas {
    shape: (usize, usize),
    data: Vec<[u8; 3]>,
}

impl Canvas {
    /// New canvas filled with a solid background color.
    pub fn new(width: usize, height: usize, background: [u8; 3]) -> Self {
        Self {
            shape: (width, height),
            data: vec![background; width * height],
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn data(&self) -> &[[u8; 3]] {
        &self.data
    }

    pub fn fill(&mut self, color: [u8; 3]) {
        self.data.fill(color);
    }

    /// Strokes a straight segment between two projected points (Bresenham).
    /// Pixels outside the canvas are clipped.
    pub fn line(&mut self, p0: [f32; 2], p1: [f32; 2], color: [u8; 3]) {
        let (mut x0, mut y0) = (p0[0] as i64, p0[1] as i64);
        let (x1, y1) = (p1[0] as i64, p1[1] as i64);
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.set(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn set(&mut self, x: i64, y: i64, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.shape.0 as i64 || y >= self.shape.1 as i64 {
            return;
        }
        self.data[y as usize * self.shape.0 + x as usize] = color;
    }

    /// Encodes the canvas as an in-memory PNG.
    pub fn png_bytes(&self) -> Result<Vec<u8>, Error> {
        use ::slice_of_array::SliceFlatExt; // for flat
        let mut buf = Vec::new();
        PngEncoder::new(&mut buf).write_image(
            self.data.flat(),
            self.shape.0 as u32,
            self.shape.1 as u32,
            ExtendedColorType::Rgb8,
        )?;
        Ok(buf)
    }

    /// Encodes the canvas as a PNG file at `path`.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        use ::slice_of_array::SliceFlatExt; // for flat
        let file = BufWriter::new(File::create(path)?);
        PngEncoder::new(file).write_image(
            self.data.flat(),
            self.shape.0 as u32,
            self.shape.1 as u32,
            ExtendedColorType::Rgb8,
        )?;
        Ok(())
    }
}

#[test]
fn test_new_fills_background() {
    let canvas = Canvas::new(4, 3, [255, 255, 255]);
    assert_eq!(canvas.shape(), (4, 3));
    assert!(canvas.data().iter().all(|&p| p == [255, 255, 255]));
}

#[test]
fn test_fill_overwrites() {
    let mut canvas = Canvas::new(3, 3, [0, 0, 0]);
    canvas.fill([9, 9, 9]);
    assert!(canvas.data().iter().all(|&p| p == [9, 9, 9]));
}

#[test]
fn test_line_endpoints_painted() {
    let mut canvas = Canvas::new(8, 8, [0, 0, 0]);
    canvas.line([1f32, 1f32], [6f32, 4f32], [0, 228, 0]);
    assert_eq!(canvas.data()[8 + 1], [0, 228, 0]);
    assert_eq!(canvas.data()[4 * 8 + 6], [0, 228, 0]);
}

#[test]
fn test_line_clips_out_of_bounds() {
    let mut canvas = Canvas::new(4, 4, [0, 0, 0]);
    canvas.line([-10f32, -10f32], [20f32, 2f32], [1, 2, 3]);
    canvas.line([2f32, -50f32], [2f32, 50f32], [1, 2, 3]);
    // nothing to assert beyond absence of panic; interior pixels on the
    // second segment must still be painted
    assert_eq!(canvas.data()[2 * 4 + 2], [1, 2, 3]);
}

#[test]
fn test_png_signature() {
    let canvas = Canvas::new(2, 2, [10, 20, 30]);
    let bytes = canvas.png_bytes().unwrap();
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
}
