use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

/// Shape of the off-screen text raster in pixels.
pub const GLYPH_SHAPE: (usize, usize) = (100, 40);

/// Small RGB raster holding the rasterized text.
///
/// Text is drawn white on black, so the channel sum of a pixel tracks glyph
/// coverage. That sum is the pseudo-height signal of the mesh: bright text
/// pixels bulge toward the viewer, empty pixels stay flat.
pub struct GlyphBuffer {
    shape: (usize, usize),
    data: Vec<[u8; 3]>,
}

impl GlyphBuffer {
    /// Rasterizes `text` into the fixed 100x40 buffer. Glyphs falling outside
    /// the buffer are clipped.
    pub fn rasterize(text: &str, font: &fontdue::Font, px: f32) -> Self {
        let (gw, gh) = GLYPH_SHAPE;
        let mut data = vec![[0u8; 3]; gw * gh];
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings {
            x: 10f32,
            y: 4f32,
            ..LayoutSettings::default()
        });
        layout.append(std::slice::from_ref(font), &TextStyle::new(text, px, 0));
        for glyph in layout.glyphs() {
            let (metrics, coverage) = font.rasterize_config(glyph.key);
            for (dy, dx) in itertools::iproduct!(0..metrics.height, 0..metrics.width) {
                let c = coverage[dy * metrics.width + dx];
                if c == 0 {
                    continue;
                }
                let x = glyph.x as i32 + dx as i32;
                let y = glyph.y as i32 + dy as i32;
                if x < 0 || y < 0 || x >= gw as i32 || y >= gh as i32 {
                    continue;
                }
                let pix = &mut data[y as usize * gw + x as usize];
                // max keeps overlapping glyph boxes from punching holes
                pix[0] = pix[0].max(c);
                pix[1] = pix[1].max(c);
                pix[2] = pix[2].max(c);
            }
        }
        Self {
            shape: GLYPH_SHAPE,
            data,
        }
    }

    /// Wraps an existing pixel buffer, row-major, `shape.0 * shape.1` pixels.
    pub fn from_pixels(shape: (usize, usize), data: Vec<[u8; 3]>) -> Self {
        assert_eq!(data.len(), shape.0 * shape.1);
        Self { shape, data }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Channel sum of the pixel at (x, y), in `0..=765`.
    pub fn brightness_at(&self, x: usize, y: usize) -> u32 {
        let [r, g, b] = self.data[y * self.shape.0 + x];
        r as u32 + g as u32 + b as u32
    }
}

#[test]
fn test_brightness_range() {
    let buf = GlyphBuffer::from_pixels(
        (2, 2),
        vec![[0, 0, 0], [255, 255, 255], [10, 20, 30], [255, 0, 255]],
    );
    assert_eq!(buf.brightness_at(0, 0), 0);
    assert_eq!(buf.brightness_at(1, 0), 765);
    assert_eq!(buf.brightness_at(0, 1), 60);
    assert_eq!(buf.brightness_at(1, 1), 510);
    for y in 0..2 {
        for x in 0..2 {
            assert!(buf.brightness_at(x, y) <= 765);
        }
    }
}
