//! Warped pseudo-3D text captchas.
//!
//! Renders a string into a small off-screen raster, lifts each pixel into 3D
//! with its brightness as height, rotates the point cloud by a randomized
//! Z-X-Z Euler matrix, projects it back onto the canvas plane and strokes
//! line segments between neighboring grid points, producing a continuous
//! warped mesh.
//!
//! ```no_run
//! # fn main() -> Result<(), captcha3d::Error> {
//! let config = captcha3d::Config::new(400, 200, 25f32, "Arial.ttf");
//! let captcha = captcha3d::Captcha3d::new("x7gT", config)?;
//! captcha.save("captcha.png")?;
//! # Ok(())
//! # }
//! ```

pub mod canvas;
mod error;
pub mod glyph;
pub mod mesh;
pub mod rotation;

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::debug;

pub use canvas::Canvas;
pub use error::Error;
pub use glyph::GlyphBuffer;

/// Content type of the encoded output.
pub const PNG_MIME: &str = "image/png";

/// Render settings, immutable once handed to [`Captcha3d`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Font size in points.
    pub font_size: f32,
    /// Path to a TrueType/OpenType font file.
    pub font_path: PathBuf,
    /// Mesh stroke color.
    pub color: [u8; 3],
    /// Canvas background color.
    pub background: [u8; 3],
}

impl Config {
    /// Green strokes on a white background.
    pub fn new(width: u32, height: u32, font_size: f32, font_path: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            font_size,
            font_path: font_path.into(),
            color: [0, 228, 0],
            background: [255, 255, 255],
        }
    }
}

/// One captcha: holds the text, the validated configuration and the parsed
/// font. Every call to [`render`](Self::render) is an independent pass that
/// owns its glyph buffer, projected grid and canvas for the duration of the
/// call and drops them on return.
#[derive(Debug)]
pub struct Captcha3d {
    text: String,
    config: Config,
    font: fontdue::Font,
}

impl Captcha3d {
    /// Validates the configuration and loads the font. No raster memory is
    /// allocated until a render call.
    pub fn new(text: impl Into<String>, config: Config) -> Result<Self, Error> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::InvalidCanvasSize {
                width: config.width,
                height: config.height,
            });
        }
        if !(config.font_size.is_finite() && config.font_size > 0f32) {
            return Err(Error::InvalidFontSize(config.font_size));
        }
        let bytes = std::fs::read(&config.font_path).map_err(|source| Error::FontUnreadable {
            path: config.font_path.clone(),
            source,
        })?;
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()).map_err(
            |reason| Error::FontParse {
                path: config.font_path.clone(),
                reason,
            },
        )?;
        Ok(Self {
            text: text.into(),
            config,
            font,
        })
    }

    /// One full render pass with a caller-supplied random source. Seeding the
    /// source makes the output byte-for-byte reproducible.
    pub fn render_with<R: Rng>(&self, rng: &mut R) -> Canvas {
        let params = rotation::RenderParams::sample(rng);
        debug!(
            angle1 = f64::from(params.angle1),
            angle2 = f64::from(params.angle2),
            height_scale = f64::from(params.height_scale),
            "sampled render parameters"
        );
        let glyph = GlyphBuffer::rasterize(&self.text, &self.font, self.config.font_size);
        let mut canvas = Canvas::new(
            self.config.width as usize,
            self.config.height as usize,
            self.config.background,
        );
        mesh::draw(
            &glyph,
            &params.matrix(),
            params.height_scale,
            &mut canvas,
            self.config.color,
        );
        canvas
    }

    /// Render with thread-local randomness.
    pub fn render(&self) -> Canvas {
        self.render_with(&mut rand::rng())
    }

    /// Render and encode to an in-memory PNG, for serving on a byte stream
    /// with [`PNG_MIME`] as the content type.
    pub fn png_bytes(&self) -> Result<Vec<u8>, Error> {
        self.render().png_bytes()
    }

    /// Render and write a PNG file at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        self.render().write_png(path)
    }
}

#[test]
fn test_zero_dimensions_rejected() {
    let err = Captcha3d::new("ab", Config::new(0, 200, 25f32, "nope.ttf")).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidCanvasSize {
            width: 0,
            height: 200
        }
    ));
    let err = Captcha3d::new("ab", Config::new(400, 0, 25f32, "nope.ttf")).unwrap_err();
    assert!(matches!(err, Error::InvalidCanvasSize { .. }));
}

#[test]
fn test_bad_font_size_rejected() {
    for bad in [0f32, -3f32, f32::NAN, f32::INFINITY] {
        let err = Captcha3d::new("ab", Config::new(400, 200, bad, "nope.ttf")).unwrap_err();
        assert!(matches!(err, Error::InvalidFontSize(_)));
    }
}

#[test]
fn test_construction_result_is_debug() {
    // unwrap_err and assertion output both need Debug on the Ok type
    let res = Captcha3d::new("ab", Config::new(400, 200, 25f32, "missing.ttf"));
    assert!(format!("{res:?}").contains("FontUnreadable"));
}

#[test]
fn test_unreadable_font_rejected() {
    let err = Captcha3d::new(
        "ab",
        Config::new(400, 200, 25f32, "definitely/not/a/font.ttf"),
    )
    .unwrap_err();
    assert!(matches!(err, Error::FontUnreadable { .. }));
}
