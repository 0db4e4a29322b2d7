use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvasSize { width: u32, height: u32 },
    #[error("font size must be a positive number, got {0}")]
    InvalidFontSize(f32),
    #[error("font file {path:?} is not readable: {source}")]
    FontUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font file {path:?} could not be parsed: {reason}")]
    FontParse { path: PathBuf, reason: &'static str },
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
