use std::fmt;

/// Failure creating or exporting a raster surface.
#[derive(Debug)]
pub enum RasterError {
    /// Width or height is zero or above [`MAX_DIMENSION`](super::MAX_DIMENSION).
    InvalidSize { width: u32, height: u32 },
    /// PNG encoding or the write to disk failed.
    Encode(image::ImageError),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::InvalidSize { width, height } => {
                write!(f, "invalid surface size {}x{}", width, height)
            }
            RasterError::Encode(err) => write!(f, "png encoding failed: {}", err),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RasterError::InvalidSize { .. } => None,
            RasterError::Encode(err) => Some(err),
        }
    }
}

impl From<image::ImageError> for RasterError {
    fn from(err: image::ImageError) -> Self {
        RasterError::Encode(err)
    }
}
