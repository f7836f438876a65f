//! Raster buffer type shared by the decoders, the pipeline, and the exporters.

/// Decoded raster image: interleaved RGBA8 bytes, row-major, top-to-bottom.
///
/// Invariant: `data.len() == 4 * width * height`. The alpha channel is
/// never modified by any processing stage; it is copied through to the
/// output verbatim.
#[derive(Debug, Clone)]
pub struct RasterBuffer {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGBA8 data
    pub data: Vec<u8>,
}

impl RasterBuffer {
    /// Create a buffer, validating the RGBA8 length invariant.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        let expected = 4 * width as usize * height as usize;
        if data.len() != expected {
            return Err(format!(
                "Raster buffer size mismatch: expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                data.len()
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Number of pixels in the image.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
