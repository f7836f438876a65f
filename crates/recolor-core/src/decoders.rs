//! PNG image decoding
//!
//! Decodes a PNG file into the RGBA8 raster buffer the pipeline
//! consumes. Grayscale and RGB variants are expanded to RGBA; alpha is
//! preserved where the source carries it and set to 255 otherwise.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::raster::RasterBuffer;

/// Decode a PNG file into an RGBA8 raster
pub fn decode_png<P: AsRef<Path>>(path: P) -> Result<RasterBuffer, String> {
    let file = File::open(path.as_ref()).map_err(|e| format!("Failed to open PNG file: {}", e))?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let mut reader = decoder
        .read_info()
        .map_err(|e| format!("Failed to read PNG info: {}", e))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| "Failed to determine PNG buffer size".to_string())?;
    let mut buf = vec![0u8; buffer_size];
    let frame_info = reader
        .next_frame(&mut buf)
        .map_err(|e| format!("Failed to read PNG frame: {}", e))?;

    let bytes = &buf[..frame_info.buffer_size()];
    let px = width as usize * height as usize;

    let data = match (color_type, bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            expect_len(bytes, px, "grayscale")?;
            bytes.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::Grayscale, png::BitDepth::Sixteen) => {
            expect_len(bytes, px * 2, "grayscale16")?;
            bytes
                .chunks_exact(2)
                .flat_map(|c| {
                    let g = be16_to_u8(c);
                    [g, g, g, 255]
                })
                .collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => {
            expect_len(bytes, px * 2, "grayscale+alpha")?;
            bytes
                .chunks_exact(2)
                .flat_map(|c| [c[0], c[0], c[0], c[1]])
                .collect()
        }
        (png::ColorType::Rgb, png::BitDepth::Eight) => {
            expect_len(bytes, px * 3, "rgb")?;
            bytes
                .chunks_exact(3)
                .flat_map(|c| [c[0], c[1], c[2], 255])
                .collect()
        }
        (png::ColorType::Rgb, png::BitDepth::Sixteen) => {
            expect_len(bytes, px * 6, "rgb16")?;
            bytes
                .chunks_exact(6)
                .flat_map(|c| {
                    [
                        be16_to_u8(&c[0..2]),
                        be16_to_u8(&c[2..4]),
                        be16_to_u8(&c[4..6]),
                        255,
                    ]
                })
                .collect()
        }
        (png::ColorType::Rgba, png::BitDepth::Eight) => {
            expect_len(bytes, px * 4, "rgba")?;
            bytes.to_vec()
        }
        (png::ColorType::Rgba, png::BitDepth::Sixteen) => {
            expect_len(bytes, px * 8, "rgba16")?;
            bytes
                .chunks_exact(8)
                .flat_map(|c| {
                    [
                        be16_to_u8(&c[0..2]),
                        be16_to_u8(&c[2..4]),
                        be16_to_u8(&c[4..6]),
                        be16_to_u8(&c[6..8]),
                    ]
                })
                .collect()
        }
        (png::ColorType::Indexed, _) => {
            return Err("Indexed PNG not supported".to_string());
        }
        _ => {
            return Err(format!(
                "Unsupported PNG format: {:?} with bit depth {:?}",
                color_type, bit_depth
            ));
        }
    };

    RasterBuffer::new(width, height, data)
}

/// Reduce a big-endian 16-bit sample to 8 bits.
fn be16_to_u8(chunk: &[u8]) -> u8 {
    let v = u16::from_be_bytes([chunk[0], chunk[1]]);
    (v >> 8) as u8
}

fn expect_len(bytes: &[u8], expected: usize, kind: &str) -> Result<(), String> {
    if bytes.len() != expected {
        return Err(format!(
            "PNG buffer size mismatch for {}: expected {}, got {}",
            kind,
            expected,
            bytes.len()
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporters::export_png;

    #[test]
    fn test_decode_missing_file_fails() {
        let err = decode_png("/nonexistent/image.png").unwrap_err();
        assert!(err.contains("Failed to open"));
    }

    #[test]
    fn test_rgba8_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rt.png");

        let data = vec![
            255, 0, 0, 255, 0, 255, 0, 128, 0, 0, 255, 0, 120, 130, 140, 255,
        ];
        let image = RasterBuffer::new(2, 2, data).unwrap();
        export_png(&image, &path).unwrap();

        let decoded = decode_png(&path).unwrap();
        assert_eq!(decoded.width, 2);
        assert_eq!(decoded.height, 2);
        assert_eq!(decoded.data, image.data);
    }
}
