//! PNG image export

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::raster::RasterBuffer;

/// Export a raster image to an RGBA8 PNG file
pub fn export_png<P: AsRef<Path>>(image: &RasterBuffer, path: P) -> Result<(), String> {
    let file =
        File::create(path.as_ref()).map_err(|e| format!("Failed to create PNG file: {}", e))?;
    let writer = BufWriter::new(file);

    let mut encoder = png::Encoder::new(writer, image.width, image.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| format!("Failed to write PNG header: {}", e))?;
    writer
        .write_image_data(&image.data)
        .map_err(|e| format!("Failed to write PNG image: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");

        let image = RasterBuffer::new(2, 1, vec![10, 20, 30, 255, 40, 50, 60, 128]).unwrap();
        export_png(&image, &path).unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_export_to_invalid_path_fails() {
        let image = RasterBuffer::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        let err = export_png(&image, "/nonexistent/dir/out.png").unwrap_err();
        assert!(err.contains("Failed to create"));
    }
}
