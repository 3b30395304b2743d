use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use image::{ImageFormat, RgbImage};

use crate::error::{ExtractError, Result};

/// Optical character recognition over a decoded RGB image.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &RgbImage) -> Result<String>;
}

/// Decodes PNG/JPEG/GIF/BMP bytes into 8-bit RGB, the channel order OCR expects.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage> {
    let image = image::load_from_memory(bytes)?;
    Ok(image.to_rgb8())
}

/// OCR through the `tesseract` command line tool.
///
/// The image is piped in as PNG on stdin and the recognized text is read back
/// from stdout, so no temporary files are involved.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    binary: PathBuf,
    language: String,
}

impl TesseractOcr {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &RgbImage) -> Result<String> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut child = Command::new(&self.binary)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ExtractError::Ocr(format!("failed to start {}: {}", self.binary.display(), e))
            })?;

        // The pipe is closed when `stdin` drops, before waiting on the child.
        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&png),
            None => Ok(()),
        };

        // Always reap the child, even when it stopped reading early.
        let output = child
            .wait_with_output()
            .map_err(|e| ExtractError::Ocr(format!("failed to read output: {}", e)))?;
        let stderr = String::from_utf8_lossy(&output.stderr);

        if let Err(e) = sent {
            return Err(ExtractError::Ocr(format!(
                "failed to send image to {} ({}): {}",
                self.binary.display(),
                e,
                stderr.trim()
            )));
        }

        if !output.status.success() {
            return Err(ExtractError::Ocr(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let decoded = decode_image(&png_bytes(3, 2)).unwrap();
        assert_eq!(decoded.dimensions(), (3, 2));
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_image(b"\x00\x01not an image").unwrap_err();
        assert!(matches!(err, ExtractError::Image(_)));
    }

    #[test]
    fn test_missing_binary_is_ocr_error() {
        let ocr = TesseractOcr::new().with_binary("/nonexistent/tesseract-binary");
        let image = RgbImage::new(1, 1);

        let err = ocr.recognize(&image).unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
        assert!(err.to_string().starts_with("Error extracting image text: "));
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_stderr() {
        // `sh stdin ...` exits at once complaining about a missing script file,
        // without reading the (large, incompressible) image from its stdin.
        let mut seed: u32 = 0x2545_f491;
        let noisy = RgbImage::from_fn(512, 512, |_, _| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let [r, g, b, _] = seed.to_le_bytes();
            Rgb([r, g, b])
        });

        let ocr = TesseractOcr::new().with_binary("sh");
        let err = ocr.recognize(&noisy).unwrap_err();

        assert!(matches!(err, ExtractError::Ocr(_)));
        assert!(err.to_string().contains("No such file"), "got: {err}");
    }
}
