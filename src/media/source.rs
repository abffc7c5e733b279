/// Loading picked or dropped files into memory
use std::path::{Path, PathBuf};

use image::ImageFormat;

use crate::state::data::StagedFile;

const UNKNOWN_MIME: &str = "application/octet-stream";

/// Read a file and wrap it for staging
pub async fn load_staged_file(path: PathBuf) -> Result<StagedFile, String> {
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let mime = detect_mime(&path, &bytes);

    log::info!("📂 Loaded {} ({}, {} bytes)", filename, mime, bytes.len());

    Ok(StagedFile { filename, mime, bytes })
}

/// Guess the MIME type from the extension, then from the file signature
pub fn detect_mime(path: &Path, bytes: &[u8]) -> String {
    ImageFormat::from_path(path)
        .or_else(|_| image::guess_format(bytes))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_from_extension() {
        assert_eq!(detect_mime(Path::new("IMG_0042.JPG"), &[]), "image/jpeg");
        assert_eq!(detect_mime(Path::new("map.png"), &[]), "image/png");
    }

    #[test]
    fn test_mime_from_signature() {
        let png_signature = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_mime(Path::new("download"), &png_signature), "image/png");
    }

    #[test]
    fn test_non_image_is_octet_stream() {
        assert_eq!(detect_mime(Path::new("doc.pdf"), b"%PDF-1.7"), UNKNOWN_MIME);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let result = load_staged_file(PathBuf::from("/nonexistent/photo.jpg")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_load_reads_bytes_and_name() {
        let path = std::env::temp_dir().join(format!("geogallery-test-{}.gif", std::process::id()));
        tokio::fs::write(&path, b"GIF89a").await.unwrap();

        let file = load_staged_file(path.clone()).await.unwrap();
        let _ = tokio::fs::remove_file(&path).await;

        assert_eq!(file.mime, "image/gif");
        assert_eq!(file.bytes, b"GIF89a");
        assert!(file.filename.ends_with(".gif"));
    }
}
