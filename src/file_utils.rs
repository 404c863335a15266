use std::path::Path;
use log::debug;

use crate::errors::DocumentError;

// @module: Caption file access

/// Extensions of text caption documents the parser understands
const CAPTION_EXTENSIONS: &[&str] = &["vtt", "webvtt", "srt"];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Caption extension, case-insensitive
    pub fn is_caption_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| CAPTION_EXTENSIONS.contains(&ext.as_str()))
    }

    /// Read a caption document. Invalid UTF-8 is replaced rather than
    /// rejected and a leading byte order mark is removed.
    pub async fn read_document<P: AsRef<Path>>(path: P) -> Result<String, DocumentError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(DocumentError::NotFound(path.display().to_string()));
        }

        let bytes = tokio::fs::read(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(Self::decode_document(&bytes))
    }

    /// Decode raw document bytes into text
    pub fn decode_document(bytes: &[u8]) -> String {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8_lossy(bytes).into_owned()
    }
}
