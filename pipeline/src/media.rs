//! Media file loading and MIME detection.

use std::path::{Path, PathBuf};

use siniestro_extraction::ContentBlock;

use crate::errors::PipelineError;

/// Extensions accepted for the visual analysis input.
pub const VISUAL_EXTENSIONS: &[&str] = &["pdf"];
/// Extensions accepted for the claim-sheet input.
pub const CLAIM_SHEET_EXTENSIONS: &[&str] = &["png"];
/// Extensions accepted for the audio input.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];

/// Guesses the MIME type of a file from its path.
///
/// Falls back to a fixed extension table for types the guesser misses, and to
/// `application/octet-stream` as a last resort.
#[must_use]
pub fn guess_mime(path: &Path) -> String {
    if let Some(mime) = mime_guess::from_path(path).first_raw() {
        return mime.to_string();
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Reads a file into a media content block with its guessed MIME type.
pub fn media_block_from_file(path: &Path) -> Result<ContentBlock, PipelineError> {
    let data = std::fs::read(path).map_err(|source| PipelineError::MediaRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ContentBlock::media(data, guess_mime(path)))
}

/// Lists files in a directory whose extension matches the given set, sorted
/// by name. A missing directory yields an empty list.
#[must_use]
pub fn find_by_extension(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(str::to_lowercase)
                .is_some_and(|ext| extensions.contains(&ext.as_str()))
        })
        .collect();
    paths.sort();
    paths
}
