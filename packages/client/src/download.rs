//! Storage of received files.

use std::{
    io,
    path::{Path, PathBuf},
};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];
const FALLBACK_FILE_NAME: &str = "received_file";

/// Whether the file name looks like an image (by extension, case-insensitive)
pub fn is_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|image| ext.eq_ignore_ascii_case(image))
        })
        .unwrap_or(false)
}

/// Reduce a sender-supplied name to its final path component.
///
/// Both `/` and `\` count as separators so a name can never escape the
/// download directory.
pub fn sanitize_file_name(file_name: &str) -> String {
    let last = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    match last {
        "" | "." | ".." => FALLBACK_FILE_NAME.to_string(),
        name => name.to_string(),
    }
}

/// Write `data` into `dir` under the sanitized name and return the path.
///
/// An existing file is never overwritten; a numeric suffix is added instead.
pub async fn save_file(dir: &Path, file_name: &str, data: &[u8]) -> io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;

    let file_name = sanitize_file_name(file_name);
    let path = unique_path(dir, &file_name).await?;
    tokio::fs::write(&path, data).await?;

    tracing::debug!("Saved {} bytes to {}", data.len(), path.display());
    Ok(path)
}

async fn unique_path(dir: &Path, file_name: &str) -> io::Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !tokio::fs::try_exists(&candidate).await? {
        return Ok(candidate);
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{}({}){}", stem, counter, extension));
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }
        counter += 1;
    }
}
