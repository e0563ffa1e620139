use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::AppResult;

/// Image extensions accepted for upload (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// URL prefix under which stored uploads are served
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Extension of `filename` when it is one of the allowed image types
pub fn allowed_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Reduces a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators and whitespace become `_`, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading dots or underscores are stripped
/// so the result can never escape the upload directory or be hidden.
pub fn sanitize_filename(filename: &str) -> String {
    let replaced: String = filename
        .chars()
        .map(|c| match c {
            '/' | '\\' => ' ',
            other => other,
        })
        .collect();

    let joined = replaced.split_whitespace().collect::<Vec<_>>().join("_");

    let filtered: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(*c, '.' | '_' | '-'))
        .collect();

    filtered.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Local directory holding uploaded images
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Opens the store, creating the directory if it does not exist yet
    pub fn open(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name the upload will be stored under.
    ///
    /// Falls back to a random stem when sanitizing leaves nothing but the
    /// extension (e.g. a name written entirely in non-ASCII characters).
    pub fn storage_name(client_name: &str, extension: &str) -> String {
        let sanitized = sanitize_filename(client_name);
        match sanitized.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && ext.eq_ignore_ascii_case(extension) => {
                sanitized
            }
            _ => format!("{}.{}", Uuid::new_v4().simple(), extension),
        }
    }

    /// Writes `bytes` under `name`, replacing any earlier upload with that name.
    /// Returns the public URL of the stored file.
    pub async fn save(&self, name: &str, bytes: &[u8]) -> AppResult<String> {
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;

        tracing::debug!(path = %path.display(), size = bytes.len(), "Stored upload");

        Ok(format!("{}/{}", UPLOADS_ROUTE, name))
    }
}
