//! Client-side file saving for the download button.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use directories::UserDirs;
use tokio::io::AsyncWriteExt;

use crate::shared::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

impl DownloadFile {
    pub fn plain_text(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: "text/plain".to_string(),
            contents: contents.into(),
        }
    }
}

#[async_trait]
pub trait FileSaver: Send + Sync {
    /// Returns where the file ended up.
    async fn save(&self, file: DownloadFile) -> AppResult<PathBuf>;
}

/// Writes downloads into a directory, the user's Downloads folder by default.
pub struct DirectorySaver {
    dir: PathBuf,
}

impl DirectorySaver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn downloads() -> AppResult<Self> {
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .map(Self::new)
            .ok_or_else(|| AppError::Io("Unable to determine downloads directory".into()))
    }

    fn target_name(file_name: &str) -> AppResult<&str> {
        // Only the final component is honoured.
        Path::new(file_name)
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::Validation(format!("Invalid file name: {}", file_name)))
    }

    /// `translation_bemba.txt` -> `translation_bemba (2).txt`
    fn numbered(name: &str, copy: u32) -> String {
        let path = Path::new(name);
        match (path.file_stem().and_then(|s| s.to_str()), path.extension().and_then(|e| e.to_str())) {
            (Some(stem), Some(ext)) => format!("{} ({}).{}", stem, copy, ext),
            _ => format!("{} ({})", name, copy),
        }
    }
}

const MAX_NUMBERED_COPIES: u32 = 999;

#[async_trait]
impl FileSaver for DirectorySaver {
    /// Never overwrites: an existing file gets a numbered sibling instead.
    async fn save(&self, file: DownloadFile) -> AppResult<PathBuf> {
        let name = Self::target_name(&file.file_name)?;
        tokio::fs::create_dir_all(&self.dir).await?;

        for copy in 0..=MAX_NUMBERED_COPIES {
            let path = match copy {
                0 => self.dir.join(name),
                n => self.dir.join(Self::numbered(name, n)),
            };
            let mut handle = match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(handle) => handle,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };
            handle.write_all(file.contents.as_bytes()).await?;
            handle.flush().await?;
            log::info!("[Download] Saved {} ({})", path.display(), file.mime_type);
            return Ok(path);
        }

        Err(AppError::Io(format!("Too many copies of {} in {}", name, self.dir.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_saves_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DirectorySaver::new(dir.path().join("downloads"));

        let path = saver
            .save(DownloadFile::plain_text("translation_bemba.txt", "Mwashibukeni"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("downloads").join("translation_bemba.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "Mwashibukeni");
    }

    #[tokio::test]
    async fn test_strips_directory_components() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DirectorySaver::new(dir.path());

        let path = saver
            .save(DownloadFile::plain_text("../../escape.txt", "x"))
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("escape.txt"));
    }

    #[tokio::test]
    async fn test_second_download_gets_numbered_copy() {
        let dir = tempfile::tempdir().unwrap();
        let saver = DirectorySaver::new(dir.path());

        let first = saver
            .save(DownloadFile::plain_text("translation_bemba.txt", "Mwashibukeni"))
            .await
            .unwrap();
        let second = saver
            .save(DownloadFile::plain_text("translation_bemba.txt", "Muli shani"))
            .await
            .unwrap();
        let third = saver
            .save(DownloadFile::plain_text("translation_bemba.txt", "Natotela"))
            .await
            .unwrap();

        assert_eq!(second, dir.path().join("translation_bemba (1).txt"));
        assert_eq!(third, dir.path().join("translation_bemba (2).txt"));
        assert_eq!(std::fs::read_to_string(first).unwrap(), "Mwashibukeni");
        assert_eq!(std::fs::read_to_string(second).unwrap(), "Muli shani");
    }
}
