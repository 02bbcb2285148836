use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::error::OutFileError;

/// Destination for the generated page.
#[derive(Clone, Debug)]
pub struct OutFile {
    path: PathBuf,
    overwrite: bool,
}

impl OutFile {
    pub fn new<P: Into<PathBuf>>(path: P, overwrite: bool) -> Self {
        Self {
            path: path.into(),
            overwrite,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail early if writing would replace a file without permission, or if
    /// the path names a directory.
    pub async fn check(&self) -> Result<(), OutFileError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(metadata) if metadata.is_dir() => Err(OutFileError::IsDirectory(self.path.clone())),
            Ok(_) if !self.overwrite => Err(OutFileError::AlreadyExists(self.path.clone())),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(OutFileError::InspectError(self.path.clone(), e)),
        }
    }

    /// Write `contents`, creating the file. Without overwrite the file must not
    /// exist when it is opened.
    pub async fn write(&self, contents: &[u8]) -> Result<(), OutFileError> {
        let mut options = OpenOptions::new();
        options.write(true);
        if self.overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }
        let mut file = options.open(&self.path).await.map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => OutFileError::AlreadyExists(self.path.clone()),
            _ => OutFileError::WriteError(self.path.clone(), e),
        })?;
        file.write_all(contents)
            .await
            .map_err(|e| OutFileError::WriteError(self.path.clone(), e))?;
        file.flush()
            .await
            .map_err(|e| OutFileError::WriteError(self.path.clone(), e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[tokio::test]
    async fn check_missing_file() {
        let dir = tempdir().unwrap();
        let outfile = OutFile::new(dir.path().join("map.html"), false);

        assert!(outfile.check().await.is_ok());
    }

    #[tokio::test]
    async fn check_existing_file_without_overwrite() {
        let existing = NamedTempFile::new().unwrap();
        let outfile = OutFile::new(existing.path(), false);

        let result = outfile.check().await;

        assert!(matches!(result, Err(OutFileError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn check_existing_file_with_overwrite() {
        let existing = NamedTempFile::new().unwrap();
        let outfile = OutFile::new(existing.path(), true);

        assert!(outfile.check().await.is_ok());
    }

    #[tokio::test]
    async fn check_directory() {
        let dir = tempdir().unwrap();

        for overwrite in [false, true] {
            let result = OutFile::new(dir.path(), overwrite).check().await;
            assert!(matches!(result, Err(OutFileError::IsDirectory(_))));
        }
    }

    #[tokio::test]
    async fn write_new_file() {
        // Arrange
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.html");
        let outfile = OutFile::new(&path, false);

        // Act
        let result = outfile.write(b"<!DOCTYPE html>").await;

        // Assert
        assert!(result.is_ok(), "Failed to write: {:?}", result.unwrap_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<!DOCTYPE html>");
    }

    #[tokio::test]
    async fn write_refuses_existing_file() {
        // Arrange
        let mut existing = NamedTempFile::new().unwrap();
        write!(existing, "keep me").unwrap();
        let outfile = OutFile::new(existing.path(), false);

        // Act
        let result = outfile.write(b"replaced").await;

        // Assert
        assert!(matches!(result, Err(OutFileError::AlreadyExists(_))));
        assert_eq!(std::fs::read_to_string(existing.path()).unwrap(), "keep me");
    }

    #[tokio::test]
    async fn write_overwrites_and_truncates() {
        // Arrange
        let mut existing = NamedTempFile::new().unwrap();
        write!(existing, "a much longer previous page").unwrap();
        let outfile = OutFile::new(existing.path(), true);

        // Act
        let result = outfile.write(b"short").await;

        // Assert
        assert!(result.is_ok(), "Failed to write: {:?}", result.unwrap_err());
        assert_eq!(std::fs::read_to_string(existing.path()).unwrap(), "short");
    }
}
