//! File system abstraction layer
//!
//! Configuration loading and the YAML overlay registry only touch the disk through
//! this port, so both can be tested against [`MockFileSystem`].

use std::{
    io,
    path::{Path, PathBuf},
    sync::Arc,
};

use thiserror::Error;

/// Port for file system operations
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem: Send + Sync {
    /// Read a file and return its contents as a string
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the file does not exist, cannot be read, or is
    /// not valid UTF-8.
    fn read_file(&self, path: &Path) -> Result<String, FileSystemError>;

    /// Write data to a file, creating missing parent directories
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError`] if the parent directory cannot be created or the
    /// file cannot be written.
    fn write_file(&self, path: &Path, data: &[u8]) -> Result<(), FileSystemError>;

    /// Check if a path exists
    fn path_exists(&self, path: &Path) -> bool;

    /// Expand a leading `~` to the user's home directory
    ///
    /// The path does not need to exist.
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if the home directory is needed but
    /// cannot be determined.
    fn expand_path(&self, path: &Path) -> Result<PathBuf, FileSystemError>;

    /// Get the directory holding `config.yaml`
    ///
    /// # Errors
    ///
    /// Returns [`FileSystemError::HomeDirNotFound`] if no platform configuration
    /// directory can be determined.
    fn config_dir(&self) -> Result<PathBuf, FileSystemError>;
}

/// Errors that can occur during file system operations
#[derive(Error, Debug, Clone)]
pub enum FileSystemError {
    /// General IO error occurred during file system operation
    #[error("IO error: {0}")]
    IoError(Arc<io::Error>),

    /// Home directory could not be determined (needed for path expansion)
    #[error("Home directory not found")]
    HomeDirNotFound,
}

impl From<io::Error> for FileSystemError {
    fn from(error: io::Error) -> Self {
        Self::IoError(Arc::new(error))
    }
}

#[cfg(test)]
impl MockFileSystem {
    /// Return `content` whenever `path` is read
    pub(crate) fn mock_read_file<P, S>(&mut self, path: P, content: S)
    where
        PathBuf: From<P>,
        S: ToString,
    {
        let path_buf = PathBuf::from(path);
        let content_string = content.to_string();
        self.expect_read_file()
            .with(mockall::predicate::eq(path_buf))
            .returning(move |_| Ok(content_string.clone()));
    }

    pub(crate) fn mock_path_exists<P>(&mut self, path: P, exists: bool)
    where
        PathBuf: From<P>,
    {
        let path_buf = PathBuf::from(path);
        self.expect_path_exists()
            .with(mockall::predicate::eq(path_buf))
            .return_const(exists);
    }

    pub(crate) fn mock_config_dir_ok<P>(&mut self, path: P)
    where
        PathBuf: From<P>,
    {
        let path_buf = PathBuf::from(path);
        self.expect_config_dir()
            .returning(move || Ok(path_buf.clone()));
    }

    /// Set up a mock for path expansion
    pub(crate) fn mock_expand_path<P>(&mut self, input: P, output: P)
    where
        PathBuf: From<P>,
    {
        let input = PathBuf::from(input);
        let output = PathBuf::from(output);

        self.expect_expand_path()
            .with(mockall::predicate::eq(input))
            .return_once(|_| Ok(output));
    }

    /// Accept any write to `path`
    pub(crate) fn mock_write_file<P>(&mut self, path: P)
    where
        PathBuf: From<P>,
    {
        let path_buf = PathBuf::from(path);
        self.expect_write_file()
            .with(
                mockall::predicate::eq(path_buf),
                mockall::predicate::always(),
            )
            .returning(|_, _| Ok(()));
    }
}
