pub mod filesystem;
pub mod real;

pub use self::{
    filesystem::{FileSystem, FileSystemError},
    real::RealFileSystem,
};

#[cfg(test)]
pub(crate) use self::filesystem::MockFileSystem;
