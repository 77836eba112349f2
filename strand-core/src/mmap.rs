//! Memory-mapped file access for zero-copy container reads.
//!
//! Only available with the `std` feature. A [`MappedFile`] can stand in for a
//! buffered file wherever a `Read + Seek` source is expected, via
//! [`MappedFile::into_cursor`].

use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::{Result, StrandError};

/// A read-only memory-mapped file.
#[derive(Debug)]
pub struct MappedFile {
    _file: File,
    mmap: Mmap,
    path: PathBuf,
}

impl MappedFile {
    /// Open and memory-map a file.
    ///
    /// # Safety
    ///
    /// The caller must ensure that the file is not modified by another process
    /// while the mapping is active. Genome containers are written once and read
    /// many times, which is the case this is meant for.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            StrandError::Io(std::io::Error::new(
                e.kind(),
                format!("{}: {}", path.display(), e),
            ))
        })?;
        // SAFETY: We hold the File open for the lifetime of the mapping.
        // The caller is responsible for ensuring no concurrent modification.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self {
            _file: file,
            mmap,
            path: path.to_path_buf(),
        })
    }

    /// The mapped bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    /// Path the mapping was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    /// Whether the mapped region is empty.
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Wrap the mapping in a seekable reader positioned at offset 0.
    pub fn into_cursor(self) -> Cursor<MappedFile> {
        Cursor::new(self)
    }
}

impl AsRef<[u8]> for MappedFile {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
