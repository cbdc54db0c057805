use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// Abstraction over the fixed-length backing byte region.
///
/// Methods take `&self`; implementations handle their own interior
/// synchronization. The store owns its volume exclusively and funnels
/// every access through its table lock, so contention here is nil.
pub trait Volume: Send + Sync {
    /// Returns the current length of the region in bytes.
    fn len(&self) -> io::Result<u64>;

    /// Resizes the region. Only called once, when an empty region is
    /// first formatted.
    fn set_len(&self, len: u64) -> io::Result<()>;

    /// Reads exactly `buf.len()` bytes starting at `offset`.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;

    /// Writes all of `buf` starting at `offset`.
    fn write_at(&self, offset: u64, buf: &[u8]) -> io::Result<()>;

    /// Flushes any buffered writes to stable storage.
    fn flush(&self) -> io::Result<()>;
}

/// Production volume backed by a regular file, opened once and shared.
pub struct FileVolume {
    file: Mutex<File>,
}

impl FileVolume {
    /// Opens `path` read-write, creating the file if it does not exist.
    /// A freshly created file has length 0 until the store formats it.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        Ok(FileVolume {
            file: Mutex::new(file),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Volume for FileVolume {
    fn len(&self) -> io::Result<u64> {
        Ok(self.lock().metadata()?.len())
    }

    fn set_len(&self, len: u64) -> io::Result<()> {
        self.lock().set_len(len)
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let mut file = self.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> io::Result<()> {
        let mut file = self.lock();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().sync_all()
    }
}
