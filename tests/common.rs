//! Common utilities for tests

use std::io;
use std::sync::{Arc, Mutex};

use chainfs::Volume;

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

/// In-memory volume. Clones share the same buffer, so dropping a store
/// and opening a second one over a clone behaves like reopening a disk.
#[derive(Clone, Debug)]
pub struct RamVolume {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl RamVolume {
    /// Starts empty (length 0); the store sizes it on first open.
    pub fn new() -> Self {
        RamVolume {
            inner: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Raw copy of the whole region, for inspecting on-disk state.
    pub fn image(&self) -> Vec<u8> {
        self.inner.lock().unwrap().clone()
    }
}

impl Volume for RamVolume {
    fn len(&self) -> io::Result<u64> {
        Ok(self.inner.lock().unwrap().len() as u64)
    }

    fn set_len(&self, len: u64) -> io::Result<()> {
        self.inner.lock().unwrap().resize(len as usize, 0);
        Ok(())
    }

    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let data = self.inner.lock().unwrap();
        let start = offset as usize;
        let end = start + buf.len();
        if end > data.len() {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "read past end"));
        }
        buf.copy_from_slice(&data[start..end]);
        Ok(())
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> io::Result<()> {
        let mut data = self.inner.lock().unwrap();
        let start = offset as usize;
        let end = start + buf.len();
        if end > data.len() {
            return Err(io::Error::new(io::ErrorKind::WriteZero, "write past end"));
        }
        data[start..end].copy_from_slice(buf);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        // In a RAM volume, flushing is a no-op since data is already in memory.
        Ok(())
    }
}
