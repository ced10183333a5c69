//! Keycode relay over a named pipe.
//!
//! The ADB relay daemon owns the read end of the FIFO. Opening with
//! `O_WRONLY | O_NONBLOCK` succeeds only while a reader is attached, so
//! a missing relay shows up as a failed open: the keycode is dropped and
//! the open is retried on the next fire. A failed write means the relay
//! went away; the handle is dropped the same way.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use tracing::debug;

use crate::dispatch::KeycodeSink;

pub const DEFAULT_FIFO_PATH: &str = "/tmp/snes_adb";

pub struct FifoKeycodeSink {
    path: PathBuf,
    writer: Option<File>,
}

impl FifoKeycodeSink {
    /// Build the sink, attempting an initial open. The relay not running
    /// yet is not an error.
    pub fn new(path: PathBuf) -> Self {
        let mut sink = Self { path, writer: None };
        sink.try_open();
        sink
    }

    fn try_open(&mut self) {
        match OpenOptions::new()
            .write(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&self.path)
        {
            Ok(file) => self.writer = Some(file),
            Err(err) => {
                debug!("relay FIFO {} not writable: {err}", self.path.display());
                self.writer = None;
            }
        }
    }
}

impl KeycodeSink for FifoKeycodeSink {
    fn send_keycode(&mut self, code: &str) {
        if self.writer.is_none() {
            self.try_open();
        }
        let Some(writer) = self.writer.as_mut() else {
            return;
        };
        if writeln!(writer, "{code}").is_err() {
            debug!("keycode {code} dropped, relay went away");
            self.writer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::fs;
    use std::io::Read;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    fn fifo_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snespad_test_{name}_{}", std::process::id()))
    }

    fn mkfifo(path: &Path) {
        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        let rc = unsafe { libc::mkfifo(c_path.as_ptr(), 0o600) };
        assert_eq!(rc, 0, "mkfifo failed");
    }

    #[test]
    fn test_keycode_dropped_without_reader() {
        let path = fifo_path("no_reader");
        mkfifo(&path);

        let mut sink = FifoKeycodeSink::new(path.clone());
        sink.send_keycode("KEYCODE_BACK");
        assert!(sink.writer.is_none());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_delivers_lines_once_reader_attached() {
        let path = fifo_path("with_reader");
        mkfifo(&path);

        let mut reader = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&path)
            .unwrap();

        // Reader attached after construction: first send reopens.
        let mut sink = FifoKeycodeSink {
            path: path.clone(),
            writer: None,
        };
        sink.send_keycode("KEYCODE_MENU");
        sink.send_keycode("KEYCODE_BACK");
        assert!(sink.writer.is_some());

        let mut buf = [0u8; 64];
        let n = reader.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"KEYCODE_MENU\nKEYCODE_BACK\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_fifo_is_not_fatal() {
        let mut sink = FifoKeycodeSink::new(fifo_path("missing"));
        assert!(sink.writer.is_none());
        sink.send_keycode("KEYCODE_BACK");
    }
}
