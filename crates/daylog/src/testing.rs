//! In-memory console for tests of this crate and its integration suites.

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

use crate::sink::ConsoleWriter;

/// Console stand-in that keeps everything written to it.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }

    /// A console that appends here.
    pub fn console(&self) -> ConsoleWriter {
        let captured = self.clone();
        ConsoleWriter::custom(move || captured.clone())
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
