//! Output writer that can finish a dangling line

use std::io::{self, Write};

/// Writer remembering whether its output currently ends mid-line
///
/// Child output is relayed through it so that a command printing
/// `foo` without a trailing newline does not leave the next prompt
/// glued to the end of `foo`.
#[derive(Debug)]
pub struct NewlineEnsuringWriter<W: Write> {
    inner: W,
    /// Last byte written since the previous `ensure_newline`
    last_byte: Option<u8>,
}

impl<W: Write> NewlineEnsuringWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            last_byte: None,
        }
    }

    /// Terminate the current line if output stopped in the middle of one
    ///
    /// Writes nothing when nothing was written since the last call, or
    /// when the output already ends in a newline.
    pub fn ensure_newline(&mut self) -> io::Result<()> {
        if let Some(byte) = self.last_byte.take()
            && byte != b'\n'
        {
            self.inner.write_all(b"\n")?;
            self.inner.flush()?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }
}

impl<W: Write> Write for NewlineEnsuringWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        if written > 0 {
            self.last_byte = Some(buf[written - 1]);
        }
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
