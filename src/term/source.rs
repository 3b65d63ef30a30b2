//! Byte sources for key decoding
//!
//! Key decoding needs two kinds of read: a blocking read for the first byte
//! of a key, and a read with a deadline for the bytes that may follow an
//! escape. [`StdinSource`] does both on fd 0 without any user-space
//! buffering, so `poll(2)` always sees bytes that have not been consumed
//! yet.

use std::io::Cursor;
use std::os::fd::BorrowedFd;
use std::time::Duration;

use nix::errno::Errno;
use nix::libc::STDIN_FILENO;
use nix::poll::{poll, PollFd, PollFlags};
use nix::unistd::read;

use super::{TermError, TermResult};

/// Something keys can be read from, one byte at a time
pub trait ByteSource {
    /// Block until a byte is available
    ///
    /// Returns `None` at end of input.
    fn read_byte(&mut self) -> TermResult<Option<u8>>;

    /// Wait at most `timeout` for a byte
    ///
    /// Returns `None` if nothing arrived in time or the input has ended.
    fn poll_byte(&mut self, timeout: Duration) -> TermResult<Option<u8>>;
}

/// Unbuffered reader over the process' standard input
#[derive(Debug, Default)]
pub struct StdinSource {
    _private: (),
}

impl StdinSource {
    /// Create a new stdin source
    pub fn new() -> Self {
        Self::default()
    }

    fn poll_readable(&self, timeout: Duration) -> TermResult<bool> {
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        // SAFETY: fd 0 stays open for the lifetime of the process
        let borrowed_fd = unsafe { BorrowedFd::borrow_raw(STDIN_FILENO) };
        let mut fds = [PollFd::new(&borrowed_fd, PollFlags::POLLIN)];
        loop {
            match poll(&mut fds, timeout_ms) {
                Ok(n) => {
                    return Ok(n > 0
                        && fds[0].revents().is_some_and(|r| {
                            r.intersects(PollFlags::POLLIN | PollFlags::POLLHUP)
                        }))
                },
                Err(Errno::EINTR) => continue,
                Err(e) => return Err(TermError::Poll(e)),
            }
        }
    }
}

impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> TermResult<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match read(STDIN_FILENO, &mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(Errno::EINTR) | Err(Errno::EAGAIN) => continue,
                Err(e) => return Err(TermError::Read(e)),
            }
        }
    }

    fn poll_byte(&mut self, timeout: Duration) -> TermResult<Option<u8>> {
        if self.poll_readable(timeout)? {
            self.read_byte()
        } else {
            Ok(None)
        }
    }
}

/// Scripted input: every byte is available immediately
impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
    fn read_byte(&mut self) -> TermResult<Option<u8>> {
        let pos = usize::try_from(self.position()).unwrap_or(usize::MAX);
        let byte = self.get_ref().as_ref().get(pos).copied();
        if byte.is_some() {
            self.set_position(self.position() + 1);
        }
        Ok(byte)
    }

    fn poll_byte(&mut self, _timeout: Duration) -> TermResult<Option<u8>> {
        self.read_byte()
    }
}
