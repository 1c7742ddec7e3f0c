//! Scoped silencing of the process standard output stream.
//!
//! Redirecting file descriptor 1 mutates process-wide state, so every
//! [`QuietStdout`] holds the process stdout lock for its whole lifetime.
//! Other threads block on `print!` until the descriptor is restored; the
//! owning thread may nest guards, which restore in reverse order.

use std::io::{self, StdoutLock, Write};

use tracing::debug;

/// RAII guard: stdout points at the null device until the guard drops.
pub struct QuietStdout {
    #[cfg(unix)]
    saved_fd: libc::c_int,
    // Released after `Drop::drop` restored fd 1.
    stdout: StdoutLock<'static>,
}

impl QuietStdout {
    pub fn engage() -> io::Result<Self> {
        let mut stdout = io::stdout().lock();
        stdout.flush()?;

        Ok(Self {
            #[cfg(unix)]
            saved_fd: unix::redirect_to_null()?,
            stdout,
        })
    }
}

impl Drop for QuietStdout {
    fn drop(&mut self) {
        // Buffered bytes written while quiet belong to the null device.
        let _ = self.stdout.flush();

        #[cfg(unix)]
        unix::restore(self.saved_fd);
    }
}

/// Runs `f` with stdout silenced when `enabled`; falls back to plain execution
/// if the stream cannot be redirected.
pub fn quietly<T>(enabled: bool, f: impl FnOnce() -> T) -> T {
    if !enabled {
        return f();
    }

    match QuietStdout::engage() {
        Ok(_guard) => f(),
        Err(err) => {
            debug!(error = %err, "stdout suppression unavailable, continuing without it");
            f()
        }
    }
}

#[cfg(unix)]
mod unix {
    use std::io;

    pub(super) fn redirect_to_null() -> io::Result<libc::c_int> {
        // SAFETY: `dup` only reads the descriptor table; fd 1 need not be open.
        let saved = unsafe { libc::dup(libc::STDOUT_FILENO) };
        if saved < 0 {
            return Err(io::Error::last_os_error());
        }

        // SAFETY: the path is a valid NUL-terminated C string literal.
        let null = unsafe { libc::open(c"/dev/null".as_ptr(), libc::O_WRONLY) };
        if null < 0 {
            let err = io::Error::last_os_error();
            // SAFETY: `saved` was returned by `dup` above and is owned here.
            unsafe { libc::close(saved) };
            return Err(err);
        }

        // SAFETY: both descriptors are valid; `dup2` atomically replaces fd 1.
        let replaced = unsafe { libc::dup2(null, libc::STDOUT_FILENO) };
        let err = (replaced < 0).then(io::Error::last_os_error);
        // SAFETY: `null` is owned here and no longer needed after `dup2`.
        unsafe { libc::close(null) };

        if let Some(err) = err {
            // SAFETY: `saved` is owned here.
            unsafe { libc::close(saved) };
            return Err(err);
        }
        Ok(saved)
    }

    pub(super) fn restore(saved: libc::c_int) {
        // SAFETY: `saved` is the duplicate taken in `redirect_to_null` and is
        // closed exactly once, here.
        unsafe {
            libc::dup2(saved, libc::STDOUT_FILENO);
            libc::close(saved);
        }
    }
}
