//! Raw terminal mode
//!
//! Raw mode is a process-wide resource: the attributes in effect before the
//! first [`enter_raw`] are kept in a global slot and put back by the owning
//! [`RawModeGuard`] when it is dropped. Entering again while raw is a no-op
//! that hands out a guard which restores nothing.
//!
//! A panic hook is installed the first time raw mode is entered so that a
//! panicking program does not leave the user's terminal without echo.

use std::io::{self, IsTerminal};
use std::os::fd::AsFd;
use std::sync::{Mutex, MutexGuard, Once};

use nix::sys::termios::{
    self, ControlFlags, InputFlags, LocalFlags, OutputFlags, SetArg, SpecialCharacterIndices,
    Termios,
};

use super::{TermError, TermResult};

/// Attributes saved by the outermost `enter_raw`
static SAVED: Mutex<Option<Termios>> = Mutex::new(None);

static PANIC_HOOK: Once = Once::new();

fn saved() -> MutexGuard<'static, Option<Termios>> {
    // A poisoned slot still holds valid attributes
    SAVED.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// RAII guard for raw terminal mode
#[derive(Debug)]
#[must_use = "raw mode is left as soon as the guard is dropped"]
pub struct RawModeGuard {
    /// Only the guard that changed the mode restores it
    owner: bool,
}

impl RawModeGuard {
    /// Whether dropping this guard restores the terminal
    pub fn is_owner(&self) -> bool {
        self.owner
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.owner {
            if let Err(e) = exit_raw() {
                tracing::warn!("Failed to restore terminal mode: {}", e);
            }
        }
    }
}

/// Put stdin into raw mode
///
/// Disables canonical input, echo, signal keys, flow control and output
/// post-processing. Reads return after every byte.
pub fn enter_raw() -> TermResult<RawModeGuard> {
    let mut slot = saved();
    if slot.is_some() {
        return Ok(RawModeGuard { owner: false });
    }

    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(TermError::NotATty);
    }
    let fd = stdin.as_fd();

    let original = termios::tcgetattr(fd).map_err(TermError::GetAttr)?;
    let mut raw = original.clone();

    raw.input_flags.remove(
        InputFlags::BRKINT
            | InputFlags::ICRNL
            | InputFlags::INPCK
            | InputFlags::ISTRIP
            | InputFlags::IXON,
    );
    raw.output_flags.remove(OutputFlags::OPOST);
    raw.control_flags.insert(ControlFlags::CS8);
    raw.local_flags
        .remove(LocalFlags::ECHO | LocalFlags::ICANON | LocalFlags::IEXTEN | LocalFlags::ISIG);

    // Block for at least one byte, no inter-byte timer
    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

    termios::tcsetattr(fd, SetArg::TCSAFLUSH, &raw).map_err(TermError::SetAttr)?;
    *slot = Some(original);
    drop(slot);

    install_panic_hook();
    tracing::debug!("Entered raw mode");
    Ok(RawModeGuard { owner: true })
}

/// Restore the attributes saved by [`enter_raw`]
///
/// Does nothing when raw mode is not active.
pub fn exit_raw() -> TermResult<()> {
    let Some(original) = saved().take() else {
        return Ok(());
    };
    termios::tcsetattr(io::stdin().as_fd(), SetArg::TCSAFLUSH, &original)
        .map_err(TermError::SetAttr)?;
    tracing::debug!("Left raw mode");
    Ok(())
}

/// Whether raw mode is currently active
pub fn is_raw() -> bool {
    saved().is_some()
}

fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = exit_raw();
            previous(info);
        }));
    });
}
