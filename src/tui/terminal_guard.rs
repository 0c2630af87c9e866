//! RAII terminal lifecycle guard.
//!
//! [`TerminalGuard`] flips the terminal into raw mode plus the alternate
//! screen when built and undoes both on [`Drop`], panics and early error
//! returns included. The panic hook swap runs first so a backtrace prints
//! onto the restored screen, not the alternate one.

use std::io;
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};

/// Set while raw mode is active. Checked by the panic hook to decide
/// whether restoration is needed.
static RAW_MODE_ACTIVE: AtomicBool = AtomicBool::new(false);

/// RAII guard over raw mode and the alternate screen.
pub struct TerminalGuard {
    /// Tells drop whether a custom panic hook needs removing.
    hook_installed: bool,
}

impl TerminalGuard {
    /// Enter raw mode and the alternate screen, installing a panic-safe
    /// cleanup hook.
    ///
    /// # Errors
    /// Returns I/O errors if terminal setup fails. On partial failure the
    /// pieces that did succeed are rolled back.
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(err) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(err);
        }
        RAW_MODE_ACTIVE.store(true, Ordering::SeqCst);

        // Restore the terminal before the previous hook prints the panic.
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            restore_terminal_best_effort();
            prev(info);
        }));

        Ok(Self {
            hook_installed: true,
        })
    }

    /// Current terminal size as (columns, rows), or 80x24 when no tty is
    /// attached.
    #[must_use]
    pub fn terminal_size() -> (u16, u16) {
        terminal::size().unwrap_or((80, 24))
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore_terminal_best_effort();

        if self.hook_installed {
            // The previous hook moved into our closure and cannot be put
            // back exactly; reset to the default. The guard's lifetime
            // brackets all TUI usage, so nothing else depends on it.
            let _ = panic::take_hook();
        }
    }
}

/// Best-effort restoration. Safe to call more than once; the atomic flag
/// skips redundant work.
fn restore_terminal_best_effort() {
    if RAW_MODE_ACTIVE.swap(false, Ordering::SeqCst) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
    }
}

// ──────────────────── tests ────────────────────
