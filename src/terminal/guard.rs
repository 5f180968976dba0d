//! RAII guard for the hardware cursor.

use crossterm::{cursor, execute};
use std::io::{self, Write};

/// Hides the terminal cursor while alive.
///
/// The reveal draws its own caret, so the hardware cursor is hidden for the
/// duration and shown again on drop, including on early returns and panics.
pub struct CursorGuard {
    active: bool,
}

impl CursorGuard {
    /// Hide the cursor on stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if the escape sequence cannot be written.
    pub fn hide() -> io::Result<Self> {
        let mut stdout = io::stdout();
        execute!(stdout, cursor::Hide)?;
        Ok(Self { active: true })
    }

    /// A guard that does nothing (output is not a terminal).
    pub const fn inactive() -> Self {
        Self { active: false }
    }
}

impl Drop for CursorGuard {
    fn drop(&mut self) {
        if self.active {
            let mut stdout = io::stdout();
            let _ = execute!(stdout, cursor::Show);
            let _ = stdout.flush();
        }
    }
}
