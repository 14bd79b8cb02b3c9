//! Dialog hosting a form.

/// A dialog that a form can close once it completes.
pub trait Dialog {
    /// Closes the dialog. Closing twice has no effect.
    fn close(&mut self);

    /// Whether the dialog is still open.
    fn is_open(&self) -> bool;
}

/// Dialog rendered as a titled section of terminal output.
#[derive(Debug)]
pub struct TerminalDialog {
    title: String,
    open: bool,
}

impl TerminalDialog {
    /// Opens a dialog titled `title`.
    #[must_use]
    pub fn open(title: impl Into<String>) -> Self {
        let title = title.into();
        tracing::info!("== {title} ==");
        Self { title, open: true }
    }
}

impl Dialog for TerminalDialog {
    fn close(&mut self) {
        if self.open {
            self.open = false;
            tracing::debug!(title = %self.title, "Dialog closed");
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_is_idempotent() {
        // Arrange
        let mut dialog = TerminalDialog::open("Login");

        // Act
        dialog.close();
        dialog.close();

        // Assert
        assert!(!dialog.is_open());
    }
}
