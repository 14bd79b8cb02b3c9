//! Form components.
//!
//! A form owns a draft of the user's input, submits it through one backend
//! operation, and reports the outcome as a notification. On success the
//! hosting dialog is closed; on failure it stays open. Nothing is retried.

mod login;
mod registration;

pub use login::LoginForm;
pub use registration::RegistrationForm;

use anyhow::{Result, bail};

use crate::notify::{NotificationKind, Notifier};

/// What happened when a form was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend accepted the submission.
    Succeeded,
    /// The backend call failed.
    Failed,
    /// A required field was empty; no request was made.
    Incomplete,
}

impl SubmitOutcome {
    /// Turns anything but success into an error naming `form`.
    ///
    /// # Errors
    ///
    /// Returns an error unless the outcome is `Succeeded`.
    pub fn ensure_succeeded(self, form: &str) -> Result<()> {
        match self {
            Self::Succeeded => Ok(()),
            Self::Failed => bail!("{form} failed"),
            Self::Incomplete => bail!("{form} was not completed"),
        }
    }
}

/// Notifies about the first empty field and returns `true` if there was one.
fn reject_empty(notifier: &impl Notifier, fields: &[(&str, &str)]) -> bool {
    let Some((label, _)) = fields.iter().find(|(_, value)| value.trim().is_empty()) else {
        return false;
    };
    notifier.notify(NotificationKind::Failure, &format!("{label} is required."));
    true
}
