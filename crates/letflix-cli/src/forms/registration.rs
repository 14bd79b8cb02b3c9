//! Registration form.
#![allow(clippy::future_not_send)]

use letflix_api::{LocalMovieApi, Registration};
use tracing::instrument;

use super::{SubmitOutcome, reject_empty};
use crate::dialog::Dialog;
use crate::notify::{NotificationKind, Notifier};

/// Shown when the backend accepts a registration without a message.
const REGISTERED_FALLBACK: &str = "Registration successful.";

/// Shown for every rejected registration, whatever the backend said.
const REGISTRATION_FAILED: &str = "An error occurred. Please try again.";

/// Form creating a new account.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    /// Fields entered so far.
    pub draft: Registration,
}

impl RegistrationForm {
    /// Creates a form pre-filled with `draft`.
    #[must_use]
    pub const fn new(draft: Registration) -> Self {
        Self { draft }
    }

    /// Submits the draft to `POST users`.
    ///
    /// On success the dialog is closed and the server's message is shown.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        api: &impl LocalMovieApi,
        notifier: &impl Notifier,
        dialog: &mut impl Dialog,
    ) -> SubmitOutcome {
        let draft = &self.draft;
        if reject_empty(
            notifier,
            &[
                ("Username", draft.username.as_str()),
                ("Password", draft.password.as_str()),
                ("Email", draft.email.as_str()),
                ("Birthday", draft.birthday.as_str()),
            ],
        ) {
            return SubmitOutcome::Incomplete;
        }

        match api.register(draft).await {
            Ok(response) => {
                dialog.close();
                let text = response
                    .message
                    .unwrap_or_else(|| String::from(REGISTERED_FALLBACK));
                notifier.notify(NotificationKind::Success, &text);
                SubmitOutcome::Succeeded
            }
            Err(_) => {
                notifier.notify(NotificationKind::Failure, REGISTRATION_FAILED);
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use letflix_api::{MessageResponse, RequestFailed};

    use super::*;
    use crate::forms::testing::{MockMovieApi, RecordingNotifier, StubDialog};

    fn filled_draft() -> Registration {
        Registration {
            username: String::from("bob"),
            password: String::from("hunter2"),
            email: String::from("bob@example.com"),
            birthday: String::from("1985-01-30"),
        }
    }

    #[tokio::test]
    async fn test_success_closes_dialog_and_shows_server_message() {
        // Arrange
        let api = MockMovieApi::new(
            Ok(MessageResponse {
                message: Some(String::from("User bob created")),
                ..MessageResponse::default()
            }),
            Err(RequestFailed),
        );
        let notifier = RecordingNotifier::default();
        let mut dialog = StubDialog::default();
        let form = RegistrationForm::new(filled_draft());

        // Act
        let outcome = form.submit(&api, &notifier, &mut dialog).await;

        // Assert
        assert_eq!(outcome, SubmitOutcome::Succeeded);
        assert!(!dialog.open);
        assert_eq!(
            notifier.shown.borrow().as_slice(),
            &[(NotificationKind::Success, String::from("User bob created"))]
        );
        assert_eq!(api.registrations.borrow().as_slice(), &[filled_draft()]);
    }

    #[tokio::test]
    async fn test_success_without_message_uses_fallback() {
        // Arrange
        let api = MockMovieApi::new(Ok(MessageResponse::default()), Err(RequestFailed));
        let notifier = RecordingNotifier::default();
        let mut dialog = StubDialog::default();
        let form = RegistrationForm::new(filled_draft());

        // Act
        form.submit(&api, &notifier, &mut dialog).await;

        // Assert
        assert_eq!(
            notifier.shown.borrow().as_slice(),
            &[(NotificationKind::Success, String::from(REGISTERED_FALLBACK))]
        );
    }

    #[tokio::test]
    async fn test_failure_keeps_dialog_open_and_shows_fixed_text() {
        // Arrange
        let api = MockMovieApi::new(Err(RequestFailed), Err(RequestFailed));
        let notifier = RecordingNotifier::default();
        let mut dialog = StubDialog::default();
        let form = RegistrationForm::new(filled_draft());

        // Act
        let outcome = form.submit(&api, &notifier, &mut dialog).await;

        // Assert
        assert_eq!(outcome, SubmitOutcome::Failed);
        assert!(dialog.open);
        assert_eq!(
            notifier.shown.borrow().as_slice(),
            &[(
                NotificationKind::Failure,
                String::from("An error occurred. Please try again.")
            )]
        );
    }

    #[tokio::test]
    async fn test_empty_field_is_rejected_without_request() {
        // Arrange
        let api = MockMovieApi::new(Ok(MessageResponse::default()), Err(RequestFailed));
        let notifier = RecordingNotifier::default();
        let mut dialog = StubDialog::default();
        let form = RegistrationForm::new(Registration {
            birthday: String::new(),
            ..filled_draft()
        });

        // Act
        let outcome = form.submit(&api, &notifier, &mut dialog).await;

        // Assert
        assert_eq!(outcome, SubmitOutcome::Incomplete);
        assert_eq!(api.calls(), 0);
        assert!(dialog.open);
        assert_eq!(
            notifier.shown.borrow().as_slice(),
            &[(NotificationKind::Failure, String::from("Birthday is required."))]
        );
    }
}
