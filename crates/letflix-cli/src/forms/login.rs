//! Login form.
#![allow(clippy::future_not_send)]

use letflix_api::{Credentials, GENERIC_FAILURE_MESSAGE, LocalMovieApi};
use tracing::instrument;

use super::{SubmitOutcome, reject_empty};
use crate::dialog::Dialog;
use crate::notify::{NotificationKind, Notifier};
use crate::session::SessionSink;

/// Shown after a successful login.
const LOGGED_IN: &str = "Login successful.";

/// Form signing an existing user in.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoginForm {
    /// Fields entered so far.
    pub draft: Credentials,
}

impl LoginForm {
    /// Creates a form pre-filled with `draft`.
    #[must_use]
    pub const fn new(draft: Credentials) -> Self {
        Self { draft }
    }

    /// Submits the draft to `POST login`.
    ///
    /// On success the returned token and username are handed to `session`
    /// before the dialog is closed.
    #[instrument(skip_all)]
    pub async fn submit(
        &self,
        api: &impl LocalMovieApi,
        session: &impl SessionSink,
        notifier: &impl Notifier,
        dialog: &mut impl Dialog,
    ) -> SubmitOutcome {
        let draft = &self.draft;
        if reject_empty(
            notifier,
            &[("Username", draft.username.as_str()), ("Password", draft.password.as_str())],
        ) {
            return SubmitOutcome::Incomplete;
        }

        let response = match api.login(draft).await {
            Ok(response) => response,
            Err(err) => {
                notifier.notify(NotificationKind::Failure, &err.to_string());
                return SubmitOutcome::Failed;
            }
        };

        let username = if response.user.username.is_empty() {
            draft.username.as_str()
        } else {
            response.user.username.as_str()
        };
        if let Err(err) = session.sign_in(username, &response.token) {
            tracing::error!("Failed to store session: {err:#}");
            notifier.notify(NotificationKind::Failure, GENERIC_FAILURE_MESSAGE);
            return SubmitOutcome::Failed;
        }

        dialog.close();
        notifier.notify(NotificationKind::Success, LOGGED_IN);
        SubmitOutcome::Succeeded
    }
}
