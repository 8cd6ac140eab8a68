//! Submission of the first staged file and a prompt to a result provider.
//!
//! [`Submission`] tracks the single in-flight request. Callers pair every
//! successful [`Submission::begin`] with a [`Submission::finish`], which
//! clears the busy state whatever the outcome.

use async_trait::async_trait;

use crate::staging::{StagedFile, Staging};

/// Failure reported by a [`ResultProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(String),

    /// The remote side answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The response could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Produces descriptive text for a prompt and a file.
#[async_trait(?Send)]
pub trait ResultProvider {
    /// Ask the provider for a result.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the provider cannot produce a result.
    async fn get_result(&self, prompt: &str, file: &StagedFile) -> Result<String, ProviderError>;
}

/// Reasons a submission cannot start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// No file is staged.
    #[error("no file is staged")]
    NothingStaged,

    /// A request is already in flight.
    #[error("a submission is already in progress")]
    InFlight,
}

/// State of the submit action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Submission {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Waiting for the provider.
    Busy,
    /// Last request succeeded with this text.
    Done(String),
    /// Last request failed with this message.
    Failed(String),
}

impl Submission {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// Text of the last successful result.
    #[must_use]
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::Done(text) => Some(text),
            _ => None,
        }
    }

    /// Message of the last failure.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    /// Enter the busy state and hand out the file to submit.
    ///
    /// The store is left untouched; staged entries remain after the
    /// request completes.
    ///
    /// # Errors
    ///
    /// [`SubmitError::InFlight`] while busy, [`SubmitError::NothingStaged`]
    /// when the store is empty. Neither changes the state.
    pub fn begin(&mut self, staging: &Staging) -> Result<StagedFile, SubmitError> {
        if self.is_busy() {
            return Err(SubmitError::InFlight);
        }
        let file = staging
            .first_file()
            .cloned()
            .ok_or(SubmitError::NothingStaged)?;
        *self = Self::Busy;
        Ok(file)
    }

    /// Leave the busy state with the provider's outcome.
    pub fn finish(&mut self, outcome: Result<String, ProviderError>) {
        *self = match outcome {
            Ok(text) => Self::Done(text),
            Err(e) => {
                tracing::warn!(error = %e, "submission failed");
                Self::Failed(e.to_string())
            }
        };
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::progress::CancelToken;

    use super::*;

    fn store_with_file() -> Staging {
        let mut store = Staging::new(1);
        store.stage(
            StagedFile::new("a.png", "image/png", vec![1]),
            None,
            CancelToken::new(),
        );
        store
    }

    #[test]
    fn begin_requires_a_staged_file() {
        let mut sub = Submission::default();
        assert_eq!(
            sub.begin(&Staging::new(1)),
            Err(SubmitError::NothingStaged)
        );
        assert_eq!(sub, Submission::Idle);
    }

    #[test]
    fn begin_refuses_while_busy() {
        let store = store_with_file();
        let mut sub = Submission::default();
        assert_eq!(sub.begin(&store).unwrap().name, "a.png");
        assert!(sub.is_busy());
        assert_eq!(sub.begin(&store), Err(SubmitError::InFlight));
    }

    #[test]
    fn finish_records_result_or_error() {
        let store = store_with_file();
        let mut sub = Submission::default();
        sub.begin(&store).unwrap();
        sub.finish(Ok("a cat".into()));
        assert_eq!(sub.result(), Some("a cat"));
        assert!(!sub.is_busy());

        sub.begin(&store).unwrap();
        sub.finish(Err(ProviderError::Transport("offline".into())));
        assert_eq!(sub.error(), Some("request failed: offline"));
        assert_eq!(sub.result(), None);
        assert!(!sub.is_busy());
    }

    #[test]
    fn staged_entries_survive_submission() {
        let store = store_with_file();
        let mut sub = Submission::default();
        sub.begin(&store).unwrap();
        sub.finish(Ok(String::new()));
        assert_eq!(store.len(), 1);
    }
}
