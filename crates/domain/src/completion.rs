use std::future::Future;

use log::debug;

use crate::{UpdateError, WorkoutSession};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionState {
    Incomplete,
    AwaitingNotes { notes: String },
    Completing { notes: Option<String> },
    Completed,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CompletionError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("{0}")]
    Failed(String),
}

/// Completion flow of a workout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCompletion {
    state: CompletionState,
    error: Option<String>,
}

impl SessionCompletion {
    #[must_use]
    pub fn new(session: &WorkoutSession) -> Self {
        Self {
            state: if session.is_completed() {
                CompletionState::Completed
            } else {
                CompletionState::Incomplete
            },
            error: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CompletionState {
        &self.state
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.state, CompletionState::Completing { .. })
    }

    pub fn add_notes(&mut self) -> Result<(), CompletionError> {
        match self.state {
            CompletionState::Incomplete => {
                self.state = CompletionState::AwaitingNotes {
                    notes: String::new(),
                };
                self.error = None;
                Ok(())
            }
            _ => Err(self.invalid("add notes")),
        }
    }

    pub fn edit_notes(&mut self, text: &str) -> Result<(), CompletionError> {
        match self.state {
            CompletionState::AwaitingNotes { ref mut notes } => {
                text.clone_into(notes);
                Ok(())
            }
            _ => Err(self.invalid("edit notes")),
        }
    }

    pub fn cancel_notes(&mut self) -> Result<(), CompletionError> {
        match self.state {
            CompletionState::AwaitingNotes { .. } => {
                self.state = CompletionState::Incomplete;
                self.error = None;
                Ok(())
            }
            _ => Err(self.invalid("cancel notes")),
        }
    }

    /// Enters `Completing` and returns the notes to be sent with the request.
    pub fn begin(&mut self) -> Result<Option<String>, CompletionError> {
        let notes = match self.state {
            CompletionState::Incomplete => None,
            CompletionState::AwaitingNotes { ref notes } => {
                let notes = notes.trim();
                (!notes.is_empty()).then(|| notes.to_string())
            }
            _ => return Err(self.invalid("complete")),
        };
        self.state = CompletionState::Completing {
            notes: notes.clone(),
        };
        self.error = None;
        Ok(notes)
    }

    pub fn finish<T>(&mut self, result: Result<T, UpdateError>) -> Result<T, CompletionError> {
        let notes = match &self.state {
            CompletionState::Completing { notes } => notes.clone(),
            _ => return Err(self.invalid("finish completion")),
        };
        match result {
            Ok(value) => {
                self.state = CompletionState::Completed;
                Ok(value)
            }
            Err(err) => {
                debug!("failed to complete session: {err}");
                self.state = match notes {
                    Some(notes) => CompletionState::AwaitingNotes { notes },
                    None => CompletionState::Incomplete,
                };
                let message = err.to_string();
                self.error = Some(message.clone());
                Err(CompletionError::Failed(message))
            }
        }
    }

    /// Runs the completion request built by `request` from the entered notes.
    pub async fn complete<F, Fut>(&mut self, request: F) -> Result<WorkoutSession, CompletionError>
    where
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<WorkoutSession, UpdateError>>,
    {
        let notes = self.begin()?;
        let result = request(notes).await;
        self.finish(result)
    }

    fn invalid(&self, action: &'static str) -> CompletionError {
        CompletionError::InvalidTransition {
            action,
            state: match self.state {
                CompletionState::Incomplete => "incomplete",
                CompletionState::AwaitingNotes { .. } => "awaiting notes",
                CompletionState::Completing { .. } => "completing",
                CompletionState::Completed => "completed",
            },
        }
    }
}
