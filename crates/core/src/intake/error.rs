//! Error types for form intake.

use thiserror::Error;

use crate::messages::MessageStoreError;

/// Rejection of user-supplied form input.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// A required link field was empty or whitespace-only.
    #[error("{message}")]
    MissingLink { message: String },

    /// A contact/feedback field was empty.
    #[error("Please fill in all fields.")]
    MissingFields,

    /// The email address failed the pattern check.
    #[error("Please enter a valid email address.")]
    InvalidEmail,

    /// A field exceeded its length limit.
    #[error("Input too long. Please keep it reasonable.")]
    TooLong { field: &'static str },

    /// A denylisted substring was found.
    #[error("Invalid content detected.")]
    ForbiddenContent { pattern: &'static str },
}

/// Errors from submitting a contact or feedback message.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    Invalid(#[from] InputError),

    #[error("Failed to store message: {0}")]
    Store(#[from] MessageStoreError),
}

impl IntakeError {
    /// Message safe to show on the form page.
    pub fn user_message(&self) -> String {
        match self {
            Self::Invalid(e) => e.to_string(),
            Self::Store(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}
