use thiserror::Error;

/// Form errors caught on the client before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("{field} must be less than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Password must be at least {0} characters long")]
    PasswordTooShort(usize),

    #[error("Due date must be a valid date (YYYY-MM-DD)")]
    InvalidDate,

    #[error("The due date must be today or in the future")]
    DueDateInPast,
}
