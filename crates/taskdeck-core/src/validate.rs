//! Form checks that run before any request is issued.

use chrono::NaiveDate;

use crate::auth::{LoginRequest, RegisterRequest};
use crate::error::ValidationError;
use crate::project::CreateProject;
use crate::task::CreateTask;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

pub fn login(email: &str, password: &str) -> Result<LoginRequest, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    Ok(LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn register(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<RegisterRequest, ValidationError> {
    let name = name.trim();
    let email = email.trim();
    if name.is_empty() {
        return Err(ValidationError::Required("Name"));
    }
    if email.is_empty() {
        return Err(ValidationError::Required("Email"));
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    Ok(RegisterRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

pub fn new_project(title: &str, description: &str) -> Result<CreateProject, ValidationError> {
    Ok(CreateProject {
        title: title_field(title)?,
        description: description_field(description)?,
    })
}

/// `due_date` is the raw form text; blank means no due date.
pub fn new_task(
    title: &str,
    description: &str,
    due_date: &str,
    today: NaiveDate,
) -> Result<CreateTask, ValidationError> {
    let title = title_field(title)?;
    let description = description_field(description)?;
    let due_date = match due_date.trim() {
        "" => None,
        raw => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| ValidationError::InvalidDate)?;
            if date < today {
                return Err(ValidationError::DueDateInPast);
            }
            Some(date)
        }
    };
    Ok(CreateTask {
        title,
        description,
        due_date,
    })
}

fn title_field(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::Required("Title"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "Title",
            max: MAX_TITLE_LEN,
        });
    }
    Ok(title.to_string())
}

fn description_field(raw: &str) -> Result<Option<String>, ValidationError> {
    let description = raw.trim();
    if description.is_empty() {
        return Ok(None);
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::TooLong {
            field: "Description",
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(Some(description.to_string()))
}
