pub mod account;
pub mod api_token;
pub mod board;
pub mod comment;
pub mod follow;
pub mod password_reset;
pub mod pin;
pub mod profile;

use validator::ValidationErrors;

use crate::domain::repository::Mailer;
use crate::domain::types::Mail;
use crate::error::PinboardError;

/// Send `mail` on a spawned task and wait for it. Failures are logged and
/// reported as `false`; they never fail the caller.
pub async fn deliver<M: Mailer>(mailer: &M, mail: Mail) -> bool {
    let mailer = mailer.clone();
    let subject = mail.subject.clone();
    let task = tokio::spawn(async move { mailer.send(&mail).await });
    match task.await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, subject = %subject, "mail delivery failed");
            false
        }
        Err(e) => {
            tracing::warn!(error = %e, subject = %subject, "mail task aborted");
            false
        }
    }
}

/// Flatten validator errors into one message, sorted for stable output.
pub fn validation_error(errors: ValidationErrors) -> PinboardError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field}: invalid value"),
            })
        })
        .collect();
    messages.sort();
    PinboardError::Validation(messages.join(" "))
}

/// Reject strings longer than `max` characters.
pub fn check_max_len(field: &str, value: &str, max: usize) -> Result<(), PinboardError> {
    if value.chars().count() > max {
        return Err(PinboardError::Validation(format!(
            "Ensure {field} has at most {max} characters."
        )));
    }
    Ok(())
}

/// Reject empty or whitespace-only strings.
pub fn check_not_blank(field: &str, value: &str) -> Result<(), PinboardError> {
    if value.trim().is_empty() {
        return Err(PinboardError::Validation(format!("{field} may not be blank.")));
    }
    Ok(())
}
