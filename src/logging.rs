use crate::{client::ActionResponse, user_info::UserId};

fn escape(text: &str) -> String {
    text.replace('\n', " \\n ")
}

/// Logs a deletion attempt for auditing purposes.
pub fn log_deletion(user_id: UserId, reason: &str, details: &str, response: &ActionResponse) {
    log::warn!(
        "Delete user {}: {} {} | {} | {}",
        user_id,
        response.status,
        response.status_text,
        reason,
        escape(details)
    );
}

/// Logs an annotation attempt for auditing purposes.
pub fn log_annotation(user_id: UserId, annotation: &str, response: &ActionResponse) {
    log::warn!(
        "Annotate user {}: {} {} | {}",
        user_id,
        response.status,
        response.status_text,
        escape(annotation)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_newlines() {
        assert_eq!(escape("a\nb"), "a \\n b");
    }
}
