//! Form input checks.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::error::InputError;

/// Upper bound for the name and email fields, in characters.
pub const MAX_SHORT_FIELD: usize = 100;

/// Upper bound for the message body, in characters.
pub const MAX_MESSAGE: usize = 1000;

/// Substrings rejected anywhere in a submission (compared lowercase).
pub const DENYLIST: &[&str] = &["<script", "javascript:", "data:", "vbscript:"];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// A contact or feedback form as submitted.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl Submission {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    /// Copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

/// Check a link field, returning the trimmed link.
///
/// `missing_message` is the page-specific text shown when the field is blank.
pub fn validate_link(value: Option<&str>, missing_message: &str) -> Result<String, InputError> {
    match value.map(str::trim) {
        Some(link) if !link.is_empty() => Ok(link.to_string()),
        _ => Err(InputError::MissingLink {
            message: missing_message.to_string(),
        }),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate an already trimmed submission.
///
/// Checks run in a fixed order and the first failure wins: presence, email
/// shape, length, denylist.
pub fn validate_submission(submission: &Submission) -> Result<(), InputError> {
    if submission.name.is_empty() || submission.email.is_empty() || submission.message.is_empty()
    {
        return Err(InputError::MissingFields);
    }

    if !is_valid_email(&submission.email) {
        return Err(InputError::InvalidEmail);
    }

    let limits = [
        ("name", &submission.name, MAX_SHORT_FIELD),
        ("email", &submission.email, MAX_SHORT_FIELD),
        ("message", &submission.message, MAX_MESSAGE),
    ];
    for (field, value, max) in limits {
        if value.chars().count() > max {
            return Err(InputError::TooLong { field });
        }
    }

    let combined = format!(
        "{}{}{}",
        submission.name, submission.email, submission.message
    )
    .to_lowercase();
    if let Some(pattern) = DENYLIST.iter().copied().find(|p| combined.contains(p)) {
        return Err(InputError::ForbiddenContent { pattern });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Submission {
        Submission::new("Ada", "ada@example.com", "Great site, thanks!")
    }

    #[test]
    fn test_validate_link_accepts_and_trims() {
        let link = validate_link(Some("  https://youtu.be/abc  "), "missing").unwrap();
        assert_eq!(link, "https://youtu.be/abc");
    }

    #[test]
    fn test_validate_link_rejects_blank() {
        for input in [None, Some(""), Some("   "), Some("\t\n")] {
            let err = validate_link(input, "Please enter a YouTube video link").unwrap_err();
            assert_eq!(err.to_string(), "Please enter a YouTube video link");
        }
    }

    #[test]
    fn test_valid_submission() {
        assert!(validate_submission(&valid()).is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let mut s = valid();
        s.message.clear();
        assert_eq!(validate_submission(&s), Err(InputError::MissingFields));
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["plain", "a@b", "a@b.c", "a b@example.com", "@example.com", "a@.com1"] {
            let mut s = valid();
            s.email = email.to_string();
            assert_eq!(
                validate_submission(&s),
                Err(InputError::InvalidEmail),
                "email {:?} should be rejected",
                email
            );
        }
    }

    #[test]
    fn test_accepted_emails() {
        for email in ["a.b+c@mail.example.org", "x_y%z@sub.domain.io", "A1@B2.CO"] {
            assert!(is_valid_email(email), "email {:?} should pass", email);
        }
    }

    #[test]
    fn test_length_limits_count_characters() {
        let mut s = valid();
        s.name = "é".repeat(100);
        assert!(validate_submission(&s).is_ok());

        s.name = "é".repeat(101);
        assert_eq!(
            validate_submission(&s),
            Err(InputError::TooLong { field: "name" })
        );

        let mut s = valid();
        s.message = "x".repeat(1001);
        assert_eq!(
            validate_submission(&s),
            Err(InputError::TooLong { field: "message" })
        );
    }

    #[test]
    fn test_denylist_is_case_insensitive() {
        for payload in [
            "<SCRIPT>alert(1)</script>",
            "JavaScript:void(0)",
            "see data:text/html;base64",
            "VBScript:msgbox",
        ] {
            let mut s = valid();
            s.message = payload.to_string();
            let err = validate_submission(&s).unwrap_err();
            assert!(matches!(err, InputError::ForbiddenContent { .. }));
            assert_eq!(err.to_string(), "Invalid content detected.");
        }
    }

    #[test]
    fn test_denylist_in_name() {
        let mut s = valid();
        s.name = "<script".to_string();
        assert!(matches!(
            validate_submission(&s),
            Err(InputError::ForbiddenContent { pattern: "<script" })
        ));
    }

    #[test]
    fn test_trimmed() {
        let s = Submission::new("  Ada ", " ada@example.com ", "\nhi\n").trimmed();
        assert_eq!(s.name, "Ada");
        assert_eq!(s.email, "ada@example.com");
        assert_eq!(s.message, "hi");
    }
}
