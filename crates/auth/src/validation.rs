//! Registration input checks, applied at the caller-facing boundary.
//!
//! The identity service trusts its input; these run before it is called.

use crate::AuthError;

pub const USERNAME_MIN_CHARS: usize = 2;
pub const USERNAME_MAX_CHARS: usize = 20;
pub const PASSWORD_MIN_CHARS: usize = 8;

/// Validate a registration request, reporting every failed rule at once.
pub fn validate_registration(username: &str, email: &str, password: &str) -> Result<(), AuthError> {
    let problems: Vec<&'static str> = [
        check_username(username),
        check_email(email),
        check_password(password),
    ]
    .into_iter()
    .flatten()
    .flatten()
    .collect();

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(problems.join("; ")))
    }
}

fn check_username(username: &str) -> Option<Vec<&'static str>> {
    let len = username.chars().count();
    if len < USERNAME_MIN_CHARS {
        return Some(vec!["username must be at least 2 characters"]);
    }
    if len > USERNAME_MAX_CHARS {
        return Some(vec!["username must be at most 20 characters"]);
    }
    None
}

fn check_email(email: &str) -> Option<Vec<&'static str>> {
    if is_valid_email(email) {
        None
    } else {
        Some(vec!["email must be a valid email address"])
    }
}

fn check_password(password: &str) -> Option<Vec<&'static str>> {
    let mut problems = Vec::new();
    if password.chars().count() < PASSWORD_MIN_CHARS {
        problems.push("password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        problems.push("password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        problems.push("password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        problems.push("password must contain a digit");
    }
    if !password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace()) {
        problems.push("password must contain a symbol");
    }
    (!problems.is_empty()).then_some(problems)
}

/// Syntactic check: `local@domain.tld`, no whitespace, non-empty dot-separated labels.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let label_ok = |l: &&str| {
        !l.is_empty()
            && !l.starts_with('-')
            && !l.ends_with('-')
            && l.chars().all(|c| c.is_alphanumeric() || c == '-')
    };
    let tld = labels[labels.len() - 1];
    labels.iter().all(label_ok) && tld.chars().count() >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_registration() {
        assert_eq!(validate_registration("alice", "alice@x.com", "Str0ng!Pw"), Ok(()));
    }

    #[test]
    fn username_length_is_bounded() {
        assert!(validate_registration("a", "a@x.com", "Str0ng!Pw").is_err());
        assert!(validate_registration("ab", "a@x.com", "Str0ng!Pw").is_ok());
        assert!(validate_registration(&"a".repeat(20), "a@x.com", "Str0ng!Pw").is_ok());
        assert!(validate_registration(&"a".repeat(21), "a@x.com", "Str0ng!Pw").is_err());
    }

    #[test]
    fn rejects_malformed_emails() {
        for email in [
            "",
            "alice",
            "alice@",
            "@x.com",
            "alice@x",
            "alice@@x.com",
            "al ice@x.com",
            "alice@x..com",
            "alice@-x.com",
            ".alice@x.com",
            "alice@x.c",
        ] {
            assert!(!is_valid_email(email), "{email:?} should be rejected");
        }
        for email in ["alice@x.com", "a.b+tag@mail.example.org", "bob@sub-domain.io"] {
            assert!(is_valid_email(email), "{email:?} should be accepted");
        }
    }

    #[test]
    fn weak_passwords_list_every_missing_class() {
        let err = validate_registration("alice", "alice@x.com", "short").unwrap_err();
        let AuthError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("at least 8"));
        assert!(msg.contains("uppercase"));
        assert!(msg.contains("digit"));
        assert!(msg.contains("symbol"));
        assert!(!msg.contains("lowercase"));
    }

    #[test]
    fn reports_all_fields_together() {
        let AuthError::Validation(msg) = validate_registration("a", "nope", "Str0ng!Pw").unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(msg.contains("username"));
        assert!(msg.contains("email"));
    }
}
