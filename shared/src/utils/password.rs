//! Password policy for resets

/// Minimum password length
pub const MIN_PASSWORD_LEN: usize = 8;

/// Check a new password against the policy.
///
/// Returns the first violated rule as a message, or `None` if acceptable.
pub fn password_policy_error(password: &str) -> Option<&'static str> {
    let pw = password.trim();

    if pw.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 8 characters long.");
    }
    if !pw.chars().any(char::is_uppercase) {
        return Some("Password must contain at least one uppercase letter.");
    }
    if !pw.chars().any(|c| !c.is_alphanumeric()) {
        return Some("Password must contain at least one special character.");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_password() {
        assert_eq!(password_policy_error("Secure#Pass1"), None);
    }

    #[test]
    fn test_rejects_short_password() {
        assert!(password_policy_error("Ab#1").is_some());
        // surrounding whitespace does not count towards the length
        assert!(password_policy_error("  Ab#1   ").is_some());
    }

    #[test]
    fn test_requires_uppercase_and_special() {
        assert!(password_policy_error("lowercase#only").unwrap().contains("uppercase"));
        assert!(password_policy_error("NoSpecialChars1").unwrap().contains("special"));
    }
}
