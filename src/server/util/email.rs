//! Institutional email validation.

/// Validates and normalizes an email address against the institution's domain.
///
/// The address is trimmed and lowercased, must contain `@` with a non-empty local
/// part, and must end with `domain` (for example `@connect.polyu.hk`).
///
/// # Arguments
/// - `email` - Raw email as submitted
/// - `domain` - Required suffix including the leading `@`
///
/// # Returns
/// - `Ok(String)` - Normalized email
/// - `Err(String)` - Human readable reason the address was rejected
pub fn validate_email(email: &str, domain: &str) -> Result<String, String> {
    let email = email.trim().to_lowercase();
    let domain = domain.trim().to_lowercase();

    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    let Some((local, _)) = email.split_once('@') else {
        return Err("Invalid email format".to_string());
    };

    if !email.ends_with(&domain) {
        return Err(format!("Email must end with {}", domain));
    }

    if local.is_empty() {
        return Err("Email username part cannot be empty".to_string());
    }

    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "@connect.polyu.hk";

    #[test]
    fn normalizes_valid_email() {
        let email = validate_email("  Chan.TaiMan@Connect.PolyU.hk ", DOMAIN).unwrap();
        assert_eq!(email, "chan.taiman@connect.polyu.hk");
    }

    #[test]
    fn rejects_other_domains() {
        let err = validate_email("someone@gmail.com", DOMAIN).unwrap_err();
        assert!(err.contains("@connect.polyu.hk"));
    }

    #[test]
    fn rejects_missing_at_sign() {
        assert_eq!(
            validate_email("connect.polyu.hk", DOMAIN).unwrap_err(),
            "Invalid email format"
        );
    }

    #[test]
    fn rejects_empty_local_part() {
        assert!(validate_email("@connect.polyu.hk", DOMAIN).is_err());
    }

    #[test]
    fn rejects_blank_email() {
        assert_eq!(validate_email("   ", DOMAIN).unwrap_err(), "Email is required");
    }
}
