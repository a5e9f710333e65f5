use once_cell::sync::Lazy;
use regex::Regex;

pub const EMAIL_PLACEHOLDER: &str = "[REDACTED_EMAIL]";
pub const PHONE_PLACEHOLDER: &str = "[REDACTED_PHONE]";

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("email pattern compiles")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{2,4}\)?[-.\s]?\d{3,4}[-.\s]?\d{3,4}")
        .expect("phone pattern compiles")
});

/// Masks email addresses, then phone-like digit runs.
///
/// Each pass is a single left-to-right substitution; placeholders carry no
/// digits or `@`, so the phone pass never touches an email placeholder.
pub fn redact(text: &str) -> String {
    let without_emails = EMAIL.replace_all(text, EMAIL_PLACEHOLDER);
    PHONE
        .replace_all(&without_emails, PHONE_PLACEHOLDER)
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_and_phone_once_each() {
        let redacted = redact("contact a@b.com or 555-123-4567");
        assert!(!redacted.contains("a@b.com"));
        assert!(!redacted.contains("555"));
        assert!(!redacted.contains("4567"));
        assert_eq!(redacted.matches(EMAIL_PLACEHOLDER).count(), 1);
        assert_eq!(redacted.matches(PHONE_PLACEHOLDER).count(), 1);
        assert_eq!(redacted, "contact [REDACTED_EMAIL] or [REDACTED_PHONE]");
    }

    #[test]
    fn handles_country_code_and_parenthesised_area() {
        let redacted = redact("call +1 (415) 555 0199 today");
        assert_eq!(redacted, "call [REDACTED_PHONE] today");
    }

    #[test]
    fn leaves_plain_text_untouched() {
        let text = "Queue depth growing on processing pipeline";
        assert_eq!(redact(text), text);
    }

    #[test]
    fn masks_every_email() {
        let redacted = redact("cc jane.doe@uni.edu and ops+alerts@corp.example.org");
        assert_eq!(redacted.matches(EMAIL_PLACEHOLDER).count(), 2);
        assert!(!redacted.contains('@'));
    }
}
