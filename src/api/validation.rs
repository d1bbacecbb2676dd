use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FieldErrors;
use crate::services::ServiceError;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email regex"));

/// E.164-style phone number.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+?[1-9]\d{1,14}$").expect("valid phone regex"));

/// Collects per-field errors; the first failure for a field wins.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, format!("{} is required", field));
        }
        self
    }

    pub fn length(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) -> &mut Self {
        if let Some(value) = value {
            let len = value.trim().chars().count();
            if len < min || len > max {
                if min == 0 {
                    self.fail(field, format!("{} must be at most {} characters", field, max));
                } else {
                    self.fail(field, format!("{} must be between {} and {} characters", field, min, max));
                }
            }
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value {
            if !EMAIL_RE.is_match(value.trim()) {
                self.fail(field, format!("{} must be a valid email address", field));
            }
        }
        self
    }

    pub fn phone(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) {
            if !PHONE_RE.is_match(value) {
                self.fail(field, "Phone number should be valid");
            }
        }
        self
    }

    pub fn positive(&mut self, field: &str, value: Option<i32>) -> &mut Self {
        if matches!(value, Some(v) if v <= 0) {
            self.fail(field, format!("{} must be positive", field));
        }
        self
    }

    pub fn check(&mut self, field: &str, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.fail(field, message);
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), ServiceError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(std::mem::take(&mut self.errors)))
        }
    }
}

/// Trim, turning blank strings into `None`.
pub fn clean(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(v: &mut Validator) -> FieldErrors {
        match v.finish() {
            Err(ServiceError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn collects_first_error_per_field() {
        let mut v = Validator::new();
        v.required("firstName", " ")
            .length("firstName", Some(" "), 2, 50)
            .email("email", Some("not-an-email"))
            .positive("age", Some(0));

        let errors = errors(&mut v);
        assert_eq!(errors["firstName"], "firstName is required");
        assert!(errors["email"].contains("valid email"));
        assert!(errors.contains_key("age"));
    }

    #[test]
    fn valid_input_passes() {
        let mut v = Validator::new();
        v.required("email", "ana@example.com")
            .email("email", Some("ana@example.com"))
            .phone("phone", Some("+573000000000"))
            .length("city", Some("Bogota"), 0, 100)
            .positive("age", None);
        assert!(v.finish().is_ok());
    }

    #[test]
    fn phone_numbers_follow_e164() {
        let mut v = Validator::new();
        v.phone("phone", Some("0123"));
        assert!(errors(&mut v).contains_key("phone"));

        let mut v = Validator::new();
        v.phone("phone", Some("  "));
        assert!(v.finish().is_ok());
    }

    #[test]
    fn clean_drops_blank_values() {
        assert_eq!(clean(Some("  Bogota ")), Some("Bogota".to_string()));
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(clean(None), None);
        assert_eq!(normalize_email(" Ana@Example.COM "), "ana@example.com");
    }
}
