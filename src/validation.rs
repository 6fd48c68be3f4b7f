//! Contact form field rules.

use std::fmt;

use crate::Result;
use crate::regex::Regex;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
const PHONE_PATTERN: &str = r"^[\+]?[0-9\s\-\(\)]{10,}$";

/// Which format rule a field is checked against, from its `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Phone,
    Other,
}

impl FieldKind {
    pub fn from_type_attr(kind: Option<&str>) -> Self {
        match kind.map(str::to_ascii_lowercase).as_deref() {
            Some("email") => Self::Email,
            Some("tel") => Self::Phone,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Required,
    InvalidEmail,
    InvalidPhone,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Required => "This field is required",
            Self::InvalidEmail => "Please enter a valid email address",
            Self::InvalidPhone => "Please enter a valid phone number",
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone)]
pub(crate) struct FieldValidator {
    email: Regex,
    phone: Regex,
}

impl FieldValidator {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            email: Regex::new(EMAIL_PATTERN)?,
            phone: Regex::new(PHONE_PATTERN)?,
        })
    }

    /// Checks a raw field value. Format rules only apply to non-empty values.
    pub(crate) fn validate(
        &self,
        raw_value: &str,
        required: bool,
        kind: FieldKind,
    ) -> Result<std::result::Result<(), ValidationError>> {
        let value = raw_value.trim();
        if value.is_empty() {
            return Ok(if required {
                Err(ValidationError::Required)
            } else {
                Ok(())
            });
        }

        let (rule, failure) = match kind {
            FieldKind::Email => (&self.email, ValidationError::InvalidEmail),
            FieldKind::Phone => (&self.phone, ValidationError::InvalidPhone),
            FieldKind::Other => return Ok(Ok(())),
        };
        tracing::trace!(pattern = rule.as_str(), "checking field format");
        Ok(if rule.is_match(value)? {
            Ok(())
        } else {
            Err(failure)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn check(value: &str, required: bool, kind: FieldKind) -> std::result::Result<(), ValidationError> {
        FieldValidator::new()
            .and_then(|validator| validator.validate(value, required, kind))
            .expect("patterns compile")
    }

    #[test]
    fn email_shape_requires_local_domain_and_tld() {
        assert_eq!(check("user@example.com", true, FieldKind::Email), Ok(()));
        assert_eq!(
            check("user@", true, FieldKind::Email),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            check("user@example", false, FieldKind::Email),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            check("us er@example.com", false, FieldKind::Email),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(check("  a@b.co  ", true, FieldKind::Email), Ok(()));
    }

    #[test]
    fn phone_needs_ten_allowed_characters() {
        assert_eq!(check("+1 (555) 123-4567", true, FieldKind::Phone), Ok(()));
        assert_eq!(check("5551234567", true, FieldKind::Phone), Ok(()));
        assert_eq!(
            check("123", true, FieldKind::Phone),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            check("555-123-456x", true, FieldKind::Phone),
            Err(ValidationError::InvalidPhone)
        );
        assert_eq!(
            check("++15551234567", true, FieldKind::Phone),
            Err(ValidationError::InvalidPhone)
        );
    }

    #[test]
    fn empty_values_only_fail_when_required() {
        assert_eq!(
            check("   ", true, FieldKind::Other),
            Err(ValidationError::Required)
        );
        assert_eq!(check("", false, FieldKind::Email), Ok(()));
        assert_eq!(check("", false, FieldKind::Phone), Ok(()));
        assert_eq!(
            ValidationError::Required.to_string(),
            "This field is required"
        );
    }

    #[test]
    fn field_kind_follows_type_attribute() {
        assert_eq!(FieldKind::from_type_attr(Some("EMAIL")), FieldKind::Email);
        assert_eq!(FieldKind::from_type_attr(Some("tel")), FieldKind::Phone);
        assert_eq!(FieldKind::from_type_attr(Some("text")), FieldKind::Other);
        assert_eq!(FieldKind::from_type_attr(None), FieldKind::Other);
    }

    proptest! {
        #[test]
        fn short_phone_numbers_never_pass(digits in "[0-9]{1,9}") {
            prop_assert_eq!(
                check(&digits, true, FieldKind::Phone),
                Err(ValidationError::InvalidPhone)
            );
        }

        #[test]
        fn plain_addresses_pass(local in "[a-z0-9.]{1,12}", domain in "[a-z0-9]{1,12}", tld in "[a-z]{2,6}") {
            let address = format!("{local}@{domain}.{tld}");
            prop_assert_eq!(check(&address, true, FieldKind::Email), Ok(()));
        }
    }
}
