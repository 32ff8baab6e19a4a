//! Field validators for student creation input.
//!
//! # Responsibility
//! - Check one request field's format per validator variant.
//! - Run all validators in a fixed declared order, stopping at the first
//!   failure.
//!
//! # Invariants
//! - Validators are pure: no storage access, no logging of field values.
//! - Identity number is checked for length only. Content is not inspected,
//!   so an 11-character non-digit value passes.
//! - Fields are checked exactly as given. Surrounding whitespace is rejected,
//!   not trimmed, so a stored value always equals the validated one.

use crate::model::student::StudentCreateRequest;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const IDENTITY_NUMBER_LEN: usize = 11;
pub const PERSON_NAME_MIN_CHARS: usize = 2;
pub const PERSON_NAME_MAX_CHARS: usize = 50;
pub const SCHOOL_NAME_MAX_CHARS: usize = 100;

static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{10,13}$").expect("valid phone regex"));
static PERSON_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{L}+(?:[ '\-]\p{L}+)*$").expect("valid person name regex"));

/// Order in which `validate_student_create` applies validators.
pub const STUDENT_CREATE_VALIDATORS: [FieldValidator; 5] = [
    FieldValidator::IdentityNumber,
    FieldValidator::PhoneNumber,
    FieldValidator::Name,
    FieldValidator::Surname,
    FieldValidator::SchoolName,
];

/// Request field covered by one validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldValidator {
    IdentityNumber,
    PhoneNumber,
    Name,
    Surname,
    SchoolName,
}

/// Validation failure raised by the first violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No request was supplied at all.
    MissingInput,
    /// A field is present but malformed.
    InvalidFormat {
        field: FieldValidator,
        message: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingInput => write!(f, "student create request is missing"),
            Self::InvalidFormat { field, message } => {
                write!(f, "invalid {}: {message}", field.field_name())
            }
        }
    }
}

impl Error for ValidationError {}

impl FieldValidator {
    /// Stable snake_case field name used in errors and logs.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::IdentityNumber => "identity_number",
            Self::PhoneNumber => "phone_number",
            Self::Name => "name",
            Self::Surname => "surname",
            Self::SchoolName => "school_name",
        }
    }

    /// Checks this validator's field on `request`.
    ///
    /// # Errors
    /// - `MissingInput` when `request` is `None`.
    /// - `InvalidFormat` when the field breaks this validator's rule.
    pub fn validate(self, request: Option<&StudentCreateRequest>) -> Result<(), ValidationError> {
        let request = request.ok_or(ValidationError::MissingInput)?;
        let ok = match self {
            Self::IdentityNumber => request.identity_number.chars().count() == IDENTITY_NUMBER_LEN,
            Self::PhoneNumber => PHONE_NUMBER_RE.is_match(&request.phone_number),
            Self::Name => is_valid_person_name(&request.name),
            Self::Surname => is_valid_person_name(&request.surname),
            Self::SchoolName => is_valid_school_name(&request.school_name),
        };

        if ok {
            Ok(())
        } else {
            Err(ValidationError::InvalidFormat {
                field: self,
                message: self.rule(),
            })
        }
    }

    fn rule(self) -> &'static str {
        match self {
            Self::IdentityNumber => "identity number must contain 11 digits",
            Self::PhoneNumber => "phone number must be 10 to 13 digits with optional leading `+`",
            Self::Name => "name must be 2 to 50 letters",
            Self::Surname => "surname must be 2 to 50 letters",
            Self::SchoolName => "school name must be 1 to 100 characters without outer spaces",
        }
    }
}

/// Runs every create-path validator in declared order.
///
/// Returns the first failure; later validators are not evaluated.
pub fn validate_student_create(
    request: Option<&StudentCreateRequest>,
) -> Result<(), ValidationError> {
    STUDENT_CREATE_VALIDATORS
        .iter()
        .try_for_each(|validator| validator.validate(request))
}

fn is_valid_person_name(value: &str) -> bool {
    let len = value.chars().count();
    (PERSON_NAME_MIN_CHARS..=PERSON_NAME_MAX_CHARS).contains(&len) && PERSON_NAME_RE.is_match(value)
}

fn is_valid_school_name(value: &str) -> bool {
    let len = value.chars().count();
    len > 0 && len <= SCHOOL_NAME_MAX_CHARS && value.trim() == value
}

#[cfg(test)]
mod tests {
    use super::{validate_student_create, FieldValidator, ValidationError};
    use crate::model::address::AddressCreateRequest;
    use crate::model::student::StudentCreateRequest;

    fn valid_request() -> StudentCreateRequest {
        StudentCreateRequest {
            identity_number: "12345678901".to_string(),
            name: "Ayşe".to_string(),
            surname: "Yılmaz-Demir".to_string(),
            school_name: "Ankara Fen Lisesi".to_string(),
            phone_number: "+905551112233".to_string(),
            address: AddressCreateRequest::new("Ankara", "Çankaya", "Atatürk Blv."),
        }
    }

    fn invalid_field(err: ValidationError) -> FieldValidator {
        match err {
            ValidationError::InvalidFormat { field, .. } => field,
            other => panic!("expected InvalidFormat, got {other:?}"),
        }
    }

    #[test]
    fn absent_request_is_missing_input_for_every_validator() {
        for validator in super::STUDENT_CREATE_VALIDATORS {
            assert_eq!(validator.validate(None), Err(ValidationError::MissingInput));
        }
    }

    #[test]
    fn identity_number_must_be_exactly_eleven_chars() {
        let mut request = valid_request();
        for candidate in ["", "1234567890", "123456789012"] {
            request.identity_number = candidate.to_string();
            let err = FieldValidator::IdentityNumber
                .validate(Some(&request))
                .expect_err("wrong length must fail");
            assert_eq!(invalid_field(err), FieldValidator::IdentityNumber);
        }

        request.identity_number = "12345678901".to_string();
        assert!(FieldValidator::IdentityNumber
            .validate(Some(&request))
            .is_ok());
    }

    #[test]
    fn identity_number_content_is_not_checked() {
        let mut request = valid_request();
        request.identity_number = "abcdefghijk".to_string();
        assert!(FieldValidator::IdentityNumber
            .validate(Some(&request))
            .is_ok());
    }

    #[test]
    fn identity_number_length_counts_chars_not_bytes() {
        let mut request = valid_request();
        request.identity_number = "ççççççççççç".to_string();
        assert!(FieldValidator::IdentityNumber
            .validate(Some(&request))
            .is_ok());
    }

    #[test]
    fn phone_number_accepts_plain_and_plus_prefixed_digits() {
        let mut request = valid_request();
        for ok in ["05551112233", "+905551112233", "5551112233"] {
            request.phone_number = ok.to_string();
            assert!(
                FieldValidator::PhoneNumber.validate(Some(&request)).is_ok(),
                "{ok} should pass"
            );
        }
        for bad in ["555-111-22", "555111", "+90 555 111 22 33", "phone"] {
            request.phone_number = bad.to_string();
            assert!(
                FieldValidator::PhoneNumber
                    .validate(Some(&request))
                    .is_err(),
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn person_names_reject_digits_and_single_letters() {
        let mut request = valid_request();
        request.name = "A".to_string();
        assert!(FieldValidator::Name.validate(Some(&request)).is_err());
        request.name = "Al1".to_string();
        assert!(FieldValidator::Name.validate(Some(&request)).is_err());
        request.name = "Mehmet Ali".to_string();
        assert!(FieldValidator::Name.validate(Some(&request)).is_ok());

        request.surname = "O'Neil".to_string();
        assert!(FieldValidator::Surname.validate(Some(&request)).is_ok());
        request.surname = "  ".to_string();
        assert!(FieldValidator::Surname.validate(Some(&request)).is_err());
    }

    #[test]
    fn school_name_must_be_non_blank_and_bounded() {
        let mut request = valid_request();
        request.school_name = "   ".to_string();
        assert!(FieldValidator::SchoolName.validate(Some(&request)).is_err());
        request.school_name = "x".repeat(101);
        assert!(FieldValidator::SchoolName.validate(Some(&request)).is_err());
        request.school_name = "x".repeat(100);
        assert!(FieldValidator::SchoolName.validate(Some(&request)).is_ok());
    }

    #[test]
    fn padded_values_are_rejected_instead_of_trimmed() {
        let mut request = valid_request();
        request.phone_number = " 05551112233".to_string();
        assert!(FieldValidator::PhoneNumber
            .validate(Some(&request))
            .is_err());

        let mut request = valid_request();
        request.name = "Ayşe ".to_string();
        assert!(FieldValidator::Name.validate(Some(&request)).is_err());
        request.surname = " Yılmaz".to_string();
        assert!(FieldValidator::Surname.validate(Some(&request)).is_err());
        request.school_name = "Ankara Fen Lisesi\t".to_string();
        assert!(FieldValidator::SchoolName.validate(Some(&request)).is_err());
    }

    #[test]
    fn first_failure_wins_in_declared_order() {
        let mut request = valid_request();
        request.phone_number = "bad".to_string();
        request.school_name = String::new();
        let err = validate_student_create(Some(&request)).expect_err("should fail");
        assert_eq!(invalid_field(err), FieldValidator::PhoneNumber);

        request.identity_number = "1".to_string();
        let err = validate_student_create(Some(&request)).expect_err("should fail");
        assert_eq!(invalid_field(err), FieldValidator::IdentityNumber);
    }

    #[test]
    fn valid_request_passes_all_validators() {
        assert!(validate_student_create(Some(&valid_request())).is_ok());
    }
}
