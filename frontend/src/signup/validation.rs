use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::config;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

/// Raw field values as typed into the form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub name: String,
    pub age: String,
    pub email: String,
}

impl FormInput {
    pub fn new(name: &str, age: &str, email: &str) -> Self {
        Self {
            name: name.to_string(),
            age: age.to_string(),
            email: email.to_string(),
        }
    }
}

/// Form data that passed every rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidForm {
    pub name: String,
    pub age: i32,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a valid name.")]
    Name,
    #[error("Age must be between 13 and 19.")]
    Age,
    #[error("If provided, email must be valid.")]
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn contains(&self, err: ValidationError) -> bool {
        self.0.contains(&err)
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.to_string()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate(input: &FormInput) -> Result<ValidForm, ValidationErrors> {
    let mut errors = Vec::new();

    let name = input.name.trim();
    if name.chars().count() < 2 {
        errors.push(ValidationError::Name);
    }

    let age = input
        .age
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|age| (config::MIN_AGE..=config::MAX_AGE).contains(age));
    if age.is_none() {
        errors.push(ValidationError::Age);
    }

    let email = input.email.trim();
    if !email.is_empty() && !EMAIL_RE.is_match(email) {
        errors.push(ValidationError::Email);
    }

    match age {
        Some(age) if errors.is_empty() => Ok(ValidForm {
            name: name.to_string(),
            age,
            email: (!email.is_empty()).then(|| email.to_string()),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_minimal_valid_input() {
        let form = validate(&FormInput::new("Asha", "15", "")).unwrap();
        assert_eq!(form.name, "Asha");
        assert_eq!(form.age, 15);
        assert_eq!(form.email, None);
    }

    #[test]
    fn trims_fields() {
        let form = validate(&FormInput::new("  Jo ", " 19 ", " jo@mail.fi ")).unwrap();
        assert_eq!(form.name, "Jo");
        assert_eq!(form.age, 19);
        assert_eq!(form.email.as_deref(), Some("jo@mail.fi"));
    }

    #[test]
    fn rejects_short_or_blank_names() {
        for name in ["", " ", "A", "  B  "] {
            let errs = validate(&FormInput::new(name, "15", "")).unwrap_err();
            assert_eq!(errs.errors(), &[ValidationError::Name], "name {:?}", name);
            assert_eq!(errs.to_string(), "Please enter a valid name.");
        }
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        assert!(validate(&FormInput::new("Ää", "14", "")).is_ok());
        assert!(validate(&FormInput::new("Ä", "14", "")).is_err());
    }

    #[test]
    fn age_bounds_are_inclusive() {
        for ok in ["13", "16", "19"] {
            assert!(validate(&FormInput::new("Asha", ok, "")).is_ok(), "age {}", ok);
        }
        for bad in ["12", "20", "-15", "0", "", "abc", "15.5", "1e1"] {
            let errs = validate(&FormInput::new("Asha", bad, "")).unwrap_err();
            assert!(errs.contains(ValidationError::Age), "age {:?}", bad);
            assert_eq!(errs.to_string(), "Age must be between 13 and 19.");
        }
    }

    #[test]
    fn email_is_optional_but_checked_when_present() {
        assert!(validate(&FormInput::new("Asha", "15", "   ")).is_ok());
        assert!(validate(&FormInput::new("Asha", "15", "a@b.co")).is_ok());
        for bad in ["asha", "asha@", "@mail.com", "asha@mail", "as ha@mail.com", "asha@mail."] {
            let errs = validate(&FormInput::new("Asha", "15", bad)).unwrap_err();
            assert_eq!(errs.errors(), &[ValidationError::Email], "email {:?}", bad);
        }
    }

    #[test]
    fn all_failures_are_reported_together() {
        let errs = validate(&FormInput::new("", "42", "nope")).unwrap_err();
        assert_eq!(
            errs.to_string(),
            "Please enter a valid name. Age must be between 13 and 19. If provided, email must be valid."
        );
    }
}
