//! Field rules for the registration and profile forms.
//!
//! Each rule is a pure predicate; the form-level helpers collect the failing
//! fields into a [`FormErrors`] map with user-facing messages.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ\s]{2,50}$").unwrap());
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]{3,20}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-\s()]{7,15}$").unwrap());

/// Letters (accented vowels and ñ included) and spaces, 2 to 50 characters.
pub fn validate_name(value: &str) -> bool {
    NAME_RE.is_match(value)
}

/// Letters, digits and underscore, 3 to 20 characters.
pub fn validate_username(value: &str) -> bool {
    USERNAME_RE.is_match(value)
}

/// One `@` with a non-empty local part and a dotted domain.
pub fn validate_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Digits, spaces, `+`, `-` and parentheses, 7 to 15 characters.
pub fn validate_phone(value: &str) -> bool {
    PHONE_RE.is_match(value)
}

pub fn validate_password(value: &str) -> bool {
    value.chars().count() >= MIN_PASSWORD_LENGTH
}

/// Same character rule as names.
pub fn validate_specialty(value: &str) -> bool {
    NAME_RE.is_match(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    #[serde(rename = "nombre")]
    Name,
    #[serde(rename = "username")]
    Username,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "password")]
    Password,
    #[serde(rename = "telefono")]
    Phone,
    #[serde(rename = "especialidad")]
    Specialty,
}

impl FormField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Name => "nombre",
            FormField::Username => "username",
            FormField::Email => "email",
            FormField::Password => "password",
            FormField::Phone => "telefono",
            FormField::Specialty => "especialidad",
        }
    }

    /// Message shown when a submitted form fails this field's rule.
    fn submit_message(&self) -> &'static str {
        match self {
            FormField::Name => "Name must contain only letters and be 2-50 characters long",
            FormField::Username => "Username must be 3-20 alphanumeric characters",
            FormField::Email => "Enter a valid email",
            FormField::Password => "Password must be at least 6 characters long",
            FormField::Phone => "Enter a valid phone number",
            FormField::Specialty => {
                "Specialty must contain only letters and be 2-50 characters long"
            }
        }
    }

    /// Shorter hint shown while the user is typing. Password has no live rule.
    fn live_message(&self) -> Option<&'static str> {
        match self {
            FormField::Name | FormField::Specialty => Some("Only letters and spaces allowed"),
            FormField::Username => Some("Only letters, numbers and underscores"),
            FormField::Email => Some("Invalid email format"),
            FormField::Phone => Some("Only digits, spaces and phone symbols"),
            FormField::Password => None,
        }
    }

    fn rule(&self) -> fn(&str) -> bool {
        match self {
            FormField::Name => validate_name,
            FormField::Username => validate_username,
            FormField::Email => validate_email,
            FormField::Password => validate_password,
            FormField::Phone => validate_phone,
            FormField::Specialty => validate_specialty,
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failing fields and their messages. Empty means the form is valid.
pub type FormErrors = BTreeMap<FormField, String>;

/// User data submitted from the admin's create/edit user forms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub specialty: Option<String>,
}

/// Run every applicable rule. Phone is optional and only checked when given;
/// specialty is required for everyone except patients.
pub fn validate_form(form: &UserForm, is_patient: bool) -> FormErrors {
    let mut errors = FormErrors::new();

    let mut check = |field: FormField, value: &str| {
        if value.is_empty() || !field.rule()(value) {
            errors.insert(field, field.submit_message().to_string());
        }
    };

    check(FormField::Name, form.name.as_str());
    check(FormField::Username, form.username.as_str());
    check(FormField::Email, form.email.as_str());
    check(FormField::Password, form.password.as_str());

    if let Some(phone) = form.phone.as_deref().filter(|p| !p.is_empty()) {
        check(FormField::Phone, phone);
    }

    if !is_patient {
        check(FormField::Specialty, form.specialty.as_deref().unwrap_or(""));
    }

    errors
}

/// Re-run a single field's rule after an edit and return the updated errors.
///
/// A non-empty value always clears the field's previous error first; a new
/// error appears only if the value itself fails the live rule. Editing a
/// field down to empty leaves its existing error alone.
pub fn revalidate_field(errors: &FormErrors, field: FormField, value: &str) -> FormErrors {
    let mut next = errors.clone();
    if value.is_empty() {
        return next;
    }

    next.remove(&field);
    if let Some(message) = field.live_message() {
        if !field.rule()(value) {
            next.insert(field, message.to_string());
        }
    }
    next
}

/// Self-registration form for new patients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub accept_terms: bool,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Full name is required")]
    NameRequired,
    #[error("Username is required")]
    UsernameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Email format is not valid")]
    InvalidEmail,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Terms and conditions must be accepted")]
    TermsNotAccepted,
}

/// Check a registration form, reporting the first problem found.
pub fn validate_registration(form: &RegistrationForm) -> Result<(), RegistrationError> {
    if form.name.trim().is_empty() {
        return Err(RegistrationError::NameRequired);
    }
    if form.username.trim().is_empty() {
        return Err(RegistrationError::UsernameRequired);
    }
    if form.email.trim().is_empty() {
        return Err(RegistrationError::EmailRequired);
    }
    if !validate_email(form.email.trim()) {
        return Err(RegistrationError::InvalidEmail);
    }
    if form.password.trim().is_empty() {
        return Err(RegistrationError::PasswordRequired);
    }
    if !validate_password(&form.password) {
        return Err(RegistrationError::PasswordTooShort);
    }
    if form.password != form.confirm_password {
        return Err(RegistrationError::PasswordMismatch);
    }
    if !form.accept_terms {
        return Err(RegistrationError::TermsNotAccepted);
    }
    Ok(())
}
