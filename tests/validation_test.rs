use consultorio::domain::validation::{
    FormErrors, FormField, RegistrationError, RegistrationForm, UserForm, revalidate_field,
    validate_email, validate_form, validate_password, validate_registration, validate_username,
};

fn valid_psychologist() -> UserForm {
    UserForm {
        name: "Lucía Fernández".into(),
        username: "lfernandez".into(),
        email: "lucia@bienestar.pe".into(),
        password: "secreta1".into(),
        phone: Some("+51 987 654 321".into()),
        specialty: Some("Terapia Familiar".into()),
    }
}

#[test]
fn test_validator_scenarios() {
    assert!(validate_email("a@b.com"));
    assert!(!validate_email("a@b"));
    assert!(!validate_username("ab"));
    assert!(validate_username("valid_user1"));
    assert!(!validate_password("12345"));
    assert!(validate_password("123456"));
}

#[test]
fn test_valid_form_has_no_errors() {
    assert!(validate_form(&valid_psychologist(), false).is_empty());
}

#[test]
fn test_every_bad_field_is_reported() {
    let form = UserForm {
        name: "R2D2".into(),
        username: "a b".into(),
        email: "nope".into(),
        password: "123".into(),
        phone: Some("call me".into()),
        specialty: None,
    };
    let errors = validate_form(&form, false);
    let fields: Vec<FormField> = errors.keys().copied().collect();
    assert_eq!(
        fields,
        vec![
            FormField::Name,
            FormField::Username,
            FormField::Email,
            FormField::Password,
            FormField::Phone,
            FormField::Specialty,
        ]
    );
}

#[test]
fn test_patients_do_not_need_specialty() {
    let mut form = valid_psychologist();
    form.specialty = None;

    assert!(validate_form(&form, true).is_empty());
    let errors = validate_form(&form, false);
    assert!(errors.contains_key(&FormField::Specialty));
}

#[test]
fn test_phone_is_optional() {
    let mut form = valid_psychologist();
    form.phone = None;
    assert!(validate_form(&form, false).is_empty());

    form.phone = Some(String::new());
    assert!(validate_form(&form, false).is_empty());
}

#[test]
fn test_revalidate_clears_error_once_value_is_valid() {
    let mut errors = FormErrors::new();
    errors.insert(FormField::Email, "Enter a valid email".into());

    let next = revalidate_field(&errors, FormField::Email, "ana@clinica.pe");
    assert!(next.is_empty());
}

#[test]
fn test_revalidate_replaces_error_with_live_hint() {
    let mut errors = FormErrors::new();
    errors.insert(FormField::Username, "Username must be 3-20 alphanumeric characters".into());

    let next = revalidate_field(&errors, FormField::Username, "bad name!");
    assert_eq!(
        next.get(&FormField::Username).map(String::as_str),
        Some("Only letters, numbers and underscores")
    );
}

#[test]
fn test_revalidate_ignores_empty_value() {
    let mut errors = FormErrors::new();
    errors.insert(
        FormField::Name,
        "Name must contain only letters and be 2-50 characters long".into(),
    );

    let next = revalidate_field(&errors, FormField::Name, "");
    assert_eq!(next, errors);
}

#[test]
fn test_revalidate_password_only_clears() {
    let mut errors = FormErrors::new();
    errors.insert(FormField::Password, "Password must be at least 6 characters long".into());

    let next = revalidate_field(&errors, FormField::Password, "123");
    assert!(next.is_empty());
}

#[test]
fn test_registration_reports_first_problem() {
    let mut form = RegistrationForm {
        name: "Pedro Salas".into(),
        username: "psalas".into(),
        email: "pedro@correo.pe".into(),
        password: "abcdef".into(),
        confirm_password: "abcdef".into(),
        accept_terms: true,
    };
    assert_eq!(validate_registration(&form), Ok(()));

    form.confirm_password = "abcdeg".into();
    assert_eq!(validate_registration(&form), Err(RegistrationError::PasswordMismatch));

    form.email = "pedro".into();
    assert_eq!(validate_registration(&form), Err(RegistrationError::InvalidEmail));

    form.name = "   ".into();
    assert_eq!(validate_registration(&form), Err(RegistrationError::NameRequired));
}

#[test]
fn test_registration_requires_terms() {
    let form = RegistrationForm {
        name: "Pedro Salas".into(),
        username: "psalas".into(),
        email: "pedro@correo.pe".into(),
        password: "abcdef".into(),
        confirm_password: "abcdef".into(),
        accept_terms: false,
    };
    assert_eq!(validate_registration(&form), Err(RegistrationError::TermsNotAccepted));
}
