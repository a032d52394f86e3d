// src/forms/auth_forms.rs

// Formulários das telas públicas: cadastro, login e recuperação de senha.

use std::collections::HashSet;

use crate::{
    common::validation::validate_email,
    models::auth::{ForgotPasswordPayload, LoginUserPayload, RegisterUserPayload},
};

use super::form_state::{FieldRule, FormField, FormSchema, FormState};

const MIN_PASSWORD_CHARS: usize = 6;

fn long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS
}

// ---
// Cadastro
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterField {
    Name,
    Email,
    Password,
    ConfirmPassword,
}

impl FormField for RegisterField {
    fn name(self) -> &'static str {
        match self {
            RegisterField::Name => "name",
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmPassword => "confirmPassword",
        }
    }
}

impl RegisterField {
    pub fn all() -> HashSet<RegisterField> {
        [
            RegisterField::Name,
            RegisterField::Email,
            RegisterField::Password,
            RegisterField::ConfirmPassword,
        ]
        .into_iter()
        .collect()
    }
}

fn register_schema() -> FormSchema<RegisterField> {
    FormSchema::new()
        .field(RegisterField::Name, FieldRule::new().required("Nome é obrigatório"))
        .field(
            RegisterField::Email,
            FieldRule::new()
                .required("Email é obrigatório")
                .check(validate_email, "Email inválido"),
        )
        .field(
            RegisterField::Password,
            FieldRule::new()
                .required("Senha é obrigatória")
                .check(long_enough, "Senha deve ter no mínimo 6 caracteres"),
        )
        .field(
            RegisterField::ConfirmPassword,
            FieldRule::new()
                .required("Confirmação de senha é obrigatória")
                .check_with(
                    |confirm, values| {
                        values
                            .get(&RegisterField::Password)
                            .is_some_and(|password| password == confirm)
                    },
                    "As senhas não coincidem",
                ),
        )
}

pub fn register_form(payload: &RegisterUserPayload) -> FormState<RegisterField> {
    let mut form = FormState::new(register_schema());
    form.set(RegisterField::Name, &payload.name);
    form.set(RegisterField::Email, payload.email.trim());
    form.set(RegisterField::Password, &payload.password);
    form.set(RegisterField::ConfirmPassword, &payload.confirm_password);
    form
}

// ---
// Login
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    fn name(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }
}

impl LoginField {
    pub fn all() -> HashSet<LoginField> {
        [LoginField::Email, LoginField::Password].into_iter().collect()
    }
}

const FILL_ALL_FIELDS: &str = "Por favor, preencha todos os campos.";

pub fn login_form(payload: &LoginUserPayload) -> FormState<LoginField> {
    let schema = FormSchema::new()
        .field(LoginField::Email, FieldRule::new().required(FILL_ALL_FIELDS))
        .field(LoginField::Password, FieldRule::new().required(FILL_ALL_FIELDS));

    let mut form = FormState::new(schema);
    form.set(LoginField::Email, payload.email.trim());
    form.set(LoginField::Password, &payload.password);
    form
}

// ---
// Esqueci minha senha
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForgotPasswordField {
    Email,
}

impl FormField for ForgotPasswordField {
    fn name(self) -> &'static str {
        "email"
    }
}

impl ForgotPasswordField {
    pub fn all() -> HashSet<ForgotPasswordField> {
        HashSet::from([ForgotPasswordField::Email])
    }
}

pub fn forgot_password_form(payload: &ForgotPasswordPayload) -> FormState<ForgotPasswordField> {
    let schema = FormSchema::new().field(
        ForgotPasswordField::Email,
        FieldRule::new()
            .required("Email é obrigatório")
            .check(validate_email, "Email inválido"),
    );

    let mut form = FormState::new(schema);
    form.set(ForgotPasswordField::Email, payload.email.trim());
    form
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str, email: &str, password: &str, confirm: &str) -> RegisterUserPayload {
        RegisterUserPayload {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn complete_registration_is_valid() {
        let mut form = register_form(&payload("Ana", "ana@mail.com", "segredo", "segredo"));
        assert!(form.validate(&RegisterField::all()));
    }

    #[test]
    fn registration_reports_every_problem() {
        let mut form = register_form(&payload("  ", "ana@", "123", ""));
        assert!(!form.validate(&RegisterField::all()));
        assert_eq!(form.error(RegisterField::Name), Some("Nome é obrigatório"));
        assert_eq!(form.error(RegisterField::Email), Some("Email inválido"));
        assert_eq!(
            form.error(RegisterField::Password),
            Some("Senha deve ter no mínimo 6 caracteres")
        );
        assert_eq!(
            form.error(RegisterField::ConfirmPassword),
            Some("Confirmação de senha é obrigatória")
        );
    }

    #[test]
    fn mismatched_confirmation_is_flagged() {
        let mut form = register_form(&payload("Ana", "ana@mail.com", "segredo", "segredo!"));
        assert!(!form.validate(&RegisterField::all()));
        assert_eq!(
            form.error(RegisterField::ConfirmPassword),
            Some("As senhas não coincidem")
        );
        assert_eq!(form.errors().len(), 1);
    }

    #[test]
    fn login_requires_both_fields() {
        let mut form = login_form(&LoginUserPayload {
            email: "ana@mail.com".into(),
            password: String::new(),
        });
        assert!(!form.validate(&LoginField::all()));
        assert_eq!(form.error(LoginField::Password), Some(FILL_ALL_FIELDS));
        assert_eq!(form.error(LoginField::Email), None);
    }

    #[test]
    fn forgot_password_checks_email_format() {
        let mut form = forgot_password_form(&ForgotPasswordPayload {
            email: "ana".into(),
        });
        assert!(!form.validate(&ForgotPasswordField::all()));
        assert_eq!(form.error(ForgotPasswordField::Email), Some("Email inválido"));
    }
}
