// src/forms/form_state.rs

//! Componente genérico de formulário: valores, máscaras e erros por campo.
//!
//! Cada tela descreve seus campos num [`FormSchema`] (campo -> regra) e usa um
//! [`FormState`] para aplicar as máscaras a cada alteração, validar tudo de uma
//! vez no envio e só então chamar o serviço remoto.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::future::Future;
use std::hash::Hash;

use tracing::Instrument;

use crate::common::error::AppError;

/// Identificador de campo de um formulário.
pub trait FormField: Copy + Eq + Hash + 'static {
    /// Nome do campo como aparece no JSON (camelCase).
    fn name(self) -> &'static str;
}

pub type FieldValues<F> = HashMap<F, String>;

type Formatter = fn(&str) -> String;
type Check<F> = Box<dyn Fn(&str, &FieldValues<F>) -> bool + Send + Sync>;

/// Regra de um campo: máscara opcional, mensagem de obrigatório e checagens.
///
/// As checagens só rodam quando o valor não está vazio; a primeira que falhar
/// define a mensagem do campo.
pub struct FieldRule<F: FormField> {
    formatter: Option<Formatter>,
    required_message: Option<&'static str>,
    checks: Vec<(Check<F>, &'static str)>,
}

impl<F: FormField> Default for FieldRule<F> {
    fn default() -> Self {
        Self {
            formatter: None,
            required_message: None,
            checks: Vec::new(),
        }
    }
}

impl<F: FormField> FieldRule<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formatted_with(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn required(mut self, message: &'static str) -> Self {
        self.required_message = Some(message);
        self
    }

    pub fn check(self, predicate: fn(&str) -> bool, message: &'static str) -> Self {
        self.check_with(move |value, _| predicate(value), message)
    }

    /// Checagem com acesso aos outros campos (ex.: confirmação de senha).
    pub fn check_with<P>(mut self, predicate: P, message: &'static str) -> Self
    where
        P: Fn(&str, &FieldValues<F>) -> bool + Send + Sync + 'static,
    {
        self.checks.push((Box::new(predicate), message));
        self
    }

    fn format(&self, raw: &str) -> String {
        match self.formatter {
            Some(formatter) => formatter(raw),
            None => raw.to_string(),
        }
    }

    fn evaluate(&self, value: &str, values: &FieldValues<F>) -> Option<&'static str> {
        if value.trim().is_empty() {
            return self.required_message;
        }

        self.checks
            .iter()
            .find(|(check, _)| !check(value, values))
            .map(|(_, message)| *message)
    }
}

/// Mapa campo -> regra de um formulário.
pub struct FormSchema<F: FormField> {
    rules: HashMap<F, FieldRule<F>>,
}

impl<F: FormField> Default for FormSchema<F> {
    fn default() -> Self {
        Self { rules: HashMap::new() }
    }
}

impl<F: FormField> FormSchema<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: F, rule: FieldRule<F>) -> Self {
        self.rules.insert(field, rule);
        self
    }
}

/// Falha no envio: ou o formulário não passou na validação (nada foi
/// enviado), ou o serviço remoto recusou.
#[derive(Debug)]
pub enum SubmitError<F, E> {
    Invalid(HashMap<F, &'static str>),
    Rejected(E),
}

impl<F: FormField> From<SubmitError<F, AppError>> for AppError {
    fn from(err: SubmitError<F, AppError>) -> Self {
        match err {
            SubmitError::Invalid(errors) => AppError::InvalidForm(
                errors
                    .into_iter()
                    .map(|(field, message)| (field.name().to_string(), message.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            ),
            SubmitError::Rejected(e) => e,
        }
    }
}

/// Estado de um formulário em edição.
pub struct FormState<F: FormField> {
    schema: FormSchema<F>,
    values: FieldValues<F>,
    errors: HashMap<F, &'static str>,
}

impl<F: FormField> FormState<F> {
    pub fn new(schema: FormSchema<F>) -> Self {
        Self {
            schema,
            values: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    /// Aplica a máscara do campo e limpa o erro que ele tinha.
    pub fn set(&mut self, field: F, raw: &str) -> &str {
        let formatted = match self.schema.rules.get(&field) {
            Some(rule) => rule.format(raw),
            None => raw.to_string(),
        };
        self.errors.remove(&field);
        self.values.insert(field, formatted);
        self.value(field)
    }

    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Valor sem espaços nas pontas, ou `None` se vazio.
    pub fn non_empty(&self, field: F) -> Option<String> {
        let value = self.value(field).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn values(&self) -> &FieldValues<F> {
        &self.values
    }

    pub fn error(&self, field: F) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> &HashMap<F, &'static str> {
        &self.errors
    }

    /// Valida todos os campos de `required` de uma vez.
    ///
    /// Os erros anteriores são substituídos pelo resultado desta chamada.
    pub fn validate(&mut self, required: &HashSet<F>) -> bool {
        let mut errors = HashMap::new();
        for field in required {
            let Some(rule) = self.schema.rules.get(field) else {
                continue;
            };
            if let Some(message) = rule.evaluate(self.value(*field), &self.values) {
                errors.insert(*field, message);
            }
        }

        self.errors = errors;
        self.errors.is_empty()
    }

    /// Valida e, se tudo estiver certo, entrega um retrato dos valores ao
    /// serviço remoto. Os valores digitados são mantidos em caso de falha.
    ///
    /// O envio em andamento aparece como o span `form_submit`, que fecha ao
    /// fim da chamada ou quando o futuro é abandonado.
    pub async fn submit<T, E, Fut, Op>(
        &mut self,
        required: &HashSet<F>,
        op: Op,
    ) -> Result<T, SubmitError<F, E>>
    where
        Op: FnOnce(FieldValues<F>) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.validate(required) {
            return Err(SubmitError::Invalid(self.errors.clone()));
        }

        let span = tracing::debug_span!("form_submit", fields = self.values.len());
        op(self.values.clone())
            .instrument(span)
            .await
            .map_err(SubmitError::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::validation::{format_zip_code, validate_zip_code};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Field {
        Name,
        Zip,
        Note,
    }

    impl FormField for Field {
        fn name(self) -> &'static str {
            match self {
                Field::Name => "name",
                Field::Zip => "zipCode",
                Field::Note => "note",
            }
        }
    }

    fn schema() -> FormSchema<Field> {
        FormSchema::new()
            .field(Field::Name, FieldRule::new().required("Nome é obrigatório"))
            .field(
                Field::Zip,
                FieldRule::new()
                    .formatted_with(format_zip_code)
                    .required("CEP é obrigatório")
                    .check(validate_zip_code, "CEP inválido"),
            )
            .field(Field::Note, FieldRule::new().check(|v| v.len() < 5, "Muito longa"))
    }

    fn all() -> HashSet<Field> {
        [Field::Name, Field::Zip, Field::Note].into_iter().collect()
    }

    #[test]
    fn set_applies_the_field_mask() {
        let mut form = FormState::new(schema());
        assert_eq!(form.set(Field::Zip, "12345678"), "12345-678");
        assert_eq!(form.set(Field::Name, "  Ana "), "  Ana ");
    }

    #[test]
    fn validate_flags_every_failing_field_at_once() {
        let mut form = FormState::new(schema());
        form.set(Field::Zip, "123");
        form.set(Field::Note, "texto longo");

        assert!(!form.validate(&all()));
        assert_eq!(form.error(Field::Name), Some("Nome é obrigatório"));
        assert_eq!(form.error(Field::Zip), Some("CEP inválido"));
        assert_eq!(form.error(Field::Note), Some("Muito longa"));
    }

    #[test]
    fn optional_field_without_value_passes() {
        let mut form = FormState::new(schema());
        form.set(Field::Name, "Ana");
        form.set(Field::Zip, "12345-678");
        assert!(form.validate(&all()));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn only_required_fields_are_validated() {
        let mut form = FormState::new(schema());
        let required = [Field::Name].into_iter().collect();
        form.set(Field::Name, "Ana");
        assert!(form.validate(&required));
    }

    #[test]
    fn editing_a_flagged_field_clears_its_error() {
        let mut form = FormState::new(schema());
        assert!(!form.validate(&all()));
        assert!(form.error(Field::Name).is_some());

        form.set(Field::Name, "A");
        assert_eq!(form.error(Field::Name), None);
        assert!(form.error(Field::Zip).is_some());
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_remote_call() {
        let mut form = FormState::new(schema());
        let mut called = false;

        let result: Result<(), SubmitError<Field, ()>> = form
            .submit(&all(), |_| {
                called = true;
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(SubmitError::Invalid(ref e)) if e.len() == 2));
        assert!(!called);
    }

    #[tokio::test]
    async fn rejected_submission_keeps_entered_values() {
        let mut form = FormState::new(schema());
        form.set(Field::Name, "Ana");
        form.set(Field::Zip, "12345678");

        let result: Result<(), _> = form
            .submit(&all(), |values| async move {
                assert_eq!(values[&Field::Zip], "12345-678");
                Err("falha remota")
            })
            .await;

        assert!(matches!(result, Err(SubmitError::Rejected("falha remota"))));
        assert_eq!(form.value(Field::Name), "Ana");
    }

    #[tokio::test]
    async fn abandoned_submission_leaves_the_form_ready_to_retry() {
        let mut form = FormState::new(schema());
        form.set(Field::Name, "Ana");
        form.set(Field::Zip, "12345678");

        // Chamada remota que nunca termina, cancelada pelo timeout
        let required = all();
        let pending = form.submit(&required, |_| std::future::pending::<Result<(), ()>>());
        let timed_out =
            tokio::time::timeout(std::time::Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());

        assert_eq!(form.value(Field::Zip), "12345-678");
        let retry: Result<&str, SubmitError<Field, ()>> =
            form.submit(&all(), |_| async { Ok("enviado") }).await;
        assert!(matches!(retry, Ok("enviado")));
        assert!(form.errors().is_empty());
    }

    #[test]
    fn invalid_submission_converts_into_field_details() {
        let mut errors = HashMap::new();
        errors.insert(Field::Zip, "CEP inválido");

        let err: AppError = SubmitError::<Field, AppError>::Invalid(errors).into();
        match err {
            AppError::InvalidForm(details) => {
                assert_eq!(details.get("zipCode").map(String::as_str), Some("CEP inválido"));
            }
            other => panic!("esperava InvalidForm, veio {other:?}"),
        }
    }
}
