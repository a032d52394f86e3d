// src/forms/company_info.rs

// Formulário "Informações da Empresa": os campos exigidos vêm da rota
// (`?required=name,email,phone,...`).

use std::collections::{BTreeMap, HashSet};
use std::future::Future;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        validation::{
            format_document, format_instagram, format_phone, format_state, format_zip_code,
            validate_document, validate_email, validate_instagram, validate_phone,
            validate_zip_code,
        },
    },
    models::company::{
        CompanyAddress, CompanyInfo, CompanyInfoField, CompanySocialMedia, CreateCompanyInfoData,
        UpdateCompanyInfoData,
    },
};

use super::form_state::{FieldRule, FieldValues, FormField, FormSchema, FormState, SubmitError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompanyFormField {
    Logo,
    Name,
    Document,
    Email,
    Phone,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    ZipCode,
    Instagram,
}

impl FormField for CompanyFormField {
    fn name(self) -> &'static str {
        match self {
            CompanyFormField::Logo => "logo",
            CompanyFormField::Name => "name",
            CompanyFormField::Document => "document",
            CompanyFormField::Email => "email",
            CompanyFormField::Phone => "phone",
            CompanyFormField::Street => "street",
            CompanyFormField::Number => "number",
            CompanyFormField::Complement => "complement",
            CompanyFormField::Neighborhood => "neighborhood",
            CompanyFormField::City => "city",
            CompanyFormField::State => "state",
            CompanyFormField::ZipCode => "zipCode",
            CompanyFormField::Instagram => "instagram",
        }
    }
}

const ADDRESS_FIELDS: [CompanyFormField; 6] = [
    CompanyFormField::Street,
    CompanyFormField::Number,
    CompanyFormField::Neighborhood,
    CompanyFormField::City,
    CompanyFormField::State,
    CompanyFormField::ZipCode,
];

/// Campos do formulário cobertos por um grupo exigível.
pub fn form_fields(group: CompanyInfoField) -> &'static [CompanyFormField] {
    match group {
        CompanyInfoField::Logo => &[CompanyFormField::Logo],
        CompanyInfoField::Name => &[CompanyFormField::Name],
        CompanyInfoField::Document => &[CompanyFormField::Document],
        CompanyInfoField::Email => &[CompanyFormField::Email],
        CompanyInfoField::Phone => &[CompanyFormField::Phone],
        CompanyInfoField::Address => &ADDRESS_FIELDS,
        CompanyInfoField::SocialMedia => &[CompanyFormField::Instagram],
    }
}

/// Lê o parâmetro `required` (lista separada por vírgulas).
///
/// Ausente ou vazio cai no padrão `name,email,phone`; nomes desconhecidos são
/// ignorados.
pub fn parse_required(param: Option<&str>) -> HashSet<CompanyInfoField> {
    let parsed: HashSet<_> = param
        .unwrap_or_default()
        .split(',')
        .filter_map(CompanyInfoField::parse)
        .collect();

    if parsed.is_empty() {
        CompanyInfoField::DEFAULT_REQUIRED.into_iter().collect()
    } else {
        parsed
    }
}

fn schema() -> FormSchema<CompanyFormField> {
    use CompanyFormField as F;

    FormSchema::new()
        .field(F::Logo, FieldRule::new().required("Logo é obrigatória"))
        .field(F::Name, FieldRule::new().required("Nome é obrigatório"))
        .field(
            F::Document,
            FieldRule::new()
                .formatted_with(format_document)
                .required("CPF/CNPJ é obrigatório")
                .check(validate_document, "CPF/CNPJ inválido"),
        )
        .field(
            F::Email,
            FieldRule::new()
                .required("Email é obrigatório")
                .check(validate_email, "Email inválido"),
        )
        .field(
            F::Phone,
            FieldRule::new()
                .formatted_with(format_phone)
                .required("Telefone é obrigatório")
                .check(
                    validate_phone,
                    "Telefone inválido. Use (XX) XXXX-XXXX ou (XX) XXXXX-XXXX",
                ),
        )
        .field(F::Street, FieldRule::new().required("Rua é obrigatória"))
        .field(F::Number, FieldRule::new().required("Número é obrigatório"))
        .field(F::Neighborhood, FieldRule::new().required("Bairro é obrigatório"))
        .field(F::City, FieldRule::new().required("Cidade é obrigatória"))
        .field(
            F::State,
            FieldRule::new()
                .formatted_with(format_state)
                .required("Estado é obrigatório"),
        )
        .field(
            F::ZipCode,
            FieldRule::new()
                .formatted_with(format_zip_code)
                .required("CEP é obrigatório")
                .check(validate_zip_code, "CEP inválido. Use XXXXX-XXX"),
        )
        // Instagram continua opcional mesmo quando o grupo é exigido
        .field(
            F::Instagram,
            FieldRule::new()
                .formatted_with(format_instagram)
                .check(validate_instagram, "Instagram inválido"),
        )
}

// Corpo enviado pela tela: os campos planos do formulário
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyInfoFormPayload {
    pub logo: String,
    pub name: String,
    pub document: String,
    pub email: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub instagram: String,
}

/// Formulário de edição já preenchido, com o resultado da validação.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompanyFormView {
    /// Valores mascarados por campo (camelCase)
    pub values: BTreeMap<String, String>,
    /// Mensagem por campo exigido que ainda não passa na validação
    pub errors: BTreeMap<String, String>,
    pub complete: bool,
}

pub struct CompanyInfoForm {
    state: FormState<CompanyFormField>,
    required: HashSet<CompanyInfoField>,
}

impl CompanyInfoForm {
    pub fn new(required: HashSet<CompanyInfoField>) -> Self {
        Self {
            state: FormState::new(schema()),
            required,
        }
    }

    /// Preenche o formulário como se cada campo tivesse sido digitado.
    pub fn from_payload(payload: &CompanyInfoFormPayload, required: HashSet<CompanyInfoField>) -> Self {
        use CompanyFormField as F;

        let mut form = Self::new(required);
        let fields = [
            (F::Logo, &payload.logo),
            (F::Name, &payload.name),
            (F::Document, &payload.document),
            (F::Email, &payload.email),
            (F::Phone, &payload.phone),
            (F::Street, &payload.street),
            (F::Number, &payload.number),
            (F::Complement, &payload.complement),
            (F::Neighborhood, &payload.neighborhood),
            (F::City, &payload.city),
            (F::State, &payload.state),
            (F::ZipCode, &payload.zip_code),
            (F::Instagram, &payload.instagram),
        ];
        for (field, value) in fields {
            form.state.set(field, value);
        }
        form
    }

    /// Carrega um cadastro já existente para edição.
    pub fn prefill(&mut self, info: &CompanyInfo) {
        use CompanyFormField as F;

        let state = &mut self.state;
        state.set(F::Logo, info.logo.as_deref().unwrap_or_default());
        state.set(F::Name, &info.name);
        state.set(F::Document, info.document.as_deref().unwrap_or_default());
        state.set(F::Email, &info.email);
        state.set(F::Phone, &info.phone);
        if let Some(address) = &info.address {
            state.set(F::Street, &address.street);
            state.set(F::Number, &address.number);
            state.set(F::Complement, address.complement.as_deref().unwrap_or_default());
            state.set(F::Neighborhood, &address.neighborhood);
            state.set(F::City, &address.city);
            state.set(F::State, &address.state);
            state.set(F::ZipCode, &address.zip_code);
        }
        let instagram = info
            .social_media
            .as_ref()
            .and_then(|social| social.instagram.as_deref());
        state.set(F::Instagram, instagram.unwrap_or_default());
    }

    pub fn is_required(&self, group: CompanyInfoField) -> bool {
        self.required.contains(&group)
    }

    pub fn required_fields(&self) -> HashSet<CompanyFormField> {
        self.required
            .iter()
            .flat_map(|group| form_fields(*group).iter().copied())
            .collect()
    }

    pub fn state(&self) -> &FormState<CompanyFormField> {
        &self.state
    }

    pub fn validate(&mut self) -> bool {
        let required = self.required_fields();
        self.state.validate(&required)
    }

    /// Retrato do formulário para a tela de edição.
    pub fn view(&self) -> CompanyFormView {
        let state = self.state();
        let values = state
            .values()
            .iter()
            .map(|(field, value)| (field.name().to_string(), value.clone()))
            .collect();
        let errors: BTreeMap<_, _> = state
            .errors()
            .iter()
            .map(|(field, message)| (field.name().to_string(), message.to_string()))
            .collect();

        CompanyFormView {
            complete: errors.is_empty(),
            values,
            errors,
        }
    }

    /// Valida e envia os dados montados para `op` (criação no banco).
    pub async fn submit<T, E, Fut, Op>(&mut self, op: Op) -> Result<T, SubmitError<CompanyFormField, E>>
    where
        Op: FnOnce(CreateCompanyInfoData) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let required = self.required_fields();
        let include_address = self.is_required(CompanyInfoField::Address);
        let include_social = self.is_required(CompanyInfoField::SocialMedia);

        self.state
            .submit(&required, |values| {
                op(build_create_data(&values, include_address, include_social))
            })
            .await
    }
}

fn text(values: &FieldValues<CompanyFormField>, field: CompanyFormField) -> String {
    values.get(&field).cloned().unwrap_or_default()
}

fn optional(values: &FieldValues<CompanyFormField>, field: CompanyFormField) -> Option<String> {
    values.get(&field).filter(|v| !v.is_empty()).cloned()
}

fn build_create_data(
    values: &FieldValues<CompanyFormField>,
    include_address: bool,
    include_social: bool,
) -> CreateCompanyInfoData {
    use CompanyFormField as F;

    let address = include_address.then(|| CompanyAddress {
        street: text(values, F::Street),
        number: text(values, F::Number),
        complement: optional(values, F::Complement),
        neighborhood: text(values, F::Neighborhood),
        city: text(values, F::City),
        state: text(values, F::State),
        zip_code: text(values, F::ZipCode),
    });
    let social_media = include_social.then(|| CompanySocialMedia {
        instagram: optional(values, F::Instagram),
    });

    CreateCompanyInfoData {
        logo: optional(values, F::Logo),
        name: text(values, F::Name),
        document: optional(values, F::Document),
        email: text(values, F::Email),
        phone: text(values, F::Phone),
        address,
        social_media,
    }
}

/// Valida uma atualização parcial: só os campos enviados são checados, já
/// com as máscaras aplicadas. Um endereço enviado precisa estar completo.
pub fn normalize_update(data: UpdateCompanyInfoData) -> Result<UpdateCompanyInfoData, AppError> {
    use CompanyFormField as F;

    let mut state = FormState::new(schema());
    let mut required = HashSet::new();
    let mut touch = |state: &mut FormState<CompanyFormField>, field, value: &str| {
        state.set(field, value);
        required.insert(field);
    };

    if let Some(name) = &data.name {
        touch(&mut state, F::Name, name);
    }
    if let Some(document) = &data.document {
        touch(&mut state, F::Document, document);
    }
    if let Some(email) = &data.email {
        touch(&mut state, F::Email, email);
    }
    if let Some(phone) = &data.phone {
        touch(&mut state, F::Phone, phone);
    }
    if let Some(address) = &data.address {
        touch(&mut state, F::Street, &address.street);
        touch(&mut state, F::Number, &address.number);
        touch(&mut state, F::Neighborhood, &address.neighborhood);
        touch(&mut state, F::City, &address.city);
        touch(&mut state, F::State, &address.state);
        touch(&mut state, F::ZipCode, &address.zip_code);
    }
    let instagram = data
        .social_media
        .as_ref()
        .and_then(|social| social.instagram.as_deref());
    if let Some(instagram) = instagram {
        touch(&mut state, F::Instagram, instagram);
    }

    if !state.validate(&required) {
        return Err(SubmitError::<_, AppError>::Invalid(state.errors().clone()).into());
    }

    let masked = |field| state.non_empty(field);
    Ok(UpdateCompanyInfoData {
        logo: data.logo,
        name: data.name,
        document: data.document.as_ref().and(masked(F::Document)),
        email: data.email,
        phone: data.phone.as_ref().and(masked(F::Phone)),
        address: data.address.map(|address| CompanyAddress {
            state: state.value(F::State).to_string(),
            zip_code: state.value(F::ZipCode).to_string(),
            ..address
        }),
        social_media: data.social_media.map(|social| CompanySocialMedia {
            instagram: social.instagram.as_ref().and(masked(F::Instagram)),
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required(list: &str) -> HashSet<CompanyInfoField> {
        parse_required(Some(list))
    }

    fn valid_payload() -> CompanyInfoFormPayload {
        CompanyInfoFormPayload {
            name: "Trampo Certo Reformas".into(),
            email: "contato@trampocerto.com.br".into(),
            phone: "11987654321".into(),
            ..Default::default()
        }
    }

    #[test]
    fn missing_required_param_uses_default_fields() {
        let defaults: HashSet<_> = CompanyInfoField::DEFAULT_REQUIRED.into_iter().collect();
        assert_eq!(parse_required(None), defaults);
        assert_eq!(parse_required(Some("")), defaults);
        assert_eq!(parse_required(Some("bogus")), defaults);
    }

    #[test]
    fn required_param_is_comma_separated() {
        let parsed = required("name, address,socialMedia,unknown");
        assert_eq!(parsed.len(), 3);
        assert!(parsed.contains(&CompanyInfoField::Address));
        assert!(parsed.contains(&CompanyInfoField::SocialMedia));
    }

    #[test]
    fn empty_name_blocks_only_the_name_field() {
        let payload = CompanyInfoFormPayload {
            name: String::new(),
            ..valid_payload()
        };
        let mut form = CompanyInfoForm::from_payload(&payload, required("name,email,phone"));

        assert!(!form.validate());
        let errors = form.state().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(form.state().error(CompanyFormField::Name), Some("Nome é obrigatório"));
        assert_eq!(form.state().error(CompanyFormField::Email), None);
        assert_eq!(form.state().error(CompanyFormField::Phone), None);
    }

    #[test]
    fn payload_fields_are_masked_on_entry() {
        let payload = CompanyInfoFormPayload {
            document: "11222333000181".into(),
            zip_code: "01234567".into(),
            state: "sp".into(),
            instagram: "trampo.certo".into(),
            ..valid_payload()
        };
        let form = CompanyInfoForm::from_payload(&payload, required("name"));
        let state = form.state();

        assert_eq!(state.value(CompanyFormField::Phone), "(11) 98765-4321");
        assert_eq!(state.value(CompanyFormField::Document), "11.222.333/0001-81");
        assert_eq!(state.value(CompanyFormField::ZipCode), "01234-567");
        assert_eq!(state.value(CompanyFormField::State), "SP");
        assert_eq!(state.value(CompanyFormField::Instagram), "@trampo.certo");
    }

    #[test]
    fn required_address_checks_every_address_field() {
        let payload = CompanyInfoFormPayload {
            street: "Rua A".into(),
            zip_code: "0123".into(),
            ..valid_payload()
        };
        let mut form = CompanyInfoForm::from_payload(&payload, required("name,email,phone,address"));

        assert!(!form.validate());
        let state = form.state();
        assert_eq!(state.error(CompanyFormField::Street), None);
        assert_eq!(state.error(CompanyFormField::Number), Some("Número é obrigatório"));
        assert_eq!(state.error(CompanyFormField::Neighborhood), Some("Bairro é obrigatório"));
        assert_eq!(state.error(CompanyFormField::City), Some("Cidade é obrigatória"));
        assert_eq!(state.error(CompanyFormField::State), Some("Estado é obrigatório"));
        assert_eq!(state.error(CompanyFormField::ZipCode), Some("CEP inválido. Use XXXXX-XXX"));
        assert_eq!(state.error(CompanyFormField::Complement), None);
    }

    #[test]
    fn invalid_document_is_reported_when_required() {
        let payload = CompanyInfoFormPayload {
            document: "111.111.111-11".into(),
            ..valid_payload()
        };
        let mut form = CompanyInfoForm::from_payload(&payload, required("name,document"));
        assert!(!form.validate());
        assert_eq!(form.state().error(CompanyFormField::Document), Some("CPF/CNPJ inválido"));
    }

    #[test]
    fn social_media_group_accepts_empty_handle() {
        let mut form =
            CompanyInfoForm::from_payload(&valid_payload(), required("name,email,phone,socialMedia"));
        assert!(form.validate());
    }

    #[test]
    fn prefill_loads_existing_company() {
        let now = chrono::Utc::now();
        let uid = uuid::Uuid::new_v4();
        let info = CreateCompanyInfoData {
            logo: None,
            name: "Oficina".into(),
            document: Some("529.982.247-25".into()),
            email: "o@o.com".into(),
            phone: "(11) 3333-4444".into(),
            address: None,
            social_media: Some(CompanySocialMedia {
                instagram: Some("@oficina".into()),
            }),
        }
        .into_company_info(uid, now);

        let mut form = CompanyInfoForm::new(required("name,document,socialMedia"));
        form.prefill(&info);
        assert_eq!(form.state().value(CompanyFormField::Name), "Oficina");
        assert_eq!(form.state().value(CompanyFormField::Instagram), "@oficina");
        assert!(form.validate());
    }

    #[test]
    fn view_of_incomplete_company_lists_missing_groups() {
        let info = CreateCompanyInfoData {
            logo: None,
            name: "Oficina".into(),
            document: None,
            email: "o@o.com".into(),
            phone: "(11) 3333-4444".into(),
            address: None,
            social_media: None,
        }
        .into_company_info(uuid::Uuid::new_v4(), chrono::Utc::now());

        let mut form = CompanyInfoForm::new(required("name,email,phone,document"));
        form.prefill(&info);
        form.validate();
        let view = form.view();

        assert!(!view.complete);
        assert_eq!(view.values["phone"], "(11) 3333-4444");
        assert_eq!(view.values["document"], "");
        assert_eq!(view.errors.len(), 1);
        assert_eq!(view.errors["document"], "CPF/CNPJ é obrigatório");
    }

    #[tokio::test]
    async fn submit_sends_only_required_groups() {
        let payload = CompanyInfoFormPayload {
            street: "Rua A".into(),
            number: "10".into(),
            neighborhood: "Centro".into(),
            city: "São Paulo".into(),
            state: "sp".into(),
            zip_code: "01234567".into(),
            instagram: "@trampo".into(),
            ..valid_payload()
        };
        let mut form = CompanyInfoForm::from_payload(&payload, required("name,email,phone,address"));

        let data = form
            .submit(|data| async move { Ok::<_, AppError>(data) })
            .await
            .expect("formulário válido");

        assert_eq!(data.phone, "(11) 98765-4321");
        assert_eq!(data.logo, None);
        assert_eq!(data.document, None);
        assert_eq!(data.social_media, None);
        let address = data.address.expect("endereço exigido");
        assert_eq!(address.state, "SP");
        assert_eq!(address.zip_code, "01234-567");
        assert_eq!(address.complement, None);
    }

    #[tokio::test]
    async fn failed_submission_keeps_form_data() {
        let mut form = CompanyInfoForm::from_payload(&valid_payload(), required("name,email,phone"));

        let result = form
            .submit(|_| async { Err::<(), _>(AppError::CompanyInfoNotFound) })
            .await;

        assert!(matches!(result, Err(SubmitError::Rejected(AppError::CompanyInfoNotFound))));
        assert_eq!(form.state().value(CompanyFormField::Name), "Trampo Certo Reformas");
    }

    #[test]
    fn update_masks_and_validates_present_fields_only() {
        let update = UpdateCompanyInfoData {
            phone: Some("1133334444".into()),
            social_media: Some(CompanySocialMedia {
                instagram: Some("novo_perfil".into()),
            }),
            ..Default::default()
        };

        let normalized = normalize_update(update).expect("atualização válida");
        assert_eq!(normalized.phone.as_deref(), Some("(11) 3333-4444"));
        assert_eq!(normalized.name, None);
        assert_eq!(
            normalized.social_media.and_then(|s| s.instagram).as_deref(),
            Some("@novo_perfil")
        );
    }

    #[test]
    fn update_with_invalid_email_is_rejected() {
        let update = UpdateCompanyInfoData {
            email: Some("sem-arroba".into()),
            ..Default::default()
        };

        match normalize_update(update) {
            Err(AppError::InvalidForm(details)) => {
                assert_eq!(details.get("email").map(String::as_str), Some("Email inválido"));
            }
            other => panic!("esperava InvalidForm, veio {other:?}"),
        }
    }
}
