// src/forms.rs

pub mod auth_forms;
pub mod company_info;
pub mod form_state;
