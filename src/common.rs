// src/common.rs

pub mod auth_errors;
pub mod error;
pub mod validation;
