// src/services.rs

pub mod auth;
pub mod cache;
pub mod company_service;
pub mod template_service;
