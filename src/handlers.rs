// src/handlers.rs

pub mod auth;
pub mod company;
pub mod templates;
