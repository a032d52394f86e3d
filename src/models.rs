pub mod auth;
pub mod company;
pub mod template;
pub mod user;
