pub mod auth;
pub mod brand;
pub mod dashboard;
