mod auth;
mod common;
