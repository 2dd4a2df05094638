#[allow(clippy::module_inception)]
pub mod auth;
pub mod handlers;
pub mod identity;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;
