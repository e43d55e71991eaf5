// Protected handlers: every route here sits behind `jwt_auth_middleware`,
// which puts an `AuthUser` into the request extensions.

pub mod auth;
pub mod bpd;
pub mod dashboard;
pub mod log;
pub mod master;
pub mod menu;
pub mod report;
pub mod role;
pub mod user;
