pub mod auth;
pub mod client;
pub mod response;
pub mod validate;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use client::RequestClient;
pub use response::{ApiResponse, ApiResult};
pub use validate::ValidatedJson;
