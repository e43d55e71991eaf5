// Public handlers: no Authorization header required

pub mod auth;
pub mod root;

pub use auth::login;
pub use root::{health, root};
