pub mod types;
pub mod validator;

pub use types::{SecurityConfig, SecurityError};
pub use validator::PathValidator;
