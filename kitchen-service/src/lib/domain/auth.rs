pub mod errors;
pub mod models;
pub mod ports;
pub mod service;

pub use models::Principal;
pub use service::AuthService;
