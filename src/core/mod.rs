pub mod backoff;
pub mod credentials;
pub mod models;
pub mod notifications;
pub mod settings;
