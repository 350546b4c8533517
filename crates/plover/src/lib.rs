pub mod chat;
pub mod convert;
pub mod errors;
pub mod identifier;
pub mod models;
pub mod provider;
pub mod sanitize;
pub mod store;
pub mod suggestions;
