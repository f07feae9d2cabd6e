pub mod analytics;
pub mod asset;
pub mod audit;
pub mod auth;
pub mod chat;
