pub mod analytics;
pub mod asset_service;
pub mod audit;
pub mod auth;
pub mod chat;
pub mod password;
pub mod token;
