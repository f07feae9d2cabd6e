pub mod assets;
pub mod audit;
pub mod auth;
pub mod chat;
pub mod health;
pub mod properties;
pub mod users;
