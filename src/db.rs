pub mod user_repo;
pub use user_repo::UserRepository;
pub mod asset_repo;
pub use asset_repo::AssetRepository;
pub mod audit_repo;
pub use audit_repo::AuditRepository;
