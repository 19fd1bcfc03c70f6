//! Repository layer for data access operations.

mod user_repo;

pub use user_repo::UserRepository;
