//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_repository;
mod in_memory_profile_repository;
mod postgres_access_repository;
mod postgres_profile_repository;

pub use in_memory_access_repository::InMemoryAccessRepository;
pub use in_memory_profile_repository::InMemoryProfileRepository;
pub use postgres_access_repository::PostgresAccessRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
