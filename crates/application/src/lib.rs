//! Application services and ports for the Examina access-control service.

#![forbid(unsafe_code)]

mod access_ports;
mod access_service;
mod profile_ports;
mod profile_service;

pub use access_ports::AccessRepository;
pub use access_service::AccessService;
pub use profile_ports::{ProfileRecord, ProfileRepository};
pub use profile_service::ProfileService;
