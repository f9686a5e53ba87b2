mod access;
mod common;
mod profiles;

pub use access::{
    AccessTreeNodeResponse, MenuResponse, NavigationItemResponse, NavigationMenuResponse,
    UpdateAccessRequest, UpdateAccessResponse,
};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use profiles::{CreateProfileRequest, ProfileResponse, RenameProfileRequest};
