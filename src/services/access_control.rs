//! The single source of truth for upload, listing, and download permission.
//!
//! Every handler that gates on role or ownership goes through this module
//! rather than branching on `role == admin` inline. Decisions are computed
//! fresh on every request; roles and ownership can change between requests.

use crate::api::error::AppError;
use crate::entities::prelude::*;
use crate::entities::users::Role;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

/// The authenticated actor for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: i32,
    pub role: Role,
}

/// Outcome of a capability check. `NotFound` is used where denying must
/// not reveal whether the resource exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Forbidden,
    NotFound,
}

/// Only administrators may upload documents.
pub fn can_upload(identity: Identity) -> bool {
    identity.role.is_admin()
}

/// Admins see every document; a user sees their own plus everything an
/// admin published.
pub fn can_view_in_listing(identity: Identity, owner_id: i32, owner_role: Role) -> bool {
    identity.role.is_admin() || owner_id == identity.id || owner_role.is_admin()
}

/// Owner id embedded as the numeric prefix of the stored name,
/// `{owner_id}_{timestamp}_{sanitized_name}`. `None` when the prefix does
/// not parse as an integer.
pub fn parse_owner_id(disk_filename: &str) -> Option<i32> {
    disk_filename.split('_').next()?.parse().ok()
}

/// Download permission given the owner resolved from the filename prefix.
/// A missing owner row behaves as a non-admin owner.
pub fn can_download(identity: Identity, owner_id: i32, owner_role: Option<Role>) -> Decision {
    if identity.role.is_admin() {
        return Decision::Allowed;
    }
    if owner_role.is_some_and(Role::is_admin) {
        return Decision::Allowed;
    }
    if identity.id == owner_id {
        Decision::Allowed
    } else {
        Decision::Forbidden
    }
}

/// Full download check for a requested stored filename: parse the owner
/// prefix (unparsable → `NotFound`, no existence leak), look up the
/// owner's current role, and decide.
pub async fn authorize_download(
    db: &DatabaseConnection,
    identity: Identity,
    disk_filename: &str,
) -> Result<Decision, DbErr> {
    let Some(owner_id) = parse_owner_id(disk_filename) else {
        return Ok(Decision::NotFound);
    };

    if identity.role.is_admin() {
        return Ok(Decision::Allowed);
    }

    let owner_role = Users::find_by_id(owner_id).one(db).await?.map(|u| u.role);

    Ok(can_download(identity, owner_id, owner_role))
}

/// Role gate for the admin panel and every admin mutation.
pub fn ensure_admin(identity: Identity) -> Result<(), AppError> {
    if identity.role.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}
