//! Ownership-scoped mutation guard.
//!
//! Every user-generated resource (comment, like, favorite) goes through the
//! same sequence before it is written:
//!
//! 1. the actor comes from the authenticated identity;
//! 2. the referenced target must exist, otherwise `NotFound`;
//! 3. on create of a unique-pair resource, no row may exist yet for
//!    `(actor, target)`, otherwise `Conflict`;
//! 4. on update/delete, the stored owner must be the actor, otherwise
//!    `Unauthorized` (existence is not hidden from non-owners);
//! 5. the single persistence call runs.
//!
//! [`Guard`] carries the actor through those checks so services read as the
//! sequence above.

use super::{Actor, ServiceError};

/// A resource that belongs to exactly one user.
pub trait OwnedByUser {
    fn owner_id(&self) -> i32;

    fn is_owned_by(&self, user_id: i32) -> bool {
        self.owner_id() == user_id
    }
}

/// Whether an admin may act on resources they do not own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminOverride {
    Allowed,
    Denied,
}

#[derive(Debug, Clone, Copy)]
pub struct Guard {
    actor: Actor,
}

impl Guard {
    #[must_use]
    pub const fn for_actor(actor: Actor) -> Self {
        Self { actor }
    }

    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Capability check for admin-managed resources.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.actor.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::unauthorized(
                "This operation requires the admin role",
            ))
        }
    }

    /// Step 2: the referenced target must exist.
    pub fn require_target<T>(
        &self,
        found: Option<T>,
        resource: &str,
        id: i32,
    ) -> Result<T, ServiceError> {
        found.ok_or_else(|| ServiceError::not_found(resource, id))
    }

    /// Step 3: no `(actor, target)` row may exist yet.
    pub fn require_absent<T>(&self, existing: Option<T>, message: &str) -> Result<(), ServiceError> {
        match existing {
            Some(_) => Err(ServiceError::conflict(message)),
            None => Ok(()),
        }
    }

    /// Step 4: the stored owner must be the actor.
    pub fn require_owner<R: OwnedByUser>(
        &self,
        resource: &R,
        admin: AdminOverride,
    ) -> Result<(), ServiceError> {
        if resource.is_owned_by(self.actor.user_id) {
            return Ok(());
        }

        if admin == AdminOverride::Allowed && self.actor.is_admin() {
            return Ok(());
        }

        tracing::debug!(
            actor = %self.actor,
            owner_id = resource.owner_id(),
            "Rejected mutation of a resource owned by another user"
        );
        Err(ServiceError::unauthorized(
            "You are not allowed to modify this resource",
        ))
    }
}

impl OwnedByUser for crate::entities::comments::Model {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

impl OwnedByUser for crate::entities::favorites::Model {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}
