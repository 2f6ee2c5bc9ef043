//! Domain types shared by the services and the transport layer.
//!
//! The transport layer resolves *who* is calling into an [`Actor`]; everything
//! below it takes that actor as a plain argument and decides *what* it may do.

pub mod error;
pub mod guard;
pub mod validation;

pub use error::{FieldError, ServiceError};
pub use guard::{AdminOverride, Guard, OwnedByUser};

use serde::Serialize;
use std::fmt;

use crate::constants::roles::ADMIN_ROLE;

/// Capability level of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Maps a stored role name to a capability level. Every role other than
    /// `admin` only carries user capabilities.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case(ADMIN_ROLE) {
            Self::Admin
        } else {
            Self::User
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// The authenticated caller of a request.
///
/// Built by the auth middleware from a session or API key, never from a
/// client-supplied body field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub const fn user(user_id: i32) -> Self {
        Self::new(user_id, Role::User)
    }

    #[must_use]
    pub const fn admin(user_id: i32) -> Self {
        Self::new(user_id, Role::Admin)
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user:{}", self.user_id)
    }
}

/// Which kind of row a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Anime,
    Episode,
    Comment,
}

impl LikeTarget {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anime => "anime",
            Self::Episode => "episode",
            Self::Comment => "comment",
        }
    }

    /// Capitalized resource name used in error messages.
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Anime => "Anime",
            Self::Episode => "Episode",
            Self::Comment => "Comment",
        }
    }
}

impl fmt::Display for LikeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_from_name() {
        assert_eq!(Role::from_name("admin"), Role::Admin);
        assert_eq!(Role::from_name("ADMIN"), Role::Admin);
        assert_eq!(Role::from_name("user"), Role::User);
        assert_eq!(Role::from_name("moderator"), Role::User);
    }

    #[test]
    fn actor_display() {
        assert_eq!(Actor::user(7).to_string(), "user:7");
        assert!(Actor::admin(1).is_admin());
        assert!(!Actor::user(1).is_admin());
    }
}
