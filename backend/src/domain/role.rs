//! Role model for coarse route-level authorization.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of roles carried inside every issued token.
///
/// Roles deliberately do NOT form an ordered hierarchy: `Editor` does not
/// imply `Viewer`. A route declares the exact role it accepts and
/// [`Role::permits`] passes only that role or `Admin`. Changing this to a
/// ranked lattice would silently widen access on existing routes, so the
/// exact-match rule is kept and documented here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Universal override; passes every role check.
    Admin,
    /// May create and mutate shared resources such as categories.
    Editor,
    /// May read shared resources.
    Viewer,
    /// Default role assigned at registration.
    User,
}

impl Role {
    /// Exact-match-or-admin check used by the role guard.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::Role;
    ///
    /// assert!(Role::Admin.permits(Role::Editor));
    /// assert!(Role::Editor.permits(Role::Editor));
    /// assert!(!Role::Editor.permits(Role::Viewer));
    /// ```
    pub fn permits(self, required: Self) -> bool {
        self == Self::Admin || self == required
    }

    /// Lowercase wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
