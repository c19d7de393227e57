use std::fmt;

use serde::Deserialize;

/// Role identifier as stored in the role table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub i32);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role record owned by the role store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Roles the gate itself reasons about.
///
/// Routes name one of these instead of a numeric role id; the mapping to
/// store ids is fixed at startup by the `RoleRegistry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRole {
    Admin,
    Member,
}

/// Store-side names of the access roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleNames {
    pub admin: String,
    pub member: String,
}

impl RoleNames {
    pub fn name_of(&self, role: AccessRole) -> &str {
        match role {
            AccessRole::Admin => &self.admin,
            AccessRole::Member => &self.member,
        }
    }
}

impl Default for RoleNames {
    fn default() -> Self {
        Self {
            admin: "admin".to_string(),
            member: "user".to_string(),
        }
    }
}
