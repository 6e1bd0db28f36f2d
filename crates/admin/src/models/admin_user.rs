//! Admin user domain types.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use furnspace_core::{AdminUserId, Email};

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access, including creating other admins via the CLI.
    SuperAdmin,
    /// Day-to-day catalog, customer, and order management.
    Admin,
    /// Read-only access.
    Viewer,
}

impl AdminRole {
    /// Stable string form, used for database storage and JWT claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }

    /// Whether this role may modify data.
    #[must_use]
    pub const fn can_write(self) -> bool {
        matches!(self, Self::SuperAdmin | Self::Admin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`AdminRole`] string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown admin role: {0}")]
pub struct AdminRoleParseError(pub String);

impl FromStr for AdminRole {
    type Err = AdminRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            other => Err(AdminRoleParseError(other.to_owned())),
        }
    }
}

/// A back-office user.
///
/// `password_hash` never leaves the repository layer.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Email address used to log in.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Permission level.
    pub role: AdminRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            assert_eq!(role.as_str().parse::<AdminRole>().unwrap(), role);
        }
        assert!("root".parse::<AdminRole>().is_err());
    }

    #[test]
    fn test_viewer_cannot_write() {
        assert!(AdminRole::Admin.can_write());
        assert!(AdminRole::SuperAdmin.can_write());
        assert!(!AdminRole::Viewer.can_write());
    }
}
