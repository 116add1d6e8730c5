//! User entity as exposed by the user store.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authorization roles, highest privilege first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Manager,
    Editor,
    Contributor,
    User,
    Guest,
}

impl Role {
    /// Every role, highest privilege first
    pub const ALL: [Role; 6] = [
        Role::Admin,
        Role::Manager,
        Role::Editor,
        Role::Contributor,
        Role::User,
        Role::Guest,
    ];

    /// Role assigned to self-registered accounts
    pub const DEFAULT: Role = Role::User;

    /// Canonical name as written into token claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Editor => "Editor",
            Role::Contributor => "Contributor",
            Role::User => "User",
            Role::Guest => "Guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Invalid role: {}", s))
    }
}

/// User entity representing a registered account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Normalized (trimmed, lowercase) email address
    pub email: String,

    /// Display name
    pub full_name: String,

    /// Inactive accounts may never receive a token pair
    pub is_active: bool,

    /// Role set
    pub roles: BTreeSet<Role>,

    /// Timestamp when the user was created
    pub created_at: DateTime<Utc>,

    /// Timestamp of the user's last successful login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Creates a new active user with the given roles
    pub fn new(email: impl Into<String>, full_name: impl Into<String>, roles: &[Role]) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: normalize_email(&email.into()),
            full_name: full_name.into(),
            is_active: true,
            roles: roles.iter().copied().collect(),
            created_at: Utc::now(),
            last_login_at: None,
        }
    }

    /// Checks whether the user holds a role
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Role names in canonical form
    pub fn role_names(&self) -> BTreeSet<String> {
        self.roles.iter().map(|r| r.as_str().to_string()).collect()
    }

    /// Disables the account
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Updates the last login timestamp
    pub fn update_last_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = Some(at);
    }
}

/// Normalizes an email address for lookups and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
