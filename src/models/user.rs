use serde::{Deserialize, Serialize};
use std::fmt;

/// The three account tiers of the back-office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Administrateur")]
    Administrator,
    #[serde(rename = "Comptabilité")]
    Accounting,
    #[serde(rename = "Utilisateur")]
    StandardUser,
}

/// Areas of the back-office that access rules are expressed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Dashboard,
    Drivers,
    Employees,
    Assignments,
    Validation,
    Reports,
    Users,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Administrator => "Administrateur",
            Role::Accounting => "Comptabilité",
            Role::StandardUser => "Utilisateur",
        }
    }

    /// Sections this role may open
    pub fn sections(self) -> &'static [Section] {
        match self {
            Role::Administrator => &[
                Section::Dashboard,
                Section::Drivers,
                Section::Employees,
                Section::Assignments,
                Section::Validation,
                Section::Reports,
                Section::Users,
            ],
            Role::Accounting => &[Section::Dashboard, Section::Validation, Section::Reports],
            Role::StandardUser => &[
                Section::Dashboard,
                Section::Drivers,
                Section::Employees,
                Section::Assignments,
            ],
        }
    }

    pub fn can_access(self, section: Section) -> bool {
        self.sections().contains(&section)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A back-office login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub role: Role,
}

/// Account data safe to hand out over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub username: String,
    pub role: Role,
}

impl From<&UserAccount> for UserSummary {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.clone(),
            username: account.username.clone(),
            role: account.role,
        }
    }
}
