use serde::{Deserialize, Serialize};
use std::fmt;

/// Role carried in the session token issued by the site's auth provider.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,  // Regular signed-in member
    Admin, // Access to the admin panel
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "User"),
            Role::Admin => write!(f, "Administrator"),
        }
    }
}
