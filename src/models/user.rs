//! User model and related types.
//!
//! Authentication (password hashing, OTP, token issuance) lives in the
//! external auth collaborator; this crate only reads the columns it needs
//! to resolve ownership, RBAC, and routing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

/// The three roles in the system: citizens report, support resolve, managers
/// assign and approve escalations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Citizen,
    Support,
    Manager,
}

/// Full user entity with all fields.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub phone: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub team_id: Option<Uuid>,
    pub is_verified: bool,
    pub is_active: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Projection of a user used when attributing a ticket, comment, or log entry
/// to its author without exposing contact details beyond a display name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let role = Role::Support;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"support\"");

        let parsed: Role = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Role::Support);
    }

    #[test]
    fn test_user_is_deleted() {
        let user = User {
            id: Uuid::new_v4(),
            phone: "+905551112233".to_string(),
            email: "a@example.com".to_string(),
            name: "Ayse".to_string(),
            role: Role::Citizen,
            team_id: None,
            is_verified: true,
            is_active: true,
            deleted_at: Some(Utc::now()),
        };
        assert!(user.is_deleted());
    }
}
