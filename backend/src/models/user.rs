//! Models that represent users, authentication payloads, and role metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::types::UserId;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of an account.
pub struct User {
    pub id: UserId,
    /// Login identifier. Self-registered users use their email here.
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Manager,
    Dispatcher,
    SafetyOfficer,
    FinancialAnalyst,
}

impl UserRole {
    /// Roles a new user may request; each is held by at most one user.
    pub const ASSIGNABLE: [UserRole; 3] = [
        UserRole::Dispatcher,
        UserRole::SafetyOfficer,
        UserRole::FinancialAnalyst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Dispatcher => "dispatcher",
            UserRole::SafetyOfficer => "safety_officer",
            UserRole::FinancialAnalyst => "financial_analyst",
        }
    }

    /// Human-readable label shown on screens.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Manager => "Manager",
            UserRole::Dispatcher => "Dispatcher",
            UserRole::SafetyOfficer => "Safety Officer",
            UserRole::FinancialAnalyst => "Financial Analyst",
        }
    }

    /// Landing screen for the role.
    pub fn home(&self) -> &'static str {
        match self {
            UserRole::Manager => "dashboard",
            UserRole::Dispatcher => "trips",
            UserRole::SafetyOfficer => "safety_dashboard",
            UserRole::FinancialAnalyst => "financial_dashboard",
        }
    }

    pub fn is_assignable(&self) -> bool {
        !matches!(self, UserRole::Manager)
    }
}

impl FromStr for UserRole {
    type Err = ();

    /// Accepts both the stored snake_case value and the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(' ', "_");
        match normalized.as_str() {
            "manager" => Ok(UserRole::Manager),
            "dispatcher" => Ok(UserRole::Dispatcher),
            "safety_officer" => Ok(UserRole::SafetyOfficer),
            "financial_analyst" => Ok(UserRole::FinancialAnalyst),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Approved => "approved",
            UserStatus::Rejected => "rejected",
        }
    }
}

impl User {
    /// A self-registered account awaiting manager approval.
    pub fn pending_registration(
        name: String,
        email: String,
        password_hash: String,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: email.clone(),
            name: Some(name),
            email: Some(email),
            password_hash,
            role,
            status: UserStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// An approved account created by the operator (the seeded manager).
    pub fn approved(username: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            name: None,
            email: None,
            password_hash,
            role,
            status: UserStatus::Approved,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.role, UserRole::Manager)
    }

    pub fn is_approved(&self) -> bool {
        matches!(self.status, UserStatus::Approved)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    /// Username or email, matched case-insensitively.
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Authentication tokens returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserResponse,
    pub home: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    pub user: UserResponse,
    pub home: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Self-service registration form.
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// Requested role, either snake_case or the display label.
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationOptions {
    pub available_roles: Vec<RoleOption>,
    pub all_roles_assigned: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct RoleOption {
    pub role: UserRole,
    pub label: String,
}

impl From<UserRole> for RoleOption {
    fn from(role: UserRole) -> Self {
        Self {
            role,
            label: role.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub role_label: String,
    pub status: UserStatus,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            name: user.name,
            email: user.email,
            role: user.role,
            role_label: user.role.label().to_string(),
            status: user.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Row shown in the manager's role request tables.
pub struct RoleHolder {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
}
