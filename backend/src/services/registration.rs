//! Role bookkeeping for self-registration and manager review.

use crate::{
    error::AppError,
    models::user::{RegisterRequest, User, UserRole, UserStatus},
};

/// Assignable roles not held by a pending or approved user, in display order.
pub fn available_roles(occupied: &[UserRole]) -> Vec<UserRole> {
    UserRole::ASSIGNABLE
        .into_iter()
        .filter(|role| !occupied.contains(role))
        .collect()
}

/// A registration form after trimming, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Applies the registration rules in order against the roles still open.
pub fn check_registration(
    request: &RegisterRequest,
    available: &[UserRole],
) -> Result<Registration, AppError> {
    if available.is_empty() {
        return Err(AppError::Conflict("All roles assigned".into()));
    }

    let name = request.name.trim();
    let email = request.email.trim().to_lowercase();
    let role_raw = request.role.trim();
    if name.is_empty() || email.is_empty() || request.password.is_empty() || role_raw.is_empty() {
        return Err(AppError::BadRequest("All fields are required".into()));
    }

    let role = role_raw
        .parse::<UserRole>()
        .ok()
        .filter(|role| available.contains(role))
        .ok_or_else(|| AppError::Conflict("Selected role is not available".into()))?;

    Ok(Registration {
        name: name.to_string(),
        email,
        password: request.password.clone(),
        role,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Reject,
}

impl ReviewAction {
    pub fn target_status(self) -> UserStatus {
        match self {
            ReviewAction::Approve => UserStatus::Approved,
            ReviewAction::Reject => UserStatus::Rejected,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            ReviewAction::Approve => "User approved",
            ReviewAction::Reject => "User rejected",
        }
    }
}

/// Checks that a role request can be reviewed. The role conflict check for
/// approvals needs the database and happens afterwards.
pub fn check_reviewable(user: Option<&User>, action: ReviewAction) -> Result<&User, AppError> {
    let user = user.ok_or_else(|| AppError::NotFound("Request not found".into()))?;
    if user.is_manager() {
        let message = match action {
            ReviewAction::Approve => "Cannot approve manager role",
            ReviewAction::Reject => "Cannot reject manager role",
        };
        return Err(AppError::BadRequest(message.into()));
    }
    if user.status != UserStatus::Pending {
        return Err(AppError::Conflict("Request is not pending".into()));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(role: &str) -> RegisterRequest {
        RegisterRequest {
            name: " Priya ".into(),
            email: " Priya@Example.COM ".into(),
            password: "secret".into(),
            role: role.into(),
        }
    }

    fn pending(role: UserRole) -> User {
        User::pending_registration("P".into(), "p@example.com".into(), "hash".into(), role)
    }

    fn message(err: AppError) -> String {
        match err {
            AppError::Conflict(msg) | AppError::BadRequest(msg) | AppError::NotFound(msg) => msg,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn available_roles_keep_display_order() {
        assert_eq!(
            available_roles(&[UserRole::SafetyOfficer, UserRole::Manager]),
            vec![UserRole::Dispatcher, UserRole::FinancialAnalyst]
        );
        assert!(available_roles(&UserRole::ASSIGNABLE).is_empty());
    }

    #[test]
    fn registration_normalizes_email_and_accepts_labels() {
        let available = available_roles(&[]);
        let registration = check_registration(&request("Safety Officer"), &available).unwrap();
        assert_eq!(registration.email, "priya@example.com");
        assert_eq!(registration.name, "Priya");
        assert_eq!(registration.role, UserRole::SafetyOfficer);
    }

    #[test]
    fn registration_only_requires_non_blank_login() {
        let registration = check_registration(
            &RegisterRequest {
                email: "Ops-Desk".into(),
                ..request("dispatcher")
            },
            &available_roles(&[]),
        )
        .unwrap();
        assert_eq!(registration.email, "ops-desk");
    }

    #[test]
    fn registration_checks_run_in_order() {
        let err = check_registration(&RegisterRequest { role: String::new(), ..request("") }, &[])
            .unwrap_err();
        assert_eq!(message(err), "All roles assigned");

        let available = available_roles(&[]);
        let mut blank = request("dispatcher");
        blank.password.clear();
        assert_eq!(
            message(check_registration(&blank, &available).unwrap_err()),
            "All fields are required"
        );

        let err = check_registration(&request("dispatcher"), &[UserRole::SafetyOfficer]).unwrap_err();
        assert_eq!(message(err), "Selected role is not available");

        let err = check_registration(&request("manager"), &available).unwrap_err();
        assert_eq!(message(err), "Selected role is not available");
    }

    #[test]
    fn review_rejects_missing_manager_and_processed_users() {
        assert_eq!(
            message(check_reviewable(None, ReviewAction::Approve).unwrap_err()),
            "Request not found"
        );

        let manager = User::approved("boss".into(), "hash".into(), UserRole::Manager);
        assert_eq!(
            message(check_reviewable(Some(&manager), ReviewAction::Reject).unwrap_err()),
            "Cannot reject manager role"
        );

        let mut processed = pending(UserRole::Dispatcher);
        processed.status = UserStatus::Rejected;
        assert_eq!(
            message(check_reviewable(Some(&processed), ReviewAction::Approve).unwrap_err()),
            "Request is not pending"
        );

        let fresh = pending(UserRole::Dispatcher);
        assert!(check_reviewable(Some(&fresh), ReviewAction::Approve).is_ok());
    }

    #[test]
    fn review_actions_map_to_statuses() {
        assert_eq!(ReviewAction::Approve.target_status(), UserStatus::Approved);
        assert_eq!(ReviewAction::Reject.success_message(), "User rejected");
    }
}
