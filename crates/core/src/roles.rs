//! User roles, permissions, and language preferences.
//!
//! Roles are stored as plain text in the `users.role` column and embedded in
//! JWT claims; the constants here are the single source of truth for the
//! valid values.

/// Full platform administration.
pub const ROLE_ADMIN: &str = "admin";

/// Project manager: owns projects, approves work.
pub const ROLE_PM: &str = "pm";

/// Crew foreman: leads a crew, approves its work entries.
pub const ROLE_FOREMAN: &str = "foreman";

/// Crew member.
pub const ROLE_CREW: &str = "crew";

/// Read-only access.
pub const ROLE_VIEWER: &str = "viewer";

/// Individual field worker (not attached to a crew).
pub const ROLE_WORKER: &str = "worker";

/// All valid role names.
pub const VALID_ROLES: &[&str] = &[
    ROLE_ADMIN,
    ROLE_PM,
    ROLE_FOREMAN,
    ROLE_CREW,
    ROLE_VIEWER,
    ROLE_WORKER,
];

/// Supported interface languages (ISO 639-1).
pub const VALID_LANGUAGES: &[&str] = &["ru", "en", "de", "uz", "tr"];

/// Default language for new users and projects.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Check whether a role name is one of the known roles.
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

/// Check whether a language code is supported.
pub fn is_valid_language(lang: &str) -> bool {
    VALID_LANGUAGES.contains(&lang)
}

/// Roles allowed to approve work entries.
pub fn can_approve_work(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_PM | ROLE_FOREMAN)
}

/// Roles allowed to manage projects (create, update, delete).
pub fn can_manage_projects(role: &str) -> bool {
    matches!(role, ROLE_ADMIN | ROLE_PM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        for role in VALID_ROLES {
            assert!(is_valid_role(role));
        }
    }

    #[test]
    fn unknown_role_is_invalid() {
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("ADMIN"));
    }

    #[test]
    fn approval_roles() {
        assert!(can_approve_work(ROLE_ADMIN));
        assert!(can_approve_work(ROLE_PM));
        assert!(can_approve_work(ROLE_FOREMAN));
        assert!(!can_approve_work(ROLE_CREW));
        assert!(!can_approve_work(ROLE_VIEWER));
        assert!(!can_approve_work(ROLE_WORKER));
    }

    #[test]
    fn project_management_roles() {
        assert!(can_manage_projects(ROLE_ADMIN));
        assert!(can_manage_projects(ROLE_PM));
        assert!(!can_manage_projects(ROLE_FOREMAN));
    }

    #[test]
    fn language_codes() {
        assert!(is_valid_language("de"));
        assert!(is_valid_language("ru"));
        assert!(!is_valid_language("fr"));
        assert!(!is_valid_language("DE"));
    }
}
