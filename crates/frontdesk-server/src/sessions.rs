//! Session tokens and the authenticated request context.

use dashmap::DashMap;
use uuid::Uuid;

/// Authenticated principal attached to a request by the session middleware.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Stable principal identifier, recorded in the audit trail.
    pub user_id: String,
    /// Username for display/logging.
    pub username: String,
    /// Tenant scope, when the account belongs to a clinic.
    pub clinic_id: Option<String>,
    /// Assigned roles.
    pub roles: Vec<String>,
}

impl AuthContext {
    /// Returns `true` if the user has a specific role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }
}

/// In-memory session token map.
///
/// Tokens are opaque UUIDs issued at login and revoked at logout. Sessions do
/// not survive a restart; that is acceptable for a dashboard backend and
/// keeps the store dependency-free.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, AuthContext>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a fresh token for the given principal.
    pub fn create(&self, ctx: AuthContext) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.insert(token.clone(), ctx);
        token
    }

    /// Looks up the principal for a token.
    #[must_use]
    pub fn get(&self, token: &str) -> Option<AuthContext> {
        self.sessions.get(token).map(|entry| entry.clone())
    }

    /// Removes a token, returning its principal if it existed.
    pub fn revoke(&self, token: &str) -> Option<AuthContext> {
        self.sessions.remove(token).map(|(_, ctx)| ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff() -> AuthContext {
        AuthContext {
            user_id: "u1".to_string(),
            username: "alice".to_string(),
            clinic_id: Some("clinic-1".to_string()),
            roles: vec!["staff".to_string()],
        }
    }

    #[test]
    fn issued_tokens_resolve_until_revoked() {
        let store = SessionStore::new();
        let token = store.create(staff());
        assert_eq!(store.get(&token).unwrap().user_id, "u1");

        store.revoke(&token);
        assert!(store.get(&token).is_none());
    }

    #[test]
    fn tokens_are_unique() {
        let store = SessionStore::new();
        assert_ne!(store.create(staff()), store.create(staff()));
    }

    #[test]
    fn role_checks() {
        let ctx = staff();
        assert!(ctx.has_role("staff"));
        assert!(!ctx.is_admin());
    }
}
