//! Audit action taxonomy.

use serde::{Deserialize, Serialize};

/// What kind of access an audit record describes.
///
/// The set is closed: auto-generated records derive their action from the
/// HTTP verb via [`AuditAction::from_method`], while authentication flows use
/// `Login`/`Logout` and bulk retrieval uses `Export` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Export,
    Login,
    Logout,
}

impl AuditAction {
    /// Derives the action from an HTTP method name.
    ///
    /// Unknown or non-mutating verbs (HEAD, OPTIONS, ...) classify as `Read`,
    /// the safe default for an access trail.
    #[must_use]
    pub fn from_method(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "POST" => AuditAction::Create,
            "PUT" | "PATCH" => AuditAction::Update,
            "DELETE" => AuditAction::Delete,
            _ => AuditAction::Read,
        }
    }

    /// Returns the wire/storage name of the action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Read => "READ",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Export => "EXPORT",
            AuditAction::Login => "LOGIN",
            AuditAction::Logout => "LOGOUT",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_mapping() {
        assert_eq!(AuditAction::from_method("GET"), AuditAction::Read);
        assert_eq!(AuditAction::from_method("POST"), AuditAction::Create);
        assert_eq!(AuditAction::from_method("PUT"), AuditAction::Update);
        assert_eq!(AuditAction::from_method("PATCH"), AuditAction::Update);
        assert_eq!(AuditAction::from_method("DELETE"), AuditAction::Delete);
        // Anything else classifies as a read
        assert_eq!(AuditAction::from_method("OPTIONS"), AuditAction::Read);
        assert_eq!(AuditAction::from_method("HEAD"), AuditAction::Read);
        assert_eq!(AuditAction::from_method("TRACE"), AuditAction::Read);
    }

    #[test]
    fn method_mapping_is_case_insensitive() {
        assert_eq!(AuditAction::from_method("delete"), AuditAction::Delete);
        assert_eq!(AuditAction::from_method("Post"), AuditAction::Create);
    }

    #[test]
    fn wire_names() {
        assert_eq!(AuditAction::Update.as_str(), "UPDATE");
        assert_eq!(AuditAction::Login.to_string(), "LOGIN");
        let json = serde_json::to_string(&AuditAction::Export).unwrap();
        assert_eq!(json, "\"EXPORT\"");
    }
}
