//! Authorization types: policies attached to entities and the principal
//! performing a search.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Privileges that can be granted by a credential rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationPrivilege {
    Read,
    Create,
    Update,
    Delete,
    Grant,
}

/// Credential types held by users and organizations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorizationCredential {
    GlobalAdmin,
    GlobalRegistered,
    SpaceMember,
    SpaceAdmin,
    SpaceLead,
    OrganizationAssociate,
    OrganizationAdmin,
    UserSelfManagement,
}

/// A credential held by an agent, optionally bound to a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "type")]
    pub credential_type: AuthorizationCredential,
    /// Resource the credential applies to; empty for global credentials.
    #[serde(default, rename = "resourceID")]
    pub resource_id: String,
}

impl Credential {
    pub fn new(credential_type: AuthorizationCredential, resource_id: impl Into<String>) -> Self {
        Self {
            credential_type,
            resource_id: resource_id.into(),
        }
    }

    pub fn global(credential_type: AuthorizationCredential) -> Self {
        Self::new(credential_type, "")
    }
}

/// Grants a set of privileges to holders of a matching credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRule {
    #[serde(rename = "type")]
    pub credential_type: AuthorizationCredential,
    #[serde(default, rename = "resourceID")]
    pub resource_id: String,
    pub granted_privileges: Vec<AuthorizationPrivilege>,
}

/// Authorization policy attached to a guarded entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationPolicy {
    #[serde(default)]
    pub anonymous_read_access: bool,
    #[serde(default)]
    pub credential_rules: Vec<CredentialRule>,
}

impl AuthorizationPolicy {
    /// A policy readable by anyone.
    pub fn public() -> Self {
        Self {
            anonymous_read_access: true,
            credential_rules: Vec::new(),
        }
    }

    /// Add a rule granting `privileges` to holders of the given credential.
    pub fn with_rule(
        mut self,
        credential_type: AuthorizationCredential,
        resource_id: impl Into<String>,
        privileges: Vec<AuthorizationPrivilege>,
    ) -> Self {
        self.credential_rules.push(CredentialRule {
            credential_type,
            resource_id: resource_id.into(),
            granted_privileges: privileges,
        });
        self
    }
}

/// The agent on whose behalf a search runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    #[serde(default, rename = "userID")]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub credentials: Vec<Credential>,
}

impl Principal {
    /// A principal without identity or credentials.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_anonymous(&self) -> bool {
        self.email.is_none()
    }
}
