//! Authorization evaluator trait definition.

use collab_search_shared::{AuthorizationPolicy, AuthorizationPrivilege, Principal};

/// Decides whether a principal holds a privilege on a guarded entity.
pub trait AuthorizationEvaluator: Send + Sync {
    /// Check a privilege against an entity's policy.
    ///
    /// # Arguments
    ///
    /// * `principal` - The agent performing the operation
    /// * `policy` - The entity's policy; `None` when the entity has none loaded
    /// * `privilege` - The privilege required
    ///
    /// # Returns
    ///
    /// `true` when access is granted.
    fn is_access_granted(
        &self,
        principal: &Principal,
        policy: Option<&AuthorizationPolicy>,
        privilege: AuthorizationPrivilege,
    ) -> bool;
}
