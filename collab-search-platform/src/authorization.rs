//! Credential-based authorization evaluator.

use collab_search_shared::{AuthorizationPolicy, AuthorizationPrivilege, Principal};

use crate::interfaces::AuthorizationEvaluator;

/// Grants a privilege when one of the principal's credentials matches a
/// credential rule of the policy that includes it.
///
/// Rules match on credential type and exact resource id. Anonymous read
/// access on a policy grants `Read` to everyone.
#[derive(Debug, Clone)]
pub struct CredentialAuthorizationEvaluator {
    authentication_enabled: bool,
}

impl CredentialAuthorizationEvaluator {
    pub fn new(authentication_enabled: bool) -> Self {
        Self {
            authentication_enabled,
        }
    }
}

impl Default for CredentialAuthorizationEvaluator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AuthorizationEvaluator for CredentialAuthorizationEvaluator {
    fn is_access_granted(
        &self,
        principal: &Principal,
        policy: Option<&AuthorizationPolicy>,
        privilege: AuthorizationPrivilege,
    ) -> bool {
        if !self.authentication_enabled {
            return true;
        }

        let Some(policy) = policy else {
            return false;
        };

        if policy.anonymous_read_access && privilege == AuthorizationPrivilege::Read {
            return true;
        }

        policy.credential_rules.iter().any(|rule| {
            rule.granted_privileges.contains(&privilege)
                && principal.credentials.iter().any(|credential| {
                    credential.credential_type == rule.credential_type
                        && credential.resource_id == rule.resource_id
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use collab_search_shared::{AuthorizationCredential, Credential};

    fn member_of(space: &str) -> Principal {
        Principal {
            user_id: None,
            email: Some("member@example.org".to_string()),
            credentials: vec![Credential::new(AuthorizationCredential::SpaceMember, space)],
        }
    }

    #[test]
    fn test_authentication_disabled_grants_everything() {
        let evaluator = CredentialAuthorizationEvaluator::new(false);
        assert!(evaluator.is_access_granted(
            &Principal::anonymous(),
            None,
            AuthorizationPrivilege::Delete
        ));
    }

    #[test]
    fn test_missing_policy_denies() {
        let evaluator = CredentialAuthorizationEvaluator::default();
        assert!(!evaluator.is_access_granted(
            &member_of("s1"),
            None,
            AuthorizationPrivilege::Read
        ));
    }

    #[test]
    fn test_anonymous_read_only_grants_read() {
        let evaluator = CredentialAuthorizationEvaluator::default();
        let policy = AuthorizationPolicy::public();

        assert!(evaluator.is_access_granted(
            &Principal::anonymous(),
            Some(&policy),
            AuthorizationPrivilege::Read
        ));
        assert!(!evaluator.is_access_granted(
            &Principal::anonymous(),
            Some(&policy),
            AuthorizationPrivilege::Update
        ));
    }

    #[test]
    fn test_credential_rule_requires_matching_resource() {
        let evaluator = CredentialAuthorizationEvaluator::default();
        let policy = AuthorizationPolicy::default().with_rule(
            AuthorizationCredential::SpaceMember,
            "s1",
            vec![AuthorizationPrivilege::Read],
        );

        assert!(evaluator.is_access_granted(
            &member_of("s1"),
            Some(&policy),
            AuthorizationPrivilege::Read
        ));
        assert!(!evaluator.is_access_granted(
            &member_of("s2"),
            Some(&policy),
            AuthorizationPrivilege::Read
        ));
        assert!(!evaluator.is_access_granted(
            &member_of("s1"),
            Some(&policy),
            AuthorizationPrivilege::Grant
        ));
    }
}
