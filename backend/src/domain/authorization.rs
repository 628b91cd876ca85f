//! Authorization gate: the single check every protected operation runs
//! before touching the directory.
//!
//! Denial is a normal return value, never an error.

use super::auth::{Identity, Role};

/// Minimum privilege an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredRole {
    /// Any resolved identity.
    AnyAuthenticated,
    /// Identity must carry [`Role::Admin`].
    Admin,
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No session resolved to an identity.
    Unauthenticated,
    /// The identity lacks the required role.
    Forbidden,
}

/// Typed outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision<'a> {
    /// The identity may proceed.
    Allow(&'a Identity),
    /// Access refused.
    Deny(DenyReason),
}

impl AccessDecision<'_> {
    /// Whether the decision permits the action.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Decide whether `identity` satisfies `required`.
///
/// # Examples
/// ```
/// use directory_backend::domain::{
///     AccessDecision, DenyReason, Handle, Identity, RequiredRole, Role, authorize,
/// };
///
/// let employee = Identity::new(Handle::new("employee").unwrap(), Role::Employee, "John Doe");
/// assert_eq!(
///     authorize(Some(&employee), RequiredRole::Admin),
///     AccessDecision::Deny(DenyReason::Forbidden)
/// );
/// assert_eq!(
///     authorize(None, RequiredRole::AnyAuthenticated),
///     AccessDecision::Deny(DenyReason::Unauthenticated)
/// );
/// ```
pub fn authorize(identity: Option<&Identity>, required: RequiredRole) -> AccessDecision<'_> {
    let Some(identity) = identity else {
        return AccessDecision::Deny(DenyReason::Unauthenticated);
    };
    match required {
        RequiredRole::AnyAuthenticated => AccessDecision::Allow(identity),
        RequiredRole::Admin if identity.role() == Role::Admin => AccessDecision::Allow(identity),
        RequiredRole::Admin => AccessDecision::Deny(DenyReason::Forbidden),
    }
}

/// Boolean form of [`authorize`].
pub fn allow(identity: Option<&Identity>, required: RequiredRole) -> bool {
    authorize(identity, required).is_allowed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Handle;
    use rstest::rstest;

    fn identity(role: Role) -> Identity {
        Identity::new(Handle::new("someone").expect("handle"), role, "Someone")
    }

    #[rstest]
    #[case(None, RequiredRole::Admin, false)]
    #[case(None, RequiredRole::AnyAuthenticated, false)]
    #[case(Some(Role::Employee), RequiredRole::Admin, false)]
    #[case(Some(Role::Employee), RequiredRole::AnyAuthenticated, true)]
    #[case(Some(Role::Admin), RequiredRole::Admin, true)]
    #[case(Some(Role::Admin), RequiredRole::AnyAuthenticated, true)]
    fn allow_matrix(
        #[case] role: Option<Role>,
        #[case] required: RequiredRole,
        #[case] expected: bool,
    ) {
        let identity = role.map(identity);
        assert_eq!(allow(identity.as_ref(), required), expected);
    }

    #[rstest]
    fn deny_reasons_distinguish_missing_and_insufficient() {
        let employee = identity(Role::Employee);
        assert_eq!(
            authorize(None, RequiredRole::Admin),
            AccessDecision::Deny(DenyReason::Unauthenticated)
        );
        assert_eq!(
            authorize(Some(&employee), RequiredRole::Admin),
            AccessDecision::Deny(DenyReason::Forbidden)
        );
    }

    #[rstest]
    fn allow_carries_the_identity() {
        let admin = identity(Role::Admin);
        assert_eq!(
            authorize(Some(&admin), RequiredRole::Admin),
            AccessDecision::Allow(&admin)
        );
    }
}
