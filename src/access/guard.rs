//! Route authorization decision function.
//!
//! A pure decision table over (session state, role, route class). The HTTP
//! layer resolves the session through the registry first and maps the returned
//! [`Decision`] to a pass-through or a redirect; nothing here performs I/O.

use super::role::Role;
use super::routes::RouteClass;

/// Outcome of the route authorization decision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Decision {
    Allow,
    RedirectLogin,
    RedirectHome,
    RedirectAdminRoot,
}

/// Decide route-level reachability.
///
/// Precedence, first match wins:
/// 1. public route + live session: back to home (auth pages are for the logged out)
/// 2. public route, no session: allow
/// 3. no session anywhere else: to login
/// 4. admin area: roles without admin access go home; mid-tier roles are kept
///    out of the restricted sub-areas and sent to the admin root
/// 5. anything else: allow
///
/// A live session with an unresolvable role is treated as the most restrictive
/// role. `Allow` only grants reachability; pages still apply their own
/// capability checks.
#[must_use]
pub fn decide(has_valid_session: bool, role: Option<Role>, class: RouteClass) -> Decision {
    match class {
        RouteClass::Public => {
            if has_valid_session {
                Decision::RedirectHome
            } else {
                Decision::Allow
            }
        }
        RouteClass::Admin | RouteClass::RestrictedAdmin => {
            if !has_valid_session {
                return Decision::RedirectLogin;
            }
            let capabilities = role.map_or(super::role::Capabilities::NONE, |r| r.capabilities());
            if !capabilities.can_access_admin {
                Decision::RedirectHome
            } else if class == RouteClass::RestrictedAdmin && !capabilities.can_manage_users {
                Decision::RedirectAdminRoot
            } else {
                Decision::Allow
            }
        }
        RouteClass::Other => {
            if has_valid_session {
                Decision::Allow
            } else {
                Decision::RedirectLogin
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decide, Decision};
    use crate::access::role::Role;
    use crate::access::routes::RouteClass;

    const ROLES: [Option<Role>; 4] = [
        Some(Role::Admin),
        Some(Role::Moderator),
        Some(Role::Viewer),
        None,
    ];
    const CLASSES: [RouteClass; 4] = [
        RouteClass::Public,
        RouteClass::Admin,
        RouteClass::RestrictedAdmin,
        RouteClass::Other,
    ];

    #[test]
    fn decision_table_is_total() {
        // Full cross-product: every input triple maps to exactly one outcome.
        for has_session in [true, false] {
            for role in ROLES {
                for class in CLASSES {
                    let _ = decide(has_session, role, class);
                }
            }
        }
    }

    #[test]
    fn authenticated_callers_leave_auth_pages() {
        for role in ROLES {
            assert_eq!(
                decide(true, role, RouteClass::Public),
                Decision::RedirectHome
            );
        }
    }

    #[test]
    fn anonymous_callers_reach_public_pages_only() {
        assert_eq!(decide(false, None, RouteClass::Public), Decision::Allow);
        assert_eq!(
            decide(false, None, RouteClass::Other),
            Decision::RedirectLogin
        );
        assert_eq!(
            decide(false, None, RouteClass::Admin),
            Decision::RedirectLogin
        );
        assert_eq!(
            decide(false, None, RouteClass::RestrictedAdmin),
            Decision::RedirectLogin
        );
        // Role claims without a session never matter.
        assert_eq!(
            decide(false, Some(Role::Admin), RouteClass::Admin),
            Decision::RedirectLogin
        );
    }

    #[test]
    fn viewer_never_enters_the_admin_area() {
        assert_eq!(
            decide(true, Some(Role::Viewer), RouteClass::Admin),
            Decision::RedirectHome
        );
        assert_eq!(
            decide(true, Some(Role::Viewer), RouteClass::RestrictedAdmin),
            Decision::RedirectHome
        );
    }

    #[test]
    fn moderator_gets_partial_admin_access() {
        assert_eq!(
            decide(true, Some(Role::Moderator), RouteClass::Admin),
            Decision::Allow
        );
        // Concrete case from the sub-area table: moderator on /admin/users.
        assert_eq!(
            decide(true, Some(Role::Moderator), RouteClass::RestrictedAdmin),
            Decision::RedirectAdminRoot
        );
    }

    #[test]
    fn admin_reaches_everything() {
        for class in CLASSES {
            let expected = if class == RouteClass::Public {
                Decision::RedirectHome
            } else {
                Decision::Allow
            };
            assert_eq!(decide(true, Some(Role::Admin), class), expected);
        }
    }

    #[test]
    fn missing_role_with_session_is_most_restrictive() {
        assert_eq!(decide(true, None, RouteClass::Admin), Decision::RedirectHome);
        assert_eq!(
            decide(true, None, RouteClass::RestrictedAdmin),
            Decision::RedirectHome
        );
        assert_eq!(decide(true, None, RouteClass::Other), Decision::Allow);
    }
}
