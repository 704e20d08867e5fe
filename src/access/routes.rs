//! Route classification table.
//!
//! Classification is data, not scattered string checks: the guard stays total
//! and the whole reachable surface is auditable in one place.

/// Redirect target for unauthenticated callers.
pub const LOGIN_ROUTE: &str = "/login";
/// Redirect target for callers bounced out of the auth pages or the admin area.
pub const HOME_ROUTE: &str = "/";
/// Redirect target for mid-tier roles bounced out of restricted admin sub-areas.
pub const ADMIN_HOME_ROUTE: &str = "/admin";

/// Pages reachable without a session.
const PUBLIC_ROUTES: &[&str] = &[
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/verify-email",
];

/// Admin sub-areas reserved for roles that can manage users.
const RESTRICTED_ADMIN_ROUTES: &[&str] = &["/admin/users", "/admin/subscriptions"];

const ADMIN_ROUTE: &str = "/admin";

/// Coarse route category consumed by the decision function.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RouteClass {
    Public,
    Admin,
    RestrictedAdmin,
    Other,
}

/// Classify a request path. Restricted sub-areas take precedence over the
/// general admin prefix so `/admin/users/42` never degrades to plain admin.
#[must_use]
pub fn classify_route(path: &str) -> RouteClass {
    if RESTRICTED_ADMIN_ROUTES
        .iter()
        .any(|route| matches_route(path, route))
    {
        return RouteClass::RestrictedAdmin;
    }
    if matches_route(path, ADMIN_ROUTE) {
        return RouteClass::Admin;
    }
    if PUBLIC_ROUTES.iter().any(|route| matches_route(path, route)) {
        return RouteClass::Public;
    }
    RouteClass::Other
}

/// Prefix match on whole path segments only.
fn matches_route(path: &str, route: &str) -> bool {
    path == route
        || path
            .strip_prefix(route)
            .is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::{classify_route, matches_route, RouteClass};

    #[test]
    fn public_routes_classify_as_public() {
        assert_eq!(classify_route("/login"), RouteClass::Public);
        assert_eq!(classify_route("/register"), RouteClass::Public);
        assert_eq!(classify_route("/reset-password"), RouteClass::Public);
        assert_eq!(classify_route("/verify-email"), RouteClass::Public);
    }

    #[test]
    fn restricted_routes_win_over_admin_prefix() {
        assert_eq!(classify_route("/admin/users"), RouteClass::RestrictedAdmin);
        assert_eq!(
            classify_route("/admin/users/42"),
            RouteClass::RestrictedAdmin
        );
        assert_eq!(
            classify_route("/admin/subscriptions"),
            RouteClass::RestrictedAdmin
        );
        assert_eq!(classify_route("/admin"), RouteClass::Admin);
        assert_eq!(classify_route("/admin/stats"), RouteClass::Admin);
    }

    #[test]
    fn everything_else_is_other() {
        assert_eq!(classify_route("/"), RouteClass::Other);
        assert_eq!(classify_route("/chat"), RouteClass::Other);
        assert_eq!(classify_route("/billing"), RouteClass::Other);
    }

    #[test]
    fn matches_route_requires_segment_boundary() {
        assert!(matches_route("/admin", "/admin"));
        assert!(matches_route("/admin/stats", "/admin"));
        // `/administration` must not inherit the admin classification.
        assert!(!matches_route("/administration", "/admin"));
        assert!(!matches_route("/loginx", "/login"));
    }
}
