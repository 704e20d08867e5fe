//! Pure access-control core: roles, route classification, the route
//! authorization decision, and device fingerprint classification.
//!
//! Nothing in this module touches the store or the clock; handlers and the
//! page guard feed it already-resolved facts and act on the returned values.

pub mod device;
pub mod guard;
pub mod role;
pub mod routes;

pub use device::classify_device;
pub use guard::{decide, Decision};
pub use role::{Capabilities, Role};
pub use routes::{classify_route, RouteClass, ADMIN_HOME_ROUTE, HOME_ROUTE, LOGIN_ROUTE};
