mod context;
mod guard;

pub use context::{AuthSnapshot, SessionContext};
pub use guard::{guard_redirect, Route, RouteGuard, SPLASH_DURATION};
