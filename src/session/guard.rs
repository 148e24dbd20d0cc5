use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use super::AuthSnapshot;

/// How long the intro screen stays up before handing off to login.
pub const SPLASH_DURATION: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Splash,
    Login,
    Dashboard,
    Alerts,
    History,
    Documents,
    Profile,
    Portal,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Splash => "splash",
            Route::Login => "login",
            Route::Dashboard => "dashboard",
            Route::Alerts => "alertas",
            Route::History => "historico",
            Route::Documents => "documentos",
            Route::Profile => "perfil",
            Route::Portal => "mipi-web",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('/') {
            "splash" => Ok(Route::Splash),
            "login" => Ok(Route::Login),
            "dashboard" => Ok(Route::Dashboard),
            "alertas" | "alerts" => Ok(Route::Alerts),
            "historico" | "history" => Ok(Route::History),
            "documentos" | "documents" => Ok(Route::Documents),
            "perfil" | "profile" => Ok(Route::Profile),
            "mipi-web" | "portal" => Ok(Route::Portal),
            other => Err(format!("unknown route: {other}")),
        }
    }
}

/// The core redirect rule: unauthenticated users go to login, authenticated
/// users are sent away from it. `None` means stay.
pub fn guard_redirect(authenticated: bool, current: Route) -> Option<Route> {
    match (authenticated, current) {
        (false, Route::Login) => None,
        (false, _) => Some(Route::Login),
        (true, Route::Login) => Some(Route::Dashboard),
        (true, _) => None,
    }
}

/// Route guard with the intro step. Never redirects while the persisted
/// session is still being read.
#[derive(Debug, Default)]
pub struct RouteGuard {
    splash_shown: bool,
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_route(&mut self, auth: &AuthSnapshot, current: Route) -> Option<Route> {
        if auth.is_loading {
            return None;
        }
        if !self.splash_shown && current != Route::Splash {
            self.splash_shown = true;
            return Some(Route::Splash);
        }
        if current == Route::Splash {
            self.splash_shown = true;
            return None;
        }
        let next = guard_redirect(auth.is_authenticated(), current);
        if let Some(route) = next {
            debug!(from = %current, to = %route, "route guard redirect");
        }
        next
    }

    /// Where the intro screen hands off once [`SPLASH_DURATION`] has elapsed.
    pub fn splash_finished(&self) -> Route {
        Route::Login
    }
}
