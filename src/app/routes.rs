//! Routes and the route guard
//!
//! Every view declares a static [`AccessPolicy`]. [`guard`] evaluates a policy
//! against the current session and is re-run whenever the session status
//! changes; it keeps no state of its own.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::app::session::{Session, SessionStatus};
use crate::shared::Role;

/// Views of the client
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Contact,
    Login,
    Register,
    Dashboard,
    Events,
    Exams,
    Results,
    Materials,
    Profile,
    /// Anything under `/admin/`, e.g. `users` or `analytics`
    Admin(String),
}

impl Route {
    /// Where authenticated users land by default
    pub const LANDING: Route = Route::Dashboard;

    /// Map a path to a route. Unknown paths fall back to `Home`.
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_matches('/');

        if trimmed == "admin" {
            return Route::Admin(String::new());
        }
        if let Some(rest) = trimmed.strip_prefix("admin/") {
            return Route::Admin(rest.to_string());
        }

        match trimmed {
            "" => Route::Home,
            "about" => Route::About,
            "contact" => Route::Contact,
            "login" => Route::Login,
            "register" => Route::Register,
            "dashboard" => Route::Dashboard,
            "events" => Route::Events,
            "exams" => Route::Exams,
            "results" => Route::Results,
            "materials" => Route::Materials,
            "profile" => Route::Profile,
            _ => Route::Home,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Events => "/events".to_string(),
            Route::Exams => "/exams".to_string(),
            Route::Results => "/results".to_string(),
            Route::Materials => "/materials".to_string(),
            Route::Profile => "/profile".to_string(),
            Route::Admin(rest) if rest.is_empty() => "/admin".to_string(),
            Route::Admin(rest) => format!("/admin/{}", rest),
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        match self {
            Route::Home | Route::About | Route::Contact => AccessPolicy::PUBLIC,
            Route::Login | Route::Register => AccessPolicy::PUBLIC_ONLY,
            Route::Dashboard
            | Route::Events
            | Route::Exams
            | Route::Results
            | Route::Materials
            | Route::Profile => AccessPolicy::AUTHENTICATED,
            Route::Admin(_) => AccessPolicy::ADMIN,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Static access requirements of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessPolicy {
    pub requires_auth: bool,
    /// Only for visitors without a session (login, registration)
    pub public_only: bool,
    /// Empty means any authenticated role
    pub allowed_roles: &'static [Role],
}

impl AccessPolicy {
    pub const PUBLIC: AccessPolicy = AccessPolicy {
        requires_auth: false,
        public_only: false,
        allowed_roles: &[],
    };

    pub const PUBLIC_ONLY: AccessPolicy = AccessPolicy {
        requires_auth: false,
        public_only: true,
        allowed_roles: &[],
    };

    pub const AUTHENTICATED: AccessPolicy = AccessPolicy {
        requires_auth: true,
        public_only: false,
        allowed_roles: &[],
    };

    pub const ADMIN: AccessPolicy = AccessPolicy {
        requires_auth: true,
        public_only: false,
        allowed_roles: &[Role::Admin],
    };

    pub fn allows(&self, role: Role) -> bool {
        self.allowed_roles.is_empty() || self.allowed_roles.contains(&role)
    }
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session still loading; show a waiting indicator and re-evaluate later
    Wait,
    Admit,
    Redirect(Route),
}

/// Decide whether `session` may see a view with `policy`
pub fn guard(session: &Session, policy: &AccessPolicy) -> GuardDecision {
    match session.status() {
        SessionStatus::Loading => GuardDecision::Wait,
        SessionStatus::Authenticated if !policy.requires_auth && policy.public_only => {
            GuardDecision::Redirect(Route::LANDING)
        }
        SessionStatus::Anonymous if policy.requires_auth => GuardDecision::Redirect(Route::Login),
        SessionStatus::Authenticated => match session.identity() {
            Some(identity) if !policy.allows(identity.role) => GuardDecision::Redirect(Route::LANDING),
            _ => GuardDecision::Admit,
        },
        SessionStatus::Anonymous => GuardDecision::Admit,
    }
}

/// Current location, shared between the API client and the UI
#[derive(Debug, Clone)]
pub struct Navigator {
    tx: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        let (tx, _) = watch::channel(start);
        Self { tx: Arc::new(tx) }
    }

    pub fn navigate(&self, route: Route) {
        tracing::debug!(to = %route, "Navigating");
        self.tx.send_replace(route);
    }

    pub fn current(&self) -> Route {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }

    /// Run the guard for the current route and follow a redirect if it asks for one
    pub fn resolve(&self, session: &Session) -> GuardDecision {
        let route = self.current();
        let decision = guard(session, &route.policy());
        if let GuardDecision::Redirect(target) = &decision {
            tracing::debug!(from = %route, to = %target, "Route guard redirect");
            self.navigate(target.clone());
        }
        decision
    }
}

/// Sidebar entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub label: &'static str,
    pub route: Route,
}

/// Sidebar entries visible to `role`, in display order
pub fn navigation_items(role: Role) -> Vec<NavItem> {
    let mut items = vec![
        NavItem { label: "Dashboard", route: Route::Dashboard },
        NavItem { label: "Events", route: Route::Events },
        NavItem { label: "Exams", route: Route::Exams },
        NavItem { label: "Results", route: Route::Results },
        NavItem { label: "Study Materials", route: Route::Materials },
    ];

    if role.is_admin() {
        items.push(NavItem { label: "Users", route: Route::Admin("users".to_string()) });
        items.push(NavItem { label: "Analytics", route: Route::Admin("analytics".to_string()) });
    }

    items.push(NavItem { label: "Profile", route: Route::Profile });
    items
}
