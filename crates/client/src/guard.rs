//! Navigation guards.
//!
//! Before a view is shown, [`navigate`] decides whether to render it, show a
//! loading placeholder, or send the user somewhere else. Both checks are
//! synchronous reads of the [`Session`].

use mindful_ledger_core::types::Role;

use crate::session::Session;

/// Every view of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Dashboard,
    Transactions,
    SavingGoals,
    Habits,
    Snapshots,
    Categories,
    InvestmentProfiles,
    Profile,
}

impl Route {
    pub const ALL: [Self; 10] = [
        Self::Login,
        Self::Register,
        Self::Dashboard,
        Self::Transactions,
        Self::SavingGoals,
        Self::Habits,
        Self::Snapshots,
        Self::Categories,
        Self::InvestmentProfiles,
        Self::Profile,
    ];

    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Dashboard => "/",
            Self::Transactions => "/transactions",
            Self::SavingGoals => "/saving-goals",
            Self::Habits => "/habits",
            Self::Snapshots => "/snapshots",
            Self::Categories => "/categories",
            Self::InvestmentProfiles => "/investment-profiles",
            Self::Profile => "/profile",
        }
    }

    /// Resolve a path. Unknown paths go to the dashboard.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL
            .into_iter()
            .find(|r| r.path() == normalized)
            .unwrap_or(Self::Dashboard)
    }

    /// Reachable without logging in.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// Role needed beyond being logged in.
    #[must_use]
    pub const fn required_role(self) -> Option<Role> {
        match self {
            Self::Categories => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Show the requested view.
    Render,
    /// The session is still being restored; show a placeholder.
    Loading,
    /// Go to another view instead.
    Redirect(Route),
}

/// Authenticated guard: loading, redirect to login, or render.
#[must_use]
pub const fn require_auth(session: &Session) -> Navigation {
    if session.is_loading() {
        Navigation::Loading
    } else if !session.is_authenticated() {
        Navigation::Redirect(Route::Login)
    } else {
        Navigation::Render
    }
}

/// Role guard: redirect home unless the user has `role`.
#[must_use]
pub fn require_role(session: &Session, role: Role) -> Navigation {
    if session.has_role(role) {
        Navigation::Render
    } else {
        Navigation::Redirect(Route::Dashboard)
    }
}

/// Run every guard that applies to `route`.
#[must_use]
pub fn navigate(session: &Session, route: Route) -> Navigation {
    if route.is_public() {
        return Navigation::Render;
    }
    match require_auth(session) {
        Navigation::Render => {}
        other => return other,
    }
    match route.required_role() {
        Some(role) => require_role(session, role),
        None => Navigation::Render,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::ApiClient;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn session() -> Session {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let client = ApiClient::with_base_url(
            url::Url::parse("http://127.0.0.1:9/api").unwrap(),
            Arc::clone(&store),
        )
        .unwrap();
        Session::new(client, store)
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Route::from_path("/habits"), Route::Habits);
        assert_eq!(Route::from_path("/saving-goals/"), Route::SavingGoals);
        assert_eq!(Route::from_path(""), Route::Dashboard);
        assert_eq!(Route::from_path("/nope"), Route::Dashboard);
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_loading_session_shows_placeholder() {
        let session = session();
        assert_eq!(navigate(&session, Route::Habits), Navigation::Loading);
        assert_eq!(navigate(&session, Route::Login), Navigation::Render);
    }

    #[tokio::test]
    async fn test_anonymous_redirects_to_login() {
        let mut session = session();
        session.bootstrap().await;
        assert_eq!(
            navigate(&session, Route::Dashboard),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            navigate(&session, Route::Categories),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(navigate(&session, Route::Register), Navigation::Render);
    }

    #[test]
    fn test_role_guard_without_user_redirects_home() {
        let session = session();
        assert_eq!(
            require_role(&session, Role::Admin),
            Navigation::Redirect(Route::Dashboard)
        );
    }

    #[test]
    fn test_only_categories_needs_admin() {
        let admin_only: Vec<_> = Route::ALL
            .into_iter()
            .filter(|r| r.required_role().is_some())
            .collect();
        assert_eq!(admin_only, [Route::Categories]);
    }
}
