use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::{
    api::ApiClient,
    components::{guard::RequireSession, shell::AppShell},
    config,
    pages::{home::HomePage, login::LoginPage, role_home::RoleHomePage},
    session::{provide_session, SessionConfig, SessionContext},
    state::auth::{AuthProvider, Role},
};

pub const ROUTE_PATHS: &[&str] = &[
    "/",
    "/login",
    "/adminhome",
    "/studenthome",
    "/instructorhome",
];

pub const PROTECTED_ROUTE_PATHS: &[&str] = &["/adminhome", "/studenthome", "/instructorhome"];

pub const PUBLIC_ROUTE_PATHS: &[&str] = &["/", "/login"];

pub fn mount_app() {
    mount_to_body(app_root);
}

pub fn app_root() -> impl IntoView {
    provide_meta_context();
    provide_context(ApiClient::new());
    provide_session(SessionContext::browser(SessionConfig::from_runtime(
        &config::current(),
    )));
    view! {
        <Title text="Interview Prep Portal"/>
        <AuthProvider>
            <AppShell>
                <Router>
                    <Routes>
                        <Route path="/" view=HomePage/>
                        <Route path="/login" view=LoginPage/>
                        <Route path="/adminhome" view=ProtectedAdminHome/>
                        <Route path="/studenthome" view=ProtectedStudentHome/>
                        <Route path="/instructorhome" view=ProtectedInstructorHome/>
                    </Routes>
                </Router>
            </AppShell>
        </AuthProvider>
    }
}

#[component]
fn ProtectedAdminHome() -> impl IntoView {
    view! { <RequireSession><RoleHomePage role=Role::Admin/></RequireSession> }
}

#[component]
fn ProtectedStudentHome() -> impl IntoView {
    view! { <RequireSession><RoleHomePage role=Role::Student/></RequireSession> }
}

#[component]
fn ProtectedInstructorHome() -> impl IntoView {
    view! { <RequireSession><RoleHomePage role=Role::Instructor/></RequireSession> }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn public_and_protected_routes_partition_all_routes() {
        let all: HashSet<&str> = ROUTE_PATHS.iter().copied().collect();
        let protected: HashSet<&str> = PROTECTED_ROUTE_PATHS.iter().copied().collect();
        let public: HashSet<&str> = PUBLIC_ROUTE_PATHS.iter().copied().collect();

        assert!(protected.is_disjoint(&public));
        assert_eq!(&protected | &public, all);
    }

    #[test]
    fn no_duplicate_routes() {
        let unique: HashSet<&str> = ROUTE_PATHS.iter().copied().collect();
        assert_eq!(unique.len(), ROUTE_PATHS.len());
    }

    #[test]
    fn every_role_lands_on_a_protected_route() {
        for role in [Role::Admin, Role::Student, Role::Instructor] {
            assert!(PROTECTED_ROUTE_PATHS.contains(&role.landing_path()));
        }
    }

    #[test]
    fn login_redirect_target_is_public() {
        assert!(PUBLIC_ROUTE_PATHS.contains(&SessionConfig::default().login_path));
    }
}
