use crate::{
    components::layout::{role_title, Layout},
    state::auth::Role,
};
use leptos::*;

fn greeting(role: Role) -> &'static str {
    match role {
        Role::Admin => "Manage courses, instructors and students.",
        Role::Student => "Your learning journey starts here.",
        Role::Instructor => "Prepare questions and follow your students.",
    }
}

/// Landing page after login. One component serves every role; the router
/// mounts it once per landing path.
#[component]
pub fn RoleHomePage(role: Role) -> impl IntoView {
    view! {
        <Layout>
            <div class="text-center mb-8">
                <h2 class="text-3xl font-bold tracking-tight text-fg">{role_title(Some(role))}</h2>
                <p class="mt-2 text-fg-muted">{greeting(role)}</p>
            </div>
        </Layout>
    }
}
