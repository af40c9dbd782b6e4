use crate::state::auth::{use_auth, use_logout, Role};
use leptos::*;

const NAV_LINK: &str =
    "text-fg-muted hover:text-fg px-3 py-2 rounded-md text-sm font-medium hover:bg-action-ghost-bg-hover";

#[component]
pub fn Header() -> impl IntoView {
    let (auth, _) = use_auth();
    let logout = use_logout();
    let role = move || auth.get().role;

    view! {
        <header class="bg-surface-elevated shadow-sm border-b border-border">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <h1 class="text-xl font-semibold text-fg">"Interview Prep Portal"</h1>
                    <nav class="flex items-center space-x-4">
                        {move || {
                            role()
                                .map(|role| {
                                    view! {
                                        <a href=role.landing_path() class=NAV_LINK>
                                            {format!("{} Home", role.display_name())}
                                        </a>
                                    }
                                        .into_view()
                                })
                                .unwrap_or_else(|| ().into_view())
                        }}
                        <button on:click=move |_| logout() class=NAV_LINK>
                            "Log Out"
                        </button>
                    </nav>
                </div>
            </div>
        </header>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-surface">
            <Header />
            <main class="max-w-7xl mx-auto py-6 sm:px-6 lg:px-8">{children()}</main>
        </div>
    }
}

pub fn role_title(role: Option<Role>) -> String {
    match role {
        Some(role) => format!("{} Dashboard", role.display_name()),
        None => "Dashboard".to_string(),
    }
}
