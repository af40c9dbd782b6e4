use crate::session::{use_session, GuardDecision};
use leptos::*;

/// Renders `children` only while the stored session holds an unexpired token.
/// Anything else clears the session and sends the browser to the login view.
#[component]
pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
    let session = use_session();
    match session.guard().check() {
        GuardDecision::Authorized(_) => children().into_view(),
        GuardDecision::Unauthorized => ().into_view(),
    }
}
