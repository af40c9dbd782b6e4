use crate::api::ApiError;
use leptos::*;

/// Error banner for forms. Backend messages are shown as-is; client-side
/// codes are shown underneath when they add information.
#[component]
pub fn InlineErrorMessage(error: Signal<Option<ApiError>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ()>
            <div
                role="alert"
                class="bg-status-error-bg border border-status-error-border text-status-error-text px-4 py-3 rounded space-y-1 my-2"
            >
                <div class="font-bold">{move || error.get().map(|e| e.error).unwrap_or_default()}</div>
                {move || {
                    error
                        .get()
                        .filter(|e| show_code(&e.code))
                        .map(|e| view! { <div class="text-xs opacity-75">{"Code: "}{e.code}</div> }.into_view())
                        .unwrap_or_else(|| ().into_view())
                }}
            </div>
        </Show>
    }
}

fn show_code(code: &str) -> bool {
    !code.is_empty() && code != "UNKNOWN" && code != "VALIDATION_ERROR"
}
