use crate::{api::ApiError, components::error::InlineErrorMessage};
use leptos::{ev::SubmitEvent, Callback, *};

#[component]
pub fn LoginForm(
    username: ReadSignal<String>,
    password: ReadSignal<String>,
    error: Signal<Option<ApiError>>,
    pending: Signal<bool>,
    on_username_input: Callback<String>,
    on_password_input: Callback<String>,
    on_submit: Callback<SubmitEvent>,
) -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center bg-surface py-12 px-4 sm:px-6 lg:px-8">
            <div class="max-w-md w-full space-y-8">
                <div>
                    <h2 class="mt-6 text-center text-3xl font-bold tracking-tight text-fg">
                        "Welcome Back"
                    </h2>
                    <p class="mt-2 text-center text-sm text-fg-muted">
                        "Continue your interview preparation journey"
                    </p>
                </div>
                <form class="mt-8 space-y-6" on:submit=move |ev| on_submit.call(ev)>
                    <InlineErrorMessage error=error />
                    <div class="rounded-md shadow-sm space-y-4">
                        <div>
                            <label for="username" class="sr-only">"Username"</label>
                            <input
                                id="username"
                                name="username"
                                type="text"
                                required
                                aria-label="Username"
                                class="block w-full px-3 py-3 border border-border rounded-md text-fg placeholder-fg-muted focus:outline-none focus:ring-2 focus:ring-action-primary-bg"
                                placeholder="Username"
                                prop:value=username
                                on:input=move |ev| on_username_input.call(event_target_value(&ev))
                            />
                        </div>
                        <div>
                            <label for="password" class="sr-only">"Password"</label>
                            <input
                                id="password"
                                name="password"
                                type="password"
                                required
                                aria-label="Password"
                                class="block w-full px-3 py-3 border border-border rounded-md text-fg placeholder-fg-muted focus:outline-none focus:ring-2 focus:ring-action-primary-bg"
                                placeholder="Password"
                                prop:value=password
                                on:input=move |ev| on_password_input.call(event_target_value(&ev))
                            />
                        </div>
                    </div>
                    <button
                        type="submit"
                        disabled=move || pending.get()
                        class="w-full flex justify-center py-3 px-4 rounded-lg text-sm font-semibold text-action-primary-text bg-action-primary-bg hover:bg-action-primary-bg-hover disabled:opacity-50"
                    >
                        {move || if pending.get() { "Logging in..." } else { "Log In" }}
                    </button>
                </form>
            </div>
        </div>
    }
}
