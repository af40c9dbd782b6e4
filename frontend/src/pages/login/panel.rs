use crate::{
    api::{ApiError, LoginRequest},
    pages::login::{components::form::LoginForm, utils},
    session::use_session,
    state::auth,
};
use leptos::{ev::SubmitEvent, Callback, *};

#[component]
pub fn LoginPanel() -> impl IntoView {
    let (username, set_username) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (error, set_error) = create_signal(None::<ApiError>);

    let session = use_session();
    let login_action = auth::use_login_action();
    let pending = login_action.pending();

    create_effect(move |_| {
        if let Some(result) = login_action.value().get() {
            match result {
                Ok(role) => {
                    set_error.set(None);
                    set_password.set(String::new());
                    session.navigator().navigate(role.landing_path());
                }
                Err(err) => set_error.set(Some(err)),
            }
        }
    });

    let handle_submit = Callback::new(move |ev: SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let uname = username.get_untracked();
        let pword = password.get_untracked();

        if let Err(err) = utils::validate_credentials(&uname, &pword) {
            set_error.set(Some(err));
            return;
        }
        set_error.set(None);

        login_action.dispatch(LoginRequest {
            username: uname.trim().to_string(),
            password: pword,
        });
    });

    let username_input = Callback::new(move |value: String| set_username.set(value));
    let password_input = Callback::new(move |value: String| set_password.set(value));

    view! {
        <LoginForm
            username=username
            password=password
            error=error.into()
            pending=pending.into()
            on_username_input=username_input
            on_password_input=password_input
            on_submit=handle_submit
        />
    }
}
