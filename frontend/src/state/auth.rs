use std::{fmt, rc::Rc, str::FromStr};

use crate::{
    api::{ApiClient, ApiError, LoginRequest},
    pages::login::repository::LoginRepository,
    session::{use_session, SessionContext, SessionRecord},
};
use leptos::*;

type AuthContext = (ReadSignal<AuthState>, WriteSignal<AuthState>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Student,
    Instructor,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
            Role::Instructor => "INSTRUCTOR",
        }
    }

    pub fn landing_path(self) -> &'static str {
        match self {
            Role::Admin => "/adminhome",
            Role::Student => "/studenthome",
            Role::Instructor => "/instructorhome",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Student => "Student",
            Role::Instructor => "Instructor",
        }
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "STUDENT" => Ok(Role::Student),
            "INSTRUCTOR" => Ok(Role::Instructor),
            _ => Err(ApiError::unsupported_role(label)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reactive mirror of the stored session. `token` is what the app shell keys
/// its watchdog on.
#[derive(Clone, Default, PartialEq)]
pub struct AuthState {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl fmt::Debug for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthState")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("role", &self.role)
            .finish()
    }
}

impl AuthState {
    pub fn from_session(session: &SessionContext) -> Self {
        match session.store().get() {
            Ok(Some(record)) => Self {
                role: record.role.parse().ok(),
                token: Some(record.token),
            },
            Ok(None) => Self::default(),
            Err(err) => {
                log::warn!("session storage read failed: {}", err);
                Self::default()
            }
        }
    }
}

fn create_auth_context() -> AuthContext {
    let session = use_session();
    let (auth, set_auth) = create_signal(AuthState::from_session(&session));
    clear_on_expire(&session, set_auth);
    (auth, set_auth)
}

/// Resets the auth mirror whenever the session is rejected, so the app shell
/// sees the token go away even when no page reload follows.
pub fn clear_on_expire(session: &SessionContext, set_auth_state: WriteSignal<AuthState>) {
    session.on_expire(move || set_auth_state.set(AuthState::default()));
}

#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let ctx = create_auth_context();
    provide_context::<AuthContext>(ctx);
    view! { <>{children()}</> }
}

pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().unwrap_or_else(|| create_signal(AuthState::default()))
}

/// Authenticates, then records the session pair. A role the portal has no
/// landing page for is rejected before anything is stored.
pub async fn login_request(
    request: LoginRequest,
    repo: &LoginRepository,
    session: &SessionContext,
    set_auth_state: WriteSignal<AuthState>,
) -> Result<Role, ApiError> {
    let response = repo.login(&request).await?;
    let role: Role = response.role.parse()?;
    session
        .begin(&SessionRecord::new(response.token.clone(), role.label()))
        .map_err(|err| ApiError::storage(format!("Could not save session: {}", err)))?;

    set_auth_state.set(AuthState {
        token: Some(response.token),
        role: Some(role),
    });
    Ok(role)
}

/// Local only: clears the session pair and returns to the login view.
pub fn logout(session: &SessionContext, set_auth_state: WriteSignal<AuthState>) {
    session.end();
    set_auth_state.set(AuthState::default());
}

pub fn use_login_action() -> Action<LoginRequest, Result<Role, ApiError>> {
    let (_auth, set_auth) = use_auth();
    let session = use_session();
    let api = use_context::<ApiClient>().unwrap_or_default();
    let repo = LoginRepository::new_with_client(Rc::new(api));

    create_action(move |request: &LoginRequest| {
        let payload = request.clone();
        let repo = repo.clone();
        let session = session.clone();
        async move { login_request(payload, &repo, &session, set_auth).await }
    })
}

pub fn use_logout() -> impl Fn() + Clone + 'static {
    let (_auth, set_auth) = use_auth();
    let session = use_session();
    move || logout(&session, set_auth)
}
