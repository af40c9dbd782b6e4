use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const DEFAULT_API_BASE_URL: &str =
    "https://interview-prep-portal-backend-application.onrender.com";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default, alias = "API_BASE_URL")]
    pub api_base_url: Option<String>,
    #[serde(default, alias = "SESSION_CHECK_INTERVAL_SECS")]
    pub session_check_interval_secs: Option<u64>,
}

impl RuntimeConfig {
    /// Fills unset fields from `fallback`.
    pub fn or(self, fallback: RuntimeConfig) -> RuntimeConfig {
        RuntimeConfig {
            api_base_url: self.api_base_url.or(fallback.api_base_url),
            session_check_interval_secs: self
                .session_check_interval_secs
                .or(fallback.session_check_interval_secs),
        }
    }

    pub fn api_base_url(&self) -> String {
        self.api_base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string()
    }
}

static RUNTIME_CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

/// Precedence: `window.__PREP_PORTAL_ENV` (env.js), then
/// `window.__PREP_PORTAL_CONFIG`, then `./config.json`.
pub fn resolve(
    env: Option<RuntimeConfig>,
    window_config: Option<RuntimeConfig>,
    fetched: Option<RuntimeConfig>,
) -> RuntimeConfig {
    [env, window_config, fetched]
        .into_iter()
        .flatten()
        .fold(RuntimeConfig::default(), RuntimeConfig::or)
}

/// Config resolved so far, or defaults before [`init`] completes.
pub fn current() -> RuntimeConfig {
    RUNTIME_CONFIG.get().cloned().unwrap_or_default()
}

pub async fn load() -> RuntimeConfig {
    if let Some(cached) = RUNTIME_CONFIG.get() {
        return cached.clone();
    }
    let config = browser::load().await;
    let _ = RUNTIME_CONFIG.set(config.clone());
    RUNTIME_CONFIG.get().cloned().unwrap_or(config)
}

pub async fn await_api_base_url() -> String {
    load().await.api_base_url()
}

pub async fn init() {
    let config = load().await;
    log::info!(
        "runtime config: api_base_url={}, session_check_interval_secs={:?}",
        config.api_base_url(),
        config.session_check_interval_secs
    );
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{resolve, RuntimeConfig};

    fn read_global(name: &str) -> Option<RuntimeConfig> {
        let window = web_sys::window()?;
        let any = js_sys::Reflect::get(&window, &name.into()).ok()?;
        if any.is_undefined() || any.is_null() {
            return None;
        }
        let read = |keys: &[&str]| {
            keys.iter().find_map(|key| {
                js_sys::Reflect::get(&any, &(*key).into())
                    .ok()
                    .filter(|v| !v.is_undefined() && !v.is_null())
            })
        };
        let api_base_url = read(&["api_base_url", "API_BASE_URL"]).and_then(|v| v.as_string());
        let session_check_interval_secs = read(&[
            "session_check_interval_secs",
            "SESSION_CHECK_INTERVAL_SECS",
        ])
        .and_then(|v| v.as_f64().or_else(|| v.as_string()?.parse().ok()))
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| secs as u64);
        Some(RuntimeConfig {
            api_base_url,
            session_check_interval_secs,
        })
    }

    async fn fetch_runtime_config() -> Option<RuntimeConfig> {
        let origin = web_sys::window()?.location().origin().ok()?;
        let resp = reqwest::get(format!("{}/config.json", origin)).await.ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json::<RuntimeConfig>().await.ok()
    }

    pub(super) async fn load() -> RuntimeConfig {
        let env = read_global("__PREP_PORTAL_ENV");
        let window_config = read_global("__PREP_PORTAL_CONFIG");
        let fetched = if env.is_some() || window_config.is_some() {
            None
        } else {
            fetch_runtime_config().await
        };
        resolve(env, window_config, fetched)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod browser {
    use super::RuntimeConfig;

    pub(super) async fn load() -> RuntimeConfig {
        RuntimeConfig::default()
    }
}
