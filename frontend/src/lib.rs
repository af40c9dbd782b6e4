pub mod api;
pub mod components;
pub mod config;
pub mod pages;
pub mod router;
pub mod session;
pub mod state;
mod test_support;
pub mod utils;

/// Installs logging, resolves runtime config, then mounts the app. Mounting
/// waits for config so the session watchdog picks up the configured period.
pub fn start_app() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("console logger unavailable: {}", err).into());
    }
    log::info!("starting Interview Prep Portal frontend");

    wasm_bindgen_futures::spawn_local(async move {
        config::init().await;
        router::mount_app();
    });
}
