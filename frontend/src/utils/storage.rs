use web_sys::{Storage, Window};

pub fn window() -> Result<Window, String> {
    web_sys::window().ok_or_else(|| "no window object".to_string())
}

/// The browser's `localStorage`, where the session pair lives.
pub fn local_storage() -> Result<Storage, String> {
    window()?
        .local_storage()
        .map_err(|_| "localStorage access denied".to_string())?
        .ok_or_else(|| "localStorage not supported".to_string())
}
