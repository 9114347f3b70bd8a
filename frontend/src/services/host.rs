//! Mini-app host integration.
//!
//! When the app is embedded in a frame host that injects `frameSdk`, the host
//! keeps its own splash screen up until we report ready.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::wallet::js_error_message;

/// Report readiness to the embedding host. Returns whether a host was found.
pub async fn notify_host_ready() -> bool {
    match JsFuture::from(notify_host_ready_js()).await {
        Ok(found) => {
            let found = found.as_bool().unwrap_or(false);
            if found {
                log::info!("📣 Host notified that the app is ready");
            }
            found
        }
        Err(e) => {
            log::warn!("Host readiness hook failed: {}", js_error_message(&e));
            false
        }
    }
}

#[wasm_bindgen(module = "/src/js/host.js")]
extern "C" {
    #[wasm_bindgen(js_name = "notifyHostReady")]
    fn notify_host_ready_js() -> js_sys::Promise;
}
