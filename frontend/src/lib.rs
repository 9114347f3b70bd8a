//! Send a Dollar - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend that takes a physical address, approves one
//! dollar of USDC and registers the address on-chain, so a custom QR code
//! can be mailed to it.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (wallet connection)                                  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  MainContent                                                 │
//! │  ├── Hero (title)                                           │
//! │  ├── SubmitSection (form, progress, status, recovery)       │
//! │  └── ActivityPanel (when something happened)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer (network)                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Injected network configuration and `config.json` loading
//! - [`types`] - Chain types, transaction request, submission state, logs
//! - [`error`] - Wallet, submission and config errors
//! - [`calldata`] - Approval and registration payloads
//! - [`components`] - UI components
//! - [`services`] - Wallet, confirmation wait and the submitter

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod calldata;
pub mod components;
pub mod config;
pub mod error;
pub mod services;
pub mod types;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Chain
    Address, CallData, Selector, TxHash,
    // Transactions
    TransactionRequest,
    // Submission
    SubmissionState,
    // Logs
    LogEntry, LogLevel,
};

// Errors
pub use error::{ConfigError, SubmitError, WalletError};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// Install logging and mount the app. Called from the trunk binary.
pub fn run() {
    // Setup panic hook for better error messages
    console_error_panic_hook::set_once();

    // Setup console logging
    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("🦀 Send a Dollar - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    let (config, set_config) = create_signal(None::<SubmitterConfig>);
    let (wallet_address, set_wallet_address) = create_signal(None::<Address>);
    let (logs, set_logs) = create_signal(Vec::<LogEntry>::new());

    // Load config and tell the host we are ready, ONCE at startup
    spawn_local(async move {
        let loaded = load_config().await;
        notify_host_ready().await;
        set_config.set(Some(loaded));
    });

    let network_name = Signal::derive(move || {
        config.with(|c| c.as_ref().map(|c| c.network_name.clone()).unwrap_or_default())
    });

    view! {
        <Show when=move || config.with(Option::is_none) fallback=|| ()>
            <Splash/>
        </Show>

        <Header
            wallet_address=wallet_address
            set_wallet_address=set_wallet_address
        />

        <div class="container">
            <Hero/>

            {move || config.get().map(|config| view! {
                <SubmitSection
                    config=config
                    wallet_address=wallet_address
                    set_logs=set_logs
                />
            })}

            <Show
                when=move || !logs.with(Vec::is_empty)
                fallback=|| ()
            >
                <ActivityPanel logs=logs set_logs=set_logs/>
            </Show>
        </div>

        <Footer network_name=network_name/>
    }
}
