use leptos::*;

use crate::services::{Eip1193Wallet, WalletClient};
use crate::types::Address;

#[component]
pub fn Header(
    wallet_address: ReadSignal<Option<Address>>,
    set_wallet_address: WriteSignal<Option<Address>>,
) -> impl IntoView {
    let (connect_error, set_connect_error) = create_signal(None::<String>);

    // Pick up an already authorized account without prompting
    spawn_local(async move {
        match Eip1193Wallet.account().await {
            Ok(Some(address)) => {
                log::info!("🔑 Restored wallet session: {}", address);
                set_wallet_address.set(Some(address));
            }
            Ok(None) => {}
            Err(e) => log::warn!("Could not read wallet account: {}", e),
        }
    });

    let on_wallet_click = move |_| {
        if wallet_address.get().is_some() {
            return;
        }
        log::info!("🔑 Attempting to connect wallet...");
        set_connect_error.set(None);

        spawn_local(async move {
            match Eip1193Wallet.connect().await {
                Ok(address) => {
                    set_wallet_address.set(Some(address));
                }
                Err(e) => {
                    log::error!("❌ Wallet connection failed: {}", e);
                    set_connect_error.set(Some(e.to_string()));
                }
            }
        });
    };

    view! {
        <header>
            <div class="header-left">
                <span class="logo">"SEND A DOLLAR"</span>
            </div>
            <div class="header-right">
                <div
                    class="wallet-status"
                    class:connected=move || wallet_address.get().is_some()
                    on:click=on_wallet_click
                    title=move || connect_error.get().unwrap_or_default()
                    style="cursor: pointer;"
                >
                    <span class="wallet-dot" class:connected=move || wallet_address.get().is_some()></span>
                    <span>
                        {move || match wallet_address.get() {
                            Some(address) => address.short(),
                            None => "Connect Wallet".to_string(),
                        }}
                    </span>
                </div>
                <Show when=move || connect_error.get().is_some() fallback=|| ()>
                    <div class="wallet-error">{move || connect_error.get().unwrap_or_default()}</div>
                </Show>
            </div>
        </header>
    }
}
