//! Startup overlay

use leptos::*;

#[component]
pub fn Splash() -> impl IntoView {
    view! {
        <div class="splash">
            <div class="spinner large"></div>
        </div>
    }
}
