//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Send a Dollar"</h1>
            <h2 class="subtitle">"Get Your Custom QR"</h2>
        </div>
    }
}
