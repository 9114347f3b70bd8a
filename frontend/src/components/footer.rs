//! Footer component

use leptos::*;

#[component]
pub fn Footer(
    /// Network label, e.g. "Base"
    #[prop(into)]
    network_name: Signal<String>,
) -> impl IntoView {
    view! {
        <footer>
            <div class="network-badge">
                <span class="network-dot"></span>
                {move || format!("Running on {} Network", network_name.get())}
            </div>
        </footer>
    }
}
