//! Activity log of the current page session.
//!
//! Every submission status change lands here with a timestamp, newest
//! at the bottom, with auto-scroll.

use std::sync::atomic::{AtomicU64, Ordering};

use leptos::*;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::{LogEntry, LogLevel, MAX_LOG_ENTRIES};

/// Request animation frame helper for smooth scrolling
fn request_animation_frame(f: impl FnOnce() + 'static) {
    let closure = Closure::once(f);
    if let Err(e) = gloo_utils::window().request_animation_frame(closure.as_ref().unchecked_ref()) {
        log::warn!("requestAnimationFrame failed: {:?}", e);
    }
    closure.forget();
}

/// Append an entry, dropping the oldest past [`MAX_LOG_ENTRIES`].
pub fn push_log(set_logs: WriteSignal<Vec<LogEntry>>, entry: LogEntry) {
    match entry.level {
        LogLevel::Error => log::error!("{}", entry.message),
        LogLevel::Warning => log::warn!("{}", entry.message),
        _ => log::info!("{}", entry.message),
    }

    set_logs.update(|logs| append_bounded(logs, entry));
}

/// Next sequence number handed to an appended entry; never reused.
static NEXT_LOG_SEQ: AtomicU64 = AtomicU64::new(1);

fn append_bounded(logs: &mut Vec<LogEntry>, mut entry: LogEntry) {
    entry.seq = NEXT_LOG_SEQ.fetch_add(1, Ordering::Relaxed);
    logs.push(entry);
    if logs.len() > MAX_LOG_ENTRIES {
        let excess = logs.len() - MAX_LOG_ENTRIES;
        logs.drain(..excess);
    }
}

#[component]
pub fn ActivityPanel(
    /// Signal for logs data
    logs: ReadSignal<Vec<LogEntry>>,
    /// Set logs signal (for clearing)
    set_logs: WriteSignal<Vec<LogEntry>>,
) -> impl IntoView {
    let logs_container = create_node_ref::<leptos::html::Div>();

    // Auto-scroll to bottom when logs change
    create_effect(move |_| {
        let _ = logs.get();

        if let Some(container) = logs_container.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    view! {
        <div class="logs-panel">
            <div class="logs-header">
                <span class="logs-title">"📋 Activity"</span>
                <button
                    class="logs-clear"
                    on:click=move |_| set_logs.set(vec![])
                >
                    "Clear"
                </button>
            </div>
            <div class="logs-content" node_ref=logs_container>
                <For
                    each=move || logs.get()
                    key=|entry| entry.seq
                    children=move |entry| {
                        view! {
                            <div class=format!("log-entry {}", entry.level.css_class())>
                                <span class="log-time">"[" {entry.timestamp.clone()} "] "</span>
                                {entry.message.clone()}
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            level: LogLevel::Info,
            message: format!("entry {}", n),
            timestamp: "12:00:00".to_string(),
            seq: 0,
        }
    }

    #[test]
    fn test_log_is_bounded() {
        let mut logs = Vec::new();
        for n in 0..MAX_LOG_ENTRIES + 5 {
            append_bounded(&mut logs, entry(n));
        }

        assert_eq!(logs.len(), MAX_LOG_ENTRIES);
        assert_eq!(logs[0].message, "entry 5");
        assert_eq!(logs.last().map(|e| e.message.as_str()), Some("entry 104"));
    }

    #[test]
    fn test_full_log_keeps_fresh_keys() {
        let mut logs = Vec::new();
        for n in 0..MAX_LOG_ENTRIES {
            append_bounded(&mut logs, entry(n));
        }
        let before: Vec<u64> = logs.iter().map(|e| e.seq).collect();

        append_bounded(&mut logs, entry(MAX_LOG_ENTRIES));

        let after: Vec<u64> = logs.iter().map(|e| e.seq).collect();
        assert_eq!(after.len(), MAX_LOG_ENTRIES);
        assert_ne!(before, after);
        assert_eq!(&after[..MAX_LOG_ENTRIES - 1], &before[1..]);
        assert!(!before.contains(&after[MAX_LOG_ENTRIES - 1]));
        assert_eq!(logs.last().map(|e| e.message.as_str()), Some("entry 100"));
    }

    #[test]
    fn test_entries_get_distinct_keys() {
        let mut logs = Vec::new();
        append_bounded(&mut logs, LogEntry::now(LogLevel::Info, "first"));
        append_bounded(&mut logs, LogEntry::now(LogLevel::Info, "first"));

        assert_ne!(logs[0].seq, logs[1].seq);
        assert!(logs[0].seq < logs[1].seq);
    }
}
