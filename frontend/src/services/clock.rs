//! Time source for receipt polling.

use std::time::Duration;

/// Wall clock and timer.
///
/// The browser implementation is [`BrowserClock`]; tests drive a virtual one.
#[allow(async_fn_in_trait)]
pub trait Clock {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> u64;

    /// Suspend the current task without blocking the event loop.
    async fn sleep(&self, duration: Duration);
}

/// `Date.now()` and `setTimeout` through gloo.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    async fn sleep(&self, duration: Duration) {
        gloo_timers::future::sleep(duration).await;
    }
}
