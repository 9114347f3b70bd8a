//! UI Components for the Send a Dollar application.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with wallet connection
//! - [`Hero`] - Main title and description
//! - [`Splash`] - Startup overlay until config and host are ready
//! - [`Footer`] - Network badge
//!
//! # Feature Components
//! - [`SubmitSection`] - Address form and submission flow
//! - [`StatusPanel`] - Hash, confirmation, success, error and recovery displays
//! - [`StepProgress`] - Approve / confirm / register indicator
//! - [`ActivityPanel`] - Timestamped activity log

mod activity;
mod footer;
mod header;
mod hero;
mod progress;
mod splash;
mod status;
mod submit;

pub use activity::*;
pub use footer::*;
pub use header::*;
pub use hero::*;
pub use progress::*;
pub use splash::*;
pub use status::*;
pub use submit::*;
