//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod autofocus;

pub use autofocus::{autofocus_task, AutofocusTaskConfig};
