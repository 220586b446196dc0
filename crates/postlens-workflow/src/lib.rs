//! Intake and analysis workflow for Postlens
//!
//! This crate holds the client-side controller that sits between a
//! presentation layer and the remote services:
//! - Drag counting across nested drop targets
//! - Lifetime management of the selected file's preview
//! - File intake from a picker or a drop
//! - The strictly ordered extraction -> analysis state machine
//! - A `Session` tying the above together into UI-visible states

pub mod drag;
pub mod intake;
pub mod pipeline;
pub mod preview;
pub mod session;

pub use drag::DragCounter;
pub use intake::FileIntake;
pub use pipeline::AnalysisPipeline;
pub use preview::{MemoryPreviewStore, PreviewManager};
pub use session::{Session, SessionView};
