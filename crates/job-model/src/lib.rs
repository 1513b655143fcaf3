//! Playblast Job Model
//!
//! Defines the configuration of a single viewport capture:
//! - **Job:** Output location, naming, format, codec/container, resolution, frame range
//! - **Naming:** How the output file name and path are derived from a job
//! - **Dialog:** The layout and advisory warnings shown while a job is edited
//!
//! Field bounds (resolution scale 1-100, frames and pixel sizes of at least 1)
//! are enforced when a value is set. Cross-field checks are advisory only.

pub mod dialog;
pub mod job;
pub mod naming;

pub use dialog::*;
pub use job::*;
pub use naming::*;
