//! Playblast Capture Engine
//!
//! Runs one viewport capture against a host while guaranteeing that the
//! host's global render settings look the same afterwards as before.
//!
//! # Transaction
//!
//! ```text
//!            ┌──────────────┐
//!  Idle ───▶ │ Configuring  │  dialog edits a JobConfiguration
//!            └──────┬───────┘
//!                   ▼
//!            ┌──────────────┐
//!            │  Applying    │  snapshot render settings, write the job
//!            └──────┬───────┘
//!                   ▼
//!            ┌──────────────┐        ┌────────┐
//!            │  Capturing   │ ─err─▶ │ Failed │
//!            └──────┬───────┘        └───┬────┘
//!                   ▼                    │
//!            ┌──────────────┐            │
//!            │  Restoring   │ ◀──────────┘
//!            └──────┬───────┘
//!                   ▼
//!                 Idle
//! ```
//!
//! Restoration is owned by a drop guard, so it also runs when applying or
//! capturing panics.

pub mod guard;
pub mod operator;
pub mod plan;
pub mod transaction;

pub use guard::*;
pub use operator::*;
pub use plan::*;
pub use transaction::*;
