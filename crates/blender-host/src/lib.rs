//! Playblast Blender Host
//!
//! Runs playblasts through a Blender executable in background mode.
//!
//! The render settings and scene range live in a [`HostState`] that is kept
//! in a session file between invocations. A capture writes that state into
//! the opened `.blend` file through a generated Python expression and calls
//! Blender's viewport render over the scene range.
//!
//! [`HostState`]: playblast_host_core::HostState

pub mod host;
pub mod process;
pub mod script;
pub mod session;

pub use host::BlenderHost;
pub use process::{BlenderProcess, OutputLine, ProcessReport};
pub use session::SessionFile;
