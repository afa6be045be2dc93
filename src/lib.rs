//! Workspace placeholder crate.
//!
//! Exposes the workspace members under a single dependency so host
//! applications can pull in `playback-session` and reach both the bridge
//! contracts and the session core without wiring each crate individually.

pub use bridge_traits;
pub use core_session;
