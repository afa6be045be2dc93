//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the playback-session core and the
//! platform-specific collaborators it is built over. Each trait represents a
//! capability the core requires but that must be implemented differently per
//! platform (desktop, iOS, Android, web).
//!
//! ## Traits
//!
//! ### Media engine
//! - [`MediaEngine`](engine::MediaEngine) - Opaque playback engine: resource
//!   lifecycle, transport control, seek, and the per-resource signal stream
//!
//! ### Platform Integration
//! - [`ConnectivityMonitor`](network::ConnectivityMonitor) - Reachability
//!   transitions
//! - [`AudioSessionHost`](audio_session::AudioSessionHost) - Audio-session
//!   category, interruptions, output-route changes
//! - [`BackgroundExecutionHost`](background::BackgroundExecutionHost) -
//!   Background keep-alive grants
//! - [`RemoteCommandSource`](remote::RemoteCommandSource) - External
//!   transport commands (lock screen, headset buttons, control center)
//!
//! ## Resource ownership
//!
//! The session core is the only component allowed to call the mutating
//! [`MediaEngine`](engine::MediaEngine) operations. Hosts feed inputs through
//! the observable streams and the session's own command surface; they never
//! drive the engine directly.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Platform implementations should:
//!
//! - Convert platform-specific errors to `BridgeError`
//! - Provide actionable error messages
//! - Include error context (e.g., the URL or resource involved)
//!
//! ## Thread Safety
//!
//! On native targets all bridge traits require `Send + Sync` bounds so
//! implementations can be shared across async tasks. WebAssembly builds relax
//! the bounds through the markers in [`platform`].
//!
//! ## Examples
//!
//! ### Implementing ConnectivityMonitor
//!
//! ```ignore
//! use bridge_traits::network::{ConnectivityMonitor, ReachabilityStream};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyMonitor { /* platform handle */ }
//!
//! #[async_trait]
//! impl ConnectivityMonitor for MyMonitor {
//!     async fn is_reachable(&self) -> bool {
//!         // Implementation
//!         todo!()
//!     }
//!
//!     async fn subscribe_changes(&self) -> Result<Box<dyn ReachabilityStream>> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod audio_session;
pub mod background;
pub mod engine;
pub mod error;
pub mod network;
pub mod platform;
pub mod remote;

pub use error::BridgeError;

// Re-export commonly used types
pub use audio_session::{AudioSessionEvent, AudioSessionHost, OutputRoute};
pub use background::{BackgroundExecutionHost, GrantId};
pub use engine::{
    EngineEvent, EngineEventStream, EngineStatus, MediaEngine, ResourceId, SeekRequestId, TimeRange,
};
pub use network::{ConnectivityMonitor, ReachabilityStream};
pub use remote::{RemoteCommand, RemoteCommandSource};
