//! # Playback Session Core
//!
//! The authoritative owner of "what should the media engine be doing right
//! now". The session reconciles caller intent (play, pause, seek, item
//! changes), engine signals (readiness, buffering, duration, position, seek
//! completion, end of media), network reachability, and platform
//! audio-session events into a single consistent state, recovering from
//! resource failures and silent stalls by rebuilding the engine resource.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐ commands ┌─────────────────────────────┐
//! │ Host UI /    ├─────────>│        PlayerSession        │
//! │ remote ctrl  │          │  (actor, single event loop) │
//! └──────────────┘          │                             │
//! ┌──────────────┐  events  │  SessionState::apply(event) │ effects ┌─────────────┐
//! │ MediaEngine  ├─────────>│      -> Vec<Effect>         ├────────>│ MediaEngine │
//! │ Connectivity │          │                             │         │ AudioSession│
//! │ AudioSession │          └──────────────┬──────────────┘         │ Background  │
//! └──────────────┘                         │ deduplicated           └─────────────┘
//!                                          ▼
//!                                   SessionSignals
//!                            (is_playing, status, duration,
//!                             played_time, buffering, ...)
//! ```
//!
//! Every input becomes a [`SessionEvent`](events::SessionEvent) processed in
//! strict arrival order by the pure state machine in [`state`]; the actor in
//! [`session`] executes the resulting effects against the
//! [`bridge_traits`] collaborators. [`queue`] adds next/previous navigation
//! and auto-advance on top, without owning any playback state itself.
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use core_session::{PlayerSession, QueueNavigator, SessionConfig, SessionHosts};
//! use core_session::{PlaybackItem, VecQueue};
//!
//! # async fn example(hosts: SessionHosts) -> core_session::Result<()> {
//! let session = PlayerSession::spawn(hosts, SessionConfig::default()).await?;
//! let navigator = QueueNavigator::spawn(session.handle());
//!
//! let items = vec![
//!     PlaybackItem::new("intro", "https://cdn.example.com/intro.mp3"),
//!     PlaybackItem::new("main", "https://cdn.example.com/main.mp3"),
//! ];
//! navigator.set_queue(Arc::new(VecQueue::new(items.clone()))).await?;
//! session.handle().set_item(items[0].clone()).await?;
//!
//! let mut playing = session.signals().is_playing().watch();
//! playing.changed().await.ok();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod item;
pub mod logging;
pub mod queue;
pub mod session;
pub mod signals;
pub mod state;

pub use config::SessionConfig;
pub use error::{Result, SessionError};
pub use events::{Effect, SessionEvent};
pub use item::PlaybackItem;
pub use queue::{NavigatorSignals, PlaybackQueue, QueueNavigator, VecQueue};
pub use session::{PlayerSession, SessionHandle, SessionHosts};
pub use signals::{SessionSignals, Signal};
pub use state::SessionState;
