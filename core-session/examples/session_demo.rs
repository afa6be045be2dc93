//! # Playback Session Usage Example
//!
//! Demonstrates wiring a `PlayerSession` and `QueueNavigator` over stub
//! platform hosts: a simulated engine that acknowledges loads and ticks the
//! transport position, plus no-op connectivity, audio-session, and
//! background hosts.
//!
//! Run with: `cargo run --example session_demo --package core-session`

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use bridge_traits::audio_session::{AudioSessionEvent, AudioSessionEventStream, AudioSessionHost};
use bridge_traits::background::{BackgroundExecutionHost, GrantId};
use bridge_traits::engine::{
    EngineEvent, EngineEventStream, EngineStatus, MediaEngine, ResourceId, SeekRequestId,
};
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::network::{ConnectivityMonitor, ReachabilityStream};
use core_session::logging::{init_logging, LogFormat, LoggingConfig};
use core_session::{PlaybackItem, PlayerSession, QueueNavigator, SessionConfig, SessionHosts, VecQueue};
use tokio::sync::mpsc;

// ============================================================================
// Simulated Media Engine
// ============================================================================

/// Engine stub: every load succeeds and reports ready, every play starts a
/// position ticker for the attached resource.
struct SimulatedEngine {
    events: mpsc::UnboundedSender<EngineEvent>,
    stream: Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>,
    attached: Mutex<Option<ResourceId>>,
    ticker: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl SimulatedEngine {
    fn new() -> Arc<Self> {
        let (events, stream) = mpsc::unbounded_channel();
        Arc::new(Self {
            events,
            stream: Mutex::new(Some(stream)),
            attached: Mutex::new(None),
            ticker: Mutex::new(None),
        })
    }

    fn stop_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().unwrap().take() {
            ticker.abort();
        }
    }
}

#[async_trait]
impl MediaEngine for SimulatedEngine {
    async fn load_resource(&self, url: &str) -> BridgeResult<ResourceId> {
        let resource = ResourceId::new();
        println!("[engine] loading {url}");
        let _ = self.events.send(EngineEvent::StatusChanged {
            resource,
            status: EngineStatus::ReadyToPlay,
        });
        let _ = self.events.send(EngineEvent::DurationChanged {
            resource,
            seconds: 180.0,
        });
        Ok(resource)
    }

    async fn replace_resource(&self, resource: Option<ResourceId>) -> BridgeResult<()> {
        self.stop_ticker();
        *self.attached.lock().unwrap() = resource;
        Ok(())
    }

    async fn play(&self) -> BridgeResult<()> {
        let Some(resource) = *self.attached.lock().unwrap() else {
            return Ok(());
        };
        let events = self.events.clone();
        let ticker = tokio::spawn(async move {
            let mut seconds = 0.0;
            loop {
                tokio::time::sleep(Duration::from_millis(100)).await;
                seconds += 0.1;
                let _ = events.send(EngineEvent::PositionChanged { resource, seconds });
            }
        });
        if let Some(previous) = self.ticker.lock().unwrap().replace(ticker) {
            previous.abort();
        }
        Ok(())
    }

    async fn pause(&self) -> BridgeResult<()> {
        self.stop_ticker();
        Ok(())
    }

    async fn seek(&self, seconds: f64, request: SeekRequestId) -> BridgeResult<()> {
        if let Some(resource) = *self.attached.lock().unwrap() {
            let _ = self.events.send(EngineEvent::PositionChanged { resource, seconds });
            let _ = self.events.send(EngineEvent::SeekCompleted {
                resource,
                request,
                finished: true,
            });
        }
        Ok(())
    }

    async fn subscribe_events(&self) -> BridgeResult<Box<dyn EngineEventStream>> {
        let stream = self.stream.lock().unwrap().take().expect("demo subscribes once");
        Ok(Box::new(SimulatedEngineStream { stream }))
    }
}

struct SimulatedEngineStream {
    stream: mpsc::UnboundedReceiver<EngineEvent>,
}

#[async_trait]
impl EngineEventStream for SimulatedEngineStream {
    async fn next(&mut self) -> Option<EngineEvent> {
        self.stream.recv().await
    }
}

// ============================================================================
// No-op platform hosts
// ============================================================================

struct AlwaysReachable;

#[async_trait]
impl ConnectivityMonitor for AlwaysReachable {
    async fn is_reachable(&self) -> bool {
        true
    }

    async fn subscribe_changes(&self) -> BridgeResult<Box<dyn ReachabilityStream>> {
        Ok(Box::new(SilentStream))
    }
}

struct QuietAudioSession;

#[async_trait]
impl AudioSessionHost for QuietAudioSession {
    async fn set_playback_category(&self, active: bool) -> BridgeResult<()> {
        println!("[audio-session] playback category active = {active}");
        Ok(())
    }

    async fn subscribe_events(&self) -> BridgeResult<Box<dyn AudioSessionEventStream>> {
        Ok(Box::new(SilentStream))
    }
}

struct NoopBackground;

#[async_trait]
impl BackgroundExecutionHost for NoopBackground {
    async fn begin_grant(&self) -> BridgeResult<GrantId> {
        Ok(GrantId::new())
    }

    async fn end_grant(&self, _grant: GrantId) -> BridgeResult<()> {
        Ok(())
    }
}

/// Stream that never yields; the demo has no connectivity or audio events.
struct SilentStream;

#[async_trait]
impl ReachabilityStream for SilentStream {
    async fn next(&mut self) -> Option<bool> {
        std::future::pending().await
    }
}

#[async_trait]
impl AudioSessionEventStream for SilentStream {
    async fn next(&mut self) -> Option<AudioSessionEvent> {
        std::future::pending().await
    }
}

// ============================================================================
// Demo flow
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let session = PlayerSession::spawn(
        SessionHosts {
            engine: SimulatedEngine::new(),
            connectivity: Arc::new(AlwaysReachable),
            audio_session: Arc::new(QuietAudioSession),
            background: Arc::new(NoopBackground),
        },
        SessionConfig::default(),
    )
    .await?;
    let handle = session.handle();
    let navigator = QueueNavigator::spawn(handle.clone());

    let tracks = vec![
        PlaybackItem::new("intro", "https://cdn.example.com/intro.mp3"),
        PlaybackItem::new("main", "https://cdn.example.com/main.mp3"),
        PlaybackItem::new("outro", "https://cdn.example.com/outro.mp3"),
    ];
    navigator
        .set_queue(Arc::new(VecQueue::new(tracks.clone())))
        .await?;

    handle.set_item(tracks[0].clone()).await?;
    tokio::time::sleep(Duration::from_millis(500)).await;

    let signals = session.signals();
    println!(
        "playing = {}, position = {:.1}s of {:.0}s",
        signals.is_playing().get(),
        signals.played_time().get(),
        signals.duration().get(),
    );

    handle.seek(42.0).await?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!("after seek: position = {:.1}s", signals.played_time().get());

    navigator.next().await?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    println!(
        "advanced to {:?}, has_next = {}",
        signals.current_item().get().map(|i| i.id().to_string()),
        navigator.signals().has_next().get(),
    );

    handle.pause().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("paused, playing = {}", signals.is_playing().get());

    navigator.shutdown().await;
    drop(handle);
    session.shutdown().await;
    Ok(())
}
