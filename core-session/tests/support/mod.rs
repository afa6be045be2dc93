//! Shared fakes for the session integration tests: a scripted engine with a
//! recorded command log and an injectable event stream, plus channel-backed
//! connectivity, audio-session, remote-command, and background hosts.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bridge_traits::audio_session::{
    AudioSessionEvent, AudioSessionEventStream, AudioSessionHost,
};
use bridge_traits::background::{BackgroundExecutionHost, GrantId};
use bridge_traits::engine::{
    EngineEvent, EngineEventStream, MediaEngine, ResourceId, SeekRequestId,
};
use bridge_traits::error::{BridgeError, Result};
use bridge_traits::network::{ConnectivityMonitor, ReachabilityStream};
use bridge_traits::remote::{RemoteCommand, RemoteCommandSource, RemoteCommandStream};
use core_session::{PlayerSession, SessionConfig, SessionHosts};
use tokio::sync::mpsc;

// ============================================================================
// Scripted Media Engine
// ============================================================================

/// One recorded engine invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String),
    Replace(Option<ResourceId>),
    Play,
    Pause,
    Seek {
        seconds: f64,
        request: SeekRequestId,
    },
}

/// Engine fake that records every command and lets the test inject events.
pub struct ScriptedEngine {
    calls: Mutex<Vec<EngineCall>>,
    resources: Mutex<Vec<ResourceId>>,
    fail_loads: Mutex<bool>,
    events: mpsc::UnboundedSender<EngineEvent>,
    stream: Mutex<Option<mpsc::UnboundedReceiver<EngineEvent>>>,
}

impl ScriptedEngine {
    pub fn new() -> Arc<Self> {
        let (events, stream) = mpsc::unbounded_channel();
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            resources: Mutex::new(Vec::new()),
            fail_loads: Mutex::new(false),
            events,
            stream: Mutex::new(Some(stream)),
        })
    }

    /// Deliver an engine event to the session.
    pub fn emit(&self, event: EngineEvent) {
        let _ = self.events.send(event);
    }

    /// Snapshot of every recorded command, oldest first.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, matcher: impl Fn(&EngineCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matcher(c)).count()
    }

    /// The most recently loaded resource.
    pub fn last_resource(&self) -> Option<ResourceId> {
        self.resources.lock().unwrap().last().copied()
    }

    pub fn resource_count(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    /// Make subsequent loads fail at the bridge boundary.
    pub fn set_fail_loads(&self, fail: bool) {
        *self.fail_loads.lock().unwrap() = fail;
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MediaEngine for ScriptedEngine {
    async fn load_resource(&self, url: &str) -> Result<ResourceId> {
        self.record(EngineCall::Load(url.to_string()));
        if *self.fail_loads.lock().unwrap() {
            return Err(BridgeError::OperationFailed("scripted load failure".into()));
        }
        let resource = ResourceId::new();
        self.resources.lock().unwrap().push(resource);
        Ok(resource)
    }

    async fn replace_resource(&self, resource: Option<ResourceId>) -> Result<()> {
        self.record(EngineCall::Replace(resource));
        Ok(())
    }

    async fn play(&self) -> Result<()> {
        self.record(EngineCall::Play);
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record(EngineCall::Pause);
        Ok(())
    }

    async fn seek(&self, seconds: f64, request: SeekRequestId) -> Result<()> {
        self.record(EngineCall::Seek { seconds, request });
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<Box<dyn EngineEventStream>> {
        let stream = self
            .stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("engine events already subscribed".into()))?;
        Ok(Box::new(ChannelEngineStream { stream }))
    }
}

struct ChannelEngineStream {
    stream: mpsc::UnboundedReceiver<EngineEvent>,
}

#[async_trait]
impl EngineEventStream for ChannelEngineStream {
    async fn next(&mut self) -> Option<EngineEvent> {
        self.stream.recv().await
    }
}

// ============================================================================
// Connectivity / Audio Session / Remote fakes
// ============================================================================

pub struct FakeConnectivity {
    reachable: Mutex<bool>,
    events: mpsc::UnboundedSender<bool>,
    stream: Mutex<Option<mpsc::UnboundedReceiver<bool>>>,
}

impl FakeConnectivity {
    pub fn new(initial: bool) -> Arc<Self> {
        let (events, stream) = mpsc::unbounded_channel();
        Arc::new(Self {
            reachable: Mutex::new(initial),
            events,
            stream: Mutex::new(Some(stream)),
        })
    }

    pub fn emit(&self, reachable: bool) {
        *self.reachable.lock().unwrap() = reachable;
        let _ = self.events.send(reachable);
    }
}

#[async_trait]
impl ConnectivityMonitor for FakeConnectivity {
    async fn is_reachable(&self) -> bool {
        *self.reachable.lock().unwrap()
    }

    async fn subscribe_changes(&self) -> Result<Box<dyn ReachabilityStream>> {
        let stream = self
            .stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("reachability already subscribed".into()))?;
        Ok(Box::new(ChannelReachabilityStream { stream }))
    }
}

struct ChannelReachabilityStream {
    stream: mpsc::UnboundedReceiver<bool>,
}

#[async_trait]
impl ReachabilityStream for ChannelReachabilityStream {
    async fn next(&mut self) -> Option<bool> {
        self.stream.recv().await
    }
}

pub struct FakeAudioSession {
    activations: Mutex<Vec<bool>>,
    events: mpsc::UnboundedSender<AudioSessionEvent>,
    stream: Mutex<Option<mpsc::UnboundedReceiver<AudioSessionEvent>>>,
}

impl FakeAudioSession {
    pub fn new() -> Arc<Self> {
        let (events, stream) = mpsc::unbounded_channel();
        Arc::new(Self {
            activations: Mutex::new(Vec::new()),
            events,
            stream: Mutex::new(Some(stream)),
        })
    }

    pub fn emit(&self, event: AudioSessionEvent) {
        let _ = self.events.send(event);
    }

    pub fn activations(&self) -> Vec<bool> {
        self.activations.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioSessionHost for FakeAudioSession {
    async fn set_playback_category(&self, active: bool) -> Result<()> {
        self.activations.lock().unwrap().push(active);
        Ok(())
    }

    async fn subscribe_events(&self) -> Result<Box<dyn AudioSessionEventStream>> {
        let stream = self
            .stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("audio events already subscribed".into()))?;
        Ok(Box::new(ChannelAudioStream { stream }))
    }
}

struct ChannelAudioStream {
    stream: mpsc::UnboundedReceiver<AudioSessionEvent>,
}

#[async_trait]
impl AudioSessionEventStream for ChannelAudioStream {
    async fn next(&mut self) -> Option<AudioSessionEvent> {
        self.stream.recv().await
    }
}

pub struct FakeRemote {
    commands: mpsc::UnboundedSender<RemoteCommand>,
    stream: Mutex<Option<mpsc::UnboundedReceiver<RemoteCommand>>>,
}

impl FakeRemote {
    pub fn new() -> Arc<Self> {
        let (commands, stream) = mpsc::unbounded_channel();
        Arc::new(Self {
            commands,
            stream: Mutex::new(Some(stream)),
        })
    }

    pub fn emit(&self, command: RemoteCommand) {
        let _ = self.commands.send(command);
    }
}

#[async_trait]
impl RemoteCommandSource for FakeRemote {
    async fn subscribe_commands(&self) -> Result<Box<dyn RemoteCommandStream>> {
        let stream = self
            .stream
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BridgeError::NotAvailable("commands already subscribed".into()))?;
        Ok(Box::new(ChannelRemoteStream { stream }))
    }
}

struct ChannelRemoteStream {
    stream: mpsc::UnboundedReceiver<RemoteCommand>,
}

#[async_trait]
impl RemoteCommandStream for ChannelRemoteStream {
    async fn next(&mut self) -> Option<RemoteCommand> {
        self.stream.recv().await
    }
}

// ============================================================================
// Background host
// ============================================================================

/// Counting background host; grants always succeed.
#[derive(Default)]
pub struct FakeBackground {
    begun: AtomicUsize,
    ended: AtomicUsize,
}

impl FakeBackground {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn begun(&self) -> usize {
        self.begun.load(Ordering::SeqCst)
    }

    pub fn ended(&self) -> usize {
        self.ended.load(Ordering::SeqCst)
    }

    /// Grants begun but not yet ended.
    pub fn outstanding(&self) -> usize {
        self.begun() - self.ended()
    }
}

#[async_trait]
impl BackgroundExecutionHost for FakeBackground {
    async fn begin_grant(&self) -> Result<GrantId> {
        self.begun.fetch_add(1, Ordering::SeqCst);
        Ok(GrantId::new())
    }

    async fn end_grant(&self, _grant: GrantId) -> Result<()> {
        self.ended.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

mockall::mock! {
    pub BackgroundHost {}

    #[async_trait]
    impl BackgroundExecutionHost for BackgroundHost {
        async fn begin_grant(&self) -> Result<GrantId>;
        async fn end_grant(&self, grant: GrantId) -> Result<()>;
    }
}

// ============================================================================
// Harness
// ============================================================================

/// A session wired to the fakes above.
pub struct Harness {
    pub engine: Arc<ScriptedEngine>,
    pub connectivity: Arc<FakeConnectivity>,
    pub audio: Arc<FakeAudioSession>,
    pub background: Arc<FakeBackground>,
    pub session: PlayerSession,
}

impl Harness {
    pub async fn spawn(config: SessionConfig) -> Self {
        Self::spawn_with_reachability(config, true).await
    }

    pub async fn spawn_with_reachability(config: SessionConfig, reachable: bool) -> Self {
        let engine = ScriptedEngine::new();
        let connectivity = FakeConnectivity::new(reachable);
        let audio = FakeAudioSession::new();
        let background = FakeBackground::new();

        let session = PlayerSession::spawn(
            SessionHosts {
                engine: engine.clone(),
                connectivity: connectivity.clone(),
                audio_session: audio.clone(),
                background: background.clone(),
            },
            config,
        )
        .await
        .expect("session should spawn");

        Self {
            engine,
            connectivity,
            audio,
            background,
            session,
        }
    }
}

/// Poll `condition` until it holds or two seconds elapse.
pub async fn eventually(condition: impl Fn() -> bool, what: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {what}"
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Give the actor a moment to drain anything in flight.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
