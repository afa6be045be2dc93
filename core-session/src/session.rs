//! # Playback Session Actor
//!
//! [`PlayerSession`] runs the state machine from [`crate::state`] inside a
//! single tokio task. Caller commands, engine callbacks, reachability
//! transitions, and audio-session notifications all funnel into that task's
//! inbox, so every input is applied in strict arrival order — there is one
//! logical control thread and the engine is never blocked on.
//!
//! The actor is the exclusive owner of the engine resource lifecycle: it
//! loads, attaches, detaches, and rebuilds resources in response to the
//! effects the state machine emits, and it holds the single-slot
//! background-execution grant. Collaborators only see the derived
//! [`SessionSignals`].
//!
//! ## Switch-latest semantics
//!
//! Every engine event names the resource it belongs to. The actor tracks the
//! resource it most recently loaded and drops events tagged with any other
//! resource before they reach the state machine, so a superseded item can
//! never leak signals into its successor.

use std::collections::VecDeque;
use std::sync::Arc;

use bridge_traits::audio_session::{AudioSessionEvent, AudioSessionEventStream, OutputRoute};
use bridge_traits::background::GrantId;
use bridge_traits::engine::{EngineEvent, EngineEventStream, EngineStatus, ResourceId};
use bridge_traits::network::ReachabilityStream;
use bridge_traits::remote::{RemoteCommand, RemoteCommandSource};
use bridge_traits::{
    AudioSessionHost, BackgroundExecutionHost, ConnectivityMonitor, MediaEngine,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::events::{Effect, SessionEvent};
use crate::item::PlaybackItem;
use crate::signals::SessionSignals;
use crate::state::SessionState;

/// The platform collaborators a session is built over.
pub struct SessionHosts {
    pub engine: Arc<dyn MediaEngine>,
    pub connectivity: Arc<dyn ConnectivityMonitor>,
    pub audio_session: Arc<dyn AudioSessionHost>,
    pub background: Arc<dyn BackgroundExecutionHost>,
}

/// Commands a handle can deliver to the actor.
#[derive(Debug)]
enum Command {
    SetItem(PlaybackItem),
    Play,
    Pause,
    Seek(f64),
}

/// Cloneable front door to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    signals: Arc<SessionSignals>,
}

impl SessionHandle {
    /// Replace the current item.
    ///
    /// Stops the current item (if any) and, with auto-play enabled, starts
    /// the new one.
    pub async fn set_item(&self, item: PlaybackItem) -> Result<()> {
        self.send(Command::SetItem(item)).await
    }

    /// Ask the session to play. A no-op without a current item.
    pub async fn play(&self) -> Result<()> {
        self.send(Command::Play).await
    }

    /// Ask the session to pause.
    pub async fn pause(&self) -> Result<()> {
        self.send(Command::Pause).await
    }

    /// Seek to an absolute position in seconds.
    ///
    /// Non-finite targets (NaN, ±∞) are dropped without touching the engine
    /// or the seeking signal.
    pub async fn seek(&self, seconds: f64) -> Result<()> {
        self.send(Command::Seek(seconds)).await
    }

    /// The session's observable outputs.
    pub fn signals(&self) -> &SessionSignals {
        &self.signals
    }

    /// Forward external transport commands into this session.
    ///
    /// `Play`/`Pause` feed the same intents as [`SessionHandle::play`] and
    /// [`SessionHandle::pause`]; track navigation is ignored here — wire the
    /// source through a queue navigator to get next/previous handling. The
    /// forwarder ends when the source closes its stream or the session shuts
    /// down.
    pub async fn drive_remote_commands(
        &self,
        source: &dyn RemoteCommandSource,
    ) -> Result<JoinHandle<()>> {
        let mut stream = source.subscribe_commands().await?;
        let handle = self.clone();
        Ok(tokio::spawn(async move {
            while let Some(command) = stream.next().await {
                let sent = match command {
                    RemoteCommand::Play => handle.play().await,
                    RemoteCommand::Pause => handle.pause().await,
                    RemoteCommand::NextTrack | RemoteCommand::PreviousTrack => continue,
                };
                if sent.is_err() {
                    break;
                }
            }
        }))
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }
}

/// A running playback session.
pub struct PlayerSession {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

impl PlayerSession {
    /// Wire up the collaborator streams and start the session actor.
    pub async fn spawn(hosts: SessionHosts, config: SessionConfig) -> Result<Self> {
        if config.command_capacity == 0 {
            return Err(SessionError::Config(
                "command_capacity must be at least 1".into(),
            ));
        }

        let engine_events = hosts.engine.subscribe_events().await?;
        let connectivity_events = hosts.connectivity.subscribe_changes().await?;
        let audio_events = hosts.audio_session.subscribe_events().await?;
        let reachable = hosts.connectivity.is_reachable().await;

        let signals = Arc::new(SessionSignals::new(config.pulse_capacity));
        let (commands_tx, commands_rx) = mpsc::channel(config.command_capacity);

        let actor = SessionActor {
            state: SessionState::new(config, reachable),
            engine: hosts.engine,
            audio_session: hosts.audio_session,
            grants: GrantSlot::new(hosts.background),
            signals: Arc::clone(&signals),
            current_resource: None,
            pending: VecDeque::new(),
            commands: commands_rx,
            engine_events,
            connectivity_events,
            audio_events,
        };
        let task = tokio::spawn(actor.run());
        info!("playback session started");

        Ok(Self {
            handle: SessionHandle {
                commands: commands_tx,
                signals,
            },
            task,
        })
    }

    /// Clone a handle to the running session.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// The session's observable outputs.
    pub fn signals(&self) -> &SessionSignals {
        &self.handle.signals
    }

    /// Shut the session down.
    ///
    /// The actor exits once every outstanding [`SessionHandle`] clone is
    /// dropped; this drops the session's own handle and waits for the actor
    /// to finish. A panic inside the actor resurfaces here.
    pub async fn shutdown(self) {
        drop(self.handle);
        if let Err(error) = self.task.await {
            if error.is_panic() {
                std::panic::resume_unwind(error.into_panic());
            }
        }
    }
}

/// One input drained from the actor's sources.
enum Input {
    Command(Option<Command>),
    Engine(Option<EngineEvent>),
    Reachability(Option<bool>),
    Audio(Option<AudioSessionEvent>),
}

struct SessionActor {
    state: SessionState,
    engine: Arc<dyn MediaEngine>,
    audio_session: Arc<dyn AudioSessionHost>,
    grants: GrantSlot,
    signals: Arc<SessionSignals>,
    /// The most recently loaded engine resource; engine events tagged with
    /// anything else are stale.
    current_resource: Option<ResourceId>,
    /// Synthetic events produced while executing effects (e.g. a load
    /// failure turning into a Failed status), applied before new input.
    pending: VecDeque<SessionEvent>,
    commands: mpsc::Receiver<Command>,
    engine_events: Box<dyn EngineEventStream>,
    connectivity_events: Box<dyn ReachabilityStream>,
    audio_events: Box<dyn AudioSessionEventStream>,
}

impl SessionActor {
    async fn run(mut self) {
        let mut connectivity_open = true;
        let mut audio_open = true;

        loop {
            let input = tokio::select! {
                command = self.commands.recv() => Input::Command(command),
                event = self.engine_events.next() => Input::Engine(event),
                reachable = self.connectivity_events.next(), if connectivity_open => {
                    Input::Reachability(reachable)
                }
                event = self.audio_events.next(), if audio_open => Input::Audio(event),
            };

            match input {
                Input::Command(Some(command)) => {
                    let event = match command {
                        Command::SetItem(item) => SessionEvent::ItemChanged { item },
                        Command::Play => SessionEvent::PlayRequested,
                        Command::Pause => SessionEvent::PauseRequested,
                        Command::Seek(seconds) => SessionEvent::SeekRequested { seconds },
                    };
                    self.process(event).await;
                }
                Input::Command(None) => {
                    debug!("all session handles dropped");
                    break;
                }
                Input::Engine(Some(event)) => {
                    if let Some(event) = self.translate_engine_event(event) {
                        self.process(event).await;
                    }
                }
                Input::Engine(None) => {
                    warn!("engine event stream closed, shutting session down");
                    break;
                }
                Input::Reachability(Some(reachable)) => {
                    self.process(SessionEvent::ConnectivityChanged { reachable })
                        .await;
                }
                Input::Reachability(None) => connectivity_open = false,
                Input::Audio(Some(event)) => {
                    let event = translate_audio_event(event);
                    self.process(event).await;
                }
                Input::Audio(None) => audio_open = false,
            }
        }

        // Do not leave a keep-alive grant dangling past the session.
        self.grants.end().await;
        info!("playback session stopped");
    }

    /// Map an engine event onto the session vocabulary, dropping events from
    /// superseded resources.
    fn translate_engine_event(&self, event: EngineEvent) -> Option<SessionEvent> {
        if Some(event.resource()) != self.current_resource {
            debug!(resource = %event.resource().as_uuid(), "dropping stale engine event");
            return None;
        }
        Some(match event {
            EngineEvent::StatusChanged { status, .. } => {
                SessionEvent::EngineStatusChanged { status }
            }
            EngineEvent::DurationChanged { seconds, .. } => {
                SessionEvent::DurationChanged { seconds }
            }
            EngineEvent::BufferingChanged { buffering, .. } => {
                SessionEvent::BufferingChanged { buffering }
            }
            EngineEvent::LoadedRangesChanged { ranges, .. } => {
                SessionEvent::LoadedRangesChanged { ranges }
            }
            EngineEvent::PositionChanged { seconds, .. } => {
                SessionEvent::PositionChanged { seconds }
            }
            EngineEvent::SeekCompleted {
                request, finished, ..
            } => SessionEvent::SeekCompleted { request, finished },
            EngineEvent::DidReachEnd { .. } => SessionEvent::EndOfItemReached,
        })
    }

    async fn process(&mut self, event: SessionEvent) {
        self.pending.push_back(event);
        while let Some(event) = self.pending.pop_front() {
            debug!(?event, "applying session event");
            let effects = self.state.apply(event);
            for effect in effects {
                self.run_effect(effect).await;
            }
        }
        self.publish_signals();
    }

    async fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::StopTransport => {
                if let Err(error) = self.engine.pause().await {
                    warn!(%error, "engine pause failed");
                }
            }
            Effect::DetachResource => {
                if let Err(error) = self.engine.replace_resource(None).await {
                    warn!(%error, "engine detach failed");
                }
            }
            Effect::LoadResource { item, reload } => {
                if reload {
                    // Two-step teardown: engines that free resources
                    // asynchronously must see the detach before the new
                    // attach.
                    if let Err(error) = self.engine.replace_resource(None).await {
                        warn!(%error, "engine detach before reload failed");
                    }
                }
                match self.engine.load_resource(item.url()).await {
                    Ok(resource) => {
                        self.current_resource = Some(resource);
                        if let Err(error) = self.engine.replace_resource(Some(resource)).await {
                            warn!(%error, "engine attach failed");
                        }
                    }
                    Err(error) => {
                        warn!(url = item.url(), %error, "engine refused to load resource");
                        self.current_resource = None;
                        self.pending.push_back(SessionEvent::EngineStatusChanged {
                            status: EngineStatus::Failed,
                        });
                    }
                }
            }
            Effect::AttachResource => match self.current_resource {
                Some(resource) => {
                    if let Err(error) = self.engine.replace_resource(Some(resource)).await {
                        warn!(%error, "engine attach failed");
                    }
                }
                None => warn!("no loaded resource to attach"),
            },
            Effect::StartTransport => {
                if let Err(error) = self.engine.play().await {
                    warn!(%error, "engine play failed");
                }
            }
            Effect::SeekTransport { seconds, request } => {
                if let Err(error) = self.engine.seek(seconds, request).await {
                    warn!(%error, seconds, "engine seek failed");
                }
            }
            Effect::ActivateAudioSession => {
                if let Err(error) = self.audio_session.set_playback_category(true).await {
                    warn!(%error, "audio session activation failed");
                }
            }
            Effect::BeginBackgroundGrant => self.grants.begin().await,
            Effect::EndBackgroundGrant => self.grants.end().await,
            Effect::NotifyEndOfItem => self.signals.notify_end_of_item(),
        }
    }

    fn publish_signals(&self) {
        let state = &self.state;
        let signals = &self.signals;
        signals.current_item().publish(state.current_item().cloned());
        signals.status().publish(state.status());
        signals.is_playing().publish(state.is_playing());
        signals.is_seeking().publish(state.is_seeking());
        signals.is_buffering().publish(state.is_buffering());
        signals.duration().publish(state.duration());
        signals.played_time().publish(state.played_time());
        signals.loaded_ranges().publish(state.loaded_ranges().to_vec());
    }
}

fn translate_audio_event(event: AudioSessionEvent) -> SessionEvent {
    match event {
        AudioSessionEvent::InterruptionBegan => SessionEvent::InterruptionBegan,
        AudioSessionEvent::InterruptionEnded { should_resume } => {
            SessionEvent::InterruptionEnded { should_resume }
        }
        AudioSessionEvent::RouteChanged {
            old_device_unavailable,
            previous_outputs,
        } => SessionEvent::RouteChanged {
            old_device_unavailable,
            had_headphones: previous_outputs.contains(&OutputRoute::Headphones),
        },
    }
}

/// The single-slot background-execution grant.
///
/// Begins the replacement grant before releasing the prior one, so keep-alive
/// coverage never lapses between the two calls.
struct GrantSlot {
    host: Arc<dyn BackgroundExecutionHost>,
    current: Option<GrantId>,
}

impl GrantSlot {
    fn new(host: Arc<dyn BackgroundExecutionHost>) -> Self {
        Self {
            host,
            current: None,
        }
    }

    async fn begin(&mut self) {
        match self.host.begin_grant().await {
            Ok(grant) => {
                if let Some(previous) = self.current.replace(grant) {
                    if let Err(error) = self.host.end_grant(previous).await {
                        warn!(%error, "failed to release superseded background grant");
                    }
                }
            }
            Err(error) => warn!(%error, "failed to acquire background grant"),
        }
    }

    async fn end(&mut self) {
        if let Some(grant) = self.current.take() {
            if let Err(error) = self.host.end_grant(grant).await {
                warn!(%error, "failed to release background grant");
            }
        }
    }
}
