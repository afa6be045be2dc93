//! # Queue Navigation
//!
//! Queue-relative navigation without owning playback state. A
//! [`PlaybackQueue`] answers exactly two questions — what comes after an
//! item, what comes before it — and [`QueueNavigator`] turns those answers
//! into `set_item` calls on a running session: explicit next/previous,
//! auto-advance on end-of-item, and has-next/has-previous signals recomputed
//! whenever the queue or the current item changes.
//!
//! Items are compared by URL identity (see [`PlaybackItem`]'s equality), and
//! the array-backed lookups are plain linear scans: queues are tens to low
//! hundreds of items, never a hot path.

use std::sync::Arc;

use bridge_traits::remote::{RemoteCommand, RemoteCommandSource};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Result, SessionError};
use crate::item::PlaybackItem;
use crate::session::SessionHandle;
use crate::signals::Signal;

const NAVIGATOR_COMMAND_CAPACITY: usize = 16;
const NAVIGATOR_PULSE_CAPACITY: usize = 16;

/// Ordered (or graph-shaped) source of playback items.
///
/// Implementations never mutate on lookup; the navigator treats the queue as
/// read-only.
pub trait PlaybackQueue: Send + Sync {
    /// The item that follows `of`, if any.
    fn next_item(&self, of: &PlaybackItem) -> Option<PlaybackItem>;

    /// The item that precedes `of`, if any.
    fn previous_item(&self, of: &PlaybackItem) -> Option<PlaybackItem>;
}

/// Linear-scan lookup of the item after `of` in a slice.
///
/// Returns `None` when `of` is absent or last.
pub fn next_item_in(items: &[PlaybackItem], of: &PlaybackItem) -> Option<PlaybackItem> {
    let index = items.iter().position(|candidate| candidate == of)?;
    items.get(index + 1).cloned()
}

/// Linear-scan lookup of the item before `of` in a slice.
///
/// Returns `None` when `of` is absent or first.
pub fn previous_item_in(items: &[PlaybackItem], of: &PlaybackItem) -> Option<PlaybackItem> {
    let index = items.iter().position(|candidate| candidate == of)?;
    index.checked_sub(1).and_then(|i| items.get(i)).cloned()
}

/// Array-backed queue built on the linear-scan helpers.
#[derive(Debug, Clone, Default)]
pub struct VecQueue {
    items: Vec<PlaybackItem>,
}

impl VecQueue {
    pub fn new(items: Vec<PlaybackItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[PlaybackItem] {
        &self.items
    }
}

impl PlaybackQueue for VecQueue {
    fn next_item(&self, of: &PlaybackItem) -> Option<PlaybackItem> {
        next_item_in(&self.items, of)
    }

    fn previous_item(&self, of: &PlaybackItem) -> Option<PlaybackItem> {
        previous_item_in(&self.items, of)
    }
}

/// Observable outputs of a [`QueueNavigator`].
#[derive(Debug)]
pub struct NavigatorSignals {
    has_next: Signal<bool>,
    has_previous: Signal<bool>,
    reached_end: broadcast::Sender<()>,
    reached_start: broadcast::Sender<()>,
}

impl NavigatorSignals {
    fn new() -> Self {
        let (reached_end, _) = broadcast::channel(NAVIGATOR_PULSE_CAPACITY);
        let (reached_start, _) = broadcast::channel(NAVIGATOR_PULSE_CAPACITY);
        Self {
            has_next: Signal::new(false),
            has_previous: Signal::new(false),
            reached_end,
            reached_start,
        }
    }

    /// True iff a next item exists for the current (queue, item) pair.
    pub fn has_next(&self) -> &Signal<bool> {
        &self.has_next
    }

    /// True iff a previous item exists for the current (queue, item) pair.
    pub fn has_previous(&self) -> &Signal<bool> {
        &self.has_previous
    }

    /// Pulse emitted when forward navigation hits the end of the queue.
    pub fn subscribe_reached_end(&self) -> broadcast::Receiver<()> {
        self.reached_end.subscribe()
    }

    /// Pulse emitted when backward navigation hits the start of the queue.
    pub fn subscribe_reached_start(&self) -> broadcast::Receiver<()> {
        self.reached_start.subscribe()
    }

    fn notify_reached_end(&self) {
        let _ = self.reached_end.send(());
    }

    fn notify_reached_start(&self) {
        let _ = self.reached_start.send(());
    }
}

enum NavCommand {
    Next,
    Previous,
    SetQueue(Arc<dyn PlaybackQueue>),
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

/// Queue-relative navigation over a running session.
pub struct QueueNavigator {
    session: SessionHandle,
    commands: mpsc::Sender<NavCommand>,
    signals: Arc<NavigatorSignals>,
    task: JoinHandle<()>,
}

impl QueueNavigator {
    /// Start a navigator over `session`.
    ///
    /// Until a queue is supplied, both availability signals stay false and
    /// navigation only emits boundary pulses.
    pub fn spawn(session: SessionHandle) -> Self {
        let signals = Arc::new(NavigatorSignals::new());
        let (commands_tx, commands_rx) = mpsc::channel(NAVIGATOR_COMMAND_CAPACITY);

        let mut current_item_rx = session.signals().current_item().watch();
        let current = current_item_rx.borrow_and_update().clone();
        let end_rx = session.signals().subscribe_end_of_item();

        let actor = NavigatorActor {
            session: session.clone(),
            signals: Arc::clone(&signals),
            queue: None,
            current,
            commands: commands_rx,
            current_item_rx,
            end_rx,
        };
        let task = tokio::spawn(actor.run());

        Self {
            session,
            commands: commands_tx,
            signals,
            task,
        }
    }

    /// Replace the queue the navigator looks items up in.
    pub async fn set_queue(&self, queue: Arc<dyn PlaybackQueue>) -> Result<()> {
        self.send(NavCommand::SetQueue(queue)).await
    }

    /// Move to the item after the current one, if there is one.
    ///
    /// At the end of the queue this is a no-op that emits the reached-end
    /// pulse.
    pub async fn next(&self) -> Result<()> {
        self.send(NavCommand::Next).await
    }

    /// Move to the item before the current one, if there is one.
    ///
    /// At the start of the queue this is a no-op that emits the
    /// reached-start pulse.
    pub async fn previous(&self) -> Result<()> {
        self.send(NavCommand::Previous).await
    }

    /// The navigator's observable outputs.
    pub fn signals(&self) -> &NavigatorSignals {
        &self.signals
    }

    /// Forward external transport commands into the session and this
    /// navigator.
    ///
    /// `Play`/`Pause` feed the session; `NextTrack`/`PreviousTrack` behave
    /// like [`QueueNavigator::next`] and [`QueueNavigator::previous`].
    pub async fn drive_remote_commands(
        &self,
        source: &dyn RemoteCommandSource,
    ) -> Result<JoinHandle<()>> {
        let mut stream = source.subscribe_commands().await?;
        let session = self.session.clone();
        let commands = self.commands.clone();
        Ok(tokio::spawn(async move {
            while let Some(command) = stream.next().await {
                let delivered = match command {
                    RemoteCommand::Play => session.play().await.is_ok(),
                    RemoteCommand::Pause => session.pause().await.is_ok(),
                    RemoteCommand::NextTrack => commands.send(NavCommand::Next).await.is_ok(),
                    RemoteCommand::PreviousTrack => {
                        commands.send(NavCommand::Previous).await.is_ok()
                    }
                };
                if !delivered {
                    break;
                }
            }
        }))
    }

    /// Shut the navigator down without touching the session.
    ///
    /// A panic inside the navigator task resurfaces here.
    pub async fn shutdown(self) {
        drop(self.commands);
        drop(self.session);
        if let Err(error) = self.task.await {
            if error.is_panic() {
                std::panic::resume_unwind(error.into_panic());
            }
        }
    }

    async fn send(&self, command: NavCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::SessionClosed)
    }
}

enum NavInput {
    Command(Option<NavCommand>),
    CurrentItemChanged(bool),
    EndOfItem(std::result::Result<(), broadcast::error::RecvError>),
}

struct NavigatorActor {
    session: SessionHandle,
    signals: Arc<NavigatorSignals>,
    queue: Option<Arc<dyn PlaybackQueue>>,
    current: Option<PlaybackItem>,
    commands: mpsc::Receiver<NavCommand>,
    current_item_rx: watch::Receiver<Option<PlaybackItem>>,
    end_rx: broadcast::Receiver<()>,
}

impl NavigatorActor {
    async fn run(mut self) {
        self.recompute();

        loop {
            let input = tokio::select! {
                command = self.commands.recv() => NavInput::Command(command),
                changed = self.current_item_rx.changed() => {
                    NavInput::CurrentItemChanged(changed.is_ok())
                }
                pulse = self.end_rx.recv() => NavInput::EndOfItem(pulse),
            };

            match input {
                NavInput::Command(Some(NavCommand::SetQueue(queue))) => {
                    self.queue = Some(queue);
                    self.recompute();
                }
                NavInput::Command(Some(NavCommand::Next)) => {
                    self.advance(Direction::Forward).await;
                }
                NavInput::Command(Some(NavCommand::Previous)) => {
                    self.advance(Direction::Backward).await;
                }
                NavInput::Command(None) => break,
                NavInput::CurrentItemChanged(true) => {
                    self.current = self.current_item_rx.borrow_and_update().clone();
                    self.recompute();
                }
                NavInput::CurrentItemChanged(false) => {
                    debug!("session signals closed, stopping navigator");
                    break;
                }
                NavInput::EndOfItem(Ok(())) => {
                    // Auto-advance behaves exactly like an explicit next().
                    self.advance(Direction::Forward).await;
                }
                NavInput::EndOfItem(Err(broadcast::error::RecvError::Lagged(missed))) => {
                    warn!(missed, "navigator missed end-of-item pulses");
                }
                NavInput::EndOfItem(Err(broadcast::error::RecvError::Closed)) => break,
            }
        }
    }

    async fn advance(&mut self, direction: Direction) {
        let target = match (&self.queue, &self.current) {
            (Some(queue), Some(current)) => match direction {
                Direction::Forward => queue.next_item(current),
                Direction::Backward => queue.previous_item(current),
            },
            _ => None,
        };

        match target {
            Some(item) => {
                if self.session.set_item(item).await.is_err() {
                    warn!("session closed during queue navigation");
                }
            }
            None => match direction {
                Direction::Forward => self.signals.notify_reached_end(),
                Direction::Backward => self.signals.notify_reached_start(),
            },
        }
    }

    fn recompute(&self) {
        let (has_next, has_previous) = match (&self.queue, &self.current) {
            (Some(queue), Some(current)) => (
                queue.next_item(current).is_some(),
                queue.previous_item(current).is_some(),
            ),
            _ => (false, false),
        };
        self.signals.has_next().publish(has_next);
        self.signals.has_previous().publish(has_previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<PlaybackItem> {
        vec![
            PlaybackItem::new("a", "https://q/a.mp3"),
            PlaybackItem::new("b", "https://q/b.mp3"),
            PlaybackItem::new("c", "https://q/c.mp3"),
        ]
    }

    #[test]
    fn middle_item_has_both_neighbors() {
        let list = items();
        let queue = VecQueue::new(list.clone());

        assert_eq!(queue.next_item(&list[1]), Some(list[2].clone()));
        assert_eq!(queue.previous_item(&list[1]), Some(list[0].clone()));
    }

    #[test]
    fn boundaries_return_none() {
        let list = items();
        let queue = VecQueue::new(list.clone());

        assert_eq!(queue.previous_item(&list[0]), None);
        assert_eq!(queue.next_item(&list[2]), None);
    }

    #[test]
    fn absent_item_has_no_neighbors() {
        let queue = VecQueue::new(items());
        let stranger = PlaybackItem::from_url("https://q/elsewhere.mp3");

        assert_eq!(queue.next_item(&stranger), None);
        assert_eq!(queue.previous_item(&stranger), None);
    }

    #[test]
    fn lookup_matches_by_url_not_id() {
        let list = items();
        let queue = VecQueue::new(list.clone());
        // Same URL as "b" under a different id still finds b's neighbors.
        let alias = PlaybackItem::new("alias", "https://q/b.mp3");

        assert_eq!(queue.next_item(&alias), Some(list[2].clone()));
    }

    #[test]
    fn single_item_queue_has_no_neighbors() {
        let only = PlaybackItem::from_url("https://q/only.mp3");
        let queue = VecQueue::new(vec![only.clone()]);

        assert_eq!(queue.next_item(&only), None);
        assert_eq!(queue.previous_item(&only), None);
    }
}
