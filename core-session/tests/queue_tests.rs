//! Queue navigation over a live session: next/previous, boundary pulses,
//! availability signals, auto-advance, and remote track commands.

mod support;

use std::sync::Arc;

use bridge_traits::engine::EngineEvent;
use bridge_traits::remote::RemoteCommand;
use core_session::{PlaybackItem, QueueNavigator, SessionConfig, VecQueue};
use support::{eventually, settle, FakeRemote, Harness};

fn items() -> Vec<PlaybackItem> {
    vec![
        PlaybackItem::new("a", "https://q/a.mp3"),
        PlaybackItem::new("b", "https://q/b.mp3"),
        PlaybackItem::new("c", "https://q/c.mp3"),
    ]
}

async fn navigator_with_queue(harness: &Harness) -> QueueNavigator {
    let navigator = QueueNavigator::spawn(harness.session.handle());
    navigator
        .set_queue(Arc::new(VecQueue::new(items())))
        .await
        .unwrap();
    navigator
}

#[tokio::test]
async fn middle_of_queue_navigates_both_ways() {
    let harness = Harness::spawn(SessionConfig::manual()).await;
    let navigator = navigator_with_queue(&harness).await;
    let handle = harness.session.handle();
    let list = items();

    handle.set_item(list[1].clone()).await.unwrap();
    eventually(
        || navigator.signals().has_next().get() && navigator.signals().has_previous().get(),
        "both neighbors available from B",
    )
    .await;

    navigator.next().await.unwrap();
    let signals = harness.session.signals();
    eventually(
        || signals.current_item().get() == Some(list[2].clone()),
        "next moves to C",
    )
    .await;
    eventually(
        || !navigator.signals().has_next().get(),
        "no next at the end",
    )
    .await;

    navigator.previous().await.unwrap();
    eventually(
        || signals.current_item().get() == Some(list[1].clone()),
        "previous moves back to B",
    )
    .await;
}

#[tokio::test]
async fn first_item_has_no_previous_and_previous_is_a_no_op() {
    let harness = Harness::spawn(SessionConfig::manual()).await;
    let navigator = navigator_with_queue(&harness).await;
    let handle = harness.session.handle();
    let list = items();

    handle.set_item(list[0].clone()).await.unwrap();
    let signals = harness.session.signals();
    eventually(
        || signals.current_item().get() == Some(list[0].clone()),
        "current item is A",
    )
    .await;
    eventually(
        || navigator.signals().has_next().get(),
        "availability recomputed",
    )
    .await;
    assert!(!navigator.signals().has_previous().get());

    let mut reached_start = navigator.signals().subscribe_reached_start();
    navigator.previous().await.unwrap();
    reached_start.recv().await.expect("reached-start pulse");
    assert_eq!(signals.current_item().get(), Some(list[0].clone()));
}

#[tokio::test]
async fn next_at_the_end_pulses_and_stays_put() {
    let harness = Harness::spawn(SessionConfig::manual()).await;
    let navigator = navigator_with_queue(&harness).await;
    let handle = harness.session.handle();
    let list = items();

    handle.set_item(list[2].clone()).await.unwrap();
    let signals = harness.session.signals();
    eventually(
        || signals.current_item().get() == Some(list[2].clone()),
        "current item is C",
    )
    .await;

    let mut reached_end = navigator.signals().subscribe_reached_end();
    navigator.next().await.unwrap();
    reached_end.recv().await.expect("reached-end pulse");
    assert_eq!(signals.current_item().get(), Some(list[2].clone()));
}

#[tokio::test]
async fn end_of_item_auto_advances_like_next() {
    let harness = Harness::spawn(SessionConfig::default()).await;
    let _navigator = navigator_with_queue(&harness).await;
    let handle = harness.session.handle();
    let list = items();

    handle.set_item(list[0].clone()).await.unwrap();
    let signals = harness.session.signals();
    eventually(|| signals.is_playing().get(), "playing A").await;
    let resource = harness.engine.last_resource().unwrap();
    // Let the navigator observe the current item before ending it.
    settle().await;

    harness.engine.emit(EngineEvent::DidReachEnd { resource });
    eventually(
        || signals.current_item().get() == Some(list[1].clone()),
        "auto-advance to B",
    )
    .await;
    // Auto-play carries into the advanced item.
    eventually(|| signals.is_playing().get(), "playing B").await;
}

#[tokio::test]
async fn without_a_queue_navigation_only_pulses() {
    let harness = Harness::spawn(SessionConfig::manual()).await;
    let navigator = QueueNavigator::spawn(harness.session.handle());
    let handle = harness.session.handle();
    let list = items();

    handle.set_item(list[0].clone()).await.unwrap();
    let signals = harness.session.signals();
    eventually(
        || signals.current_item().get() == Some(list[0].clone()),
        "current item set",
    )
    .await;
    settle().await;
    assert!(!navigator.signals().has_next().get());
    assert!(!navigator.signals().has_previous().get());

    let mut reached_end = navigator.signals().subscribe_reached_end();
    navigator.next().await.unwrap();
    reached_end.recv().await.expect("reached-end pulse");
    assert_eq!(signals.current_item().get(), Some(list[0].clone()));
}

#[tokio::test]
async fn remote_track_commands_navigate_the_queue() {
    let harness = Harness::spawn(SessionConfig::manual()).await;
    let navigator = navigator_with_queue(&harness).await;
    let handle = harness.session.handle();
    let list = items();
    let remote = FakeRemote::new();
    navigator
        .drive_remote_commands(remote.as_ref())
        .await
        .unwrap();

    handle.set_item(list[1].clone()).await.unwrap();
    let signals = harness.session.signals();
    eventually(
        || signals.current_item().get() == Some(list[1].clone()),
        "current item is B",
    )
    .await;
    // Let the navigator observe the current item before navigating it.
    settle().await;

    remote.emit(RemoteCommand::NextTrack);
    eventually(
        || signals.current_item().get() == Some(list[2].clone()),
        "remote next moves to C",
    )
    .await;

    remote.emit(RemoteCommand::PreviousTrack);
    eventually(
        || signals.current_item().get() == Some(list[1].clone()),
        "remote previous moves back to B",
    )
    .await;
}
