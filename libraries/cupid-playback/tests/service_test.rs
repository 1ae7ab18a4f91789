//! Tests for the playback service task
//!
//! Run on a paused clock so metadata and error-skip delays elapse instantly.

mod common;

use common::{config, track, CatalogLookup, FixedSearch, MockWidget, TitleLookup, WidgetCall};
use cupid_core::TrackId;
use cupid_playback::{
    PlaybackCommand, PlaybackController, PlaybackError, PlaybackEvent, PlaybackHandle,
    PlaybackService, PlaybackState, WidgetEvent,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

// ===== Helpers =====

fn service(n: usize) -> (PlaybackService<MockWidget>, PlaybackHandle, MockWidget) {
    let widget = MockWidget::new();
    let controller =
        PlaybackController::with_rng(widget.clone(), config(n), StdRng::seed_from_u64(11));
    let (service, handle) = PlaybackService::new(controller);
    (service, handle, widget)
}

/// Receive events until one matches
async fn wait_for<F>(rx: &mut broadcast::Receiver<PlaybackEvent>, mut matches: F) -> PlaybackEvent
where
    F: FnMut(&PlaybackEvent) -> bool,
{
    tokio::time::timeout(Duration::from_secs(30), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if matches(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

// ===== Tests =====

#[tokio::test(start_paused = true)]
async fn commands_are_applied_in_order() {
    let (service, handle, widget) = service(4);
    let mut events = handle.subscribe();
    let task = service.spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle.send(PlaybackCommand::Next).await.unwrap();
    handle.send(PlaybackCommand::Next).await.unwrap();
    handle.send(PlaybackCommand::Previous).await.unwrap();

    wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::TrackChanged { index: Some(1), .. })
    })
    .await;
    settle().await;

    assert_eq!(
        widget.loaded(),
        vec![
            "track00".to_string(),
            "track01".into(),
            "track02".into(),
            "track01".into()
        ]
    );
    assert_eq!(handle.snapshot().index, Some(1));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn snapshot_mirrors_widget_state() {
    let (service, handle, _widget) = service(3);
    let task = service.spawn();
    let mut watch = handle.watch();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle
        .widget_event(WidgetEvent::StateChanged(PlaybackState::Playing))
        .await
        .unwrap();

    watch.wait_for(|snapshot| snapshot.is_playing).await.unwrap();
    assert!(handle.is_playing());
    assert_eq!(handle.snapshot().state, PlaybackState::Playing);

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn metadata_is_read_after_delay() {
    let (service, handle, widget) = service(3);
    widget.set_video("track00", "Tere Bina", "A. R. Rahman");
    let mut events = handle.subscribe();
    let task = service.spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();

    let event = wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::MetadataUpdated { .. })
    })
    .await;
    match event {
        PlaybackEvent::MetadataUpdated { track_id, metadata } => {
            assert_eq!(track_id, track(0));
            assert_eq!(metadata.title, "Tere Bina");
        }
        other => panic!("unexpected event {other:?}"),
    }

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn search_not_found_keeps_current_track() {
    let (service, handle, widget) = service(5);
    let search = Arc::new(FixedSearch::not_found());
    let mut events = handle.subscribe();
    let task = service.with_search(search.clone()).spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle.send(PlaybackCommand::Select(3)).await.unwrap();
    handle
        .send(PlaybackCommand::Search("nonexistent-query-xyz".into()))
        .await
        .unwrap();

    wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::SearchNotFound { .. })
    })
    .await;

    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(handle.snapshot().index, Some(3));
    assert_eq!(widget.loaded().last().map(String::as_str), Some("track03"));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn search_found_plays_next_to_current() {
    let (service, handle, widget) = service(5);
    let search = Arc::new(FixedSearch::found("JGwWNGJdvx8"));
    let mut events = handle.subscribe();
    let task = service.with_search(search).spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle
        .send(PlaybackCommand::Search("shape of you".into()))
        .await
        .unwrap();

    wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::SearchStarted { .. })
    })
    .await;
    settle().await;

    assert_eq!(handle.snapshot().index, Some(1));
    assert_eq!(
        handle.snapshot().track_id,
        Some(TrackId::new("JGwWNGJdvx8"))
    );
    assert_eq!(widget.loaded().last().map(String::as_str), Some("JGwWNGJdvx8"));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn query_falls_back_to_playlist_when_search_is_empty() {
    let (service, handle, widget) = service(4);
    let lookup = Arc::new(TitleLookup::new());
    let search = Arc::new(FixedSearch::not_found());
    let task = service
        .with_lookup(lookup.clone())
        .with_search(search.clone())
        .spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    settle().await;
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 4);

    handle
        .send(PlaybackCommand::PlayQuery("track02".into()))
        .await
        .unwrap();
    settle().await;

    assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    assert_eq!(widget.loaded().last().map(String::as_str), Some("track02"));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn cached_titles_never_shadow_a_search() {
    let (service, handle, widget) = service(4);
    let lookup = Arc::new(CatalogLookup::new(&[("track02", "Kesariya - Official Video")]));
    let search = Arc::new(FixedSearch::found("JGwWNGJdvx8"));
    let task = service
        .with_lookup(lookup)
        .with_search(search.clone())
        .spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    settle().await;

    for command in [
        PlaybackCommand::Search("shape of you".into()),
        PlaybackCommand::PlayQuery("shape of you".into()),
    ] {
        handle.send(command).await.unwrap();
        settle().await;
    }

    assert_eq!(search.calls.load(Ordering::SeqCst), 2);
    assert!(!widget.loaded().contains(&"track02".to_string()));
    assert_eq!(widget.loaded().last().map(String::as_str), Some("JGwWNGJdvx8"));
    assert!(handle.snapshot().player_open);

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn query_without_search_provider_reports_failure() {
    let (service, handle, _widget) = service(3);
    let mut events = handle.subscribe();
    let task = service.spawn();

    handle
        .send(PlaybackCommand::PlayQuery("kesariya".into()))
        .await
        .unwrap();

    let event = wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::SearchFailed { .. })
    })
    .await;
    assert!(matches!(event, PlaybackEvent::SearchFailed { query, .. } if query == "kesariya"));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn widget_error_skips_after_delay() {
    let (service, handle, widget) = service(3);
    let mut events = handle.subscribe();
    let task = service.spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle.widget_event(WidgetEvent::Error(5)).await.unwrap();

    wait_for(&mut events, |e| matches!(e, PlaybackEvent::Warning { .. })).await;
    assert_eq!(widget.loaded(), vec!["track00".to_string()]);

    wait_for(&mut events, |e| {
        matches!(e, PlaybackEvent::TrackChanged { index: Some(1), .. })
    })
    .await;
    assert_eq!(widget.loaded().last().map(String::as_str), Some("track01"));

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn repeat_through_service_restarts_track() {
    let (service, handle, widget) = service(3);
    let task = service.spawn();

    handle.widget_event(WidgetEvent::Ready).await.unwrap();
    handle.send(PlaybackCommand::ToggleRepeat).await.unwrap();
    settle().await;
    widget.clear_calls();
    handle
        .widget_event(WidgetEvent::StateChanged(PlaybackState::Ended))
        .await
        .unwrap();
    settle().await;

    assert_eq!(
        widget.calls(),
        vec![WidgetCall::Seek(Duration::ZERO), WidgetCall::Play]
    );
    assert_eq!(handle.snapshot().index, Some(0));
    assert!(handle.snapshot().repeat);

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn handle_reports_stopped_service() {
    let (service, handle, _widget) = service(2);
    let task = service.spawn();

    handle.send(PlaybackCommand::Shutdown).await.unwrap();
    task.await.unwrap();

    let err = handle.send(PlaybackCommand::Next).await.unwrap_err();
    assert!(matches!(err, PlaybackError::ServiceStopped));
}
