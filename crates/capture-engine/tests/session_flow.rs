//! End-to-end booth session behaviour against the synthetic camera.

use std::sync::Arc;
use std::time::Duration;

use pixelpop_booth_model::{BoothSettings, LayoutKind};
use pixelpop_capture_engine::backend::SyntheticCamera;
use pixelpop_capture_engine::{
    BoothSession, CameraConstraints, CameraManager, CameraStatus, CaptureOutcome, RenderSettings,
    SessionEvent, SkipReason, CAMERA_DENIED_MESSAGE, CAMERA_REQUIRED_MESSAGE,
};
use tokio::sync::broadcast;

fn booth(camera: SyntheticCamera, layout: LayoutKind, countdown_secs: u32) -> BoothSession {
    let manager = CameraManager::new(
        Arc::new(camera.with_size(160, 120)),
        CameraConstraints::default(),
    );
    let settings = BoothSettings {
        layout,
        countdown_secs,
        ..BoothSettings::default()
    };
    BoothSession::new(manager, settings, RenderSettings::default())
}

fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn twostrip_keeps_two_photos_and_completes_once() {
    let session = booth(SyntheticCamera::new(), LayoutKind::TwoStrip, 0);
    session.enter_capture_page().await.unwrap();
    let mut events = session.subscribe();

    let first = session.capture_photo().await.unwrap();
    assert_eq!(
        first,
        CaptureOutcome::Captured {
            index: 0,
            completed: false
        }
    );
    assert!(!session.results_visible());
    assert!(session.final_strip().is_none());

    let second = session.capture_photo().await.unwrap();
    assert_eq!(
        second,
        CaptureOutcome::Captured {
            index: 1,
            completed: true
        }
    );
    assert!(session.results_visible());

    let third = session.capture_photo().await.unwrap();
    assert_eq!(third, CaptureOutcome::Skipped(SkipReason::SessionComplete));
    assert_eq!(session.photo_count(), 2);

    let events = drain(&mut events);
    let completed = events
        .iter()
        .filter(|e| **e == SessionEvent::Completed)
        .count();
    assert_eq!(completed, 1);
    assert_eq!(events.last(), Some(&SessionEvent::Completed));

    let strip = session.final_strip().unwrap();
    assert_eq!(strip.layout, LayoutKind::TwoStrip);
    assert_eq!(strip.dimensions(), (300, 380));
}

#[tokio::test]
async fn reset_is_idempotent() {
    let session = booth(SyntheticCamera::new(), LayoutKind::Single, 0);
    session.enter_capture_page().await.unwrap();
    session.capture_photo().await.unwrap();
    assert!(session.results_visible());

    session.reset();
    assert_eq!(session.photo_count(), 0);
    assert!(!session.results_visible());
    assert!(session.final_strip().is_none());

    session.new_session();
    assert_eq!(session.photo_count(), 0);
    assert!(!session.results_visible());

    // A fresh run works after resetting.
    let outcome = session.capture_photo().await.unwrap();
    assert!(matches!(outcome, CaptureOutcome::Captured { completed: true, .. }));
}

#[tokio::test(start_paused = true)]
async fn countdown_ticks_before_snapshot() {
    let session = booth(SyntheticCamera::new(), LayoutKind::Single, 3);
    session.enter_capture_page().await.unwrap();
    let mut events = session.subscribe();
    let display = session.countdown_display();

    let started = tokio::time::Instant::now();
    session.capture_photo().await.unwrap();
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(*display.borrow(), None);

    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::CountdownTick(3),
            SessionEvent::CountdownTick(2),
            SessionEvent::CountdownTick(1),
            SessionEvent::CountdownHidden,
            SessionEvent::PhotoCaptured { index: 0 },
            SessionEvent::Completed,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn overlapping_capture_is_skipped() {
    let session = booth(SyntheticCamera::new(), LayoutKind::TwoStrip, 3);
    session.enter_capture_page().await.unwrap();

    let first = tokio::spawn({
        let session = session.clone();
        async move { session.capture_photo().await }
    });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(session.is_capturing());

    let second = session.capture_photo().await.unwrap();
    assert_eq!(second, CaptureOutcome::Skipped(SkipReason::InProgress));

    let first = first.await.unwrap().unwrap();
    assert_eq!(
        first,
        CaptureOutcome::Captured {
            index: 0,
            completed: false
        }
    );
    assert_eq!(session.photo_count(), 1);
    assert!(!session.is_capturing());
}

#[tokio::test(start_paused = true)]
async fn reset_cancels_pending_countdown() {
    let session = booth(SyntheticCamera::new(), LayoutKind::Single, 3);
    session.enter_capture_page().await.unwrap();
    let display = session.countdown_display();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.capture_photo().await }
    });
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(*display.borrow(), Some(2));

    session.reset();
    assert_eq!(pending.await.unwrap().unwrap(), CaptureOutcome::Cancelled);
    assert_eq!(session.photo_count(), 0);
    assert_eq!(*display.borrow(), None);
    assert!(!session.is_capturing());
}

#[tokio::test(start_paused = true)]
async fn leaving_capture_page_cancels_and_releases_camera() {
    let camera = SyntheticCamera::new();
    let tracks = camera.active_streams();
    let session = booth(camera, LayoutKind::Single, 3);
    session.enter_capture_page().await.unwrap();
    assert_eq!(tracks.load(std::sync::atomic::Ordering::SeqCst), 1);

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.capture_photo().await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    session.leave_capture_page().await;
    assert_eq!(pending.await.unwrap().unwrap(), CaptureOutcome::Cancelled);
    assert_eq!(tracks.load(std::sync::atomic::Ordering::SeqCst), 0);
    assert_eq!(session.camera_status().await, CameraStatus::Idle);
}

#[tokio::test]
async fn camera_denial_is_reported() {
    let session = booth(SyntheticCamera::denied(), LayoutKind::Single, 0);
    let mut events = session.subscribe();

    let err = session.enter_capture_page().await.unwrap_err();
    assert!(err.is_camera_error());
    assert_eq!(
        session.camera_status().await,
        CameraStatus::Failed(CAMERA_DENIED_MESSAGE.to_string())
    );
    assert_eq!(
        drain(&mut events),
        vec![
            SessionEvent::CameraLoading,
            SessionEvent::CameraError(CAMERA_DENIED_MESSAGE.to_string()),
        ]
    );
}

#[tokio::test]
async fn start_session_requires_camera() {
    let session = booth(SyntheticCamera::new(), LayoutKind::Single, 0);
    let err = session.start_session().await.unwrap_err();
    assert!(err.to_string().contains(CAMERA_REQUIRED_MESSAGE));

    session.enter_capture_page().await.unwrap();
    let outcome = session.start_session().await.unwrap();
    assert!(matches!(outcome, CaptureOutcome::Captured { index: 0, .. }));
}

#[tokio::test]
async fn start_session_clears_previous_results() {
    let session = booth(SyntheticCamera::new(), LayoutKind::Single, 0);
    session.enter_capture_page().await.unwrap();
    session.capture_photo().await.unwrap();
    assert!(session.results_visible());

    let outcome = session.start_session().await.unwrap();
    assert_eq!(
        outcome,
        CaptureOutcome::Captured {
            index: 0,
            completed: true
        }
    );
    assert_eq!(session.photo_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn start_session_takes_over_pending_countdown() {
    let session = booth(SyntheticCamera::new(), LayoutKind::TwoStrip, 3);
    session.enter_capture_page().await.unwrap();

    let pending = tokio::spawn({
        let session = session.clone();
        async move { session.capture_photo().await }
    });
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(session.is_capturing());

    let started = session.start_session().await.unwrap();
    assert_eq!(
        started,
        CaptureOutcome::Captured {
            index: 0,
            completed: false
        }
    );
    assert_eq!(pending.await.unwrap().unwrap(), CaptureOutcome::Cancelled);
    assert_eq!(session.photo_count(), 1);
    assert!(!session.is_capturing());
}

#[tokio::test]
async fn every_layout_assembles_exactly_once() {
    for layout in LayoutKind::ALL {
        let session = booth(SyntheticCamera::new(), layout, 0);
        session.enter_capture_page().await.unwrap();
        let mut events = session.subscribe();
        let required = layout.required_photos();

        for shot in 0..required - 1 {
            let outcome = session.capture_photo().await.unwrap();
            assert_eq!(
                outcome,
                CaptureOutcome::Captured {
                    index: shot,
                    completed: false
                },
                "{layout} shot {shot}"
            );
            assert!(!session.results_visible(), "{layout}");
        }
        assert!(
            !drain(&mut events).contains(&SessionEvent::Completed),
            "{layout} assembled early"
        );

        let last = session.capture_photo().await.unwrap();
        assert_eq!(
            last,
            CaptureOutcome::Captured {
                index: required - 1,
                completed: true
            },
            "{layout}"
        );

        let extra = session.capture_photo().await.unwrap();
        assert_eq!(
            extra,
            CaptureOutcome::Skipped(SkipReason::SessionComplete),
            "{layout}"
        );
        assert_eq!(session.photo_count(), required);

        let completed = drain(&mut events)
            .into_iter()
            .filter(|e| *e == SessionEvent::Completed)
            .count();
        assert_eq!(completed, 1, "{layout}");
        assert_eq!(
            session.final_strip().unwrap().dimensions(),
            (layout.spec().width, layout.spec().height)
        );
    }
}
