//! Booth session control.
//!
//! [`BoothSession`] is the single owner of session state: chosen settings,
//! captured photos, the assembled layout and result visibility. It is a
//! cheap `Clone` handle so UI tasks can share it.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{broadcast, watch, Notify};

use pixelpop_booth_model::{
    BoothSettings, BorderStyle, EncodedPhoto, FilterKind, LayoutKind,
};
use pixelpop_common::error::{PixelpopError, PixelpopResult};
use pixelpop_common::clock::caption_date;
use pixelpop_render_engine::caption::{CaptionFont, CaptionText, DEFAULT_TITLE};
use pixelpop_render_engine::compositor::{compose_layout, FinalStrip};
use pixelpop_render_engine::snapshot::{render_snapshot, SnapshotOptions, DEFAULT_SNAPSHOT_QUALITY};

use crate::camera::{CameraManager, CameraStatus};
use crate::countdown::{Countdown, CountdownHandle, CountdownOutcome};

/// Message shown when a session is started without a live camera.
pub const CAMERA_REQUIRED_MESSAGE: &str = "Please allow camera access first.";

const EVENT_CAPACITY: usize = 64;

/// Notifications for the booth UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Camera acquisition started.
    CameraLoading,
    CameraLive,
    /// Camera acquisition failed with a user-facing message.
    CameraError(String),
    /// Visible countdown value.
    CountdownTick(u32),
    /// Countdown hidden.
    CountdownHidden,
    /// Photo `index` (zero-based) was added.
    PhotoCaptured { index: usize },
    /// The final layout was assembled and results are visible.
    Completed,
    /// Photos were cleared and results hidden.
    Reset,
}

/// Why a capture request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another capture is already running.
    InProgress,
    /// The layout already has all its photos.
    SessionComplete,
    /// No live camera frame to snapshot.
    CameraNotLive,
}

/// Result of a capture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured { index: usize, completed: bool },
    Skipped(SkipReason),
    /// The countdown was cancelled or the session reset before the shot.
    Cancelled,
}

/// Rendering settings fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub snapshot_quality: u8,
    pub caption_title: String,
    /// Date line source, read each time a layout is assembled. `None` leaves
    /// the date out.
    pub caption_date: Option<fn() -> String>,
    pub font: Option<Arc<CaptionFont>>,
}

impl RenderSettings {
    /// Caption for a layout assembled now.
    pub fn caption(&self) -> CaptionText {
        CaptionText {
            title: self.caption_title.clone(),
            date: self.caption_date.map(|today| today()),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            snapshot_quality: DEFAULT_SNAPSHOT_QUALITY,
            caption_title: DEFAULT_TITLE.to_string(),
            caption_date: Some(caption_date as fn() -> String),
            font: None,
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    settings: BoothSettings,
    photos: Vec<EncodedPhoto>,
    final_strip: Option<Arc<FinalStrip>>,
    results_visible: bool,
}

struct Inner {
    state: Mutex<SessionState>,
    camera: tokio::sync::Mutex<CameraManager>,
    capturing: AtomicBool,
    /// Signalled whenever a capture releases the in-progress flag.
    capture_released: Notify,
    /// Bumped by every reset; a capture started in an older generation is
    /// discarded.
    generation: AtomicU64,
    countdown: Mutex<Option<CountdownHandle>>,
    countdown_display: watch::Sender<Option<u32>>,
    events: broadcast::Sender<SessionEvent>,
    render: RenderSettings,
}

/// Shared handle to a booth session.
#[derive(Clone)]
pub struct BoothSession {
    inner: Arc<Inner>,
}

/// Clears the in-progress flag however the capture ends.
struct CaptureGuard<'a> {
    flag: &'a AtomicBool,
    released: Option<&'a Notify>,
}

impl<'a> CaptureGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self {
                flag,
                released: None,
            })
    }

    fn notify_on_release(mut self, released: &'a Notify) -> Self {
        self.released = Some(released);
        self
    }
}

impl Drop for CaptureGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        if let Some(released) = self.released {
            released.notify_waiters();
        }
    }
}

impl BoothSession {
    pub fn new(camera: CameraManager, settings: BoothSettings, render: RenderSettings) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let (countdown_display, _) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(SessionState {
                    settings,
                    ..SessionState::default()
                }),
                camera: tokio::sync::Mutex::new(camera),
                capturing: AtomicBool::new(false),
                capture_released: Notify::new(),
                generation: AtomicU64::new(0),
                countdown: Mutex::new(None),
                countdown_display,
                events,
                render,
            }),
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Visible countdown value, `None` while hidden.
    pub fn countdown_display(&self) -> watch::Receiver<Option<u32>> {
        self.inner.countdown_display.subscribe()
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    // ── Camera ──────────────────────────────────────────────────────

    /// Acquire the camera for the capture page.
    pub async fn enter_capture_page(&self) -> PixelpopResult<()> {
        let mut camera = self.inner.camera.lock().await;
        self.emit(SessionEvent::CameraLoading);
        match camera.start().await {
            Ok(()) => {
                self.emit(SessionEvent::CameraLive);
                Ok(())
            }
            Err(e) => {
                let message = match camera.status() {
                    CameraStatus::Failed(message) => message.clone(),
                    _ => e.to_string(),
                };
                self.emit(SessionEvent::CameraError(message));
                Err(e)
            }
        }
    }

    /// Leave the capture page: cancel any countdown and release the camera.
    pub async fn leave_capture_page(&self) {
        self.cancel_countdown();
        self.inner.camera.lock().await.stop();
    }

    pub async fn camera_status(&self) -> CameraStatus {
        self.inner.camera.lock().await.status().clone()
    }

    pub async fn camera_is_live(&self) -> bool {
        self.inner.camera.lock().await.is_live()
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn settings(&self) -> BoothSettings {
        self.state().settings
    }

    /// Choose a layout. Changing layout always starts over.
    pub fn set_layout(&self, layout: LayoutKind) {
        self.state().settings.layout = layout;
        self.reset();
    }

    pub fn set_border(&self, border: BorderStyle) {
        self.state().settings.border = border;
    }

    pub fn set_filter(&self, filter: FilterKind) {
        self.state().settings.filter = filter;
    }

    pub fn set_countdown(&self, secs: u32) {
        self.state().settings.countdown_secs = secs;
    }

    // ── Results ─────────────────────────────────────────────────────

    pub fn photos(&self) -> Vec<EncodedPhoto> {
        self.state().photos.clone()
    }

    pub fn photo_count(&self) -> usize {
        self.state().photos.len()
    }

    pub fn final_strip(&self) -> Option<Arc<FinalStrip>> {
        self.state().final_strip.clone()
    }

    pub fn results_visible(&self) -> bool {
        self.state().results_visible
    }

    pub fn is_capturing(&self) -> bool {
        self.inner.capturing.load(Ordering::SeqCst)
    }

    // ── Capture ─────────────────────────────────────────────────────

    /// Take one photo: countdown, snapshot, append, and assemble the layout
    /// once the last required photo is in.
    pub async fn capture_photo(&self) -> PixelpopResult<CaptureOutcome> {
        let Some(guard) = self.try_acquire_capture() else {
            tracing::debug!("Capture already in progress");
            return Ok(CaptureOutcome::Skipped(SkipReason::InProgress));
        };
        self.capture_with(guard).await
    }

    fn try_acquire_capture(&self) -> Option<CaptureGuard<'_>> {
        CaptureGuard::acquire(&self.inner.capturing)
            .map(|guard| guard.notify_on_release(&self.inner.capture_released))
    }

    /// Wait until no capture holds the in-progress flag, then take it.
    async fn acquire_capture(&self) -> CaptureGuard<'_> {
        loop {
            let released = self.inner.capture_released.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if let Some(guard) = self.try_acquire_capture() {
                return guard;
            }
            released.await;
        }
    }

    async fn capture_with(&self, _guard: CaptureGuard<'_>) -> PixelpopResult<CaptureOutcome> {
        let generation = self.inner.generation.load(Ordering::SeqCst);

        let countdown_secs = {
            let state = self.state();
            if state.photos.len() >= state.settings.required_photos() {
                return Ok(CaptureOutcome::Skipped(SkipReason::SessionComplete));
            }
            state.settings.countdown_secs
        };

        if self.run_countdown(countdown_secs).await == CountdownOutcome::Cancelled {
            tracing::info!("Countdown cancelled; no photo taken");
            return Ok(CaptureOutcome::Cancelled);
        }

        let frame = {
            let mut camera = self.inner.camera.lock().await;
            if !camera.is_live() {
                tracing::warn!("Capture requested without a live camera");
                return Ok(CaptureOutcome::Skipped(SkipReason::CameraNotLive));
            }
            camera.grab_frame().await?
        };

        // Effects are read at draw time, so a change during the countdown applies.
        let settings = self.settings();
        let options = SnapshotOptions {
            filter: settings.filter,
            border: settings.border,
            quality: self.inner.render.snapshot_quality,
        };
        let photo = tokio::task::spawn_blocking(move || render_snapshot(&frame, &options))
            .await
            .map_err(|e| PixelpopError::capture(format!("Snapshot task failed: {e}")))??;

        let (index, to_compose) = {
            let mut state = self.state();
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                tracing::info!("Session reset during capture; photo discarded");
                return Ok(CaptureOutcome::Cancelled);
            }
            let required = state.settings.required_photos();
            if state.photos.len() >= required {
                return Ok(CaptureOutcome::Skipped(SkipReason::SessionComplete));
            }
            state.photos.push(photo);
            let index = state.photos.len() - 1;
            let to_compose = (state.photos.len() == required)
                .then(|| (state.settings.layout, state.photos.clone()));
            (index, to_compose)
        };
        tracing::info!(index, "Photo captured");
        self.emit(SessionEvent::PhotoCaptured { index });

        let completed = match to_compose {
            Some((layout, photos)) => self.complete(layout, photos, generation).await?,
            None => false,
        };
        Ok(CaptureOutcome::Captured { index, completed })
    }

    /// Reset, then capture, provided the camera is live.
    ///
    /// A capture still counting down is cancelled by the reset; this waits
    /// for it to let go and then takes the first photo of the new session.
    pub async fn start_session(&self) -> PixelpopResult<CaptureOutcome> {
        if !self.camera_is_live().await {
            return Err(PixelpopError::camera(CAMERA_REQUIRED_MESSAGE));
        }
        self.reset();
        let guard = self.acquire_capture().await;
        self.capture_with(guard).await
    }

    /// Empty the photo list, hide results and cancel any countdown.
    pub fn reset(&self) {
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        self.cancel_countdown();
        {
            let mut state = self.state();
            state.photos.clear();
            state.final_strip = None;
            state.results_visible = false;
        }
        tracing::debug!("Session reset");
        self.emit(SessionEvent::Reset);
    }

    /// Start over after viewing results.
    pub fn new_session(&self) {
        self.reset();
    }

    async fn run_countdown(&self, secs: u32) -> CountdownOutcome {
        let (countdown, handle) = Countdown::start(secs);
        *self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        let session = self.clone();
        let outcome = countdown
            .run(move |value| {
                session.inner.countdown_display.send_replace(value);
                session.emit(match value {
                    Some(n) => SessionEvent::CountdownTick(n),
                    None => SessionEvent::CountdownHidden,
                });
            })
            .await;

        self.inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        outcome
    }

    fn cancel_countdown(&self) {
        let handle = self
            .inner
            .countdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.cancel();
        }
    }

    async fn complete(
        &self,
        layout: LayoutKind,
        photos: Vec<EncodedPhoto>,
        generation: u64,
    ) -> PixelpopResult<bool> {
        let render = &self.inner.render;
        let caption = render.caption();
        let strip = compose_layout(layout, &photos, &caption, render.font.as_deref()).await?;

        let mut state = self.state();
        if self.inner.generation.load(Ordering::SeqCst) != generation {
            return Ok(false);
        }
        state.final_strip = Some(Arc::new(strip));
        state.results_visible = true;
        drop(state);

        tracing::info!(layout = %layout, "Session complete");
        self.emit(SessionEvent::Completed);
        Ok(true)
    }
}

impl std::fmt::Debug for BoothSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();
        f.debug_struct("BoothSession")
            .field("settings", &state.settings)
            .field("photos", &state.photos.len())
            .field("results_visible", &state.results_visible)
            .finish()
    }
}
