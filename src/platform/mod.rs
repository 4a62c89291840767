//! Platform layer
//!
//! Frame timing and scheduling shared by the browser loop and the headless
//! runner:
//! - [`FrameClock`]: elapsed time between frames, clamped
//! - [`Scheduler`]: start/stop lifecycle, stale-callback rejection, resize latching
//! - `web` (wasm only): `requestAnimationFrame` loop and DOM listeners

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::future::Future;

use crate::demos::Demo;
use crate::renderer::Surface;

/// Longest frame the demos will simulate, in ms (tab switches, breakpoints)
pub const MAX_FRAME_MS: f64 = 100.0;

/// Milliseconds since an arbitrary origin, monotonic
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Milliseconds since an arbitrary origin, monotonic
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Run a fire-and-forget task on the UI thread
#[cfg(target_arch = "wasm32")]
pub fn spawn_local(task: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(task);
}

/// Run a fire-and-forget task to completion (headless: no event loop to yield to)
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn_local(task: impl Future<Output = ()> + 'static) {
    pollster::block_on(task);
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn wall_clock_ms() -> f64 {
    js_sys::Date::now()
}

/// Wall-clock milliseconds since the Unix epoch
#[cfg(not(target_arch = "wasm32"))]
pub fn wall_clock_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// `HH:MM:SS` for a wall-clock timestamp, in the browser's local time
#[cfg(target_arch = "wasm32")]
pub fn clock_label(epoch_ms: f64) -> String {
    let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_f64(epoch_ms));
    format!("{:02}:{:02}:{:02}", date.get_hours(), date.get_minutes(), date.get_seconds())
}

/// `HH:MM:SS` for a wall-clock timestamp, in UTC
#[cfg(not(target_arch = "wasm32"))]
pub fn clock_label(epoch_ms: f64) -> String {
    let secs = (epoch_ms / 1000.0).floor() as i64;
    let of_day = secs.rem_euclid(86_400);
    format!("{:02}:{:02}:{:02}", of_day / 3600, of_day % 3600 / 60, of_day % 60)
}

/// Elapsed time between consecutive frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Elapsed ms since the previous call; 0 on the first call after a reset
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let elapsed = match self.last {
            Some(last) => (now_ms - last).clamp(0.0, MAX_FRAME_MS),
            None => 0.0,
        };
        self.last = Some(now_ms);
        elapsed
    }
}

/// Identifies one scheduled callback; callbacks from an older run are ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Drives one demo: owns it, its clock and its lifecycle
pub struct Scheduler<D> {
    demo: D,
    clock: FrameClock,
    generation: u64,
    running: bool,
    pending_resize: Option<(f64, f64)>,
    frames: u64,
    failed_frames: u64,
}

impl<D: Demo> Scheduler<D> {
    pub fn new(demo: D) -> Self {
        Self {
            demo,
            clock: FrameClock::new(),
            generation: 0,
            running: false,
            pending_resize: None,
            frames: 0,
            failed_frames: 0,
        }
    }

    pub fn demo(&self) -> &D {
        &self.demo
    }

    pub fn demo_mut(&mut self) -> &mut D {
        &mut self.demo
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn failed_frames(&self) -> u64 {
        self.failed_frames
    }

    /// Begin a new run; the returned token is valid until the next `stop`
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.running = true;
        self.clock.reset();
        log::info!("{}: started", self.demo.name());
        FrameToken(self.generation)
    }

    /// End the run; any outstanding token becomes stale
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.generation += 1;
        log::info!("{}: stopped after {} frames", self.demo.name(), self.frames);
    }

    pub fn is_current(&self, token: FrameToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Record the host's latest layout size; applied before the next frame
    pub fn request_resize(&mut self, width: f64, height: f64) {
        self.pending_resize = Some((width, height));
    }

    /// Run one frame. Returns the token for the next callback, or `None` when
    /// the token is stale or the scheduler is stopped (nothing is touched).
    ///
    /// A failing frame is logged and the loop continues.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: f64, surface: &mut dyn Surface) -> Option<FrameToken> {
        if !self.is_current(token) {
            log::trace!("{}: ignoring stale frame", self.demo.name());
            return None;
        }

        if let Some((width, height)) = self.pending_resize.take() {
            let (w, h) = self.demo.resize(width, height);
            if surface.size() != (w, h) {
                surface.set_size(w, h);
            }
        }

        let elapsed = self.clock.tick(now_ms);
        if let Err(e) = self.demo.frame(elapsed, surface) {
            self.failed_frames += 1;
            log::error!("{}: frame failed: {e}", self.demo.name());
        }
        self.frames += 1;
        Some(token)
    }
}
