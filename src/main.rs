//! Canvas demos entry point
//!
//! Browser: mounts every demo whose canvas is on the page.
//! Native: runs each demo headlessly and logs what it painted.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_entry {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use canvas_demos::Settings;
    use canvas_demos::api::BrowserTimer;
    use canvas_demos::demos::{Demo, EmitterDemo, RepulsionDemo, ScatterDemo, StitchesDemo, TableDemo};
    use canvas_demos::platform::web::MountedDemo;

    /// Canvas ids the page may provide, one per demo
    pub const CANVAS_IDS: [&str; 5] = [
        "emitter-canvas",
        "repulsion-canvas",
        "scatter-canvas",
        "stitches-canvas",
        "table-canvas",
    ];

    /// Element holding optional JSON settings
    const SETTINGS_ELEMENT_ID: &str = "demo-settings";

    thread_local! {
        static SETTINGS: RefCell<Settings> = RefCell::new(Settings::default());
        static MOUNTED: RefCell<HashMap<String, MountedDemo>> = RefCell::new(HashMap::new());
    }

    fn page_settings() -> Settings {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(SETTINGS_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match json {
            Some(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring page settings: {e}");
                Settings::default()
            }),
            None => Settings::default(),
        }
    }

    fn build(canvas_id: &str, settings: &Settings) -> Option<Box<dyn Demo>> {
        let demo: Box<dyn Demo> = match canvas_id {
            "emitter-canvas" => Box::new(EmitterDemo::new(&settings.emitter)),
            "repulsion-canvas" => Box::new(RepulsionDemo::new(&settings.repulsion)),
            "scatter-canvas" => Box::new(ScatterDemo::new(&settings.scatter)),
            "stitches-canvas" => Box::new(StitchesDemo::new(&settings.stitches)),
            "table-canvas" => Box::new(TableDemo::new(&settings.table, BrowserTimer)),
            _ => return None,
        };
        Some(demo)
    }

    /// Mount the demo for `canvas_id`, replacing one already running there
    pub fn mount(canvas_id: &str) -> bool {
        let Some(demo) = SETTINGS.with(|s| build(canvas_id, &s.borrow())) else {
            log::warn!("No demo for canvas #{canvas_id}");
            return false;
        };
        unmount(canvas_id);
        match MountedDemo::mount(canvas_id, demo) {
            Ok(mounted) => {
                MOUNTED.with(|m| m.borrow_mut().insert(canvas_id.to_string(), mounted));
                true
            }
            Err(e) => {
                log::debug!("Skipping #{canvas_id}: {e}");
                false
            }
        }
    }

    fn unmount_take(canvas_id: &str) -> Option<MountedDemo> {
        MOUNTED.with(|m| m.borrow_mut().remove(canvas_id))
    }

    pub fn unmount(canvas_id: &str) -> bool {
        match unmount_take(canvas_id) {
            Some(mounted) => {
                drop(mounted);
                log::info!("Unmounted #{canvas_id}");
                true
            }
            None => false,
        }
    }

    pub fn control(canvas_id: &str, name: &str, value: &str) -> bool {
        MOUNTED.with(|m| m.borrow().get(canvas_id).is_some_and(|d| d.control(name, value)))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("logger init failed: {e}").into());
        }
        log::info!("Canvas demos starting...");

        SETTINGS.with(|s| *s.borrow_mut() = page_settings());
        let mounted = CANVAS_IDS.iter().filter(|id| mount(id)).count();
        log::info!("Mounted {mounted} demo(s)");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web_entry::run();
}

/// Remount a demo after the host page recreated its canvas
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn mount_demo(canvas_id: &str) -> bool {
    web_entry::mount(canvas_id)
}

/// Stop a demo, cancel its pending frame and detach its listeners
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn unmount_demo(canvas_id: &str) -> bool {
    web_entry::unmount(canvas_id)
}

/// Forward a control change (slider, toggle, button) to a mounted demo
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn demo_control(canvas_id: &str, name: &str, value: &str) -> bool {
    web_entry::control(canvas_id, name, value)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use canvas_demos::Settings;
    use canvas_demos::demos::{Demo, EmitterDemo, RepulsionDemo, ScatterDemo, StitchesDemo, TableDemo};
    use canvas_demos::platform::Scheduler;
    use canvas_demos::renderer::{RecordingSurface, Surface};

    const FRAMES: u32 = 120;
    const FRAME_MS: f64 = 1000.0 / 60.0;
    const WIDTH: f64 = 640.0;
    const HEIGHT: f64 = 360.0;

    /// Pointer sweeping an ellipse around the canvas centre
    fn pointer_at(frame: u32) -> (f64, f64) {
        let t = f64::from(frame) * 0.1;
        (WIDTH / 2.0 + 200.0 * t.cos(), HEIGHT / 2.0 + 100.0 * t.sin())
    }

    fn run(demo: Box<dyn Demo>, pointer: bool) {
        let mut sched = Scheduler::new(demo);
        let mut surface = RecordingSurface::default();
        sched.request_resize(WIDTH, HEIGHT);
        let token = sched.start();

        for frame in 0..FRAMES {
            if pointer {
                let (x, y) = pointer_at(frame);
                sched.demo_mut().pointer_move(x, y);
            }
            if sched.on_frame(token, f64::from(frame) * FRAME_MS, &mut surface).is_none() {
                break;
            }
        }
        sched.stop();

        let (w, h) = surface.size();
        log::info!(
            "{:<9} {}x{} frames={} repaints={} failed={} circles={} rects={} lines={} texts={}",
            sched.demo().name(),
            w,
            h,
            sched.frames(),
            surface.frames(),
            sched.failed_frames(),
            surface.circles().count(),
            surface.rect_count(),
            surface.line_count(),
            surface.texts().len()
        );
    }

    pub fn run_all(settings: &Settings) {
        run(Box::new(EmitterDemo::new(&settings.emitter)), true);
        run(Box::new(RepulsionDemo::new(&settings.repulsion)), true);
        run(Box::new(ScatterDemo::new(&settings.scatter)), false);
        run(Box::new(StitchesDemo::new(&settings.stitches)), false);
        run(Box::new(TableDemo::immediate(&settings.table)), false);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn load_settings(path: &str) -> Result<canvas_demos::Settings, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(canvas_demos::Settings::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Canvas demos (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match load_settings(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Failed to load settings from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => canvas_demos::Settings::default(),
    };

    headless::run_all(&settings);
}
