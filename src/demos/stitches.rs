//! Stitch pattern over percentage space

use super::{Demo, RepaintGate};
use crate::consts::{FALLBACK_HEIGHT, FALLBACK_WIDTH};
use crate::data::{Kind, Stitch};
use crate::error::Result;
use crate::projection::filter_stitches;
use crate::renderer::{Surface, scene};
use crate::settings::StitchSettings;
use crate::store::{StitchesState, Store};

pub struct StitchesDemo {
    store: Store<StitchesState>,
    gate: RepaintGate,
    regenerate_count: usize,
}

impl StitchesDemo {
    pub fn new(settings: &StitchSettings) -> Self {
        let mut store = Store::new(StitchesState::from_settings(settings));
        let gate = RepaintGate::new();
        let flag = gate.flag();
        store.subscribe(move |_| flag.set(true));
        Self {
            store,
            gate,
            regenerate_count: settings.regenerate_count,
        }
    }

    pub fn store(&self) -> &Store<StitchesState> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store<StitchesState> {
        &mut self.store
    }
}

impl Default for StitchesDemo {
    fn default() -> Self {
        Self::new(&StitchSettings::default())
    }
}

impl Demo for StitchesDemo {
    fn name(&self) -> &'static str {
        "stitches"
    }

    /// An unlaid-out canvas keeps the browser's default 300x150
    fn resize(&mut self, width: f64, height: f64) -> (f64, f64) {
        self.gate.mark();
        if width <= 0.0 || height <= 0.0 {
            (f64::from(FALLBACK_WIDTH), f64::from(FALLBACK_HEIGHT))
        } else {
            (width, height)
        }
    }

    fn control(&mut self, name: &str, value: &str) -> bool {
        match name {
            "amount" => {
                self.store.set_amount_of_stitches_text(value);
                true
            }
            "stitch" => {
                match Stitch::from_label(value) {
                    Some(stitch) => self.store.toggle_stitch(stitch),
                    None => log::debug!("ignoring stitch {value:?}"),
                }
                true
            }
            "regenerate" => {
                self.store.regenerate_data(self.regenerate_count);
                true
            }
            _ => false,
        }
    }

    fn frame(&mut self, _elapsed_ms: f64, surface: &mut dyn Surface) -> Result<()> {
        let size = surface.size();
        if surface.is_empty() || !self.gate.needs_paint(size) {
            return Ok(());
        }
        let state = self.store.get_state();
        let visible = filter_stitches(&state.data, &state.stitches);
        scene::draw_stitches(surface, &visible);
        self.gate.painted(size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Scheduler;
    use crate::renderer::RecordingSurface;

    #[test]
    fn test_resize_fallback() {
        let mut demo = StitchesDemo::default();
        assert_eq!(demo.resize(0.0, 0.0), (300.0, 150.0));
        assert_eq!(demo.resize(640.0, 200.0), (640.0, 200.0));
    }

    #[test]
    fn test_paints_every_stitch_once() {
        let mut sched = Scheduler::new(StitchesDemo::default());
        let mut surface = RecordingSurface::default();
        sched.request_resize(0.0, 0.0);
        let token = sched.start();
        sched.on_frame(token, 0.0, &mut surface);
        sched.on_frame(token, 16.0, &mut surface);
        assert_eq!(surface.size(), (300.0, 150.0));
        assert_eq!(surface.frames(), 1);
        // every stitch has a centre dot; French knots add one more disc
        let french = sched
            .demo()
            .store()
            .state()
            .data
            .iter()
            .filter(|s| s.stitch == Stitch::French)
            .count();
        assert_eq!(surface.circles().count(), 60 + french);
    }

    #[test]
    fn test_toggle_hides_kind() {
        let mut demo = StitchesDemo::default();
        let mut surface = RecordingSurface::new(300.0, 150.0);
        assert!(demo.control("stitch", "cross"));
        assert!(demo.control("stitch", "back"));
        demo.frame(0.0, &mut surface).unwrap();
        assert_eq!(surface.line_count(), 0);
        assert!(surface.circles().count() > 0);
    }

    #[test]
    fn test_amount_regenerates() {
        let mut demo = StitchesDemo::default();
        assert!(demo.control("amount", "12"));
        assert_eq!(demo.store().state().data.len(), 12);
        demo.control("amount", "twelve");
        assert_eq!(demo.store().state().data.len(), 12);
        assert!(demo.control("regenerate", ""));
        assert_eq!(demo.store().state().data.len(), 40);
        assert!(!demo.control("view", "density"));
    }
}
