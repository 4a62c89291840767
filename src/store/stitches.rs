//! Stitch pattern state

use super::Store;
use crate::data::{KindSet, Stitch, StitchPoint, generate_stitches, next_seed};
use crate::settings::{RangeLimits, StitchSettings};

#[derive(Debug, Clone)]
pub struct StitchesState {
    pub data: std::rc::Rc<Vec<StitchPoint>>,
    pub amount_of_stitches: usize,
    pub stitches: KindSet<Stitch>,
    pub amount_limits: RangeLimits,
}

impl StitchesState {
    pub fn from_settings(settings: &StitchSettings) -> Self {
        Self {
            data: std::rc::Rc::new(generate_stitches(settings.initial_count, settings.seed)),
            amount_of_stitches: settings.amount_limits.clamp_count(settings.amount as i64),
            stitches: KindSet::all(),
            amount_limits: settings.amount_limits,
        }
    }
}

impl Default for StitchesState {
    fn default() -> Self {
        Self::from_settings(&StitchSettings::default())
    }
}

impl Store<StitchesState> {
    /// Slider change: clamp, then record the amount and its pattern in one step
    pub fn set_amount_of_stitches(&mut self, amount: i64) {
        let amount = self.state().amount_limits.clamp_count(amount);
        let seed = next_seed(amount);
        log::debug!("stitch amount {amount}, regenerating with seed {seed}");
        let data = std::rc::Rc::new(generate_stitches(amount, seed));
        self.update(|s| {
            s.amount_of_stitches = amount;
            s.data = data;
        });
    }

    pub fn set_amount_of_stitches_text(&mut self, text: &str) {
        match crate::parse_control_int(text) {
            Some(amount) => self.set_amount_of_stitches(amount),
            None => log::debug!("ignoring stitch amount input {text:?}"),
        }
    }

    pub fn toggle_stitch(&mut self, stitch: Stitch) {
        self.update(|s| s.stitches.toggle(stitch));
    }

    /// Replace the pattern with `count` stitches, seeded from `count`
    pub fn regenerate_data(&mut self, count: usize) {
        let seed = next_seed(count);
        log::debug!("regenerating {count} stitches with seed {seed}");
        self.update(|s| s.data = std::rc::Rc::new(generate_stitches(count, seed)));
    }
}
