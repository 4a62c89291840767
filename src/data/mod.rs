//! Synthetic datasets for the chart, stitch and table demos
//!
//! Generation is pure: the same `(count, seed)` always yields the same
//! records. Fields are drawn from the generator in a fixed order, so adding or
//! reordering draws changes every dataset downstream.

pub mod generate;
pub mod rng;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub use generate::{generate_dataset, generate_stitches, next_seed};
pub use rng::Mulberry32;

use crate::renderer::Color;

/// A closed set of kinds that records can be tagged with
pub trait Kind: Copy + Ord + std::fmt::Debug + 'static {
    /// Every variant, in assignment order
    const ALL: &'static [Self];

    /// Map a unit float onto equal slices of `[0, 1)` in `ALL` order
    fn from_unit(r: f64) -> Self {
        let n = Self::ALL.len();
        for (i, kind) in Self::ALL.iter().enumerate() {
            if r < (i + 1) as f64 / n as f64 {
                return *kind;
            }
        }
        Self::ALL[n - 1]
    }

    /// Position of this kind in `ALL`
    fn index(self) -> usize {
        Self::ALL.iter().position(|k| *k == self).unwrap_or(0)
    }

    fn color(self) -> Color;

    fn label(self) -> &'static str;

    /// Inverse of [`Kind::label`], case-insensitive
    fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.iter().copied().find(|k| k.label().eq_ignore_ascii_case(label))
    }
}

/// Point category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    A,
    B,
    C,
}

impl Kind for Category {
    const ALL: &'static [Self] = &[Category::A, Category::B, Category::C];

    fn color(self) -> Color {
        match self {
            Category::A => Color::from_hex(0x823460),
            Category::B => Color::from_hex(0xc61c73),
            Category::C => Color::from_hex(0xf184bc),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
            Category::C => "C",
        }
    }
}

/// Embroidery stitch kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stitch {
    Cross,
    Back,
    French,
}

impl Kind for Stitch {
    const ALL: &'static [Self] = &[Stitch::Cross, Stitch::Back, Stitch::French];

    fn color(self) -> Color {
        match self {
            Stitch::Cross => Color::from_hex(0x823460),
            Stitch::Back => Color::from_hex(0xc61c73),
            Stitch::French => Color::from_hex(0xf184bc),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Stitch::Cross => "Cross",
            Stitch::Back => "Back",
            Stitch::French => "French",
        }
    }
}

/// A set of active kinds (multi-select buttons)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindSet<K: Kind> {
    active: BTreeSet<K>,
}

impl<K: Kind> KindSet<K> {
    /// Every kind active
    pub fn all() -> Self {
        Self {
            active: K::ALL.iter().copied().collect(),
        }
    }

    pub fn none() -> Self {
        Self {
            active: BTreeSet::new(),
        }
    }

    pub fn contains(&self, kind: K) -> bool {
        self.active.contains(&kind)
    }

    /// Flip membership of `kind`
    pub fn toggle(&mut self, kind: K) {
        if !self.active.remove(&kind) {
            self.active.insert(kind);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.active.iter().copied()
    }
}

impl<K: Kind> Default for KindSet<K> {
    fn default() -> Self {
        Self::all()
    }
}

impl<K: Kind> FromIterator<K> for KindSet<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            active: iter.into_iter().collect(),
        }
    }
}

/// A scatter/table record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub category: Category,
}

/// A stitch placed in percentage space (0-100 on both axes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StitchPoint {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub stitch: Stitch,
}

/// Records that carry a value and a kind, for shared filtering
pub trait Tagged {
    type Kind: Kind;

    fn value(&self) -> f64;
    fn kind(&self) -> Self::Kind;
}

impl Tagged for DataPoint {
    type Kind = Category;

    fn value(&self) -> f64 {
        self.value
    }

    fn kind(&self) -> Category {
        self.category
    }
}

impl Tagged for StitchPoint {
    type Kind = Stitch;

    fn value(&self) -> f64 {
        self.value
    }

    fn kind(&self) -> Stitch {
        self.stitch
    }
}
