//! Dataset generators
//!
//! Draw order per scatter point: cluster, x, y, value, category.
//! Draw order per stitch: value only, band by band, left to right.

use super::{Category, DataPoint, Kind, Mulberry32, Stitch, StitchPoint};
use crate::consts::SEED_BUMP_MODULUS;

/// Cluster centres in data space. One cluster is active; its draw is still
/// consumed so the per-point draw order stays fixed.
const CLUSTER_CENTERS: [(f64, f64); 3] = [(17.0, 30.0), (60.0, 70.0), (85.0, 40.0)];
const ACTIVE_CLUSTERS: f64 = 1.0;
/// Width of the jitter window around a cluster centre
const CLUSTER_SPREAD: f64 = 30.0;

const VALUE_BASE: f64 = 5.0;
const VALUE_SPAN: f64 = 65.0;

/// Stitches spread across 10%..90% of the width
const STITCH_X_START: f64 = 10.0;
const STITCH_X_SPAN: f64 = 80.0;

/// Generate `count` scatter points for `seed`
pub fn generate_dataset(count: usize, seed: i32) -> Vec<DataPoint> {
    let mut rng = Mulberry32::new(seed);
    let mut points = Vec::with_capacity(count);

    for i in 0..count {
        let cluster = (rng.next_unit() * ACTIVE_CLUSTERS).floor() as usize;
        let (base_x, base_y) = CLUSTER_CENTERS[cluster.min(CLUSTER_CENTERS.len() - 1)];
        let x = base_x + (rng.next_unit() - 0.5) * CLUSTER_SPREAD;
        let y = base_y + (rng.next_unit() - 0.5) * CLUSTER_SPREAD;
        let value = VALUE_BASE + rng.next_unit() * VALUE_SPAN;
        let category = Category::from_unit(rng.next_unit());

        points.push(DataPoint {
            id: format!("p_{}_{}_{}", seed, i, category.index()),
            x,
            y,
            value,
            category,
        });
    }

    points
}

/// Generate `count` stitches laid out on one horizontal band per stitch kind
///
/// Bands get `count / kinds` stitches each; the last band takes the remainder.
pub fn generate_stitches(count: usize, seed: i32) -> Vec<StitchPoint> {
    let mut rng = Mulberry32::new(seed);
    let bands = Stitch::ALL.len();
    let per_band = count / bands;
    let mut data = Vec::with_capacity(count);

    for (band, &stitch) in Stitch::ALL.iter().enumerate() {
        let in_band = if band + 1 == bands {
            count - per_band * (bands - 1)
        } else {
            per_band
        };
        let y = (band + 1) as f64 * 100.0 / (bands + 1) as f64;

        for i in 0..in_band {
            let x = if in_band > 1 {
                STITCH_X_START + (i as f64 / (in_band - 1) as f64) * STITCH_X_SPAN
            } else {
                STITCH_X_START + STITCH_X_SPAN / 2.0
            };

            data.push(StitchPoint {
                id: format!("stitch-{}-{}", stitch.label(), i + 1),
                x,
                y,
                value: rng.next_unit() * 100.0,
                stitch,
            });
        }
    }

    data
}

/// Seed bump used by store regeneration: reproducible without storing a seed
pub fn next_seed(len: usize) -> i32 {
    ((len % SEED_BUMP_MODULUS).max(1) + 1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_generate_known_values_seed_1() {
        let points = generate_dataset(5, 1);
        let ids: Vec<&str> = points.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p_1_0_2", "p_1_1_2", "p_1_2_0", "p_1_3_2", "p_1_4_1"]);

        let first = &points[0];
        assert!((first.x - 2.082_071_635_406_464_3).abs() < 1e-12);
        assert!((first.y - 30.823_411_198_798_567).abs() < 1e-12);
        assert!((first.value - 68.768_312_885_658_82).abs() < 1e-12);
        assert_eq!(first.category, Category::C);
        assert_eq!(points[4].category, Category::B);
    }

    #[test]
    fn test_generate_twice_identical() {
        assert_eq!(generate_dataset(5, 1), generate_dataset(5, 1));
    }

    #[test]
    fn test_generate_empty() {
        assert!(generate_dataset(0, 1).is_empty());
        assert!(generate_stitches(0, 1).is_empty());
    }

    #[test]
    fn test_stitch_bands() {
        let stitches = generate_stitches(10, 1);
        assert_eq!(stitches.len(), 10);

        let count = |s: Stitch| stitches.iter().filter(|p| p.stitch == s).count();
        assert_eq!(count(Stitch::Cross), 3);
        assert_eq!(count(Stitch::Back), 3);
        assert_eq!(count(Stitch::French), 4);

        for p in &stitches {
            let expected_y = match p.stitch {
                Stitch::Cross => 25.0,
                Stitch::Back => 50.0,
                Stitch::French => 75.0,
            };
            assert_eq!(p.y, expected_y);
            assert!((10.0..=90.0).contains(&p.x));
        }

        let cross: Vec<f64> = stitches
            .iter()
            .filter(|p| p.stitch == Stitch::Cross)
            .map(|p| p.x)
            .collect();
        assert_eq!(cross, vec![10.0, 50.0, 90.0]);
        assert_eq!(stitches[0].id, "stitch-Cross-1");
    }

    #[test]
    fn test_single_stitch_is_centered() {
        let stitches = generate_stitches(1, 4);
        assert_eq!(stitches.len(), 1);
        assert_eq!(stitches[0].stitch, Stitch::French);
        assert_eq!(stitches[0].x, 50.0);
    }

    #[test]
    fn test_next_seed() {
        assert_eq!(next_seed(0), 2);
        assert_eq!(next_seed(1), 2);
        assert_eq!(next_seed(650), (650 % 97) as i32 + 1);
        assert_eq!(next_seed(97), 2);
    }

    proptest! {
        #[test]
        fn prop_generation_is_deterministic(count in 0usize..200, seed in any::<i32>()) {
            prop_assert_eq!(generate_dataset(count, seed), generate_dataset(count, seed));
            prop_assert_eq!(generate_stitches(count, seed), generate_stitches(count, seed));
        }

        #[test]
        fn prop_points_stay_in_domain(count in 1usize..200, seed in any::<i32>()) {
            for p in generate_dataset(count, seed) {
                prop_assert!((2.0..32.0).contains(&p.x));
                prop_assert!((15.0..45.0).contains(&p.y));
                prop_assert!((5.0..70.0).contains(&p.value));
            }
        }

        #[test]
        fn prop_stitch_count_preserved(count in 0usize..120, seed in any::<i32>()) {
            prop_assert_eq!(generate_stitches(count, seed).len(), count);
        }
    }
}
