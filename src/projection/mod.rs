//! Data projection pipeline
//!
//! Pure functions from `(records, filter state)` to the views the painters
//! draw: filtered subsets, axis domains, pixel scales and density grids.
//! [`ProjectionCache`] memoizes the layers so they are recomputed only when
//! their inputs change, never per frame.

pub mod cache;
pub mod density;
pub mod domain;
pub mod filter;
pub mod scale;
pub mod table;

pub use cache::{ChartView, ProjectionCache};
pub use density::{DensityCell, DensityGrid};
pub use domain::{Domains, Extent, compute_domains};
pub use filter::{Filters, ValueRange, filter_by, filter_stitches};
pub use scale::{LinearScale, PlotArea, Projector};
pub use table::{CategoryBar, SortOrder, TableQuery, category_bars, category_counts, table_rows};
