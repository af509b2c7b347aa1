//! Elevation and population bucketing.
//!
//! Both classifiers are ordered threshold tables scanned top-down; the first
//! matching row wins and the last row matches everything. The gaps between
//! rows are deliberate: an elevation of 1999.5 m or a population of exactly
//! 249 999 fall through every bounded row and land in the catch-all.

use serde::Serialize;
use std::ops::{Bound, RangeBounds};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationTier {
    Low,
    Medium,
    High,
}

impl ElevationTier {
    pub fn color(self) -> &'static str {
        match self {
            ElevationTier::Low => "green",
            ElevationTier::Medium => "orange",
            ElevationTier::High => "red",
        }
    }
}

const ELEVATION_TABLE: [((Bound<f64>, Bound<f64>), ElevationTier); 2] = [
    ((Bound::Unbounded, Bound::Included(1999.0)), ElevationTier::Low),
    ((Bound::Included(2000.0), Bound::Included(3000.0)), ElevationTier::Medium),
];

pub fn classify_elevation(elevation_m: f64) -> ElevationTier {
    ELEVATION_TABLE
        .iter()
        .find(|(range, _)| range.contains(&elevation_m))
        .map_or(ElevationTier::High, |(_, tier)| *tier)
}

/// Population tier, 1 (sparsest) to 10 (densest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PopulationTier(u8);

impl PopulationTier {
    pub const TOP: PopulationTier = PopulationTier(10);

    pub fn rank(self) -> u8 {
        self.0
    }

    pub fn color(self) -> &'static str {
        POPULATION_COLORS[usize::from(self.0 - 1)]
    }
}

const POPULATION_COLORS: [&str; 10] = [
    "#FFF7EC", "#FEE8C8", "#FDD49E", "#FDBB84", "#FC8D59", "#EF6548", "#D7301F", "#B30000",
    "#990000", "#7F0000",
];

const POPULATION_TABLE: [((Bound<u64>, Bound<u64>), PopulationTier); 9] = [
    ((Bound::Unbounded, Bound::Excluded(249_999)), PopulationTier(1)),
    ((Bound::Included(250_000), Bound::Included(499_999)), PopulationTier(2)),
    ((Bound::Included(500_000), Bound::Included(999_999)), PopulationTier(3)),
    ((Bound::Included(1_000_000), Bound::Included(1_999_999)), PopulationTier(4)),
    ((Bound::Included(2_000_000), Bound::Included(3_999_999)), PopulationTier(5)),
    ((Bound::Included(4_000_000), Bound::Included(7_999_999)), PopulationTier(6)),
    ((Bound::Included(8_000_000), Bound::Included(15_999_999)), PopulationTier(7)),
    ((Bound::Included(16_000_000), Bound::Included(31_999_999)), PopulationTier(8)),
    ((Bound::Included(32_000_000), Bound::Included(63_999_999)), PopulationTier(9)),
];

pub fn classify_population(population: u64) -> PopulationTier {
    POPULATION_TABLE
        .iter()
        .find(|(range, _)| range.contains(&population))
        .map_or(PopulationTier::TOP, |(_, tier)| *tier)
}
