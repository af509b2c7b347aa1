use crate::config::DisplayWindow;
use crate::types::{BoundingBox, Coordinate};
use anyhow::{anyhow, Result};
use geo::algorithm::bounding_rect::BoundingRect;
use geo::{MultiPoint, Point};

impl DisplayWindow {
    /// Inclusive on every edge.
    pub fn contains(&self, coord: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coord.lat)
            && (self.min_lon..=self.max_lon).contains(&coord.lon)
    }
}

pub fn filter_to_window(coords: &[Coordinate], window: &DisplayWindow) -> Vec<Coordinate> {
    coords.iter().copied().filter(|c| window.contains(c)).collect()
}

/// Smallest lat/lon rectangle around the points, `None` when there are none.
pub fn bounding_box(coords: &[Coordinate]) -> Option<BoundingBox> {
    let points: MultiPoint<f64> = coords.iter().map(|c| Point::new(c.lon, c.lat)).collect();
    points.bounding_rect().map(|rect| BoundingBox {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lon: rect.min().x,
        max_lon: rect.max().x,
    })
}

/// Bounding box of the coordinates that fall inside the display window.
pub fn display_extent(coords: &[Coordinate], window: &DisplayWindow) -> Result<BoundingBox> {
    let retained = filter_to_window(coords, window);
    bounding_box(&retained).ok_or_else(|| {
        anyhow!(
            "No coordinates inside the display window lat [{}, {}], lon [{}, {}] ({} candidates)",
            window.min_lat,
            window.max_lat,
            window.min_lon,
            window.max_lon,
            coords.len()
        )
    })
}
