use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Clone)]
pub struct VolcanoRecord {
    #[serde(rename = "Volcano Name")]
    pub name: String,
    #[serde(rename = "Number")]
    pub id_number: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Elevation (m)")]
    pub elevation_meters: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CityRecord {
    #[serde(rename = "city")]
    pub city_name: String,
    pub country: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

#[derive(Debug, Clone)]
pub struct CountryBoundary {
    pub country_name: String,
    pub population: u64,
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Inside the WGS84 latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Immutable store of every loaded record. Groups refer into it by index.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    pub volcanoes: Vec<VolcanoRecord>,
    pub cities: Vec<CityRecord>,
    pub boundaries: Vec<CountryBoundary>,
}

impl RecordStore {
    /// All volcano and city positions, in load order, volcanoes first.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.volcanoes
            .iter()
            .map(|v| Coordinate::new(v.latitude, v.longitude))
            .chain(self.cities.iter().map(|c| Coordinate::new(c.latitude, c.longitude)))
            .collect()
    }
}
