use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub processing: ProcessingConfig,
    pub output: OutputConfig,
    pub map: MapConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    pub volcanoes_csv: PathBuf,
    pub cities_csv: PathBuf,
    pub boundaries: PathBuf, // GeoJSON or Shapefile
    pub name_property: String,
    pub population_property: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            volcanoes_csv: PathBuf::from("Files").join("cleaned_volcanoes.csv"),
            cities_csv: PathBuf::from("Files").join("cleaned_locations.csv"),
            boundaries: PathBuf::from("Files").join("world.json"),
            name_property: "NAME".to_string(),
            population_property: "POP2005".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ProcessingConfig {
    pub display_window: DisplayWindow,
    pub city_cap_per_country: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            display_window: DisplayWindow::default(),
            city_cap_per_country: 150,
        }
    }
}

/// Region the initial view is biased towards. Points outside it still render,
/// they just do not contribute to the bounding box.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct DisplayWindow {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Default for DisplayWindow {
    fn default() -> Self {
        Self {
            min_lat: -40.0,
            max_lat: 40.0,
            min_lon: -90.0,
            max_lon: 90.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub html_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_path: PathBuf::from("docs").join("InteractiveMap.html"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MapConfig {
    pub title: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub zoom_start: u8,
    pub search_zoom: u8,
    pub max_bounds: [[f64; 2]; 2],
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            title: "World Volcanoes & Cities Map".to_string(),
            min_zoom: 2,
            max_zoom: 7,
            zoom_start: 6,
            search_zoom: 4,
            max_bounds: [[-86.5, -181.5], [86.5, 181.5]],
            tile_url: "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png"
                .to_string(),
            tile_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/\">CARTO</a>".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Loads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Ok(Self::default()),
        }
    }
}
