use crate::classify::{classify_elevation, classify_population};
use crate::config::AppConfig;
use crate::extent::display_extent;
use crate::processing::{group_records, CountryGroup, EntityKind, Grouping};
use crate::types::{BoundingBox, CityRecord, RecordStore, VolcanoRecord};
use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const POPUP_MAX_WIDTH: u32 = 300;

/// Turns an assembled document into the final page text.
pub trait MapRenderer {
    fn render(&self, document: &MapDocument) -> Result<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    pub title: String,
    pub view: ViewOptions,
    pub tiles: TileLayer,
    pub bounds: BoundingBox,
    pub layers: Vec<Layer>,
    pub country_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewOptions {
    pub center: [f64; 2],
    pub zoom_start: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub search_zoom: u8,
    pub max_bounds: [[f64; 2]; 2],
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub name: String,
    pub show: bool,
    pub content: LayerContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    CircleMarkers { markers: Vec<CircleMarker> },
    Markers { markers: Vec<PinMarker> },
    MarkerCluster { markers: Vec<PinMarker> },
    Choropleth {
        stroke_color: &'static str,
        stroke_weight: u32,
        features: FeatureCollection,
    },
}

impl LayerContent {
    pub fn marker_count(&self) -> usize {
        match self {
            LayerContent::CircleMarkers { markers } => markers.len(),
            LayerContent::Markers { markers } | LayerContent::MarkerCluster { markers } => {
                markers.len()
            }
            LayerContent::Choropleth { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Popup {
    pub html: String,
    pub max_width: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleMarker {
    pub location: [f64; 2],
    pub radius: f64,
    pub fill_color: &'static str,
    pub fill_opacity: f64,
    pub color: &'static str,
    pub weight: u32,
    pub popup: Popup,
}

#[derive(Debug, Clone, Serialize)]
pub struct PinMarker {
    pub location: [f64; 2],
    pub popup: Popup,
}

/// Load-to-file pass: extent, grouping, assembly, rendering, write.
/// Nothing touches the output path until the page is fully rendered.
pub fn generate_map(
    config: &AppConfig,
    store: &RecordStore,
    renderer: &dyn MapRenderer,
) -> Result<PathBuf> {
    let document = build_document(config, store)?;
    let page = renderer.render(&document)?;

    let path = config.output.html_path.clone();
    write_document(&path, &page)?;
    info!("Wrote {} layers to {:?}", document.layers.len(), path);
    Ok(path)
}

pub fn build_document(config: &AppConfig, store: &RecordStore) -> Result<MapDocument> {
    let bounds = display_extent(&store.coordinates(), &config.processing.display_window)?;
    info!(
        "Initial view: lat [{}, {}], lon [{}, {}]",
        bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon
    );

    let grouping = group_records(store, config.processing.city_cap_per_country);
    Ok(assemble(config, store, &grouping, bounds))
}

/// Layer order: all volcanoes, all cities, population, then the per-country
/// groups in label order.
pub fn assemble(
    config: &AppConfig,
    store: &RecordStore,
    grouping: &Grouping,
    bounds: BoundingBox,
) -> MapDocument {
    let mut layers = Vec::with_capacity(grouping.country_groups.len() + 3);

    layers.push(Layer {
        name: "All Volcanoes".to_string(),
        show: false,
        content: LayerContent::CircleMarkers {
            markers: grouping
                .all_volcanoes
                .iter()
                .map(|&i| volcano_marker(&store.volcanoes[i]))
                .collect(),
        },
    });

    layers.push(Layer {
        name: "All Cities".to_string(),
        show: false,
        content: LayerContent::MarkerCluster {
            markers: grouping
                .admitted_cities
                .iter()
                .map(|&i| city_marker(&store.cities[i]))
                .collect(),
        },
    });

    layers.push(Layer {
        name: "Population".to_string(),
        show: true,
        content: population_layer(store),
    });

    layers.extend(
        grouping
            .country_groups
            .iter()
            .map(|group| country_layer(store, group)),
    );

    let map = &config.map;
    MapDocument {
        title: map.title.clone(),
        view: ViewOptions {
            center: [0.0, 0.0],
            zoom_start: map.zoom_start,
            min_zoom: map.min_zoom,
            max_zoom: map.max_zoom,
            search_zoom: map.search_zoom,
            max_bounds: map.max_bounds,
        },
        tiles: TileLayer {
            url: map.tile_url.clone(),
            attribution: map.tile_attribution.clone(),
        },
        bounds,
        layers,
        country_names: grouping.country_names(),
    }
}

fn country_layer(store: &RecordStore, group: &CountryGroup) -> Layer {
    let content = match group.kind {
        EntityKind::Volcano => LayerContent::CircleMarkers {
            markers: group
                .members
                .iter()
                .map(|&i| volcano_marker(&store.volcanoes[i]))
                .collect(),
        },
        EntityKind::City => LayerContent::Markers {
            markers: group
                .members
                .iter()
                .map(|&i| city_marker(&store.cities[i]))
                .collect(),
        },
    };

    Layer {
        name: group.label(),
        show: false,
        content,
    }
}

fn volcano_marker(v: &VolcanoRecord) -> CircleMarker {
    let html = format!(
        "<b>Volcano:</b> {}<br>\n<b>ID Number:</b> {}<br>\n<b>Country:</b> {}<br>\n<b>Elevation:</b> {} m",
        escape_html(&v.name),
        escape_html(&v.id_number),
        escape_html(&v.country),
        v.elevation_meters
    );

    CircleMarker {
        location: [v.latitude, v.longitude],
        radius: 6.0,
        fill_color: classify_elevation(v.elevation_meters).color(),
        fill_opacity: 0.75,
        color: "grey",
        weight: 1,
        popup: Popup {
            html,
            max_width: POPUP_MAX_WIDTH,
        },
    }
}

fn city_marker(c: &CityRecord) -> PinMarker {
    let html = format!(
        "<b>City:</b> {}<br>\n<b>Country:</b> {}<br>",
        escape_html(&c.city_name),
        escape_html(&c.country)
    );

    PinMarker {
        location: [c.latitude, c.longitude],
        popup: Popup {
            html,
            max_width: POPUP_MAX_WIDTH,
        },
    }
}

fn population_layer(store: &RecordStore) -> LayerContent {
    let features = store
        .boundaries
        .iter()
        .map(|b| {
            let mut properties = JsonObject::new();
            properties.insert("name".to_string(), b.country_name.clone().into());
            properties.insert("population".to_string(), b.population.into());
            properties.insert(
                "fill_color".to_string(),
                classify_population(b.population).color().into(),
            );

            Feature {
                bbox: None,
                geometry: Some(Geometry::new(geojson::Value::from(&b.geometry))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    LayerContent::Choropleth {
        stroke_color: "black",
        stroke_weight: 1,
        features: FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        },
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write map to {:?}", path))
}
