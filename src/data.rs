use crate::config::{AppConfig, InputConfig};
use crate::types::{CityRecord, Coordinate, CountryBoundary, RecordStore, VolcanoRecord};
use anyhow::{anyhow, Context, Result};
use csv::ReaderBuilder;
use geo::MultiPolygon;
use geojson::GeoJson;
use serde::de::DeserializeOwned;
use shapefile::dbase::FieldValue;
use shapefile::Reader;
use std::fs::{self, File};
use std::path::Path;
use tracing::{info, warn};

pub fn load_data(config: &AppConfig) -> Result<RecordStore> {
    info!("Loading data...");

    let volcanoes = load_volcanoes(&config.input.volcanoes_csv)?;
    info!("Loaded {} volcano records", volcanoes.len());

    let cities = load_cities(&config.input.cities_csv)?;
    info!("Loaded {} city records", cities.len());

    let boundaries = load_boundaries(&config.input)?;
    info!("Loaded {} country boundaries", boundaries.len());

    Ok(RecordStore {
        volcanoes,
        cities,
        boundaries,
    })
}

pub fn load_volcanoes(path: &Path) -> Result<Vec<VolcanoRecord>> {
    let records: Vec<VolcanoRecord> = load_csv(path)?;
    for v in &records {
        warn_if_invalid(&v.name, Coordinate::new(v.latitude, v.longitude));
    }
    Ok(records)
}

pub fn load_cities(path: &Path) -> Result<Vec<CityRecord>> {
    let records: Vec<CityRecord> = load_csv(path)?;
    for c in &records {
        warn_if_invalid(&c.city_name, Coordinate::new(c.latitude, c.longitude));
    }
    Ok(records)
}

fn load_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {:?}", path))?;
    let mut rdr = ReaderBuilder::new().from_reader(file);

    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<T>().enumerate() {
        // Header is line 1, so data row 0 is line 2.
        let record: T = result
            .with_context(|| format!("Malformed record on line {} of {:?}", row + 2, path))?;
        records.push(record);
    }
    Ok(records)
}

fn warn_if_invalid(label: &str, coord: Coordinate) {
    if !coord.is_valid() {
        warn!(
            "{} has coordinates outside the valid range: ({}, {})",
            label, coord.lat, coord.lon
        );
    }
}

pub fn load_boundaries(input: &InputConfig) -> Result<Vec<CountryBoundary>> {
    let path = &input.boundaries;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s: &str| s.to_lowercase())
        .ok_or_else(|| anyhow!("Boundary file has no extension: {:?}", path))?;

    match extension.as_str() {
        "shp" => load_shapefile_boundaries(input),
        "json" | "geojson" => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read GeoJSON file: {:?}", path))?;
            parse_geojson_boundaries(&content, &input.name_property, &input.population_property)
                .with_context(|| format!("Invalid boundary data in {:?}", path))
        }
        _ => Err(anyhow!("Unsupported geometry format: {}", extension)),
    }
}

/// Parses a boundary FeatureCollection. A leading byte-order mark is ignored.
pub fn parse_geojson_boundaries(
    content: &str,
    name_property: &str,
    population_property: &str,
) -> Result<Vec<CountryBoundary>> {
    let geojson: GeoJson = content
        .trim_start_matches('\u{feff}')
        .parse()
        .context("Failed to parse GeoJSON")?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let mut boundaries = Vec::new();

    for (i, feature) in collection.features.into_iter().enumerate() {
        let props = feature
            .properties
            .as_ref()
            .ok_or_else(|| anyhow!("Feature {} has no properties", i))?;

        let country_name = match props.get(name_property) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => return Err(anyhow!("Feature {} is missing '{}'", i, name_property)),
        };

        let population = props
            .get(population_property)
            .and_then(json_population)
            .ok_or_else(|| {
                anyhow!(
                    "Feature {} ({}) has no usable '{}'",
                    i,
                    country_name,
                    population_property
                )
            })?;

        let geometry = match feature.geometry {
            Some(geo) => {
                let valid_geo: geo::Geometry<f64> = geo
                    .value
                    .try_into()
                    .map_err(|e| anyhow!("Failed to convert geojson geometry: {:?}", e))?;

                match valid_geo {
                    geo::Geometry::MultiPolygon(mp) => mp,
                    geo::Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
                    _ => {
                        warn!("Skipping {}: geometry is not a polygon", country_name);
                        continue;
                    }
                }
            }
            None => {
                warn!("Skipping {}: feature has no geometry", country_name);
                continue;
            }
        };

        boundaries.push(CountryBoundary {
            country_name,
            population,
            geometry,
        });
    }

    Ok(boundaries)
}

fn json_population(value: &serde_json::Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
    })
}

fn load_shapefile_boundaries(input: &InputConfig) -> Result<Vec<CountryBoundary>> {
    let mut reader = Reader::from_path(&input.boundaries)
        .with_context(|| format!("Failed to open Shapefile: {:?}", input.boundaries))?;

    let mut boundaries = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let country_name = match record.get(&input.name_property) {
            Some(FieldValue::Character(Some(s))) => s.trim().to_string(),
            Some(FieldValue::Memo(s)) => s.trim().to_string(),
            _ => {
                return Err(anyhow!(
                    "Name column '{}' not found in Shapefile",
                    input.name_property
                ))
            }
        };

        let population = record
            .get(&input.population_property)
            .and_then(dbase_population)
            .ok_or_else(|| {
                anyhow!(
                    "{} has no usable '{}' attribute",
                    country_name,
                    input.population_property
                )
            })?;

        let geometry: MultiPolygon<f64> = match shape {
            shapefile::Shape::Polygon(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygon: {:?}", e))?,
            shapefile::Shape::PolygonM(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygonM: {:?}", e))?,
            shapefile::Shape::PolygonZ(polygon) => polygon
                .try_into()
                .map_err(|e| anyhow!("Failed to convert polygonZ: {:?}", e))?,
            _ => {
                warn!("Skipping {}: shape is not a polygon", country_name);
                continue;
            }
        };

        boundaries.push(CountryBoundary {
            country_name,
            population,
            geometry,
        });
    }

    Ok(boundaries)
}

fn dbase_population(value: &FieldValue) -> Option<u64> {
    let n = match value {
        FieldValue::Numeric(Some(n)) => *n,
        FieldValue::Double(n) => *n,
        FieldValue::Float(Some(n)) => f64::from(*n),
        FieldValue::Integer(n) => f64::from(*n),
        _ => return None,
    };
    (n.is_finite() && n >= 0.0).then_some(n as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const WORLD: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "NAME": "Peru", "POP2005": 27274266 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-81.0, -18.0], [-68.0, -18.0], [-68.0, 0.0], [-81.0, 0.0], [-81.0, -18.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Nowhere", "POP2005": 0 },
                "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Japan", "POP2005": 127896740.0 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[130.0, 31.0], [142.0, 31.0], [142.0, 45.0], [130.0, 31.0]]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_skips_points() {
        let boundaries = parse_geojson_boundaries(WORLD, "NAME", "POP2005").unwrap();
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].country_name, "Peru");
        assert_eq!(boundaries[0].population, 27_274_266);
        assert_eq!(boundaries[0].geometry.0.len(), 1);
        assert_eq!(boundaries[1].country_name, "Japan");
        assert_eq!(boundaries[1].population, 127_896_740);
    }

    #[test]
    fn tolerates_byte_order_mark() {
        let with_bom = format!("\u{feff}{}", WORLD);
        let boundaries = parse_geojson_boundaries(&with_bom, "NAME", "POP2005").unwrap();
        assert_eq!(boundaries.len(), 2);
    }

    #[test]
    fn missing_population_is_an_error() {
        let err = parse_geojson_boundaries(WORLD, "NAME", "POP2010").unwrap_err();
        assert!(err.to_string().contains("POP2010"));
    }

    #[test]
    fn negative_population_is_an_error() {
        let world = WORLD.replace("\"POP2005\": 0", "\"POP2005\": -1");
        let err = parse_geojson_boundaries(&world, "NAME", "POP2005").unwrap_err();
        assert!(err.to_string().contains("Nowhere"));
    }

    #[test]
    fn fractional_population_is_truncated() {
        assert_eq!(json_population(&serde_json::json!(499_999.5)), Some(499_999));
        assert_eq!(json_population(&serde_json::json!(-0.5)), None);
    }

    fn write_shapefile(dir: &Path, population: f64) -> InputConfig {
        use shapefile::dbase::{FieldName, Record, TableWriterBuilder};
        use shapefile::{Point, Polygon, PolygonRing, Writer};

        let path = dir.join("world.shp");
        let table = TableWriterBuilder::new()
            .add_character_field(FieldName::try_from("NAME").unwrap(), 50)
            .add_numeric_field(FieldName::try_from("POP2005").unwrap(), 12, 0);

        let polygon = Polygon::new(PolygonRing::Outer(vec![
            Point::new(-81.0, -18.0),
            Point::new(-81.0, 0.0),
            Point::new(-68.0, 0.0),
            Point::new(-68.0, -18.0),
            Point::new(-81.0, -18.0),
        ]));
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some("Peru".to_string())));
        record.insert("POP2005".to_string(), FieldValue::Numeric(Some(population)));

        {
            let mut writer = Writer::from_path(&path, table).unwrap();
            writer.write_shape_and_record(&polygon, &record).unwrap();
        }

        InputConfig {
            boundaries: path,
            ..InputConfig::default()
        }
    }

    #[test]
    fn loads_shapefile_boundaries() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = write_shapefile(dir.path(), 27_274_266.0);

        let boundaries = load_boundaries(&input).unwrap();
        assert_eq!(boundaries.len(), 1);
        assert_eq!(boundaries[0].country_name, "Peru");
        assert_eq!(boundaries[0].population, 27_274_266);
        assert_eq!(boundaries[0].geometry.0.len(), 1);
    }

    #[test]
    fn shapefile_negative_population_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = write_shapefile(dir.path(), -1.0);

        let err = load_boundaries(&input).unwrap_err();
        assert!(err.to_string().contains("POP2005"));
    }

    #[test]
    fn dbase_population_accepts_numeric_kinds() {
        assert_eq!(dbase_population(&FieldValue::Numeric(Some(12.0))), Some(12));
        assert_eq!(dbase_population(&FieldValue::Integer(7)), Some(7));
        assert_eq!(dbase_population(&FieldValue::Numeric(None)), None);
        assert_eq!(dbase_population(&FieldValue::Character(Some("12".to_string()))), None);
    }

    #[test]
    fn rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [1.0, 2.0] }"#;
        assert!(parse_geojson_boundaries(point, "NAME", "POP2005").is_err());
    }

    #[test]
    fn loads_volcano_csv_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Volcano Name,Number,Country,Region,Latitude,Longitude,Elevation (m)\n\
             Misti,1504-02,Peru,Peru,-16.294,-71.409,5822\n\
             Fuji,0803-03,Japan,Honshu,35.35,138.73,3776"
        )
        .unwrap();

        let volcanoes = load_volcanoes(file.path()).unwrap();
        assert_eq!(volcanoes.len(), 2);
        assert_eq!(volcanoes[0].name, "Misti");
        assert_eq!(volcanoes[0].id_number, "1504-02");
        assert_eq!(volcanoes[1].elevation_meters, 3776.0);
    }

    #[test]
    fn city_row_missing_a_field_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "city,country,lat,lng\nLima,Peru,-12.04,\n").unwrap();
        assert!(load_cities(file.path()).is_err());
    }

    #[test]
    fn unknown_boundary_extension_is_rejected() {
        let input = InputConfig {
            boundaries: "world.kml".into(),
            ..InputConfig::default()
        };
        let err = load_boundaries(&input).unwrap_err();
        assert!(err.to_string().contains("kml"));
    }
}
