use std::fs;
use std::path::Path;
use tempfile::TempDir;
use volcano_map::config::AppConfig;
use volcano_map::data::load_data;
use volcano_map::leaflet::LeafletRenderer;
use volcano_map::render::{build_document, generate_map, LayerContent};

const VOLCANOES: &str = "\
Volcano Name,Number,Country,Latitude,Longitude,Elevation (m)
Misti,1504-02,Peru,-16.294,-71.409,5822
Fuji,0803-03,Japan,35.35,138.73,3776
Villarrica,1507-12,Chile,-39.42,-71.93,2847
";

const WORLD: &str = "\u{feff}{\"type\":\"FeatureCollection\",\"features\":[\
{\"type\":\"Feature\",\"properties\":{\"NAME\":\"Chile\",\"POP2005\":16295102},\
\"geometry\":{\"type\":\"Polygon\",\"coordinates\":[[[-75.0,-55.0],[-67.0,-55.0],[-67.0,-17.0],[-75.0,-55.0]]]}}]}";

fn write_inputs(dir: &Path) -> AppConfig {
    let mut cities = String::from("city,country,lat,lng,population\n");
    for i in 0..200 {
        cities.push_str(&format!("Town {i},Chile,{},-70.5,1000\n", -20 - i % 10));
    }
    cities.push_str("Tokyo,Japan,35.68,139.69,37000000\n");

    fs::write(dir.join("volcanoes.csv"), VOLCANOES).unwrap();
    fs::write(dir.join("cities.csv"), cities).unwrap();
    fs::write(dir.join("world.json"), WORLD).unwrap();

    let mut config = AppConfig::default();
    config.input.volcanoes_csv = dir.join("volcanoes.csv");
    config.input.cities_csv = dir.join("cities.csv");
    config.input.boundaries = dir.join("world.json");
    config.output.html_path = dir.join("docs").join("InteractiveMap.html");
    config
}

#[test]
fn full_pass_writes_expected_layers() {
    let dir = TempDir::new().unwrap();
    let config = write_inputs(dir.path());
    let store = load_data(&config).unwrap();
    assert_eq!(store.cities.len(), 201);
    assert_eq!(store.boundaries.len(), 1);

    let doc = build_document(&config, &store).unwrap();
    let names: Vec<&str> = doc.layers.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "All Volcanoes",
            "All Cities",
            "Population",
            "Chile - Cities",
            "Chile - Volcanoes",
            "Japan - Cities",
            "Japan - Volcanoes",
            "Peru - Volcanoes",
        ]
    );

    // 150 Chilean towns plus Tokyo.
    match &doc.layers[1].content {
        LayerContent::MarkerCluster { markers } => assert_eq!(markers.len(), 151),
        other => panic!("unexpected content: {:?}", other),
    }
    assert_eq!(doc.layers[3].content.marker_count(), 150);

    // Fuji and Tokyo lie east of lon 90, so the view spans the South
    // American points only.
    assert_eq!(doc.bounds.min_lat, -39.42);
    assert_eq!(doc.bounds.max_lat, -16.294);
    assert_eq!(doc.bounds.min_lon, -71.93);
    assert_eq!(doc.bounds.max_lon, -70.5);

    let path = generate_map(&config, &store, &LeafletRenderer).unwrap();
    let page = fs::read_to_string(path).unwrap();
    assert!(page.contains("<option value=\"Chile\">Chile</option>"));
    assert!(page.contains("\"fill_color\":\"#B30000\""));
}

#[test]
fn repeated_runs_are_identical() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(dir.path());

    let store = load_data(&config).unwrap();
    let first = generate_map(&config, &store, &LeafletRenderer).unwrap();

    config.output.html_path = dir.path().join("second.html");
    let store = load_data(&config).unwrap();
    let second = generate_map(&config, &store, &LeafletRenderer).unwrap();

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn missing_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut config = write_inputs(dir.path());
    config.input.cities_csv = dir.path().join("absent.csv");

    assert!(load_data(&config).is_err());
    assert!(!config.output.html_path.exists());
}
