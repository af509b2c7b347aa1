//! Page and script templates for the Leaflet backend.
//!
//! Kept as `&'static str` so the generated page needs nothing from disk.
//! Placeholders are `{{NAME}}` and are filled by `leaflet::LeafletRenderer`.

pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
    <title>{{TITLE}}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.css" />
    <link rel="stylesheet" href="https://unpkg.com/leaflet.markercluster@1.5.3/dist/MarkerCluster.Default.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <script src="https://unpkg.com/leaflet.markercluster@1.5.3/dist/leaflet.markercluster.js"></script>
    <script src="https://code.jquery.com/jquery-3.7.1.min.js"></script>
    <style>
        html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
        #map { position: absolute; top: 0; bottom: 0; right: 0; left: 0; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
{{MAP_SCRIPT}}
    </script>
{{CONTROLS}}
</body>
</html>
"#;

/// Builds every layer from `MAP_DATA` and exposes the map as `window.volcanoMap`.
pub const MAP_SCRIPT: &str = r#"
const MAP_DATA = {{MAP_DATA}};

(function () {
    const view = MAP_DATA.view;
    const map = L.map('map', {
        center: view.center,
        zoom: view.zoom_start,
        minZoom: view.min_zoom,
        maxZoom: view.max_zoom,
        maxBounds: view.max_bounds,
    });
    L.control.scale().addTo(map);

    L.tileLayer(MAP_DATA.tiles.url, {
        attribution: MAP_DATA.tiles.attribution,
        minNativeZoom: view.min_zoom,
        maxNativeZoom: view.max_zoom,
    }).addTo(map);

    function popup(p) {
        return L.popup({ maxWidth: p.max_width }).setContent(p.html);
    }

    function pin(m) {
        return L.marker(m.location).bindPopup(popup(m.popup));
    }

    function circle(m) {
        return L.circleMarker(m.location, {
            radius: m.radius,
            fill: true,
            fillColor: m.fill_color,
            fillOpacity: m.fill_opacity,
            color: m.color,
            weight: m.weight,
        }).bindPopup(popup(m.popup));
    }

    function build(content) {
        switch (content.type) {
            case 'circle_markers':
                return L.featureGroup(content.markers.map(circle));
            case 'markers':
                return L.featureGroup(content.markers.map(pin));
            case 'marker_cluster': {
                const cluster = L.markerClusterGroup();
                content.markers.forEach(m => cluster.addLayer(pin(m)));
                return L.featureGroup([cluster]);
            }
            case 'choropleth':
                return L.featureGroup([L.geoJson(content.features, {
                    style: f => ({
                        fillColor: f.properties.fill_color,
                        color: content.stroke_color,
                        weight: content.stroke_weight,
                    }),
                })]);
        }
        return L.featureGroup();
    }

    const overlays = {};
    MAP_DATA.layers.forEach(layer => {
        const group = build(layer.content);
        overlays[layer.name] = group;
        if (layer.show) {
            group.addTo(map);
        }
    });
    L.control.layers(null, overlays).addTo(map);

    window.volcanoMap = map;
})();
"#;

/// Fits the initial view to the computed bounding box and pins the zoom range.
pub const FIT_BOUNDS_SCRIPT: &str = r#"
<script>
    window.addEventListener('load', function () {
        const map = window.volcanoMap;
        if (!map) return;

        const b = MAP_DATA.bounds;
        map.fitBounds(L.latLngBounds([b.min_lat, b.min_lon], [b.max_lat, b.max_lon]), { padding: [20, 20] });

        map.options.minZoom = MAP_DATA.view.min_zoom;
        map.options.maxZoom = MAP_DATA.view.max_zoom;
        map.setMinZoom(MAP_DATA.view.min_zoom);
        map.setMaxZoom(MAP_DATA.view.max_zoom);
    });
</script>
"#;

/// Country dropdown. Selecting a country toggles every overlay whose label
/// contains it, then recenters on the visible pin markers.
pub const COUNTRY_SEARCH_HTML: &str = r#"
<link href="https://cdn.jsdelivr.net/npm/select2@4.1.0-rc.0/dist/css/select2.min.css" rel="stylesheet" />
<script src="https://cdn.jsdelivr.net/npm/select2@4.1.0-rc.0/dist/js/select2.min.js"></script>

<div style="position: fixed; top: 70px; left: 60px; z-index: 9999; background: white; padding: 10px; border-radius: 8px;">
    <label for="layer-select">Select Country:</label>
    <select id="layer-select" style="width: 200px;">
        <option value="" disabled selected>-- Select Country --</option>
        <option value="__none__">-- None --</option>
{{COUNTRY_OPTIONS}}
    </select>
</div>

<script>
    window.addEventListener('load', function () {
        setTimeout(() => {
            const select = $('#layer-select');
            if (!select.length) {
                console.warn('Dropdown not found.');
                return;
            }

            select.select2();
            select.val('').trigger('change');

            select.on('change', function (e) {
                const selected = e.target.value;
                const inputs = [...document.querySelectorAll('.leaflet-control-layers-overlays input')];
                if (!inputs.length) {
                    console.warn('No layer checkboxes found!');
                    return;
                }

                inputs.forEach(input => {
                    const parent = input.parentElement;
                    if (!parent) return;
                    const label = parent.textContent.trim();

                    let wanted = false;
                    if (selected && selected !== '__none__') {
                        wanted = label.toLowerCase().includes(selected.toLowerCase());
                    }
                    if (input.checked !== wanted) {
                        input.click();
                    }
                });

                setTimeout(() => {
                    const map = window.volcanoMap;
                    if (!map) return;

                    const visible = [];
                    map.eachLayer(layer => {
                        if (layer instanceof L.Marker && map.hasLayer(layer)) {
                            visible.push(layer.getLatLng());
                        }
                    });
                    if (!visible.length) return;

                    const lat = visible.reduce((sum, p) => sum + p.lat, 0) / visible.length;
                    const lng = visible.reduce((sum, p) => sum + p.lng, 0) / visible.length;
                    map.setView([lat, lng], MAP_DATA.view.search_zoom);
                }, 200);
            });
        }, 500);
    });
</script>
"#;
