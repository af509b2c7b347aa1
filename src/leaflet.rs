use crate::html::{COUNTRY_SEARCH_HTML, FIT_BOUNDS_SCRIPT, MAP_SCRIPT, PAGE_HTML};
use crate::render::{escape_html, MapDocument, MapRenderer};
use anyhow::{Context, Result};

/// Self-contained Leaflet page with marker clustering, a layer control and a
/// Select2 country search.
#[derive(Debug, Default, Clone, Copy)]
pub struct LeafletRenderer;

impl MapRenderer for LeafletRenderer {
    fn render(&self, document: &MapDocument) -> Result<String> {
        let data = script_safe_json(document)?;
        let map_script = fill(MAP_SCRIPT, &[("MAP_DATA", data.as_str())]);

        let options = document
            .country_names
            .iter()
            .map(|name| {
                let name = escape_html(name);
                format!("        <option value=\"{name}\">{name}</option>")
            })
            .collect::<Vec<_>>()
            .join("\n");

        let controls = format!(
            "{}{}",
            FIT_BOUNDS_SCRIPT,
            fill(COUNTRY_SEARCH_HTML, &[("COUNTRY_OPTIONS", options.as_str())])
        );

        let title = escape_html(&document.title);
        Ok(fill(
            PAGE_HTML,
            &[
                ("TITLE", title.as_str()),
                ("MAP_SCRIPT", map_script.as_str()),
                ("CONTROLS", controls.as_str()),
            ],
        ))
    }
}

/// Substitutes `{{KEY}}` placeholders in a single pass. Inserted values are
/// never rescanned, so record text cannot inject a placeholder.
fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let hit = after.find("}}").and_then(|end| {
            values
                .iter()
                .find(|(key, _)| *key == &after[..end])
                .map(|(_, value)| (end, *value))
        });
        match hit {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// JSON that can sit inside a `<script>` element. `<` only ever occurs inside
/// string literals, where `\u003c` is an equivalent escape.
fn script_safe_json(document: &MapDocument) -> Result<String> {
    let json = serde_json::to_string(document).context("Failed to serialize map document")?;
    Ok(json.replace('<', "\\u003c"))
}
