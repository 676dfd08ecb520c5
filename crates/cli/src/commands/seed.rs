//! Seed the collection from a feature file.
//!
//! The file format is the one the city's open-data export uses:
//!
//! ```json
//! {"features": [{"attributes": {"adresse": "Bonner Str. 98"}, "geometry": {"x": 6.96, "y": 50.92}}]}
//! ```
//!
//! Records are written straight into the store, bypassing the API.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use tankstellen_core::{Coordinates, StreetInput};
use tankstellen_server::db::StreetStore;

/// Sample data imported when no file is given.
const SAMPLE_FEATURES: &str = include_str!("../../data/streets.json");

#[derive(Debug, Deserialize)]
struct FeatureFile {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Attributes,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
struct Attributes {
    #[serde(default)]
    objectid: Option<i64>,
    #[serde(default)]
    adresse: String,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    x: f64,
    y: f64,
}

/// Outcome of parsing a feature file.
#[derive(Debug, Default)]
struct ParsedFeatures {
    streets: Vec<StreetInput>,
    /// Object ids (or positions) of features without an address.
    skipped: Vec<String>,
}

fn parse_features(content: &str) -> Result<ParsedFeatures, serde_json::Error> {
    let file: FeatureFile = serde_json::from_str(content)?;
    let mut parsed = ParsedFeatures::default();

    for (position, feature) in file.features.into_iter().enumerate() {
        let coordinates = feature.geometry.map(|g| Coordinates::new(g.x, g.y));
        match StreetInput::new(feature.attributes.adresse, coordinates) {
            Ok(street) => parsed.streets.push(street),
            Err(_) => parsed.skipped.push(
                feature
                    .attributes
                    .objectid
                    .map_or_else(|| format!("#{position}"), |id| id.to_string()),
            ),
        }
    }

    Ok(parsed)
}

/// Import a feature file (or the bundled sample data) into the collection.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, configuration is
/// invalid, or an insert fails.
pub async fn run(file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = match file {
        Some(path) => {
            if !path.exists() {
                return Err(format!("File not found: {}", path.display()).into());
            }
            info!(path = %path.display(), "Loading features from file");
            tokio::fs::read_to_string(path).await?
        }
        None => {
            info!("Loading bundled sample features");
            SAMPLE_FEATURES.to_owned()
        }
    };

    // Parse before connecting so a bad file never touches the database
    let parsed = parse_features(&content)?;
    info!(features = parsed.streets.len(), "Parsed feature file");

    let store = super::connect_store().await?;

    let mut inserted = 0_usize;
    for street in &parsed.streets {
        let id = store.insert(street).await?;
        tracing::debug!(street_id = %id, address = %street.address, "Inserted street");
        inserted += 1;
    }

    info!("Seeding complete!");
    info!("  Streets inserted: {inserted}");
    if !parsed.skipped.is_empty() {
        warn!("  Features skipped (no address): {}", parsed.skipped.len());
        for feature in &parsed.skipped {
            warn!("    - {feature}");
        }
    }

    Ok(())
}
