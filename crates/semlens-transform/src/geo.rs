//! Geographic (point map) view.

use serde::Serialize;

use semlens_model::{ColumnMapping, DataSource, roles};

use crate::extract::{RoleColumn, optional_number, optional_text};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Points from latitude/longitude. A coordinate of exactly `0` is treated as
/// missing, as are non-numeric and out-of-range values.
pub fn to_geographic(source: &DataSource, mappings: &[ColumnMapping]) -> Vec<GeoPoint> {
    let (Some(latitude), Some(longitude)) = (
        RoleColumn::resolve(source, mappings, roles::LATITUDE),
        RoleColumn::resolve(source, mappings, roles::LONGITUDE),
    ) else {
        tracing::debug!("geographic transform skipped: latitude/longitude is not mapped");
        return Vec::new();
    };
    let name = RoleColumn::resolve(source, mappings, roles::LOCATION_NAME);
    let value = RoleColumn::resolve(source, mappings, roles::VALUE);
    let category = RoleColumn::resolve(source, mappings, roles::CATEGORY);

    source
        .parsed_data
        .iter()
        .filter_map(|row| {
            let lat = latitude.number(row);
            let lon = longitude.number(row);
            if !valid_coordinate(lat, 90.0) || !valid_coordinate(lon, 180.0) {
                return None;
            }
            Some(GeoPoint {
                latitude: lat,
                longitude: lon,
                label: optional_text(name, row),
                value: optional_number(value, row),
                category: optional_text(category, row),
            })
        })
        .collect()
}

fn valid_coordinate(value: f64, limit: f64) -> bool {
    value.is_finite() && value != 0.0 && value.abs() <= limit
}
