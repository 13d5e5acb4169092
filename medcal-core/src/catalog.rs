//! Static clinic-location catalog.
//!
//! Loaded once from a JSON file shaped like
//! `{ "<clinic key>": { "cityname": ..., "address": ..., "geocode": { "geo": [lat, lon] } } }`.
//! A key may map to `null` when only the clinic name is known.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{MedcalError, MedcalResult};

/// Latitude/longitude pair for a clinic.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geocode {
    pub geo: [f64; 2],
}

/// Location metadata for one catalog key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub cityname: String,
    pub address: String,
    #[serde(default)]
    pub geocode: Option<Geocode>,
}

/// Mapping from canonical clinic key to location metadata.
///
/// Entries keep the order of the source document. The resolver's tie-break
/// selects the later of two equally scored entries, so iteration order is
/// part of the contract.
#[derive(Debug, Clone, Default)]
pub struct LocationCatalog {
    entries: IndexMap<String, Option<LocationRecord>>,
}

impl LocationCatalog {
    /// Read the catalog file. One read, immutable afterwards.
    pub fn load(path: &Path) -> MedcalResult<Self> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| MedcalError::CatalogLoad(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&data)
            .map_err(|e| MedcalError::CatalogLoad(format!("{}: {}", path.display(), e)))
    }

    /// Parse a catalog from raw JSON.
    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        let entries = serde_json::from_str(data)?;
        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate entries in source-document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&LocationRecord>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn get(&self, key: &str) -> Option<&LocationRecord> {
        self.entries.get(key).and_then(|v| v.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_records_and_null_entries() {
        let catalog = LocationCatalog::from_json(
            r#"{
                "Warszawa Atrium": {
                    "cityname": "Warszawa",
                    "address": "al. Jana Pawła II 27",
                    "geocode": { "geo": [52.2358, 20.9997] }
                },
                "Gdańsk Alchemia": null
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        let record = catalog.get("Warszawa Atrium").unwrap();
        assert_eq!(record.cityname, "Warszawa");
        assert_eq!(record.geocode.as_ref().unwrap().geo, [52.2358, 20.9997]);
        assert!(catalog.get("Gdańsk Alchemia").is_none());
    }

    #[test]
    fn test_missing_geocode_defaults_to_none() {
        let catalog = LocationCatalog::from_json(
            r#"{ "Kraków Podgórska": { "cityname": "Kraków", "address": "Podgórska 36" } }"#,
        )
        .unwrap();

        assert!(catalog.get("Kraków Podgórska").unwrap().geocode.is_none());
    }

    #[test]
    fn test_iteration_keeps_document_order() {
        let catalog = LocationCatalog::from_json(
            r#"{ "Zebra": null, "Alfa": null, "Mango": null }"#,
        )
        .unwrap();

        let keys: Vec<&str> = catalog.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["Zebra", "Alfa", "Mango"]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(LocationCatalog::from_json("{ not json").is_err());
    }

    #[test]
    fn test_load_missing_file_is_catalog_load_error() {
        let err = LocationCatalog::load(Path::new("/nonexistent/locations.json")).unwrap_err();
        assert!(matches!(err, MedcalError::CatalogLoad(_)));
    }
}
