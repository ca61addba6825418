use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{LaptopId, LaptopRecord, RawLaptop},
};

/// Immutable set of laptops available for recommendation
///
/// Records keep the order they were supplied in; that order is the final
/// tie-breaker when ranking.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    records: Vec<LaptopRecord>,
    index: HashMap<LaptopId, usize>,
}

impl CatalogStore {
    /// Builds a catalog, rejecting duplicate identifiers
    pub fn new(records: Vec<LaptopRecord>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "duplicate laptop id {}",
                    record.id
                )));
            }
        }

        tracing::info!(records = records.len(), "Catalog loaded");

        Ok(Self { records, index })
    }

    /// Parses a catalog from its JSON file format (an array of raw laptops)
    pub fn from_json(json: &str) -> AppResult<Self> {
        let raw: Vec<RawLaptop> = serde_json::from_str(json)?;
        Self::new(raw.into_iter().map(LaptopRecord::from).collect())
    }

    /// Reads and parses a JSON catalog file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading catalog file");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn records(&self) -> &[LaptopRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &LaptopId) -> Option<&LaptopRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    pub fn contains(&self, id: &LaptopId) -> bool {
        self.index.contains_key(id)
    }

    /// Looks up a record for a details view
    pub fn details(&self, id: &LaptopId) -> AppResult<&LaptopRecord> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound(format!("laptop {}", id)))
    }

    /// Distinct brands, sorted, for populating a brand filter
    pub fn brands(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.brand.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<LaptopRecord> {
        vec![
            LaptopRecord::new("1", "MacBook Pro 14\"", "Apple", 1999.0),
            LaptopRecord::new("2", "Dell XPS 15", "Dell", 1799.0),
            LaptopRecord::new("3", "XPS 13", "Dell", 1199.0),
        ]
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = CatalogStore::new(sample()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(&LaptopId::from("2")).unwrap().name, "Dell XPS 15");
        assert!(catalog.get(&LaptopId::from("99")).is_none());
        assert!(catalog.contains(&LaptopId::from("3")));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut records = sample();
        records.push(LaptopRecord::new("2", "Another", "HP", 999.0));
        let result = CatalogStore::new(records);
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_empty_catalog_is_valid() {
        let catalog = CatalogStore::new(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.brands().is_empty());
    }

    #[test]
    fn test_details_not_found() {
        let catalog = CatalogStore::new(sample()).unwrap();
        let result = catalog.details(&LaptopId::from("404"));
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_brands_are_distinct_and_sorted() {
        let catalog = CatalogStore::new(sample()).unwrap();
        assert_eq!(catalog.brands(), vec!["Apple".to_string(), "Dell".to_string()]);
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": "5", "name": "ASUS ROG Zephyrus G14", "brand": "ASUS",
              "processor": "AMD Ryzen 9 5900HS", "ram": "32GB", "storage": "1TB SSD",
              "display": "14\" QHD 120Hz", "price": 1799, "rating": 4.7 }
        ]"#;
        let catalog = CatalogStore::from_json(json).unwrap();
        let record = catalog.get(&LaptopId::from("5")).unwrap();
        assert_eq!(record.specs.memory_gb, Some(32));
        assert_eq!(record.rating, Some(4.7));
    }

    #[test]
    fn test_from_invalid_json() {
        let result = CatalogStore::from_json("{ \"not\": \"a list\" }");
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
