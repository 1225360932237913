use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{LoadError, SaveError},
    price::PriceLevel,
    restaurant::RestaurantResult,
    search::SearchRequest,
};

/// How a snapshot was produced.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub postal_code: String,
    pub radius_miles: f64,
    pub search_term: Option<String>,
    pub price_level: Option<PriceLevel>,
    pub total_count: usize,
    pub generated_at: DateTime<Utc>,
}

/// One run's results, nearest first, as written to disk.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ResultSnapshot {
    pub metadata: Metadata,
    pub restaurants: Vec<RestaurantResult>,
}

impl ResultSnapshot {
    pub fn new(request: &SearchRequest, restaurants: Vec<RestaurantResult>) -> Self {
        Self {
            metadata: Metadata {
                postal_code: request.postal_code().to_string(),
                radius_miles: request.radius_miles(),
                search_term: request.search_term().map(str::to_string),
                price_level: request.price_level(),
                total_count: restaurants.len(),
                generated_at: Utc::now(),
            },
            restaurants,
        }
    }

    /// The `n` nearest restaurants.
    pub fn top(&self, n: usize) -> &[RestaurantResult] {
        &self.restaurants[..n.min(self.restaurants.len())]
    }

    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file_contents = tokio::fs::read_to_string(path).await?;
        Ok(serde_json::from_str(file_contents.as_str())?)
    }

    /// Write the snapshot, replacing whatever is at `path`.
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveError> {
        let serialized = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, serialized).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::restaurant::Rating;
    use serde_json::{json, Value};
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn fake_restaurant(id: &str, distance_miles: f64) -> RestaurantResult {
        RestaurantResult {
            id: id.to_string(),
            name: format!("Restaurant {id}"),
            address: "123 Main St".to_string(),
            distance_miles,
            rating: Rating::Stars(4.4),
            review_count: 12,
            price_level_numeric: Some(2),
            price_level: "$$$".to_string(),
            categories: vec!["restaurant".to_string()],
        }
    }

    fn fake_snapshot() -> ResultSnapshot {
        let request = SearchRequest::builder()
            .postal_code("94107")
            .radius_miles(5.0)
            .price_level(Some(PriceLevel::new(2).unwrap()))
            .build()
            .unwrap();
        ResultSnapshot::new(
            &request,
            vec![fake_restaurant("a", 0.4), fake_restaurant("b", 1.25)],
        )
    }

    #[test]
    fn new_fills_metadata() {
        let snapshot = fake_snapshot();

        assert_eq!(snapshot.metadata.postal_code, "94107");
        assert_eq!(snapshot.metadata.radius_miles, 5.0);
        assert_eq!(snapshot.metadata.search_term, None);
        assert_eq!(snapshot.metadata.price_level, Some(PriceLevel::new(2).unwrap()));
        assert_eq!(snapshot.metadata.total_count, 2);
    }

    #[test]
    fn top_clamps_to_length() {
        let snapshot = fake_snapshot();

        assert_eq!(snapshot.top(1).len(), 1);
        assert_eq!(snapshot.top(5).len(), 2);
    }

    #[tokio::test]
    async fn save_writes_metadata_and_restaurants() {
        // Arrange
        let snapshot = fake_snapshot();
        let temp_file = NamedTempFile::new().unwrap();

        // Act
        let save_result = snapshot.save(temp_file.path()).await;

        // Assert
        assert!(
            save_result.is_ok(),
            "Failed to save snapshot: {:?}",
            save_result.unwrap_err()
        );
        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(temp_file.path()).unwrap()).unwrap();
        assert_eq!(written["metadata"]["postal_code"], json!("94107"));
        assert_eq!(written["metadata"]["price_level"], json!(2));
        assert_eq!(written["metadata"]["total_count"], json!(2));
        assert!(written["metadata"]["generated_at"].is_string());
        assert_eq!(written["restaurants"][1]["distance_miles"], json!(1.25));
        assert_eq!(written["restaurants"][0]["price_level"], json!("$$$"));
    }

    #[tokio::test]
    async fn save_and_load_successful() {
        // Arrange
        let snapshot = fake_snapshot();
        let temp_file = NamedTempFile::new().unwrap();

        // Act
        snapshot.save(temp_file.path()).await.unwrap();
        let loaded = ResultSnapshot::load(temp_file.path()).await;

        // Assert
        assert!(
            loaded.is_ok(),
            "Failed to load snapshot: {:?}",
            loaded.unwrap_err()
        );
        assert_eq!(loaded.unwrap(), snapshot);
    }

    #[tokio::test]
    async fn save_overwrites_previous_run() {
        // Arrange
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", "x".repeat(10_000)).unwrap();
        let snapshot = fake_snapshot();

        // Act
        snapshot.save(temp_file.path()).await.unwrap();

        // Assert
        let loaded = ResultSnapshot::load(temp_file.path()).await.unwrap();
        assert_eq!(loaded.restaurants.len(), 2);
    }

    #[tokio::test]
    async fn save_into_missing_directory() {
        // Arrange
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("results.json");

        // Act
        let save_result = fake_snapshot().save(&path).await;

        // Assert
        assert!(matches!(save_result.unwrap_err(), SaveError::WriteError(_)));
    }

    #[tokio::test]
    async fn load_invalid_file() {
        // Act
        let snapshot = ResultSnapshot::load("totally_nonexistent.json").await;

        // Assert
        assert!(matches!(snapshot.unwrap_err(), LoadError::ReadError(_)));
    }

    #[tokio::test]
    async fn load_bad_json() {
        // Arrange
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", json!({"not": "a snapshot"})).unwrap();

        // Act
        let snapshot = ResultSnapshot::load(temp_file.path()).await;

        // Assert
        assert!(matches!(snapshot.unwrap_err(), LoadError::ParseError(_)));
    }
}
