//! Shared plumbing for the `ff-find` and `foodcli` binaries.

use std::{
    io::{self, Write},
    path::Path,
    process::ExitCode,
};

use ff_places::{
    constants::DIGEST_SIZE, PriceLevel, RestaurantResult, ResultSnapshot, SearchRequest,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RULE_WIDTH: usize = 80;

/// Log to stderr, filtered by `RUST_LOG` or else `default_level`.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Parse a `--price-level` argument. An invalid value is logged and means no
/// price filter.
pub fn price_level_or_any(raw: &str) -> Option<PriceLevel> {
    match raw.parse::<PriceLevel>() {
        Ok(level) => {
            info!(%level, "using price level (0-4 scale)");
            Some(level)
        }
        Err(e) => {
            warn!(input = raw, error = %e, "ignoring price level, showing all price levels");
            None
        }
    }
}

/// Human-readable summary of the `size` nearest restaurants.
pub fn digest(snapshot: &ResultSnapshot, size: usize) -> String {
    let shown = snapshot.top(size);
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = format!(
        "Showing {} of {} restaurants found:\n{rule}\n",
        shown.len(),
        snapshot.restaurants.len()
    );
    for (i, restaurant) in shown.iter().enumerate() {
        out.push_str(&format!("{}. {restaurant}\n{rule}\n", i + 1));
    }
    out
}

/// How an `ff-find` run ended after the search.
#[derive(Debug, PartialEq, Eq)]
pub enum FindStatus {
    NothingFound,
    Exported,
    /// Results were found and shown but the file could not be written.
    ExportFailed,
}

impl FindStatus {
    /// Only an empty result is a failure.
    pub fn is_success(&self) -> bool {
        *self != FindStatus::NothingFound
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Export `restaurants` to `output` and write the digest to `out`.
pub async fn report_results<W: Write>(
    request: &SearchRequest,
    restaurants: Vec<RestaurantResult>,
    output: &Path,
    out: &mut W,
) -> io::Result<FindStatus> {
    if restaurants.is_empty() {
        return Ok(FindStatus::NothingFound);
    }
    writeln!(out, "Found {} open restaurants.", restaurants.len())?;

    let snapshot = ResultSnapshot::new(request, restaurants);
    let status = match snapshot.save(output).await {
        Ok(()) => {
            info!(path = %output.display(), "exported results");
            FindStatus::Exported
        }
        Err(e) => {
            warn!(path = %output.display(), error = %e, "could not export results");
            FindStatus::ExportFailed
        }
    };
    write!(out, "\n{}", digest(&snapshot, DIGEST_SIZE))?;
    if status == FindStatus::Exported {
        writeln!(out, "Full results available in {}", output.display())?;
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff_places::Rating;

    fn restaurant(name: &str, distance_miles: f64) -> RestaurantResult {
        RestaurantResult {
            id: name.to_lowercase(),
            name: name.to_string(),
            address: "1 Market St".to_string(),
            distance_miles,
            rating: Rating::Stars(4.5),
            review_count: 3,
            price_level_numeric: None,
            price_level: "not available".to_string(),
            categories: vec!["restaurant".to_string()],
        }
    }

    #[test]
    fn digest_numbers_the_nearest() {
        // Arrange
        let request = SearchRequest::builder()
            .postal_code("94107")
            .radius_miles(2.0)
            .build()
            .unwrap();
        let snapshot = ResultSnapshot::new(
            &request,
            vec![
                restaurant("Alpha", 0.1),
                restaurant("Bravo", 0.2),
                restaurant("Charlie", 0.3),
            ],
        );

        // Act
        let digest = digest(&snapshot, 2);

        // Assert
        assert!(digest.starts_with("Showing 2 of 3 restaurants found:"));
        assert!(digest.contains("1. Alpha\n"));
        assert!(digest.contains("2. Bravo\n"));
        assert!(!digest.contains("Charlie"));
        assert!(digest.contains("Rating: 4.5/5.0 (3 reviews)"));
    }

    #[test]
    fn bad_price_level_means_any() {
        assert_eq!(price_level_or_any("$$$").map(PriceLevel::get), Some(2));
        assert_eq!(price_level_or_any("4").map(PriceLevel::get), Some(4));
        assert_eq!(price_level_or_any("$$$$$$"), None);
        assert_eq!(price_level_or_any("-1"), None);
        assert_eq!(price_level_or_any("cheap"), None);
    }

    fn request() -> SearchRequest {
        SearchRequest::builder()
            .postal_code("94107")
            .radius_miles(2.0)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn nothing_found_fails_without_exporting() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.json");
        let mut out = Vec::new();

        // Act
        let status = report_results(&request(), Vec::new(), &output, &mut out)
            .await
            .unwrap();

        // Assert
        assert_eq!(status, FindStatus::NothingFound);
        assert!(!status.is_success());
        assert!(!output.exists());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn exported_results_point_at_the_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("results.json");
        let mut out = Vec::new();

        // Act
        let status = report_results(&request(), vec![restaurant("Alpha", 0.1)], &output, &mut out)
            .await
            .unwrap();

        // Assert
        assert_eq!(status, FindStatus::Exported);
        assert!(status.is_success());
        let saved = ResultSnapshot::load(&output).await.unwrap();
        assert_eq!(saved.restaurants.len(), 1);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.starts_with("Found 1 open restaurants."));
        assert!(printed.contains("1. Alpha\n"));
        assert!(printed.contains(&format!("Full results available in {}", output.display())));
    }

    #[tokio::test]
    async fn export_failure_still_succeeds() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing-dir").join("results.json");
        let mut out = Vec::new();

        // Act
        let status = report_results(&request(), vec![restaurant("Alpha", 0.1)], &output, &mut out)
            .await
            .unwrap();

        // Assert
        assert_eq!(status, FindStatus::ExportFailed);
        assert!(status.is_success());
        assert!(!output.exists());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("1. Alpha\n"));
        assert!(!printed.contains("Full results available"));
    }
}
