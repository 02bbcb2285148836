use reqwest::Client;
use tracing::info;

use crate::{error::GenerateError, outfile::OutFile, page, Restaurants};

/// Fetch the restaurants and write their map page to `outfile`.
///
/// The outfile is checked before the feed is requested, so a conflict costs no
/// network call. Returns the number of restaurants on the page.
pub async fn generate(
    client: &Client,
    api_key: &str,
    feed_endpoint: Option<&str>,
    outfile: &OutFile,
) -> Result<usize, GenerateError> {
    outfile.check().await?;
    let restaurants = Restaurants::get_custom(client, feed_endpoint).await?;
    let mut html = Vec::new();
    page::render(&mut html, api_key, restaurants.as_ref())?;
    outfile.write(&html).await?;
    info!(
        path = %outfile.path().display(),
        restaurants = restaurants.len(),
        bytes = html.len(),
        "wrote map page"
    );
    Ok(restaurants.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GetError, OutFileError};
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::{tempdir, NamedTempFile};

    const FAKE_API_KEY: &str = "fake-api-key";

    fn feed() -> serde_json::Value {
        json!({
            "data": [
                {
                    "gridItems": [
                        {
                            "id": "1001",
                            "displayTitle": "Trattoria",
                            "latitude": 40.74,
                            "longitude": -73.99,
                            "summary": "Handmade pasta.",
                            "website": "https://trattoria.example",
                            "lookupInfo": [{ "lookupName": "cuisine", "ids": "1" }]
                        },
                        {
                            "id": "1002",
                            "displayTitle": "Bistro",
                            "latitude": 40.72,
                            "longitude": -73.95,
                            "summary": "Steak frites.",
                            "website": "",
                            "lookupInfo": []
                        }
                    ]
                }
            ],
            "lookup": {
                "cuisine": [{ "id": "1", "name": "Italian" }]
            }
        })
    }

    #[tokio::test]
    async fn generate_success() {
        // Arrange
        let server = MockServer::start_async().await;
        let feed_mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/");
                then.status(200).json_body(feed());
            })
            .await;
        let url = server.url("/");
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.html");
        let outfile = OutFile::new(&path, false);
        let client = crate::util::default_http_client().unwrap();

        // Act
        let count = generate(&client, FAKE_API_KEY, Some(url.as_str()), &outfile).await;

        // Assert
        assert!(count.is_ok(), "Failed to generate: {:?}", count.unwrap_err());
        assert_eq!(count.unwrap(), 2);
        let html = std::fs::read_to_string(&path).unwrap();
        assert_eq!(html.matches("placeMarker({").count(), 2);
        assert!(html.contains(r#""cuisine":"Italian""#));
        assert!(html.contains("key=fake-api-key"));
        feed_mock.assert();
    }

    #[tokio::test]
    async fn generate_conflict_skips_fetch() {
        // Arrange
        let server = MockServer::start_async().await;
        let feed_mock = server
            .mock_async(|when, then| {
                when.path("/");
                then.status(200).json_body(feed());
            })
            .await;
        let url = server.url("/");
        let existing = NamedTempFile::new().unwrap();
        let outfile = OutFile::new(existing.path(), false);
        let client = reqwest::Client::new();

        // Act
        let result = generate(&client, FAKE_API_KEY, Some(url.as_str()), &outfile).await;

        // Assert
        assert!(matches!(
            result,
            Err(GenerateError::OutFile(OutFileError::AlreadyExists(_)))
        ));
        assert_eq!(feed_mock.hits(), 0);
    }

    #[tokio::test]
    async fn generate_empty_feed_writes_nothing() {
        // Arrange
        let server = MockServer::start_async().await;
        let feed_mock = server
            .mock_async(|when, then| {
                when.path("/");
                then.status(200).json_body(json!({ "data": [] }));
            })
            .await;
        let url = server.url("/");
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.html");
        let outfile = OutFile::new(&path, false);
        let client = reqwest::Client::new();

        // Act
        let result = generate(&client, FAKE_API_KEY, Some(url.as_str()), &outfile).await;

        // Assert
        assert!(matches!(
            result,
            Err(GenerateError::Get(GetError::EmptyFeed))
        ));
        assert!(!path.exists());
        feed_mock.assert();
    }

    #[tokio::test]
    async fn generate_overwrites_existing_page() {
        // Arrange
        let server = MockServer::start_async().await;
        let feed_mock = server
            .mock_async(|when, then| {
                when.path("/");
                then.status(200).json_body(feed());
            })
            .await;
        let url = server.url("/");
        let existing = NamedTempFile::new().unwrap();
        std::fs::write(existing.path(), "old page").unwrap();
        let outfile = OutFile::new(existing.path(), true);
        let client = reqwest::Client::new();

        // Act
        let result = generate(&client, FAKE_API_KEY, Some(url.as_str()), &outfile).await;

        // Assert
        assert!(result.is_ok(), "Failed to generate: {:?}", result.unwrap_err());
        let html = std::fs::read_to_string(existing.path()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        feed_mock.assert();
    }
}
