//! services/api/src/adapters/image_search.rs
//!
//! Image lookup by scraping a search engine's image results page.
//! It implements the `ImageSearchService` port from the `core` crate.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, warn};
use trip_planner_core::{
    domain::ImageRef,
    ports::{ImageSearchService, PortError, PortResult},
};

/// Among images nested in a `<div>`, the first is the engine's logo and the second
/// is the top hit.
const RESULT_IMAGE_INDEX: usize = 1;

/// Scrapes `?q=<query>&tbm=isch` result pages for a thumbnail per query.
#[derive(Clone)]
pub struct ScrapedImageSearch {
    http: Client,
    base_url: String,
    tags: Regex,
}

impl ScrapedImageSearch {
    pub fn new(http: Client, base_url: String) -> Result<Self, regex::Error> {
        Ok(Self {
            http,
            base_url,
            tags: Regex::new(
                r#"(?i)<(?P<close>/?)div\b[^>]*>|<img\b[^>]*?\ssrc\s*=\s*"(?P<src>[^"]+)""#,
            )?,
        })
    }

    /// Picks the top result thumbnail out of a results page.
    pub fn extract_image(&self, html: &str) -> Option<ImageRef> {
        let mut div_depth = 0usize;
        let mut nested = Vec::new();
        for caps in self.tags.captures_iter(html) {
            if let Some(src) = caps.name("src") {
                if div_depth > 0 {
                    nested.push(src.as_str());
                }
            } else if caps.name("close").is_some_and(|c| !c.as_str().is_empty()) {
                div_depth = div_depth.saturating_sub(1);
            } else {
                div_depth += 1;
            }
        }

        nested.get(RESULT_IMAGE_INDEX).map(|src| ImageRef {
            url: src.replace("&amp;", "&"),
        })
    }

    async fn search_one(&self, query: &str) -> PortResult<Option<ImageRef>> {
        let html = self
            .http
            .get(&self.base_url)
            .query(&[("q", query), ("tbm", "isch")])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .text()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(self.extract_image(&html))
    }
}

#[async_trait]
impl ImageSearchService for ScrapedImageSearch {
    async fn search_images(&self, queries: &[String]) -> PortResult<HashMap<String, ImageRef>> {
        let mut images = HashMap::with_capacity(queries.len());
        for query in queries {
            match self.search_one(query).await {
                Ok(Some(image)) => {
                    images.insert(query.clone(), image);
                }
                Ok(None) => debug!("No image result for '{}'", query),
                Err(e) => warn!("Image search for '{}' failed: {}", query, e),
            }
        }
        Ok(images)
    }
}
