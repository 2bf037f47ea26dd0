//! Read-only traversal of a satellite product catalogue.
//!
//! The catalogue is a tree of JSON documents linked by title: root, product
//! type, year, zero padded month, zero padded day, then items carrying a
//! footprint and their asset manifest.

mod documents;
mod source;

pub use documents::{Assets, CatalogueNode, Item};
pub use source::{DocumentSource, HttpSource};

use chrono::{Datelike, NaiveDate};
use geo::Polygon;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{errors::Result, intersection::polygon_from_wkt};

/// Root of the Sentinel-5P offline cloud optimized products.
pub const OFFL_CATALOGUE_URL: &str = "https://meeo-s5p.s3.amazonaws.com/COGT/OFFL/catalog.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    pub root_url: String,
    pub user_agent: String,
    /// No timeout besides the HTTP client's own when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self {
            root_url: OFFL_CATALOGUE_URL.to_string(),
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: None,
        }
    }
}

impl CatalogueConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

pub struct CatalogueClient<S: DocumentSource = HttpSource> {
    config: CatalogueConfig,
    source: S,
}

impl CatalogueClient {
    pub fn new(config: CatalogueConfig) -> Result<Self> {
        let source = HttpSource::new(&config)?;
        Ok(Self { config, source })
    }
}

impl<S: DocumentSource> CatalogueClient<S> {
    pub fn with_source(config: CatalogueConfig, source: S) -> Self {
        Self { config, source }
    }

    pub fn config(&self) -> &CatalogueConfig {
        &self.config
    }

    pub fn node(&self, url: &str) -> Result<CatalogueNode> {
        CatalogueNode::parse(url, &self.source.fetch(url)?)
    }

    pub fn root(&self) -> Result<CatalogueNode> {
        self.node(&self.config.root_url)
    }

    /// Child node titled `title`, `None` if the node has no such child.
    pub fn child(&self, node: &CatalogueNode, title: &str) -> Result<Option<CatalogueNode>> {
        match node.child(title) {
            Some(url) => self.node(url).map(Some),
            None => {
                debug!("no child {title:?}");
                Ok(None)
            }
        }
    }

    pub fn item(&self, url: &str) -> Result<Item> {
        Item::parse(url, &self.source.fetch(url)?)
    }

    /// Day node for `date`, walking year, month then day from `product`.
    fn day(&self, product: &CatalogueNode, date: NaiveDate) -> Result<Option<CatalogueNode>> {
        let Some(year) = self.child(product, &date.year().to_string())? else {
            return Ok(None);
        };
        let Some(month) = self.child(&year, &format!("{:02}", date.month()))? else {
            return Ok(None);
        };
        self.child(&month, &format!("{:02}", date.day()))
    }

    /// Asset manifests, keyed by item title, of the `product_type` items
    /// from `start` up to but excluding `end` whose footprint contains
    /// `region_wkt`.
    pub fn get_products(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        product_type: &str,
        region_wkt: &str,
    ) -> Result<BTreeMap<String, Assets>> {
        let region = polygon_from_wkt(region_wkt)?;
        let mut products = BTreeMap::new();
        let Some(product) = self.child(&self.root()?, product_type)? else {
            return Ok(products);
        };
        for date in start.iter_days().take_while(|date| *date < end) {
            let Some(day) = self.day(&product, date)? else {
                continue;
            };
            products.extend(self.covering_items(&day, &region)?);
        }
        info!(
            "{} {product_type} products between {start} and {end}",
            products.len()
        );
        Ok(products)
    }

    fn covering_items(
        &self,
        day: &CatalogueNode,
        region: &Polygon,
    ) -> Result<Vec<(String, Assets)>> {
        let mut items = Vec::new();
        for (title, url) in day.items.iter() {
            let item = self.item(url)?;
            if item.covers_region(region) {
                items.push((title.clone(), item.assets));
            } else {
                debug!("{title} does not cover region");
            }
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::MatchupError, intersection::tests::VIENNA_WKT};
    use serde_json::json;
    use std::{cell::RefCell, collections::HashMap};

    /// In-memory documents, remembering every fetched url.
    #[derive(Default)]
    struct StubSource {
        documents: HashMap<String, String>,
        fetched: RefCell<Vec<String>>,
    }

    impl StubSource {
        fn insert(&mut self, url: &str, document: serde_json::Value) {
            self.documents.insert(url.to_string(), document.to_string());
        }
    }

    impl DocumentSource for StubSource {
        fn fetch(&self, url: &str) -> Result<String> {
            self.fetched.borrow_mut().push(url.to_string());
            self.documents.get(url).cloned().ok_or_else(|| {
                MatchupError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    url.to_string(),
                ))
            })
        }
    }

    const PRODUCT: &str = "Sulphur Dioxide (SO2) total column";

    fn child(title: &str, href: &str) -> serde_json::Value {
        json!({"rel": "child", "title": title, "href": href})
    }

    fn stub_tree() -> StubSource {
        let mut source = StubSource::default();
        source.insert(
            "https://stub/catalog.json",
            json!({"links": [
                {"rel": "self", "href": "https://stub/catalog.json"},
                child(PRODUCT, "so2/catalog.json"),
            ]}),
        );
        source.insert(
            "https://stub/so2/catalog.json",
            json!({"links": [child("2020", "2020/catalog.json")]}),
        );
        source.insert(
            "https://stub/so2/2020/catalog.json",
            json!({"links": [child("01", "01/catalog.json")]}),
        );
        source.insert(
            "https://stub/so2/2020/01/catalog.json",
            json!({"links": [child("15", "15/catalog.json")]}),
        );
        source.insert(
            "https://stub/so2/2020/01/15/catalog.json",
            json!({"links": [{
                "rel": "item",
                "title": "S5P_OFFL_SO2_0115",
                "href": "items/S5P_OFFL_SO2_0115.json"
            }]}),
        );
        source.insert(
            "https://stub/so2/2020/01/15/items/S5P_OFFL_SO2_0115.json",
            json!({
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[10, 45], [20, 45], [20, 52], [10, 52], [10, 45]]]]},
                "assets": {"so2": {"href": "https://stub/data/so2.tif"}}
            }),
        );
        source
    }

    fn client(source: StubSource) -> CatalogueClient<StubSource> {
        let config = CatalogueConfig {
            root_url: "https://stub/catalog.json".to_string(),
            ..Default::default()
        };
        CatalogueClient::with_source(config, source)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test_log::test]
    fn finds_items_covering_region() {
        let client = client(stub_tree());
        let products = client
            .get_products(date(2020, 1, 1), date(2020, 2, 1), PRODUCT, VIENNA_WKT)
            .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(
            products["S5P_OFFL_SO2_0115"]["so2"],
            "https://stub/data/so2.tif"
        );
    }

    #[test]
    fn skips_items_not_covering_region() {
        let client = client(stub_tree());
        let paris = "POLYGON ((2.2 48.8, 2.5 48.8, 2.5 48.9, 2.2 48.9, 2.2 48.8))";
        let products = client
            .get_products(date(2020, 1, 1), date(2020, 2, 1), PRODUCT, paris)
            .unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn end_date_is_exclusive() {
        let client = client(stub_tree());
        let products = client
            .get_products(date(2020, 1, 10), date(2020, 1, 15), PRODUCT, VIENNA_WKT)
            .unwrap();
        assert!(products.is_empty());
        assert!(!client
            .source
            .fetched
            .borrow()
            .iter()
            .any(|url| url.contains("/01/15/")));
    }

    #[test]
    fn missing_periods_and_products_are_skipped() {
        let client = client(stub_tree());
        let products = client
            .get_products(date(2019, 12, 30), date(2020, 1, 3), PRODUCT, VIENNA_WKT)
            .unwrap();
        assert!(products.is_empty());
        let products = client
            .get_products(date(2020, 1, 1), date(2020, 2, 1), "Ozone", VIENNA_WKT)
            .unwrap();
        assert!(products.is_empty());
    }

    #[test]
    fn fetch_failures_propagate() {
        let mut source = stub_tree();
        source
            .documents
            .remove("https://stub/so2/2020/01/15/items/S5P_OFFL_SO2_0115.json");
        let client = client(source);
        let result = client.get_products(date(2020, 1, 15), date(2020, 1, 16), PRODUCT, VIENNA_WKT);
        assert!(matches!(result, Err(MatchupError::IoError(_))));
    }

    #[test]
    fn config_defaults_to_offl_root() {
        let config = CatalogueConfig::from_json(r#"{"timeout_secs": 30}"#).unwrap();
        assert_eq!(config.root_url, OFFL_CATALOGUE_URL);
        assert_eq!(config.timeout_secs, Some(30));
        assert!(config.user_agent.starts_with("geomatchup/"));
    }
}
