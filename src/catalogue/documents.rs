use std::collections::{BTreeMap, HashMap};

use geo::Polygon;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    errors::{MatchupError, Result},
    intersection::{covers, polygon_from_points},
};

/// Asset name to href.
pub type Assets = BTreeMap<String, String>;

#[derive(Debug, Deserialize)]
struct Link {
    rel: String,
    #[serde(default)]
    title: Option<String>,
    href: String,
}

#[derive(Debug, Deserialize)]
struct NodeDocument {
    #[serde(default)]
    links: Vec<Link>,
}

/// One level of the catalogue tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueNode {
    pub children: HashMap<String, String>,
    pub items: HashMap<String, String>,
}

/// `href` made absolute against the document it appeared in.
fn resolve(base: &str, href: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

impl CatalogueNode {
    pub fn parse(url: &str, json: &str) -> Result<Self> {
        let document: NodeDocument = serde_json::from_str(json)?;
        let mut node = CatalogueNode::default();
        for Link { rel, title, href } in document.links {
            let Some(title) = title else { continue };
            let links = match rel.as_str() {
                "child" => &mut node.children,
                "item" => &mut node.items,
                _ => continue,
            };
            links.insert(title, resolve(url, &href));
        }
        Ok(node)
    }

    pub fn child(&self, title: &str) -> Option<&str> {
        self.children.get(title).map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Coordinates {
    MultiPolygon(Vec<Vec<Vec<Vec<f64>>>>),
    Polygon(Vec<Vec<Vec<f64>>>),
}

#[derive(Debug, Deserialize)]
struct ItemGeometry {
    coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct Asset {
    href: String,
}

#[derive(Debug, Deserialize)]
struct ItemDocument {
    geometry: ItemGeometry,
    #[serde(default)]
    assets: BTreeMap<String, Asset>,
}

/// Catalogue item: footprint and asset manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub footprint: Polygon,
    pub assets: Assets,
}

impl Item {
    /// Footprint is the exterior ring of the first polygon.
    pub fn parse(url: &str, json: &str) -> Result<Self> {
        let document: ItemDocument = serde_json::from_str(json)?;
        let ring = match document.geometry.coordinates {
            Coordinates::MultiPolygon(polygons) => polygons.into_iter().next().unwrap_or_default(),
            Coordinates::Polygon(rings) => rings,
        }
        .into_iter()
        .next()
        .unwrap_or_default();
        let points = ring
            .into_iter()
            .map(|position| match position[..] {
                [lon, lat, ..] => Ok([lon, lat]),
                _ => Err(MatchupError::InvalidFootprint(format!(
                    "position {position:?} of {url}"
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        let assets = document
            .assets
            .into_iter()
            .map(|(name, asset)| (name, resolve(url, &asset.href)))
            .collect();
        Ok(Self {
            footprint: polygon_from_points(&points)?,
            assets,
        })
    }

    pub fn covers_region(&self, region: &Polygon) -> bool {
        covers(&self.footprint, region)
    }
}
