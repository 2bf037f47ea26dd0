use std::{collections::BTreeMap, fmt::Display};

/// Key of a raster inside a [crate::RasterCollection].
///
/// Bands added without names are keyed by [RasterKey::Index].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
#[serde(untagged)]
pub enum RasterKey {
    Index(usize),
    Name(String),
}

impl Display for RasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterKey::Index(index) => write!(f, "{index}"),
            RasterKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<usize> for RasterKey {
    fn from(value: usize) -> Self {
        RasterKey::Index(value)
    }
}

impl From<&str> for RasterKey {
    fn from(value: &str) -> Self {
        RasterKey::Name(value.to_string())
    }
}

impl From<String> for RasterKey {
    fn from(value: String) -> Self {
        RasterKey::Name(value)
    }
}

/// Band index (counting from 1) to the key it is stored under.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IndexMap(BTreeMap<usize, RasterKey>);

impl<K: Into<RasterKey>, const N: usize> From<[(usize, K); N]> for IndexMap {
    fn from(value: [(usize, K); N]) -> Self {
        value.into_iter().collect()
    }
}

impl<K: Into<RasterKey>> FromIterator<(usize, K)> for IndexMap {
    fn from_iter<I: IntoIterator<Item = (usize, K)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(index, key)| (index, key.into()))
                .collect(),
        )
    }
}

impl IndexMap {
    /// Every band of a source with `band_count` bands, keyed by index
    /// continuing from `first`.
    pub fn sequential(band_count: usize, first: usize) -> Self {
        (1..=band_count)
            .map(|band| (band, RasterKey::Index(first + band - 1)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&usize, &RasterKey)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
