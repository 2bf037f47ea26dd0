use gdal::{Dataset as GdalDataset, Metadata as GdalMetadata};
use geo::Polygon;
use log::info;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    components::{engines::gdal_engine::filter_metadata_gdal, Metadata, RasterCollection},
    errors::{MatchupError, Result},
    indexes::{IndexMap, RasterKey},
    intersection::{covers, polygon_from_points, polygon_from_wkt},
};

/// Metadata item holding the footprint as `lat lon lat lon ...`.
pub const FOOTPRINT_KEY: &str = "/METADATA/EOP_METADATA/om:featureOfInterest/eop:multiExtentOf/gml:surfaceMembers/gml:exterior/NC_GLOBAL#gml:posList";

pub const STANDARD_BANDS: [&str; 1] = ["qa_value"];

pub const PRODUCT_TYPES: [&str; 13] = [
    "L2__CLOUD_",
    "L2__AER_AI",
    "L2__AER_LH",
    "L2__SO2___",
    "L2__NP_BD6",
    "L2__CO____",
    "L2__NP_BD7",
    "L2__NO2___",
    "L2__O3____",
    "L2__CH4___",
    "L2__O3_TCL",
    "L2__NP_BD3",
    "L2__HCHO__",
];

/// Footprint polygon in lon/lat order from a `lat lon ...` position list.
pub fn footprint_from_pos_list(pos_list: &str) -> Result<Polygon> {
    let values = pos_list
        .split_whitespace()
        .map(|value| {
            value
                .parse::<f64>()
                .map_err(|err| MatchupError::InvalidFootprint(format!("{value:?}: {err}")))
        })
        .collect::<Result<Vec<_>>>()?;
    if values.len() % 2 != 0 {
        return Err(MatchupError::InvalidFootprint(format!(
            "odd number of coordinates: {}",
            values.len()
        )));
    }
    let points: Vec<[f64; 2]> = values
        .chunks_exact(2)
        .map(|lat_lon| [lat_lon[1], lat_lon[0]])
        .collect();
    polygon_from_points(&points)
}

pub fn footprint(dataset: &GdalDataset) -> Result<Polygon> {
    let pos_list = dataset
        .metadata_item(FOOTPRINT_KEY, "")
        .ok_or_else(|| MatchupError::InvalidFootprint(format!("missing {FOOTPRINT_KEY}")))?;
    footprint_from_pos_list(&pos_list)
}

/// Whether the product at `path` covers the WKT region.
pub fn product_covers_region(path: impl AsRef<Path>, region_wkt: &str) -> Result<bool> {
    let product = footprint(&GdalDataset::open(path)?)?;
    Ok(covers(&product, &polygon_from_wkt(region_wkt)?))
}

/// Sentinel-5P product directory with the sub-datasets selected by key.
#[derive(Debug)]
pub struct Sentinel5Product {
    path: PathBuf,
    subdatasets: BTreeMap<String, String>,
}

impl Sentinel5Product {
    /// Opens the first file in `dir`, keeping each sub-dataset whose name
    /// contains one of `keys`.
    pub fn open(dir: impl AsRef<Path>, keys: &[&str]) -> Result<Self> {
        let mut entries = std::fs::read_dir(&dir)?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        let path = entries
            .into_iter()
            .next()
            .ok_or_else(|| MatchupError::EmptyProduct(dir.as_ref().display().to_string()))?;

        let dataset = GdalDataset::open(&path)?;
        let subdatasets = select_subdatasets(&dataset, keys);
        info!("{path:?} has sub-datasets for {:?}", subdatasets.keys());
        Ok(Self { path, subdatasets })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key to sub-dataset name.
    pub fn subdatasets(&self) -> &BTreeMap<String, String> {
        &self.subdatasets
    }

    pub fn footprint(&self) -> Result<Polygon> {
        footprint(&GdalDataset::open(&self.path)?)
    }

    /// First band of every selected sub-dataset, keyed by its key.
    pub fn to_collection(&self, quantification: Option<f64>) -> Result<RasterCollection> {
        let mut collection = RasterCollection::new();
        for (key, name) in self.subdatasets.iter() {
            let index_map = IndexMap::from([(1, RasterKey::from(key.as_str()))]);
            collection.add_rasters(name, Some(index_map), quantification)?;
        }
        Ok(collection)
    }
}

/// `SUBDATASET_{n}_NAME` values ordered by `n`.
fn subdataset_names(metadata: Metadata) -> Vec<String> {
    let mut names: Vec<(usize, String)> = metadata
        .into_iter()
        .filter_map(|(key, value)| {
            let index = key.strip_prefix("SUBDATASET_")?.strip_suffix("_NAME")?;
            Some((index.parse().ok()?, value))
        })
        .collect();
    names.sort_unstable_by_key(|(index, _)| *index);
    names.into_iter().map(|(_, name)| name).collect()
}

/// For each key, the last sub-dataset whose name contains it.
fn select_subdatasets(dataset: &GdalDataset, keys: &[&str]) -> BTreeMap<String, String> {
    let mut selected = BTreeMap::new();
    for name in subdataset_names(filter_metadata_gdal(dataset, "SUBDATASETS")) {
        for key in keys.iter().filter(|key| name.contains(**key)) {
            selected.insert(key.to_string(), name.clone());
        }
    }
    selected
}
