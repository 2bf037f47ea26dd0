use std::time::Duration;

use log::debug;

use crate::{catalogue::CatalogueConfig, errors::Result};

/// Where catalogue documents come from.
pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP source.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(config: &CatalogueConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(timeout));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl DocumentSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {url}");
        Ok(self.client.get(url).send()?.error_for_status()?.text()?)
    }
}
