//! Client configuration loading and management

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::filter::{DEFAULT_PAGE_SIZE, Filter};

/// Configuration for a dashboard API client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST backend (e.g. "https://api.example.com/v1")
    pub base_url: String,

    /// Default number of items per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Request timeout in seconds; unlimited when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Bearer token attached to every request
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// Path overrides for resources whose URL segment differs from the
    /// resource name (e.g. "bookings" -> "legacy/bookings")
    #[serde(default)]
    pub resource_paths: HashMap<String, String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: None,
            bearer_token: None,
            resource_paths: HashMap::new(),
        }
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// URL path segment for a resource, honoring overrides
    pub fn path_for(&self, resource_name: &str) -> String {
        self.resource_paths
            .get(resource_name)
            .cloned()
            .unwrap_or_else(|| resource_name.to_string())
    }

    /// An empty filter using the configured page size
    pub fn initial_filter(&self) -> Filter {
        Filter::new(self.page_size)
    }
}
