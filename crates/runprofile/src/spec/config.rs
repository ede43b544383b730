use crate::error::{ProfileError, ProfileResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::backends::pythonpath_from_env;

/// Directory searched last when resolving a library spec.
pub const DEFAULT_SPEC_DIRECTORY: &str = "library-specs";

/// Where keyword specs are looked up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Searched first, before any spec directory.
    pub pythonpath: Vec<PathBuf>,
    /// Append the `PYTHONPATH` environment variable to `pythonpath`.
    pub use_env_pythonpath: bool,
    /// Extra spec directories, searched in order.
    pub directories: Vec<PathBuf>,
    pub default_directory: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            pythonpath: Vec::new(),
            use_env_pythonpath: true,
            directories: Vec::new(),
            default_directory: PathBuf::from(DEFAULT_SPEC_DIRECTORY),
        }
    }
}

impl ResolverConfig {
    #[must_use]
    pub fn effective_pythonpath(&self) -> Vec<PathBuf> {
        let mut paths = self.pythonpath.clone();
        if self.use_env_pythonpath {
            paths.extend(pythonpath_from_env());
        }
        paths
    }
}

/// Loads a resolver config from JSON, or YAML for `.yaml`/`.yml` files.
pub fn load_resolver_config(path: &Path) -> ProfileResult<ResolverConfig> {
    let data = fs::read_to_string(path)
        .map_err(|err| ProfileError::io("E_IO", "failed to read resolver config", err))?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        serde_yml::from_str(&data)
            .map_err(|err| ProfileError::io("E_CONFIG", "failed to parse yaml config", err))
    } else {
        serde_json::from_str(&data)
            .map_err(|err| ProfileError::io("E_CONFIG", "failed to parse json config", err))
    }
}
