//! Resolution of keyword specifications for libraries.
//!
//! Discovery walks a fixed chain: pythonpath, then caller-supplied
//! directories in order, then the default spec directory. Each of the three
//! kinds of step has its own backend. The first step that finds a source
//! wins, and its source is initialized even if initialization then fails;
//! later steps are not consulted.

pub mod backends;
pub mod config;
pub mod initializer;

pub use backends::{find_from_directory, find_from_pythonpath, pythonpath_from_env};
pub use config::{load_resolver_config, ResolverConfig, DEFAULT_SPEC_DIRECTORY};
pub use initializer::{
    parse_libdoc, parse_libdoc_json, parse_libdoc_xml, LibdocInitializer, SpecParseError,
};

use crate::model::{LibrarySpec, SpecSource};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

pub type PythonpathBackend = Box<dyn Fn(&str) -> Option<SpecSource>>;
pub type DirectoryBackend = Box<dyn Fn(&Path, &str) -> Option<SpecSource>>;
pub type Initializer = Box<dyn Fn(&SpecSource, &str) -> Option<LibrarySpec>>;

/// One entry of the discovery chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", content = "directory", rename_all = "snake_case")]
pub enum DiscoveryStep {
    Pythonpath,
    Directory(PathBuf),
    DefaultDirectory(PathBuf),
}

impl fmt::Display for DiscoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pythonpath => f.write_str("pythonpath"),
            Self::Directory(dir) => write!(f, "directory {}", dir.display()),
            Self::DefaultDirectory(dir) => write!(f, "default directory {}", dir.display()),
        }
    }
}

/// A discovery hit: which step found which source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Discovery {
    pub step: DiscoveryStep,
    pub source: SpecSource,
}

pub struct SpecResolver {
    pythonpath: PythonpathBackend,
    directory: DirectoryBackend,
    default_directory_backend: DirectoryBackend,
    default_directory: PathBuf,
    initializer: Initializer,
}

impl SpecResolver {
    /// Resolver with filesystem backends, an empty pythonpath, and the
    /// libdoc initializer.
    #[must_use]
    pub fn new(default_directory: impl Into<PathBuf>) -> Self {
        Self {
            pythonpath: Box::new(|_: &str| None),
            directory: Box::new(find_from_directory),
            default_directory_backend: Box::new(find_from_directory),
            default_directory: default_directory.into(),
            initializer: Box::new(|source: &SpecSource, name: &str| {
                LibdocInitializer.initialize(source, name)
            }),
        }
    }

    #[must_use]
    pub fn from_config(config: &ResolverConfig) -> Self {
        let pythonpath = config.effective_pythonpath();
        Self::new(config.default_directory.clone())
            .with_pythonpath_backend(move |name| find_from_pythonpath(&pythonpath, name))
    }

    #[must_use]
    pub fn with_pythonpath_backend(
        mut self,
        backend: impl Fn(&str) -> Option<SpecSource> + 'static,
    ) -> Self {
        self.pythonpath = Box::new(backend);
        self
    }

    /// Backend consulted for each caller-supplied directory.
    #[must_use]
    pub fn with_directory_backend(
        mut self,
        backend: impl Fn(&Path, &str) -> Option<SpecSource> + 'static,
    ) -> Self {
        self.directory = Box::new(backend);
        self
    }

    /// Backend consulted only for the default spec directory.
    #[must_use]
    pub fn with_default_directory_backend(
        mut self,
        backend: impl Fn(&Path, &str) -> Option<SpecSource> + 'static,
    ) -> Self {
        self.default_directory_backend = Box::new(backend);
        self
    }

    #[must_use]
    pub fn with_initializer(
        mut self,
        initializer: impl Fn(&SpecSource, &str) -> Option<LibrarySpec> + 'static,
    ) -> Self {
        self.initializer = Box::new(initializer);
        self
    }

    #[must_use]
    pub fn default_directory(&self) -> &Path {
        &self.default_directory
    }

    /// The ordered steps tried for `directories`.
    #[must_use]
    pub fn discovery_chain(&self, directories: &[PathBuf]) -> Vec<DiscoveryStep> {
        let mut chain = Vec::with_capacity(directories.len() + 2);
        chain.push(DiscoveryStep::Pythonpath);
        chain.extend(directories.iter().cloned().map(DiscoveryStep::Directory));
        chain.push(DiscoveryStep::DefaultDirectory(
            self.default_directory.clone(),
        ));
        chain
    }

    fn find(&self, step: &DiscoveryStep, name: &str) -> Option<SpecSource> {
        match step {
            DiscoveryStep::Pythonpath => (self.pythonpath)(name),
            DiscoveryStep::Directory(dir) => (self.directory)(dir, name),
            DiscoveryStep::DefaultDirectory(dir) => (self.default_directory_backend)(dir, name),
        }
    }

    /// Walks the chain and returns the first hit without initializing it.
    #[must_use]
    pub fn discover(&self, name: &str, directories: &[PathBuf]) -> Option<Discovery> {
        for step in self.discovery_chain(directories) {
            if let Some(source) = self.find(&step, name) {
                debug!(library = name, %step, %source, "spec source found");
                return Some(Discovery { step, source });
            }
            debug!(library = name, %step, "no spec source");
        }
        None
    }

    /// Discovers and initializes the spec of `name`.
    #[must_use]
    pub fn resolve(&self, name: &str, directories: &[PathBuf]) -> Option<LibrarySpec> {
        let discovery = self.discover(name, directories)?;
        (self.initializer)(&discovery.source, name)
    }
}

impl fmt::Debug for SpecResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecResolver")
            .field("default_directory", &self.default_directory)
            .finish_non_exhaustive()
    }
}
