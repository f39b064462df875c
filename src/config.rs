use std::{
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{Algorithm, Options};

static DEFAULT_HEADER_NAME: &str = "silly_pack.h";
static DEFAULT_NAMESPACE: &str = "silly_packer";

/// Defaults for a packing run, read from a TOML file passed via `--config`.
///
/// Every field mirrors a command line option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub images: Vec<PathBuf>,

    #[serde(default)]
    pub extras: Vec<PathBuf>,

    #[serde(default)]
    pub out: Option<PathBuf>,

    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub algorithm: Option<Algorithm>,

    #[serde(default)]
    pub raylib: bool,

    #[serde(default)]
    pub png: bool,

    #[serde(default)]
    pub duplicates: bool,

    #[serde(default)]
    pub debug: bool,

    /// The largest atlas the packer may grow to. Unlimited if not given.
    #[serde(default)]
    pub max_size: Option<(u32, u32)>,

    /// The path that this config came from. Paths from this config are
    /// relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Config {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let mut config: Self = toml::from_slice(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        config.file_path = path.to_owned();

        Ok(config)
    }

    /// The path that paths in this Config should be considered relative to.
    pub fn folder(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{source} in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{source}")]
    Io { path: PathBuf, source: io::Error },
}

/// The fully resolved settings for one run, after merging the command line
/// with an optional config file.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub images: Vec<PathBuf>,
    pub extras: Vec<PathBuf>,
    pub out: PathBuf,
    pub namespace: Option<String>,
    pub algorithm: Algorithm,
    pub raylib: bool,
    pub png: bool,
    pub duplicates: bool,
    pub debug: bool,
    pub max_size: Option<(u32, u32)>,
    pub manifest: Option<PathBuf>,
}

impl Settings {
    /// Command line values win over the config file. Input lists from both are
    /// combined, config entries first, and flags are enabled if either source
    /// enables them.
    pub fn resolve(options: Options, config: Option<Config>) -> Self {
        let config = config.unwrap_or_default();
        let folder = config.folder().to_owned();

        let mut images: Vec<PathBuf> = config.images.iter().map(|p| folder.join(p)).collect();
        images.extend(options.images);

        let mut extras: Vec<PathBuf> = config.extras.iter().map(|p| folder.join(p)).collect();
        extras.extend(options.extras);

        let out = options
            .out
            .or_else(|| config.out.as_ref().map(|p| folder.join(p)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_HEADER_NAME));

        let namespace = options
            .namespace
            .or(config.namespace)
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());

        Self {
            images,
            extras,
            out,
            namespace: if namespace.is_empty() {
                None
            } else {
                Some(namespace)
            },
            algorithm: options.algorithm.or(config.algorithm).unwrap_or_default(),
            raylib: options.raylib || config.raylib,
            png: options.png || config.png,
            duplicates: options.duplicates || config.duplicates,
            debug: options.debug || config.debug,
            max_size: config.max_size,
            manifest: options.manifest,
        }
    }
}
