use std::{convert::TryFrom, fmt, path::PathBuf, str::FromStr};

use rectpack::Strategy;
use serde::{Deserialize, Serialize};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs images into a texture atlas and bakes it into a C++ header")]
pub struct Options {
    /// Image files to pack into the atlas, separated by commas. Only PNG
    /// images are supported; anything that isn't RGBA is converted.
    #[structopt(short = "i", long = "images", use_delimiter = true)]
    pub images: Vec<PathBuf>,

    /// Extra files to embed in the header as plain byte arrays, separated by
    /// commas.
    #[structopt(short = "e", long = "extras", use_delimiter = true)]
    pub extras: Vec<PathBuf>,

    /// File name of the generated header. Defaults to `silly_pack.h`.
    #[structopt(short = "o", long = "out")]
    pub out: Option<PathBuf>,

    /// Namespace the generated symbols are placed in. Defaults to
    /// `silly_packer`; pass an empty string to emit no namespace.
    #[structopt(short = "n", long)]
    pub namespace: Option<String>,

    /// The packing algorithm to use.
    ///
    /// Options:
    ///
    /// - maxrects: MaxRects with Best Area Fit (default)
    ///
    /// - guillotine: first fit with guillotine cuts
    #[structopt(short = "a", long)]
    pub algorithm: Option<Algorithm>,

    /// Emit raylib helpers that wrap the atlas in an `Image` or `Texture2D`.
    #[structopt(short = "r", long)]
    pub raylib: bool,

    /// Also write the atlas as a PNG next to the generated header.
    #[structopt(short = "p", long)]
    pub png: bool,

    /// Allow several images with the same file stem to be packed.
    #[structopt(short = "d", long)]
    pub duplicates: bool,

    /// Export file name tables and lookup functions that help with debugging.
    #[structopt(long)]
    pub debug: bool,

    /// Write a JSON manifest describing where every image was packed.
    #[structopt(long)]
    pub manifest: Option<PathBuf>,

    /// Read defaults from a TOML config file. Values given on the command
    /// line take precedence.
    #[structopt(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Algorithm {
    #[serde(rename = "maxrects")]
    MaxRects,

    #[serde(rename = "guillotine")]
    Guillotine,
}

impl Default for Algorithm {
    fn default() -> Self {
        Algorithm::MaxRects
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(value: &str) -> Result<Algorithm, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "maxrects" => Ok(Algorithm::MaxRects),
            "guillotine" => Ok(Algorithm::Guillotine),

            _ => Err(format!(
                "Invalid algorithm '{}'. Valid options are 'maxrects' and 'guillotine'.",
                value
            )),
        }
    }
}

impl TryFrom<String> for Algorithm {
    type Error = String;

    fn try_from(value: String) -> Result<Algorithm, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Algorithm::MaxRects => write!(formatter, "maxrects"),
            Algorithm::Guillotine => write!(formatter, "guillotine"),
        }
    }
}

impl From<Algorithm> for Strategy {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::MaxRects => Strategy::MaxRectsBestAreaFit,
            Algorithm::Guillotine => Strategy::Guillotine,
        }
    }
}
