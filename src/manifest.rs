use std::{
    io::{BufWriter, Write},
    path::Path,
};

use fs_err as fs;
use serde::{Deserialize, Serialize};

use crate::{options::Algorithm, spritesheet::Spritesheet, symbol_name::SymbolName};

/// Describes where every image ended up in the atlas, for tools that consume
/// the layout without parsing the generated header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Manifest {
    pub width: u32,
    pub height: u32,
    pub algorithm: Algorithm,

    /// In the same order as the `sprite_indices` enum in the header.
    pub sprites: Vec<SpriteManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteManifest {
    pub name: SymbolName,
    pub file: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Manifest {
    pub fn from_spritesheet(sheet: &Spritesheet, algorithm: Algorithm) -> Self {
        let (width, height) = sheet.size();

        let sprites = sheet
            .sprites()
            .iter()
            .map(|sprite| SpriteManifest {
                name: sprite.name.clone(),
                file: sprite.file_name.clone(),
                x: sprite.slice.x,
                y: sprite.slice.y,
                width: sprite.slice.width,
                height: sprite.slice.height,
            })
            .collect();

        Self {
            width,
            height,
            algorithm,
            sprites,
        }
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();

        if let Some(folder) = path.parent() {
            fs::create_dir_all(folder)?;
        }

        let mut file = BufWriter::new(fs::File::create(path)?);
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()?;

        log::trace!("Saved manifest to {}", path.display());

        Ok(())
    }
}
