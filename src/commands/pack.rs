use std::{
    collections::HashMap,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{bail, Context};
use fs_err as fs;
use rectpack::Packer;

use crate::{
    codegen::{self, Extra, HeaderOptions},
    config::{Config, Settings},
    image::Image,
    manifest::Manifest,
    options::Options,
    spritesheet::{Sprite, Spritesheet},
    symbol_name::SymbolName,
};

pub fn pack(options: Options) -> anyhow::Result<()> {
    let config = match &options.config {
        Some(path) => Some(Config::read_from_file(path)?),
        None => None,
    };

    let settings = Settings::resolve(options, config);
    let mut session = PackSession::new(&settings)?;

    for path in &settings.images {
        let contents = fs::read(path)?;
        session
            .add_image(path, &contents)
            .with_context(|| format!("Failed to load image {}", path.display()))?;
    }

    for path in &settings.extras {
        let contents = fs::read(path)?;
        session
            .add_extra(path, contents)
            .with_context(|| format!("Failed to embed {}", path.display()))?;
    }

    let output = session.finish()?;

    if let Some(sheet) = &output.sheet {
        if settings.png {
            let png_path = settings.out.with_extension("png");
            write_png(sheet, &png_path)?;
            log::info!("Output png: {}", png_path.display());
        }

        if let Some(manifest_path) = &settings.manifest {
            Manifest::from_spritesheet(sheet, settings.algorithm).write_to_file(manifest_path)?;
            log::info!("Output manifest: {}", manifest_path.display());
        }
    } else if settings.png || settings.manifest.is_some() {
        log::warn!("No images were given, so there is no atlas to write");
    }

    if let Some(folder) = settings.out.parent() {
        fs::create_dir_all(folder)?;
    }
    fs::write(&settings.out, output.header)?;
    log::info!("Output header: {}", settings.out.display());

    Ok(())
}

fn write_png(sheet: &Spritesheet, path: &Path) -> anyhow::Result<()> {
    let mut file = BufWriter::new(fs::File::create(path)?);
    sheet.image().encode_png(&mut file)?;
    file.flush()?;

    Ok(())
}

/// Everything produced by a run, ready to be written to disk.
struct PackOutput {
    sheet: Option<Spritesheet>,
    header: String,
}

/// Holds the inputs of a single run of silly-packer while they are loaded,
/// checked and turned into a header.
struct PackSession<'a> {
    settings: &'a Settings,
    guard: String,
    sprites: Vec<Sprite>,
    extras: Vec<Extra>,

    /// How many images have been loaded with each name, used to give repeated
    /// stems unique names when duplicates are allowed.
    name_counts: HashMap<SymbolName, usize>,
}

impl<'a> PackSession<'a> {
    fn new(settings: &'a Settings) -> anyhow::Result<Self> {
        if settings.images.is_empty() && settings.extras.is_empty() {
            bail!("No images or extra files were given. Please provide at least one of them.");
        }

        if settings.out.as_os_str().is_empty() {
            bail!("An empty output header file name is not allowed");
        }

        let stem = settings
            .out
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        let guard = SymbolName::include_guard(&stem)
            .with_context(|| format!("Invalid output header name {}", settings.out.display()))?;

        Ok(Self {
            settings,
            guard,
            sprites: Vec::new(),
            extras: Vec::new(),
            name_counts: HashMap::new(),
        })
    }

    fn add_image(&mut self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        let file_name = file_name(path);
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut name = SymbolName::sanitize(&stem)?;
        let count = self.name_counts.entry(name.clone()).or_insert(0);

        if *count > 0 {
            if !self.settings.duplicates {
                bail!(
                    "File '{}' is already loaded. Pass --duplicates to pack it anyway.",
                    path.display()
                );
            }

            let renamed = SymbolName::sanitize(&format!("{}_{}", name, count))?;
            log::warn!("{} is a duplicate, naming it '{}'", path.display(), renamed);
            name = renamed;
        }
        *count += 1;

        let image = Image::decode_png(contents)?;
        log::debug!(
            "Loaded {} ({}x{})",
            path.display(),
            image.size().0,
            image.size().1
        );

        self.sprites.push(Sprite {
            name,
            file_name,
            image,
        });

        Ok(())
    }

    fn add_extra(&mut self, path: &Path, data: Vec<u8>) -> anyhow::Result<()> {
        let file_name = file_name(path);

        if self.extras.iter().any(|extra| extra.file_name == file_name) {
            bail!("File '{}' is already embedded", path.display());
        }

        let name = SymbolName::sanitize(&file_name)?;
        log::debug!("Embedding {} ({} bytes)", path.display(), data.len());

        self.extras.push(Extra {
            name,
            file_name,
            data,
        });

        Ok(())
    }

    fn finish(self) -> anyhow::Result<PackOutput> {
        let settings = self.settings;

        codegen::check_symbols(
            self.sprites
                .iter()
                .map(|sprite| &sprite.name)
                .chain(self.extras.iter().map(|extra| &extra.name)),
        )?;

        let sheet = if self.sprites.is_empty() {
            None
        } else {
            let mut packer = Packer::new(settings.algorithm.into());
            if let Some(max_size) = settings.max_size {
                packer = packer.max_size(max_size);
            }

            let sheet = Spritesheet::pack(self.sprites, &packer)?;
            let (width, height) = sheet.size();
            log::info!("Atlas size: {}x{}", width, height);
            log::trace!("{:?}", sheet);

            Some(sheet)
        };

        let header_options = HeaderOptions {
            guard: self.guard,
            namespace: settings.namespace.clone(),
            raylib: settings.raylib,
            debug: settings.debug,
        };

        let header = codegen::generate_header(&header_options, sheet.as_ref(), &self.extras);

        Ok(PackOutput {
            sheet,
            header: header.to_string(),
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::*;

    use std::path::PathBuf;

    use structopt::StructOpt;

    fn settings(args: &[&str]) -> Settings {
        let mut full = vec!["silly-packer"];
        full.extend_from_slice(args);

        Settings::resolve(Options::from_iter(&full), None)
    }

    fn png(size: (u32, u32), value: u8) -> Vec<u8> {
        let data = vec![value; (size.0 * size.1 * 4) as usize];
        let mut encoded = Vec::new();
        Image::new_rgba8(size, data).encode_png(&mut encoded).unwrap();
        encoded
    }

    #[test]
    fn requires_some_input() {
        let settings = settings(&[]);
        let err = PackSession::new(&settings).err().unwrap();

        assert!(err.to_string().starts_with("No images or extra files were given"));
    }

    #[test]
    fn requires_output_name() {
        let settings = settings(&["-i", "hero.png", "-o", ""]);

        assert!(PackSession::new(&settings).is_err());
    }

    #[test]
    fn duplicate_stems_are_rejected() {
        let settings = settings(&["-i", "a/hero.png,b/hero.png"]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_image(&PathBuf::from("a/hero.png"), &png((2, 2), 1))
            .unwrap();
        let err = session
            .add_image(&PathBuf::from("b/Hero.png"), &png((2, 2), 1))
            .unwrap_err();

        assert!(err.to_string().contains("already loaded"));
    }

    #[test]
    fn duplicate_stems_are_renamed_when_allowed() {
        let settings = settings(&["-i", "a/hero.png,b/hero.png", "-d"]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_image(&PathBuf::from("a/hero.png"), &png((2, 2), 1))
            .unwrap();
        session
            .add_image(&PathBuf::from("b/hero.png"), &png((2, 2), 1))
            .unwrap();

        let names: Vec<_> = session.sprites.iter().map(|s| s.name.to_string()).collect();
        assert_eq!(names, vec!["hero", "hero_1"]);
    }

    #[test]
    fn duplicate_extras_are_rejected() {
        let settings = settings(&["-e", "a/font.ttf,b/font.ttf"]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_extra(&PathBuf::from("a/font.ttf"), vec![1])
            .unwrap();
        assert!(session
            .add_extra(&PathBuf::from("b/font.ttf"), vec![2])
            .is_err());
    }

    #[test]
    fn reserved_names_are_rejected() {
        let settings = settings(&["-i", "atlas.png"]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_image(&PathBuf::from("atlas.png"), &png((1, 1), 1))
            .unwrap();

        assert!(session.finish().is_err());
    }

    #[test]
    fn builds_header_and_atlas() {
        let settings = settings(&["-i", "hero.png,coin.png", "-o", "gen/game-assets.h", "-r"]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_image(&PathBuf::from("hero.png"), &png((8, 8), 1))
            .unwrap();
        session
            .add_image(&PathBuf::from("coin.png"), &png((4, 4), 2))
            .unwrap();
        session
            .add_extra(&PathBuf::from("level.json"), b"{}".to_vec())
            .unwrap();

        let output = session.finish().unwrap();
        let sheet = output.sheet.unwrap();

        assert_eq!(sheet.size(), (16, 16));
        assert!(output
            .header
            .starts_with("#ifndef SILLY_PACKER_GENERATED_GAME_ASSETS_H\n"));
        assert!(output.header.contains("namespace silly_packer {"));
        assert!(output.header.contains("\thero = 0,\n\tcoin = 1,\n"));
        assert!(output
            .header
            .contains("inline constexpr std::array<std::uint8_t, 2> level_json = {\n\t123, 125,\n};"));
        assert!(output.header.contains("raylib_atlas_texture"));
    }

    #[test]
    fn extras_alone_have_no_atlas() {
        let settings = settings(&["-e", "notes.txt", "-n", ""]);
        let mut session = PackSession::new(&settings).unwrap();

        session
            .add_extra(&PathBuf::from("notes.txt"), b"hi".to_vec())
            .unwrap();

        let output = session.finish().unwrap();

        assert!(output.sheet.is_none());
        assert!(!output.header.contains("namespace"));
        assert!(output.header.contains("notes_txt"));
    }

    #[test]
    fn max_size_is_enforced() {
        let mut settings = settings(&["-i", "big.png"]);
        settings.max_size = Some((8, 8));

        let mut session = PackSession::new(&settings).unwrap();
        session
            .add_image(&PathBuf::from("big.png"), &png((16, 16), 1))
            .unwrap();

        let err = session.finish().err().unwrap();
        assert!(err.to_string().contains("no larger than 8x8"));
    }
}
