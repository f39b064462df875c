//! Builds the generated header out of a packed spritesheet and any extra
//! embedded files.

use std::collections::HashSet;

use thiserror::Error;

use crate::{
    cpp_ast::{Enum, Expr, Function, Header, Item, Struct, Variable},
    spritesheet::Spritesheet,
    symbol_name::SymbolName,
};

/// Names that generated code declares itself. Sprites and extras may not use
/// them.
static RESERVED_NAMES: &[&str] = &[
    "atlas",
    "atlas_info",
    "atlas_properties",
    "sprite_info",
    "uv_coords",
    "sprite_filenames",
    "get_sprite_index",
    "normalized",
    "sprite_indices",
    "min_index",
    "max_index",
    "sprites",
    "extra_filenames",
    "get_extra_symbol_index",
    "extra_symbol_info",
    "extra_symbol_table",
    "raylib_atlas_image",
    "raylib_atlas_texture",
];

/// A file embedded verbatim as a byte array.
#[derive(Debug, Clone)]
pub(crate) struct Extra {
    pub name: SymbolName,
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub(crate) struct HeaderOptions {
    pub guard: String,
    pub namespace: Option<String>,
    pub raylib: bool,
    pub debug: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodegenError {
    #[error("'{name}' is used by generated code and cannot name an input file")]
    Reserved { name: String },

    #[error("More than one input file would be named '{name}' in generated code")]
    Collision { name: String },
}

/// Checks that every symbol is unique and doesn't shadow anything the header
/// declares.
pub(crate) fn check_symbols<'a, I>(names: I) -> Result<(), CodegenError>
where
    I: IntoIterator<Item = &'a SymbolName>,
{
    let mut seen = HashSet::new();

    for name in names {
        let name = name.as_ref();

        if RESERVED_NAMES.contains(&name) {
            return Err(CodegenError::Reserved {
                name: name.to_owned(),
            });
        }

        if !seen.insert(name) {
            return Err(CodegenError::Collision {
                name: name.to_owned(),
            });
        }
    }

    Ok(())
}

pub(crate) fn generate_header(
    options: &HeaderOptions,
    sheet: Option<&Spritesheet>,
    extras: &[Extra],
) -> Header {
    let mut includes = vec![
        "array".to_owned(),
        "cstdint".to_owned(),
        "cstddef".to_owned(),
    ];

    if options.raylib {
        includes.push("raylib.h".to_owned());
    }

    let mut items = Vec::new();

    if let Some(sheet) = sheet {
        sprite_items(sheet, options.debug, &mut items);
    }

    if !extras.is_empty() {
        extra_items(extras, options.debug, &mut items);
    }

    if sheet.is_some() && options.raylib {
        raylib_items(&mut items);
    }

    Header {
        guard: options.guard.clone(),
        includes,
        namespace: options.namespace.clone(),
        items,
    }
}

fn unsigned_fields(names: &[&str]) -> Vec<(String, String)> {
    names
        .iter()
        .map(|name| ("unsigned int".to_owned(), (*name).to_owned()))
        .collect()
}

fn sprite_items(sheet: &Spritesheet, debug: bool, items: &mut Vec<Item>) {
    let (width, height) = sheet.size();
    let image = sheet.image();
    let sprites = sheet.sprites();

    items.push(
        Struct {
            name: "atlas_properties".to_owned(),
            fields: unsigned_fields(&["width", "height", "components_per_pixel"]),
        }
        .into(),
    );

    items.push(
        Variable {
            ty: "atlas_properties".to_owned(),
            name: "atlas_info".to_owned(),
            value: Expr::Designated(vec![
                ("width".to_owned(), width.into()),
                ("height".to_owned(), height.into()),
                (
                    "components_per_pixel".to_owned(),
                    image.components_per_pixel().into(),
                ),
            ]),
        }
        .into(),
    );

    items.push(
        Struct {
            name: "sprite_info".to_owned(),
            fields: unsigned_fields(&["x", "y", "width", "height"]),
        }
        .into(),
    );

    items.push(
        Struct {
            name: "uv_coords".to_owned(),
            fields: ["u0", "v0", "u1", "v1"]
                .iter()
                .map(|name| ("float".to_owned(), (*name).to_owned()))
                .collect(),
        }
        .into(),
    );

    if debug {
        items.push(
            Variable {
                ty: format!("std::array<const char*, {}>", sprites.len()),
                name: "sprite_filenames".to_owned(),
                value: Expr::List(
                    sprites
                        .iter()
                        .map(|sprite| Expr::Str(sprite.file_name.clone()))
                        .collect(),
                ),
            }
            .into(),
        );

        items.push(lookup_function("get_sprite_index", "sprite_filenames").into());
    }

    items.push(
        Function {
            signature: "constexpr uv_coords normalized(const sprite_info sprite)".to_owned(),
            body: vec![
                "return uv_coords{".to_owned(),
                "\tsprite.x / float(atlas_info.width),".to_owned(),
                "\tsprite.y / float(atlas_info.height),".to_owned(),
                "\t(sprite.x + sprite.width) / float(atlas_info.width),".to_owned(),
                "\t(sprite.y + sprite.height) / float(atlas_info.height),".to_owned(),
                "};".to_owned(),
            ],
        }
        .into(),
    );

    let mut variants: Vec<(String, u64)> = sprites
        .iter()
        .enumerate()
        .map(|(index, sprite)| (sprite.name.to_string(), index as u64))
        .collect();
    variants.push(("min_index".to_owned(), 0));
    variants.push((
        "max_index".to_owned(),
        sprites.len().saturating_sub(1) as u64,
    ));

    items.push(
        Enum {
            name: "sprite_indices".to_owned(),
            variants,
        }
        .into(),
    );

    items.push(
        Variable {
            ty: format!("std::array<sprite_info, {}>", sprites.len()),
            name: "sprites".to_owned(),
            value: Expr::List(
                sprites
                    .iter()
                    .map(|sprite| {
                        let slice = sprite.slice;
                        Expr::Construct(
                            "sprite_info".to_owned(),
                            vec![
                                slice.x.into(),
                                slice.y.into(),
                                slice.width.into(),
                                slice.height.into(),
                            ],
                        )
                    })
                    .collect(),
            ),
        }
        .into(),
    );

    items.push(byte_array("atlas", image.data()).into());
}

fn extra_items(extras: &[Extra], debug: bool, items: &mut Vec<Item>) {
    for extra in extras {
        items.push(byte_array(extra.name.as_ref(), &extra.data).into());
    }

    if !debug {
        return;
    }

    items.push(
        Variable {
            ty: format!("std::array<const char*, {}>", extras.len()),
            name: "extra_filenames".to_owned(),
            value: Expr::List(
                extras
                    .iter()
                    .map(|extra| Expr::Str(extra.file_name.clone()))
                    .collect(),
            ),
        }
        .into(),
    );

    items.push(lookup_function("get_extra_symbol_index", "extra_filenames").into());

    items.push(
        Struct {
            name: "extra_symbol_info".to_owned(),
            fields: vec![
                ("const void*".to_owned(), "data".to_owned()),
                ("std::size_t".to_owned(), "size".to_owned()),
            ],
        }
        .into(),
    );

    items.push(
        Variable {
            ty: format!("std::array<extra_symbol_info, {}>", extras.len()),
            name: "extra_symbol_table".to_owned(),
            value: Expr::List(
                extras
                    .iter()
                    .map(|extra| {
                        Expr::Construct(
                            "extra_symbol_info".to_owned(),
                            vec![
                                Expr::Raw(format!(
                                    "static_cast<const void*>({}.data())",
                                    extra.name
                                )),
                                Expr::Raw(format!("{}.size()", extra.name)),
                            ],
                        )
                    })
                    .collect(),
            ),
        }
        .into(),
    );
}

fn raylib_items(items: &mut Vec<Item>) {
    items.push(
        Function {
            signature: "Image raylib_atlas_image()".to_owned(),
            body: vec![
                "return Image{".to_owned(),
                "\tconst_cast<void*>(static_cast<const void*>(atlas.data())),".to_owned(),
                "\tstatic_cast<int>(atlas_info.width),".to_owned(),
                "\tstatic_cast<int>(atlas_info.height),".to_owned(),
                "\t1,".to_owned(),
                "\tPIXELFORMAT_UNCOMPRESSED_R8G8B8A8,".to_owned(),
                "};".to_owned(),
            ],
        }
        .into(),
    );

    items.push(
        Function {
            signature: "Texture2D raylib_atlas_texture()".to_owned(),
            body: vec!["return LoadTextureFromImage(raylib_atlas_image());".to_owned()],
        }
        .into(),
    );
}

fn byte_array(name: &str, data: &[u8]) -> Variable {
    Variable {
        ty: format!("std::array<std::uint8_t, {}>", data.len()),
        name: name.to_owned(),
        value: Expr::Bytes(data.to_vec()),
    }
}

/// A constexpr search through a table of file names, returning the index of
/// an exact match or -1.
fn lookup_function(name: &str, table: &str) -> Function {
    Function {
        signature: format!("constexpr int {}(const char* name)", name),
        body: vec![
            format!("for (std::size_t i = 0; i < {}.size(); ++i) {{", table),
            "\tconst char* a = name;".to_owned(),
            format!("\tconst char* b = {}[i];", table),
            "\twhile (*a != '\\0' && *a == *b) {".to_owned(),
            "\t\t++a;".to_owned(),
            "\t\t++b;".to_owned(),
            "\t}".to_owned(),
            "\tif (*a == *b) {".to_owned(),
            "\t\treturn static_cast<int>(i);".to_owned(),
            "\t}".to_owned(),
            "}".to_owned(),
            "return -1;".to_owned(),
        ],
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use rectpack::{Packer, Strategy};

    use crate::{image::Image, spritesheet::Sprite};

    fn sheet() -> Spritesheet {
        let sprites = vec![
            Sprite {
                name: SymbolName::sanitize("hero").unwrap(),
                file_name: "Hero.png".to_owned(),
                image: Image::new_rgba8((2, 1), vec![255; 8]),
            },
            Sprite {
                name: SymbolName::sanitize("coin").unwrap(),
                file_name: "coin.png".to_owned(),
                image: Image::new_rgba8((1, 1), vec![7; 4]),
            },
        ];

        Spritesheet::pack(sprites, &Packer::new(Strategy::MaxRectsBestAreaFit)).unwrap()
    }

    fn extra() -> Extra {
        Extra {
            name: SymbolName::sanitize("font.ttf").unwrap(),
            file_name: "font.ttf".to_owned(),
            data: vec![1, 2, 3],
        }
    }

    fn options(raylib: bool, debug: bool) -> HeaderOptions {
        HeaderOptions {
            guard: "SILLY_PACKER_GENERATED_SILLY_PACK_H".to_owned(),
            namespace: Some("silly_packer".to_owned()),
            raylib,
            debug,
        }
    }

    #[test]
    fn sprites_only() {
        let sheet = sheet();
        let output = generate_header(&options(false, false), Some(&sheet), &[]).to_string();

        assert!(output.starts_with("#ifndef SILLY_PACKER_GENERATED_SILLY_PACK_H\n"));
        assert!(output.contains("#include <cstddef>\n"));
        assert!(!output.contains("raylib"));
        assert!(output.contains("namespace silly_packer {"));
        assert!(output.contains(
            "inline constexpr atlas_properties atlas_info = \
             {.width = 2, .height = 2, .components_per_pixel = 4};"
        ));
        assert!(output.contains("\thero = 0,\n\tcoin = 1,\n\tmin_index = 0,\n\tmax_index = 1,\n"));
        assert!(output.contains(
            "inline constexpr std::array<sprite_info, 2> sprites = {\n\
             \tsprite_info{0, 0, 2, 1},\n\
             \tsprite_info{0, 1, 1, 1},\n\
             };"
        ));
        assert!(output.contains("inline constexpr std::array<std::uint8_t, 16> atlas = {"));
        assert!(!output.contains("sprite_filenames"));
        assert!(!output.contains("extra_symbol_table"));
    }

    #[test]
    fn debug_tables() {
        let sheet = sheet();
        let extras = [extra()];
        let output = generate_header(&options(false, true), Some(&sheet), &extras).to_string();

        assert!(output.contains(
            "inline constexpr std::array<const char*, 2> sprite_filenames = {\n\
             \t\"Hero.png\",\n\
             \t\"coin.png\",\n\
             };"
        ));
        assert!(output.contains("inline constexpr int get_sprite_index(const char* name) {"));
        assert!(output.contains("inline constexpr int get_extra_symbol_index(const char* name) {"));
        assert!(output.contains(
            "\textra_symbol_info{static_cast<const void*>(font_ttf.data()), font_ttf.size()},\n"
        ));
    }

    #[test]
    fn raylib_helpers_follow_everything_else() {
        let sheet = sheet();
        let extras = [extra()];
        let output = generate_header(&options(true, false), Some(&sheet), &extras).to_string();

        let extra_at = output.find("font_ttf").unwrap();
        let raylib_at = output.find("inline Image raylib_atlas_image()").unwrap();

        assert!(output.contains("#include <raylib.h>\n"));
        assert!(extra_at < raylib_at);
        assert!(output.contains("return LoadTextureFromImage(raylib_atlas_image());"));
    }

    #[test]
    fn extras_only() {
        let mut header_options = options(true, false);
        header_options.namespace = None;

        let output = generate_header(&header_options, None, &[extra()]).to_string();

        assert!(output.contains(
            "inline constexpr std::array<std::uint8_t, 3> font_ttf = {\n\t1, 2, 3,\n};"
        ));
        assert!(!output.contains("namespace"));
        assert!(!output.contains("atlas"));
        assert!(!output.contains("raylib_atlas_image"));
    }

    #[test]
    fn reserved_and_colliding_names() {
        let name = |value: &str| SymbolName::sanitize(value).unwrap();

        assert_eq!(check_symbols(&[name("hero"), name("coin")]), Ok(()));
        assert_eq!(
            check_symbols(&[name("Atlas")]),
            Err(CodegenError::Reserved {
                name: "atlas".to_owned()
            })
        );
        assert_eq!(
            check_symbols(&[name("a.b"), name("a-b")]),
            Err(CodegenError::Collision {
                name: "a_b".to_owned()
            })
        );
    }
}
