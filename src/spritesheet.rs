use std::fmt;

use rectpack::{InputItem, PackError, Packer, Rect};

use crate::{image::Image, symbol_name::SymbolName};

/// An image waiting to be packed, along with the names it's known by.
#[derive(Debug, Clone)]
pub(crate) struct Sprite {
    /// Identifier used for this sprite in generated code.
    pub name: SymbolName,

    /// The file name the sprite was loaded from, without its folder.
    pub file_name: String,

    pub image: Image,
}

/// A sprite after packing: where it ended up in the atlas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackedSprite {
    pub name: SymbolName,
    pub file_name: String,
    pub slice: Rect,
}

/// A packed and composited texture atlas.
///
/// Sprites are kept in the order the packer placed them, which is the order
/// generated code indexes them by.
pub(crate) struct Spritesheet {
    image: Image,
    sprites: Vec<PackedSprite>,
}

impl Spritesheet {
    pub fn pack(sprites: Vec<Sprite>, packer: &Packer) -> Result<Self, PackError> {
        log::debug!(
            "Packing {} sprites with {:?}",
            sprites.len(),
            packer.strategy()
        );

        let inputs = sprites
            .into_iter()
            .map(|sprite| InputItem::with_payload(sprite.image.size(), sprite));

        let output = packer.pack(inputs)?;
        let mut image = Image::new_empty_rgba8(output.size());

        let sprites = output
            .into_items()
            .into_iter()
            .map(|item| {
                let slice = item.rect();
                let sprite = item.into_payload();

                image.blit(&sprite.image, slice.pos());

                PackedSprite {
                    name: sprite.name,
                    file_name: sprite.file_name,
                    slice,
                }
            })
            .collect();

        Ok(Self { image, sprites })
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.size()
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn sprites(&self) -> &[PackedSprite] {
        &self.sprites
    }
}

impl fmt::Debug for Spritesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = String::new();
        self.sprites.iter().for_each(|sprite| {
            let (max_x, max_y) = sprite.slice.max();
            lines.push_str(
                format!(
                    "\t{}: ({}, {}) ({}, {})\n",
                    sprite.name, sprite.slice.x, sprite.slice.y, max_x, max_y
                )
                .as_str(),
            );
        });

        let (width, height) = self.size();
        write!(
            f,
            "Dimensions: ({}, {})\nSprites:\n{}",
            width, height, lines
        )
    }
}
