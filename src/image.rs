//! Simple containers to track images and perform operations on them.

use std::io::{Read, Write};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Rgba8,
}

impl ImageFormat {
    fn stride(&self) -> u32 {
        match self {
            ImageFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Image {
    size: (u32, u32),
    data: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();
        let format = ImageFormat::Rgba8;

        assert!(data.len() == size.0 as usize * size.1 as usize * format.stride() as usize);

        Self { size, data, format }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let stride = ImageFormat::Rgba8.stride() as usize;
        let data = vec![0; size.0 as usize * size.1 as usize * stride];
        Self::new_rgba8(size, data)
    }

    /// Decodes a PNG, converting it to 8-bit RGBA if it's stored any other way.
    pub fn decode_png<R: Read>(input: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(input);

        // Palettes, low bit depths and tRNS chunks are expanded by the decoder.
        // Everything else is converted to RGBA below.
        decoder.set_transformations(png::Transformations::EXPAND);

        let (info, mut reader) = decoder.read_info()?;

        let mut data = vec![0; info.buffer_size()];
        reader.next_frame(&mut data)?;

        let size = (info.width, info.height);

        if info.color_type != png::ColorType::RGBA || info.bit_depth != png::BitDepth::Eight {
            log::warn!(
                "Converting {:?} image with {:?} bit depth to RGBA",
                info.color_type,
                info.bit_depth
            );

            data = convert_to_rgba8(info.color_type, info.bit_depth, &data)?;
        }

        Ok(Self::new_rgba8(size, data))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);

        match self.format {
            ImageFormat::Rgba8 => {
                encoder.set_color(png::ColorType::RGBA);
                encoder.set_depth(png::BitDepth::Eight);
            }
        }

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of bytes per pixel.
    pub fn components_per_pixel(&self) -> u32 {
        self.format.stride()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Copies `other` into this image with its top-left corner at `pos`.
    pub fn blit(&mut self, other: &Image, pos: (u32, u32)) {
        assert!(self.format == ImageFormat::Rgba8 && other.format == ImageFormat::Rgba8);
        assert!(pos.0 + other.size.0 <= self.size.0);
        assert!(pos.1 + other.size.1 <= self.size.1);

        let stride = self.format.stride();

        let other_width_bytes = other.size.0 * stride;
        let other_rows = other.data.chunks_exact(other_width_bytes as usize);

        for (other_y, other_row) in other_rows.enumerate() {
            let self_y = pos.1 + other_y as u32;

            let start_px = pos.0 as usize + self.size.0 as usize * self_y as usize;

            let start_in_bytes = stride as usize * start_px;
            let end_in_bytes = start_in_bytes + other_row.len();

            let self_row = &mut self.data[start_in_bytes..end_in_bytes];
            self_row.copy_from_slice(other_row);
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, pos: (u32, u32)) -> [u8; 4] {
        let stride = self.format.stride() as usize;
        let start = stride * (pos.0 as usize + pos.1 as usize * self.size.0 as usize);

        [
            self.data[start],
            self.data[start + 1],
            self.data[start + 2],
            self.data[start + 3],
        ]
    }
}

/// Converts decoded grayscale, gray+alpha, RGB or 16-bit samples to 8-bit
/// RGBA. 16-bit samples keep their most significant byte.
fn convert_to_rgba8(
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    data: &[u8],
) -> Result<Vec<u8>, ImageError> {
    let samples: Vec<u8> = match bit_depth {
        png::BitDepth::Eight => data.to_vec(),
        png::BitDepth::Sixteen => data.chunks_exact(2).map(|sample| sample[0]).collect(),
        _ => {
            return Err(ImageError::Unsupported {
                color_type,
                bit_depth,
            })
        }
    };

    let channels = match color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::RGB => 3,
        png::ColorType::RGBA => 4,
        png::ColorType::Indexed => {
            return Err(ImageError::Unsupported {
                color_type,
                bit_depth,
            })
        }
    };

    let mut rgba = Vec::with_capacity(samples.len() / channels * 4);

    for pixel in samples.chunks_exact(channels) {
        let converted = match *pixel {
            [gray] => [gray, gray, gray, 255],
            [gray, alpha] => [gray, gray, gray, alpha],
            [r, g, b] => [r, g, b, 255],
            [r, g, b, a] => [r, g, b, a],
            _ => unreachable!(),
        };

        rgba.extend_from_slice(&converted);
    }

    Ok(rgba)
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode {
        #[from]
        source: png::DecodingError,
    },

    #[error(transparent)]
    Encode {
        #[from]
        source: png::EncodingError,
    },

    #[error("Unsupported PNG pixel format {color_type:?} at {bit_depth:?} bits")]
    Unsupported {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}
