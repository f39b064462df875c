use std::{cmp::Reverse, convert::TryFrom};

use crate::{
    error::PackError,
    geometry::Rect,
    guillotine, maxrects,
    types::{InputItem, OutputItem, PackOutput},
};

/// The largest power of two that fits in an atlas dimension.
const MAX_SIDE: u64 = 1 << 31;

/// The heuristics available for placing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First fit into a disjoint set of free rectangles, cutting the leftover
    /// space into a right and a bottom strip. Items are sorted by their longer
    /// side.
    Guillotine,

    /// Best Area Fit into a set of maximal, possibly overlapping free
    /// rectangles. Items are sorted by area.
    MaxRectsBestAreaFit,
}

impl Strategy {
    fn sort_key<T>(self, item: &InputItem<T>) -> u64 {
        match self {
            Strategy::Guillotine => u64::from(item.longest_side()),
            Strategy::MaxRectsBestAreaFit => item.area(),
        }
    }

    fn attempt(self, bin_size: (u32, u32), sizes: &[(u32, u32)]) -> Option<Vec<Rect>> {
        match self {
            Strategy::Guillotine => guillotine::attempt(bin_size, sizes),
            Strategy::MaxRectsBestAreaFit => maxrects::attempt(bin_size, sizes),
        }
    }
}

/// Packs items into a single power-of-two atlas, growing the atlas until
/// every item fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packer {
    strategy: Strategy,
    max_size: Option<(u32, u32)>,
}

impl Packer {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            max_size: None,
        }
    }

    /// Caps how large the atlas may grow. Without a cap, the atlas may grow
    /// until every item would fit side by side in a single row.
    pub fn max_size(self, max_size: (u32, u32)) -> Self {
        Self {
            max_size: Some(max_size),
            ..self
        }
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Computes a layout for the given items.
    ///
    /// The returned items are in the strategy's sort order: descending by
    /// longer side for Guillotine and descending by area for MaxRects, with
    /// equal items keeping their relative order.
    pub fn pack<T, I>(&self, items: I) -> Result<PackOutput<T>, PackError>
    where
        I: IntoIterator<Item = InputItem<T>>,
    {
        let mut items: Vec<_> = items.into_iter().collect();

        if let Some((index, item)) = items
            .iter()
            .enumerate()
            .find(|(_, item)| item.size.0 == 0 || item.size.1 == 0)
        {
            return Err(PackError::InvalidItemSize {
                index,
                size: item.size,
            });
        }

        let strategy = self.strategy;
        items.sort_by_key(|item| Reverse(strategy.sort_key(item)));

        let requested_area = total_area(&items);
        let max_size = self.max_size.unwrap_or_else(|| default_max_size(&items));
        let too_large = PackError::AtlasTooLarge {
            requested_area,
            max_size,
        };

        let side = u32::try_from(initial_side(&items)).map_err(|_| too_large.clone())?;
        let mut size = (side, side);
        if !within(size, max_size) {
            return Err(too_large);
        }

        let sizes: Vec<_> = items.iter().map(InputItem::size).collect();

        log::trace!(
            "Packing {} items ({} square pixels) with {:?}",
            items.len(),
            requested_area,
            strategy
        );

        loop {
            log::debug!("Trying a {}x{} atlas", size.0, size.1);

            if let Some(placements) = strategy.attempt(size, &sizes) {
                log::debug!(
                    "Packed {} items into a {}x{} atlas",
                    placements.len(),
                    size.0,
                    size.1
                );

                let items = items
                    .into_iter()
                    .zip(placements)
                    .map(|(item, rect)| OutputItem {
                        payload: item.payload,
                        rect,
                    })
                    .collect();

                return Ok(PackOutput { size, items });
            }

            size = match grow(size) {
                Some(next) if within(next, max_size) => next,
                _ => return Err(too_large),
            };
        }
    }
}

/// Packs items using the Guillotine strategy with no explicit size cap.
pub fn pack_guillotine<T, I>(items: I) -> Result<PackOutput<T>, PackError>
where
    I: IntoIterator<Item = InputItem<T>>,
{
    Packer::new(Strategy::Guillotine).pack(items)
}

/// Packs items using the MaxRects Best Area Fit strategy with no explicit
/// size cap.
pub fn pack_maxrects<T, I>(items: I) -> Result<PackOutput<T>, PackError>
where
    I: IntoIterator<Item = InputItem<T>>,
{
    Packer::new(Strategy::MaxRectsBestAreaFit).pack(items)
}

fn total_area<T>(items: &[InputItem<T>]) -> u64 {
    items
        .iter()
        .map(InputItem::area)
        .fold(0, u64::saturating_add)
}

/// The side of the square atlas the first attempt uses: large enough to hold
/// the total item area and the largest item dimension, rounded up to a power
/// of two.
fn initial_side<T>(items: &[InputItem<T>]) -> u64 {
    let longest = items
        .iter()
        .map(|item| u64::from(item.longest_side()))
        .max()
        .unwrap_or(0);

    ceil_sqrt(total_area(items))
        .max(longest)
        .checked_next_power_of_two()
        .unwrap_or(u64::MAX)
}

/// A cap generous enough to lay every item out in a single row, doubled once.
fn default_max_size<T>(items: &[InputItem<T>]) -> (u32, u32) {
    let row_length = items
        .iter()
        .map(|item| u64::from(item.longest_side()))
        .fold(0, u64::saturating_add);

    let side = row_length
        .checked_next_power_of_two()
        .map_or(MAX_SIDE, |side| side.saturating_mul(2))
        .min(MAX_SIDE);

    (side as u32, side as u32)
}

fn ceil_sqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;

    // The float estimate can be off by one in either direction.
    while root > 0 && (root - 1).saturating_mul(root - 1) >= value {
        root -= 1;
    }
    while root.saturating_mul(root) < value {
        root += 1;
    }

    root
}

/// Doubles the shorter side, or the width if both are equal.
fn grow(size: (u32, u32)) -> Option<(u32, u32)> {
    if size.0 <= size.1 {
        Some((size.0.checked_mul(2)?, size.1))
    } else {
        Some((size.0, size.1.checked_mul(2)?))
    }
}

fn within(size: (u32, u32), max_size: (u32, u32)) -> bool {
    size.0 <= max_size.0 && size.1 <= max_size.1
}
