use crate::{free_space, geometry::Rect};

/// A single fixed-size bin filled with the MaxRects heuristic, choosing
/// positions by Best Area Fit.
///
/// Unlike [`GuillotineBin`](crate::GuillotineBin), free rectangles here are
/// maximal and may overlap each other.
#[derive(Debug, Clone)]
pub struct MaxRectsBin {
    size: (u32, u32),
    free: Vec<Rect>,
}

impl MaxRectsBin {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            size,
            free: vec![Rect::from_size(size)],
        }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Places an item of the given size, returning where it went, or `None` if
    /// no free rectangle is large enough.
    pub fn insert(&mut self, size: (u32, u32)) -> Option<Rect> {
        let selection = best_area_fit(&self.free, size)?;
        let placed = Rect::new(selection.x, selection.y, size.0, size.1);

        let split = free_space::split_maxrects(&self.free, &placed);
        self.free = free_space::prune_free_overlapping(split);

        log::trace!(
            "MaxRects placed {}x{} at {:?}, {} free rects remain",
            size.0,
            size.1,
            placed.pos(),
            self.free.len()
        );

        Some(placed)
    }
}

/// How well an item fits in a free rectangle. Lower is better, compared
/// field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score {
    area_fit: u64,
    short_side_fit: u32,
    long_side_fit: u32,
}

impl Score {
    fn new(free: &Rect, size: (u32, u32)) -> Self {
        let area = u64::from(size.0) * u64::from(size.1);
        let leftover_x = free.width - size.0;
        let leftover_y = free.height - size.1;

        Self {
            area_fit: free.area() - area,
            short_side_fit: leftover_x.min(leftover_y),
            long_side_fit: leftover_x.max(leftover_y),
        }
    }
}

/// Picks the free rectangle that wastes the least area around an item of the
/// given size. Ties fall back to the shorter leftover side, then the longer
/// one, then to whichever candidate came first.
pub fn best_area_fit(free: &[Rect], size: (u32, u32)) -> Option<Rect> {
    let mut best: Option<(Score, Rect)> = None;

    for candidate in free.iter().filter(|rect| rect.fits(size)) {
        let score = Score::new(candidate, size);

        match best {
            Some((best_score, _)) if best_score <= score => {}
            _ => best = Some((score, *candidate)),
        }
    }

    best.map(|(_, rect)| rect)
}

/// Packs every size into one bin of the given dimensions, in order. Gives up
/// at the first size that doesn't fit.
pub(crate) fn attempt(bin_size: (u32, u32), sizes: &[(u32, u32)]) -> Option<Vec<Rect>> {
    let mut bin = MaxRectsBin::new(bin_size);

    sizes.iter().map(|&size| bin.insert(size)).collect()
}
