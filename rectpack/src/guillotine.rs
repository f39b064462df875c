use crate::{free_space, geometry::Rect};

/// A single fixed-size bin filled with the Guillotine heuristic.
///
/// Items go into the first free rectangle they fit in. The unused part of
/// that rectangle is cut into a strip to the right of the item and a strip
/// below it, and the free set is then cleaned up so that it stays disjoint.
#[derive(Debug, Clone)]
pub struct GuillotineBin {
    size: (u32, u32),
    free: Vec<Rect>,
}

impl GuillotineBin {
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
        let index = self.free.iter().position(|free| free.fits(size))?;
        let selection = self.free.remove(index);

        let placed = Rect::new(selection.x, selection.y, size.0, size.1);

        let right = Rect::new(
            selection.x + size.0,
            selection.y,
            selection.width - size.0,
            selection.height,
        );
        let bottom = Rect::new(
            selection.x,
            selection.y + size.1,
            selection.width,
            selection.height - size.1,
        );

        let mut free = std::mem::take(&mut self.free);
        free.extend([right, bottom].iter().copied().filter(Rect::is_positive));
        self.free = free_space::cleanup_splits(free);

        log::trace!(
            "Guillotine placed {}x{} at {:?}, {} free rects remain",
            size.0,
            size.1,
            placed.pos(),
            self.free.len()
        );

        Some(placed)
    }
}

/// Packs every size into one bin of the given dimensions, in order. Gives up
/// at the first size that doesn't fit.
pub(crate) fn attempt(bin_size: (u32, u32), sizes: &[(u32, u32)]) -> Option<Vec<Rect>> {
    let mut bin = GuillotineBin::new(bin_size);

    sizes.iter().map(|&size| bin.insert(size)).collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fills_square_exactly() {
        let mut bin = GuillotineBin::new((4, 4));

        assert_eq!(bin.insert((2, 2)), Some(Rect::new(0, 0, 2, 2)));
        assert_eq!(
            bin.free_rects(),
            &[Rect::new(2, 0, 2, 2), Rect::new(0, 2, 4, 2)]
        );

        assert_eq!(bin.insert((2, 2)), Some(Rect::new(2, 0, 2, 2)));
        assert_eq!(bin.insert((4, 2)), Some(Rect::new(0, 2, 4, 2)));
        assert!(bin.free_rects().is_empty());

        assert_eq!(bin.insert((1, 1)), None);
    }

    #[test]
    fn first_fit_not_best_fit() {
        let mut bin = GuillotineBin::new((8, 4));

        assert_eq!(bin.insert((4, 2)), Some(Rect::new(0, 0, 4, 2)));

        // Free space is now the 4x2 right of the item and the 8x2 strip
        // below it. A 2x2 item fits both; the first one wins.
        assert_eq!(
            bin.free_rects(),
            &[Rect::new(4, 0, 4, 2), Rect::new(0, 2, 8, 2)]
        );
        assert_eq!(bin.insert((2, 2)), Some(Rect::new(4, 0, 2, 2)));
    }

    #[test]
    fn too_large_item_fails() {
        let mut bin = GuillotineBin::new((16, 16));

        assert_eq!(bin.insert((17, 1)), None);
        assert_eq!(bin.free_rects(), &[Rect::new(0, 0, 16, 16)]);
    }

    #[test]
    fn attempt_stops_at_first_failure() {
        assert_eq!(attempt((4, 4), &[(4, 4), (1, 1)]), None);
        assert_eq!(
            attempt((4, 4), &[(4, 2), (4, 2)]),
            Some(vec![Rect::new(0, 0, 4, 2), Rect::new(0, 2, 4, 2)])
        );
    }
}
