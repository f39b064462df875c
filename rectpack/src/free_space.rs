//! Maintenance of the free-space set shared by both packing strategies.
//!
//! Every operation here consumes or borrows a free list and produces a new
//! one; nothing is edited in place while it is being iterated.

use crate::geometry::Rect;

/// Splits every free rectangle that overlaps `placed` into the parts that lie
/// outside the overlapping region.
///
/// The overlap is clamped to the free rectangle, and up to four residuals are
/// produced in a fixed order: the part below the overlap, the part above it
/// (both spanning the full free width), then the parts left and right of it
/// (both spanning only the overlap's rows). Rectangles that don't overlap are
/// passed through untouched.
pub fn split_against(free: &[Rect], placed: &Rect) -> Vec<Rect> {
    let mut new_free = Vec::with_capacity(free.len() + 3);

    for free_rect in free {
        if !free_rect.overlaps(placed) {
            new_free.push(*free_rect);
            continue;
        }

        let x1 = free_rect.x.max(placed.x);
        let y1 = free_rect.y.max(placed.y);
        let x2 = free_rect.right().min(placed.right());
        let y2 = free_rect.bottom().min(placed.bottom());

        if x1 >= x2 || y1 >= y2 {
            new_free.push(*free_rect);
            continue;
        }

        if y2 < free_rect.bottom() {
            new_free.push(Rect::new(
                free_rect.x,
                y2,
                free_rect.width,
                free_rect.bottom() - y2,
            ));
        }

        if y1 > free_rect.y {
            new_free.push(Rect::new(
                free_rect.x,
                free_rect.y,
                free_rect.width,
                y1 - free_rect.y,
            ));
        }

        if x1 > free_rect.x {
            new_free.push(Rect::new(free_rect.x, y1, x1 - free_rect.x, y2 - y1));
        }

        if x2 < free_rect.right() {
            new_free.push(Rect::new(x2, y1, free_rect.right() - x2, y2 - y1));
        }
    }

    new_free
}

/// Removes every free rectangle that is contained in another one.
///
/// Identical rectangles contain each other; of those, the first occurrence
/// survives and the later copies are dropped.
pub fn prune_contained(free: Vec<Rect>) -> Vec<Rect> {
    let redundant: Vec<bool> = free
        .iter()
        .enumerate()
        .map(|(i, rect)| {
            free.iter().enumerate().any(|(j, other)| {
                i != j && other.contains(rect) && (other != rect || j < i)
            })
        })
        .collect();

    free.into_iter()
        .zip(redundant)
        .filter_map(|(rect, redundant)| if redundant { None } else { Some(rect) })
        .collect()
}

/// Guillotine cleanup: prunes contained rectangles, then rebuilds the set so
/// that no two free rectangles overlap.
///
/// Each surviving rectangle, in order, carves its area out of everything
/// accumulated before it and is then appended whole. The result depends on
/// the order of the input.
pub fn cleanup_splits(free: Vec<Rect>) -> Vec<Rect> {
    prune_contained(free)
        .into_iter()
        .fold(Vec::new(), |accumulated, rect| {
            let mut result = split_against(&accumulated, &rect);
            result.push(rect);
            result
        })
}

/// MaxRects split: every free rectangle overlapping `placed` is replaced by
/// the maximal strips around the placement. Left and right strips span the
/// free rectangle's full height; top and bottom strips span its full width.
///
/// The resulting strips may overlap each other.
pub fn split_maxrects(free: &[Rect], placed: &Rect) -> Vec<Rect> {
    let mut new_free = Vec::with_capacity(free.len() + 4);

    for free_rect in free {
        if !free_rect.overlaps(placed) {
            new_free.push(*free_rect);
            continue;
        }

        let mut push_if_positive = |rect: Rect| {
            if rect.is_positive() {
                new_free.push(rect);
            }
        };

        if placed.x > free_rect.x {
            push_if_positive(Rect::new(
                free_rect.x,
                free_rect.y,
                placed.x - free_rect.x,
                free_rect.height,
            ));
        }

        if placed.right() < free_rect.right() {
            push_if_positive(Rect::new(
                placed.right(),
                free_rect.y,
                free_rect.right() - placed.right(),
                free_rect.height,
            ));
        }

        if placed.y > free_rect.y {
            push_if_positive(Rect::new(
                free_rect.x,
                free_rect.y,
                free_rect.width,
                placed.y - free_rect.y,
            ));
        }

        if placed.bottom() < free_rect.bottom() {
            push_if_positive(Rect::new(
                free_rect.x,
                placed.bottom(),
                free_rect.width,
                free_rect.bottom() - placed.bottom(),
            ));
        }
    }

    new_free
}

/// MaxRects pruning. Free rectangles are allowed to overlap between
/// placements, so only containment is removed.
#[inline]
pub fn prune_free_overlapping(free: Vec<Rect>) -> Vec<Rect> {
    prune_contained(free)
}
