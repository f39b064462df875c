/// An axis-aligned rectangle with its origin in the top-left corner.
///
/// Packing never produces negative coordinates, so `Rect` is unsigned
/// throughout. Places that need to say "no rectangle" use `Option<Rect>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    #[inline]
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle of the given size anchored at the origin.
    #[inline]
    pub fn from_size(size: (u32, u32)) -> Self {
        Self::new(0, 0, size.0, size.1)
    }

    #[inline]
    pub fn pos(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Exclusive right edge.
    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        (self.right(), self.bottom())
    }

    #[inline]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Tells whether both dimensions are non-zero.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Tells whether the two rectangles share any area. Edges are treated as
    /// half-open, so rectangles that only touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || self.right() <= other.x
            || self.y >= other.bottom()
            || self.bottom() <= other.y)
    }

    /// Tells whether `other` lies entirely inside this rectangle. Shared edges
    /// count as inside, so every rectangle contains itself.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Tells whether an item of the given size could be placed inside this
    /// rectangle without rotating it.
    #[inline]
    pub fn fits(&self, size: (u32, u32)) -> bool {
        size.0 <= self.width && size.1 <= self.height
    }
}
