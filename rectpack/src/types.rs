use crate::geometry::Rect;

/// An input to the rectangle packing routines.
///
/// `InputItem` is a 2D size plus a payload that the packer never looks at.
/// Consumers put whatever they need to identify the item in the payload, like
/// an index or the image itself, and get it back next to the item's placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputItem<T = ()> {
    pub(crate) size: (u32, u32),
    pub(crate) payload: T,
}

impl InputItem<()> {
    #[inline]
    pub fn new(size: (u32, u32)) -> Self {
        Self { size, payload: () }
    }
}

impl<T> InputItem<T> {
    #[inline]
    pub fn with_payload(size: (u32, u32), payload: T) -> Self {
        Self { size, payload }
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub(crate) fn area(&self) -> u64 {
        u64::from(self.size.0) * u64::from(self.size.1)
    }

    pub(crate) fn longest_side(&self) -> u32 {
        self.size.0.max(self.size.1)
    }
}

/// An item that was placed by a packing function.
///
/// `OutputItem` corresponds 1:1 to the `InputItem` it came from. It carries
/// the input's payload, as well as position and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputItem<T = ()> {
    pub(crate) payload: T,
    pub(crate) rect: Rect,
}

impl<T> OutputItem<T> {
    #[inline]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    #[inline]
    pub fn into_payload(self) -> T {
        self.payload
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        self.rect.pos()
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.rect.size()
    }

    #[inline]
    pub fn min(&self) -> (u32, u32) {
        self.rect.pos()
    }

    #[inline]
    pub fn max(&self) -> (u32, u32) {
        self.rect.max()
    }
}

/// The results from a successful packing run.
///
/// Items are listed in the order the strategy placed them, which is the
/// strategy's sort order rather than the order they were passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOutput<T = ()> {
    pub(crate) size: (u32, u32),
    pub(crate) items: Vec<OutputItem<T>>,
}

impl<T> PackOutput<T> {
    /// Width and height of the atlas. Both are powers of two.
    #[inline]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    #[inline]
    pub fn items(&self) -> &[OutputItem<T>] {
        &self.items
    }

    #[inline]
    pub fn into_items(self) -> Vec<OutputItem<T>> {
        self.items
    }

    /// The placement of every item, index-aligned with [`items`](Self::items).
    pub fn placements(&self) -> impl Iterator<Item = Rect> + '_ {
        self.items.iter().map(OutputItem::rect)
    }
}
