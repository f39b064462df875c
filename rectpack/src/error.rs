use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("Item {index} has an invalid size of {}x{}; both dimensions must be positive", .size.0, .size.1)]
    InvalidItemSize { index: usize, size: (u32, u32) },

    #[error(
        "Could not fit {requested_area} square pixels of items into an atlas no larger than {}x{}",
        .max_size.0,
        .max_size.1
    )]
    AtlasTooLarge {
        requested_area: u64,
        max_size: (u32, u32),
    },
}
