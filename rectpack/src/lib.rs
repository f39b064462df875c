//! Rectpack is a small library for packing rectangles into a single
//! power-of-two texture atlas. It was built for silly-packer, a tool that
//! bakes images into C++ headers.
//!
//! Two heuristics are available through [`Strategy`]:
//!
//! - [`Strategy::Guillotine`], a first-fit packer that keeps its free space as
//!   a disjoint set of rectangles.
//! - [`Strategy::MaxRectsBestAreaFit`], a best-fit packer that keeps maximal,
//!   overlapping free rectangles and picks the one wasting the least area.
//!
//! Both start from the smallest power-of-two square that could hold the
//! items and keep doubling the shorter side of the atlas until everything
//! fits.
//!
//! ## Example
//! ```
//! use rectpack::{InputItem, Packer, Strategy};
//!
//! // Attach whatever identifies your rectangles as the payload. Here it's
//! // just a name.
//! let my_items = vec![
//!     InputItem::with_payload((128, 64), "banner"),
//!     InputItem::with_payload((64, 64), "icon"),
//!     InputItem::with_payload((1, 300), "divider"),
//! ];
//!
//! let packer = Packer::new(Strategy::MaxRectsBestAreaFit);
//! let output = packer.pack(my_items).unwrap();
//!
//! for item in output.items() {
//!     println!("{} is at {:?}", item.payload(), item.position());
//! }
//! ```

mod error;
pub mod free_space;
mod geometry;
mod guillotine;
mod maxrects;
mod packer;
mod types;

pub use error::*;
pub use geometry::*;
pub use guillotine::GuillotineBin;
pub use maxrects::{best_area_fit, MaxRectsBin};
pub use packer::*;
pub use types::*;

