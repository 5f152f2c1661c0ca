pub mod animation;
pub mod bridge;
pub mod clock;
pub mod collection;
pub mod config;
pub mod display;
pub mod host;
pub mod laters;
pub mod overview;
pub mod scroll;
pub mod signal;
pub mod usage;

// Exposed for benchmarks
#[doc(hidden)]
pub mod layout;

mod error;

#[cfg(test)]
mod tests;

pub use bridge::ChangeNotificationBridge;
pub use collection::{AppCollectionView, Entry, SectionKind, Sections};
pub use display::{DisplaySnapshot, VerticalAppDisplay};
pub use error::{Error, Result};
pub use layout::GridLayoutEngine;
pub use scroll::KineticScrollController;

pub use vgrid_types::*;
