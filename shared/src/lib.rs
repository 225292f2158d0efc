pub mod calendar;
mod contributions;
mod rank;
mod streak;
mod trophy;

pub use contributions::*;
pub use rank::*;
pub use streak::*;
pub use trophy::*;

pub use strum::IntoEnumIterator;
