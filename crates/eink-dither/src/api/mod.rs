//! High-level API: the [`EinkDitherer`] builder and [`DitherError`].

mod builder;
mod error;

pub use builder::EinkDitherer;
pub use error::DitherError;
