//! Inkpress - photo conversion for 4-bit e-paper panels.
//!
//! Turns an uploaded photo into the packed frame a 1200x1600 Spectra-class
//! panel expects, keeps one preview/frame pair per session, and hands frames
//! to the panel driver. This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
