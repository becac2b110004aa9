//! Optional adapters binding the font and image contracts to host
//! libraries. Each lives behind its feature flag; the core only ever sees
//! the traits.

#[cfg(feature = "truetype")]
pub mod font;

#[cfg(feature = "image")]
pub mod image;
