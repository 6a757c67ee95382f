//! Data models on both sides of the translation

mod upstream;
mod vehicle;

pub use upstream::*;
pub use vehicle::*;
