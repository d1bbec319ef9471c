//! Loading and validation of the JSON game data under `assets/`.

pub mod load;

pub use load::*;
