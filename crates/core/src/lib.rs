//! Hand evaluation and scoring for a poker deck-builder. Keep this crate free of IO.

pub mod cards;
pub mod config;
pub mod content;
pub mod deck;
pub mod effects;
pub mod events;
pub mod hand;
pub mod inventory;
pub mod round;
pub mod rules;
pub mod scoring;

pub use cards::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use effects::*;
pub use events::*;
pub use hand::*;
pub use inventory::*;
pub use round::*;
pub use rules::*;
pub use scoring::*;
