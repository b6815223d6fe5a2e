//! Domain layer: pure game rules. No I/O, no clocks, no global randomness;
//! deck ordering comes in through [`dealing::DealSource`].

pub mod bidding;
pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod dealing;
pub mod folding;
pub mod rules;
pub mod scoring;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
pub mod test_support;
#[cfg(test)]
mod test_gens;
#[cfg(test)]
mod tests_props_tricks;
#[cfg(test)]
mod tests_rounds;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, effective_suit, hand_has_effective_suit, is_trump};
pub use cards_types::{full_deck, Card, Rank, Suit};
pub use snapshot::{public_info, snapshot_for, GameSnapshot, PublicGameInfo};
pub use state::{
    BidValue, FoldDecision, GameState, Phase, PlacedBid, PlayerState, Seat, SeatKind, Trick,
    TrickPlay,
};

pub use crate::errors::domain::DomainError;
