//! Fixed parameters of the rule set.

use super::state::Seat;

/// Seats per game, clockwise 0..=3.
pub const PLAYERS: usize = 4;

/// Cards dealt to each seat per round.
pub const HAND_SIZE: usize = 5;

/// Tricks per round.
pub const TRICKS_PER_ROUND: usize = 5;

/// Cards left undealt each round; the top one is the turn-up.
pub const BLIND_SIZE: usize = 4;

pub const DECK_SIZE: usize = 24;

/// Numeric bid bounds; PASS is always available while bidding.
pub const MIN_BID: u8 = 2;
pub const MAX_BID: u8 = 5;

/// Scores count down from here; the first player at zero or below wins.
pub const STARTING_SCORE: i16 = 52;

/// The seat immediately clockwise of `seat`.
pub fn next_seat(seat: Seat) -> Seat {
    (seat + 1) % PLAYERS as u8
}
