//! Round scoring and game termination.
//!
//! Scores count down from the starting value; the first player at zero or
//! below wins. A bidder who makes the bid subtracts the tricks taken, as does
//! every staying non-bidder who took at least one trick. A set bidder adds
//! the bid amount instead.

use super::rules::PLAYERS;
use super::state::{FoldDecision, GameState, Phase, Seat};
use crate::errors::domain::DomainError;

/// Outcome of scoring one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundResult {
    pub deltas: [i16; PLAYERS],
    pub bidder: Seat,
    /// Contract size; 0 on dirty clubs, where there is no numeric bid and the
    /// bidder can never be set.
    pub bid: u8,
    pub bidder_tricks: u8,
    pub made: bool,
    pub game_over: bool,
}

/// Score deltas for the round as played so far, without mutating anything.
pub fn compute_round_deltas(state: &GameState) -> Result<RoundResult, DomainError> {
    let bidder = state
        .winning_bidder
        .ok_or_else(|| DomainError::Invariant("scoring a round with no bidder".into()))?;
    let bid = state.highest_bid.unwrap_or(0);
    let bidder_tricks = state
        .player(bidder)
        .map(|p| p.tricks_taken)
        .unwrap_or_default();
    let made = bidder_tricks >= bid;

    let mut deltas = [0i16; PLAYERS];
    if made {
        for player in &state.players {
            let idx = player.position as usize;
            if player.position == bidder {
                deltas[idx] = -(bidder_tricks as i16);
            } else if player.fold_decision == FoldDecision::Stay && player.tricks_taken >= 1 {
                deltas[idx] = -(player.tricks_taken as i16);
            }
        }
    } else {
        deltas[bidder as usize] = bid as i16;
    }

    Ok(RoundResult {
        deltas,
        bidder,
        bid,
        bidder_tricks,
        made,
        game_over: false,
    })
}

/// Apply this round's deltas and move to ROUND_OVER, or to GAME_OVER once any
/// player reaches the winning threshold (ties broken by lowest seat).
pub fn enter_round_over(state: &mut GameState) -> Result<RoundResult, DomainError> {
    let mut result = compute_round_deltas(state)?;

    for player in &mut state.players {
        player.score += result.deltas[player.position as usize];
    }
    state.current_player = None;

    let threshold_reached = state.players.iter().any(|p| p.score <= 0);
    if threshold_reached {
        let winner = state
            .players
            .iter()
            .min_by_key(|p| (p.score, p.position))
            .map(|p| p.position)
            .ok_or_else(|| DomainError::Invariant("no players at game end".into()))?;
        state.winner = Some(winner);
        state.phase = Phase::GameOver;
        result.game_over = true;
    } else {
        state.phase = Phase::RoundOver;
    }

    Ok(result)
}
