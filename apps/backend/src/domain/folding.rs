//! Stay/fold decisions after trump is declared.

use super::rules::TRICKS_PER_ROUND;
use super::scoring::{enter_round_over, RoundResult};
use super::state::{FoldDecision, GameState, Phase, Seat, Trick};
use crate::errors::domain::DomainError;

/// What an accepted fold decision transitioned into.
#[derive(Debug, Clone, PartialEq)]
pub enum FoldOutcome {
    /// Other non-bidders still owe a decision.
    Waiting,
    /// Everyone decided; play begins with the bidder leading.
    PlayBegins { leader: Seat },
    /// Every non-bidder folded: the bidder takes all five tricks uncontested
    /// and the round is scored immediately.
    RoundOver(RoundResult),
}

/// Record a stay/fold decision for `seat`.
///
/// The winning bidder never decides (they are committed); folding is
/// forbidden when clubs are turned up; each non-bidder decides exactly once.
pub fn apply_fold_decision(
    state: &mut GameState,
    seat: Seat,
    fold: bool,
) -> Result<FoldOutcome, DomainError> {
    if state.phase != Phase::FoldingDecision {
        return Err(DomainError::PhaseMismatch);
    }
    let bidder = state
        .winning_bidder
        .ok_or_else(|| DomainError::Invariant("folding phase with no bidder".into()))?;
    if seat == bidder {
        return Err(DomainError::OutOfTurn);
    }
    if fold && state.clubs_turned_up {
        return Err(DomainError::FoldForbidden);
    }
    {
        let player = state
            .player(seat)
            .ok_or_else(|| DomainError::Invariant(format!("no player at seat {seat}")))?;
        if player.fold_decision != FoldDecision::Undecided {
            return Err(DomainError::AlreadyDecided);
        }
    }

    if fold {
        let mut discarded = Vec::new();
        if let Some(player) = state.player_mut(seat) {
            player.fold_decision = FoldDecision::Fold;
            player.folded = true;
            discarded = player.hand.drain(..).collect();
        }
        state.discards.extend(discarded);
    } else if let Some(player) = state.player_mut(seat) {
        player.fold_decision = FoldDecision::Stay;
    }

    let undecided = state
        .players
        .iter()
        .any(|p| p.fold_decision == FoldDecision::Undecided);
    if undecided {
        return Ok(FoldOutcome::Waiting);
    }

    if state.active_player_count() == 1 {
        // Nobody stayed in against the bidder.
        if let Some(player) = state.player_mut(bidder) {
            player.tricks_taken = TRICKS_PER_ROUND as u8;
        }
        let result = enter_round_over(state)?;
        return Ok(FoldOutcome::RoundOver(result));
    }

    let leader = state
        .next_active_seat_from(bidder)
        .ok_or_else(|| DomainError::Invariant("no active player to lead".into()))?;
    state.current_trick = Some(Trick::new(1, leader));
    state.current_player = Some(leader);
    state.phase = Phase::Playing;
    Ok(FoldOutcome::PlayBegins { leader })
}
