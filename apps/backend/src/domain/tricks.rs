//! Trick play: legality, resolution, and round progression.
//!
//! `apply_card_play` leaves a completed trick in place with no player to act;
//! the owning actor calls `advance_trick` after the reveal pause to move on.
//! All suit comparisons use effective suits, so the left bower follows and
//! wins as trump.

use super::cards_logic::{card_beats, effective_suit, hand_has_effective_suit};
use super::cards_types::{Card, Suit};
use super::rules::{next_seat, TRICKS_PER_ROUND};
use super::scoring::{enter_round_over, RoundResult};
use super::state::{GameState, Phase, Seat, Trick, TrickPlay};
use crate::errors::domain::DomainError;

/// Winner of a completed set of plays under `trump`. None for an empty trick.
pub fn resolve_trick(plays: &[TrickPlay], trump: Suit) -> Option<Seat> {
    let first = plays.first()?;
    let lead = effective_suit(first.card, trump);
    let mut best = first;
    for play in &plays[1..] {
        if card_beats(play.card, best.card, lead, trump) {
            best = play;
        }
    }
    Some(best.position)
}

/// Follow-suit legality: the card must be held, the holder must not have
/// folded, and while holding the led effective suit only that suit may be
/// played.
pub fn can_play_card(
    card: Card,
    hand: &[Card],
    current_trick: &Trick,
    trump: Suit,
    folded: bool,
) -> bool {
    if folded || !hand.contains(&card) {
        return false;
    }
    if let Some(lead_card) = current_trick.lead_card() {
        let lead = effective_suit(lead_card, trump);
        if hand_has_effective_suit(hand, lead, trump) && effective_suit(card, trump) != lead {
            return false;
        }
    }
    true
}

/// Cards `seat` may legally play right now; empty when not in turn.
pub fn legal_plays(state: &GameState, seat: Seat) -> Vec<Card> {
    if state.phase != Phase::Playing || state.current_player != Some(seat) {
        return Vec::new();
    }
    let (Some(trump), Some(trick)) = (state.trump, state.current_trick.as_ref()) else {
        return Vec::new();
    };
    let Some(player) = state.player(seat) else {
        return Vec::new();
    };
    player
        .hand
        .iter()
        .copied()
        .filter(|c| can_play_card(*c, &player.hand, trick, trump, player.folded))
        .collect()
}

/// What an accepted card play transitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Continue {
        next_player: Seat,
    },
    /// The trick is full; the state pauses (no player to act) until
    /// `advance_trick`.
    TrickComplete {
        winner: Seat,
        trick_number: u8,
        /// False when this was the round's final trick.
        round_continues: bool,
    },
}

/// Play `card` for `seat`.
pub fn apply_card_play(
    state: &mut GameState,
    seat: Seat,
    card: Card,
) -> Result<PlayOutcome, DomainError> {
    if state.phase != Phase::Playing {
        return Err(DomainError::PhaseMismatch);
    }
    if state.current_player != Some(seat) {
        return Err(DomainError::OutOfTurn);
    }
    let trump = state
        .trump
        .ok_or_else(|| DomainError::Invariant("playing with no trump declared".into()))?;

    {
        let trick = state
            .current_trick
            .as_ref()
            .ok_or_else(|| DomainError::Invariant("playing with no open trick".into()))?;
        let player = state
            .player(seat)
            .ok_or_else(|| DomainError::Invariant(format!("no player at seat {seat}")))?;
        if player.folded {
            return Err(DomainError::PlayerFolded);
        }
        if !player.hand.contains(&card) {
            return Err(DomainError::CardNotInHand);
        }
        if !can_play_card(card, &player.hand, trick, trump, player.folded) {
            return Err(DomainError::MustFollowSuit);
        }
    }

    if let Some(player) = state.player_mut(seat) {
        player.hand.retain(|c| *c != card);
    }
    let active = state.active_player_count();
    let (complete, trick_number) = {
        let trick = state
            .current_trick
            .as_mut()
            .ok_or_else(|| DomainError::Invariant("open trick vanished".into()))?;
        trick.plays.push(TrickPlay {
            position: seat,
            card,
        });
        (trick.plays.len() >= active, trick.number)
    };

    if !complete {
        let next_player = state
            .next_active_seat_from(next_seat(seat))
            .ok_or_else(|| DomainError::Invariant("no active player to continue".into()))?;
        state.current_player = Some(next_player);
        return Ok(PlayOutcome::Continue { next_player });
    }

    let winner = {
        let trick = state
            .current_trick
            .as_mut()
            .ok_or_else(|| DomainError::Invariant("open trick vanished".into()))?;
        let winner = resolve_trick(&trick.plays, trump)
            .ok_or_else(|| DomainError::Invariant("completed trick with no plays".into()))?;
        trick.winner_position = Some(winner);
        winner
    };
    if let Some(player) = state.player_mut(winner) {
        player.tricks_taken += 1;
    }
    // Reveal pause: the finished trick stays visible and nobody may act.
    state.current_player = None;
    let round_continues = (state.tricks.len() + 1) < TRICKS_PER_ROUND;
    Ok(PlayOutcome::TrickComplete {
        winner,
        trick_number,
        round_continues,
    })
}

/// What `advance_trick` transitioned into.
#[derive(Debug, Clone, PartialEq)]
pub enum TrickAdvance {
    NextTrick { leader: Seat },
    RoundOver(RoundResult),
}

/// Move past a completed trick: archive it and either open the next trick led
/// by the winner or score the round after the fifth.
pub fn advance_trick(state: &mut GameState) -> Result<TrickAdvance, DomainError> {
    if state.phase != Phase::Playing {
        return Err(DomainError::PhaseMismatch);
    }
    let trick = state
        .current_trick
        .take()
        .ok_or_else(|| DomainError::Invariant("no trick to advance past".into()))?;
    let winner = match trick.winner_position {
        Some(winner) => winner,
        None => {
            // Not actually complete; put it back untouched.
            state.current_trick = Some(trick);
            return Err(DomainError::Invariant("advancing an unfinished trick".into()));
        }
    };
    let number = trick.number;
    state.tricks.push(trick);

    if state.tricks.len() >= TRICKS_PER_ROUND {
        let result = enter_round_over(state)?;
        return Ok(TrickAdvance::RoundOver(result));
    }

    state.current_trick = Some(Trick::new(number + 1, winner));
    state.current_player = Some(winner);
    Ok(TrickAdvance::NextTrick { leader: winner })
}
