//! Bidding and trump declaration.

use super::dealing::{deal_next_round, DealOutcome, DealSource};
use super::rules::{next_seat, MAX_BID, MIN_BID, PLAYERS};
use super::state::{BidValue, FoldDecision, GameState, Phase, PlacedBid, Seat};
use crate::errors::domain::DomainError;
use crate::domain::cards_types::Suit;

/// What an accepted bid transitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidOutcome {
    /// More seats still owe a bid.
    Continue { next_bidder: Seat },
    /// All four passed: the hand was thrown in and redealt.
    AllPassed { new_round: u32, redeal: DealOutcome },
    /// At least one numeric bid: the winner now declares trump.
    TrumpSelection { winning_bidder: Seat },
}

/// Legal bids for `seat`: PASS plus every amount strictly above the current
/// high bid. Empty when it is not this seat's turn to bid.
pub fn legal_bids(state: &GameState, seat: Seat) -> Vec<BidValue> {
    if state.phase != Phase::Bidding || state.current_bidder != Some(seat) {
        return Vec::new();
    }
    let floor = state.highest_bid.map(|b| b + 1).unwrap_or(MIN_BID);
    let mut bids = vec![BidValue::Pass];
    bids.extend((floor..=MAX_BID).map(BidValue::Points));
    bids
}

/// Place a bid for `seat`. Requires the Bidding phase and being in turn.
///
/// A numeric bid must strictly exceed the current high bid. After the fourth
/// bid the round either moves to trump declaration or, when everyone passed,
/// is thrown in and redealt (dealer advances, round increments).
pub fn apply_bid(
    state: &mut GameState,
    seat: Seat,
    bid: BidValue,
    source: &mut dyn DealSource,
) -> Result<BidOutcome, DomainError> {
    if state.phase != Phase::Bidding {
        return Err(DomainError::PhaseMismatch);
    }
    if state.current_bidder != Some(seat) {
        return Err(DomainError::OutOfTurn);
    }
    if let Some(points) = bid.points() {
        if !(MIN_BID..=MAX_BID).contains(&points) {
            return Err(DomainError::InvalidBid);
        }
        if let Some(high) = state.highest_bid {
            if points <= high {
                return Err(DomainError::BidTooLow);
            }
        }
    }

    state.bids.push(PlacedBid {
        position: seat,
        value: bid,
    });
    if let Some(points) = bid.points() {
        state.highest_bid = Some(points);
        state.winning_bidder = Some(seat);
    }

    if state.bids.len() < PLAYERS {
        let next_bidder = next_unbid_seat(state, seat);
        state.current_bidder = Some(next_bidder);
        return Ok(BidOutcome::Continue { next_bidder });
    }

    // Fourth bid placed.
    state.current_bidder = None;
    match state.winning_bidder {
        Some(winning_bidder) => {
            state.phase = Phase::DeclaringTrump;
            Ok(BidOutcome::TrumpSelection { winning_bidder })
        }
        None => {
            let redeal = deal_next_round(state, source)?;
            Ok(BidOutcome::AllPassed {
                new_round: state.round_no,
                redeal,
            })
        }
    }
}

fn next_unbid_seat(state: &GameState, from: Seat) -> Seat {
    let mut seat = next_seat(from);
    for _ in 0..PLAYERS {
        if !state.bids.iter().any(|b| b.position == seat) {
            return seat;
        }
        seat = next_seat(seat);
    }
    seat
}

/// Declare trump; only the winning bidder, only in DeclaringTrump.
///
/// The blind is set aside and every non-bidder still owes a fold decision;
/// the bidder implicitly stays.
pub fn apply_trump_declaration(
    state: &mut GameState,
    seat: Seat,
    suit: Suit,
) -> Result<(), DomainError> {
    if state.phase != Phase::DeclaringTrump {
        return Err(DomainError::PhaseMismatch);
    }
    if state.winning_bidder != Some(seat) {
        return Err(DomainError::OutOfTurn);
    }
    state.trump = Some(suit);
    if let Some(bidder) = state.player_mut(seat) {
        bidder.fold_decision = FoldDecision::Stay;
    }
    state.phase = Phase::FoldingDecision;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::{Card, Rank};
    use crate::domain::dealing::{start_first_round, ScriptedDealSource};
    use crate::domain::test_support::{full_game_state, pinned_deck_with_turn_up};

    fn bidding_state() -> (GameState, ScriptedDealSource) {
        let mut state = full_game_state();
        let deck = pinned_deck_with_turn_up(Card {
            suit: Suit::Hearts,
            rank: Rank::Ace,
        });
        let mut source = ScriptedDealSource::new(vec![deck.clone(), deck], Some(0));
        start_first_round(&mut state, &mut source).unwrap();
        (state, source)
    }

    #[test]
    fn bids_rotate_clockwise_from_left_of_dealer() {
        let (mut state, mut source) = bidding_state();
        assert_eq!(state.current_bidder, Some(1));
        let outcome = apply_bid(&mut state, 1, BidValue::Pass, &mut source).unwrap();
        assert_eq!(outcome, BidOutcome::Continue { next_bidder: 2 });
        assert_eq!(state.current_bidder, Some(2));
    }

    #[test]
    fn out_of_turn_bid_is_rejected() {
        let (mut state, mut source) = bidding_state();
        assert_eq!(
            apply_bid(&mut state, 3, BidValue::Pass, &mut source),
            Err(DomainError::OutOfTurn)
        );
    }

    #[test]
    fn bid_must_exceed_current_high() {
        let (mut state, mut source) = bidding_state();
        apply_bid(&mut state, 1, BidValue::Points(3), &mut source).unwrap();
        assert_eq!(
            apply_bid(&mut state, 2, BidValue::Points(3), &mut source),
            Err(DomainError::BidTooLow)
        );
        assert_eq!(
            apply_bid(&mut state, 2, BidValue::Points(6), &mut source),
            Err(DomainError::InvalidBid)
        );
        apply_bid(&mut state, 2, BidValue::Points(4), &mut source).unwrap();
        assert_eq!(state.highest_bid, Some(4));
        assert_eq!(state.winning_bidder, Some(2));
    }

    #[test]
    fn earliest_high_bidder_wins_ties_by_never_allowing_equal_bids() {
        let (mut state, mut source) = bidding_state();
        apply_bid(&mut state, 1, BidValue::Points(2), &mut source).unwrap();
        apply_bid(&mut state, 2, BidValue::Pass, &mut source).unwrap();
        apply_bid(&mut state, 3, BidValue::Pass, &mut source).unwrap();
        let outcome = apply_bid(&mut state, 0, BidValue::Pass, &mut source).unwrap();
        assert_eq!(outcome, BidOutcome::TrumpSelection { winning_bidder: 1 });
        assert_eq!(state.phase, Phase::DeclaringTrump);
    }

    #[test]
    fn all_pass_redeals_with_dealer_advanced() {
        let (mut state, mut source) = bidding_state();
        for seat in [1, 2, 3, 0] {
            apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap();
        }
        assert_eq!(state.phase, Phase::Bidding);
        assert_eq!(state.round_no, 2);
        assert_eq!(state.dealer, 1);
        assert!(state.bids.is_empty());
        assert_eq!(state.current_bidder, Some(2));
    }

    #[test]
    fn trump_declaration_moves_to_folding() {
        let (mut state, mut source) = bidding_state();
        apply_bid(&mut state, 1, BidValue::Points(3), &mut source).unwrap();
        for seat in [2, 3, 0] {
            apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap();
        }
        assert_eq!(
            apply_trump_declaration(&mut state, 2, Suit::Spades),
            Err(DomainError::OutOfTurn)
        );
        apply_trump_declaration(&mut state, 1, Suit::Spades).unwrap();
        assert_eq!(state.phase, Phase::FoldingDecision);
        assert_eq!(state.trump, Some(Suit::Spades));
        assert_eq!(
            state.player(1).unwrap().fold_decision,
            FoldDecision::Stay
        );
    }

    #[test]
    fn legal_bids_shrink_as_high_bid_rises() {
        let (mut state, mut source) = bidding_state();
        assert_eq!(legal_bids(&state, 1).len(), 5); // PASS, 2, 3, 4, 5
        apply_bid(&mut state, 1, BidValue::Points(4), &mut source).unwrap();
        assert_eq!(
            legal_bids(&state, 2),
            vec![BidValue::Pass, BidValue::Points(5)]
        );
        assert!(legal_bids(&state, 3).is_empty());
    }
}
