//! Fast heuristic rollout policy.
//!
//! Plays out the current hand only, with cheap rules of thumb: bid from
//! trump density, declare the longest effective suit, fold weak trump
//! holdings, lead high and follow low. Character multipliers tune the
//! thresholds; the tree search above never consults them.

use crate::domain::bidding::{apply_bid, apply_trump_declaration, legal_bids};
use crate::domain::cards_logic::{effective_suit, is_left_bower, is_right_bower};
use crate::domain::cards_types::{Card, Rank, Suit};
use crate::domain::dealing::DealSource;
use crate::domain::folding::apply_fold_decision;
use crate::domain::state::{BidValue, GameState, Phase, Seat};
use crate::domain::tricks::{advance_trick, apply_card_play, legal_plays, resolve_trick, PlayOutcome};
use crate::errors::domain::DomainError;

use super::config::Character;

/// Hard cap on policy steps per rollout.
const ROLLOUT_STEP_CAP: u32 = 200;

/// Map a seat's per-hand score delta (−5..=+5, lower is better) onto [0, 1]
/// with 1.0 the best outcome.
pub fn normalized_value(delta: i16) -> f64 {
    (((-delta) as f64 + 5.0) / 10.0).clamp(0.0, 1.0)
}

/// True once the hand `start_round` is over, however it ended.
pub fn round_finished(state: &GameState, start_round: u32) -> bool {
    state.phase == Phase::RoundOver
        || state.phase == Phase::GameOver
        || state.round_no != start_round
}

fn trump_cards(hand: &[Card], trump: Suit) -> Vec<Card> {
    hand.iter()
        .copied()
        .filter(|c| effective_suit(*c, trump) == trump)
        .collect()
}

fn high_trump_count(hand: &[Card], trump: Suit) -> usize {
    hand.iter()
        .filter(|c| {
            is_right_bower(**c, trump)
                || is_left_bower(**c, trump)
                || (c.suit == trump && c.rank == Rank::Ace)
        })
        .count()
}

/// The suit this hand would most like as trump: most effective trump cards,
/// high-trump density breaking ties.
fn best_trump_suit(hand: &[Card]) -> (Suit, usize, usize) {
    let mut best = (Suit::Clubs, 0usize, 0usize);
    for suit in Suit::ALL {
        let count = trump_cards(hand, suit).len();
        let high = high_trump_count(hand, suit);
        if count > best.1 || (count == best.1 && high > best.2) {
            best = (suit, count, high);
        }
    }
    best
}

/// Strength used for rollout play ordering only; trump above everything,
/// bowers on top.
fn play_strength(card: Card, trump: Suit) -> u8 {
    if is_right_bower(card, trump) {
        return 13;
    }
    if is_left_bower(card, trump) {
        return 12;
    }
    let rank_value = match card.rank {
        Rank::Ace => 5,
        Rank::King => 4,
        Rank::Queen => 3,
        Rank::Jack => 2,
        Rank::Ten => 1,
        Rank::Nine => 0,
    };
    if card.suit == trump {
        6 + rank_value
    } else {
        rank_value
    }
}

pub fn choose_bid(state: &GameState, seat: Seat, character: &Character) -> BidValue {
    let options = legal_bids(state, seat);
    let hand = state.player(seat).map(|p| p.hand.as_slice()).unwrap_or(&[]);
    let (_, count, high) = best_trump_suit(hand);
    let estimate = (count as f64 * 0.8 + high as f64 * 0.5) * character.aggressiveness;
    let target = estimate.floor() as u8;
    options
        .iter()
        .rev()
        .find(|bid| bid.points().is_some_and(|p| p <= target))
        .copied()
        .unwrap_or(BidValue::Pass)
}

pub fn choose_trump(state: &GameState, seat: Seat) -> Suit {
    let hand = state.player(seat).map(|p| p.hand.as_slice()).unwrap_or(&[]);
    best_trump_suit(hand).0
}

pub fn choose_fold(state: &GameState, seat: Seat, character: &Character) -> bool {
    if state.clubs_turned_up {
        return false;
    }
    let Some(trump) = state.trump else {
        return false;
    };
    let hand = state.player(seat).map(|p| p.hand.as_slice()).unwrap_or(&[]);
    let count = trump_cards(hand, trump).len();
    let high = high_trump_count(hand, trump);
    let stay_score = (count as f64 + high as f64 * 0.5) * character.fold_bias;
    stay_score < 1.5
}

pub fn choose_card(state: &GameState, seat: Seat, character: &Character) -> Option<Card> {
    let options = legal_plays(state, seat);
    let first = *options.first()?;
    let trump = state.trump?;
    let trick = state.current_trick.as_ref()?;

    if trick.plays.is_empty() {
        // Leading: spend strength while ahead of the risk threshold.
        let by_strength = |a: &Card, b: &Card| {
            play_strength(*a, trump).cmp(&play_strength(*b, trump))
        };
        return if character.risk_taking >= 0.75 {
            options.iter().copied().max_by(by_strength)
        } else {
            options.iter().copied().min_by(by_strength)
        };
    }

    // Following: win as cheaply as possible when inclined, else duck low.
    let winner = resolve_trick(&trick.plays, trump)?;
    let winning_card = trick
        .plays
        .iter()
        .find(|p| p.position == winner)
        .map(|p| p.card)?;
    let lead = effective_suit(trick.lead_card()?, trump);
    let mut winners: Vec<Card> = options
        .iter()
        .copied()
        .filter(|c| crate::domain::cards_logic::card_beats(*c, winning_card, lead, trump))
        .collect();
    winners.sort_by_key(|c| play_strength(*c, trump));

    let cheapest_win = winners.first().copied();
    let lowest = options
        .iter()
        .copied()
        .min_by_key(|c| play_strength(*c, trump));
    match cheapest_win {
        Some(card) if character.risk_taking >= 0.5 => Some(card),
        _ => lowest.or(Some(first)),
    }
}

/// Play the current hand out with the heuristic policy and return the
/// normalized value for `seat`.
pub fn rollout(
    state: &mut GameState,
    seat: Seat,
    character: &Character,
    source: &mut dyn DealSource,
) -> Result<f64, DomainError> {
    let start_round = state.round_no;
    let score_before = state
        .player(seat)
        .map(|p| p.score)
        .ok_or_else(|| DomainError::Invariant(format!("no player at seat {seat}")))?;

    let mut steps = 0u32;
    while !round_finished(state, start_round) {
        steps += 1;
        if steps > ROLLOUT_STEP_CAP {
            break;
        }
        let Some(actor) = state.seat_to_act() else {
            break;
        };
        match state.phase {
            Phase::Bidding => {
                let bid = choose_bid(state, actor, character);
                apply_bid(state, actor, bid, source)?;
            }
            Phase::DeclaringTrump => {
                let suit = choose_trump(state, actor);
                apply_trump_declaration(state, actor, suit)?;
            }
            Phase::FoldingDecision => {
                let fold = choose_fold(state, actor, character);
                apply_fold_decision(state, actor, fold)?;
            }
            Phase::Playing => {
                let Some(card) = choose_card(state, actor, character) else {
                    break;
                };
                let outcome = apply_card_play(state, actor, card)?;
                if matches!(outcome, PlayOutcome::TrickComplete { .. }) {
                    advance_trick(state)?;
                }
            }
            _ => break,
        }
    }

    if state.round_no != start_round
        && state.phase != Phase::RoundOver
        && state.phase != Phase::GameOver
    {
        // The hand was thrown in (all passed): no score movement.
        return Ok(normalized_value(0));
    }
    let score_after = state
        .player(seat)
        .map(|p| p.score)
        .ok_or_else(|| DomainError::Invariant(format!("no player at seat {seat}")))?;
    Ok(normalized_value(score_after - score_before))
}
