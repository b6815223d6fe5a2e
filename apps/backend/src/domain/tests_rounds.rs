//! Full-round scenarios driven through the rule engine with pinned decks.

use super::bidding::{apply_bid, apply_trump_declaration, BidOutcome};
use super::cards_parsing::try_parse_cards;
use super::cards_types::{Card, Rank, Suit};
use super::dealing::{start_first_round, DealOutcome, ScriptedDealSource};
use super::folding::apply_fold_decision;
use super::state::{BidValue, Phase};
use super::test_support::{assert_deck_conserved, full_game_state, pinned_deck_with_turn_up};
use super::tricks::{advance_trick, apply_card_play, PlayOutcome, TrickAdvance};
use crate::errors::domain::DomainError;

/// Deal order with dealer 0: pass p gives deck[p*4 + i] to seats 1,2,3,0.
/// Column j below is the hand of seat [1,2,3,0][j]; the last row is the
/// blind with the turn-up first.
fn scripted_deck(rows: [[&str; 4]; 6]) -> Vec<Card> {
    let flat: Vec<&str> = rows.into_iter().flatten().collect();
    try_parse_cards(flat).unwrap()
}

/// Happy path: the bidder bids 3 on hearts, stays huge in trump, and takes
/// four of five tricks.
#[test]
fn bidder_makes_contract_and_scores_tricks() {
    let deck = scripted_deck([
        ["HEARTS_JACK", "CLUBS_NINE", "DIAMONDS_NINE", "SPADES_NINE"],
        ["HEARTS_ACE", "CLUBS_TEN", "DIAMONDS_TEN", "SPADES_TEN"],
        ["HEARTS_KING", "CLUBS_JACK", "DIAMONDS_QUEEN", "SPADES_QUEEN"],
        ["HEARTS_QUEEN", "CLUBS_QUEEN", "DIAMONDS_KING", "SPADES_KING"],
        ["SPADES_JACK", "CLUBS_KING", "DIAMONDS_ACE", "SPADES_ACE"],
        // Blind: hearts turn-up, with the left bower (diamond jack) buried
        // so nothing can top the bidder's hearts.
        ["HEARTS_NINE", "HEARTS_TEN", "DIAMONDS_JACK", "CLUBS_ACE"],
    ]);
    let mut state = full_game_state();
    let mut source = ScriptedDealSource::new(vec![deck], Some(0));
    assert_eq!(
        start_first_round(&mut state, &mut source).unwrap(),
        DealOutcome::Bidding
    );

    // Seat 1 bids 3; everyone else passes.
    apply_bid(&mut state, 1, BidValue::Points(3), &mut source).unwrap();
    apply_bid(&mut state, 2, BidValue::Pass, &mut source).unwrap();
    apply_bid(&mut state, 3, BidValue::Pass, &mut source).unwrap();
    let outcome = apply_bid(&mut state, 0, BidValue::Pass, &mut source).unwrap();
    assert_eq!(outcome, BidOutcome::TrumpSelection { winning_bidder: 1 });

    apply_trump_declaration(&mut state, 1, Suit::Hearts).unwrap();
    for seat in [2, 3, 0] {
        apply_fold_decision(&mut state, seat, false).unwrap();
    }
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.current_player, Some(1));

    let tricks: [[&str; 4]; 5] = [
        ["HEARTS_JACK", "CLUBS_NINE", "DIAMONDS_NINE", "SPADES_NINE"],
        ["HEARTS_ACE", "CLUBS_TEN", "DIAMONDS_TEN", "SPADES_TEN"],
        ["HEARTS_KING", "CLUBS_JACK", "DIAMONDS_QUEEN", "SPADES_QUEEN"],
        ["HEARTS_QUEEN", "CLUBS_QUEEN", "DIAMONDS_KING", "SPADES_KING"],
        ["SPADES_JACK", "CLUBS_KING", "DIAMONDS_ACE", "SPADES_ACE"],
    ];
    for (n, plays) in tricks.iter().enumerate() {
        let seats = [1u8, 2, 3, 0];
        for (seat, id) in seats.iter().zip(plays.iter()) {
            let card: Card = id.parse().unwrap();
            let outcome = apply_card_play(&mut state, *seat, card).unwrap();
            if let PlayOutcome::TrickComplete { winner, .. } = outcome {
                // Seat 1's trump runs the first four tricks; seat 0's spade
                // ace takes the last.
                let expected = if n < 4 { 1 } else { 0 };
                assert_eq!(winner, expected, "trick {}", n + 1);
            }
        }
        assert_deck_conserved(&state);
        match advance_trick(&mut state).unwrap() {
            TrickAdvance::NextTrick { leader } => assert_eq!(leader, if n < 4 { 1 } else { 0 }),
            TrickAdvance::RoundOver(result) => {
                assert_eq!(n, 4);
                assert!(result.made);
                assert_eq!(result.deltas, [-1, -4, 0, 0]);
            }
        }
    }

    assert_eq!(state.phase, Phase::RoundOver);
    assert_eq!(state.player(1).unwrap().score, 48);
    assert_eq!(state.player(0).unwrap().score, 51);
    assert_eq!(state.player(2).unwrap().score, 52);
    assert_eq!(state.player(3).unwrap().score, 52);
}

/// All four players pass: the hand is thrown in, dealer advances, round
/// increments, and bidding reopens.
#[test]
fn all_pass_triggers_redeal() {
    let deck = pinned_deck_with_turn_up(Card {
        suit: Suit::Hearts,
        rank: Rank::Ace,
    });
    let mut state = full_game_state();
    let mut source = ScriptedDealSource::new(vec![deck.clone(), deck], Some(2));
    start_first_round(&mut state, &mut source).unwrap();
    assert_eq!((state.round_no, state.dealer), (1, 2));

    let mut last = None;
    for seat in [3u8, 0, 1, 2] {
        last = Some(apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap());
    }
    match last {
        Some(BidOutcome::AllPassed { new_round, .. }) => assert_eq!(new_round, 2),
        other => panic!("expected AllPassed, got {other:?}"),
    }
    assert_eq!(state.phase, Phase::Bidding);
    assert_eq!((state.round_no, state.dealer), (2, 3));
    assert!(state.bids.is_empty());
    assert_deck_conserved(&state);
}

/// Clubs turn-up: no bidding, no folding, trump forced, left of dealer leads.
#[test]
fn dirty_clubs_goes_straight_to_play() {
    let deck = pinned_deck_with_turn_up(Card {
        suit: Suit::Clubs,
        rank: Rank::Ace,
    });
    let mut state = full_game_state();
    let mut source = ScriptedDealSource::new(vec![deck], Some(1));
    start_first_round(&mut state, &mut source).unwrap();

    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.trump, Some(Suit::Clubs));
    assert_eq!(state.current_player, Some(2));
    assert_eq!(state.winning_bidder, Some(2));
    assert!(state.bids.is_empty());
    assert!(state
        .players
        .iter()
        .all(|p| p.fold_decision == super::state::FoldDecision::Stay));

    // Folding after the fact is still forbidden.
    assert_eq!(
        apply_fold_decision(&mut state, 3, true),
        Err(DomainError::PhaseMismatch)
    );
}

/// A player holding the led suit cannot slough; a later legal play succeeds.
#[test]
fn follow_suit_rejection_then_legal_play() {
    let deck = scripted_deck([
        ["SPADES_NINE", "SPADES_QUEEN", "DIAMONDS_NINE", "CLUBS_NINE"],
        ["SPADES_TEN", "HEARTS_ACE", "DIAMONDS_TEN", "CLUBS_TEN"],
        ["SPADES_JACK", "HEARTS_KING", "DIAMONDS_QUEEN", "CLUBS_QUEEN"],
        ["SPADES_KING", "HEARTS_QUEEN", "DIAMONDS_KING", "CLUBS_KING"],
        ["SPADES_ACE", "HEARTS_JACK", "DIAMONDS_ACE", "CLUBS_ACE"],
        ["HEARTS_NINE", "HEARTS_TEN", "DIAMONDS_JACK", "CLUBS_JACK"],
    ]);
    let mut state = full_game_state();
    let mut source = ScriptedDealSource::new(vec![deck], Some(0));
    start_first_round(&mut state, &mut source).unwrap();

    apply_bid(&mut state, 1, BidValue::Points(2), &mut source).unwrap();
    for seat in [2, 3, 0] {
        apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap();
    }
    apply_trump_declaration(&mut state, 1, Suit::Spades).unwrap();
    for seat in [2, 3, 0] {
        apply_fold_decision(&mut state, seat, false).unwrap();
    }

    // Seat 1 leads a spade; seat 2 holds a spade but tries a heart.
    apply_card_play(&mut state, 1, "SPADES_NINE".parse().unwrap()).unwrap();
    let before = state.clone();
    assert_eq!(
        apply_card_play(&mut state, 2, "HEARTS_ACE".parse().unwrap()),
        Err(DomainError::MustFollowSuit)
    );
    // Rejection mutated nothing.
    assert_eq!(
        state.current_trick.as_ref().unwrap().plays.len(),
        before.current_trick.as_ref().unwrap().plays.len()
    );
    assert_eq!(
        state.player(2).unwrap().hand.len(),
        before.player(2).unwrap().hand.len()
    );

    apply_card_play(&mut state, 2, "SPADES_QUEEN".parse().unwrap()).unwrap();
    assert_eq!(state.current_trick.as_ref().unwrap().plays.len(), 2);
}

/// Rounds keep dealing until someone hits the threshold; the winner is set
/// exactly once and the phase never leaves GAME_OVER.
#[test]
fn game_terminates_at_threshold() {
    let mut state = full_game_state();
    for player in &mut state.players {
        player.score = 5;
    }
    let deck = scripted_deck([
        ["HEARTS_JACK", "CLUBS_NINE", "DIAMONDS_NINE", "SPADES_NINE"],
        ["HEARTS_ACE", "CLUBS_TEN", "DIAMONDS_TEN", "SPADES_TEN"],
        ["HEARTS_KING", "CLUBS_JACK", "DIAMONDS_QUEEN", "SPADES_QUEEN"],
        ["HEARTS_QUEEN", "CLUBS_QUEEN", "DIAMONDS_KING", "SPADES_KING"],
        ["HEARTS_TEN", "CLUBS_KING", "DIAMONDS_ACE", "SPADES_ACE"],
        ["HEARTS_NINE", "SPADES_JACK", "DIAMONDS_JACK", "CLUBS_ACE"],
    ]);
    let mut source = ScriptedDealSource::new(vec![deck], Some(0));
    start_first_round(&mut state, &mut source).unwrap();

    apply_bid(&mut state, 1, BidValue::Points(5), &mut source).unwrap();
    for seat in [2, 3, 0] {
        apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap();
    }
    apply_trump_declaration(&mut state, 1, Suit::Hearts).unwrap();
    // Everyone else bails out; the bidder sweeps the round.
    apply_fold_decision(&mut state, 2, true).unwrap();
    apply_fold_decision(&mut state, 3, true).unwrap();
    apply_fold_decision(&mut state, 0, true).unwrap();

    assert_eq!(state.phase, Phase::GameOver);
    assert_eq!(state.winner, Some(1));
    assert_eq!(state.player(1).unwrap().score, 0);
}
