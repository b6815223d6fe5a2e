//! Property-based tests for trick resolution and play legality.

use proptest::prelude::*;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::bidding::apply_bid;
use super::cards_logic::effective_suit;
use super::cards_types::{Card, Rank, Suit};
use super::dealing::{start_first_round, ScriptedDealSource};
use super::folding::apply_fold_decision;
use super::state::{BidValue, GameState, Phase, Seat, TrickPlay};
use super::test_gens;
use super::test_support::{assert_deck_conserved, full_game_state, playing_state};
use super::tricks::{
    advance_trick, apply_card_play, can_play_card, legal_plays, resolve_trick, PlayOutcome,
};
use crate::domain::bidding::apply_trump_declaration;

/// Independent winner oracle: rank every play by (trump beats lead beats
/// off-suit, explicit bower-aware strength) and take the maximum.
fn oracle_trick_winner(plays: &[TrickPlay], trump: Suit) -> Seat {
    let lead = effective_suit(plays[0].card, trump);
    let strength = |card: Card| -> u32 {
        let eff = effective_suit(card, trump);
        let rank_points = if eff == trump {
            if card.rank == Rank::Jack && card.suit == trump {
                8 // right bower
            } else if card.rank == Rank::Jack {
                7 // left bower
            } else {
                match card.rank {
                    Rank::Ace => 6,
                    Rank::King => 5,
                    Rank::Queen => 4,
                    Rank::Ten => 3,
                    Rank::Nine => 2,
                    Rank::Jack => 0,
                }
            }
        } else {
            match card.rank {
                Rank::Ace => 6,
                Rank::King => 5,
                Rank::Queen => 4,
                Rank::Jack => 3,
                Rank::Ten => 2,
                Rank::Nine => 1,
            }
        };
        let tier = if eff == trump {
            2
        } else if eff == lead {
            1
        } else {
            0
        };
        tier * 100 + rank_points
    };
    plays
        .iter()
        .max_by_key(|p| strength(p.card))
        .map(|p| p.position)
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1024))]

    /// The domain's winner matches an independent oracle on random tricks.
    #[test]
    fn prop_winner_matches_oracle(
        plays in test_gens::complete_trick(),
        trump in test_gens::suit(),
    ) {
        let winner = resolve_trick(&plays, trump);
        prop_assert_eq!(winner, Some(oracle_trick_winner(&plays, trump)));
    }

    /// If any trump-effective card was played the winner played trump;
    /// otherwise the winner followed the led effective suit.
    #[test]
    fn prop_winner_played_trump_or_lead(
        plays in test_gens::complete_trick(),
        trump in test_gens::suit(),
    ) {
        let winner = resolve_trick(&plays, trump).unwrap();
        let winner_card = plays.iter().find(|p| p.position == winner).unwrap().card;
        let lead = effective_suit(plays[0].card, trump);
        let any_trump = plays.iter().any(|p| effective_suit(p.card, trump) == trump);
        if any_trump {
            prop_assert_eq!(effective_suit(winner_card, trump), trump);
        } else {
            prop_assert_eq!(effective_suit(winner_card, trump), lead);
        }
    }

    /// Follow-suit legality: while holding the led effective suit, exactly
    /// the cards of that suit are legal; otherwise the whole hand is.
    #[test]
    fn prop_follow_suit_legality(
        (hands, _rest) in test_gens::dealt_hands(),
        trump in test_gens::suit(),
        lead_pick in 0usize..5,
    ) {
        let mut state = playing_state(trump, 0, hands);
        let lead_card = state.player(0).unwrap().hand[lead_pick];
        apply_card_play(&mut state, 0, lead_card).unwrap();
        let lead = effective_suit(lead_card, trump);

        let hand = state.player(1).unwrap().hand.clone();
        let legal = legal_plays(&state, 1);
        let holds_lead = hand.iter().any(|c| effective_suit(*c, trump) == lead);
        for card in &hand {
            let expected = !holds_lead || effective_suit(*card, trump) == lead;
            prop_assert_eq!(
                legal.contains(card),
                expected,
                "card {} legality mismatch (lead {:?}, trump {:?})",
                card, lead, trump
            );
        }
        // Every illegal play is rejected without mutating the trick.
        for card in &hand {
            if !legal.contains(card) {
                let before = state.current_trick.clone();
                prop_assert!(apply_card_play(&mut state, 1, *card).is_err());
                prop_assert_eq!(&state.current_trick, &before);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random legal playouts keep the deck conserved at every step and end
    /// the round after exactly five tricks (or an all-fold).
    #[test]
    fn prop_random_playout_conserves_deck(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = full_game_state();
        let mut source = ScriptedDealSource::new(Vec::new(), Some(0));
        start_first_round(&mut state, &mut source).unwrap();
        assert_deck_conserved(&state);

        let start_round = state.round_no;
        let mut steps = 0;
        while state.phase != Phase::RoundOver
            && state.phase != Phase::GameOver
            && state.round_no == start_round
        {
            steps += 1;
            prop_assert!(steps < 100, "playout did not terminate");
            match state.phase {
                Phase::Bidding => {
                    let seat = state.current_bidder.unwrap();
                    let bids = super::bidding::legal_bids(&state, seat);
                    let bid = *bids.as_slice().choose(&mut rng).unwrap();
                    apply_bid(&mut state, seat, bid, &mut source).unwrap();
                }
                Phase::DeclaringTrump => {
                    let seat = state.winning_bidder.unwrap();
                    let suit = *Suit::ALL.as_slice().choose(&mut rng).unwrap();
                    apply_trump_declaration(&mut state, seat, suit).unwrap();
                }
                Phase::FoldingDecision => {
                    let seat = state.next_undecided_seat().unwrap();
                    let fold = !state.clubs_turned_up && rng.random_bool(0.25);
                    apply_fold_decision(&mut state, seat, fold).unwrap();
                }
                Phase::Playing => {
                    match state.current_player {
                        Some(seat) => {
                            let options = legal_plays(&state, seat);
                            let card = *options.as_slice().choose(&mut rng).unwrap();
                            let outcome = apply_card_play(&mut state, seat, card).unwrap();
                            if matches!(outcome, PlayOutcome::TrickComplete { .. }) {
                                assert_deck_conserved(&state);
                                advance_trick(&mut state).unwrap();
                            }
                        }
                        None => prop_assert!(false, "playing phase with nobody to act"),
                    }
                }
                other => prop_assert!(false, "unexpected phase {:?}", other),
            }
            assert_deck_conserved(&state);
        }

        if state.phase == Phase::RoundOver || state.phase == Phase::GameOver {
            let played: usize = state.tricks.len();
            let folded = state.players.iter().filter(|p| p.folded).count();
            prop_assert!(played == 5 || folded == 3);
        }
    }
}

/// Sanity anchor for the oracle itself.
#[test]
fn oracle_agrees_on_known_trick() {
    let plays = vec![
        TrickPlay {
            position: 2,
            card: Card {
                suit: Suit::Hearts,
                rank: Rank::Ace,
            },
        },
        TrickPlay {
            position: 3,
            card: Card {
                suit: Suit::Diamonds,
                rank: Rank::Jack,
            },
        },
        TrickPlay {
            position: 0,
            card: Card {
                suit: Suit::Hearts,
                rank: Rank::Nine,
            },
        },
        TrickPlay {
            position: 1,
            card: Card {
                suit: Suit::Spades,
                rank: Rank::Ace,
            },
        },
    ];
    // Trump hearts: the left bower (diamond jack) wins.
    assert_eq!(oracle_trick_winner(&plays, Suit::Hearts), 3);
    assert_eq!(resolve_trick(&plays, Suit::Hearts), Some(3));
}

/// can_play_card rejects cards that are not in hand and folded players.
#[test]
fn can_play_card_basic_rejections() {
    let trick = super::state::Trick::new(1, 0);
    let hand = vec![Card {
        suit: Suit::Clubs,
        rank: Rank::Nine,
    }];
    let outside = Card {
        suit: Suit::Spades,
        rank: Rank::Ace,
    };
    assert!(!can_play_card(outside, &hand, &trick, Suit::Hearts, false));
    assert!(!can_play_card(hand[0], &hand, &trick, Suit::Hearts, true));
    assert!(can_play_card(hand[0], &hand, &trick, Suit::Hearts, false));
}

/// Bidding cannot leave the state referencing a seat that already bid.
#[test]
fn bidding_state_invariant_holds() {
    let mut state: GameState = full_game_state();
    let deck = super::test_support::pinned_deck_with_turn_up(Card {
        suit: Suit::Hearts,
        rank: Rank::Ace,
    });
    let mut source = ScriptedDealSource::new(vec![deck], Some(0));
    start_first_round(&mut state, &mut source).unwrap();
    for seat in [1u8, 2, 3] {
        apply_bid(&mut state, seat, BidValue::Pass, &mut source).unwrap();
        if let Some(bidder) = state.current_bidder {
            assert!(!state.bids.iter().any(|b| b.position == bidder));
        }
    }
}
