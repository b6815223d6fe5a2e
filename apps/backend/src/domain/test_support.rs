//! Shared builders for domain tests.

use uuid::Uuid;

use super::bidding::{apply_bid, apply_trump_declaration};
use super::cards_types::{full_deck, Card, Suit};
use super::dealing::{start_first_round, ScriptedDealSource};
use super::rules::PLAYERS;
use super::state::{BidValue, FoldDecision, GameState, Phase, PlayerState, Seat, SeatKind, Trick};

pub fn seat_player_id(seat: Seat) -> Uuid {
    Uuid::from_u128(0x1000 + seat as u128)
}

/// A game with four seated humans, still undealt.
pub fn full_game_state() -> GameState {
    let mut state = GameState::new(Uuid::from_u128(0xFACE), 0);
    for seat in 0..PLAYERS as Seat {
        state.players.push(PlayerState::new(
            seat_player_id(seat),
            format!("player-{seat}"),
            seat,
            SeatKind::Human,
        ));
    }
    state
}

/// The standard-order deck with `turn_up` swapped into the turn-up slot
/// (index 20, the first undealt card).
pub fn pinned_deck_with_turn_up(turn_up: Card) -> Vec<Card> {
    let mut deck = full_deck();
    if let Some(pos) = deck.iter().position(|c| *c == turn_up) {
        deck.swap(pos, 20);
    }
    deck
}

/// Deal a round (dealer 0, hearts turn-up), run the bidding so `bidder` wins
/// with `bid`, and declare `trump`.
pub fn state_in_folding_phase(bidder: Seat, bid: u8, trump: Suit) -> GameState {
    let mut state = full_game_state();
    let deck = pinned_deck_with_turn_up(Card {
        suit: Suit::Hearts,
        rank: super::cards_types::Rank::Ace,
    });
    let mut source = ScriptedDealSource::new(vec![deck], Some(0));
    start_first_round(&mut state, &mut source).unwrap();

    for seat in [1u8, 2, 3, 0] {
        let value = if seat == bidder {
            BidValue::Points(bid)
        } else {
            BidValue::Pass
        };
        apply_bid(&mut state, seat, value, &mut source).unwrap();
    }
    apply_trump_declaration(&mut state, bidder, trump).unwrap();
    state
}

/// Deck conservation: hands, played cards, blind and discards partition the
/// 24-card deck exactly.
pub fn assert_deck_conserved(state: &GameState) {
    let mut all: Vec<Card> = Vec::new();
    for player in &state.players {
        all.extend(player.hand.iter().copied());
    }
    for trick in &state.tricks {
        all.extend(trick.plays.iter().map(|p| p.card));
    }
    if let Some(trick) = &state.current_trick {
        all.extend(trick.plays.iter().map(|p| p.card));
    }
    all.extend(state.blind.iter().copied());
    all.extend(state.discards.iter().copied());

    let mut expected = full_deck();
    expected.sort();
    all.sort();
    assert_eq!(all, expected, "deck not conserved");
}

/// A hand-built PLAYING state with explicit hands, `leader` to act on trick 1
/// and everyone staying. The blind absorbs whatever the hands do not cover so
/// deck-conservation checks keep holding.
pub fn playing_state(trump: Suit, leader: Seat, hands: [Vec<Card>; 4]) -> GameState {
    let mut state = full_game_state();
    state.phase = Phase::Playing;
    state.round_no = 1;
    state.dealer = 3;
    state.trump = Some(trump);
    state.winning_bidder = Some(leader);
    state.highest_bid = Some(2);
    state.current_trick = Some(Trick::new(1, leader));
    state.current_player = Some(leader);

    let mut used: Vec<Card> = Vec::new();
    for (seat, hand) in hands.into_iter().enumerate() {
        used.extend(hand.iter().copied());
        if let Some(player) = state.player_mut(seat as Seat) {
            player.hand = hand;
            player.fold_decision = FoldDecision::Stay;
        }
    }
    state.blind = full_deck()
        .into_iter()
        .filter(|c| !used.contains(c))
        .collect();
    state
}
