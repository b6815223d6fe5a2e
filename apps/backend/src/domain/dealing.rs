//! Dealing: the `DealSource` seam, shuffling, and round entry.
//!
//! Deck ordering and the first round's dealer are the only nondeterminism in
//! the rule engine; both are injected through [`DealSource`] so tests can pin
//! them.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

use super::cards_types::{full_deck, Card, Suit};
use super::rules::{next_seat, BLIND_SIZE, DECK_SIZE, HAND_SIZE, PLAYERS};
use super::state::{FoldDecision, GameState, Phase, Seat, Trick};
use crate::errors::domain::DomainError;

/// One round's worth of nondeterminism.
pub struct Deal {
    /// Full 24-card deck in deal order.
    pub deck: Vec<Card>,
    /// Dealer for a game's first round; ignored afterwards.
    pub first_dealer: Option<Seat>,
}

/// Pluggable provider of shuffled decks, one per round.
pub trait DealSource: Send {
    fn next_deal(&mut self) -> Deal;
}

/// Production source: a per-game ChaCha RNG seeded from the OS.
pub struct ShuffledDealSource {
    rng: ChaCha12Rng,
}

impl ShuffledDealSource {
    pub fn new() -> Self {
        Self {
            rng: ChaCha12Rng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl Default for ShuffledDealSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DealSource for ShuffledDealSource {
    fn next_deal(&mut self) -> Deal {
        let mut deck = full_deck();
        deck.shuffle(&mut self.rng);
        Deal {
            deck,
            first_dealer: Some(self.rng.random_range(0..PLAYERS as u8)),
        }
    }
}

/// Replays pinned decks in order, falling back to a shuffle when exhausted.
/// Used by tests and by the dev-only deck/dealer pinning endpoints.
pub struct ScriptedDealSource {
    decks: std::collections::VecDeque<Vec<Card>>,
    first_dealer: Option<Seat>,
    fallback: ShuffledDealSource,
}

impl ScriptedDealSource {
    pub fn new(decks: Vec<Vec<Card>>, first_dealer: Option<Seat>) -> Self {
        Self {
            decks: decks.into(),
            first_dealer,
            fallback: ShuffledDealSource::seeded(0),
        }
    }
}

impl DealSource for ScriptedDealSource {
    fn next_deal(&mut self) -> Deal {
        match self.decks.pop_front() {
            Some(deck) => Deal {
                deck,
                first_dealer: self.first_dealer,
            },
            None => {
                let mut deal = self.fallback.next_deal();
                deal.first_dealer = self.first_dealer;
                deal
            }
        }
    }
}

/// What a fresh deal transitioned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealOutcome {
    /// Normal turn-up: bidding opens left of the dealer.
    Bidding,
    /// Clubs turned up: bidding is skipped and the leader plays first.
    DirtyClubs { leader: Seat },
}

/// Start the first round of a full game.
pub fn start_first_round(
    state: &mut GameState,
    source: &mut dyn DealSource,
) -> Result<DealOutcome, DomainError> {
    if !state.is_full() {
        return Err(DomainError::Invariant(
            "cannot deal before all seats are filled".into(),
        ));
    }
    if state.round_no != 0 {
        return Err(DomainError::Invariant("first round already dealt".into()));
    }
    let deal = source.next_deal();
    if let Some(dealer) = deal.first_dealer {
        if dealer as usize >= PLAYERS {
            return Err(DomainError::InvalidDeck(format!(
                "dealer position {dealer} out of range"
            )));
        }
        state.dealer = dealer;
    }
    state.round_no = 1;
    deal_cards(state, deal.deck)
}

/// Advance dealer and round, then deal again. Used after an all-pass and when
/// rolling into the next round after scoring.
pub fn deal_next_round(
    state: &mut GameState,
    source: &mut dyn DealSource,
) -> Result<DealOutcome, DomainError> {
    state.dealer = next_seat(state.dealer);
    state.round_no += 1;
    let deal = source.next_deal();
    deal_cards(state, deal.deck)
}

fn deal_cards(state: &mut GameState, deck: Vec<Card>) -> Result<DealOutcome, DomainError> {
    validate_deck(&deck)?;

    for player in &mut state.players {
        player.hand.clear();
        player.tricks_taken = 0;
        player.folded = false;
        player.fold_decision = FoldDecision::Undecided;
    }
    state.blind.clear();
    state.discards.clear();
    state.turn_up = None;
    state.clubs_turned_up = false;
    state.bids.clear();
    state.current_bidder = None;
    state.highest_bid = None;
    state.winning_bidder = None;
    state.trump = None;
    state.tricks.clear();
    state.current_trick = None;
    state.current_player = None;

    // One card per pass, five passes, starting left of the dealer.
    let dealer = state.dealer;
    for pass in 0..HAND_SIZE {
        for i in 0..PLAYERS {
            let seat = (dealer as usize + 1 + i) % PLAYERS;
            let card = deck[pass * PLAYERS + i];
            if let Some(player) = state.player_mut(seat as Seat) {
                player.hand.push(card);
            }
        }
    }
    for player in &mut state.players {
        player.hand.sort();
    }

    let dealt = HAND_SIZE * PLAYERS;
    let turn_up = deck[dealt];
    state.blind = deck[dealt..dealt + BLIND_SIZE].to_vec();
    state.turn_up = Some(turn_up);

    if turn_up.suit == Suit::Clubs {
        // Dirty clubs: trump is forced, nobody may fold, and the seat left of
        // the dealer owns the round and leads.
        let leader = next_seat(dealer);
        state.clubs_turned_up = true;
        state.trump = Some(Suit::Clubs);
        state.winning_bidder = Some(leader);
        for player in &mut state.players {
            player.fold_decision = FoldDecision::Stay;
        }
        state.current_trick = Some(Trick::new(1, leader));
        state.current_player = Some(leader);
        state.phase = Phase::Playing;
        Ok(DealOutcome::DirtyClubs { leader })
    } else {
        state.current_bidder = Some(next_seat(dealer));
        state.phase = Phase::Bidding;
        Ok(DealOutcome::Bidding)
    }
}

fn validate_deck(deck: &[Card]) -> Result<(), DomainError> {
    if deck.len() != DECK_SIZE {
        return Err(DomainError::InvalidDeck(format!(
            "expected {DECK_SIZE} cards, got {}",
            deck.len()
        )));
    }
    let mut sorted: Vec<Card> = deck.to_vec();
    sorted.sort();
    sorted.dedup();
    if sorted.len() != DECK_SIZE {
        return Err(DomainError::InvalidDeck("duplicate cards in deck".into()));
    }
    Ok(())
}
