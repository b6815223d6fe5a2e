//! Observations and determinization.
//!
//! An `Observation` is the honest view from one seat: own hand, every public
//! fact, and what can be inferred (played cards, per-opponent void suits).
//! Determinization samples a complete world consistent with that view so the
//! search can run on perfect-information states. Unseen cards not handed to
//! an opponent are implicitly the blind.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards_logic::effective_suit;
use crate::domain::cards_types::{full_deck, Card, Suit};
use crate::domain::rules::PLAYERS;
use crate::domain::state::{GameState, Seat, Trick};

/// How many greedy constraint-respecting deals to attempt before falling
/// back to unconstrained sampling.
const SAMPLER_ATTEMPTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Observation {
    pub seat: Seat,
    /// The state with every hidden zone emptied: opponents' hands, the
    /// blind, and the discard pile.
    pub base: GameState,
    /// Required hand size per seat (0 for folded seats).
    pub hand_sizes: [usize; PLAYERS],
    /// `voids[seat][suit.index()]`: seat is known void in that effective suit.
    pub voids: [[bool; 4]; PLAYERS],
    /// Cards that could be anywhere among opponents' hands and the blind.
    pub unseen: Vec<Card>,
}

/// Build the observation for `seat` from the authoritative state.
///
/// The turn-up is public knowledge and pinned to the blind, so it is never
/// part of the unseen pool.
pub fn observe(state: &GameState, seat: Seat) -> Observation {
    let mut base = state.clone();
    for player in &mut base.players {
        if player.position != seat {
            player.hand.clear();
        }
    }
    base.blind.clear();
    base.discards.clear();

    let mut hand_sizes = [0usize; PLAYERS];
    for player in &state.players {
        hand_sizes[player.position as usize] = player.hand.len();
    }

    let own_hand = state
        .player(seat)
        .map(|p| p.hand.clone())
        .unwrap_or_default();

    let mut played: Vec<Card> = Vec::new();
    for trick in &state.tricks {
        played.extend(trick.plays.iter().map(|p| p.card));
    }
    if let Some(trick) = &state.current_trick {
        played.extend(trick.plays.iter().map(|p| p.card));
    }

    let unseen = full_deck()
        .into_iter()
        .filter(|c| {
            !played.contains(c) && !own_hand.contains(c) && state.turn_up != Some(*c)
        })
        .collect();

    Observation {
        seat,
        base,
        hand_sizes,
        voids: derive_voids(state),
        unseen,
    }
}

/// A player is void in the led effective suit of any trick they did not
/// follow. Voids only exist once trump is known and accumulate within the
/// round.
fn derive_voids(state: &GameState) -> [[bool; 4]; PLAYERS] {
    let mut voids = [[false; 4]; PLAYERS];
    let Some(trump) = state.trump else {
        return voids;
    };
    let mut scan = |trick: &Trick| {
        let Some(lead_card) = trick.lead_card() else {
            return;
        };
        let lead = effective_suit(lead_card, trump);
        for play in &trick.plays {
            if effective_suit(play.card, trump) != lead {
                voids[play.position as usize][lead.index()] = true;
            }
        }
    };
    for trick in &state.tricks {
        scan(trick);
    }
    if let Some(trick) = &state.current_trick {
        scan(trick);
    }
    voids
}

/// Sample a complete world: opponents' hands filled from the unseen pool
/// respecting hand sizes and void constraints, leftovers to the blind.
pub fn determinize<R: Rng>(obs: &Observation, rng: &mut R) -> GameState {
    let mut pool = obs.unseen.clone();
    pool.shuffle(rng);

    let opponents: Vec<Seat> = (0..PLAYERS as Seat).filter(|s| *s != obs.seat).collect();

    let mut assignment: Option<Vec<Vec<Card>>> = None;
    for _ in 0..SAMPLER_ATTEMPTS {
        if let Some(hands) = try_constrained(&pool, &opponents, obs) {
            assignment = Some(hands);
            break;
        }
        pool.shuffle(rng);
    }
    let hands = assignment.unwrap_or_else(|| unconstrained(&pool, &opponents, obs));

    let mut state = obs.base.clone();
    let mut taken: Vec<Card> = Vec::new();
    for (i, seat) in opponents.iter().enumerate() {
        taken.extend(hands[i].iter().copied());
        if let Some(player) = state.player_mut(*seat) {
            player.hand = hands[i].clone();
            player.hand.sort();
        }
    }
    state.blind = pool.into_iter().filter(|c| !taken.contains(c)).collect();
    if let Some(turn_up) = state.turn_up {
        state.blind.push(turn_up);
    }
    state
}

fn try_constrained(pool: &[Card], opponents: &[Seat], obs: &Observation) -> Option<Vec<Vec<Card>>> {
    let trump = obs.base.trump;
    let mut remaining: Vec<Card> = pool.to_vec();
    let mut hands = Vec::with_capacity(opponents.len());
    for seat in opponents {
        let need = obs.hand_sizes[*seat as usize];
        let voids = &obs.voids[*seat as usize];
        let mut hand = Vec::with_capacity(need);
        let mut i = 0;
        while hand.len() < need && i < remaining.len() {
            let card = remaining[i];
            let blocked = match trump {
                Some(trump) => voids[effective_suit(card, trump).index()],
                None => false,
            };
            if blocked {
                i += 1;
            } else {
                hand.push(remaining.remove(i));
            }
        }
        if hand.len() < need {
            return None;
        }
        hands.push(hand);
    }
    Some(hands)
}

fn unconstrained(pool: &[Card], opponents: &[Seat], obs: &Observation) -> Vec<Vec<Card>> {
    let mut remaining: Vec<Card> = pool.to_vec();
    opponents
        .iter()
        .map(|seat| {
            let need = obs.hand_sizes[*seat as usize].min(remaining.len());
            remaining.drain(..need).collect()
        })
        .collect()
}
