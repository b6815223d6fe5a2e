//! The authoritative game state aggregate and its building blocks.
//!
//! Every mutation goes through the rule-engine functions in the sibling
//! modules; the owning game actor is the only writer and bumps `version`
//! once per accepted action.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::cards_types::Card;
use super::rules::{next_seat, PLAYERS};

/// Seat position, clockwise 0..=3.
pub type Seat = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    WaitingForPlayers,
    Bidding,
    DeclaringTrump,
    FoldingDecision,
    Playing,
    RoundOver,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FoldDecision {
    Undecided,
    Stay,
    Fold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatKind {
    Human,
    Ai,
}

/// A bid is either PASS or a number of tricks (2..=5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BidValue {
    Pass,
    Points(u8),
}

impl BidValue {
    pub fn points(self) -> Option<u8> {
        match self {
            BidValue::Pass => None,
            BidValue::Points(n) => Some(n),
        }
    }
}

// On the wire a bid is the string "PASS" or a bare number.
impl Serialize for BidValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            BidValue::Pass => serializer.serialize_str("PASS"),
            BidValue::Points(n) => serializer.serialize_u8(*n),
        }
    }
}

impl<'de> Deserialize<'de> for BidValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct BidVisitor;

        impl serde::de::Visitor<'_> for BidVisitor {
            type Value = BidValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("\"PASS\" or a bid amount")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<BidValue, E> {
                if v == "PASS" {
                    Ok(BidValue::Pass)
                } else {
                    Err(E::custom(format!("invalid bid: {v}")))
                }
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<BidValue, E> {
                u8::try_from(v)
                    .map(BidValue::Points)
                    .map_err(|_| E::custom(format!("invalid bid: {v}")))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<BidValue, E> {
                u8::try_from(v)
                    .map(BidValue::Points)
                    .map_err(|_| E::custom(format!("invalid bid: {v}")))
            }
        }

        deserializer.deserialize_any(BidVisitor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedBid {
    pub position: Seat,
    pub value: BidValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrickPlay {
    pub position: Seat,
    pub card: Card,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trick {
    /// Trick number within the round, 1..=5.
    pub number: u8,
    pub lead_position: Seat,
    pub plays: Vec<TrickPlay>,
    pub winner_position: Option<Seat>,
}

impl Trick {
    pub fn new(number: u8, lead_position: Seat) -> Self {
        Self {
            number,
            lead_position,
            plays: Vec::with_capacity(PLAYERS),
            winner_position: None,
        }
    }

    pub fn lead_card(&self) -> Option<Card> {
        self.plays.first().map(|p| p.card)
    }

    pub fn has_played(&self, seat: Seat) -> bool {
        self.plays.iter().any(|p| p.position == seat)
    }
}

#[derive(Debug, Clone)]
pub struct PlayerState {
    pub id: Uuid,
    pub display_name: String,
    pub position: Seat,
    pub hand: Vec<Card>,
    pub score: i16,
    pub tricks_taken: u8,
    pub connected: bool,
    pub folded: bool,
    pub fold_decision: FoldDecision,
    pub seat_kind: SeatKind,
}

impl PlayerState {
    pub fn new(id: Uuid, display_name: String, position: Seat, seat_kind: SeatKind) -> Self {
        Self {
            id,
            display_name,
            position,
            hand: Vec::new(),
            score: super::rules::STARTING_SCORE,
            tricks_taken: 0,
            connected: seat_kind == SeatKind::Ai,
            folded: false,
            fold_decision: FoldDecision::Undecided,
            seat_kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub game_id: Uuid,
    pub phase: Phase,
    /// 1-based; increments on every deal, including all-pass redeals.
    pub round_no: u32,
    pub dealer: Seat,
    /// Seated players, `players[i].position == i`; fewer than four while
    /// waiting.
    pub players: Vec<PlayerState>,
    /// Undealt cards; the last pushed is the turn-up. Set aside once trump is
    /// declared.
    pub blind: Vec<Card>,
    /// Hands discarded by folding players this round.
    pub discards: Vec<Card>,
    pub turn_up: Option<Card>,
    pub clubs_turned_up: bool,
    pub bids: Vec<PlacedBid>,
    pub current_bidder: Option<Seat>,
    pub highest_bid: Option<u8>,
    pub winning_bidder: Option<Seat>,
    pub trump: Option<super::cards_types::Suit>,
    pub tricks: Vec<Trick>,
    /// The in-flight trick. Stays populated (with its winner) through the
    /// reveal pause after the final card.
    pub current_trick: Option<Trick>,
    pub current_player: Option<Seat>,
    pub winner: Option<Seat>,
    pub version: u64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl GameState {
    pub fn new(game_id: Uuid, created_at_ms: i64) -> Self {
        Self {
            game_id,
            phase: Phase::WaitingForPlayers,
            round_no: 0,
            dealer: 0,
            players: Vec::with_capacity(PLAYERS),
            blind: Vec::new(),
            discards: Vec::new(),
            turn_up: None,
            clubs_turned_up: false,
            bids: Vec::new(),
            current_bidder: None,
            highest_bid: None,
            winning_bidder: None,
            trump: None,
            tricks: Vec::new(),
            current_trick: None,
            current_player: None,
            winner: None,
            version: 0,
            created_at_ms,
            updated_at_ms: created_at_ms,
        }
    }

    pub fn is_full(&self) -> bool {
        self.players.len() == PLAYERS
    }

    pub fn player(&self, seat: Seat) -> Option<&PlayerState> {
        self.players.get(seat as usize)
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut PlayerState> {
        self.players.get_mut(seat as usize)
    }

    pub fn seat_of(&self, player_id: Uuid) -> Option<Seat> {
        self.players
            .iter()
            .find(|p| p.id == player_id)
            .map(|p| p.position)
    }

    /// First non-folded seat clockwise from `from`, inclusive.
    pub fn next_active_seat_from(&self, from: Seat) -> Option<Seat> {
        let mut seat = from;
        for _ in 0..PLAYERS {
            if let Some(p) = self.player(seat) {
                if !p.folded {
                    return Some(seat);
                }
            }
            seat = next_seat(seat);
        }
        None
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| !p.folded).count()
    }

    /// The seat expected to act next, by phase. None while waiting, paused
    /// between tricks, or after the game ends.
    pub fn seat_to_act(&self) -> Option<Seat> {
        match self.phase {
            Phase::Bidding => self.current_bidder,
            Phase::DeclaringTrump => self.winning_bidder,
            Phase::FoldingDecision => self.next_undecided_seat(),
            Phase::Playing => self.current_player,
            _ => None,
        }
    }

    /// First non-bidder with an undecided fold decision, scanning clockwise
    /// from the seat left of the winning bidder.
    pub fn next_undecided_seat(&self) -> Option<Seat> {
        let bidder = self.winning_bidder?;
        let mut seat = next_seat(bidder);
        for _ in 0..PLAYERS - 1 {
            if let Some(p) = self.player(seat) {
                if p.fold_decision == FoldDecision::Undecided {
                    return Some(seat);
                }
            }
            seat = next_seat(seat);
        }
        None
    }
}
