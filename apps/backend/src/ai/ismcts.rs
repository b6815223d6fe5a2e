//! Information Set Monte Carlo Tree Search with determinization.
//!
//! Every simulation samples a fresh world consistent with the searcher's
//! observation, then runs one selection/expansion/rollout/backpropagation
//! pass over a single shared tree. Node edges are keyed by a stable action
//! string; selection filters children to the actions legal in the current
//! determinization. All values are from the searching seat's perspective.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::domain::bidding::{apply_bid, apply_trump_declaration, legal_bids};
use crate::domain::cards_types::{Card, Suit};
use crate::domain::dealing::{DealSource, ShuffledDealSource};
use crate::domain::folding::apply_fold_decision;
use crate::domain::state::{BidValue, GameState, Phase, Seat};
use crate::domain::tricks::{advance_trick, apply_card_play, legal_plays, PlayOutcome};
use crate::errors::domain::DomainError;

use super::config::Character;
use super::determinize::{determinize, Observation};
use super::rollout::{normalized_value, rollout, round_finished};
use super::AiError;

/// Variance floor so standard errors stay meaningful when rollouts are
/// nearly deterministic.
const VARIANCE_FLOOR: f64 = 0.0025;

/// One legal move at a decision point, serializable to a stable tree key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchAction {
    Bid(BidValue),
    Trump(Suit),
    Fold(bool),
    Card(Card),
}

impl SearchAction {
    /// Stable key used for tree edges and the analysis wire format.
    pub fn key(&self) -> String {
        match self {
            SearchAction::Bid(BidValue::Pass) => "BID_PASS".to_string(),
            SearchAction::Bid(BidValue::Points(n)) => format!("BID_{n}"),
            SearchAction::Trump(suit) => format!("TRUMP_{suit}"),
            SearchAction::Fold(true) => "FOLD".to_string(),
            SearchAction::Fold(false) => "STAY".to_string(),
            SearchAction::Card(card) => format!("CARD_{card}"),
        }
    }
}

/// Which kind of decision a search analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    Bid,
    Suit,
    Fold,
    Card,
}

pub fn analysis_type_for(phase: Phase) -> Option<AnalysisType> {
    match phase {
        Phase::Bidding => Some(AnalysisType::Bid),
        Phase::DeclaringTrump => Some(AnalysisType::Suit),
        Phase::FoldingDecision => Some(AnalysisType::Fold),
        Phase::Playing => Some(AnalysisType::Card),
        _ => None,
    }
}

/// Legal actions for whichever seat is to act.
pub fn legal_actions(state: &GameState) -> Vec<SearchAction> {
    let Some(actor) = state.seat_to_act() else {
        return Vec::new();
    };
    match state.phase {
        Phase::Bidding => legal_bids(state, actor)
            .into_iter()
            .map(SearchAction::Bid)
            .collect(),
        Phase::DeclaringTrump => Suit::ALL.into_iter().map(SearchAction::Trump).collect(),
        Phase::FoldingDecision => {
            if state.clubs_turned_up {
                vec![SearchAction::Fold(false)]
            } else {
                vec![SearchAction::Fold(false), SearchAction::Fold(true)]
            }
        }
        Phase::Playing => legal_plays(state, actor)
            .into_iter()
            .map(SearchAction::Card)
            .collect(),
        _ => Vec::new(),
    }
}

/// Apply `action` for the acting seat, advancing past completed tricks
/// immediately (simulations have no reveal pause).
pub fn apply_action(
    state: &mut GameState,
    action: &SearchAction,
    source: &mut dyn DealSource,
) -> Result<(), DomainError> {
    let actor = state
        .seat_to_act()
        .ok_or_else(|| DomainError::Invariant("no seat to act in simulation".into()))?;
    match action {
        SearchAction::Bid(bid) => {
            apply_bid(state, actor, *bid, source)?;
        }
        SearchAction::Trump(suit) => {
            apply_trump_declaration(state, actor, *suit)?;
        }
        SearchAction::Fold(fold) => {
            apply_fold_decision(state, actor, *fold)?;
        }
        SearchAction::Card(card) => {
            let outcome = apply_card_play(state, actor, *card)?;
            if matches!(outcome, PlayOutcome::TrickComplete { .. })
                && state.phase == Phase::Playing
            {
                advance_trick(state)?;
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub iterations: u32,
    pub exploration: f64,
    pub seed: u64,
    pub character: Character,
    pub time_budget: Duration,
}

impl SearchConfig {
    pub fn new(iterations: u32, seed: u64) -> Self {
        Self {
            iterations,
            exploration: std::f64::consts::SQRT_2,
            seed,
            character: Character::default(),
            time_budget: Duration::from_secs(2),
        }
    }
}

/// Per-action statistics surfaced as analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStats {
    pub option: String,
    pub visits: u32,
    pub avg_value: f64,
    pub std_error: f64,
    pub ci: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: SearchAction,
    pub stats: Vec<ActionStats>,
    pub iterations_run: u32,
}

struct Node {
    visits: u32,
    value_sum: f64,
    value_sq_sum: f64,
    children: Vec<Child>,
}

struct Child {
    action: SearchAction,
    key: String,
    node: Node,
}

impl Node {
    fn new() -> Self {
        Self {
            visits: 0,
            value_sum: 0.0,
            value_sq_sum: 0.0,
            children: Vec::new(),
        }
    }

    fn update(&mut self, value: f64) {
        self.visits += 1;
        self.value_sum += value;
        self.value_sq_sum += value * value;
    }

    fn mean(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.value_sum / self.visits as f64
        }
    }
}

struct SimCtx {
    seat: Seat,
    score_before: i16,
    start_round: u32,
    character: Character,
    exploration: f64,
    rng: ChaCha8Rng,
}

pub fn search(
    obs: &Observation,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Result<SearchOutcome, AiError> {
    let score_before = obs
        .base
        .player(obs.seat)
        .map(|p| p.score)
        .ok_or_else(|| AiError::Internal("searching seat is not in the game".into()))?;
    let mut ctx = SimCtx {
        seat: obs.seat,
        score_before,
        start_round: obs.base.round_no,
        character: config.character,
        exploration: config.exploration,
        rng: ChaCha8Rng::seed_from_u64(config.seed),
    };

    let mut root = Node::new();
    let started = Instant::now();
    let mut iterations_run = 0u32;

    for _ in 0..config.iterations {
        if cancel.load(Ordering::Relaxed) {
            break;
        }
        if started.elapsed() > config.time_budget {
            break;
        }
        let mut world = determinize(obs, &mut ctx.rng);
        let deal_seed = ctx.rng.random::<u64>();
        let mut source = ShuffledDealSource::seeded(deal_seed);
        simulate(&mut root, &mut world, &mut source, &mut ctx)
            .map_err(|e| AiError::Internal(e.to_string()))?;
        iterations_run += 1;
    }

    if root.children.is_empty() {
        return Err(AiError::Cancelled);
    }

    // Robust child: most visits, ties to the earliest-expanded child.
    let mut best_idx = 0;
    for (i, child) in root.children.iter().enumerate() {
        if child.node.visits > root.children[best_idx].node.visits {
            best_idx = i;
        }
    }

    let stats = root
        .children
        .iter()
        .map(|child| {
            let visits = child.node.visits;
            let mean = child.node.mean();
            let variance = if visits == 0 {
                VARIANCE_FLOOR
            } else {
                (child.node.value_sq_sum / visits as f64 - mean * mean).max(VARIANCE_FLOOR)
            };
            let std_error = (variance / visits.max(1) as f64).sqrt();
            ActionStats {
                option: child.key.clone(),
                visits,
                avg_value: mean,
                std_error,
                ci: (mean - 1.96 * std_error, mean + 1.96 * std_error),
            }
        })
        .collect();

    Ok(SearchOutcome {
        best: root.children[best_idx].action,
        stats,
        iterations_run,
    })
}

/// One selection → expansion → rollout → backpropagation pass. Updates this
/// node's statistics and returns the simulated value.
fn simulate(
    node: &mut Node,
    state: &mut GameState,
    source: &mut dyn DealSource,
    ctx: &mut SimCtx,
) -> Result<f64, DomainError> {
    let value = if round_finished(state, ctx.start_round) {
        evaluate(state, ctx)
    } else {
        let legal = legal_actions(state);
        if legal.is_empty() {
            evaluate(state, ctx)
        } else {
            let untried: Vec<&SearchAction> = legal
                .iter()
                .filter(|a| !node.children.iter().any(|c| c.key == a.key()))
                .collect();
            if !untried.is_empty() {
                // Expansion: uniform pick among untried actions.
                let pick = ctx.rng.random_range(0..untried.len());
                let action = *untried[pick];
                apply_action(state, &action, source)?;
                let value = rollout(state, ctx.seat, &ctx.character, source)?;
                let mut child_node = Node::new();
                child_node.update(value);
                node.children.push(Child {
                    key: action.key(),
                    action,
                    node: child_node,
                });
                value
            } else {
                // Selection: UCB1 over children legal in this world.
                let parent_visits = node.visits.max(1) as f64;
                let c = ctx.exploration;
                let mut best: Option<(usize, f64)> = None;
                for (i, child) in node.children.iter().enumerate() {
                    if !legal.iter().any(|a| a.key() == child.key) {
                        continue;
                    }
                    let ucb = child.node.mean()
                        + c * (parent_visits.ln() / child.node.visits.max(1) as f64).sqrt();
                    if best.map(|(_, b)| ucb > b).unwrap_or(true) {
                        best = Some((i, ucb));
                    }
                }
                let (idx, _) = best
                    .ok_or_else(|| DomainError::Invariant("no legal child to select".into()))?;
                let action = node.children[idx].action;
                apply_action(state, &action, source)?;
                simulate(&mut node.children[idx].node, state, source, ctx)?
            }
        }
    };
    node.update(value);
    Ok(value)
}

fn evaluate(state: &GameState, ctx: &SimCtx) -> f64 {
    if state.round_no != ctx.start_round
        && state.phase != Phase::RoundOver
        && state.phase != Phase::GameOver
    {
        // Hand thrown in before scoring.
        return normalized_value(0);
    }
    let score_after = state
        .player(ctx.seat)
        .map(|p| p.score)
        .unwrap_or(ctx.score_before);
    normalized_value(score_after - ctx.score_before)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::determinize::observe;
    use crate::domain::cards_types::Rank;
    use crate::domain::test_support::playing_state;

    fn c(suit: Suit, rank: Rank) -> Card {
        Card { suit, rank }
    }

    /// Last card of the hand: the searching seat holds only the right bower.
    fn forced_card_state() -> GameState {
        let mut state = playing_state(
            Suit::Hearts,
            1,
            [
                vec![c(Suit::Spades, Rank::Nine)],
                vec![c(Suit::Hearts, Rank::Jack)],
                vec![c(Suit::Diamonds, Rank::Ten)],
                vec![c(Suit::Clubs, Rank::Ten)],
            ],
        );
        // Four tricks already played out.
        for n in 1..=4 {
            let mut t = crate::domain::state::Trick::new(n, 1);
            t.winner_position = Some(1);
            state.tricks.push(t);
        }
        state.player_mut(1).unwrap().tricks_taken = 4;
        if let Some(t) = state.current_trick.as_mut() {
            t.number = 5;
        }
        state
    }

    #[test]
    fn forced_action_takes_every_visit() {
        let state = forced_card_state();
        let obs = observe(&state, 1);
        let cancel = AtomicBool::new(false);
        let outcome = search(&obs, &SearchConfig::new(200, 42), &cancel).unwrap();

        assert_eq!(
            outcome.best,
            SearchAction::Card(c(Suit::Hearts, Rank::Jack))
        );
        assert_eq!(outcome.stats.len(), 1);
        assert_eq!(outcome.stats[0].visits, outcome.iterations_run);
        assert_eq!(outcome.stats[0].option, "CARD_HEARTS_JACK");
    }

    #[test]
    fn search_is_deterministic_under_a_fixed_seed() {
        let state = crate::domain::test_support::state_in_folding_phase(1, 3, Suit::Spades);
        let obs = observe(&state, 2);
        let cancel = AtomicBool::new(false);

        let a = search(&obs, &SearchConfig::new(400, 7), &cancel).unwrap();
        let b = search(&obs, &SearchConfig::new(400, 7), &cancel).unwrap();

        assert_eq!(a.best.key(), b.best.key());
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn cancellation_stops_the_search() {
        let state = forced_card_state();
        let obs = observe(&state, 1);
        let cancel = AtomicBool::new(true);
        assert!(matches!(
            search(&obs, &SearchConfig::new(1000, 1), &cancel),
            Err(AiError::Cancelled)
        ));
    }

    #[test]
    fn visit_counts_concentrate_on_the_winning_line() {
        // Seat 1 to lead the last two cards holding both bowers: every line
        // wins, but the search must still produce sane statistics.
        let mut state = playing_state(
            Suit::Hearts,
            1,
            [
                vec![c(Suit::Spades, Rank::Nine), c(Suit::Spades, Rank::Ten)],
                vec![c(Suit::Hearts, Rank::Jack), c(Suit::Diamonds, Rank::Jack)],
                vec![c(Suit::Diamonds, Rank::Ten), c(Suit::Diamonds, Rank::Nine)],
                vec![c(Suit::Clubs, Rank::Ten), c(Suit::Clubs, Rank::Nine)],
            ],
        );
        for n in 1..=3 {
            let mut t = crate::domain::state::Trick::new(n, 1);
            t.winner_position = Some(1);
            state.tricks.push(t);
        }
        state.player_mut(1).unwrap().tricks_taken = 3;
        if let Some(t) = state.current_trick.as_mut() {
            t.number = 4;
        }

        let obs = observe(&state, 1);
        let cancel = AtomicBool::new(false);
        let outcome = search(&obs, &SearchConfig::new(300, 9), &cancel).unwrap();

        assert_eq!(outcome.stats.len(), 2);
        let total: u32 = outcome.stats.iter().map(|s| s.visits).sum();
        assert_eq!(total, outcome.iterations_run);
        for stat in &outcome.stats {
            assert!((0.0..=1.0).contains(&stat.avg_value));
            assert!(stat.std_error > 0.0);
            assert!(stat.ci.0 <= stat.avg_value && stat.avg_value <= stat.ci.1);
        }
    }

    #[test]
    fn action_keys_are_stable() {
        assert_eq!(SearchAction::Bid(BidValue::Pass).key(), "BID_PASS");
        assert_eq!(SearchAction::Bid(BidValue::Points(4)).key(), "BID_4");
        assert_eq!(SearchAction::Trump(Suit::Hearts).key(), "TRUMP_HEARTS");
        assert_eq!(SearchAction::Fold(true).key(), "FOLD");
        assert_eq!(SearchAction::Fold(false).key(), "STAY");
        assert_eq!(
            SearchAction::Card(c(Suit::Spades, Rank::Jack)).key(),
            "CARD_SPADES_JACK"
        );
    }
}
