//! Shared helpers for integration tests: rigged tables and a scripted policy.

#![allow(dead_code)]

use mahjong_engine::ai::SeatStrategy;
use mahjong_engine::claims::{ClaimKind, ClaimOptions};
use mahjong_engine::core::{EngineConfig, GameRng, GameState, Pacing, Seat};
use mahjong_engine::tiles::{Hand, Tile, TileFace, TileId, Wall};
use mahjong_engine::turn::{TurnController, TurnPhase};

/// A 13-tile hand that can neither win, peng nor chi on the faces the
/// scenarios discard.
pub const FILLER: &str = "1A 4A 7A 1B 4B 7B 1C 4C 7C S W N White";

/// Human at seat 0, no pacing.
pub fn human_config() -> EngineConfig {
    EngineConfig::default().with_pacing(Pacing::instant())
}

/// Tiles with distinct ids, outside any wall.
pub fn tiles(labels: &str) -> Vec<Tile> {
    TileFace::parse_list(labels)
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(i, face)| Tile::new(TileId(1000 + i as u16), face))
        .collect()
}

pub fn face(label: &str) -> TileFace {
    label.parse().unwrap()
}

/// A full 144-tile state with fixed hands.
///
/// Hand tiles are taken from an unshuffled wall; `next_draws` are moved to
/// the tail so they are drawn first, in order.
pub fn rigged_state(config: &EngineConfig, hands: [&str; 4], next_draws: &str, phase: TurnPhase) -> GameState {
    let mut state = GameState::new(config, GameRng::new(config.seed));
    let mut wall = Wall::build();

    for (seat, labels) in Seat::all().zip(hands) {
        let taken: Vec<Tile> = TileFace::parse_list(labels)
            .unwrap()
            .into_iter()
            .map(|face| wall.take_face(face).expect("rigged hand uses more than four copies"))
            .collect();
        let mut hand = Hand::from_tiles(taken);
        hand.sort();
        state.players[seat].hand = hand;
    }

    let draws: Vec<Tile> = TileFace::parse_list(next_draws)
        .unwrap()
        .into_iter()
        .map(|face| wall.take_face(face).expect("rigged draw uses more than four copies"))
        .collect();
    for tile in draws.into_iter().rev() {
        wall.push_tail(tile);
    }

    state.wall = wall;
    state.phase = phase;
    if let Some(seat) = phase.active_seat() {
        state.current_seat = seat;
    }
    state
}

/// Controller over a rigged table with the human at seat 0.
pub fn rigged_table(
    hands: [&str; 4],
    next_draws: &str,
    phase: TurnPhase,
    strategy: ScriptedStrategy,
) -> TurnController {
    let config = human_config();
    let state = rigged_state(&config, hands, next_draws, phase);
    TurnController::with_state(config, state)
        .unwrap()
        .with_strategy(strategy)
}

/// Discards a fixed face when it can; takes every claim offered or none.
#[derive(Clone, Debug, Default)]
pub struct ScriptedStrategy {
    pub discard: Option<TileFace>,
    pub accept_claims: bool,
}

impl ScriptedStrategy {
    pub fn discarding(label: &str) -> Self {
        Self {
            discard: Some(face(label)),
            accept_claims: false,
        }
    }

    pub fn greedy(mut self) -> Self {
        self.accept_claims = true;
        self
    }
}

impl SeatStrategy for ScriptedStrategy {
    fn choose_discard(&self, _seat: Seat, hand: &Hand, _rng: &mut GameRng) -> usize {
        self.discard
            .and_then(|face| hand.concealed().iter().position(|t| t.matches(face)))
            .unwrap_or(0)
    }

    fn decide_claim(&self, _seat: Seat, options: ClaimOptions, _rng: &mut GameRng) -> Option<ClaimKind> {
        if !self.accept_claims {
            return None;
        }
        [ClaimKind::Hu, ClaimKind::Gang, ClaimKind::Peng, ClaimKind::Chi]
            .into_iter()
            .find(|&kind| options.allows(kind))
    }
}
