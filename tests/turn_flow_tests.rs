//! Turn controller scenarios: deal, discard, claims, self-gang, wins.

mod common;

use common::{face, human_config, rigged_state, rigged_table, ScriptedStrategy, FILLER};
use mahjong_engine::claims::ClaimKind;
use mahjong_engine::core::{Command, CommandOutcome, EngineConfig, IgnoreReason, RecordedAction, Seat};
use mahjong_engine::tiles::{MeldKind, Tile, TileFace, Wall, DEAL_TOTAL, TILE_COUNT};
use mahjong_engine::turn::{Notification, Step, TurnController, TurnPhase};

const HUMAN: Seat = Seat::new(0);
const EAST_AI: Seat = Seat::new(3);

const HUMAN_PENG: &str = "5B 5B 2A 3A 8A 9A 2C 3C 8C Red Red Green White";
const HUMAN_CHI: &str = "3B 4B 2A 3A 8A 9A 2C 3C 8C Red Red Green White";
const HUMAN_GANG: &str = "5B 5B 5B 2A 3A 8A 9A 2C 3C 8C Red Red Green";
const HUMAN_QUAD: &str = "E E E E 2A 3A 8A 9A 2C 3C 8C Red Red Green";
const COMPLETE: &str = "2A 2A 2A 3A 3A 3A 5A 5A 5A 6A 6A 6A Red Red";
const WINS_ON_5B: &str = "1A 2A 3A 4A 5A 6A 7A 8A 9A 1C 2C 3C 5B";

fn discarder_hand() -> String {
    format!("{FILLER} 5B")
}

/// Seat 3 is about to discard 5B; the human sits next in turn order.
fn human_after(hand: &str, next_draws: &str, strategy: ScriptedStrategy) -> TurnController {
    let seat3 = discarder_hand();
    rigged_table(
        [hand, FILLER, FILLER, &seat3],
        next_draws,
        TurnPhase::AwaitingDiscard(EAST_AI),
        strategy,
    )
}

/// A rigged table whose wall holds only `wall_tail`; every other undealt
/// tile is already in the discard pile.
fn nearly_exhausted(hands: [&str; 4], wall_tail: &str, phase: TurnPhase, strategy: ScriptedStrategy) -> TurnController {
    let config = human_config();
    let mut state = rigged_state(&config, hands, wall_tail, phase);
    let keep = TileFace::parse_list(wall_tail).unwrap().len();
    let tiles: Vec<Tile> = state.wall.iter().copied().collect();
    let (discarded, tail) = tiles.split_at(tiles.len() - keep);
    state.discard_pile.extend(discarded.iter().copied());
    state.wall = Wall::from_tiles(tail.iter().copied());
    TurnController::with_state(config, state)
        .unwrap()
        .with_strategy(strategy)
}

fn assert_wall_exhausted(controller: &mut TurnController) {
    assert_eq!(controller.phase(), TurnPhase::RoundDrawn);
    assert!(controller.pending().is_none());
    assert!(controller.modal().is_some());
    assert!(controller
        .state()
        .history
        .iter()
        .any(|r| r.action == RecordedAction::WallExhausted));
    assert!(controller.drain_notifications().contains(&Notification::WallExhausted));
    assert_conserved(controller);
}

fn assert_conserved(controller: &TurnController) {
    assert_eq!(controller.state().total_tiles(), TILE_COUNT);
    assert!(controller.state().check_invariants().is_ok());
}

// =============================================================================
// Deal
// =============================================================================

/// After the deal the dealer holds 14, the others 13, and the wall has lost
/// exactly the dealt tiles plus one per replaced flower.
#[test]
fn test_fresh_deal_sizes() {
    for seed in [1, 7, 42, 1234] {
        let config = human_config().with_seed(seed);
        let mut controller = TurnController::new(config).unwrap();
        assert!(controller.handle(Command::StartGame).is_accepted());

        let state = controller.state();
        let flowers: usize = state.players.values().map(|p| p.hand.flowers().len()).sum();
        assert_eq!(state.wall.len(), TILE_COUNT - DEAL_TOTAL - flowers);
        assert_eq!(state.players[HUMAN].hand.len(), 14);
        for seat in HUMAN.others() {
            assert_eq!(state.players[seat].hand.len(), 13);
        }
        for player in state.players.values() {
            assert!(player.hand.first_flower().is_none());
        }
        assert_conserved(&controller);

        let events = controller.drain_notifications();
        assert_eq!(events.first(), Some(&Notification::GameStarted { dealer: HUMAN }));
    }
}

/// The dealer discards first without drawing.
#[test]
fn test_ai_dealer_discards_first() {
    let config = human_config().with_dealer(Seat::new(2));
    let mut controller = TurnController::new(config).unwrap();
    controller.handle(Command::StartGame);
    controller.fire();

    assert_eq!(controller.phase(), TurnPhase::AwaitingDiscard(Seat::new(2)));
    assert_eq!(controller.pending().map(|p| p.step), Some(Step::AiTurn(Seat::new(2))));

    controller.fire();
    assert_eq!(controller.state().discard_pile.len(), 1);
    assert_eq!(controller.state().players[Seat::new(2)].hand.effective_len(), 13);
    assert_conserved(&controller);
}

/// The same seed replays the same round.
#[test]
fn test_seeded_rounds_are_reproducible() {
    let play = |seed| {
        let mut controller = TurnController::new(EngineConfig::simulation(seed)).unwrap();
        controller.handle(Command::StartGame);
        controller.run_until_blocked();
        (controller.phase(), controller.state().history.clone())
    };
    assert_eq!(play(99), play(99));
}

// =============================================================================
// Claims
// =============================================================================

/// The human is offered peng on the AI's discard and takes it.
#[test]
fn test_human_peng() {
    let mut table = human_after(HUMAN_PENG, "Green", ScriptedStrategy::discarding("5B"));
    assert_eq!(table.pending().map(|p| p.step), Some(Step::AiTurn(EAST_AI)));

    table.fire();
    let snapshot = table.snapshot();
    assert!(matches!(snapshot.phase, TurnPhase::AwaitingClaim { discarder, .. } if discarder == EAST_AI));
    assert!(snapshot.flags.peng);
    assert!(!snapshot.flags.hu && !snapshot.flags.chi && !snapshot.flags.gang);
    assert!(!snapshot.transition_pending);
    assert!(table
        .drain_notifications()
        .iter()
        .any(|n| matches!(n, Notification::ClaimOffered { seat, .. } if *seat == HUMAN)));

    assert!(table.handle(Command::DeclarePeng).is_accepted());
    let state = table.state();
    assert_eq!(state.phase, TurnPhase::AwaitingDiscard(HUMAN));
    assert_eq!(state.current_seat, HUMAN);
    assert!(state.discard_pile.is_empty());

    let hand = &state.players[HUMAN].hand;
    assert_eq!(hand.melds().len(), 1);
    assert_eq!(hand.melds()[0].kind, MeldKind::Peng);
    assert_eq!(hand.melds()[0].claimed_from, Some(EAST_AI));
    assert_eq!(hand.effective_len(), 14);
    assert!(table.pending().is_none());
    assert_conserved(&table);
}

/// Passing a claim moves play to the next seat's draw.
#[test]
fn test_human_pass_then_draw() {
    let mut table = human_after(HUMAN_PENG, "Green", ScriptedStrategy::discarding("5B"));
    table.fire();

    assert!(table.handle(Command::Pass).is_accepted());
    assert_eq!(table.phase(), TurnPhase::AwaitingDraw(HUMAN));
    assert_eq!(table.pending().map(|p| p.step), Some(Step::Draw(HUMAN)));
    assert!(!table.snapshot().flags.peng);

    table.fire();
    let state = table.state();
    assert_eq!(state.phase, TurnPhase::AwaitingDiscard(HUMAN));
    assert_eq!(state.players[HUMAN].hand.count_of(face("Green")), 2);
    assert_eq!(state.discard_pile.len(), 1);
    assert_conserved(&table);
}

/// Commands that do not match the open offer are ignored without effect.
#[test]
fn test_invalid_commands_during_offer() {
    let mut table = human_after(HUMAN_PENG, "Green", ScriptedStrategy::discarding("5B"));
    table.fire();
    let before = table.state().clone();

    assert_eq!(
        table.handle(Command::DeclareChi),
        CommandOutcome::Ignored(IgnoreReason::NotEligible)
    );
    assert_eq!(
        table.handle(Command::DeclareHu),
        CommandOutcome::Ignored(IgnoreReason::NotEligible)
    );
    assert_eq!(
        table.handle(Command::Select(0)),
        CommandOutcome::Ignored(IgnoreReason::NotYourTurn)
    );
    assert_eq!(
        table.handle(Command::StartGame),
        CommandOutcome::Ignored(IgnoreReason::RoundInProgress)
    );

    assert_eq!(table.state().players[HUMAN].hand, before.players[HUMAN].hand);
    assert_eq!(table.state().discard_pile, before.discard_pile);
    assert_eq!(table.phase(), before.phase);
}

/// An AI hu elsewhere outranks the human's peng; the human is never asked.
#[test]
fn test_ai_hu_beats_human_peng() {
    let seat3 = discarder_hand();
    let mut table = rigged_table(
        [HUMAN_PENG, WINS_ON_5B, FILLER, &seat3],
        "",
        TurnPhase::AwaitingDiscard(EAST_AI),
        ScriptedStrategy::discarding("5B").greedy(),
    );

    table.fire();
    assert!(!table.snapshot().flags.peng);
    assert_eq!(table.pending().map(|p| p.step), Some(Step::ProcessClaims));

    table.fire();
    let state = table.state();
    assert_eq!(state.phase, TurnPhase::RoundWonBy(Seat::new(1)));
    assert_eq!(state.players[Seat::new(1)].score, 100);
    assert!(state.players[Seat::new(1)].has_won);
    assert!(state.players[HUMAN].hand.melds().is_empty());
    assert!(table.modal().is_some());
    assert!(!table
        .drain_notifications()
        .iter()
        .any(|n| matches!(n, Notification::ClaimOffered { .. })));
    assert_conserved(&table);
}

/// The next seat may chi; peng is not offered without a pair.
#[test]
fn test_human_chi() {
    let mut table = human_after(HUMAN_CHI, "", ScriptedStrategy::discarding("5B"));
    table.fire();
    assert!(table.snapshot().flags.chi);

    assert_eq!(
        table.handle(Command::DeclarePeng),
        CommandOutcome::Ignored(IgnoreReason::NotEligible)
    );
    assert!(table.handle(Command::DeclareChi).is_accepted());

    let hand = &table.state().players[HUMAN].hand;
    let meld = &hand.melds()[0];
    assert_eq!(meld.kind, MeldKind::Chi);
    let faces: Vec<String> = meld.tiles.iter().map(|t| t.to_string()).collect();
    assert_eq!(faces, vec!["3B", "4B", "5B"]);
    assert_eq!(table.phase(), TurnPhase::AwaitingDiscard(HUMAN));
    assert_conserved(&table);
}

/// Gang on a discard takes a replacement from the tail.
#[test]
fn test_human_claim_gang_draws_replacement() {
    let mut table = human_after(HUMAN_GANG, "White", ScriptedStrategy::discarding("5B"));
    table.fire();
    let flags = table.snapshot().flags;
    assert!(flags.gang && flags.peng);

    let wall_before = table.state().wall.len();
    assert!(table.handle(Command::DeclareGang).is_accepted());

    let state = table.state();
    let hand = &state.players[HUMAN].hand;
    assert_eq!(hand.melds()[0].kind, MeldKind::Gang);
    assert_eq!(hand.melds()[0].tiles.len(), 4);
    assert_eq!(hand.count_of(face("White")), 1);
    assert_eq!(hand.effective_len(), 14);
    assert_eq!(state.wall.len(), wall_before - 1);
    assert_eq!(state.phase, TurnPhase::AwaitingDiscard(HUMAN));
    assert_conserved(&table);
}

/// A gang replacement that completes the hand wins at once.
#[test]
fn test_gang_replacement_can_win() {
    let hand = "5B 5B 5B 1C 2C 3C 4C 5C 6C 7C 8C 9C Red";
    let mut table = human_after(hand, "Red", ScriptedStrategy::discarding("5B"));
    table.fire();
    assert!(!table.snapshot().flags.hu);

    assert!(table.handle(Command::DeclareGang).is_accepted());
    assert_eq!(table.phase(), TurnPhase::RoundWonBy(HUMAN));
    assert_eq!(table.state().players[HUMAN].score, 100);
    assert_conserved(&table);
}

/// The human wins on a discard.
#[test]
fn test_human_hu_on_discard() {
    let hand = "5B 5B 1C 2C 3C 4C 5C 6C 7C 8C 9C Red Red";
    let mut table = human_after(hand, "", ScriptedStrategy::discarding("5B"));
    table.fire();

    let flags = table.snapshot().flags;
    assert!(flags.hu);
    assert!(!flags.peng, "peng is outranked by the human's own hu");

    assert!(table.handle(Command::DeclareHu).is_accepted());
    assert_eq!(table.phase(), TurnPhase::RoundWonBy(HUMAN));
    assert!(table.state().discard_pile.is_empty());
    assert!(table.drain_notifications().contains(&Notification::Won {
        seat: HUMAN,
        self_drawn: false,
        score: 100
    }));
    assert_conserved(&table);
}

// =============================================================================
// Own turn
// =============================================================================

/// A concealed quad can be melded on the human's own turn.
#[test]
fn test_human_self_gang() {
    let mut table = rigged_table(
        [HUMAN_QUAD, FILLER, FILLER, FILLER],
        "Green",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    let flags = table.snapshot().flags;
    assert!(flags.gang && !flags.hu);

    assert!(table.handle(Command::DeclareGang).is_accepted());
    let state = table.state();
    let hand = &state.players[HUMAN].hand;
    assert_eq!(hand.melds()[0].kind, MeldKind::Gang);
    assert_eq!(hand.melds()[0].claimed_from, None);
    assert_eq!(hand.count_of(face("Green")), 2);
    assert_eq!(hand.effective_len(), 14);
    assert_eq!(state.phase, TurnPhase::AwaitingDiscard(HUMAN));
    assert!(!table.snapshot().flags.gang);
    assert!(state
        .history
        .iter()
        .any(|r| r.action == RecordedAction::SelfGang(face("E"))));
    assert_conserved(&table);
}

/// A complete hand on the human's turn can be declared; the modal can be
/// dismissed and a new round started with fresh scores.
#[test]
fn test_human_self_drawn_win_and_restart() {
    let mut table = rigged_table(
        [COMPLETE, FILLER, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    assert!(table.snapshot().flags.hu);

    assert!(table.handle(Command::DeclareHu).is_accepted());
    assert_eq!(table.phase(), TurnPhase::RoundWonBy(HUMAN));
    assert_eq!(table.state().players[HUMAN].score, 100);
    assert!(table.state().players[HUMAN].has_won);
    assert_eq!(table.modal().map(|m| m.title.as_str()), Some("Hu!"));

    assert!(table.handle(Command::DismissModal).is_accepted());
    assert!(table.modal().is_none());

    assert!(table.handle(Command::StartGame).is_accepted());
    assert_eq!(table.phase(), TurnPhase::Dealing);
    assert_eq!(table.state().players[HUMAN].score, 0);
}

/// An AI with a complete hand declares before discarding.
#[test]
fn test_ai_self_drawn_win() {
    let mut table = rigged_table(
        [FILLER, COMPLETE, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(Seat::new(1)),
        ScriptedStrategy::default(),
    );
    table.fire();

    assert_eq!(table.phase(), TurnPhase::RoundWonBy(Seat::new(1)));
    assert!(table.state().discard_pile.is_empty());
    assert!(table.drain_notifications().contains(&Notification::Won {
        seat: Seat::new(1),
        self_drawn: true,
        score: 100
    }));
}

/// Sorting twice gives the same order as sorting once.
#[test]
fn test_sort_hand_idempotent() {
    let mut table = rigged_table(
        [HUMAN_QUAD, FILLER, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    table.handle(Command::SortHand);
    let once = table.state().players[HUMAN].hand.concealed().to_vec();
    table.handle(Command::SortHand);
    assert_eq!(table.state().players[HUMAN].hand.concealed(), once.as_slice());
}

/// The discard leaves the hand, lands on the pile and is recorded.
#[test]
fn test_human_discard_recorded() {
    let mut table = rigged_table(
        [HUMAN_QUAD, FILLER, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    let tile = table.state().players[HUMAN].hand.concealed()[13];

    table.handle(Command::Select(13));
    table.handle(Command::Select(13));

    let state = table.state();
    assert_eq!(state.discard_pile.back(), Some(&tile));
    assert_eq!(state.turn_number, 2);
    assert_eq!(
        state.history.last().map(|r| &r.action),
        Some(&RecordedAction::Discard(tile))
    );
    assert_conserved(&table);
}

// =============================================================================
// Gating
// =============================================================================

/// A table without a human ignores human commands.
#[test]
fn test_no_human_seat() {
    let mut controller = TurnController::new(EngineConfig::simulation(5)).unwrap();
    assert_eq!(
        controller.handle(Command::Select(0)),
        CommandOutcome::Ignored(IgnoreReason::NoHumanSeat)
    );
    assert_eq!(
        controller.handle(Command::DeclareGang),
        CommandOutcome::Ignored(IgnoreReason::NoHumanSeat)
    );
}

/// Reset drops the pending transition; the old generation no longer fires.
#[test]
fn test_reset_then_restart() {
    let mut controller = TurnController::new(human_config().with_dealer(Seat::new(1))).unwrap();
    controller.handle(Command::StartGame);
    controller.fire();
    let stale = controller.pending().unwrap().generation;

    assert!(controller.handle(Command::Reset).is_accepted());
    assert_eq!(controller.phase(), TurnPhase::Idle);
    assert_eq!(controller.state().total_tiles(), 0);

    assert!(controller.handle(Command::StartGame).is_accepted());
    assert!(!controller.fire_if_current(stale));
    assert_eq!(controller.phase(), TurnPhase::Dealing);

    let fresh = controller.pending().unwrap().generation;
    assert!(controller.fire_if_current(fresh));
    assert_eq!(controller.phase(), TurnPhase::AwaitingDiscard(Seat::new(1)));
}

/// An all-AI round runs to a terminal state on its own.
#[test]
fn test_simulation_reaches_terminal() {
    let mut controller = TurnController::new(EngineConfig::simulation(2024)).unwrap();
    controller.handle(Command::StartGame);
    let fired = controller.run_until_blocked();

    assert!(fired > 0);
    assert!(controller.phase().is_terminal());
    assert!(controller.modal().is_some());
    assert_conserved(&controller);
    if controller.phase() == TurnPhase::RoundDrawn {
        assert!(controller
            .state()
            .history
            .iter()
            .any(|r| r.action == RecordedAction::WallExhausted));
    }
}

/// An unclaimed discard with nothing left to draw ends the round drawn.
#[test]
fn test_unclaimed_discard_on_empty_wall_draws_round() {
    let hand = "2A 5A 8A 2B 5B 8B 2C 5C 8C E E Red Red Green";
    let mut table = nearly_exhausted(
        [hand, FILLER, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    assert!(table.state().wall.is_empty());

    assert!(table.handle(Command::Select(0)).is_accepted());
    assert!(table.handle(Command::Select(0)).is_accepted());

    assert_eq!(table.state().players[HUMAN].hand.effective_len(), 13);
    assert_wall_exhausted(&mut table);
}

/// A flower drawn as the last tile leaves its replacement owed; the round
/// ends drawn with the flower set aside.
#[test]
fn test_flower_replacement_on_empty_wall_draws_round() {
    let seat3 = discarder_hand();
    let mut table = nearly_exhausted(
        [FILLER, FILLER, FILLER, &seat3],
        "F0",
        TurnPhase::AwaitingDiscard(EAST_AI),
        ScriptedStrategy::discarding("5B"),
    );
    table.fire();
    assert_eq!(table.phase(), TurnPhase::AwaitingDraw(HUMAN));
    assert_eq!(table.state().wall.len(), 1);

    table.fire();
    let hand = &table.state().players[HUMAN].hand;
    assert_eq!(hand.flowers().len(), 1);
    assert_eq!(hand.concealed().len(), 13);
    assert_wall_exhausted(&mut table);
}

/// A self gang with no replacement left ends the round drawn.
#[test]
fn test_gang_replacement_on_empty_wall_draws_round() {
    let mut table = nearly_exhausted(
        [HUMAN_QUAD, FILLER, FILLER, FILLER],
        "",
        TurnPhase::AwaitingDiscard(HUMAN),
        ScriptedStrategy::default(),
    );
    assert!(table.snapshot().flags.gang);

    assert!(table.handle(Command::DeclareGang).is_accepted());
    assert_eq!(table.state().players[HUMAN].hand.melds()[0].kind, MeldKind::Gang);
    assert_wall_exhausted(&mut table);
}

/// Claims by AI seats go through the strategy.
#[test]
fn test_ai_peng_through_strategy() {
    let seat3 = discarder_hand();
    let mut table = rigged_table(
        [FILLER, HUMAN_PENG, FILLER, &seat3],
        "",
        TurnPhase::AwaitingDiscard(EAST_AI),
        ScriptedStrategy::discarding("5B").greedy(),
    );
    table.fire();
    assert_eq!(table.pending().map(|p| p.step), Some(Step::ProcessClaims));
    table.fire();

    let state = table.state();
    assert_eq!(state.phase, TurnPhase::AwaitingDiscard(Seat::new(1)));
    assert_eq!(state.players[Seat::new(1)].hand.melds()[0].kind, MeldKind::Peng);
    assert!(state
        .history
        .iter()
        .any(|r| matches!(r.action, RecordedAction::Claim { kind: ClaimKind::Peng, .. })));
    assert_eq!(table.pending().map(|p| p.step), Some(Step::AiTurn(Seat::new(1))));
    assert_conserved(&table);
}
