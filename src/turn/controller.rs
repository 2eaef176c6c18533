//! The turn controller: sole mutator of `GameState`.
//!
//! ## Driving the controller
//!
//! The host feeds human intents through `handle` and runs automatic steps
//! with `fire` once the pending transition's delay has elapsed (or
//! `run_until_blocked` to collapse every delay). After each call the host
//! reads a `Snapshot` and drains `Notification`s.
//!
//! ```text
//! handle(StartGame)   -> Dealing, FinishDeal pending
//! fire()              -> AwaitingDiscard(dealer), AiTurn pending (or human input)
//! fire()              -> discard -> AwaitingClaim -> ProcessClaims / Draw pending
//! ...
//! ```
//!
//! Every command or step that changes state is followed by an invariant
//! check in debug builds.

use log::{debug, info, warn};
use smallvec::{smallvec, SmallVec};

use super::phase::TurnPhase;
use super::scheduler::{PendingTransition, Scheduler, Step};
use super::snapshot::{Modal, Notification, Snapshot};
use crate::ai::{CountingStrategy, SeatStrategy};
use crate::claims::{Claim, ClaimKind, ClaimOptions, ClaimResolver, ClaimWindow, Discard};
use crate::core::{
    Command, CommandOutcome, EngineConfig, EngineResult, GameRng, GameState, IgnoreReason,
    RecordedAction, Seat,
};
use crate::rules::HandEvaluator;
use crate::tiles::{Hand, Meld, MeldKind, TileFace, Wall, DEAL_TOTAL};

type HumanResult = Result<(), IgnoreReason>;

/// Orchestrates deal, discard, claim and draw for one table.
pub struct TurnController {
    config: EngineConfig,
    state: GameState,
    /// Policy for every non-human seat.
    strategy: Box<dyn SeatStrategy>,
    scheduler: Scheduler,
    /// Source of per-round RNG streams.
    rng: GameRng,
    /// Concealed index the human has selected for discard.
    selected: Option<usize>,
    status: String,
    modal: Option<Modal>,
    notifications: Vec<Notification>,
}

impl TurnController {
    /// Create an idle controller.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed);
        let state = GameState::new(&config, rng.fork());
        let strategy = CountingStrategy::new(config.ai_claim_probability);

        Ok(Self {
            config,
            state,
            strategy: Box::new(strategy),
            scheduler: Scheduler::new(),
            rng,
            selected: None,
            status: "Press start to begin".to_string(),
            modal: None,
            notifications: Vec::new(),
        })
    }

    /// Resume from a prepared state.
    ///
    /// The state must satisfy the engine invariants. Whatever the phase
    /// implies next (an AI turn, a draw, a human decision) is set up as if
    /// the controller had just entered it.
    pub fn with_state(config: EngineConfig, state: GameState) -> EngineResult<Self> {
        state.check_invariants()?;
        let mut controller = Self::new(config)?;
        controller.state = state;
        controller.resume();
        Ok(controller)
    }

    /// Replace the policy used for non-human seats.
    #[must_use]
    pub fn with_strategy<S: SeatStrategy + 'static>(mut self, strategy: S) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.state.phase
    }

    /// The transition waiting to be fired, if any.
    #[must_use]
    pub fn pending(&self) -> Option<PendingTransition> {
        self.scheduler.pending()
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    #[must_use]
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    /// Capture the display state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(
            &self.state,
            self.config.human_seat,
            self.selected,
            &self.status,
            self.modal.as_ref(),
            self.scheduler.is_pending(),
        )
    }

    /// Take every notification queued since the last drain.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // === Commands ===

    /// Apply a human intent. Ignored commands leave state untouched.
    pub fn handle(&mut self, command: Command) -> CommandOutcome {
        let result = match command {
            Command::DismissModal => {
                self.modal = None;
                Ok(())
            }
            Command::Reset => {
                self.reset();
                Ok(())
            }
            _ if self.scheduler.is_pending() => Err(IgnoreReason::TransitionPending),
            Command::StartGame => self.start_round(),
            Command::Select(index) => self.human().and_then(|seat| self.select(seat, index)),
            Command::DeclareHu => self.human().and_then(|seat| self.declare(seat, ClaimKind::Hu)),
            Command::DeclarePeng => self.human().and_then(|seat| self.declare(seat, ClaimKind::Peng)),
            Command::DeclareChi => self.human().and_then(|seat| self.declare(seat, ClaimKind::Chi)),
            Command::DeclareGang => self.human().and_then(|seat| self.declare(seat, ClaimKind::Gang)),
            Command::Pass => self.human().and_then(|seat| self.pass(seat)),
            Command::SortHand => self.human().map(|seat| {
                self.state.players[seat].hand.sort();
                self.selected = None;
            }),
        };

        match result {
            Ok(()) => {
                self.check_invariants();
                CommandOutcome::Accepted
            }
            Err(reason) => {
                warn!("ignored {command:?}: {reason}");
                CommandOutcome::Ignored(reason)
            }
        }
    }

    fn human(&self) -> Result<Seat, IgnoreReason> {
        self.config.human_seat.ok_or(IgnoreReason::NoHumanSeat)
    }

    fn is_human(&self, seat: Seat) -> bool {
        self.config.is_human(seat)
    }

    fn select(&mut self, human: Seat, index: usize) -> HumanResult {
        if self.state.phase != TurnPhase::AwaitingDiscard(human) {
            return Err(IgnoreReason::NotYourTurn);
        }
        let Some(&tile) = self.state.players[human].hand.concealed().get(index) else {
            return Err(IgnoreReason::InvalidIndex);
        };

        if self.selected == Some(index) {
            self.discard(human, index);
        } else {
            self.selected = Some(index);
            self.status = format!("Selected {tile}; select it again to discard");
        }
        Ok(())
    }

    fn declare(&mut self, human: Seat, kind: ClaimKind) -> HumanResult {
        match self.state.phase {
            TurnPhase::AwaitingDiscard(seat) if seat == human => {
                let options = self.state.eligibility[human];
                match kind {
                    ClaimKind::Hu if options.hu => {
                        self.win(human, true);
                        Ok(())
                    }
                    ClaimKind::Gang if options.gang => self.self_gang(human),
                    _ => Err(IgnoreReason::NotEligible),
                }
            }
            TurnPhase::AwaitingClaim { .. } => {
                let window = self.state.claim_window.as_ref().ok_or(IgnoreReason::NotEligible)?;
                let candidate = window
                    .current()
                    .filter(|c| c.seat == human && c.options.allows(kind))
                    .ok_or(IgnoreReason::NotEligible)?;
                let claim = Claim {
                    seat: candidate.seat,
                    kind,
                    discard: window.discard,
                };
                self.apply_claim(claim);
                Ok(())
            }
            _ => Err(IgnoreReason::NotEligible),
        }
    }

    fn pass(&mut self, human: Seat) -> HumanResult {
        let window = self
            .state
            .claim_window
            .as_mut()
            .filter(|w| w.current().is_some_and(|c| c.seat == human))
            .ok_or(IgnoreReason::NotEligible)?;
        window.decline();
        self.state.eligibility[human] = ClaimOptions::NONE;
        debug!("{human} passes");
        self.advance_window();
        Ok(())
    }

    // === Transitions ===

    /// Run the pending transition now. Returns false if nothing was pending.
    pub fn fire(&mut self) -> bool {
        let Some(PendingTransition { step, .. }) = self.scheduler.take() else {
            return false;
        };
        debug!("running {step:?}");

        match step {
            Step::FinishDeal => {
                let dealer = self.state.dealer_seat;
                self.notify(Notification::Dealt {
                    wall_remaining: self.state.wall.len(),
                });
                self.begin_discard_turn(dealer);
            }
            Step::AiTurn(seat) => self.ai_turn(seat),
            Step::ProcessClaims => self.process_ai_claims(),
            Step::Draw(seat) => {
                debug_assert_eq!(self.state.phase, TurnPhase::AwaitingDraw(seat));
                if self.draw_into(seat) {
                    self.begin_discard_turn(seat);
                }
            }
        }

        self.check_invariants();
        true
    }

    /// Fire only if `generation` still names the pending transition.
    ///
    /// Hosts that run real timers pass the generation they scheduled; a
    /// timer outliving a reset is then a no-op.
    pub fn fire_if_current(&mut self, generation: u64) -> bool {
        if !self.scheduler.is_current(generation) {
            debug!("stale transition {generation} dropped");
            return false;
        }
        self.fire()
    }

    /// Fire transitions until the round ends or waits for human input.
    /// Returns the number of transitions run.
    pub fn run_until_blocked(&mut self) -> usize {
        let mut fired = 0;
        while self.fire() {
            fired += 1;
        }
        fired
    }

    fn start_round(&mut self) -> HumanResult {
        if !self.state.phase.accepts_start() {
            return Err(IgnoreReason::RoundInProgress);
        }

        self.scheduler.cancel();
        self.state = GameState::new(&self.config, self.rng.fork());
        self.selected = None;
        self.modal = None;

        let dealer = self.state.dealer_seat;
        let mut wall = Wall::build();
        wall.shuffle(&mut self.state.rng);
        let Some(hands) = wall.deal_initial(dealer) else {
            warn!("wall too short to deal");
            return Ok(());
        };
        for (seat, tiles) in hands.iter() {
            self.state.players[seat].hand = Hand::from_tiles(tiles.iter().copied());
        }
        self.state.wall = wall;
        self.state.current_seat = dealer;

        info!("round started: dealer {dealer}, seed {}", self.state.rng.seed());
        self.set_phase(TurnPhase::Dealing);
        self.state.record(dealer, RecordedAction::Deal { dealer });
        self.notify(Notification::GameStarted { dealer });

        for seat in std::iter::once(dealer).chain(dealer.others()) {
            if !self.replace_flowers(seat) {
                return Ok(());
            }
        }
        for (_, player) in self.state.players.iter_mut() {
            player.hand.sort();
        }

        self.status = "Dealing".to_string();
        self.scheduler
            .schedule(Step::FinishDeal, self.config.pacing.deal_ms * DEAL_TOTAL as u64);
        Ok(())
    }

    fn reset(&mut self) {
        if let Some(pending) = self.scheduler.cancel() {
            debug!("cancelled {:?}", pending.step);
        }
        self.state = GameState::new(&self.config, self.rng.fork());
        self.selected = None;
        self.modal = None;
        self.status = "Press start to begin".to_string();
        info!("table reset");
    }

    /// Set up whatever the current phase expects next.
    fn resume(&mut self) {
        match self.state.phase {
            TurnPhase::Dealing => {
                self.scheduler.schedule(Step::FinishDeal, 0);
            }
            TurnPhase::AwaitingDiscard(seat) => self.begin_discard_turn(seat),
            TurnPhase::AwaitingDraw(seat) => {
                self.scheduler.schedule(Step::Draw(seat), self.config.pacing.draw_ms);
            }
            TurnPhase::AwaitingClaim { .. } => {
                if self.state.claim_window.is_some() {
                    self.advance_window();
                } else if let Some(discard) = self.state.last_discard {
                    self.open_claims(discard);
                }
            }
            TurnPhase::ResolvingClaim(claim) => self.apply_claim(claim),
            TurnPhase::Idle | TurnPhase::RoundWonBy(_) | TurnPhase::RoundDrawn => {}
        }
    }

    fn begin_discard_turn(&mut self, seat: Seat) {
        self.state.current_seat = seat;
        self.state.clear_eligibility();
        self.selected = None;
        self.set_phase(TurnPhase::AwaitingDiscard(seat));

        if self.is_human(seat) {
            let hand = &self.state.players[seat].hand;
            let options = ClaimOptions {
                hu: HandEvaluator::is_winning_hand_with_melds(hand.concealed(), hand.melds().len()),
                gang: HandEvaluator::can_gang(hand.concealed()),
                ..ClaimOptions::NONE
            };
            self.state.eligibility[seat] = options;
            self.status = if options.hu {
                "You can declare hu, or select a tile to discard".to_string()
            } else {
                "Your turn: select a tile to discard".to_string()
            };
        } else {
            self.status = format!("{} is thinking", self.state.players[seat].name);
            self.scheduler.schedule(Step::AiTurn(seat), self.config.pacing.think_ms);
        }
    }

    fn ai_turn(&mut self, seat: Seat) {
        debug_assert_eq!(self.state.phase, TurnPhase::AwaitingDiscard(seat));

        let hand = &self.state.players[seat].hand;
        if HandEvaluator::is_winning_hand_with_melds(hand.concealed(), hand.melds().len())
            && self.strategy.declare_self_win(seat, hand)
        {
            self.win(seat, true);
            return;
        }

        let GameState { players, rng, .. } = &mut self.state;
        let hand = &players[seat].hand;
        let len = hand.len();
        let mut index = self.strategy.choose_discard(seat, hand, rng);
        if index >= len {
            warn!("{seat} chose discard {index} from {len} tiles; using 0");
            index = 0;
        }
        self.discard(seat, index);
    }

    fn discard(&mut self, seat: Seat, index: usize) {
        let Some(tile) = self.state.players[seat].hand.remove_at(index) else {
            return;
        };
        self.selected = None;
        self.state.discard_pile.push_back(tile);
        self.state.record(seat, RecordedAction::Discard(tile));
        self.state.turn_number += 1;
        self.notify(Notification::Discarded { seat, tile });
        self.status = format!("{} discarded {tile}", self.state.players[seat].name);

        let discard = Discard { tile, seat };
        self.state.last_discard = Some(discard);
        self.set_phase(TurnPhase::AwaitingClaim {
            tile,
            discarder: seat,
        });
        self.open_claims(discard);
    }

    fn open_claims(&mut self, discard: Discard) {
        match ClaimResolver::open_window(&self.state, discard) {
            Some(window) => {
                self.state.claim_window = Some(window);
                self.advance_window();
            }
            None => self.no_claim(discard.seat),
        }
    }

    /// Move the window to its next step: offer the human, schedule the AI
    /// candidates, or close it when everyone has declined.
    fn advance_window(&mut self) {
        let Some(window) = &self.state.claim_window else {
            return;
        };
        let discard = window.discard;

        match window.current() {
            None => self.no_claim(discard.seat),
            Some(candidate) if self.is_human(candidate.seat) => {
                self.state.eligibility[candidate.seat] = candidate.options;
                self.notify(Notification::ClaimOffered {
                    seat: candidate.seat,
                    options: candidate.options,
                });
                self.status = format!(
                    "{} discarded {}: you may {} or pass",
                    self.state.players[discard.seat].name,
                    discard.tile,
                    describe(candidate.options)
                );
            }
            Some(_) => {
                self.scheduler.schedule(Step::ProcessClaims, self.config.pacing.claim_ms);
            }
        }
    }

    /// Ask AI candidates in order until one claims or the human is reached.
    fn process_ai_claims(&mut self) {
        while let Some(candidate) = self.state.claim_window.as_ref().and_then(ClaimWindow::current) {
            if self.is_human(candidate.seat) {
                break;
            }

            let GameState {
                rng, claim_window, ..
            } = &mut self.state;
            match self.strategy.decide_claim(candidate.seat, candidate.options, rng) {
                Some(kind) if candidate.options.allows(kind) => {
                    let Some(discard) = claim_window.as_ref().map(|w| w.discard) else {
                        return;
                    };
                    self.apply_claim(Claim {
                        seat: candidate.seat,
                        kind,
                        discard,
                    });
                    return;
                }
                _ => {
                    debug!("{} declines", candidate.seat);
                    if let Some(window) = claim_window.as_mut() {
                        window.decline();
                    }
                }
            }
        }
        self.advance_window();
    }

    fn no_claim(&mut self, discarder: Seat) {
        self.state.claim_window = None;
        self.state.last_discard = None;
        self.state.clear_eligibility();

        if self.state.wall.is_empty() {
            self.end_drawn();
            return;
        }
        let next = discarder.next();
        self.state.current_seat = next;
        self.set_phase(TurnPhase::AwaitingDraw(next));
        self.scheduler.schedule(Step::Draw(next), self.config.pacing.draw_ms);
    }

    fn apply_claim(&mut self, claim: Claim) {
        let Claim { seat, kind, discard } = claim;
        self.set_phase(TurnPhase::ResolvingClaim(claim));
        self.state.claim_window = None;
        self.state.last_discard = None;
        self.state.clear_eligibility();
        self.selected = None;

        let Some(tile) = self.state.discard_pile.pop_back() else {
            warn!("{seat} claimed {} but the discard pile is empty", discard.tile);
            self.no_claim(discard.seat);
            return;
        };
        debug_assert_eq!(tile, discard.tile, "claimed tile is not the latest discard");

        let hand = &mut self.state.players[seat].hand;
        if kind == ClaimKind::Hu {
            hand.push(tile);
            self.state.record(seat, RecordedAction::Claim { kind, tile });
            self.notify(Notification::Claimed { seat, kind, tile });
            self.win(seat, false);
            return;
        }

        let taken = meld_faces(hand, kind, tile.face)
            .and_then(|(meld_kind, faces)| hand.take_faces(&faces).map(|taken| (meld_kind, taken)));
        let Some((meld_kind, taken)) = taken else {
            warn!("{seat} cannot form {kind} with {tile}");
            self.state.discard_pile.push_back(tile);
            self.no_claim(discard.seat);
            return;
        };
        hand.add_meld(Meld::new(
            meld_kind,
            taken.into_iter().chain(std::iter::once(tile)),
            Some(discard.seat),
        ));

        self.state.current_seat = seat;
        self.state.record(seat, RecordedAction::Claim { kind, tile });
        self.notify(Notification::Claimed { seat, kind, tile });
        self.status = format!("{} claims {tile} ({kind})", self.state.players[seat].name);
        debug!("{seat} melded {kind} on {tile} from {}", discard.seat);

        if kind == ClaimKind::Gang && !self.draw_into(seat) {
            return;
        }
        self.state.players[seat].hand.sort();

        let hand = &self.state.players[seat].hand;
        if HandEvaluator::is_winning_hand_with_melds(hand.concealed(), hand.melds().len()) {
            self.win(seat, false);
            return;
        }
        self.begin_discard_turn(seat);
    }

    fn self_gang(&mut self, seat: Seat) -> HumanResult {
        let hand = &mut self.state.players[seat].hand;
        let face = HandEvaluator::quad_face(hand.concealed()).ok_or(IgnoreReason::NotEligible)?;
        let taken = hand.take_faces(&[face; 4]).ok_or(IgnoreReason::NotEligible)?;
        hand.add_meld(Meld::new(MeldKind::Gang, taken, None));

        self.state.record(seat, RecordedAction::SelfGang(face));
        self.notify(Notification::SelfGang { seat, face });
        debug!("{seat} declared a concealed gang of {face}");

        if self.draw_into(seat) {
            self.begin_discard_turn(seat);
        }
        Ok(())
    }

    /// Draw one tile from the tail into `seat`'s hand, replacing flowers.
    ///
    /// Returns false if the wall ran out and the round ended.
    fn draw_into(&mut self, seat: Seat) -> bool {
        let Some(tile) = self.state.wall.draw_one() else {
            self.end_drawn();
            return false;
        };
        self.state.players[seat].hand.push(tile);
        self.state.record(seat, RecordedAction::Draw);
        let shown = self.is_human(seat).then_some(tile);
        self.notify(Notification::Drew { seat, tile: shown });

        if !self.replace_flowers(seat) {
            return false;
        }
        self.state.players[seat].hand.sort();
        true
    }

    /// Returns false if the wall ran out mid-replacement and the round ended.
    fn replace_flowers(&mut self, seat: Seat) -> bool {
        let GameState { wall, players, .. } = &mut self.state;
        let replacement = wall.replace_flowers(&mut players[seat].hand);

        if replacement.flowers > 0 {
            let count = replacement.flowers;
            debug!("{seat} replaced {count} flower(s)");
            self.state.record(seat, RecordedAction::FlowerReplaced { count });
            self.notify(Notification::FlowerReplaced { seat, count });
        }
        if replacement.exhausted {
            self.end_drawn();
            return false;
        }
        true
    }

    fn win(&mut self, seat: Seat, self_drawn: bool) {
        let score = self.config.win_score;
        let player = &mut self.state.players[seat];
        player.score += score;
        player.has_won = true;
        let name = player.name.clone();

        self.state.clear_eligibility();
        self.selected = None;
        self.state.record(seat, RecordedAction::Win { self_drawn });
        self.set_phase(TurnPhase::RoundWonBy(seat));
        self.notify(Notification::Won {
            seat,
            self_drawn,
            score,
        });
        info!("{seat} ({name}) wins, self-drawn: {self_drawn}");

        self.status = format!("{name} wins!");
        self.modal = Some(Modal {
            title: "Hu!".to_string(),
            message: format!("{name} completed a winning hand. +{score} points"),
        });
    }

    fn end_drawn(&mut self) {
        self.state.claim_window = None;
        self.state.last_discard = None;
        self.state.clear_eligibility();
        self.selected = None;

        let seat = self.state.current_seat;
        self.state.record(seat, RecordedAction::WallExhausted);
        self.set_phase(TurnPhase::RoundDrawn);
        self.notify(Notification::WallExhausted);
        info!("wall exhausted after {} turns", self.state.turn_number);

        self.status = "The wall is exhausted".to_string();
        self.modal = Some(Modal {
            title: "Draw".to_string(),
            message: "The wall is exhausted. Nobody wins this round.".to_string(),
        });
    }

    // === Helpers ===

    fn set_phase(&mut self, phase: TurnPhase) {
        debug!("{} -> {}", self.state.phase, phase);
        self.state.phase = phase;
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn check_invariants(&self) {
        let checked = self.state.check_invariants();
        debug_assert!(
            checked.is_ok(),
            "invariant violated while {}: {checked:?}",
            self.state.phase
        );
    }
}

/// Concealed faces a claim consumes alongside the discard, and the meld it forms.
fn meld_faces(hand: &Hand, kind: ClaimKind, face: TileFace) -> Option<(MeldKind, SmallVec<[TileFace; 3]>)> {
    match kind {
        ClaimKind::Hu => None,
        ClaimKind::Peng => Some((MeldKind::Peng, smallvec![face; 2])),
        ClaimKind::Gang => Some((MeldKind::Gang, smallvec![face; 3])),
        ClaimKind::Chi => HandEvaluator::chi_options(hand.concealed(), face)
            .first()
            .map(|pair| (MeldKind::Chi, pair.iter().copied().collect())),
    }
}

/// "hu", "gang/peng", ... for a status line.
fn describe(options: ClaimOptions) -> String {
    [ClaimKind::Hu, ClaimKind::Gang, ClaimKind::Peng, ClaimKind::Chi]
        .into_iter()
        .filter(|&kind| options.allows(kind))
        .map(|kind| kind.to_string())
        .collect::<Vec<_>>()
        .join("/")
}
