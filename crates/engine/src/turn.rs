//! Turn controller - the battle session state machine
//!
//! The controller owns the whole session: grid, both actors, RNG, cascade
//! resolver, move evaluator and config. An external loop drives it with
//! [`TurnController::tick`], passing the renderer's "grid idle" signal and the
//! elapsed time; input collaborators call [`TurnController::submit_swap`] or
//! [`TurnController::submit_agent_move`].
//!
//! Phase flow:
//!
//! ```text
//! Ready --start--> AwaitingInput (human/agent) | Thinking (ai)
//!   AwaitingInput --matching swap / time up / forfeit--> Settling
//!   Thinking --think delay, idle--> Settling
//!   Settling --idle for settle delay--> next side's turn | Finished
//! ```
//!
//! Swaps resolve synchronously; the turn's match groups are buffered and applied
//! as one effect bundle when the turn settles. Settlement is guarded so a second
//! trigger while one is in flight is ignored.

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::agent::{AgentSignal, InvalidMoveTracker, InvalidVerdict, MoveSpace, SignalKind};
use crate::agent::{CHANGED_MOVE_REWARD, INVALID_MOVE_PENALTY, LOSS_PENALTY};
use crate::agent::{REPEATED_MOVE_PENALTY, RETRY_CEILING_PENALTY, WIN_REWARD};
use crate::core::{
    apply_effects, compute_effects, Actor, AppliedEffects, BattleConfig, CascadeResolver,
    ControllerKind, EffectBundle, Grid, GridSnapshot, MatchGroup, SimpleRng, SwapRejection,
    SwapVerdict,
};
use crate::core::config::TurnConfig;
use crate::evaluator::{MoveEvaluator, ScoredMove};
use crate::events::{BattleEvent, BattleObserver, SkipReason, TurnRecord};
use crate::types::{Coord, Side};

/// Session-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("battle session has no grid")]
    MissingGrid,
    #[error("battle session is disabled")]
    Disabled,
    #[error("battle has not started")]
    NotStarted,
    #[error("battle is already finished")]
    Finished,
}

/// Controller phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Startup failed; every call is a no-op
    Disabled,
    /// Constructed, not started
    Ready,
    /// Waiting for a human or agent move
    AwaitingInput,
    /// AI think delay
    Thinking,
    /// Waiting for the grid to go idle before applying the turn
    Settling,
    Finished,
}

/// Signal produced by advancing the turn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    None,
    Warning { remaining_ms: i64 },
    TimeUp,
}

/// Per-turn countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnTimer {
    limit_ms: i64,
    warning_ms: i64,
    remaining_ms: i64,
    running: bool,
    warned: bool,
}

impl TurnTimer {
    pub fn new(config: &TurnConfig) -> Self {
        let mut timer = Self {
            limit_ms: config.time_limit_ms,
            warning_ms: config.warning_ms,
            remaining_ms: 0,
            running: false,
            warned: false,
        };
        timer.reset();
        timer
    }

    /// Rewind to the full limit and run (a limit <= 0 never runs)
    pub fn reset(&mut self) {
        self.remaining_ms = self.limit_ms.max(0);
        self.running = self.limit_ms > 0;
        self.warned = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining_ms(&self) -> i64 {
        self.remaining_ms
    }

    /// Count down; the warning fires at most once per reset
    pub fn advance(&mut self, elapsed_ms: u32) -> TimerSignal {
        if !self.running {
            return TimerSignal::None;
        }
        self.remaining_ms -= i64::from(elapsed_ms);
        if self.remaining_ms <= 0 {
            self.remaining_ms = 0;
            self.running = false;
            return TimerSignal::TimeUp;
        }
        if !self.warned && self.remaining_ms <= self.warning_ms {
            self.warned = true;
            return TimerSignal::Warning {
                remaining_ms: self.remaining_ms,
            };
        }
        TimerSignal::None
    }
}

/// Result of a swap submitted through the input path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Matches formed and the cascade resolved; the turn is settling
    Resolved { passes: usize, destroyed: usize },
    /// No match formed; the swap was undone and the turn goes on
    Reverted,
    /// Refused before touching the grid
    Rejected(SwapRejection),
    /// Input is closed for this side
    Gated,
}

/// Result of a move index submitted by an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMoveOutcome {
    Resolved { passes: usize, destroyed: usize },
    /// Invalid, reverted or banned pick; the agent may retry
    Invalid { attempts: u32 },
    /// Retry ceiling hit; the turn is skipped
    Forfeited,
    Gated,
}

fn side_slot(side: Side) -> usize {
    match side {
        Side::Player => 0,
        Side::Enemy => 1,
    }
}

/// Battle session
pub struct TurnController {
    config: BattleConfig,
    grid: Option<Grid>,
    rng: SimpleRng,
    resolver: CascadeResolver,
    evaluator: MoveEvaluator,
    move_space: MoveSpace,
    trackers: [InvalidMoveTracker; 2],
    player: Actor,
    enemy: Actor,

    phase: TurnPhase,
    active: Side,
    turn: u32,
    timer: TurnTimer,
    input_open: bool,
    /// Settlement guard
    settling: bool,
    idle_ms: u32,
    think_ms: u32,

    pending: Vec<MatchGroup>,
    pending_passes: usize,
    pending_swap: Option<(Coord, Coord)>,
    timed_out: bool,
    skipped: Option<SkipReason>,

    history: Vec<TurnRecord>,
    winner: Option<Side>,
    observers: Vec<Box<dyn BattleObserver>>,
}

impl TurnController {
    /// Create a session with a freshly populated, match-free grid
    pub fn new(config: BattleConfig) -> Self {
        let mut rng = SimpleRng::new(config.seed);
        let mut grid = Grid::new(config.grid.width, config.grid.height);
        grid.populate(&mut rng);
        let mut controller = Self::assemble(config, Some(grid));
        controller.rng = rng;
        controller
    }

    /// Create a session around an existing grid (or none, which fails at start)
    pub fn with_grid(config: BattleConfig, grid: Option<Grid>) -> Self {
        Self::assemble(config, grid)
    }

    fn assemble(config: BattleConfig, grid: Option<Grid>) -> Self {
        let (width, height) = match &grid {
            Some(grid) => (grid.width(), grid.height()),
            None => (config.grid.width, config.grid.height),
        };
        let ceiling = config.ai.max_invalid_retries;
        Self {
            rng: SimpleRng::new(config.seed),
            resolver: CascadeResolver::new(),
            evaluator: MoveEvaluator::new(&config.ai, &config.effects),
            move_space: MoveSpace::new(width, height),
            trackers: [InvalidMoveTracker::new(ceiling), InvalidMoveTracker::new(ceiling)],
            player: Actor::new(&config.player),
            enemy: Actor::new(&config.enemy),
            phase: TurnPhase::Ready,
            active: config.turn.first_side,
            turn: 0,
            timer: TurnTimer::new(&config.turn),
            input_open: false,
            settling: false,
            idle_ms: 0,
            think_ms: 0,
            pending: Vec::new(),
            pending_passes: 0,
            pending_swap: None,
            timed_out: false,
            skipped: None,
            history: Vec::new(),
            winner: None,
            observers: Vec::new(),
            grid,
            config,
        }
    }

    /// Register an observer for every later event
    pub fn subscribe(&mut self, observer: impl BattleObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: BattleEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    fn log(&mut self, message: String) {
        self.emit(BattleEvent::CombatLog { message });
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn turn_number(&self) -> u32 {
        self.turn
    }

    pub fn is_input_open(&self) -> bool {
        self.input_open
    }

    pub fn is_settling(&self) -> bool {
        self.settling
    }

    pub fn is_finished(&self) -> bool {
        self.phase == TurnPhase::Finished
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn snapshot(&self) -> Option<GridSnapshot> {
        self.grid.as_ref().map(Grid::snapshot)
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn enemy(&self) -> &Actor {
        &self.enemy
    }

    pub fn actor(&self, side: Side) -> &Actor {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Match groups resolved so far in the current turn
    pub fn pending_groups(&self) -> &[MatchGroup] {
        &self.pending
    }

    pub fn move_space(&self) -> MoveSpace {
        self.move_space
    }

    /// Allowed agent move indices for `side` this turn
    pub fn action_mask(&self, side: Side) -> Vec<bool> {
        self.trackers[side_slot(side)].action_mask(&self.move_space)
    }

    /// The evaluator's pick for the current grid, without playing it
    pub fn suggest_move(&self) -> Option<ScoredMove> {
        self.grid.as_ref().and_then(|grid| self.evaluator.evaluate(grid))
    }

    fn controller_kind(&self, side: Side) -> ControllerKind {
        self.config.controllers.for_side(side)
    }

    fn actors_mut(&mut self, attacker: Side) -> (&mut Actor, &mut Actor) {
        match attacker {
            Side::Player => (&mut self.player, &mut self.enemy),
            Side::Enemy => (&mut self.enemy, &mut self.player),
        }
    }

    fn check_running(&self) -> Result<(), SessionError> {
        match self.phase {
            TurnPhase::Disabled => Err(SessionError::Disabled),
            TurnPhase::Ready => Err(SessionError::NotStarted),
            TurnPhase::Finished => Err(SessionError::Finished),
            _ => Ok(()),
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Start the battle: reset both actors, clear standing matches and open the
    /// first turn. Without a grid the session disables itself.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase {
            TurnPhase::Ready => {}
            TurnPhase::Disabled => return Err(SessionError::Disabled),
            TurnPhase::Finished => return Err(SessionError::Finished),
            _ => return Ok(()),
        }

        let Some(grid) = self.grid.as_mut() else {
            error!("battle session started without a grid, disabling");
            self.phase = TurnPhase::Disabled;
            return Err(SessionError::MissingGrid);
        };
        let cleanup = self.resolver.clear_standing_matches(grid, &mut self.rng);
        if !cleanup.is_empty() {
            debug!(passes = cleanup.pass_count(), "cleared standing matches before play");
        }
        let snapshot = grid.snapshot();

        self.player.reset_for_battle();
        self.enemy.reset_for_battle();
        self.history.clear();
        self.winner = None;
        self.turn = 0;

        let first = self.config.turn.first_side;
        info!(
            player = self.player.name(),
            enemy = self.enemy.name(),
            first = first.as_str(),
            "battle started"
        );
        self.emit(BattleEvent::BattleStarted {
            player: self.player.clone(),
            enemy: self.enemy.clone(),
            grid: snapshot,
            first,
        });
        self.begin_turn(first);
        Ok(())
    }

    fn begin_turn(&mut self, side: Side) {
        self.active = side;
        self.turn += 1;
        self.timer.reset();
        self.settling = false;
        self.idle_ms = 0;
        self.think_ms = 0;
        self.pending.clear();
        self.pending_passes = 0;
        self.pending_swap = None;
        self.timed_out = false;
        self.skipped = None;
        self.trackers[side_slot(side)].reset_turn();

        info!(turn = self.turn, side = side.as_str(), "turn started");
        self.emit(BattleEvent::TurnStarted {
            side,
            turn: self.turn,
            time_limit_ms: self.config.turn.time_limit_ms,
        });

        match self.controller_kind(side) {
            ControllerKind::Human | ControllerKind::Agent => {
                self.phase = TurnPhase::AwaitingInput;
                self.set_input(true);
            }
            ControllerKind::Ai => {
                self.phase = TurnPhase::Thinking;
            }
        }
    }

    fn set_input(&mut self, open: bool) {
        if self.input_open == open {
            return;
        }
        self.input_open = open;
        let side = self.active;
        self.emit(BattleEvent::InputGate { side, open });
    }

    /// Advance the session clock.
    ///
    /// `grid_idle` is the renderer's signal that no swap or cascade animation
    /// is still playing.
    pub fn tick(&mut self, grid_idle: bool, elapsed_ms: u32) {
        match self.phase {
            TurnPhase::Disabled | TurnPhase::Ready | TurnPhase::Finished => {}
            TurnPhase::AwaitingInput => self.advance_timer(elapsed_ms),
            TurnPhase::Thinking => {
                self.advance_timer(elapsed_ms);
                if self.phase != TurnPhase::Thinking {
                    return;
                }
                self.think_ms = self.think_ms.saturating_add(elapsed_ms);
                if grid_idle && self.think_ms >= self.config.timing.ai_think_ms {
                    self.play_ai_turn();
                }
            }
            TurnPhase::Settling => {
                if !grid_idle {
                    self.idle_ms = 0;
                    return;
                }
                self.idle_ms = self.idle_ms.saturating_add(elapsed_ms);
                if self.idle_ms >= self.config.timing.settle_delay_ms {
                    self.finish_settlement();
                }
            }
        }
    }

    fn advance_timer(&mut self, elapsed_ms: u32) {
        let side = self.active;
        match self.timer.advance(elapsed_ms) {
            TimerSignal::None => {}
            TimerSignal::Warning { remaining_ms } => {
                debug!(side = side.as_str(), remaining_ms, "turn timer warning");
                self.emit(BattleEvent::TimerWarning { side, remaining_ms });
            }
            TimerSignal::TimeUp => {
                warn!(side = side.as_str(), turn = self.turn, "turn time is up");
                self.timed_out = true;
                self.emit(BattleEvent::TimeUp { side });
                let name = self.actor(side).name().to_string();
                self.log(format!("Time's up! {} loses the turn", name));
                self.begin_settlement();
            }
        }
    }

    /// Close input, stop the timer and wait for the grid to go idle.
    /// Returns false if a settlement is already in flight.
    fn begin_settlement(&mut self) -> bool {
        if self.settling {
            return false;
        }
        self.settling = true;
        self.timer.stop();
        self.set_input(false);
        self.idle_ms = 0;
        self.phase = TurnPhase::Settling;
        true
    }

    fn finish_settlement(&mut self) {
        let side = self.active;
        let groups = std::mem::take(&mut self.pending);

        let (bundle, applied) = {
            let effects = self.config.effects.clone();
            let (attacker, defender) = self.actors_mut(side);
            let bundle = compute_effects(&groups, attacker, &effects);
            let applied = if bundle.is_empty() {
                AppliedEffects::default()
            } else {
                apply_effects(&bundle, attacker, defender)
            };
            (bundle, applied)
        };

        if !bundle.is_empty() {
            self.emit(BattleEvent::EffectsApplied {
                side,
                bundle,
                applied,
            });
            let lines = applied.log_lines(self.actor(side).name(), self.actor(side.opponent()).name());
            for line in lines {
                self.log(line);
            }
            for s in [Side::Player, Side::Enemy] {
                let actor = self.actor(s).clone();
                self.emit(BattleEvent::StatsChanged { side: s, actor });
            }
        }

        if self.controller_kind(side) == ControllerKind::Agent && !groups.is_empty() {
            self.emit(BattleEvent::AgentSignal {
                side,
                signal: AgentSignal::matched(bundle.raw_damage),
            });
        }

        self.history.push(TurnRecord {
            turn: self.turn,
            side,
            swap: self.pending_swap,
            passes: self.pending_passes,
            bundle,
            applied,
            timed_out: self.timed_out,
            skipped: self.skipped,
        });

        // Player defeat is checked first.
        let winner = if self.player.is_defeated() {
            Some(Side::Enemy)
        } else if self.enemy.is_defeated() {
            Some(Side::Player)
        } else {
            None
        };

        match winner {
            Some(winner) => self.conclude(winner),
            None => {
                self.settling = false;
                self.begin_turn(side.opponent());
            }
        }
    }

    fn conclude(&mut self, winner: Side) {
        self.phase = TurnPhase::Finished;
        self.winner = Some(winner);
        self.settling = false;
        self.timer.stop();
        self.set_input(false);

        let loser = winner.opponent();
        let name = self.actor(loser).name().to_string();
        self.log(format!("{} defeated!", name));
        info!(winner = winner.as_str(), turns = self.turn, "battle concluded");

        for side in [Side::Player, Side::Enemy] {
            if self.controller_kind(side) == ControllerKind::Agent {
                let signal = if side == winner {
                    AgentSignal::new(SignalKind::Won, WIN_REWARD)
                } else {
                    AgentSignal::new(SignalKind::Lost, LOSS_PENALTY)
                };
                self.trackers[side_slot(side)].reset_turn();
                self.emit(BattleEvent::AgentSignal { side, signal });
            }
        }

        self.emit(BattleEvent::BattleConcluded {
            winner,
            turns: self.turn,
            history: self.history.clone(),
        });
    }

    // ---------------------------------------------------------------------
    // Moves
    // ---------------------------------------------------------------------

    fn accepts_input(&self, side: Side) -> bool {
        self.phase == TurnPhase::AwaitingInput && self.input_open && side == self.active
    }

    /// Submit a swap for `side` from an input collaborator
    pub fn submit_swap(&mut self, side: Side, a: Coord, b: Coord) -> Result<SubmitOutcome, SessionError> {
        self.check_running()?;
        if !self.accepts_input(side) {
            debug!(side = side.as_str(), "swap ignored, input gated");
            return Ok(SubmitOutcome::Gated);
        }
        self.perform_swap(side, a, b)
    }

    /// Submit a discrete move index for an agent-controlled `side`
    pub fn submit_agent_move(&mut self, side: Side, index: usize) -> Result<AgentMoveOutcome, SessionError> {
        self.check_running()?;
        if !self.accepts_input(side) || self.controller_kind(side) != ControllerKind::Agent {
            return Ok(AgentMoveOutcome::Gated);
        }

        let slot = side_slot(side);
        let repeated = self.trackers[slot].note_pick(index);
        let signal = if repeated {
            AgentSignal::new(SignalKind::RepeatedMove, REPEATED_MOVE_PENALTY)
        } else {
            AgentSignal::new(SignalKind::ChangedMove, CHANGED_MOVE_REWARD)
        };
        self.emit(BattleEvent::AgentSignal { side, signal });

        if self.trackers[slot].is_banned(index) {
            return Ok(self.record_invalid(side, index));
        }
        let Some((a, b)) = self.move_space.decode(index) else {
            return Ok(self.record_invalid(side, index));
        };
        let occupied = self
            .grid
            .as_ref()
            .is_some_and(|grid| grid.get(a).is_some() && grid.get(b).is_some());
        if !occupied {
            return Ok(self.record_invalid(side, index));
        }

        match self.perform_swap(side, a, b)? {
            SubmitOutcome::Resolved { passes, destroyed } => {
                self.trackers[slot].clear();
                Ok(AgentMoveOutcome::Resolved { passes, destroyed })
            }
            SubmitOutcome::Reverted | SubmitOutcome::Rejected(_) => Ok(self.record_invalid(side, index)),
            SubmitOutcome::Gated => Ok(AgentMoveOutcome::Gated),
        }
    }

    fn record_invalid(&mut self, side: Side, index: usize) -> AgentMoveOutcome {
        self.emit(BattleEvent::AgentSignal {
            side,
            signal: AgentSignal::new(SignalKind::InvalidMove, INVALID_MOVE_PENALTY),
        });

        match self.trackers[side_slot(side)].record_invalid(index) {
            InvalidVerdict::Retry { attempts } => {
                debug!(side = side.as_str(), index, attempts, "agent move invalid, banned");
                AgentMoveOutcome::Invalid { attempts }
            }
            InvalidVerdict::Forfeit => {
                warn!(side = side.as_str(), "agent hit the retry ceiling, skipping turn");
                self.emit(BattleEvent::AgentSignal {
                    side,
                    signal: AgentSignal::new(SignalKind::RetryCeiling, RETRY_CEILING_PENALTY),
                });
                self.skip_turn(side, SkipReason::RetryCeiling);
                AgentMoveOutcome::Forfeited
            }
        }
    }

    fn skip_turn(&mut self, side: Side, reason: SkipReason) {
        self.skipped = Some(reason);
        self.emit(BattleEvent::TurnSkipped { side, reason });
        self.begin_settlement();
    }

    fn play_ai_turn(&mut self) {
        let side = self.active;
        match self.suggest_move() {
            Some(mv) => {
                // The evaluator only proposes valid swaps, so this always resolves.
                if let Err(err) = self.perform_swap(side, mv.a, mv.b) {
                    warn!(%err, "ai swap failed");
                }
                if self.phase == TurnPhase::Thinking {
                    self.skip_turn(side, SkipReason::NoMoveAvailable);
                }
            }
            None => {
                warn!(side = side.as_str(), "ai found no move, skipping turn");
                self.emit(BattleEvent::NoMoveAvailable { side });
                self.skip_turn(side, SkipReason::NoMoveAvailable);
                self.reshuffle();
            }
        }
    }

    /// Replace every gem with a fresh match-free fill
    fn reshuffle(&mut self) {
        let Some(grid) = self.grid.as_mut() else {
            return;
        };
        grid.clear();
        grid.populate(&mut self.rng);
        let snapshot = grid.snapshot();
        info!("board had no scoring swap, reshuffled");
        self.emit(BattleEvent::BoardReshuffled { grid: snapshot });
    }

    /// Validate, resolve and buffer a swap for the active side
    fn perform_swap(&mut self, side: Side, a: Coord, b: Coord) -> Result<SubmitOutcome, SessionError> {
        let Some(grid) = self.grid.as_mut() else {
            return Err(SessionError::MissingGrid);
        };

        let verdict = match self.resolver.request_swap(grid, a, b) {
            Ok(verdict) => verdict,
            Err(rejection) => {
                debug!(side = side.as_str(), %rejection, "swap rejected");
                self.emit(BattleEvent::SwapRejected { side, rejection });
                return Ok(SubmitOutcome::Rejected(rejection));
            }
        };

        if verdict == SwapVerdict::Reverted {
            self.emit(BattleEvent::SwapReverted { side, a, b });
            return Ok(SubmitOutcome::Reverted);
        }

        let report = self.resolver.resolve(grid, &mut self.rng);
        let passes = report.pass_count();
        let destroyed = report.destroyed_count();
        debug!(side = side.as_str(), passes, destroyed, "swap resolved");

        for pass in report.passes {
            let index = pass.index;
            self.emit(BattleEvent::GemsDestroyed {
                pass: index,
                gems: pass.destroyed,
            });
            self.emit(BattleEvent::GemsFell {
                pass: index,
                falls: pass.falls,
            });
            self.emit(BattleEvent::GemsSpawned {
                pass: index,
                gems: pass.spawned,
            });
            self.pending.extend(pass.groups.iter().cloned());
            self.emit(BattleEvent::BatchResolved {
                side,
                pass: index,
                groups: pass.groups,
            });
        }
        self.pending_passes += passes;
        self.pending_swap = Some((a, b));
        self.begin_settlement();

        Ok(SubmitOutcome::Resolved { passes, destroyed })
    }

    /// Effect bundle the pending groups would produce for the active side
    pub fn preview_effects(&self) -> EffectBundle {
        compute_effects(&self.pending, self.actor(self.active), &self.config.effects)
    }
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("turn", &self.turn)
            .field("player", &self.player)
            .field("enemy", &self.enemy)
            .field("observers", &self.observers.len())
            .finish()
    }
}
