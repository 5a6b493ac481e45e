//! Turn controller: owns the live board and drives a game from pit
//! selections to the final score.
//!
//! A [`Game`] is the single owner of the board and turn state. Front ends
//! talk to it through three entry points ([`Game::select_pit`],
//! [`Game::use_held_card`] and [`Game::restart`]) and listen through a
//! [`GameObserver`]. Every operation runs to completion before it returns;
//! the computer's reply is played inside the same call that ends the
//! player's turn.
//!
//! Animation timing is not the engine's business. Each place where a front
//! end should wait is reported as a [`Pause`] carrying its duration.

use std::fmt;
use std::time::Duration;

use tracing::{info, warn};

use crate::board::{Board, Pit};
use crate::cards::{apply_card, draw_card, CardEffect, CardPolicy, CardType, DrawPolicy};
use crate::constants::{
    PAUSE_BEFORE_COMPUTER, PAUSE_BEFORE_MOVE, PAUSE_CARD, PAUSE_PICKUP, PAUSE_SOW_STEP,
    PAUSE_SWEEP, PITS, PLAYER_GRANARY, PLAYER_PITS, SEARCH_DEPTH,
};
use crate::endgame::{is_terminal, sweep, FinalScore};
use crate::error::GameError;
use crate::search::{SearchResult, Searcher, SimScoring};
use crate::sowing::{execute_move, Landing, LandingHook, SowResult, SowStep};
use crate::turn::{Side, TurnState};

// =============================================================================
// Phases and pauses
// =============================================================================

/// Where the game stands between (and during) operations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayerMove,
    ExecutingMove,
    AwaitingCardDecision,
    AwaitingComputerMove,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AwaitingPlayerMove => "awaiting player move",
            Phase::ExecutingMove => "executing move",
            Phase::AwaitingCardDecision => "awaiting card decision",
            Phase::AwaitingComputerMove => "awaiting computer move",
            Phase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// A point where a front end may suspend to animate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pause {
    Pickup,
    SowStep,
    BeforeMove,
    BeforeComputer,
    Card,
    Sweep,
}

impl Pause {
    pub fn duration(self) -> Duration {
        match self {
            Pause::Pickup => PAUSE_PICKUP,
            Pause::SowStep => PAUSE_SOW_STEP,
            Pause::BeforeMove => PAUSE_BEFORE_MOVE,
            Pause::BeforeComputer => PAUSE_BEFORE_COMPUTER,
            Pause::Card => PAUSE_CARD,
            Pause::Sweep => PAUSE_SWEEP,
        }
    }
}

// =============================================================================
// Observer port
// =============================================================================

/// Receives everything a front end needs to render the game.
///
/// All methods default to doing nothing.
#[allow(unused_variables)]
pub trait GameObserver {
    fn score_changed(&mut self, player: u32, computer: u32) {}
    fn turn_changed(&mut self, is_player_turn: bool) {}
    fn stone_count_changed(&mut self, pit: Pit, count: u32) {}
    /// Stones still to be dropped in the current lap.
    fn stones_in_hand(&mut self, count: u32) {}
    fn notice(&mut self, message: &str) {}
    fn card_drawn(&mut self, card: CardType) {}
    fn card_played(&mut self, card: CardType, effect: CardEffect) {}
    fn game_over(&mut self, score: FinalScore) {}
    fn pause(&mut self, pause: Pause) {}
}

/// Observer that ignores every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullObserver;

impl GameObserver for NullObserver {}

// =============================================================================
// Configuration
// =============================================================================

/// Which granary landings offer the player a card.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CardOffer {
    /// Either granary, as the game has always played.
    #[default]
    AnyGranary,
    /// Only the player's own granary (pit 0).
    OwnGranary,
}

/// Runtime settings for a [`Game`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Plies searched below each computer candidate move.
    pub depth: u32,
    /// Seed for card draws. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub draw_policy: DrawPolicy,
    pub sim_scoring: SimScoring,
    pub card_offer: CardOffer,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            depth: SEARCH_DEPTH,
            seed: None,
            draw_policy: DrawPolicy::AlwaysDraw,
            sim_scoring: SimScoring::Legacy,
            card_offer: CardOffer::AnyGranary,
        }
    }
}

impl GameConfig {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_draw_policy(mut self, policy: DrawPolicy) -> Self {
        self.draw_policy = policy;
        self
    }

    pub fn with_sim_scoring(mut self, scoring: SimScoring) -> Self {
        self.sim_scoring = scoring;
        self
    }

    pub fn with_card_offer(mut self, offer: CardOffer) -> Self {
        self.card_offer = offer;
        self
    }
}

// =============================================================================
// Reports
// =============================================================================

/// The computer's reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComputerTurn {
    pub search: SearchResult,
    pub sow: SowResult,
}

/// Outcome of [`Game::select_pit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnReport {
    pub sow: SowResult,
    pub card_drawn: Option<CardType>,
    /// Present when the player's turns ran out and the computer moved.
    pub computer: Option<ComputerTurn>,
    /// Present when the game ended during this call.
    pub final_score: Option<FinalScore>,
}

/// Outcome of [`Game::use_held_card`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardReport {
    pub card: CardType,
    pub effect: CardEffect,
    pub computer: Option<ComputerTurn>,
    pub final_score: Option<FinalScore>,
}

// =============================================================================
// Card offers during a move
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum LandingEvent {
    Drawn(CardType),
    AlreadyHeld,
    Declined,
}

/// Offers the player a card when a lap ends in a granary.
struct CardHook<'a, P> {
    turn: &'a mut TurnState,
    phase: &'a mut Phase,
    rng: &'a mut fastrand::Rng,
    policy: &'a mut P,
    offer: CardOffer,
    side: Side,
    events: Vec<LandingEvent>,
}

impl<P: CardPolicy> LandingHook for CardHook<'_, P> {
    fn on_granary_landing(&mut self, pit: Pit) -> Landing {
        if self.side != Side::Player || !self.turn.is_player_turn() {
            return Landing::Continue;
        }
        if self.offer == CardOffer::OwnGranary && pit != PLAYER_GRANARY {
            return Landing::Continue;
        }
        if self.turn.held_card.is_some() {
            self.events.push(LandingEvent::AlreadyHeld);
            return Landing::EndTurn;
        }

        *self.phase = Phase::AwaitingCardDecision;
        let take = self.policy.request_card_decision();
        *self.phase = Phase::ExecutingMove;

        if take {
            let card = draw_card(self.rng);
            info!(%card, pit, "card drawn");
            self.turn.held_card = Some(card);
            self.events.push(LandingEvent::Drawn(card));
            Landing::EndTurn
        } else {
            self.events.push(LandingEvent::Declined);
            Landing::Continue
        }
    }
}

// =============================================================================
// Game
// =============================================================================

/// A game in progress.
pub struct Game<O = NullObserver, P = DrawPolicy> {
    board: Board,
    turn: TurnState,
    phase: Phase,
    config: GameConfig,
    rng: fastrand::Rng,
    observer: O,
    policy: P,
    move_busy: bool,
    card_busy: bool,
}

impl Game {
    /// Game with no observer and the configured draw policy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_observer(config, NullObserver)
    }
}

impl<O: GameObserver> Game<O, DrawPolicy> {
    pub fn with_observer(config: GameConfig, observer: O) -> Self {
        Self::with_parts(config, observer, config.draw_policy)
    }
}

impl<O: GameObserver, P: CardPolicy> Game<O, P> {
    /// Game with a custom observer and card policy. The policy replaces
    /// `config.draw_policy`.
    pub fn with_parts(config: GameConfig, observer: O, policy: P) -> Self {
        let rng = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let mut game = Self {
            board: Board::new(),
            turn: TurnState::new(),
            phase: Phase::AwaitingPlayerMove,
            config,
            rng,
            observer,
            policy,
            move_busy: false,
            card_busy: false,
        };
        game.publish_all();
        game
    }

    /// Replace the position, e.g. to resume or to set up a puzzle. The phase
    /// follows the turn state, and a finished position ends the game.
    pub fn set_position(&mut self, board: Board, turn: TurnState) {
        self.board = board;
        self.turn = turn;
        self.phase = if self.turn.is_player_turn() {
            Phase::AwaitingPlayerMove
        } else {
            Phase::AwaitingComputerMove
        };
        self.publish_all();
        if is_terminal(self.board.pits()) {
            self.finish();
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Reset board and turn state to the opening position.
    pub fn restart(&mut self) {
        info!("restart");
        self.board.reset();
        self.turn.reset();
        self.phase = Phase::AwaitingPlayerMove;
        self.move_busy = false;
        self.card_busy = false;
        self.publish_all();
    }

    /// Sow from one of the player's pits.
    ///
    /// If this uses up the player's last turn the computer replies before
    /// returning. Rejected selections leave the game untouched, except that
    /// an empty player row fails with [`GameError::NoLegalMoves`] and ends
    /// the game.
    pub fn select_pit(&mut self, pit: Pit) -> Result<TurnReport, GameError> {
        if self.move_busy {
            return Err(GameError::ReentrantOperation);
        }
        self.move_busy = true;
        let result = self.player_move(pit);
        self.move_busy = false;
        result.map_err(|e| self.reject(e))
    }

    /// Play the held card. Only allowed on the player's turn, before sowing.
    pub fn use_held_card(&mut self) -> Result<CardReport, GameError> {
        if self.phase == Phase::GameOver {
            return Err(self.reject(GameError::GameOver));
        }
        if !self.turn.is_player_turn() {
            return Err(self.reject(GameError::CardMisuse(
                "cards cannot be used during the computer's turn",
            )));
        }
        if self.phase != Phase::AwaitingPlayerMove {
            return Err(self.reject(GameError::CardMisuse(
                "cards can only be used before sowing",
            )));
        }
        if self.card_busy {
            return Err(GameError::ReentrantOperation);
        }
        self.card_busy = true;
        let result = self.play_card();
        self.card_busy = false;
        result.map_err(|e| self.reject(e))
    }

    /// Let the computer move when the game is waiting on it, e.g. after
    /// [`Game::set_position`] with no player turns left.
    pub fn computer_turn(
        &mut self,
    ) -> Result<(Option<ComputerTurn>, Option<FinalScore>), GameError> {
        match self.phase {
            Phase::GameOver => Err(self.reject(GameError::GameOver)),
            Phase::AwaitingComputerMove => Ok(self.run_computer()),
            _ => Err(self.reject(GameError::OutOfTurn(
                "the computer only moves once the player's turns are used",
            ))),
        }
    }

    fn player_move(&mut self, pit: Pit) -> Result<TurnReport, GameError> {
        match self.phase {
            Phase::AwaitingPlayerMove => {}
            Phase::GameOver => return Err(GameError::GameOver),
            _ => {
                return Err(GameError::InvalidMove {
                    pit,
                    reason: "it is not the player's turn",
                })
            }
        }
        if self.board.player_row() == 0 {
            warn!("player has no stones to sow");
            self.finish();
            return Err(GameError::NoLegalMoves);
        }
        if !PLAYER_PITS.contains(&pit) {
            return Err(GameError::InvalidMove {
                pit,
                reason: "pit is outside the player's row",
            });
        }
        if self.board.is_empty(pit) {
            return Err(GameError::InvalidMove {
                pit,
                reason: "pit is empty",
            });
        }

        info!(pit, "player sows");
        self.phase = Phase::ExecutingMove;
        self.observer.pause(Pause::BeforeMove);
        let (sow, card_drawn) = self.run_move(pit, Side::Player)?;

        if is_terminal(self.board.pits()) {
            let final_score = self.finish();
            return Ok(TurnReport {
                sow,
                card_drawn,
                computer: None,
                final_score: Some(final_score),
            });
        }

        self.turn.player_turns_remaining = self.turn.player_turns_remaining.saturating_sub(1);
        if self.turn.is_player_turn() {
            self.phase = Phase::AwaitingPlayerMove;
            self.observer.turn_changed(true);
            return Ok(TurnReport {
                sow,
                card_drawn,
                computer: None,
                final_score: None,
            });
        }

        self.phase = Phase::AwaitingComputerMove;
        self.observer.turn_changed(false);
        self.observer.pause(Pause::BeforeComputer);
        let (computer, final_score) = self.run_computer();
        Ok(TurnReport {
            sow,
            card_drawn,
            computer,
            final_score,
        })
    }

    fn play_card(&mut self) -> Result<CardReport, GameError> {
        let card = self
            .turn
            .held_card
            .ok_or(GameError::CardMisuse("no card held"))?;

        self.observer.pause(Pause::Card);
        let effect = apply_card(card, &mut self.turn);
        self.observer.card_played(card, effect);
        self.observer.notice(&format!("{card} card used"));
        self.observer.pause(Pause::Card);

        let (computer, final_score) = if effect == CardEffect::TurnSkipped {
            self.phase = Phase::AwaitingComputerMove;
            self.observer.turn_changed(false);
            self.run_computer()
        } else {
            (None, None)
        };

        Ok(CardReport {
            card,
            effect,
            computer,
            final_score,
        })
    }

    /// Search, sow for the computer, then hand a turn back to the player.
    fn run_computer(&mut self) -> (Option<ComputerTurn>, Option<FinalScore>) {
        let mut searcher = Searcher::new(
            self.config.depth,
            self.turn.direction,
            self.config.sim_scoring,
        );
        let search = match searcher.computer_move(&self.board, &self.turn) {
            Ok(search) => search,
            Err(e) => {
                warn!(error = %e, "computer cannot move");
                return (None, Some(self.finish()));
            }
        };

        info!(pit = search.best_pit, value = search.value, "computer sows");
        self.phase = Phase::ExecutingMove;
        let sow = match self.run_move(search.best_pit, Side::Computer) {
            Ok((sow, _)) => sow,
            Err(e) => {
                warn!(error = %e, "computer move failed");
                return (None, Some(self.finish()));
            }
        };
        let computer = Some(ComputerTurn { search, sow });

        if is_terminal(self.board.pits()) {
            return (computer, Some(self.finish()));
        }

        self.turn.player_turns_remaining += 1;
        self.phase = Phase::AwaitingPlayerMove;
        self.observer.turn_changed(true);
        (computer, None)
    }

    /// Execute a move for `side`, credit its captures and replay it to the
    /// observer.
    fn run_move(
        &mut self,
        start: Pit,
        side: Side,
    ) -> Result<(SowResult, Option<CardType>), GameError> {
        let direction = self.turn.direction;
        let mut hook = CardHook {
            turn: &mut self.turn,
            phase: &mut self.phase,
            rng: &mut self.rng,
            policy: &mut self.policy,
            offer: self.config.card_offer,
            side,
            events: Vec::new(),
        };
        let sow = execute_move(&mut self.board, start, direction, &mut hook)?;
        let events = hook.events;

        self.replay(&sow.steps, side);

        let mut drawn = None;
        for event in events {
            match event {
                LandingEvent::Drawn(card) => {
                    drawn = Some(card);
                    self.observer.card_drawn(card);
                    self.observer.notice(&format!("you drew a card: {card}"));
                }
                LandingEvent::AlreadyHeld => {
                    self.observer.notice("you already hold a card");
                }
                LandingEvent::Declined => {
                    self.observer.notice("you chose to keep sowing");
                }
            }
        }
        Ok((sow, drawn))
    }

    fn replay(&mut self, steps: &[SowStep], side: Side) {
        let mut in_hand = 0;
        for step in steps {
            match *step {
                SowStep::Pickup { pit, stones } => {
                    self.observer.pause(Pause::Pickup);
                    self.observer.stone_count_changed(pit, 0);
                    in_hand = stones;
                    self.observer.stones_in_hand(in_hand);
                }
                SowStep::Drop { pit, count } => {
                    self.observer.pause(Pause::SowStep);
                    self.observer.stone_count_changed(pit, count);
                    in_hand = in_hand.saturating_sub(1);
                    self.observer.stones_in_hand(in_hand);
                }
                SowStep::GranaryLanding { .. } => {}
                SowStep::Capture { pit, stones } => {
                    self.observer.pause(Pause::SowStep);
                    self.turn.credit(side, stones);
                    self.observer.stone_count_changed(pit, 0);
                    self.observer
                        .score_changed(self.turn.player_score, self.turn.computer_score);
                }
            }
        }
    }

    /// Sweep the board into the scores and end the game.
    fn finish(&mut self) -> FinalScore {
        self.observer.notice("game over, counting stones");
        for swept in sweep(&mut self.board, &mut self.turn) {
            self.observer.pause(Pause::Sweep);
            self.observer.stone_count_changed(swept.pit, 0);
        }
        self.observer
            .score_changed(self.turn.player_score, self.turn.computer_score);

        self.phase = Phase::GameOver;
        let score = FinalScore::from_turn(&self.turn);
        info!(
            player = score.player,
            computer = score.computer,
            result = %score.winner(),
            "game over"
        );
        self.observer.game_over(score);
        score
    }

    /// Surface a rejected request to the observer and hand the error back.
    fn reject(&mut self, err: GameError) -> GameError {
        if err.is_surfaced() {
            warn!(error = %err, "request rejected");
            self.observer.notice(&err.to_string());
        }
        err
    }

    fn publish_all(&mut self) {
        for pit in 0..PITS {
            self.observer.stone_count_changed(pit, self.board.stones(pit));
        }
        self.observer
            .score_changed(self.turn.player_score, self.turn.computer_score);
        self.observer.turn_changed(self.turn.is_player_turn());
    }
}
