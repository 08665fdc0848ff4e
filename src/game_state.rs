use crate::high_score::HighScoreStore;
use crate::session::{DealOutcome, GameSession};
use crate::debug_log;
use rand::Rng;

/// Something the player asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Guess(String),
    Skip,
    Restart,
    Exit,
}

/// Everything an interface needs to draw the active round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    pub scramble: String,
    pub round: usize,
    pub max_rounds: usize,
    pub score: u32,
    pub high_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuessResult {
    pub guess: String,
    pub correct: bool,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub score: u32,
    pub high_score: u32,
    pub rounds_played: usize,
}

/// Presentation side of the game; implemented by the CLI and the TUI.
pub trait GameInterface {
    fn display_round(&mut self, round: &RoundInfo);
    /// Returns `None` for input that is not a valid action.
    fn read_action(&mut self) -> Option<UserAction>;
    fn display_guess_result(&mut self, result: &GuessResult);
    fn display_skipped(&mut self, word: &str);
    fn display_game_over(&mut self, summary: &GameSummary);
    fn display_word_bank_exhausted(&mut self, summary: &GameSummary);
    fn display_exit_message(&mut self);
}

enum RoundEnd {
    Continue,
    Finished(DealOutcome),
}

/// Plays games on `session` until the player exits.
pub fn game_loop<S, R, I>(session: &mut GameSession<S, R>, interface: &mut I)
where
    S: HighScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    let _high_score_log = session
        .high_score()
        .subscribe(|value| log::info!("High score is now {value}"));

    let mut outcome = session.start();
    loop {
        if outcome != DealOutcome::Dealt {
            if !finish_game(session, interface, outcome) {
                break;
            }
            outcome = session.restart();
            continue;
        }

        interface.display_round(&round_info(session));

        let Some(action) = interface.read_action() else {
            continue;
        };
        debug_log!("game_loop() - action {:?}", action);

        match play_action(session, interface, action) {
            Some(RoundEnd::Continue) => {}
            Some(RoundEnd::Finished(next)) => outcome = next,
            None => {
                interface.display_exit_message();
                break;
            }
        }
    }
}

/// Applies one action. `None` means the player wants to exit.
fn play_action<S, R, I>(
    session: &mut GameSession<S, R>,
    interface: &mut I,
    action: UserAction,
) -> Option<RoundEnd>
where
    S: HighScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    match action {
        UserAction::Exit => None,
        UserAction::Restart => Some(RoundEnd::Finished(session.restart())),
        UserAction::Skip => {
            interface.display_skipped(session.current_word());
            Some(advance(session))
        }
        UserAction::Guess(guess) => {
            let correct = session.submit_guess(&guess);
            interface.display_guess_result(&GuessResult {
                guess,
                correct,
                score: session.score().get(),
            });
            if correct {
                Some(advance(session))
            } else {
                Some(RoundEnd::Continue)
            }
        }
    }
}

fn advance<S: HighScoreStore, R: Rng>(session: &mut GameSession<S, R>) -> RoundEnd {
    RoundEnd::Finished(session.deal())
}

/// Shows the end-of-game screen and waits for a decision.
/// Returns true when the player wants another game.
fn finish_game<S, R, I>(
    session: &GameSession<S, R>,
    interface: &mut I,
    outcome: DealOutcome,
) -> bool
where
    S: HighScoreStore,
    R: Rng,
    I: GameInterface + ?Sized,
{
    let summary = GameSummary {
        score: session.score().get(),
        high_score: session.high_score().get(),
        rounds_played: session.round_count().get(),
    };
    match outcome {
        DealOutcome::WordBankExhausted => interface.display_word_bank_exhausted(&summary),
        DealOutcome::RoundLimitReached | DealOutcome::Dealt => {
            interface.display_game_over(&summary);
        }
    }

    loop {
        match interface.read_action() {
            Some(UserAction::Restart) => return true,
            Some(UserAction::Exit) => {
                interface.display_exit_message();
                return false;
            }
            Some(other) => {
                debug_log!("finish_game() - ignoring {:?}", other);
            }
            None => {}
        }
    }
}

fn round_info<S: HighScoreStore, R: Rng>(session: &GameSession<S, R>) -> RoundInfo {
    RoundInfo {
        scramble: session.current_scramble().get(),
        round: session.round_count().get(),
        max_rounds: session.config().max_rounds,
        score: session.score().get(),
        high_score: session.high_score().get(),
    }
}
