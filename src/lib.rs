// Library interface for word-unscramble
// This allows integration tests to access internal modules

pub mod cli;
pub mod game_state;
pub mod high_score;
pub mod logging;
pub mod observable;
pub mod scrambler;
pub mod selector;
pub mod session;
pub mod tui;
pub mod wordbank;

// Re-export commonly used items for easier testing
pub use game_state::{GameInterface, GameSummary, GuessResult, RoundInfo, UserAction, game_loop};
pub use high_score::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, should_replace};
pub use observable::{Observable, Subscription};
pub use scrambler::scramble;
pub use selector::pick_next;
pub use session::{
    DealOutcome, GameConfig, GameSession, MAX_ROUNDS, SCORE_INCREASE, SessionState,
};
pub use wordbank::{WordBank, load_wordbank_from_file, load_wordbank_from_str};
