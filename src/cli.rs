use crate::game_state::{GameInterface, GameSummary, GuessResult, RoundInfo, UserAction};
use crate::session::{GameConfig, MAX_ROUNDS, SCORE_INCREASE};
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;

/// Word Unscramble options
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a newline-delimited wordbank file
    #[arg(short = 'i', long = "input")]
    pub wordbank_path: Option<String>,

    /// Number of words per game
    #[arg(short = 'r', long = "rounds", default_value_t = MAX_ROUNDS)]
    pub rounds: usize,

    /// Points awarded for each correct guess
    #[arg(long = "score-increase", default_value_t = SCORE_INCREASE)]
    pub score_increase: u32,

    /// Where to keep the high score (defaults to the user data directory)
    #[arg(long = "high-score-file")]
    pub high_score_path: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long = "no-persist")]
    pub no_persist: bool,

    /// Use the line-based interface instead of the TUI
    #[arg(long)]
    pub plain: bool,

    /// Seed for word order and scrambles
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write logs to this file
    #[arg(long = "log-file")]
    pub log_path: Option<PathBuf>,
}

impl Cli {
    /// Game settings; at least one round is always played.
    #[must_use]
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            max_rounds: self.rounds.max(1),
            score_increase: self.score_increase,
        }
    }
}

#[must_use]
pub fn parse_cli() -> Cli {
    Cli::parse()
}

// UI Input/Output functions

pub enum GuessInput {
    Valid(String),
    Invalid,
    Exit,
    Skip,
    Restart,
}

fn is_valid_guess(word: &str) -> bool {
    !word.is_empty() && word.chars().all(char::is_alphabetic)
}

pub fn display_round(round: &RoundInfo) {
    println!(
        "\nWord {}/{} | Score: {} | High score: {}",
        round.round, round.max_rounds, round.score, round.high_score
    );
    println!("Unscramble: {}", round.scramble);
}

pub fn read_guess<R: BufRead>(reader: &mut R) -> GuessInput {
    println!("Enter your guess (or 'skip', 'restart', 'exit'):");
    let mut input = String::new();
    match reader.read_line(&mut input) {
        Ok(0) | Err(_) => return GuessInput::Exit,
        Ok(_) => {}
    }
    let input = input.trim().to_lowercase();

    match input.as_str() {
        "exit" => GuessInput::Exit,
        "skip" => GuessInput::Skip,
        "restart" => GuessInput::Restart,
        _ if is_valid_guess(&input) => GuessInput::Valid(input),
        _ => {
            println!("Invalid guess. Please enter letters only.");
            GuessInput::Invalid
        }
    }
}

pub fn display_guess_result(result: &GuessResult) {
    if result.correct {
        println!("Correct! Score: {}", result.score);
    } else {
        println!("Wrong guess, try again!");
    }
}

pub fn display_skipped(word: &str) {
    println!("Skipped. The word was: {word}");
}

pub fn display_game_over(summary: &GameSummary) {
    println!(
        "\nGame over! You scored {} in {} words. High score: {}",
        summary.score, summary.rounds_played, summary.high_score
    );
    println!("Type 'restart' to play again or 'exit' to quit.");
}

pub fn display_word_bank_exhausted(summary: &GameSummary) {
    println!(
        "\nNo more words left after {} words. You scored {}. High score: {}",
        summary.rounds_played, summary.score, summary.high_score
    );
    println!("Type 'restart' to play again or 'exit' to quit.");
}

pub fn display_exit_message() {
    println!("Exiting.");
}

/// CLI implementation of the GameInterface trait
/// This struct wraps a BufRead reader and implements the game interface for CLI interaction
pub struct CliInterface<R: BufRead> {
    reader: R,
}

impl<R: BufRead> CliInterface<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> GameInterface for CliInterface<R> {
    fn display_round(&mut self, round: &RoundInfo) {
        display_round(round);
    }

    fn read_action(&mut self) -> Option<UserAction> {
        match read_guess(&mut self.reader) {
            GuessInput::Valid(guess) => Some(UserAction::Guess(guess)),
            GuessInput::Exit => Some(UserAction::Exit),
            GuessInput::Skip => Some(UserAction::Skip),
            GuessInput::Restart => Some(UserAction::Restart),
            GuessInput::Invalid => None,
        }
    }

    fn display_guess_result(&mut self, result: &GuessResult) {
        display_guess_result(result);
    }

    fn display_skipped(&mut self, word: &str) {
        display_skipped(word);
    }

    fn display_game_over(&mut self, summary: &GameSummary) {
        display_game_over(summary);
    }

    fn display_word_bank_exhausted(&mut self, summary: &GameSummary) {
        display_word_bank_exhausted(summary);
    }

    fn display_exit_message(&mut self) {
        display_exit_message();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_cli_defaults() {
        let cli = Cli::try_parse_from(["word-unscramble"]).unwrap();
        assert_eq!(cli.wordbank_path, None);
        assert_eq!(cli.rounds, 10);
        assert_eq!(cli.score_increase, 20);
        assert!(!cli.plain);
        assert!(!cli.no_persist);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.game_config(), GameConfig::default());
    }

    #[test]
    fn test_parse_cli_with_options() {
        let cli = Cli::try_parse_from([
            "word-unscramble",
            "-i",
            "words.txt",
            "--rounds",
            "3",
            "--score-increase",
            "5",
            "--high-score-file",
            "/tmp/hs.txt",
            "--plain",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(cli.wordbank_path, Some("words.txt".to_string()));
        assert_eq!(cli.high_score_path, Some(PathBuf::from("/tmp/hs.txt")));
        assert!(cli.plain);
        assert_eq!(cli.seed, Some(42));
        assert_eq!(
            cli.game_config(),
            GameConfig {
                max_rounds: 3,
                score_increase: 5
            }
        );
    }

    #[test]
    fn test_zero_rounds_becomes_one() {
        let cli = Cli::try_parse_from(["word-unscramble", "-r", "0"]).unwrap();
        assert_eq!(cli.game_config().max_rounds, 1);
    }

    #[test]
    fn test_parse_cli_rejects_bad_rounds() {
        assert!(Cli::try_parse_from(["word-unscramble", "--rounds", "many"]).is_err());
    }

    #[test]
    fn test_is_valid_guess() {
        assert!(is_valid_guess("kotlin"));
        assert!(is_valid_guess("KOTLIN"));
        assert!(is_valid_guess("a"));
        assert!(!is_valid_guess(""));
        assert!(!is_valid_guess("kot lin"));
        assert!(!is_valid_guess("k0tlin"));
    }

    #[test]
    fn test_read_guess_valid_word_lowercased() {
        let mut reader = Cursor::new("  Android \n");
        match read_guess(&mut reader) {
            GuessInput::Valid(word) => assert_eq!(word, "android"),
            _ => panic!("Expected Valid guess"),
        }
    }

    #[test]
    fn test_read_guess_commands() {
        let mut reader = Cursor::new("EXIT\nskip\nRestart\n");
        assert!(matches!(read_guess(&mut reader), GuessInput::Exit));
        assert!(matches!(read_guess(&mut reader), GuessInput::Skip));
        assert!(matches!(read_guess(&mut reader), GuessInput::Restart));
    }

    #[test]
    fn test_read_guess_invalid() {
        let mut reader = Cursor::new("r2d2\n\n");
        assert!(matches!(read_guess(&mut reader), GuessInput::Invalid));
        assert!(matches!(read_guess(&mut reader), GuessInput::Invalid));
    }

    #[test]
    fn test_read_guess_end_of_input_exits() {
        let mut reader = Cursor::new("");
        assert!(matches!(read_guess(&mut reader), GuessInput::Exit));
    }

    #[test]
    fn test_cli_interface_maps_actions() {
        let mut interface = CliInterface::new(Cursor::new("compose\nskip\n123\nrestart\n"));
        assert_eq!(
            interface.read_action(),
            Some(UserAction::Guess("compose".to_string()))
        );
        assert_eq!(interface.read_action(), Some(UserAction::Skip));
        assert_eq!(interface.read_action(), None);
        assert_eq!(interface.read_action(), Some(UserAction::Restart));
        assert_eq!(interface.read_action(), Some(UserAction::Exit));
    }
}
