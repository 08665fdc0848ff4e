//! Game session state machine.
//!
//! A [`GameSession`] deals scrambled words from a [`WordBank`], checks
//! guesses and keeps score. State that an interface needs to redraw is
//! published through [`Observable`] values; every correct guess forwards the
//! new score to a [`HighScoreStore`].
//!
//! # State machine
//! - `NotStarted` → `InRound` on `start()` / `restart()`
//! - `InRound` stays `InRound` while rounds are dealt
//! - `InRound` → `RoundLimitReached` when a deal is refused at the round limit
//! - `InRound` → `WordBankExhausted` when no unused word is left
//! - any state → `InRound` on `restart()`

use crate::high_score::HighScoreStore;
use crate::observable::Observable;
use crate::scrambler::scramble;
use crate::selector::pick_next;
use crate::wordbank::WordBank;
use crate::{debug_log, info_log};
use rand::Rng;
use std::collections::VecDeque;
use std::io;

/// Words dealt per game.
pub const MAX_ROUNDS: usize = 10;
/// Points for a correct guess.
pub const SCORE_INCREASE: u32 = 20;
/// Failed high score writes kept for retry; older ones are dropped first.
pub const MAX_PENDING_WRITES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub max_rounds: usize,
    pub score_increase: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: MAX_ROUNDS,
            score_increase: SCORE_INCREASE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InRound,
    RoundLimitReached,
    WordBankExhausted,
}

/// Result of asking the session for another round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DealOutcome {
    Dealt,
    RoundLimitReached,
    WordBankExhausted,
}

pub struct GameSession<S, R> {
    bank: WordBank,
    config: GameConfig,
    store: S,
    rng: R,
    state: SessionState,
    used_words: Vec<String>,
    current_word: String,
    score: Observable<u32>,
    round_count: Observable<usize>,
    current_scramble: Observable<String>,
    high_score: Observable<u32>,
    pending_writes: VecDeque<u32>,
}

impl<S: HighScoreStore, R: Rng> GameSession<S, R> {
    /// Creates a session in the `NotStarted` state and loads the high score.
    pub fn new(bank: WordBank, config: GameConfig, store: S, rng: R) -> Self {
        let high_score = match store.read() {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read high score, starting from 0: {e}");
                0
            }
        };
        info_log!(
            "GameSession::new() - {} words, {} rounds, high score {}",
            bank.len(),
            config.max_rounds,
            high_score
        );

        Self {
            bank,
            config,
            store,
            rng,
            state: SessionState::NotStarted,
            used_words: Vec::new(),
            current_word: String::new(),
            score: Observable::new(0),
            round_count: Observable::new(0),
            current_scramble: Observable::new(String::new()),
            high_score: Observable::new(high_score),
            pending_writes: VecDeque::new(),
        }
    }

    /// Starts a fresh game and deals its first round.
    pub fn start(&mut self) -> DealOutcome {
        self.score.set(0);
        self.round_count.set(0);
        self.used_words.clear();
        self.state = SessionState::InRound;
        info_log!("GameSession::start() - new game");
        self.deal()
    }

    /// Same as [`start`](Self::start); valid from any state.
    pub fn restart(&mut self) -> DealOutcome {
        self.start()
    }

    /// Deals the next round if the round limit allows and a word is left.
    pub fn deal(&mut self) -> DealOutcome {
        if self.is_round_limit_reached() {
            debug_log!("deal() - round limit {} reached", self.config.max_rounds);
            self.state = SessionState::RoundLimitReached;
            return DealOutcome::RoundLimitReached;
        }

        let Some(word) = pick_next(&self.bank, &self.used_words, &mut self.rng) else {
            info_log!(
                "deal() - word bank exhausted after {} rounds",
                self.used_words.len()
            );
            self.state = SessionState::WordBankExhausted;
            return DealOutcome::WordBankExhausted;
        };
        let word = word.to_string();
        let scrambled = scramble(&word, &mut self.rng);

        self.used_words.push(word.clone());
        self.current_word = word;
        self.state = SessionState::InRound;
        self.current_scramble.set(scrambled);
        self.round_count.set(self.used_words.len());
        debug_log!(
            "deal() - round {} scramble '{}'",
            self.round_count.get(),
            self.current_scramble.get()
        );
        DealOutcome::Dealt
    }

    /// Returns whether a round was actually dealt.
    pub fn deal_next_round(&mut self) -> bool {
        self.deal() == DealOutcome::Dealt
    }

    /// Checks `player_word` against the current word, ignoring case.
    ///
    /// A correct guess adds the score increase and forwards the new score to
    /// the high score store. The round is never advanced here.
    pub fn submit_guess(&mut self, player_word: &str) -> bool {
        if self.current_word.is_empty()
            || player_word.to_lowercase() != self.current_word.to_lowercase()
        {
            debug_log!("submit_guess() - '{}' is incorrect", player_word);
            return false;
        }

        let increase = self.config.score_increase;
        self.score.update(|score| score.saturating_add(increase));
        let score = self.score.get();
        info_log!("submit_guess() - correct, score now {}", score);
        self.queue_high_score(score);
        self.flush_high_score();
        true
    }

    #[must_use]
    pub fn is_round_limit_reached(&self) -> bool {
        self.round_count.get() >= self.config.max_rounds
    }

    /// Queues `score` for the store, dropping the oldest entry when full.
    fn queue_high_score(&mut self, score: u32) {
        if self.pending_writes.len() >= MAX_PENDING_WRITES
            && let Some(dropped) = self.pending_writes.pop_front()
        {
            log::warn!("High score write queue full, dropping score {dropped}");
        }
        self.pending_writes.push_back(score);
    }

    /// Applies queued score writes in order, stopping at the first failure
    /// that a later attempt could fix.
    fn flush_high_score(&mut self) {
        while let Some(&candidate) = self.pending_writes.front() {
            match self.store.update(candidate) {
                Ok(stored) => {
                    self.pending_writes.pop_front();
                    self.high_score.set(stored);
                }
                Err(e) if !is_retryable(&e) => {
                    self.pending_writes.pop_front();
                    log::warn!("Failed to store score {candidate}, not retrying: {e}");
                }
                Err(e) => {
                    log::warn!(
                        "Failed to store score {candidate}, {} write(s) pending: {e}",
                        self.pending_writes.len()
                    );
                    break;
                }
            }
        }
    }

    #[must_use]
    pub fn score(&self) -> &Observable<u32> {
        &self.score
    }

    #[must_use]
    pub fn round_count(&self) -> &Observable<usize> {
        &self.round_count
    }

    #[must_use]
    pub fn current_scramble(&self) -> &Observable<String> {
        &self.current_scramble
    }

    #[must_use]
    pub fn high_score(&self) -> &Observable<u32> {
        &self.high_score
    }

    #[must_use]
    pub fn current_word(&self) -> &str {
        &self.current_word
    }

    #[must_use]
    pub fn used_words(&self) -> &[String] {
        &self.used_words
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.pending_writes.len()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}

fn is_retryable(e: &io::Error) -> bool {
    !matches!(
        e.kind(),
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::high_score::MemoryHighScoreStore;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::cell::{Cell, RefCell};
    use std::collections::HashSet;
    use std::io;
    use std::rc::Rc;

    fn session_with(
        words: &[&str],
        max_rounds: usize,
        stored: u32,
    ) -> GameSession<MemoryHighScoreStore, StdRng> {
        GameSession::new(
            WordBank::new(words.iter().copied()).unwrap(),
            GameConfig {
                max_rounds,
                score_increase: SCORE_INCREASE,
            },
            MemoryHighScoreStore::new(stored),
            StdRng::seed_from_u64(17),
        )
    }

    /// Store whose writes fail with `failure` until it is cleared.
    struct FlakyStore {
        value: u32,
        failure: Rc<Cell<Option<io::ErrorKind>>>,
        writes: Rc<RefCell<Vec<u32>>>,
    }

    impl HighScoreStore for FlakyStore {
        fn read(&self) -> io::Result<u32> {
            Ok(self.value)
        }

        fn update(&mut self, candidate: u32) -> io::Result<u32> {
            if let Some(kind) = self.failure.get() {
                return Err(io::Error::new(kind, "write failed"));
            }
            self.writes.borrow_mut().push(candidate);
            if crate::high_score::should_replace(self.value, candidate) {
                self.value = candidate;
            }
            Ok(self.value)
        }
    }

    #[test]
    fn test_new_session_is_not_started() {
        let session = session_with(&["kotlin"], 3, 0);
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.current_word(), "");
        assert_eq!(session.current_scramble().get(), "");
        assert_eq!(session.round_count().get(), 0);
        assert!(!session.is_round_limit_reached());
    }

    #[test]
    fn test_guess_before_start_is_rejected() {
        let mut session = session_with(&["kotlin"], 3, 0);
        assert!(!session.submit_guess(""));
        assert!(!session.submit_guess("kotlin"));
        assert_eq!(session.score().get(), 0);
    }

    #[test]
    fn test_start_deals_first_round() {
        let mut session = session_with(&["kotlin", "android", "compose"], 3, 0);
        assert_eq!(session.start(), DealOutcome::Dealt);
        assert_eq!(session.state(), SessionState::InRound);
        assert_eq!(session.round_count().get(), 1);
        assert_eq!(session.used_words(), [session.current_word().to_string()]);
        assert_ne!(session.current_scramble().get(), session.current_word());
    }

    #[test]
    fn test_submit_guess_is_case_insensitive() {
        let mut session = session_with(&["apple"], 3, 0);
        session.start();
        assert!(session.submit_guess("APPLE"));
        assert!(session.submit_guess("apple"));
        assert!(session.submit_guess("ApPlE"));
        assert_eq!(session.score().get(), 3 * SCORE_INCREASE);
    }

    #[test]
    fn test_incorrect_guess_changes_nothing() {
        let mut session = session_with(&["apple"], 3, 0);
        session.start();
        let version = session.score().version();
        assert!(!session.submit_guess("apples"));
        assert!(!session.submit_guess(" apple"));
        assert_eq!(session.score().get(), 0);
        assert_eq!(session.score().version(), version);
        assert_eq!(session.round_count().get(), 1);
    }

    #[test]
    fn test_never_repeats_and_respects_round_limit() {
        let words = ["animal", "auto", "anecdote", "alphabet", "awesome", "arise"];
        for seed in 0..20 {
            let mut session = GameSession::new(
                WordBank::new(words).unwrap(),
                GameConfig {
                    max_rounds: 4,
                    score_increase: 5,
                },
                MemoryHighScoreStore::default(),
                StdRng::seed_from_u64(seed),
            );
            session.start();
            while session.deal_next_round() {}

            let used: HashSet<&String> = session.used_words().iter().collect();
            assert_eq!(used.len(), session.used_words().len());
            assert_eq!(session.used_words().len(), 4);
            assert_eq!(session.round_count().get(), 4);
            assert_eq!(session.state(), SessionState::RoundLimitReached);
            assert!(session.is_round_limit_reached());
        }
    }

    #[test]
    fn test_word_bank_exhausted_before_limit() {
        let mut session = session_with(&["kotlin", "android"], 5, 0);
        session.start();
        assert_eq!(session.deal(), DealOutcome::Dealt);
        let last_word = session.current_word().to_string();
        let last_scramble = session.current_scramble().get();

        assert_eq!(session.deal(), DealOutcome::WordBankExhausted);
        assert_eq!(session.state(), SessionState::WordBankExhausted);
        assert!(!session.is_round_limit_reached());
        assert_eq!(session.round_count().get(), 2);
        assert_eq!(session.current_word(), last_word);
        assert_eq!(session.current_scramble().get(), last_scramble);
        assert!(!session.deal_next_round());
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut session = session_with(&["kotlin", "android", "compose"], 3, 0);
        session.start();
        let word = session.current_word().to_string();
        session.submit_guess(&word);
        session.deal();
        session.deal();
        session.deal();
        assert_eq!(session.state(), SessionState::RoundLimitReached);

        assert_eq!(session.restart(), DealOutcome::Dealt);
        assert_eq!(session.score().get(), 0);
        assert_eq!(session.round_count().get(), 1);
        assert_eq!(session.used_words().len(), 1);
        assert_eq!(session.state(), SessionState::InRound);
        assert!(!session.current_word().is_empty());
        assert!(!session.current_scramble().get().is_empty());
    }

    #[test]
    fn test_single_letter_word_does_not_hang() {
        let mut session = session_with(&["aa"], 1, 0);
        assert_eq!(session.start(), DealOutcome::Dealt);
        assert_eq!(session.current_scramble().get(), "aa");
        assert!(session.submit_guess("AA"));
    }

    #[test]
    fn test_correct_guess_updates_high_score_with_shipped_rule() {
        // Stored 100, score 20: 100 > 20 so the stored value becomes 20.
        let mut session = session_with(&["kotlin"], 1, 100);
        assert_eq!(session.high_score().get(), 100);
        session.start();
        assert!(session.submit_guess("kotlin"));
        assert_eq!(session.high_score().get(), 20);
        assert_eq!(session.store().read().unwrap(), 20);

        // 20 > 40 is false, the stored value stays.
        assert!(session.submit_guess("kotlin"));
        assert_eq!(session.high_score().get(), 20);
    }

    #[test]
    fn test_score_subscribers_see_each_change() {
        let mut session = session_with(&["kotlin"], 1, 0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = session.score().subscribe(move |score| s.borrow_mut().push(*score));

        session.start();
        session.submit_guess("kotlin");
        session.submit_guess("nope");
        session.submit_guess("KOTLIN");
        assert_eq!(*seen.borrow(), vec![20, 40]);
    }

    #[test]
    fn test_round_subscribers_see_deals() {
        let mut session = session_with(&["kotlin", "android", "compose"], 3, 0);
        let rounds = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&rounds);
        let _sub = session.round_count().subscribe(move |n| r.borrow_mut().push(*n));

        session.start();
        session.deal();
        session.deal();
        session.deal();
        session.restart();
        assert_eq!(*rounds.borrow(), vec![1, 2, 3, 0, 1]);
    }

    #[test]
    fn test_failed_writes_are_retried_in_order() {
        let failure = Rc::new(Cell::new(Some(io::ErrorKind::StorageFull)));
        let writes = Rc::new(RefCell::new(Vec::new()));
        let store = FlakyStore {
            value: 1000,
            failure: Rc::clone(&failure),
            writes: Rc::clone(&writes),
        };
        let mut session = GameSession::new(
            WordBank::new(["kotlin"]).unwrap(),
            GameConfig::default(),
            store,
            StdRng::seed_from_u64(1),
        );
        session.start();

        assert!(session.submit_guess("kotlin"));
        assert!(session.submit_guess("kotlin"));
        assert_eq!(session.score().get(), 40);
        assert_eq!(session.pending_writes(), 2);
        assert_eq!(session.high_score().get(), 1000);

        failure.set(None);
        assert!(session.submit_guess("kotlin"));
        assert_eq!(*writes.borrow(), vec![20, 40, 60]);
        assert_eq!(session.pending_writes(), 0);
        assert_eq!(session.high_score().get(), 20);
    }

    fn flaky_session(
        kind: io::ErrorKind,
    ) -> (GameSession<FlakyStore, StdRng>, Rc<Cell<Option<io::ErrorKind>>>) {
        let failure = Rc::new(Cell::new(Some(kind)));
        let store = FlakyStore {
            value: 1000,
            failure: Rc::clone(&failure),
            writes: Rc::new(RefCell::new(Vec::new())),
        };
        let session = GameSession::new(
            WordBank::new(["kotlin"]).unwrap(),
            GameConfig {
                max_rounds: 1,
                score_increase: SCORE_INCREASE,
            },
            store,
            StdRng::seed_from_u64(4),
        );
        (session, failure)
    }

    #[test]
    fn test_pending_writes_stay_bounded_across_games() {
        let (mut session, failure) = flaky_session(io::ErrorKind::StorageFull);
        for _ in 0..50 {
            session.restart();
            assert!(session.submit_guess("kotlin"));
        }
        assert_eq!(session.pending_writes(), MAX_PENDING_WRITES);
        assert_eq!(session.high_score().get(), 1000);

        failure.set(None);
        session.restart();
        assert!(session.submit_guess("kotlin"));
        assert_eq!(session.pending_writes(), 0);
        assert_eq!(session.high_score().get(), 20);
    }

    #[test]
    fn test_non_retryable_write_errors_are_dropped() {
        let (mut session, _failure) = flaky_session(io::ErrorKind::InvalidData);
        for _ in 0..5 {
            session.restart();
            assert!(session.submit_guess("kotlin"));
            assert_eq!(session.pending_writes(), 0);
        }
        assert_eq!(session.high_score().get(), 1000);
    }

    #[test]
    fn test_shared_store_between_sessions() {
        let shared = Rc::new(RefCell::new(MemoryHighScoreStore::new(500)));
        let mut first = GameSession::new(
            WordBank::new(["kotlin"]).unwrap(),
            GameConfig::default(),
            Rc::clone(&shared),
            StdRng::seed_from_u64(2),
        );
        first.start();
        first.submit_guess("kotlin");

        let second = GameSession::new(
            WordBank::new(["compose"]).unwrap(),
            GameConfig::default(),
            Rc::clone(&shared),
            StdRng::seed_from_u64(3),
        );
        assert_eq!(second.high_score().get(), 20);
    }

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.score_increase, 20);
    }
}
