use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use word_unscramble::cli::{Cli, CliInterface, parse_cli};
use word_unscramble::high_score::{
    FileHighScoreStore, HighScoreStore, MemoryHighScoreStore, get_high_score_path,
};
use word_unscramble::logging::{LogTarget, get_log_path, init_logging};
use word_unscramble::tui::TuiInterface;
use word_unscramble::{GameSession, WordBank, game_loop};

fn main() {
    let cli = parse_cli();

    if let Err(e) = init_logging(&log_target(&cli)) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let bank = match &cli.wordbank_path {
        Some(path) => match WordBank::from_file(path) {
            Ok(bank) => bank,
            Err(e) => {
                eprintln!("Failed to load word bank from '{path}': {e}");
                return;
            }
        },
        None => WordBank::embedded(),
    };
    log::info!("Loaded {} words", bank.len());

    let store = open_store(&cli);
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = GameSession::new(bank, cli.game_config(), store, rng);

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&mut session, &mut interface);
        return;
    }

    match TuiInterface::new() {
        Ok(mut interface) => game_loop(&mut session, &mut interface),
        Err(e) => eprintln!("Failed to start the terminal interface: {e} (try --plain)"),
    }
}

fn log_target(cli: &Cli) -> LogTarget {
    match (&cli.log_path, cli.plain) {
        (Some(path), _) => LogTarget::File(path.clone()),
        (None, true) => LogTarget::Stderr,
        // The TUI owns the terminal, so its logs go to a file.
        (None, false) => get_log_path().map_or(LogTarget::Stderr, LogTarget::File),
    }
}

fn open_store(cli: &Cli) -> Box<dyn HighScoreStore> {
    if cli.no_persist {
        return Box::new(MemoryHighScoreStore::default());
    }

    let Some(path) = cli.high_score_path.clone().or_else(get_high_score_path) else {
        log::warn!("No data directory available, high score will not be saved");
        return Box::new(MemoryHighScoreStore::default());
    };

    match FileHighScoreStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!(
                "Failed to open high score file {}: {e}; keeping it in memory",
                path.display()
            );
            Box::new(MemoryHighScoreStore::default())
        }
    }
}
