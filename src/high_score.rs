use crate::{debug_log, info_log};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const HIGH_SCORE_KEY: &str = "high_score";
const APP_DIR: &str = "word-unscramble";
const HIGH_SCORE_FILE: &str = "high_score.txt";

/// Storage port for the single, global high score.
pub trait HighScoreStore {
    /// Current stored value; 0 when nothing has been stored yet.
    fn read(&self) -> io::Result<u32>;

    /// Offers `candidate` to the store and returns the stored value afterwards.
    fn update(&mut self, candidate: u32) -> io::Result<u32>;
}

/// Whether `candidate` replaces `stored`.
///
/// NOTE: this keeps the comparison the game has always shipped with, which
/// replaces the stored value only when it is greater than the candidate. It
/// looks inverted relative to "keep the maximum" and is waiting on a product
/// decision; do not flip it here without one.
#[must_use]
pub fn should_replace(stored: u32, candidate: u32) -> bool {
    stored > candidate
}

/// Default location of the high score file under the platform data dir.
#[must_use]
pub fn get_high_score_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR).join(HIGH_SCORE_FILE))
}

/// In-memory store, used when persistence is disabled and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryHighScoreStore {
    value: u32,
}

impl MemoryHighScoreStore {
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn read(&self) -> io::Result<u32> {
        Ok(self.value)
    }

    fn update(&mut self, candidate: u32) -> io::Result<u32> {
        if should_replace(self.value, candidate) {
            self.value = candidate;
        }
        Ok(self.value)
    }
}

/// High score kept in a small `high_score=<n>` text file.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// Opens the store at `path`, creating it with a score of 0 if missing.
    pub fn open<P: Into<PathBuf>>(path: P) -> io::Result<Self> {
        let store = Self { path: path.into() };
        if !store.path.exists() {
            info_log!("Creating high score file at {}", store.path.display());
            store.write(0)?;
        }
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, value: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, format!("{HIGH_SCORE_KEY}={value}\n"))?;
        fs::rename(&tmp, &self.path)?;
        debug_log!("Wrote high score {} to {}", value, self.path.display());
        Ok(())
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn read(&self) -> io::Result<u32> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => parse_high_score(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn update(&mut self, candidate: u32) -> io::Result<u32> {
        let (stored, repair) = match self.read() {
            Ok(stored) => (stored, false),
            // Same fallback as the startup read: a damaged file counts as 0.
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                log::warn!(
                    "High score file {} is unreadable ({e}), resetting it",
                    self.path.display()
                );
                (0, true)
            }
            Err(e) => return Err(e),
        };

        let next = if should_replace(stored, candidate) { candidate } else { stored };
        if repair || next != stored {
            self.write(next)?;
        }
        Ok(next)
    }
}

impl<S: HighScoreStore> HighScoreStore for Rc<RefCell<S>> {
    fn read(&self) -> io::Result<u32> {
        self.borrow().read()
    }

    fn update(&mut self, candidate: u32) -> io::Result<u32> {
        self.borrow_mut().update(candidate)
    }
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for Box<S> {
    fn read(&self) -> io::Result<u32> {
        (**self).read()
    }

    fn update(&mut self, candidate: u32) -> io::Result<u32> {
        (**self).update(candidate)
    }
}

fn parse_high_score(contents: &str) -> io::Result<u32> {
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=')
            && key.trim() == HIGH_SCORE_KEY
        {
            return value.trim().parse().map_err(|e| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid high score value '{}': {e}", value.trim()),
                )
            });
        }
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("missing '{HIGH_SCORE_KEY}' entry"),
    ))
}
