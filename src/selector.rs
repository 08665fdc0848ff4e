use crate::wordbank::WordBank;
use rand::Rng;
use rand::seq::SliceRandom;

/// Picks a word uniformly at random from the bank words not in `used`.
///
/// `None` means the bank has nothing left for this session.
pub fn pick_next<'a, R: Rng + ?Sized>(
    bank: &'a WordBank,
    used: &[String],
    rng: &mut R,
) -> Option<&'a str> {
    let available: Vec<&'a str> = bank
        .words()
        .iter()
        .filter(|word| !used.contains(*word))
        .map(String::as_str)
        .collect();

    available.choose(rng).copied()
}
