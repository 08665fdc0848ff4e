use rand::Rng;
use rand::seq::SliceRandom;

/// Returns a permutation of `word` that differs from it.
///
/// Words with fewer than two distinct characters have no such permutation and
/// come back unchanged.
pub fn scramble<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    if !has_distinct_chars(&chars) {
        return word.to_string();
    }

    loop {
        chars.shuffle(rng);
        let candidate: String = chars.iter().collect();
        if candidate != word {
            return candidate;
        }
    }
}

fn has_distinct_chars(chars: &[char]) -> bool {
    chars.first().is_some_and(|first| chars.iter().any(|c| c != first))
}
