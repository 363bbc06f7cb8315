//! Lorem ipsum filler text.
//!
//! Each sentence is a shuffled slice of [`VOCABULARY`] whose last word is
//! capitalised and moved to the front. Sentences are separated by a blank
//! line so importers render them as paragraphs.

use rand::Rng;
use rand::seq::SliceRandom;

/// Words sentences are built from. Duplicates are intentional.
pub const VOCABULARY: [&str; 69] = [
    "lorem", "ipsum", "dolor", "sit", "amet", "consectetur", "adipisicing", "elit", "sed",
    "do", "eiusmod", "tempor", "incididunt", "ut", "labore", "et", "dolore", "magna",
    "aliqua", "ut", "enim", "ad", "minim", "veniam,", "quis", "nostrud", "exercitation",
    "ullamco", "laboris", "nisi", "ut", "aliquip", "ex", "ea", "commodo", "consequat",
    "duis", "aute", "irure", "dolor", "in", "reprehenderit", "in", "voluptate", "velit",
    "esse", "cillum", "dolore", "eu", "fugiat", "nulla", "pariatur", "excepteur", "sint",
    "occaecat", "cupidatat", "non", "proident", "sunt", "in", "culpa", "qui", "officia",
    "deserunt", "mollit", "anim", "id", "est", "laborum",
];

/// Fewest sentences in one block of text.
pub const MIN_SENTENCES: usize = 1;

/// Most sentences in one block of text.
pub const MAX_SENTENCES: usize = 7;

/// Fewest words in one sentence.
pub const MIN_SENTENCE_WORDS: usize = 5;

/// Separator placed between sentences.
pub const SENTENCE_SEPARATOR: &str = "\n\n";

/// Builds a block of one to seven lorem ipsum sentences.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use wxr_fixtures::lorem::{self, MAX_SENTENCES};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let text = lorem::text(&mut rng);
///
/// assert!(text.ends_with('.'));
/// assert!(text.split("\n\n").count() <= MAX_SENTENCES);
/// ```
pub fn text<R: Rng>(rng: &mut R) -> String {
    let mut words = VOCABULARY.to_vec();
    let sentence_count = rng.random_range(MIN_SENTENCES..=MAX_SENTENCES);

    (0..sentence_count)
        .map(|_| sentence(rng, &mut words))
        .collect::<Vec<_>>()
        .join(SENTENCE_SEPARATOR)
}

fn sentence<R: Rng>(rng: &mut R, words: &mut [&'static str]) -> String {
    words.shuffle(rng);
    let length = rng.random_range(MIN_SENTENCE_WORDS..=words.len());
    let mut picked: Vec<&str> = words.iter().take(length).copied().collect();

    let Some(lead) = picked.pop() else {
        return String::new();
    };
    let mut out = capitalise(lead);
    for word in picked {
        out.push(' ');
        out.push_str(word);
    }
    out.push('.');
    out
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    //! Shape checks only; the text itself is random.

    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(2026)
    }

    fn sentences(text: &str) -> Vec<&str> {
        text.split(SENTENCE_SEPARATOR).collect()
    }

    #[rstest]
    fn sentence_count_stays_in_bounds(mut rng: ChaCha8Rng) {
        for _ in 0..200 {
            let count = sentences(&text(&mut rng)).len();
            assert!(
                (MIN_SENTENCES..=MAX_SENTENCES).contains(&count),
                "sentence count out of range: {count}"
            );
        }
    }

    #[rstest]
    fn word_count_stays_in_bounds(mut rng: ChaCha8Rng) {
        for _ in 0..200 {
            for sentence in sentences(&text(&mut rng)) {
                let words = sentence.split_whitespace().count();
                assert!(
                    (MIN_SENTENCE_WORDS..=VOCABULARY.len()).contains(&words),
                    "word count out of range: {words} in {sentence:?}"
                );
            }
        }
    }

    #[rstest]
    fn sentences_start_capitalised_and_end_with_period(mut rng: ChaCha8Rng) {
        for _ in 0..50 {
            for sentence in sentences(&text(&mut rng)) {
                assert!(sentence.ends_with('.'));
                assert!(sentence.chars().next().is_some_and(char::is_uppercase));
            }
        }
    }

    #[rstest]
    fn words_come_from_the_vocabulary(mut rng: ChaCha8Rng) {
        let known: HashSet<String> = VOCABULARY.iter().map(|w| (*w).to_owned()).collect();
        let generated = text(&mut rng);

        for sentence in sentences(&generated) {
            let body = sentence.strip_suffix('.').unwrap_or(sentence);
            for word in body.split_whitespace() {
                assert!(known.contains(&word.to_lowercase()), "unknown word {word}");
            }
        }
    }

    #[rstest]
    fn consecutive_calls_vary(mut rng: ChaCha8Rng) {
        let outputs: HashSet<String> = (0..20).map(|_| text(&mut rng)).collect();
        assert!(outputs.len() > 1);
    }

    #[rstest]
    #[case("lorem", "Lorem")]
    #[case("veniam,", "Veniam,")]
    #[case("", "")]
    fn capitalise_uppercases_first_letter(#[case] word: &str, #[case] expected: &str) {
        assert_eq!(capitalise(word), expected);
    }
}
