//! Sentence segmentation for mood scoring.
//!
//! Text is split into lines, then each line is scanned character by character.
//! A sentence ends at `.`, `!` or `?` (kept in the sentence) or at the end of the
//! line. Whitespace at the start of a sentence is skipped.
//!
//! Sentences ending in `?` come back as empty strings: questions are not
//! scored, but they keep their position so sentence numbers stay stable.

use tracing::debug;

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Splits raw text into sentence-like units.
///
/// # Examples
///
/// ```
/// use quill::mood::segment::split_sentences;
///
/// let sentences = split_sentences("Hello. World!\nIs it late? Yes");
/// assert_eq!(sentences, vec!["Hello.", "World!", "", "Yes"]);
/// ```
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();

    for line in text.lines() {
        let mut current = String::new();
        for ch in line.chars() {
            if current.is_empty() && ch.is_whitespace() {
                continue;
            }
            current.push(ch);
            if SENTENCE_TERMINATORS.contains(&ch) {
                sentences.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            sentences.push(current);
        }
    }

    let sentences: Vec<String> = sentences
        .into_iter()
        .map(|sentence| {
            if sentence.ends_with('?') {
                String::new()
            } else {
                sentence
            }
        })
        .collect();

    debug!("Split text into {} sentences", sentences.len());
    sentences
}

/// Counts whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text() {
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("   \n\n  ").is_empty());
    }

    #[test]
    fn test_two_sentences_on_one_line() {
        assert_eq!(split_sentences("Hello. World!"), vec!["Hello.", "World!"]);
    }

    #[test]
    fn test_unterminated_line_is_flushed() {
        assert_eq!(
            split_sentences("first line\nsecond. third"),
            vec!["first line", "second.", "third"]
        );
    }

    #[test]
    fn test_question_becomes_empty() {
        assert_eq!(split_sentences("How are you? Fine."), vec!["", "Fine."]);
    }

    #[test]
    fn test_inner_whitespace_is_kept() {
        assert_eq!(
            split_sentences("  It was   a long day .  "),
            vec!["It was   a long day ."]
        );
    }

    #[test]
    fn test_ellipsis_yields_single_dots() {
        assert_eq!(split_sentences("Wait..."), vec!["Wait.", ".", "."]);
    }

    #[test]
    fn test_windows_line_endings() {
        assert_eq!(split_sentences("One.\r\nTwo."), vec!["One.", "Two."]);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  one  two\tthree\n"), 3);
    }
}
