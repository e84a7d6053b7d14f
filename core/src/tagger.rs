//! Segmentation capabilities and POS tagging.
//!
//! Segmenters expose capabilities through small traits instead of a class
//! hierarchy: [`Segment`] is the plain cut capability, [`SegmentTagged`]
//! adds dictionary access and with it tagging. Tag lookup prefers the
//! dictionary entry's tag; words without one (typically HMM output or raw
//! ASCII) fall through to a content heuristic.

use crate::dict::DictTrie;
use crate::unicode::{decode_runes, RuneStr, Word};

pub const POS_M: &str = "m";
pub const POS_ENG: &str = "eng";
pub const POS_X: &str = "x";

/// The plain cut capability: sentence in, words out.
pub trait Segment {
    fn cut(&self, sentence: &str) -> Vec<Word>;
}

/// Cut plus dictionary access, which enables POS tagging.
pub trait SegmentTagged: Segment {
    fn dict(&self) -> &DictTrie;

    /// Cut `sentence` and pair every token with its tag.
    fn tag(&self, sentence: &str) -> Vec<(String, String)> {
        self.cut(sentence)
            .into_iter()
            .map(|w| {
                let tag = self.lookup_tag(&w.text);
                (w.text, tag)
            })
            .collect()
    }

    /// Tag for one token: the dictionary tag when present and non-empty,
    /// otherwise the ASCII content heuristic.
    fn lookup_tag(&self, word: &str) -> String {
        let runes = match decode_runes(word.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(word, "decode failed");
                return POS_X.to_string();
            }
        };
        match self.dict().find(&runes) {
            Some(entry) if !entry.tag.is_empty() => entry.tag.clone(),
            _ => special_rule(&runes).to_string(),
        }
    }
}

/// Content heuristic for untagged tokens: count ASCII runes until they
/// reach half the token length, tracking how many of them are digits.
/// No ASCII at all -> `x`; all counted ASCII digits -> `m`; else `eng`.
fn special_rule(runes: &[RuneStr]) -> &'static str {
    let mut digits = 0usize;
    let mut ascii = 0usize;
    let mut i = 0usize;
    while i < runes.len() && ascii < runes.len() / 2 {
        if runes[i].rune < 0x80 {
            ascii += 1;
            if (0x30..=0x39).contains(&runes[i].rune) {
                digits += 1;
            }
        }
        i += 1;
    }
    if ascii == 0 {
        POS_X
    } else if digits == ascii {
        POS_M
    } else {
        POS_ENG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(s: &str) -> &'static str {
        special_rule(&decode_runes(s.as_bytes()).unwrap())
    }

    #[test]
    fn special_rule_classifies_content() {
        assert_eq!(rule("巅峰"), POS_X);
        assert_eq!(rule("123456"), POS_M);
        assert_eq!(rule("3.14"), POS_ENG); // '.' is ASCII but not a digit
        assert_eq!(rule("CEO"), POS_ENG);
        assert_eq!(rule("iPhone6"), POS_ENG);
        assert_eq!(rule("AK47"), POS_ENG);
    }

    #[test]
    fn special_rule_counts_up_to_half_length() {
        // Counting stops once ASCII runes reach half the token length.
        assert_eq!(rule("12中文34"), POS_M);
        assert_eq!(rule("1a中文23"), POS_ENG);
    }
}
