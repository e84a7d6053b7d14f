//! Sentence pre-filtering.
//!
//! Before any segmenter runs, a sentence is split on a configurable set of
//! separator runes. The resulting ranges alternate between maximal runs of
//! non-separator runes and single separator runes, exhaustively covering
//! the input in source order; separators come through as their own tokens
//! so byte coverage of the output stays exact.

use std::ops::Range;

use ahash::AHashSet;

use crate::error::Error;
use crate::unicode::{decode_runes, Rune, RuneStr};
use crate::DEFAULT_SEPARATORS;

/// The separator rune set. Defaults to space, tab, newline, U+FF0C and
/// U+3002.
#[derive(Debug, Clone)]
pub struct Separators {
    set: AHashSet<Rune>,
}

impl Default for Separators {
    fn default() -> Self {
        let mut seps = Self { set: AHashSet::new() };
        seps.reset(DEFAULT_SEPARATORS)
            .expect("default separators are distinct");
        seps
    }
}

impl Separators {
    /// Replace the set with the runes of `s`.
    ///
    /// A repeated rune is rejected with [`Error::DuplicateSeparator`] and
    /// the previous set stays intact.
    pub fn reset(&mut self, s: &str) -> Result<(), Error> {
        let runes = decode_runes(s.as_bytes())?;
        let mut set = AHashSet::with_capacity(runes.len());
        for r in &runes {
            if !set.insert(r.rune) {
                let ch = char::from_u32(r.rune).unwrap_or('\u{fffd}');
                return Err(Error::DuplicateSeparator(ch));
            }
        }
        self.set = set;
        Ok(())
    }

    pub fn contains(&self, rune: Rune) -> bool {
        self.set.contains(&rune)
    }
}

/// Iterator over pre-filter ranges (rune indices, end exclusive).
pub struct PreFilter<'a> {
    runes: &'a [RuneStr],
    seps: &'a Separators,
    cursor: usize,
}

impl<'a> PreFilter<'a> {
    pub fn new(runes: &'a [RuneStr], seps: &'a Separators) -> Self {
        Self {
            runes,
            seps,
            cursor: 0,
        }
    }
}

impl Iterator for PreFilter<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        if self.cursor >= self.runes.len() {
            return None;
        }
        let begin = self.cursor;
        if self.seps.contains(self.runes[self.cursor].rune) {
            self.cursor += 1;
        } else {
            while self.cursor < self.runes.len()
                && !self.seps.contains(self.runes[self.cursor].rune)
            {
                self.cursor += 1;
            }
        }
        Some(begin..self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(s: &str, seps: &Separators) -> Vec<String> {
        let runes = decode_runes(s.as_bytes()).unwrap();
        PreFilter::new(&runes, seps)
            .map(|r| {
                let begin = runes[r.start].offset as usize;
                let last = &runes[r.end - 1];
                let end = last.offset as usize + last.len as usize;
                s[begin..end].to_string()
            })
            .collect()
    }

    #[test]
    fn runs_and_single_separators() {
        let seps = Separators::default();
        assert_eq!(
            split("你好，美丽的，世界", &seps),
            vec!["你好", "，", "美丽的", "，", "世界"]
        );
        assert_eq!(
            split("我来自北京邮电大学。。。学号123456，用AK47", &seps),
            vec!["我来自北京邮电大学", "。", "。", "。", "学号123456", "，", "用AK47"]
        );
    }

    #[test]
    fn coverage_is_exhaustive_and_ordered() {
        let seps = Separators::default();
        let s = "B超 T恤";
        assert_eq!(split(s, &seps).concat(), s);
        assert_eq!(split("", &seps), Vec::<String>::new());
        assert_eq!(split("。", &seps), vec!["。"]);
    }

    #[test]
    fn reset_rejects_duplicates_and_keeps_old_set() {
        let mut seps = Separators::default();
        let err = seps.reset("。，。").unwrap_err();
        assert!(matches!(err, Error::DuplicateSeparator('。')));
        // Old set survives the failed reset.
        assert!(seps.contains('，' as Rune));
        assert!(seps.contains(' ' as Rune));

        seps.reset("、；").unwrap();
        assert!(seps.contains('、' as Rune));
        assert!(!seps.contains('，' as Rune));
    }
}
