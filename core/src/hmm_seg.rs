//! HMM segmenter for runs of out-of-dictionary runes.
//!
//! ASCII never goes through the model (the emission tables only cover
//! Chinese): inside each range, a letter run (`[A-Za-z][A-Za-z0-9]*`), a
//! number run (`[0-9][0-9.]*`) or a lone ASCII rune becomes one token, and
//! only the non-ASCII stretches in between are Viterbi-decoded into words.

use std::ops::Range;

use crate::hmm::HmmModel;
use crate::pre_filter::{PreFilter, Separators};
use crate::tagger::Segment;
use crate::unicode::{decode_runes, words_from_ranges, RuneStr, Word, WordRange};

pub struct HmmSegment<'a> {
    model: &'a HmmModel,
    seps: Separators,
}

impl<'a> HmmSegment<'a> {
    pub fn new(model: &'a HmmModel) -> Self {
        Self {
            model,
            seps: Separators::default(),
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seps = seps;
        self
    }

    /// Segment one pre-filter range, appending absolute word ranges.
    pub(crate) fn cut_range(
        &self,
        runes: &[RuneStr],
        range: Range<usize>,
        out: &mut Vec<WordRange>,
    ) {
        let end = range.end;
        let mut left = range.start;
        let mut right = left;
        while right < end {
            if runes[right].rune < 0x80 {
                if left != right {
                    self.viterbi_cut(runes, left, right, out);
                }
                left = right;
                let mut next = sequential_letter_rule(runes, left, end);
                if next == left {
                    next = numbers_rule(runes, left, end);
                }
                if next == left {
                    next = left + 1;
                }
                right = next;
                out.push(WordRange::new(left, right - 1));
                left = right;
            } else {
                right += 1;
            }
        }
        if left != right {
            self.viterbi_cut(runes, left, right, out);
        }
    }

    /// Decode `[left, right)` and close words on E/S tags; a trailing open
    /// word (B or M at the end) is flushed as-is.
    fn viterbi_cut(
        &self,
        runes: &[RuneStr],
        left: usize,
        right: usize,
        out: &mut Vec<WordRange>,
    ) {
        let tags = self.model.viterbi(&runes[left..right]);
        let mut word_start = left;
        for (i, &tag) in tags.iter().enumerate() {
            if tag == HmmModel::E || tag == HmmModel::S {
                out.push(WordRange::new(word_start, left + i));
                word_start = left + i + 1;
            }
        }
        if word_start < right {
            out.push(WordRange::new(word_start, right - 1));
        }
    }
}

impl Segment for HmmSegment<'_> {
    fn cut(&self, sentence: &str) -> Vec<Word> {
        let runes = match decode_runes(sentence.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(sentence, "decode failed");
                return Vec::new();
            }
        };
        let mut ranges = Vec::with_capacity(runes.len());
        for range in PreFilter::new(&runes, &self.seps) {
            self.cut_range(&runes, range, &mut ranges);
        }
        words_from_ranges(sentence, &runes, &ranges)
    }
}

fn is_ascii_letter(r: u32) -> bool {
    (0x41..=0x5a).contains(&r) || (0x61..=0x7a).contains(&r)
}

fn is_ascii_digit(r: u32) -> bool {
    (0x30..=0x39).contains(&r)
}

/// Extend a run starting with a letter through letters and digits.
/// Returns `begin` when the first rune is not a letter.
fn sequential_letter_rule(runes: &[RuneStr], begin: usize, end: usize) -> usize {
    if !is_ascii_letter(runes[begin].rune) {
        return begin;
    }
    let mut i = begin + 1;
    while i < end && (is_ascii_letter(runes[i].rune) || is_ascii_digit(runes[i].rune)) {
        i += 1;
    }
    i
}

/// Extend a run starting with a digit through digits and dots.
fn numbers_rule(runes: &[RuneStr], begin: usize, end: usize) -> usize {
    if !is_ascii_digit(runes[begin].rune) {
        return begin;
    }
    let mut i = begin + 1;
    while i < end && (is_ascii_digit(runes[i].rune) || runes[i].rune == u32::from(b'.')) {
        i += 1;
    }
    i
}
