//! Full segmenter: every dictionary hit, not just the best path.
//!
//! Walking the DAG position by position, every dictionary word of at least
//! two runes is emitted. A single rune is emitted only when it is the sole
//! candidate at its position and no earlier token already covers it
//! (tracked through `max_idx`), so known words do not leak their pieces.

use std::ops::Range;

use crate::dict::DictTrie;
use crate::pre_filter::{PreFilter, Separators};
use crate::tagger::Segment;
use crate::unicode::{decode_runes, words_from_ranges, RuneStr, Word, WordRange};

pub struct FullSegment<'a> {
    dict: &'a DictTrie,
    seps: Separators,
}

impl<'a> FullSegment<'a> {
    pub fn new(dict: &'a DictTrie) -> Self {
        Self {
            dict,
            seps: Separators::default(),
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seps = seps;
        self
    }

    pub(crate) fn cut_range(
        &self,
        runes: &[RuneStr],
        range: Range<usize>,
        out: &mut Vec<WordRange>,
    ) {
        let base = range.start;
        let window = &runes[range];
        let dags = self.dict.dag_default(window);
        // Highest position (exclusive) covered by an emitted word so far.
        let mut max_idx = 0usize;
        let mut word_len = 0usize;
        for (idx, dag) in dags.iter().enumerate() {
            for &(next, entry) in &dag.nexts {
                match entry {
                    Some(e) => {
                        word_len = self.dict.entry(e).word.len();
                        if word_len >= 2 || (dag.nexts.len() == 1 && max_idx <= idx) {
                            out.push(WordRange::new(base + idx, base + next));
                        }
                    }
                    None => {
                        if dag.nexts.len() == 1 && max_idx <= idx {
                            out.push(WordRange::new(base + idx, base + next));
                        }
                    }
                }
                max_idx = max_idx.max(idx + word_len);
            }
        }
    }
}

impl Segment for FullSegment<'_> {
    fn cut(&self, sentence: &str) -> Vec<Word> {
        let runes = match decode_runes(sentence.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(sentence, "decode failed");
                return Vec::new();
            }
        };
        let mut ranges = Vec::with_capacity(runes.len() / 2);
        for range in PreFilter::new(&runes, &self.seps) {
            self.cut_range(&runes, range, &mut ranges);
        }
        words_from_ranges(sentence, &runes, &ranges)
    }
}
