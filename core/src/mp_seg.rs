//! Maximum-probability (dictionary) segmenter.
//!
//! For each pre-filter range, the dictionary DAG is scored right to left:
//! `W[i]` is the best total log probability of any segmentation starting at
//! rune `i`, candidates without a dictionary entry fall back to the
//! dictionary's minimum weight. Walking the chosen entries left to right
//! yields the tokens.

use std::ops::Range;

use crate::dict::DictTrie;
use crate::pre_filter::{PreFilter, Separators};
use crate::tagger::{Segment, SegmentTagged};
use crate::trie::DagNode;
use crate::unicode::{decode_runes, words_from_ranges, RuneStr, Word, WordRange};
use crate::{MAX_WORD_LENGTH, MIN_DOUBLE};

pub struct MpSegment<'a> {
    dict: &'a DictTrie,
    seps: Separators,
    max_word_len: usize,
}

impl<'a> MpSegment<'a> {
    pub fn new(dict: &'a DictTrie) -> Self {
        Self {
            dict,
            seps: Separators::default(),
            max_word_len: MAX_WORD_LENGTH,
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seps = seps;
        self
    }

    /// Change the default DAG word-length cap used by [`Segment::cut`].
    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.max_word_len = max_word_len;
        self
    }

    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    /// Cut with a cap on candidate word length in runes. A cap of 0 turns
    /// the DAG into identity candidates only, i.e. per-rune output.
    pub fn cut_limit(&self, sentence: &str, max_word_len: usize) -> Vec<Word> {
        let runes = match decode_runes(sentence.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(sentence, "decode failed");
                return Vec::new();
            }
        };
        let mut ranges = Vec::with_capacity(runes.len() / 2);
        for range in PreFilter::new(&runes, &self.seps) {
            self.cut_range(&runes, range, max_word_len, &mut ranges);
        }
        words_from_ranges(sentence, &runes, &ranges)
    }

    /// Segment one pre-filter range, appending absolute word ranges.
    pub(crate) fn cut_range(
        &self,
        runes: &[RuneStr],
        range: Range<usize>,
        max_word_len: usize,
        out: &mut Vec<WordRange>,
    ) {
        let base = range.start;
        let window = &runes[range];
        let dags = self.dict.dag(window, max_word_len);
        let best = self.calc_dp(&dags);
        self.cut_by_dag(base, &best, out);
    }

    /// Right-to-left DP over the DAG. Returns the chosen entry per start
    /// position. On equal scores the later candidate wins, so the ascending
    /// candidate order makes ties resolve toward longer words.
    fn calc_dp(&self, dags: &[DagNode]) -> Vec<Option<usize>> {
        let n = dags.len();
        let mut weights = vec![MIN_DOUBLE; n];
        let mut picks: Vec<Option<usize>> = vec![None; n];
        for i in (0..n).rev() {
            let mut best_weight = MIN_DOUBLE;
            let mut pick = None;
            for &(next, entry) in &dags[i].nexts {
                let mut val = if next + 1 < n { weights[next + 1] } else { 0.0 };
                val += match entry {
                    Some(idx) => self.dict.entry(idx).weight,
                    None => self.dict.min_weight(),
                };
                if val >= best_weight {
                    best_weight = val;
                    pick = entry;
                }
            }
            weights[i] = best_weight;
            picks[i] = pick;
        }
        picks
    }

    fn cut_by_dag(&self, base: usize, picks: &[Option<usize>], out: &mut Vec<WordRange>) {
        let mut i = 0;
        while i < picks.len() {
            match picks[i] {
                Some(idx) => {
                    let len = self.dict.entry(idx).word.len();
                    out.push(WordRange::new(base + i, base + i + len - 1));
                    i += len;
                }
                None => {
                    out.push(WordRange::new(base + i, base + i));
                    i += 1;
                }
            }
        }
    }
}

impl Segment for MpSegment<'_> {
    fn cut(&self, sentence: &str) -> Vec<Word> {
        self.cut_limit(sentence, self.max_word_len)
    }
}

impl SegmentTagged for MpSegment<'_> {
    fn dict(&self) -> &DictTrie {
        self.dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::UserWordWeight;
    use crate::testutil::{write_temp, BASE_DICT};
    use crate::unicode::words_to_strings;

    fn dict() -> DictTrie {
        let path = write_temp("libsegment_mp_dict.utf8", BASE_DICT);
        DictTrie::from_files(&path, None, UserWordWeight::Median).unwrap()
    }

    #[test]
    fn dp_prefers_the_likeliest_path() {
        let dict = dict();
        let seg = MpSegment::new(&dict);
        // ln(.3)+ln(.2)+ln(.15) beats 南京/市长/江大桥 and every other path.
        let words = seg.cut("南京市长江大桥");
        assert_eq!(words_to_strings(&words), vec!["南京市", "长江", "大桥"]);
    }

    #[test]
    fn word_length_cap_changes_the_path() {
        let dict = dict();
        let seg = MpSegment::new(&dict);
        // 江大桥 is barred by the cap of 2; 市 falls back to min weight:
        // 南京/市/长江/大桥 = ln(.2)+min+ln(.2)+ln(.15) beats
        // 南京/市长/江/大桥 = ln(.2)+ln(.1)+min+ln(.15).
        let words = seg.cut_limit("南京市长江大桥", 2);
        assert_eq!(words_to_strings(&words), vec!["南京", "市", "长江", "大桥"]);
    }

    #[test]
    fn cap_zero_is_per_rune() {
        let dict = dict();
        let seg = MpSegment::new(&dict);
        let words = seg.cut_limit("南京市", 0);
        assert_eq!(words_to_strings(&words), vec!["南", "京", "市"]);
    }

    #[test]
    fn separators_pass_through() {
        let dict = dict();
        let seg = MpSegment::new(&dict);
        let words = seg.cut("南京市长江大桥。南京");
        assert_eq!(
            words_to_strings(&words),
            vec!["南京市", "长江", "大桥", "。", "南京"]
        );
        // Byte coverage: concatenated tokens reproduce the sentence.
        assert_eq!(words_to_strings(&words).concat(), "南京市长江大桥。南京");
    }

    #[test]
    fn offsets_are_monotonic() {
        let dict = dict();
        let seg = MpSegment::new(&dict);
        let words = seg.cut("南京市长江大桥。南京");
        let mut expected_offset = 0u32;
        for w in &words {
            assert_eq!(w.offset, expected_offset);
            expected_offset += w.text.len() as u32;
        }
    }
}
