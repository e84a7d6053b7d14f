//! Query segmenter: mix output expanded for search engines.
//!
//! Long mix tokens also yield their in-dictionary sub-ngrams so a query
//! index sees both the word and its parts: 2-rune sub-tokens for tokens
//! longer than two runes, 3-rune sub-tokens for tokens longer than three.
//! The original token always follows its expansions.

use std::ops::Range;

use crate::dict::DictTrie;
use crate::hmm::HmmModel;
use crate::mix_seg::MixSegment;
use crate::pre_filter::{PreFilter, Separators};
use crate::tagger::Segment;
use crate::unicode::{decode_runes, words_from_ranges, RuneStr, Word, WordRange};

pub struct QuerySegment<'a> {
    mix: MixSegment<'a>,
    dict: &'a DictTrie,
    seps: Separators,
}

impl<'a> QuerySegment<'a> {
    pub fn new(dict: &'a DictTrie, model: &'a HmmModel) -> Self {
        Self {
            mix: MixSegment::new(dict, model),
            dict,
            seps: Separators::default(),
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seps = seps;
        self
    }

    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.mix = self.mix.with_max_word_len(max_word_len);
        self
    }

    pub fn cut_with_hmm(&self, sentence: &str, hmm: bool) -> Vec<Word> {
        let runes = match decode_runes(sentence.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(sentence, "decode failed");
                return Vec::new();
            }
        };
        let mut ranges = Vec::with_capacity(runes.len());
        for range in PreFilter::new(&runes, &self.seps) {
            self.cut_range(&runes, range, hmm, &mut ranges);
        }
        words_from_ranges(sentence, &runes, &ranges)
    }

    fn cut_range(
        &self,
        runes: &[RuneStr],
        range: Range<usize>,
        hmm: bool,
        out: &mut Vec<WordRange>,
    ) {
        let mut mix_ranges = Vec::with_capacity(range.len());
        self.mix.cut_range(runes, range, hmm, &mut mix_ranges);
        for wr in mix_ranges {
            if wr.len() > 2 {
                for i in 0..wr.len() - 1 {
                    let sub = WordRange::new(wr.left + i, wr.left + i + 1);
                    if self.dict.find(&runes[sub.left..=sub.right]).is_some() {
                        out.push(sub);
                    }
                }
            }
            if wr.len() > 3 {
                for i in 0..wr.len() - 2 {
                    let sub = WordRange::new(wr.left + i, wr.left + i + 2);
                    if self.dict.find(&runes[sub.left..=sub.right]).is_some() {
                        out.push(sub);
                    }
                }
            }
            out.push(wr);
        }
    }
}

impl Segment for QuerySegment<'_> {
    fn cut(&self, sentence: &str) -> Vec<Word> {
        self.cut_with_hmm(sentence, true)
    }
}
