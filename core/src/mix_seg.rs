//! Mixed segmenter: dictionary first, HMM for the gaps.
//!
//! The MP pass handles everything the dictionary knows. What it leaves
//! behind as consecutive single runes (user-dict single words excepted) is
//! usually an out-of-vocabulary word, so each maximal run of such leftovers
//! is re-cut by the HMM segmenter and spliced back in place.

use std::ops::Range;

use crate::dict::DictTrie;
use crate::hmm::HmmModel;
use crate::hmm_seg::HmmSegment;
use crate::mp_seg::MpSegment;
use crate::pre_filter::{PreFilter, Separators};
use crate::tagger::{Segment, SegmentTagged};
use crate::unicode::{decode_runes, words_from_ranges, RuneStr, Word, WordRange};

pub struct MixSegment<'a> {
    mp: MpSegment<'a>,
    hmm: HmmSegment<'a>,
    seps: Separators,
}

impl<'a> MixSegment<'a> {
    pub fn new(dict: &'a DictTrie, model: &'a HmmModel) -> Self {
        Self {
            mp: MpSegment::new(dict),
            hmm: HmmSegment::new(model),
            seps: Separators::default(),
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seps = seps;
        self
    }

    pub fn with_max_word_len(mut self, max_word_len: usize) -> Self {
        self.mp = self.mp.with_max_word_len(max_word_len);
        self
    }

    /// Cut with or without the HMM pass; `hmm == false` is plain MP.
    pub fn cut_with_hmm(&self, sentence: &str, hmm: bool) -> Vec<Word> {
        let runes = match decode_runes(sentence.as_bytes()) {
            Ok(runes) => runes,
            Err(_) => {
                tracing::error!(sentence, "decode failed");
                return Vec::new();
            }
        };
        let mut ranges = Vec::with_capacity(runes.len() / 2);
        for range in PreFilter::new(&runes, &self.seps) {
            self.cut_range(&runes, range, hmm, &mut ranges);
        }
        words_from_ranges(sentence, &runes, &ranges)
    }

    pub(crate) fn cut_range(
        &self,
        runes: &[RuneStr],
        range: Range<usize>,
        hmm: bool,
        out: &mut Vec<WordRange>,
    ) {
        if !hmm {
            self.mp.cut_range(runes, range, self.mp.max_word_len(), out);
            return;
        }
        let mut mp_ranges = Vec::with_capacity(range.len());
        self.mp
            .cut_range(runes, range, self.mp.max_word_len(), &mut mp_ranges);

        let dict = self.mp.dict();
        let mut i = 0;
        while i < mp_ranges.len() {
            let wr = mp_ranges[i];
            // Real dictionary words and user single-rune words pass through.
            if wr.left != wr.right || dict.is_user_single_rune(runes[wr.left].rune) {
                out.push(wr);
                i += 1;
                continue;
            }
            // Collect the maximal run of unclaimed single runes.
            let mut j = i;
            while j < mp_ranges.len()
                && mp_ranges[j].left == mp_ranges[j].right
                && !dict.is_user_single_rune(runes[mp_ranges[j].left].rune)
            {
                j += 1;
            }
            self.hmm
                .cut_range(runes, mp_ranges[i].left..mp_ranges[j - 1].left + 1, out);
            i = j;
        }
    }
}

impl Segment for MixSegment<'_> {
    fn cut(&self, sentence: &str) -> Vec<Word> {
        self.cut_with_hmm(sentence, true)
    }
}

impl SegmentTagged for MixSegment<'_> {
    fn dict(&self) -> &DictTrie {
        self.mp.dict()
    }
}
