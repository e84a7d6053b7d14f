//! The segmentor facade.
//!
//! Owns the dictionary trie, HMM model and keyword tables, and exposes the
//! public operations as thin per-call views over them. Read-only calls on
//! an un-mutated segmentor touch no shared mutable state; user-word
//! mutation takes `&mut self`.

use std::path::Path;

use crate::dict::{DictTrie, UserWordWeight};
use crate::full_seg::FullSegment;
use crate::hmm::HmmModel;
use crate::hmm_seg::HmmSegment;
use crate::keyword::{IdfTable, Keyword, StopWords, TfIdfExtractor};
use crate::mix_seg::MixSegment;
use crate::mp_seg::MpSegment;
use crate::pre_filter::Separators;
use crate::query_seg::QuerySegment;
use crate::tagger::{Segment, SegmentTagged};
use crate::textrank::TextRankExtractor;
use crate::unicode::Word;
use crate::{textrank, Config, Error, MAX_WORD_LENGTH};

pub struct Segmentor {
    dict: DictTrie,
    model: HmmModel,
    idf: Option<IdfTable>,
    stop_words: StopWords,
    seps: Separators,
    max_word_len: usize,
    textrank_span: usize,
    textrank_iters: usize,
}

impl Segmentor {
    /// Build from explicit file paths.
    pub fn from_paths(
        dict_path: impl AsRef<Path>,
        model_path: impl AsRef<Path>,
        user_dict_paths: Option<&str>,
        idf_path: Option<&Path>,
        stop_words_path: Option<&Path>,
    ) -> Result<Self, Error> {
        let dict = DictTrie::from_files(dict_path, user_dict_paths, UserWordWeight::default())?;
        let model = HmmModel::from_file(model_path)?;
        let idf = idf_path.map(IdfTable::from_file).transpose()?;
        let stop_words = stop_words_path
            .map(StopWords::from_file)
            .transpose()?
            .unwrap_or_else(StopWords::empty);
        Ok(Self {
            dict,
            model,
            idf,
            stop_words,
            seps: Separators::default(),
            max_word_len: MAX_WORD_LENGTH,
            textrank_span: textrank::DEFAULT_SPAN,
            textrank_iters: textrank::DEFAULT_RANK_ITERS,
        })
    }

    /// Build from a [`Config`], honoring its weight policy and separators.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let dict = DictTrie::from_files(
            &config.dict_path,
            config.user_dict_paths.as_deref(),
            config.user_weight_policy,
        )?;
        let model = HmmModel::from_file(&config.hmm_model_path)?;
        let idf = config
            .idf_path
            .as_ref()
            .map(IdfTable::from_file)
            .transpose()?;
        let stop_words = config
            .stop_words_path
            .as_ref()
            .map(StopWords::from_file)
            .transpose()?
            .unwrap_or_else(StopWords::empty);
        let mut seps = Separators::default();
        seps.reset(&config.separators)?;
        Ok(Self {
            dict,
            model,
            idf,
            stop_words,
            seps,
            max_word_len: config.max_word_len,
            textrank_span: config.textrank_span,
            textrank_iters: config.textrank_iters,
        })
    }

    fn mix(&self) -> MixSegment<'_> {
        MixSegment::new(&self.dict, &self.model)
            .with_separators(self.seps.clone())
            .with_max_word_len(self.max_word_len)
    }

    /// Mix segmentation; `hmm == false` degrades to plain dictionary MP.
    pub fn cut(&self, sentence: &str, hmm: bool) -> Vec<Word> {
        self.mix().cut_with_hmm(sentence, hmm)
    }

    /// Full segmentation: every dictionary hit.
    pub fn cut_all(&self, sentence: &str) -> Vec<Word> {
        FullSegment::new(&self.dict)
            .with_separators(self.seps.clone())
            .cut(sentence)
    }

    /// Query segmentation: mix output plus in-dictionary sub-ngrams.
    pub fn cut_for_search(&self, sentence: &str, hmm: bool) -> Vec<Word> {
        QuerySegment::new(&self.dict, &self.model)
            .with_separators(self.seps.clone())
            .with_max_word_len(self.max_word_len)
            .cut_with_hmm(sentence, hmm)
    }

    /// HMM-only segmentation.
    pub fn cut_hmm(&self, sentence: &str) -> Vec<Word> {
        HmmSegment::new(&self.model)
            .with_separators(self.seps.clone())
            .cut(sentence)
    }

    /// MP segmentation with a cap on word length in runes.
    pub fn cut_small(&self, sentence: &str, max_word_len: usize) -> Vec<Word> {
        MpSegment::new(&self.dict)
            .with_separators(self.seps.clone())
            .cut_limit(sentence, max_word_len)
    }

    /// Mix segmentation with POS tags.
    pub fn tag(&self, sentence: &str) -> Vec<(String, String)> {
        self.mix().tag(sentence)
    }

    /// Tag for a single token.
    pub fn lookup_tag(&self, word: &str) -> String {
        self.mix().lookup_tag(word)
    }

    pub fn insert_user_word(&mut self, word: &str, freq: Option<u64>, tag: &str) -> bool {
        self.dict.insert_user_word(word, freq, tag)
    }

    pub fn delete_user_word(&mut self, word: &str) -> bool {
        self.dict.delete_user_word(word)
    }

    /// Append user-dictionary files (`|`- or `;`-joined paths) after build.
    pub fn load_user_dict(&mut self, paths: &str) -> Result<(), Error> {
        self.dict.load_user_dict(paths)
    }

    pub fn find(&self, word: &str) -> bool {
        self.dict.find_word(word)
    }

    /// Replace the separator set; on a duplicate rune the old set stays and
    /// false is returned.
    pub fn reset_separators(&mut self, s: &str) -> bool {
        match self.seps.reset(s) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(%err, "reset_separators rejected");
                false
            }
        }
    }

    /// Top-N keywords by TF-IDF. Requires an IDF table; without one the
    /// result is empty.
    pub fn extract_tfidf(&self, sentence: &str, top_n: usize) -> Vec<Keyword> {
        let Some(idf) = &self.idf else {
            tracing::error!("no idf table loaded");
            return Vec::new();
        };
        TfIdfExtractor::new(&self.dict, &self.model, idf, &self.stop_words)
            .with_separators(self.seps.clone())
            .extract(sentence, top_n)
    }

    /// Top-N keywords by TextRank with the configured window and
    /// iteration count.
    pub fn extract_textrank(&self, sentence: &str, top_n: usize) -> Vec<Keyword> {
        self.extract_textrank_with(sentence, top_n, self.textrank_span, self.textrank_iters)
    }

    /// Top-N keywords by TextRank with explicit parameters.
    pub fn extract_textrank_with(
        &self,
        sentence: &str,
        top_n: usize,
        span: usize,
        rank_iters: usize,
    ) -> Vec<Keyword> {
        TextRankExtractor::new(&self.dict, &self.model, &self.stop_words)
            .with_separators(self.seps.clone())
            .extract_with(sentence, top_n, span, rank_iters)
    }

    pub fn dict(&self) -> &DictTrie {
        &self.dict
    }

    pub fn hmm_model(&self) -> &HmmModel {
        &self.model
    }
}
