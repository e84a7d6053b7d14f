//! TF-IDF keyword extraction.
//!
//! Tokens come from the mix segmenter; single runes and stop words are
//! filtered out, the rest accumulate term frequency and byte offsets.
//! Weight is `tf * idf(word)` with the table mean as the default IDF for
//! unseen words.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::{AHashMap, AHashSet};

use crate::dict::DictTrie;
use crate::error::Error;
use crate::hmm::HmmModel;
use crate::mix_seg::MixSegment;
use crate::pre_filter::Separators;
use crate::tagger::Segment;
use crate::unicode::is_single_word;

/// A scored keyword with the byte offsets of its occurrences.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyword {
    pub word: String,
    pub offsets: Vec<usize>,
    pub weight: f64,
}

/// IDF table: `word idf` lines; the mean value backs unknown words.
pub struct IdfTable {
    map: AHashMap<String, f64>,
    average: f64,
}

impl IdfTable {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut content = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut content))
            .map_err(|e| Error::io(path, e))?;

        let mut map = AHashMap::new();
        let mut sum = 0.0f64;
        let mut lineno = 0usize;
        for line in content.lines() {
            lineno += 1;
            if line.is_empty() {
                tracing::error!(lineno, "empty idf line skipped");
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 2 {
                tracing::error!(lineno, line, "malformed idf line skipped");
                continue;
            }
            let Ok(idf) = fields[1].parse::<f64>() else {
                tracing::error!(lineno, line, "malformed idf line skipped");
                continue;
            };
            map.insert(fields[0].to_string(), idf);
            sum += idf;
        }
        let average = if lineno > 0 { sum / lineno as f64 } else { 0.0 };
        Ok(Self { map, average })
    }

    pub fn get(&self, word: &str) -> f64 {
        self.map.get(word).copied().unwrap_or(self.average)
    }

    pub fn average(&self) -> f64 {
        self.average
    }
}

/// Stop-word set: one exact word per line.
pub struct StopWords {
    set: AHashSet<String>,
}

impl StopWords {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut content = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut content))
            .map_err(|e| Error::io(path, e))?;
        Ok(Self {
            set: content.lines().map(str::to_string).collect(),
        })
    }

    pub fn empty() -> Self {
        Self {
            set: AHashSet::new(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.set.contains(word)
    }
}

pub struct TfIdfExtractor<'a> {
    seg: MixSegment<'a>,
    idf: &'a IdfTable,
    stop_words: &'a StopWords,
}

impl<'a> TfIdfExtractor<'a> {
    pub fn new(
        dict: &'a DictTrie,
        model: &'a HmmModel,
        idf: &'a IdfTable,
        stop_words: &'a StopWords,
    ) -> Self {
        Self {
            seg: MixSegment::new(dict, model),
            idf,
            stop_words,
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seg = self.seg.with_separators(seps);
        self
    }

    /// Top-`top_n` keywords, weight descending; equal weights keep first
    /// appearance order.
    pub fn extract(&self, sentence: &str, top_n: usize) -> Vec<Keyword> {
        let words = self.seg.cut(sentence);

        let mut keywords: Vec<Keyword> = Vec::new();
        let mut index: AHashMap<String, usize> = AHashMap::new();
        let mut offset = 0usize;
        for w in &words {
            let begin = offset;
            offset += w.text.len();
            if is_single_word(&w.text) || self.stop_words.contains(&w.text) {
                continue;
            }
            let slot = *index.entry(w.text.clone()).or_insert_with(|| {
                keywords.push(Keyword {
                    word: w.text.clone(),
                    offsets: Vec::new(),
                    weight: 0.0,
                });
                keywords.len() - 1
            });
            keywords[slot].offsets.push(begin);
            keywords[slot].weight += 1.0;
        }
        if offset != sentence.len() {
            tracing::error!(sentence, "tokenization does not cover the input");
            return Vec::new();
        }

        for kw in &mut keywords {
            kw.weight *= self.idf.get(&kw.word);
        }
        // Stable sort: ties stay in first-appearance order.
        keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        keywords.truncate(top_n);
        keywords
    }
}
