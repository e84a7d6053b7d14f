//! Dictionary storage: entry arena + rune trie.
//!
//! The base dictionary is `word freq tag` lines; frequencies are converted
//! to log probabilities `ln(freq / Σfreq)` over the base set. User
//! dictionaries (`word`, `word tag`, or `word freq tag` lines, several
//! files joined by `|` or `;`) append into the same arena with a default
//! weight picked by [`UserWordWeight`]. Trie leaves reference entries by
//! arena index, so user inserts never invalidate anything a reader holds.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read};
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::trie::{DagNode, Trie};
use crate::unicode::{decode_unicode, Rune, RuneStr};
use crate::MAX_WORD_LENGTH;

/// Tag for entries that carry none.
pub const UNKNOWN_TAG: &str = "";

/// One dictionary word: its runes, log-probability weight, POS tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictEntry {
    pub word: Vec<Rune>,
    pub weight: f64,
    pub tag: String,
}

/// Default-weight policy for user words without an explicit frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserWordWeight {
    Min,
    #[default]
    Median,
    Max,
}

/// Base-dictionary entries in prepared (already weighted) form, written by
/// [`DictTrie::save_prepared`] and consumed by [`DictTrie::from_prepared`].
#[derive(Debug, Serialize, Deserialize)]
struct PreparedDict {
    entries: Vec<DictEntry>,
    freq_sum: f64,
}

/// The dictionary trie: append-only entry arena plus the rune trie over it.
#[derive(Debug)]
pub struct DictTrie {
    entries: Vec<DictEntry>,
    trie: Trie,
    freq_sum: f64,
    min_weight: f64,
    max_weight: f64,
    median_weight: f64,
    user_weight: f64,
    user_single_rune: AHashSet<Rune>,
}

impl DictTrie {
    /// Build from a base dictionary file, optional user dictionaries
    /// (paths joined by `|` or `;`), and a user-weight policy.
    pub fn from_files(
        dict_path: impl AsRef<Path>,
        user_dict_paths: Option<&str>,
        policy: UserWordWeight,
    ) -> Result<Self, Error> {
        let (entries, freq_sum) = load_base_dict(dict_path.as_ref())?;
        let mut dict = Self::from_entries(entries, freq_sum, policy);
        if let Some(paths) = user_dict_paths {
            dict.load_user_dict(paths)?;
        }
        Ok(dict)
    }

    /// Rebuild from a prepared base dictionary written by
    /// [`DictTrie::save_prepared`].
    pub fn from_prepared(
        prepared_path: impl AsRef<Path>,
        user_dict_paths: Option<&str>,
        policy: UserWordWeight,
    ) -> Result<Self, Error> {
        let path = prepared_path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let prepared: PreparedDict = bincode::deserialize_from(BufReader::new(file))
            .map_err(|e| Error::Prepared(e.to_string()))?;
        let mut dict = Self::from_entries(prepared.entries, prepared.freq_sum, policy);
        if let Some(paths) = user_dict_paths {
            dict.load_user_dict(paths)?;
        }
        Ok(dict)
    }

    /// Serialize the current entry arena (weights already applied) for
    /// fast reload.
    pub fn save_prepared(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path, e))?;
        let prepared = PreparedDict {
            entries: self.entries.clone(),
            freq_sum: self.freq_sum,
        };
        bincode::serialize_into(BufWriter::new(file), &prepared)
            .map_err(|e| Error::Prepared(e.to_string()))
    }

    fn from_entries(entries: Vec<DictEntry>, freq_sum: f64, policy: UserWordWeight) -> Self {
        let mut weights: Vec<f64> = entries.iter().map(|e| e.weight).collect();
        weights.sort_by(|a, b| a.total_cmp(b));
        let min_weight = weights.first().copied().unwrap_or(0.0);
        let max_weight = weights.last().copied().unwrap_or(0.0);
        // Lower median on the sorted weights.
        let median_weight = weights.get(weights.len() / 2).copied().unwrap_or(0.0);
        let user_weight = match policy {
            UserWordWeight::Min => min_weight,
            UserWordWeight::Median => median_weight,
            UserWordWeight::Max => max_weight,
        };

        let mut trie = Trie::new();
        for (i, entry) in entries.iter().enumerate() {
            trie.insert(&entry.word, i);
        }
        Self {
            entries,
            trie,
            freq_sum,
            min_weight,
            max_weight,
            median_weight,
            user_weight,
            user_single_rune: AHashSet::new(),
        }
    }

    /// Load user dictionaries from `|`- or `;`-joined paths.
    pub fn load_user_dict(&mut self, paths: &str) -> Result<(), Error> {
        for path in paths.split(['|', ';']).filter(|p| !p.is_empty()) {
            let file = File::open(path).map_err(|e| Error::io(path, e))?;
            for (lineno, line) in BufReader::new(file).lines().enumerate() {
                let line = line.map_err(|e| Error::io(path, e))?;
                if line.is_empty() {
                    continue;
                }
                self.load_user_line(&line).ok_or_else(|| Error::MalformedDict {
                    path: path.into(),
                    lineno,
                    line: line.clone(),
                })?;
            }
        }
        Ok(())
    }

    /// Load user entries from an explicit line container.
    pub fn load_user_lines<'a>(&mut self, lines: impl IntoIterator<Item = &'a str>) {
        for line in lines {
            if line.is_empty() {
                continue;
            }
            if self.load_user_line(line).is_none() {
                tracing::error!(line, "skipping malformed user dict line");
            }
        }
    }

    /// One user-dict line: `word`, `word tag`, or `word freq tag`.
    /// Single-rune words are remembered for the mix segmenter.
    fn load_user_line(&mut self, line: &str) -> Option<()> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (word, weight, tag) = match fields.as_slice() {
            [word] => (*word, self.user_weight, UNKNOWN_TAG),
            [word, tag] => (*word, self.user_weight, *tag),
            [word, freq, tag] => {
                let freq: u64 = freq.parse().ok()?;
                (*word, self.weight_for_freq(freq), *tag)
            }
            _ => return None,
        };
        let runes = decode_unicode(word.as_bytes()).ok()?;
        if runes.len() == 1 {
            self.user_single_rune.insert(runes[0]);
        }
        self.push_entry(runes, weight, tag);
        Some(())
    }

    fn weight_for_freq(&self, freq: u64) -> f64 {
        if freq > 0 {
            (freq as f64 / self.freq_sum).ln()
        } else {
            self.user_weight
        }
    }

    fn push_entry(&mut self, runes: Vec<Rune>, weight: f64, tag: &str) {
        let idx = self.entries.len();
        self.trie.insert(&runes, idx);
        self.entries.push(DictEntry {
            word: runes,
            weight,
            tag: tag.to_string(),
        });
    }

    /// Insert a word at runtime. `freq` of `None` (or 0) uses the policy
    /// default weight. Returns false when the word does not decode.
    pub fn insert_user_word(&mut self, word: &str, freq: Option<u64>, tag: &str) -> bool {
        let runes = match decode_unicode(word.as_bytes()) {
            Ok(runes) if !runes.is_empty() => runes,
            _ => {
                tracing::error!(word, "decode failed");
                return false;
            }
        };
        let weight = match freq {
            Some(f) => self.weight_for_freq(f),
            None => self.user_weight,
        };
        self.push_entry(runes, weight, tag);
        true
    }

    /// Remove the leaf for `word`. Arena entries stay (append-only store).
    pub fn delete_user_word(&mut self, word: &str) -> bool {
        match decode_unicode(word.as_bytes()) {
            Ok(runes) => self.trie.delete(&runes),
            Err(_) => {
                tracing::error!(word, "decode failed");
                false
            }
        }
    }

    /// Exact lookup over a rune window.
    pub fn find(&self, window: &[RuneStr]) -> Option<&DictEntry> {
        self.trie
            .find(window.iter().map(|r| r.rune))
            .map(|idx| &self.entries[idx])
    }

    /// Exact lookup by string.
    pub fn find_word(&self, word: &str) -> bool {
        match crate::unicode::decode_runes(word.as_bytes()) {
            Ok(runes) => self.find(&runes).is_some(),
            Err(_) => {
                tracing::error!(word, "decode failed");
                false
            }
        }
    }

    /// Build the segmentation DAG for a rune window.
    pub fn dag(&self, window: &[RuneStr], max_word_len: usize) -> Vec<DagNode> {
        self.trie.find_all(window, max_word_len)
    }

    pub fn dag_default(&self, window: &[RuneStr]) -> Vec<DagNode> {
        self.dag(window, MAX_WORD_LENGTH)
    }

    pub fn entry(&self, idx: usize) -> &DictEntry {
        &self.entries[idx]
    }

    /// Fallback weight for runes outside the dictionary during DP.
    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn median_weight(&self) -> f64 {
        self.median_weight
    }

    pub fn is_user_single_rune(&self, rune: Rune) -> bool {
        self.user_single_rune.contains(&rune)
    }
}

/// Parse the base dictionary: exactly `word freq tag` per line, fatal on
/// anything else. Returns entries with `ln(freq/Σfreq)` weights plus the
/// frequency sum.
fn load_base_dict(path: &Path) -> Result<(Vec<DictEntry>, f64), Error> {
    let mut content = String::new();
    File::open(path)
        .and_then(|mut f| f.read_to_string(&mut content))
        .map_err(|e| Error::io(path, e))?;

    let mut raw: Vec<(Vec<Rune>, f64, String)> = Vec::new();
    let mut freq_sum = 0.0f64;
    for (lineno, line) in content.lines().enumerate() {
        let malformed = || Error::MalformedDict {
            path: path.into(),
            lineno,
            line: line.to_string(),
        };
        let fields: Vec<&str> = line.split_whitespace().collect();
        let &[word, freq, tag] = fields.as_slice() else {
            return Err(malformed());
        };
        let freq: f64 = freq.parse().map_err(|_| malformed())?;
        let runes = decode_unicode(word.as_bytes()).map_err(|_| malformed())?;
        freq_sum += freq;
        raw.push((runes, freq, tag.to_string()));
    }

    let entries = raw
        .into_iter()
        .map(|(word, freq, tag)| DictEntry {
            word,
            weight: (freq / freq_sum).ln(),
            tag,
        })
        .collect();
    Ok((entries, freq_sum))
}
