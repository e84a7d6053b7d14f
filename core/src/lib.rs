//! libsegment-core
//!
//! Chinese word segmentation and keyword extraction for UTF-8 text: a
//! dictionary trie with DAG enumeration, a maximum-probability segmenter,
//! a four-state HMM for unknown words, the mixed/full/query modes built on
//! top of them, and TF-IDF / TextRank keyword scoring.
//!
//! Public API:
//! - [`Segmentor`] - facade owning dictionary, model and keyword tables
//! - [`DictTrie`] / [`HmmModel`] - the underlying stores, usable directly
//! - [`MpSegment`], [`HmmSegment`], [`MixSegment`], [`FullSegment`],
//!   [`QuerySegment`] - per-mode segmenters borrowing the stores
//! - [`TfIdfExtractor`] / [`TextRankExtractor`] - keyword extraction
//! - [`Config`] - TOML-backed construction settings

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::Error;

pub mod unicode;
pub use unicode::{Rune, RuneStr, Word, WordRange};

pub mod prefix;
pub use prefix::PrefixMap;

pub mod trie;
pub use trie::{DagNode, Trie};

pub mod dict;
pub use dict::{DictEntry, DictTrie, UserWordWeight};

pub mod hmm;
pub use hmm::HmmModel;

pub mod pre_filter;
pub use pre_filter::{PreFilter, Separators};

pub mod tagger;
pub use tagger::{Segment, SegmentTagged};

pub mod mp_seg;
pub use mp_seg::MpSegment;

pub mod hmm_seg;
pub use hmm_seg::HmmSegment;

pub mod mix_seg;
pub use mix_seg::MixSegment;

pub mod full_seg;
pub use full_seg::FullSegment;

pub mod query_seg;
pub use query_seg::QuerySegment;

pub mod keyword;
pub use keyword::{IdfTable, Keyword, StopWords, TfIdfExtractor};

pub mod textrank;
pub use textrank::TextRankExtractor;

pub mod segmentor;
pub use segmentor::Segmentor;

#[cfg(test)]
pub(crate) mod testutil;

/// Longest dictionary word considered while building a DAG, in runes.
pub const MAX_WORD_LENGTH: usize = 512;

/// Domain minimum used for missing emissions and DP initialization.
pub const MIN_DOUBLE: f64 = -3.14e100;

/// Default separator runes: space, tab, newline, U+FF0C, U+3002.
pub const DEFAULT_SEPARATORS: &str = " \t\n，。";

/// Construction settings for [`Segmentor::from_config`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dict_path: PathBuf,
    pub hmm_model_path: PathBuf,
    /// User dictionary paths joined by `|` or `;`.
    pub user_dict_paths: Option<String>,
    pub idf_path: Option<PathBuf>,
    pub stop_words_path: Option<PathBuf>,
    /// Default-weight policy for user words without a frequency.
    pub user_weight_policy: UserWordWeight,
    /// Separator runes used by the pre-filter.
    pub separators: String,
    /// DAG word-length cap in runes.
    pub max_word_len: usize,
    /// TextRank co-occurrence window.
    pub textrank_span: usize,
    /// TextRank PageRank iterations.
    pub textrank_iters: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dict_path: PathBuf::new(),
            hmm_model_path: PathBuf::new(),
            user_dict_paths: None,
            idf_path: None,
            stop_words_path: None,
            user_weight_policy: UserWordWeight::default(),
            separators: DEFAULT_SEPARATORS.to_string(),
            max_word_len: MAX_WORD_LENGTH,
            textrank_span: textrank::DEFAULT_SPAN,
            textrank_iters: textrank::DEFAULT_RANK_ITERS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<std::path::Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("serialize: {e}")))?;
        std::fs::write(path, content).map_err(|e| Error::io(path, e))
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Config(format!("parse: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_toml_round_trip() {
        let mut config = Config::default();
        config.dict_path = "dict.utf8".into();
        config.hmm_model_path = "hmm_model.utf8".into();
        config.user_dict_paths = Some("user.utf8|extra.utf8".to_string());
        config.user_weight_policy = UserWordWeight::Max;

        let toml = toml::to_string_pretty(&config).unwrap();
        let parsed = Config::from_toml_str(&toml).unwrap();
        assert_eq!(parsed.dict_path, config.dict_path);
        assert_eq!(parsed.user_weight_policy, UserWordWeight::Max);
        assert_eq!(parsed.max_word_len, MAX_WORD_LENGTH);
        assert_eq!(parsed.separators, DEFAULT_SEPARATORS);
    }

    #[test]
    fn config_file_round_trip() {
        let path = std::env::temp_dir().join("libsegment_config.toml");
        let mut config = Config::default();
        config.dict_path = "dict.utf8".into();
        config.hmm_model_path = "model.utf8".into();
        config.save_toml(&path).unwrap();
        let loaded = Config::load_toml(&path).unwrap();
        assert_eq!(loaded.dict_path, config.dict_path);
        let _ = std::fs::remove_file(path);
    }
}
