//! TextRank keyword extraction.
//!
//! Retained tokens (no single runes, no stop words) vote for each other
//! inside a sliding window: each co-occurrence adds symmetric edge weight
//! in an undirected graph. PageRank with damping 0.85 then scores the
//! nodes. Skipped tokens widen the window so nearby content words still
//! see each other across stop words.
//!
//! Graph and score maps are ordered (`BTreeMap`), keeping the in-place
//! PageRank update sequence and the final tie order deterministic.

use std::collections::BTreeMap;

use crate::dict::DictTrie;
use crate::hmm::HmmModel;
use crate::keyword::{Keyword, StopWords};
use crate::mix_seg::MixSegment;
use crate::pre_filter::Separators;
use crate::tagger::Segment;
use crate::unicode::is_single_word;

/// Damping factor for the PageRank iteration.
const DAMPING: f64 = 0.85;

/// Default co-occurrence window, in retained tokens.
pub const DEFAULT_SPAN: usize = 5;

/// Default number of PageRank iterations.
pub const DEFAULT_RANK_ITERS: usize = 10;

#[derive(Default)]
struct WordGraph {
    edges: BTreeMap<String, BTreeMap<String, f64>>,
}

impl WordGraph {
    fn add_edge(&mut self, a: &str, b: &str, weight: f64) {
        *self
            .edges
            .entry(a.to_string())
            .or_default()
            .entry(b.to_string())
            .or_insert(0.0) += weight;
        *self
            .edges
            .entry(b.to_string())
            .or_default()
            .entry(a.to_string())
            .or_insert(0.0) += weight;
    }

    /// Iterate PageRank, writing scores into `words`, then rescale so the
    /// best node lands on 1.0.
    fn rank(&self, words: &mut BTreeMap<String, Keyword>, rank_iters: usize) {
        if self.edges.is_empty() {
            return;
        }
        let initial = 1.0 / self.edges.len() as f64;
        let mut out_sum: BTreeMap<&str, f64> = BTreeMap::new();
        for (node, edges) in &self.edges {
            words
                .entry(node.clone())
                .or_insert_with(|| Keyword {
                    word: node.clone(),
                    offsets: Vec::new(),
                    weight: 0.0,
                })
                .weight = initial;
            out_sum.insert(node, edges.values().sum());
        }

        for _ in 0..rank_iters {
            for (node, edges) in &self.edges {
                let mut s = 0.0;
                for (neighbor, weight) in edges {
                    s += weight / out_sum[neighbor.as_str()] * words[neighbor].weight;
                }
                words.get_mut(node).expect("graph nodes are registered").weight =
                    (1.0 - DAMPING) + DAMPING * s;
            }
        }

        let mut min_rank = f64::MAX;
        let mut max_rank = f64::MIN;
        for kw in words.values() {
            min_rank = min_rank.min(kw.weight);
            max_rank = max_rank.max(kw.weight);
        }
        for kw in words.values_mut() {
            kw.weight = (kw.weight - min_rank / 10.0) / (max_rank - min_rank / 10.0);
        }
    }
}

pub struct TextRankExtractor<'a> {
    seg: MixSegment<'a>,
    stop_words: &'a StopWords,
}

impl<'a> TextRankExtractor<'a> {
    pub fn new(dict: &'a DictTrie, model: &'a HmmModel, stop_words: &'a StopWords) -> Self {
        Self {
            seg: MixSegment::new(dict, model),
            stop_words,
        }
    }

    pub fn with_separators(mut self, seps: Separators) -> Self {
        self.seg = self.seg.with_separators(seps);
        self
    }

    pub fn extract(&self, sentence: &str, top_n: usize) -> Vec<Keyword> {
        self.extract_with(sentence, top_n, DEFAULT_SPAN, DEFAULT_RANK_ITERS)
    }

    pub fn extract_with(
        &self,
        sentence: &str,
        top_n: usize,
        span: usize,
        rank_iters: usize,
    ) -> Vec<Keyword> {
        let words = self.seg.cut(sentence);

        let mut graph = WordGraph::default();
        let mut word_map: BTreeMap<String, Keyword> = BTreeMap::new();
        let mut offset = 0usize;
        for i in 0..words.len() {
            let begin = offset;
            offset += words[i].text.len();
            if is_single_word(&words[i].text) || self.stop_words.contains(&words[i].text) {
                continue;
            }
            // Filtered tokens inside the window extend it, so content words
            // co-occur across stop words.
            let mut skip = 0usize;
            let mut j = i + 1;
            while j < i + span + skip && j < words.len() {
                if is_single_word(&words[j].text) || self.stop_words.contains(&words[j].text) {
                    skip += 1;
                    j += 1;
                    continue;
                }
                graph.add_edge(&words[i].text, &words[j].text, 1.0);
                j += 1;
            }
            word_map
                .entry(words[i].text.clone())
                .or_insert_with(|| Keyword {
                    word: words[i].text.clone(),
                    offsets: Vec::new(),
                    weight: 0.0,
                })
                .offsets
                .push(begin);
        }
        if offset != sentence.len() {
            tracing::error!(sentence, "tokenization does not cover the input");
            return Vec::new();
        }

        graph.rank(&mut word_map, rank_iters);

        let mut keywords: Vec<Keyword> = word_map.into_values().collect();
        keywords.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        keywords.truncate(top_n);
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::UserWordWeight;
    use crate::testutil::{write_temp, TOY_MODEL};
    use crate::DictTrie;

    const DICT: &str = "\
你好 100 l
世界 80 n
而且 120 c
巅峰 30 n
人生 60 n
走上 40 v
";

    fn fixtures() -> (DictTrie, HmmModel, StopWords) {
        let dict_path = write_temp("libsegment_tr_dict.utf8", DICT);
        let model_path = write_temp("libsegment_tr_model.utf8", TOY_MODEL);
        let stop_path = write_temp("libsegment_tr_stop.utf8", "而且\n的\n");
        (
            DictTrie::from_files(&dict_path, None, UserWordWeight::Median).unwrap(),
            HmmModel::from_file(&model_path).unwrap(),
            StopWords::from_file(&stop_path).unwrap(),
        )
    }

    #[test]
    fn scores_rescale_to_unit_max() {
        let (dict, model, stop) = fixtures();
        let ex = TextRankExtractor::new(&dict, &model, &stop);
        let kws = ex.extract("你好世界世界而且而且", 5);
        assert_eq!(kws.len(), 2);
        assert_eq!(kws[0].word, "世界");
        assert!((kws[0].weight - 1.0).abs() < 1e-9);
        assert!(kws[1].weight > 0.0 && kws[1].weight < 1.0);
        assert_eq!(kws[0].offsets, vec![6, 12]);
        assert_eq!(kws[1].offsets, vec![0]);
    }

    #[test]
    fn stop_words_extend_the_window() {
        let (dict, model, stop) = fixtures();
        let ex = TextRankExtractor::new(&dict, &model, &stop);
        // With span 2, 走上 could never reach 人生 five positions away,
        // but the four skipped stop words extend the window far enough.
        let kws = ex.extract_with("走上而且而且而且而且人生巅峰", 5, 2, 10);
        let words: Vec<&str> = kws.iter().map(|k| k.word.as_str()).collect();
        assert!(words.contains(&"走上"));
        assert!(words.contains(&"巅峰"));
        assert!(words.contains(&"人生"));
    }

    #[test]
    fn isolated_words_score_zero_side_of_scale() {
        let (dict, model, stop) = fixtures();
        let ex = TextRankExtractor::new(&dict, &model, &stop);
        // A single retained token builds no edges: the graph is empty and
        // the word keeps weight 0.
        let kws = ex.extract("你好", 5);
        assert_eq!(kws.len(), 1);
        assert_eq!(kws[0].word, "你好");
        assert_eq!(kws[0].weight, 0.0);
    }
}
