//! Rune-keyed dictionary trie.
//!
//! Edges are single runes; a node that ends a dictionary word carries the
//! *index* of its entry in the owning arena (see [`crate::dict::DictTrie`]),
//! so nodes never hold pointers into relocatable storage. The trie also
//! builds the per-position candidate lists (the segmentation DAG) used by
//! the maximum-probability segmenter.

use ahash::AHashMap;

use crate::unicode::{Rune, RuneStr};

#[derive(Debug, Default)]
struct TrieNode {
    children: AHashMap<Rune, TrieNode>,
    /// Arena index of the entry this path spells, if any.
    entry: Option<usize>,
}

/// Candidate list for one DAG position.
///
/// `nexts` holds `(end_index, entry_index)` pairs: a candidate token spans
/// runes `[i, end_index]` of the window, resolved by the arena entry when
/// present. The identity candidate `(i, ...)` always comes first; further
/// pairs are in ascending `end_index` order.
#[derive(Debug, Default, Clone)]
pub struct DagNode {
    pub nexts: Vec<(usize, Option<usize>)>,
}

#[derive(Debug, Default)]
pub struct Trie {
    root: TrieNode,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `word` to an arena index, creating nodes as needed.
    pub fn insert(&mut self, word: &[Rune], entry: usize) {
        if word.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for &r in word {
            node = node.children.entry(r).or_default();
        }
        node.entry = Some(entry);
    }

    /// Unlink the leaf for `word`. The path's nodes stay in place.
    ///
    /// Returns true if an entry was removed.
    pub fn delete(&mut self, word: &[Rune]) -> bool {
        let mut node = &mut self.root;
        for &r in word {
            match node.children.get_mut(&r) {
                Some(child) => node = child,
                None => return false,
            }
        }
        node.entry.take().is_some()
    }

    /// Exact lookup: the arena index at the end of `word`'s path.
    pub fn find(&self, word: impl IntoIterator<Item = Rune>) -> Option<usize> {
        let mut node = &self.root;
        let mut seen = false;
        for r in word {
            seen = true;
            node = node.children.get(&r)?;
        }
        if seen { node.entry } else { None }
    }

    /// Build the DAG for a rune window.
    ///
    /// Position `i` always gets its identity candidate `(i, entry?)` where
    /// the entry is resolved when the single rune itself is a dictionary
    /// word. Longer matches are walked until `max_word_len` runes, a missing
    /// edge, or the window end; every entry-bearing node on the way appends
    /// a candidate. `max_word_len == 0` therefore degenerates to per-rune
    /// segmentation.
    pub fn find_all(&self, window: &[RuneStr], max_word_len: usize) -> Vec<DagNode> {
        let n = window.len();
        let mut dags: Vec<DagNode> = vec![DagNode::default(); n];
        for i in 0..n {
            let mut node = self.root.children.get(&window[i].rune);
            dags[i]
                .nexts
                .push((i, node.and_then(|nd| nd.entry)));
            let mut j = i + 1;
            while j < n && (j - i + 1) <= max_word_len {
                let Some(parent) = node else { break };
                let Some(child) = parent.children.get(&window[j].rune) else {
                    break;
                };
                if let Some(entry) = child.entry {
                    dags[i].nexts.push((j, Some(entry)));
                }
                node = Some(child);
                j += 1;
            }
        }
        dags
    }
}
