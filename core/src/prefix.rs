//! Byte-string prefix container.
//!
//! A compact map from byte-string keys to `u64` values supporting exact
//! lookup and *all-prefix* enumeration: every key that is a prefix of a
//! query, not only the longest one. Backed by an [`fst`] automaton walked
//! node by node, which gives the same contract a double-array trie would.
//!
//! Two search policies are layered on top:
//! - [`PrefixMap::prefix_search`] returns the longest match length, or 0;
//! - [`PrefixMap::prefix_match`] returns the longest match length, or
//!   consumes exactly one code point when nothing matches.

use fst::raw::{Builder, Fst, Output};

// Byte length of a UTF-8 sequence keyed by the high nibble of its first byte.
const UTF8_BYTE_LEN: [usize; 16] = [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 3, 4];

fn one_char_len(b: u8) -> usize {
    UTF8_BYTE_LEN[(b >> 4) as usize]
}

/// Associative prefix container over byte-string keys.
pub struct PrefixMap {
    fst: Fst<Vec<u8>>,
}

impl PrefixMap {
    /// Build from `(key, value)` pairs. Keys may arrive unsorted; duplicate
    /// keys keep their first value.
    pub fn build<K: AsRef<[u8]>>(entries: impl IntoIterator<Item = (K, u64)>) -> Self {
        let mut pairs: Vec<(Vec<u8>, u64)> = entries
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_vec(), v))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs.dedup_by(|a, b| a.0 == b.0);

        let mut builder = Builder::memory();
        for (key, value) in &pairs {
            // Keys are sorted and unique, so insert cannot fail.
            builder
                .insert(key, *value)
                .expect("sorted unique keys build an fst");
        }
        let fst = builder.into_fst();
        Self { fst }
    }

    /// Exact key lookup.
    pub fn exact_lookup(&self, key: &[u8]) -> Option<u64> {
        self.fst.get(key).map(|out| out.value())
    }

    /// Enumerate every key that is a prefix of `query`, as
    /// `(match_byte_length, value)` pairs in ascending length order.
    pub fn common_prefix_search(&self, query: &[u8]) -> Vec<(usize, u64)> {
        let mut node = self.fst.root();
        let mut out = Output::zero();
        let mut matches = Vec::new();
        for (i, &b) in query.iter().enumerate() {
            match node.find_input(b) {
                Some(t) => {
                    let tr = node.transition(t);
                    out = out.cat(tr.out);
                    node = self.fst.node(tr.addr);
                    if node.is_final() {
                        matches.push((i + 1, out.cat(node.final_output()).value()));
                    }
                }
                None => break,
            }
        }
        matches
    }

    /// Longest prefix of `query` present in the map; 0 if none.
    ///
    /// On a hit, `val` (when given) receives the value of the longest match.
    pub fn prefix_search(&self, query: &[u8], val: Option<&mut u64>) -> usize {
        let mut mblen = 0;
        let mut best = 0u64;
        for (len, value) in self.common_prefix_search(query) {
            if len > mblen {
                mblen = len;
                best = value;
            }
        }
        if mblen > 0 {
            if let Some(v) = val {
                *v = best;
            }
        }
        mblen
    }

    /// Longest prefix of `query` present in the map; consumes one code point
    /// when nothing matches. Returns `(byte_len, found)`.
    pub fn prefix_match(&self, query: &[u8]) -> (usize, bool) {
        if query.is_empty() {
            return (0, false);
        }
        let matches = self.common_prefix_search(query);
        if matches.is_empty() {
            return (query.len().min(one_char_len(query[0])), false);
        }
        let mblen = matches.iter().map(|&(len, _)| len).max().unwrap_or(0);
        (mblen, true)
    }
}
