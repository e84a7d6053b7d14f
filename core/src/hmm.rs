//! Four-state character-tagging HMM and its Viterbi decoder.
//!
//! States are B (word begin), E (end), M (middle), S (single). The model
//! file carries start log-probs, the 4x4 transition matrix, and one
//! emission map per state as `rune:logprob` pairs; blank lines and `#`
//! comments are skipped.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ahash::AHashMap;

use crate::error::Error;
use crate::unicode::{decode_unicode, Rune, RuneStr};
use crate::MIN_DOUBLE;

pub const STATUS_SUM: usize = 4;

pub struct HmmModel {
    start: [f64; STATUS_SUM],
    trans: [[f64; STATUS_SUM]; STATUS_SUM],
    emit: [AHashMap<Rune, f64>; STATUS_SUM],
}

impl HmmModel {
    pub const B: usize = 0;
    pub const E: usize = 1;
    pub const M: usize = 2;
    pub const S: usize = 3;

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut content = String::new();
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut content))
            .map_err(|e| Error::io(path, e))?;
        Self::from_str_content(&content)
    }

    fn from_str_content(content: &str) -> Result<Self, Error> {
        let mut lines = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'));
        let mut next_line = |section: &str| {
            lines
                .next()
                .ok_or_else(|| Error::MalformedModel(format!("missing {section}")))
        };

        let start = parse_row(next_line("start probabilities")?)?;
        let mut trans = [[0.0; STATUS_SUM]; STATUS_SUM];
        for row in trans.iter_mut() {
            *row = parse_row(next_line("transition row")?)?;
        }
        let mut emit: [AHashMap<Rune, f64>; STATUS_SUM] = Default::default();
        for map in emit.iter_mut() {
            *map = parse_emit(next_line("emission map")?)?;
        }
        Ok(Self { start, trans, emit })
    }

    fn emit_prob(&self, state: usize, rune: Rune) -> f64 {
        self.emit[state].get(&rune).copied().unwrap_or(MIN_DOUBLE)
    }

    /// Viterbi decode: the most likely tag per rune.
    ///
    /// The terminal state is restricted to E or S: a word cannot stay open
    /// at the end of the window (ties go to E).
    pub fn viterbi(&self, window: &[RuneStr]) -> Vec<usize> {
        let n = window.len();
        if n == 0 {
            return Vec::new();
        }
        let mut weight = vec![[0.0f64; STATUS_SUM]; n];
        let mut path = vec![[0usize; STATUS_SUM]; n];
        for s in 0..STATUS_SUM {
            weight[0][s] = self.start[s] + self.emit_prob(s, window[0].rune);
        }
        for t in 1..n {
            for s in 0..STATUS_SUM {
                let mut best = f64::NEG_INFINITY;
                let mut prev = 0;
                for k in 0..STATUS_SUM {
                    let v = weight[t - 1][k] + self.trans[k][s];
                    if v > best {
                        best = v;
                        prev = k;
                    }
                }
                weight[t][s] = best + self.emit_prob(s, window[t].rune);
                path[t][s] = prev;
            }
        }

        let mut state = if weight[n - 1][Self::E] < weight[n - 1][Self::S] {
            Self::S
        } else {
            Self::E
        };
        let mut tags = vec![0usize; n];
        for t in (0..n).rev() {
            tags[t] = state;
            if t > 0 {
                state = path[t][state];
            }
        }
        tags
    }
}

fn parse_row(line: &str) -> Result<[f64; STATUS_SUM], Error> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() != STATUS_SUM {
        return Err(Error::MalformedModel(format!(
            "expected {STATUS_SUM} probabilities, got {:?}",
            line
        )));
    }
    let mut row = [0.0; STATUS_SUM];
    for (slot, field) in row.iter_mut().zip(fields) {
        *slot = field
            .parse()
            .map_err(|_| Error::MalformedModel(format!("bad probability {field:?}")))?;
    }
    Ok(row)
}

fn parse_emit(line: &str) -> Result<AHashMap<Rune, f64>, Error> {
    let mut map = AHashMap::new();
    for pair in line.split(',') {
        let mut parts = pair.splitn(2, ':');
        let (Some(key), Some(prob)) = (parts.next(), parts.next()) else {
            return Err(Error::MalformedModel(format!("bad emission pair {pair:?}")));
        };
        let runes = decode_unicode(key.as_bytes()).map_err(|_| {
            Error::MalformedModel(format!("emission key {key:?} does not decode"))
        })?;
        if runes.len() != 1 {
            return Err(Error::MalformedModel(format!(
                "emission key {key:?} is not a single rune"
            )));
        }
        let prob: f64 = prob
            .parse()
            .map_err(|_| Error::MalformedModel(format!("bad emission prob {prob:?}")))?;
        map.insert(runes[0], prob);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode::decode_runes;

    use crate::testutil::TOY_MODEL;

    fn toy() -> HmmModel {
        HmmModel::from_str_content(TOY_MODEL).unwrap()
    }

    #[test]
    fn loader_skips_comments_and_blanks() {
        let model = toy();
        assert_eq!(model.start[HmmModel::B], -1.0);
        assert_eq!(model.trans[HmmModel::E][HmmModel::S], -2.0);
        assert_eq!(model.emit[HmmModel::S][&('丙' as Rune)], -1.0);
    }

    #[test]
    fn loader_rejects_truncated_or_bad_content() {
        assert!(matches!(
            HmmModel::from_str_content("-1 -2 -3 -4\n"),
            Err(Error::MalformedModel(_))
        ));
        assert!(matches!(
            HmmModel::from_str_content("-1 -2 -3\n"),
            Err(Error::MalformedModel(_))
        ));
        let bad_pair = TOY_MODEL.replace("甲:-5", "甲-5");
        assert!(matches!(
            HmmModel::from_str_content(&bad_pair),
            Err(Error::MalformedModel(_))
        ));
    }

    #[test]
    fn viterbi_decodes_best_path() {
        let model = toy();
        let runes = decode_runes("甲乙".as_bytes()).unwrap();
        // delta[0] = B:-2 E:-110 M:-110 S:-7; best end at E via B->E.
        assert_eq!(model.viterbi(&runes), vec![HmmModel::B, HmmModel::E]);

        let runes = decode_runes("甲乙丙".as_bytes()).unwrap();
        assert_eq!(
            model.viterbi(&runes),
            vec![HmmModel::B, HmmModel::E, HmmModel::S]
        );
    }

    #[test]
    fn terminal_state_restricted_to_e_or_s() {
        let model = toy();
        // For a lone 甲, B scores best (-2) but is not a legal terminal;
        // the decoder must fall back to S (-7).
        let runes = decode_runes("甲".as_bytes()).unwrap();
        assert_eq!(model.viterbi(&runes), vec![HmmModel::S]);
    }

    #[test]
    fn unknown_runes_use_domain_min() {
        let model = toy();
        let runes = decode_runes("未知".as_bytes()).unwrap();
        // All emissions collapse to the configured minimum; the decode still
        // terminates and yields one tag per rune.
        assert_eq!(model.viterbi(&runes).len(), 2);
    }
}
