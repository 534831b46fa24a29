//! Longest-matching-blocks similarity.
//!
//! [`SequenceMatcher`] finds the longest contiguous block shared by two
//! sequences, then recurses into the unmatched gaps on either side of it.
//! The ratio is `2·M / (len_a + len_b)` where `M` is the total matched length.
//!
//! Two heuristics are kept so scores line up with the well-known
//! `difflib`-style ratio:
//!
//! * ties are broken leftmost in `a`, then leftmost in `b`;
//! * "autojunk": when `b` has at least 200 elements, elements occurring more
//!   than `len_b / 100 + 1` times in `b` never seed a match (they may still
//!   extend one).
//!
//! The raw matcher is order-sensitive. [`similarity`] evaluates a pair in a
//! canonical order so `similarity(a, b) == similarity(b, a)`.

use std::collections::HashMap;
use std::hash::Hash;

use crate::api::Score;

/// `b` length from which popular elements are ignored as match seeds.
const AUTOJUNK_MIN_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

pub struct SequenceMatcher<'s, T: Eq + Hash> {
    a: &'s [T],
    b: &'s [T],
    /// Element of `b` → ascending indices where it occurs (popular ones removed).
    b2j: HashMap<&'s T, Vec<usize>>,
}

impl<'s, T: Eq + Hash> SequenceMatcher<'s, T> {
    pub fn new(a: &'s [T], b: &'s [T]) -> Self {
        Self::with_autojunk(a, b, true)
    }

    pub fn with_autojunk(a: &'s [T], b: &'s [T], autojunk: bool) -> Self {
        let mut b2j: HashMap<&T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(elt).or_default().push(j);
        }
        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let ntest = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= ntest);
        }
        Self { a, b, b2j }
    }

    /// Longest block with `alo <= i < ahi` and `blo <= j < bhi`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`. Returns a zero-size match at `(alo, blo)` if nothing
    /// matches.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        let (a, b) = (self.a, self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0);

        // j2len[j] = length of the match ending at a[i - 1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        let mut newj2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            if let Some(indices) = self.b2j.get(&a[i]) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = match j.checked_sub(1) {
                        Some(pj) => j2len.get(&pj).copied().unwrap_or(0),
                        None => 0,
                    };
                    let k = prev + 1;
                    newj2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            std::mem::swap(&mut j2len, &mut newj2len);
            newj2len.clear();
        }

        // Grow over neighbours that were not allowed to seed (popular elements).
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        Match { a: besti, b: bestj, size: bestsize }
    }

    /// Non-overlapping matching blocks in ascending order, adjacent blocks
    /// merged, terminated by the sentinel `(len_a, len_b, 0)`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());
        let mut queue = vec![(0, la, 0, lb)];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let m = self.find_longest_match(alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                queue.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }
        blocks.sort_by_key(|m| (m.a, m.b, m.size));

        let mut collapsed: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            match collapsed.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => collapsed.push(m),
            }
        }
        collapsed.push(Match { a: la, b: lb, size: 0 });
        collapsed
    }

    /// `2·M / (len_a + len_b)`; two empty sequences are identical (`1.0`).
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        let matched: usize = self.matching_blocks().iter().map(|m| m.size).sum();
        2.0 * matched as f64 / total as f64
    }
}

/// Symmetric similarity percentage of two texts, compared as raw characters.
///
/// The pair is always evaluated with the shorter text first (content breaks
/// length ties), so swapping the arguments never changes the score.
pub fn similarity(a: &str, b: &str, autojunk: bool) -> Score {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (first, second) = if (a.len(), &a) <= (b.len(), &b) { (&a, &b) } else { (&b, &a) };
    Score::from_ratio(SequenceMatcher::with_autojunk(first, second, autojunk).ratio())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_find_longest_match_prefers_earliest() {
        let a = chars(" abcd");
        let b = chars("abcd abcd");
        let sm = SequenceMatcher::new(&a, &b);
        assert_eq!(sm.find_longest_match(0, 5, 0, 9), Match { a: 0, b: 4, size: 5 });
    }

    #[test]
    fn test_matching_blocks_with_gap() {
        let a = chars("abxcd");
        let b = chars("abcd");
        let sm = SequenceMatcher::new(&a, &b);
        assert_eq!(
            sm.matching_blocks(),
            vec![
                Match { a: 0, b: 0, size: 2 },
                Match { a: 3, b: 2, size: 2 },
                Match { a: 5, b: 4, size: 0 },
            ]
        );
        assert!((sm.ratio() - 8.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_basic() {
        let (a, b) = (chars("abcd"), chars("bcde"));
        assert_eq!(SequenceMatcher::new(&a, &b).ratio(), 0.75);
        let (a, b) = (chars("abc"), chars("xyz"));
        assert_eq!(SequenceMatcher::new(&a, &b).ratio(), 0.0);
        let empty: Vec<char> = Vec::new();
        assert_eq!(SequenceMatcher::new(&empty, &empty).ratio(), 1.0);
        assert_eq!(SequenceMatcher::new(&empty, &a).ratio(), 0.0);
    }

    #[test]
    fn test_raw_matcher_is_order_sensitive() {
        let (tide, diet) = (chars("tide"), chars("diet"));
        assert_eq!(SequenceMatcher::new(&tide, &diet).ratio(), 0.25);
        assert_eq!(SequenceMatcher::new(&diet, &tide).ratio(), 0.5);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        assert_eq!(similarity("tide", "diet", true), similarity("diet", "tide", true));
        assert_eq!(similarity("tide", "diet", true).value(), 50.0);

        let a = "int main() { return 0; }\n";
        let b = "int main(void) {\n    return 1;\n}\n";
        assert_eq!(similarity(a, b, true), similarity(b, a, true));
    }

    #[test]
    fn test_similarity_boundaries() {
        assert_eq!(similarity("", "", true).value(), 100.0);
        assert_eq!(similarity("abc", "", true).value(), 0.0);
        assert_eq!(similarity("abc", "xyz", true).value(), 0.0);
        assert_eq!(similarity("same text", "same text", true).value(), 100.0);
    }

    #[test]
    fn test_autojunk_ignores_popular_seeds() {
        let long = "ab".repeat(100);
        // Both characters are popular in the 200-char text, so nothing can seed a match.
        assert_eq!(similarity("xab", &long, true).value(), 0.0);
        // Without the heuristic "ab" matches once: 2·2 / 203.
        assert_eq!(similarity("xab", &long, false).value(), 1.97);
    }

    #[test]
    fn test_identical_long_text_survives_autojunk() {
        let text = "    printf(\"%d\\n\", x);\n".repeat(40);
        assert!(text.chars().count() >= AUTOJUNK_MIN_LEN);
        assert_eq!(similarity(&text, &text, true).value(), 100.0);
    }

    #[test]
    fn test_unicode_compared_per_char() {
        assert_eq!(similarity("héllo", "héllo", true).value(), 100.0);
        // "hé" + "o" out of 5 + 4 chars
        assert_eq!(similarity("héllo", "héxo", true).value(), Score::from_ratio(6.0 / 9.0).value());
    }
}
