//! §4.6 search: prefix match first, then substring, then fuzzy fill —
//! diacritic-folded and tokenized so "Vinh Tuy" matches "Vĩnh Tuy".

use strsim::{jaro_winkler, normalized_levenshtein};
use weathergraph_common::text::{fold_diacritics, tokenize};

use crate::model::{AddressEntry, AddressMatch};

/// Fuzzy matches below this score (0-100) are not offered at all. Tunable,
/// not a guaranteed contract.
const FUZZY_THRESHOLD: f64 = 60.0;

pub struct AddressIndex {
    entries: Vec<AddressEntry>,
    /// Folded, tokenized form of each entry's address text, kept alongside
    /// the entry for prefix/substring/fuzzy matching.
    folded: Vec<String>,
    tokens: Vec<Vec<String>>,
}

impl AddressIndex {
    pub fn build(entries: Vec<AddressEntry>) -> Self {
        let folded: Vec<String> = entries.iter().map(|e| fold_diacritics(&e.address_text)).collect();
        let tokens: Vec<Vec<String>> = folded.iter().map(|f| tokenize(f)).collect();
        Self { entries, folded, tokens }
    }

    pub fn entry(&self, index: usize) -> &AddressEntry {
        &self.entries[index]
    }

    /// The raw entries this index was built from, for re-serializing a
    /// snapshot without re-running extraction.
    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the full query pipeline: prefix, then substring, then fuzzy
    /// fill, until `limit` results are collected.
    pub fn search(&self, query: &str, limit: usize) -> Vec<AddressMatch> {
        let folded_query = fold_diacritics(query);
        let query_tokens = tokenize(&folded_query);
        if query_tokens.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut seen = vec![false; self.entries.len()];
        let mut results = Vec::new();

        self.collect_prefix(&query_tokens, &mut seen, &mut results, limit);
        if results.is_empty() {
            self.collect_substring(&folded_query, &mut seen, &mut results, limit);
        }
        if results.len() < limit {
            self.collect_fuzzy(&folded_query, &mut seen, &mut results, limit);
        }

        results.truncate(limit);
        results
    }

    fn collect_prefix(&self, query_tokens: &[String], seen: &mut [bool], out: &mut Vec<AddressMatch>, limit: usize) {
        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (i, entry_tokens) in self.tokens.iter().enumerate() {
            let matched = query_tokens
                .iter()
                .all(|qt| entry_tokens.iter().any(|et| et.starts_with(qt.as_str())));
            if matched {
                let relevance = query_tokens.len() as f64 / entry_tokens.len().max(1) as f64;
                scored.push((i, relevance));
            }
        }
        scored.sort_by(|a, b| {
            let tier_a = self.entries[a.0].kind.rank_tier();
            let tier_b = self.entries[b.0].kind.rank_tier();
            tier_b.cmp(&tier_a).then(b.1.partial_cmp(&a.1).unwrap())
        });
        for (i, relevance) in scored {
            if out.len() >= limit {
                break;
            }
            let tier = self.entries[i].kind.rank_tier() as f64;
            let score = (tier * 0.6 + relevance.min(1.0) * 40.0).min(100.0);
            seen[i] = true;
            out.push(AddressMatch { entry_index: i, score });
        }
    }

    fn collect_substring(&self, folded_query: &str, seen: &mut [bool], out: &mut Vec<AddressMatch>, limit: usize) {
        let mut scored: Vec<(usize, u8)> = self
            .folded
            .iter()
            .enumerate()
            .filter(|(i, text)| !seen[*i] && text.contains(folded_query))
            .map(|(i, _)| (i, self.entries[i].kind.rank_tier()))
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        for (i, tier) in scored {
            if out.len() >= limit {
                break;
            }
            seen[i] = true;
            out.push(AddressMatch { entry_index: i, score: (tier as f64 * 0.7).min(100.0) });
        }
    }

    fn collect_fuzzy(&self, folded_query: &str, seen: &mut [bool], out: &mut Vec<AddressMatch>, limit: usize) {
        let mut scored: Vec<(usize, f64)> = self
            .folded
            .iter()
            .enumerate()
            .filter(|(i, _)| !seen[*i])
            .map(|(i, text)| (i, fuzzy_score(folded_query, text)))
            .filter(|&(_, score)| score >= FUZZY_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
        for (i, score) in scored {
            if out.len() >= limit {
                break;
            }
            seen[i] = true;
            out.push(AddressMatch { entry_index: i, score });
        }
    }
}

/// 70% Jaro-Winkler, 30% normalized Levenshtein similarity, on a 0-100
/// scale — the same blend used elsewhere in this toolkit for fuzzy region
/// matching.
fn fuzzy_score(a: &str, b: &str) -> f64 {
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);
    (jw * 0.7 + lev * 0.3) * 100.0
}
