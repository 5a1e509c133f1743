use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::retrieval::Retriever;
use crate::types::{Query, Record};

/// Split text into lowercased `[A-Za-z0-9_]+` words.
/// Every other character, including non-ASCII ones, is a separator.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty())
        .map(|word| word.to_ascii_lowercase())
        .collect()
}

/// Deterministic baseline retriever.
///
/// Score is the number of distinct query words that also occur in the
/// record. Ordering is `(score, created_at, id)` descending, which is total.
/// A query without any words ranks by `(created_at, id)` descending, so the
/// newest records come back instead of nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct LexicalOverlapRetriever;

impl LexicalOverlapRetriever {
    pub fn score(&self, query_terms: &BTreeSet<String>, text: &str) -> usize {
        tokenize(text).intersection(query_terms).count()
    }
}

fn newest_first(a: &Record, b: &Record) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

impl Retriever for LexicalOverlapRetriever {
    fn topk(&self, candidates: Vec<Record>, query: &Query, k: usize) -> Vec<Record> {
        if k == 0 {
            return Vec::new();
        }

        let query_terms = tokenize(&query.text);
        if query_terms.is_empty() {
            let mut newest = candidates;
            newest.sort_by(newest_first);
            newest.truncate(k);
            return newest;
        }

        let mut scored: Vec<(usize, Record)> = candidates
            .into_iter()
            .map(|record| (self.score(&query_terms, &record.text), record))
            .collect();

        // Descending score, then newest, then id descending
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then_with(|| newest_first(a, b))
        });

        debug_assert!(scored.windows(2).all(|w| {
            let (sa, a) = &w[0];
            let (sb, b) = &w[1];
            (sa, a.created_at, &a.id) >= (sb, b.created_at, &b.id)
        }));

        scored.into_iter().take(k).map(|(_, record)| record).collect()
    }
}
