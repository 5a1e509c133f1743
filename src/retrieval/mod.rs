pub mod lexical;

use crate::types::{Query, Record};

pub use lexical::{tokenize, LexicalOverlapRetriever};

/// Ranks candidate records against a query.
///
/// Implementations must be pure: the output depends only on `candidates`,
/// `query` and `k`. The result holds at most `min(k, candidates.len())`
/// records, best first; `k == 0` yields an empty result.
pub trait Retriever: Send + Sync {
    fn topk(&self, candidates: Vec<Record>, query: &Query, k: usize) -> Vec<Record>;
}

impl<R: Retriever + ?Sized> Retriever for Box<R> {
    fn topk(&self, candidates: Vec<Record>, query: &Query, k: usize) -> Vec<Record> {
        (**self).topk(candidates, query, k)
    }
}
