use retention_core::retrieval::{tokenize, LexicalOverlapRetriever, Retriever};
use retention_core::{Query, Record};

fn make_record(id: &str, text: &str, created_at: i64) -> Record {
    Record::new(id, text).with_created_at(created_at)
}

fn ids(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

fn corpus() -> Vec<Record> {
    vec![
        make_record("cats", "Cats are small animals that like to nap.", 1),
        make_record("dogs", "Dogs are loyal animals and like to play fetch.", 2),
        make_record("graph", "Graph databases store nodes and edges.", 3),
        make_record("vector", "Vector databases enable similarity search.", 4),
    ]
}

#[test]
fn tokenize_lowercases_and_splits_on_non_word_chars() {
    let tokens = tokenize("Hello, WORLD! snake_case x2 -- hello");
    let expected: Vec<&str> = vec!["hello", "snake_case", "world", "x2"];

    assert_eq!(tokens.iter().map(String::as_str).collect::<Vec<_>>(), expected);
}

#[test]
fn tokenize_treats_non_ascii_as_separator() {
    let tokens = tokenize("café au lait");
    assert!(tokens.contains("caf"));
    assert!(tokens.contains("au"));
    assert!(!tokens.contains("café"));
}

#[test]
fn ranks_by_distinct_overlap() {
    let query = Query::new("q", "animals that nap nap nap");
    let hits = LexicalOverlapRetriever.topk(corpus(), &query, 2);

    assert_eq!(ids(&hits), vec!["cats", "dogs"]);
}

#[test]
fn ties_break_newest_then_id_descending() {
    let records = vec![
        make_record("a", "shared word", 5),
        make_record("b", "shared word", 5),
        make_record("c", "shared word", 9),
        make_record("d", "unrelated", 100),
    ];
    let query = Query::new("q", "shared");

    let hits = LexicalOverlapRetriever.topk(records, &query, 4);

    assert_eq!(ids(&hits), vec!["c", "b", "a", "d"]);
}

#[test]
fn zero_score_candidates_still_fill_k() {
    let query = Query::new("q", "databases");
    let hits = LexicalOverlapRetriever.topk(corpus(), &query, 4);

    assert_eq!(ids(&hits), vec!["vector", "graph", "dogs", "cats"]);
}

#[test]
fn empty_token_query_returns_newest() {
    let query = Query::new("q", "?!... --- ,,,");
    let hits = LexicalOverlapRetriever.topk(corpus(), &query, 3);

    assert_eq!(ids(&hits), vec!["vector", "graph", "dogs"]);
}

#[test]
fn empty_token_query_breaks_ties_by_id() {
    let records = vec![
        make_record("a", "x", 7),
        make_record("c", "y", 7),
        make_record("b", "z", 7),
    ];
    let hits = LexicalOverlapRetriever.topk(records, &Query::new("q", ""), 3);

    assert_eq!(ids(&hits), vec!["c", "b", "a"]);
}

#[test]
fn k_zero_is_empty() {
    let hits = LexicalOverlapRetriever.topk(corpus(), &Query::new("q", "animals"), 0);
    assert!(hits.is_empty());

    let hits = LexicalOverlapRetriever.topk(corpus(), &Query::new("q", "!!!"), 0);
    assert!(hits.is_empty());
}

#[test]
fn k_larger_than_candidates_returns_all() {
    let hits = LexicalOverlapRetriever.topk(corpus(), &Query::new("q", "animals"), 50);
    assert_eq!(hits.len(), 4);

    let hits = LexicalOverlapRetriever.topk(Vec::new(), &Query::new("q", "animals"), 5);
    assert!(hits.is_empty());
}

#[test]
fn ranking_is_independent_of_input_order() {
    let query = Query::new("q", "animals like databases");
    let forward = LexicalOverlapRetriever.topk(corpus(), &query, 4);

    let mut reversed = corpus();
    reversed.reverse();
    let backward = LexicalOverlapRetriever.topk(reversed, &query, 4);

    assert_eq!(ids(&forward), ids(&backward));
}

#[test]
fn query_embedding_does_not_affect_lexical_ranking() {
    let plain = Query::new("q", "databases").at(10);
    let embedded = plain.clone().with_embedding(vec![1.0, 0.0, -1.0]);
    assert_eq!(embedded.embedding.as_deref(), Some(&[1.0, 0.0, -1.0][..]));

    let a = LexicalOverlapRetriever.topk(corpus(), &plain, 4);
    let b = LexicalOverlapRetriever.topk(corpus(), &embedded, 4);
    assert_eq!(ids(&a), ids(&b));
}
