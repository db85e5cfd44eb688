use docdb::{Config, Database, DocId, Document, ErrorKind};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn db() -> Database {
    init_tracing();
    Database::new(Config::no_expiry())
}

fn doc(json: serde_json::Value) -> Document {
    Document::from_json(json).unwrap()
}

fn search_ids(db: &Database, query: &str) -> Vec<DocId> {
    let mut ids: Vec<DocId> = db.search(query).unwrap().into_iter().map(|hit| hit.id).collect();
    ids.sort();
    ids
}

#[test]
fn test_round_trip() {
    let db = db();
    let original = doc(json!({
        "name": "Ada",
        "age": 36,
        "ratio": 0.25,
        "active": false,
        "nothing": null,
        "tags": ["math", {"deep": 1}],
        "address": {"city": "London", "geo": {"lat": 51.5}}
    }));

    let id = db.add(original.clone()).unwrap();
    assert_eq!(db.get(id.as_str()).unwrap(), original);
}

#[test]
fn test_round_trip_of_arbitrary_floats() {
    let db = db();
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    let mut checked = 0;
    while checked < 20_000 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let n = f64::from_bits(state);
        if !n.is_finite() {
            continue;
        }

        let original = Document::new().with_field("x", n);
        let id = db.add(original.clone()).unwrap();
        assert_eq!(db.get(id.as_str()).unwrap(), original, "value {:e}", n);

        // Equality on the indexed text must survive re-verification
        if checked % 1_000 == 0 {
            let hits = db.search(&format!("x:{}", n)).unwrap();
            assert!(hits.iter().any(|hit| hit.id == id), "value {:e}", n);
        }
        checked += 1;
    }
}

#[test]
fn test_null_fields_never_match() {
    let db = db();
    db.add(doc(json!({"a": null, "b": {"c": null}}))).unwrap();

    assert!(db.search("a:null").unwrap().is_empty());
    assert!(db.search("b.c:null").unwrap().is_empty());
    assert!(db.scan("a:null").unwrap().is_empty());
}

#[test]
fn test_ids_are_unique() {
    let db = db();
    let ids: HashSet<DocId> = (0..500)
        .map(|i| db.add(doc(json!({"i": i}))).unwrap())
        .collect();
    assert_eq!(ids.len(), 500);
}

#[test]
fn test_empty_query_returns_nothing() {
    let db = db();
    db.add(doc(json!({"a": 1}))).unwrap();
    assert!(db.search("").unwrap().is_empty());
}

#[test]
fn test_equality_clause() {
    let db = db();
    let x = db.add(doc(json!({"a": {"b": 1}}))).unwrap();

    let hits = db.search("a.b:1").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, x);
    assert_eq!(hits[0].document, doc(json!({"a": {"b": 1}})));
}

#[test]
fn test_relational_clauses() {
    let db = db();
    let id1 = db.add(doc(json!({"a": {"b": 2}}))).unwrap();
    let id2 = db.add(doc(json!({"a": {"b": 1}}))).unwrap();

    assert_eq!(search_ids(&db, "a.b:>1"), vec![id1]);
    assert_eq!(search_ids(&db, "a.b:<2"), vec![id2]);
}

#[test]
fn test_and_semantics() {
    let db = db();
    let id1 = db.add(doc(json!({"x": 1, "y": "hi"}))).unwrap();
    db.add(doc(json!({"x": 1, "y": "bye"}))).unwrap();

    assert_eq!(search_ids(&db, "x:1 y:hi"), vec![id1]);
}

#[test]
fn test_arrays_are_excluded() {
    let db = db();
    db.add(doc(json!({"a": [1, 2, 3]}))).unwrap();

    assert!(db.search("a:1").unwrap().is_empty());
    assert!(db.scan("a:1").unwrap().is_empty());
}

#[test]
fn test_quoted_clause_keeps_interior_spaces() {
    let db = db();
    let id = db.add(doc(json!({" a ": " hello "}))).unwrap();
    db.add(doc(json!({"a": "hello"}))).unwrap();

    assert_eq!(search_ids(&db, "\" a \":\" hello \""), vec![id]);
}

#[test]
fn test_parse_failures() {
    let db = db();
    for query in ["a", "a:", ":1"] {
        let err = db.search(query).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidQuery, "query {:?}", query);
    }
}

#[test]
fn test_unknown_id_is_not_found() {
    let err = db().get("not-a-real-id").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_decimal_and_string_numbers() {
    let db = db();
    let cheap = db.add(doc(json!({"item": {"price": 1.25}}))).unwrap();
    let text = db.add(doc(json!({"item": {"price": "3.5"}}))).unwrap();
    db.add(doc(json!({"item": {"price": "n/a"}}))).unwrap();

    assert_eq!(search_ids(&db, "item.price:<2"), vec![cheap.clone()]);
    assert_eq!(search_ids(&db, "item.price:>2.5"), vec![text]);
    assert_eq!(search_ids(&db, "item.price:1.25"), vec![cheap]);
}

#[test]
fn test_search_matches_scan() {
    let db = db();
    for i in 0..40 {
        db.add(doc(json!({
            "n": i,
            "group": format!("g{}", i % 4),
            "meta": {"even": i % 2 == 0, "label": format!("item {}", i)}
        })))
        .unwrap();
    }

    for query in [
        "n:>30",
        "n:<5 group:g0",
        "meta.even:true group:g2",
        "meta.label:\"item 7\"",
        "group:g9",
        "n:>10 n:<20 meta.even:false",
    ] {
        let mut indexed: Vec<DocId> = db.search(query).unwrap().into_iter().map(|h| h.id).collect();
        let mut scanned: Vec<DocId> = db.scan(query).unwrap().into_iter().map(|h| h.id).collect();
        indexed.sort();
        scanned.sort();
        assert_eq!(indexed, scanned, "query {:?}", query);
    }
    assert_eq!(db.search("n:>10 n:<20 meta.even:false").unwrap().len(), 5);
}

#[test]
fn test_concurrent_adds_are_visible_after_return() {
    let db = Arc::new(db());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let db = db.clone();
            thread::spawn(move || {
                (0..50)
                    .map(|i| db.add(doc(json!({"thread": t, "i": i, "kind": "bulk"}))).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut added: Vec<DocId> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
    added.sort();

    assert_eq!(search_ids(&db, "kind:bulk"), added);
    assert_eq!(db.search("thread:2").unwrap().len(), 50);
}

#[test]
fn test_expired_documents_disappear() {
    init_tracing();
    let config = Config::no_expiry().with_document_ttl(Some(Duration::from_millis(20)));
    let db = Database::new(config);

    let id = db.add(doc(json!({"a": 1}))).unwrap();
    thread::sleep(Duration::from_millis(60));

    assert!(db.get(id.as_str()).unwrap_err().is_not_found());
    assert!(db.search("a:1").unwrap().is_empty());
    assert!(db.purge_expired() >= 1);
}

#[test]
fn test_add_json() {
    let db = db();
    let id = db.add_json(json!({"k": "v"})).unwrap();
    assert_eq!(db.get(id.as_str()).unwrap(), doc(json!({"k": "v"})));
    assert_eq!(db.add_json(json!([1])).unwrap_err().kind(), ErrorKind::InvalidInput);
}
