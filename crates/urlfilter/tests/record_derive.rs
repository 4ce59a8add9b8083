//! Integration tests for the Record derive macro.
//!
//! These tests verify that `#[derive(Record)]` declares fields the same way
//! a hand-written implementation would.

#![allow(dead_code)] // Some fields are intentionally skipped for testing

use std::collections::HashMap;

use urlfilter::{DecodeValues, Op, Pager, Registry, Values};
use urlfilter_macros::Record as DeriveRecord;

fn values(pairs: &[(&str, &str)]) -> Values {
    pairs.iter().copied().collect()
}

// =============================================================================
// Basic derive tests
// =============================================================================

#[derive(Debug, Default, DeriveRecord)]
struct BookFilter {
    #[urlfilter("'books'")]
    table_name: (),

    id: i64,

    #[urlfilter("title,required")]
    name: String,

    author_ids: Vec<i64>,
    published_gte: u16,

    #[urlfilter(skip)]
    cache: Option<String>,

    #[urlfilter(tag = ",nowhere")]
    sort: String,

    #[urlfilter("-")]
    internal: String,

    #[urlfilter(",unknown")]
    rest: Values,
}

#[test]
fn test_declared_fields() {
    use urlfilter::Record;

    let declared = BookFilter::declared_fields();
    let idents: Vec<&str> = declared.iter().map(|d| d.ident()).collect();
    assert_eq!(
        idents,
        vec![
            "table_name",
            "id",
            "name",
            "author_ids",
            "published_gte",
            "sort",
            "internal",
            "rest"
        ]
    );

    // Positions count skipped fields.
    assert_eq!(declared[5].path(), &[6]);
    assert_eq!(declared[2].tag(), "title,required");
}

#[test]
fn test_metadata() {
    let registry = Registry::new();
    let meta = registry.metadata::<BookFilter>().unwrap();

    assert_eq!(meta.table_name(), Some("books"));
    assert_eq!(meta.catch_all_path(), Some(&[8][..]));

    let names: Vec<&str> = meta.fields().iter().map(|f| f.name()).collect();
    assert_eq!(
        names,
        vec!["id", "title", "author_ids", "published_gte", "sort"]
    );
    assert!(meta.find("title").unwrap().is_required());
    assert_eq!(meta.find("published__gte").unwrap().op(), Op::Gte);
}

#[test]
fn test_decode() {
    let registry = Registry::new();
    let mut input = values(&[("id", "5"), ("title", "bob"), ("internal", "x")]);
    input.append("author_ids", "1");
    input.append("author_ids", "2");
    input.append("color", "red");

    let mut filter = BookFilter::default();
    registry.decode(&mut filter, &input).unwrap();

    assert_eq!(filter.id, 5);
    assert_eq!(filter.name, "bob");
    assert_eq!(filter.author_ids, vec![1, 2]);
    assert!(filter.internal.is_empty());
    assert_eq!(filter.rest.first("color"), Some("red"));
    assert_eq!(filter.rest.first("internal"), Some("x"));
}

#[test]
fn test_conditions() {
    let registry = Registry::new();
    let meta = registry.metadata::<BookFilter>().unwrap();

    let mut filter = BookFilter::default();
    registry
        .decode(
            &mut filter,
            &values(&[("id", "5"), ("sort", "name"), ("published__gte", "2000")]),
        )
        .unwrap();

    let conditions: Vec<String> = meta.conditions(&filter).map(|c| c.to_string()).collect();
    assert_eq!(conditions, vec!["id eq", "published gte"]);
}

// =============================================================================
// Flattening
// =============================================================================

#[derive(Debug, Default, DeriveRecord)]
struct Audit {
    created_by: String,
    created_at_gte: i64,
}

#[derive(Debug, Default, DeriveRecord)]
struct PagedFilter {
    #[urlfilter(flatten)]
    pager: Pager,

    #[urlfilter(flatten)]
    audit: Box<Audit>,

    status_exclude: Vec<String>,

    #[urlfilter(",unknown")]
    rest: HashMap<String, Vec<String>>,
}

#[test]
fn test_flatten_paths() {
    let registry = Registry::new();
    let meta = registry.metadata::<PagedFilter>().unwrap();

    let paths: Vec<&[usize]> = meta.fields().iter().map(|f| f.path()).collect();
    assert_eq!(
        paths,
        vec![&[0, 0][..], &[0, 1][..], &[1, 0][..], &[1, 1][..], &[2][..]]
    );
    assert_eq!(meta.hook_paths().collect::<Vec<_>>(), vec![&[0][..]]);
}

#[test]
fn test_flatten_decode() {
    let registry = Registry::new();
    let mut input = values(&[
        ("limit", "10"),
        ("page", "2"),
        ("created_by", "ann"),
        ("created_at__gte", "1700000000"),
        ("status__exclude", "closed"),
    ]);
    input.append("unused", "1");

    let mut filter = PagedFilter::default();
    registry.decode(&mut filter, &input).unwrap();

    assert_eq!(filter.pager.offset(), 10);
    assert_eq!(filter.audit.created_by, "ann");
    assert_eq!(filter.audit.created_at_gte, 1_700_000_000);
    assert_eq!(filter.status_exclude, vec!["closed"]);
    assert!(filter.rest.contains_key("unused"));

    let meta = registry.metadata::<PagedFilter>().unwrap();
    let columns: Vec<(&str, Op)> = meta.conditions(&filter).map(|c| (c.column, c.op)).collect();
    assert_eq!(
        columns,
        vec![
            ("created_by", Op::Eq),
            ("created_at", Op::Gte),
            ("status", Op::NotEq)
        ]
    );
}

// =============================================================================
// Custom decoding
// =============================================================================

#[derive(Debug, Default)]
struct Sort {
    columns: Vec<String>,
}

impl DecodeValues for Sort {
    fn decode_values(&mut self, values: &Values) -> urlfilter::Result<()> {
        self.columns = values.strings("sort").to_vec();
        Ok(())
    }
}

#[derive(Debug, Default, DeriveRecord)]
struct SortedFilter {
    #[urlfilter(decode_values)]
    sort: Sort,
    name: String,
}

#[test]
fn test_field_decode_values() {
    let registry = Registry::new();
    let mut input = values(&[("name", "x")]);
    input.append("sort", "name");
    input.append("sort", "-id");

    let mut filter = SortedFilter::default();
    registry.decode(&mut filter, &input).unwrap();
    assert_eq!(filter.sort.columns, vec!["name", "-id"]);
    assert_eq!(filter.name, "x");
}

#[derive(Debug, Default, DeriveRecord)]
#[urlfilter(decode_values)]
struct Raw {
    seen: usize,
}

impl DecodeValues for Raw {
    fn decode_values(&mut self, values: &Values) -> urlfilter::Result<()> {
        self.seen = values.len();
        Ok(())
    }
}

#[test]
fn test_struct_decode_values() {
    let registry = Registry::new();
    assert!(registry.metadata::<Raw>().unwrap().has_custom_decode());

    let mut raw = Raw::default();
    registry
        .decode(&mut raw, &values(&[("seen", "99"), ("b", "2")]))
        .unwrap();
    assert_eq!(raw.seen, 2);
}
