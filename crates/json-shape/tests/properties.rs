//! End-to-end checks of the decode/encode contract through the public API.

use std::sync::Arc;
use std::thread;

use json_shape::{ErrorKind, Model, ModelState, ParseErrorKind, ParseOptions, Registry, SchemaBuilder};
use proptest::prelude::*;

#[derive(Debug, Default, Clone, PartialEq)]
struct Named {
    name: String,
}

impl Model for Named {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema.property("name", |n| &n.name, |n| &mut n.name)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct MaybeNamed {
    name: Option<String>,
}

impl Model for MaybeNamed {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema.property("name", |n| &n.name, |n| &mut n.name)
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Aged {
    name: String,
    age: f64,
}

impl Model for Aged {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property("name", |a| &a.name, |a| &mut a.name)
            .property_with("age", |a| &a.age, |a| &mut a.age, |c| c.greater(0).less(100))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Member {
    handle: String,
    score: f64,
}

impl Model for Member {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property_with("handle", |m| &m.handle, |m| &mut m.handle, |c| c.matches("[a-z0-9_]{1,16}"))
            .property_with("score", |m| &m.score, |m| &mut m.score, |c| c.range_eq(0, 100))
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Reading {
    level: f32,
}

impl Model for Reading {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema.property("level", |r| &r.level, |r| &mut r.level)
    }
}

/// Properties deliberately declared out of alphabetical order.
#[derive(Debug, Default, Clone, PartialEq)]
struct Team {
    title: String,
    members: Vec<Member>,
    active: bool,
    budget: f64,
    labels: Vec<String>,
    captain: Member,
}

impl Model for Team {
    fn describe(schema: SchemaBuilder<Self>) -> SchemaBuilder<Self> {
        schema
            .property("title", |t| &t.title, |t| &mut t.title)
            .property("members", |t| &t.members, |t| &mut t.members)
            .property("active", |t| &t.active, |t| &mut t.active)
            .property("budget", |t| &t.budget, |t| &mut t.budget)
            .property("labels", |t| &t.labels, |t| &mut t.labels)
            .property("captain", |t| &t.captain, |t| &mut t.captain)
    }
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .register::<Named>()
        .and_then(|r| r.register::<MaybeNamed>())
        .and_then(|r| r.register::<Aged>())
        .and_then(|r| r.register::<Member>())
        .and_then(|r| r.register::<Team>())
        .and_then(|r| r.register::<Reading>())
        .unwrap();
    registry
}

fn kinds(state: &ModelState, property: &str) -> Vec<ErrorKind> {
    state
        .get(property)
        .map(|records| records.iter().map(|r| r.kind).collect())
        .unwrap_or_default()
}

#[test]
fn test_missing_required_field() {
    let (named, state) = registry().from_json::<Named>("{}").unwrap();
    assert_eq!(named.name, "");
    assert_eq!(state.len(), 1);
    assert_eq!(kinds(&state, "name"), [ErrorKind::MissingProperty]);
}

#[test]
fn test_optional_absence() {
    let (named, state) = registry().from_json::<MaybeNamed>("{}").unwrap();
    assert_eq!(named.name, None);
    assert!(state.is_valid());
}

#[test]
fn test_type_mismatch_is_not_fatal() {
    let (aged, state) = registry()
        .from_json::<Aged>(r#"{"age": "old", "name": "Bo"}"#)
        .unwrap();
    assert_eq!(aged.age, 0.0);
    assert_eq!(aged.name, "Bo");
    assert_eq!(state.len(), 1);
    assert_eq!(kinds(&state, "age"), [ErrorKind::TypeMismatch]);
}

#[test]
fn test_predicate_aggregation() {
    let (aged, state) = registry()
        .from_json::<Aged>(r#"{"age": 150, "name": "Old"}"#)
        .unwrap();
    assert_eq!(aged.age, 150.0);
    let records = state.get("age").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, ErrorKind::PredicateFailure);
    assert_eq!(records[0].message, "value must be less than 100");
}

#[test]
fn test_nested_attribution() {
    let text = r#"{
        "title": "core", "active": true, "budget": 10, "labels": [],
        "captain": {"handle": "ana", "score": 90},
        "members": [{"handle": "ana", "score": 90}, {"handle": "BAD NAME", "score": "high"}]
    }"#;
    let (team, state) = registry().from_json::<Team>(text).unwrap();
    assert_eq!(team.members.len(), 2);
    assert_eq!(team.members[1].handle, "BAD NAME");
    assert_eq!(team.members[1].score, 0.0);

    assert_eq!(state.properties().collect::<Vec<_>>(), ["members"]);
    assert_eq!(
        kinds(&state, "members"),
        [ErrorKind::PredicateFailure, ErrorKind::TypeMismatch]
    );
    for record in state.get("members").unwrap() {
        assert!(record.message.starts_with("element 1: "), "{}", record.message);
    }
}

#[test]
fn test_canonical_output() {
    let team = Team {
        title: "ops".into(),
        members: vec![Member {
            handle: "kim".into(),
            score: 12.5,
        }],
        active: false,
        budget: 1200.0,
        labels: vec!["b".into(), "a".into()],
        captain: Member {
            handle: "kim".into(),
            score: 12.5,
        },
    };
    let text = registry().to_json(&team);
    assert_eq!(
        text,
        concat!(
            r#"{"active":false,"budget":1200,"captain":{"handle":"kim","score":12.5},"#,
            r#""labels":["b","a"],"members":[{"handle":"kim","score":12.5}],"title":"ops"}"#
        )
    );
    assert!(!text.contains(char::is_whitespace));
}

#[test]
fn test_narrow_float_survives_roundtrip() {
    let registry = registry();
    let (reading, state) = registry.from_json::<Reading>(r#"{"level": 1e39}"#).unwrap();
    assert!(state.is_valid());
    assert_eq!(reading.level, f32::MAX);

    let text = registry.to_json(&reading);
    assert!(!text.contains("null"), "{text}");
    let (again, state) = registry.from_json::<Reading>(&text).unwrap();
    assert!(state.is_valid(), "{state}");
    assert_eq!(again, reading);
}

#[test]
fn test_malformed_json_is_the_only_hard_error() {
    let err = registry().from_json::<Named>(r#"{"name": "x""#).unwrap_err();
    assert!(matches!(err.kind, ParseErrorKind::UnexpectedEof { .. }));

    let options = ParseOptions::default().max_depth(2);
    let err = registry()
        .from_json_with_options::<Team>(r#"{"members": [{"captain": {}}]}"#, &options)
        .unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::DepthLimitExceeded { max: 2 });
}

#[test]
fn test_parallel_decodes_share_schema() {
    let registry = Arc::new(registry());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let text = format!(r#"{{"name": "n{i}", "age": {}}}"#, i * 20);
                registry.from_json::<Aged>(&text).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (aged, state) = handle.join().unwrap();
        assert_eq!(aged.name, format!("n{i}"));
        // 0 fails greater(0); 100 and up fail less(100).
        assert_eq!(state.is_valid(), (1..5).contains(&i), "{i}: {state}");
    }
}

fn arb_member() -> impl Strategy<Value = Member> {
    ("[a-z0-9_]{1,16}", 0u32..=100).prop_map(|(handle, score)| Member {
        handle,
        score: score as f64,
    })
}

fn arb_team() -> impl Strategy<Value = Team> {
    (
        ".{0,20}",
        prop::collection::vec(arb_member(), 0..5),
        any::<bool>(),
        -1e9f64..1e9f64,
        prop::collection::vec("[a-zA-Z ]{0,8}", 0..5),
        arb_member(),
    )
        .prop_map(|(title, members, active, budget, labels, captain)| Team {
            title,
            members,
            active,
            budget,
            labels,
            captain,
        })
}

proptest! {
    #[test]
    fn prop_roundtrip(team in arb_team()) {
        let registry = registry();
        let text = registry.to_json(&team);
        let (decoded, state) = registry.from_json::<Team>(&text).unwrap();
        prop_assert!(state.is_valid(), "{}", state);
        prop_assert_eq!(decoded, team);
    }
}
