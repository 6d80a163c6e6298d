//! Multi-select lists and hashes
//!
//! Construction of derived arrays/objects from sibling expressions, with
//! declaration-order determinism.

use serde_json::{json, Value};

use jmesq_core::search;

#[test]
fn hash_builds_object_from_members() {
    let doc = json!({"a": 1, "b": 2});
    assert_eq!(
        search(&doc, "{x: a, y: b}").expect("parse"),
        json!({"x": 1, "y": 2})
    );
}

#[test]
fn hash_keys_emit_in_declaration_order() {
    let doc = json!({"one": 1, "two": 2});
    let result = search(&doc, "{z: two, a: one}").expect("parse");
    let rendered = serde_json::to_string(&result).expect("serialize");
    assert_eq!(rendered, r#"{"z":2,"a":1}"#);
}

#[test]
fn hash_with_quoted_keys() {
    let doc = json!({"a": 1});
    assert_eq!(
        search(&doc, "{\"first key\": a}").expect("parse"),
        json!({"first key": 1})
    );
}

#[test]
fn hash_values_are_full_expressions() {
    let doc = json!({"a": {"b": [1, 2, 3]}});
    assert_eq!(
        search(&doc, "{first: a.b[0], rest: a.b[1:]}").expect("parse"),
        json!({"first": 1, "rest": [2, 3]})
    );
}

#[test]
fn hash_value_may_contain_a_projection() {
    // the projection wraps the entry under construction; its key must
    // survive the wrap
    let doc = json!({"xs": [{"n": 1}, {"n": 2}]});
    assert_eq!(
        search(&doc, "{x: xs[*].n}").expect("parse"),
        json!({"x": [1, 2]})
    );
}

#[test]
fn hash_on_non_object_is_null() {
    assert_eq!(search(&json!([1, 2]), "{x: a}").expect("parse"), Value::Null);
    assert_eq!(search(&json!("s"), "{x: a}").expect("parse"), Value::Null);
}

#[test]
fn hash_inside_projection() {
    let doc = json!({"xs": [{"n": 1, "m": 10}, {"n": 2, "m": 20}]});
    assert_eq!(
        search(&doc, "xs[*].{v: n}").expect("parse"),
        json!([{"v": 1}, {"v": 2}])
    );
}

#[test]
fn missing_members_materialise_as_null_values() {
    let doc = json!({"a": 1});
    assert_eq!(
        search(&doc, "{x: a, y: nope}").expect("parse"),
        json!({"x": 1, "y": null})
    );
}

mod lists {
    use super::*;

    // a bare multi-select-list projects over the current value; each
    // object element yields one row
    #[test]
    fn list_projects_rows_over_an_array() {
        let doc = json!({"xs": [{"a": 1, "b": 2}, {"a": 3, "b": 4}]});
        assert_eq!(
            search(&doc, "xs[a, b]").expect("parse"),
            json!([[1, 2], [3, 4]])
        );
    }

    #[test]
    fn list_elements_emit_in_declaration_order() {
        let doc = json!({"xs": [{"a": 1, "b": 2}]});
        assert_eq!(search(&doc, "xs[b, a]").expect("parse"), json!([[2, 1]]));
    }

    #[test]
    fn non_object_rows_are_dropped() {
        let doc = json!({"xs": [{"a": 1, "b": 2}, 5, "text"]});
        assert_eq!(search(&doc, "xs[a, b]").expect("parse"), json!([[1, 2]]));
    }

    #[test]
    fn list_over_non_array_is_null() {
        let doc = json!({"xs": {"a": 1}});
        assert_eq!(search(&doc, "xs[a, b]").expect("parse"), Value::Null);
    }
}
