//! Projection semantics
//!
//! List, object, and flatten projections; projection fusion (operators
//! after a projection attach to its right-hand chain) and the pipe that
//! breaks it.

use serde_json::{json, Value};

use jmesq_core::search;

#[test]
fn list_projection_over_members() {
    let doc = json!({"people": [{"age": 30}, {"age": 25}, {"age": 35}]});
    assert_eq!(
        search(&doc, "people[*].age").expect("parse"),
        json!([30, 25, 35])
    );
}

#[test]
fn projection_preserves_order_and_drops_nulls() {
    let doc = json!([{"x": 1}, {}, {"x": 3}, {"y": 9}]);
    assert_eq!(search(&doc, "[*].x").expect("parse"), json!([1, 3]));
}

#[test]
fn bare_list_projection_drops_null_elements() {
    assert_eq!(search(&json!([1, null, 2]), "[*]").expect("parse"), json!([1, 2]));
}

#[test]
fn list_projection_of_non_array_is_null() {
    let doc = json!({"a": {"b": 1}});
    assert_eq!(search(&doc, "a[*]").expect("parse"), Value::Null);
    assert_eq!(search(&doc, "missing[*].x").expect("parse"), Value::Null);
}

#[test]
fn object_projection_iterates_member_values_in_order() {
    let doc = json!({"a": {"v": 1}, "b": {"v": 2}, "c": {"v": 3}});
    assert_eq!(search(&doc, "*.v").expect("parse"), json!([1, 2, 3]));
}

#[test]
fn object_projection_of_non_object_is_null() {
    assert_eq!(search(&json!([1, 2]), "*.v").expect("parse"), Value::Null);
}

#[test]
fn flatten_merges_one_level() {
    let doc = json!([[1, 2], [3, 4], [5]]);
    assert_eq!(search(&doc, "[]").expect("parse"), json!([1, 2, 3, 4, 5]));
}

#[test]
fn flatten_passes_non_array_elements_through() {
    let doc = json!([1, [2, 3], 4]);
    assert_eq!(search(&doc, "[]").expect("parse"), json!([1, 2, 3, 4]));
}

#[test]
fn flatten_is_single_level() {
    let doc = json!([[[1], [2]], [[3]]]);
    assert_eq!(search(&doc, "[]").expect("parse"), json!([[1], [2], [3]]));
    assert_eq!(search(&doc, "[][]").expect("parse"), json!([1, 2, 3]));
}

#[test]
fn flatten_projection_applies_rhs_chain() {
    let doc = json!({"xs": [[{"a": 1}], [{"a": 2}, {"a": 3}]]});
    assert_eq!(search(&doc, "xs[].a").expect("parse"), json!([1, 2, 3]));
}

mod fusion {
    use super::*;

    // the single most load-bearing grammar rule: brackets and dots after a
    // projection attach inside it, a pipe closes it
    #[test]
    fn pipe_breaks_projection() {
        let doc = json!([{"x": [1, 2]}, {"x": [3, 4]}]);
        assert_eq!(search(&doc, "[*].x[0]").expect("parse"), json!([1, 3]));
        assert_eq!(search(&doc, "[*].x | [0]").expect("parse"), json!([1, 2]));
    }

    #[test]
    fn dotted_steps_fuse_into_the_projection() {
        let doc = json!({"xs": [{"a": {"b": 1}}, {"a": {"b": 2}}]});
        assert_eq!(search(&doc, "xs[*].a.b").expect("parse"), json!([1, 2]));
    }

    #[test]
    fn nested_projections() {
        let doc = json!([[{"n": 1}, {"n": 2}], [{"n": 3}]]);
        assert_eq!(
            search(&doc, "[*][*].n").expect("parse"),
            json!([[1, 2], [3]])
        );
    }

    #[test]
    fn pipe_threads_once_without_iterating() {
        let doc = json!({"a": {"b": 1}});
        // no array requirement on the pipe's left-hand side
        assert_eq!(search(&doc, "a | b").expect("parse"), json!(1));
    }

    #[test]
    fn pipe_then_new_projection() {
        let doc = json!({"xs": [{"v": [1]}, {"v": [2, 3]}]});
        assert_eq!(
            search(&doc, "xs[*].v | [0] | [*]").expect("parse"),
            json!([1])
        );
    }
}
