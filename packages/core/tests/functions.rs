//! Built-in functions and the registry contract
//!
//! `sort_by` as the higher-order reference built-in, its companions, and
//! the parse-time/call-time failure split (`function_name_not_found` vs
//! `invalid_argument`).

use serde_json::{json, Value};

use jmesq_core::{search, search_with, ErrorKind, EvalContext, FunctionRegistry, Selector};

mod sort_by {
    use super::*;

    #[test]
    fn sorts_by_string_key() {
        let doc = json!({"xs": [{"k": "b"}, {"k": "a"}]});
        assert_eq!(
            search(&doc, "sort_by(xs, &k)").expect("parse"),
            json!([{"k": "a"}, {"k": "b"}])
        );
    }

    #[test]
    fn sorts_by_numeric_key() {
        let doc = json!({"xs": [{"n": 3}, {"n": 1}, {"n": 2}]});
        assert_eq!(
            search(&doc, "sort_by(xs, &n)").expect("parse"),
            json!([{"n": 1}, {"n": 2}, {"n": 3}])
        );
    }

    #[test]
    fn sort_is_stable_on_equal_keys() {
        let doc = json!({"xs": [
            {"k": 1, "id": "first"},
            {"k": 0, "id": "zero"},
            {"k": 1, "id": "second"}
        ]});
        assert_eq!(
            search(&doc, "sort_by(xs, &k)").expect("parse"),
            json!([
                {"k": 0, "id": "zero"},
                {"k": 1, "id": "first"},
                {"k": 1, "id": "second"}
            ])
        );
    }

    #[test]
    fn key_expression_may_be_a_path() {
        let doc = json!({"xs": [{"a": {"b": 2}}, {"a": {"b": 1}}]});
        assert_eq!(
            search(&doc, "sort_by(xs, &a.b)").expect("parse"),
            json!([{"a": {"b": 1}}, {"a": {"b": 2}}])
        );
    }

    #[test]
    fn wrong_arity_is_invalid_argument() {
        let doc = json!({"xs": []});
        let err = search(&doc, "sort_by(xs)").expect_err("arity 1");
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn non_array_subject_is_invalid_argument() {
        let doc = json!({"name": "x"});
        let err = search(&doc, "sort_by(name, &k)").expect_err("not an array");
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn call_threads_the_dotted_input() {
        let doc = json!({"a": {"xs": [{"k": 2}, {"k": 1}]}});
        assert_eq!(
            search(&doc, "a.sort_by(xs, &k)").expect("parse"),
            json!([{"k": 1}, {"k": 2}])
        );
    }
}

mod companions {
    use super::*;

    #[test]
    fn min_by_and_max_by() {
        let doc = json!({"xs": [{"n": 2}, {"n": 9}, {"n": 1}]});
        assert_eq!(search(&doc, "min_by(xs, &n)").expect("parse"), json!({"n": 1}));
        assert_eq!(search(&doc, "max_by(xs, &n)").expect("parse"), json!({"n": 9}));
    }

    #[test]
    fn min_by_of_empty_array_is_null() {
        let doc = json!({"xs": []});
        assert_eq!(search(&doc, "min_by(xs, &n)").expect("parse"), Value::Null);
    }

    #[test]
    fn length_counts_members_and_characters() {
        let doc = json!({"s": "héllo", "a": [1, 2, 3], "o": {"x": 1}});
        assert_eq!(search(&doc, "length(s)").expect("parse"), json!(5));
        assert_eq!(search(&doc, "length(a)").expect("parse"), json!(3));
        assert_eq!(search(&doc, "length(o)").expect("parse"), json!(1));
    }

    #[test]
    fn length_of_a_number_is_invalid_argument() {
        let err = search(&json!({"n": 4}), "length(n)").expect_err("bad type");
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }

    #[test]
    fn keys_and_values_follow_insertion_order() {
        let doc = json!({"o": {"b": 2, "a": 1}});
        assert_eq!(search(&doc, "keys(o)").expect("parse"), json!(["b", "a"]));
        assert_eq!(search(&doc, "values(o)").expect("parse"), json!([2, 1]));
    }

    #[test]
    fn reverse_arrays_and_strings() {
        let doc = json!({"a": [1, 2, 3], "s": "abc"});
        assert_eq!(search(&doc, "reverse(a)").expect("parse"), json!([3, 2, 1]));
        assert_eq!(search(&doc, "reverse(s)").expect("parse"), json!("cba"));
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn unknown_function_fails_at_parse_time() {
        let err = search(&json!({}), "nope(a)").expect_err("unregistered");
        assert_eq!(err.kind, ErrorKind::FunctionNameNotFound);
    }

    #[test]
    fn unterminated_call_after_unknown_name() {
        let err = search(&json!({}), "foo(").expect_err("unknown name");
        assert_eq!(err.kind, ErrorKind::FunctionNameNotFound);
    }

    #[test]
    fn unterminated_call_after_known_name() {
        let err = search(&json!({}), "length(").expect_err("no closing paren");
        assert_eq!(err.kind, ErrorKind::UnexpectedEndOfInput);
    }

    fn answer(_: &mut EvalContext, _: &Value, _: &[Selector]) -> Value {
        json!(42)
    }

    #[test]
    fn registered_functions_dispatch_through_search_with() {
        let mut registry = FunctionRegistry::default();
        registry.register("answer", answer);
        let doc = json!({});
        assert_eq!(
            search_with(&doc, "answer(@)", &registry).expect("parse"),
            json!(42)
        );
        // the default registry does not know it
        let err = search(&doc, "answer(@)").expect_err("not in default set");
        assert_eq!(err.kind, ErrorKind::FunctionNameNotFound);
    }

    #[test]
    fn empty_registry_knows_nothing() {
        let registry = FunctionRegistry::empty();
        let err = search_with(&json!({}), "sort_by(a, &b)", &registry).expect_err("empty");
        assert_eq!(err.kind, ErrorKind::FunctionNameNotFound);
    }

    #[test]
    fn function_result_feeds_the_enclosing_chain() {
        let doc = json!({"xs": [{"k": "b"}, {"k": "a"}]});
        assert_eq!(
            search(&doc, "sort_by(xs, &k) | [0].k").expect("parse"),
            json!("a")
        );
    }
}
