//! JMESPath queries over `serde_json` values
//!
//! Public facade over the `jmesq-core` engine: a stack-driven expression
//! parser and a selector-tree evaluator with JMESPath projection,
//! filtering, multi-select, and built-in function semantics.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"xs": [{"k": "b"}, {"k": "a"}]});
//!
//! // projections absorb the steps after them
//! let ks = jmesq::search(&doc, "xs[*].k").expect("valid expression");
//! assert_eq!(ks, json!(["b", "a"]));
//!
//! // higher-order built-ins take expression references
//! let sorted = jmesq::search(&doc, "sort_by(xs, &k)").expect("valid expression");
//! assert_eq!(sorted, json!([{"k": "a"}, {"k": "b"}]));
//! ```
//!
//! Callers that need additional built-ins register them on a
//! [`FunctionRegistry`] and evaluate through [`search_with`]; see the
//! registry documentation for the dispatch contract.

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub use jmesq_core::{
    search, search_with, Comparator, ErrorKind, EvalContext, FunctionFn, FunctionRegistry,
    JmesPathError, JmesPathResult, Selector,
};
