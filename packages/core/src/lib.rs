//! # JMESPath query engine
//!
//! Evaluates [JMESPath](https://jmespath.org) expressions against
//! `serde_json` values. A single-pass, stack-driven parser compiles the
//! expression text into a tree of selector nodes; a tree-walking
//! evaluator applies the tree to the input document and materialises the
//! derived value.
//!
//! ## Semantics highlights
//!
//! - Type mismatches during selector application are not errors: they
//!   yield `null`, so projections and filters downstream degrade to empty
//!   arrays.
//! - Projections (`[*]`, `[]`, `.*`, filters) absorb the operations that
//!   follow them into their right-hand chain; a pipe (`|`) seals the
//!   projection and threads its whole result onward.
//! - Object members iterate in insertion order (`serde_json` with
//!   `preserve_order`), and multi-selects emit in declaration order.
//!
//! ## Examples
//!
//! ```
//! use serde_json::json;
//!
//! let doc = json!({"people": [{"age": 30}, {"age": 25}, {"age": 35}]});
//! let ages = jmesq_core::search(&doc, "people[*].age").expect("valid expression");
//! assert_eq!(ages, json!([30, 25, 35]));
//!
//! let oldest = jmesq_core::search(&doc, "people[?age > `28`].age").expect("valid expression");
//! assert_eq!(oldest, json!([30, 35]));
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod evaluator;
pub mod filter;
pub mod functions;
mod parser;
pub mod selector;
pub mod slice;

pub use error::{ErrorKind, JmesPathError, JmesPathResult};
pub use evaluator::EvalContext;
pub use filter::Comparator;
pub use functions::{FunctionFn, FunctionRegistry};
pub use selector::Selector;
pub use slice::Slice;

use serde_json::Value;

use parser::Parser;

/// Evaluate `expression` against `root` with the default built-ins.
///
/// Returns the derived value by value; `root` is never mutated. Parse
/// errors and evaluation errors (bad function arity or argument type)
/// share the error channel and carry the line/column of the last consumed
/// character.
///
/// # Errors
///
/// Returns a [`JmesPathError`] when the expression does not parse or a
/// built-in rejects its arguments.
pub fn search(root: &Value, expression: &str) -> JmesPathResult<Value> {
    search_with(root, expression, &FunctionRegistry::default())
}

/// Evaluate `expression` against `root` with a caller-supplied function
/// registry.
///
/// The registry is consulted at parse time; an unregistered function name
/// fails with [`ErrorKind::FunctionNameNotFound`].
///
/// # Errors
///
/// Returns a [`JmesPathError`] when the expression does not parse or a
/// built-in rejects its arguments.
pub fn search_with(
    root: &Value,
    expression: &str,
    registry: &FunctionRegistry,
) -> JmesPathResult<Value> {
    let compiled = match Parser::new(registry).parse(expression) {
        Ok(compiled) => compiled,
        Err(err) => {
            log::debug!("jmespath parse failed: {err} in expression {expression:?}");
            return Err(err);
        }
    };

    let mut ctx = EvalContext::new();
    let result = compiled.root.evaluate(&mut ctx, root);
    if let Some(kind) = ctx.take_error() {
        let err = JmesPathError::new(kind, compiled.line, compiled.column);
        log::debug!("jmespath evaluation failed: {err} in expression {expression:?}");
        return Err(err);
    }
    Ok(result)
}
