//! Built-in function registry
//!
//! Maps function names to built-ins. Lookup happens at parse time, so an
//! unknown name fails compilation with `function_name_not_found`; arity
//! and argument-type checks happen at call time.
//!
//! A built-in receives the evaluation context, the input value the call
//! threads over, and its *unevaluated* argument selectors. It evaluates an
//! argument against the input when it wants the value (which is what makes
//! expression-reference arguments like `&k` work: the selector is applied
//! per element, not once up front). On misuse it records
//! `invalid_argument` on the context and returns `null`; evaluation of the
//! surrounding tree continues.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde_json::Value;

use crate::error::ErrorKind;
use crate::evaluator::EvalContext;
use crate::filter::total_order;
use crate::selector::Selector;

/// Signature shared by every built-in
pub type FunctionFn = fn(&mut EvalContext, &Value, &[Selector]) -> Value;

/// Name → built-in dispatch table.
///
/// `Default` registers the full built-in set; `empty` + `register` let a
/// caller assemble their own and pass it to `search_with`.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionFn>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("sort_by", sort_by);
        registry.register("min_by", min_by);
        registry.register("max_by", max_by);
        registry.register("length", length);
        registry.register("keys", keys);
        registry.register("values", values);
        registry.register("reverse", reverse);
        registry
    }
}

impl FunctionRegistry {
    /// Registry with no built-ins registered
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Register (or replace) a built-in under `name`
    pub fn register(&mut self, name: impl Into<String>, function: FunctionFn) {
        self.functions.insert(name.into(), function);
    }

    pub(crate) fn get(&self, name: &str) -> Option<FunctionFn> {
        self.functions.get(name).copied()
    }
}

/// `sort_by(array, &expr)`: stable-sort a copy of the array by the key
/// the second argument produces for each element.
fn sort_by(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    if args.len() != 2 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    let Value::Array(items) = args[0].evaluate(ctx, input) else {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    };
    let mut keyed: Vec<(Value, Value)> = items
        .into_iter()
        .map(|item| {
            let key = args[1].evaluate(ctx, &item);
            (key, item)
        })
        .collect();
    keyed.sort_by(|(a, _), (b, _)| total_order(a, b));
    Value::Array(keyed.into_iter().map(|(_, item)| item).collect())
}

fn min_by(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    extremum_by(ctx, input, args, Ordering::Less)
}

fn max_by(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    extremum_by(ctx, input, args, Ordering::Greater)
}

/// Shared body of `min_by`/`max_by`: the element whose key is least or
/// greatest under the total order, first such element on ties. `null` on
/// an empty array.
fn extremum_by(ctx: &mut EvalContext, input: &Value, args: &[Selector], want: Ordering) -> Value {
    if args.len() != 2 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    let Value::Array(items) = args[0].evaluate(ctx, input) else {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    };
    let mut best: Option<(Value, Value)> = None;
    for item in items {
        let key = args[1].evaluate(ctx, &item);
        let replace = match &best {
            Some((best_key, _)) => total_order(&key, best_key) == want,
            None => true,
        };
        if replace {
            best = Some((key, item));
        }
    }
    match best {
        Some((_, item)) => item,
        None => Value::Null,
    }
}

/// `length(x)`: character count of a string, member count of an array or
/// object.
fn length(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    if args.len() != 1 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    match args[0].evaluate(ctx, input) {
        Value::String(text) => Value::from(text.chars().count()),
        Value::Array(items) => Value::from(items.len()),
        Value::Object(members) => Value::from(members.len()),
        _ => {
            ctx.record_error(ErrorKind::InvalidArgument);
            Value::Null
        }
    }
}

/// `keys(object)`: member names in insertion order.
fn keys(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    if args.len() != 1 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    let Value::Object(members) = args[0].evaluate(ctx, input) else {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    };
    Value::Array(members.into_iter().map(|(key, _)| Value::String(key)).collect())
}

/// `values(object)`: member values in insertion order.
fn values(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    if args.len() != 1 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    let Value::Object(members) = args[0].evaluate(ctx, input) else {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    };
    Value::Array(members.into_iter().map(|(_, value)| value).collect())
}

/// `reverse(x)`: array or string reversed.
fn reverse(ctx: &mut EvalContext, input: &Value, args: &[Selector]) -> Value {
    if args.len() != 1 {
        ctx.record_error(ErrorKind::InvalidArgument);
        return Value::Null;
    }
    match args[0].evaluate(ctx, input) {
        Value::Array(mut items) => {
            items.reverse();
            Value::Array(items)
        }
        Value::String(text) => Value::String(text.chars().rev().collect()),
        _ => {
            ctx.record_error(ErrorKind::InvalidArgument);
            Value::Null
        }
    }
}
