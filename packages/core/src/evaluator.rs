//! Selector evaluation
//!
//! Walks a compiled selector tree against an input document. Selectors
//! return owned values; a type mismatch never errors, it yields
//! `Value::Null`, so downstream projections and filters degrade to empty
//! arrays instead of failing. Projections visit arrays in index order and
//! objects in insertion order, and drop `null` results from their rhs
//! chains.

use serde_json::{Map, Value};

use crate::error::ErrorKind;
use crate::selector::Selector;

/// Per-evaluation scratch state.
///
/// Lives for a single `search` call and is not reused. It carries the
/// error sink: a built-in that detects misuse records the first error
/// here and returns `null`, enclosing selectors keep going, and the entry
/// point reports the recorded error once the walk finishes.
#[derive(Debug, Default)]
pub struct EvalContext {
    error: Option<ErrorKind>,
}

impl EvalContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `kind` unless an earlier error is already held.
    pub fn record_error(&mut self, kind: ErrorKind) {
        if self.error.is_none() {
            self.error = Some(kind);
        }
    }

    pub(crate) fn take_error(&mut self) -> Option<ErrorKind> {
        self.error.take()
    }
}

impl Selector {
    /// Evaluate this selector against `input`, materialising the result
    /// as an owned value.
    pub fn evaluate(&self, ctx: &mut EvalContext, input: &Value) -> Value {
        match self {
            Selector::SubExpression { selectors } => {
                let mut current = input.clone();
                for selector in selectors {
                    current = selector.evaluate(ctx, &current);
                }
                current
            }
            Selector::Identifier { name } => evaluate_identifier(name, input),
            Selector::Literal { value } => value.clone(),
            Selector::Index { index } => evaluate_index(*index, input),
            Selector::Slice { slice } => match input.as_array() {
                Some(items) => Value::Array(
                    slice
                        .indices(items.len())
                        .into_iter()
                        .map(|i| items[i].clone())
                        .collect(),
                ),
                None => Value::Null,
            },
            Selector::ListProjection { lhs, rhs } => {
                match lhs.evaluate(ctx, input) {
                    Value::Array(items) => Value::Array(project(ctx, rhs, items)),
                    _ => Value::Null,
                }
            }
            Selector::ObjectProjection { lhs, rhs } => {
                match lhs.evaluate(ctx, input) {
                    Value::Object(members) => {
                        let values = members.into_iter().map(|(_, value)| value).collect();
                        Value::Array(project(ctx, rhs, values))
                    }
                    _ => Value::Null,
                }
            }
            Selector::FlattenProjection { lhs, rhs } => {
                match lhs.evaluate(ctx, input) {
                    Value::Array(items) => {
                        let mut flattened = Vec::with_capacity(items.len());
                        for item in items {
                            match item {
                                Value::Array(inner) => flattened.extend(inner),
                                other => flattened.push(other),
                            }
                        }
                        Value::Array(project(ctx, rhs, flattened))
                    }
                    _ => Value::Null,
                }
            }
            Selector::Pipe { lhs, rhs } => {
                let mut current = lhs.evaluate(ctx, input);
                for selector in rhs {
                    current = selector.evaluate(ctx, &current);
                }
                current
            }
            Selector::Filter {
                lhs,
                rhs,
                comparator,
            } => match input {
                Value::Array(items) => {
                    let mut kept = Vec::new();
                    for item in items {
                        let left = lhs.evaluate(ctx, item);
                        let mut right = item.clone();
                        for selector in rhs {
                            right = selector.evaluate(ctx, &right);
                        }
                        if comparator.apply(&left, &right) == Some(true) {
                            kept.push(item.clone());
                        }
                    }
                    Value::Array(kept)
                }
                _ => Value::Null,
            },
            Selector::MultiSelectList { selectors } => {
                if !input.is_object() {
                    return Value::Null;
                }
                Value::Array(
                    selectors
                        .iter()
                        .map(|selector| selector.evaluate(ctx, input))
                        .collect(),
                )
            }
            Selector::MultiSelectHash { entries } => {
                if !input.is_object() {
                    return Value::Null;
                }
                let mut merged = Map::new();
                for entry in entries {
                    if let Value::Object(members) = entry.evaluate(ctx, input) {
                        for (key, value) in members {
                            merged.insert(key, value);
                        }
                    }
                }
                Value::Object(merged)
            }
            Selector::NameExpression { name, inner } => {
                let mut singleton = Map::new();
                singleton.insert(name.clone(), inner.evaluate(ctx, input));
                Value::Object(singleton)
            }
            Selector::Function { function, args, .. } => function(ctx, input, args),
        }
    }
}

/// Apply a projection's rhs chain to each item, dropping `null` results.
fn project(ctx: &mut EvalContext, chain: &[Selector], items: Vec<Value>) -> Vec<Value> {
    let mut results = Vec::with_capacity(items.len());
    for item in items {
        let mut current = item;
        for selector in chain {
            current = selector.evaluate(ctx, &current);
        }
        if !current.is_null() {
            results.push(current);
        }
    }
    results
}

/// Member lookup. Over an object this is a plain keyed access; over an
/// array it collects the member from each object element that has it (the
/// implicit fallback that keeps `xs[?p].n`-style chains working after the
/// projection context is gone).
fn evaluate_identifier(name: &str, input: &Value) -> Value {
    match input {
        Value::Object(members) => members.get(name).cloned().unwrap_or(Value::Null),
        Value::Array(items) => {
            let mut found = Vec::new();
            for item in items {
                if let Value::Object(members) = item {
                    if let Some(value) = members.get(name) {
                        found.push(value.clone());
                    }
                }
            }
            Value::Array(found)
        }
        _ => Value::Null,
    }
}

fn evaluate_index(index: i64, input: &Value) -> Value {
    match input.as_array() {
        Some(items) => {
            let len = items.len() as i64;
            let resolved = if index < 0 { len + index } else { index };
            if resolved >= 0 && resolved < len {
                items[resolved as usize].clone()
            } else {
                Value::Null
            }
        }
        None => Value::Null,
    }
}
