//! Selector tree
//!
//! The compiled form of a JMESPath expression: a tree of polymorphic
//! selector nodes, each owning its children. The parser assembles the
//! tree bottom-up through `add_selector`; `evaluator` walks it.
//!
//! Projection nodes (`ListProjection`, `ObjectProjection`,
//! `FlattenProjection`, `Filter`, `Pipe`) hold the selector they wrapped
//! as `lhs` and accumulate everything parsed after them into their `rhs`
//! chain; that accumulation is what implements projection fusion.

use serde_json::Value;

use crate::filter::Comparator;
use crate::functions::FunctionFn;
use crate::slice::Slice;

/// A node in the compiled expression tree
#[derive(Debug, Clone)]
pub enum Selector {
    /// Ordered chain threading a value left-to-right; an empty chain is
    /// the current node (`@`)
    SubExpression { selectors: Vec<Selector> },
    /// Object member lookup, with the implicit fallback over arrays of
    /// objects
    Identifier { name: String },
    /// A captured JSON value (backtick literal or raw string)
    Literal { value: Value },
    /// Array index; negative counts from the end
    Index { index: i64 },
    /// `start:end:step` over an array
    Slice { slice: Slice },
    /// `[*]`: per-element rhs chain over an array, nulls dropped
    ListProjection { lhs: Box<Selector>, rhs: Vec<Selector> },
    /// `.*`: per-member-value rhs chain over an object, nulls dropped
    ObjectProjection { lhs: Box<Selector>, rhs: Vec<Selector> },
    /// `[]`: one-level flatten of an array, then the per-element rhs chain
    FlattenProjection { lhs: Box<Selector>, rhs: Vec<Selector> },
    /// `|`: thread the lhs result through the rhs chain exactly once
    Pipe { lhs: Box<Selector>, rhs: Vec<Selector> },
    /// `[?lhs op rhs]`: keep array elements for which the comparison holds.
    /// `lhs` is the comparator's left operand, the rhs chain its right
    /// operand; both are evaluated against each element in turn.
    Filter {
        lhs: Box<Selector>,
        rhs: Vec<Selector>,
        comparator: Comparator,
    },
    /// `[a, b]` applied to an object: one result per child
    MultiSelectList { selectors: Vec<Selector> },
    /// `{k: v}` applied to an object: name-expression entries merged in
    /// declaration order
    MultiSelectHash { entries: Vec<Selector> },
    /// A single `name: expr` entry, evaluating to `{name: value}`
    NameExpression { name: String, inner: Box<Selector> },
    /// A registered built-in call with its unevaluated argument selectors
    Function {
        name: String,
        function: FunctionFn,
        args: Vec<Selector>,
    },
}

impl Selector {
    pub(crate) fn sub_expression() -> Self {
        Selector::SubExpression {
            selectors: Vec::new(),
        }
    }

    pub(crate) fn identifier(name: String) -> Self {
        Selector::Identifier { name }
    }

    pub(crate) fn literal(value: Value) -> Self {
        Selector::Literal { value }
    }

    pub(crate) fn index(index: i64) -> Self {
        Selector::Index { index }
    }

    pub(crate) fn slice(slice: Slice) -> Self {
        Selector::Slice { slice }
    }

    pub(crate) fn list_projection(lhs: Selector) -> Self {
        Selector::ListProjection {
            lhs: Box::new(lhs),
            rhs: Vec::new(),
        }
    }

    pub(crate) fn object_projection(lhs: Selector) -> Self {
        Selector::ObjectProjection {
            lhs: Box::new(lhs),
            rhs: Vec::new(),
        }
    }

    pub(crate) fn flatten_projection(lhs: Selector) -> Self {
        Selector::FlattenProjection {
            lhs: Box::new(lhs),
            rhs: Vec::new(),
        }
    }

    pub(crate) fn pipe(lhs: Selector) -> Self {
        Selector::Pipe {
            lhs: Box::new(lhs),
            rhs: Vec::new(),
        }
    }

    pub(crate) fn filter(lhs: Selector, comparator: Comparator) -> Self {
        Selector::Filter {
            lhs: Box::new(lhs),
            rhs: Vec::new(),
            comparator,
        }
    }

    pub(crate) fn multi_select_list(selectors: Vec<Selector>) -> Self {
        Selector::MultiSelectList { selectors }
    }

    pub(crate) fn multi_select_hash(entries: Vec<Selector>) -> Self {
        Selector::MultiSelectHash { entries }
    }

    pub(crate) fn name_expression(name: String, inner: Selector) -> Self {
        Selector::NameExpression {
            name,
            inner: Box::new(inner),
        }
    }

    pub(crate) fn function(name: String, function: FunctionFn) -> Self {
        Selector::Function {
            name,
            function,
            args: Vec::new(),
        }
    }

    /// Append `child` to a composite node.
    ///
    /// Sub-expressions gain a chain step, projections/pipes/filters grow
    /// their rhs chain, function calls gain an argument. Leaf selectors
    /// and the multi-selects (which are assembled whole on their closing
    /// delimiter) ignore the child.
    pub(crate) fn add_selector(&mut self, child: Selector) {
        match self {
            Selector::SubExpression { selectors } => selectors.push(child),
            Selector::ListProjection { rhs, .. }
            | Selector::ObjectProjection { rhs, .. }
            | Selector::FlattenProjection { rhs, .. }
            | Selector::Pipe { rhs, .. }
            | Selector::Filter { rhs, .. } => rhs.push(child),
            Selector::Function { args, .. } => args.push(child),
            Selector::Identifier { .. }
            | Selector::Literal { .. }
            | Selector::Index { .. }
            | Selector::Slice { .. }
            | Selector::MultiSelectList { .. }
            | Selector::MultiSelectHash { .. }
            | Selector::NameExpression { .. } => {}
        }
    }
}
