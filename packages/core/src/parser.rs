//! Expression parser
//!
//! A single-pass, character-at-a-time push-down machine. Three parallel
//! stacks drive it: grammar states, partially-built selectors (each with
//! an optional pending hash key), and offsets into the selector stack
//! marking where the current nested construct began.
//!
//! Projection-introducing tokens (`[*]`, `[]`, `[?..]`, `.*`, bare
//! `[a, b]`) wrap the current selector-stack top as the projection's lhs;
//! everything parsed afterwards lands in the projection's rhs chain until
//! a pipe wraps the top again and resets the context. Nested constructs
//! (function arguments, multi-selects, filters) push the selector-stack
//! length onto the offset stack and assemble the composite when the
//! closing delimiter drains everything above the saved offset.

use serde_json::Value;

use crate::error::{ErrorKind, JmesPathError, JmesPathResult};
use crate::filter::Comparator;
use crate::functions::FunctionRegistry;
use crate::selector::Selector;
use crate::slice::Slice;

/// Grammar states of the push-down machine.
///
/// Reduction states (`KeyExpr`, `ValExpr`, and the default arms of
/// `IdentifierOrFunctionExpr`, `Number`, `Digit`) fire without consuming
/// the current character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    Expression,
    SubExpression,
    KeyExpr,
    ValExpr,
    IdentifierOrFunctionExpr,
    ArgOrRightParen,
    UnquotedString,
    QuotedString,
    RawString,
    JsonValue,
    Number,
    Digit,
    BracketSpecifier,
    BracketSpecifier2,
    BracketSpecifier3,
    BracketSpecifier4,
    BracketSpecifier9,
    MultiSelectHash,
    ExpectDot,
    ExpectRightBracket,
    ExpectRightBracket4,
    ExpectRightBrace,
    ExpectColon,
    Comparator,
    CmpLtOrLte,
    CmpEq,
    CmpGtOrGte,
    CmpNe,
    KeyValExpr,
}

/// Selector-stack entry: a selector under assembly plus the pending
/// multi-select-hash key, once one has been read
#[derive(Debug)]
struct KeySelector {
    key: Option<String>,
    selector: Selector,
}

impl KeySelector {
    fn new(selector: Selector) -> Self {
        KeySelector {
            key: None,
            selector,
        }
    }
}

/// A compiled expression plus the cursor position parsing ended at
/// (evaluation errors are reported against that position)
#[derive(Debug)]
pub(crate) struct CompiledExpression {
    pub root: Selector,
    pub line: usize,
    pub column: usize,
}

pub(crate) struct Parser<'a> {
    registry: &'a FunctionRegistry,
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    state_stack: Vec<ParseState>,
    selector_stack: Vec<KeySelector>,
    offset_stack: Vec<usize>,
    buffer: String,
    slice: Slice,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(registry: &'a FunctionRegistry) -> Self {
        Parser {
            registry,
            chars: Vec::new(),
            pos: 0,
            line: 1,
            column: 1,
            state_stack: Vec::new(),
            selector_stack: Vec::new(),
            offset_stack: Vec::new(),
            buffer: String::new(),
            slice: Slice::default(),
        }
    }

    pub(crate) fn parse(mut self, expression: &str) -> JmesPathResult<CompiledExpression> {
        self.chars = expression.chars().collect();
        self.state_stack.push(ParseState::Start);
        self.selector_stack
            .push(KeySelector::new(Selector::sub_expression()));

        while self.pos < self.chars.len() {
            let ch = self.chars[self.pos];
            let Some(&state) = self.state_stack.last() else {
                return Err(self.error(ErrorKind::UnidentifiedError));
            };
            match state {
                ParseState::Start => {
                    self.set_state(ParseState::SubExpression);
                    self.push_state(ParseState::Expression);
                }
                ParseState::Expression => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    '"' => {
                        self.pop_state();
                        self.push_state(ParseState::ValExpr);
                        self.push_state(ParseState::QuotedString);
                        self.advance();
                    }
                    '\'' => {
                        self.pop_state();
                        self.push_state(ParseState::RawString);
                        self.advance();
                    }
                    '`' => {
                        self.pop_state();
                        self.push_state(ParseState::JsonValue);
                        self.advance();
                    }
                    '[' => {
                        self.pop_state();
                        self.push_state(ParseState::BracketSpecifier);
                        self.advance();
                    }
                    '{' => {
                        self.pop_state();
                        self.push_state(ParseState::MultiSelectHash);
                        self.advance();
                    }
                    '*' => {
                        self.wrap_top(Selector::object_projection)?;
                        self.push_state(ParseState::ExpectDot);
                        self.advance();
                    }
                    // expression-reference marker: the argument selector
                    // itself carries the deferred-application semantics
                    '&' => self.advance(),
                    // current node: the enclosing sub-expression with no
                    // further steps is the identity
                    '@' => {
                        self.pop_state();
                        self.advance();
                    }
                    c if is_identifier_start(c) => {
                        self.pop_state();
                        self.push_state(ParseState::IdentifierOrFunctionExpr);
                        self.push_state(ParseState::UnquotedString);
                        self.buffer.push(c);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedIdentifier)),
                },
                ParseState::KeyExpr => {
                    let key = std::mem::take(&mut self.buffer);
                    self.top()?.key = Some(key);
                    self.pop_state();
                }
                ParseState::ValExpr => {
                    let name = std::mem::take(&mut self.buffer);
                    self.top()?.selector.add_selector(Selector::identifier(name));
                    self.pop_state();
                }
                ParseState::IdentifierOrFunctionExpr => match ch {
                    '(' => {
                        let name = std::mem::take(&mut self.buffer);
                        let Some(function) = self.registry.get(&name) else {
                            return Err(self.error(ErrorKind::FunctionNameNotFound));
                        };
                        self.offset_stack.push(self.selector_stack.len());
                        self.selector_stack
                            .push(KeySelector::new(Selector::function(name, function)));
                        self.selector_stack
                            .push(KeySelector::new(Selector::sub_expression()));
                        self.set_state(ParseState::ArgOrRightParen);
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    _ => {
                        let name = std::mem::take(&mut self.buffer);
                        self.top()?.selector.add_selector(Selector::identifier(name));
                        self.pop_state();
                    }
                },
                ParseState::ArgOrRightParen => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    ',' => {
                        self.selector_stack
                            .push(KeySelector::new(Selector::sub_expression()));
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    ')' => {
                        let offset = self.pop_offset()?;
                        let mut drained = self.drain_from(offset)?.into_iter();
                        let Some(mut call) = drained.next() else {
                            return Err(self.error(ErrorKind::UnidentifiedError));
                        };
                        for arg in drained {
                            call.selector.add_selector(arg.selector);
                        }
                        self.top()?.selector.add_selector(call.selector);
                        self.pop_state();
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::UnidentifiedError)),
                },
                ParseState::QuotedString => {
                    match ch {
                        '"' => {
                            self.pop_state();
                        }
                        '\\' => {
                            self.advance();
                            match self.chars.get(self.pos) {
                                Some(&escaped) => self.buffer.push(escaped),
                                None => {
                                    return Err(self.error(ErrorKind::UnexpectedEndOfInput))
                                }
                            }
                        }
                        _ => self.buffer.push(ch),
                    }
                    self.advance();
                }
                ParseState::UnquotedString => match ch {
                    ' ' | '\t' | '\r' | '\n' => {
                        self.pop_state();
                        self.advance_past_space_character();
                    }
                    c if is_identifier_char(c) => {
                        self.buffer.push(c);
                        self.advance();
                    }
                    _ => self.pop_state(),
                },
                ParseState::RawString => match ch {
                    '\'' => {
                        let text = std::mem::take(&mut self.buffer);
                        self.top()?
                            .selector
                            .add_selector(Selector::literal(Value::String(text)));
                        self.pop_state();
                        self.advance();
                    }
                    '\\' => {
                        self.advance();
                        match self.chars.get(self.pos) {
                            Some(&protected) => {
                                self.buffer.push(protected);
                                self.advance();
                            }
                            None => return Err(self.error(ErrorKind::UnexpectedEndOfInput)),
                        }
                    }
                    _ => {
                        self.buffer.push(ch);
                        self.advance();
                    }
                },
                ParseState::JsonValue => match ch {
                    '`' => {
                        let text = std::mem::take(&mut self.buffer);
                        let value: Value = match serde_json::from_str(&text) {
                            Ok(value) => value,
                            Err(_) => return Err(self.error(ErrorKind::UnidentifiedError)),
                        };
                        self.top()?.selector.add_selector(Selector::literal(value));
                        self.pop_state();
                        self.advance();
                    }
                    '\\' => {
                        self.advance();
                        match self.chars.get(self.pos) {
                            // escaped backtick; any other escape passes
                            // through for the JSON parser to interpret
                            Some('`') => {
                                self.buffer.push('`');
                                self.advance();
                            }
                            Some(_) => self.buffer.push('\\'),
                            None => return Err(self.error(ErrorKind::UnexpectedEndOfInput)),
                        }
                    }
                    _ => {
                        self.buffer.push(ch);
                        self.advance();
                    }
                },
                ParseState::Number => match ch {
                    '-' => {
                        self.buffer.push(ch);
                        self.set_state(ParseState::Digit);
                        self.advance();
                    }
                    _ => self.set_state(ParseState::Digit),
                },
                ParseState::Digit => match ch {
                    '0'..='9' => {
                        self.buffer.push(ch);
                        self.advance();
                    }
                    _ => self.pop_state(),
                },
                ParseState::SubExpression => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    '.' => {
                        self.advance();
                        self.push_state(ParseState::Expression);
                    }
                    '|' => {
                        self.advance();
                        self.wrap_top(Selector::pipe)?;
                        self.push_state(ParseState::Expression);
                    }
                    '[' | '{' => self.push_state(ParseState::Expression),
                    _ => return Err(self.error(ErrorKind::ExpectedIndex)),
                },
                ParseState::BracketSpecifier => match ch {
                    '*' => {
                        self.wrap_top(Selector::list_projection)?;
                        self.set_state(ParseState::BracketSpecifier4);
                        self.advance();
                    }
                    ']' => {
                        self.wrap_top(Selector::flatten_projection)?;
                        self.pop_state();
                        self.advance();
                    }
                    '?' => {
                        self.open_scope();
                        self.set_state(ParseState::Comparator);
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    ':' => {
                        self.set_state(ParseState::BracketSpecifier2);
                        self.push_state(ParseState::Number);
                        self.advance();
                    }
                    '-' | '0'..='9' => {
                        self.set_state(ParseState::BracketSpecifier9);
                        self.push_state(ParseState::Number);
                    }
                    _ => {
                        // bare multi-select-list projects over the current value
                        self.wrap_top(Selector::list_projection)?;
                        self.open_scope();
                        self.set_state(ParseState::ExpectRightBracket4);
                        self.push_state(ParseState::Expression);
                    }
                },
                ParseState::MultiSelectHash => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    _ => {
                        // a hash applies directly to its input; only the
                        // nested scope is opened here
                        self.open_scope();
                        self.set_state(ParseState::KeyValExpr);
                    }
                },
                ParseState::BracketSpecifier9 => match ch {
                    ']' => {
                        if self.buffer.is_empty() {
                            self.wrap_top(Selector::flatten_projection)?;
                        } else {
                            let index = self.parse_integer()?;
                            self.top()?.selector.add_selector(Selector::index(index));
                        }
                        self.pop_state();
                        self.advance();
                    }
                    ':' => {
                        if !self.buffer.is_empty() {
                            self.slice.start = self.parse_integer()?;
                        }
                        self.set_state(ParseState::BracketSpecifier2);
                        self.push_state(ParseState::Number);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                },
                ParseState::BracketSpecifier2 => {
                    if !self.buffer.is_empty() {
                        self.slice.end = Some(self.parse_integer()?);
                    }
                    match ch {
                        ']' => {
                            self.finish_slice()?;
                            self.pop_state();
                            self.advance();
                        }
                        ':' => {
                            self.set_state(ParseState::BracketSpecifier3);
                            self.push_state(ParseState::Number);
                            self.advance();
                        }
                        _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                    }
                }
                ParseState::BracketSpecifier3 => {
                    if !self.buffer.is_empty() {
                        let step = self.parse_integer()?;
                        if step == 0 {
                            return Err(self.error(ErrorKind::InvalidNumber));
                        }
                        self.slice.step = step;
                    }
                    match ch {
                        ']' => {
                            self.finish_slice()?;
                            self.pop_state();
                            self.advance();
                        }
                        _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                    }
                }
                ParseState::BracketSpecifier4 => match ch {
                    ']' => {
                        self.pop_state();
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                },
                ParseState::KeyValExpr => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    '"' => {
                        self.set_state(ParseState::ExpectColon);
                        self.push_state(ParseState::KeyExpr);
                        self.push_state(ParseState::QuotedString);
                        self.advance();
                    }
                    c if is_identifier_start(c) => {
                        self.set_state(ParseState::ExpectColon);
                        self.push_state(ParseState::KeyExpr);
                        self.push_state(ParseState::UnquotedString);
                        self.buffer.push(c);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedKey)),
                },
                ParseState::Comparator => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    '.' => {
                        self.advance();
                        self.push_state(ParseState::Expression);
                    }
                    '<' => {
                        self.set_state(ParseState::CmpLtOrLte);
                        self.advance();
                    }
                    '=' => {
                        self.set_state(ParseState::CmpEq);
                        self.advance();
                    }
                    '>' => {
                        self.set_state(ParseState::CmpGtOrGte);
                        self.advance();
                    }
                    '!' => {
                        self.set_state(ParseState::CmpNe);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedComparator)),
                },
                ParseState::CmpLtOrLte => match ch {
                    '=' => {
                        self.begin_filter(Comparator::Lte)?;
                        self.advance();
                    }
                    _ => self.begin_filter(Comparator::Lt)?,
                },
                ParseState::CmpEq => match ch {
                    '=' => {
                        self.begin_filter(Comparator::Eq)?;
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedComparator)),
                },
                ParseState::CmpGtOrGte => match ch {
                    '=' => {
                        self.begin_filter(Comparator::Gte)?;
                        self.advance();
                    }
                    _ => self.begin_filter(Comparator::Gt)?,
                },
                ParseState::CmpNe => match ch {
                    '=' => {
                        self.begin_filter(Comparator::Ne)?;
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedComparator)),
                },
                ParseState::ExpectDot => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    '.' => {
                        self.pop_state();
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedDot)),
                },
                ParseState::ExpectRightBracket => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    ']' => {
                        self.pop_state();
                        let offset = self.pop_offset()?;
                        let mut drained = self.drain_from(offset)?.into_iter();
                        let Some(mut filter_entry) = drained.next() else {
                            return Err(self.error(ErrorKind::UnidentifiedError));
                        };
                        for extra in drained {
                            filter_entry.selector.add_selector(extra.selector);
                        }
                        // chain the filter after the enclosing selector;
                        // following steps apply to the filtered array
                        let top = self.top()?;
                        let previous =
                            std::mem::replace(&mut top.selector, Selector::sub_expression());
                        top.selector.add_selector(previous);
                        top.selector.add_selector(filter_entry.selector);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                },
                ParseState::ExpectRightBracket4 => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    ',' => {
                        self.selector_stack
                            .push(KeySelector::new(Selector::sub_expression()));
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    '[' => self.push_state(ParseState::Expression),
                    '.' => {
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    '|' => {
                        self.advance();
                        self.wrap_top(Selector::pipe)?;
                        self.push_state(ParseState::Expression);
                    }
                    ']' => {
                        self.pop_state();
                        let offset = self.pop_offset()?;
                        let selectors = self
                            .drain_from(offset)?
                            .into_iter()
                            .map(|entry| entry.selector)
                            .collect();
                        self.top()?
                            .selector
                            .add_selector(Selector::multi_select_list(selectors));
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedRightBracket)),
                },
                ParseState::ExpectRightBrace => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    ',' => {
                        self.selector_stack
                            .push(KeySelector::new(Selector::sub_expression()));
                        self.set_state(ParseState::KeyValExpr);
                        self.advance();
                    }
                    '[' | '{' => self.push_state(ParseState::Expression),
                    '.' => {
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    '}' => {
                        self.pop_state();
                        let offset = self.pop_offset()?;
                        let drained = self.drain_from(offset)?;
                        let mut entries = Vec::with_capacity(drained.len());
                        for entry in drained {
                            let Some(key) = entry.key else {
                                return Err(self.error(ErrorKind::ExpectedKey));
                            };
                            entries.push(Selector::name_expression(key, entry.selector));
                        }
                        self.top()?
                            .selector
                            .add_selector(Selector::multi_select_hash(entries));
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedRightBrace)),
                },
                ParseState::ExpectColon => match ch {
                    ' ' | '\t' | '\r' | '\n' => self.advance_past_space_character(),
                    ':' => {
                        self.set_state(ParseState::ExpectRightBrace);
                        self.push_state(ParseState::Expression);
                        self.advance();
                    }
                    _ => return Err(self.error(ErrorKind::ExpectedColon)),
                },
            }
        }

        // reduce an identifier left pending at end of input
        if self.state_stack.last() == Some(&ParseState::UnquotedString) {
            self.state_stack.pop();
        }
        let pending = self.state_stack.last().copied();
        if matches!(
            pending,
            Some(ParseState::ValExpr | ParseState::IdentifierOrFunctionExpr)
        ) && !self.buffer.is_empty()
        {
            let name = std::mem::take(&mut self.buffer);
            self.top()?.selector.add_selector(Selector::identifier(name));
            self.state_stack.pop();
        }

        if self.state_stack.len() > 1 {
            return Err(self.error(ErrorKind::UnexpectedEndOfInput));
        }
        match self.state_stack.pop() {
            Some(ParseState::SubExpression | ParseState::Expression) => {}
            _ => return Err(self.error(ErrorKind::UnexpectedEndOfInput)),
        }

        let Some(root) = self.selector_stack.pop() else {
            return Err(self.error(ErrorKind::UnidentifiedError));
        };
        if !self.selector_stack.is_empty() {
            return Err(self.error(ErrorKind::UnidentifiedError));
        }

        log::trace!("compiled jmespath expression {expression:?}");
        Ok(CompiledExpression {
            root: root.selector,
            line: self.line,
            column: self.column,
        })
    }

    fn advance(&mut self) {
        self.pos += 1;
        self.column += 1;
    }

    fn advance_past_space_character(&mut self) {
        match self.chars.get(self.pos) {
            Some(' ' | '\t') => {
                self.pos += 1;
                self.column += 1;
            }
            Some('\r') => {
                if self.chars.get(self.pos + 1) == Some(&'\n') {
                    self.pos += 1;
                }
                self.pos += 1;
                self.line += 1;
                self.column = 1;
            }
            Some('\n') => {
                self.pos += 1;
                self.line += 1;
                self.column = 1;
            }
            _ => {}
        }
    }

    fn error(&self, kind: ErrorKind) -> JmesPathError {
        JmesPathError::new(kind, self.line, self.column)
    }

    fn set_state(&mut self, state: ParseState) {
        if let Some(top) = self.state_stack.last_mut() {
            *top = state;
        }
    }

    fn push_state(&mut self, state: ParseState) {
        self.state_stack.push(state);
    }

    fn pop_state(&mut self) {
        self.state_stack.pop();
    }

    fn top(&mut self) -> JmesPathResult<&mut KeySelector> {
        let error = self.error(ErrorKind::UnidentifiedError);
        self.selector_stack.last_mut().ok_or(error)
    }

    /// Replace the top selector with `wrap(top)`, preserving any pending
    /// hash key on the entry.
    fn wrap_top(&mut self, wrap: impl FnOnce(Selector) -> Selector) -> JmesPathResult<()> {
        let entry = self.top()?;
        let inner = std::mem::replace(&mut entry.selector, Selector::sub_expression());
        entry.selector = wrap(inner);
        Ok(())
    }

    /// Push the selector-stack length onto the offset stack and open a
    /// fresh sub-expression for the nested construct.
    fn open_scope(&mut self) {
        self.offset_stack.push(self.selector_stack.len());
        self.selector_stack
            .push(KeySelector::new(Selector::sub_expression()));
    }

    fn pop_offset(&mut self) -> JmesPathResult<usize> {
        let error = self.error(ErrorKind::UnidentifiedError);
        self.offset_stack.pop().ok_or(error)
    }

    fn drain_from(&mut self, offset: usize) -> JmesPathResult<Vec<KeySelector>> {
        if offset == 0 || offset > self.selector_stack.len() {
            return Err(self.error(ErrorKind::UnidentifiedError));
        }
        Ok(self.selector_stack.split_off(offset))
    }

    /// Wrap the collected comparator lhs in a filter selector and move to
    /// parsing the right operand.
    fn begin_filter(&mut self, comparator: Comparator) -> JmesPathResult<()> {
        self.wrap_top(|lhs| Selector::filter(lhs, comparator))?;
        self.set_state(ParseState::ExpectRightBracket);
        self.push_state(ParseState::Expression);
        Ok(())
    }

    fn parse_integer(&mut self) -> JmesPathResult<i64> {
        let text = std::mem::take(&mut self.buffer);
        text.parse()
            .map_err(|_| self.error(ErrorKind::InvalidNumber))
    }

    fn finish_slice(&mut self) -> JmesPathResult<()> {
        let slice = std::mem::take(&mut self.slice);
        self.top()?.selector.add_selector(Selector::slice(slice));
        Ok(())
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
