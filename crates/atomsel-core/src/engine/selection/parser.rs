//! Tokenizer and grammar of the selection language.
//!
//! The grammar is flat: a token list is split on its first `or`, otherwise on its
//! first `and`, otherwise a leading `not` negates the rest, otherwise the tokens
//! must form a single clause. Parentheses are not part of the language.

use super::keywords::KeywordTable;
use super::node::{CompareOp, Node, Special};
use crate::core::models::field::{Field, FieldKind};

fn is_operator_byte(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'=')
}

/// Splits a query into tokens on whitespace and around comparison operators.
///
/// Returns `None` if the query contains a parenthesis.
pub fn tokenize(query: &str) -> Option<Vec<&str>> {
    if query.contains(['(', ')']) {
        return None;
    }
    let mut tokens = Vec::new();
    for word in query.split_whitespace() {
        let bytes = word.as_bytes();
        let mut start = 0;
        let mut i = 0;
        while i < bytes.len() {
            if is_operator_byte(bytes[i]) {
                if start < i {
                    tokens.push(&word[start..i]);
                }
                let op_start = i;
                while i < bytes.len() && is_operator_byte(bytes[i]) {
                    i += 1;
                }
                tokens.push(&word[op_start..i]);
                start = i;
            } else {
                i += 1;
            }
        }
        if start < bytes.len() {
            tokens.push(&word[start..]);
        }
    }
    Some(tokens)
}

/// Parses rewritten tokens into a selection tree; `None` on any syntax error.
pub(crate) fn parse(tokens: &[&str], keywords: &KeywordTable) -> Option<Node> {
    if tokens.is_empty() {
        return None;
    }
    if let Some(at) = tokens.iter().position(|t| *t == "or") {
        let lhs = parse(&tokens[..at], keywords)?;
        let rhs = parse(&tokens[at + 1..], keywords)?;
        return Some(Node::Or(Box::new(lhs), Box::new(rhs)));
    }
    if let Some(at) = tokens.iter().position(|t| *t == "and") {
        let lhs = parse(&tokens[..at], keywords)?;
        let rhs = parse(&tokens[at + 1..], keywords)?;
        return Some(Node::And(Box::new(lhs), Box::new(rhs)));
    }
    if tokens[0] == "not" {
        return Some(Node::Not(Box::new(parse(&tokens[1..], keywords)?)));
    }
    clause(tokens, keywords)
}

fn clause(tokens: &[&str], keywords: &KeywordTable) -> Option<Node> {
    let (&keyword, rest) = tokens.split_first()?;
    if let Some(field) = keywords.numeric_field(keyword) {
        let (op, literal) = operand(rest)?;
        return numeric_clause(field, op, literal);
    }
    if let Some(field) = keywords.text_field(keyword) {
        let (op, literal) = operand(rest)?;
        return text_clause(field, op, literal);
    }
    if rest.is_empty() {
        return keyword.parse::<Special>().ok().map(Node::Special);
    }
    None
}

// `<value>` alone means equality.
fn operand<'q>(rest: &[&'q str]) -> Option<(CompareOp, &'q str)> {
    match rest {
        [value] => Some((CompareOp::Eq, *value)),
        [op, value] => Some((op.parse().ok()?, *value)),
        _ => None,
    }
}

fn numeric_clause(field: Field, op: CompareOp, literal: &str) -> Option<Node> {
    match field.kind() {
        FieldKind::Integer => Some(Node::Int {
            field,
            get: field.int_accessor()?,
            op,
            value: literal.parse().ok()?,
        }),
        FieldKind::Float => {
            let value: f64 = literal.parse().ok()?;
            if !value.is_finite() {
                return None;
            }
            Some(Node::Float {
                field,
                get: field.float_accessor()?,
                op,
                value,
            })
        }
        FieldKind::Text => None,
    }
}

fn is_text_literal(literal: &str) -> bool {
    !literal.is_empty()
        && literal
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '\'' | '*' | '+' | '-' | '_'))
}

fn text_clause(field: Field, op: CompareOp, literal: &str) -> Option<Node> {
    if !is_text_literal(literal) {
        return None;
    }
    Some(Node::Text {
        field,
        get: field.text_accessor()?,
        op,
        value: literal.to_string(),
    })
}
