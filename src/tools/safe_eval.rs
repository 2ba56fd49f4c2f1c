//! Single-comparison condition evaluator
//!
//! Evaluates strings of the form `operand1 <op> operand2`, where `<op>` is one of
//! `==`, `>=`, `<=`, `!=`, `>` or `<`. Both operands are compared as numbers when both
//! parse as numbers, otherwise as plain strings. Whitespace around the operator is
//! ignored; whitespace inside an operand is kept.
//!
//! Only the first operator splits the expression. Anything after it, further operators
//! included, is the second operand, so `1 == 1 == 1` compares `"1"` with `"1 == 1"`.
//! Anything that does not contain an operator evaluates to `false`. Hex, octal and binary
//! integer literals (`0x10`) count as numbers.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Operator {
    /// Longer tokens first so `>=` wins over `>` at the same position.
    const TOKENS: [(&'static str, Self); 6] = [
        ("==", Self::Eq),
        (">=", Self::Ge),
        ("<=", Self::Le),
        ("!=", Self::Ne),
        (">", Self::Gt),
        ("<", Self::Lt),
    ];

    fn accepts(self, ordering: Option<Ordering>) -> bool {
        match (self, ordering) {
            (_, None) => self == Self::Ne,
            (Self::Eq, Some(o)) => o == Ordering::Equal,
            (Self::Ne, Some(o)) => o != Ordering::Equal,
            (Self::Gt, Some(o)) => o == Ordering::Greater,
            (Self::Ge, Some(o)) => o != Ordering::Less,
            (Self::Lt, Some(o)) => o == Ordering::Less,
            (Self::Le, Some(o)) => o != Ordering::Greater,
        }
    }
}

struct Comparison<'a> {
    left: &'a str,
    operator: Operator,
    right: &'a str,
}

/// Evaluate a single comparison. Malformed input is `false`, never an error.
#[must_use]
pub fn evaluate(expression: &str) -> bool {
    let Some(comparison) = split(expression) else {
        return false;
    };

    let ordering = match (parse_number(comparison.left), parse_number(comparison.right)) {
        (Some(left), Some(right)) => left.partial_cmp(&right),
        _ => Some(comparison.left.cmp(comparison.right)),
    };
    comparison.operator.accepts(ordering)
}

/// The comparison comes from the first line that holds an operator. Neither operand
/// crosses a line break.
fn split(expression: &str) -> Option<Comparison<'_>> {
    expression.lines().find_map(split_line)
}

fn split_line(line: &str) -> Option<Comparison<'_>> {
    for (position, _) in line.char_indices() {
        let rest = &line[position..];
        let found = Operator::TOKENS
            .iter()
            .find(|(token, _)| rest.starts_with(token));
        if let Some((token, operator)) = found {
            return Some(Comparison {
                left: line[..position].trim_end(),
                operator: *operator,
                right: rest[token.len()..].trim_start(),
            });
        }
    }
    None
}

/// Numeric reading of an operand, following the lenient rules used by the header
/// templates: surrounding whitespace is ignored and an empty operand reads as zero.
fn parse_number(operand: &str) -> Option<f64> {
    let trimmed = operand.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    if let Some(n) = parse_radix_literal(trimmed) {
        return Some(n);
    }
    if trimmed.trim_start_matches(['+', '-']) == "Infinity" {
        return trimmed.parse::<f64>().ok();
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
}

/// Unsigned `0x`, `0o` and `0b` integer literals.
fn parse_radix_literal(operand: &str) -> Option<f64> {
    let (prefix, digits) = operand.split_at_checked(2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}
