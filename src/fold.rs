use crate::ast::{ArithOp, LiteralKind};
use regex::Regex;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$")
            .expect("number pattern is valid")
    })
}

pub fn normalize_literal(kind: LiteralKind, raw: &str) -> String {
    match kind {
        LiteralKind::Number | LiteralKind::Float => raw.trim().to_string(),
        LiteralKind::String => unquote(raw),
    }
}

/// Strips one pair of matching quotes and decodes backslash escapes.
pub fn unquote(raw: &str) -> String {
    let inner = ['"', '\'']
        .iter()
        .find_map(|quote| {
            raw.strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
                .filter(|_| raw.len() >= 2)
        })
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other @ ('\\' | '"' | '\'')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Decimal literals only; `inf` and `nan` stay text.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if !number_pattern().is_match(text) {
        return None;
    }
    text.parse::<f64>().ok()
}

pub fn format_number(v: f64) -> Option<String> {
    if !v.is_finite() {
        return None;
    }
    if v == 0.0 {
        return Some("0".to_string());
    }
    let magnitude = v.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let text = format!("{:e}", v);
        return Some(match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        });
    }
    Some(format!("{}", v))
}

pub fn fold_arith(op: ArithOp, lhs: &str, rhs: &str) -> Option<String> {
    if op == ArithOp::Join {
        return Some(format!("{}{}", lhs, rhs));
    }
    let a = parse_number(lhs)?;
    let b = parse_number(rhs)?;
    format_number(evaluate(op, a, b)?)
}

fn evaluate(op: ArithOp, x: f64, y: f64) -> Option<f64> {
    let value = match op {
        ArithOp::Add => x + y,
        ArithOp::Sub => x - y,
        ArithOp::Mul => x * y,
        ArithOp::Div if y == 0.0 => return None,
        ArithOp::Div => x / y,
        ArithOp::Mod if y == 0.0 => return None,
        ArithOp::Mod => {
            let r = x % y;
            if r != 0.0 && (r < 0.0) != (y < 0.0) {
                r + y
            } else {
                r
            }
        }
        ArithOp::Join => return None,
    };
    value.is_finite().then_some(value)
}

pub fn negate_literal(text: &str) -> String {
    match text.strip_prefix('-') {
        Some(rest) => rest.to_string(),
        None => format!("-{}", text),
    }
}

pub fn fold_sqrt(text: &str) -> Option<String> {
    let value = parse_number(text)?;
    if value < 0.0 {
        return None;
    }
    format_number(value.sqrt())
}
