//! Rendering a [`Value`] tree back to text.
//!
//! Both entry points are pure functions of the tree. Object entries come
//! out in ascending key order in either mode; the underlying map makes
//! that structural rather than a sorting step.

use crate::value::{Literal, Value};

/// Render with newlines and four-space indentation.
///
/// Every array element and object entry sits on its own line. Interior
/// separators are always emitted; `trailing_separator` decides whether the
/// final element of each non-empty container also gets one before the
/// closing bracket.
pub fn render_pretty(value: &Value, trailing_separator: bool) -> String {
    let mut out = String::new();
    pretty_value(value, trailing_separator, 0, &mut out);
    out
}

/// Render without any inserted whitespace and without trailing separators.
pub fn render_minified(value: &Value) -> String {
    let mut out = String::new();
    minified_value(value, &mut out);
    out
}

fn pretty_value(value: &Value, trailing: bool, depth: usize, out: &mut String) {
    match value {
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => push_float(*f, out),
        Value::String(s) => quote(s, out),
        Value::Literal(lit) => out.push_str(literal_text(*lit)),
        Value::Array(items) => {
            out.push_str("[\n");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(depth + 1, out);
                pretty_value(item, trailing, depth + 1, out);
            }
            if !items.is_empty() {
                out.push_str(if trailing { ",\n" } else { "\n" });
            }
            indent(depth, out);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str("{\n");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                indent(depth + 1, out);
                quote(key, out);
                out.push_str(" : ");
                pretty_value(item, trailing, depth + 1, out);
            }
            if !map.is_empty() {
                out.push_str(if trailing { ",\n" } else { "\n" });
            }
            indent(depth, out);
            out.push('}');
        }
    }
}

fn minified_value(value: &Value, out: &mut String) {
    match value {
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => push_float(*f, out),
        Value::String(s) => quote(s, out),
        Value::Literal(lit) => out.push_str(literal_text(*lit)),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                minified_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                quote(key, out);
                out.push(':');
                minified_value(item, out);
            }
            out.push('}');
        }
    }
}

fn literal_text(lit: Literal) -> &'static str {
    match lit {
        Literal::True => "true",
        Literal::False => "false",
        Literal::Null => "null",
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("    ");
    }
}

/// Escape letter for characters with a short form; identity otherwise.
fn escape_char(c: char) -> char {
    match c {
        '\x07' => 'a',
        '\x08' => 'b',
        '\x1b' => 'e',
        '\x0c' => 'f',
        '\n' => 'n',
        '\r' => 'r',
        '\t' => 't',
        '\x0b' => 'v',
        other => other,
    }
}

/// Quote a string, escaping the same set the parser resolves plus the
/// quote and backslash themselves.
fn quote(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        if c == '\\' || c == '"' || escape_char(c) != c {
            out.push('\\');
            out.push(escape_char(c));
        } else {
            out.push(c);
        }
    }
    out.push('"');
}

/// Shortest form that still reads back as a float: `{:?}` keeps a decimal
/// point or exponent for every finite value.
fn push_float(f: f64, out: &mut String) {
    out.push_str(&format!("{f:?}"));
}
