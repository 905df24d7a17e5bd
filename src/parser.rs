//! Recursive-descent parser for the relaxed dialect.
//!
//! A single byte cursor advances through the input; the grammar is LL(1),
//! so the next production is always determined by the current
//! non-whitespace character (numbers use a short lookahead for signs and
//! leading dots). There is no backtracking and no token stream.
//!
//! Dialect extensions over plain JSON:
//!
//! - `//` line comments and `/* */` block comments count as whitespace
//! - trailing commas before `]` and `}`
//! - escape letters `\a \b \e \f \n \r \t \v` next to `\\` and `\"`; any
//!   other escaped character is kept literally without the backslash
//! - numbers may carry a leading `+` or start with a bare `.`
//!
//! Two quirks are kept deliberately: raw newline bytes inside a quoted
//! string are dropped from the result, and by default input after the
//! first top-level value is ignored ([`ParseOptions::reject_trailing`]
//! turns the latter into an error).

use std::collections::BTreeMap;

use crate::error::{Found, ParseError};
use crate::value::Value;

/// Per-call strictness and robustness knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum container nesting depth before the parse is aborted.
    pub max_depth: usize,
    /// Treat leftover input after the first top-level value as an error.
    pub reject_trailing: bool,
}

impl ParseOptions {
    /// Defaults: generous depth cap, leftover input ignored.
    pub const fn relaxed() -> Self {
        Self {
            max_depth: 128,
            reject_trailing: false,
        }
    }

    /// Like [`relaxed`](Self::relaxed), but leftover input is an error.
    pub const fn strict() -> Self {
        Self {
            max_depth: 128,
            reject_trailing: true,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::relaxed()
    }
}

/// Parse one document with default options.
///
/// On success returns the tree for the value read from offset 0. All
/// failures carry the offending input and its byte offset; no partial
/// tree is ever returned.
pub fn parse(input: &str) -> Result<Value, ParseError> {
    parse_with_options(input, ParseOptions::default())
}

/// Parse one document with explicit options.
pub fn parse_with_options(input: &str, options: ParseOptions) -> Result<Value, ParseError> {
    let mut parser = Parser::new(input, options);
    let value = parser.parse_element()?;
    if options.reject_trailing {
        parser.skip_trivia();
        if parser.peek().is_some() {
            return Err(ParseError::TrailingData {
                found: parser.found(),
                offset: parser.pos,
            });
        }
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    input: &'a [u8],
    pos: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, options: ParseOptions) -> Self {
        Self {
            src,
            input: src.as_bytes(),
            pos: 0,
            depth: 0,
            options,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input.get(self.pos + offset).copied()
    }

    /// The character under the cursor, for diagnostics.
    fn found(&self) -> Found {
        match self.src.get(self.pos..).and_then(|rest| rest.chars().next()) {
            Some(c) => Found::Char(c),
            None => Found::Eof,
        }
    }

    fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::Unexpected {
            expected: expected.into(),
            found: self.found(),
            offset: self.pos,
        }
    }

    fn expect_byte(&mut self, expected: u8) -> Result<(), ParseError> {
        if self.peek() == Some(expected) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(format!("'{}'", expected as char)))
        }
    }

    fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.options.max_depth {
            return Err(ParseError::TooDeep {
                limit: self.options.max_depth,
                offset: self.pos,
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Skip whitespace, `//` line comments, and `/* */` block comments.
    /// Safe to call at end of input; an unterminated block comment runs to
    /// the end without error.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => self.pos += 1,
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    self.pos += 2;
                    while let Some(b) = self.peek() {
                        self.pos += 1;
                        if b == b'\n' {
                            break;
                        }
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.pos += 2;
                    while let Some(b) = self.peek() {
                        if b == b'*' && self.peek_at(1) == Some(b'/') {
                            self.pos += 2;
                            break;
                        }
                        self.pos += 1;
                    }
                }
                _ => break,
            }
        }
    }

    /// Dispatch on the current character. The callers handle trivia after
    /// the element, so only leading trivia is consumed here.
    fn parse_element(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia();
        match self.peek() {
            Some(b'[') => self.parse_array(),
            Some(b'{') => self.parse_object(),
            Some(b'"') => Ok(Value::String(self.parse_string()?)),
            Some(_) if self.at_number_start() => self.parse_number(),
            Some(_) if self.rest().starts_with(b"true") => {
                self.pos += 4;
                Ok(Value::TRUE)
            }
            Some(_) if self.rest().starts_with(b"false") => {
                self.pos += 5;
                Ok(Value::FALSE)
            }
            Some(_) if self.rest().starts_with(b"null") => {
                self.pos += 4;
                Ok(Value::NULL)
            }
            _ => Err(self.unexpected("a value")),
        }
    }

    fn rest(&self) -> &[u8] {
        self.input.get(self.pos..).unwrap_or(&[])
    }

    /// Lookahead for the number production: a digit, a dot followed by a
    /// digit, or a sign in front of either.
    fn at_number_start(&self) -> bool {
        match self.peek() {
            Some(b'0'..=b'9') => true,
            Some(b'.') => matches!(self.peek_at(1), Some(b'0'..=b'9')),
            Some(b'-' | b'+') => match self.peek_at(1) {
                Some(b'0'..=b'9') => true,
                Some(b'.') => matches!(self.peek_at(2), Some(b'0'..=b'9')),
                _ => false,
            },
            _ => false,
        }
    }

    /// Integers, decimals, and scientific notation.
    ///
    /// Digit accumulation wraps on 64-bit overflow rather than failing.
    /// A `.` or an exponent marker commits the result to a float; an
    /// exponent always scales through a floating-point power, so even
    /// `5e0` comes out as a float.
    fn parse_number(&mut self) -> Result<Value, ParseError> {
        let negative = self.peek() == Some(b'-');
        if let Some(b'-' | b'+') = self.peek() {
            self.pos += 1;
        }

        let mut int_acc: i64 = 0;
        let mut float_acc: f64 = 0.0;
        let mut is_float = false;
        let mut seen_digit = false;
        let mut frac_depth: i32 = 1;

        loop {
            match self.peek() {
                Some(b'.') if !is_float => {
                    is_float = true;
                    float_acc = int_acc as f64;
                    self.pos += 1;
                }
                Some(b'e' | b'E') => {
                    self.pos += 1;
                    let exp_negative = self.peek() == Some(b'-');
                    if let Some(b'-' | b'+') = self.peek() {
                        self.pos += 1;
                    }
                    seen_digit = false;
                    let mut exponent: i32 = 0;
                    while let Some(digit @ b'0'..=b'9') = self.peek() {
                        seen_digit = true;
                        exponent = exponent.wrapping_mul(10).wrapping_add((digit - b'0') as i32);
                        self.pos += 1;
                    }
                    let scale = 10f64.powi(if exp_negative { -exponent } else { exponent });
                    float_acc = if is_float {
                        float_acc * scale
                    } else {
                        int_acc as f64 * scale
                    };
                    is_float = true;
                    break;
                }
                Some(digit @ b'0'..=b'9') => {
                    seen_digit = true;
                    if is_float {
                        float_acc += (digit - b'0') as f64 * 10f64.powi(-frac_depth);
                        frac_depth += 1;
                    } else {
                        int_acc = int_acc.wrapping_mul(10).wrapping_add((digit - b'0') as i64);
                    }
                    self.pos += 1;
                }
                _ => break,
            }
        }

        if !seen_digit {
            return Err(self.unexpected("a digit"));
        }
        if is_float {
            Ok(Value::Float(if negative { -float_acc } else { float_acc }))
        } else {
            Ok(Value::Int(if negative {
                int_acc.wrapping_neg()
            } else {
                int_acc
            }))
        }
    }

    /// Scan to the unescaped closing quote, then decode the body.
    ///
    /// Raw newline bytes inside the quotes are dropped; an escaped
    /// character with no short form is kept and its backslash lost.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        self.expect_byte(b'"')?;
        let start = self.pos;
        while let Some(b) = self.peek() {
            match b {
                b'\\' => {
                    self.pos += 1;
                    if self.peek().is_some() {
                        self.pos += 1;
                    }
                }
                b'"' => {
                    let body = self.src.get(start..self.pos).unwrap_or("");
                    self.pos += 1;
                    return Ok(unescape(body));
                }
                _ => self.pos += 1,
            }
        }
        Err(self.unexpected("'\"'"))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        self.expect_byte(b'[')?;
        self.enter()?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(b']') {
                self.pos += 1;
                break;
            }
            items.push(self.parse_element()?);
            self.skip_trivia();
            match self.peek() {
                Some(b']') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => self.pos += 1,
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
        self.leave();
        Ok(Value::Array(items))
    }

    fn parse_object(&mut self) -> Result<Value, ParseError> {
        self.expect_byte(b'{')?;
        self.enter()?;
        let mut map = BTreeMap::new();
        loop {
            self.skip_trivia();
            if self.peek() == Some(b'}') {
                self.pos += 1;
                break;
            }
            let key = self.parse_string()?;
            self.skip_trivia();
            self.expect_byte(b':')?;
            let value = self.parse_element()?;
            // a repeated key keeps its first value
            map.entry(key).or_insert(value);
            self.skip_trivia();
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    break;
                }
                Some(b',') => self.pos += 1,
                _ => return Err(self.unexpected("',' or '}'")),
            }
        }
        self.leave();
        Ok(Value::Object(map))
    }
}

/// Resolve the escape letter after a backslash. Characters without a short
/// form map to themselves, which also covers `\\` and `\"`.
fn unescape_char(c: char) -> char {
    match c {
        'a' => '\x07',
        'b' => '\x08',
        'e' => '\x1b',
        'f' => '\x0c',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        other => other,
    }
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\n' => {}
            '\\' => {
                if let Some(escaped) = chars.next() {
                    out.push(unescape_char(escaped));
                }
            }
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Found, ParseError};
    use crate::value::{Literal, Value};

    #[test]
    fn test_parse_literals() {
        assert_eq!(parse("null").unwrap(), Value::NULL);
        assert_eq!(parse("true").unwrap(), Value::TRUE);
        assert_eq!(parse("false").unwrap(), Value::FALSE);
    }

    #[test]
    fn test_parse_integers() {
        assert_eq!(parse("0").unwrap(), Value::Int(0));
        assert_eq!(parse("42").unwrap(), Value::Int(42));
        assert_eq!(parse("-123").unwrap(), Value::Int(-123));
        assert_eq!(parse("+7").unwrap(), Value::Int(7));
    }

    #[test]
    fn test_integer_accumulation_wraps() {
        // one past i64::MAX wraps around instead of failing
        assert_eq!(parse("9223372036854775808").unwrap(), Value::Int(i64::MIN));
    }

    #[test]
    fn test_parse_floats() {
        assert_eq!(parse("1.5").unwrap(), Value::Float(1.5));
        assert_eq!(parse("-0.25").unwrap(), Value::Float(-0.25));
        assert_eq!(parse(".5").unwrap(), Value::Float(0.5));
        assert_eq!(parse("2.").unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_exponent_always_floats() {
        assert_eq!(parse("5e1").unwrap(), Value::Float(50.0));
        assert_eq!(parse("5e0").unwrap(), Value::Float(5.0));
        assert_eq!(parse("5E-1").unwrap(), Value::Float(0.5));
        assert_eq!(parse("2.5e2").unwrap(), Value::Float(250.0));
        assert!(parse("5.0").unwrap().is_float());
    }

    #[test]
    fn test_exponent_without_digits_is_an_error() {
        let err = parse("5e").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unexpected {
                found: Found::Eof,
                ..
            }
        ));
        assert!(parse("5e+").is_err());
    }

    #[test]
    fn test_parse_strings() {
        assert_eq!(parse(r#""hello""#).unwrap(), Value::string("hello"));
        assert_eq!(parse(r#""""#).unwrap(), Value::string(""));
        assert_eq!(parse(r#""a\nb""#).unwrap(), Value::string("a\nb"));
        assert_eq!(
            parse(r#""\a\b\e\f\n\r\t\v""#).unwrap(),
            Value::string("\x07\x08\x1b\x0c\n\r\t\x0b")
        );
        assert_eq!(parse(r#""q\"q""#).unwrap(), Value::string("q\"q"));
        assert_eq!(parse(r#""c:\\dir""#).unwrap(), Value::string("c:\\dir"));
    }

    #[test]
    fn test_unknown_escape_passes_through() {
        assert_eq!(parse(r#""\q\/""#).unwrap(), Value::string("q/"));
    }

    #[test]
    fn test_raw_newline_in_string_is_dropped() {
        assert_eq!(parse("\"a\nb\"").unwrap(), Value::string("ab"));
    }

    #[test]
    fn test_escaped_newline_survives() {
        // the escape wins over the raw-newline drop
        assert_eq!(parse("\"a\\\nb\"").unwrap(), Value::string("a\nb"));
    }

    #[test]
    fn test_non_ascii_strings() {
        assert_eq!(parse("\"héllo\"").unwrap(), Value::string("héllo"));
        assert_eq!(parse("\"日本語\"").unwrap(), Value::string("日本語"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse("\"abc").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unexpected {
                found: Found::Eof,
                offset: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_arrays() {
        assert_eq!(parse("[]").unwrap(), Value::array([]));
        assert_eq!(
            parse("[1, 2, 3]").unwrap(),
            Value::array([Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        assert_eq!(
            parse("[null, [true]]").unwrap(),
            Value::array([Value::NULL, Value::array([Value::TRUE])])
        );
    }

    #[test]
    fn test_trailing_commas() {
        assert_eq!(
            parse("[1,2,3,]").unwrap(),
            Value::array([Value::Int(1), Value::Int(2), Value::Int(3)])
        );
        let value = parse(r#"{"a":1,}"#).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_parse_objects() {
        let value = parse(r#"{"a": 1, "b": 2}"#).unwrap();
        let mut expected = BTreeMap::new();
        expected.insert("a".to_string(), Value::Int(1));
        expected.insert("b".to_string(), Value::Int(2));
        assert_eq!(value, Value::Object(expected));
        assert_eq!(parse("{}").unwrap(), Value::Object(BTreeMap::new()));
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let value = parse(r#"{"k": 1, "k": 2}"#).unwrap();
        assert_eq!(value.get("k"), Some(&Value::Int(1)));
        assert_eq!(value.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_comments_are_trivia() {
        assert_eq!(parse("// note\n1").unwrap(), Value::Int(1));
        assert_eq!(parse("/* note */ 1").unwrap(), Value::Int(1));
        assert_eq!(
            parse("[1, // first\n 2, /* second */ 3]").unwrap(),
            parse("[1,2,3]").unwrap()
        );
        assert_eq!(
            parse("{ /* k */ \"a\" /* v */ : 1 }").unwrap(),
            parse("{\"a\":1}").unwrap()
        );
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_eof() {
        assert_eq!(parse("1 /* never closed").unwrap(), Value::Int(1));
        let err = parse("/* never closed").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unexpected {
                found: Found::Eof,
                ..
            }
        ));
    }

    #[test]
    fn test_adjacent_comment_terminators() {
        assert_eq!(parse("/**/1").unwrap(), Value::Int(1));
        assert_eq!(parse("/***/1").unwrap(), Value::Int(1));
        assert_eq!(parse("/* * / */1").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_trailing_input_ignored_by_default() {
        assert_eq!(parse("1 garbage").unwrap(), Value::Int(1));
        assert_eq!(parse("nullx").unwrap(), Value::NULL);
    }

    #[test]
    fn test_reject_trailing_option() {
        let err = parse_with_options("1 garbage", ParseOptions::strict()).unwrap_err();
        assert!(matches!(
            err,
            ParseError::TrailingData {
                found: Found::Char('g'),
                offset: 2,
            }
        ));
        // trivia after the document is still fine
        assert!(parse_with_options("1 // done", ParseOptions::strict()).is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::relaxed()
        };
        assert!(parse_with_options("[[1]]", options).is_ok());
        let err = parse_with_options("[[[1]]]", options).unwrap_err();
        assert!(matches!(err, ParseError::TooDeep { limit: 2, .. }));
    }

    #[test]
    fn test_error_carries_offset_and_character() {
        let err = parse("{\"a\" 1}").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "':'".to_string(),
                found: Found::Char('1'),
                offset: 5,
            }
        );

        let err = parse("[1 2]").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "',' or ']'".to_string(),
                found: Found::Char('2'),
                offset: 3,
            }
        );
    }

    #[test]
    fn test_eof_errors() {
        assert!(matches!(
            parse("").unwrap_err(),
            ParseError::Unexpected {
                found: Found::Eof,
                offset: 0,
                ..
            }
        ));
        assert!(matches!(
            parse("[1,").unwrap_err(),
            ParseError::Unexpected {
                found: Found::Eof,
                ..
            }
        ));
        assert!(matches!(
            parse("{\"a\":").unwrap_err(),
            ParseError::Unexpected {
                found: Found::Eof,
                ..
            }
        ));
    }

    #[test]
    fn test_unrecognized_token() {
        let err = parse("bogus").unwrap_err();
        assert_eq!(
            err,
            ParseError::Unexpected {
                expected: "a value".to_string(),
                found: Found::Char('b'),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_object_key_must_be_a_string() {
        let err = parse("{a: 1}").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Unexpected {
                found: Found::Char('a'),
                offset: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_literal_with_nested_everything() {
        let value = parse(
            r#"{
                // per-feature switches
                "features": [true, false, null,],
                "limits": { "depth": 4, "ratio": .5 },
            }"#,
        )
        .unwrap();
        let features = value.get("features").unwrap();
        assert_eq!(
            features.as_array().unwrap(),
            &[Value::TRUE, Value::FALSE, Value::NULL][..]
        );
        assert_eq!(
            value.get("limits").and_then(|l| l.get("ratio")),
            Some(&Value::Float(0.5))
        );
        assert_eq!(value.as_object().unwrap().len(), 2);
        assert_eq!(
            value.get("features").unwrap().as_array().unwrap()[0].as_literal(),
            Ok(Literal::True)
        );
    }
}
