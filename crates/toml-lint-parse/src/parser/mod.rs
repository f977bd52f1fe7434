//! Strict recursive-descent parser for TOML 1.0.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, trace};

use crate::error::{ParseError, ParseErrorKind};
use crate::namespace::{Flag, Flags, append_nest_to_list, get_or_create_nest};
use crate::value::{Date, Datetime, Offset, Table, Time, Value};

const TIME: &str = r"([01][0-9]|2[0-3]):([0-5][0-9]):([0-5][0-9])(?:\.([0-9]{1,6})[0-9]*)?";

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:0(?:x[0-9A-Fa-f](?:_?[0-9A-Fa-f])*|b[01](?:_?[01])*|o[0-7](?:_?[0-7])*)",
        r"|[+-]?(?:0|[1-9](?:_?[0-9])*)",
        r"(?P<floatpart>(?:\.[0-9](?:_?[0-9])*)?(?:[eE][+-]?[0-9](?:_?[0-9])*)?))",
    ))
    .unwrap()
});

static RE_LOCALTIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{TIME}")).unwrap());

static RE_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        concat!(
            r"^([0-9]{{4}})-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])",
            r"(?:[Tt ]{}(?:([Zz])|([+-])([01][0-9]|2[0-3]):([0-5][0-9]))?)?",
        ),
        TIME
    ))
    .unwrap()
});

/// How deeply arrays and inline tables may nest inside one another.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Parse a TOML document into a table, stopping at the first error.
pub fn parse(source: &str) -> Result<Table, ParseError> {
    let normalized = source.replace("\r\n", "\n");
    Parser::new(&normalized).parse()
}

/// Check that `source` is a valid TOML document.
pub fn validate(source: &str) -> Result<(), ParseError> {
    parse(source).map(|_| ())
}

/// Parse `source` as exactly one value, such as `1_000`, `"text"` or
/// `1979-05-27`. Anything left over after the value is an error.
pub fn parse_value(source: &str) -> Result<Value, ParseError> {
    let normalized = source.replace("\r\n", "\n");
    let mut parser = Parser::new(&normalized);
    let value = parser.parse_value()?;
    if parser.pos < parser.src.len() {
        return Err(parser.error(ParseErrorKind::InvalidValue));
    }
    Ok(value)
}

/// Parser state over newline-normalized source.
struct Parser<'src> {
    src: &'src str,
    pos: usize,
    data: Table,
    flags: Flags,
    /// Arrays and inline tables currently open.
    depth: usize,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str) -> Self {
        Self {
            src,
            pos: 0,
            data: Table::new(),
            flags: Flags::default(),
            depth: 0,
        }
    }

    fn parse(mut self) -> Result<Table, ParseError> {
        let mut header: Vec<String> = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(c) = self.peek() else {
                break;
            };

            if c == '\n' {
                self.pos += 1;
                continue;
            }

            if is_key_initial(c) {
                self.key_value_rule(&header)?;
                self.skip_whitespace();
            } else if c == '[' {
                self.flags.finalize_pending();
                header = if self.rest().starts_with("[[") {
                    self.create_list_rule()?
                } else {
                    self.create_dict_rule()?
                };
                trace!(header = %render_key(&header), "section");
                self.skip_whitespace();
            } else if c != '#' {
                return Err(self.error(ParseErrorKind::InvalidStatement));
            }

            self.skip_comment()?;
            match self.peek() {
                None => break,
                Some('\n') => self.pos += 1,
                Some(_) => return Err(self.error(ParseErrorKind::ExpectedNewline)),
            }
        }

        debug!(keys = self.data.len(), "parsed document");
        Ok(self.data)
    }

    // === Scanning ===

    fn rest(&self) -> &'src str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::at(self.src, self.pos, kind)
    }

    fn skip_while(&mut self, pred: impl Fn(char) -> bool) {
        let len = self
            .rest()
            .find(|c: char| !pred(c))
            .unwrap_or(self.rest().len());
        self.pos += len;
    }

    fn skip_whitespace(&mut self) {
        self.skip_while(is_whitespace);
    }

    fn skip_whitespace_and_newlines(&mut self) {
        self.skip_while(|c| is_whitespace(c) || c == '\n');
    }

    /// Move to the next occurrence of `expect`, rejecting illegal characters
    /// on the way. Without `error_on_eof`, a missing `expect` moves to the end.
    fn skip_until(
        &mut self,
        expect: &'static str,
        illegal: fn(char) -> bool,
        error_on_eof: bool,
    ) -> Result<(), ParseError> {
        let end = match self.rest().find(expect) {
            Some(i) => self.pos + i,
            None if error_on_eof => {
                return Err(ParseError::at(
                    self.src,
                    self.src.len(),
                    ParseErrorKind::Expected(expect),
                ));
            }
            None => self.src.len(),
        };

        if let Some((i, c)) = self.src[self.pos..end]
            .char_indices()
            .find(|(_, c)| illegal(*c))
        {
            self.pos += i;
            return Err(self.error(ParseErrorKind::InvalidCharacter(c)));
        }

        self.pos = end;
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        if self.peek() == Some('#') {
            self.pos += 1;
            self.skip_until("\n", is_illegal_basic_char, false)?;
        }
        Ok(())
    }

    fn skip_comments_and_array_whitespace(&mut self) -> Result<(), ParseError> {
        loop {
            let before = self.pos;
            self.skip_whitespace_and_newlines();
            self.skip_comment()?;
            if self.pos == before {
                return Ok(());
            }
        }
    }

    // === Statements ===

    fn create_dict_rule(&mut self) -> Result<Vec<String>, ParseError> {
        // Skip "["
        self.pos += 1;
        self.skip_whitespace();
        let key = self.parse_key()?;

        if self.flags.is(&key, Flag::ExplicitNest) || self.flags.is(&key, Flag::Frozen) {
            return Err(self.error(ParseErrorKind::DuplicateTable {
                key: render_key(&key),
            }));
        }
        self.flags.set(&key, Flag::ExplicitNest, false);

        let (src, pos) = (self.src, self.pos);
        get_or_create_nest(&mut self.data, &key, true)
            .map_err(|_| ParseError::at(src, pos, ParseErrorKind::OverwriteValue))?;

        if self.peek() != Some(']') {
            return Err(self.error(ParseErrorKind::UnclosedTableHeader));
        }
        self.pos += 1;
        Ok(key)
    }

    fn create_list_rule(&mut self) -> Result<Vec<String>, ParseError> {
        // Skip "[["
        self.pos += 2;
        self.skip_whitespace();
        let key = self.parse_key()?;

        if self.flags.is(&key, Flag::Frozen) {
            return Err(self.error(ParseErrorKind::ImmutableNamespace {
                key: render_key(&key),
            }));
        }
        // A new element frees the namespace, but the key itself still
        // cannot be declared as a plain table.
        self.flags.unset_all(&key);
        self.flags.set(&key, Flag::ExplicitNest, false);

        let (src, pos) = (self.src, self.pos);
        append_nest_to_list(&mut self.data, &key)
            .map_err(|_| ParseError::at(src, pos, ParseErrorKind::OverwriteValue))?;

        if !self.rest().starts_with("]]") {
            return Err(self.error(ParseErrorKind::UnclosedArrayTableHeader));
        }
        self.pos += 2;
        Ok(key)
    }

    fn key_value_rule(&mut self, header: &[String]) -> Result<(), ParseError> {
        let (key, value) = self.parse_key_value_pair()?;
        let (stem, parent) = key
            .split_last()
            .ok_or_else(|| self.error(ParseErrorKind::InvalidKeyStart))?;
        let abs_parent: Vec<String> = header.iter().chain(parent).cloned().collect();

        for i in 1..key.len() {
            let cont_key: Vec<String> = header.iter().chain(&key[..i]).cloned().collect();
            if self.flags.is(&cont_key, Flag::ExplicitNest) {
                return Err(self.error(ParseErrorKind::RedefineNamespace {
                    key: render_key(&cont_key),
                }));
            }
            // Tables created by dotted keys cannot be reopened by later sections.
            self.flags.add_pending(&cont_key, Flag::ExplicitNest);
        }

        if self.flags.is(&abs_parent, Flag::Frozen) {
            return Err(self.error(ParseErrorKind::ImmutableNamespace {
                key: render_key(&abs_parent),
            }));
        }

        let (src, pos) = (self.src, self.pos);
        let nest = get_or_create_nest(&mut self.data, &abs_parent, true)
            .map_err(|_| ParseError::at(src, pos, ParseErrorKind::OverwriteValue))?;
        if nest.contains_key(stem) {
            return Err(ParseError::at(src, pos, ParseErrorKind::OverwriteValue));
        }

        let frozen = matches!(value, Value::Table(_) | Value::Array(_));
        trace!(key = %render_key(&key), kind = value.type_name(), "pair");
        nest.insert(stem.clone(), value);

        if frozen {
            let full_key: Vec<String> = header.iter().chain(&key).cloned().collect();
            self.flags.set(&full_key, Flag::Frozen, true);
        }
        Ok(())
    }

    fn parse_key_value_pair(&mut self) -> Result<(Vec<String>, Value), ParseError> {
        let key = self.parse_key()?;
        if self.peek() != Some('=') {
            return Err(self.error(ParseErrorKind::ExpectedEquals));
        }
        self.pos += 1;
        self.skip_whitespace();
        let value = self.parse_value()?;
        Ok((key, value))
    }

    fn parse_key(&mut self) -> Result<Vec<String>, ParseError> {
        let mut key = vec![self.parse_key_part()?];
        self.skip_whitespace();
        while self.peek() == Some('.') {
            self.pos += 1;
            self.skip_whitespace();
            key.push(self.parse_key_part()?);
            self.skip_whitespace();
        }
        Ok(key)
    }

    fn parse_key_part(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(c) if is_bare_key_char(c) => {
                let start = self.pos;
                self.skip_while(is_bare_key_char);
                Ok(self.src[start..self.pos].to_string())
            }
            Some('\'') => self.parse_literal_string(),
            Some('"') => self.parse_one_line_basic_string(),
            _ => Err(self.error(ParseErrorKind::InvalidKeyStart)),
        }
    }

    // === Values ===

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        let rest = self.rest();
        match self.peek() {
            Some('"') => {
                return if rest.starts_with("\"\"\"") {
                    self.parse_multiline_string(false)
                } else {
                    self.parse_one_line_basic_string()
                }
                .map(Value::String);
            }
            Some('\'') => {
                return if rest.starts_with("'''") {
                    self.parse_multiline_string(true)
                } else {
                    self.parse_literal_string()
                }
                .map(Value::String);
            }
            Some('t') if rest.starts_with("true") => {
                self.pos += 4;
                return Ok(Value::Boolean(true));
            }
            Some('f') if rest.starts_with("false") => {
                self.pos += 5;
                return Ok(Value::Boolean(false));
            }
            Some(c @ ('[' | '{')) => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(self.error(ParseErrorKind::NestingTooDeep));
                }
                self.depth += 1;
                let value = if c == '[' {
                    self.parse_array()
                } else {
                    self.parse_inline_table()
                };
                self.depth -= 1;
                return value;
            }
            _ => {}
        }

        if let Some(caps) = RE_DATETIME.captures(rest) {
            let datetime = datetime_from_captures(&caps)
                .ok_or_else(|| self.error(ParseErrorKind::InvalidDatetime))?;
            self.pos += caps[0].len();
            return Ok(Value::Datetime(datetime));
        }

        if let Some(caps) = RE_LOCALTIME.captures(rest) {
            let time = time_from_captures(&caps, 1)
                .ok_or_else(|| self.error(ParseErrorKind::InvalidDatetime))?;
            self.pos += caps[0].len();
            return Ok(Value::Datetime(Datetime {
                date: None,
                time: Some(time),
                offset: None,
            }));
        }

        // Numbers come after date-times: the number pattern also matches
        // the leading digits of a date.
        if let Some(caps) = RE_NUMBER.captures(rest) {
            let value = number_from_captures(&caps).map_err(|kind| self.error(kind))?;
            self.pos += caps[0].len();
            return Ok(value);
        }

        for special in ["inf", "nan", "+inf", "-inf", "+nan", "-nan"] {
            if rest.starts_with(special) {
                self.pos += special.len();
                let value = match special {
                    "inf" | "+inf" => f64::INFINITY,
                    "-inf" => f64::NEG_INFINITY,
                    _ => f64::NAN,
                };
                return Ok(Value::Float(value));
            }
        }

        Err(self.error(ParseErrorKind::InvalidValue))
    }

    fn parse_array(&mut self) -> Result<Value, ParseError> {
        // Skip "["
        self.pos += 1;
        let mut array = Vec::new();

        self.skip_comments_and_array_whitespace()?;
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Value::Array(array));
        }

        loop {
            array.push(self.parse_value()?);
            self.skip_comments_and_array_whitespace()?;

            match self.peek() {
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::Array(array));
                }
                Some(',') => self.pos += 1,
                _ => return Err(self.error(ParseErrorKind::UnclosedArray)),
            }

            self.skip_comments_and_array_whitespace()?;
            if self.peek() == Some(']') {
                self.pos += 1;
                return Ok(Value::Array(array));
            }
        }
    }

    fn parse_inline_table(&mut self) -> Result<Value, ParseError> {
        // Skip "{"
        self.pos += 1;
        let mut table = Table::new();
        let mut flags = Flags::default();

        self.skip_whitespace();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::Table(table));
        }

        loop {
            let (key, value) = self.parse_key_value_pair()?;
            let (stem, parent) = key
                .split_last()
                .ok_or_else(|| self.error(ParseErrorKind::InvalidKeyStart))?;

            if flags.is(&key, Flag::Frozen) {
                return Err(self.error(ParseErrorKind::ImmutableNamespace {
                    key: render_key(&key),
                }));
            }

            let nest = get_or_create_nest(&mut table, parent, false)
                .map_err(|_| self.error(ParseErrorKind::OverwriteValue))?;
            if nest.contains_key(stem) {
                return Err(self.error(ParseErrorKind::DuplicateInlineKey {
                    key: render_key(std::slice::from_ref(stem)),
                }));
            }
            let frozen = matches!(value, Value::Table(_) | Value::Array(_));
            nest.insert(stem.clone(), value);

            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(Value::Table(table));
                }
                Some(',') => {}
                _ => return Err(self.error(ParseErrorKind::UnclosedInlineTable)),
            }

            if frozen {
                flags.set(&key, Flag::Frozen, true);
            }
            self.pos += 1;
            self.skip_whitespace();
        }
    }

    // === Strings ===

    fn parse_one_line_basic_string(&mut self) -> Result<String, ParseError> {
        // Skip the opening quote
        self.pos += 1;
        self.parse_basic_string(false)
    }

    fn parse_literal_string(&mut self) -> Result<String, ParseError> {
        // Skip the opening apostrophe
        self.pos += 1;
        let start = self.pos;
        self.skip_until("'", is_illegal_basic_char, true)?;
        let value = self.src[start..self.pos].to_string();
        self.pos += 1;
        Ok(value)
    }

    fn parse_multiline_string(&mut self, literal: bool) -> Result<String, ParseError> {
        self.pos += 3;
        // A newline right after the opening delimiter is trimmed.
        if self.peek() == Some('\n') {
            self.pos += 1;
        }

        let (delimiter, mut value) = if literal {
            let start = self.pos;
            self.skip_until("'''", is_illegal_multiline_char, true)?;
            let value = self.src[start..self.pos].to_string();
            self.pos += 3;
            ('\'', value)
        } else {
            ('"', self.parse_basic_string(true)?)
        };

        // Up to two delimiter characters right before the closing sequence
        // belong to the content.
        for _ in 0..2 {
            if self.peek() != Some(delimiter) {
                break;
            }
            self.pos += 1;
            value.push(delimiter);
        }
        Ok(value)
    }

    /// Parse the body of a basic string up to and including its closing delimiter.
    fn parse_basic_string(&mut self, multiline: bool) -> Result<String, ParseError> {
        let illegal = if multiline {
            is_illegal_multiline_char
        } else {
            is_illegal_basic_char
        };
        let src = self.src;
        let mut value = String::new();
        let mut start = self.pos;

        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorKind::UnterminatedString));
            };
            match c {
                '"' if !multiline => {
                    value.push_str(&src[start..self.pos]);
                    self.pos += 1;
                    return Ok(value);
                }
                '"' if self.rest().starts_with("\"\"\"") => {
                    value.push_str(&src[start..self.pos]);
                    self.pos += 3;
                    return Ok(value);
                }
                '"' => self.pos += 1,
                '\\' => {
                    value.push_str(&src[start..self.pos]);
                    if let Some(escaped) = self.parse_escape(multiline)? {
                        value.push(escaped);
                    }
                    start = self.pos;
                }
                c if illegal(c) => {
                    return Err(self.error(ParseErrorKind::IllegalCharacter(c)));
                }
                c => self.pos += c.len_utf8(),
            }
        }
    }

    /// Parse an escape sequence starting at the backslash. Line-ending
    /// backslashes in multi-line strings produce no character.
    fn parse_escape(&mut self, multiline: bool) -> Result<Option<char>, ParseError> {
        let escaped = self.rest().chars().nth(1);
        self.pos += 1 + escaped.map_or(0, char::len_utf8);

        if multiline && matches!(escaped, Some(' ' | '\t' | '\n')) {
            if escaped != Some('\n') {
                // Only whitespace may follow the backslash on its line.
                self.skip_whitespace();
                match self.peek() {
                    None => return Ok(None),
                    Some('\n') => self.pos += 1,
                    Some(_) => return Err(self.error(ParseErrorKind::UnescapedBackslash)),
                }
            }
            self.skip_whitespace_and_newlines();
            return Ok(None);
        }

        match escaped {
            Some('u') => self.parse_hex_char(4).map(Some),
            Some('U') => self.parse_hex_char(8).map(Some),
            Some('b') => Ok(Some('\u{8}')),
            Some('t') => Ok(Some('\t')),
            Some('n') => Ok(Some('\n')),
            Some('f') => Ok(Some('\u{c}')),
            Some('r') => Ok(Some('\r')),
            Some('"') => Ok(Some('"')),
            Some('\\') => Ok(Some('\\')),
            _ => Err(self.error(ParseErrorKind::UnescapedBackslash)),
        }
    }

    fn parse_hex_char(&mut self, len: usize) -> Result<char, ParseError> {
        let Some(hex) = self
            .rest()
            .get(..len)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
        else {
            return Err(self.error(ParseErrorKind::InvalidHex));
        };
        self.pos += len;
        u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(ParseErrorKind::NotUnicodeScalar))
    }
}

fn datetime_from_captures(caps: &Captures<'_>) -> Option<Datetime> {
    let num = |i: usize| caps.get(i)?.as_str().parse::<u16>().ok();

    let date = Date {
        year: num(1)?,
        month: num(2)? as u8,
        day: num(3)? as u8,
    };
    if !date.is_valid() {
        return None;
    }

    let time = match caps.get(4) {
        Some(_) => Some(time_from_captures(caps, 4)?),
        None => None,
    };

    let offset = match (caps.get(8), caps.get(9)) {
        (_, Some(sign)) => {
            let minutes = (num(10)? * 60 + num(11)?) as i16;
            Some(Offset::Minutes(if sign.as_str() == "-" {
                -minutes
            } else {
                minutes
            }))
        }
        (Some(_), None) => Some(Offset::Utc),
        (None, None) => None,
    };

    Some(Datetime {
        date: Some(date),
        time,
        offset,
    })
}

/// Read hour, minute, second and fraction from four groups starting at `first`.
fn time_from_captures(caps: &Captures<'_>, first: usize) -> Option<Time> {
    let num = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    let microsecond = match caps.get(first + 3) {
        Some(fraction) => format!("{:0<6}", fraction.as_str()).parse().ok()?,
        None => 0,
    };
    Some(Time {
        hour: num(first)?,
        minute: num(first + 1)?,
        second: num(first + 2)?,
        microsecond,
    })
}

fn number_from_captures(caps: &Captures<'_>) -> Result<Value, ParseErrorKind> {
    let digits = caps[0].replace('_', "");

    if caps.name("floatpart").is_some_and(|m| !m.is_empty()) {
        return digits
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| ParseErrorKind::InvalidValue);
    }

    let parsed = match digits.get(..2) {
        Some("0x") => i64::from_str_radix(&digits[2..], 16),
        Some("0o") => i64::from_str_radix(&digits[2..], 8),
        Some("0b") => i64::from_str_radix(&digits[2..], 2),
        _ => digits.parse::<i64>(),
    };
    parsed
        .map(Value::Integer)
        .map_err(|_| ParseErrorKind::IntegerOutOfRange)
}

/// Render a key path the way it would be written in a document.
fn render_key(key: &[String]) -> String {
    key.iter()
        .map(|part| {
            if !part.is_empty() && part.chars().all(is_bare_key_char) {
                part.clone()
            } else {
                format!("{:?}", part)
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn is_bare_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn is_key_initial(c: char) -> bool {
    is_bare_key_char(c) || c == '"' || c == '\''
}

fn is_ascii_control(c: char) -> bool {
    c <= '\u{1f}' || c == '\u{7f}'
}

/// Illegal in single-line strings and comments.
fn is_illegal_basic_char(c: char) -> bool {
    is_ascii_control(c) && c != '\t'
}

fn is_illegal_multiline_char(c: char) -> bool {
    is_ascii_control(c) && c != '\t' && c != '\n'
}
