//! Tokenizer for `.items` definition lines.
//!
//! One line defines one item:
//!
//! ```text
//! inbox label=Inbox, description="All mail, newest first", app:hint='press \'i\''
//! ```
//!
//! The identifier runs to the first whitespace. Pairs follow as
//! `key=value`, separated by commas. A value is either quoted with `"` or
//! `'` (backslash escapes, `\n` `\r` `\t` map to control characters) or
//! runs unquoted to the next unescaped comma with trailing whitespace
//! trimmed. A trailing comma is allowed, and the comma after a quoted value
//! may be left out.

use thiserror::Error;

/// Comment lines start with this character after optional whitespace.
pub const COMMENT_MARKER: char = '#';

/// A parsed definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLine {
    pub id: String,
    /// `(key, raw value)` pairs in line order.
    pub fields: Vec<(String, String)>,
}

/// What went wrong on a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    #[error("missing identifier")]
    MissingId,

    #[error("empty key before '='")]
    EmptyKey,

    #[error("expected '=' after key {0:?}")]
    ExpectedEquals(String),

    #[error("unterminated quoted value")]
    UnterminatedQuote,

    #[error("unterminated escape at end of line")]
    UnterminatedEscape,
}

/// A rejected line. `column` counts code points from 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("column {column}: {kind}")]
pub struct SyntaxError {
    pub column: usize,
    pub kind: SyntaxErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    ReadingId,
    ReadingKey,
    AwaitingEquals,
    ReadingValue,
    AwaitingComma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueMode {
    /// Nothing significant read yet.
    Leading,
    Unquoted,
    Quoted(char),
}

struct Scanner {
    state: State,
    mode: ValueMode,
    escaped: bool,
    id: String,
    key: String,
    value: String,
    /// Whitespace inside an unquoted value, kept only if more text follows.
    pending: String,
    fields: Vec<(String, String)>,
}

impl Scanner {
    fn new() -> Self {
        Self {
            state: State::ReadingId,
            mode: ValueMode::Leading,
            escaped: false,
            id: String::new(),
            key: String::new(),
            value: String::new(),
            pending: String::new(),
            fields: Vec::new(),
        }
    }

    fn step(&mut self, ch: char) -> Result<(), SyntaxErrorKind> {
        match self.state {
            State::ReadingId => {
                self.reading_id(ch);
                Ok(())
            }
            State::ReadingKey => self.reading_key(ch),
            State::AwaitingEquals => self.awaiting_equals(ch),
            State::ReadingValue => {
                self.reading_value(ch);
                Ok(())
            }
            State::AwaitingComma => self.awaiting_comma(ch),
        }
    }

    fn reading_id(&mut self, ch: char) {
        if !ch.is_whitespace() {
            self.id.push(ch);
        } else if !self.id.is_empty() {
            self.state = State::ReadingKey;
        }
    }

    fn reading_key(&mut self, ch: char) -> Result<(), SyntaxErrorKind> {
        if ch == '=' {
            if self.key.is_empty() {
                return Err(SyntaxErrorKind::EmptyKey);
            }
            self.begin_value();
        } else if ch.is_whitespace() {
            if !self.key.is_empty() {
                self.state = State::AwaitingEquals;
            }
        } else {
            self.key.push(ch);
        }
        Ok(())
    }

    fn awaiting_equals(&mut self, ch: char) -> Result<(), SyntaxErrorKind> {
        if ch == '=' {
            self.begin_value();
            Ok(())
        } else if ch.is_whitespace() {
            Ok(())
        } else {
            Err(SyntaxErrorKind::ExpectedEquals(self.key.clone()))
        }
    }

    fn reading_value(&mut self, ch: char) {
        if self.escaped {
            self.escaped = false;
            self.push_value(unescape(ch));
            return;
        }
        match self.mode {
            ValueMode::Leading => match ch {
                '"' | '\'' => self.mode = ValueMode::Quoted(ch),
                ',' => self.close_value(State::ReadingKey),
                '\\' => {
                    self.mode = ValueMode::Unquoted;
                    self.escaped = true;
                }
                c if c.is_whitespace() => {}
                c => {
                    self.mode = ValueMode::Unquoted;
                    self.value.push(c);
                }
            },
            ValueMode::Quoted(delimiter) => match ch {
                '\\' => self.escaped = true,
                c if c == delimiter => self.close_value(State::AwaitingComma),
                c => self.value.push(c),
            },
            ValueMode::Unquoted => match ch {
                '\\' => self.escaped = true,
                ',' => self.close_value(State::ReadingKey),
                c if c.is_whitespace() => self.pending.push(c),
                c => self.push_value(c),
            },
        }
    }

    /// The comma between pairs is optional after a quoted value.
    fn awaiting_comma(&mut self, ch: char) -> Result<(), SyntaxErrorKind> {
        if ch == ',' {
            self.state = State::ReadingKey;
            Ok(())
        } else if ch.is_whitespace() {
            Ok(())
        } else {
            self.state = State::ReadingKey;
            self.reading_key(ch)
        }
    }

    fn begin_value(&mut self) {
        self.state = State::ReadingValue;
        self.mode = ValueMode::Leading;
        self.value.clear();
        self.pending.clear();
    }

    fn push_value(&mut self, ch: char) {
        if self.mode == ValueMode::Unquoted && !self.pending.is_empty() {
            self.value.push_str(&self.pending);
            self.pending.clear();
        }
        self.value.push(ch);
    }

    fn close_value(&mut self, next: State) {
        let key = std::mem::take(&mut self.key);
        let value = std::mem::take(&mut self.value);
        self.pending.clear();
        self.fields.push((key, value));
        self.state = next;
    }

    fn finish(mut self) -> Result<ItemLine, SyntaxErrorKind> {
        match self.state {
            State::ReadingId | State::AwaitingComma => {}
            State::ReadingKey => {
                if !self.key.is_empty() {
                    return Err(SyntaxErrorKind::ExpectedEquals(self.key));
                }
            }
            State::AwaitingEquals => return Err(SyntaxErrorKind::ExpectedEquals(self.key)),
            State::ReadingValue => {
                if self.escaped {
                    return Err(SyntaxErrorKind::UnterminatedEscape);
                }
                if let ValueMode::Quoted(_) = self.mode {
                    return Err(SyntaxErrorKind::UnterminatedQuote);
                }
                self.close_value(State::ReadingKey);
            }
        }
        if self.id.is_empty() {
            return Err(SyntaxErrorKind::MissingId);
        }
        Ok(ItemLine {
            id: self.id,
            fields: self.fields,
        })
    }
}

fn unescape(ch: char) -> char {
    match ch {
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

/// Parse one trimmed, non-blank, non-comment definition line.
pub fn parse_line(line: &str) -> Result<ItemLine, SyntaxError> {
    let mut scanner = Scanner::new();
    let mut column = 0;
    for ch in line.chars() {
        column += 1;
        scanner
            .step(ch)
            .map_err(|kind| SyntaxError { column, kind })?;
    }
    scanner.finish().map_err(|kind| SyntaxError {
        column: column + 1,
        kind,
    })
}

/// True for lines the parser never sees.
#[must_use]
pub fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER)
}

/// The definition lines of a document, trimmed, with 1-based line numbers.
pub fn definition_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !is_blank_or_comment(line))
        .map(|(i, line)| (i + 1, line.trim()))
}
