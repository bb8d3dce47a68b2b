//! jlox scanner: converts a sequence of source lines into tokens.
//!
//! The scanner pulls raw lines from a [`LineSource`] until it runs dry. Each
//! line is matched against an ordered table of lexeme rules; the first rule
//! that applies wins, so multi-character operators sit in front of their
//! one-character prefixes and keywords sit in front of identifiers.
use jlox_syntax::error::{error_at, ErrorKind, Result};
use jlox_syntax::token::{Token, TokenKind};
use log::debug;

/// Supplier of raw source lines.
///
/// Implemented for every iterator of string-like items, so `src.lines()`,
/// `vec!["a", "b"].into_iter()` and `std::iter::from_fn(..)` all work.
pub trait LineSource {
    /// Returns the next raw line, or `None` at end of input.
    fn next_line(&mut self) -> Option<String>;
}

impl<I> LineSource for I
where
    I: Iterator,
    I::Item: Into<String>,
{
    fn next_line(&mut self) -> Option<String> {
        self.next().map(Into::into)
    }
}

/// One entry of the ordered matcher table.
enum Matcher {
    /// `//` up to the end of the line; produces no token.
    Comment,
    /// An exact lexeme.
    Symbol(&'static str, TokenKind),
    /// A reserved word, only when not followed by an identifier character.
    Keyword(&'static str, TokenKind),
    Number,
    Str,
    Identifier,
}

const MATCHERS: &[Matcher] = &[
    Matcher::Comment,
    Matcher::Symbol("(", TokenKind::LeftParen),
    Matcher::Symbol(")", TokenKind::RightParen),
    Matcher::Symbol("{", TokenKind::LeftBrace),
    Matcher::Symbol("}", TokenKind::RightBrace),
    Matcher::Symbol(";", TokenKind::Semicolon),
    Matcher::Symbol(",", TokenKind::Comma),
    Matcher::Symbol("!=", TokenKind::BangEqual),
    Matcher::Symbol("!", TokenKind::Bang),
    Matcher::Symbol("==", TokenKind::EqualEqual),
    Matcher::Symbol("=", TokenKind::Equal),
    Matcher::Symbol(">=", TokenKind::GreaterEqual),
    Matcher::Symbol(">", TokenKind::Greater),
    Matcher::Symbol("<=", TokenKind::LessEqual),
    Matcher::Symbol("<", TokenKind::Less),
    Matcher::Symbol("-", TokenKind::Minus),
    Matcher::Symbol("+", TokenKind::Plus),
    Matcher::Symbol("/", TokenKind::Slash),
    Matcher::Symbol("*", TokenKind::Star),
    Matcher::Keyword("true", TokenKind::True),
    Matcher::Keyword("false", TokenKind::False),
    Matcher::Keyword("nil", TokenKind::Nil),
    Matcher::Keyword("var", TokenKind::Var),
    Matcher::Keyword("print", TokenKind::Print),
    Matcher::Keyword("if", TokenKind::If),
    Matcher::Keyword("else", TokenKind::Else),
    Matcher::Keyword("for", TokenKind::For),
    Matcher::Keyword("while", TokenKind::While),
    Matcher::Keyword("and", TokenKind::And),
    Matcher::Keyword("or", TokenKind::Or),
    Matcher::Keyword("fun", TokenKind::Fun),
    Matcher::Keyword("return", TokenKind::Return),
    Matcher::Number,
    Matcher::Str,
    Matcher::Identifier,
];

/// A matched lexeme: its token kind (`None` when skipped) and byte length.
struct Lexeme {
    kind: Option<TokenKind>,
    len: usize,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn digits_len(s: &str) -> usize {
    s.bytes().take_while(u8::is_ascii_digit).count()
}

impl Matcher {
    fn try_match(&self, rest: &str, line: usize) -> Result<Option<Lexeme>> {
        let lexeme = match self {
            Matcher::Comment => rest.starts_with("//").then(|| Lexeme {
                kind: None,
                len: rest.len(),
            }),
            Matcher::Symbol(sym, kind) => rest.starts_with(sym).then(|| Lexeme {
                kind: Some(*kind),
                len: sym.len(),
            }),
            Matcher::Keyword(word, kind) => {
                let bounded = rest.starts_with(word)
                    && !rest[word.len()..].starts_with(is_ident_char);
                bounded.then(|| Lexeme {
                    kind: Some(*kind),
                    len: word.len(),
                })
            }
            Matcher::Number => {
                let int_len = digits_len(rest);
                if int_len == 0 {
                    None
                } else {
                    let after = &rest[int_len..];
                    let frac_len = match after.strip_prefix('.') {
                        Some(frac) if digits_len(frac) > 0 => 1 + digits_len(frac),
                        _ => 0,
                    };
                    Some(Lexeme {
                        kind: Some(TokenKind::Number),
                        len: int_len + frac_len,
                    })
                }
            }
            Matcher::Str => match rest.strip_prefix('"') {
                Some(body) => match body.find('"') {
                    Some(close) => Some(Lexeme {
                        kind: Some(TokenKind::String),
                        len: close + 2,
                    }),
                    None => return error_at(ErrorKind::Token, line, "Unterminated string"),
                },
                None => None,
            },
            Matcher::Identifier => {
                let starts = rest
                    .chars()
                    .next()
                    .map_or(false, |c| c.is_ascii_alphabetic() || c == '_');
                if starts {
                    let len = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
                    Some(Lexeme {
                        kind: Some(TokenKind::Identifier),
                        len,
                    })
                } else {
                    None
                }
            }
        };
        Ok(lexeme)
    }
}

/// Accumulates tokens line by line.
pub struct Scanner {
    tokens: Vec<Token>,
    line: usize,
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            line: 0,
        }
    }

    /// Scan one physical line. The line number advances even when the line is blank.
    pub fn scan_line(&mut self, text: &str) -> Result<()> {
        self.line += 1;
        let mut rest = text.trim_start();
        while !rest.is_empty() {
            let lexeme = self.match_lexeme(rest)?;
            if let Some(kind) = lexeme.kind {
                self.tokens
                    .push(Token::new(kind, &rest[..lexeme.len], self.line));
            }
            rest = rest[lexeme.len..].trim_start();
        }
        Ok(())
    }

    fn match_lexeme(&self, rest: &str) -> Result<Lexeme> {
        for matcher in MATCHERS {
            if let Some(lexeme) = matcher.try_match(rest, self.line)? {
                return Ok(lexeme);
            }
        }
        error_at(
            ErrorKind::Token,
            self.line,
            format!("Unexpected input \"{}\"", rest),
        )
    }

    /// Append the end-of-input marker and hand back the token sequence.
    pub fn finish(mut self) -> Vec<Token> {
        self.tokens.push(Token::new(TokenKind::Eof, "", self.line));
        debug!("scanned {} tokens from {} lines", self.tokens.len(), self.line);
        self.tokens
    }
}

/// Scan every line the source supplies into a token sequence ending with `Eof`.
///
/// A supplied chunk that itself contains newlines is split into its physical
/// lines, so line numbers always refer to real source lines.
pub fn scan<S: LineSource>(mut source: S) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new();
    while let Some(chunk) = source.next_line() {
        let chunk = chunk.strip_suffix('\n').unwrap_or(&chunk);
        for line in chunk.split('\n') {
            scanner.scan_line(line.strip_suffix('\r').unwrap_or(line))?;
        }
    }
    Ok(scanner.finish())
}

/// Scan a complete in-memory source.
pub fn scan_str(src: &str) -> Result<Vec<Token>> {
    scan(src.lines())
}
