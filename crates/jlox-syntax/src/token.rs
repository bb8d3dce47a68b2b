//! Token definitions for the jlox language.
//!
//! Tokens are the smallest meaningful units of jlox source code. The scanner
//! produces them once per compile and the parser only ever reads them.
//!
//! # Token Categories
//!
//! - **Punctuation**: `(` `)` `{` `}` `;` `,`
//! - **Operators**: `-` `+` `/` `*` `!` `!=` `=` `==` `>` `>=` `<` `<=`
//! - **Literals**: numbers, strings, `true`, `false`, `nil`, identifiers
//! - **Keywords**: `var`, `print`, `if`, `else`, `for`, `while`, `and`, `or`,
//!   `fun`, `return`
//! - **Special**: the end-of-input marker
//!
//! # Examples
//!
//! ```rust
//! use jlox_syntax::{Token, TokenKind};
//!
//! let bang_equal = Token::new(TokenKind::BangEqual, "!=", 1);
//! assert_eq!(bang_equal.text, "!=");
//!
//! let eof = Token::new(TokenKind::Eof, "", 3);
//! assert!(eof.is(TokenKind::Eof));
//! ```

/// Token types that can be produced by the jlox scanner.
///
/// Kinds carry no payload: the exact lexeme lives in [`Token::text`], so a
/// kind is cheap to copy and compare while the parser disambiguates grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Punctuation ===
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Left brace `{` - opens a block
    LeftBrace,
    /// Right brace `}` - closes a block
    RightBrace,
    /// Semicolon `;` - terminates statements
    Semicolon,
    /// Comma `,` - separates parameters and arguments
    Comma,

    // === Operators ===
    /// Subtraction or numeric negation `-`
    Minus,
    /// Addition or string concatenation `+`
    Plus,
    /// Division `/`
    Slash,
    /// Multiplication `*`
    Star,
    /// Logical negation `!`
    Bang,
    /// Inequality `!=`
    BangEqual,
    /// Assignment `=`
    Equal,
    /// Equality `==`
    EqualEqual,
    /// Greater-than `>`
    Greater,
    /// Greater-than-or-equal `>=`
    GreaterEqual,
    /// Less-than `<`
    Less,
    /// Less-than-or-equal `<=`
    LessEqual,

    // === Literals ===
    /// A numeric literal such as `42` or `3.14`
    Number,
    /// A double-quoted string literal; the token text keeps its quotes
    String,
    /// The `true` keyword
    True,
    /// The `false` keyword
    False,
    /// The `nil` keyword
    Nil,
    /// A variable or function name
    Identifier,

    // === Keywords ===
    /// The `var` keyword - declares a variable
    Var,
    /// The `print` keyword - emits a value
    Print,
    /// The `if` keyword
    If,
    /// The `else` keyword
    Else,
    /// The `for` keyword
    For,
    /// The `while` keyword
    While,
    /// The `and` keyword - short-circuiting conjunction
    And,
    /// The `or` keyword - short-circuiting disjunction
    Or,
    /// The `fun` keyword - declares a function
    Fun,
    /// The `return` keyword
    Return,

    /// End-of-input marker - always the last token of a sequence
    Eof,
}

/// A token with its exact lexeme and source line.
///
/// # Fields
///
/// - `kind`: The syntactic category of this token
/// - `text`: The lexeme exactly as it appeared in the source (empty for
///   [`TokenKind::Eof`])
/// - `line`: 1-based line number of the source line the token came from
///   (`0` only for the end-of-input marker of an empty source)
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category of this token
    pub kind: TokenKind,

    /// The lexeme as written in the source
    pub text: String,

    /// Line number in the source (1-based)
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
        }
    }

    /// Returns true if this token is of the given kind.
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
