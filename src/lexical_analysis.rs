//! Splits lambda calculus source text into a lazy stream of tokens.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenClass {
    Lambda,
    Dot,
    LeftParen,
    RightParen,
    Symbol,
    EndOfInput,
}

/// Display trait implementation for TokenClass, used in parse error messages.
impl std::fmt::Display for TokenClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class_str = match self {
            TokenClass::Lambda => "λ or @",
            TokenClass::Dot => ".",
            TokenClass::LeftParen => "(",
            TokenClass::RightParen => ")",
            TokenClass::Symbol => "SYMBOL",
            TokenClass::EndOfInput => "EOF",
        };

        return write!(f, "{}", class_str);
    }
}

/// Represents a single token of the language.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    /// Byte offset of the token in the source string.
    pub start_idx: usize,
}

/// Raised when a token is requested after the end-of-input token was
/// already handed out.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum LexicalError {
    #[error("Token stream exhausted: no tokens remain after end of input.")]
    Exhausted,
}

// Patterns for the multi-character lexemes. Both are anchored so they only
// ever match at the cursor.
lazy_static! {
    static ref whitespace_regex: Regex =
        Regex::new(r"^\s+").expect("Unable to compile whitespace regex.");
    static ref symbol_regex: Regex =
        Regex::new(r"^[^\sλ@.()]+").expect("Unable to compile symbol regex.");
}

// Maps a punctuation character to its token class.
fn get_punctuation_class(c: char) -> Option<TokenClass> {
    match c {
        'λ' | '@' => Some(TokenClass::Lambda),
        '.' => Some(TokenClass::Dot),
        '(' => Some(TokenClass::LeftParen),
        ')' => Some(TokenClass::RightParen),
        _ => None,
    }
}

/// A forward-only cursor over some source text. Iterating yields every real
/// token, then one `EndOfInput` token, then `None`.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    curr_idx: usize,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        return Self {
            source,
            curr_idx: 0,
            finished: false,
        };
    }

    /// Like `next`, but reports running off the end of the stream as an
    /// error.
    pub fn next_token(&mut self) -> Result<Token, LexicalError> {
        return self.next().ok_or(LexicalError::Exhausted);
    }

    // Advances the cursor past any whitespace.
    fn skip_whitespace(&mut self) {
        if let Some(match_obj) = whitespace_regex.find(&self.source[self.curr_idx..]) {
            self.curr_idx += match_obj.end();
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        self.skip_whitespace();

        let rest = &self.source[self.curr_idx..];
        let start_idx = self.curr_idx;

        let next_char = match rest.chars().next() {
            Some(c) => c,
            None => {
                self.finished = true;
                return Some(Token {
                    token_class: TokenClass::EndOfInput,
                    token_text: String::new(),
                    start_idx,
                });
            }
        };

        if let Some(token_class) = get_punctuation_class(next_char) {
            self.curr_idx += next_char.len_utf8();
            return Some(Token {
                token_class,
                token_text: next_char.to_string(),
                start_idx,
            });
        }

        // Anything that is neither whitespace nor punctuation starts a symbol,
        // so the symbol pattern always matches here.
        let symbol_len = symbol_regex
            .find(rest)
            .map_or(next_char.len_utf8(), |match_obj| match_obj.end());
        self.curr_idx += symbol_len;

        return Some(Token {
            token_class: TokenClass::Symbol,
            token_text: String::from(&rest[..symbol_len]),
            start_idx,
        });
    }
}

/// Given a string, returns every token in it, ending with the end-of-input
/// token.
pub fn run_lexical_analysis(program_str: &str) -> Vec<Token> {
    return Tokenizer::new(program_str).collect();
}
