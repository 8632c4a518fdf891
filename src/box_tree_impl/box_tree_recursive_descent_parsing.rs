//! LL(1) recursive descent parser that constructs lambda-calculus expressions
//! in the box-tree representation, pulling tokens lazily from a `Tokenizer`.
//!
//! Grammar:
//!
//! ```text
//! expression  := application | abstraction | variable
//! application := '(' expression expression ')'
//! abstraction := ('λ' | '@') variable '.' expression
//! variable    := SYMBOL
//! ```

use thiserror::Error;
use tracing::debug;

use crate::box_tree_impl::box_tree_ast::ExprNode;
use crate::lexical_analysis::{LexicalError, Token, TokenClass, Tokenizer};

/// Represents a parsing error.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Unexpected token at position {start_idx}. Expected: {}, found: {found_token_class}.",
        join_token_classes(.expected_token_classes)
    )]
    UnexpectedTokenClass {
        expected_token_classes: Vec<TokenClass>,
        found_token_class: TokenClass,
        start_idx: usize,
    },

    #[error(transparent)]
    Lexical(#[from] LexicalError),
}

// Formats a list of token classes as "a, b, or c".
fn join_token_classes(token_classes: &[TokenClass]) -> String {
    let class_strs: Vec<String> = token_classes
        .iter()
        .map(|token_class| token_class.to_string())
        .collect();

    match class_strs.split_last() {
        None => return String::new(),
        Some((last, [])) => return last.clone(),
        Some((last, rest)) => return format!("{}, or {}", rest.join(", "), last),
    }
}

/// Parser state: the token stream and the single token of lookahead.
pub struct Parser<'a> {
    tokenizer: Tokenizer<'a>,
    curr_token: Token,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the given source, reading the first token.
    pub fn new(source: &'a str) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::new(source);
        let curr_token = tokenizer.next_token()?;

        return Ok(Self {
            tokenizer,
            curr_token,
        });
    }

    /// Parses exactly one expression. Tokens after it are left unread; see
    /// `remaining_token`.
    pub fn parse_expression(&mut self) -> Result<ExprNode, ParseError> {
        let expr_node = self.try_expr_rule()?;
        debug!(parsed = %expr_node, "parsed expression");
        return Ok(expr_node);
    }

    /// The lookahead token, if it is anything other than end of input.
    pub fn remaining_token(&self) -> Option<&Token> {
        match self.curr_token.token_class {
            TokenClass::EndOfInput => return None,
            _ => return Some(&self.curr_token),
        }
    }

    // Builds the error for a mismatch at the current token.
    fn unexpected(&self, expected_token_classes: Vec<TokenClass>) -> ParseError {
        return ParseError::UnexpectedTokenClass {
            expected_token_classes,
            found_token_class: self.curr_token.token_class,
            start_idx: self.curr_token.start_idx,
        };
    }

    // Moves to the next token, returning the one just consumed.
    fn advance(&mut self) -> Result<Token, ParseError> {
        let next_token = self.tokenizer.next_token()?;
        return Ok(std::mem::replace(&mut self.curr_token, next_token));
    }

    /// Consumes a token of the requested class, or fails without consuming
    /// anything.
    fn try_token_class(&mut self, token_class: TokenClass) -> Result<Token, ParseError> {
        if self.curr_token.token_class != token_class {
            return Err(self.unexpected(vec![token_class]));
        }

        return self.advance();
    }

    /// Dispatches on the lookahead token to the matching production.
    fn try_expr_rule(&mut self) -> Result<ExprNode, ParseError> {
        match self.curr_token.token_class {
            TokenClass::LeftParen => return self.try_application_rule(),
            TokenClass::Lambda => return self.try_lambda_rule(),
            TokenClass::Symbol => return self.try_var_expr_rule(),
            _ => {
                return Err(self.unexpected(vec![
                    TokenClass::LeftParen,
                    TokenClass::Lambda,
                    TokenClass::Symbol,
                ]))
            }
        }
    }

    /// Tries to parse an expression that looks like `([EXPR] [EXPR])`.
    fn try_application_rule(&mut self) -> Result<ExprNode, ParseError> {
        self.try_token_class(TokenClass::LeftParen)?;
        let fn_body = self.try_expr_rule()?;
        let actual_arg = self.try_expr_rule()?;
        self.try_token_class(TokenClass::RightParen)?;

        return Ok(ExprNode::FnApp {
            fn_body: Box::new(fn_body),
            actual_arg: Box::new(actual_arg),
        });
    }

    /// Tries to parse an expression that looks like `λ[IDENTIFIER].[EXPR]`.
    fn try_lambda_rule(&mut self) -> Result<ExprNode, ParseError> {
        self.try_token_class(TokenClass::Lambda)?;
        let formal_param_token = self.try_token_class(TokenClass::Symbol)?;
        self.try_token_class(TokenClass::Dot)?;
        let fn_body = self.try_expr_rule()?;

        return Ok(ExprNode::FnDef {
            formal_param: formal_param_token.token_text,
            fn_body: Box::new(fn_body),
        });
    }

    /// Tries to parse an expression that looks like `[IDENTIFIER]`.
    fn try_var_expr_rule(&mut self) -> Result<ExprNode, ParseError> {
        let var_token = self.try_token_class(TokenClass::Symbol)?;

        return Ok(ExprNode::Var {
            var_name: var_token.token_text,
        });
    }
}

/// Parses one expression from the start of `source`. Anything after that
/// expression is ignored.
pub fn parse_recursive_descent(source: &str) -> Result<ExprNode, ParseError> {
    return Parser::new(source)?.parse_expression();
}
