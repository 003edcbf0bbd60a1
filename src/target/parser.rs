//! Tokenizer and parser for target expressions
//!
//! ```text
//! target := call | path
//! call   := name "(" (arg ("," arg)*)? ")"
//! arg    := call | string | duration | number | path
//! ```

use super::ast::{Expr, FunctionCall};
use super::duration::parse_duration;

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    LParen,
    RParen,
    Comma,
    /// Quoted string, quotes stripped
    Str(String),
    /// Any other run of characters: function name, number, duration or path
    Word(String),
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    kind: TokenKind,
    /// Byte offset in the target string
    pos: usize,
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | '\'' | '"')
}

fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' | ')' | ',' => {
                chars.next();
                let kind = match c {
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    _ => TokenKind::Comma,
                };
                tokens.push(Token { kind, pos });
            }
            '\'' | '"' => {
                chars.next();
                let start = pos + c.len_utf8();
                let mut end = None;
                for (i, ch) in chars.by_ref() {
                    if ch == c {
                        end = Some(i);
                        break;
                    }
                }
                let end = end.ok_or(ParseError::UnterminatedString { position: pos })?;
                tokens.push(Token {
                    kind: TokenKind::Str(input[start..end].to_string()),
                    pos,
                });
            }
            _ => {
                // Commas and spaces inside `{a, b}` belong to the path; spaces are dropped
                let mut word = String::new();
                let mut brace_depth = 0usize;
                let mut in_class = false;
                while let Some(&(_, ch)) = chars.peek() {
                    match ch {
                        '[' if !in_class => in_class = true,
                        ']' if in_class => in_class = false,
                        '{' if !in_class => brace_depth += 1,
                        '}' if !in_class => brace_depth = brace_depth.saturating_sub(1),
                        ch if brace_depth > 0 && (ch == ',' || ch.is_whitespace()) => {}
                        ch if is_delimiter(ch) => break,
                        _ => {}
                    }
                    chars.next();
                    if !(brace_depth > 0 && ch.is_whitespace()) {
                        word.push(ch);
                    }
                }
                if brace_depth > 0 || in_class {
                    return Err(ParseError::UnclosedGroup { position: pos });
                }
                tokens.push(Token {
                    kind: TokenKind::Word(word),
                    pos,
                });
            }
        }
    }

    Ok(tokens)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::LParen => "(".to_string(),
        TokenKind::RParen => ")".to_string(),
        TokenKind::Comma => ",".to_string(),
        TokenKind::Str(s) => format!("'{}'", s),
        TokenKind::Word(w) => w.clone(),
    }
}

fn looks_numeric(word: &str) -> bool {
    let starts_ok = word
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'));
    starts_ok
        && word
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}

fn classify_word(word: String) -> Expr {
    if let Ok(span) = parse_duration(&word) {
        return Expr::Duration { raw: word, span };
    }
    if looks_numeric(&word) {
        if let Ok(value) = word.parse::<f64>() {
            return Expr::Number { raw: word, value };
        }
    }
    Expr::Path(word)
}

/// A call whose closing parenthesis has not been reached yet
struct Frame {
    name: String,
    args: Vec<Expr>,
    /// Position of the opening parenthesis
    open: usize,
}

/// Parse a single target expression
///
/// Open calls are kept on an explicit stack, so nesting depth is bounded by
/// memory rather than by the thread stack.
pub fn parse_target(target: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(target)?;
    if tokens.is_empty() {
        return Err(ParseError::EmptyTarget);
    }

    let mut tokens = tokens.into_iter().peekable();
    let mut stack: Vec<Frame> = Vec::new();

    'expr: loop {
        let token = match tokens.next() {
            Some(token) => token,
            None => {
                return Err(match stack.last() {
                    Some(frame) => ParseError::UnmatchedParen { position: frame.open },
                    None => ParseError::UnexpectedEnd,
                })
            }
        };

        let mut expr = match token.kind {
            TokenKind::Word(word) => match tokens.next_if(|t| t.kind == TokenKind::LParen) {
                Some(open) => {
                    if tokens.next_if(|t| t.kind == TokenKind::RParen).is_some() {
                        Expr::Call(FunctionCall::new(word, Vec::new()))
                    } else {
                        stack.push(Frame {
                            name: word,
                            args: Vec::new(),
                            open: open.pos,
                        });
                        continue 'expr;
                    }
                }
                None => classify_word(word),
            },
            TokenKind::Str(s) => Expr::String(s),
            TokenKind::LParen => return Err(ParseError::EmptyFunctionName { position: token.pos }),
            TokenKind::RParen | TokenKind::Comma => {
                return Err(ParseError::EmptyArgument { position: token.pos })
            }
        };

        // Close every call this expression completes
        loop {
            let Some(mut frame) = stack.pop() else {
                return match tokens.next() {
                    None => Ok(expr),
                    Some(Token { kind: TokenKind::RParen, pos }) => {
                        Err(ParseError::UnmatchedParen { position: pos })
                    }
                    Some(token) => Err(ParseError::TrailingInput { position: token.pos }),
                };
            };
            frame.args.push(expr);

            match tokens.next() {
                Some(Token { kind: TokenKind::Comma, .. }) => {
                    stack.push(frame);
                    continue 'expr;
                }
                Some(Token { kind: TokenKind::RParen, .. }) => {
                    expr = Expr::Call(FunctionCall::new(frame.name, frame.args));
                }
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        token: describe(&token.kind),
                        position: token.pos,
                    })
                }
                None => return Err(ParseError::UnmatchedParen { position: frame.open }),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("empty target")]
    EmptyTarget,

    #[error("unexpected end of target")]
    UnexpectedEnd,

    #[error("unterminated string starting at {position}")]
    UnterminatedString { position: usize },

    #[error("unmatched parenthesis at {position}")]
    UnmatchedParen { position: usize },

    #[error("missing function name before parenthesis at {position}")]
    EmptyFunctionName { position: usize },

    #[error("empty argument at {position}")]
    EmptyArgument { position: usize },

    #[error("unexpected '{token}' at {position}")]
    UnexpectedToken { token: String, position: usize },

    #[error("unexpected input after expression at {position}")]
    TrailingInput { position: usize },

    #[error("unclosed '{{' or '[' in path starting at {position}")]
    UnclosedGroup { position: usize },
}
