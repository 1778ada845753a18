//! LaTeX-flavoured expression parser.
//!
//! Grammar (implicit multiplication binds like `*`):
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/') unary | power)*
//! unary   := ('-' | '+') unary | power
//! power   := atom ('^' exponent)?
//! exponent:= ('-' | '+') exponent | power
//! atom    := number | symbol | '(' sum ')' | '{' sum '}'
//!          | '\frac' group group | '\boxed' group
//! ```

use super::{Expr, ExpressionParser, Rational, SymbolicError};

/// Longest token stream accepted.
pub const MAX_TOKENS: usize = 1024;

/// Deepest nesting of groups and signs accepted.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Rational),
    Symbol(char),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Frac,
    Boxed,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Symbol(c) => c.to_string(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::Slash => "/".into(),
            Self::Caret => "^".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::LBrace => "{".into(),
            Self::RBrace => "}".into(),
            Self::Frac => "\\frac".into(),
            Self::Boxed => "\\boxed".into(),
        }
    }

    fn starts_atom(&self) -> bool {
        matches!(
            self,
            Self::Number(_) | Self::Symbol(_) | Self::LParen | Self::LBrace | Self::Frac | Self::Boxed
        )
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>, SymbolicError> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let literal: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(Rational::from_decimal_str(&literal)?));
            }
            c if c.is_ascii_alphabetic() => {
                tokens.push(Token::Symbol(c));
                i += 1;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '^' => {
                tokens.push(Token::Caret);
                i += 1;
            }
            '(' | '[' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' | ']' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '{' => {
                tokens.push(Token::LBrace);
                i += 1;
            }
            '}' => {
                tokens.push(Token::RBrace);
                i += 1;
            }
            '$' => i += 1,
            '\\' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let command: String = chars[start..i].iter().collect();
                if command.is_empty() {
                    // Spacing commands: "\,", "\;", "\!", "\:", "\ "
                    match chars.get(i) {
                        Some(',' | ';' | '!' | ':' | ' ') => i += 1,
                        _ => return Err(SymbolicError::UnknownCommand("\\".to_string())),
                    }
                    continue;
                }
                match command.as_str() {
                    "left" | "right" => {
                        // "\left." and "\right." are invisible delimiters
                        if chars.get(i) == Some(&'.') {
                            i += 1;
                        }
                    }
                    "cdot" | "times" => tokens.push(Token::Star),
                    "frac" | "dfrac" | "tfrac" => tokens.push(Token::Frac),
                    "boxed" => tokens.push(Token::Boxed),
                    other => return Err(SymbolicError::UnknownCommand(format!("\\{other}"))),
                }
            }
            other => return Err(SymbolicError::UnexpectedChar(other)),
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Run `f` one nesting level down, failing past `MAX_DEPTH`.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SymbolicError>,
    ) -> Result<T, SymbolicError> {
        if self.depth >= MAX_DEPTH {
            return Err(SymbolicError::Unsupported(format!(
                "nesting deeper than {MAX_DEPTH}"
            )));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), SymbolicError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(SymbolicError::UnexpectedToken {
                position: self.pos - 1,
                found: token.describe(),
            }),
            None => Err(SymbolicError::UnexpectedEnd),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, SymbolicError> {
        let mut lhs = self.parse_product()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    lhs = Expr::add(lhs, self.parse_product()?);
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    lhs = Expr::sub(lhs, self.parse_product()?);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_product(&mut self) -> Result<Expr, SymbolicError> {
        let mut lhs = self.parse_unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    lhs = Expr::mul(lhs, self.parse_unary()?);
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    lhs = Expr::div(lhs, self.parse_unary()?);
                }
                Some(token) if token.starts_atom() => {
                    lhs = Expr::mul(lhs, self.parse_power()?);
                }
                _ => return Ok(lhs),
            }
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, SymbolicError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let inner = self.nested(Self::parse_unary)?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::parse_unary)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, SymbolicError> {
        let base = self.parse_atom()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.parse_exponent()?;
            return Ok(Expr::pow(base, exponent));
        }
        Ok(base)
    }

    fn parse_exponent(&mut self) -> Result<Expr, SymbolicError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                let inner = self.nested(Self::parse_exponent)?;
                Ok(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::parse_exponent)
            }
            _ => self.nested(Self::parse_power),
        }
    }

    fn parse_group(&mut self) -> Result<Expr, SymbolicError> {
        self.expect(Token::LBrace)?;
        let inner = self.nested(Self::parse_sum)?;
        self.expect(Token::RBrace)?;
        Ok(inner)
    }

    fn parse_atom(&mut self) -> Result<Expr, SymbolicError> {
        let position = self.pos;
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::Symbol(c)) => Ok(Expr::Symbol(c.to_string())),
            Some(Token::LParen) => {
                let inner = self.nested(Self::parse_sum)?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Some(Token::LBrace) => {
                let inner = self.nested(Self::parse_sum)?;
                self.expect(Token::RBrace)?;
                Ok(inner)
            }
            Some(Token::Frac) => {
                let num = self.parse_group()?;
                let den = self.parse_group()?;
                Ok(Expr::div(num, den))
            }
            Some(Token::Boxed) => self.parse_group(),
            Some(token) => Err(SymbolicError::UnexpectedToken {
                position,
                found: token.describe(),
            }),
            None => Err(SymbolicError::UnexpectedEnd),
        }
    }
}

/// Parser for the LaTeX subset answers are written in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LatexParser;

impl ExpressionParser for LatexParser {
    fn parse(&self, text: &str) -> Result<Expr, SymbolicError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(SymbolicError::Empty);
        }
        if tokens.len() > MAX_TOKENS {
            return Err(SymbolicError::Unsupported(format!(
                "expression longer than {MAX_TOKENS} tokens"
            )));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let expr = parser.parse_sum()?;
        match parser.next() {
            None => Ok(expr),
            Some(token) => Err(SymbolicError::UnexpectedToken {
                position: parser.pos - 1,
                found: token.describe(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::RationalFunction;

    fn normalize(text: &str) -> RationalFunction {
        LatexParser.parse(text).unwrap().to_rational_function().unwrap()
    }

    fn same(a: &str, b: &str) -> bool {
        normalize(a).equivalent(&normalize(b)).unwrap()
    }

    #[test]
    fn test_reciprocal_spellings() {
        assert!(same("1/x", "x^{-1}"));
        assert!(same("\\frac{1}{x}", "x^-1"));
        assert!(same("\\dfrac{1}{x}", "\\left(x\\right)^{-1}"));
        assert!(!same("2/x", "1/x"));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert!(same("n(n+1)/2", "\\frac{n^2 + n}{2}"));
        assert!(same("2x^2", "2 \\cdot x \\cdot x"));
        assert!(same("-x^2", "-(x^2)"));
    }

    #[test]
    fn test_boxed_and_spacing() {
        assert!(same("\\boxed{\\frac{1}{x}}", "1/x"));
        assert!(same("$x \\, + \\; 1$", "1 + x"));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(LatexParser.parse("\\boxed{}"), Err(SymbolicError::UnexpectedToken { .. })));
        assert!(matches!(LatexParser.parse("\\boxed{"), Err(SymbolicError::UnexpectedEnd)));
        assert!(matches!(LatexParser.parse(""), Err(SymbolicError::Empty)));
        assert!(matches!(LatexParser.parse("\\sqrt{x}"), Err(SymbolicError::UnknownCommand(_))));
        assert!(matches!(LatexParser.parse("x + "), Err(SymbolicError::UnexpectedEnd)));
        assert!(matches!(LatexParser.parse("x ) "), Err(SymbolicError::UnexpectedToken { .. })));
        assert!(matches!(LatexParser.parse("x # 2"), Err(SymbolicError::UnexpectedChar('#'))));
    }

    #[test]
    fn test_nesting_is_bounded() {
        let deep = format!("{}x{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert!(matches!(LatexParser.parse(&deep), Err(SymbolicError::Unsupported(_))));
        let shallow = format!("{}x{}", "(".repeat(MAX_DEPTH - 1), ")".repeat(MAX_DEPTH - 1));
        assert_eq!(LatexParser.parse(&shallow).unwrap(), Expr::symbol("x"));

        let signs = format!("{}x", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(LatexParser.parse(&signs), Err(SymbolicError::Unsupported(_))));
        let exponent = format!("x^{}1", "-".repeat(MAX_DEPTH + 1));
        assert!(matches!(LatexParser.parse(&exponent), Err(SymbolicError::Unsupported(_))));
        let towers = format!("x{}", "^x".repeat(MAX_DEPTH + 1));
        assert!(matches!(LatexParser.parse(&towers), Err(SymbolicError::Unsupported(_))));
    }

    #[test]
    fn test_token_count_is_bounded() {
        let long = vec!["x"; MAX_TOKENS].join("+");
        assert!(matches!(LatexParser.parse(&long), Err(SymbolicError::Unsupported(_))));
        let huge = format!("{}x{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(LatexParser.parse(&huge), Err(SymbolicError::Unsupported(_))));
    }

    #[test]
    fn test_fractional_exponent_unsupported() {
        let expr = LatexParser.parse("x^{1/2}").unwrap();
        assert!(matches!(expr.to_rational_function(), Err(SymbolicError::Unsupported(_))));
    }
}
