//! Arithmetic expression lexer, AST, parser, and evaluator.
//!
//! The `define-eval` directive evaluates a restricted arithmetic language:
//! numeric literals (including hex, scientific, and leading-dot forms),
//! parentheses, unary negation, and the binary operators `+ - * / // ** ^`.
//! `^` is bitwise XOR on integer-valued operands, **not** exponentiation;
//! `**` is exponentiation and `//` is floor division.
//!
//! Operator precedence (lowest → highest):
//!   xor (`^`)  →  additive  →  multiplicative  →  unary `-`  →  power (`**`)
//!
//! `**` is right-associative and binds tighter than a unary minus on its left
//! (`-2**2 == -4`) while still allowing a negated exponent (`2**-1 == 0.5`).

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Caret,
    LParen,
    RParen,
    /// Unrecognised input byte, surfaced in the parse error.
    Unknown(char),
    Eof,
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.src.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.src.get(self.pos).copied();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn eat(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r' | b'\n')) {
            self.pos += 1;
        }
    }

    fn read_number(&mut self, first: u8) -> Token {
        let mut s = String::new();
        s.push(first as char);

        // Hex literal.  Accumulated in f64, so a literal wider than 64 bits
        // loses precision like an oversized decimal literal, not its value.
        if first == b'0' && matches!(self.peek(), Some(b'x' | b'X')) {
            if matches!(self.peek2(), Some(b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')) {
                self.advance();
                let mut n = 0.0f64;
                while let Some(d) = self.peek().and_then(hex_digit) {
                    self.advance();
                    n = n * 16.0 + f64::from(d);
                }
                return Token::Num(n);
            }
            // "0x" with no digits: leave the 'x' for the parser to reject.
            return Token::Num(0.0);
        }

        if first != b'.' {
            while matches!(self.peek(), Some(b'0'..=b'9')) {
                s.push(self.advance().unwrap() as char);
            }
            if self.peek() == Some(b'.') {
                s.push(self.advance().unwrap() as char);
            }
        }
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            s.push(self.advance().unwrap() as char);
        }

        // Exponent, only if well-formed; otherwise the 'e' stays in the
        // stream and the parser rejects it as a trailing token.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let save = self.pos;
            let mut exp = String::new();
            exp.push(self.advance().unwrap() as char);
            if matches!(self.peek(), Some(b'+' | b'-')) {
                exp.push(self.advance().unwrap() as char);
            }
            if matches!(self.peek(), Some(b'0'..=b'9')) {
                while matches!(self.peek(), Some(b'0'..=b'9')) {
                    exp.push(self.advance().unwrap() as char);
                }
                s.push_str(&exp);
            } else {
                self.pos = save;
            }
        }

        Token::Num(s.parse().unwrap_or(0.0))
    }

    fn next_token(&mut self) -> Token {
        self.skip_ws();
        let ch = match self.advance() {
            None => return Token::Eof,
            Some(c) => c,
        };

        match ch {
            b'0'..=b'9' => self.read_number(ch),
            b'.' if matches!(self.peek(), Some(b'0'..=b'9')) => self.read_number(ch),
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => {
                if self.eat(b'*') {
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            b'/' => {
                if self.eat(b'/') {
                    Token::SlashSlash
                } else {
                    Token::Slash
                }
            }
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            c => Token::Unknown(c as char),
        }
    }

    fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let t = self.next_token();
            let done = matches!(t, Token::Eof);
            tokens.push(t);
            if done {
                break;
            }
        }
        tokens
    }
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

// ── AST ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Pow,
    Xor,
}

#[derive(Debug, Clone)]
enum Expr {
    Num(f64),
    Neg(Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
}

// ── Parser ────────────────────────────────────────────────────────────────────

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens.get(self.pos).cloned().unwrap_or(Token::Eof);
        self.pos += 1;
        t
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == expected {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // ── Grammar ───────────────────────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr, String> {
        self.parse_xor()
    }

    fn parse_xor(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_additive()?;
        while self.eat(&Token::Caret) {
            let rhs = self.parse_additive()?;
            lhs = Expr::Binary(BinOp::Xor, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                Token::SlashSlash => BinOp::FloorDiv,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr, String> {
        if self.eat(&Token::Minus) {
            Ok(Expr::Neg(Box::new(self.parse_unary()?)))
        } else {
            self.parse_power()
        }
    }

    fn parse_power(&mut self) -> Result<Expr, String> {
        let base = self.parse_primary()?;
        if self.eat(&Token::StarStar) {
            // Right-associative; the exponent may itself be negated.
            let exp = self.parse_unary()?;
            Ok(Expr::Binary(BinOp::Pow, Box::new(base), Box::new(exp)))
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        let tok = self.advance();
        match tok {
            Token::Num(n) => Ok(Expr::Num(n)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                if !self.eat(&Token::RParen) {
                    return Err("expected ')'".into());
                }
                Ok(inner)
            }
            other => Err(format!("unexpected token {other:?}")),
        }
    }
}

// ── Evaluator ─────────────────────────────────────────────────────────────────

fn eval_expr(expr: &Expr) -> Result<f64, String> {
    match expr {
        Expr::Num(n) => Ok(*n),
        Expr::Neg(inner) => Ok(-eval_expr(inner)?),
        Expr::Binary(op, lhs, rhs) => {
            let l = eval_expr(lhs)?;
            let r = eval_expr(rhs)?;
            match op {
                BinOp::Add => Ok(l + r),
                BinOp::Sub => Ok(l - r),
                BinOp::Mul => Ok(l * r),
                BinOp::Div => {
                    if r == 0.0 {
                        Err("division by zero".into())
                    } else {
                        Ok(l / r)
                    }
                }
                BinOp::FloorDiv => {
                    if r == 0.0 {
                        Err("division by zero".into())
                    } else {
                        Ok((l / r).floor())
                    }
                }
                BinOp::Pow => {
                    if l == 0.0 && r < 0.0 {
                        Err("zero cannot be raised to a negative power".into())
                    } else {
                        Ok(l.powf(r))
                    }
                }
                BinOp::Xor => {
                    let a = as_integer(l)?;
                    let b = as_integer(r)?;
                    Ok((a ^ b) as f64)
                }
            }
        }
    }
}

fn as_integer(x: f64) -> Result<i64, String> {
    // The cast saturates outside i64 range, so bound it explicitly.
    if x.is_finite() && x.fract() == 0.0 && x.abs() < i64::MAX as f64 {
        Ok(x as i64)
    } else {
        Err(format!("`^` requires integer operands (got {x})"))
    }
}

/// Parse and evaluate an arithmetic expression string.
pub fn evaluate(src: &str) -> Result<f64, String> {
    let tokens = Lexer::new(src).tokenize();
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    if parser.peek() != &Token::Eof {
        return Err(format!("unexpected token {:?}", parser.peek()));
    }
    eval_expr(&expr)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str) -> f64 {
        evaluate(src).expect("eval failed")
    }

    #[test]
    fn literals() {
        assert_eq!(eval("42"), 42.0);
        assert_eq!(eval("2.5"), 2.5);
        assert_eq!(eval(" 7 "), 7.0);
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("2 + 3"), 5.0);
        assert_eq!(eval("10 - 4"), 6.0);
        assert_eq!(eval("3 * 4"), 12.0);
        assert_eq!(eval("10 / 4"), 2.5);
    }

    #[test]
    fn true_division_is_float() {
        assert_eq!(eval("7 / 2"), 3.5);
    }

    #[test]
    fn floor_division() {
        assert_eq!(eval("7 // 2"), 3.0);
        assert_eq!(eval("-7 // 2"), -4.0);
        assert_eq!(eval("7.5 // 2"), 3.0);
        assert_eq!(eval("-1 // 3"), -1.0);
    }

    #[test]
    fn caret_is_xor_not_pow() {
        assert_eq!(eval("2^6"), 4.0);
        assert_eq!(eval("5 ^ 3"), 6.0);
        assert_eq!(eval("2**6"), 64.0);
    }

    #[test]
    fn xor_binds_loosest() {
        // `^` applies to fully-evaluated additive operands.
        assert_eq!(eval("1+2 ^ 3+4"), 4.0); // (1+2) ^ (3+4) == 3^7
        assert_eq!(eval("1^2*3"), 7.0); // 1 ^ (2*3)
    }

    #[test]
    fn pow_right_associative() {
        assert_eq!(eval("2**3**2"), 512.0);
    }

    #[test]
    fn unary_minus() {
        assert_eq!(eval("-5"), -5.0);
        assert_eq!(eval("-(3 + 2)"), -5.0);
        assert_eq!(eval("6 + -7"), -1.0);
        assert_eq!(eval("--4"), 4.0);
    }

    #[test]
    fn pow_binds_tighter_than_unary_minus() {
        assert_eq!(eval("-2**2"), -4.0);
        assert_eq!(eval("2**-1"), 0.5);
        assert_eq!(eval("(-2)**2"), 4.0);
    }

    #[test]
    fn mixed_precedence() {
        assert_eq!(eval("2 + 3 * 4"), 14.0);
        assert_eq!(eval("(2 + 3) * 4"), 20.0);
        assert_eq!(eval("1 + 2*3**(4^5) / (6 + -7)"), -5.0);
    }

    #[test]
    fn hex_literal() {
        assert_eq!(eval("0xff"), 255.0);
        assert_eq!(eval("0x10 + 1"), 17.0);
    }

    #[test]
    fn hex_literal_wider_than_64_bits() {
        // 2^64; keeps its magnitude rather than collapsing to zero.
        assert_eq!(eval("0x10000000000000000"), 18446744073709551616.0);
        assert_eq!(eval("0x20000000000000000 // 0x10000000000000000"), 2.0);
    }

    #[test]
    fn scientific_notation() {
        assert_eq!(eval("1e3"), 1000.0);
        assert_eq!(eval("2.5e-2"), 0.025);
        assert_eq!(eval("1E2"), 100.0);
    }

    #[test]
    fn dot_literals() {
        assert_eq!(eval(".5"), 0.5);
        assert_eq!(eval("1. + 1"), 2.0);
    }

    #[test]
    fn division_by_zero() {
        assert!(evaluate("1 / 0").is_err());
        assert!(evaluate("1 // 0").is_err());
        assert!(evaluate("1 / (2 - 2)").is_err());
    }

    #[test]
    fn zero_to_negative_power() {
        assert!(evaluate("0 ** -1").is_err());
    }

    #[test]
    fn xor_requires_integers() {
        assert!(evaluate("2.5 ^ 1").is_err());
        assert!(evaluate("1 ^ 0.5").is_err());
        assert_eq!(eval("4.0 ^ 1"), 5.0); // integer-valued floats are fine
    }

    #[test]
    fn xor_rejects_operands_outside_i64() {
        assert!(evaluate("1e19 ^ 0").is_err());
        assert!(evaluate("0 ^ -1e19").is_err());
        assert_eq!(eval("4294967296 ^ 1"), 4294967297.0); // 2^32 is still fine
    }

    #[test]
    fn rejects_trailing_input() {
        assert!(evaluate("1 2").is_err());
        assert!(evaluate("1e").is_err());
        assert!(evaluate("3 + 4)").is_err());
    }

    #[test]
    fn rejects_malformed() {
        assert!(evaluate("").is_err());
        assert!(evaluate("(1 + 2").is_err());
        assert!(evaluate("* 3").is_err());
        assert!(evaluate("1 + ").is_err());
        assert!(evaluate("abc").is_err());
        assert!(evaluate("+5").is_err()); // unary plus is not in the grammar
    }
}
