use crate::error::ParseError;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    /// Constructor names and `true`/`false`.
    Ident(String),
    /// Numeric literal, kept as written so integers and floats parse apart.
    Number(String),
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPos {
    pub token: Token,
    pub line: usize,
    pub col: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1 }
    }

    pub fn tokenize(mut self) -> Result<Vec<TokenWithPos>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let (line, col) = (self.line, self.col);
            let token = self.next_token()?;
            let eof = token == Token::Eof;
            tokens.push(TokenWithPos { token, line, col });
            if eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            // `;` line comments
            if self.peek() == Some(';') {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, ParseError> {
        let ch = match self.peek() {
            None => return Ok(Token::Eof),
            Some(c) => c,
        };

        match ch {
            '(' => { self.advance(); Ok(Token::LParen) }
            ')' => { self.advance(); Ok(Token::RParen) }
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.lex_number(),
            c if c.is_alphabetic() || c == '_' => self.lex_ident(),
            other => Err(ParseError::new(format!("unexpected character {:?}", other), self.line, self.col)),
        }
    }

    fn lex_number(&mut self) -> Result<Token, ParseError> {
        let (line, col) = (self.line, self.col);
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.advance();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+')) {
            self.advance();
        }
        let s = &self.src[start..self.pos];
        if s.parse::<f64>().is_err() {
            return Err(ParseError::new(format!("invalid number {:?}", s), line, col));
        }
        Ok(Token::Number(s.to_string()))
    }

    fn lex_ident(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '-') {
            self.advance();
        }
        Ok(Token::Ident(self.src[start..self.pos].to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn parens_idents_numbers() {
        assert_eq!(
            tokens("(Rect 1.0 -2.5)"),
            vec![
                Token::LParen,
                Token::Ident("Rect".into()),
                Token::Number("1.0".into()),
                Token::Number("-2.5".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn exponent_numbers() {
        assert_eq!(tokens("1e-05")[0], Token::Number("1e-05".into()));
    }

    #[test]
    fn comments_and_positions() {
        let toks = Lexer::new("; header\n  (Empty)").tokenize().unwrap();
        assert_eq!(toks[0].token, Token::LParen);
        assert_eq!((toks[0].line, toks[0].col), (2, 3));
    }

    #[test]
    fn bad_character() {
        let err = Lexer::new("(Empty) #").tokenize().unwrap_err();
        assert_eq!((err.line, err.col), (1, 9));
    }

    #[test]
    fn bad_number() {
        assert!(Lexer::new("1.2.3").tokenize().is_err());
    }
}
