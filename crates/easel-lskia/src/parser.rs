use std::str::FromStr;

use easel_engine::paint::BlendMode;

use crate::ast::{Fill, Filter, Geometry, Layer, Paint, Style, Transform};
use crate::error::ParseError;
use crate::lexer::{Lexer, Token, TokenWithPos};

// ── Parser ────────────────────────────────────────────────────────────────

/// A layer constructor whose `bottom` operand is still being read.
enum Head {
    SaveLayer,
    Draw,
}

pub struct Parser {
    tokens: Vec<TokenWithPos>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<TokenWithPos>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn current_pos(&self) -> (usize, usize) {
        self.tokens
            .get(self.pos)
            .map(|t| (t.line, t.col))
            .or_else(|| self.tokens.last().map(|t| (t.line, t.col)))
            .unwrap_or((1, 1))
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    /// Look at the token `offset` positions ahead of current without consuming.
    fn peek_ahead(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).map(|t| &t.token).unwrap_or(&Token::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone()).unwrap_or(Token::Eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn err(&self, msg: impl Into<String>) -> ParseError {
        let (line, col) = self.current_pos();
        ParseError::new(msg, line, col)
    }

    fn expect_token(&mut self, expected: &Token) -> Result<(), ParseError> {
        let err = self.err(format!("expected {:?}, got {:?}", expected, self.peek()));
        if &self.advance() == expected { Ok(()) } else { Err(err) }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        let err = self.err(format!("expected identifier, got {:?}", self.peek()));
        match self.advance() {
            Token::Ident(s) => Ok(s),
            _ => Err(err),
        }
    }

    fn expect_float(&mut self) -> Result<f32, ParseError> {
        let err = self.err(format!("expected number, got {:?}", self.peek()));
        match self.advance() {
            Token::Number(s) => s.parse::<f32>().map_err(|_| err),
            _ => Err(err),
        }
    }

    fn expect_index(&mut self) -> Result<usize, ParseError> {
        let err = self.err(format!("expected non-negative integer, got {:?}", self.peek()));
        match self.advance() {
            Token::Number(s) => s.parse::<usize>().map_err(|_| err),
            _ => Err(err),
        }
    }

    fn expect_bool(&mut self) -> Result<bool, ParseError> {
        let err = self.err(format!("expected true or false, got {:?}", self.peek()));
        match self.advance() {
            Token::Ident(s) if s == "true" => Ok(true),
            Token::Ident(s) if s == "false" => Ok(false),
            _ => Err(err),
        }
    }

    fn expect_floats<const N: usize>(&mut self) -> Result<[f32; N], ParseError> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.expect_float()?;
        }
        Ok(out)
    }

    /// Consumes `(` and the constructor name after it.
    fn open(&mut self) -> Result<(String, (usize, usize)), ParseError> {
        self.expect_token(&Token::LParen)?;
        let at = self.current_pos();
        Ok((self.expect_ident()?, at))
    }

    fn close(&mut self) -> Result<(), ParseError> {
        self.expect_token(&Token::RParen)
    }

    // ── Program ───────────────────────────────────────────────────────────

    /// A bare layer, or `(let <name> <layer>)`.
    pub fn parse_program(&mut self) -> Result<Layer, ParseError> {
        let layer = if self.peek() == &Token::LParen
            && self.peek_ahead(1) == &Token::Ident("let".into())
        {
            self.advance();
            self.advance();
            self.expect_ident()?;
            let layer = self.parse_layer()?;
            self.close()?;
            layer
        } else {
            self.parse_layer()?
        };
        if self.peek() != &Token::Eof {
            return Err(self.err(format!("trailing input {:?}", self.peek())));
        }
        Ok(layer)
    }

    // ── Layer ─────────────────────────────────────────────────────────────

    /// Reads the `bottom` operands first, keeping each enclosing head on a
    /// stack, then completes the heads innermost first. Only `top` operands
    /// of nested save layers recurse.
    pub fn parse_layer(&mut self) -> Result<Layer, ParseError> {
        let mut heads = Vec::new();
        let mut layer = loop {
            let (name, (line, col)) = self.open()?;
            match name.as_str() {
                "Empty" => {
                    self.close()?;
                    break Layer::Empty;
                }
                "SaveLayer" => heads.push(Head::SaveLayer),
                "Draw" => heads.push(Head::Draw),
                other => return Err(ParseError::new(format!("unknown layer {:?}", other), line, col)),
            }
        };

        while let Some(head) = heads.pop() {
            let bottom = Box::new(layer);
            layer = match head {
                Head::SaveLayer => {
                    let top = Box::new(self.parse_layer()?);
                    let paint = self.parse_paint()?;
                    Layer::SaveLayer { bottom, top, paint }
                }
                Head::Draw => {
                    let shape = self.parse_geometry()?;
                    let paint = self.parse_paint()?;
                    let clip = self.parse_geometry()?;
                    let transform = self.parse_transform()?;
                    Layer::Draw { bottom, shape, paint, clip, transform }
                }
            };
            self.close()?;
        }
        Ok(layer)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    fn parse_geometry(&mut self) -> Result<Geometry, ParseError> {
        let (name, (line, col)) = self.open()?;
        let geometry = match name.as_str() {
            "Full" => Geometry::Full,
            "Rect" => Geometry::Rect(self.expect_floats()?),
            "Oval" => Geometry::Oval(self.expect_floats()?),
            "RRect" => Geometry::RRect(self.expect_floats()?),
            "Path" => Geometry::Path { index: self.expect_index()? },
            "TextBlob" => {
                let [x, y] = self.expect_floats()?;
                Geometry::TextBlob { x, y, bounds: self.expect_floats()? }
            }
            "ImageRect" => Geometry::ImageRect(self.expect_floats()?),
            "Intersect" => {
                let a = self.parse_geometry()?;
                Geometry::Intersect(Box::new(a), Box::new(self.parse_geometry()?))
            }
            "Difference" => {
                let a = self.parse_geometry()?;
                Geometry::Difference(Box::new(a), Box::new(self.parse_geometry()?))
            }
            "Transformed" => {
                let g = self.parse_geometry()?;
                Geometry::Transformed(Box::new(g), self.parse_transform()?)
            }
            other => return Err(ParseError::new(format!("unknown geometry {:?}", other), line, col)),
        };
        self.close()?;
        Ok(geometry)
    }

    // ── Paint ─────────────────────────────────────────────────────────────

    fn parse_paint(&mut self) -> Result<Paint, ParseError> {
        let (name, (line, col)) = self.open()?;
        if name != "Paint" {
            return Err(ParseError::new(format!("expected Paint, got {:?}", name), line, col));
        }

        let (fill_name, (line, col)) = self.open()?;
        let fill = match fill_name.as_str() {
            "Color" => {
                let [a, r, g, b] = self.expect_floats()?;
                Fill::Color { a, r, g, b }
            }
            "LinearGradient" => Fill::LinearGradient { is_opaque: self.expect_bool()? },
            "RadialGradient" => Fill::RadialGradient { is_opaque: self.expect_bool()? },
            other => return Err(ParseError::new(format!("unknown fill {:?}", other), line, col)),
        };
        self.close()?;

        let (mode, (line, col)) = self.open()?;
        let blend_mode = BlendMode::from_str(&mode).map_err(|e| ParseError::new(e.to_string(), line, col))?;
        self.close()?;

        let (style_name, (line, col)) = self.open()?;
        let style = match style_name.as_str() {
            "Solid" => Style::Solid,
            // Older output wrote `(Stroke)` with no width.
            "Stroke" if self.peek() == &Token::RParen => Style::Stroke(0.0),
            "Stroke" => Style::Stroke(self.expect_float()?),
            other => return Err(ParseError::new(format!("unknown style {:?}", other), line, col)),
        };
        self.close()?;

        let (filter_name, (line, col)) = self.open()?;
        let color_filter = match filter_name.as_str() {
            "IdFilter" => Filter::Id,
            "LumaFilter" => Filter::Luma,
            other => return Err(ParseError::new(format!("unknown filter {:?}", other), line, col)),
        };
        self.close()?;

        let index = self.expect_index()?;
        self.close()?;
        Ok(Paint { fill, blend_mode, style, color_filter, index })
    }

    fn parse_transform(&mut self) -> Result<Transform, ParseError> {
        let (name, (line, col)) = self.open()?;
        if name != "Matrix" {
            return Err(ParseError::new(format!("expected Matrix, got {:?}", name), line, col));
        }
        let m = self.expect_floats()?;
        self.close()?;
        Ok(Transform(m))
    }
}

/// Parses a layer in s-expression form, optionally wrapped in `(let name ..)`.
pub fn parse_str(src: &str) -> Result<Layer, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    Parser::new(tokens).parse_program()
}
