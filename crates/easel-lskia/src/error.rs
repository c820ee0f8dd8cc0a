use std::fmt;

/// A parse error from the s-expression reader.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 1-based source column number where the error occurred.
    pub col: usize,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self { message: msg.into(), line, col }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sexp parse error at {}:{}: {}", self.line, self.col, self.message)
    }
}

impl std::error::Error for ParseError {}

/// SKP JSON that cannot be compiled to λSkia.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    pub message: String,
    /// Index of the offending command, when one is to blame.
    pub command: Option<usize>,
}

impl CompileError {
    pub(crate) fn at(command: usize, msg: impl Into<String>) -> Self {
        Self { message: msg.into(), command: Some(command) }
    }

    pub(crate) fn global(msg: impl Into<String>) -> Self {
        Self { message: msg.into(), command: None }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.command {
            Some(i) => write!(f, "compile error at command {}: {}", i, self.message),
            None => write!(f, "compile error: {}", self.message),
        }
    }
}

impl std::error::Error for CompileError {}

/// First structural problem found in an SKP JSON document.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyError {
    pub index: usize,
    /// Command name, or `"?"` when the command has none.
    pub command: String,
    pub reason: String,
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error at {}: {}: {}", self.index, self.command, self.reason)
    }
}

impl std::error::Error for VerifyError {}

/// A λSkia construct the canvas renderer cannot draw.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// Fill or geometry without a canvas counterpart (gradients, text, images).
    Unsupported { what: &'static str, paint_index: usize },
    /// A `Path` geometry whose index is not in the path table.
    MissingPath(usize),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Unsupported { what, paint_index } => {
                write!(f, "cannot render {} (command {})", what, paint_index)
            }
            RenderError::MissingPath(i) => write!(f, "no path recorded for command {}", i),
        }
    }
}

impl std::error::Error for RenderError {}
