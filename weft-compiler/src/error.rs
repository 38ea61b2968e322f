use thiserror::Error;

/// A template compile error. Every variant carries the 1-based line and
/// column of the offending source, relative to the compiled file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("syntax error at {line}:{col}: {message}")]
    Syntax {
        message: String,
        line: usize,
        col: usize,
    },
    #[error("unknown attribute namespace `{namespace}:` in `{name}` at {line}:{col}")]
    AttributeNamespace {
        namespace: String,
        name: String,
        line: usize,
        col: usize,
    },
    #[error("invalid expression `{code}` at {line}:{col}: {message}")]
    InvalidExpression {
        code: String,
        message: String,
        line: usize,
        col: usize,
    },
    #[error("unclosed `{macro_name}!` block starting at {line}:{col}")]
    UnclosedView {
        macro_name: String,
        line: usize,
        col: usize,
    },
}

impl CompileError {
    pub fn location(&self) -> (usize, usize) {
        match self {
            CompileError::Syntax { line, col, .. }
            | CompileError::AttributeNamespace { line, col, .. }
            | CompileError::InvalidExpression { line, col, .. }
            | CompileError::UnclosedView { line, col, .. } => (*line, *col),
        }
    }

    /// Re-anchor a location computed relative to a snippet that starts at
    /// `line`:`col` of the enclosing file.
    pub(crate) fn offset(mut self, base_line: usize, base_col: usize) -> Self {
        match &mut self {
            CompileError::Syntax { line, col, .. }
            | CompileError::AttributeNamespace { line, col, .. }
            | CompileError::InvalidExpression { line, col, .. }
            | CompileError::UnclosedView { line, col, .. } => {
                if *line == 1 {
                    *col += base_col - 1;
                }
                *line += base_line - 1;
            }
        }
        self
    }

    pub(crate) fn from_pest<R: pest::RuleType>(err: pest::error::Error<R>) -> Self {
        let (line, col) = match err.line_col {
            pest::error::LineColLocation::Pos(pos) => pos,
            pest::error::LineColLocation::Span(start, _) => start,
        };
        CompileError::Syntax {
            message: err.variant.message().into_owned(),
            line,
            col,
        }
    }
}
