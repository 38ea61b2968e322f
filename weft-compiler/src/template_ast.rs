/// Location of a template construct: byte offsets into the parsed source and
/// the 1-based line/column of its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `name="text"`
    Literal(String),
    /// `name={expr}`
    Expression(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateAttr {
    Named {
        name: String,
        value: Option<AttrValue>, // `None` for boolean attributes like `disabled`
        span: Span,
    },
    Spread {
        expr: String,
        span: Span,
    },
}

/// Parsed template tree, before linearization.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    Element {
        tag: String,
        attrs: Vec<TemplateAttr>,
        children: Vec<TemplateNode>,
        self_closing: bool,
        span: Span,
    },
    Fragment {
        children: Vec<TemplateNode>,
        span: Span,
    },
    Text(String, Span),
    Expression(String, Span), // { expr }
}

impl TemplateNode {
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Element { span, .. }
            | TemplateNode::Fragment { span, .. }
            | TemplateNode::Text(_, span)
            | TemplateNode::Expression(_, span) => *span,
        }
    }
}
