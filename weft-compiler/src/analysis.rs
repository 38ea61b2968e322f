// Static classification of embedded Rust expressions.

use syn::visit::{self, Visit};
use syn::{Expr, ExprLit, Lit, UnOp};

use crate::ast::{Literal, Value};
use crate::error::CompileError;
use crate::template_ast::Span;

/// Classify `code` as literal, dynamic or observable. A template value is
/// observable when evaluating it involves a call: that is where signal
/// reads happen, so it must be re-run inside an effect.
pub(crate) fn analyze(code: &str, span: Span) -> Result<Value, CompileError> {
    let expr: Expr = syn::parse_str(code).map_err(|err| CompileError::InvalidExpression {
        code: code.to_string(),
        message: err.to_string(),
        line: span.line,
        col: span.col,
    })?;

    if let Some(literal) = literal_of(&expr) {
        return Ok(Value {
            code: code.to_string(),
            dynamic: false,
            observable: false,
            bound: None,
            literal: Some(literal),
        });
    }

    let mut calls = CallFinder::default();
    calls.visit_expr(&expr);
    Ok(Value {
        code: code.to_string(),
        dynamic: true,
        observable: calls.found,
        bound: zero_arg_call_path(&expr),
        literal: None,
    })
}

/// Event handlers are never wrapped; a plain path is recorded as bound.
pub(crate) fn analyze_handler(code: &str, span: Span) -> Result<Value, CompileError> {
    let expr: Expr = syn::parse_str(code).map_err(|err| CompileError::InvalidExpression {
        code: code.to_string(),
        message: err.to_string(),
        line: span.line,
        col: span.col,
    })?;
    let bound = match &expr {
        Expr::Path(path) if path.qself.is_none() => path_string(&path.path),
        _ => None,
    };
    Ok(Value {
        code: code.to_string(),
        dynamic: true,
        observable: false,
        bound,
        literal: None,
    })
}

fn literal_of(expr: &Expr) -> Option<Literal> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => match lit {
            Lit::Str(s) => Some(Literal::Text(s.value())),
            Lit::Char(c) => Some(Literal::Text(c.value().to_string())),
            Lit::Int(i) => Some(Literal::Text(i.base10_digits().to_string())),
            Lit::Float(f) => Some(Literal::Text(f.base10_digits().to_string())),
            Lit::Bool(b) => Some(Literal::Bool(b.value)),
            _ => None,
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match &*unary.expr {
            Expr::Lit(ExprLit {
                lit: Lit::Int(i), ..
            }) => Some(Literal::Text(format!("-{}", i.base10_digits()))),
            Expr::Lit(ExprLit {
                lit: Lit::Float(f), ..
            }) => Some(Literal::Text(format!("-{}", f.base10_digits()))),
            _ => None,
        },
        Expr::Paren(paren) => literal_of(&paren.expr),
        _ => None,
    }
}

/// `count()` binds `count`.
fn zero_arg_call_path(expr: &Expr) -> Option<String> {
    let Expr::Call(call) = expr else {
        return None;
    };
    if !call.args.is_empty() {
        return None;
    }
    match &*call.func {
        Expr::Path(path) if path.qself.is_none() => path_string(&path.path),
        _ => None,
    }
}

fn path_string(path: &syn::Path) -> Option<String> {
    let mut out = String::new();
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    for (i, segment) in path.segments.iter().enumerate() {
        if !segment.arguments.is_none() {
            return None;
        }
        if i > 0 {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
    }
    Some(out)
}

#[derive(Default)]
struct CallFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for CallFinder {
    fn visit_expr_call(&mut self, node: &'ast syn::ExprCall) {
        self.found = true;
        visit::visit_expr_call(self, node);
    }

    fn visit_expr_method_call(&mut self, node: &'ast syn::ExprMethodCall) {
        self.found = true;
        visit::visit_expr_method_call(self, node);
    }

    fn visit_macro(&mut self, node: &'ast syn::Macro) {
        self.found = true;
        visit::visit_macro(self, node);
    }

    // A closure is already a getter; calls inside it run when it is called.
    fn visit_expr_closure(&mut self, _node: &'ast syn::ExprClosure) {}
}
