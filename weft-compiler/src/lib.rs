//! Compiler for `view! { ... }` templates.
//!
//! A template goes through four stages:
//!
//! 1. [`parse_template`] reads the markup into a [`TemplateNode`] tree.
//! 2. [`build_ast`] flattens it into an [`Ast`], classifying every embedded
//!    expression and marking the elements that need a live reference.
//! 3. [`codegen::serialize`] emits Rust for the configured [`Target`].
//! 4. [`compile_module`] does the above for every block in a source file and
//!    prepends the runtime imports and hoisted templates.
//!
//! ```
//! use weft_compiler::{CompileOptions, compile_template};
//!
//! let out = compile_template("<p>Hello</p>", &CompileOptions::default()).unwrap();
//! assert_eq!(out.code, "__TMPL.with(__clone)");
//! ```

mod analysis;
pub mod ast;
pub mod builder;
pub mod codegen;
pub mod declarations;
pub mod error;
pub mod module;
pub mod options;
pub mod parse;
pub mod template_ast;

pub use ast::{Ast, AstNode, Value};
pub use builder::{build_ast, is_component_tag};
pub use codegen::CodegenContext;
pub use declarations::Declarations;
pub use error::CompileError;
pub use module::{CompileOutput, compile_module};
pub use options::{CompileOptions, Target};
pub use parse::parse_template;
pub use template_ast::{AttrValue, Span, TemplateAttr, TemplateNode};

/// One compiled template, with the items it depends on kept separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    /// The expression replacing the template.
    pub code: String,
    /// Hoisted template declarations.
    pub hoisted: String,
    /// `use` declaration for the runtime items `code` refers to.
    pub imports: String,
}

/// Compile the markup of a single template (the part between the braces of
/// `view! { ... }`).
pub fn compile_template(
    source: &str,
    options: &CompileOptions,
) -> Result<CompiledTemplate, CompileError> {
    let roots = parse_template(source)?;
    let ast = build_ast(&roots)?;
    let mut ctx = CodegenContext::new(options);
    let code = codegen::serialize(&ast, &mut ctx)?;
    tracing::debug!(
        target_kind = ?options.target,
        nodes = ast.len(),
        hoisted = ctx.declarations.len(),
        "compiled template"
    );
    Ok(CompiledTemplate {
        code,
        hoisted: ctx.render_hoisted(),
        imports: ctx.render_imports(),
    })
}
