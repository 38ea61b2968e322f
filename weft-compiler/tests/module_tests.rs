use pretty_assertions::assert_eq;
use weft_compiler::{CompileError, CompileOptions, Target, compile_module};

#[test]
fn rewrites_a_block_and_prepends_the_header() {
    let source = "fn app() -> View {\n    view! { <p>Hi</p> }\n}\n";
    let out = compile_module(source, &CompileOptions::default()).unwrap();
    assert_eq!(
        out.code,
        "use ::weft_runtime::{Template as __Template, clone as __clone, create_template as __create_template};\n\
         thread_local! {\n    static __TMPL: __Template = __create_template(\"<p>Hi</p>\");\n}\n\
         \n\
         fn app() -> View {\n    __TMPL.with(__clone)\n}\n"
    );
    assert_eq!(out.templates, 1);
    assert_eq!(out.hoisted, 1);
}

#[test]
fn sources_without_blocks_are_unchanged() {
    let source = "fn main() { let s = \"view! { <p/> }\"; }\n";
    let out = compile_module(source, &CompileOptions::default()).unwrap();
    assert_eq!(out.code, source);
    assert_eq!(out.templates, 0);
}

#[test]
fn header_follows_inner_attributes() {
    let source = "//! App.\n#![allow(dead_code)]\nfn a() -> View { view! { <i/> } }\n";
    let out = compile_module(source, &CompileOptions::default()).unwrap();
    assert!(out.code.starts_with("//! App.\n#![allow(dead_code)]\nuse ::weft_runtime::"));
    assert!(out.code.ends_with("fn a() -> View { __TMPL.with(__clone) }\n"));
}

#[test]
fn templates_are_shared_across_blocks() {
    let source = "fn a() -> View { view! { <p>x</p> } }\nfn b() -> View { view! { <p>x</p> } }\nfn c() -> View { view! { <p>y</p> } }\n";
    let out = compile_module(source, &CompileOptions::default()).unwrap();
    assert_eq!(out.templates, 3);
    assert_eq!(out.hoisted, 2);
    assert_eq!(out.code.matches("__TMPL.with(__clone)").count(), 2);
    assert_eq!(out.code.matches("__TMPL_2.with(__clone)").count(), 1);
}

#[test]
fn nested_blocks_in_expressions_are_compiled() {
    let source = "fn list(items: Vec<i32>) -> View {\n    view! { <ul>{items.iter().map(|i| view! { <li>{*i}</li> }).collect::<Vec<_>>()}</ul> }\n}\n";
    let out = compile_module(source, &CompileOptions::default()).unwrap();
    assert_eq!(out.templates, 2);
    assert!(!out.code.contains("view!"));
    assert!(out.code.contains("__create_template(\"<ul></ul>\")"));
    assert!(out.code.contains("__create_template(\"<li></li>\")"));
    assert!(out.code.contains("__insert(&__el, *i, None);"));
}

#[test]
fn ssr_modules_use_string_fragments() {
    let source = "fn app(name: &str) -> SsrResult {\n    view! { <p>Hi {name}</p> }\n}\n";
    let out =
        compile_module(source, &CompileOptions::new().with_target(Target::Ssr)).unwrap();
    assert!(out.code.contains("const __SSR: &[&str] = &[\"<p>Hi <!--$-->\", \"</p>\"];"));
    assert!(out.code.contains("__ssr(__SSR, vec![__ssr_child(name)])"));
    assert!(out.code.contains("use ::weft_runtime::{ssr as __ssr, ssr_child as __ssr_child};"));
}

#[test]
fn custom_macro_name_and_runtime_path() {
    let options = CompileOptions::new()
        .with_macro_name("html")
        .with_runtime("crate::rt");
    let out = compile_module("fn a() -> View { html! { <b/> } }", &options).unwrap();
    assert!(out.code.starts_with("use crate::rt::{"));
    assert!(out.code.contains("fn a() -> View { __TMPL.with(__clone) }"));
}

#[test]
fn errors_point_into_the_file() {
    let source = "fn f() -> View {\n    view! { <p foo:x=\"1\"/> }\n}\n";
    let err = compile_module(source, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::AttributeNamespace { .. }));
    assert_eq!(err.location(), (2, 16));
}

#[test]
fn syntax_errors_are_offset_on_later_lines() {
    let source = "fn f() -> View {\n    view! {\n        <div></span>\n    }\n}\n";
    let err = compile_module(source, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Syntax { .. }));
    assert_eq!(err.location(), (3, 14));
}

#[test]
fn errors_in_nested_blocks_point_into_the_file() {
    let source = "fn list(items: Vec<i32>) -> View {\n    view! {\n        <ul>\n            {items.iter().map(|i| {\n                view! { <li bad:x=\"1\">{*i}</li> }\n            }).collect::<Vec<_>>()}\n        </ul>\n    }\n}\n";
    let err = compile_module(source, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::AttributeNamespace { .. }));
    assert_eq!(err.location(), (5, 29));

    let source = "fn f(a: bool) -> View {\n    view! { <div>{a.then(|| view! { <b>{x.map(|y| view! {\n        <i></b>\n    })}</b> })}</div> }\n}\n";
    let err = compile_module(source, &CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::Syntax { .. }));
    assert_eq!(err.location().0, 3);
}

#[test]
fn unclosed_block_is_reported_at_the_macro() {
    let source = "fn f() -> View {\n    view! { <div>";
    let err = compile_module(source, &CompileOptions::default()).unwrap_err();
    match err {
        CompileError::UnclosedView {
            macro_name,
            line,
            col,
        } => {
            assert_eq!(macro_name, "view");
            assert_eq!((line, col), (2, 5));
        }
        other => panic!("unexpected error {other:?}"),
    }
}
