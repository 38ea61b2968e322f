use pretty_assertions::assert_eq;
use weft_compiler::{CompileOptions, CompiledTemplate, Target, compile_template};

fn ssr(source: &str) -> CompiledTemplate {
    compile_template(source, &CompileOptions::new().with_target(Target::Ssr)).unwrap()
}

#[test]
fn static_markup_is_one_fragment() {
    let out = ssr(r#"<div class="a"><span>Hi</span></div>"#);
    assert_eq!(out.code, "__ssr(__SSR, vec![])");
    assert_eq!(
        out.hoisted,
        "const __SSR: &[&str] = &[\"<div class=\\\"a\\\"><span>Hi</span></div>\"];\n"
    );
    assert_eq!(out.imports, "use ::weft_runtime::{ssr as __ssr};\n");
}

#[test]
fn sole_dynamic_child_has_no_opening_marker() {
    let out = ssr(r#"<div class="a"><span>Hi</span><b>{count()}</b></div>"#);
    assert_eq!(out.code, "__ssr(__SSR, vec![__ssr_child(count())])");
    assert!(out.hoisted.contains(
        r#"&["<div class=\"a\"><span>Hi</span><b>", "</b></div>"]"#
    ));
}

#[test]
fn mixed_children_open_a_marker() {
    let out = ssr("<p>Hello {name}!</p>");
    assert_eq!(out.code, "__ssr(__SSR, vec![__ssr_child(name)])");
    assert!(out.hoisted.contains(r#"&["<p>Hello <!--$-->", "!</p>"]"#));
}

#[test]
fn dynamic_attributes_become_parts() {
    let out = ssr(r#"<a href={url} class="x" class:on={active()} style:color={c} var:gap={g}>t</a>"#);
    assert_eq!(
        out.code,
        r#"__ssr(__SSR, vec![__ssr_attr("href", url), __classes("x", &[("on", __truthy(active()))]), __styles("", &[("color", __attribute_value(c)), ("--gap", __attribute_value(g))])])"#
    );
    assert!(out.hoisted.contains(r#"&["<a", "", "", ">t</a>"]"#));
}

#[test]
fn dynamic_class_and_style_are_the_toggle_base() {
    let out = ssr(r#"<div class={cls()} class:active={on()} style={css} style:color={c} title={t}>x</div>"#);
    assert_eq!(
        out.code,
        r#"__ssr(__SSR, vec![__ssr_attr("title", t), __classes(cls(), &[("active", __truthy(on()))]), __styles(css, &[("color", __attribute_value(c))])])"#
    );
    assert!(out.hoisted.contains(r#"&["<div", "", "", ">x</div>"]"#));
}

#[test]
fn dynamic_class_without_toggles_is_a_plain_attribute() {
    let out = ssr(r#"<div class={cls()}>x</div>"#);
    assert_eq!(out.code, r#"__ssr(__SSR, vec![__ssr_attr("class", cls())])"#);
}

#[test]
fn client_only_bindings_are_skipped() {
    let out = ssr(r#"<button on:click={go} ref={r} use:tip prop:value={v} {...rest}>+</button>"#);
    assert_eq!(out.code, "__ssr(__SSR, vec![__ssr_spread(rest)])");
    assert!(out.hoisted.contains(r#"&["<button", ">+</button>"]"#));
}

#[test]
fn root_level_values_have_no_markers() {
    let out = ssr("<h1>T</h1>{count()}<Counter/>");
    assert_eq!(
        out.code,
        "__ssr(__SSR, vec![__ssr_value(count()), __ssr_value(__create_component(Counter, __Props::new()))])"
    );
    assert!(out.hoisted.contains(r#"&["<h1>T</h1>", "", ""]"#));
}

#[test]
fn components_inside_elements_are_children() {
    let out = ssr("<div><h1>T</h1><Counter/></div>");
    assert_eq!(
        out.code,
        "__ssr(__SSR, vec![__ssr_child(__create_component(Counter, __Props::new()))])"
    );
    assert!(out.hoisted.contains(r#""<div><h1>T</h1><!--$-->""#));
}

#[test]
fn component_children_render_to_strings() {
    let out = ssr("<Card><p>{x}</p></Card>");
    assert_eq!(
        out.code,
        "__ssr(__SSR_2, vec![__ssr_value(__create_component(Card, __Props::new().children(move || __ssr(__SSR, vec![__ssr_child(x)]))))])"
    );
}

#[test]
fn void_and_svg_elements() {
    let out = ssr(r#"<div><br/><svg><path d="M0"/></svg></div>"#);
    assert!(out
        .hoisted
        .contains(r#"<div><br><svg><path d=\"M0\"></path></svg></div>"#));
}

#[test]
fn literal_children_are_inlined() {
    let out = ssr(r#"<p>{"a<b"}{1}{false}</p>"#);
    assert_eq!(out.code, "__ssr(__SSR, vec![])");
    assert!(out.hoisted.contains("<p>a&lt;b1</p>"));
}
