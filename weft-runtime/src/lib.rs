//! Runtime for compiled weft templates.
//!
//! Compiled code clones hoisted [`Template`]s, walks to the nodes it binds,
//! and hands dynamic children to [`insert`] / [`insert_at_marker`], which
//! keep each region up to date with one effect and reconcile lists in
//! place. The same code adopts server-rendered markup when run under
//! [`hydrate`]. Server templates render to strings through [`ssr`] and its
//! helpers.
//!
//! ```
//! use weft_runtime::{View, render, weft_core::signal, weft_dom::Node};
//!
//! let container = Node::element("main");
//! let count = signal(1);
//! let scope = render(move || View::dynamic(move || View::text(count.get().to_string())), &container);
//! assert_eq!(container.inner_html(), "1");
//! count.set(2);
//! assert_eq!(container.inner_html(), "2");
//! scope.dispose();
//! count.set(3);
//! assert_eq!(container.inner_html(), "2");
//! ```

mod attribute;
mod bindings;
mod component;
mod hydration;
mod insert;
mod props;
mod reconcile;
mod ssr;
mod template;
mod view;

pub use weft_core;
pub use weft_dom;

use weft_core::{Scope, create_root};
use weft_dom::Node;

pub use attribute::{Attribute, IntoAttribute, attribute_value, truthy};
pub use bindings::{
    IntoProperty, Listener, NodeRef, Property, RefTarget, attr, class, cssvar, listen, prop, style,
    use_directive, use_ref,
};
pub use component::create_component;
pub use hydration::{HydrationStats, is_hydrating};
pub use insert::{insert, insert_at_marker};
pub use props::{PropValue, Props, merge_props, spread};
pub use reconcile::reconcile;
pub use ssr::{SsrResult, classes, escape, ssr, ssr_attr, ssr_child, ssr_spread, ssr_value, styles};
pub use template::{Template, clone, create_svg_template, create_template, walk};
pub use view::{IntoView, Lazy, View};

/// Render the view built by `f` into `container`, after its existing
/// children. Disposing the returned scope stops every update.
pub fn render<V: IntoView>(f: impl FnOnce() -> V, container: &Node) -> Scope {
    let ((), scope) = create_root(|| insert::insert(container, f(), None));
    tracing::debug!(children = container.child_count(), "rendered");
    scope
}

/// Attach the view built by `f` to the server-rendered children of
/// `container`. Matching markup is adopted without creating nodes; regions
/// that differ are rendered fresh and counted as misses.
pub fn hydrate<V: IntoView>(f: impl FnOnce() -> V, container: &Node) -> (Scope, HydrationStats) {
    hydration::reset_stats();
    let claim = hydration::sole_child_claim(container);
    let ((), scope) = create_root(|| {
        let view = hydration::claiming(&claim, || f().into_view());
        let region = insert::Region::new(container.clone(), None, None);
        insert::mount(region, view, Some(claim.clone()));
    });
    let stats = hydration::stats();
    tracing::debug!(claims = stats.claims, misses = stats.misses, "hydrated");
    (scope, stats)
}

/// Render the view built by `f` to markup. Dynamic parts are read once.
pub fn render_to_string<V: IntoView>(f: impl FnOnce() -> V) -> String {
    let (html, scope) = create_root(|| ssr::ssr_value(f()));
    scope.dispose();
    html
}
