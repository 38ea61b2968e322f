//! Bindings from compiled templates to element attributes, properties,
//! listeners, refs and directives.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use weft_core::{Computed, Scope, Signal, effect, on_dispose, untrack};
use weft_dom::{Event, EventHandler, ListenerId, Node};

use crate::attribute::{Attribute, IntoAttribute};

/// Apply `value` now, and again whenever a dynamic value changes.
pub(crate) fn bind(value: Attribute, mut apply: impl FnMut(Option<String>) + 'static) {
    match value {
        Attribute::Value(value) => apply(value),
        Attribute::Dynamic(get) => {
            effect(move || apply(get()));
        }
    }
}

/// Property holding an element's class and style toggles.
const TOGGLES: &str = "$toggles";

/// Class toggles and style properties set on one element, kept so that a
/// binding replacing the whole `class` or `style` attribute keeps them.
#[derive(Default)]
struct Toggles {
    classes: Vec<(String, bool)>,
    styles: Vec<(String, Option<String>)>,
}

fn toggles_of(el: &Node) -> Option<Rc<RefCell<Toggles>>> {
    el.property(TOGGLES)?.downcast::<RefCell<Toggles>>().ok()
}

fn record(el: &Node, f: impl FnOnce(&mut Toggles)) {
    let toggles = match toggles_of(el) {
        Some(toggles) => toggles,
        None => {
            let toggles = Rc::new(RefCell::new(Toggles::default()));
            el.set_property(TOGGLES, toggles.clone());
            toggles
        }
    };
    f(&mut toggles.borrow_mut());
}

fn upsert<V>(entries: &mut Vec<(String, V)>, name: &str, value: V) {
    match entries.iter_mut().find(|(n, _)| n == name) {
        Some(entry) => entry.1 = value,
        None => entries.push((name.to_string(), value)),
    }
}

pub(crate) fn set_attr(el: &Node, name: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            if el.get_attribute(name).as_deref() != Some(value) {
                el.set_attribute(name, value);
            }
        }
        None => el.remove_attribute(name),
    }
    if !matches!(name, "class" | "style") {
        return;
    }
    let Some(toggles) = toggles_of(el) else {
        return;
    };
    let toggles = toggles.borrow();
    if name == "class" {
        for (class, on) in &toggles.classes {
            el.toggle_class(class, *on);
        }
    } else {
        for (property, value) in &toggles.styles {
            el.set_style_property(property, value.as_deref());
        }
    }
    normalize(el, name);
}

/// Rewrite a toggled `class` or `style` the way the server prints it, dropping
/// it when nothing is left.
fn normalize(el: &Node, name: &str) {
    let Some(current) = el.get_attribute(name) else {
        return;
    };
    let normal = if name == "class" {
        el.class_list().join(" ")
    } else {
        weft_dom::serialize_style(&el.style_declarations())
    };
    if normal.is_empty() {
        el.remove_attribute(name);
    } else if normal != current {
        el.set_attribute(name, &normal);
    }
}

pub(crate) fn set_class(el: &Node, name: &str, on: bool) {
    record(el, |toggles| upsert(&mut toggles.classes, name, on));
    el.toggle_class(name, on);
    normalize(el, "class");
}

pub(crate) fn set_style(el: &Node, name: &str, value: Option<&str>) {
    record(el, |toggles| upsert(&mut toggles.styles, name, value.map(str::to_string)));
    el.set_style_property(name, value);
    normalize(el, "style");
}

/// Set or remove attribute `name`. Rewriting `class` or `style` keeps the
/// toggles bound with [`class`] and [`style`].
pub fn attr(el: &Node, name: &str, value: impl IntoAttribute) {
    let (el, name) = (el.clone(), name.to_string());
    bind(value.into_attribute(), move |value| set_attr(&el, &name, value.as_deref()));
}

/// Toggle class `name`: on for any present value.
pub fn class(el: &Node, name: &str, value: impl IntoAttribute) {
    let (el, name) = (el.clone(), name.to_string());
    bind(value.into_attribute(), move |value| set_class(&el, &name, value.is_some()));
}

/// Set or remove style property `name`.
pub fn style(el: &Node, name: &str, value: impl IntoAttribute) {
    let (el, name) = (el.clone(), name.to_string());
    bind(value.into_attribute(), move |value| set_style(&el, &name, value.as_deref()));
}

/// Set or remove the CSS custom property `--name`.
pub fn cssvar(el: &Node, name: &str, value: impl IntoAttribute) {
    style(el, &format!("--{name}"), value);
}

/// A property value for [`prop`].
#[derive(Clone)]
pub enum Property {
    Value(Rc<dyn Any>),
    Dynamic(Rc<dyn Fn() -> Rc<dyn Any>>),
}

pub trait IntoProperty {
    fn into_property(self) -> Property;
}

macro_rules! plain_properties {
    ($($ty:ty),*) => {
        $(impl IntoProperty for $ty {
            fn into_property(self) -> Property {
                Property::Value(Rc::new(self))
            }
        })*
    };
}

plain_properties!(
    bool, char, String, &'static str, Rc<str>, i8, i16, i32, i64, i128, isize, u8, u16, u32,
    u64, u128, usize, f32, f64
);

impl<T: 'static> IntoProperty for Option<T> {
    fn into_property(self) -> Property {
        Property::Value(Rc::new(self))
    }
}

impl<T: 'static> IntoProperty for Vec<T> {
    fn into_property(self) -> Property {
        Property::Value(Rc::new(self))
    }
}

impl IntoProperty for Rc<dyn Any> {
    fn into_property(self) -> Property {
        Property::Value(self)
    }
}

impl<F, T> IntoProperty for F
where
    F: Fn() -> T + 'static,
    T: 'static,
{
    fn into_property(self) -> Property {
        Property::Dynamic(Rc::new(move || Rc::new(self()) as Rc<dyn Any>))
    }
}

impl<T: Clone + 'static> IntoProperty for Signal<T> {
    fn into_property(self) -> Property {
        Property::Dynamic(Rc::new(move || Rc::new(self.get()) as Rc<dyn Any>))
    }
}

impl<T: Clone + 'static> IntoProperty for Computed<T> {
    fn into_property(self) -> Property {
        Property::Dynamic(Rc::new(move || Rc::new(self.get()) as Rc<dyn Any>))
    }
}

/// Set property `name`, which is never rendered as markup.
pub fn prop(el: &Node, name: &str, value: impl IntoProperty) {
    match value.into_property() {
        Property::Value(value) => el.set_property(name, value),
        Property::Dynamic(get) => {
            let (el, name) = (el.clone(), name.to_string());
            effect(move || el.set_property(&name, get()));
        }
    }
}

/// A registered event listener.
#[derive(Clone, Debug)]
pub struct Listener {
    node: Node,
    id: ListenerId,
}

impl Listener {
    /// Unregister. Returns `false` if it was already removed.
    pub fn remove(&self) -> bool {
        self.node.remove_event_listener(self.id)
    }
}

/// Listen for `event` on `el`. Inside a scope the listener is removed when
/// the scope is disposed.
pub fn listen(
    el: &Node,
    event: &str,
    handler: impl Fn(&Event) + 'static,
    capture: bool,
) -> Listener {
    listen_with(el, event, Rc::new(handler), capture)
}

pub(crate) fn listen_with(el: &Node, event: &str, handler: EventHandler, capture: bool) -> Listener {
    let id = el.add_event_listener(event, capture, handler);
    let listener = Listener {
        node: el.clone(),
        id,
    };
    if Scope::current().is_some() {
        let registered = listener.clone();
        on_dispose(move || {
            registered.remove();
        });
    }
    listener
}

/// A slot an element reference is written to.
#[derive(Clone, Default)]
pub struct NodeRef(Rc<RefCell<Option<Node>>>);

impl NodeRef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Node> {
        self.0.borrow().clone()
    }

    pub fn set(&self, node: Node) {
        *self.0.borrow_mut() = Some(node);
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.get()).finish()
    }
}

/// Something `ref={..}` can hand an element to.
pub trait RefTarget {
    fn assign(self, node: Node);
}

impl RefTarget for NodeRef {
    fn assign(self, node: Node) {
        self.set(node);
    }
}

impl RefTarget for &NodeRef {
    fn assign(self, node: Node) {
        self.set(node);
    }
}

impl<F: FnOnce(Node)> RefTarget for F {
    fn assign(self, node: Node) {
        self(node);
    }
}

pub fn use_ref(el: &Node, target: impl RefTarget) {
    target.assign(el.clone());
}

/// Run directive `f` on `el` with `arg`, without tracking.
pub fn use_directive<A>(el: &Node, f: impl FnOnce(&Node, A), arg: A) {
    untrack(|| f(el, arg));
}
