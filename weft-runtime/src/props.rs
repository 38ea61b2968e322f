//! Component properties and element spreads.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use weft_core::effect;
use weft_dom::{Event, EventHandler, Node};

use crate::bindings::{listen_with, set_attr, set_class, set_style};
use crate::view::{IntoView, View};

/// One named entry of [`Props`].
#[derive(Clone)]
pub enum PropValue {
    Value(Rc<dyn Any>),
    /// Read on every access, so reads are tracked by the reader.
    Getter(Rc<dyn Fn() -> Rc<dyn Any>>),
    Children(Rc<dyn Fn() -> View>),
    Handler(EventHandler),
}

/// Named values passed to a component or spread onto an element.
///
/// Keys follow template attribute syntax: plain names become attributes
/// when spread, and `class:`, `style:`, `prop:`, `on:` and `capture:`
/// prefixes select the same bindings they do in a template.
#[derive(Clone, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: 'static>(mut self, name: &str, value: T) -> Self {
        self.insert(name, PropValue::Value(Rc::new(value)));
        self
    }

    pub fn getter<T: 'static>(mut self, name: &str, get: impl Fn() -> T + 'static) -> Self {
        self.insert(
            name,
            PropValue::Getter(Rc::new(move || Rc::new(get()) as Rc<dyn Any>)),
        );
        self
    }

    pub fn children<V: IntoView>(mut self, children: impl Fn() -> V + 'static) -> Self {
        self.insert(
            "children",
            PropValue::Children(Rc::new(move || children().into_view())),
        );
        self
    }

    /// Bubbling listener for `event`, stored under `on:event`.
    pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.insert(&format!("on:{event}"), PropValue::Handler(Rc::new(handler)));
        self
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: &str, value: PropValue) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Value of `name` as `T`, calling getters. `None` when missing or of
    /// another type; string literals are stored as `&'static str`.
    pub fn get<T: Clone + 'static>(&self, name: &str) -> Option<T> {
        match self.value(name)? {
            PropValue::Value(value) => value.downcast_ref::<T>().cloned(),
            PropValue::Getter(get) => get().downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Value of `name` rendered the way an attribute would be.
    pub fn text(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            PropValue::Value(value) => any_to_attribute(&**value),
            PropValue::Getter(get) => any_to_attribute(&*get()),
            _ => None,
        }
    }

    /// The children slot as a view; empty when there is none.
    pub fn children_view(&self) -> View {
        match self.value("children") {
            Some(PropValue::Children(children)) => View::Dynamic(children.clone()),
            _ => View::Empty,
        }
    }

    pub fn value(&self, name: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries that render as markup, evaluated now: plain attributes and
    /// `class:`/`style:` entries with their current values.
    pub(crate) fn attribute_entries(&self) -> Vec<(String, Option<String>)> {
        self.entries
            .iter()
            .filter(|(name, _)| !is_client_only(name))
            .filter_map(|(name, value)| {
                let value = match value {
                    PropValue::Value(value) => any_to_attribute(&**value),
                    PropValue::Getter(get) => any_to_attribute(&*get()),
                    _ => return None,
                };
                Some((name.clone(), value))
            })
            .collect()
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

fn is_client_only(name: &str) -> bool {
    name == "children"
        || name.starts_with("on:")
        || name.starts_with("capture:")
        || name.starts_with("prop:")
}

/// Combine props sources; a key set by a later source wins.
pub fn merge_props(sources: Vec<Props>) -> Props {
    let mut merged = Props::new();
    for source in sources {
        for (name, value) in source.entries {
            merged.insert(&name, value);
        }
    }
    merged
}

/// Attribute text for a type-erased value: strings and numbers as
/// written, `true` as empty, `false` and `None` as absent.
pub(crate) fn any_to_attribute(value: &dyn Any) -> Option<String> {
    macro_rules! display {
        ($($ty:ty),*) => {
            $(if let Some(v) = value.downcast_ref::<$ty>() {
                return Some(v.to_string());
            })*
        };
    }
    if let Some(v) = value.downcast_ref::<bool>() {
        return v.then(String::new);
    }
    if let Some(v) = value.downcast_ref::<Option<String>>() {
        return v.clone();
    }
    if let Some(v) = value.downcast_ref::<Option<&'static str>>() {
        return v.map(str::to_string);
    }
    display!(
        String, &'static str, Rc<str>, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64,
        u128, usize, f32, f64
    );
    tracing::debug!("spread value has no attribute form");
    None
}

/// Apply every entry of `props` to `el`. Getter entries stay bound.
pub fn spread(el: &Node, props: Props) {
    let mut entries = props.entries;
    // Whole `class` and `style` values go first so toggles apply on top.
    entries.sort_by_key(|(name, _)| !matches!(name.as_str(), "class" | "style"));
    for (name, value) in entries {
        if name == "children" {
            continue;
        }
        if let PropValue::Handler(handler) = value {
            match (name.strip_prefix("on:"), name.strip_prefix("capture:")) {
                (Some(event), _) => {
                    listen_with(el, event, handler, false);
                }
                (None, Some(event)) => {
                    listen_with(el, event, handler, true);
                }
                (None, None) => {
                    tracing::debug!(name = %name, "handler spread without an event prefix");
                }
            }
            continue;
        }
        let (get, dynamic) = match value {
            PropValue::Value(value) => {
                let get: Rc<dyn Fn() -> Rc<dyn Any>> = Rc::new(move || value.clone());
                (get, false)
            }
            PropValue::Getter(get) => (get, true),
            _ => continue,
        };
        let el = el.clone();
        let apply = move || {
            let current = get();
            if let Some(property) = name.strip_prefix("prop:") {
                el.set_property(property, current);
                return;
            }
            let text = any_to_attribute(&*current);
            if let Some(class) = name.strip_prefix("class:") {
                set_class(&el, class, text.is_some());
            } else if let Some(property) = name.strip_prefix("style:") {
                set_style(&el, property, text.as_deref());
            } else {
                set_attr(&el, &name, text.as_deref());
            }
        };
        if dynamic {
            effect(apply);
        } else {
            apply();
        }
    }
}
