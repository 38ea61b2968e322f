//! The runtime value of a template position.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use weft_core::{Computed, Scope, Signal, untrack};
use weft_dom::Node;

use crate::ssr::SsrResult;

/// What a template position renders.
#[derive(Clone, Default)]
pub enum View {
    /// Nothing: `()`, `None`, `false` and `true`.
    #[default]
    Empty,
    Text(Rc<str>),
    Node(Node),
    List(Vec<View>),
    /// Re-evaluated whenever the signals it reads change.
    Dynamic(Rc<dyn Fn() -> View>),
    /// Evaluated at most once, untracked. Components render through this.
    Deferred(Rc<Lazy>),
    /// Markup rendered on the server.
    Html(Rc<str>),
}

impl View {
    pub fn list(items: Vec<View>) -> Self {
        View::List(items)
    }

    pub fn text(text: impl Into<Rc<str>>) -> Self {
        View::Text(text.into())
    }

    pub fn dynamic(f: impl Fn() -> View + 'static) -> Self {
        View::Dynamic(Rc::new(f))
    }

    /// Whether rendering needs an effect: a getter at the top or inside a
    /// list.
    pub fn is_reactive(&self) -> bool {
        match self {
            View::Dynamic(_) => true,
            View::List(items) => items.iter().any(View::is_reactive),
            _ => false,
        }
    }
}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Empty => f.write_str("Empty"),
            View::Text(text) => f.debug_tuple("Text").field(text).finish(),
            View::Node(node) => f.debug_tuple("Node").field(node).finish(),
            View::List(items) => f.debug_tuple("List").field(items).finish(),
            View::Dynamic(_) => f.write_str("Dynamic(..)"),
            View::Deferred(_) => f.write_str("Deferred(..)"),
            View::Html(html) => f.debug_tuple("Html").field(html).finish(),
        }
    }
}

/// A view computed on first use, in the scope that created it.
pub struct Lazy {
    init: RefCell<Option<Box<dyn FnOnce() -> View>>>,
    value: RefCell<Option<View>>,
    owner: Option<Scope>,
}

impl Lazy {
    pub fn new(init: impl FnOnce() -> View + 'static) -> Self {
        Self {
            init: RefCell::new(Some(Box::new(init))),
            value: RefCell::new(None),
            owner: Scope::current(),
        }
    }

    /// The view, computing it if needed. Effects created by the computation
    /// belong to the creating scope, not to whoever forces it first.
    pub fn force(&self) -> View {
        if let Some(view) = self.value.borrow().as_ref() {
            return view.clone();
        }
        let Some(init) = self.init.borrow_mut().take() else {
            // Re-entered while computing.
            return View::Empty;
        };
        let view = match self.owner {
            Some(owner) => owner.run(init),
            None => untrack(init),
        };
        *self.value.borrow_mut() = Some(view.clone());
        view
    }
}

/// Conversion into a [`View`]. Closures become reactive getters.
pub trait IntoView {
    fn into_view(self) -> View;
}

impl IntoView for View {
    fn into_view(self) -> View {
        self
    }
}

impl IntoView for () {
    fn into_view(self) -> View {
        View::Empty
    }
}

impl IntoView for Node {
    fn into_view(self) -> View {
        View::Node(self)
    }
}

impl IntoView for bool {
    fn into_view(self) -> View {
        View::Empty
    }
}

impl IntoView for &str {
    fn into_view(self) -> View {
        View::Text(self.into())
    }
}

impl IntoView for String {
    fn into_view(self) -> View {
        View::Text(self.into())
    }
}

impl IntoView for Rc<str> {
    fn into_view(self) -> View {
        View::Text(self)
    }
}

impl IntoView for char {
    fn into_view(self) -> View {
        View::Text(self.to_string().into())
    }
}

macro_rules! number_views {
    ($($ty:ty),*) => {
        $(impl IntoView for $ty {
            fn into_view(self) -> View {
                View::Text(self.to_string().into())
            }
        })*
    };
}

number_views!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: IntoView> IntoView for Option<T> {
    fn into_view(self) -> View {
        self.map_or(View::Empty, IntoView::into_view)
    }
}

impl<T: IntoView> IntoView for Vec<T> {
    fn into_view(self) -> View {
        View::List(self.into_iter().map(IntoView::into_view).collect())
    }
}

impl IntoView for SsrResult {
    fn into_view(self) -> View {
        View::Html(self.into_string().into())
    }
}

impl<F, V> IntoView for F
where
    F: Fn() -> V + 'static,
    V: IntoView,
{
    fn into_view(self) -> View {
        View::Dynamic(Rc::new(move || self().into_view()))
    }
}

impl<T: Clone + IntoView + 'static> IntoView for Signal<T> {
    fn into_view(self) -> View {
        View::Dynamic(Rc::new(move || self.get().into_view()))
    }
}

impl<T: Clone + IntoView + 'static> IntoView for Computed<T> {
    fn into_view(self) -> View {
        View::Dynamic(Rc::new(move || self.get().into_view()))
    }
}
