use std::rc::Rc;

use weft_core::{Computed, Signal};

/// An attribute value: present with a string, or absent.
#[derive(Clone)]
pub enum Attribute {
    Value(Option<String>),
    Dynamic(Rc<dyn Fn() -> Option<String>>),
}

impl Attribute {
    /// Current value, calling the getter of a dynamic attribute.
    pub fn resolve(&self) -> Option<String> {
        match self {
            Attribute::Value(value) => value.clone(),
            Attribute::Dynamic(get) => get(),
        }
    }
}

/// Conversion into an [`Attribute`]. `false` and `None` remove the
/// attribute, `true` sets it empty, and closures become getters.
pub trait IntoAttribute {
    fn into_attribute(self) -> Attribute;
}

impl IntoAttribute for Attribute {
    fn into_attribute(self) -> Attribute {
        self
    }
}

impl IntoAttribute for bool {
    fn into_attribute(self) -> Attribute {
        Attribute::Value(self.then(String::new))
    }
}

impl IntoAttribute for &str {
    fn into_attribute(self) -> Attribute {
        Attribute::Value(Some(self.to_string()))
    }
}

impl IntoAttribute for String {
    fn into_attribute(self) -> Attribute {
        Attribute::Value(Some(self))
    }
}

impl IntoAttribute for Rc<str> {
    fn into_attribute(self) -> Attribute {
        Attribute::Value(Some(self.to_string()))
    }
}

impl IntoAttribute for char {
    fn into_attribute(self) -> Attribute {
        Attribute::Value(Some(self.to_string()))
    }
}

macro_rules! number_attributes {
    ($($ty:ty),*) => {
        $(impl IntoAttribute for $ty {
            fn into_attribute(self) -> Attribute {
                Attribute::Value(Some(self.to_string()))
            }
        })*
    };
}

number_attributes!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: IntoAttribute> IntoAttribute for Option<T> {
    fn into_attribute(self) -> Attribute {
        match self {
            Some(value) => value.into_attribute(),
            None => Attribute::Value(None),
        }
    }
}

impl<F, T> IntoAttribute for F
where
    F: Fn() -> T + 'static,
    T: IntoAttribute,
{
    fn into_attribute(self) -> Attribute {
        Attribute::Dynamic(Rc::new(move || self().into_attribute().resolve()))
    }
}

impl<T: Clone + IntoAttribute + 'static> IntoAttribute for Signal<T> {
    fn into_attribute(self) -> Attribute {
        Attribute::Dynamic(Rc::new(move || self.get().into_attribute().resolve()))
    }
}

impl<T: Clone + IntoAttribute + 'static> IntoAttribute for Computed<T> {
    fn into_attribute(self) -> Attribute {
        Attribute::Dynamic(Rc::new(move || self.get().into_attribute().resolve()))
    }
}

/// The string an attribute value renders as, evaluated once.
pub fn attribute_value(value: impl IntoAttribute) -> Option<String> {
    value.into_attribute().resolve()
}

/// Whether a `class:` toggle is on.
pub fn truthy(value: impl IntoAttribute) -> bool {
    attribute_value(value).is_some()
}
