use std::collections::HashMap;

/// Ordered table of generated identifiers and their initializers.
///
/// Each base name has its own counter: the first `declare("__el", ..)`
/// yields `__el`, the next `__el_2`, then `__el_3`. Entries keep insertion
/// order so emitted code is stable.
#[derive(Debug, Clone, Default)]
pub struct Declarations {
    entries: Vec<(String, Option<String>)>,
    counters: HashMap<String, usize>,
}

impl Declarations {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_name(&mut self, base: &str) -> String {
        let count = self.counters.entry(base.to_string()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base.to_string()
        } else {
            format!("{base}_{count}")
        }
    }

    pub fn declare(&mut self, base: &str, init: impl Into<String>) -> String {
        let id = self.next_name(base);
        self.entries.push((id.clone(), Some(init.into())));
        id
    }

    /// Allocate a name whose initializer is filled in later with
    /// [`Declarations::update`].
    pub fn reserve(&mut self, base: &str) -> String {
        let id = self.next_name(base);
        self.entries.push((id.clone(), None));
        id
    }

    /// Set the initializer of `id`. Returns `false` for unknown ids.
    pub fn update(&mut self, id: &str, init: impl Into<String>) -> bool {
        match self.entries.iter_mut().find(|(name, _)| name == id) {
            Some((_, slot)) => {
                *slot = Some(init.into());
                true
            }
            None => false,
        }
    }

    /// Like `declare`, but reuses an existing entry with the same base and
    /// an identical initializer.
    pub fn hoist(&mut self, base: &str, init: impl Into<String>) -> String {
        let init = init.into();
        let existing = self.entries.iter().find(|(name, value)| {
            value.as_deref() == Some(init.as_str()) && is_instance_of(name, base)
        });
        match existing {
            Some((name, _)) => name.clone(),
            None => self.declare(base, init),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == id)
            .and_then(|(_, init)| init.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, init)| (name.as_str(), init.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_instance_of(name: &str, base: &str) -> bool {
    match name.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest
            .strip_prefix('_')
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit())),
        None => false,
    }
}
