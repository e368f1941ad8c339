//! Records flowing between operators.
//!
//! A [`Record`] is the tuple of values bound for one input row. Its
//! [`RecordLayout`] names each slot (the variables bound by the matching
//! stages), and is shared by every record an operator produces.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use strata_core::Value;

/// Names the slots of a record, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    /// Slot names in order.
    names: Vec<Arc<str>>,
    /// Map from slot name to index.
    name_to_index: HashMap<Arc<str>, usize>,
}

impl RecordLayout {
    /// Creates a layout from slot names.
    ///
    /// If a name repeats, lookups by name resolve to its first slot.
    #[must_use]
    pub fn new<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let names: Vec<Arc<str>> = names.into_iter().map(|s| Arc::from(s.as_ref())).collect();
        let mut name_to_index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            name_to_index.entry(Arc::clone(name)).or_insert(i);
        }
        Self { names, name_to_index }
    }

    /// Creates a layout with no slots.
    #[must_use]
    pub fn empty() -> Self {
        Self { names: Vec::new(), name_to_index: HashMap::new() }
    }

    /// Returns a shared empty layout.
    #[must_use]
    pub fn shared_empty() -> Arc<Self> {
        static EMPTY: OnceLock<Arc<RecordLayout>> = OnceLock::new();
        Arc::clone(EMPTY.get_or_init(|| Arc::new(Self::empty())))
    }

    /// Returns the slot names as string slices.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(AsRef::as_ref).collect()
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the layout has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Gets the slot index for a name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Gets the name of a slot.
    #[must_use]
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(AsRef::as_ref)
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Vec<&str>> for RecordLayout {
    fn from(names: Vec<&str>) -> Self {
        Self::new(names)
    }
}

/// The values bound for one input row.
///
/// The driver owns a single record slot and passes it down on every pull;
/// the operator that yields a row overwrites it. Readers only see the
/// record until the next pull.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// The layout naming each slot.
    layout: Arc<RecordLayout>,
    /// The bound values.
    values: Vec<Value>,
}

impl Record {
    /// Creates a record with the given layout and values.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the value count does not match the layout.
    #[must_use]
    pub fn new(layout: Arc<RecordLayout>, values: Vec<Value>) -> Self {
        debug_assert_eq!(
            layout.len(),
            values.len(),
            "Record values count must match layout slot count"
        );
        Self { layout, values }
    }

    /// Creates a record with no slots.
    #[must_use]
    pub fn empty() -> Self {
        Self { layout: RecordLayout::shared_empty(), values: Vec::new() }
    }

    /// Returns the layout of this record.
    #[must_use]
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Returns the bound values.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets a value by slot index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Gets a value by slot name.
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&Value> {
        self.layout.index_of(name).and_then(|i| self.values.get(i))
    }

    /// Replaces the contents of this record, reusing its value buffer.
    pub fn fill(&mut self, layout: &Arc<RecordLayout>, values: &[Value]) {
        if !Arc::ptr_eq(&self.layout, layout) {
            self.layout = Arc::clone(layout);
        }
        self.values.clear();
        self.values.extend_from_slice(values);
    }

    /// Consumes the record and returns the values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_basic() {
        let layout = RecordLayout::new(["a", "b"]);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.index_of("a"), Some(0));
        assert_eq!(layout.index_of("b"), Some(1));
        assert_eq!(layout.index_of("c"), None);
        assert_eq!(layout.name_at(1), Some("b"));
        assert_eq!(layout.names(), vec!["a", "b"]);
    }

    #[test]
    fn repeated_names_resolve_to_first_slot() {
        let layout = RecordLayout::new(["x", "x"]);
        assert_eq!(layout.index_of("x"), Some(0));
    }

    #[test]
    fn record_basic() {
        let layout = Arc::new(RecordLayout::new(["id", "name"]));
        let record = Record::new(Arc::clone(&layout), vec![Value::Int(1), Value::from("Alice")]);

        assert_eq!(record.len(), 2);
        assert_eq!(record.get(0), Some(&Value::Int(1)));
        assert_eq!(record.get_by_name("name"), Some(&Value::from("Alice")));
        assert_eq!(record.get_by_name("missing"), None);
    }

    #[test]
    fn fill_overwrites_slot() {
        let layout = Arc::new(RecordLayout::new(["n"]));
        let mut record = Record::empty();
        assert!(record.is_empty());

        record.fill(&layout, &[Value::Int(1)]);
        assert_eq!(record.values(), &[Value::Int(1)]);

        record.fill(&layout, &[Value::Int(2)]);
        assert_eq!(record.values(), &[Value::Int(2)]);
        assert_eq!(record.layout().names(), vec!["n"]);
    }

    #[test]
    fn shared_empty_layout_is_reused() {
        let a = RecordLayout::shared_empty();
        let b = RecordLayout::shared_empty();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(Record::default().layout().is_empty());
    }
}
