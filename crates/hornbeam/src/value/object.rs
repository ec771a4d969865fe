//! Shared containers: objects and arrays

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use super::Value;

/// Longest array the dense element storage will grow to.
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// A write would grow an array past [`MAX_ARRAY_LENGTH`].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid array length {0}")]
pub struct ArrayLengthError(pub usize);

/// Storage behind an [`ObjectRef`].
///
/// Uses IndexMap to preserve property insertion order, which is also the
/// `for-in` enumeration order.
#[derive(Default)]
pub struct Object {
    /// Own properties in insertion order
    pub properties: IndexMap<String, Value>,

    /// Object consulted when an own property is missing
    pub prototype: Option<ObjectRef>,
}

/// A shared, mutable object handle. Clones alias the same object.
#[derive(Clone, Default)]
pub struct ObjectRef(Rc<RefCell<Object>>);

impl ObjectRef {
    /// Create an empty object with no prototype.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object linked to `prototype`.
    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        ObjectRef(Rc::new(RefCell::new(Object {
            properties: IndexMap::new(),
            prototype,
        })))
    }

    /// Create an object from key/value pairs (builder style).
    pub fn from_pairs<K: Into<String>>(pairs: impl IntoIterator<Item = (K, Value)>) -> Self {
        let object = Self::new();
        for (key, value) in pairs {
            object.set(key, value);
        }
        object
    }

    /// Read a property, following the prototype chain.
    /// Missing properties read as `undefined`.
    pub fn get(&self, key: &str) -> Value {
        self.lookup(key).unwrap_or_default()
    }

    /// Read a property, following the prototype chain.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        let mut current = Some(self.clone());
        while let Some(object) = current {
            let inner = object.0.borrow();
            if let Some(value) = inner.properties.get(key) {
                return Some(value.clone());
            }
            current = inner.prototype.clone();
        }
        None
    }

    /// Read an own property only.
    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.0.borrow().properties.get(key).cloned()
    }

    /// Create or overwrite an own property.
    pub fn set(&self, key: impl Into<String>, value: Value) {
        self.0.borrow_mut().properties.insert(key.into(), value);
    }

    /// Check for an own or inherited property.
    pub fn has_property(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Check for an own property.
    pub fn has_own(&self, key: &str) -> bool {
        self.0.borrow().properties.contains_key(key)
    }

    /// Remove an own property, keeping the order of the rest.
    /// Returns whether it existed.
    pub fn remove(&self, key: &str) -> bool {
        self.0.borrow_mut().properties.shift_remove(key).is_some()
    }

    /// Own property names in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.0.borrow().properties.keys().cloned().collect()
    }

    /// Own properties in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        self.0
            .borrow()
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Number of own properties.
    pub fn len(&self) -> usize {
        self.0.borrow().properties.len()
    }

    /// Whether the object has no own properties.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The prototype link.
    pub fn prototype(&self) -> Option<ObjectRef> {
        self.0.borrow().prototype.clone()
    }

    /// Whether `prototype` appears anywhere in this object's prototype chain.
    pub fn inherits_from(&self, prototype: &ObjectRef) -> bool {
        let mut current = self.prototype();
        while let Some(object) = current {
            if object.ptr_eq(prototype) {
                return true;
            }
            current = object.prototype();
        }
        false
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Drop every property and the prototype link.
    pub(crate) fn clear(&self) {
        if let Ok(mut inner) = self.0.try_borrow_mut() {
            inner.properties.clear();
            inner.prototype = None;
        }
    }
}

/// A shared, mutable array handle. Clones alias the same array.
#[derive(Clone, Default)]
pub struct ArrayRef(Rc<RefCell<Vec<Value>>>);

impl ArrayRef {
    /// Wrap a vector.
    pub fn new(items: Vec<Value>) -> Self {
        ArrayRef(Rc::new(RefCell::new(items)))
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether the array is empty.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Element at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Store at `index`, padding with `undefined` when writing past the end.
    ///
    /// # Errors
    ///
    /// `ArrayLengthError` when the array would grow past [`MAX_ARRAY_LENGTH`];
    /// the array is left untouched.
    pub fn set(&self, index: usize, value: Value) -> Result<(), ArrayLengthError> {
        let mut items = self.0.borrow_mut();
        if index >= items.len() {
            if index >= MAX_ARRAY_LENGTH {
                return Err(ArrayLengthError(index.saturating_add(1)));
            }
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value;
        Ok(())
    }

    /// Resize to `len`, padding with `undefined`.
    ///
    /// # Errors
    ///
    /// `ArrayLengthError` when `len` exceeds [`MAX_ARRAY_LENGTH`].
    pub fn truncate_or_extend(&self, len: usize) -> Result<(), ArrayLengthError> {
        if len > MAX_ARRAY_LENGTH {
            return Err(ArrayLengthError(len));
        }
        self.0.borrow_mut().resize(len, Value::Undefined);
        Ok(())
    }

    /// Append an element.
    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Identity comparison.
    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub(crate) fn strong_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub(crate) fn clear(&self) {
        if let Ok(mut items) = self.0.try_borrow_mut() {
            items.clear();
        }
    }
}
