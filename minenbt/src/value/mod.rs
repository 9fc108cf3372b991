mod display;

#[cfg(feature = "arbitrary1")]
mod arb;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::Kind;

/// A named node in an NBT tree. The tree is owned from the root down: each
/// compound owns its child tags and each list owns its elements, so dropping
/// a tag frees its whole subtree.
///
/// ```
/// use minenbt::{Kind, Tag};
///
/// let mut level = Tag::compound("Level");
/// level.add_child(Tag::new("xPos", 3i32)).unwrap();
/// level.add_child(Tag::new("Blocks", vec![0u8; 16])).unwrap();
///
/// let x = level.find_child("xPos").and_then(Tag::as_int);
/// assert_eq!(x, Some(3));
///
/// // Casting to the wrong kind never reinterprets the data.
/// assert_eq!(level.find_child("xPos").and_then(Tag::as_str), None);
/// assert_eq!(level.len(), Some(2));
/// assert_eq!(level.kind(), Kind::Compound);
/// ```
#[derive(Debug, PartialEq, Serialize)]
pub struct Tag {
    name: String,
    value: Value,
}

/// The payload of a tag or a list element.
#[derive(Debug, PartialEq, Serialize)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(#[serde(with = "serde_bytes")] Vec<u8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

/// An ordered sequence of unnamed values that all have the same kind.
///
/// A list with an element kind of [`Kind::End`] is always empty. Pushing to
/// such a list gives it the kind of the first value.
#[derive(Debug, PartialEq, Serialize)]
pub struct List {
    kind: Kind,
    elements: Vec<Value>,
}

/// Named child tags in insertion order. Names are not required to be unique;
/// lookups return the first match.
#[derive(Debug, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Compound {
    children: Vec<Tag>,
}

macro_rules! casts {
    ($($fn:ident, $fn_mut:ident => $variant:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("The payload if this is a ", stringify!($variant), ".")]
            pub fn $fn(&self) -> Option<&$ty> {
                match self {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            #[doc = concat!("The payload if this is a ", stringify!($variant), ".")]
            pub fn $fn_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

impl Value {
    /// The kind written on the wire for this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Byte(_) => Kind::Byte,
            Value::Short(_) => Kind::Short,
            Value::Int(_) => Kind::Int,
            Value::Long(_) => Kind::Long,
            Value::Float(_) => Kind::Float,
            Value::Double(_) => Kind::Double,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Compound(_) => Kind::Compound,
            Value::IntArray(_) => Kind::IntArray,
            Value::LongArray(_) => Kind::LongArray,
        }
    }

    /// The zero value of a kind: 0, an empty string or an empty collection.
    /// There is no value for End.
    pub fn zeroed(kind: Kind) -> Option<Value> {
        Some(match kind {
            Kind::End => return None,
            Kind::Byte => Value::Byte(0),
            Kind::Short => Value::Short(0),
            Kind::Int => Value::Int(0),
            Kind::Long => Value::Long(0),
            Kind::Float => Value::Float(0.0),
            Kind::Double => Value::Double(0.0),
            Kind::ByteArray => Value::ByteArray(vec![]),
            Kind::String => Value::String(String::new()),
            Kind::List => Value::List(List::new(Kind::End)),
            Kind::Compound => Value::Compound(Compound::new()),
            Kind::IntArray => Value::IntArray(vec![]),
            Kind::LongArray => Value::LongArray(vec![]),
        })
    }

    pub fn as_byte(&self) -> Option<i8> {
        match *self {
            Value::Byte(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_short(&self) -> Option<i16> {
        match *self {
            Value::Short(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match *self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match *self {
            Value::Long(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f32> {
        match *self {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match *self {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    casts! {
        as_byte_array, as_byte_array_mut => ByteArray: Vec<u8>;
        as_list, as_list_mut => List: List;
        as_compound, as_compound_mut => Compound: Compound;
        as_int_array, as_int_array_mut => IntArray: Vec<i32>;
        as_long_array, as_long_array_mut => LongArray: Vec<i64>;
    }

    /// Number of elements in an array, list or compound.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::ByteArray(v) => Some(v.len()),
            Value::List(v) => Some(v.len()),
            Value::Compound(v) => Some(v.len()),
            Value::IntArray(v) => Some(v.len()),
            Value::LongArray(v) => Some(v.len()),
            _ => None,
        }
    }
}

macro_rules! tag_casts {
    ($($fn:ident -> $ty:ty;)*) => {
        $(
            #[doc = concat!("See [`Value::", stringify!($fn), "`].")]
            pub fn $fn(&self) -> Option<$ty> {
                self.value.$fn()
            }
        )*
    };
}

macro_rules! tag_casts_mut {
    ($($fn:ident -> $ty:ty;)*) => {
        $(
            #[doc = concat!("See [`Value::", stringify!($fn), "`].")]
            pub fn $fn(&mut self) -> Option<$ty> {
                self.value.$fn()
            }
        )*
    };
}

macro_rules! setters {
    ($($fn:ident($ty:ty) => $variant:ident;)*) => {
        $(
            #[doc = concat!("Replace the payload of a ", stringify!($variant), " tag.")]
            pub fn $fn(&mut self, v: $ty) -> Result<()> {
                self.set_value(Value::$variant(v))
            }
        )*
    };
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// An empty compound.
    pub fn compound(name: impl Into<String>) -> Self {
        Self::new(name, Compound::new())
    }

    /// An empty list of the given element kind.
    pub fn list(name: impl Into<String>, kind: Kind) -> Self {
        Self::new(name, List::new(kind))
    }

    /// A tag holding the zero value of a kind. None for End.
    pub fn zeroed(name: impl Into<String>, kind: Kind) -> Option<Self> {
        Value::zeroed(kind).map(|v| Self::new(name, v))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Split the tag into its name and value.
    pub fn into_parts(self) -> (String, Value) {
        (self.name, self.value)
    }

    /// Replace the payload with a value of the same kind, dropping the old
    /// payload. A value of another kind is refused and the tag is unchanged.
    pub fn set_value(&mut self, value: Value) -> Result<()> {
        if value.kind() != self.kind() {
            return Err(Error::type_mismatch(self.kind(), value.kind()));
        }
        self.value = value;
        Ok(())
    }

    setters! {
        set_byte(i8) => Byte;
        set_short(i16) => Short;
        set_int(i32) => Int;
        set_long(i64) => Long;
        set_float(f32) => Float;
        set_double(f64) => Double;
        set_string(String) => String;
        set_byte_array(Vec<u8>) => ByteArray;
        set_list(List) => List;
        set_compound(Compound) => Compound;
        set_int_array(Vec<i32>) => IntArray;
        set_long_array(Vec<i64>) => LongArray;
    }

    tag_casts! {
        as_byte -> i8;
        as_short -> i16;
        as_int -> i32;
        as_long -> i64;
        as_float -> f32;
        as_double -> f64;
        as_str -> &str;
        as_byte_array -> &Vec<u8>;
        as_list -> &List;
        as_compound -> &Compound;
        as_int_array -> &Vec<i32>;
        as_long_array -> &Vec<i64>;
        len -> usize;
    }

    tag_casts_mut! {
        as_byte_array_mut -> &mut Vec<u8>;
        as_list_mut -> &mut List;
        as_compound_mut -> &mut Compound;
        as_int_array_mut -> &mut Vec<i32>;
        as_long_array_mut -> &mut Vec<i64>;
    }

    /// The first direct child with the given name. Only searches this
    /// compound, not compounds nested inside it. None if this is not a
    /// compound.
    pub fn find_child(&self, name: &str) -> Option<&Tag> {
        self.as_compound()?.find(name)
    }

    pub fn find_child_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.as_compound_mut()?.find_mut(name)
    }

    /// Append a child to this compound. If this is not a compound the child is
    /// handed back and nothing changes.
    pub fn add_child(&mut self, child: Tag) -> std::result::Result<&mut Tag, Tag> {
        match &mut self.value {
            Value::Compound(c) => Ok(c.push(child)),
            _ => Err(child),
        }
    }

    /// Index of a child of this compound, matched by identity rather than by
    /// name.
    pub fn position_of_child(&self, child: &Tag) -> Option<usize> {
        self.as_compound()?.position(child)
    }

    /// Detach the child at `index`, keeping the order of the others. The
    /// subtree is freed unless the caller holds on to the returned tag.
    pub fn remove_child(&mut self, index: usize) -> Option<Tag> {
        self.as_compound_mut()?.remove(index)
    }

    /// Detach the first child with the given name.
    pub fn remove_child_named(&mut self, name: &str) -> Option<Tag> {
        let compound = self.as_compound_mut()?;
        let index = compound.iter().position(|t| t.name() == name)?;
        compound.remove(index)
    }
}

impl List {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            elements: vec![],
        }
    }

    /// Build a list from values, which must all be of the given kind.
    pub fn from_values(kind: Kind, values: Vec<Value>) -> Result<Self> {
        let mut list = Self::new(kind);
        if let Some(bad) = values.iter().find(|v| v.kind() != kind) {
            return Err(Error::type_mismatch(kind, bad.kind()));
        }
        list.elements = values;
        Ok(list)
    }

    /// Callers guarantee every element is of `kind`.
    pub(crate) fn from_parts(kind: Kind, elements: Vec<Value>) -> Self {
        Self { kind, elements }
    }

    /// The kind of every element in the list.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.elements.iter()
    }

    /// Mutable access to a compound element. Elements are only handed out
    /// mutably when they can't change kind.
    pub fn compound_mut(&mut self, index: usize) -> Option<&mut Compound> {
        self.elements.get_mut(index)?.as_compound_mut()
    }

    /// Mutable access to a nested list element.
    pub fn list_mut(&mut self, index: usize) -> Option<&mut List> {
        self.elements.get_mut(index)?.as_list_mut()
    }

    /// Append a value. A value of the wrong kind is refused.
    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if self.kind == Kind::End && self.elements.is_empty() {
            self.kind = value.kind();
        }

        if value.kind() != self.kind {
            return Err(Error::type_mismatch(self.kind, value.kind()));
        }
        self.elements.push(value);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> Result<Option<Value>> {
        let value = value.into();
        if value.kind() != self.kind {
            return Err(Error::type_mismatch(self.kind, value.kind()));
        }

        Ok(self
            .elements
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, value)))
    }

    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.elements.len() {
            Some(self.elements.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.children.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.children.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.children.iter_mut()
    }

    /// The first child with the given name.
    pub fn find(&self, name: &str) -> Option<&Tag> {
        self.children.iter().find(|t| t.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.children.iter_mut().find(|t| t.name == name)
    }

    /// Append a child, returning a reference to it in its new place.
    pub fn push(&mut self, child: Tag) -> &mut Tag {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Index of `child` if it is one of this compound's own children. This
    /// compares addresses, so an equal tag elsewhere does not match.
    pub fn position(&self, child: &Tag) -> Option<usize> {
        self.children.iter().position(|t| std::ptr::eq(t, child))
    }

    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        if index < self.children.len() {
            Some(self.children.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Tag> for Compound {
    fn from_iter<T: IntoIterator<Item = Tag>>(iter: T) -> Self {
        Self {
            children: iter.into_iter().collect(),
        }
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<u8>, ByteArray);
from!(&[u8], ByteArray, .to_vec());
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
