// Copyright 2025 the Tangle Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property values.
//!
//! [`Value`] covers the value shapes diagram widgets exchange: scalars, text,
//! colors, and small geometry records. Geometry and list variants are owned
//! data, so storing one always stores a copy. Anything else is carried as an
//! [`ErasedValue`], which declares at construction whether assignment copies
//! it or aliases it.

use std::any::{Any, TypeId};
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Creates a color from all four channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Type tag carried by hooks and values.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// Compatible with every other kind.
    Any,
    /// [`Value::Bool`].
    Bool,
    /// [`Value::Number`].
    Number,
    /// [`Value::NumberList`].
    NumberList,
    /// [`Value::Text`].
    Text,
    /// [`Value::Color`].
    Color,
    /// [`Value::Point`].
    Point,
    /// [`Value::Vector`].
    Vector,
    /// [`Value::Rect`].
    Rect,
    /// [`Value::Erased`].
    Opaque,
}

impl ValueKind {
    /// Exact match, or either side is [`ValueKind::Any`].
    #[must_use]
    pub fn accepts(self, other: Self) -> bool {
        self == other || self == Self::Any || other == Self::Any
    }

    /// Kebab-case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::NumberList => "number-list",
            Self::Text => "text",
            Self::Color => "color",
            Self::Point => "point",
            Self::Vector => "vector",
            Self::Rect => "rect",
            Self::Opaque => "opaque",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

trait ErasedPayload: Any {
    fn value_any(&self) -> &dyn Any;
    fn type_name(&self) -> &'static str;
    /// A fresh copy for copy-on-assign payloads, `None` for aliased ones.
    fn duplicate(&self) -> Option<Rc<dyn ErasedPayload>>;
}

struct Copied<T>(T);
struct Shared<T>(T);

impl<T: Clone + 'static> ErasedPayload for Copied<T> {
    fn value_any(&self) -> &dyn Any {
        &self.0
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn duplicate(&self) -> Option<Rc<dyn ErasedPayload>> {
        Some(Rc::new(Self(self.0.clone())))
    }
}

impl<T: 'static> ErasedPayload for Shared<T> {
    fn value_any(&self) -> &dyn Any {
        &self.0
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn duplicate(&self) -> Option<Rc<dyn ErasedPayload>> {
        None
    }
}

/// A type-erased value with an explicit assignment capability.
///
/// Cloning an `ErasedValue` always shares the payload. Storing it as a
/// property goes through [`assign`](Self::assign), which copies payloads
/// built with [`by_value`](Self::by_value) and aliases those built with
/// [`by_reference`](Self::by_reference).
///
/// Two erased values are equal when they share the same payload.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use tangle_property::ErasedValue;
///
/// let shared = ErasedValue::by_reference(Cell::new(1_i32));
/// let alias = shared.assign();
/// alias.downcast_ref::<Cell<i32>>().unwrap().set(2);
/// assert_eq!(shared.downcast_ref::<Cell<i32>>().unwrap().get(), 2);
///
/// let owned = ErasedValue::by_value(Cell::new(1_i32));
/// let copy = owned.assign();
/// copy.downcast_ref::<Cell<i32>>().unwrap().set(2);
/// assert_eq!(owned.downcast_ref::<Cell<i32>>().unwrap().get(), 1);
/// ```
#[derive(Clone)]
pub struct ErasedValue {
    inner: Rc<dyn ErasedPayload>,
    type_id: TypeId,
    pass_by_value: bool,
}

impl ErasedValue {
    /// Wraps a value that is copied whenever it is assigned.
    #[must_use]
    pub fn by_value<T: Clone + 'static>(value: T) -> Self {
        Self {
            inner: Rc::new(Copied(value)),
            type_id: TypeId::of::<T>(),
            pass_by_value: true,
        }
    }

    /// Wraps a value that is aliased whenever it is assigned.
    #[must_use]
    pub fn by_reference<T: 'static>(value: T) -> Self {
        Self {
            inner: Rc::new(Shared(value)),
            type_id: TypeId::of::<T>(),
            pass_by_value: false,
        }
    }

    /// Returns `true` if assignment copies the payload.
    #[must_use]
    #[inline]
    pub fn is_pass_by_value(&self) -> bool {
        self.pass_by_value
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.value_any().downcast_ref()
    }

    /// The value that a property stores when this one is assigned to it.
    #[must_use]
    pub fn assign(&self) -> Self {
        match self.inner.duplicate() {
            Some(inner) => Self {
                inner,
                type_id: self.type_id,
                pass_by_value: self.pass_by_value,
            },
            None => self.clone(),
        }
    }

    /// Returns `true` if both values share one payload.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ErasedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.inner.type_name())
            .field("pass_by_value", &self.pass_by_value)
            .finish_non_exhaustive()
    }
}

/// A property value.
///
/// Serialized adjacently tagged (`{"kind": "number", "value": 7.0}`).
/// [`Value::Erased`] cannot be serialized; snapshots leave such properties out.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A flag.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A list of numbers, e.g. samples for a histogram.
    NumberList(Vec<f64>),
    /// Text.
    Text(String),
    /// A color.
    Color(Rgba),
    /// A position.
    Point(Point),
    /// A displacement.
    Vector(Vec2),
    /// An axis-aligned rectangle.
    Rect(Rect),
    /// Anything else.
    #[serde(skip)]
    Erased(ErasedValue),
}

impl Value {
    /// The type tag of this value. [`Value::Null`] reports [`ValueKind::Any`].
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Any,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::NumberList(_) => ValueKind::NumberList,
            Self::Text(_) => ValueKind::Text,
            Self::Color(_) => ValueKind::Color,
            Self::Point(_) => ValueKind::Point,
            Self::Vector(_) => ValueKind::Vector,
            Self::Rect(_) => ValueKind::Rect,
            Self::Erased(_) => ValueKind::Opaque,
        }
    }

    /// The value a property stores when this one is assigned to it.
    ///
    /// Built-in variants are owned, so this is a plain copy. Erased values
    /// copy or alias according to their own tag.
    #[must_use]
    pub fn assign(&self) -> Self {
        match self {
            Self::Erased(erased) => Self::Erased(erased.assign()),
            other => other.clone(),
        }
    }

    /// Returns `true` if assigning this value stores an independent copy.
    #[must_use]
    pub fn is_pass_by_value(&self) -> bool {
        match self {
            Self::Erased(erased) => erased.is_pass_by_value(),
            _ => true,
        }
    }

    /// Returns `true` if the value can be written to a snapshot.
    #[must_use]
    pub fn is_serializable(&self) -> bool {
        !matches!(self, Self::Erased(_))
    }

    /// Returns `true` for [`Value::Null`].
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The number, if this is a [`Value::Number`].
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The flag, if this is a [`Value::Bool`].
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The text, if this is a [`Value::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The list, if this is a [`Value::NumberList`].
    #[must_use]
    pub fn as_number_list(&self) -> Option<&[f64]> {
        match self {
            Self::NumberList(list) => Some(list),
            _ => None,
        }
    }

    /// The color, if this is a [`Value::Color`].
    #[must_use]
    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// The point, if this is a [`Value::Point`].
    #[must_use]
    pub fn as_point(&self) -> Option<Point> {
        match self {
            Self::Point(p) => Some(*p),
            _ => None,
        }
    }

    /// The vector, if this is a [`Value::Vector`].
    #[must_use]
    pub fn as_vector(&self) -> Option<Vec2> {
        match self {
            Self::Vector(v) => Some(*v),
            _ => None,
        }
    }

    /// The rectangle, if this is a [`Value::Rect`].
    #[must_use]
    pub fn as_rect(&self) -> Option<Rect> {
        match self {
            Self::Rect(r) => Some(*r),
            _ => None,
        }
    }

    /// The erased payload, if this is a [`Value::Erased`].
    #[must_use]
    pub fn as_erased(&self) -> Option<&ErasedValue> {
        match self {
            Self::Erased(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::NumberList(list) => {
                f.write_str("[")?;
                for (i, n) in list.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{n}")?;
                }
                f.write_str("]")
            }
            Self::Text(s) => f.write_str(s),
            Self::Color(c) => write!(f, "#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a),
            Self::Point(p) => write!(f, "({}, {})", p.x, p.y),
            Self::Vector(v) => write!(f, "<{}, {}>", v.x, v.y),
            Self::Rect(r) => write!(f, "[{}, {}, {}, {}]", r.x0, r.y0, r.x1, r.y1),
            Self::Erased(e) => write!(f, "<{}>", e.inner.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Vec<f64>> for Value {
    fn from(value: Vec<f64>) -> Self {
        Self::NumberList(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Rgba> for Value {
    fn from(value: Rgba) -> Self {
        Self::Color(value)
    }
}

impl From<Point> for Value {
    fn from(value: Point) -> Self {
        Self::Point(value)
    }
}

impl From<Vec2> for Value {
    fn from(value: Vec2) -> Self {
        Self::Vector(value)
    }
}

impl From<Rect> for Value {
    fn from(value: Rect) -> Self {
        Self::Rect(value)
    }
}

impl From<ErasedValue> for Value {
    fn from(value: ErasedValue) -> Self {
        Self::Erased(value)
    }
}
