//! Runtime view over record values.
//!
//! The traversal never sees concrete types. Everything it needs (the shape of
//! a value, its fields, equality, assignment and zero values) goes through the
//! object-safe [`Reflect`] trait and its companions [`Struct`], [`Optional`]
//! and [`Map`].
//!
//! Implementations are provided for the primitive types, `String`,
//! `serde_json::Value`, `Option<T>`, `Box<T>`, `Vec<T>` and string-keyed maps.
//! Record types get theirs from the [`record!`](crate::record!) macro.

use crate::{
    error::{Error, Result},
    FieldInfo,
};
use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// Static shape of a type, known without a value at hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Compared as a whole with `PartialEq`
    Scalar,
    /// Absent or present value
    Optional,
    /// Record with named fields
    Record,
    /// Ordered list of values
    Sequence,
    /// String-keyed map
    Map,
}

/// Read-only view of a value.
pub enum Kind<'a> {
    Scalar,
    Optional(&'a dyn Optional),
    Record(&'a dyn Struct),
    Sequence(Vec<&'a dyn Reflect>),
    Map(&'a dyn Map),
}

/// Mutable view of a value.
///
/// Only records and optionals can be walked into mutably; everything else is
/// replaced wholesale through [`Reflect::assign`].
pub enum KindMut<'a> {
    Optional(&'a mut dyn Optional),
    Record(&'a mut dyn Struct),
    Value,
}

/// A value the engine can inspect, compare and overwrite.
pub trait Reflect: Any {
    /// Name of the concrete type, for error messages.
    fn type_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    fn kind(&self) -> Kind<'_>;

    fn kind_mut(&mut self) -> KindMut<'_>;

    /// Equality for [`Kind::Scalar`] values. Always false for other kinds.
    fn scalar_eq(&self, other: &dyn Reflect) -> bool;

    /// Replace `self` with a clone of `other`.
    ///
    /// Fails with [`Error::InvalidArgument`] when `other` has a different type.
    fn assign(&mut self, other: &dyn Reflect) -> Result<()>;

    fn shape() -> Shape
    where
        Self: Sized;

    /// The zero value of the type, if it has one.
    fn zero() -> Option<Self>
    where
        Self: Sized;
}

/// A record: a fixed, ordered list of named fields.
pub trait Struct: Reflect {
    /// Field descriptors in declaration order.
    fn field_infos(&self) -> &'static [FieldInfo];

    fn fields(&self) -> Vec<Field<'_>>;

    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// A field descriptor paired with a shared reference to the field value.
pub struct Field<'a> {
    pub info: &'static FieldInfo,
    pub value: &'a dyn Reflect,
}

/// A field descriptor paired with a mutable reference to the field value.
pub struct FieldMut<'a> {
    pub info: &'static FieldInfo,
    pub value: &'a mut dyn Reflect,
}

/// An absent-or-present slot.
pub trait Optional {
    /// Shape of the value held when present.
    fn element_shape(&self) -> Shape;

    fn get(&self) -> Option<&dyn Reflect>;

    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// A fresh zero value of the element type, leaving the slot untouched.
    fn element_zero(&self) -> Option<Box<dyn Reflect>>;

    /// Fill an absent slot with the zero value, then return the held value.
    ///
    /// Returns `None` only when the element type has no zero value.
    fn materialize(&mut self) -> Option<&mut dyn Reflect>;
}

/// A map keyed by strings.
pub trait Map {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &str) -> Option<&dyn Reflect>;

    fn entries(&self) -> Vec<(&str, &dyn Reflect)>;
}

/// Concrete type identity of a reflected value.
pub fn type_id_of(value: &dyn Reflect) -> TypeId {
    Any::type_id(value.as_any())
}

/// Shared [`Reflect::assign`] body for every `Clone` type.
#[doc(hidden)]
pub fn assign_clone<T: Reflect + Clone>(target: &mut T, source: &dyn Reflect) -> Result<()> {
    match source.as_any().downcast_ref::<T>() {
        Some(value) => {
            *target = value.clone();
            Ok(())
        }
        None => Err(Error::invalid_argument(format!(
            "cannot assign {} to {}",
            source.type_name(),
            std::any::type_name::<T>()
        ))),
    }
}

macro_rules! impl_scalar {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_name(&self) -> &'static str {
                    std::any::type_name::<Self>()
                }

                fn as_any(&self) -> &dyn Any {
                    self
                }

                fn kind(&self) -> Kind<'_> {
                    Kind::Scalar
                }

                fn kind_mut(&mut self) -> KindMut<'_> {
                    KindMut::Value
                }

                fn scalar_eq(&self, other: &dyn Reflect) -> bool {
                    other
                        .as_any()
                        .downcast_ref::<Self>()
                        .is_some_and(|other| self == other)
                }

                fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
                    assign_clone(self, other)
                }

                fn shape() -> Shape {
                    Shape::Scalar
                }

                fn zero() -> Option<Self> {
                    Some(Self::default())
                }
            }
        )*
    };
}

impl_scalar!(
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    (),
    String,
    serde_json::Value,
);

impl<T: Reflect + Clone> Reflect for Option<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Optional(self)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Optional(self)
    }

    fn scalar_eq(&self, _other: &dyn Reflect) -> bool {
        false
    }

    fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
        assign_clone(self, other)
    }

    fn shape() -> Shape {
        Shape::Optional
    }

    fn zero() -> Option<Self> {
        Some(None)
    }
}

impl<T: Reflect + Clone> Optional for Option<T> {
    fn element_shape(&self) -> Shape {
        T::shape()
    }

    fn get(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    fn element_zero(&self) -> Option<Box<dyn Reflect>> {
        T::zero().map(|value| Box::new(value) as Box<dyn Reflect>)
    }

    fn materialize(&mut self) -> Option<&mut dyn Reflect> {
        if self.is_none() {
            *self = Some(T::zero()?);
        }
        self.get_mut()
    }
}

// Boxes are transparent: a `Box<T>` has the shape and fields of `T`, but keeps
// its own type identity so it is only ever compared with another `Box<T>`.
impl<T: Reflect + Clone> Reflect for Box<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        (**self).kind()
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        (**self).kind_mut()
    }

    fn scalar_eq(&self, other: &dyn Reflect) -> bool {
        other
            .as_any()
            .downcast_ref::<Self>()
            .is_some_and(|other| (**self).scalar_eq(&**other))
    }

    fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
        assign_clone(self, other)
    }

    fn shape() -> Shape {
        T::shape()
    }

    fn zero() -> Option<Self> {
        T::zero().map(Box::new)
    }
}

impl<T: Reflect + Clone> Reflect for Vec<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Sequence(self.iter().map(|value| value as &dyn Reflect).collect())
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Value
    }

    fn scalar_eq(&self, _other: &dyn Reflect) -> bool {
        false
    }

    fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
        assign_clone(self, other)
    }

    fn shape() -> Shape {
        Shape::Sequence
    }

    fn zero() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<V, S> Reflect for HashMap<String, V, S>
where
    V: Reflect + Clone,
    S: BuildHasher + Clone + Default + 'static,
{
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Value
    }

    fn scalar_eq(&self, _other: &dyn Reflect) -> bool {
        false
    }

    fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
        assign_clone(self, other)
    }

    fn shape() -> Shape {
        Shape::Map
    }

    fn zero() -> Option<Self> {
        Some(HashMap::default())
    }
}

impl<V, S> Map for HashMap<String, V, S>
where
    V: Reflect + Clone,
    S: BuildHasher + Clone + Default + 'static,
{
    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get(&self, key: &str) -> Option<&dyn Reflect> {
        HashMap::get(self, key).map(|value| value as &dyn Reflect)
    }

    fn entries(&self) -> Vec<(&str, &dyn Reflect)> {
        self.iter()
            .map(|(key, value)| (key.as_str(), value as &dyn Reflect))
            .collect()
    }
}

impl<V: Reflect + Clone> Reflect for BTreeMap<String, V> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn kind(&self) -> Kind<'_> {
        Kind::Map(self)
    }

    fn kind_mut(&mut self) -> KindMut<'_> {
        KindMut::Value
    }

    fn scalar_eq(&self, _other: &dyn Reflect) -> bool {
        false
    }

    fn assign(&mut self, other: &dyn Reflect) -> Result<()> {
        assign_clone(self, other)
    }

    fn shape() -> Shape {
        Shape::Map
    }

    fn zero() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<V: Reflect + Clone> Map for BTreeMap<String, V> {
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get(&self, key: &str) -> Option<&dyn Reflect> {
        BTreeMap::get(self, key).map(|value| value as &dyn Reflect)
    }

    fn entries(&self) -> Vec<(&str, &dyn Reflect)> {
        self.iter()
            .map(|(key, value)| (key.as_str(), value as &dyn Reflect))
            .collect()
    }
}
