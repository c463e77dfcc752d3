//! Field descriptors and the `record!` macro.
//!
//! A record type describes its fields once, in declaration order. Plain
//! fields carry tags per namespace, in the same `name,option,...` format
//! serialization tags use. Embedded fields carry no tags: their own fields are
//! treated as if they were declared on the containing record.

/// Descriptor of one record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    name: &'static str,
    embedded: bool,
    tags: &'static [(&'static str, &'static str)],
}

impl FieldInfo {
    /// A plain field with `(namespace, tag)` pairs.
    pub const fn tagged(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name,
            embedded: false,
            tags,
        }
    }

    /// An embedded field. Its value must be a record or an optional record.
    pub const fn embedded(name: &'static str) -> Self {
        Self {
            name,
            embedded: true,
            tags: &[],
        }
    }

    /// Rust name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    /// Raw tag under `namespace`, options included.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, tag)| *tag)
    }

    /// Field key under `namespace`: the tag up to its first comma.
    ///
    /// Returns `None` for embedded fields, untagged fields and empty keys.
    pub fn key(&self, namespace: &str) -> Option<&'static str> {
        let tag = self.tag(namespace)?;
        let key = tag.split(',').next().unwrap_or_default();
        (!key.is_empty()).then_some(key)
    }
}

/// Implements [`Reflect`](crate::Reflect) and [`Struct`](crate::Struct) for a
/// struct by listing its fields in declaration order.
///
/// Plain fields are written `name [namespace = "tag", ...]`; an empty list
/// declares an untagged field. Embedded fields are written `..name`.
///
/// The struct must be `Clone + Default + 'static`. Every field type must
/// implement [`Reflect`](crate::Reflect).
///
/// ```rust
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Audit {
///     updated_by: String,
/// }
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct User {
///     name: String,
///     email: Option<String>,
///     cache: u64,
///     audit: Option<Audit>,
/// }
///
/// shallow::record! {
///     Audit {
///         updated_by [json = "updated_by", db = "updated_by"],
///     }
/// }
///
/// shallow::record! {
///     User {
///         name [json = "name"],
///         email [json = "email,omitempty"],
///         cache [],
///         ..audit,
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident { $($body:tt)* }) => {
        $crate::record!(@munch $ty [] $($body)*);
    };

    (@munch $ty:ident [$({ $field:ident, $info:expr })*]) => {
        impl $crate::Reflect for $ty {
            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn kind(&self) -> $crate::Kind<'_> {
                $crate::Kind::Record(self)
            }

            fn kind_mut(&mut self) -> $crate::KindMut<'_> {
                $crate::KindMut::Record(self)
            }

            fn scalar_eq(&self, _other: &dyn $crate::Reflect) -> bool {
                false
            }

            fn assign(&mut self, other: &dyn $crate::Reflect) -> $crate::error::Result<()> {
                $crate::reflect::assign_clone(self, other)
            }

            fn shape() -> $crate::Shape {
                $crate::Shape::Record
            }

            fn zero() -> ::std::option::Option<Self> {
                ::std::option::Option::Some(<Self as ::std::default::Default>::default())
            }
        }

        impl $crate::Struct for $ty {
            fn field_infos(&self) -> &'static [$crate::FieldInfo] {
                const FIELDS: &[$crate::FieldInfo] = &[$($info),*];
                FIELDS
            }

            fn fields(&self) -> ::std::vec::Vec<$crate::Field<'_>> {
                let values = [$(&self.$field as &dyn $crate::Reflect),*];
                self.field_infos()
                    .iter()
                    .zip(values)
                    .map(|(info, value)| $crate::Field { info, value })
                    .collect()
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<$crate::FieldMut<'_>> {
                let infos = self.field_infos();
                let values = [$(&mut self.$field as &mut dyn $crate::Reflect),*];
                infos
                    .iter()
                    .zip(values)
                    .map(|(info, value)| $crate::FieldMut { info, value })
                    .collect()
            }
        }
    };

    (@munch $ty:ident [$($out:tt)*] .. $field:ident $(, $($rest:tt)*)?) => {
        $crate::record!(@munch $ty [
            $($out)*
            { $field, $crate::FieldInfo::embedded(stringify!($field)) }
        ] $($($rest)*)?);
    };

    (@munch $ty:ident [$($out:tt)*]
        $field:ident [$($ns:ident = $tag:literal),* $(,)?] $(, $($rest:tt)*)?
    ) => {
        $crate::record!(@munch $ty [
            $($out)*
            {
                $field,
                $crate::FieldInfo::tagged(stringify!($field), &[$((stringify!($ns), $tag)),*])
            }
        ] $($($rest)*)?);
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Kind, Reflect, Shape, Struct};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Inner {
        flag: bool,
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Outer {
        id: u64,
        label: String,
        hidden: i32,
        inner: Inner,
    }

    crate::record! {
        Inner {
            flag [json = "flag"],
        }
    }

    crate::record! {
        Outer {
            id [json = "id,omitempty", db = "outer_id"],
            label [json = ",omitempty"],
            hidden [],
            ..inner
        }
    }

    #[test]
    fn key_is_tag_before_first_comma() {
        let info = FieldInfo::tagged("id", &[("json", "id,omitempty"), ("db", "outer_id")]);
        assert_eq!(info.tag("json"), Some("id,omitempty"));
        assert_eq!(info.key("json"), Some("id"));
        assert_eq!(info.key("db"), Some("outer_id"));
        assert_eq!(info.key("yaml"), None);
    }

    #[test]
    fn empty_key_is_none() {
        let info = FieldInfo::tagged("label", &[("json", ",omitempty")]);
        assert_eq!(info.key("json"), None);

        let info = FieldInfo::tagged("label", &[("json", "")]);
        assert_eq!(info.key("json"), None);
    }

    #[test]
    fn embedded_has_no_key() {
        let info = FieldInfo::embedded("inner");
        assert!(info.is_embedded());
        assert_eq!(info.key("json"), None);
    }

    #[test]
    fn macro_lists_fields_in_order() {
        let outer = Outer {
            id: 7,
            ..Default::default()
        };

        let names: Vec<_> = outer.fields().iter().map(|f| f.info.name()).collect();
        assert_eq!(names, vec!["id", "label", "hidden", "inner"]);

        let fields = outer.fields();
        assert!(fields[0].value.scalar_eq(&7u64));
        assert!(fields[3].info.is_embedded());
        assert!(matches!(fields[3].value.kind(), Kind::Record(_)));
        assert_eq!(<Outer as Reflect>::shape(), Shape::Record);
    }

    #[test]
    fn macro_fields_mut_write_through() {
        let mut outer = Outer::default();
        for field in outer.fields_mut() {
            if field.info.name() == "label" {
                field.value.assign(&String::from("set")).unwrap();
            }
        }
        assert_eq!(outer.label, "set");
    }
}
