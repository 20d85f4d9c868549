//! Type-shape descriptors.
//!
//! Rust has no runtime reflection, so destinations describe themselves
//! through [`Shaped`]. A [`Shape`] carries the fully-qualified type name and a
//! [`Kind`]; containers and records refer to their inner shapes through
//! [`ShapeFn`] pointers, which keeps self-referential types finite.
//!
//! Implementations are provided for primitives, std containers and smart
//! pointers, and the dynamic value types of `serde_json` and `serde_yaml`.
//! User records get theirs from the [`shaped!`](crate::shaped) macro or a
//! hand-written impl:
//!
//! ```
//! use safe_deserialize::{Field, Kind, Shape, Shaped};
//!
//! struct Point { x: i32, y: i32 }
//!
//! impl Shaped for Point {
//!     fn shape() -> Shape {
//!         const FIELDS: &[Field] = &[
//!             Field::new("x", <i32 as Shaped>::shape, true),
//!             Field::new("y", <i32 as Shaped>::shape, true),
//!         ];
//!         Shape::new(std::any::type_name::<Self>(), Kind::Record { fields: FIELDS })
//!     }
//! }
//!
//! assert!(Point::shape().is_record());
//! ```

use std::any::type_name;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::num::{NonZeroU16, NonZeroU32, NonZeroU64, NonZeroU8, NonZeroUsize};
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Lazily produces a shape; used for every inner type.
pub type ShapeFn = fn() -> Shape;

/// Static type information for a deserialization destination.
pub trait Shaped {
    fn shape() -> Shape;
}

/// The shape of a type: its name and kind.
///
/// Two shapes are equal when their type names are equal.
#[derive(Clone, Copy)]
pub struct Shape {
    name: &'static str,
    kind: Kind,
}

/// What kind of value a type holds.
#[derive(Clone, Copy)]
pub enum Kind {
    /// Numbers, strings, booleans, unit enums and other leaf values.
    Scalar,
    /// A value that can hold any runtime shape (`serde_json::Value`, ...).
    Dynamic,
    /// Indirection to another type (`Box`, `Option`, `Arc`, references).
    Indirect(ShapeFn),
    /// Keyed container.
    Map { value: ShapeFn },
    /// Ordered container or set.
    Sequence { element: ShapeFn },
    /// Named-field record.
    Record { fields: &'static [Field] },
}

/// A named field of a record.
#[derive(Clone, Copy)]
pub struct Field {
    name: &'static str,
    shape: ShapeFn,
    public: bool,
}

impl Shape {
    pub fn new(name: &'static str, kind: Kind) -> Self {
        Self { name, kind }
    }

    /// Shape of `T`.
    pub fn of<T: Shaped + ?Sized>() -> Self {
        T::shape()
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Strip one level of indirection, if any.
    pub fn pointee(self) -> Shape {
        match self.kind {
            Kind::Indirect(inner) => inner(),
            _ => self,
        }
    }

    /// Strip every level of indirection.
    pub fn resolved(self) -> Shape {
        let mut shape = self;
        while let Kind::Indirect(inner) = shape.kind {
            shape = inner();
        }
        shape
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self.kind, Kind::Dynamic)
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, Kind::Record { .. })
    }

    /// Record fields, or an empty slice for other kinds.
    pub fn fields(&self) -> &'static [Field] {
        match self.kind {
            Kind::Record { fields } => fields,
            _ => &[],
        }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Shape {}

impl Hash for Shape {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Inner shapes are printed by name only; expanding them would not terminate
// for recursive types.
impl fmt::Debug for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Dynamic => f.write_str("Dynamic"),
            Self::Indirect(inner) => f.debug_tuple("Indirect").field(&inner().name).finish(),
            Self::Map { value } => f.debug_struct("Map").field("value", &value().name).finish(),
            Self::Sequence { element } => f
                .debug_struct("Sequence")
                .field("element", &element().name)
                .finish(),
            Self::Record { fields } => f.debug_list().entries(fields.iter()).finish(),
        }
    }
}

impl Field {
    pub const fn new(name: &'static str, shape: ShapeFn, public: bool) -> Self {
        Self {
            name,
            shape,
            public,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn shape(&self) -> Shape {
        (self.shape)()
    }

    /// Whether the field is visible outside its module.
    pub fn is_public(&self) -> bool {
        self.public
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &self.shape().name)
            .field("public", &self.public)
            .finish()
    }
}

/// Describe a named-field struct (or a unit-variant enum) and implement
/// [`Shaped`] for it.
///
/// The definition is emitted unchanged, attributes included. Field visibility
/// is recorded: only `pub`-style fields are inspected by the field scanner.
///
/// ```
/// use safe_deserialize::{shaped, Shaped};
/// use serde::Deserialize;
///
/// shaped! {
///     #[derive(Debug, Deserialize)]
///     pub struct Account {
///         pub id: u64,
///         pub owner: Option<Box<Account>>,
///         audit: Vec<String>,
///     }
/// }
///
/// let shape = Account::shape();
/// assert_eq!(shape.fields().len(), 3);
/// assert!(!shape.fields()[2].is_public());
/// ```
#[macro_export]
macro_rules! shaped {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $field_ty,
            )*
        }

        impl $crate::Shaped for $name {
            fn shape() -> $crate::Shape {
                const FIELDS: &[$crate::Field] = &[
                    $(
                        $crate::Field::new(
                            ::core::stringify!($field),
                            <$field_ty as $crate::Shaped>::shape,
                            !::core::stringify!($field_vis).is_empty(),
                        ),
                    )*
                ];
                $crate::Shape::new(
                    ::core::any::type_name::<$name>(),
                    $crate::Kind::Record { fields: FIELDS },
                )
            }
        }
    };
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant,
            )*
        }

        impl $crate::Shaped for $name {
            fn shape() -> $crate::Shape {
                $crate::Shape::new(::core::any::type_name::<$name>(), $crate::Kind::Scalar)
            }
        }
    };
}

macro_rules! impl_scalar_shape {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Shaped for $ty {
                fn shape() -> Shape {
                    Shape::new(type_name::<Self>(), Kind::Scalar)
                }
            }
        )*
    };
}

impl_scalar_shape!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    str,
    String,
    PathBuf,
    Duration,
    NonZeroU8,
    NonZeroU16,
    NonZeroU32,
    NonZeroU64,
    NonZeroUsize,
    std::net::IpAddr,
    std::net::SocketAddr,
);

macro_rules! impl_indirect_shape {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Shaped + ?Sized> Shaped for $ty<T> {
                fn shape() -> Shape {
                    Shape::new(type_name::<Self>(), Kind::Indirect(T::shape))
                }
            }
        )*
    };
}

impl_indirect_shape!(Box, Rc, Arc, RefCell);

impl<T: Shaped> Shaped for Option<T> {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Indirect(T::shape))
    }
}

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Indirect(T::shape))
    }
}

impl<T: Shaped + ?Sized> Shaped for &mut T {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Indirect(T::shape))
    }
}

macro_rules! impl_sequence_shape {
    ($($ty:ident),* $(,)?) => {
        $(
            impl<T: Shaped> Shaped for $ty<T> {
                fn shape() -> Shape {
                    Shape::new(type_name::<Self>(), Kind::Sequence { element: T::shape })
                }
            }
        )*
    };
}

impl_sequence_shape!(Vec, VecDeque, LinkedList, BTreeSet);

impl<T: Shaped, S> Shaped for HashSet<T, S> {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Sequence { element: T::shape })
    }
}

impl<T: Shaped> Shaped for [T] {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Sequence { element: T::shape })
    }
}

impl<T: Shaped, const N: usize> Shaped for [T; N] {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Sequence { element: T::shape })
    }
}

impl<K, V: Shaped, S> Shaped for HashMap<K, V, S> {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Map { value: V::shape })
    }
}

impl<K, V: Shaped> Shaped for BTreeMap<K, V> {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Map { value: V::shape })
    }
}

impl Shaped for serde_json::Value {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Dynamic)
    }
}

impl Shaped for serde_json::Map<String, serde_json::Value> {
    fn shape() -> Shape {
        Shape::new(
            type_name::<Self>(),
            Kind::Map {
                value: <serde_json::Value as Shaped>::shape,
            },
        )
    }
}

impl Shaped for serde_yaml::Value {
    fn shape() -> Shape {
        Shape::new(type_name::<Self>(), Kind::Dynamic)
    }
}

impl Shaped for serde_yaml::Mapping {
    fn shape() -> Shape {
        Shape::new(
            type_name::<Self>(),
            Kind::Map {
                value: <serde_yaml::Value as Shaped>::shape,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    crate::shaped! {
        #[allow(dead_code)]
        struct Node {
            pub label: String,
            pub next: Option<Box<Node>>,
            hidden: serde_json::Value,
        }
    }

    crate::shaped! {
        #[allow(dead_code)]
        enum Mode {
            Fast,
            Slow,
        }
    }

    #[test]
    fn test_scalar_and_dynamic_kinds() {
        assert!(matches!(u64::shape().kind(), Kind::Scalar));
        assert!(matches!(String::shape().kind(), Kind::Scalar));
        assert!(matches!(Mode::shape().kind(), Kind::Scalar));
        assert!(serde_json::Value::shape().is_dynamic());
        assert!(serde_yaml::Value::shape().is_dynamic());
    }

    #[test]
    fn test_container_kinds_expose_inner_shape() {
        match HashMap::<String, serde_json::Value>::shape().kind() {
            Kind::Map { value } => assert!(value().is_dynamic()),
            other => panic!("expected map, got {:?}", other),
        }
        match <[u8; 4]>::shape().kind() {
            Kind::Sequence { element } => assert_eq!(element().name(), "u8"),
            other => panic!("expected sequence, got {:?}", other),
        }
        match serde_json::Map::<String, serde_json::Value>::shape().kind() {
            Kind::Map { value } => assert!(value().is_dynamic()),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_pointee_strips_one_level() {
        let shape = Shape::of::<Box<Option<u32>>>();
        assert_eq!(shape.pointee(), Shape::of::<Option<u32>>());
        assert_eq!(shape.resolved(), Shape::of::<u32>());
        assert_eq!(u32::shape().pointee(), u32::shape());
        assert_eq!(Shape::of::<&mut Node>().pointee(), Node::shape());
    }

    #[test]
    fn test_shaped_macro_records_fields_and_visibility() {
        let shape = Node::shape();
        assert!(shape.is_record());
        assert!(shape.name().ends_with("Node"));

        let fields = shape.fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].name(), "label");
        assert!(fields[0].is_public());
        assert!(fields[1].is_public());
        assert!(!fields[2].is_public());
        assert!(fields[2].shape().is_dynamic());
    }

    #[test]
    fn test_recursive_shape_is_finite() {
        let next = Node::shape().fields()[1].shape();
        assert_eq!(next.resolved(), Node::shape());

        // Debug output names inner shapes instead of expanding them.
        let rendered = format!("{:?}", Node::shape());
        assert!(rendered.contains("next"));
    }
}
