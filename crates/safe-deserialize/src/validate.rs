//! Destination validation.
//!
//! Every pipeline runs [`validate_target`] before the decoder sees a single
//! byte. It rejects destinations whose shape would let attacker-controlled
//! input pick the runtime type of the decoded value.

use std::collections::HashSet;

use crate::error::{DeserializeError, DeserializeResult};
use crate::options::Options;
use crate::shape::{Kind, Shape, Shaped};

/// What the validator sees of a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    /// No destination at all.
    Null,
    /// A value passed by copy, which decoding could never populate.
    Value(Shape),
    /// A mutable handle; `None` when the handle points at nothing.
    Handle(Option<Shape>),
}

impl TargetRef {
    /// A live mutable handle to a `T`.
    pub fn handle_to<T: Shaped + ?Sized>() -> Self {
        Self::Handle(Some(T::shape()))
    }

    /// A by-value `T`.
    pub fn value_of<T: Shaped + ?Sized>() -> Self {
        Self::Value(T::shape())
    }
}

/// A place decoded values can be written to.
///
/// Implemented for `&mut T` and for `Option<&mut T>`, where `None` plays the
/// part of a null reference.
pub trait Destination {
    type Value;

    /// Descriptor handed to the validator.
    fn target(&self) -> TargetRef;

    /// Storage for the decoded value; `None` for a null destination.
    fn slot(&mut self) -> Option<&mut Self::Value>;
}

impl<T: Shaped> Destination for &mut T {
    type Value = T;

    fn target(&self) -> TargetRef {
        TargetRef::handle_to::<T>()
    }

    fn slot(&mut self) -> Option<&mut T> {
        Some(&mut **self)
    }
}

impl<T: Shaped> Destination for Option<&mut T> {
    type Value = T;

    fn target(&self) -> TargetRef {
        match self {
            Some(_) => TargetRef::handle_to::<T>(),
            None => TargetRef::Null,
        }
    }

    fn slot(&mut self) -> Option<&mut T> {
        self.as_deref_mut()
    }
}

/// Check that a destination is safe to decode into.
///
/// Checks run in order and the first failure wins:
///
/// 1. null destination: [`DeserializeError::NilTarget`]
/// 2. by-value destination: [`DeserializeError::NotPointer`]
/// 3. handle to nothing: [`DeserializeError::NilTarget`]
/// 4. dynamic value: [`DeserializeError::InterfaceTarget`]
/// 5. map of dynamic values, unless allowed: [`DeserializeError::MapInterfaceTarget`]
/// 6. sequence of dynamic elements, unless allowed: [`DeserializeError::SliceInterfaceTarget`]
/// 7. type missing from a non-empty whitelist: [`DeserializeError::TypeNotAllowed`]
/// 8. strict mode and a record: [`scan_fields`]
///
/// Indirections around the destination (`Box`, `Option`, ...) are looked
/// through for checks 4 to 6 and 8; the whitelist matches the declared type
/// name.
pub fn validate_target(target: TargetRef, options: &Options) -> DeserializeResult<()> {
    let shape = match target {
        TargetRef::Null => return Err(DeserializeError::NilTarget),
        TargetRef::Value(_) => return Err(DeserializeError::NotPointer),
        TargetRef::Handle(None) => return Err(DeserializeError::NilTarget),
        TargetRef::Handle(Some(shape)) => shape,
    };

    let resolved = shape.resolved();
    match resolved.kind() {
        Kind::Dynamic => {
            return Err(DeserializeError::InterfaceTarget {
                type_name: shape.name().to_string(),
            });
        }
        Kind::Map { value } if !options.allows_dynamic_map_values() => {
            if value().resolved().is_dynamic() {
                return Err(DeserializeError::MapInterfaceTarget {
                    type_name: shape.name().to_string(),
                });
            }
        }
        Kind::Sequence { element } if !options.allows_dynamic_slice_elements() => {
            if element().resolved().is_dynamic() {
                return Err(DeserializeError::SliceInterfaceTarget {
                    type_name: shape.name().to_string(),
                });
            }
        }
        _ => {}
    }

    if !options.is_type_allowed(shape.name()) {
        return Err(DeserializeError::TypeNotAllowed {
            type_name: shape.name().to_string(),
        });
    }

    if options.strict_mode() && resolved.is_record() {
        scan_fields(resolved, options, &mut HashSet::new())?;
    }

    Ok(())
}

/// Validate the destination type `T` as if passed through a mutable handle.
pub fn validate_type<T: Shaped + ?Sized>(options: &Options) -> DeserializeResult<()> {
    validate_target(TargetRef::handle_to::<T>(), options)
}

/// Scan the public fields of `record` for dynamic shapes.
///
/// Nested records are scanned with the same `visited` set, so recursive types
/// terminate. Non-public fields are skipped. Shapes that are not records pass.
pub fn scan_fields(
    record: Shape,
    options: &Options,
    visited: &mut HashSet<&'static str>,
) -> DeserializeResult<()> {
    if !visited.insert(record.name()) {
        return Ok(());
    }

    for field in record.fields().iter().filter(|field| field.is_public()) {
        let shape = field.shape().resolved();
        match shape.kind() {
            Kind::Dynamic => {
                return Err(DeserializeError::DynamicField {
                    record: record.name().to_string(),
                    field: field.name().to_string(),
                });
            }
            Kind::Map { value } => {
                if value().resolved().is_dynamic() && !options.allows_dynamic_map_values() {
                    return Err(DeserializeError::DynamicMapField {
                        record: record.name().to_string(),
                        field: field.name().to_string(),
                    });
                }
            }
            Kind::Sequence { element } => {
                if element().resolved().is_dynamic() && !options.allows_dynamic_slice_elements() {
                    return Err(DeserializeError::DynamicSliceField {
                        record: record.name().to_string(),
                        field: field.name().to_string(),
                    });
                }
            }
            Kind::Record { .. } => scan_fields(shape, options, visited)?,
            Kind::Scalar | Kind::Indirect(_) => {}
        }
    }

    Ok(())
}
