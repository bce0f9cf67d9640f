//! The capability set a type exposes to name-based property access.
//!
//! A type takes part in introspection by implementing [`Introspect`]. The
//! implementation is normally generated with the [`introspect!`](crate::introspect!)
//! macro, which registers the declared fields (in declaration order) together
//! with any accessor methods following the `get` + capitalized name convention.

use std::any::Any;
use std::fmt;

use crate::error::Result;
use crate::value::{Kind, Value};

/// Static description of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub data_type: &'static str,
    pub kind: Kind,
}

/// Static description of an introspectable type: its fully-qualified name and
/// its directly declared fields in declaration order.
#[derive(Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl TypeDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Outcome of a single resolution path.
///
/// `NotFound` means the member does not exist; `Error` means it exists but
/// could not produce a value. Best-effort callers collapse both to absence.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Value),
    NotFound,
    Error(String),
}

impl Lookup {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

pub trait Introspect: 'static {
    fn descriptor() -> &'static TypeDescriptor
    where
        Self: Sized;
    fn type_descriptor(&self) -> &'static TypeDescriptor;
    /// Reads a declared field directly.
    fn get_field(&self, name: &str) -> Lookup;
    /// Writes a declared field directly. Fails on unknown names and on values
    /// whose kind the field cannot hold.
    fn set_field(&mut self, name: &str, value: Value) -> Result<()>;
    /// Invokes a registered zero-argument accessor by its exact method name.
    fn invoke_accessor(&self, method: &str) -> Lookup {
        let _ = method;
        Lookup::NotFound
    }
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Either side of the "type or instance" argument accepted by name enumeration.
pub enum Target<'a> {
    Type(&'static TypeDescriptor),
    Instance(&'a dyn Introspect),
}

impl Target<'_> {
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        match self {
            Target::Type(descriptor) => descriptor,
            Target::Instance(instance) => instance.type_descriptor(),
        }
    }
}

/// Implements [`Introspect`] for a struct by explicit registration.
///
/// ```
/// use shapeless::introspect;
///
/// #[derive(Default)]
/// pub struct Person {
///     name: String,
///     age: i64,
/// }
/// impl Person {
///     fn shout(&self) -> String { self.name.to_uppercase() }
/// }
///
/// introspect! {
///     Person as "demo.Person" {
///         name: String,
///         age: i64,
///     }
///     getters {
///         getName => shout,
///     }
/// }
///
/// let mut p = Person::default();
/// p.name = "alice".into();
/// assert_eq!(shapeless::accessor::resolve_read(&p, "name").unwrap().to_string(), "ALICE");
/// ```
///
/// `getters` map accessor method names to infallible methods whose return
/// type implements [`PropertyType`](crate::value::PropertyType). `try_getters`
/// do the same for methods returning `Result<T, E>` where `E: Display`.
#[macro_export]
macro_rules! introspect {
    (
        $ty:ty as $class:literal {
            $($field:ident : $fty:ty),* $(,)?
        }
        $(getters { $($getter:ident => $method:ident),* $(,)? })?
        $(try_getters { $($try_getter:ident => $try_method:ident),* $(,)? })?
    ) => {
        impl $crate::introspect::Introspect for $ty {
            fn descriptor() -> &'static $crate::introspect::TypeDescriptor
            where
                Self: Sized,
            {
                static DESCRIPTOR: $crate::introspect::TypeDescriptor =
                    $crate::introspect::TypeDescriptor {
                        name: $class,
                        fields: &[
                            $($crate::introspect::FieldDescriptor {
                                name: stringify!($field),
                                data_type: <$fty as $crate::value::PropertyType>::DATA_TYPE,
                                kind: <$fty as $crate::value::PropertyType>::KIND,
                            }),*
                        ],
                    };
                &DESCRIPTOR
            }
            fn type_descriptor(&self) -> &'static $crate::introspect::TypeDescriptor {
                <Self as $crate::introspect::Introspect>::descriptor()
            }
            #[allow(unused_variables)]
            fn get_field(&self, name: &str) -> $crate::introspect::Lookup {
                $(
                    if name == stringify!($field) {
                        return $crate::introspect::Lookup::Found(
                            <$fty as $crate::value::PropertyType>::to_value(&self.$field),
                        );
                    }
                )*
                $crate::introspect::Lookup::NotFound
            }
            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::value::Value,
            ) -> $crate::error::Result<()> {
                $(
                    if name == stringify!($field) {
                        let found = value.kind();
                        return match <$fty as $crate::value::PropertyType>::from_value(value) {
                            Some(v) => {
                                self.$field = v;
                                Ok(())
                            }
                            None => Err($crate::error::ShapelessError::TypeMismatch {
                                expected: <$fty as $crate::value::PropertyType>::KIND,
                                found,
                            }),
                        };
                    }
                )*
                Err($crate::error::ShapelessError::NoSuchField {
                    class: $class.to_string(),
                    field: name.to_string(),
                })
            }
            #[allow(unused_variables)]
            fn invoke_accessor(&self, method: &str) -> $crate::introspect::Lookup {
                $($(
                    if method == stringify!($getter) {
                        return $crate::introspect::Lookup::Found(
                            $crate::value::PropertyType::to_value(&self.$method()),
                        );
                    }
                )*)?
                $($(
                    if method == stringify!($try_getter) {
                        return match self.$try_method() {
                            Ok(v) => $crate::introspect::Lookup::Found(
                                $crate::value::PropertyType::to_value(&v),
                            ),
                            Err(e) => $crate::introspect::Lookup::Error(e.to_string()),
                        };
                    }
                )*)?
                $crate::introspect::Lookup::NotFound
            }
            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }
        }
    };
}
