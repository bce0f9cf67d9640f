//! Best-effort, name-based property access over [`Introspect`] instances.
//!
//! Nothing in this module returns an error for a missing or unreadable
//! property; such failures are logged and turn into absent values or no-ops.
//! The one exception is [`property_text`], the explicit string read, which
//! surfaces an unresolved property as an error.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::error::{Result, ShapelessError};
use crate::introspect::{FieldDescriptor, Introspect, Lookup, Target};
use crate::value::{Kind, Value};

/// One logical property of an instance: name, declared type and current value.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Property {
    #[serde(rename = "type")]
    pub data_type: &'static str,
    pub name: &'static str,
    pub value: Option<Value>,
}

/// Name to value mapping that keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(&'static str, Option<Value>)>,
}

impl PropertyMap {
    /// The value stored under `name`, if the name is present and resolved.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, v)| v.as_ref())
    }
    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| *n == name)
    }
    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(n, _)| *n)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&Value>)> + '_ {
        self.entries.iter().map(|(n, v)| (*n, v.as_ref()))
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Accessor method name for a property: `name` becomes `getName`.
pub fn getter_name(property: &str) -> String {
    let mut chars = property.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}

fn lookup(instance: &dyn Introspect, name: &str) -> Lookup {
    if name.is_empty() {
        return Lookup::NotFound;
    }
    let getter = getter_name(name);
    let through_accessor = instance.invoke_accessor(&getter);
    if through_accessor.is_found() {
        return through_accessor;
    }
    if let Lookup::Error(diagnostic) = &through_accessor {
        debug!(class = instance.type_descriptor().name, %getter, %diagnostic, "accessor failed, falling back to field");
    }
    instance.get_field(name)
}

/// Reads a property by name: the `get` accessor first, the declared field second.
///
/// Returns `None` when neither path yields a value. A field holding no value
/// reads as `Some(Value::Null)`.
pub fn resolve_read(instance: &dyn Introspect, name: &str) -> Option<Value> {
    match lookup(instance, name) {
        Lookup::Found(value) => Some(value),
        Lookup::NotFound => {
            debug!(class = instance.type_descriptor().name, property = name, "no accessor or field");
            None
        }
        Lookup::Error(diagnostic) => {
            warn!(class = instance.type_descriptor().name, property = name, %diagnostic, "property unreadable");
            None
        }
    }
}

/// Reads the field a descriptor refers to, skipping any accessor.
pub fn field_value(instance: &dyn Introspect, field: &FieldDescriptor) -> Option<Value> {
    match instance.get_field(field.name) {
        Lookup::Found(value) => Some(value),
        other => {
            debug!(class = instance.type_descriptor().name, field = field.name, outcome = ?other, "field unreadable");
            None
        }
    }
}

/// Assigns a declared field directly; accessors are never consulted.
///
/// Returns whether the value was stored. Unknown names and incompatible values
/// are logged and otherwise ignored.
pub fn assign_write(instance: &mut dyn Introspect, name: &str, value: Value) -> bool {
    match instance.set_field(name, value) {
        Ok(()) => true,
        Err(e) => {
            warn!(class = instance.type_descriptor().name, property = name, error = %e, "assignment ignored");
            false
        }
    }
}

/// Declared field names of a type or of an instance's type, in declaration order.
pub fn field_names(target: Target<'_>) -> Vec<&'static str> {
    target.descriptor().field_names()
}

/// Values positionally aligned with [`field_names`].
pub fn field_values(instance: &dyn Introspect) -> Vec<Option<Value>> {
    field_names(Target::Instance(instance))
        .into_iter()
        .map(|name| resolve_read(instance, name))
        .collect()
}

pub fn properties(instance: &dyn Introspect) -> PropertyMap {
    let entries = field_names(Target::Instance(instance))
        .into_iter()
        .map(|name| (name, resolve_read(instance, name)))
        .collect();
    PropertyMap { entries }
}

/// Complete schema and data snapshot of an instance.
pub fn descriptors(instance: &dyn Introspect) -> Vec<Property> {
    instance
        .type_descriptor()
        .fields
        .iter()
        .map(|field| Property {
            data_type: field.data_type,
            name: field.name,
            value: resolve_read(instance, field.name),
        })
        .collect()
}

/// Explicit string read of a property. Unlike [`resolve_read`] this reports an
/// unresolved name as [`ShapelessError::NoSuchProperty`].
pub fn property_text(instance: &dyn Introspect, name: &str) -> Result<String> {
    match lookup(instance, name) {
        Lookup::Found(value) => Ok(value.to_string()),
        _ => Err(ShapelessError::NoSuchProperty {
            class: instance.type_descriptor().name.to_string(),
            property: name.to_string(),
        }),
    }
}

/// Copies every property whose name both types declare, normalizing values
/// through their canonical text form. Returns the number of properties copied.
pub fn copy_properties(source: &dyn Introspect, destination: &mut dyn Introspect) -> usize {
    let target = destination.type_descriptor();
    let mut copied = 0;
    for field in source.type_descriptor().fields {
        let Some(slot) = target.field(field.name) else {
            continue;
        };
        let Some(value) = resolve_read(source, field.name) else {
            continue;
        };
        let converted = match convert(&value, slot.kind) {
            Ok(converted) => converted,
            Err(e) => {
                warn!(from = source.type_descriptor().name, to = target.name, property = field.name, error = %e, "property not copied");
                continue;
            }
        };
        if assign_write(destination, field.name, converted) {
            copied += 1;
        }
    }
    copied
}

fn convert(value: &Value, kind: Kind) -> Result<Value> {
    match (value, kind) {
        (Value::Null, _) => Ok(Value::Null),
        (_, Kind::Text) => Ok(Value::Text(value.to_string())),
        // lists have no canonical text to parse back, so they only copy as-is
        (Value::List(_), Kind::List) => Ok(value.clone()),
        _ => Value::parse(kind, &value.to_string()),
    }
}

/// Whether the instance's concrete type is `T`.
pub fn is_instance<T: Introspect>(instance: &dyn Introspect) -> bool {
    instance.as_any().is::<T>()
}

/// Element `index` of a list value.
pub fn element_at(value: &Value, index: usize) -> Result<Value> {
    match value {
        Value::List(values) => values.get(index).cloned().ok_or(ShapelessError::IndexOutOfBounds {
            index,
            len: values.len(),
        }),
        other => Err(ShapelessError::TypeMismatch {
            expected: Kind::List,
            found: other.kind(),
        }),
    }
}
