//! Explicit dynamic dispatch: static fields, methods and constructors looked up
//! by class name and resolved against exact-match signature tables.
//!
//! Unlike the best-effort accessors, every failure here is returned to the
//! caller, naming the step that failed (class, member, or signature).

use std::collections::HashMap;

use tracing::debug;

use crate::error::{Result, ShapelessError};
use crate::introspect::Introspect;
use crate::value::{Kind, PropertyType, Value};

type MethodFn = Box<dyn Fn(&mut dyn Introspect, &[Value]) -> Result<Value> + Send + Sync>;
type StaticFn = Box<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;
type ConstructorFn = Box<dyn Fn(&[Value]) -> Result<Box<dyn Introspect>> + Send + Sync>;

/// Parameter kinds of one callable, compared exactly against argument kinds.
pub type Signature = Vec<Kind>;

struct Overloads<F> {
    entries: Vec<(Signature, F)>,
}

impl<F> Overloads<F> {
    fn new() -> Self {
        Self { entries: Vec::new() }
    }
    fn add(&mut self, signature: Signature, callable: F) {
        // a later registration with the same signature replaces the earlier one
        self.entries.retain(|(s, _)| *s != signature);
        self.entries.push((signature, callable));
    }
    fn resolve(&self, arguments: &[Kind]) -> Option<&F> {
        self.entries
            .iter()
            .find(|(s, _)| s.as_slice() == arguments)
            .map(|(_, f)| f)
    }
    fn signatures(&self) -> Vec<&Signature> {
        self.entries.iter().map(|(s, _)| s).collect()
    }
}

/// Dispatch table for a single class.
pub struct Class {
    name: String,
    static_fields: HashMap<String, Value>,
    methods: HashMap<String, Overloads<MethodFn>>,
    static_methods: HashMap<String, Overloads<StaticFn>>,
    constructors: Overloads<ConstructorFn>,
}

impl Class {
    /// Create an empty class entry
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            static_fields: HashMap::new(),
            methods: HashMap::new(),
            static_methods: HashMap::new(),
            constructors: Overloads::new(),
        }
    }

    /// Create an empty class entry named after an introspectable type
    pub fn of<T: Introspect>() -> Self {
        Self::new(T::descriptor().name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a public static field
    pub fn static_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.static_fields.insert(name.to_string(), value.into());
        self
    }

    /// Add an instance method overload
    pub fn method<T, F>(mut self, name: &str, parameters: &[Kind], f: F) -> Self
    where
        T: Introspect,
        F: Fn(&mut T, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let class = self.name.clone();
        let call: MethodFn = Box::new(move |owner, arguments| {
            let receiver = owner.as_any_mut().downcast_mut::<T>().ok_or_else(|| {
                ShapelessError::Invocation(format!("receiver is not an instance of {}", class))
            })?;
            f(receiver, arguments)
        });
        self.methods
            .entry(name.to_string())
            .or_insert_with(Overloads::new)
            .add(parameters.to_vec(), call);
        self
    }

    /// Add a static method overload
    pub fn static_method<F>(mut self, name: &str, parameters: &[Kind], f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.static_methods
            .entry(name.to_string())
            .or_insert_with(Overloads::new)
            .add(parameters.to_vec(), Box::new(f));
        self
    }

    /// Add a constructor overload
    pub fn constructor<T, F>(mut self, parameters: &[Kind], f: F) -> Self
    where
        T: Introspect,
        F: Fn(&[Value]) -> Result<T> + Send + Sync + 'static,
    {
        let build: ConstructorFn =
            Box::new(move |arguments| Ok(Box::new(f(arguments)?) as Box<dyn Introspect>));
        self.constructors.add(parameters.to_vec(), build);
        self
    }

    /// Signatures registered for a method, instance and static overloads combined
    pub fn signatures(&self, method: &str) -> Vec<&Signature> {
        let mut found = Vec::new();
        if let Some(overloads) = self.methods.get(method) {
            found.extend(overloads.signatures());
        }
        if let Some(overloads) = self.static_methods.get(method) {
            found.extend(overloads.signatures());
        }
        found
    }

    fn no_signature(&self, member: &str, arguments: Vec<Kind>) -> ShapelessError {
        ShapelessError::NoMatchingSignature {
            class: self.name.clone(),
            member: member.to_string(),
            arguments,
        }
    }

    fn no_method(&self, method: &str) -> ShapelessError {
        ShapelessError::NoSuchMethod {
            class: self.name.clone(),
            method: method.to_string(),
        }
    }
}

/// Registry of classes available for dynamic dispatch.
///
/// Built once, then only read; it may be shared between threads by reference.
#[derive(Default)]
pub struct Registry {
    classes: HashMap<String, Class>,
}

impl Registry {
    /// Create new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class, replacing any earlier class of the same name
    pub fn register(&mut self, class: Class) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Get a class by its fully-qualified name
    pub fn get(&self, name: &str) -> Option<&Class> {
        self.classes.get(name)
    }

    /// Get number of registered classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    fn class(&self, name: &str) -> Result<&Class> {
        self.classes
            .get(name)
            .ok_or_else(|| ShapelessError::UnknownClass(name.to_string()))
    }

    /// Read a public static field.
    pub fn static_field(&self, class: &str, field: &str) -> Result<Value> {
        let class = self.class(class)?;
        class
            .static_fields
            .get(field)
            .cloned()
            .ok_or_else(|| ShapelessError::NoSuchField {
                class: class.name.clone(),
                field: field.to_string(),
            })
    }

    /// Invoke an instance method on `owner`, choosing the overload whose
    /// parameter kinds equal the argument kinds.
    pub fn invoke_method(&self, owner: &mut dyn Introspect, method: &str, arguments: &[Value]) -> Result<Value> {
        let class = self.class(owner.type_descriptor().name)?;
        let overloads = class.methods.get(method).ok_or_else(|| class.no_method(method))?;
        let kinds = argument_kinds(arguments);
        let call = overloads
            .resolve(&kinds)
            .ok_or_else(|| class.no_signature(method, kinds.clone()))?;
        debug!(class = %class.name, method, arguments = ?kinds, "invoking method");
        call(owner, arguments)
    }

    /// Invoke a static method of a class.
    pub fn invoke_static_method(&self, class: &str, method: &str, arguments: &[Value]) -> Result<Value> {
        let class = self.class(class)?;
        let overloads = class
            .static_methods
            .get(method)
            .ok_or_else(|| class.no_method(method))?;
        let kinds = argument_kinds(arguments);
        let call = overloads
            .resolve(&kinds)
            .ok_or_else(|| class.no_signature(method, kinds.clone()))?;
        debug!(class = %class.name, method, arguments = ?kinds, "invoking static method");
        call(arguments)
    }

    /// Construct a new instance through the constructor matching the argument kinds.
    pub fn new_instance(&self, class: &str, arguments: &[Value]) -> Result<Box<dyn Introspect>> {
        let class = self.class(class)?;
        let kinds = argument_kinds(arguments);
        let build = class.constructors.resolve(&kinds).ok_or_else(|| {
            ShapelessError::NoMatchingConstructor {
                class: class.name.clone(),
                arguments: kinds.clone(),
            }
        })?;
        debug!(class = %class.name, arguments = ?kinds, "constructing instance");
        build(arguments)
    }
}

pub fn argument_kinds(arguments: &[Value]) -> Vec<Kind> {
    arguments.iter().map(Value::kind).collect()
}

/// Typed access to a positional argument inside a registered callable.
pub fn argument<T: PropertyType>(arguments: &[Value], index: usize) -> Result<T> {
    let value = arguments
        .get(index)
        .cloned()
        .ok_or(ShapelessError::IndexOutOfBounds {
            index,
            len: arguments.len(),
        })?;
    let found = value.kind();
    T::from_value(value).ok_or(ShapelessError::TypeMismatch {
        expected: T::KIND,
        found,
    })
}
