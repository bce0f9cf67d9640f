//! Shapeless – uniform name/value access to data whose shape is only known at run time.
//!
//! Two independent facilities share one idea: walk an unknown structure and
//! expose it as names and values.
//! * The *property accessor* reads, writes and enumerates the fields of any
//!   type implementing [`introspect::Introspect`], trying a `get` accessor
//!   method before the field itself.
//! * The *tabular serializer* runs a statement against a relational store and
//!   renders every row as a `{"column":"value"}` record without a declared
//!   result shape.
//!
//! ## Modules
//! * [`value`] – The dynamic [`value::Value`] and the [`value::PropertyType`]
//!   trait for field types.
//! * [`introspect`] – The [`introspect::Introspect`] capability set and the
//!   [`introspect!`] registration macro.
//! * [`accessor`] – Best-effort reads, writes, enumeration and bulk copy.
//! * [`registry`] – Explicit dynamic dispatch: static fields, methods and
//!   constructors by exact signature.
//! * [`settings`] – Connection settings loaded through the `config` crate.
//! * [`driver`] – Connection/statement/cursor traits and the SQLite driver.
//! * [`serializer`] – Record rendering and the [`serializer::Serializer`].
//!
//! ## Error policy
//! Introspection is best-effort: a missing or unreadable property becomes an
//! absent value and a log line, never an error. Dynamic dispatch and database
//! calls are explicit requests and return [`ShapelessError`] on failure.
//!
//! ## Quick Start
//! ```
//! use shapeless::{introspect, accessor, settings::Settings, serializer::Serializer};
//!
//! #[derive(Default)]
//! pub struct City { name: String, population: i64 }
//!
//! introspect! {
//!     City as "geo.City" {
//!         name: String,
//!         population: i64,
//!     }
//! }
//!
//! let city = City { name: "Uppsala".into(), population: 177_074 };
//! assert_eq!(accessor::field_values(&city).len(), 2);
//! assert!(accessor::resolve_read(&city, "mayor").is_none());
//!
//! let settings = Settings::sqlite(":memory:");
//! let serializer = Serializer::new(&settings);
//! let text = serializer.execute_query("select 1 as id, 'a' as name").unwrap();
//! assert_eq!(text, r#"{"id":"1","name":"a"}"#);
//! ```

pub mod accessor;
pub mod driver;
pub mod error;
pub mod introspect;
pub mod registry;
pub mod serializer;
pub mod settings;
pub mod value;

pub use error::{Result, ShapelessError};
