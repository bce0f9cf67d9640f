use chrono::NaiveDate;
use shapeless::accessor::{
    assign_write, copy_properties, descriptors, field_names, field_values, properties, resolve_read,
};
use shapeless::introspect;
use shapeless::introspect::{FieldDescriptor, Introspect, Lookup, Target, TypeDescriptor};
use shapeless::registry::{Class, Registry, argument};
use shapeless::value::{Kind, Value};
use shapeless::{Result, ShapelessError};

#[derive(Debug, Default, Clone)]
pub struct Employee {
    name: String,
    salary: i64,
    hired: Option<NaiveDate>,
    manager: Option<String>,
}

impl Employee {
    pub fn name(&self) -> String {
        self.name.clone()
    }
    fn display_title(&self) -> String {
        format!("{} ({})", self.name, self.manager.as_deref().unwrap_or("no manager"))
    }
}

introspect! {
    Employee as "hr.Employee" {
        name: String,
        salary: i64,
        hired: Option<NaiveDate>,
        manager: Option<String>,
    }
    getters {
        getName => name,
        getTitle => display_title,
    }
}

#[derive(Debug, Default)]
pub struct Contractor {
    name: String,
    salary: f64,
    agency: String,
}

introspect! {
    Contractor as "hr.Contractor" {
        name: String,
        salary: f64,
        agency: String,
    }
}

// Written by hand: the descriptor declares `badge`, which the type cannot produce.
pub struct Visitor {
    name: String,
    visits: i64,
}

static VISITOR: TypeDescriptor = TypeDescriptor {
    name: "hr.Visitor",
    fields: &[
        FieldDescriptor { name: "name", data_type: "String", kind: Kind::Text },
        FieldDescriptor { name: "badge", data_type: "String", kind: Kind::Text },
        FieldDescriptor { name: "visits", data_type: "i64", kind: Kind::Integer },
    ],
};

impl Introspect for Visitor {
    fn descriptor() -> &'static TypeDescriptor {
        &VISITOR
    }
    fn type_descriptor(&self) -> &'static TypeDescriptor {
        &VISITOR
    }
    fn get_field(&self, name: &str) -> Lookup {
        match name {
            "name" => Lookup::Found(Value::from(self.name.as_str())),
            "visits" => Lookup::Found(Value::Integer(self.visits)),
            "badge" => Lookup::Error("badge printer offline".into()),
            _ => Lookup::NotFound,
        }
    }
    fn set_field(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(ShapelessError::NoSuchField {
            class: VISITOR.name.to_string(),
            field: name.to_string(),
        })
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

fn employee() -> Employee {
    Employee {
        name: "Grace".into(),
        salary: 5400,
        hired: NaiveDate::from_ymd_opt(1953, 1, 1),
        manager: None,
    }
}

#[test]
fn accessor_read_matches_native_accessor() {
    let e = employee();
    assert_eq!(resolve_read(&e, "name"), Some(Value::Text(e.name())));
    // a logical property served only by an accessor
    assert_eq!(resolve_read(&e, "title"), Some(Value::from("Grace (no manager)")));
}

#[test]
fn enumeration_is_aligned_and_tolerant() {
    let e = employee();
    let names = field_names(Target::Instance(&e));
    assert_eq!(names, field_names(Target::Type(Employee::descriptor())));
    let values = field_values(&e);
    let map = properties(&e);
    assert_eq!(names.len(), values.len());
    assert_eq!(map.keys().collect::<Vec<_>>(), names);
    assert_eq!(map.get("manager"), Some(&Value::Null));
    assert_eq!(resolve_read(&e, "doesNotExist"), None);
    let snapshot = descriptors(&e);
    let types: Vec<_> = snapshot.iter().map(|p| p.data_type).collect();
    assert_eq!(types, vec!["String", "i64", "NaiveDate", "String"]);
}

#[test]
fn one_unreadable_field_leaves_the_others_intact() {
    let v = Visitor { name: "Linus".into(), visits: 3 };
    assert_eq!(
        field_values(&v),
        vec![Some(Value::from("Linus")), None, Some(Value::Integer(3))]
    );
    let map = properties(&v);
    assert_eq!(map.len(), 3);
    assert!(map.contains_key("badge"));
    assert_eq!(map.get("badge"), None);
    let entries: Vec<_> = map.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("name", Some(&Value::from("Linus"))),
            ("badge", None),
            ("visits", Some(&Value::Integer(3))),
        ]
    );
    let snapshot = descriptors(&v);
    assert_eq!(snapshot[1].name, "badge");
    assert_eq!(snapshot[1].value, None);
    assert_eq!(snapshot[2].value, Some(Value::Integer(3)));
}

#[test]
fn write_round_trip_through_text() {
    let mut e = employee();
    let hired = Value::parse(Kind::Date, "1960-05-17").unwrap();
    assert!(assign_write(&mut e, "hired", hired.clone()));
    assert_eq!(resolve_read(&e, "hired").unwrap().to_string(), hired.to_string());
    assert!(assign_write(&mut e, "manager", Value::from("Hopper")));
    assert_eq!(resolve_read(&e, "title"), Some(Value::from("Grace (Hopper)")));
    // writes never go through accessors
    assert!(!assign_write(&mut e, "title", Value::from("Admiral")));
}

#[test]
fn copy_normalizes_numbers() {
    let e = employee();
    let mut c = Contractor { agency: "Navy".into(), ..Default::default() };
    assert_eq!(copy_properties(&e, &mut c), 2);
    assert_eq!(c.name, "Grace");
    assert_eq!(c.salary, 5400.0);
    assert_eq!(c.agency, "Navy");
}

#[test]
fn dynamic_dispatch_through_registry() {
    let mut registry = Registry::new();
    registry.register(
        Class::of::<Employee>()
            .static_field("CURRENCY", "SEK")
            .method::<Employee, _>("raise", &[Kind::Integer], |e, args| {
                e.salary += argument::<i64>(args, 0)?;
                Ok(Value::Integer(e.salary))
            })
            .constructor(&[Kind::Text, Kind::Integer], |args| {
                Ok(Employee {
                    name: argument(args, 0)?,
                    salary: argument(args, 1)?,
                    ..Default::default()
                })
            }),
    );
    assert_eq!(
        registry.static_field("hr.Employee", "CURRENCY").unwrap(),
        Value::from("SEK")
    );
    let mut hired = registry
        .new_instance("hr.Employee", &[Value::from("Ada"), Value::Integer(100)])
        .unwrap();
    assert_eq!(
        registry.invoke_method(hired.as_mut(), "raise", &[Value::Integer(20)]).unwrap(),
        Value::Integer(120)
    );
    assert!(shapeless::accessor::is_instance::<Employee>(hired.as_ref()));
    let err = registry
        .invoke_method(hired.as_mut(), "raise", &[Value::from("20")])
        .unwrap_err();
    assert!(matches!(err, ShapelessError::NoMatchingSignature { .. }));
    let mut contractor = Contractor::default();
    assert!(matches!(
        registry.invoke_method(&mut contractor, "raise", &[Value::Integer(1)]),
        Err(ShapelessError::UnknownClass(_))
    ));
}
