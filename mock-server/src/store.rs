//! In-memory record store backing the mock console API.
//!
//! Records are kept as JSON objects keyed by a server-assigned UUID. Each
//! collection knows which fields a create payload must carry and whether its
//! responses are wrapped in a `{"data": ...}` envelope.

use std::collections::{BTreeMap, HashMap};
use std::mem;

use serde_json::{json, Map, Value};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub name: &'static str,
    pub enveloped: bool,
    pub required: &'static [&'static str],
    pub defaults: &'static [(&'static str, bool)],
}

pub const COLLECTIONS: &[CollectionSpec] = &[
    CollectionSpec {
        name: "employees",
        enveloped: true,
        required: &["name", "email"],
        defaults: &[("active", true)],
    },
    CollectionSpec {
        name: "positions",
        enveloped: true,
        required: &["title", "level"],
        defaults: &[],
    },
    CollectionSpec {
        name: "regions",
        enveloped: false,
        required: &["name", "code"],
        defaults: &[],
    },
    CollectionSpec {
        name: "store-assignments",
        enveloped: false,
        required: &["employee_id", "store_code", "kind"],
        defaults: &[],
    },
    CollectionSpec {
        name: "hurdles",
        enveloped: true,
        required: &["position_id", "period", "target_cents", "rate_bps"],
        defaults: &[],
    },
    CollectionSpec {
        name: "transactions",
        enveloped: true,
        required: &["employee_id", "store_code", "amount_cents", "occurred_on"],
        defaults: &[],
    },
];

/// Why a create or update payload was refused.
#[derive(Debug, PartialEq, Eq)]
pub enum Rejection {
    UnknownCollection,
    NotAnObject,
    MissingField(&'static str),
    WrongType(&'static str),
}

#[derive(Debug)]
pub struct Collection {
    pub spec: CollectionSpec,
    records: BTreeMap<Uuid, Value>,
}

impl Collection {
    fn new(spec: CollectionSpec) -> Self {
        Self {
            spec,
            records: BTreeMap::new(),
        }
    }

    pub fn list(&self) -> Vec<Value> {
        self.records.values().cloned().collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &Value> {
        self.records.values()
    }

    pub fn get(&self, id: Uuid) -> Option<&Value> {
        self.records.get(&id)
    }

    /// Check `input`, fill defaults, assign an id and store it.
    pub fn insert(&mut self, input: Value) -> Result<Value, Rejection> {
        let mut object = self.validate(input)?;
        for (key, value) in self.spec.defaults {
            object.entry(key.to_string()).or_insert(Value::Bool(*value));
        }
        let id = Uuid::new_v4();
        object.insert("id".to_string(), json!(id));
        let record = Value::Object(object);
        self.records.insert(id, record.clone());
        Ok(record)
    }

    /// Merge the fields of `patch` into the record. `id` cannot be changed.
    ///
    /// The merged record must still carry every required field, each with the
    /// same JSON type it had before; otherwise nothing is stored.
    pub fn update(&mut self, id: Uuid, patch: Value) -> Result<Option<Value>, Rejection> {
        let Value::Object(patch) = patch else {
            return Err(Rejection::NotAnObject);
        };
        let Some(Value::Object(current)) = self.records.get(&id) else {
            return Ok(None);
        };
        let mut merged = current.clone();
        for (key, value) in patch {
            if key == "id" {
                continue;
            }
            let required = self.spec.required.iter().find(|f| **f == key);
            if let (Some(field), Some(old)) = (required, merged.get(&key)) {
                if !value.is_null() && mem::discriminant(old) != mem::discriminant(&value) {
                    return Err(Rejection::WrongType(*field));
                }
            }
            merged.insert(key, value);
        }
        let record = Value::Object(self.validate(Value::Object(merged))?);
        self.records.insert(id, record.clone());
        Ok(Some(record))
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Value> {
        self.records.remove(&id)
    }

    /// Wrap `payload` in an envelope if this collection answers enveloped.
    pub fn shape(&self, payload: Value) -> Value {
        if self.spec.enveloped {
            json!({ "data": payload })
        } else {
            payload
        }
    }

    fn validate(&self, input: Value) -> Result<Map<String, Value>, Rejection> {
        let Value::Object(object) = input else {
            return Err(Rejection::NotAnObject);
        };
        match self.spec.required.iter().find(|f| object.get(**f).map_or(true, Value::is_null)) {
            Some(missing) => Err(Rejection::MissingField(*missing)),
            None => Ok(object),
        }
    }
}

#[derive(Debug)]
pub struct Store {
    collections: HashMap<&'static str, Collection>,
}

impl Default for Store {
    fn default() -> Self {
        let collections = COLLECTIONS.iter().map(|spec| (spec.name, Collection::new(*spec))).collect();
        Self { collections }
    }
}

impl Store {
    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn collection_mut(&mut self, name: &str) -> Option<&mut Collection> {
        self.collections.get_mut(name)
    }

    /// Insert every payload or none of them.
    pub fn insert_all(&mut self, name: &str, inputs: Vec<Value>) -> Result<Vec<Value>, Rejection> {
        let collection = self.collection_mut(name).ok_or(Rejection::UnknownCollection)?;
        for input in &inputs {
            collection.validate(input.clone())?;
        }
        inputs.into_iter().map(|input| collection.insert(input)).collect()
    }
}
