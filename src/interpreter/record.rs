use rustc_hash::FxHashMap;

use super::Value;

/// A record's single pre-built instance. Field initializers run once, when
/// the declaration executes; the constructor hands out this same instance on
/// every call. Fields are queryable but never reassigned.
pub struct RecordInstance {
    pub name: String,
    fields: FxHashMap<String, Value>,
}

impl RecordInstance {
    pub fn new(name: String, fields: FxHashMap<String, Value>) -> Self {
        Self { name, fields }
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl std::fmt::Debug for RecordInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordInstance")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}
