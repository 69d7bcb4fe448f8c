use serde::{
    Deserialize,
    Serialize,
};
use serde_json::{
    Map,
    Value,
};

/// One provenance record: a flag naming the operation plus its parameters.
///
/// Serializes as a flat JSON object, e.g.
/// `{"SubsetByBatches": true, "SubsettedBatches": ["A"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogEntry(Map<String, Value>);

impl LogEntry {
    /// Starts an entry for the named operation.
    pub fn new(operation: &str) -> Self {
        let mut map = Map::new();
        map.insert(operation.to_string(), Value::Bool(true));
        Self(map)
    }

    /// Adds a parameter to the entry.
    pub fn with_param<V: Into<Value>>(
        mut self,
        key: &str,
        value: V,
    ) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Name of the operation, i.e. the first key of the entry.
    pub fn operation(&self) -> Option<&str> {
        self.0.keys().next().map(String::as_str)
    }

    pub fn get(
        &self,
        key: &str,
    ) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

/// Append-only record of the transformations applied to a dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog {
    entries: Vec<LogEntry>,
}

impl OperationLog {
    pub fn push(
        &mut self,
        entry: LogEntry,
    ) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }
}
