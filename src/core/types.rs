use super::Path;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Key whose value identifies an object node as a query marker
pub const DISCRIMINATOR_KEY: &str = "_type";

/// Expected value of [`DISCRIMINATOR_KEY`]
pub const DISCRIMINATOR_TAG: &str = "query";

/// How many records a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryMode {
    /// At most one record
    Get,
    /// Every matching record
    All,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Get => "get",
            QueryMode::All => "all",
        }
    }
}

/// A validated query marker.
///
/// Wire shape:
///
/// ```json
/// { "_type": "query", "mode": "all", "query": "SELECT * FROM users WHERE age > ?", "params": [21] }
/// ```
///
/// `params` may be omitted. Keys other than these four are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryMarker {
    pub mode: QueryMode,
    /// Passed verbatim to the store, never inspected here
    pub statement: String,
    pub params: Vec<Value>,
}

impl QueryMarker {
    pub fn new(mode: QueryMode, statement: impl Into<String>) -> Self {
        Self {
            mode,
            statement: statement.into(),
            params: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = params;
        self
    }

    /// Discriminator check: does this object claim to be a query?
    ///
    /// A claim says nothing about validity; see [`QueryMarker::from_object`].
    pub fn is_tagged(object: &Map<String, Value>) -> bool {
        object.get(DISCRIMINATOR_KEY).and_then(Value::as_str) == Some(DISCRIMINATOR_TAG)
    }

    /// Validate a tagged object against the marker schema.
    ///
    /// Every violated field is reported, joined with `"; "`.
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, String> {
        let mut violations = Vec::new();

        let mode = match object.get("mode") {
            None => {
                violations.push(missing("mode"));
                None
            }
            Some(value) => match QueryMode::deserialize(value) {
                Ok(mode) => Some(mode),
                Err(e) => {
                    violations.push(format!("field \"mode\": {}", e));
                    None
                }
            },
        };

        let statement = match object.get("query") {
            None => {
                violations.push(missing("query"));
                None
            }
            Some(Value::String(statement)) => Some(statement.clone()),
            Some(other) => {
                violations.push(format!(
                    "field \"query\": expected a string, received {}",
                    kind_of(other)
                ));
                None
            }
        };

        let params = match object.get("params") {
            None => Vec::new(),
            Some(Value::Array(params)) => params.clone(),
            Some(other) => {
                violations.push(format!(
                    "field \"params\": expected an array, received {}",
                    kind_of(other)
                ));
                Vec::new()
            }
        };

        match (mode, statement) {
            (Some(mode), Some(statement)) if violations.is_empty() => Ok(Self {
                mode,
                statement,
                params,
            }),
            _ => Err(violations.join("; ")),
        }
    }
}

fn missing(field: &str) -> String {
    format!("field \"{}\": required", field)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A validated marker together with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedQuery {
    pub path: Path,
    pub marker: QueryMarker,
}

/// Result of running one located query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Success { data: Value },
    Failure { message: String },
}

impl QueryOutcome {
    pub fn success(data: Value) -> Self {
        Self::Success { data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The object spliced into the result document in place of the marker
    pub fn to_value(&self) -> Value {
        match self {
            Self::Success { data } => json!({ "success": true, "data": data }),
            Self::Failure { message } => json!({ "success": false, "error": message }),
        }
    }
}

impl From<QueryOutcome> for Value {
    fn from(outcome: QueryOutcome) -> Self {
        outcome.to_value()
    }
}

/// A located query after it has been run
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedQuery {
    pub located: LocatedQuery,
    pub outcome: QueryOutcome,
}

impl ExecutedQuery {
    pub fn path(&self) -> &Path {
        &self.located.path
    }
}
