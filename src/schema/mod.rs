//! Declarative data shapes and their validator.
//!
//! Every tool input and every remote response is described by a [`Shape`].
//! Validation walks the whole value and reports every violated field path at
//! once; a conforming value is then deserialized into its typed model with
//! serde. The same descriptors are exported as JSON Schema for the tool
//! catalog, so the published contract and the enforced one never drift apart.

pub mod entities;


use std::fmt;

use miette::Diagnostic;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// A single field-level violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Dotted path to the offending value, `(root)` for the value itself.
    pub path: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A value failed its shape check. Carries every violation found.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_issues(.issues))]
#[diagnostic(code(ticktick::schema::invalid))]
pub struct ValidationError {
    pub issues: Vec<Issue>,
}

impl ValidationError {
    pub fn single(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            issues: vec![Issue {
                path: path.into(),
                message: message.into(),
            }],
        }
    }

    /// Issues as `{path, message}` objects, for structured error payloads.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.issues
                .iter()
                .map(|i| json!({ "path": i.path, "message": i.message }))
                .collect(),
        )
    }
}

fn render_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(Issue::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// What to do with keys an object shape does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Accept and drop them (typed models ignore them).
    Strip,
    /// Accept and keep them; typed models hold them in a flattened map.
    Passthrough,
}

/// Whole-object constraint evaluated after all fields passed.
#[derive(Debug, Clone)]
pub struct Rule {
    pub message: &'static str,
    pub check: fn(&Map<String, Value>) -> bool,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub required: bool,
    pub description: Option<&'static str>,
    /// Advertised in the JSON Schema only; the remote service applies it.
    pub default: Option<Value>,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self {
            name,
            shape,
            required: true,
            description: None,
            default: None,
        }
    }

    pub fn optional(name: &'static str, shape: Shape) -> Self {
        Self {
            required: false,
            ..Self::required(name, shape)
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct ObjectShape {
    pub fields: Vec<Field>,
    pub unknown: UnknownKeys,
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone)]
pub enum Shape {
    String,
    Number,
    Integer,
    Boolean,
    /// One of a fixed set of strings.
    Enum(&'static [&'static str]),
    /// One of a fixed set of integers.
    IntEnum(&'static [i64]),
    Array(Box<Shape>),
    Object(ObjectShape),
    /// Accepts a value matching any member; the value is not converted.
    Union(Vec<Shape>),
    Any,
}

impl Shape {
    pub fn object(fields: Vec<Field>) -> Self {
        Shape::Object(ObjectShape {
            fields,
            unknown: UnknownKeys::Strip,
            rules: Vec::new(),
        })
    }

    pub fn passthrough(fields: Vec<Field>) -> Self {
        Shape::Object(ObjectShape {
            fields,
            unknown: UnknownKeys::Passthrough,
            rules: Vec::new(),
        })
    }

    pub fn array(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    /// Attach a whole-object rule. No-op on non-object shapes.
    pub fn with_rule(
        mut self,
        message: &'static str,
        check: fn(&Map<String, Value>) -> bool,
    ) -> Self {
        if let Shape::Object(obj) = &mut self {
            obj.rules.push(Rule { message, check });
        }
        self
    }

    /// Check `value` and collect every violation.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut issues = Vec::new();
        self.check(value, &mut Vec::new(), &mut issues);
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }

    fn check(&self, value: &Value, path: &mut Vec<Segment>, issues: &mut Vec<Issue>) {
        let message = match self {
            Shape::String if !value.is_string() => mismatch("string", value),
            Shape::Number if !value.is_number() => mismatch("number", value),
            Shape::Integer if !is_integer(value) => mismatch("integer", value),
            Shape::Boolean if !value.is_boolean() => mismatch("boolean", value),
            Shape::Enum(allowed) => match value.as_str() {
                Some(s) if allowed.contains(&s) => return,
                _ => format!("expected one of {}, received {}", allowed.join(" | "), value),
            },
            Shape::IntEnum(allowed) => match value.as_i64() {
                Some(n) if allowed.contains(&n) => return,
                _ => {
                    let allowed = allowed
                        .iter()
                        .map(i64::to_string)
                        .collect::<Vec<_>>()
                        .join(" | ");
                    format!("expected one of {allowed}, received {value}")
                }
            },
            Shape::Array(item) => match value.as_array() {
                Some(items) => {
                    for (index, element) in items.iter().enumerate() {
                        path.push(Segment::Index(index));
                        item.check(element, path, issues);
                        path.pop();
                    }
                    return;
                }
                None => mismatch("array", value),
            },
            Shape::Object(obj) => match value.as_object() {
                Some(map) => return obj.check(map, path, issues),
                None => mismatch("object", value),
            },
            Shape::Union(members) => {
                if members.iter().any(|m| m.validate(value).is_ok()) {
                    return;
                }
                mismatch(&self.type_name(), value)
            }
            _ => return,
        };

        issues.push(Issue {
            path: render_path(path),
            message,
        });
    }

    /// Drop keys that strip-mode object shapes do not declare.
    fn prune(&self, value: &mut Value) {
        match (self, value) {
            (Shape::Array(item), Value::Array(items)) => {
                for element in items {
                    item.prune(element);
                }
            }
            (Shape::Object(obj), Value::Object(map)) => {
                if obj.unknown == UnknownKeys::Strip {
                    map.retain(|key, _| obj.fields.iter().any(|f| f.name == key));
                }
                for field in &obj.fields {
                    if let Some(inner) = map.get_mut(field.name) {
                        field.shape.prune(inner);
                    }
                }
            }
            _ => {}
        }
    }

    fn type_name(&self) -> String {
        match self {
            Shape::String | Shape::Enum(_) => "string".into(),
            Shape::Number => "number".into(),
            Shape::Integer | Shape::IntEnum(_) => "integer".into(),
            Shape::Boolean => "boolean".into(),
            Shape::Array(_) => "array".into(),
            Shape::Object(_) => "object".into(),
            Shape::Union(members) => members
                .iter()
                .map(Shape::type_name)
                .collect::<Vec<_>>()
                .join(" or "),
            Shape::Any => "any".into(),
        }
    }

    /// Export as a JSON Schema document fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Shape::String => json!({ "type": "string" }),
            Shape::Number => json!({ "type": "number" }),
            Shape::Integer => json!({ "type": "integer" }),
            Shape::Boolean => json!({ "type": "boolean" }),
            Shape::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
            Shape::IntEnum(allowed) => json!({ "type": "integer", "enum": allowed }),
            Shape::Array(item) => json!({ "type": "array", "items": item.to_json_schema() }),
            Shape::Union(members) => json!({
                "anyOf": members.iter().map(Shape::to_json_schema).collect::<Vec<_>>()
            }),
            Shape::Any => json!({}),
            Shape::Object(obj) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in &obj.fields {
                    let mut schema = field.shape.to_json_schema();
                    if let Some(props) = schema.as_object_mut() {
                        if let Some(description) = field.description {
                            props.insert("description".into(), description.into());
                        }
                        if let Some(default) = &field.default {
                            props.insert("default".into(), default.clone());
                        }
                    }
                    properties.insert(field.name.to_string(), schema);
                    if field.required {
                        required.push(field.name);
                    }
                }
                json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": obj.unknown == UnknownKeys::Passthrough,
                })
            }
        }
    }
}

impl ObjectShape {
    fn check(&self, map: &Map<String, Value>, path: &mut Vec<Segment>, issues: &mut Vec<Issue>) {
        let before = issues.len();

        for field in &self.fields {
            path.push(Segment::Key(field.name));
            // Explicit null counts as absent for optional fields.
            match map.get(field.name) {
                None | Some(Value::Null) if field.required => issues.push(Issue {
                    path: render_path(path),
                    message: "required".into(),
                }),
                None | Some(Value::Null) => {}
                Some(value) => field.shape.check(value, path, issues),
            }
            path.pop();
        }

        if issues.len() == before {
            for rule in &self.rules {
                if !(rule.check)(map) {
                    issues.push(Issue {
                        path: render_path(path),
                        message: rule.message.into(),
                    });
                }
            }
        }
    }
}

enum Segment {
    Key(&'static str),
    Index(usize),
}

fn render_path(path: &[Segment]) -> String {
    if path.is_empty() {
        return "(root)".into();
    }
    let mut out = String::new();
    for segment in path {
        match segment {
            Segment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            Segment::Index(index) => out.push_str(&format!("[{index}]")),
        }
    }
    out
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn mismatch(expected: &str, value: &Value) -> String {
    let received = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    format!("expected {expected}, received {received}")
}

/// Validate `value` against `shape`, drop undeclared keys, then deserialize
/// it into `T`.
pub fn parse<T: DeserializeOwned>(shape: &Shape, mut value: Value) -> Result<T, ValidationError> {
    shape.validate(&value)?;
    shape.prune(&mut value);
    serde_json::from_value(value).map_err(|e| ValidationError::single("(root)", e.to_string()))
}
