//! Parameter schemas: declarative field specs and validation.
//!
//! A schema is a list of field definitions, each a (presence, type) pair. Validation
//! is a pure function from a raw JSON value to [`ValidatedParams`]: unknown fields
//! are rejected, absent optional fields stay absent, and values are normalized
//! (currency codes lower-cased).

use crate::types::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs, including its domain constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    /// Any string, including empty.
    String,
    /// Identifiers and names; must contain at least one character.
    NonEmptyString,
    /// Whole number with optional inclusive bounds.
    Int { min: Option<i64>, max: Option<i64> },
    /// ISO 4217 currency code, any case; normalized to lowercase.
    Currency,
    /// Array of objects validated against a nested schema.
    ObjectList(ParamSchema),
}

impl ParamType {
    pub fn int_at_least(min: i64) -> Self {
        ParamType::Int {
            min: Some(min),
            max: None,
        }
    }

    pub fn int_between(min: i64, max: i64) -> Self {
        ParamType::Int {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Validate a JSON value against this parameter type, returning the normalized value.
    ///
    /// `field` is the dotted path reported in errors.
    pub fn normalize(&self, field: &str, value: &Value) -> Result<Value> {
        match self {
            ParamType::String => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(type_mismatch(field, "string", other)),
            },
            ParamType::NonEmptyString => match value {
                Value::String(s) if s.is_empty() => {
                    Err(Error::validation(field, "must not be empty"))
                }
                Value::String(_) => Ok(value.clone()),
                other => Err(type_mismatch(field, "string", other)),
            },
            ParamType::Int { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| type_mismatch(field, "integer", value))?;
                if let Some(min) = min {
                    if n < *min {
                        return Err(Error::validation(field, format!("must be >= {}", min)));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(Error::validation(field, format!("must be <= {}", max)));
                    }
                }
                Ok(value.clone())
            }
            ParamType::Currency => {
                let code = value
                    .as_str()
                    .ok_or_else(|| type_mismatch(field, "string", value))?;
                let lower = code.to_ascii_lowercase();
                if !is_iso_currency(&lower) {
                    return Err(Error::validation(
                        field,
                        format!("invalid currency code '{}', expected an ISO 4217 code", code),
                    ));
                }
                Ok(Value::String(lower))
            }
            ParamType::ObjectList(item_schema) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| type_mismatch(field, "array", value))?;
                let mut normalized = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let prefix = format!("{}[{}]", field, i);
                    let map = item
                        .as_object()
                        .ok_or_else(|| type_mismatch(&prefix, "object", item))?;
                    let validated = item_schema.validate_map(Some(&prefix), map)?;
                    normalized.push(validated.into_value());
                }
                Ok(Value::Array(normalized))
            }
        }
    }

    /// Human-readable type name for prompt generation.
    pub fn display_name(&self) -> String {
        match self {
            ParamType::String | ParamType::NonEmptyString => "string".to_string(),
            ParamType::Int { .. } => "integer".to_string(),
            ParamType::Currency => "currency".to_string(),
            ParamType::ObjectList(_) => "object[]".to_string(),
        }
    }

    fn json_schema(&self) -> Value {
        match self {
            ParamType::String => json!({"type": "string"}),
            ParamType::NonEmptyString => json!({"type": "string", "minLength": 1}),
            ParamType::Int { min, max } => {
                let mut schema = json!({"type": "integer"});
                if let Some(min) = min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            ParamType::Currency => json!({"type": "string", "pattern": "^[A-Za-z]{3}$"}),
            ParamType::ObjectList(item_schema) => json!({
                "type": "array",
                "items": item_schema.to_json_schema(),
            }),
        }
    }
}

fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_mismatch(field: &str, expected: &str, got: &Value) -> Error {
    Error::validation(
        field,
        format!("expected {}, got {}", expected, value_type_name(got)),
    )
}

// =============================================================================
// Currency codes
// =============================================================================

/// Circulating ISO 4217 codes, lowercase and sorted.
const ISO_CURRENCIES: &[&str] = &[
    "aed", "afn", "all", "amd", "ang", "aoa", "ars", "aud", "awg", "azn", "bam", "bbd", "bdt",
    "bgn", "bhd", "bif", "bmd", "bnd", "bob", "brl", "bsd", "btn", "bwp", "byn", "bzd", "cad",
    "cdf", "chf", "clp", "cny", "cop", "crc", "cuc", "cup", "cve", "czk", "djf", "dkk", "dop",
    "dzd", "egp", "ern", "etb", "eur", "fjd", "fkp", "gbp", "gel", "ghs", "gip", "gmd", "gnf",
    "gtq", "gyd", "hkd", "hnl", "htg", "huf", "idr", "ils", "inr", "iqd", "irr", "isk", "jmd",
    "jod", "jpy", "kes", "kgs", "khr", "kmf", "kpw", "krw", "kwd", "kyd", "kzt", "lak", "lbp",
    "lkr", "lrd", "lsl", "lyd", "mad", "mdl", "mga", "mkd", "mmk", "mnt", "mop", "mru", "mur",
    "mvr", "mwk", "mxn", "myr", "mzn", "nad", "ngn", "nio", "nok", "npr", "nzd", "omr", "pab",
    "pen", "pgk", "php", "pkr", "pln", "pyg", "qar", "ron", "rsd", "rub", "rwf", "sar", "sbd",
    "scr", "sdg", "sek", "sgd", "shp", "sle", "sll", "sos", "srd", "ssp", "stn", "svc", "syp",
    "szl", "thb", "tjs", "tmt", "tnd", "top", "try", "ttd", "twd", "tzs", "uah", "ugx", "usd",
    "uyu", "uzs", "ved", "ves", "vnd", "vuv", "wst", "xaf", "xcd", "xcg", "xof", "xpf", "yer",
    "zar", "zmw", "zwg", "zwl",
];

fn is_iso_currency(code: &str) -> bool {
    ISO_CURRENCIES.binary_search(&code).is_ok()
}

// =============================================================================
// Parameter definition
// =============================================================================

/// Whether a field must be supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
}

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    pub presence: Presence,
    pub description: String,
}

impl ParamDef {
    pub fn required(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            presence: Presence::Required,
            description: description.to_string(),
        }
    }

    pub fn optional(name: &str, param_type: ParamType, description: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type,
            presence: Presence::Optional,
            description: description.to_string(),
        }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Ordered set of parameter definitions for one tool (or one nested object).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSchema {
    params: Vec<ParamDef>,
}

impl ParamSchema {
    pub fn new(params: Vec<ParamDef>) -> Self {
        Self { params }
    }

    /// Schema that accepts only an empty object.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn params(&self) -> &[ParamDef] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Validate raw caller input. `null` is accepted as "no parameters".
    pub fn validate(&self, raw: &Value) -> Result<ValidatedParams> {
        match raw {
            Value::Null => self.validate_map(None, &Map::new()),
            Value::Object(map) => self.validate_map(None, map),
            other => Err(Error::validation(
                "params",
                format!("expected object, got {}", value_type_name(other)),
            )),
        }
    }

    fn validate_map(&self, prefix: Option<&str>, map: &Map<String, Value>) -> Result<ValidatedParams> {
        let path = |name: &str| match prefix {
            Some(p) => format!("{}.{}", p, name),
            None => name.to_string(),
        };

        // Unknown fields first: nothing unvalidated may reach the collaborator
        if let Some(key) = map.keys().find(|k| self.get(k).is_none()) {
            return Err(Error::validation(path(key), "unknown parameter"));
        }

        let mut out = Map::new();
        for def in &self.params {
            match map.get(&def.name) {
                Some(value) => {
                    let normalized = def.param_type.normalize(&path(&def.name), value)?;
                    out.insert(def.name.clone(), normalized);
                }
                None if def.is_required() => {
                    return Err(Error::validation(path(&def.name), "is required"));
                }
                None => {}
            }
        }

        Ok(ValidatedParams(out))
    }

    /// Render as a JSON Schema object for tool descriptors.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for def in &self.params {
            let mut prop = def.param_type.json_schema();
            prop["description"] = Value::String(def.description.clone());
            properties.insert(def.name.clone(), prop);
            if def.is_required() {
                required.push(Value::String(def.name.clone()));
            }
        }

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

// =============================================================================
// Validated parameters
// =============================================================================

/// Parameters that passed a [`ParamSchema`]. Only schema fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedParams(Map<String, Value>);

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set a field after validation (context merge only).
    pub(crate) fn set(&mut self, name: &str, value: Value) {
        self.0.insert(name.to_string(), value);
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

// =============================================================================
// Tests
// =============================================================================
