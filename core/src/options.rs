// sri_manifest/src/options.rs

//! Pipeline configuration.
//!
//! Options arrive as a loosely typed bag (`OptionsInput`) so that hosts can
//! forward whatever their users wrote, e.g. a JSON config file. `SriConfig::assign`
//! checks the bag against the fixed set of recognized options and resolves the
//! typed `SriConfig` every pipeline runs with.

use crate::digest::DEFAULT_ALGORITHMS;
use crate::error::{SriError, SriResult};
use crate::finalize::callbacks::{Formatter, IdentityTransform, JsonFormatter, Transform};

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Output identity used when `file_name` is not configured.
pub const DEFAULT_FILE_NAME: &str = "sri.json";

/// A single option value, shaped like the values a dynamic host can pass.
#[derive(Clone)]
pub enum OptionValue {
  /// Present but unset. Resolves to the option's default.
  Undefined,
  Null,
  Bool(bool),
  Integer(i64),
  Float(f64),
  String(String),
  List(Vec<OptionValue>),
  Map(Vec<(String, OptionValue)>),
  Transform(Arc<dyn Transform>),
  Formatter(Arc<dyn Formatter>),
}

/// Runtime shape of an [`OptionValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
  Undefined,
  Null,
  Bool,
  Integer,
  Float,
  String,
  List,
  Map,
  Transform,
  Formatter,
}

impl fmt::Display for ValueKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ValueKind::Undefined => "undefined",
      ValueKind::Null => "null",
      ValueKind::Bool => "boolean",
      ValueKind::Integer => "integer",
      ValueKind::Float => "float",
      ValueKind::String => "string",
      ValueKind::List => "list",
      ValueKind::Map => "map",
      ValueKind::Transform => "transform function",
      ValueKind::Formatter => "formatter function",
    };
    f.write_str(name)
  }
}

impl OptionValue {
  pub fn kind(&self) -> ValueKind {
    match self {
      OptionValue::Undefined => ValueKind::Undefined,
      OptionValue::Null => ValueKind::Null,
      OptionValue::Bool(_) => ValueKind::Bool,
      OptionValue::Integer(_) => ValueKind::Integer,
      OptionValue::Float(_) => ValueKind::Float,
      OptionValue::String(_) => ValueKind::String,
      OptionValue::List(_) => ValueKind::List,
      OptionValue::Map(_) => ValueKind::Map,
      OptionValue::Transform(_) => ValueKind::Transform,
      OptionValue::Formatter(_) => ValueKind::Formatter,
    }
  }

  fn describe(&self) -> String {
    match self {
      OptionValue::List(items) => match items.iter().find(|item| item.kind() != ValueKind::String) {
        Some(item) => format!("list containing {}", item.kind()),
        None => "list of strings".to_string(),
      },
      other => other.kind().to_string(),
    }
  }
}

impl fmt::Debug for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(v) => write!(f, "Bool({v})"),
      OptionValue::Integer(v) => write!(f, "Integer({v})"),
      OptionValue::Float(v) => write!(f, "Float({v})"),
      OptionValue::String(v) => write!(f, "String({v:?})"),
      OptionValue::List(items) => f.debug_tuple("List").field(items).finish(),
      OptionValue::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
      other => write!(f, "{}", other.kind()),
    }
  }
}

impl From<&str> for OptionValue {
  fn from(value: &str) -> Self {
    OptionValue::String(value.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(value: String) -> Self {
    OptionValue::String(value)
  }
}

impl From<i64> for OptionValue {
  fn from(value: i64) -> Self {
    OptionValue::Integer(value)
  }
}

impl From<bool> for OptionValue {
  fn from(value: bool) -> Self {
    OptionValue::Bool(value)
  }
}

impl From<Vec<&str>> for OptionValue {
  fn from(values: Vec<&str>) -> Self {
    OptionValue::List(values.into_iter().map(OptionValue::from).collect())
  }
}

impl From<Vec<String>> for OptionValue {
  fn from(values: Vec<String>) -> Self {
    OptionValue::List(values.into_iter().map(OptionValue::String).collect())
  }
}

impl From<Arc<dyn Transform>> for OptionValue {
  fn from(value: Arc<dyn Transform>) -> Self {
    OptionValue::Transform(value)
  }
}

impl From<Arc<dyn Formatter>> for OptionValue {
  fn from(value: Arc<dyn Formatter>) -> Self {
    OptionValue::Formatter(value)
  }
}

// JSON can never carry a callable, so `transform`/`formatter` read from a
// config file always fail validation.
impl From<Value> for OptionValue {
  fn from(value: Value) -> Self {
    match value {
      Value::Null => OptionValue::Null,
      Value::Bool(b) => OptionValue::Bool(b),
      Value::Number(n) => match n.as_i64() {
        Some(i) => OptionValue::Integer(i),
        None => OptionValue::Float(n.as_f64().unwrap_or(f64::NAN)),
      },
      Value::String(s) => OptionValue::String(s),
      Value::Array(items) => OptionValue::List(items.into_iter().map(OptionValue::from).collect()),
      Value::Object(map) => OptionValue::Map(map.into_iter().map(|(k, v)| (k, OptionValue::from(v))).collect()),
    }
  }
}

/// Ordered option bag. Later entries for the same key win.
#[derive(Debug, Clone, Default)]
pub struct OptionBag {
  entries: Vec<(String, OptionValue)>,
}

impl OptionBag {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
    self.entries.push((key.into(), value.into()));
    self
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn entries(&self) -> &[(String, OptionValue)] {
    &self.entries
  }
}

/// Everything `SriPipeline::new` accepts as configuration.
#[derive(Debug, Clone, Default)]
pub enum OptionsInput {
  #[default]
  Default,
  /// Bare string, shorthand for `{ file_name: <string> }`.
  FileName(String),
  Bag(OptionBag),
  /// An already resolved configuration, used as-is.
  Config(SriConfig),
}

impl OptionsInput {
  /// Reads options from JSON: an object is an option bag, a string is the
  /// output file name, `null` means defaults.
  pub fn from_json(value: Value) -> SriResult<Self> {
    match value {
      Value::Null => Ok(OptionsInput::Default),
      Value::String(file_name) => Ok(OptionsInput::FileName(file_name)),
      Value::Object(map) => Ok(OptionsInput::Bag(OptionBag {
        entries: map.into_iter().map(|(k, v)| (k, OptionValue::from(v))).collect(),
      })),
      other => Err(SriError::InvalidOptionType {
        option: "options".to_string(),
        expected: "object or string".to_string(),
        actual: OptionValue::from(other).describe(),
      }),
    }
  }
}

impl From<()> for OptionsInput {
  fn from(_: ()) -> Self {
    OptionsInput::Default
  }
}

impl From<&str> for OptionsInput {
  fn from(file_name: &str) -> Self {
    OptionsInput::FileName(file_name.to_string())
  }
}

impl From<String> for OptionsInput {
  fn from(file_name: String) -> Self {
    OptionsInput::FileName(file_name)
  }
}

impl From<OptionBag> for OptionsInput {
  fn from(bag: OptionBag) -> Self {
    OptionsInput::Bag(bag)
  }
}

impl From<SriConfig> for OptionsInput {
  fn from(config: SriConfig) -> Self {
    OptionsInput::Config(config)
  }
}

/// A recognized option: its name, the shape description used in errors and
/// the shape check.
struct OptionSpec {
  name: &'static str,
  expected: &'static str,
  accepts: fn(&OptionValue) -> bool,
}

const OPTION_SPECS: &[OptionSpec] = &[
  OptionSpec {
    name: "file_name",
    expected: "string",
    accepts: |v| matches!(v, OptionValue::String(_)),
  },
  OptionSpec {
    name: "algorithms",
    expected: "list of strings",
    accepts: |v| matches!(v, OptionValue::List(items) if items.iter().all(|i| matches!(i, OptionValue::String(_)))),
  },
  OptionSpec {
    name: "transform",
    expected: "transform function",
    accepts: |v| matches!(v, OptionValue::Transform(_)),
  },
  OptionSpec {
    name: "formatter",
    expected: "formatter function",
    accepts: |v| matches!(v, OptionValue::Formatter(_)),
  },
  OptionSpec {
    name: "length",
    expected: "integer",
    accepts: |v| matches!(v, OptionValue::Integer(_)),
  },
];

/// Resolved pipeline configuration.
#[derive(Clone)]
pub struct SriConfig {
  pub(crate) file_name: String,
  pub(crate) algorithms: Vec<String>,
  pub(crate) transform: Arc<dyn Transform>,
  pub(crate) formatter: Arc<dyn Formatter>,
  pub(crate) length: Option<i64>,
}

impl Default for SriConfig {
  fn default() -> Self {
    Self {
      file_name: DEFAULT_FILE_NAME.to_string(),
      algorithms: DEFAULT_ALGORITHMS.iter().map(|a| a.to_string()).collect(),
      transform: Arc::new(IdentityTransform),
      formatter: Arc::new(JsonFormatter),
      length: None,
    }
  }
}

impl fmt::Debug for SriConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SriConfig")
      .field("file_name", &self.file_name)
      .field("algorithms", &self.algorithms)
      .field("length", &self.length)
      .finish_non_exhaustive()
  }
}

impl SriConfig {
  /// Validates `input` and merges it over the defaults.
  ///
  /// Fails with `UnsupportedOption` for a key outside the recognized set and
  /// with `InvalidOptionType` for a value of the wrong shape. `Undefined`
  /// values leave the default in place.
  pub fn assign(input: impl Into<OptionsInput>) -> SriResult<SriConfig> {
    let entries = match input.into() {
      OptionsInput::Default => Vec::new(),
      OptionsInput::FileName(file_name) => vec![("file_name".to_string(), OptionValue::String(file_name))],
      OptionsInput::Bag(bag) => bag.entries,
      OptionsInput::Config(config) => return Ok(config),
    };

    for (key, value) in &entries {
      let spec = OPTION_SPECS
        .iter()
        .find(|spec| spec.name == key.as_str())
        .ok_or_else(|| SriError::UnsupportedOption { option: key.clone() })?;
      if !matches!(value, OptionValue::Undefined) && !(spec.accepts)(value) {
        return Err(SriError::InvalidOptionType {
          option: key.clone(),
          expected: spec.expected.to_string(),
          actual: value.describe(),
        });
      }
    }

    let mut config = SriConfig::default();
    for (key, value) in entries {
      match (key.as_str(), value) {
        ("file_name", OptionValue::String(file_name)) => config.file_name = file_name,
        ("algorithms", OptionValue::List(items)) => {
          config.algorithms = items
            .into_iter()
            .filter_map(|item| match item {
              OptionValue::String(name) => Some(name),
              _ => None,
            })
            .collect();
        }
        ("transform", OptionValue::Transform(transform)) => config.transform = transform,
        ("formatter", OptionValue::Formatter(formatter)) => config.formatter = formatter,
        ("length", OptionValue::Integer(length)) => config.length = Some(length),
        // Undefined: keep the default.
        _ => {}
      }
    }
    Ok(config)
  }

  /// The output identity: artifact file name and accumulator partition key.
  pub fn file_name(&self) -> &str {
    &self.file_name
  }

  pub fn algorithms(&self) -> &[String] {
    &self.algorithms
  }

  pub fn length(&self) -> Option<i64> {
    self.length
  }

  pub fn transform(&self) -> &Arc<dyn Transform> {
    &self.transform
  }

  pub fn formatter(&self) -> &Arc<dyn Formatter> {
    &self.formatter
  }
}
