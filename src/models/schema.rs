//! Declarative parameter schemas for tools.
//!
//! Each tool describes its parameters as a list of [`ParamSpec`] values. The
//! dispatcher interprets these generically for validation and defaulting, and
//! the MCP layer renders them as JSON Schema for `tools/list`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// The remote operation a tool maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Search,
    Extract,
    Map,
    Crawl,
}

impl ToolKind {
    /// Every tool kind, in registry order
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Search,
        ToolKind::Extract,
        ToolKind::Map,
        ToolKind::Crawl,
    ];

    /// Tool name as exposed to MCP clients
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Search => "search",
            ToolKind::Extract => "extract",
            ToolKind::Map => "map",
            ToolKind::Crawl => "crawl",
        }
    }

    /// Provider endpoint path, relative to the API base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            ToolKind::Search => "search",
            ToolKind::Extract => "extract",
            ToolKind::Map => "map",
            ToolKind::Crawl => "crawl",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Type and constraints of a single parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamType {
    String,
    Boolean,
    Integer { min: Option<i64>, max: Option<i64> },
    StringList { min_items: usize },
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
    /// A list whose items are each one of a fixed set of strings
    ChoiceList(&'static [&'static str]),
}

impl ParamType {
    /// Short human-readable name used in violation messages
    pub fn describe(&self) -> String {
        match self {
            ParamType::String => "a string".to_string(),
            ParamType::Boolean => "a boolean".to_string(),
            ParamType::Integer { min, max } => match (min, max) {
                (Some(lo), Some(hi)) => format!("an integer between {} and {}", lo, hi),
                (Some(lo), None) => format!("an integer >= {}", lo),
                (None, Some(hi)) => format!("an integer <= {}", hi),
                (None, None) => "an integer".to_string(),
            },
            ParamType::StringList { min_items: 0 } => "an array of strings".to_string(),
            ParamType::StringList { min_items } => {
                format!("an array of at least {} string(s)", min_items)
            }
            ParamType::Choice(allowed) => format!("one of [{}]", allowed.join(", ")),
            ParamType::ChoiceList(allowed) => {
                format!("an array of values from [{}]", allowed.join(", "))
            }
        }
    }

    fn json_schema(&self) -> Map<String, Value> {
        let mut schema = Map::new();
        match self {
            ParamType::String => {
                schema.insert("type".into(), json!("string"));
            }
            ParamType::Boolean => {
                schema.insert("type".into(), json!("boolean"));
            }
            ParamType::Integer { min, max } => {
                schema.insert("type".into(), json!("integer"));
                if let Some(min) = min {
                    schema.insert("minimum".into(), json!(min));
                }
                if let Some(max) = max {
                    schema.insert("maximum".into(), json!(max));
                }
            }
            ParamType::StringList { min_items } => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({ "type": "string" }));
                if *min_items > 0 {
                    schema.insert("minItems".into(), json!(min_items));
                }
            }
            ParamType::Choice(allowed) => {
                schema.insert("type".into(), json!("string"));
                schema.insert("enum".into(), json!(allowed));
            }
            ParamType::ChoiceList(allowed) => {
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), json!({ "type": "string", "enum": allowed }));
            }
        }
        schema
    }
}

/// One parameter of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub ty: ParamType,
    pub required: bool,
    /// Whether an explicit `null` is an accepted value
    pub nullable: bool,
    /// Value applied when an optional parameter is absent
    pub default: Option<Value>,
    pub description: &'static str,
}

impl ParamSpec {
    /// A parameter the caller must supply
    pub fn required(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: true,
            nullable: false,
            default: None,
            description,
        }
    }

    /// An optional parameter with a default
    pub fn optional(
        name: &'static str,
        ty: ParamType,
        default: Value,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            ty,
            required: false,
            nullable: false,
            default: Some(default),
            description,
        }
    }

    /// An optional parameter that may be `null` and defaults to `null`
    pub fn nullable(name: &'static str, ty: ParamType, description: &'static str) -> Self {
        Self {
            name,
            ty,
            required: false,
            nullable: true,
            default: Some(Value::Null),
            description,
        }
    }

    fn json_schema(&self) -> Value {
        let mut schema = self.ty.json_schema();
        if self.nullable {
            if let Some(ty) = schema.remove("type") {
                schema.insert("type".into(), json!([ty, "null"]));
            }
            if let Some(Value::Array(mut allowed)) = schema.remove("enum") {
                allowed.push(Value::Null);
                schema.insert("enum".into(), Value::Array(allowed));
            }
        }
        schema.insert("description".into(), json!(self.description));
        if let Some(default) = &self.default {
            schema.insert("default".into(), default.clone());
        }
        Value::Object(schema)
    }
}

/// A registered tool: name, description and parameter schema
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub kind: ToolKind,
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
}

impl ToolDefinition {
    pub fn new(kind: ToolKind, description: &'static str, params: Vec<ParamSpec>) -> Self {
        Self {
            kind,
            description,
            params,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Names of required parameters, in declaration order
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// Render the parameter list as a JSON Schema object
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.to_string(), p.json_schema()))
            .collect();
        let required: Vec<&str> = self.required_params().collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ToolDefinition {
        ToolDefinition::new(
            ToolKind::Search,
            "sample",
            vec![
                ParamSpec::required("query", ParamType::String, "q"),
                ParamSpec::optional(
                    "max_results",
                    ParamType::Integer {
                        min: Some(5),
                        max: Some(20),
                    },
                    json!(10),
                    "n",
                ),
                ParamSpec::nullable("time_range", ParamType::Choice(&["day", "week"]), "t"),
            ],
        )
    }

    #[test]
    fn test_tool_kind_names() {
        let names: Vec<&str> = ToolKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["search", "extract", "map", "crawl"]);
        assert_eq!(ToolKind::Crawl.to_string(), "crawl");
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = sample().input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["query"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert_eq!(schema["properties"]["max_results"]["minimum"], json!(5));
        assert_eq!(schema["properties"]["max_results"]["maximum"], json!(20));
        assert_eq!(schema["properties"]["max_results"]["default"], json!(10));
        assert!(schema["properties"]["query"].get("default").is_none());
    }

    #[test]
    fn test_nullable_schema_allows_null() {
        let schema = sample().input_schema();
        let time_range = &schema["properties"]["time_range"];
        assert_eq!(time_range["type"], json!(["string", "null"]));
        assert_eq!(time_range["enum"], json!(["day", "week", null]));
        assert_eq!(time_range["default"], Value::Null);
    }

    #[test]
    fn test_describe_integer_bounds() {
        let ty = ParamType::Integer {
            min: Some(1),
            max: None,
        };
        assert_eq!(ty.describe(), "an integer >= 1");
    }
}
