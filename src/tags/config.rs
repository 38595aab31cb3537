//! Typed tag configuration
//!
//! A tag's configuration is stored as one JSON object per row. Every known
//! property is independently optional; anything outside the schema is kept in
//! `custom_properties` and written back as a top-level key on export.
//!
//! Properties that may hold either a primitive or a binding object are kept
//! as raw [`Value`]s; only the ones the engine reads are typed.
//!
//! @module tags/config

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::node::Node;

// =============================================================================
// TAG TYPE
// =============================================================================

/// Kind of a tag configuration node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagType {
    Folder,
    AtomicTag,
    UdtType,
    UdtInstance,
    Provider,
    /// Any tag type this engine has no special handling for
    Other(String),
}

impl TagType {
    pub fn as_str(&self) -> &str {
        match self {
            TagType::Folder => "Folder",
            TagType::AtomicTag => "AtomicTag",
            TagType::UdtType => "UdtType",
            TagType::UdtInstance => "UdtInstance",
            TagType::Provider => "Provider",
            TagType::Other(other) => other,
        }
    }
}

impl From<String> for TagType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Folder" => TagType::Folder,
            "AtomicTag" => TagType::AtomicTag,
            "UdtType" => TagType::UdtType,
            "UdtInstance" => TagType::UdtInstance,
            "Provider" => TagType::Provider,
            _ => TagType::Other(value),
        }
    }
}

impl From<TagType> for String {
    fn from(value: TagType) -> Self {
        match value {
            TagType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// SCRIPTS
// =============================================================================

/// A tag event script entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptConfig {
    #[serde(rename = "eventid")]
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

// =============================================================================
// TAG CONFIG
// =============================================================================

/// Declares `TagConfig` and its field-wise merge from one field list so the
/// two can never drift apart.
macro_rules! tag_config {
    ($( $(#[$meta:meta])* $field:ident : $ty:ty ),+ $(,)?) => {
        /// Configuration of one tag, folder, UDT definition or UDT instance
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct TagConfig {
            $(
                $(#[$meta])*
                #[serde(default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )+
            /// Child tags, rebuilt from member rows and inherited structure
            #[serde(default, skip_deserializing, skip_serializing_if = "Vec::is_empty")]
            pub tags: Vec<Node>,
            /// Keys outside the known schema, in document order
            #[serde(flatten)]
            pub custom_properties: Map<String, Value>,
        }

        impl TagConfig {
            /// Fill every unset property from `ancestor`.
            ///
            /// A property set locally is never overwritten. Custom properties
            /// merge per key. `tags` are left alone; children are merged by id
            /// in the resolver.
            pub fn inherit_from(&mut self, ancestor: &TagConfig) {
                $(
                    if self.$field.is_none() {
                        self.$field = ancestor.$field.clone();
                    }
                )+
                for (key, value) in &ancestor.custom_properties {
                    self.custom_properties
                        .entry(key.clone())
                        .or_insert_with(|| value.clone());
                }
            }
        }
    };
}

tag_config! {
    // Basic
    name: String,
    tag_group: Value,
    enabled: Value,
    // Value
    tag_type: TagType,
    type_id: String,
    value_source: String,
    data_type: Value,
    value: Value,
    opc_server: Value,
    opc_item_path: Value,
    source_tag_path: Value,
    execution_mode: Value,
    execution_rate: Value,
    expression: Value,
    #[serde(rename = "deriveExpressionGetter")]
    read_expression: Value,
    #[serde(rename = "deriveExpressionSetter")]
    write_expression: Value,
    query: Value,
    query_type: Value,
    datasource: Value,
    // Numeric
    deadband: Value,
    deadband_mode: Value,
    scale_mode: Value,
    raw_low: Value,
    raw_high: Value,
    scaled_low: Value,
    scaled_high: Value,
    clamp_mode: Value,
    scale_factor: Value,
    eng_unit: Value,
    eng_low: Value,
    eng_high: Value,
    eng_limit_mode: Value,
    format_string: Value,
    // Metadata
    tooltip: Value,
    documentation: Value,
    type_color: Value,
    // Security
    read_permissions: Map<String, Value>,
    read_only: bool,
    write_permissions: Map<String, Value>,
    // Scripting
    event_scripts: Vec<ScriptConfig>,
    // Alarms
    alarms: Vec<Value>,
    alarm_eval_enabled: Value,
    // History
    history_enabled: Value,
    history_provider: Value,
    historical_deadband_style: Value,
    historical_deadband_mode: Value,
    historical_deadband: Value,
    sample_mode: Value,
    history_sample_rate: Value,
    history_sample_rate_units: Value,
    history_tag_group: Value,
    history_time_deadband: Value,
    history_time_deadband_units: Value,
    history_max_age: Value,
    history_max_age_units: Value,
    // UDT
    parameters: Map<String, Value>,
}

impl TagConfig {
    /// A named folder with no other properties
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            tag_type: Some(TagType::Folder),
            ..Self::default()
        }
    }

    pub fn is_udt_definition(&self) -> bool {
        self.tag_type == Some(TagType::UdtType)
    }

    pub fn is_udt_instance(&self) -> bool {
        self.tag_type == Some(TagType::UdtInstance)
    }

    /// JSON form of this config without its child tags
    pub fn to_minimal_json(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        if let Value::Object(map) = &mut value {
            map.remove("tags");
        }
        Ok(value)
    }
}

// =============================================================================
// TESTS
// =============================================================================
