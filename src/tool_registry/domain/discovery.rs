//! Normalization of third-party tools-listing responses.
//!
//! Tool servers disagree on how they wrap and describe their tools. The
//! normalizer tries a fixed, ordered list of envelope shapes and then a fixed,
//! ordered list of descriptor flavours; the first match wins at each level.
//! Every input produces a result: unknown envelopes yield no descriptors and
//! unusable descriptors are skipped.

use super::{DEFAULT_TOOL_DESCRIPTION, McpTool, empty_parameters};
use serde_json::Value;
use std::collections::HashSet;

/// Envelope wrapping the descriptor list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// The body is itself the descriptor array.
    BareArray,
    /// `{"tools": [...]}`.
    ToolsField,
    /// `{"data": [...]}`.
    DataField,
}

impl EnvelopeShape {
    /// Shapes in the order they are tried.
    pub const MATCH_ORDER: [Self; 3] = [Self::BareArray, Self::ToolsField, Self::DataField];

    /// Returns the descriptor list when `body` has this shape.
    #[must_use]
    pub fn descriptors(self, body: &Value) -> Option<&[Value]> {
        let list = match self {
            Self::BareArray => body.as_array(),
            Self::ToolsField => body.get("tools").and_then(Value::as_array),
            Self::DataField => body.get("data").and_then(Value::as_array),
        };
        list.map(Vec::as_slice)
    }

    /// Finds the first matching shape and its descriptor list.
    #[must_use]
    pub fn detect(body: &Value) -> Option<(Self, &[Value])> {
        Self::MATCH_ORDER
            .into_iter()
            .find_map(|shape| shape.descriptors(body).map(|list| (shape, list)))
    }
}

/// Form of a single tool descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorFlavor {
    /// `{"type": "function", "function": {name, description, parameters}}`.
    FunctionCall,
    /// Any object with top-level fields and nested `function` fallbacks.
    Flat,
}

impl DescriptorFlavor {
    /// Flavours in the order they are tried.
    pub const MATCH_ORDER: [Self; 2] = [Self::FunctionCall, Self::Flat];

    /// Returns whether `descriptor` has this flavour.
    #[must_use]
    pub fn matches(self, descriptor: &Value) -> bool {
        match self {
            Self::FunctionCall => {
                descriptor.get("type").and_then(Value::as_str) == Some("function")
                    && descriptor.get("function").is_some_and(Value::is_object)
            }
            Self::Flat => descriptor.is_object(),
        }
    }

    /// Extracts a tool from a descriptor of this flavour.
    ///
    /// Returns `None` when no non-empty name can be found.
    #[must_use]
    pub fn extract(self, descriptor: &Value) -> Option<McpTool> {
        let function = present(descriptor, "function");
        let nested = |key: &str| function.and_then(|inner| present(inner, key));

        let (name, description, parameters) = match self {
            Self::FunctionCall => (
                nested("name"),
                nested("description"),
                nested("parameters"),
            ),
            Self::Flat => (
                present(descriptor, "name").or_else(|| nested("name")),
                present(descriptor, "description")
                    .or_else(|| present(descriptor, "desc"))
                    .or_else(|| nested("description")),
                present(descriptor, "parameters")
                    .or_else(|| present(descriptor, "schema"))
                    .or_else(|| present(descriptor, "inputSchema"))
                    .or_else(|| nested("parameters")),
            ),
        };

        McpTool::new(
            name.and_then(Value::as_str)?,
            description
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_TOOL_DESCRIPTION),
            parameters.cloned().unwrap_or_else(empty_parameters),
        )
        .ok()
    }

    /// Finds the first matching flavour and extracts a tool with it.
    #[must_use]
    pub fn normalize(descriptor: &Value) -> Option<McpTool> {
        Self::MATCH_ORDER
            .into_iter()
            .find(|flavor| flavor.matches(descriptor))
            .and_then(|flavor| flavor.extract(descriptor))
    }
}

/// Looks up a field, treating JSON `null` as absent.
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|field| !field.is_null())
}

/// Result of normalizing one tools-listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedTools {
    /// Matched envelope, if any.
    pub envelope: Option<EnvelopeShape>,
    /// Tools in response order, each enabled.
    pub tools: Vec<McpTool>,
    /// Descriptors dropped because no name could be extracted.
    pub skipped: usize,
    /// Names dropped because an earlier descriptor already used them.
    pub duplicates: Vec<String>,
}

/// Normalizes a tools-listing response body into canonical tools.
#[must_use]
pub fn normalize_tools_response(body: &Value) -> NormalizedTools {
    let Some((envelope, descriptors)) = EnvelopeShape::detect(body) else {
        return NormalizedTools::default();
    };

    let mut normalized = NormalizedTools {
        envelope: Some(envelope),
        ..NormalizedTools::default()
    };
    let mut seen = HashSet::new();

    for descriptor in descriptors {
        let Some(tool) = DescriptorFlavor::normalize(descriptor) else {
            normalized.skipped += 1;
            continue;
        };
        if seen.insert(tool.name().to_owned()) {
            normalized.tools.push(tool.with_enabled(true));
        } else {
            normalized.duplicates.push(tool.name().to_owned());
        }
    }

    normalized
}
