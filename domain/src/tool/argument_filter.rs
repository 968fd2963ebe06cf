//! Tool-call argument filtering.
//!
//! Models often decorate tool calls with bookkeeping keys (`step`, `index`,
//! `call_id`, ...) or use their own name for a parameter. Before a call is
//! executed its arguments are reduced to what the tool's schema declares.
//! A call that still lacks a required parameter is malformed and is dropped
//! by the caller rather than failing the turn.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use super::entities::{ToolCall, ToolDefinition, ToolSpec};

/// Positional or bookkeeping keys that are never real tool arguments
pub const PROBLEMATIC_PARAMS: &[&str] = &[
    "index",
    "step",
    "order",
    "position",
    "id",
    "number",
    "sequence",
    "count",
    "rank",
    "priority",
    "level",
    "stage",
    "phase",
    "iteration",
    "turn",
    "round",
    "cycle",
    "attempt",
    "try",
    "run",
    "execution",
    "call_id",
    "request_id",
    "session_id",
    "timestamp",
    "time",
    "task_id",
    "process_id",
    "batch_id",
    "job_id",
    "thread_id",
];

const SCRATCH_NAMES: &[&str] = &["temp", "tmp", "debug", "test"];

/// Why a tool call was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedToolCall {
    #[error("unknown tool '{0}'")]
    UnknownTool(String),

    #[error("tool '{tool}' is missing required parameter '{param}'")]
    MissingRequired { tool: String, param: String },
}

/// A call reduced to its schema-declared arguments
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredCall {
    pub call: ToolCall,
    /// Argument names that were removed
    pub dropped: Vec<String>,
}

/// Whether an argument name looks like a genuine parameter
pub fn is_reasonable_param_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    name.len() >= 2
        && name.chars().all(|c| c.is_ascii_alphabetic() || c == '_')
        && !lower.ends_with("_id")
        && !SCRATCH_NAMES.contains(&lower.as_str())
}

/// Filter and validate a call against the registered tools.
///
/// Argument names are mapped onto schema parameters by name or alias;
/// everything else is dropped. When nothing matches but the tool has a
/// single missing required parameter and exactly one plausible argument
/// remains, that argument is taken to be the missing parameter.
pub fn filter_tool_call(call: &ToolCall, spec: &ToolSpec) -> Result<FilteredCall, MalformedToolCall> {
    let definition = spec
        .get_resolved(&call.tool_name)
        .ok_or_else(|| MalformedToolCall::UnknownTool(call.tool_name.clone()))?;

    let mut dropped = Vec::new();
    let mut kept: HashMap<String, Value> = HashMap::new();
    let mut leftovers: Vec<(&String, &Value)> = Vec::new();

    let mut names: Vec<&String> = call.arguments.keys().collect();
    names.sort();
    for name in names {
        let value = &call.arguments[name];
        if is_blank(value) || PROBLEMATIC_PARAMS.contains(&name.to_ascii_lowercase().as_str()) {
            dropped.push(name.clone());
            continue;
        }
        match definition.parameter_for(name) {
            Some(param) if !kept.contains_key(&param.name) => {
                kept.insert(param.name.clone(), value.clone());
            }
            Some(_) => dropped.push(name.clone()),
            None => leftovers.push((name, value)),
        }
    }

    recover_single_parameter(definition, &mut kept, &mut leftovers);
    dropped.extend(leftovers.into_iter().map(|(name, _)| name.clone()));

    if let Some(missing) = definition
        .required_parameters()
        .find(|p| !kept.contains_key(&p.name))
    {
        return Err(MalformedToolCall::MissingRequired {
            tool: definition.name.clone(),
            param: missing.name.clone(),
        });
    }

    dropped.sort();
    Ok(FilteredCall {
        call: ToolCall {
            id: call.id.clone(),
            tool_name: definition.name.clone(),
            arguments: kept,
        },
        dropped,
    })
}

fn recover_single_parameter(
    definition: &ToolDefinition,
    kept: &mut HashMap<String, Value>,
    leftovers: &mut Vec<(&String, &Value)>,
) {
    let missing: Vec<_> = definition
        .required_parameters()
        .filter(|p| !kept.contains_key(&p.name))
        .collect();
    let plausible: Vec<usize> = leftovers
        .iter()
        .enumerate()
        .filter(|(_, (name, _))| is_reasonable_param_name(name))
        .map(|(i, _)| i)
        .collect();
    if let ([param], [i]) = (missing.as_slice(), plausible.as_slice()) {
        let (_, value) = leftovers.remove(*i);
        kept.insert(param.name.clone(), value.clone());
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolParameter;

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(
                ToolDefinition::new("web_search", "Search the web")
                    .with_parameter(
                        ToolParameter::new("query", "Search terms", true)
                            .with_aliases(["search_query", "q", "input", "text"]),
                    )
                    .with_parameter(
                        ToolParameter::new("max_results", "Result limit", false).with_type("integer"),
                    ),
            )
            .register_alias("search_web", "web_search")
    }

    #[test]
    fn test_bookkeeping_keys_dropped() {
        let call = ToolCall::new("web_search")
            .with_arg("query", "carbon tax evidence")
            .with_arg("step", 1)
            .with_arg("call_id", "abc");
        let filtered = filter_tool_call(&call, &spec()).unwrap();
        assert_eq!(filtered.call.arguments.len(), 1);
        assert_eq!(filtered.call.get_string("query"), Some("carbon tax evidence"));
        assert_eq!(filtered.dropped, ["call_id", "step"]);
    }

    #[test]
    fn test_alias_names_are_canonicalized() {
        let call = ToolCall::new("search_web").with_arg("q", "rent control");
        let filtered = filter_tool_call(&call, &spec()).unwrap();
        assert_eq!(filtered.call.tool_name, "web_search");
        assert_eq!(filtered.call.get_string("query"), Some("rent control"));
    }

    #[test]
    fn test_single_plausible_argument_recovered() {
        let call = ToolCall::new("web_search")
            .with_arg("search_terms", "minimum wage")
            .with_arg("order", 2);
        let filtered = filter_tool_call(&call, &spec()).unwrap();
        assert_eq!(filtered.call.get_string("query"), Some("minimum wage"));
    }

    #[test]
    fn test_ambiguous_leftovers_are_malformed() {
        let call = ToolCall::new("web_search")
            .with_arg("topic", "a")
            .with_arg("subject", "b");
        let err = filter_tool_call(&call, &spec()).unwrap_err();
        assert_eq!(
            err,
            MalformedToolCall::MissingRequired {
                tool: "web_search".to_string(),
                param: "query".to_string()
            }
        );
    }

    #[test]
    fn test_blank_required_value_is_malformed() {
        let call = ToolCall::new("web_search").with_arg("query", "   ");
        assert!(filter_tool_call(&call, &spec()).is_err());
    }

    #[test]
    fn test_unknown_tool() {
        let call = ToolCall::new("launch_missiles").with_arg("target", "moon");
        assert_eq!(
            filter_tool_call(&call, &spec()).unwrap_err(),
            MalformedToolCall::UnknownTool("launch_missiles".to_string())
        );
    }

    #[test]
    fn test_reasonable_names() {
        assert!(is_reasonable_param_name("query"));
        assert!(is_reasonable_param_name("search_terms"));
        assert!(!is_reasonable_param_name("q"));
        assert!(!is_reasonable_param_name("user_id"));
        assert!(!is_reasonable_param_name("tmp"));
        assert!(!is_reasonable_param_name("query2"));
    }
}
