//! Per-run test context: variables, endpoint bindings and functions.

use std::collections::HashMap;

use serde_json::Value as JsonValue;

use crate::endpoint::EndpointRegistry;
use crate::error::{CoreError, CoreResult};
use crate::functions::FunctionRegistry;

/// Mutable state shared by all actions of one test execution.
///
/// Created at test start, mutated by every action, discarded at test end.
/// Never shared across concurrent runs; the endpoint and function registries
/// it references are read-only and may be shared freely.
#[derive(Debug, Clone)]
pub struct TestContext {
    test_name: String,
    execution_id: String,
    variables: HashMap<String, JsonValue>,
    endpoints: EndpointRegistry,
    functions: FunctionRegistry,
}

impl TestContext {
    pub fn new(test_name: impl Into<String>, endpoints: EndpointRegistry) -> Self {
        Self {
            test_name: test_name.into(),
            execution_id: uuid::Uuid::new_v4().to_string(),
            variables: HashMap::new(),
            endpoints,
            functions: FunctionRegistry::with_builtins(),
        }
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn test_name(&self) -> &str {
        &self.test_name
    }

    /// Unique id of this execution, for log correlation.
    pub fn execution_id(&self) -> &str {
        &self.execution_id
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: JsonValue) {
        self.variables.insert(name.into(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<&JsonValue> {
        self.variables.get(name)
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.keys().map(String::as_str).collect()
    }

    /// Variable value rendered as text; JSON strings render without quotes.
    pub fn variable_text(&self, name: &str) -> CoreResult<String> {
        let value = self
            .variables
            .get(name)
            .ok_or_else(|| CoreError::UnknownVariable(name.to_string()))?;
        Ok(render_value(value))
    }

    /// Replace `${variable}` and `${function(args)}` placeholders in `input`.
    ///
    /// Literal text passes through untouched. Unknown variables and
    /// functions are errors; placeholders are not nested.
    pub fn resolve(&self, input: &str) -> CoreResult<String> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;
        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find('}')
                .ok_or_else(|| CoreError::invalid(format!("unterminated placeholder in '{input}'")))?;
            let expression = &after[..end];
            output.push_str(&self.evaluate(expression)?);
            rest = &after[end + 1..];
        }
        output.push_str(rest);
        Ok(output)
    }

    fn evaluate(&self, expression: &str) -> CoreResult<String> {
        let expression = expression.trim();
        if let Some(open) = expression.find('(') {
            let close = expression.rfind(')').ok_or_else(|| {
                CoreError::invalid(format!("malformed function call '{expression}'"))
            })?;
            let name = expression[..open].trim();
            let raw_args = &expression[open + 1..close];
            let args: Vec<String> = if raw_args.trim().is_empty() {
                Vec::new()
            } else {
                raw_args.split(',').map(|a| a.trim().to_string()).collect()
            };
            // Arguments may themselves be variable references.
            let resolved: Vec<String> = args
                .into_iter()
                .map(|arg| match self.variables.get(&arg) {
                    Some(value) => render_value(value),
                    None => arg,
                })
                .collect();
            self.functions.invoke(name, &resolved)
        } else {
            self.variable_text(expression)
        }
    }
}

fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
