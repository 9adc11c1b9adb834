//! Named functions invocable from `${fn(args)}` placeholders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};

/// A pure, reusable test function. Implementations must not hold mutable
/// state; the registry shares them across runs.
pub trait TestFunction: Send + Sync {
    fn name(&self) -> &str;
    fn invoke(&self, args: &[String]) -> CoreResult<String>;
}

/// Registry mapping function names to callables. Built once, read-only
/// during execution.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn TestFunction>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(UpperFunction));
        registry.register(Arc::new(LowerFunction));
        registry.register(Arc::new(ConcatFunction));
        registry.register(Arc::new(SubstringFunction));
        registry
    }

    pub fn register(&mut self, function: Arc<dyn TestFunction>) {
        self.functions.insert(function.name().to_string(), function);
    }

    pub fn get(&self, name: &str) -> CoreResult<Arc<dyn TestFunction>> {
        self.functions
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::UnknownFunction(name.to_string()))
    }

    pub fn invoke(&self, name: &str, args: &[String]) -> CoreResult<String> {
        self.get(name)?.invoke(args)
    }

    pub fn names(&self) -> Vec<&str> {
        self.functions.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry").field("functions", &self.names()).finish()
    }
}

fn expect_args(name: &str, args: &[String], expected: usize) -> CoreResult<()> {
    if args.len() != expected {
        return Err(CoreError::FunctionArguments {
            name: name.to_string(),
            reason: format!("expected {} argument(s), got {}", expected, args.len()),
        });
    }
    Ok(())
}

struct UpperFunction;

impl TestFunction for UpperFunction {
    fn name(&self) -> &str {
        "upper"
    }

    fn invoke(&self, args: &[String]) -> CoreResult<String> {
        expect_args(self.name(), args, 1)?;
        Ok(args[0].to_uppercase())
    }
}

struct LowerFunction;

impl TestFunction for LowerFunction {
    fn name(&self) -> &str {
        "lower"
    }

    fn invoke(&self, args: &[String]) -> CoreResult<String> {
        expect_args(self.name(), args, 1)?;
        Ok(args[0].to_lowercase())
    }
}

struct ConcatFunction;

impl TestFunction for ConcatFunction {
    fn name(&self) -> &str {
        "concat"
    }

    fn invoke(&self, args: &[String]) -> CoreResult<String> {
        Ok(args.concat())
    }
}

/// `substring(value, begin[, end])` with byte offsets clamped to char
/// boundaries via char indexing.
struct SubstringFunction;

impl TestFunction for SubstringFunction {
    fn name(&self) -> &str {
        "substring"
    }

    fn invoke(&self, args: &[String]) -> CoreResult<String> {
        if args.len() < 2 || args.len() > 3 {
            return Err(CoreError::FunctionArguments {
                name: self.name().to_string(),
                reason: format!("expected 2 or 3 arguments, got {}", args.len()),
            });
        }
        let parse_index = |raw: &str| -> CoreResult<usize> {
            raw.trim().parse::<usize>().map_err(|_| CoreError::FunctionArguments {
                name: self.name().to_string(),
                reason: format!("'{raw}' is not a valid index"),
            })
        };
        let chars: Vec<char> = args[0].chars().collect();
        let begin = parse_index(&args[1])?.min(chars.len());
        let end = match args.get(2) {
            Some(raw) => parse_index(raw)?.min(chars.len()),
            None => chars.len(),
        };
        if begin > end {
            return Err(CoreError::FunctionArguments {
                name: self.name().to_string(),
                reason: format!("begin index {begin} is past end index {end}"),
            });
        }
        Ok(chars[begin..end].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_registered() {
        let registry = FunctionRegistry::with_builtins();
        assert_eq!(registry.invoke("upper", &["abc".into()]).unwrap(), "ABC");
        assert_eq!(registry.invoke("lower", &["AbC".into()]).unwrap(), "abc");
        assert_eq!(registry.invoke("concat", &["a".into(), "b".into()]).unwrap(), "ab");
        assert_eq!(
            registry.invoke("substring", &["hello".into(), "1".into(), "3".into()]).unwrap(),
            "el"
        );
    }

    #[test]
    fn unknown_function_is_an_error() {
        let registry = FunctionRegistry::with_builtins();
        let err = registry.invoke("nope", &[]).unwrap_err();
        assert!(matches!(err, CoreError::UnknownFunction(name) if name == "nope"));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let registry = FunctionRegistry::with_builtins();
        assert!(registry.invoke("upper", &[]).is_err());
        assert!(registry.invoke("substring", &["only".into()]).is_err());
    }
}
