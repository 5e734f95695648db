//! Per-request context.
//!
//! A fresh `Context` is built for every dispatch from the matched route's
//! initial values. Middleware write into it and the handler reads what they
//! wrote. It never outlives the dispatch.
//!
//! Route-level values are cloned, not shared: a request can never observe
//! another request's writes, even for nested values.

use std::collections::HashMap;

use serde_json::{Map, Value};

/// Reserved key holding the extracted path parameters.
pub const PATH_PARAMS_KEY: &str = "pathParams";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context seeded from a route's initial values plus the matched path parameters.
    pub(crate) fn for_request(initial: &Map<String, Value>, params: Vec<(String, String)>) -> Self {
        let mut values = initial.clone();
        if !params.is_empty() {
            let params: Map<String, Value> = params
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect();
            values.insert(PATH_PARAMS_KEY.to_string(), Value::Object(params));
        }
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Insert a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// A single path parameter.
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.values
            .get(PATH_PARAMS_KEY)
            .and_then(|params| params.get(name))
            .and_then(Value::as_str)
    }

    /// All path parameters (empty when the template declares none).
    pub fn path_params(&self) -> HashMap<String, String> {
        self.values
            .get(PATH_PARAMS_KEY)
            .and_then(Value::as_object)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl From<Map<String, Value>> for Context {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}
