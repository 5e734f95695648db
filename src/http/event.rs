//! Inbound event model and normalization.
//!
//! # Responsibilities
//! - Accept the ALB event shape as-is (single- or multi-valued headers/query)
//! - Derive host and origin from headers
//! - Parse the body into a structured payload when possible
//!
//! # Design Decisions
//! - Header names are matched case-insensitively; the first value wins
//! - When both header shapes are present the multi-valued one is used
//! - Normalization never mutates the inbound event; it wraps it

use std::collections::HashMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EventError;

/// Raw event as delivered by the load balancer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEvent {
    pub http_method: String,

    pub path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string_parameters: Option<HashMap<String, String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value_query_string_parameters: Option<HashMap<String, Vec<String>>>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl InboundEvent {
    /// Minimal event with the given method and path and no headers.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Returns true if headers arrived in the multi-valued shape.
    pub fn is_multi_value(&self) -> bool {
        self.multi_value_headers.is_some()
    }

    /// First value of a request header.
    pub fn header(&self, name: &str) -> Option<&str> {
        if let Some(headers) = &self.multi_value_headers {
            return lookup(headers, name).and_then(|values| values.first()).map(String::as_str);
        }
        self.headers
            .as_ref()
            .and_then(|headers| lookup(headers, name))
            .map(String::as_str)
    }

    /// First value of a query-string parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        if let Some(params) = &self.multi_value_query_string_parameters {
            return params.get(name).and_then(|values| values.first()).map(String::as_str);
        }
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(name))
            .map(String::as_str)
    }

    /// Query-string parameter with a fallback.
    pub fn query_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.query(name).unwrap_or(default)
    }

    /// All header values in multi-valued form, regardless of the inbound shape.
    pub fn multi_value_header_map(&self) -> HashMap<String, Vec<String>> {
        match (&self.multi_value_headers, &self.headers) {
            (Some(multi), _) => multi.clone(),
            (None, Some(single)) => single
                .iter()
                .map(|(k, v)| (k.clone(), vec![v.clone()]))
                .collect(),
            (None, None) => HashMap::new(),
        }
    }

    /// Builder-style header insertion (multi-valued shape).
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.multi_value_headers
            .get_or_insert_with(HashMap::new)
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

fn lookup<'a, V>(map: &'a HashMap<String, V>, name: &str) -> Option<&'a V> {
    map.get(name).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

/// Event enriched with derived fields; this is what handlers see.
#[derive(Debug, Clone)]
pub struct Event {
    inbound: InboundEvent,
    method: Method,
    host: Option<String>,
    origin: Option<String>,
    payload: Option<Value>,
}

impl Event {
    /// Derive host, origin and payload from an inbound event.
    pub fn normalize(inbound: InboundEvent) -> Result<Self, EventError> {
        let method = Method::from_bytes(inbound.http_method.as_bytes())
            .map_err(|_| EventError::InvalidMethod {
                method: inbound.http_method.clone(),
                path: inbound.path.clone(),
            })?;
        let host = inbound.header("host").map(str::to_owned);
        let origin = inbound.header("origin").map(str::to_owned);
        let payload = parse_payload(inbound.body.as_deref());

        Ok(Self {
            inbound,
            method,
            host,
            origin,
            payload,
        })
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.inbound.path
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref()
    }

    /// Body parsed as JSON, or the raw string when it is not JSON.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inbound.header(name)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.inbound.query(name)
    }

    pub fn inbound(&self) -> &InboundEvent {
        &self.inbound
    }
}

fn parse_payload(body: Option<&str>) -> Option<Value> {
    let Some(body) = body else {
        tracing::debug!("No event body found");
        return None;
    };

    match serde_json::from_str(body) {
        Ok(value) => Some(value),
        Err(_) => Some(Value::String(body.to_owned())),
    }
}
