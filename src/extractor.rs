//! Tolerant typed reads over a signal's heterogeneous JSON payload.
//!
//! Rules must read payload fields through this type rather than matching on
//! `serde_json::Value` themselves — it is the single place type coercion lives.

use serde_json::Value;

use crate::model::JsonMap;

pub struct PayloadExtractor<'a> {
    payload: &'a JsonMap,
}

impl<'a> PayloadExtractor<'a> {
    pub fn new(payload: &'a JsonMap) -> Self {
        Self { payload }
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn get_double(&self, key: &str, default: f64) -> f64 {
        self.try_double(key).unwrap_or(default)
    }

    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.try_int(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.try_bool(key).unwrap_or(default)
    }

    fn try_double(&self, key: &str) -> Option<f64> {
        match self.payload.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    fn try_int(&self, key: &str) -> Option<i64> {
        match self.payload.get(key)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f.round() as i64)),
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().map(|f| f.round() as i64)),
            _ => None,
        }
    }

    fn try_bool(&self, key: &str) -> Option<bool> {
        match self.payload.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|f| f != 0.0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}
