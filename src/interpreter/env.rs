use std::fmt;

use tracing::{debug, trace};

use crate::interpreter::builtin::BUILTINS;
use crate::interpreter::error::RuntimeError;
use crate::interpreter::value::Value;

/// The single, flat symbol table of a session.
///
/// Bindings keep their insertion order. Every binding owns its value outright: `put` takes the value by move and
/// `get` hands back a copy, so nothing outside the table can alias a stored value.
#[derive(PartialEq, Clone, Default)]
pub struct Env {
    bindings: Vec<(String, Value)>,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "<Env {} binding(s)>", self.bindings.len()) }
}

impl Env {
    pub fn new() -> Env { Env { bindings: Vec::new() } }

    /// An environment holding every builtin under each of its names.
    pub fn with_builtins() -> Env {
        let mut env = Env::new();
        for (name, builtin) in BUILTINS.entries() {
            env.put(name.to_string(), Value::Function(*builtin));
        }
        debug!("bootstrap / {} builtin(s) registered", env.len());
        env
    }

    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        trace!("get / {}", name);
        self.bindings
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| RuntimeError::UnboundSymbol { name: name.to_string() })
    }

    // Redefinition silently replaces the old value in place.
    pub fn put(&mut self, name: String, value: Value) {
        match self.bindings.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.bindings.push((name, value)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> { self.bindings.iter().map(|(name, _)| name.as_str()) }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> { self.bindings.iter().map(|(name, value)| (name.as_str(), value)) }

    pub fn len(&self) -> usize { self.bindings.len() }

    pub fn is_empty(&self) -> bool { self.bindings.is_empty() }
}
