use crate::{eval::value::Value, lexer::token::TokenType};
use std::{
    collections::HashMap,
    fmt::{self, Display},
};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Entier,
    Reel,
    Chaine,
    Char,
    Bool,
}

impl VarType {
    pub fn from_token(token_type: TokenType) -> Option<Self> {
        match token_type {
            TokenType::Entier => Some(VarType::Entier),
            TokenType::Reel => Some(VarType::Reel),
            TokenType::Chaine => Some(VarType::Chaine),
            TokenType::Char => Some(VarType::Char),
            TokenType::Bool => Some(VarType::Bool),
            _ => None,
        }
    }

    /// Converts `value` into something this type can hold, widening integers
    /// for `reel`. `None` when the value does not fit the type.
    pub fn coerce(self, value: Value) -> Option<Value> {
        match (self, value) {
            (VarType::Entier, value @ Value::Integer(_)) => Some(value),
            (VarType::Reel, Value::Integer(i)) => Some(Value::Real(i as f64)),
            (VarType::Reel, value @ Value::Real(_)) => Some(value),
            (VarType::Chaine, value @ Value::Text(_)) => Some(value),
            (VarType::Char, Value::Text(s)) if s.chars().count() == 1 => Some(Value::Text(s)),
            (VarType::Bool, value @ Value::Boolean(_)) => Some(value),
            _ => None,
        }
    }
}

impl Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarType::Entier => write!(f, "entier"),
            VarType::Reel => write!(f, "reel"),
            VarType::Chaine => write!(f, "chaine"),
            VarType::Char => write!(f, "char"),
            VarType::Bool => write!(f, "bool"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    #[error("Undefined variable: {0}")]
    Undefined(String),
    #[error("Variable used before assignment: {0}")]
    Unassigned(String),
    #[error("Type mismatch: cannot assign {found} to {declared} variable {name}.")]
    TypeMismatch {
        name: String,
        declared: VarType,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub var_type: VarType,
    pub value: Option<Value>,
}

/// The program's single, flat variable table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    store: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn declare(&mut self, name: &str, var_type: VarType) {
        self.store.insert(
            name.to_string(),
            Binding {
                var_type,
                value: None,
            },
        );
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.store.get(name)
    }

    pub fn get(&self, name: &str) -> Result<&Value, BindingError> {
        match self.store.get(name) {
            Some(Binding {
                value: Some(value), ..
            }) => Ok(value),
            Some(_) => Err(BindingError::Unassigned(name.to_string())),
            None => Err(BindingError::Undefined(name.to_string())),
        }
    }

    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), BindingError> {
        let binding = self
            .store
            .get_mut(name)
            .ok_or_else(|| BindingError::Undefined(name.to_string()))?;

        let found = value.type_name();
        let value = binding
            .var_type
            .coerce(value)
            .ok_or_else(|| BindingError::TypeMismatch {
                name: name.to_string(),
                declared: binding.var_type,
                found,
            })?;

        binding.value = Some(value);
        Ok(())
    }
}
