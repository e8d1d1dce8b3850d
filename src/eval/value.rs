use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "entier",
            Value::Real(_) => "reel",
            Value::Boolean(_) => "bool",
            Value::Text(_) => "chaine",
        }
    }

    /// Numeric view of the value, widening integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) if r.fract() == 0.0 => write!(f, "{:.1}", r),
            Value::Real(r) => write!(f, "{}", r),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}
