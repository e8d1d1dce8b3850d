use crate::eval::value::Value;
use std::{
    cmp::Ordering,
    fmt::{self, Display},
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("Invalid operands for '{op}': {left} and {right}.")]
    InvalidOperands {
        op: BinaryOp,
        left: &'static str,
        right: &'static str,
    },
    #[error("Invalid operand for '{op}': {operand}.")]
    InvalidOperand { op: &'static str, operand: &'static str },
    #[error("Invalid operator for integers: {0}")]
    IntegerOperator(BinaryOp),
    #[error("Invalid operator for reals: {0}")]
    RealOperator(BinaryOp),
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Modulo by zero.")]
    ModuloByZero,
    #[error("Integer overflow.")]
    Overflow,
    #[error("Real overflow.")]
    RealOverflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Div,
    Mod,
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOp::Or => write!(f, "ou"),
            BinaryOp::And => write!(f, "et"),
            BinaryOp::Equal => write!(f, "="),
            BinaryOp::NotEqual => write!(f, "!="),
            BinaryOp::Less => write!(f, "<"),
            BinaryOp::Greater => write!(f, ">"),
            BinaryOp::LessEqual => write!(f, "<="),
            BinaryOp::GreaterEqual => write!(f, ">="),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Div => write!(f, "div"),
            BinaryOp::Mod => write!(f, "mod"),
        }
    }
}

impl BinaryOp {
    pub fn apply(self, left: Value, right: Value) -> Result<Value, OperatorError> {
        match self {
            BinaryOp::Or | BinaryOp::And => self.logical(&left, &right),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::Less
            | BinaryOp::Greater
            | BinaryOp::LessEqual
            | BinaryOp::GreaterEqual => self.compare(&left, &right).map(Value::Boolean),
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Div
            | BinaryOp::Mod => self.arithmetic(&left, &right),
        }
    }

    fn invalid_operands(self, left: &Value, right: &Value) -> OperatorError {
        OperatorError::InvalidOperands {
            op: self,
            left: left.type_name(),
            right: right.type_name(),
        }
    }

    fn logical(self, left: &Value, right: &Value) -> Result<Value, OperatorError> {
        match (self, left, right) {
            (BinaryOp::Or, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a || *b)),
            (BinaryOp::And, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a && *b)),
            _ => Err(self.invalid_operands(left, right)),
        }
    }

    fn compare(self, left: &Value, right: &Value) -> Result<bool, OperatorError> {
        let equality = matches!(self, BinaryOp::Equal | BinaryOp::NotEqual);

        let ordering = match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) if equality => Some(a.cmp(b)),
            _ => match (left.as_real(), right.as_real()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => return Err(self.invalid_operands(left, right)),
            },
        };

        // NaN compares unequal to everything.
        let ordering = match ordering {
            Some(ordering) => ordering,
            None => return Ok(self == BinaryOp::NotEqual),
        };

        Ok(match self {
            BinaryOp::Equal => ordering == Ordering::Equal,
            BinaryOp::NotEqual => ordering != Ordering::Equal,
            BinaryOp::Less => ordering == Ordering::Less,
            BinaryOp::Greater => ordering == Ordering::Greater,
            BinaryOp::LessEqual => ordering != Ordering::Greater,
            _ => ordering != Ordering::Less,
        })
    }

    fn arithmetic(self, left: &Value, right: &Value) -> Result<Value, OperatorError> {
        if let (Value::Integer(a), Value::Integer(b)) = (left, right) {
            return self.integer_arithmetic(*a, *b).map(Value::Integer);
        }

        match (left.as_real(), right.as_real()) {
            (Some(a), Some(b)) => self.real_arithmetic(a, b).map(Value::Real),
            _ => Err(self.invalid_operands(left, right)),
        }
    }

    fn integer_arithmetic(self, a: i64, b: i64) -> Result<i64, OperatorError> {
        let result = match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Subtract => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
            BinaryOp::Div if b == 0 => return Err(OperatorError::DivisionByZero),
            BinaryOp::Div => a.checked_div(b),
            BinaryOp::Mod if b == 0 => return Err(OperatorError::ModuloByZero),
            BinaryOp::Mod => a.checked_rem(b),
            _ => return Err(OperatorError::IntegerOperator(self)),
        };

        result.ok_or(OperatorError::Overflow)
    }

    fn real_arithmetic(self, a: f64, b: f64) -> Result<f64, OperatorError> {
        let result = match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide if b == 0.0 => return Err(OperatorError::DivisionByZero),
            BinaryOp::Divide => a / b,
            _ => return Err(OperatorError::RealOperator(self)),
        };

        if result.is_finite() {
            Ok(result)
        } else {
            Err(OperatorError::RealOverflow)
        }
    }
}

pub fn negate(operand: Value) -> Result<Value, OperatorError> {
    match operand {
        Value::Integer(i) => i.checked_neg().map(Value::Integer).ok_or(OperatorError::Overflow),
        Value::Real(r) => Ok(Value::Real(-r)),
        other => Err(OperatorError::InvalidOperand {
            op: "-",
            operand: other.type_name(),
        }),
    }
}

pub fn not(operand: Value) -> Result<Value, OperatorError> {
    match operand {
        Value::Boolean(b) => Ok(Value::Boolean(!b)),
        other => Err(OperatorError::InvalidOperand {
            op: "non",
            operand: other.type_name(),
        }),
    }
}
