use std::fmt::Display;

/// A resolved type annotation. Aliases are resolved away at parse time, so
/// what reaches the runtime is always one of these. Annotations document
/// intent only; nothing enforces them at runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Primitive(Primitive),
    Array(String),
    Routine(String),
    Record(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Integer,
    Real,
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Primitive(primitive) => write!(f, "{}", primitive),
            Type::Array(name) | Type::Routine(name) | Type::Record(name) => {
                write!(f, "{}", name)
            }
        }
    }
}

impl Display for Primitive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Primitive::Boolean => write!(f, "boolean"),
            Primitive::Integer => write!(f, "integer"),
            Primitive::Real => write!(f, "real"),
        }
    }
}
