use std::fmt::Display;

use crate::types::Type;

#[derive(Debug)]
pub struct Program(pub Vec<Stmt>);

#[derive(Debug, Clone)]
pub enum Stmt {
    Array {
        name: String,
        line: usize,
        members: Vec<Expr>,
    },
    Block(Vec<Stmt>),
    Expression(Expr),
    Routine(RoutineDecl),
    For {
        name: String,
        line: usize,
        reverse: bool,
        range: Range,
        body: Box<Stmt>,
    },
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    Print(Expr),
    Record(RecordDecl),
    Return {
        line: usize,
        value: Option<Expr>,
    },
    TypeAlias {
        name: String,
        alias_of: Type,
    },
    Var(VarDecl),
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

/// Loop bounds of a `for` statement; both ends are evaluated once at entry.
#[derive(Debug, Clone)]
pub struct Range {
    pub from: Expr,
    pub to: Expr,
}

#[derive(Debug, Clone)]
pub struct RoutineDecl {
    pub name: String,
    pub line: usize,
    pub params: Vec<Param>,
    pub return_type: Option<Type>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub param_type: Option<Type>,
}

#[derive(Debug, Clone)]
pub struct RecordDecl {
    pub name: String,
    pub line: usize,
    pub fields: Vec<VarDecl>,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub name: String,
    pub line: usize,
    pub var_type: Option<Type>,
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone)]
pub enum Expr {
    Assign {
        name: String,
        line: usize,
        value: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        line: usize,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        line: usize,
        arguments: Vec<Expr>,
    },
    Get {
        object: Box<Expr>,
        name: String,
        line: usize,
    },
    GetIndex {
        array: Box<Expr>,
        /// 1-based, fixed at parse time.
        index: usize,
        line: usize,
    },
    Grouping(Box<Expr>),
    Literal(Literal),
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        line: usize,
        right: Box<Expr>,
    },
    Variable {
        name: String,
        line: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Boolean(bool),
    Integer(i32),
    Real(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    Or,
    And,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.0 {
            writeln!(f, "{}", statement)?;
        }
        Ok(())
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stmt::Array { name, members, .. } => {
                write!(f, "array {} [", name)?;
                for (i, member) in members.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", member)?;
                }
                write!(f, "];")
            }
            Stmt::Block(statements) => {
                writeln!(f, "loop")?;
                for statement in statements {
                    writeln!(f, "{}", statement)?;
                }
                write!(f, "end")
            }
            Stmt::Expression(expr) => write!(f, "{};", expr),
            Stmt::Routine(decl) => {
                write!(f, "routine {}(", decl.name)?;
                for (i, param) in decl.params.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param.name)?;
                    if let Some(param_type) = &param.param_type {
                        write!(f, " : {}", param_type)?;
                    }
                }
                write!(f, ")")?;
                if let Some(return_type) = &decl.return_type {
                    write!(f, " : {}", return_type)?;
                }
                writeln!(f, " is")?;
                for statement in &decl.body {
                    writeln!(f, "{}", statement)?;
                }
                write!(f, "end")
            }
            Stmt::For {
                name,
                reverse,
                range,
                body,
                ..
            } => {
                write!(f, "for {} in ", name)?;
                if *reverse {
                    write!(f, "reverse ")?;
                }
                write!(f, "{}..{} {}", range.from, range.to, body)
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                write!(f, "if {} then {}", condition, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else {}", else_branch)?;
                }
                write!(f, " end")
            }
            Stmt::Print(expr) => write!(f, "print {};", expr),
            Stmt::Record(decl) => {
                writeln!(f, "record {} {{", decl.name)?;
                for field in &decl.fields {
                    writeln!(f, "{}", Stmt::Var(field.clone()))?;
                }
                write!(f, "}} end")
            }
            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    write!(f, "return {};", value)
                } else {
                    write!(f, "return;")
                }
            }
            Stmt::TypeAlias { name, alias_of } => write!(f, "type {} is {};", name, alias_of),
            Stmt::Var(decl) => {
                write!(f, "var {}", decl.name)?;
                if let Some(var_type) = &decl.var_type {
                    write!(f, " : {}", var_type)?;
                }
                if let Some(initializer) = &decl.initializer {
                    write!(f, " is {}", initializer)?;
                }
                write!(f, ";")
            }
            Stmt::While { condition, body } => write!(f, "while {} {}", condition, body),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Assign { name, value, .. } => write!(f, "{} := {}", name, value),
            Expr::Binary {
                left, op, right, ..
            } => write!(f, "({} {} {})", op, left, right),
            Expr::Call {
                callee, arguments, ..
            } => {
                write!(f, "{}(", callee)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ")")
            }
            Expr::Get { object, name, .. } => write!(f, "{}.{}", object, name),
            Expr::GetIndex { array, index, .. } => write!(f, "{}[{}]", array, index),
            Expr::Grouping(expr) => write!(f, "({})", expr),
            Expr::Literal(literal) => write!(f, "{}", literal),
            Expr::Logical { left, op, right } => write!(f, "({} {} {})", op, left, right),
            Expr::Unary { op, right, .. } => write!(f, "({} {})", op, right),
            Expr::Variable { name, .. } => write!(f, "{}", name),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Boolean(b) => write!(f, "{}", b),
            Literal::Integer(n) => write!(f, "{}", n),
            Literal::Real(n) => write!(f, "{}", n),
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOp::Equal => write!(f, "="),
            BinaryOp::NotEqual => write!(f, "/="),
            BinaryOp::Greater => write!(f, ">"),
            BinaryOp::GreaterEqual => write!(f, ">="),
            BinaryOp::Less => write!(f, "<"),
            BinaryOp::LessEqual => write!(f, "<="),
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Subtract => write!(f, "-"),
            BinaryOp::Multiply => write!(f, "*"),
            BinaryOp::Divide => write!(f, "/"),
            BinaryOp::Modulo => write!(f, "%"),
        }
    }
}

impl Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::Or => write!(f, "or"),
            LogicalOp::And => write!(f, "and"),
            LogicalOp::Xor => write!(f, "xor"),
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "not"),
            UnaryOp::Negate => write!(f, "-"),
        }
    }
}
