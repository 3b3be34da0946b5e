pub mod callable;
pub mod environment;
pub mod record;

use std::{cell::RefCell, fmt::Display, io::Write, rc::Rc};

use rustc_hash::FxHashMap;

use crate::{
    ast::{BinaryOp, Expr, Literal, LogicalOp, Program, Stmt, UnaryOp},
    session::Session,
    types::{Primitive, Type},
};

pub use self::{
    callable::{Builtin, Callable},
    environment::{Binding, Environment},
    record::RecordInstance,
};

/// The closed runtime value domain.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Integer(i32),
    Real(f64),
    Callable(Rc<Callable>),
    Instance(Rc<RecordInstance>),
    Array(Rc<Vec<Value>>),
}

impl Value {
    /// Nil is false, booleans are themselves, everything else (including 0)
    /// is true.
    fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            _ => true,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "<null>"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Real(n) => write!(f, "{}", n),
            Value::Callable(callable) => write!(f, "{}", callable),
            Value::Instance(instance) => write!(f, "{}", instance.name),
            Value::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i != 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Operands must be numbers.\n[line {line}]")]
    NonNumericOperands { line: usize },
    #[error("Operand must be a number.\n[line {line}]")]
    NonNumericOperand { line: usize },
    #[error("Division by zero.\n[line {line}]")]
    DivisionByZero { line: usize },
    #[error("Undefined variable '{name}'.\n[line {line}]")]
    UndefinedVariable { name: String, line: usize },
    #[error("Variable '{name}' is already declared in this scope.\n[line {line}]")]
    AlreadyDeclared { name: String, line: usize },
    #[error("Can only call routines.\n[line {line}]")]
    NotCallable { line: usize },
    #[error("Expected {expected} arguments but got {got}.\n[line {line}]")]
    Arity {
        expected: usize,
        got: usize,
        line: usize,
    },
    #[error("Only records have properties.\n[line {line}]")]
    NotARecord { line: usize },
    #[error("Undefined property '{name}'.\n[line {line}]")]
    UndefinedProperty { name: String, line: usize },
    #[error("Only arrays can be indexed.\n[line {line}]")]
    NotAnArray { line: usize },
    #[error("Index {index} is out of bounds for array of length {length}.\n[line {line}]")]
    IndexOutOfBounds {
        index: usize,
        length: usize,
        line: usize,
    },
    #[error("Range bounds must be integers.\n[line {line}]")]
    NonIntegerRangeBounds { line: usize },
    #[error("Cannot return from top-level code.\n[line {line}]")]
    TopLevelReturn { line: usize },
}

/// A `return` in flight, threaded up through statement execution to the
/// nearest call boundary instead of unwinding.
#[derive(Debug)]
struct ReturnSignal {
    value: Value,
    line: usize,
}

/// Tree-walking evaluator. One environment pointer tracks the current scope;
/// `execute` threads an optional return signal back up to the nearest call
/// boundary.
pub struct Interpreter {
    environment: Rc<RefCell<Environment>>,
    globals: Rc<RefCell<Environment>>,
    aliases: Rc<RefCell<FxHashMap<String, Type>>>,
    stdout: Rc<RefCell<dyn std::io::Write>>,
}

impl Interpreter {
    pub fn new(session: &Session, stdout: Rc<RefCell<dyn std::io::Write>>) -> Self {
        Self {
            environment: session.globals().clone(),
            globals: session.globals().clone(),
            aliases: session.aliases().clone(),
            stdout,
        }
    }

    /// Runs a program to completion. The first runtime error aborts the
    /// remaining statements.
    pub fn interpret(&mut self, program: &Program) -> Result<(), RuntimeError> {
        for statement in &program.0 {
            if let Some(signal) = self.execute(statement)? {
                return Err(RuntimeError::TopLevelReturn { line: signal.line });
            }
        }
        Ok(())
    }

    fn globals(&self) -> &Rc<RefCell<Environment>> {
        &self.globals
    }

    fn execute(&mut self, statement: &Stmt) -> Result<Option<ReturnSignal>, RuntimeError> {
        let result = match statement {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                None
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.stdout.borrow_mut(), "{}", value)?;
                None
            }
            Stmt::Var(decl) => {
                let value = match &decl.initializer {
                    Some(initializer) => self.evaluate(initializer)?,
                    None => Value::Nil,
                };
                self.define(&decl.name, decl.line, value, decl.var_type.clone())?;
                None
            }
            Stmt::Array {
                name,
                line,
                members,
            } => {
                let values = members
                    .iter()
                    .map(|member| self.evaluate(member))
                    .collect::<Result<Vec<_>, _>>()?;
                self.define(
                    name,
                    *line,
                    Value::Array(Rc::new(values)),
                    Some(Type::Array(name.clone())),
                )?;
                None
            }
            Stmt::Block(statements) => {
                let scope = Environment::nested(&self.environment);
                self.execute_in_scope(scope, |interpreter| {
                    for statement in statements {
                        let result = interpreter.execute(statement)?;
                        if result.is_some() {
                            return Ok(result);
                        }
                    }
                    Ok(None)
                })?
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?
                } else {
                    None
                }
            }
            Stmt::While { condition, body } => {
                let mut result = None;
                while self.evaluate(condition)?.is_truthy() {
                    result = self.execute(body)?;
                    if result.is_some() {
                        break;
                    }
                }
                result
            }
            Stmt::For {
                name,
                line,
                reverse,
                range,
                body,
            } => {
                // Bounds are evaluated once, at entry.
                let from = self.evaluate(&range.from)?;
                let to = self.evaluate(&range.to)?;
                let (Value::Integer(mut current), Value::Integer(to)) = (from, to) else {
                    return Err(RuntimeError::NonIntegerRangeBounds { line: *line });
                };

                let scope = Environment::nested(&self.environment);
                self.execute_in_scope(scope, |interpreter| {
                    interpreter.define(
                        name,
                        *line,
                        Value::Integer(current),
                        Some(Type::Primitive(Primitive::Integer)),
                    )?;

                    // Upper bound exclusive in both directions.
                    while if *reverse { current > to } else { current < to } {
                        let result = interpreter.execute(body)?;
                        if result.is_some() {
                            return Ok(result);
                        }
                        current = if *reverse { current - 1 } else { current + 1 };
                        interpreter.assign(name, *line, Value::Integer(current))?;
                    }
                    Ok(None)
                })?
            }
            Stmt::Routine(decl) => {
                let callable = Callable::Routine(Rc::new(decl.clone()));
                self.define(
                    &decl.name,
                    decl.line,
                    Value::Callable(Rc::new(callable)),
                    Some(Type::Routine(decl.name.clone())),
                )?;
                None
            }
            Stmt::Record(decl) => {
                // Field initializers run here, once; the constructor returns
                // this same instance on every call.
                let mut fields = FxHashMap::default();
                for field in &decl.fields {
                    let value = match &field.initializer {
                        Some(initializer) => self.evaluate(initializer)?,
                        None => Value::Nil,
                    };
                    fields.insert(field.name.clone(), value);
                }
                let instance = Rc::new(RecordInstance::new(decl.name.clone(), fields));
                self.define(
                    &decl.name,
                    decl.line,
                    Value::Callable(Rc::new(Callable::Record(instance))),
                    Some(Type::Record(decl.name.clone())),
                )?;
                None
            }
            Stmt::Return { line, value } => {
                let value = match value {
                    Some(value) => self.evaluate(value)?,
                    None => Value::Nil,
                };
                Some(ReturnSignal { value, line: *line })
            }
            Stmt::TypeAlias { name, alias_of } => {
                self.aliases
                    .borrow_mut()
                    .insert(name.clone(), alias_of.clone());
                None
            }
        };

        Ok(result)
    }

    /// Swaps in `scope`, runs `f`, and restores the previous scope on every
    /// exit path.
    fn execute_in_scope<T>(
        &mut self,
        scope: Rc<RefCell<Environment>>,
        f: impl FnOnce(&mut Self) -> Result<T, RuntimeError>,
    ) -> Result<T, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, scope);
        let result = f(self);
        self.environment = previous;
        result
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                Literal::Boolean(b) => Value::Boolean(*b),
                Literal::Integer(n) => Value::Integer(*n),
                Literal::Real(n) => Value::Real(*n),
            }),
            Expr::Grouping(inner) => self.evaluate(inner),
            Expr::Variable { name, line } => {
                self.environment
                    .borrow()
                    .get(name)
                    .ok_or_else(|| RuntimeError::UndefinedVariable {
                        name: name.clone(),
                        line: *line,
                    })
            }
            Expr::Assign { name, line, value } => {
                let value = self.evaluate(value)?;
                self.assign(name, *line, value)?;
                Ok(Value::Nil)
            }
            Expr::Logical { left, op, right } => {
                let left = self.evaluate(left)?;
                match op {
                    LogicalOp::Or => {
                        if left.is_truthy() {
                            return Ok(left);
                        }
                    }
                    LogicalOp::And => {
                        if !left.is_truthy() {
                            return Ok(left);
                        }
                    }
                    LogicalOp::Xor => {
                        // xor never short-circuits.
                        let right = self.evaluate(right)?;
                        return Ok(Value::Boolean(left.is_truthy() ^ right.is_truthy()));
                    }
                }
                self.evaluate(right)
            }
            Expr::Binary {
                left,
                op,
                line,
                right,
            } => {
                let left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match op {
                    BinaryOp::Equal => Ok(Value::Boolean(left == right)),
                    BinaryOp::NotEqual => Ok(Value::Boolean(left != right)),
                    _ => numeric_binary(*op, left, right, *line),
                }
            }
            Expr::Unary { op, line, right } => {
                let right = self.evaluate(right)?;
                match op {
                    UnaryOp::Not => Ok(Value::Boolean(!right.is_truthy())),
                    UnaryOp::Negate => match right {
                        Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                        Value::Real(n) => Ok(Value::Real(-n)),
                        _ => Err(RuntimeError::NonNumericOperand { line: *line }),
                    },
                }
            }
            Expr::Call {
                callee,
                line,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                // Arguments are evaluated left to right before dispatch.
                let arguments = arguments
                    .iter()
                    .map(|argument| self.evaluate(argument))
                    .collect::<Result<Vec<_>, _>>()?;

                let Value::Callable(callable) = callee else {
                    return Err(RuntimeError::NotCallable { line: *line });
                };

                if arguments.len() != callable.arity() {
                    return Err(RuntimeError::Arity {
                        expected: callable.arity(),
                        got: arguments.len(),
                        line: *line,
                    });
                }

                callable.call(self, &arguments)
            }
            Expr::Get { object, name, line } => match self.evaluate(object)? {
                Value::Instance(instance) => instance.field(name).cloned().ok_or_else(|| {
                    RuntimeError::UndefinedProperty {
                        name: name.clone(),
                        line: *line,
                    }
                }),
                _ => Err(RuntimeError::NotARecord { line: *line }),
            },
            Expr::GetIndex { array, index, line } => match self.evaluate(array)? {
                Value::Array(values) => {
                    // Indices are 1-based.
                    if *index == 0 || *index > values.len() {
                        return Err(RuntimeError::IndexOutOfBounds {
                            index: *index,
                            length: values.len(),
                            line: *line,
                        });
                    }
                    Ok(values[*index - 1].clone())
                }
                _ => Err(RuntimeError::NotAnArray { line: *line }),
            },
        }
    }

    fn define(
        &mut self,
        name: &str,
        line: usize,
        value: Value,
        declared_type: Option<Type>,
    ) -> Result<(), RuntimeError> {
        if self.environment.borrow_mut().define(name, value, declared_type) {
            Ok(())
        } else {
            Err(RuntimeError::AlreadyDeclared {
                name: name.to_string(),
                line,
            })
        }
    }

    fn assign(&mut self, name: &str, line: usize, value: Value) -> Result<(), RuntimeError> {
        if self.environment.borrow_mut().assign(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                line,
            })
        }
    }
}

/// Arithmetic and relational operators share one promotion rule: two
/// integers stay in integer arithmetic, any real operand promotes the other
/// side to real.
fn numeric_binary(op: BinaryOp, left: Value, right: Value, line: usize) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => integer_op(op, a, b, line),
        (Value::Integer(a), Value::Real(b)) => Ok(real_op(op, a as f64, b)),
        (Value::Real(a), Value::Integer(b)) => Ok(real_op(op, a, b as f64)),
        (Value::Real(a), Value::Real(b)) => Ok(real_op(op, a, b)),
        _ => Err(RuntimeError::NonNumericOperands { line }),
    }
}

fn integer_op(op: BinaryOp, a: i32, b: i32, line: usize) -> Result<Value, RuntimeError> {
    let value = match op {
        BinaryOp::Add => Value::Integer(a.wrapping_add(b)),
        BinaryOp::Subtract => Value::Integer(a.wrapping_sub(b)),
        BinaryOp::Multiply => Value::Integer(a.wrapping_mul(b)),
        BinaryOp::Divide => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Value::Integer(a.wrapping_div(b))
        }
        BinaryOp::Modulo => {
            if b == 0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Value::Integer(a.wrapping_rem(b))
        }
        BinaryOp::Greater => Value::Boolean(a > b),
        BinaryOp::GreaterEqual => Value::Boolean(a >= b),
        BinaryOp::Less => Value::Boolean(a < b),
        BinaryOp::LessEqual => Value::Boolean(a <= b),
        // Equality is handled structurally before numeric dispatch.
        BinaryOp::Equal | BinaryOp::NotEqual => unreachable!(),
    };
    Ok(value)
}

fn real_op(op: BinaryOp, a: f64, b: f64) -> Value {
    match op {
        BinaryOp::Add => Value::Real(a + b),
        BinaryOp::Subtract => Value::Real(a - b),
        BinaryOp::Multiply => Value::Real(a * b),
        BinaryOp::Divide => Value::Real(a / b),
        BinaryOp::Modulo => Value::Real(a % b),
        BinaryOp::Greater => Value::Boolean(a > b),
        BinaryOp::GreaterEqual => Value::Boolean(a >= b),
        BinaryOp::Less => Value::Boolean(a < b),
        BinaryOp::LessEqual => Value::Boolean(a <= b),
        BinaryOp::Equal | BinaryOp::NotEqual => unreachable!(),
    }
}
