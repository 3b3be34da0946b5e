use std::{fmt::Display, rc::Rc};

use crate::ast::RoutineDecl;

use super::{environment::Environment, record::RecordInstance, Interpreter, RuntimeError, Value};

#[derive(Clone)]
pub enum Callable {
    Routine(Rc<RoutineDecl>),
    /// A record declaration's constructor; every call yields the same
    /// pre-built instance.
    Record(Rc<RecordInstance>),
    Builtin(Builtin),
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub function: fn(&[Value]) -> Value,
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Routine(decl) => decl.params.len(),
            Callable::Record(_) => 0,
            Callable::Builtin(builtin) => builtin.arity,
        }
    }

    /// Dispatches a call whose arguments are already evaluated and whose
    /// count matches the arity. A routine body runs in a fresh frame chained
    /// to the global frame, not the declaration site: routines do not
    /// capture their lexical scope.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: &[Value],
    ) -> Result<Value, RuntimeError> {
        match self {
            Callable::Routine(decl) => {
                let scope = Environment::nested(interpreter.globals());
                interpreter.execute_in_scope(scope, |interpreter| {
                    for (param, argument) in decl.params.iter().zip(arguments) {
                        interpreter.define(
                            &param.name,
                            decl.line,
                            argument.clone(),
                            param.param_type.clone(),
                        )?;
                    }

                    for statement in &decl.body {
                        if let Some(signal) = interpreter.execute(statement)? {
                            return Ok(signal.value);
                        }
                    }
                    Ok(Value::Nil)
                })
            }
            Callable::Record(instance) => Ok(Value::Instance(instance.clone())),
            Callable::Builtin(builtin) => Ok((builtin.function)(arguments)),
        }
    }
}

impl Display for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Routine(decl) => write!(f, "<routine {}>", decl.name),
            Callable::Record(instance) => write!(f, "{}", instance.name),
            Callable::Builtin(_) => write!(f, "<native routine>"),
        }
    }
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Routine(decl) => f.debug_tuple("Routine").field(&decl.name).finish(),
            Callable::Record(instance) => f.debug_tuple("Record").field(&instance.name).finish(),
            Callable::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.name).finish(),
        }
    }
}
