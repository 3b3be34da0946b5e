use std::{cell::RefCell, rc::Rc};

use rustc_hash::FxHashMap;

use crate::{
    interpreter::{Builtin, Callable, Environment, Value},
    types::Type,
};

/// Per-run context replacing what used to be ambient process-wide state: the
/// type-alias table the parser consults and the global scope frame every
/// routine call chains to. A REPL keeps one session alive across lines;
/// independent runs get independent sessions.
pub struct Session {
    aliases: Rc<RefCell<FxHashMap<String, Type>>>,
    globals: Rc<RefCell<Environment>>,
}

impl Session {
    pub fn new() -> Self {
        let globals = Environment::global();

        let clock = Callable::Builtin(Builtin {
            name: "clock",
            arity: 0,
            function: |_| {
                Value::Real(
                    std::time::SystemTime::now()
                        .duration_since(std::time::UNIX_EPOCH)
                        .expect("system clock is set before the Unix epoch")
                        .as_secs_f64(),
                )
            },
        });
        globals.borrow_mut().define(
            "clock",
            Value::Callable(Rc::new(clock)),
            Some(Type::Routine("clock".to_string())),
        );

        Self {
            aliases: Rc::new(RefCell::new(FxHashMap::default())),
            globals,
        }
    }

    pub fn alias(&self, name: &str) -> Option<Type> {
        self.aliases.borrow().get(name).cloned()
    }

    pub fn define_alias(&self, name: String, alias_of: Type) {
        self.aliases.borrow_mut().insert(name, alias_of);
    }

    pub fn aliases(&self) -> &Rc<RefCell<FxHashMap<String, Type>>> {
        &self.aliases
    }

    pub fn globals(&self) -> &Rc<RefCell<Environment>> {
        &self.globals
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
