use std::{cell::RefCell, collections::hash_map::Entry, rc::Rc};

use rustc_hash::FxHashMap;

use crate::types::Type;

use super::Value;

/// A binding's current value together with its declared (but unenforced)
/// type annotation.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub declared_type: Option<Type>,
}

/// One scope frame. Lookup and assignment walk strictly outward through the
/// enclosing chain; frames never see their children.
#[derive(Debug)]
pub struct Environment {
    bindings: FxHashMap<String, Binding>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn global() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bindings: FxHashMap::default(),
            enclosing: None,
        }))
    }

    pub fn nested(enclosing: &Rc<RefCell<Environment>>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            bindings: FxHashMap::default(),
            enclosing: Some(enclosing.clone()),
        }))
    }

    /// Declares a name in this frame. Fails when the frame already binds the
    /// name; shadowing an enclosing frame's binding is fine.
    pub fn define(&mut self, name: &str, value: Value, declared_type: Option<Type>) -> bool {
        match self.bindings.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Binding {
                    value,
                    declared_type,
                });
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(binding) = self.bindings.get(name) {
            return Some(binding.value.clone());
        }
        self.enclosing
            .as_ref()
            .and_then(|enclosing| enclosing.borrow().get(name))
    }

    /// Reassigns an existing binding, walking outward. Returns false when no
    /// frame in the chain declares the name.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if let Some(binding) = self.bindings.get_mut(name) {
            binding.value = value;
            return true;
        }
        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_redeclaration_in_same_frame_fails() {
        let global = Environment::global();
        assert!(global.borrow_mut().define("x", Value::Integer(1), None));
        assert!(!global.borrow_mut().define("x", Value::Integer(2), None));
        assert_eq!(global.borrow().get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_nested_frame_shadows() {
        let global = Environment::global();
        global.borrow_mut().define("x", Value::Integer(1), None);

        let inner = Environment::nested(&global);
        assert!(inner.borrow_mut().define("x", Value::Integer(2), None));
        assert_eq!(inner.borrow().get("x"), Some(Value::Integer(2)));
        assert_eq!(global.borrow().get("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn test_assignment_walks_outward() {
        let global = Environment::global();
        global.borrow_mut().define("x", Value::Integer(1), None);

        let inner = Environment::nested(&global);
        assert!(inner.borrow_mut().assign("x", Value::Integer(2)));
        assert_eq!(global.borrow().get("x"), Some(Value::Integer(2)));
    }

    #[test]
    fn test_assignment_to_undeclared_fails() {
        let global = Environment::global();
        assert!(!global.borrow_mut().assign("missing", Value::Nil));
    }
}
