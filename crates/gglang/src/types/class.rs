//! Classes, instances, and `super` resolution.

use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    exception::{ExcType, RunResult},
    function::Function,
    value::Value,
};

/// A declared class: its name, optional superclass, and method table.
///
/// The method table is built once from the class body and never mutated
/// afterwards. Methods close over the environment in effect at declaration,
/// so they can reach sibling top-level names at call time.
#[derive(Debug)]
pub(crate) struct Class {
    name: String,
    superclass: Option<Rc<Class>>,
    methods: IndexMap<String, Rc<Function>>,
}

impl Class {
    pub fn new(
        name: String,
        superclass: Option<Rc<Class>>,
        methods: IndexMap<String, Rc<Function>>,
    ) -> Self {
        Self {
            name,
            superclass,
            methods,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn superclass(&self) -> Option<&Rc<Class>> {
        self.superclass.as_ref()
    }

    /// Resolves a method on this class or the nearest ancestor defining it.
    pub fn find_method(&self, name: &str) -> Option<Rc<Function>> {
        if let Some(method) = self.methods.get(name) {
            return Some(Rc::clone(method));
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }
}

/// An object: a reference to its class plus a mutable field table.
#[derive(Debug)]
pub(crate) struct Instance {
    class: Rc<Class>,
    fields: RefCell<IndexMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(IndexMap::new()),
        }
    }

    pub fn class(&self) -> &Rc<Class> {
        &self.class
    }

    /// Property lookup: fields shadow methods; methods come back bound to
    /// the instance.
    pub fn get(self_rc: &Rc<Self>, name: &str) -> RunResult<Value> {
        if let Some(value) = self_rc.fields.borrow().get(name) {
            return Ok(value.clone());
        }
        if let Some(method) = self_rc.class.find_method(name) {
            return Ok(Value::Function(Rc::new(method.bind(self_rc))));
        }
        Err(ExcType::NameError.msg(format!("Undefined property '{name}'.")))
    }

    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.fields.borrow_mut().insert(name.into(), value);
    }
}

/// Pairs an instance with an ancestor class so `super.m()` resolves methods
/// starting above the instance's own class.
#[derive(Debug)]
pub(crate) struct SuperBinding {
    instance: Rc<Instance>,
    superclass: Rc<Class>,
}

impl SuperBinding {
    pub fn new(instance: Rc<Instance>, superclass: Rc<Class>) -> Self {
        Self {
            instance,
            superclass,
        }
    }

    pub fn superclass(&self) -> &Rc<Class> {
        &self.superclass
    }

    /// Resolves a method on the ancestor chain and binds it to the instance.
    pub fn get(&self, name: &str) -> RunResult<Value> {
        match self.superclass.find_method(name) {
            Some(method) => Ok(Value::Function(Rc::new(method.bind(&self.instance)))),
            None => Err(ExcType::NameError.msg(format!("Undefined method '{name}' on super."))),
        }
    }
}
