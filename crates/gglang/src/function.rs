//! User-defined functions and method binding.

use std::rc::Rc;

use crate::{
    ast::FuncDecl,
    env::Env,
    types::{Instance, SuperBinding},
    value::Value,
};

/// A user-defined function: its declaration plus the environment captured at
/// declaration time.
///
/// A bound method is the same thing with one extra closure frame defining
/// `this` (and `super` when the receiver's class has a superclass), so method
/// values need no separate representation.
#[derive(Debug)]
pub(crate) struct Function {
    decl: Rc<FuncDecl>,
    closure: Env,
}

impl Function {
    pub fn new(decl: Rc<FuncDecl>, closure: Env) -> Self {
        Self { decl, closure }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn decl(&self) -> &FuncDecl {
        &self.decl
    }

    pub fn closure(&self) -> &Env {
        &self.closure
    }

    /// Binds this function to an instance, producing a method value whose
    /// body sees `this` and, when an ancestor exists, `super`.
    pub fn bind(&self, instance: &Rc<Instance>) -> Self {
        let env = self.closure.child();
        env.define("this", Value::Instance(Rc::clone(instance)));
        if let Some(superclass) = instance.class().superclass() {
            let binding = SuperBinding::new(Rc::clone(instance), Rc::clone(superclass));
            env.define("super", Value::Super(Rc::new(binding)));
        }
        Self::new(Rc::clone(&self.decl), env)
    }
}
