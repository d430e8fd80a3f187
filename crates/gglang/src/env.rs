//! Lexically-scoped environments: a parent chain of name→value frames rooted
//! in the global frame.

use std::{cell::RefCell, rc::Rc};

use ahash::AHashMap;

use crate::{
    exception::{Exception, RunResult},
    value::Value,
};

/// A handle to one scope frame. Cloning the handle aliases the frame, which
/// is what closures need: a function captures its defining environment and
/// later calls chain new frames onto it.
///
/// Parent chains are acyclic by construction — frames only ever point at
/// frames that already existed when they were created.
#[derive(Debug, Clone)]
pub(crate) struct Env(Rc<RefCell<Scope>>);

#[derive(Debug)]
struct Scope {
    values: AHashMap<String, Value>,
    parent: Option<Env>,
}

impl Env {
    /// Creates an empty root frame.
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(Scope {
            values: AHashMap::new(),
            parent: None,
        })))
    }

    /// Creates a child frame enclosed by `self`.
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Scope {
            values: AHashMap::new(),
            parent: Some(self.clone()),
        })))
    }

    /// Creates or overwrites a binding in this frame. GGLang permits
    /// redeclaration, so this never fails.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().values.insert(name.into(), value);
    }

    /// Looks a name up through the parent chain.
    ///
    /// Fails with `NameError` when the name is absent and with
    /// `UnboundLocalError` when the binding holds the uninitialized sentinel.
    pub fn get(&self, name: &str) -> RunResult<Value> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            if let Some(value) = scope.values.get(name) {
                if matches!(value, Value::Uninitialized) {
                    return Err(Exception::name_uninitialized(name));
                }
                return Ok(value.clone());
            }
            current = scope.parent.clone();
        }
        Err(Exception::name_undefined(name))
    }

    /// Overwrites an existing binding, searching the parent chain.
    ///
    /// Fails with `NameError` when no frame defines the name.
    pub fn assign(&self, name: &str, value: Value) -> RunResult<()> {
        match self.frame_containing(name) {
            Some(env) => {
                env.0.borrow_mut().values.insert(name.to_owned(), value);
                Ok(())
            }
            None => Err(Exception::assign_undefined(name)),
        }
    }

    fn frame_containing(&self, name: &str) -> Option<Self> {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            let scope = env.0.borrow();
            if scope.values.contains_key(name) {
                drop(scope);
                return Some(env);
            }
            current = scope.parent.clone();
        }
        None
    }
}
