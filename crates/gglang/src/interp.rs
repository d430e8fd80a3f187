//! The AST evaluator: statement execution, expression evaluation, callable
//! dispatch, and the class machinery.
//!
//! The evaluator walks the tree recursively, keeping one "current
//! environment" reference that block, loop, and pipeline execution swap and
//! restore on every exit path. Function returns travel as the `Return` arm of
//! [`Unwind`]; errors travel as the `Raise` arm and are the only thing
//! `try/catch` captures.

use indexmap::IndexMap;
use std::rc::Rc;

use crate::{
    ast::{Block, Expr, Param, Program, Stmt, TypeName},
    env::Env,
    exception::{EvalResult, ExcType, Exception, RunResult, Unwind},
    function::Function,
    io::{InputReader, PrintWriter},
    tracer::Tracer,
    types::{Class, Dict, Instance},
    value::{StrMethod, Value, binary_op},
};

/// Function calls deeper than this raise `RuntimeError`. The evaluator
/// recurses on the host stack, so the limit is deliberately conservative
/// enough to stay inside a default 2 MiB thread stack.
pub(crate) const MAX_RECURSION_DEPTH: usize = 100;

/// One program execution: the current environment plus the host-provided
/// streams and tracer.
pub(crate) struct Interp<'io, P: PrintWriter, R: InputReader, T: Tracer> {
    pub(crate) env: Env,
    pub(crate) print: &'io mut P,
    pub(crate) input: &'io mut R,
    pub(crate) tracer: &'io mut T,
    depth: usize,
}

impl<'io, P: PrintWriter, R: InputReader, T: Tracer> Interp<'io, P, R, T> {
    pub fn new(globals: Env, print: &'io mut P, input: &'io mut R, tracer: &'io mut T) -> Self {
        Self {
            env: globals,
            print,
            input,
            tracer,
            depth: 0,
        }
    }

    /// Runs the top-level statements in order, then invokes a global `main`
    /// user function with no arguments if one exists. A missing `main` is
    /// not an error.
    pub fn run_program(&mut self, program: &Program) -> RunResult<()> {
        for stmt in &program.statements {
            self.exec_stmt(stmt).map_err(top_level_error)?;
        }
        let Ok(main) = self.env.get("main") else {
            return Ok(());
        };
        if let Value::Function(func) = main {
            self.call_function(&func, Vec::new()).map_err(top_level_error)?;
        }
        Ok(())
    }

    fn exec_block(&mut self, block: &Block) -> EvalResult<()> {
        for stmt in &block.statements {
            self.exec_stmt(stmt)?;
        }
        Ok(())
    }

    /// Runs a block with `env` as the current environment, restoring the
    /// previous environment on every exit path.
    pub(crate) fn exec_block_in(&mut self, block: &Block, env: Env) -> EvalResult<()> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = self.exec_block(block);
        self.env = saved;
        result
    }

    /// Evaluates an expression with `env` as the current environment,
    /// restoring the previous environment on every exit path.
    pub(crate) fn eval_in(&mut self, expr: &Expr, env: Env) -> EvalResult<Value> {
        let saved = std::mem::replace(&mut self.env, env);
        let result = self.eval_expr(expr);
        self.env = saved;
        result
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<()> {
        self.tracer.visit_node(stmt.kind());
        match stmt {
            Stmt::VarDecl {
                name,
                var_type,
                value,
            } => {
                let value = match value {
                    None => Value::Uninitialized,
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        if let Some(declared) = var_type {
                            check_declared_type(declared, &value, &format!("variable '{name}'"))?;
                        }
                        value
                    }
                };
                self.env.define(name.clone(), value);
            }
            Stmt::ConstDecl { name, value } => {
                let value = self.eval_expr(value)?;
                self.env.define(name.clone(), value);
            }
            Stmt::InstanceVarDecl {
                name,
                var_type,
                value,
            } => {
                let instance =
                    self.current_instance("Instance variable declaration must be inside a method.")?;
                let value = match value {
                    None => Value::Uninitialized,
                    Some(expr) => {
                        let value = self.eval_expr(expr)?;
                        if let Some(declared) = var_type {
                            check_declared_type(
                                declared,
                                &value,
                                &format!("instance variable '@{name}'"),
                            )?;
                        }
                        value
                    }
                };
                instance.set(name.clone(), value);
            }
            Stmt::InstanceConstDecl { name, value } => {
                let instance = self
                    .current_instance("Instance constant declaration must be inside a method.")?;
                let value = self.eval_expr(value)?;
                instance.set(name.clone(), value);
            }
            Stmt::Assignment { target, value } => {
                let value = self.eval_expr(value)?;
                self.assign_target(target, value)?;
            }
            Stmt::CompoundAssignment { target, op, value } => {
                let rhs = self.eval_expr(value)?;
                if let Expr::ArrayAccess { array, index } = target {
                    let container = self.eval_expr(array)?;
                    let key = self.eval_expr(index)?;
                    let current = index_get(&container, &key)?;
                    let updated = binary_op(*op, &current, &rhs)?;
                    index_set(&container, key, updated)?;
                } else {
                    let current = self.read_target(target)?;
                    let updated = binary_op(*op, &current, &rhs)?;
                    self.assign_target(target, updated)?;
                }
            }
            Stmt::FuncDecl(decl) => {
                let function = Function::new(Rc::clone(decl), self.env.clone());
                self.env.define(decl.name.clone(), Value::Function(Rc::new(function)));
            }
            Stmt::ClassDecl {
                name,
                superclass,
                methods,
            } => {
                let superclass = match superclass {
                    None => None,
                    Some(super_name) => match self.env.get(super_name)? {
                        Value::Class(class) => Some(class),
                        other => {
                            return Err(ExcType::TypeError
                                .msg(format!(
                                    "Superclass must be a class. Got {}.",
                                    other.type_name()
                                ))
                                .into());
                        }
                    },
                };
                let mut table = IndexMap::new();
                for method in methods {
                    let function = Function::new(Rc::clone(method), self.env.clone());
                    table.insert(method.name.clone(), Rc::new(function));
                }
                let class = Class::new(name.clone(), superclass, table);
                self.env.define(name.clone(), Value::Class(Rc::new(class)));
            }
            Stmt::ForLoop {
                variable,
                iterable,
                body,
            } => {
                let iterable = self.eval_expr(iterable)?;
                // Iterate over a snapshot so mutation during the loop is
                // well-defined.
                for item in iteration_snapshot(&iterable)? {
                    let loop_env = self.env.child();
                    loop_env.define(variable.clone(), item);
                    self.exec_block_in(body, loop_env)?;
                }
            }
            Stmt::TryCatch {
                try_block,
                exception_var,
                catch_block,
            } => match self.exec_block(try_block) {
                Ok(()) => {}
                Err(Unwind::Return(value)) => return Err(Unwind::Return(value)),
                Err(Unwind::Raise(exception)) => {
                    let catch_env = self.env.child();
                    catch_env.define(exception_var.clone(), Value::str(exception.message()));
                    self.exec_block_in(catch_block, catch_env)?;
                }
            },
            Stmt::Return { value } => {
                let value = match value {
                    None => Value::None,
                    Some(expr) => self.eval_expr(expr)?,
                };
                return Err(Unwind::Return(value));
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr)?;
            }
        }
        Ok(())
    }

    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.tracer.visit_node(expr.kind());
        match expr {
            Expr::Integer(value) => Ok(Value::Int(*value)),
            Expr::Float(value) => Ok(Value::Float(*value)),
            Expr::Str(value) => Ok(Value::str(value.as_str())),
            Expr::InterpolatedString(parts) => {
                let mut out = String::new();
                for part in parts {
                    out.push_str(&self.eval_expr(part)?.str_value());
                }
                Ok(Value::str(out))
            }
            Expr::Variable(name) => Ok(self.env.get(name)?),
            Expr::InstanceVar(name) => {
                let instance =
                    self.current_instance("Instance variables can only be used inside a method.")?;
                Ok(Instance::get(&instance, name)?)
            }
            Expr::Super => Ok(self.env.get("super")?),
            Expr::ArrayLiteral(elements) => {
                let items = self.eval_args(elements)?;
                Ok(Value::list(items))
            }
            Expr::Dictionary(pairs) => {
                let mut dict = Dict::new();
                for pair in pairs {
                    let key = self.eval_expr(&pair.key)?;
                    let value = self.eval_expr(&pair.value)?;
                    dict.insert(key, value)?;
                }
                Ok(Value::dict(dict))
            }
            Expr::ArrayAccess { array, index } => {
                let container = self.eval_expr(array)?;
                let key = self.eval_expr(index)?;
                Ok(index_get(&container, &key)?)
            }
            Expr::PropertyAccess { object, name } => {
                let object = self.eval_expr(object)?;
                property_access(object, name)
            }
            Expr::MethodCall { object, name, args } => {
                let object = self.eval_expr(object)?;
                let callee = property_access(object, name)?;
                let args = self.eval_args(args)?;
                self.call_value(callee, args)
            }
            Expr::Call { callee, args } => {
                let callee = self.eval_expr(callee)?;
                let args = self.eval_args(args)?;
                self.call_value(callee, args)
            }
            Expr::BinOp { left, op, right } => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(binary_op(*op, &left, &right)?)
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition)?.truthy() {
                    self.eval_expr(then_branch)
                } else {
                    self.eval_expr(else_branch)
                }
            }
            Expr::Pipe { left, op, right } => self.eval_pipe(left, *op, right),
            Expr::AssignmentPipe { value, target, .. } => {
                // The declared type is accepted without enforcement.
                let value = self.eval_expr(value)?;
                self.env.define(target.clone(), value);
                Ok(Value::None)
            }
            Expr::TypedPipeTarget { .. } => {
                Err(ExcType::RuntimeError
                    .msg("typed pipe target outside of a pipeline")
                    .into())
            }
            Expr::ModifiedExpression {
                expression,
                modifiers,
            } => self.execute_modified_step(expression, modifiers, Value::None),
            Expr::CreateReference(value) => {
                // Reference semantics are not implemented; the inner value is
                // evaluated as-is.
                self.eval_expr(value)
            }
        }
    }

    pub(crate) fn eval_args(&mut self, args: &[Expr]) -> EvalResult<Vec<Value>> {
        args.iter().map(|arg| self.eval_expr(arg)).collect()
    }

    /// Callable dispatch for user functions, classes, builtins, and bound
    /// string methods.
    pub(crate) fn call_value(&mut self, callee: Value, args: Vec<Value>) -> EvalResult<Value> {
        match callee {
            Value::Function(func) => self.call_function(&func, args),
            Value::Class(class) => self.instantiate(class, args),
            Value::Builtin(builtin) => {
                Ok(builtin.call(args, &mut *self.print, &mut *self.input)?)
            }
            Value::StrMethod(method, receiver) => {
                if !args.is_empty() {
                    return Err(ExcType::ArityError
                        .msg(format!(
                            "str.{method}() takes no arguments ({} given)",
                            args.len()
                        ))
                        .into());
                }
                let result = match method {
                    StrMethod::Upper => receiver.to_uppercase(),
                    StrMethod::Lower => receiver.to_lowercase(),
                };
                Ok(Value::str(result))
            }
            other => Err(Exception::not_callable(other.type_name()).into()),
        }
    }

    /// Invokes a user function: fresh environment on the captured closure,
    /// exact arity, primitive parameter type checks, and `Return` capture.
    pub(crate) fn call_function(&mut self, func: &Function, args: Vec<Value>) -> EvalResult<Value> {
        let decl = func.decl();
        if args.len() != decl.params.len() {
            return Err(Exception::arity(&decl.name, decl.params.len(), args.len()).into());
        }
        if self.depth >= MAX_RECURSION_DEPTH {
            return Err(ExcType::RuntimeError
                .msg("maximum recursion depth exceeded")
                .into());
        }
        let call_env = func.closure().child();
        for (param, arg) in decl.params.iter().zip(args) {
            check_param_type(param, &arg, &decl.name)?;
            call_env.define(param.name.clone(), arg);
        }
        self.depth += 1;
        let result = self.exec_block_in(&decl.body, call_env);
        self.depth -= 1;
        match result {
            Ok(()) => Ok(Value::None),
            Err(Unwind::Return(value)) => Ok(value),
            Err(raise) => Err(raise),
        }
    }

    /// Calls a class: create the instance, then run `initialize` from the
    /// class or the nearest ancestor that defines it. The instance is the
    /// result regardless of what the initializer returns.
    fn instantiate(&mut self, class: Rc<Class>, args: Vec<Value>) -> EvalResult<Value> {
        let instance = Rc::new(Instance::new(Rc::clone(&class)));
        if let Some(initializer) = class.find_method("initialize") {
            let bound = initializer.bind(&instance);
            self.call_function(&bound, args)?;
        }
        Ok(Value::Instance(instance))
    }

    fn assign_target(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        match target {
            Expr::Variable(name) => Ok(self.env.assign(name, value)?),
            Expr::InstanceVar(name) => {
                let instance = self
                    .current_instance("Instance variables can only be assigned inside a method.")?;
                instance.set(name.clone(), value);
                Ok(())
            }
            Expr::PropertyAccess { object, name } => {
                let object = self.eval_expr(object)?;
                match object {
                    Value::Instance(instance) => {
                        instance.set(name.clone(), value);
                        Ok(())
                    }
                    _ => Err(ExcType::TypeError
                        .msg("Can only assign to properties of instances.")
                        .into()),
                }
            }
            Expr::ArrayAccess { array, index } => {
                let container = self.eval_expr(array)?;
                let key = self.eval_expr(index)?;
                Ok(index_set(&container, key, value)?)
            }
            _ => Err(ExcType::TypeError.msg("Invalid assignment target.").into()),
        }
    }

    /// Reads the current value of a compound-assignment target.
    fn read_target(&mut self, target: &Expr) -> EvalResult<Value> {
        match target {
            Expr::Variable(name) => Ok(self.env.get(name)?),
            Expr::InstanceVar(name) => {
                let instance = self
                    .current_instance("Instance variables can only be used inside a method.")?;
                Ok(Instance::get(&instance, name)?)
            }
            Expr::PropertyAccess { object, name } => {
                let object = self.eval_expr(object)?;
                match object {
                    Value::Instance(instance) => Ok(Instance::get(&instance, name)?),
                    _ => Err(ExcType::TypeError
                        .msg("Can only use compound assignment on properties of instances.")
                        .into()),
                }
            }
            _ => Err(ExcType::TypeError
                .msg("Invalid compound assignment target.")
                .into()),
        }
    }

    /// The enclosing `this`, which must be an instance. Outside a method the
    /// lookup itself fails with `NameError`.
    fn current_instance(&self, context: &str) -> EvalResult<Rc<Instance>> {
        match self.env.get("this")? {
            Value::Instance(instance) => Ok(instance),
            _ => Err(ExcType::TypeError.msg(context).into()),
        }
    }
}

/// Property lookup dispatched on the object kind: instance fields and
/// methods, `super` methods, and the string methods.
fn property_access(object: Value, name: &str) -> EvalResult<Value> {
    match object {
        Value::Instance(instance) => Ok(Instance::get(&instance, name)?),
        Value::Super(binding) => Ok(binding.get(name)?),
        Value::Str(receiver) => match name {
            "upper" => Ok(Value::StrMethod(StrMethod::Upper, receiver)),
            "lower" => Ok(Value::StrMethod(StrMethod::Lower, receiver)),
            _ => Err(ExcType::TypeError
                .msg(format!("Object of type str has no property '{name}'."))
                .into()),
        },
        other => Err(ExcType::TypeError
            .msg(format!(
                "Object of type {} has no property '{name}'.",
                other.type_name()
            ))
            .into()),
    }
}

/// Maps evaluator unwinding to a plain error at the program boundary.
fn top_level_error(unwind: Unwind) -> Exception {
    match unwind {
        Unwind::Raise(exception) => exception,
        Unwind::Return(_) => ExcType::RuntimeError.msg("'return' outside of a function"),
    }
}

/// Indexed read shared by `ArrayAccess` evaluation and compound assignment.
fn index_get(container: &Value, key: &Value) -> RunResult<Value> {
    match container {
        Value::List(items) => {
            let Value::Int(index) = key else {
                return Err(ExcType::TypeError.msg("List index must be an integer."));
            };
            let items = items.borrow();
            if *index < 0 || *index as usize >= items.len() {
                return Err(ExcType::IndexError.msg("list index out of range"));
            }
            Ok(items[*index as usize].clone())
        }
        Value::Dict(dict) => match dict.borrow().get(key)? {
            Some(value) => Ok(value),
            None => Err(ExcType::KeyError.msg(key.repr_value())),
        },
        other => Err(ExcType::TypeError.msg(format!(
            "Object of type {} does not support subscripting.",
            other.type_name()
        ))),
    }
}

/// Indexed write shared by assignment and compound assignment.
fn index_set(container: &Value, key: Value, value: Value) -> RunResult<()> {
    match container {
        Value::List(items) => {
            let Value::Int(index) = key else {
                return Err(ExcType::TypeError.msg("List index must be an integer."));
            };
            let mut items = items.borrow_mut();
            if index < 0 || index as usize >= items.len() {
                return Err(ExcType::IndexError.msg("list assignment index out of range"));
            }
            items[index as usize] = value;
            Ok(())
        }
        Value::Dict(dict) => dict.borrow_mut().insert(key, value),
        other => Err(ExcType::TypeError.msg(format!(
            "Object of type {} does not support subscript assignment.",
            other.type_name()
        ))),
    }
}

/// The items a `for` loop visits: a copy taken before the first iteration.
fn iteration_snapshot(iterable: &Value) -> RunResult<Vec<Value>> {
    match iterable {
        Value::List(items) => Ok(items.borrow().clone()),
        Value::Dict(dict) => Ok(dict.borrow().keys()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::str(c.to_string())).collect()),
        other => Err(ExcType::TypeError.msg(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

/// Runtime check for a declared primitive type on a variable or instance
/// variable declaration. Non-primitive names are accepted unchecked.
fn check_declared_type(declared: &TypeName, value: &Value, target: &str) -> RunResult<()> {
    if primitive_matches(&declared.name, value).unwrap_or(true) {
        Ok(())
    } else {
        Err(ExcType::TypeError.msg(format!(
            "Cannot assign value of type {} to {target} of type '{}'",
            value.type_name(),
            declared.name
        )))
    }
}

/// Runtime check for a declared primitive parameter type.
fn check_param_type(param: &Param, value: &Value, func_name: &str) -> RunResult<()> {
    if primitive_matches(&param.param_type.name, value).unwrap_or(true) {
        Ok(())
    } else {
        Err(ExcType::TypeError.msg(format!(
            "Argument '{}' for function '{func_name}' must be of type '{}', but got type '{}'.",
            param.name,
            param.param_type.name,
            value.type_name()
        )))
    }
}

/// `Some(matched)` for the primitive type names, `None` for anything else.
fn primitive_matches(type_name: &str, value: &Value) -> Option<bool> {
    match type_name {
        "int" => Some(matches!(value, Value::Int(_))),
        "float" => Some(matches!(value, Value::Float(_))),
        "str" => Some(matches!(value, Value::Str(_))),
        "bool" => Some(matches!(value, Value::Bool(_))),
        _ => None,
    }
}
