//! The pipeline engine: `-->`, `~~>`, step modifiers, and typed targets.
//!
//! Every step runs with the placeholder `_` bound to the incoming value in a
//! child environment that is discarded afterwards, so `_` never leaks into
//! surrounding code.

use crate::{
    ast::{Expr, Modifier, PipeOp},
    builtins::coerce_value,
    exception::{EvalResult, ExcType},
    interp::Interp,
    io::{InputReader, PrintWriter},
    tracer::Tracer,
    value::Value,
};

impl<P: PrintWriter, R: InputReader, T: Tracer> Interp<'_, P, R, T> {
    /// Evaluates `left op right`: the left side produces the piped value,
    /// the right side runs as a pipeline step (after coercion for `~~>`).
    pub(crate) fn eval_pipe(
        &mut self,
        left: &Expr,
        op: PipeOp,
        right: &Expr,
    ) -> EvalResult<Value> {
        let input = self.eval_expr(left)?;
        match op {
            PipeOp::Plain => self.execute_pipe_step(right, input),
            PipeOp::Coerce => self.eval_coercion_pipe(right, input),
        }
    }

    /// `~~>`: locate the first `_` placeholder in the call's argument list,
    /// read the declared type of the parameter at that position, and convert
    /// the piped value with the matching primitive coercer before running
    /// the step.
    fn eval_coercion_pipe(&mut self, right: &Expr, input: Value) -> EvalResult<Value> {
        let Expr::Call { callee, args } = right else {
            return Err(ExcType::TypeError
                .msg("Coercion pipe '~~>' must be followed by a function call.")
                .into());
        };

        let placeholder = args
            .iter()
            .position(|arg| matches!(arg, Expr::Variable(name) if name == "_"));
        let Some(index) = placeholder else {
            // No placeholder, no coercion: behave like a plain pipe.
            return self.execute_pipe_step(right, input);
        };

        let callee = self.eval_expr(callee)?;
        let Value::Function(func) = callee else {
            return Err(ExcType::TypeError
                .msg("Coercion pipe '~~>' is currently only supported for user-defined functions.")
                .into());
        };
        let decl = func.decl();
        if index >= decl.params.len() {
            return Err(ExcType::TypeError
                .msg(format!("Too many arguments for function '{}'.", decl.name))
                .into());
        }
        let type_name = &decl.params[index].param_type.name;

        let coercer = self.env.get(type_name).map_err(|_| {
            ExcType::TypeError.msg(format!("Unknown type '{type_name}' for coercion."))
        })?;
        let coerced = match coercer {
            Value::Builtin(builtin) if builtin.is_coercer() => coerce_value(builtin, &input).ok(),
            _ => None,
        };
        let Some(coerced) = coerced else {
            return Err(ExcType::CoercionError
                .msg(format!(
                    "Could not coerce value '{}' to type '{type_name}'.",
                    input.str_value()
                ))
                .into());
        };

        self.execute_pipe_step(right, coerced)
    }

    /// One right-hand pipe segment with the piped value as input.
    pub(crate) fn execute_pipe_step(&mut self, step: &Expr, input: Value) -> EvalResult<Value> {
        match step {
            // Typed targets bind in the *current* environment and pass the
            // value through. The declared type is recorded but not checked.
            Expr::TypedPipeTarget { name, .. } => {
                self.env.define(name.clone(), input.clone());
                Ok(input)
            }
            Expr::ModifiedExpression {
                expression,
                modifiers,
            } => self.execute_modified_step(expression, modifiers, input),
            _ => self.execute_simple_step(step, input),
        }
    }

    /// Evaluates a step expression in a child environment with `_` bound to
    /// the input. The child environment is discarded afterwards.
    fn execute_simple_step(&mut self, expr: &Expr, input: Value) -> EvalResult<Value> {
        let pipe_env = self.env.child();
        pipe_env.define("_", input);
        self.eval_in(expr, pipe_env)
    }

    /// Modifier algebra: conditionals first, in declaration order, each seen
    /// as a simple step over the current value — any falsy condition
    /// short-circuits and passes the value through unchanged. Then the step
    /// runs N times for the first repetition modifier (further repetition
    /// modifiers are ignored), threading each iteration's output into the
    /// next.
    pub(crate) fn execute_modified_step(
        &mut self,
        expr: &Expr,
        modifiers: &[Modifier],
        input: Value,
    ) -> EvalResult<Value> {
        let current = input;
        for modifier in modifiers {
            if let Modifier::Conditional(condition) = modifier {
                let verdict = self.execute_simple_step(condition, current.clone())?;
                if !verdict.truthy() {
                    return Ok(current);
                }
            }
        }

        let repetitions = modifiers
            .iter()
            .find_map(|modifier| match modifier {
                Modifier::Repetition(count) => Some(*count),
                Modifier::Conditional(_) => None,
            })
            .unwrap_or(1);

        let mut current = current;
        for _ in 0..repetitions {
            current = self.execute_simple_step(expr, current)?;
        }
        Ok(current)
    }
}
