//! Public interface for running GGLang code.

use crate::{
    ast::Program,
    builtins,
    env::Env,
    exception::Exception,
    interp::Interp,
    io::{InputReader, PrintWriter},
    parse::{ParseError, parse},
    tracer::{NoopTracer, Tracer},
};

/// Primary interface for running GGLang code.
///
/// A `Runner` holds the parsed program; each `run` executes it from scratch
/// with a fresh global environment, so a runner can be reused.
///
/// # Example
/// ```
/// use gglang::{CollectStringPrint, QueuedInput, Runner};
///
/// let runner = Runner::new("print(1 + 2)", "demo.gg").unwrap();
/// let mut print = CollectStringPrint::new();
/// let mut input = QueuedInput::default();
/// runner.run(&mut print, &mut input).unwrap();
/// assert_eq!(print.output(), "3\n");
/// ```
#[derive(Debug)]
pub struct Runner {
    program: Program,
    script_name: String,
}

impl Runner {
    /// Parses the given code. No execution happens yet.
    ///
    /// # Arguments
    /// * `code` - The GGLang source to execute
    /// * `script_name` - The script name, kept for host callers
    pub fn new(code: &str, script_name: &str) -> Result<Self, ParseError> {
        Ok(Self {
            program: parse(code)?,
            script_name: script_name.to_owned(),
        })
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    /// Executes the program: all top-level statements in order, then a
    /// global `main` user function if one is defined.
    pub fn run(
        &self,
        print: &mut impl PrintWriter,
        input: &mut impl InputReader,
    ) -> Result<(), Exception> {
        self.run_traced(print, input, &mut NoopTracer)
    }

    /// Like [`run`](Self::run), reporting every visited node kind to the
    /// tracer.
    pub fn run_traced(
        &self,
        print: &mut impl PrintWriter,
        input: &mut impl InputReader,
        tracer: &mut impl Tracer,
    ) -> Result<(), Exception> {
        let globals = Env::new();
        builtins::register(&globals);
        let mut interp = Interp::new(globals, print, input, tracer);
        interp.run_program(&self.program)
    }
}
