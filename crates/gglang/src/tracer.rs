//! Execution tracing for the evaluator.
//!
//! The evaluator reports every visited node kind through a [`Tracer`]. With
//! [`NoopTracer`] the calls compile away via monomorphization; the CLI's
//! `--debug` flag swaps in [`StderrTracer`] for a human-readable log.

/// Hook invoked once per visited AST node.
pub trait Tracer {
    fn visit_node(&mut self, kind: &'static str);
}

/// Zero-cost no-op tracer (production default).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    fn visit_node(&mut self, _kind: &'static str) {}
}

/// Logs each visited node kind to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrTracer;

impl Tracer for StderrTracer {
    fn visit_node(&mut self, kind: &'static str) {
        eprintln!("[debug] executing node: {kind}");
    }
}
