//! Diagnostic task trait and combinators.

use crate::status::DiagnosticStatusWrapper;
use std::fmt;

/// A named health check run by the updater on every cycle.
pub trait DiagnosticTask: Send {
    /// Name the task is registered under.
    fn name(&self) -> &str;

    /// Fill in `stat` with the current result.
    fn run(&mut self, stat: &mut DiagnosticStatusWrapper);
}

type TaskFn = Box<dyn FnMut(&mut DiagnosticStatusWrapper) + Send>;

/// Task backed by a closure.
pub struct FunctionDiagnosticTask {
    name: String,
    function: TaskFn,
}

impl FunctionDiagnosticTask {
    pub fn new<F>(name: impl Into<String>, function: F) -> Self
    where
        F: FnMut(&mut DiagnosticStatusWrapper) + Send + 'static,
    {
        Self {
            name: name.into(),
            function: Box::new(function),
        }
    }
}

impl DiagnosticTask for FunctionDiagnosticTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, stat: &mut DiagnosticStatusWrapper) {
        (self.function)(stat);
    }
}

impl fmt::Debug for FunctionDiagnosticTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDiagnosticTask")
            .field("name", &self.name)
            .finish()
    }
}

/// Several tasks reported as one status.
///
/// Every child starts from the incoming summary; values accumulate and the
/// final summary is the merge of all child summaries.
pub struct CompositeDiagnosticTask {
    name: String,
    tasks: Vec<Box<dyn DiagnosticTask>>,
}

impl CompositeDiagnosticTask {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
        }
    }

    pub fn add_task(&mut self, task: Box<dyn DiagnosticTask>) {
        self.tasks.push(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl DiagnosticTask for CompositeDiagnosticTask {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, stat: &mut DiagnosticStatusWrapper) {
        let mut original = DiagnosticStatusWrapper::default();
        original.summary_from(stat);
        let mut combined = DiagnosticStatusWrapper::default();

        for task in &mut self.tasks {
            stat.summary_from(&original);
            task.run(stat);
            combined.merge_summary_from(stat);
        }

        stat.summary_from(&combined);
    }
}
