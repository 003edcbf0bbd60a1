//! Semantic checks over parsed targets
//!
//! The validator walks a parsed target depth-first and reports arguments that
//! are syntactically fine but operationally unsound. Diagnostics form a tree
//! mirroring the call tree; subtrees without problems are left out entirely.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use super::ast::{Expr, FunctionCall};
use super::duration::format_duration;
use super::parser::parse_target;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    /// The target will not behave as intended
    Bad,
}

/// A finding attached to one argument of a function call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub argument: String,
    #[serde(rename = "type")]
    pub kind: ProblemKind,
    pub description: String,
    pub position: usize,
}

/// Diagnostics for one function call, positioned like the call itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemTree {
    /// Function name
    pub argument: String,
    /// Argument index of this call inside its parent (0 for the root)
    pub position: usize,
    pub problems: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnostic {
    Problem(Problem),
    Nested(ProblemTree),
}

// Nested trees are torn down from an explicit stack
impl Drop for ProblemTree {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.problems);
        while let Some(mut diagnostic) = pending.pop() {
            if let Diagnostic::Nested(tree) = &mut diagnostic {
                pending.append(&mut tree.problems);
            }
        }
    }
}

/// Verification result for a single target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetVerification {
    pub syntax_ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_of_problems: Option<ProblemTree>,
}

/// Functions whose argument at the given index is a sampling interval
#[derive(Debug, Clone)]
pub struct RuleTable {
    interval_args: HashMap<String, usize>,
}

impl RuleTable {
    pub fn empty() -> Self {
        Self {
            interval_args: HashMap::new(),
        }
    }

    pub fn with_interval_arg(mut self, function: impl Into<String>, index: usize) -> Self {
        self.interval_args.insert(function.into(), index);
        self
    }

    pub fn interval_arg(&self, function: &str) -> Option<usize> {
        self.interval_args.get(function).copied()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::empty().with_interval_arg("integralByInterval", 1)
    }
}

/// A call being checked, with the diagnostics gathered so far
struct Visit<'e> {
    call: &'e FunctionCall,
    position: usize,
    interval_arg: Option<usize>,
    args: std::iter::Enumerate<std::slice::Iter<'e, Expr>>,
    problems: Vec<Diagnostic>,
}

/// Checks targets of one trigger against the metric retention it runs with
#[derive(Debug, Clone)]
pub struct TargetValidator {
    rules: RuleTable,
    metric_ttl: Duration,
    is_remote: bool,
}

impl TargetValidator {
    pub fn new(metric_ttl: Duration, is_remote: bool) -> Self {
        Self {
            rules: RuleTable::default(),
            metric_ttl,
            is_remote,
        }
    }

    pub fn with_rules(mut self, rules: RuleTable) -> Self {
        self.rules = rules;
        self
    }

    /// Parse and check one target
    pub fn verify(&self, target: &str) -> TargetVerification {
        match parse_target(target) {
            Ok(expr) => TargetVerification {
                syntax_ok: true,
                tree_of_problems: self.check(&expr),
            },
            Err(e) => {
                tracing::debug!(expression = %target, error = %e, "Target failed to parse");
                TargetVerification {
                    syntax_ok: false,
                    tree_of_problems: None,
                }
            }
        }
    }

    /// Problems of a parsed target, or `None` when there are none
    ///
    /// Calls are visited from an explicit stack in post-order. A call's tree is
    /// attached to its parent only when it holds at least one problem.
    pub fn check(&self, expr: &Expr) -> Option<ProblemTree> {
        let root = expr.as_call()?;
        let mut stack = vec![self.visit(root, 0)];

        loop {
            let frame = stack.last_mut()?;
            if let Some((index, arg)) = frame.args.next() {
                if frame.interval_arg == Some(index) {
                    if let Some(problem) = self.check_interval(frame.call, index, arg) {
                        frame.problems.push(Diagnostic::Problem(problem));
                    }
                }
                if let Some(call) = arg.as_call() {
                    stack.push(self.visit(call, index));
                }
                continue;
            }

            let done = stack.pop()?;
            let tree = (!done.problems.is_empty()).then(|| ProblemTree {
                argument: done.call.name.clone(),
                position: done.position,
                problems: done.problems,
            });

            match (stack.last_mut(), tree) {
                (Some(parent), Some(tree)) => parent.problems.push(Diagnostic::Nested(tree)),
                (Some(_), None) => {}
                (None, tree) => return tree,
            }
        }
    }

    fn visit<'e>(&self, call: &'e FunctionCall, position: usize) -> Visit<'e> {
        let interval_arg = if self.is_remote {
            // Remote retention rules are not checked
            None
        } else {
            self.rules.interval_arg(&call.name)
        };

        Visit {
            call,
            position,
            interval_arg,
            args: call.args.iter().enumerate(),
            problems: Vec::new(),
        }
    }

    fn check_interval(&self, call: &FunctionCall, index: usize, arg: &Expr) -> Option<Problem> {
        let interval = arg.as_duration()?;
        if interval <= self.metric_ttl {
            return None;
        }

        Some(Problem {
            argument: arg.raw().to_string(),
            kind: ProblemKind::Bad,
            description: format!(
                "The function {} has a time sampling parameter {} larger than allowed by the config:{}",
                call.name,
                arg.raw(),
                format_duration(self.metric_ttl)
            ),
            position: index,
        })
    }
}
