//! Target expressions: parsing, pattern extraction and semantic validation

pub mod ast;
pub mod duration;
pub mod parser;
pub mod validator;

pub use ast::{Expr, FunctionCall};
pub use duration::{format_duration, parse_duration, DurationError};
pub use parser::{parse_target, ParseError};
pub use validator::{
    Diagnostic, Problem, ProblemKind, ProblemTree, RuleTable, TargetValidator, TargetVerification,
};

/// Metric-path patterns referenced by `targets`, in order of first appearance.
///
/// Fails on the first target that does not parse.
pub fn extract_patterns<S: AsRef<str>>(targets: &[S]) -> Result<Vec<String>, ParseError> {
    let mut patterns: Vec<String> = Vec::new();

    for target in targets {
        let expr = parse_target(target.as_ref())?;
        let mut paths = Vec::new();
        expr.metric_paths(&mut paths);
        for path in paths {
            if !patterns.iter().any(|p| p == path) {
                patterns.push(path.to_string());
            }
        }
    }

    Ok(patterns)
}
