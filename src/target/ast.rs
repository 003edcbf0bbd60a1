//! Target expression tree

use std::time::Duration;

use super::duration::parse_duration;

/// A node of a parsed target expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Function application: `name(args...)`
    Call(FunctionCall),
    /// Quoted string literal, stored without quotes
    String(String),
    /// Numeric literal
    Number { raw: String, value: f64 },
    /// Unquoted duration literal such as `1h` or `1h5m0s`
    Duration { raw: String, span: Duration },
    /// Bare metric path, possibly with wildcards
    Path(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

impl Expr {
    /// Argument text as written, without surrounding quotes. For calls this is the function name.
    pub fn raw(&self) -> &str {
        match self {
            Expr::Call(call) => &call.name,
            Expr::String(s) | Expr::Path(s) => s,
            Expr::Number { raw, .. } | Expr::Duration { raw, .. } => raw,
        }
    }

    pub fn as_call(&self) -> Option<&FunctionCall> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Interpret the node as a time span.
    ///
    /// Duration literals are taken as-is; quoted strings are accepted when their
    /// content is a duration literal (`'6h'`).
    pub fn as_duration(&self) -> Option<Duration> {
        match self {
            Expr::Duration { span, .. } => Some(*span),
            Expr::String(s) => parse_duration(s).ok(),
            _ => None,
        }
    }

    /// Collect metric paths referenced by this expression, depth-first, left to right
    pub fn metric_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        let mut pending = vec![self];
        while let Some(expr) = pending.pop() {
            match expr {
                Expr::Call(call) => pending.extend(call.args.iter().rev()),
                Expr::Path(path) => out.push(path),
                _ => {}
            }
        }
    }
}

impl FunctionCall {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

// Nested calls are torn down from an explicit stack
impl Drop for FunctionCall {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.args);
        while let Some(mut arg) = pending.pop() {
            if let Expr::Call(call) = &mut arg {
                pending.append(&mut call.args);
            }
        }
    }
}
