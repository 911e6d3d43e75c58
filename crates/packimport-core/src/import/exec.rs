//! Turning loaded source into a module namespace.

use super::module::{Module, Value};
use super::ModuleSpec;
use crate::errors::ImportError;

/// Compiles and runs module source.
///
/// The import system hands over the module spec (for the module name and the
/// diagnostic path) and the raw bytes a finder produced.
pub trait Executor: Send + Sync {
    fn execute(&self, spec: &ModuleSpec, source: &[u8]) -> Result<Module, ImportError>;
}

/// Executor for declarative modules: one `NAME = literal` binding per line.
///
/// Literals are integers, floats, single- or double-quoted strings, `True`,
/// `False` and `None`. Blank lines and `#` comments are skipped, and a
/// comment may follow a binding. Anything else fails with
/// [`ImportError::Execution`] pointing at the diagnostic path and line.
#[derive(Debug, Default, Clone, Copy)]
pub struct AssignmentEvaluator;

impl Executor for AssignmentEvaluator {
    fn execute(&self, spec: &ModuleSpec, source: &[u8]) -> Result<Module, ImportError> {
        let path = spec.origin.diagnostic_path();
        let fail = |line: usize, message: String| ImportError::Execution {
            name: spec.name.to_string(),
            path: path.clone(),
            line,
            message,
        };

        let text = std::str::from_utf8(source).map_err(|e| {
            let line = source[..e.valid_up_to()]
                .iter()
                .filter(|&&b| b == b'\n')
                .count()
                + 1;
            fail(line, "source is not valid UTF-8".to_string())
        })?;

        let mut module = Module::new(spec.name.clone(), path.clone());
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (target, value) = parse_binding(line).map_err(|msg| fail(index + 1, msg))?;
            module.set(target, value);
        }

        Ok(module)
    }
}

fn parse_binding(line: &str) -> Result<(&str, Value), String> {
    let (target, expr) = line
        .split_once('=')
        .ok_or_else(|| "invalid syntax".to_string())?;
    let target = target.trim();
    if !is_identifier(target) {
        return Err(format!("cannot assign to '{target}'"));
    }
    if expr.starts_with('=') {
        return Err("invalid syntax".to_string());
    }

    let (value, rest) = parse_literal(expr.trim_start())?;
    let rest = rest.trim_start();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err(format!("unexpected trailing input '{rest}'"));
    }
    Ok((target, value))
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

fn parse_literal(expr: &str) -> Result<(Value, &str), String> {
    if expr.starts_with(['\'', '"']) {
        return parse_string(expr);
    }

    let end = expr
        .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')))
        .unwrap_or(expr.len());
    let (token, rest) = expr.split_at(end);

    let value = match token {
        "" => return Err("expected an expression".to_string()),
        "None" => Value::None,
        "True" => Value::Bool(true),
        "False" => Value::Bool(false),
        _ if token.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '.')) => {
            parse_number(token)?
        }
        _ => return Err(format!("unsupported expression '{token}'")),
    };
    Ok((value, rest))
}

fn parse_number(token: &str) -> Result<Value, String> {
    let digits = token.replace('_', "");
    if let Ok(i) = digits.parse::<i64>() {
        return Ok(Value::Int(i));
    }
    match digits.parse::<f64>() {
        Ok(x) if x.is_finite() => Ok(Value::Float(x)),
        _ => Err(format!("invalid number literal '{token}'")),
    }
}

fn parse_string(expr: &str) -> Result<(Value, &str), String> {
    let mut chars = expr.char_indices();
    let quote = match chars.next() {
        Some((_, q)) => q,
        None => return Err("expected an expression".to_string()),
    };

    let mut out = String::new();
    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '0')) => out.push('\0'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c if c == quote => return Ok((Value::Str(out), &expr[i + c.len_utf8()..])),
            c => out.push(c),
        }
    }
    Err("unterminated string literal".to_string())
}
