//! Single-line statement classification.

/// What one script line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement<'s> {
    /// Blank line, `#` comment, or a docstring delimiter line.
    Skip,
    /// `while <condition>:`
    While { condition: &'s str },
    /// `if <condition>:`
    If { condition: &'s str },
    /// `elif <condition>:`
    Elif { condition: &'s str },
    /// `else:`
    Else,
    /// `name()`, anything after the closing parenthesis is ignored.
    Call { name: &'s str },
    /// Matches nothing above; executes as a no-op.
    Other,
}

impl Statement<'_> {
    /// Clauses that continue a preceding `if`.
    pub fn is_branch_continuation(&self) -> bool {
        matches!(self, Statement::Elif { .. } | Statement::Else)
    }
}

/// Classify one raw line (indentation is ignored).
pub fn classify(line: &str) -> Statement<'_> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') || line.starts_with("\"\"\"") || line.starts_with("'''") {
        return Statement::Skip;
    }

    if let Some(condition) = header_condition(line, "while ") {
        return Statement::While { condition };
    }
    if let Some(condition) = header_condition(line, "if ") {
        return Statement::If { condition };
    }
    if let Some(condition) = header_condition(line, "elif ") {
        return Statement::Elif { condition };
    }
    if line
        .strip_prefix("else")
        .is_some_and(|rest| rest.trim_start().starts_with(':'))
    {
        return Statement::Else;
    }

    match call_name(line) {
        Some(name) => Statement::Call { name },
        None => Statement::Other,
    }
}

/// `<keyword> <text>:` where the text runs to the last colon on the line.
fn header_condition<'s>(line: &'s str, keyword: &str) -> Option<&'s str> {
    let rest = line.strip_prefix(keyword)?;
    let colon = rest.rfind(':')?;
    let raw = &rest[..colon];
    if raw.trim().is_empty() {
        return None;
    }
    Some(normalize_condition(raw))
}

/// Trim and drop trailing call parentheses: `" front_is_clear() "` → `"front_is_clear"`.
pub fn normalize_condition(raw: &str) -> &str {
    let trimmed = raw.trim();
    trimmed.strip_suffix("()").unwrap_or(trimmed).trim()
}

/// `^(\w+)\s*\(\s*\)`
fn call_name(line: &str) -> Option<&str> {
    let end = line
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(line.len());
    if end == 0 {
        return None;
    }
    let rest = line[end..].trim_start().strip_prefix('(')?;
    rest.trim_start().strip_prefix(')')?;
    Some(&line[..end])
}
