use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of diagnostics stored before further ones are only counted.
pub const MAX_DIAGNOSTICS: usize = 20;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Numeric diagnostic code (K100–K199).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiagnosticCode(pub u16);

impl DiagnosticCode {
    pub const MISSING_MAIN: Self = Self(100);
    pub const UNBALANCED_PARENS: Self = Self(101);
    pub const CALL_WITHOUT_PARENS: Self = Self(102);
    pub const EXPECTED_INDENT: Self = Self(103);

    /// Severity a diagnostic with this code is reported at.
    pub fn severity(self) -> Severity {
        match self {
            Self::CALL_WITHOUT_PARENS => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "K{}", self.0)
    }
}

/// A structured script diagnostic.
///
/// The UI renders these directly; it must not parse free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    /// 1-based line, absent for whole-file findings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            code,
            severity: code.severity(),
            message: message.into(),
            line,
            suggestion: None,
        }
    }

    /// Attach a fix suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{line}: {} [{}] {}", self.code, self.severity, self.message),
            None => write!(f, "{} [{}] {}", self.code, self.severity, self.message),
        }
    }
}

/// Collected diagnostics, split by severity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub total_errors: usize,
    pub total_warnings: usize,
}

impl Diagnostics {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn is_clean(&self) -> bool {
        self.total_errors == 0 && self.total_warnings == 0
    }

    /// Add a diagnostic to the list matching its severity, respecting [`MAX_DIAGNOSTICS`].
    pub fn push(&mut self, diagnostic: Diagnostic) {
        let (list, total) = match diagnostic.severity {
            Severity::Error => (&mut self.errors, &mut self.total_errors),
            Severity::Warning => (&mut self.warnings, &mut self.total_warnings),
        };
        if list.len() < MAX_DIAGNOSTICS {
            list.push(diagnostic);
        }
        *total += 1;
    }

    /// All stored diagnostics, errors first.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }
}
