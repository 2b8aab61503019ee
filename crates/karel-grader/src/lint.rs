//! Script lint: a fast advisory pass that never executes anything.
//!
//! Codes emitted:
//! - K100: no `def main():` anywhere in a non-blank script
//! - K101: `(` and `)` counts differ over the whole text
//! - K102: a built-in name mentioned without call parentheses (warning)
//! - K103: a block header followed by an unindented line

use karel_parser::{parse_program, ENTRY_POINT};
use karel_types::{Diagnostic, DiagnosticCode, Diagnostics, SourceFile};
use tracing::debug;

/// Built-in names learners most often write without `()`.
pub const KAREL_VOCABULARY: &[&str] = &[
    "move",
    "turn_left",
    "pick_beeper",
    "put_beeper",
    "front_is_clear",
    "left_is_clear",
    "right_is_clear",
    "beepers_present",
    "beepers_in_bag",
];

const HEADER_KEYWORDS: &[&str] = &["def", "if", "while", "else", "elif"];

/// Lint `source` and return every finding, errors first.
pub fn lint_script(source: &str) -> Diagnostics {
    let file = SourceFile::new(source);
    let mut linter = Linter {
        source: &file,
        diagnostics: Diagnostics::empty(),
    };
    linter.check();
    debug!(
        errors = linter.diagnostics.total_errors,
        warnings = linter.diagnostics.total_warnings,
        "lint finished"
    );
    linter.diagnostics
}

// ══════════════════════════════════════════════════════════════════════════════
// Linter
// ══════════════════════════════════════════════════════════════════════════════

struct Linter<'a> {
    source: &'a SourceFile<'a>,
    diagnostics: Diagnostics,
}

impl Linter<'_> {
    fn check(&mut self) {
        self.check_entry_point();
        self.check_parens();

        let source = self.source;
        let lines: Vec<(u32, &str)> = source.lines().collect();
        for (i, &(number, line)) in lines.iter().enumerate() {
            self.check_bare_names(number, line);
            if let Some(&(next_number, next)) = lines.get(i + 1) {
                self.check_indent_after(line, next_number, next);
            }
        }
    }

    /// K100
    fn check_entry_point(&mut self) {
        let text = self.source.source;
        if text.trim().is_empty() || parse_program(text).contains(ENTRY_POINT) {
            return;
        }
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticCode::MISSING_MAIN,
                "main() is not defined",
                Some(1),
            )
            .with_suggestion("def main():"),
        );
    }

    /// K101
    fn check_parens(&mut self) {
        let balance = self.source.source.chars().fold(0i64, |n, c| match c {
            '(' => n + 1,
            ')' => n - 1,
            _ => n,
        });
        if balance != 0 {
            let message = if balance > 0 {
                format!("{balance} unclosed parenthesis(es)")
            } else {
                format!("{} unmatched closing parenthesis(es)", -balance)
            };
            self.diagnostics.push(Diagnostic::new(
                DiagnosticCode::UNBALANCED_PARENS,
                message,
                None,
            ));
        }
    }

    /// K102
    fn check_bare_names(&mut self, number: u32, line: &str) {
        let trimmed = line.trim();
        if trimmed.starts_with('#') {
            return;
        }
        for name in KAREL_VOCABULARY {
            if mentioned_without_call(trimmed, name) {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::CALL_WITHOUT_PARENS,
                        format!("`{name}` must be called with parentheses"),
                        Some(number),
                    )
                    .with_suggestion(format!("{name}()")),
                );
            }
        }
    }

    /// K103, reported on the line that should have been indented.
    fn check_indent_after(&mut self, line: &str, next_number: u32, next: &str) {
        if !is_block_header(line.trim()) || next.trim().is_empty() {
            return;
        }
        if !next.starts_with(' ') && !next.starts_with('\t') {
            self.diagnostics.push(Diagnostic::new(
                DiagnosticCode::EXPECTED_INDENT,
                "expected an indented block",
                Some(next_number),
            ));
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Line helpers
// ══════════════════════════════════════════════════════════════════════════════

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// `name` occurs as a whole word and is not followed by `(`.
fn mentioned_without_call(line: &str, name: &str) -> bool {
    line.match_indices(name).any(|(at, _)| {
        let before = line[..at].chars().next_back();
        let after = &line[at + name.len()..];
        let whole_word =
            !before.is_some_and(is_word_char) && !after.chars().next().is_some_and(is_word_char);
        whole_word && !after.trim_start().starts_with('(')
    })
}

/// `def`/`if`/`while`/`elif`/`else` followed by a colon somewhere on the line.
fn is_block_header(trimmed: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|kw| {
        let Some(rest) = trimmed.strip_prefix(kw) else {
            return false;
        };
        let spaced = rest.starts_with(char::is_whitespace) && rest.contains(':');
        spaced || (*kw == "else" && rest.trim_start().starts_with(':'))
    })
}
