//! Findings gathered while validating and clearing a network.
//!
//! Nothing here prints. Validation, the formulator and the engine push issues
//! into a [`Diagnostics`] that travels back in the clearing report; the engine
//! also mirrors them to `tracing`.
//!
//! ```
//! use gridclear_core::diagnostics::Diagnostics;
//!
//! let mut diag = Diagnostics::new();
//! diag.add_warning("capacity", "Offered capacity covers 80% of demand");
//! diag.add_error_with_entity("reference", "Load connected to non-existent node N9", "D4");
//!
//! assert!(diag.has_errors());
//! assert_eq!(diag.summary(), "1 warning, 1 error");
//! ```

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Clearing can go ahead
    Warning,
    /// Clearing must not go ahead
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Grouping key: "structure", "reference", "limits", "topology", "capacity",
    /// "bids" or "solver"
    pub category: String,
    pub message: String,
    /// Id of the offending node, generator, load or line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.severity, self.category, self.message)?;
        match &self.entity {
            Some(entity) => write!(f, " ({entity})"),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, issue: DiagnosticIssue) {
        self.issues.push(issue);
    }

    fn push(&mut self, severity: Severity, category: &str, message: &str, entity: Option<&str>) {
        let mut issue = DiagnosticIssue::new(severity, category, message);
        issue.entity = entity.map(str::to_string);
        self.issues.push(issue);
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.push(Severity::Warning, category, message, None);
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.push(Severity::Warning, category, message, Some(entity));
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.push(Severity::Error, category, message, None);
    }

    pub fn add_error_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.push(Severity::Error, category, message, Some(entity));
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.with_severity(Severity::Warning)
    }

    pub fn errors(&self) -> impl Iterator<Item = &DiagnosticIssue> {
        self.with_severity(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> + 'a {
        self.issues.iter().filter(move |i| i.category == category)
    }

    /// "No issues", "2 warnings", "1 warning, 3 errors"
    pub fn summary(&self) -> String {
        let parts: Vec<String> = [
            (self.warning_count(), "warning"),
            (self.error_count(), "error"),
        ]
        .into_iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, noun)| format!("{n} {noun}{}", if n == 1 { "" } else { "s" }))
        .collect();
        if parts.is_empty() {
            "No issues".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {issue}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_findings() -> Diagnostics {
        let mut diag = Diagnostics::new();
        diag.add_warning("topology", "Network has 2 islands");
        diag.add_warning_with_entity("topology", "Line connects node to itself", "L33");
        diag.add_error_with_entity("reference", "Generator connected to non-existent node N9", "G9");
        diag
    }

    #[test]
    fn counts_by_severity() {
        let diag = validation_findings();
        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
        assert!(diag.has_errors() && diag.has_warnings());
        assert_eq!(diag.issues_by_category("topology").count(), 2);
        assert!(!Diagnostics::new().has_issues());
    }

    #[test]
    fn summary_pluralizes() {
        let mut diag = Diagnostics::new();
        assert_eq!(diag.summary(), "No issues");
        diag.add_error("structure", "No generators defined in network");
        assert_eq!(diag.summary(), "1 error");
        assert_eq!(validation_findings().summary(), "2 warnings, 1 error");
    }

    #[test]
    fn issue_display_includes_entity() {
        let issue = DiagnosticIssue::new(Severity::Warning, "solver", "LP infeasible");
        assert_eq!(issue.to_string(), "[warning:solver] LP infeasible");
        let issue = issue.with_entity("H07");
        assert_eq!(issue.to_string(), "[warning:solver] LP infeasible (H07)");
    }

    #[test]
    fn serializes_lowercase_severity() {
        let json = serde_json::to_value(validation_findings()).unwrap();
        assert_eq!(json["issues"][2]["severity"], "error");
        assert_eq!(json["issues"][2]["entity"], "G9");
        assert!(json["issues"][0].get("entity").is_none());
        let empty = serde_json::to_string(&Diagnostics::new()).unwrap();
        assert_eq!(empty, "{}");
    }
}
