//! Cross-parameter checks run before any value is read.
//!
//! Every rule is evaluated and every violation collected, so a user fixing an
//! input deck sees all the problems in one pass instead of one per run.

use crate::error::{ParamError, ParamResult};
use crate::parser::ActParser;
use tracing::debug;

/// A declarative relationship between input keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// The two keys are mutually exclusive.
    Conflict(&'static str, &'static str),
    /// `dependent` may only be given together with `independent`.
    DependsOn {
        independent: &'static str,
        dependent: &'static str,
    },
    /// Both keys or neither.
    Together(&'static str, &'static str),
    /// At least one of the keys is required.
    OneOf(&'static [&'static str]),
}

/// Diagnostic buffer collecting violations for one actuator.
#[derive(Debug, Default)]
pub struct ParseDiagnostics {
    label: String,
    violations: Vec<String>,
}

impl ParseDiagnostics {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            violations: Vec::new(),
        }
    }

    pub fn conflict(&mut self, pp: &ActParser, p1: &str, p2: &str) {
        if pp.contains(p1) && pp.contains(p2) {
            self.violations.push(format!(
                "'{p1}' and '{p2}' are mutually exclusive; specify only one"
            ));
        }
    }

    pub fn depends_one_way(&mut self, pp: &ActParser, independent: &str, dependent: &str) {
        if pp.contains(dependent) && !pp.contains(independent) {
            self.violations.push(format!(
                "'{dependent}' requires '{independent}' to also be specified"
            ));
        }
    }

    pub fn depends(&mut self, pp: &ActParser, p1: &str, p2: &str) {
        match (pp.contains(p1), pp.contains(p2)) {
            (true, false) => self.violations.push(format!(
                "'{p1}' and '{p2}' must be specified together ('{p1}' given without '{p2}')"
            )),
            (false, true) => self.violations.push(format!(
                "'{p1}' and '{p2}' must be specified together ('{p2}' given without '{p1}')"
            )),
            _ => {}
        }
    }

    pub fn one_of(&mut self, pp: &ActParser, keys: &[&str]) {
        if !keys.iter().any(|k| pp.contains(k)) {
            let names: Vec<String> = keys.iter().map(|k| format!("'{k}'")).collect();
            self.violations.push(format!(
                "at least one of {} is required",
                names.join(", ")
            ));
        }
    }

    pub fn check(&mut self, pp: &ActParser, rule: &Rule) {
        match *rule {
            Rule::Conflict(p1, p2) => self.conflict(pp, p1, p2),
            Rule::DependsOn {
                independent,
                dependent,
            } => self.depends_one_way(pp, independent, dependent),
            Rule::Together(p1, p2) => self.depends(pp, p1, p2),
            Rule::OneOf(keys) => self.one_of(pp, keys),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[String] {
        &self.violations
    }

    /// Fail with every collected violation, or succeed when there are none.
    pub fn finish(self) -> ParamResult<()> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ParamError::Invalid {
                label: self.label,
                violations: self.violations,
            })
        }
    }
}

/// Evaluate all `rules` against `pp` and report every violation together.
pub fn validate(pp: &ActParser, rules: &[Rule]) -> ParamResult<()> {
    let mut diag = ParseDiagnostics::new(pp.label());
    for rule in rules {
        diag.check(pp, rule);
    }
    debug!(
        label = pp.label(),
        rules = rules.len(),
        violations = diag.violations().len(),
        "validated actuator inputs"
    );
    diag.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;

    fn parser(yaml: &str) -> ActParser {
        let instance: Mapping = serde_yaml::from_str(yaml).unwrap();
        ActParser::new("A1", "UniformCtDisk", instance, None)
    }

    #[test]
    fn clean_input_passes() {
        let pp = parser("disk_normal: [1, 0, 0]\nthrust_coeff: 0.7\nwind_speed: 8.0\n");
        let rules = [
            Rule::Conflict("disk_normal", "yaw"),
            Rule::Together("thrust_coeff", "wind_speed"),
        ];
        assert!(validate(&pp, &rules).is_ok());
    }

    #[test]
    fn conflict_names_both_keys() {
        let pp = parser("disk_normal: [1, 0, 0]\nyaw: 30.0\n");
        let err = validate(&pp, &[Rule::Conflict("disk_normal", "yaw")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("disk_normal"));
        assert!(msg.contains("yaw"));
    }

    #[test]
    fn one_way_dependency() {
        let rule = Rule::DependsOn {
            independent: "yaw",
            dependent: "tilt",
        };
        assert!(validate(&parser("yaw: 10.0\n"), &[rule]).is_ok());
        let err = validate(&parser("tilt: 5.0\n"), &[rule]).unwrap_err();
        assert!(err.to_string().contains("'tilt' requires 'yaw'"));
    }

    #[test]
    fn two_way_dependency_reports_missing_side() {
        let err = validate(
            &parser("wind_speed: [1, 2]\n"),
            &[Rule::Together("thrust_coeff", "wind_speed")],
        )
        .unwrap_err();
        assert!(err.to_string().contains("'wind_speed' given without 'thrust_coeff'"));
    }

    #[test]
    fn one_of_names_every_candidate() {
        let err = validate(&parser("pitch: 4.0\n"), &[Rule::OneOf(&["epsilon", "epsilon_chord"])])
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'epsilon'"));
        assert!(msg.contains("'epsilon_chord'"));
    }

    #[test]
    fn all_violations_are_collected() {
        let pp = parser("disk_normal: [1, 0, 0]\nyaw: 30.0\ntilt: 2.0\nwind_speed: 3.0\n");
        let rules = [
            Rule::Conflict("disk_normal", "yaw"),
            Rule::Conflict("disk_normal", "tilt"),
            Rule::Together("thrust_coeff", "wind_speed"),
        ];
        match validate(&pp, &rules).unwrap_err() {
            ParamError::Invalid { label, violations } => {
                assert_eq!(label, "A1");
                assert_eq!(violations.len(), 3);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
