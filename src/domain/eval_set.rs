// ============================================================
// Layer 3 — Evaluation Set Specification
// ============================================================
// An evaluation set is a named slice of the test split that
// keeps only some classes. Drift is monitored by evaluating
// the same model on several of these every epoch, e.g.
//
//   catdog=3,5            → only cats and dogs
//   other8=0,1,2,4,6,7,8,9 → everything else
//
// The textual form `name=c1,c2,...` is what the CLI accepts,
// so EvalSetSpec implements FromStr and clap parses it for us.

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalSetSpec {
    pub name:    String,
    pub classes: Vec<usize>,
}

impl EvalSetSpec {
    pub fn new(name: impl Into<String>, classes: Vec<usize>) -> Self {
        Self { name: name.into(), classes }
    }

    pub fn contains(&self, label: usize) -> bool {
        self.classes.contains(&label)
    }

    /// Errors if any class is outside [0, num_classes)
    pub fn validate(&self, num_classes: usize) -> Result<()> {
        if let Some(bad) = self.classes.iter().find(|&&c| c >= num_classes) {
            bail!(
                "Evaluation set '{}' names class {} but the model has only {} classes",
                self.name, bad, num_classes
            );
        }
        Ok(())
    }
}

impl FromStr for EvalSetSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, classes) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=C1,C2,... but got '{s}'"))?;

        let name = name.trim();
        if name.is_empty() {
            bail!("evaluation set name is empty in '{s}'");
        }

        let mut parsed = Vec::new();
        for part in classes.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let class = part
                .parse::<usize>()
                .map_err(|e| anyhow!("bad class index '{part}' in '{s}': {e}"))?;
            if !parsed.contains(&class) {
                parsed.push(class);
            }
        }
        if parsed.is_empty() {
            bail!("evaluation set '{name}' lists no classes");
        }

        Ok(Self::new(name, parsed))
    }
}

impl fmt::Display for EvalSetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let classes: Vec<String> = self.classes.iter().map(|c| c.to_string()).collect();
        write!(f, "{}={}", self.name, classes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_name_and_classes() {
        let spec: EvalSetSpec = "catdog=3, 5".parse().unwrap();
        assert_eq!(spec.name, "catdog");
        assert_eq!(spec.classes, vec![3, 5]);
        assert!(spec.contains(5));
        assert!(!spec.contains(4));
    }

    #[test]
    fn test_duplicate_classes_collapse() {
        let spec: EvalSetSpec = "x=1,1,2".parse().unwrap();
        assert_eq!(spec.classes, vec![1, 2]);
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let spec = EvalSetSpec::new("other", vec![0, 1, 2]);
        assert_eq!(spec.to_string(), "other=0,1,2");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!("catdog".parse::<EvalSetSpec>().is_err());
        assert!("=1,2".parse::<EvalSetSpec>().is_err());
        assert!("empty=".parse::<EvalSetSpec>().is_err());
        assert!("bad=1,x".parse::<EvalSetSpec>().is_err());
    }

    #[test]
    fn test_validate_against_class_count() {
        let spec = EvalSetSpec::new("s", vec![0, 9]);
        assert!(spec.validate(10).is_ok());
        assert!(spec.validate(9).is_err());
    }
}
