//! Boilerplate paragraph removal.
//!
//! Press releases carry a predictable tail of legal and promotional text:
//! safe-harbor disclaimers, conference call notices, "About the Company"
//! blurbs, contact numbers, leftover table headers. The filter drops every
//! paragraph that a [`NoiseRule`] fires on, then checks that enough text
//! survived. If the rules erased more than `1 - trim_limit` of the input, the
//! input is returned untouched.

use regex::Regex;

use crate::error::{Error, Result};
use crate::patterns::NOISE_RULES;

/// Separator between paragraphs in extracted text.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// A named boilerplate predicate evaluated against a whole paragraph.
#[derive(Debug, Clone)]
pub struct NoiseRule {
    name: String,
    description: String,
    pattern: Regex,
}

impl NoiseRule {
    /// Compile a rule. Flags belong in the pattern (`(?ims)` etc.).
    pub fn new(name: &str, description: &str, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            name: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            pattern,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the rule fires on `block`. A firing rule drops the whole block.
    #[must_use]
    pub fn matches(&self, block: &str) -> bool {
        self.pattern.is_match(block)
    }
}

/// A paragraph removed by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedBlock {
    /// Position of the block in the input.
    pub index: usize,
    /// First rule (in evaluation order) that fired.
    pub rule: String,
}

/// Detailed result of a filter pass.
#[derive(Debug, Clone, Default)]
pub struct FilterReport {
    /// Output text: the candidate, or the input when `reverted`.
    pub text: String,
    pub dropped: Vec<DroppedBlock>,
    /// True when the candidate fell under the trim limit and was discarded.
    pub reverted: bool,
}

/// Ordered rule battery plus the trim-limit safeguard.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    rules: Vec<NoiseRule>,
    trim_limit: f64,
}

impl NoiseFilter {
    /// Filter with the default rule battery.
    #[must_use]
    pub fn new(trim_limit: f64) -> Self {
        Self::with_rules(NOISE_RULES.clone(), trim_limit)
    }

    #[must_use]
    pub fn with_rules(rules: Vec<NoiseRule>, trim_limit: f64) -> Self {
        Self { rules, trim_limit }
    }

    pub fn push_rule(&mut self, rule: NoiseRule) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn rules(&self) -> &[NoiseRule] {
        &self.rules
    }

    #[must_use]
    pub fn trim_limit(&self) -> f64 {
        self.trim_limit
    }

    /// Name of the first rule firing on `block`, if any.
    #[must_use]
    pub fn first_match(&self, block: &str) -> Option<&NoiseRule> {
        self.rules.iter().find(|rule| rule.matches(block))
    }

    /// Remove noise paragraphs from `text`.
    #[must_use]
    pub fn filter(&self, text: &str) -> String {
        self.filter_detailed(text).text
    }

    /// Like [`filter`](Self::filter), also reporting what was dropped and why.
    #[must_use]
    pub fn filter_detailed(&self, text: &str) -> FilterReport {
        let original_len = text.chars().count();
        if original_len == 0 {
            return FilterReport::default();
        }

        let mut kept = Vec::new();
        let mut dropped = Vec::new();
        for (index, block) in text.split(BLOCK_SEPARATOR).enumerate() {
            // Blank blocks come from runs of separators; they carry nothing.
            if block.trim().is_empty() {
                continue;
            }
            match self.first_match(block) {
                Some(rule) => {
                    log::debug!("noise rule {} dropped block {index}", rule.name());
                    dropped.push(DroppedBlock {
                        index,
                        rule: rule.name().to_string(),
                    });
                }
                None => kept.push(block),
            }
        }

        let candidate = kept.join(BLOCK_SEPARATOR);
        let retained = candidate.chars().count() as f64 / original_len as f64;
        if retained < self.trim_limit {
            log::debug!(
                "noise filter kept {retained:.3} of input, below trim limit {}; reverting",
                self.trim_limit
            );
            return FilterReport {
                text: text.to_string(),
                dropped,
                reverted: true,
            };
        }

        FilterReport {
            text: candidate,
            dropped,
            reverted: false,
        }
    }
}

impl Default for NoiseFilter {
    fn default() -> Self {
        Self::new(0.05)
    }
}
