//! # Label Templates
//!
//! The fixed set of label templates, each declaring its output kind and
//! configurable options. Templates are a closed enum rather than trait
//! objects: every variant carries a static descriptor and the layout and
//! render stages dispatch on the variant.
//!
//! Option resolution is deliberately permissive: missing options take their
//! declared default, unknown option keys are ignored, and out-of-domain
//! values fall back to the default instead of failing the request. A
//! mistyped form value must never break printing.

pub mod avery5163;
pub mod ptouch;

use std::collections::{BTreeMap, HashMap};

use crate::error::LabelError;

/// What shape of output a template produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Multi-page paginated document (PDF)
    Document,
    /// Collection of individually sized label images (ZIP of PNGs)
    ImageBundle,
}

impl OutputKind {
    pub fn mime(&self) -> &'static str {
        match self {
            OutputKind::Document => "application/pdf",
            OutputKind::ImageBundle => "application/zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            OutputKind::Document => "pdf",
            OutputKind::ImageBundle => "zip",
        }
    }
}

/// Allowed values for one template option.
#[derive(Debug, Clone, Copy)]
pub enum OptionDomain {
    /// One of a fixed set of strings
    Choice(&'static [&'static str]),
    /// An integer count within an inclusive range
    Count { min: u32, max: u32 },
}

/// One configurable option exposed by a template.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub name: &'static str,
    pub domain: OptionDomain,
    pub default: &'static str,
}

impl OptionSpec {
    /// Resolve a caller-supplied raw value against this spec.
    ///
    /// Anything outside the declared domain silently becomes the default.
    fn resolve(&self, raw: Option<&str>) -> OptionValue {
        let raw = raw.map(str::trim).filter(|v| !v.is_empty());
        match self.domain {
            OptionDomain::Choice(allowed) => {
                let picked = raw
                    .and_then(|v| {
                        allowed.iter().find(|candidate| candidate.eq_ignore_ascii_case(v))
                    })
                    .copied();
                if picked.is_none() && raw.is_some() {
                    tracing::debug!(
                        option = self.name,
                        value = raw,
                        "option value outside allowed set, using default"
                    );
                }
                OptionValue::Choice(picked.unwrap_or(self.default))
            }
            OptionDomain::Count { min, max } => {
                let parsed = raw.and_then(|v| v.parse::<u32>().ok()).filter(|n| (min..=max).contains(n));
                if parsed.is_none() && raw.is_some() {
                    tracing::debug!(
                        option = self.name,
                        value = raw,
                        "option value outside {min}..={max}, using default"
                    );
                }
                OptionValue::Count(
                    parsed.unwrap_or_else(|| self.default.parse().expect("valid default count")),
                )
            }
        }
    }
}

/// A resolved option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionValue {
    Choice(&'static str),
    Count(u32),
}

/// Fully resolved options for one render request: total over the selected
/// template's declared option set.
#[derive(Debug, Clone)]
pub struct OptionValues {
    values: BTreeMap<&'static str, OptionValue>,
}

impl OptionValues {
    /// Look up a choice option. Panics on a name the template never
    /// declared; callers only ask for declared options.
    pub fn choice(&self, name: &str) -> &'static str {
        match self.values.get(name) {
            Some(OptionValue::Choice(v)) => v,
            _ => panic!("undeclared choice option '{name}'"),
        }
    }

    /// Look up a count option.
    pub fn count(&self, name: &str) -> u32 {
        match self.values.get(name) {
            Some(OptionValue::Count(n)) => *n,
            _ => panic!("undeclared count option '{name}'"),
        }
    }
}

/// Static metadata for one template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateDescriptor {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: OutputKind,
    pub options: &'static [OptionSpec],
}

/// The closed set of supported templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Avery 5163 sheet: US letter, 2x5 grid of 4"x2" labels
    Avery5163,
    /// Brother P-Touch 24mm continuous tape, one PNG per label
    PTouch24,
}

impl Template {
    pub const ALL: [Template; 2] = [Template::Avery5163, Template::PTouch24];

    /// Look up a template by key (case-insensitive).
    pub fn lookup(key: &str) -> Result<Template, LabelError> {
        let wanted = key.trim().to_ascii_lowercase();
        Template::ALL
            .iter()
            .find(|template| template.key() == wanted)
            .copied()
            .ok_or_else(|| LabelError::TemplateNotFound {
                requested: key.to_string(),
                available: Template::ALL
                    .iter()
                    .map(|t| t.key())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }

    pub fn descriptor(&self) -> &'static TemplateDescriptor {
        match self {
            Template::Avery5163 => &avery5163::DESCRIPTOR,
            Template::PTouch24 => &ptouch::DESCRIPTOR,
        }
    }

    pub fn key(&self) -> &'static str {
        self.descriptor().key
    }

    pub fn kind(&self) -> OutputKind {
        self.descriptor().kind
    }

    /// The user-tunable options this template supports, for choosers.
    pub fn available_options(&self) -> &'static [OptionSpec] {
        self.descriptor().options
    }

    /// Resolve caller-supplied raw option strings into a total mapping.
    ///
    /// Unknown keys in `input` are ignored for forward compatibility.
    pub fn resolve_options(&self, input: &HashMap<String, String>) -> OptionValues {
        let values = self
            .descriptor()
            .options
            .iter()
            .map(|spec| {
                let raw = input.get(spec.name).map(String::as_str);
                (spec.name, spec.resolve(raw))
            })
            .collect();
        OptionValues { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_lookup_known_keys() {
        assert_eq!(Template::lookup("avery5163").unwrap(), Template::Avery5163);
        assert_eq!(Template::lookup("PTOUCH").unwrap(), Template::PTouch24);
    }

    #[test]
    fn test_lookup_unknown_key() {
        let err = Template::lookup("dymo").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dymo"));
        assert!(message.contains("avery5163"));
        assert!(message.contains("ptouch"));
    }

    #[test]
    fn test_missing_options_take_defaults() {
        let options = Template::Avery5163.resolve_options(&HashMap::new());
        assert_eq!(options.choice("orientation"), "horizontal");
        assert_eq!(options.count("copies"), 1);
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let options = Template::Avery5163
            .resolve_options(&input(&[("orientation", "diagonal"), ("copies", "99")]));
        assert_eq!(options.choice("orientation"), "horizontal");
        assert_eq!(options.count("copies"), 1);
    }

    #[test]
    fn test_unknown_option_keys_are_ignored() {
        let options =
            Template::PTouch24.resolve_options(&input(&[("made_up", "x"), ("detail", "minimal")]));
        assert_eq!(options.choice("detail"), "minimal");
    }

    #[test]
    fn test_choice_values_are_case_insensitive() {
        let options =
            Template::Avery5163.resolve_options(&input(&[("orientation", "Vertical")]));
        assert_eq!(options.choice("orientation"), "vertical");
    }

    #[test]
    fn test_count_parse_garbage_falls_back() {
        let options = Template::Avery5163.resolve_options(&input(&[("copies", "two")]));
        assert_eq!(options.count("copies"), 1);
    }
}
