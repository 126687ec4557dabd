//! Sections and section-level defaulting
//!
//! A section is either taken whole from its declared default (when its key
//! is absent from the raw input) or read field by field. The two defaulting
//! mechanisms never mix within one pass.

use crate::error::FieldError;
use crate::schema::field::FieldSpec;
use crate::schema::kind::Kind;
use crate::schema::raw::{RawConfig, RawSection};
use tracing::debug;

/// A named group of fields that resolves to one typed struct.
///
/// `Default` is the whole-section default: a pre-typed value substituted
/// verbatim when the section key is absent.
pub trait ConfigSection: Default + Sized {
    const NAME: &'static str;

    /// Read every field through `fields`. Returns `None` if any field failed;
    /// the failures themselves are recorded in the reader.
    fn read(fields: &mut FieldReader<'_>) -> Option<Self>;

    /// Fully-typed raw form of this section, every field present
    fn to_raw(&self) -> RawSection;
}

/// Resolves fields of one present section, collecting failures
pub struct FieldReader<'a> {
    section: &'static str,
    raw: &'a RawSection,
    errors: &'a mut Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(section: &'static str, raw: &'a RawSection, errors: &'a mut Vec<FieldError>) -> Self {
        Self {
            section,
            raw,
            errors,
        }
    }

    /// Resolve one field. A failure is recorded and `None` returned, so
    /// callers read every field before combining the results.
    pub fn read<K: Kind>(&mut self, spec: FieldSpec<K>) -> Option<K::Output> {
        let path = format!("{}.{}", self.section, spec.name());
        match spec.resolve(self.raw.get(spec.name()), &path) {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }
}

/// Resolve section `S` from `raw`, appending any failures to `errors`
pub fn resolve_section<S: ConfigSection>(raw: &RawConfig, errors: &mut Vec<FieldError>) -> Option<S> {
    match raw.section(S::NAME) {
        None => {
            debug!(section = S::NAME, "Section absent, applying whole-section default");
            Some(S::default())
        }
        Some(fields) => {
            let before = errors.len();
            let section = S::read(&mut FieldReader::new(S::NAME, fields, errors));
            let failures = errors.len() - before;
            debug_assert!(
                section.is_some() || failures > 0,
                "section {} failed without recording an error",
                S::NAME
            );
            if failures > 0 {
                debug!(section = S::NAME, failures, "Section failed validation");
                return None;
            }
            section
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field;

    #[derive(Debug, PartialEq)]
    struct Sample {
        size: f64,
        label: String,
        flag: bool,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                size: 1.0,
                label: "whole".into(),
                flag: true,
            }
        }
    }

    impl ConfigSection for Sample {
        const NAME: &'static str = "sample";

        fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
            let size = fields.read(field::number("size").default(7.0));
            let label = fields.read(field::string("label"));
            let flag = fields.read(field::boolean("flag").default(false));
            Some(Self {
                size: size?,
                label: label?,
                flag: flag?,
            })
        }

        fn to_raw(&self) -> RawSection {
            RawSection::new()
                .with("size", self.size)
                .with("label", self.label.as_str())
                .with("flag", self.flag)
        }
    }

    #[test]
    fn test_absent_section_uses_whole_default() {
        let mut errors = Vec::new();
        let sample: Sample = resolve_section(&RawConfig::new(), &mut errors).unwrap();
        assert_eq!(sample, Sample::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_present_section_uses_field_defaults() {
        let raw = RawConfig::new().with_section("sample", RawSection::new().with("label", "x"));
        let mut errors = Vec::new();
        let sample: Sample = resolve_section(&raw, &mut errors).unwrap();

        // field defaults, not the whole-section default
        assert_eq!(
            sample,
            Sample {
                size: 7.0,
                label: "x".into(),
                flag: false
            }
        );
    }

    #[test]
    fn test_empty_present_section_reports_required_fields() {
        let raw = RawConfig::new().with_section("sample", RawSection::new());
        let mut errors = Vec::new();
        let sample: Option<Sample> = resolve_section(&raw, &mut errors);

        assert!(sample.is_none());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path(), "sample.label");
    }

    #[test]
    fn test_every_field_failure_is_collected() {
        let raw = RawConfig::new().with_section(
            "sample",
            RawSection::new().with("size", "big").with("flag", "maybe"),
        );
        let mut errors = Vec::new();
        let sample: Option<Sample> = resolve_section(&raw, &mut errors);

        assert!(sample.is_none());
        let paths: Vec<_> = errors.iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["sample.size", "sample.label", "sample.flag"]);
    }

    #[test]
    fn test_to_raw_round_trip() {
        let original = Sample {
            size: 3.5,
            label: "l".into(),
            flag: true,
        };
        let raw = RawConfig::new().with_section("sample", original.to_raw());
        let mut errors = Vec::new();
        let sample: Sample = resolve_section(&raw, &mut errors).unwrap();
        assert_eq!(sample, original);
    }

    #[derive(Default)]
    struct Silent;

    impl ConfigSection for Silent {
        const NAME: &'static str = "silent";

        fn read(_: &mut FieldReader<'_>) -> Option<Self> {
            None
        }

        fn to_raw(&self) -> RawSection {
            RawSection::new()
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "section silent failed without recording an error")]
    fn test_reader_failing_silently_is_caught() {
        let raw = RawConfig::new().with_section("silent", RawSection::new());
        let _ = resolve_section::<Silent>(&raw, &mut Vec::new());
    }
}
