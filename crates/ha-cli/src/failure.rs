//! Maps pipeline errors to the message printed before exiting.

use ha_core::{ErrorCategory, LoadError};

/// Headline and remediation hint for one failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guidance {
    pub headline: &'static str,
    pub hint: Option<&'static str>,
}

const fn guidance(category: ErrorCategory) -> Guidance {
    let (headline, hint) = match category {
        ErrorCategory::FileAccess => (
            "File Error",
            "Check that the input files exist and paths are correct.",
        ),
        ErrorCategory::MalformedData => (
            "Malformed JSON",
            "The input file is not valid JSON. Check for trailing commas or unbalanced brackets.",
        ),
        ErrorCategory::Structure => (
            "Data Structure Error",
            "Sleep data must contain a 'records' list, workout data must contain a 'workout_log' list.",
        ),
        ErrorCategory::MissingFields => (
            "Missing Fields",
            "Every record must carry all required fields.",
        ),
        ErrorCategory::TimestampFormat => (
            "Timestamp Format Error",
            "Sleep times are RFC 3339 with seconds and an offset, workout times are 'YYYY-MM-DD HH:MM:SS'.",
        ),
        ErrorCategory::TimezoneResolution => (
            "Timezone Error",
            "Use an IANA timezone identifier such as 'America/New_York'.",
        ),
        ErrorCategory::RangeValidation => (
            "Data Validation Error",
            "Check your input data for out-of-range or non-numeric values.",
        ),
    };
    Guidance {
        headline,
        hint: Some(hint),
    }
}

const UNEXPECTED: Guidance = Guidance {
    headline: "Unexpected error",
    hint: None,
};

fn find_load_error(err: &anyhow::Error) -> Option<&LoadError> {
    err.chain().find_map(|cause| cause.downcast_ref::<LoadError>())
}

/// Picks guidance for an error, looking through its context chain.
pub fn classify(err: &anyhow::Error) -> Guidance {
    find_load_error(err).map_or(UNEXPECTED, |load| guidance(load.category()))
}

/// Renders the stderr message for a failed run.
///
/// Load errors already embed their cause, so only the load error itself is
/// shown for them.
pub fn render(err: &anyhow::Error) -> String {
    let guidance = classify(err);
    let detail = find_load_error(err).map_or_else(|| format!("{err:#}"), ToString::to_string);
    let mut message = format!("{}: {detail}", guidance.headline);
    if let Some(hint) = guidance.hint {
        message.push_str("\n   ");
        message.push_str(hint);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use ha_core::{Dataset, RecordError};

    fn record_error(source: RecordError) -> anyhow::Error {
        LoadError::Record {
            dataset: Dataset::Workout,
            index: 2,
            source,
        }
        .into()
    }

    #[test]
    fn test_timezone_failure_gets_its_own_headline() {
        let err = record_error(RecordError::TimezoneResolution {
            zone: "Mars/Phobos".into(),
        });
        assert_eq!(classify(&err).headline, "Timezone Error");
        let rendered = render(&err);
        assert!(rendered.starts_with("Timezone Error: error processing workout record 2: invalid timezone 'Mars/Phobos'"));
        assert!(rendered.ends_with("Use an IANA timezone identifier such as 'America/New_York'."));
    }

    #[test]
    fn test_every_category_has_distinct_headline() {
        let categories = [
            ErrorCategory::FileAccess,
            ErrorCategory::MalformedData,
            ErrorCategory::Structure,
            ErrorCategory::MissingFields,
            ErrorCategory::TimestampFormat,
            ErrorCategory::TimezoneResolution,
            ErrorCategory::RangeValidation,
        ];
        let mut headlines: Vec<_> = categories.iter().map(|c| guidance(*c).headline).collect();
        headlines.sort_unstable();
        headlines.dedup();
        assert_eq!(headlines.len(), categories.len());
    }

    #[test]
    fn test_load_error_found_behind_context() {
        let err = Err::<(), _>(LoadError::Structure {
            dataset: Dataset::Sleep,
            message: "must contain 'records' key".into(),
        })
        .context("loading inputs")
        .unwrap_err();
        assert_eq!(classify(&err).headline, "Data Structure Error");
    }

    #[test]
    fn test_other_errors_are_unexpected() {
        let err = anyhow::anyhow!("disk full");
        assert_eq!(classify(&err), UNEXPECTED);
        assert_eq!(render(&err), "Unexpected error: disk full");
    }
}
