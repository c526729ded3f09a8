// Prometheus-style duration strings ("30s", "1h30m", "500ms")
use super::error::DurationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;
const MS_PER_YEAR: u64 = 365 * MS_PER_DAY;

/// Formatting order, largest first. Weeks are only used when exact.
const FORMAT_UNITS: [(&str, u64, bool); 7] = [
    ("y", MS_PER_YEAR, false),
    ("w", MS_PER_WEEK, true),
    ("d", MS_PER_DAY, false),
    ("h", MS_PER_HOUR, false),
    ("m", MS_PER_MINUTE, false),
    ("s", MS_PER_SECOND, false),
    ("ms", 1, false),
];

fn unit_millis(unit: &str) -> Option<u64> {
    match unit {
        "ms" => Some(1),
        "s" => Some(MS_PER_SECOND),
        "m" => Some(MS_PER_MINUTE),
        "h" => Some(MS_PER_HOUR),
        "d" => Some(MS_PER_DAY),
        "w" => Some(MS_PER_WEEK),
        "y" => Some(MS_PER_YEAR),
        _ => None,
    }
}

/// A non-negative duration with millisecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PromDuration(u64);

impl PromDuration {
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * MS_PER_SECOND)
    }

    pub const fn from_mins(mins: u64) -> Self {
        Self(mins * MS_PER_MINUTE)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * MS_PER_HOUR)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PromDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ms = self.as_millis();
        if ms == 0 {
            return f.write_str("0s");
        }

        for (unit, mult, exact) in FORMAT_UNITS {
            if exact && ms % mult != 0 {
                continue;
            }
            let value = ms / mult;
            if value > 0 {
                write!(f, "{}{}", value, unit)?;
                ms -= value * mult;
            }
        }

        Ok(())
    }
}

impl Serialize for PromDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PromDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match parse(&raw) {
            Ok(Some(duration)) => Ok(duration),
            Ok(None) => Err(serde::de::Error::custom("duration must not be empty")),
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

/// Parse a duration string. An empty (or all-whitespace) input means "unset"
/// and yields `Ok(None)`.
///
/// Grammar: one or more `<integer><unit>` segments, unit one of
/// `ms`, `s`, `m`, `h`, `d`, `w`, `y`.
pub fn parse(input: &str) -> Result<Option<PromDuration>, DurationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let mut total: u64 = 0;
    let mut rest = trimmed;

    while !rest.is_empty() {
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(DurationError::InvalidToken {
                token: rest.to_string(),
            });
        }
        let (number, after) = rest.split_at(digits);

        let unit_len = after.bytes().take_while(u8::is_ascii_alphabetic).count();
        if unit_len == 0 {
            return Err(if after.is_empty() {
                DurationError::MissingUnit {
                    token: number.to_string(),
                }
            } else {
                DurationError::InvalidToken {
                    token: after.to_string(),
                }
            });
        }
        let (unit, remainder) = after.split_at(unit_len);

        let mult = unit_millis(unit).ok_or_else(|| DurationError::UnknownUnit {
            unit: unit.to_string(),
        })?;

        let overflow = || DurationError::Overflow {
            token: format!("{}{}", number, unit),
        };
        let value: u64 = number.parse().map_err(|_| overflow())?;
        let segment = value.checked_mul(mult).ok_or_else(overflow)?;
        total = total.checked_add(segment).ok_or_else(overflow)?;

        rest = remainder;
    }

    Ok(Some(PromDuration::from_millis(total)))
}

/// Validate a duration field value without keeping the parsed result.
pub fn validate(input: &str) -> Result<(), DurationError> {
    parse(input).map(|_| ())
}

/// The three timing fields of a routing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationField {
    GroupWait,
    GroupInterval,
    RepeatInterval,
}

impl DurationField {
    pub const ALL: [DurationField; 3] = [
        DurationField::GroupWait,
        DurationField::GroupInterval,
        DurationField::RepeatInterval,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DurationField::GroupWait => "group_wait",
            DurationField::GroupInterval => "group_interval",
            DurationField::RepeatInterval => "repeat_interval",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DurationField::GroupWait => "Group wait",
            DurationField::GroupInterval => "Group interval",
            DurationField::RepeatInterval => "Repeat interval",
        }
    }

    /// System default used when the field is left unset.
    pub fn default_duration(&self) -> PromDuration {
        match self {
            DurationField::GroupWait => PromDuration::from_secs(30),
            DurationField::GroupInterval => PromDuration::from_mins(5),
            DurationField::RepeatInterval => PromDuration::from_hours(4),
        }
    }
}

impl fmt::Display for DurationField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_units() {
        assert_eq!(parse("30s").unwrap(), Some(PromDuration::from_secs(30)));
        assert_eq!(parse("5m").unwrap(), Some(PromDuration::from_mins(5)));
        assert_eq!(parse("4h").unwrap(), Some(PromDuration::from_hours(4)));
        assert_eq!(parse("250ms").unwrap().map(|d| d.as_millis()), Some(250));
        assert_eq!(parse("1w").unwrap(), Some(PromDuration::from_millis(MS_PER_WEEK)));
        assert_eq!(parse("1y").unwrap(), Some(PromDuration::from_millis(MS_PER_YEAR)));
    }

    #[test]
    fn test_parse_concatenated_segments() {
        assert_eq!(
            parse("1h30m").unwrap(),
            Some(PromDuration::from_mins(90))
        );
        assert_eq!(
            parse("1m500ms").unwrap(),
            Some(PromDuration::from_millis(60_500))
        );
    }

    #[test]
    fn test_empty_is_unset() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   ").unwrap(), None);
        assert!(validate("").is_ok());
    }

    #[test]
    fn test_unknown_unit_is_named() {
        let err = validate("30x").unwrap_err();
        assert_eq!(
            err,
            DurationError::UnknownUnit {
                unit: "x".to_string()
            }
        );
        assert!(err.to_string().contains("\"x\""));
    }

    #[test]
    fn test_negative_rejected() {
        let err = validate("-5s").unwrap_err();
        assert_eq!(
            err,
            DurationError::InvalidToken {
                token: "-5s".to_string()
            }
        );
    }

    #[test]
    fn test_missing_unit_and_garbage() {
        assert_eq!(
            validate("30").unwrap_err(),
            DurationError::MissingUnit {
                token: "30".to_string()
            }
        );
        assert_eq!(
            validate("1h30").unwrap_err(),
            DurationError::MissingUnit {
                token: "30".to_string()
            }
        );
        assert_eq!(
            validate("1.5h").unwrap_err(),
            DurationError::InvalidToken {
                token: ".5h".to_string()
            }
        );
    }

    #[test]
    fn test_overflow_rejected() {
        let err = validate("99999999999999999999y").unwrap_err();
        assert!(matches!(err, DurationError::Overflow { .. }));
    }

    #[test]
    fn test_canonical_format() {
        assert_eq!(PromDuration::from_secs(30).to_string(), "30s");
        assert_eq!(PromDuration::from_secs(90).to_string(), "1m30s");
        assert_eq!(PromDuration::from_millis(0).to_string(), "0s");
        assert_eq!(PromDuration::from_millis(1_500).to_string(), "1s500ms");
        assert_eq!(PromDuration::from_millis(14 * MS_PER_DAY).to_string(), "2w");
        assert_eq!(PromDuration::from_millis(10 * MS_PER_DAY).to_string(), "10d");
    }

    #[test]
    fn test_format_parses_back() {
        for ms in [1, 999, 61_001, MS_PER_DAY * 10 + 7, MS_PER_YEAR + MS_PER_WEEK * 2] {
            let d = PromDuration::from_millis(ms);
            assert_eq!(parse(&d.to_string()).unwrap(), Some(d));
        }
    }

    #[test]
    fn test_field_defaults() {
        assert_eq!(DurationField::GroupWait.default_duration().to_string(), "30s");
        assert_eq!(DurationField::GroupInterval.default_duration().to_string(), "5m");
        assert_eq!(DurationField::RepeatInterval.default_duration().to_string(), "4h");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&PromDuration::from_mins(5)).unwrap();
        assert_eq!(json, "\"5m\"");
        let back: PromDuration = serde_json::from_str("\"1h30m\"").unwrap();
        assert_eq!(back, PromDuration::from_mins(90));
        assert!(serde_json::from_str::<PromDuration>("\"\"").is_err());
    }
}
