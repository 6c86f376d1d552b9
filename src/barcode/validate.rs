// フィールド制約テーブルとバリデータ
//
// Each constrained field has one or more rules in `RULES`. The validator
// interprets the table; there is no per-field validation code elsewhere.

use std::collections::BTreeMap;

use crate::barcode::field::Field;
use crate::barcode::options::BarcodeOptions;
use crate::barcode::xdim::XDIM_RE;

/// A declarative field constraint.
#[derive(Debug, Clone, Copy)]
pub enum Constraint {
    /// Inclusive numeric range, checked only when the value is present.
    Range {
        min: f64,
        max: f64,
        message: Option<&'static str>,
    },
    /// Maximum length in characters.
    MaxLength(usize),
    /// Exactly one of this field and the other must be non-blank.
    OneOfRequired(Field),
    /// Must match the regex when present and non-blank.
    Pattern {
        regex: &'static std::sync::LazyLock<regex::Regex>,
        message: &'static str,
    },
    /// Must be one of the listed values when present.
    OneOf {
        values: &'static [i32],
        message: &'static str,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub constraint: Constraint,
}

const fn range(field: Field, min: f64, max: f64) -> FieldRule {
    FieldRule {
        field,
        constraint: Constraint::Range {
            min,
            max,
            message: None,
        },
    }
}

const fn range_msg(field: Field, min: f64, max: f64, message: &'static str) -> FieldRule {
    FieldRule {
        field,
        constraint: Constraint::Range {
            min,
            max,
            message: Some(message),
        },
    }
}

const fn max_len(field: Field, n: usize) -> FieldRule {
    FieldRule {
        field,
        constraint: Constraint::MaxLength(n),
    }
}

pub const ONE_OF_REQUIRED_MESSAGE: &str = "Either data or input_path must be provided.";
pub const ONLY_ONE_ALLOWED_MESSAGE: &str = "Only one of data or input_path may be provided.";

/// 全フィールドの制約。
pub static RULES: &[FieldRule] = &[
    FieldRule {
        field: Field::Data,
        constraint: Constraint::OneOfRequired(Field::InputPath),
    },
    max_len(Field::Data, 8192),
    FieldRule {
        field: Field::InputPath,
        constraint: Constraint::OneOfRequired(Field::Data),
    },
    max_len(Field::InputPath, 4096),
    max_len(Field::PrimaryData, 8192),
    max_len(Field::OutputPath, 4096),
    range_msg(Field::Height, 0.01, 10000.0, "Height must be > 0."),
    range_msg(Field::Scale, 0.01, 500.0, "Scale must be > 0."),
    FieldRule {
        field: Field::ScaleXDimDp,
        constraint: Constraint::Pattern {
            regex: &XDIM_RE,
            message: "scale_xdim_dp format: <value>(mm|in),<res>(dpi|dpmm) e.g. 0.33mm,300dpi or 0.33mm,11.8dpmm",
        },
    },
    range(Field::BorderWidth, 0.0, 500.0),
    range(Field::Whitespace, 0.0, 2000.0),
    range(Field::VerticalWhitespace, 0.0, 2000.0),
    FieldRule {
        field: Field::RotationAngle,
        constraint: Constraint::OneOf {
            values: &[0, 90, 180, 270],
            message: "RotationAngle must be 0, 90, 180, or 270.",
        },
    },
    range_msg(Field::DotSize, 0.01, 20.0, "DotSize 0.01–20."),
    range_msg(Field::TextGap, -5.0, 10.0, "TextGap -5.0–10.0."),
    range_msg(Field::AddOnGap, 7.0, 12.0, "AddOnGap 7–12."),
    range(Field::GuardDescent, 0.0, 50.0),
    range(Field::Eci, 0.0, 999_999.0),
    range_msg(Field::Version, 1.0, 200.0, "Version 1–200."),
    range_msg(
        Field::SecurityLevel,
        0.0,
        20.0,
        "SecurityLevel 0–20 (PDF417 typically 0–8).",
    ),
    range_msg(Field::Mask, 0.0, 15.0, "Mask 0–15."),
    range_msg(Field::Scmvv, 0.0, 99.0, "Scmvv 0–99."),
    range(Field::Mode, 0.0, 50.0),
    range(Field::Columns, 1.0, 99.0),
    range(Field::Rows, 1.0, 99.0),
    range(Field::SeparatorHeight, 0.0, 50.0),
    max_len(Field::AdvancedOptions, 2048),
];

/// 制約を持つフィールドか。
pub fn is_validated(field: Field) -> bool {
    RULES.iter().any(|r| r.field == field)
}

/// 変更時に一緒に再検証するフィールド（one-of-required の相手）。
pub fn associated(field: Field) -> impl Iterator<Item = Field> {
    RULES.iter().filter_map(move |r| match r.constraint {
        Constraint::OneOfRequired(other) if r.field == field => Some(other),
        _ => None,
    })
}

fn is_blank(s: Option<&str>) -> bool {
    s.is_none_or(|s| s.trim().is_empty())
}

fn format_bound(v: f64) -> String {
    format!("{v}")
}

fn check(options: &BarcodeOptions, rule: &FieldRule) -> Option<String> {
    let field = rule.field;
    match rule.constraint {
        Constraint::Range { min, max, message } => {
            let value = options.numeric(field)?;
            if (min..=max).contains(&value) {
                None
            } else {
                Some(message.map(str::to_string).unwrap_or_else(|| {
                    format!(
                        "{} must be between {} and {}.",
                        field.name(),
                        format_bound(min),
                        format_bound(max)
                    )
                }))
            }
        }
        Constraint::MaxLength(n) => {
            let len = options.text(field)?.chars().count();
            (len > n).then(|| format!("{} must be at most {n} characters.", field.name()))
        }
        Constraint::OneOfRequired(other) => {
            let has_this = !is_blank(options.text(field));
            let has_other = !is_blank(options.text(other));
            match (has_this, has_other) {
                (false, false) => Some(ONE_OF_REQUIRED_MESSAGE.to_string()),
                (true, true) => Some(ONLY_ONE_ALLOWED_MESSAGE.to_string()),
                _ => None,
            }
        }
        Constraint::Pattern { regex, message } => {
            let value = options.text(field)?;
            (!value.trim().is_empty() && !regex.is_match(value)).then(|| message.to_string())
        }
        Constraint::OneOf { values, message } => {
            let value = options.numeric(field)?;
            (!values.iter().any(|&v| f64::from(v) == value)).then(|| message.to_string())
        }
    }
}

/// 1フィールドの全制約を評価し、エラーメッセージを返す（空なら有効）。
pub fn validate_field(options: &BarcodeOptions, field: Field) -> Vec<String> {
    RULES
        .iter()
        .filter(|r| r.field == field)
        .filter_map(|r| check(options, r))
        .collect()
}

/// 全フィールドを評価する。エラーのないフィールドは含まない。
pub fn validate_options(options: &BarcodeOptions) -> BTreeMap<Field, Vec<String>> {
    let mut errors: BTreeMap<Field, Vec<String>> = BTreeMap::new();
    for rule in RULES {
        if let Some(message) = check(options, rule) {
            errors.entry(rule.field).or_default().push(message);
        }
    }
    errors
}
