// 設定フィールド名の閉じた集合
//
// Field names are the snake_case keys used in job YAML and by `--set`.

use std::fmt;
use std::str::FromStr;

use crate::error::ZintError;

/// The value shape a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Symbology,
    /// Required string (empty allowed).
    Text,
    OptText,
    OptInt,
    OptFloat,
    Bool,
    /// unset / on / off
    TriState,
    OptColor,
}

macro_rules! fields {
    ($($variant:ident => $name:literal : $kind:ident),* $(,)?) => {
        /// A settable barcode parameter.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Field {
            $($variant,)*
        }

        impl Field {
            pub const ALL: &'static [Field] = &[$(Field::$variant),*];

            pub const fn name(self) -> &'static str {
                match self {
                    $(Field::$variant => $name,)*
                }
            }

            pub const fn kind(self) -> FieldKind {
                match self {
                    $(Field::$variant => FieldKind::$kind,)*
                }
            }
        }
    };
}

fields! {
    Symbology => "symbology": Symbology,
    Data => "data": Text,
    InputPath => "input_path": OptText,
    PrimaryData => "primary_data": OptText,
    OutputPath => "output_path": OptText,

    Height => "height": OptFloat,
    Scale => "scale": OptFloat,
    UseScaleXDimDp => "use_scale_xdim_dp": Bool,
    ScaleXDimDp => "scale_xdim_dp": OptText,
    BorderWidth => "border_width": OptInt,
    Whitespace => "whitespace": OptInt,
    VerticalWhitespace => "vertical_whitespace": OptInt,
    RotationAngle => "rotation_angle": OptInt,
    BindBars => "bind_bars": Bool,
    AddBox => "add_box": Bool,
    BindTop => "bind_top": Bool,
    CompliantHeight => "compliant_height": Bool,
    HeightPerRow => "height_per_row": Bool,
    DottyMode => "dotty_mode": Bool,
    DotSize => "dot_size": OptFloat,

    ForegroundColor => "foreground_color": OptColor,
    BackgroundColor => "background_color": OptColor,
    ReverseColors => "reverse_colors": Bool,
    NoBackground => "no_background": Bool,
    UseCmyk => "use_cmyk": Bool,

    HideText => "hide_text": Bool,
    BoldText => "bold_text": Bool,
    SmallText => "small_text": Bool,
    TextGap => "text_gap": OptFloat,
    AddOnGap => "add_on_gap": OptInt,
    GuardWhitespace => "guard_whitespace": Bool,
    GuardDescent => "guard_descent": OptFloat,
    EmbedFont => "embed_font": Bool,

    ProcessEscapes => "process_escapes": Bool,
    IsGs1Data => "is_gs1_data": Bool,
    ForceSquare => "force_square": Bool,
    BinaryMode => "binary_mode": Bool,
    Eci => "eci": OptInt,
    QuietZones => "quiet_zones": TriState,
    Gs1Separator => "gs1_separator": Bool,
    Gs1Parens => "gs1_parens": Bool,

    Version => "version": OptInt,
    SecurityLevel => "security_level": OptInt,
    Mask => "mask": OptInt,
    Scmvv => "scmvv": OptInt,
    Mode => "mode": OptInt,
    Columns => "columns": OptInt,
    Rows => "rows": OptInt,
    SeparatorHeight => "separator_height": OptInt,
    DataMatrixShape => "datamatrix_shape": TriState,
    UseDmre => "use_dmre": Bool,
    UseDmIso144 => "use_dm_iso144": Bool,
    FastEncoding => "fast_encoding": Bool,
    FullMultibyte => "full_multibyte": Bool,
    ReaderInitialization => "reader_initialization": Bool,
    AdvancedOptions => "advanced_options": OptText,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ZintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Field::ALL
            .iter()
            .copied()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| ZintError::format(format!("unknown field: '{wanted}'")))
    }
}

/// 1フィールド分の値。[`Field::kind`] と対応する形でなければならない。
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Symbology(crate::barcode::symbology::Symbology),
    Text(Option<String>),
    Int(Option<i64>),
    Float(Option<f64>),
    Bool(bool),
    TriState(Option<bool>),
    Color(Option<crate::barcode::color::ColorRgb>),
}

impl FieldValue {
    /// 文字列をフィールドの種類に従ってパースする。
    ///
    /// Empty input clears optional fields. Booleans accept
    /// `true/false/on/off/yes/no/1/0`; tri-states additionally accept `auto`.
    pub fn parse(field: Field, raw: &str) -> crate::error::Result<Self> {
        let raw_trimmed = raw.trim();
        let bad = |what: &str| {
            ZintError::format(format!(
                "invalid {what} for field '{}': '{raw_trimmed}'",
                field.name()
            ))
        };

        match field.kind() {
            FieldKind::Symbology => Ok(Self::Symbology(raw_trimmed.parse()?)),
            FieldKind::Text => Ok(Self::Text(Some(raw.to_string()))),
            FieldKind::OptText => Ok(Self::Text(
                (!raw.is_empty()).then(|| raw.to_string()),
            )),
            FieldKind::OptInt => {
                if raw_trimmed.is_empty() {
                    return Ok(Self::Int(None));
                }
                raw_trimmed
                    .parse()
                    .map(|v| Self::Int(Some(v)))
                    .map_err(|_| bad("integer"))
            }
            FieldKind::OptFloat => {
                if raw_trimmed.is_empty() {
                    return Ok(Self::Float(None));
                }
                raw_trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| Self::Float(Some(v)))
                    .ok_or_else(|| bad("number"))
            }
            FieldKind::Bool => parse_switch(raw_trimmed)
                .map(Self::Bool)
                .ok_or_else(|| bad("boolean")),
            FieldKind::TriState => {
                if raw_trimmed.is_empty() || raw_trimmed.eq_ignore_ascii_case("auto") {
                    return Ok(Self::TriState(None));
                }
                parse_switch(raw_trimmed)
                    .map(|v| Self::TriState(Some(v)))
                    .ok_or_else(|| bad("tri-state"))
            }
            FieldKind::OptColor => {
                if raw_trimmed.is_empty() {
                    return Ok(Self::Color(None));
                }
                Ok(Self::Color(Some(raw_trimmed.parse()?)))
            }
        }
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
