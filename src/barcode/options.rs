use serde::{Deserialize, Serialize};

use crate::barcode::color::ColorRgb;
use crate::barcode::field::{Field, FieldValue};
use crate::barcode::symbology::Symbology;
use crate::error::ZintError;

/// バーコード生成パラメータ一式（検証状態を持たない素のデータ）。
///
/// `Option` のフィールドは未指定なら zint のデフォルトに任せ、フラグを出力しない。
/// Validity is tracked by [`crate::barcode::settings::BarcodeSettings`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BarcodeOptions {
    // --- identity / source ---
    pub symbology: Symbology,
    pub data: String,
    pub input_path: Option<String>,
    pub primary_data: Option<String>,
    pub output_path: Option<String>,

    // --- sizing ---
    /// Symbol height in X-dimensions.
    pub height: Option<f64>,
    pub scale: Option<f64>,
    /// Selects `scale_xdim_dp` instead of `scale`.
    pub use_scale_xdim_dp: bool,
    /// `<value>(mm|in),<res>(dpi|dpmm)`
    pub scale_xdim_dp: Option<String>,
    pub border_width: Option<i32>,
    pub whitespace: Option<i32>,
    pub vertical_whitespace: Option<i32>,
    pub rotation_angle: Option<i32>,
    pub bind_bars: bool,
    pub add_box: bool,
    pub bind_top: bool,
    pub compliant_height: bool,
    pub height_per_row: bool,
    pub dotty_mode: bool,
    /// Only compiled when `dotty_mode` is on.
    pub dot_size: Option<f64>,

    // --- appearance ---
    pub foreground_color: Option<ColorRgb>,
    pub background_color: Option<ColorRgb>,
    pub reverse_colors: bool,
    pub no_background: bool,
    pub use_cmyk: bool,

    // --- text ---
    pub hide_text: bool,
    pub bold_text: bool,
    pub small_text: bool,
    pub text_gap: Option<f64>,
    pub add_on_gap: Option<i32>,
    pub guard_whitespace: bool,
    pub guard_descent: Option<f64>,
    pub embed_font: bool,

    // --- encoding flags ---
    pub process_escapes: bool,
    pub is_gs1_data: bool,
    pub force_square: bool,
    pub binary_mode: bool,
    pub eci: Option<i32>,
    /// `None` = zint default, `Some(true)` = `--quietzones`, `Some(false)` = `--noquietzones`
    pub quiet_zones: Option<bool>,
    pub gs1_separator: bool,
    pub gs1_parens: bool,

    // --- symbology specific ---
    pub version: Option<i32>,
    pub security_level: Option<i32>,
    pub mask: Option<i32>,
    pub scmvv: Option<i32>,
    pub mode: Option<i32>,
    pub columns: Option<i32>,
    pub rows: Option<i32>,
    pub separator_height: Option<i32>,
    /// Data Matrix shape: `None` = automatic, `Some(true)` = square, `Some(false)` = DMRE.
    pub datamatrix_shape: Option<bool>,
    pub use_dmre: bool,
    pub use_dm_iso144: bool,
    pub fast_encoding: bool,
    pub full_multibyte: bool,
    pub reader_initialization: bool,
    /// Raw flags appended after everything else. Not validated.
    pub advanced_options: Option<String>,
}

fn to_i32(field: Field, v: Option<i64>) -> crate::error::Result<Option<i32>> {
    v.map(|v| {
        i32::try_from(v).map_err(|_| {
            ZintError::format(format!("value {v} does not fit field '{}'", field.name()))
        })
    })
    .transpose()
}

impl BarcodeOptions {
    /// Numeric value of a numeric field, `None` when unset or not numeric.
    pub fn numeric(&self, field: Field) -> Option<f64> {
        let int = |v: Option<i32>| v.map(f64::from);
        match field {
            Field::Height => self.height,
            Field::Scale => self.scale,
            Field::DotSize => self.dot_size,
            Field::TextGap => self.text_gap,
            Field::GuardDescent => self.guard_descent,
            Field::BorderWidth => int(self.border_width),
            Field::Whitespace => int(self.whitespace),
            Field::VerticalWhitespace => int(self.vertical_whitespace),
            Field::RotationAngle => int(self.rotation_angle),
            Field::AddOnGap => int(self.add_on_gap),
            Field::Eci => int(self.eci),
            Field::Version => int(self.version),
            Field::SecurityLevel => int(self.security_level),
            Field::Mask => int(self.mask),
            Field::Scmvv => int(self.scmvv),
            Field::Mode => int(self.mode),
            Field::Columns => int(self.columns),
            Field::Rows => int(self.rows),
            Field::SeparatorHeight => int(self.separator_height),
            _ => None,
        }
    }

    /// String value of a text field, `None` when unset or not textual.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Data => Some(self.data.as_str()),
            Field::InputPath => self.input_path.as_deref(),
            Field::PrimaryData => self.primary_data.as_deref(),
            Field::OutputPath => self.output_path.as_deref(),
            Field::ScaleXDimDp => self.scale_xdim_dp.as_deref(),
            Field::AdvancedOptions => self.advanced_options.as_deref(),
            _ => None,
        }
    }

    /// 値を1フィールドに代入する。値の形がフィールドと合わなければ FormatError。
    pub fn apply(&mut self, field: Field, value: FieldValue) -> crate::error::Result<()> {
        use FieldValue as V;

        match (field, value) {
            (Field::Symbology, V::Symbology(s)) => self.symbology = s,
            (Field::Data, V::Text(t)) => self.data = t.unwrap_or_default(),
            (Field::InputPath, V::Text(t)) => self.input_path = t,
            (Field::PrimaryData, V::Text(t)) => self.primary_data = t,
            (Field::OutputPath, V::Text(t)) => self.output_path = t,
            (Field::ScaleXDimDp, V::Text(t)) => self.scale_xdim_dp = t,
            (Field::AdvancedOptions, V::Text(t)) => self.advanced_options = t,

            (Field::Height, V::Float(v)) => self.height = v,
            (Field::Scale, V::Float(v)) => self.scale = v,
            (Field::DotSize, V::Float(v)) => self.dot_size = v,
            (Field::TextGap, V::Float(v)) => self.text_gap = v,
            (Field::GuardDescent, V::Float(v)) => self.guard_descent = v,

            (f @ Field::BorderWidth, V::Int(v)) => self.border_width = to_i32(f, v)?,
            (f @ Field::Whitespace, V::Int(v)) => self.whitespace = to_i32(f, v)?,
            (f @ Field::VerticalWhitespace, V::Int(v)) => {
                self.vertical_whitespace = to_i32(f, v)?
            }
            (f @ Field::RotationAngle, V::Int(v)) => self.rotation_angle = to_i32(f, v)?,
            (f @ Field::AddOnGap, V::Int(v)) => self.add_on_gap = to_i32(f, v)?,
            (f @ Field::Eci, V::Int(v)) => self.eci = to_i32(f, v)?,
            (f @ Field::Version, V::Int(v)) => self.version = to_i32(f, v)?,
            (f @ Field::SecurityLevel, V::Int(v)) => self.security_level = to_i32(f, v)?,
            (f @ Field::Mask, V::Int(v)) => self.mask = to_i32(f, v)?,
            (f @ Field::Scmvv, V::Int(v)) => self.scmvv = to_i32(f, v)?,
            (f @ Field::Mode, V::Int(v)) => self.mode = to_i32(f, v)?,
            (f @ Field::Columns, V::Int(v)) => self.columns = to_i32(f, v)?,
            (f @ Field::Rows, V::Int(v)) => self.rows = to_i32(f, v)?,
            (f @ Field::SeparatorHeight, V::Int(v)) => self.separator_height = to_i32(f, v)?,

            (Field::ForegroundColor, V::Color(c)) => self.foreground_color = c,
            (Field::BackgroundColor, V::Color(c)) => self.background_color = c,

            (Field::QuietZones, V::TriState(t)) => self.quiet_zones = t,
            (Field::DataMatrixShape, V::TriState(t)) => self.datamatrix_shape = t,

            (field, V::Bool(b)) => *self.flag_mut(field).ok_or_else(|| mismatch(field))? = b,

            (field, _) => return Err(mismatch(field)),
        }
        Ok(())
    }

    fn flag_mut(&mut self, field: Field) -> Option<&mut bool> {
        let flag = match field {
            Field::UseScaleXDimDp => &mut self.use_scale_xdim_dp,
            Field::BindBars => &mut self.bind_bars,
            Field::AddBox => &mut self.add_box,
            Field::BindTop => &mut self.bind_top,
            Field::CompliantHeight => &mut self.compliant_height,
            Field::HeightPerRow => &mut self.height_per_row,
            Field::DottyMode => &mut self.dotty_mode,
            Field::ReverseColors => &mut self.reverse_colors,
            Field::NoBackground => &mut self.no_background,
            Field::UseCmyk => &mut self.use_cmyk,
            Field::HideText => &mut self.hide_text,
            Field::BoldText => &mut self.bold_text,
            Field::SmallText => &mut self.small_text,
            Field::GuardWhitespace => &mut self.guard_whitespace,
            Field::EmbedFont => &mut self.embed_font,
            Field::ProcessEscapes => &mut self.process_escapes,
            Field::IsGs1Data => &mut self.is_gs1_data,
            Field::ForceSquare => &mut self.force_square,
            Field::BinaryMode => &mut self.binary_mode,
            Field::Gs1Separator => &mut self.gs1_separator,
            Field::Gs1Parens => &mut self.gs1_parens,
            Field::UseDmre => &mut self.use_dmre,
            Field::UseDmIso144 => &mut self.use_dm_iso144,
            Field::FastEncoding => &mut self.fast_encoding,
            Field::FullMultibyte => &mut self.full_multibyte,
            Field::ReaderInitialization => &mut self.reader_initialization,
            _ => return None,
        };
        Some(flag)
    }
}

fn mismatch(field: Field) -> ZintError {
    ZintError::format(format!(
        "value of the wrong kind for field '{}' (expected {:?})",
        field.name(),
        field.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = BarcodeOptions::default();
        assert_eq!(opts.symbology, Symbology::DataMatrix);
        assert!(opts.data.is_empty());
        assert!(opts.scale.is_none());
        assert!(opts.quiet_zones.is_none());
    }

    #[test]
    fn test_apply_every_bool_field() {
        use crate::barcode::field::FieldKind;

        let mut opts = BarcodeOptions::default();
        for &field in Field::ALL {
            if field.kind() == FieldKind::Bool {
                opts.apply(field, FieldValue::Bool(true))
                    .unwrap_or_else(|e| panic!("{field}: {e}"));
            }
        }
        assert!(opts.bind_bars && opts.reader_initialization && opts.use_scale_xdim_dp);
    }

    #[test]
    fn test_apply_kind_mismatch() {
        let mut opts = BarcodeOptions::default();
        let err = opts
            .apply(Field::Height, FieldValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ZintError::FormatError(_)));
    }

    #[test]
    fn test_apply_int_overflow() {
        let mut opts = BarcodeOptions::default();
        assert!(opts
            .apply(Field::Eci, FieldValue::Int(Some(i64::MAX)))
            .is_err());
    }
}
