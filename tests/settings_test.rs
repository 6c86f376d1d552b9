// Phase 1: バーコード設定モデル・検証テスト

use zint_cli::barcode::field::{Field, FieldValue};
use zint_cli::barcode::options::BarcodeOptions;
use zint_cli::barcode::settings::BarcodeSettings;
use zint_cli::barcode::symbology::Symbology;
use zint_cli::barcode::validate::{ONE_OF_REQUIRED_MESSAGE, ONLY_ONE_ALLOWED_MESSAGE};
use zint_cli::barcode::xdim::{XDimResolution, dpi_to_dpmm, scale_from_mils};
use zint_cli::barcode::ColorRgb;
use zint_cli::error::ZintError;

fn text(s: &str) -> FieldValue {
    FieldValue::Text(Some(s.to_string()))
}

fn valid_settings() -> BarcodeSettings {
    BarcodeSettings::new(BarcodeOptions {
        data: "Hello".to_string(),
        ..Default::default()
    })
}

// ============================================================
// 1. デフォルトと one-of-required
// ============================================================

#[test]
fn test_default_settings_invalid_without_source() {
    let settings = BarcodeSettings::default();
    assert!(!settings.is_valid());
    assert_eq!(settings.options().symbology, Symbology::DataMatrix);
    assert_eq!(settings.errors_for(Field::Data), [ONE_OF_REQUIRED_MESSAGE]);
    assert_eq!(settings.errors_for(Field::InputPath), [ONE_OF_REQUIRED_MESSAGE]);
}

#[test]
fn test_setting_input_path_clears_data_error() {
    let mut settings = BarcodeSettings::default();
    settings
        .set_field(Field::InputPath, text("data.txt"))
        .expect("set input_path");

    assert!(settings.is_valid());
    assert!(settings.errors_for(Field::Data).is_empty());
    assert!(settings.errors_for(Field::InputPath).is_empty());
}

#[test]
fn test_both_sources_rejected() {
    let mut settings = valid_settings();
    settings
        .set_field(Field::InputPath, text("data.txt"))
        .expect("set input_path");

    assert!(!settings.is_valid());
    assert_eq!(settings.errors_for(Field::Data), [ONLY_ONE_ALLOWED_MESSAGE]);
    assert_eq!(settings.errors_for(Field::InputPath), [ONLY_ONE_ALLOWED_MESSAGE]);

    // Clearing either side restores validity for both.
    settings
        .set_field(Field::InputPath, FieldValue::Text(None))
        .expect("clear input_path");
    assert!(settings.is_valid());
}

#[test]
fn test_whitespace_only_data_counts_as_missing() {
    let mut settings = valid_settings();
    settings.set_field(Field::Data, text("   ")).expect("set data");
    assert!(!settings.is_valid());
}

// ============================================================
// 2. 範囲制約
// ============================================================

#[test]
fn test_rotation_only_right_angles() {
    let mut settings = valid_settings();
    for angle in [0, 90, 180, 270] {
        settings
            .set_field(Field::RotationAngle, FieldValue::Int(Some(angle)))
            .expect("set rotation");
        assert!(settings.is_valid(), "{angle} should be accepted");
    }
    settings
        .set_field(Field::RotationAngle, FieldValue::Int(Some(45)))
        .expect("set rotation");
    assert!(!settings.is_valid());
    assert_eq!(
        settings.errors_for(Field::RotationAngle),
        ["RotationAngle must be 0, 90, 180, or 270."]
    );
}

#[test]
fn test_out_of_range_value_is_stored_and_reported() {
    let mut settings = valid_settings();
    settings
        .set_field(Field::Mask, FieldValue::Int(Some(16)))
        .expect("set mask");
    assert_eq!(settings.options().mask, Some(16));
    assert_eq!(settings.errors_for(Field::Mask), ["Mask 0–15."]);

    settings
        .set_field(Field::Mask, FieldValue::Int(Some(15)))
        .expect("set mask");
    assert!(settings.is_valid());
}

#[test]
fn test_scale_must_be_positive() {
    let mut settings = valid_settings();
    settings
        .set_field(Field::Scale, FieldValue::Float(Some(0.0)))
        .expect("set scale");
    assert_eq!(settings.errors_for(Field::Scale), ["Scale must be > 0."]);
}

#[test]
fn test_xdim_pattern_validation() {
    let mut settings = valid_settings();
    settings
        .set_field_str("scale_xdim_dp", "0.33mm,300dpi")
        .expect("set xdim");
    assert!(settings.is_valid());

    settings
        .set_field_str("scale_xdim_dp", "0.33mm")
        .expect("set xdim");
    assert!(!settings.is_valid());
    assert_eq!(settings.errors_for(Field::ScaleXDimDp).len(), 1);
}

#[test]
fn test_max_length_advanced_options() {
    let mut settings = valid_settings();
    settings
        .set_field(Field::AdvancedOptions, text(&"x".repeat(2049)))
        .expect("set advanced");
    assert!(!settings.is_valid());
    settings
        .set_field(Field::AdvancedOptions, text(&"x".repeat(2048)))
        .expect("set advanced");
    assert!(settings.is_valid());
}

// ============================================================
// 3. validate_all とレポート
// ============================================================

#[test]
fn test_validate_all_reports_every_field() {
    let mut settings = BarcodeSettings::default();
    let report = settings.update(|o| {
        o.height = Some(0.0);
        o.columns = Some(100);
    });

    assert!(!report.is_valid);
    assert!(report.errors.contains_key("data"));
    assert!(report.errors.contains_key("input_path"));
    assert_eq!(report.errors["height"], vec!["Height must be > 0."]);
    assert_eq!(
        report.errors["columns"],
        vec!["columns must be between 1 and 99."]
    );
}

#[test]
fn test_report_serializes_as_json() {
    let settings = BarcodeSettings::default();
    let json = serde_json::to_value(settings.report()).expect("serialize");
    assert_eq!(json["is_valid"], false);
    assert_eq!(json["errors"]["data"][0], ONE_OF_REQUIRED_MESSAGE);
}

#[test]
fn test_ensure_valid_returns_validation_error() {
    let settings = BarcodeSettings::default();
    match settings.ensure_valid() {
        Err(ZintError::ValidationError(errors)) => assert!(errors.contains_key("data")),
        other => panic!("expected ValidationError, got {other:?}"),
    }
}

// ============================================================
// 4. 文字列からの代入
// ============================================================

#[test]
fn test_set_field_str_parses_by_kind() {
    let mut settings = valid_settings();
    settings.set_field_str("symbology", "qr_code").expect("symbology");
    settings.set_field_str("foreground_color", "#ff0010").expect("fg");
    settings.set_field_str("quiet_zones", "off").expect("quiet zones");
    settings.set_field_str("bind_bars", "yes").expect("bind");

    let o = settings.options();
    assert_eq!(o.symbology, Symbology::QrCode);
    assert_eq!(o.foreground_color, Some(ColorRgb::new(0xFF, 0x00, 0x10)));
    assert_eq!(o.quiet_zones, Some(false));
    assert!(o.bind_bars);
}

#[test]
fn test_set_field_str_rejects_wrong_kind() {
    let mut settings = valid_settings();
    assert!(matches!(
        settings.set_field_str("rows", "many"),
        Err(ZintError::FormatError(_))
    ));
    assert!(matches!(
        settings.set_field_str("no_such_field", "1"),
        Err(ZintError::FormatError(_))
    ));
    assert!(matches!(
        settings.set_field_str("foreground_color", "red"),
        Err(ZintError::FormatError(_))
    ));
}

#[test]
fn test_set_field_kind_mismatch() {
    let mut settings = valid_settings();
    let result = settings.set_field(Field::Rows, FieldValue::Bool(true));
    assert!(matches!(result, Err(ZintError::FormatError(_))));
    assert_eq!(settings.options().rows, None);
}

// ============================================================
// 5. シンボロジーと X 寸法
// ============================================================

#[test]
fn test_symbology_names_and_codes() {
    assert_eq!("BARCODE_DATAMATRIX".parse::<Symbology>().unwrap(), Symbology::DataMatrix);
    assert_eq!("71".parse::<Symbology>().unwrap(), Symbology::DataMatrix);
    assert_eq!("ean128".parse::<Symbology>().unwrap(), Symbology::Gs1128);
    assert_eq!(Symbology::Gs1128.code(), 16);
    assert!("NOT_A_BARCODE".parse::<Symbology>().is_err());
}

#[test]
fn test_xdim_scale_rule() {
    let xdim: XDimResolution = "0.33mm,300dpi".parse().expect("parse");
    // 0.33 mm * 11.811 dpmm = 3.9 px → 4 px → scale 2
    assert_eq!(xdim.scale(), 2.0);
    assert_eq!(dpi_to_dpmm(300), 12);
    assert_eq!(scale_from_mils(13.0, 300.0), 2.0);
    assert!("0.33mm,300ppi".parse::<XDimResolution>().is_err());
}
