use std::collections::BTreeMap;

use serde::Serialize;

use crate::barcode::field::{Field, FieldValue};
use crate::barcode::options::BarcodeOptions;
use crate::barcode::validate;
use crate::error::ZintError;

/// `validate_all` の結果。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// field name → error messages (only fields with errors)
    pub errors: BTreeMap<String, Vec<String>>,
}

/// バーコード設定エンティティ。
///
/// Holds the parameters, the current per-field validation errors and the
/// derived `is_valid` flag. Every mutation goes through [`set_field`] or
/// [`update`], both of which revalidate, so `is_valid` never goes stale.
///
/// [`set_field`]: BarcodeSettings::set_field
/// [`update`]: BarcodeSettings::update
#[derive(Debug, Clone)]
pub struct BarcodeSettings {
    options: BarcodeOptions,
    errors: BTreeMap<Field, Vec<String>>,
    is_valid: bool,
    generated_image: Option<Vec<u8>>,
}

impl Default for BarcodeSettings {
    fn default() -> Self {
        Self::new(BarcodeOptions::default())
    }
}

impl BarcodeSettings {
    /// オプションから設定を作り、全フィールドを検証する。
    pub fn new(options: BarcodeOptions) -> Self {
        let mut settings = Self {
            options,
            errors: BTreeMap::new(),
            is_valid: false,
            generated_image: None,
        };
        settings.validate_all();
        settings
    }

    pub fn options(&self) -> &BarcodeOptions {
        &self.options
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Current errors for one field (empty slice when valid).
    pub fn errors_for(&self, field: Field) -> &[String] {
        self.errors.get(&field).map_or(&[], Vec::as_slice)
    }

    pub fn generated_image(&self) -> Option<&[u8]> {
        self.generated_image.as_deref()
    }

    /// 全フィールドを再検証し、is_valid を再計算する。
    pub fn validate_all(&mut self) -> ValidationReport {
        self.errors = validate::validate_options(&self.options);
        self.refresh_is_valid();
        self.report()
    }

    /// Current validation state without re-running the rules.
    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            is_valid: self.is_valid,
            errors: self
                .errors
                .iter()
                .map(|(field, messages)| (field.name().to_string(), messages.clone()))
                .collect(),
        }
    }

    /// 値を代入し、そのフィールドと関連フィールドを再検証する。
    ///
    /// Out-of-range values are stored and reported as validation errors; only a
    /// value of the wrong kind for the field is rejected with a `FormatError`.
    pub fn set_field(&mut self, field: Field, value: FieldValue) -> crate::error::Result<()> {
        self.options.apply(field, value)?;
        self.revalidate(field);
        Ok(())
    }

    /// Parses `raw` according to the named field's kind, then [`set_field`](Self::set_field).
    pub fn set_field_str(&mut self, name: &str, raw: &str) -> crate::error::Result<()> {
        let field: Field = name.parse()?;
        let value = FieldValue::parse(field, raw)?;
        self.set_field(field, value)
    }

    /// Mutates several fields at once, then revalidates everything.
    pub fn update(&mut self, f: impl FnOnce(&mut BarcodeOptions)) -> ValidationReport {
        f(&mut self.options);
        self.validate_all()
    }

    /// 検証済みであることを要求する。無効なら ValidationError。
    pub fn ensure_valid(&self) -> crate::error::Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(ZintError::ValidationError(self.report().errors))
        }
    }

    /// Records a successful generation.
    pub fn set_generated_image(&mut self, image: Vec<u8>) {
        self.generated_image = Some(image);
        self.refresh_is_valid();
    }

    /// Takes the image out, leaving `None` behind.
    pub fn take_generated_image(&mut self) -> Option<Vec<u8>> {
        self.generated_image.take()
    }

    pub(crate) fn clear_generated_image(&mut self) {
        self.generated_image = None;
    }

    fn revalidate(&mut self, field: Field) {
        let targets = std::iter::once(field).chain(validate::associated(field));
        for target in targets {
            if !validate::is_validated(target) {
                continue;
            }
            let messages = validate::validate_field(&self.options, target);
            if messages.is_empty() {
                self.errors.remove(&target);
            } else {
                self.errors.insert(target, messages);
            }
        }
        self.refresh_is_valid();
    }

    fn refresh_is_valid(&mut self) {
        self.is_valid = self.errors.is_empty();
    }
}
