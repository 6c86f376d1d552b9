// コマンドコンパイラ: 検証済み設定 → 順序付きの zint 引数列
//
// Order: symbology, destination, data source, sizing, appearance, text,
// encoding flags, symbology-specific flags, advanced options (last, so they
// can override anything before them).

use std::fmt;
use std::path::{Path, PathBuf};

use crate::barcode::options::BarcodeOptions;
use crate::barcode::settings::BarcodeSettings;
use crate::barcode::xdim::XDimResolution;
use crate::command::switches::{Arg, Switches};

/// Default file type for direct (stdout) output and synthesized temp files.
pub const DEFAULT_FILETYPE: &str = "png";

/// zint の出力先。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// `--output="<path>"`
    File(PathBuf),
    /// `--direct --filetype=<ext>`: image bytes on stdout.
    Stdout { filetype: String },
}

impl Destination {
    pub fn file(path: impl AsRef<Path>) -> Self {
        Destination::File(path.as_ref().to_path_buf())
    }

    pub fn stdout(filetype: impl Into<String>) -> Self {
        Destination::Stdout {
            filetype: filetype.into(),
        }
    }

    pub fn is_direct(&self) -> bool {
        matches!(self, Destination::Stdout { .. })
    }
}

/// コンパイル済みの引数列。同じ設定からは常に同一の列が得られる。
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCommand {
    args: Vec<Arg>,
    direct: bool,
}

impl CompiledCommand {
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// True when compiled for stdout output (`--direct`).
    pub fn is_direct(&self) -> bool {
        self.direct
    }

    /// Tokens as rendered on a command line (string values quoted).
    pub fn tokens(&self) -> Vec<String> {
        self.args.iter().map(Arg::to_string).collect()
    }

    /// Arguments for direct process execution (no shell quoting).
    pub fn argv(&self) -> Vec<String> {
        self.args.iter().flat_map(Arg::to_argv).collect()
    }

    /// Single-string form, e.g. for logging or `--dry-run`.
    pub fn command_line(&self) -> String {
        self.tokens().join(" ")
    }

    /// Whether any compiled token equals `token` exactly.
    pub fn contains(&self, token: &str) -> bool {
        self.args.iter().any(|a| a.to_string() == token)
    }
}

impl fmt::Display for CompiledCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// 検証済みの設定を引数列にコンパイルする。
///
/// Refuses (with `ValidationError`) when the settings are not valid. The
/// settings are only read.
pub fn compile(
    settings: &BarcodeSettings,
    destination: &Destination,
) -> crate::error::Result<CompiledCommand> {
    settings.ensure_valid()?;
    compile_options(settings.options(), destination)
}

/// Compiles options without consulting validity. The X-dimension string is
/// parsed here, so a malformed one surfaces as a `FormatError`.
pub fn compile_options(
    o: &BarcodeOptions,
    destination: &Destination,
) -> crate::error::Result<CompiledCommand> {
    let mut s = Switches::new();

    s.barcode(o.symbology);

    match destination {
        Destination::File(path) => {
            s.output(&path.to_string_lossy());
        }
        Destination::Stdout { filetype } => {
            s.direct(filetype);
        }
    }

    match o.input_path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => s.input(path),
        None => s.data(&o.data),
    };
    if let Some(primary) = non_blank(&o.primary_data) {
        s.primary(primary);
    }

    compile_sizing(&mut s, o)?;
    compile_appearance(&mut s, o);
    compile_text(&mut s, o);
    compile_encoding(&mut s, o);
    compile_symbology_specific(&mut s, o);

    if let Some(advanced) = o.advanced_options.as_deref() {
        s.raw(advanced);
    }

    Ok(CompiledCommand {
        args: s.into_args(),
        direct: destination.is_direct(),
    })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn compile_sizing(s: &mut Switches, o: &BarcodeOptions) -> crate::error::Result<()> {
    if let Some(height) = o.height {
        s.height(height);
    }

    // X-dimension モードが有効かつ非空ならそちらを優先し、scale は出さない
    let xdim = match non_blank(&o.scale_xdim_dp) {
        Some(raw) if o.use_scale_xdim_dp => Some(raw.parse::<XDimResolution>()?),
        _ => None,
    };
    match (xdim, o.scale) {
        (Some(xdim), _) => {
            s.scale_xdim_dp(&xdim);
        }
        (None, Some(scale)) => {
            s.scale(scale);
        }
        (None, None) => {}
    }

    if let Some(v) = o.border_width {
        s.border(v);
    }
    if let Some(v) = o.whitespace {
        s.whitesp(v);
    }
    if let Some(v) = o.vertical_whitespace {
        s.vwhitesp(v);
    }
    if let Some(v) = o.rotation_angle {
        s.rotate(v);
    }
    if o.bind_bars {
        s.bind();
    }
    if o.add_box {
        s.boxed();
    }
    if o.bind_top {
        s.bind_top();
    }
    if o.compliant_height {
        s.compliant_height();
    }
    if o.height_per_row {
        s.height_per_row();
    }
    if o.dotty_mode {
        s.dotty();
        if let Some(size) = o.dot_size {
            s.dot_size(size);
        }
    }
    Ok(())
}

fn compile_appearance(s: &mut Switches, o: &BarcodeOptions) {
    if let Some(fg) = o.foreground_color {
        s.fg(fg);
    }
    if let Some(bg) = o.background_color {
        s.bg(bg);
    }
    if o.reverse_colors {
        s.reverse();
    }
    if o.no_background {
        s.no_background();
    }
    if o.use_cmyk {
        s.cmyk();
    }
}

fn compile_text(s: &mut Switches, o: &BarcodeOptions) {
    if o.hide_text {
        s.no_text();
    }
    if o.bold_text {
        s.bold();
    }
    if o.small_text {
        s.small();
    }
    if let Some(gap) = o.text_gap {
        s.text_gap(gap);
    }
    if o.embed_font {
        s.embed_font();
    }
    if let Some(gap) = o.add_on_gap {
        s.add_on_gap(gap);
    }
    if o.guard_whitespace {
        s.guard_whitespace();
    }
    if let Some(descent) = o.guard_descent {
        s.guard_descent(descent);
    }
}

/// Data Matrix 系で形状指定があれば、汎用の square/DMRE フラグより優先する。
fn datamatrix_shape(o: &BarcodeOptions) -> Option<bool> {
    o.datamatrix_shape.filter(|_| o.symbology.is_data_matrix())
}

fn compile_encoding(s: &mut Switches, o: &BarcodeOptions) {
    if o.process_escapes {
        s.esc();
    }
    if o.is_gs1_data && !o.symbology.is_implicit_gs1() {
        s.gs1();
    }
    if o.gs1_separator {
        s.gs_sep();
    }
    if o.gs1_parens {
        s.gs1_parens();
    }
    if o.binary_mode {
        s.binary();
    }
    if let Some(eci) = o.eci {
        s.eci(eci);
    }
    s.quiet_zones(o.quiet_zones);

    match datamatrix_shape(o) {
        Some(true) => {
            s.square();
        }
        Some(false) => {}
        None if o.force_square => {
            s.square();
        }
        None => {}
    }
}

fn compile_symbology_specific(s: &mut Switches, o: &BarcodeOptions) {
    match datamatrix_shape(o) {
        Some(false) => {
            s.dmre();
        }
        Some(true) => {}
        None if o.use_dmre => {
            s.dmre();
        }
        None => {}
    }
    if o.use_dm_iso144 {
        s.dm_iso144();
    }
    if let Some(v) = o.version {
        s.vers(v);
    }
    if let Some(v) = o.security_level {
        s.secure(v);
    }
    if let Some(v) = o.mask {
        s.mask(v);
    }
    if let Some(v) = o.scmvv {
        s.scmvv(v);
    }
    if let Some(v) = o.mode {
        s.mode(v);
    }
    if let Some(v) = o.columns {
        s.cols(v);
    }
    if let Some(v) = o.rows {
        s.rows(v);
    }
    if let Some(v) = o.separator_height {
        s.separator(v);
    }
    if o.fast_encoding {
        s.fast();
    }
    if o.full_multibyte {
        s.full_multibyte();
    }
    if o.reader_initialization {
        s.init();
    }
}
