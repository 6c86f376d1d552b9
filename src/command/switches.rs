// 引数文法: 1つの値 → 1つの zint フラグトークン
//
// Each method appends exactly one token (two for `--direct --filetype=`) and
// never looks at any other setting. Ordering and filtering live in the compiler.

use std::fmt;

use crate::barcode::color::ColorRgb;
use crate::barcode::symbology::Symbology;
use crate::barcode::xdim::XDimResolution;

/// One command-line token.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// `--flag`
    Flag(&'static str),
    /// `--flag=value`
    Value(&'static str, String),
    /// `--flag="value"`; always quoted when rendered as a command line.
    Quoted(&'static str, String),
    /// Advanced options passed through verbatim.
    Raw(String),
}

impl Arg {
    /// Process arguments for this token (no shell involved, so no quotes).
    pub fn to_argv(&self) -> Vec<String> {
        match self {
            Arg::Flag(flag) => vec![(*flag).to_string()],
            Arg::Value(flag, value) | Arg::Quoted(flag, value) => vec![format!("{flag}={value}")],
            Arg::Raw(raw) => split_raw(raw),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Flag(flag) => f.write_str(flag),
            Arg::Value(flag, value) => write!(f, "{flag}={value}"),
            Arg::Quoted(flag, value) => write!(f, "{flag}=\"{}\"", value.replace('"', "\\\"")),
            Arg::Raw(raw) => f.write_str(raw.trim()),
        }
    }
}

/// Splits the advanced-options string into arguments the way a POSIX shell
/// would for plain words: whitespace separates, single and double quotes
/// group, backslash escapes the next character outside single quotes.
pub fn split_raw(raw: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some('\''), '\'') | (Some('"'), '"') => quote = None,
            (Some('\''), _) => current.push(c),
            (_, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
                in_word = true;
            }
            (Some(_), _) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    args.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, _) => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        args.push(current);
    }
    args
}

/// zint フラグを順に積み上げるビルダー。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Switches {
    args: Vec<Arg>,
}

macro_rules! flag_switches {
    ($($(#[doc = $doc:expr])* $method:ident => $flag:literal),* $(,)?) => {
        $(
            $(#[doc = $doc])*
            pub fn $method(&mut self) -> &mut Self {
                self.push(Arg::Flag($flag))
            }
        )*
    };
}

macro_rules! value_switches {
    ($($method:ident($ty:ty) => $flag:literal),* $(,)?) => {
        $(
            pub fn $method(&mut self, value: $ty) -> &mut Self {
                self.push(Arg::Value($flag, value.to_string()))
            }
        )*
    };
}

macro_rules! quoted_switches {
    ($($method:ident => $flag:literal),* $(,)?) => {
        $(
            pub fn $method(&mut self, value: &str) -> &mut Self {
                self.push(Arg::Quoted($flag, value.to_string()))
            }
        )*
    };
}

impl Switches {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, arg: Arg) -> &mut Self {
        self.args.push(arg);
        self
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    pub fn into_args(self) -> Vec<Arg> {
        self.args
    }

    /// `--barcode=<code>`
    pub fn barcode(&mut self, symbology: Symbology) -> &mut Self {
        self.push(Arg::Value("--barcode", symbology.code().to_string()))
    }

    /// `--direct --filetype=<ext>`: image bytes on stdout instead of a file.
    pub fn direct(&mut self, filetype: &str) -> &mut Self {
        self.push(Arg::Flag("--direct"));
        self.push(Arg::Value("--filetype", filetype.to_string()))
    }

    quoted_switches! {
        output => "--output",
        data => "--data",
        input => "--input",
        primary => "--primary",
    }

    value_switches! {
        height(f64) => "--height",
        scale(f64) => "--scale",
        scale_xdim_dp(&XDimResolution) => "--scalexdimdp",
        border(i32) => "--border",
        whitesp(i32) => "--whitesp",
        vwhitesp(i32) => "--vwhitesp",
        rotate(i32) => "--rotate",
        dot_size(f64) => "--dotsize",
        fg(ColorRgb) => "--fg",
        bg(ColorRgb) => "--bg",
        text_gap(f64) => "--textgap",
        add_on_gap(i32) => "--addongap",
        guard_descent(f64) => "--guarddescent",
        eci(i32) => "--eci",
        vers(i32) => "--vers",
        secure(i32) => "--secure",
        mask(i32) => "--mask",
        scmvv(i32) => "--scmvv",
        mode(i32) => "--mode",
        cols(i32) => "--cols",
        rows(i32) => "--rows",
        separator(i32) => "--separator",
    }

    flag_switches! {
        bind => "--bind",
        /// `--box`
        boxed => "--box",
        bind_top => "--bindtop",
        compliant_height => "--compliantheight",
        height_per_row => "--heightperrow",
        dotty => "--dotty",
        reverse => "--reverse",
        no_background => "--nobackground",
        cmyk => "--cmyk",
        no_text => "--notext",
        bold => "--bold",
        small => "--small",
        embed_font => "--embedfont",
        guard_whitespace => "--guardwhitespace",
        esc => "--esc",
        gs1 => "--gs1",
        gs_sep => "--gssep",
        gs1_parens => "--gs1parens",
        binary => "--binary",
        square => "--square",
        dmre => "--dmre",
        dm_iso144 => "--dmiso144",
        fast => "--fast",
        full_multibyte => "--fullmultibyte",
        init => "--init",
    }

    /// 三値: `Some(true)` → `--quietzones`, `Some(false)` → `--noquietzones`, `None` → 何も出さない。
    pub fn quiet_zones(&mut self, state: Option<bool>) -> &mut Self {
        match state {
            Some(true) => self.push(Arg::Flag("--quietzones")),
            Some(false) => self.push(Arg::Flag("--noquietzones")),
            None => self,
        }
    }

    /// Appends the advanced-options string verbatim. Blank input adds nothing.
    pub fn raw(&mut self, options: &str) -> &mut Self {
        if options.trim().is_empty() {
            self
        } else {
            self.push(Arg::Raw(options.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_tokens() {
        let mut s = Switches::new();
        s.rotate(90).bind().fg(ColorRgb::new(255, 0, 16)).scale(2.0);
        let rendered: Vec<String> = s.args().iter().map(|a| a.to_string()).collect();
        assert_eq!(rendered, vec!["--rotate=90", "--bind", "--fg=FF0010", "--scale=2"]);
    }

    #[test]
    fn test_quoted_display_and_argv() {
        let arg = Arg::Quoted("--data", "say \"hi\"".to_string());
        assert_eq!(arg.to_string(), r#"--data="say \"hi\"""#);
        assert_eq!(arg.to_argv(), vec![r#"--data=say "hi""#]);
    }

    #[test]
    fn test_quiet_zones_tristate() {
        let render = |state| {
            let mut s = Switches::new();
            s.quiet_zones(state);
            s.args().iter().map(|a| a.to_string()).collect::<Vec<_>>()
        };
        assert_eq!(render(Some(true)), vec!["--quietzones"]);
        assert_eq!(render(Some(false)), vec!["--noquietzones"]);
        assert!(render(None).is_empty());
    }

    #[test]
    fn test_split_raw() {
        assert_eq!(
            split_raw(r#"--vers=10  --secure=2 --primary="a b" 'c\d'"#),
            vec!["--vers=10", "--secure=2", "--primary=a b", r"c\d"]
        );
        assert!(split_raw("   ").is_empty());
        assert_eq!(split_raw(r#"--data="""#), vec!["--data="]);
    }
}
