// シンボロジーカタログ: zint の名前 ↔ 整数コード対応表
//
// The catalog is a closed, compile-time table. Codes match zint 2.15's
// `BARCODE_*` constants so they can be passed straight to `--barcode=`.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ZintError;

/// Generates the [`Symbology`] enum together with its static lookup table.
macro_rules! symbologies {
    ($(
        $(#[$meta:meta])*
        $variant:ident = $code:literal => $name:literal
    ),* $(,)?) => {
        /// A barcode symbology supported by zint.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Symbology {
            $(
                $(#[$meta])*
                $variant,
            )*
        }

        impl Symbology {
            /// All symbologies in catalog order.
            pub const ALL: &'static [Symbology] = &[$(Symbology::$variant),*];

            /// zint の整数コード。
            pub const fn code(self) -> u16 {
                match self {
                    $(Symbology::$variant => $code,)*
                }
            }

            /// Canonical zint name without the `BARCODE_` prefix.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Symbology::$variant => $name,)*
                }
            }

            /// 整数コードからシンボロジーを引く。
            pub fn from_code(code: u16) -> Option<Self> {
                match code {
                    $($code => Some(Symbology::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

symbologies! {
    /// Code 11
    Code11 = 1 => "CODE11",
    /// Standard Code 2 of 5 (Matrix)
    C25Standard = 2 => "C25STANDARD",
    /// Interleaved 2 of 5
    C25Inter = 3 => "C25INTER",
    /// IATA 2 of 5
    C25Iata = 4 => "C25IATA",
    /// Data Logic 2 of 5
    C25Logic = 6 => "C25LOGIC",
    /// Industrial 2 of 5
    C25Ind = 7 => "C25IND",
    /// Code 39
    Code39 = 8 => "CODE39",
    /// Extended Code 39
    ExCode39 = 9 => "EXCODE39",
    /// EAN-13 / EAN-8
    Eanx = 13 => "EANX",
    /// EAN with check digit
    EanxChk = 14 => "EANX_CHK",
    /// GS1-128 (formerly EAN-128)
    Gs1128 = 16 => "GS1_128",
    /// Codabar
    Codabar = 18 => "CODABAR",
    /// Code 128
    Code128 = 20 => "CODE128",
    /// Deutsche Post Leitcode
    DpLeit = 21 => "DPLEIT",
    /// Deutsche Post Identcode
    DpIdent = 22 => "DPIDENT",
    /// Code 16K
    Code16k = 23 => "CODE16K",
    /// Code 49
    Code49 = 24 => "CODE49",
    /// Code 93
    Code93 = 25 => "CODE93",
    /// Flattermarken
    Flat = 28 => "FLAT",
    /// GS1 DataBar Omnidirectional
    DbarOmn = 29 => "DBAR_OMN",
    /// GS1 DataBar Limited
    DbarLtd = 30 => "DBAR_LTD",
    /// GS1 DataBar Expanded
    DbarExp = 31 => "DBAR_EXP",
    /// Telepen Alpha
    Telepen = 32 => "TELEPEN",
    /// UPC-A
    Upca = 34 => "UPCA",
    /// UPC-A with check digit
    UpcaChk = 35 => "UPCA_CHK",
    /// UPC-E
    Upce = 37 => "UPCE",
    /// UPC-E with check digit
    UpceChk = 38 => "UPCE_CHK",
    /// USPS POSTNET
    Postnet = 40 => "POSTNET",
    /// MSI Plessey
    MsiPlessey = 47 => "MSI_PLESSEY",
    /// Facing Identification Mark
    Fim = 49 => "FIM",
    /// LOGMARS
    Logmars = 50 => "LOGMARS",
    /// Pharmacode One-Track
    Pharma = 51 => "PHARMA",
    /// Pharmazentralnummer
    Pzn = 52 => "PZN",
    /// Pharmacode Two-Track
    PharmaTwo = 53 => "PHARMA_TWO",
    /// Brazilian CEPNet
    Cepnet = 54 => "CEPNET",
    /// PDF417
    Pdf417 = 55 => "PDF417",
    /// Compact PDF417
    Pdf417Comp = 56 => "PDF417COMP",
    /// MaxiCode
    MaxiCode = 57 => "MAXICODE",
    /// QR Code
    QrCode = 58 => "QRCODE",
    /// Code 128 (suppress Code Set C)
    Code128Ab = 60 => "CODE128AB",
    /// Australia Post Standard Customer
    AusPost = 63 => "AUSPOST",
    /// Australia Post Reply Paid
    AusReply = 66 => "AUSREPLY",
    /// Australia Post Routing
    AusRoute = 67 => "AUSROUTE",
    /// Australia Post Redirection
    AusRedirect = 68 => "AUSREDIRECT",
    /// ISBN
    Isbnx = 69 => "ISBNX",
    /// Royal Mail 4-State Customer Code
    Rm4scc = 70 => "RM4SCC",
    /// Data Matrix (ECC200)
    #[default]
    DataMatrix = 71 => "DATAMATRIX",
    /// EAN-14
    Ean14 = 72 => "EAN14",
    /// Vehicle Identification Number
    Vin = 73 => "VIN",
    /// Codablock-F
    CodablockF = 74 => "CODABLOCKF",
    /// NVE-18 (SSCC-18)
    Nve18 = 75 => "NVE18",
    /// Japanese Postal Code
    JapanPost = 76 => "JAPANPOST",
    /// Korea Post
    KoreaPost = 77 => "KOREAPOST",
    /// GS1 DataBar Stacked
    DbarStk = 79 => "DBAR_STK",
    /// GS1 DataBar Stacked Omnidirectional
    DbarOmnStk = 80 => "DBAR_OMNSTK",
    /// GS1 DataBar Expanded Stacked
    DbarExpStk = 81 => "DBAR_EXPSTK",
    /// USPS PLANET
    Planet = 82 => "PLANET",
    /// MicroPDF417
    MicroPdf417 = 84 => "MICROPDF417",
    /// USPS Intelligent Mail
    UspsImail = 85 => "USPS_IMAIL",
    /// UK Plessey
    Plessey = 86 => "PLESSEY",
    /// Telepen Numeric
    TelepenNum = 87 => "TELEPEN_NUM",
    /// ITF-14
    Itf14 = 89 => "ITF14",
    /// Dutch Post KIX Code
    Kix = 90 => "KIX",
    /// Aztec Code
    Aztec = 92 => "AZTEC",
    /// DAFT Code
    Daft = 93 => "DAFT",
    /// DPD Code
    Dpd = 96 => "DPD",
    /// Micro QR Code
    MicroQr = 97 => "MICROQR",
    /// HIBC Code 128
    Hibc128 = 98 => "HIBC_128",
    /// HIBC Code 39
    Hibc39 = 99 => "HIBC_39",
    /// HIBC Data Matrix
    HibcDm = 102 => "HIBC_DM",
    /// HIBC QR Code
    HibcQr = 104 => "HIBC_QR",
    /// HIBC PDF417
    HibcPdf = 106 => "HIBC_PDF",
    /// HIBC MicroPDF417
    HibcMicPdf = 108 => "HIBC_MICPDF",
    /// HIBC Codablock-F
    HibcBlockF = 110 => "HIBC_BLOCKF",
    /// HIBC Aztec Code
    HibcAztec = 112 => "HIBC_AZTEC",
    /// DotCode
    DotCode = 115 => "DOTCODE",
    /// Han Xin Code
    HanXin = 116 => "HANXIN",
    /// Royal Mail 2D Mailmark
    Mailmark2d = 119 => "MAILMARK_2D",
    /// Universal Postal Union S10
    UpuS10 = 120 => "UPU_S10",
    /// Royal Mail 4-State Mailmark
    Mailmark4s = 121 => "MAILMARK_4S",
    /// Aztec Runes
    AzRune = 128 => "AZRUNE",
    /// Code 32
    Code32 = 129 => "CODE32",
    /// EAN Composite
    EanxCc = 130 => "EANX_CC",
    /// GS1-128 Composite
    Gs1128Cc = 131 => "GS1_128_CC",
    /// GS1 DataBar Omnidirectional Composite
    DbarOmnCc = 132 => "DBAR_OMN_CC",
    /// GS1 DataBar Limited Composite
    DbarLtdCc = 133 => "DBAR_LTD_CC",
    /// GS1 DataBar Expanded Composite
    DbarExpCc = 134 => "DBAR_EXP_CC",
    /// UPC-A Composite
    UpcaCc = 135 => "UPCA_CC",
    /// UPC-E Composite
    UpceCc = 136 => "UPCE_CC",
    /// GS1 DataBar Stacked Composite
    DbarStkCc = 137 => "DBAR_STK_CC",
    /// GS1 DataBar Stacked Omnidirectional Composite
    DbarOmnStkCc = 138 => "DBAR_OMNSTK_CC",
    /// GS1 DataBar Expanded Stacked Composite
    DbarExpStkCc = 139 => "DBAR_EXPSTK_CC",
    /// Channel Code
    Channel = 140 => "CHANNEL",
    /// Code One
    CodeOne = 141 => "CODEONE",
    /// Grid Matrix
    GridMatrix = 142 => "GRIDMATRIX",
    /// UPNQR
    UpnQr = 143 => "UPNQR",
    /// Ultracode
    Ultra = 144 => "ULTRA",
    /// Rectangular Micro QR Code
    Rmqr = 145 => "RMQR",
    /// IBM BC412
    Bc412 = 146 => "BC412",
}

/// Legacy names accepted in addition to the canonical ones.
const ALIASES: &[(&str, Symbology)] = &[("EAN128", Symbology::Gs1128)];

impl Symbology {
    /// GS1 データを暗黙的に扱うシンボロジーか。
    ///
    /// これらに `--gs1` を付けると冗長になるため、コンパイラは付与しない。
    pub fn is_implicit_gs1(self) -> bool {
        matches!(
            self,
            Symbology::Gs1128
                | Symbology::DbarOmn
                | Symbology::DbarLtd
                | Symbology::DbarExp
                | Symbology::DbarStk
                | Symbology::DbarOmnStk
                | Symbology::DbarExpStk
                | Symbology::Gs1128Cc
                | Symbology::DbarOmnCc
                | Symbology::DbarLtdCc
                | Symbology::DbarExpCc
                | Symbology::DbarStkCc
                | Symbology::DbarOmnStkCc
                | Symbology::DbarExpStkCc
        )
    }

    /// Data Matrix 系（形状を `--square` / `--dmre` で選べるもの）か。
    pub fn is_data_matrix(self) -> bool {
        matches!(self, Symbology::DataMatrix | Symbology::HibcDm)
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalizes a name the way zint's CLI does: case-insensitive, optional
/// `BARCODE_` prefix, underscores optional.
fn normalize_name(s: &str) -> String {
    let upper = s.trim().to_ascii_uppercase();
    let stripped = upper.strip_prefix("BARCODE_").unwrap_or(&upper);
    stripped.chars().filter(|&c| c != '_').collect()
}

impl FromStr for Symbology {
    type Err = ZintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<u16>() {
            return Symbology::from_code(code).ok_or_else(|| {
                ZintError::format(format!("unknown symbology code: {code}"))
            });
        }

        let wanted = normalize_name(s);
        if wanted.is_empty() {
            return Err(ZintError::format("symbology name cannot be empty"));
        }

        Symbology::ALL
            .iter()
            .copied()
            .find(|sym| normalize_name(sym.name()) == wanted)
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| normalize_name(alias) == wanted)
                    .map(|&(_, sym)| sym)
            })
            .ok_or_else(|| ZintError::format(format!("unknown symbology: '{}'", s.trim())))
    }
}

impl Serialize for Symbology {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

struct SymbologyVisitor;

impl Visitor<'_> for SymbologyVisitor {
    type Value = Symbology;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a zint symbology name or integer code")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Symbology, E> {
        v.parse().map_err(de::Error::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Symbology, E> {
        u16::try_from(v)
            .ok()
            .and_then(Symbology::from_code)
            .ok_or_else(|| de::Error::custom(format!("unknown symbology code: {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Symbology, E> {
        u64::try_from(v)
            .map_err(|_| de::Error::custom(format!("unknown symbology code: {v}")))
            .and_then(|v| self.visit_u64(v))
    }
}

impl<'de> Deserialize<'de> for Symbology {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SymbologyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u16> = Symbology::ALL.iter().map(|s| s.code()).collect();
        codes.sort();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len(), "every symbology must have a distinct code");
    }

    #[test]
    fn test_from_code_round_trips_catalog() {
        for &sym in Symbology::ALL {
            assert_eq!(Symbology::from_code(sym.code()), Some(sym));
        }
        assert_eq!(Symbology::from_code(5), None);
    }

    #[test]
    fn test_name_normalization() {
        assert_eq!(normalize_name("barcode_data_matrix"), "DATAMATRIX");
        assert_eq!(normalize_name(" Gs1_128 "), "GS1128");
    }

    #[test]
    fn test_default_is_data_matrix() {
        assert_eq!(Symbology::default(), Symbology::DataMatrix);
        assert_eq!(Symbology::default().code(), 71);
    }
}
