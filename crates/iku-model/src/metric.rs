//! IKU metric catalogue.
//!
//! Combined metrics (`1`..`8`) are the faculty-level indicators; sub-metrics
//! (`11`, `12`, ...) are the individual spreadsheets they are built from.

use std::fmt;
use std::str::FromStr;

use crate::error::IkuError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IkuCode {
    Iku1,
    Iku11,
    Iku12,
    Iku13,
    Iku2,
    Iku21,
    Iku22,
    Iku23,
    Iku3,
    Iku31,
    Iku33,
    Iku4,
    Iku41,
    Iku42,
    Iku5,
    Iku51,
    Iku6,
    Iku62,
    Iku7,
    Iku71,
    Iku8,
    Iku81,
}

/// Default processing order when no codes are requested.
pub const ALL_IKU: [IkuCode; 20] = [
    IkuCode::Iku1,
    IkuCode::Iku11,
    IkuCode::Iku12,
    IkuCode::Iku13,
    IkuCode::Iku2,
    IkuCode::Iku21,
    IkuCode::Iku22,
    IkuCode::Iku23,
    IkuCode::Iku3,
    IkuCode::Iku31,
    IkuCode::Iku33,
    IkuCode::Iku4,
    IkuCode::Iku41,
    IkuCode::Iku42,
    IkuCode::Iku5,
    IkuCode::Iku6,
    IkuCode::Iku7,
    IkuCode::Iku71,
    IkuCode::Iku8,
    IkuCode::Iku81,
];

/// Faculty-level indicators shown on the overall achievement dashboards.
pub const COMBINED_IKU: [IkuCode; 8] = [
    IkuCode::Iku1,
    IkuCode::Iku2,
    IkuCode::Iku3,
    IkuCode::Iku4,
    IkuCode::Iku5,
    IkuCode::Iku6,
    IkuCode::Iku7,
    IkuCode::Iku8,
];

/// Static description of one metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricInfo {
    pub code: IkuCode,
    pub title: &'static str,
    pub target: f64,
    /// Counted entity, e.g. "lulusan" or "dosen".
    pub unit: &'static str,
    /// Multi-line label used under donuts and on dashboard tiles.
    pub label: &'static [&'static str],
    /// One-line label for compact dashboard tiles.
    pub compact_label: &'static str,
    pub color: &'static str,
    /// Target is an absolute count rather than a percentage.
    pub number_based: bool,
}

const fn info(
    code: IkuCode,
    title: &'static str,
    target: f64,
    unit: &'static str,
    label: &'static [&'static str],
    compact_label: &'static str,
    color: &'static str,
) -> MetricInfo {
    MetricInfo {
        code,
        title,
        target,
        unit,
        label,
        compact_label,
        color,
        number_based: false,
    }
}

const fn number_based(mut metric: MetricInfo) -> MetricInfo {
    metric.number_based = true;
    metric
}

// Indexed by declaration order of `IkuCode`.
static CATALOGUE: [MetricInfo; 22] = [
    info(
        IkuCode::Iku1,
        "IKU 1.1: Lulusan Bekerja/Studi Lanjut/Wiraswasta",
        60.0,
        "lulusan",
        &["Lulusan", "Bekerja/Studi/Wiraswasta"],
        "Lulusan Bekerja/Studi",
        "#5B9BD5",
    ),
    info(
        IkuCode::Iku11,
        "IKU 1.1a: Lulusan yang Memiliki Pekerjaan",
        60.0,
        "lulusan",
        &["Bekerja"],
        "Bekerja",
        "#5B9BD5",
    ),
    info(
        IkuCode::Iku12,
        "IKU 1.1b: Lulusan yang Melanjutkan Studi",
        60.0,
        "lulusan",
        &["Studi Lanjut"],
        "Studi Lanjut",
        "#70AD47",
    ),
    info(
        IkuCode::Iku13,
        "IKU 1.1c: Lulusan yang Berwiraswasta",
        60.0,
        "lulusan",
        &["Wiraswasta"],
        "Wiraswasta",
        "#ED7D31",
    ),
    info(
        IkuCode::Iku2,
        "IKU 1.2: Mahasiswa Berkegiatan di Luar Prodi/Meraih Prestasi",
        30.0,
        "mahasiswa",
        &["Mahasiswa", "Berkegiatan/Prestasi"],
        "Mahasiswa Prestasi",
        "#9966CC",
    ),
    info(
        IkuCode::Iku21,
        "IKU 1.2a: Mahasiswa Mengikuti Kegiatan MBKM",
        30.0,
        "mahasiswa",
        &["MBKM"],
        "MBKM",
        "#9966CC",
    ),
    info(
        IkuCode::Iku22,
        "IKU 1.2b: Mahasiswa Meraih Prestasi Kompetisi",
        30.0,
        "mahasiswa",
        &["Prestasi"],
        "Prestasi",
        "#E85D75",
    ),
    info(
        IkuCode::Iku23,
        "IKU 1.2c: Mahasiswa Memiliki Karya/HKI",
        30.0,
        "mahasiswa",
        &["Karya/HKI"],
        "Karya/HKI",
        "#00B0F0",
    ),
    info(
        IkuCode::Iku3,
        "IKU 2.1: Dosen Tridharma di PT Lain/Praktisi/Membimbing",
        25.0,
        "dosen",
        &["Dosen Tridharma", "di PT Lain"],
        "Dosen Tridharma",
        "#5B9BD5",
    ),
    info(
        IkuCode::Iku31,
        "IKU 2.1a: Dosen Berkegiatan Tridharma di PT Lain",
        25.0,
        "dosen",
        &["Tridharma", "di PT Lain"],
        "Tridharma di PT Lain",
        "#5B9BD5",
    ),
    info(
        IkuCode::Iku33,
        "IKU 2.1b: Dosen Membimbing Mahasiswa di Luar Prodi",
        25.0,
        "dosen",
        &["Membimbing", "Mahasiswa"],
        "Membimbing Mahasiswa",
        "#70AD47",
    ),
    info(
        IkuCode::Iku4,
        "IKU 2.2: Dosen Sertifikat DUDI/Pengajar Praktisi",
        20.14,
        "dosen",
        &["Dosen Sertifikat", "DUDI/Praktisi"],
        "Dosen DUDI/Praktisi",
        "#ED7D31",
    ),
    info(
        IkuCode::Iku41,
        "IKU 2.2a: Dosen Memiliki Sertifikat Kompetensi DUDI",
        20.14,
        "dosen",
        &["Sertifikat", "DUDI"],
        "Sertifikat DUDI",
        "#ED7D31",
    ),
    info(
        IkuCode::Iku42,
        "IKU 2.2b: Pengajar dari Kalangan Praktisi",
        20.14,
        "dosen",
        &["Pengajar", "Praktisi"],
        "Pengajar Praktisi",
        "#9966CC",
    ),
    number_based(info(
        IkuCode::Iku5,
        "IKU 5: Luaran Dosen Rekognisi Internasional",
        5.0,
        "luaran",
        &["Luaran Dosen", "Rekognisi Internasional"],
        "Luaran Rekognisi",
        "#FF6B6B",
    )),
    number_based(info(
        IkuCode::Iku51,
        "IKU 5: Luaran Dosen Rekognisi Internasional",
        5.0,
        "luaran",
        &["Luaran", "Rekognisi"],
        "Luaran Rekognisi",
        "#FF6B6B",
    )),
    number_based(info(
        IkuCode::Iku6,
        "IKU 6: Kerjasama per Program Studi",
        2.0,
        "kerjasama",
        &["Kerjasama", "per Program Studi"],
        "Kerjasama/Prodi",
        "#4ECDC4",
    )),
    number_based(info(
        IkuCode::Iku62,
        "IKU 6: Kerjasama per Program Studi",
        2.0,
        "kerjasama",
        &["Kerjasama"],
        "Kerjasama",
        "#4ECDC4",
    )),
    info(
        IkuCode::Iku7,
        "IKU 7: Mata Kuliah PJBL/Case Method",
        50.0,
        "mata kuliah",
        &["Mata Kuliah", "PJBL/Case Method"],
        "MK PJBL/Case",
        "#00B0F0",
    ),
    info(
        IkuCode::Iku71,
        "IKU 7: Mata Kuliah PJBL/Case Method",
        50.0,
        "mata kuliah",
        &["PJBL/Case", "Method"],
        "PJBL/Case Method",
        "#00B0F0",
    ),
    info(
        IkuCode::Iku8,
        "IKU 8: Prodi Akreditasi Internasional",
        10.0,
        "prodi",
        &["Prodi Akreditasi", "Internasional"],
        "Akreditasi Intl",
        "#2E7D32",
    ),
    info(
        IkuCode::Iku81,
        "IKU 8: Prodi Akreditasi Internasional",
        10.0,
        "prodi",
        &["Akreditasi", "Internasional"],
        "Akreditasi Internasional",
        "#2E7D32",
    ),
];

impl IkuCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            IkuCode::Iku1 => "1",
            IkuCode::Iku11 => "11",
            IkuCode::Iku12 => "12",
            IkuCode::Iku13 => "13",
            IkuCode::Iku2 => "2",
            IkuCode::Iku21 => "21",
            IkuCode::Iku22 => "22",
            IkuCode::Iku23 => "23",
            IkuCode::Iku3 => "3",
            IkuCode::Iku31 => "31",
            IkuCode::Iku33 => "33",
            IkuCode::Iku4 => "4",
            IkuCode::Iku41 => "41",
            IkuCode::Iku42 => "42",
            IkuCode::Iku5 => "5",
            IkuCode::Iku51 => "51",
            IkuCode::Iku6 => "6",
            IkuCode::Iku62 => "62",
            IkuCode::Iku7 => "7",
            IkuCode::Iku71 => "71",
            IkuCode::Iku8 => "8",
            IkuCode::Iku81 => "81",
        }
    }

    pub fn info(self) -> &'static MetricInfo {
        &CATALOGUE[self as usize]
    }

    pub fn target(self) -> f64 {
        self.info().target
    }

    pub fn is_number_based(self) -> bool {
        self.info().number_based
    }

    /// True for the faculty-level indicators `1`..`8`.
    pub fn is_combined(self) -> bool {
        COMBINED_IKU.contains(&self)
    }

    /// Sub-metrics a combined indicator is assembled from.
    pub fn sub_metrics(self) -> &'static [IkuCode] {
        match self {
            IkuCode::Iku1 => &[IkuCode::Iku11, IkuCode::Iku12, IkuCode::Iku13],
            IkuCode::Iku2 => &[IkuCode::Iku21, IkuCode::Iku22, IkuCode::Iku23],
            IkuCode::Iku3 => &[IkuCode::Iku31, IkuCode::Iku33],
            IkuCode::Iku4 => &[IkuCode::Iku41, IkuCode::Iku42],
            IkuCode::Iku5 => &[IkuCode::Iku51],
            IkuCode::Iku6 => &[IkuCode::Iku62],
            IkuCode::Iku7 => &[IkuCode::Iku71],
            IkuCode::Iku8 => &[IkuCode::Iku81],
            _ => &[],
        }
    }

    /// The combined indicator this metric belongs to.
    pub fn parent(self) -> IkuCode {
        COMBINED_IKU
            .iter()
            .copied()
            .find(|combined| *combined == self || combined.sub_metrics().contains(&self))
            .unwrap_or(self)
    }

    /// Codes processed when this code is requested on the command line.
    ///
    /// `5` and `6` stand alone: their single sub-metric is rendered through
    /// the combined indicator.
    pub fn expand(self) -> Vec<IkuCode> {
        match self {
            IkuCode::Iku5 | IkuCode::Iku6 => vec![self],
            code if code.is_combined() => {
                let mut codes = vec![code];
                codes.extend_from_slice(code.sub_metrics());
                codes
            }
            code => vec![code],
        }
    }

    /// Sub-metrics with detail ("breakdown") charts.
    pub fn has_breakdown(self) -> bool {
        matches!(
            self,
            IkuCode::Iku11
                | IkuCode::Iku12
                | IkuCode::Iku13
                | IkuCode::Iku21
                | IkuCode::Iku22
                | IkuCode::Iku23
                | IkuCode::Iku31
                | IkuCode::Iku33
                | IkuCode::Iku41
                | IkuCode::Iku42
                | IkuCode::Iku71
                | IkuCode::Iku81
        )
    }

    /// Target as shown in chart subtitles.
    pub fn target_label(self) -> String {
        match self {
            IkuCode::Iku6 | IkuCode::Iku62 => "2 per prodi".to_string(),
            code => format!("{}%", format_target(code.target())),
        }
    }

    /// Every code in declaration order.
    pub fn all() -> impl Iterator<Item = IkuCode> {
        CATALOGUE.iter().map(|metric| metric.code)
    }
}

fn format_target(target: f64) -> String {
    if target.fract() == 0.0 {
        format!("{}", target as i64)
    } else {
        format!("{target}")
    }
}

impl fmt::Display for IkuCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IkuCode {
    type Err = IkuError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let trimmed = trimmed
            .strip_prefix("IKU")
            .or_else(|| trimmed.strip_prefix("iku"))
            .unwrap_or(trimmed)
            .trim_start_matches(['_', '-', ' ']);
        IkuCode::all()
            .find(|code| code.as_str() == trimmed)
            .ok_or_else(|| IkuError::UnknownCode(value.to_string()))
    }
}

/// Expands requested codes, keeping the first occurrence of each.
///
/// An empty request means every metric in [`ALL_IKU`] order.
pub fn expand_codes(requested: &[IkuCode]) -> Vec<IkuCode> {
    if requested.is_empty() {
        return ALL_IKU.to_vec();
    }
    let mut expanded = Vec::new();
    for code in requested {
        for item in code.expand() {
            if !expanded.contains(&item) {
                expanded.push(item);
            }
        }
    }
    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_is_indexed_by_declaration_order() {
        for code in IkuCode::all() {
            assert_eq!(code.info().code, code);
        }
        assert_eq!(IkuCode::all().count(), 22);
    }

    #[test]
    fn parses_plain_and_prefixed_codes() {
        assert_eq!("31".parse::<IkuCode>().unwrap(), IkuCode::Iku31);
        assert_eq!("IKU_4".parse::<IkuCode>().unwrap(), IkuCode::Iku4);
        assert_eq!(" 81 ".parse::<IkuCode>().unwrap(), IkuCode::Iku81);
        assert!(matches!(
            "99".parse::<IkuCode>(),
            Err(IkuError::UnknownCode(code)) if code == "99"
        ));
    }

    #[test]
    fn expansion_matches_combined_groups() {
        assert_eq!(
            IkuCode::Iku1.expand(),
            vec![
                IkuCode::Iku1,
                IkuCode::Iku11,
                IkuCode::Iku12,
                IkuCode::Iku13
            ]
        );
        assert_eq!(
            IkuCode::Iku3.expand(),
            vec![IkuCode::Iku3, IkuCode::Iku31, IkuCode::Iku33]
        );
        assert_eq!(IkuCode::Iku5.expand(), vec![IkuCode::Iku5]);
        assert_eq!(IkuCode::Iku6.expand(), vec![IkuCode::Iku6]);
        assert_eq!(IkuCode::Iku42.expand(), vec![IkuCode::Iku42]);
    }

    #[test]
    fn expand_codes_dedupes_in_request_order() {
        let codes = expand_codes(&[IkuCode::Iku71, IkuCode::Iku7]);
        assert_eq!(codes, vec![IkuCode::Iku71, IkuCode::Iku7]);
        assert_eq!(expand_codes(&[]), ALL_IKU.to_vec());
    }

    #[test]
    fn parent_and_targets() {
        assert_eq!(IkuCode::Iku22.parent(), IkuCode::Iku2);
        assert_eq!(IkuCode::Iku62.parent(), IkuCode::Iku6);
        assert_eq!(IkuCode::Iku8.parent(), IkuCode::Iku8);
        assert_eq!(IkuCode::Iku41.target(), 20.14);
        assert_eq!(IkuCode::Iku42.target_label(), "20.14%");
        assert_eq!(IkuCode::Iku11.target_label(), "60%");
        assert_eq!(IkuCode::Iku6.target_label(), "2 per prodi");
        assert!(IkuCode::Iku51.is_number_based());
        assert!(!IkuCode::Iku71.is_number_based());
    }
}
