//! Program → jurusan lookup, display order and palette.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Jurusan {
    #[serde(rename = "MIPA")]
    Mipa,
    #[serde(rename = "Teknik Geologi")]
    TeknikGeologi,
    #[serde(rename = "Teknik Kimia")]
    TeknikKimia,
    #[serde(rename = "Teknik Sipil")]
    TeknikSipil,
    #[serde(rename = "Teknik Elektro")]
    TeknikElektro,
    #[serde(rename = "D3")]
    D3,
}

/// Display order used by every grouped chart.
pub const JURUSAN_ORDER: [Jurusan; 6] = [
    Jurusan::Mipa,
    Jurusan::TeknikGeologi,
    Jurusan::TeknikKimia,
    Jurusan::TeknikSipil,
    Jurusan::TeknikElektro,
    Jurusan::D3,
];

/// Canonical program names and the jurusan they belong to.
pub const PROGRAMS: [(&str, Jurusan); 17] = [
    ("Matematika", Jurusan::Mipa),
    ("Biologi", Jurusan::Mipa),
    ("Fisika", Jurusan::Mipa),
    ("Kimia", Jurusan::Mipa),
    ("Teknik Geofisika", Jurusan::TeknikGeologi),
    ("Teknik Geologi", Jurusan::TeknikGeologi),
    ("Teknik Kimia", Jurusan::TeknikKimia),
    ("Teknik Lingkungan", Jurusan::TeknikKimia),
    ("Teknik Sipil", Jurusan::TeknikSipil),
    ("Teknik Pertambangan", Jurusan::TeknikSipil),
    ("Teknik Elektro", Jurusan::TeknikElektro),
    ("Sistem Informasi", Jurusan::TeknikElektro),
    ("Informatika", Jurusan::TeknikElektro),
    ("Analis Kimia (D3)", Jurusan::D3),
    ("Kimia Industri (D3)", Jurusan::D3),
    // Short forms seen in some exports before suffix normalization.
    ("Analis Kimia", Jurusan::D3),
    ("Kimia Industri", Jurusan::D3),
];

// Long department names used in the lecturer and practitioner sheets.
const JURUSAN_ALIASES: [(&str, Jurusan); 4] = [
    ("Jurusan Matematika dan Ilmu Pengetahuan Alam", Jurusan::Mipa),
    ("Jurusan Teknik Kebumian", Jurusan::TeknikGeologi),
    ("Jurusan Teknik Sipil, Kimia dan Lingkungan", Jurusan::TeknikSipil),
    ("Jurusan Teknik Elektro dan Informatika", Jurusan::TeknikElektro),
];

/// Base, light and dark shade of a jurusan colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub base: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
}

impl Jurusan {
    pub const fn name(self) -> &'static str {
        match self {
            Jurusan::Mipa => "MIPA",
            Jurusan::TeknikGeologi => "Teknik Geologi",
            Jurusan::TeknikKimia => "Teknik Kimia",
            Jurusan::TeknikSipil => "Teknik Sipil",
            Jurusan::TeknikElektro => "Teknik Elektro",
            Jurusan::D3 => "D3",
        }
    }

    pub const fn palette(self) -> Palette {
        match self {
            Jurusan::Mipa => Palette {
                base: "#5B9BD5",
                light: "#9DC3E6",
                dark: "#2E75B6",
            },
            Jurusan::TeknikGeologi => Palette {
                base: "#ED7D31",
                light: "#F4B183",
                dark: "#C65911",
            },
            Jurusan::TeknikKimia => Palette {
                base: "#70AD47",
                light: "#A8D08D",
                dark: "#548235",
            },
            Jurusan::TeknikSipil => Palette {
                base: "#9966CC",
                light: "#C5A8E0",
                dark: "#7030A0",
            },
            Jurusan::TeknikElektro => Palette {
                base: "#E85D75",
                light: "#F4A6B7",
                dark: "#C13552",
            },
            Jurusan::D3 => Palette {
                base: "#7F8C8D",
                light: "#BDC3C7",
                dark: "#5D6D7E",
            },
        }
    }

    /// Position in [`JURUSAN_ORDER`].
    pub fn order(self) -> usize {
        JURUSAN_ORDER
            .iter()
            .position(|jurusan| *jurusan == self)
            .unwrap_or(JURUSAN_ORDER.len())
    }

    /// Resolves a jurusan label, accepting both short names and the long
    /// department names. Returns `None` for unrecognised labels.
    pub fn from_label(label: &str) -> Option<Jurusan> {
        let label = label.trim();
        JURUSAN_ORDER
            .iter()
            .copied()
            .find(|jurusan| jurusan.name() == label)
            .or_else(|| {
                JURUSAN_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == label)
                    .map(|(_, jurusan)| *jurusan)
            })
    }
}

impl fmt::Display for Jurusan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Jurusan of a program, or `None` when the program is not in [`PROGRAMS`].
pub fn lookup_jurusan(program: &str) -> Option<Jurusan> {
    PROGRAMS
        .iter()
        .find(|(name, _)| *name == program)
        .map(|(_, jurusan)| *jurusan)
}

/// Jurusan of a program; unmapped programs land in MIPA.
pub fn jurusan_for(program: &str) -> Jurusan {
    lookup_jurusan(program).unwrap_or(Jurusan::Mipa)
}

/// Bar colour for a program within its jurusan group.
///
/// A single-program group uses the base shade; larger groups run from the
/// dark shade (first) to the light shade (last) with base in between.
pub fn program_color(program: &str, index_in_jurusan: usize, total_in_jurusan: usize) -> &'static str {
    let palette = jurusan_for(program).palette();
    if total_in_jurusan <= 1 {
        palette.base
    } else if index_in_jurusan == 0 {
        palette.dark
    } else if index_in_jurusan + 1 == total_in_jurusan {
        palette.light
    } else {
        palette.base
    }
}

/// Anything that carries a program label.
pub trait HasProgram {
    fn program(&self) -> &str;
}

/// Stable sort by (jurusan order, program name).
pub fn sort_by_jurusan<T: HasProgram>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        jurusan_for(a.program())
            .order()
            .cmp(&jurusan_for(b.program()).order())
            .then_with(|| a.program().cmp(b.program()))
    });
}

/// Colours for rows already sorted with [`sort_by_jurusan`].
pub fn assign_colors<T: HasProgram>(rows: &[T]) -> Vec<&'static str> {
    let mut colors = Vec::with_capacity(rows.len());
    for jurusan in JURUSAN_ORDER {
        let members: Vec<&T> = rows
            .iter()
            .filter(|row| jurusan_for(row.program()) == jurusan)
            .collect();
        let total = members.len();
        for (index, row) in members.into_iter().enumerate() {
            colors.push(program_color(row.program(), index, total));
        }
    }
    colors
}
