//! Chart configuration.
//!
//! Built-in defaults can be overlaid by a TOML file; any field missing from
//! the file keeps its default.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IkuError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub dpi: u32,
    pub font_size: f32,
    pub font_family: String,
    pub export_png: bool,
    pub export_svg: bool,
    pub target_linewidth: f32,
    pub colors: ColorPalette,
    pub faculty: String,
    pub university: String,
    pub year: u16,
}

/// Colour-blind friendly chart accents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub success: String,
    pub target: String,
    pub warning: String,
    pub neutral: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            font_size: 9.0,
            font_family: "Arial, Helvetica, DejaVu Sans, sans-serif".to_string(),
            export_png: true,
            export_svg: false,
            target_linewidth: 3.0,
            colors: ColorPalette::default(),
            faculty: "Fakultas Sains & Teknologi".to_string(),
            university: "Universitas Jambi".to_string(),
            year: 2025,
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            primary: "#0173B2".to_string(),
            secondary: "#DE8F05".to_string(),
            success: "#029E73".to_string(),
            target: "#D55E00".to_string(),
            warning: "#ECE133".to_string(),
            neutral: "#999999".to_string(),
        }
    }
}

impl ChartConfig {
    /// Loads a TOML overlay on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| IkuError::InvalidConfig {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|message| IkuError::InvalidConfig {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// `Fakultas Sains & Teknologi 2025`
    pub fn faculty_year(&self) -> String {
        format!("{} {}", self.faculty, self.year)
    }

    /// `Universitas Jambi 2025`
    pub fn university_year(&self) -> String {
        format!("{} {}", self.university, self.year)
    }
}

/// Overall achievement dashboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardVariant {
    Grid4x2,
    Bullet,
    Cards,
    Bullet4x2,
    Thermometer,
    Waffle,
}

impl DashboardVariant {
    pub const ALL: [DashboardVariant; 6] = [
        DashboardVariant::Grid4x2,
        DashboardVariant::Bullet,
        DashboardVariant::Cards,
        DashboardVariant::Bullet4x2,
        DashboardVariant::Thermometer,
        DashboardVariant::Waffle,
    ];

    /// Suffix used in output file names.
    pub const fn file_suffix(self) -> &'static str {
        match self {
            DashboardVariant::Grid4x2 => "4x2",
            DashboardVariant::Bullet => "bullet",
            DashboardVariant::Cards => "cards",
            DashboardVariant::Bullet4x2 => "bullet_4x2",
            DashboardVariant::Thermometer => "thermometer",
            DashboardVariant::Waffle => "waffle",
        }
    }

    /// `IKU_overall_achievement_<suffix>`
    pub fn file_name(self) -> String {
        format!("IKU_overall_achievement_{}", self.file_suffix())
    }
}

impl fmt::Display for DashboardVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

impl FromStr for DashboardVariant {
    type Err = IkuError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        DashboardVariant::ALL
            .into_iter()
            .find(|variant| variant.file_suffix() == normalized)
            .ok_or_else(|| IkuError::UnknownVariant(value.to_string()))
    }
}
