//! Recognized CAD/BIM formats.
//!
//! The allow-list drives two decisions: whether a file is eligible for
//! whitespace-normalized hashing, and which header probe the metadata
//! collector runs. Files outside the list are still processed through the
//! raw/binary paths.

use std::path::Path;

use crate::errors::{DesignProofError, DesignProofResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CadFormat {
    Dwg,
    Dxf,
    Rvt,
    Ifc,
    Step,
    Stp,
    Iges,
    Igs,
    SldPrt,
    SldAsm,
    Skp,
}

impl CadFormat {
    pub const ALL: [CadFormat; 11] = [
        Self::Dwg,
        Self::Dxf,
        Self::Rvt,
        Self::Ifc,
        Self::Step,
        Self::Stp,
        Self::Iges,
        Self::Igs,
        Self::SldPrt,
        Self::SldAsm,
        Self::Skp,
    ];

    /// Match an extension, with or without the leading dot, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|f| f.extension().eq_ignore_ascii_case(ext))
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Like [`CadFormat::from_path`], but reports an unrecognized extension as
    /// `UnsupportedFormat`. Callers treat that error as advisory.
    pub fn require(path: &Path) -> DesignProofResult<Self> {
        Self::from_path(path).ok_or_else(|| {
            DesignProofError::UnsupportedFormat(dotted_extension(path))
        })
    }

    /// Extension without the dot, lowercase.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Dwg => "dwg",
            Self::Dxf => "dxf",
            Self::Rvt => "rvt",
            Self::Ifc => "ifc",
            Self::Step => "step",
            Self::Stp => "stp",
            Self::Iges => "iges",
            Self::Igs => "igs",
            Self::SldPrt => "sldprt",
            Self::SldAsm => "sldasm",
            Self::Skp => "skp",
        }
    }

    /// Text-based exchange formats, eligible for normalized hashing.
    pub fn is_text_based(&self) -> bool {
        matches!(
            self,
            Self::Dxf | Self::Ifc | Self::Step | Self::Stp | Self::Iges | Self::Igs
        )
    }

    /// STEP and IGES share the same header probe.
    pub fn is_step_family(&self) -> bool {
        matches!(self, Self::Step | Self::Stp | Self::Iges | Self::Igs)
    }
}

/// Lowercased extension of `path` with its leading dot, or an empty string.
pub fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
