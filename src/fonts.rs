//! Font discovery for the PDF backend.
//!
//! `genpdf` needs TrueType files for every style of a family (`<Name>-Regular.ttf`,
//! `<Name>-Bold.ttf`, `<Name>-Italic.ttf`, `<Name>-BoldItalic.ttf`).  The bundled family is looked
//! up in this order:
//!
//! 1. `$RESUME_RENDER_FONTS_DIR`
//! 2. `assets/fonts` next to the running executable
//! 3. `assets/fonts` in the crate checkout
//!
//! When none of those contain the family, a system family is tried instead: the directory in
//! `$RESUME_RENDER_SYSTEM_FONTS_DIR`, Arial from the Windows font directory, or Liberation Sans
//! from the usual Linux location.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

const FONTS_DIR_VAR: &str = "RESUME_RENDER_FONTS_DIR";
const SYSTEM_FONTS_DIR_VAR: &str = "RESUME_RENDER_SYSTEM_FONTS_DIR";

const STYLE_SUFFIXES: &[&str] = &["Regular", "Bold", "Italic", "BoldItalic"];

/// A system family whose files do not follow the `<Name>-<Style>.ttf` convention.
struct SystemFamily {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const SYSTEM_FAMILIES: &[SystemFamily] = &[
    SystemFamily {
        name: "Arial",
        regular: "arial.ttf",
        bold: "arialbd.ttf",
        italic: "ariali.ttf",
        bold_italic: "arialbi.ttf",
    },
    SystemFamily {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
];

/// Directory holding the fonts shipped with the crate checkout.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path(FONTS_DIR_VAR) {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path, family: &str) -> Vec<String> {
    STYLE_SUFFIXES
        .iter()
        .map(|suffix| format!("{family}-{suffix}.ttf"))
        .filter(|name| !path.join(name).is_file())
        .collect()
}

fn resolve_font_directory(family: &str) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }
        let missing = missing_font_files(&candidate, family);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate font family '{}'. Checked: {}. See assets/fonts/README.md or set {}.",
            family,
            attempts.join(", "),
            FONTS_DIR_VAR
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_named_family(family: &str) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(family)?;
    debug!("loading font family '{}' from {}", family, directory.display());

    fonts::from_files(&directory, family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                family,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn system_font_directories() -> Vec<PathBuf> {
    let mut directories = Vec::new();
    if let Some(path) = env_path(SYSTEM_FONTS_DIR_VAR) {
        directories.push(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                directories.push(root.join("Fonts"));
            }
        }
    }

    #[cfg(target_os = "linux")]
    {
        directories.push(PathBuf::from("/usr/share/fonts/truetype/liberation"));
        directories.push(PathBuf::from("/usr/share/fonts/liberation-sans"));
    }

    directories
}

fn load_font_file(directory: &Path, file: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!("Failed to load font at {}: {}", path.display(), err),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_system_family(
    directory: &Path,
    family: &SystemFamily,
) -> Result<FontFamily<FontData>, Error> {
    Ok(FontFamily {
        regular: load_font_file(directory, family.regular)?,
        bold: load_font_file(directory, family.bold)?,
        italic: load_font_file(directory, family.italic)?,
        bold_italic: load_font_file(directory, family.bold_italic)?,
    })
}

fn system_fallback_font_family() -> Result<FontFamily<FontData>, Error> {
    let mut failures = Vec::new();
    for directory in system_font_directories() {
        for family in SYSTEM_FAMILIES {
            if !directory.join(family.regular).is_file() {
                continue;
            }
            match load_system_family(&directory, family) {
                Ok(loaded) => {
                    debug!(
                        "using system font family '{}' from {}",
                        family.name,
                        directory.display()
                    );
                    return Ok(loaded);
                }
                Err(err) => failures.push(err.to_string()),
            }
        }
    }

    let detail = if failures.is_empty() {
        "no system font family found".to_owned()
    } else {
        failures.join("; ")
    };
    Err(Error::new(
        format!("System font fallback failed: {}", detail),
        io::Error::new(io::ErrorKind::NotFound, "system fonts not available"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Loads `family` from the font directories, falling back to a system family when its files are
/// missing.
pub fn font_family(family: &str) -> Result<FontFamily<FontData>, Error> {
    match load_named_family(family) {
        Ok(loaded) => Ok(loaded),
        Err(err) if fonts_missing(&err) => match system_fallback_font_family() {
            Ok(fallback) => {
                warn!("Font family '{}' unavailable ({}); using a system family.", family, err);
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Font family '{}' unavailable ({}); system fallback failed: {}",
                    family, err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Font family '{}' unavailable and system fallback failed: {}",
                        family, fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "no usable fonts"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Loads the bundled Roboto family (or its system fallback).
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    font_family(DEFAULT_FONT_FAMILY_NAME)
}

/// Indicates whether `family` or a system fallback can be loaded without error.
pub fn fonts_available(family: &str) -> bool {
    resolve_font_directory(family).is_ok()
        || system_font_directories().iter().any(|directory| {
            SYSTEM_FAMILIES
                .iter()
                .any(|system| directory.join(system.regular).is_file())
        })
}

/// Indicates whether the default family or a system fallback is available.
pub fn default_fonts_available() -> bool {
    fonts_available(DEFAULT_FONT_FAMILY_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_listed_per_style() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(dir.path().join("Roboto-Regular.ttf"), b"").expect("write stub");
        let missing = missing_font_files(dir.path(), "Roboto");
        assert_eq!(
            missing,
            ["Roboto-Bold.ttf", "Roboto-Italic.ttf", "Roboto-BoldItalic.ttf"]
        );
    }

    #[test]
    fn unknown_family_reports_not_found() {
        let err = resolve_font_directory("NoSuchFamily__").unwrap_err();
        assert!(fonts_missing(&err));
        assert!(err.to_string().contains("NoSuchFamily__"));
    }
}
