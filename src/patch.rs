//! Per-file version patchers.
//!
//! Each release target is a [FileChange]: a path paired with a text-rewrite
//! rule. Changes are planned up front and only applied once the target
//! version has been fully resolved, so an invalid version argument never
//! touches a file.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ReleaseError, Result};
use crate::version::Version;

/// Outcome of running a rewrite rule against a file's current text.
///
/// `NoMatch` (the expected pattern is gone, the file format drifted) is kept
/// separate from `Unchanged` (pattern found, text already at the target
/// version). Only the former is fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    /// The rule matched and produced different text.
    Replaced(String),
    /// The rule matched but the text is already up to date.
    Unchanged,
    /// The expected pattern was not found.
    NoMatch { pattern: String },
}

/// Which rewrite rule a [FileChange] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatchRule {
    ManifestJson,
    InstallerDefine,
    UiConstant,
    VersionResource,
}

/// A deferred, named unit of work: one target file plus its rewrite rule.
#[derive(Debug, Clone)]
pub struct FileChange {
    label: &'static str,
    pub path: PathBuf,
    rule: PatchRule,
}

impl FileChange {
    /// Short human-readable name for status output.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Run this change's rewrite rule against `input` without touching
    /// the filesystem.
    pub fn rewrite(&self, input: &str, version: &Version) -> Result<PatchOutcome> {
        match self.rule {
            PatchRule::ManifestJson => rewrite_manifest(input, version),
            PatchRule::InstallerDefine => rewrite_installer(input, version),
            PatchRule::UiConstant => rewrite_ui_entry(input, version),
            PatchRule::VersionResource => rewrite_version_resource(input, version),
        }
    }

    /// Load the target file, apply the rewrite rule, and write the result
    /// back. A missing pattern is fatal; a file already at the target
    /// version is left untouched.
    pub fn apply(&self, version: &Version) -> Result<()> {
        let text = fs::read_to_string(&self.path)?;

        match self.rewrite(&text, version)? {
            PatchOutcome::Replaced(updated) => {
                fs::write(&self.path, updated)?;
                Ok(())
            }
            PatchOutcome::Unchanged => Ok(()),
            PatchOutcome::NoMatch { pattern } => Err(ReleaseError::PatternDrift {
                path: self.path.clone(),
                pattern,
            }),
        }
    }
}

/// Build the ordered list of file changes for one release.
pub fn plan_changes(root: &Path, config: &Config) -> Vec<FileChange> {
    let targets = &config.targets;
    vec![
        FileChange {
            label: "manifest",
            path: config.resolve(root, &targets.manifest),
            rule: PatchRule::ManifestJson,
        },
        FileChange {
            label: "installer script",
            path: config.resolve(root, &targets.installer_script),
            rule: PatchRule::InstallerDefine,
        },
        FileChange {
            label: "UI entry",
            path: config.resolve(root, &targets.ui_entry),
            rule: PatchRule::UiConstant,
        },
        FileChange {
            label: "version resource",
            path: config.resolve(root, &targets.version_resource),
            rule: PatchRule::VersionResource,
        },
    ]
}

/// Read the current version from the manifest's top-level `version` field.
pub fn read_manifest_version(path: &Path) -> Result<Version> {
    let text = fs::read_to_string(path).map_err(|e| {
        ReleaseError::config(format!("Cannot read manifest '{}': {}", path.display(), e))
    })?;

    let manifest: Value = serde_json::from_str(&text).map_err(|e| {
        ReleaseError::config(format!("Manifest '{}' is not valid JSON: {}", path.display(), e))
    })?;

    let raw = manifest
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ReleaseError::version(format!(
                "Manifest '{}' has no top-level \"version\" string field",
                path.display()
            ))
        })?;

    Version::parse(raw).ok_or_else(|| {
        ReleaseError::version(format!(
            "Manifest version '{}' is not a valid x.y.z version",
            raw
        ))
    })
}

/// Rewrite the manifest's `version` field by full re-serialization
/// (pretty-printed, key order preserved, trailing newline).
fn rewrite_manifest(input: &str, version: &Version) -> Result<PatchOutcome> {
    let mut manifest: Value = serde_json::from_str(input)?;

    let field = match manifest.as_object_mut() {
        Some(object) => object.get_mut("version"),
        None => None,
    };

    match field {
        Some(Value::String(current)) => {
            *current = version.to_string();
        }
        _ => {
            return Ok(PatchOutcome::NoMatch {
                pattern: "top-level \"version\" string field".to_string(),
            })
        }
    }

    let updated = format!("{}\n", serde_json::to_string_pretty(&manifest)?);
    if updated == input {
        Ok(PatchOutcome::Unchanged)
    } else {
        Ok(PatchOutcome::Replaced(updated))
    }
}

/// Rewrite the Inno Setup `#define MyAppVersion "X.Y.Z"` line.
fn rewrite_installer(input: &str, version: &Version) -> Result<PatchOutcome> {
    let re = Regex::new(r#"#define MyAppVersion "\d+\.\d+\.\d+""#)?;
    substitute(
        &re,
        input,
        format!(r#"#define MyAppVersion "{}""#, version),
        r#"#define MyAppVersion "X.Y.Z""#,
    )
}

/// Rewrite the `const APP_VERSION = "X.Y.Z<suffix>";` line, preserving any
/// trailing suffix text inside the quotes verbatim.
fn rewrite_ui_entry(input: &str, version: &Version) -> Result<PatchOutcome> {
    let re = Regex::new(r#"const APP_VERSION = "(\d+\.\d+\.\d+)([^"]*)";"#)?;

    if !re.is_match(input) {
        return Ok(PatchOutcome::NoMatch {
            pattern: r#"const APP_VERSION = "X.Y.Z...";"#.to_string(),
        });
    }

    let updated = re
        .replace(input, |caps: &regex::Captures| {
            format!(r#"const APP_VERSION = "{}{}";"#, version, &caps[2])
        })
        .into_owned();

    if updated == input {
        Ok(PatchOutcome::Unchanged)
    } else {
        Ok(PatchOutcome::Replaced(updated))
    }
}

/// Rewrite the Windows version-resource text: the `filevers`/`prodvers`
/// four-integer tuples (constant trailing 0) and the `FileVersion` /
/// `ProductVersion` string literals. All four patterns must be present.
fn rewrite_version_resource(input: &str, version: &Version) -> Result<PatchOutcome> {
    let tuple = format!(
        "({}, {}, {}, 0)",
        version.major, version.minor, version.patch
    );

    let mut text = input.to_string();
    let mut changed = false;

    for keyword in ["filevers", "prodvers"] {
        let re = Regex::new(&format!(
            r"{}=\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*,\s*\d+\s*\)",
            keyword
        ))?;
        match substitute(&re, &text, format!("{}={}", keyword, tuple), keyword)? {
            PatchOutcome::Replaced(updated) => {
                text = updated;
                changed = true;
            }
            PatchOutcome::Unchanged => {}
            no_match @ PatchOutcome::NoMatch { .. } => return Ok(no_match),
        }
    }

    for field in ["FileVersion", "ProductVersion"] {
        // PyInstaller version files may carry u'' string prefixes; keep them.
        let re = Regex::new(&format!(
            r"(StringStruct\(\s*u?'{}'\s*,\s*u?')[^']*('\s*\))",
            field
        ))?;

        if !re.is_match(&text) {
            return Ok(PatchOutcome::NoMatch {
                pattern: format!("StringStruct('{}', ...)", field),
            });
        }

        let updated = re
            .replace(&text, |caps: &regex::Captures| {
                format!("{}{}{}", &caps[1], version, &caps[2])
            })
            .into_owned();

        if updated != text {
            text = updated;
            changed = true;
        }
    }

    if changed {
        Ok(PatchOutcome::Replaced(text))
    } else {
        Ok(PatchOutcome::Unchanged)
    }
}

/// Apply a required single substitution: `NoMatch` when the pattern is
/// absent, `Unchanged` when the replacement is a no-op.
fn substitute(
    re: &Regex,
    input: &str,
    replacement: String,
    pattern: &str,
) -> Result<PatchOutcome> {
    if !re.is_match(input) {
        return Ok(PatchOutcome::NoMatch {
            pattern: pattern.to_string(),
        });
    }

    let updated = re
        .replace(input, regex::NoExpand(replacement.as_str()))
        .into_owned();
    if updated == input {
        Ok(PatchOutcome::Unchanged)
    } else {
        Ok(PatchOutcome::Replaced(updated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32, patch: u32) -> Version {
        Version::new(major, minor, patch)
    }

    #[test]
    fn test_rewrite_manifest() {
        let input = "{\n  \"name\": \"tokei\",\n  \"version\": \"2.0.5\",\n  \"private\": true\n}\n";
        let outcome = rewrite_manifest(input, &v(2, 1, 0)).unwrap();
        match outcome {
            PatchOutcome::Replaced(updated) => {
                assert!(updated.contains("\"version\": \"2.1.0\""));
                // Key order preserved through re-serialization
                let name_pos = updated.find("\"name\"").unwrap();
                let version_pos = updated.find("\"version\"").unwrap();
                let private_pos = updated.find("\"private\"").unwrap();
                assert!(name_pos < version_pos && version_pos < private_pos);
                assert!(updated.ends_with('\n'));
            }
            other => panic!("expected Replaced, got {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_manifest_missing_version_field() {
        let outcome = rewrite_manifest("{\"name\": \"tokei\"}", &v(1, 0, 0)).unwrap();
        assert!(matches!(outcome, PatchOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_rewrite_manifest_non_object() {
        let outcome = rewrite_manifest("[1, 2, 3]", &v(1, 0, 0)).unwrap();
        assert!(matches!(outcome, PatchOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_rewrite_manifest_invalid_json_is_an_error() {
        assert!(rewrite_manifest("not json", &v(1, 0, 0)).is_err());
    }

    #[test]
    fn test_rewrite_installer() {
        let input = "[Setup]\n#define MyAppVersion \"1.0.0\"\nAppName=Tokei\n";
        let outcome = rewrite_installer(input, &v(1, 0, 1)).unwrap();
        assert_eq!(
            outcome,
            PatchOutcome::Replaced(
                "[Setup]\n#define MyAppVersion \"1.0.1\"\nAppName=Tokei\n".to_string()
            )
        );
    }

    #[test]
    fn test_rewrite_installer_no_match() {
        let outcome = rewrite_installer("[Setup]\nAppName=Tokei\n", &v(1, 0, 1)).unwrap();
        assert!(matches!(outcome, PatchOutcome::NoMatch { .. }));
    }

    #[test]
    fn test_rewrite_installer_already_current() {
        let input = "#define MyAppVersion \"1.0.1\"\n";
        let outcome = rewrite_installer(input, &v(1, 0, 1)).unwrap();
        assert_eq!(outcome, PatchOutcome::Unchanged);
    }

    #[test]
    fn test_rewrite_ui_entry_preserves_suffix() {
        let input = "const APP_VERSION = \"1.0.0 (alpha)\";\n";
        let outcome = rewrite_ui_entry(input, &v(1, 0, 1)).unwrap();
        assert_eq!(
            outcome,
            PatchOutcome::Replaced("const APP_VERSION = \"1.0.1 (alpha)\";\n".to_string())
        );
    }

    #[test]
    fn test_rewrite_ui_entry_without_suffix() {
        let input = "const APP_VERSION = \"1.0.0\";\n";
        let outcome = rewrite_ui_entry(input, &v(2, 0, 0)).unwrap();
        assert_eq!(
            outcome,
            PatchOutcome::Replaced("const APP_VERSION = \"2.0.0\";\n".to_string())
        );
    }

    #[test]
    fn test_rewrite_ui_entry_no_match() {
        let outcome = rewrite_ui_entry("const OTHER = 1;\n", &v(1, 0, 1)).unwrap();
        assert!(matches!(outcome, PatchOutcome::NoMatch { .. }));
    }

    const VERSION_RESOURCE: &str = "\
VSVersionInfo(
  ffi=FixedFileInfo(
    filevers=(1, 0, 0, 0),
    prodvers=(1, 0, 0, 0),
  ),
  kids=[
    StringStruct(u'FileVersion', u'1.0.0'),
    StringStruct(u'ProductVersion', u'1.0.0'),
  ]
)
";

    #[test]
    fn test_rewrite_version_resource() {
        let outcome = rewrite_version_resource(VERSION_RESOURCE, &v(2, 1, 0)).unwrap();
        match outcome {
            PatchOutcome::Replaced(updated) => {
                assert!(updated.contains("filevers=(2, 1, 0, 0)"));
                assert!(updated.contains("prodvers=(2, 1, 0, 0)"));
                assert!(updated.contains("StringStruct(u'FileVersion', u'2.1.0')"));
                assert!(updated.contains("StringStruct(u'ProductVersion', u'2.1.0')"));
            }
            other => panic!("expected Replaced, got {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_version_resource_without_unicode_prefix() {
        let input = "filevers=(1, 0, 0, 0)\nprodvers=(1, 0, 0, 0)\n\
StringStruct('FileVersion', '1.0.0')\nStringStruct('ProductVersion', '1.0.0')\n";
        let outcome = rewrite_version_resource(input, &v(1, 1, 0)).unwrap();
        match outcome {
            PatchOutcome::Replaced(updated) => {
                assert!(updated.contains("StringStruct('FileVersion', '1.1.0')"));
            }
            other => panic!("expected Replaced, got {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_version_resource_missing_prodvers() {
        let input = "filevers=(1, 0, 0, 0)\n\
StringStruct(u'FileVersion', u'1.0.0')\nStringStruct(u'ProductVersion', u'1.0.0')\n";
        let outcome = rewrite_version_resource(input, &v(1, 1, 0)).unwrap();
        match outcome {
            PatchOutcome::NoMatch { pattern } => assert_eq!(pattern, "prodvers"),
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_changes_order() {
        let config = Config::default();
        let changes = plan_changes(Path::new("/repo"), &config);
        let labels: Vec<&str> = changes.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["manifest", "installer script", "UI entry", "version resource"]
        );
        assert_eq!(changes[0].path, PathBuf::from("/repo/package.json"));
    }
}
