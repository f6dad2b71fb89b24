//! Container identity derived from the app folder.
//!
//! The name is recomputed on every invocation, so `run` and `attach` from the
//! same folder always agree on it. Two folders with the same base name map
//! to the same container; that collision is accepted. Names are cut to 63
//! characters so they stay valid hostnames.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::CcdError;

/// Prefix shared by every container ccd manages.
pub const NAME_PREFIX: &str = "ccd";

/// Longest hostname the runtime accepts (one DNS label).
pub const MAX_NAME_LEN: usize = 63;

/// Name and hostname of the container for one app folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerIdentity {
    pub name: String,
    pub hostname: String,
}

impl ContainerIdentity {
    /// Derive the identity from an already canonical folder path.
    pub fn for_folder(folder: &Path) -> Result<Self, CcdError> {
        let base = folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let sanitized = sanitize(&base);
        let slug = truncate_slug(&sanitized, MAX_NAME_LEN - NAME_PREFIX.len() - 1);
        if slug.is_empty() {
            return Err(CcdError::EmptyIdentity {
                folder: folder.display().to_string(),
            });
        }

        let name = format!("{NAME_PREFIX}-{slug}");
        Ok(Self {
            hostname: name.clone(),
            name,
        })
    }

    /// Canonicalise `folder` and derive its identity.
    pub fn resolve(folder: &Path) -> Result<(PathBuf, Self), CcdError> {
        let app_folder = resolve_app_folder(folder)?;
        let identity = Self::for_folder(&app_folder)?;
        Ok((app_folder, identity))
    }
}

impl fmt::Display for ContainerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Make `folder` absolute with symlinks resolved; it must be a directory.
pub fn resolve_app_folder(folder: &Path) -> Result<PathBuf, CcdError> {
    let resolved = folder
        .canonicalize()
        .map_err(|_| CcdError::AppFolderNotFound {
            path: folder.to_path_buf(),
        })?;

    if !resolved.is_dir() {
        return Err(CcdError::NotADirectory { path: resolved });
    }

    Ok(resolved)
}

/// Reduce a folder name to `[a-z0-9-]`, collapsing and trimming separators.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && (out.is_empty() || out.ends_with('-')) {
            continue;
        }
        out.push(c);
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Cut an ASCII slug to `max` bytes without leaving a trailing `-`.
fn truncate_slug(slug: &str, max: usize) -> &str {
    slug.get(..max).unwrap_or(slug).trim_end_matches('-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn sanitize_examples() {
        assert_eq!(sanitize("my-app"), "my-app");
        assert_eq!(sanitize("My App"), "my-app");
        assert_eq!(sanitize("__weird..name__"), "weird-name");
        assert_eq!(sanitize("a---b"), "a-b");
        assert_eq!(sanitize("Über_Projekt"), "ber-projekt");
        assert_eq!(sanitize("@@@"), "");
    }

    #[test]
    fn name_and_hostname_match() {
        let id = ContainerIdentity::for_folder(Path::new("/home/u/my-app")).unwrap();
        assert_eq!(id.name, "ccd-my-app");
        assert_eq!(id.hostname, "ccd-my-app");
    }

    #[test]
    fn long_folder_names_fit_a_dns_label() {
        let folder = format!("/src/{}", "a".repeat(100));
        let id = ContainerIdentity::for_folder(Path::new(&folder)).unwrap();
        assert_eq!(id.hostname.len(), MAX_NAME_LEN);
        assert_eq!(id.name, id.hostname);
        assert_eq!(id, ContainerIdentity::for_folder(Path::new(&folder)).unwrap());
    }

    #[test]
    fn truncation_never_ends_with_separator() {
        // the cut lands right after the `-` at index 58
        let folder = format!("/src/{}-{}", "a".repeat(58), "b".repeat(10));
        let id = ContainerIdentity::for_folder(Path::new(&folder)).unwrap();
        assert_eq!(id.name, format!("ccd-{}", "a".repeat(58)));
    }

    #[test]
    fn symbol_only_folder_is_an_error() {
        let err = ContainerIdentity::for_folder(Path::new("/tmp/+++")).unwrap_err();
        assert!(matches!(err, CcdError::EmptyIdentity { .. }));
    }

    #[test]
    fn root_has_no_identity() {
        assert!(ContainerIdentity::for_folder(Path::new("/")).is_err());
    }

    #[test]
    fn resolve_canonicalises_relative_paths() {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("Project_X");
        std::fs::create_dir(&app).unwrap();

        let dotted = app.join("..").join("Project_X");
        let (resolved, id) = ContainerIdentity::resolve(&dotted).unwrap();

        assert_eq!(resolved, app.canonicalize().unwrap());
        assert_eq!(id.name, "ccd-project-x");
    }

    #[test]
    fn resolve_rejects_missing_folder() {
        let temp = TempDir::new().unwrap();
        let err = ContainerIdentity::resolve(&temp.path().join("missing")).unwrap_err();
        assert!(matches!(err, CcdError::AppFolderNotFound { .. }));
    }

    #[test]
    fn resolve_rejects_files() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        std::fs::write(&file, "").unwrap();
        let err = ContainerIdentity::resolve(&file).unwrap_err();
        assert!(matches!(err, CcdError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn resolve_follows_symlinks() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real-app");
        std::fs::create_dir(&real).unwrap();
        let link = temp.path().join("alias");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let (_, id) = ContainerIdentity::resolve(&link).unwrap();
        assert_eq!(id.name, "ccd-real-app");
    }
}
