use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};

pub fn ensure_bins<I, S>(bins: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let missing = missing_bins(bins);
    if !missing.is_empty() {
        bail!(
            "missing required binaries in PATH: {}",
            missing.join(", ")
        );
    }
    Ok(())
}

pub fn missing_bins<I, S>(bins: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    bins.into_iter()
        .map(|b| b.as_ref().to_string())
        .filter(|b| which(b).is_none())
        .collect()
}

pub fn which(bin: &str) -> Option<PathBuf> {
    let p = Path::new(bin);
    if p.is_absolute() {
        return is_executable(p).then(|| p.to_path_buf());
    }
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(bin))
        .find(|cand| is_executable(cand))
}

fn is_executable(p: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(p) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, os::unix::fs::PermissionsExt};

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn absolute_executable_is_found() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("fake-lvs");
        fs::write(&bin, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(which(bin.to_str().unwrap()), Some(bin.clone()));
        assert!(missing_bins([bin.to_str().unwrap()]).is_empty());
    }

    #[test]
    fn non_executable_is_missing() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("plain");
        fs::write(&bin, "data").unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o644)).unwrap();

        let err = ensure_bins([bin.to_str().unwrap()]).unwrap_err().to_string();
        assert!(err.contains("missing required binaries"), "err was: {err}");
    }
}
