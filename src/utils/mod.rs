pub mod bins;
pub mod process;

pub mod mounts {
    use std::path::{Path, PathBuf};

    /// One row of `/proc/mounts`, with the kernel's octal escapes decoded.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MountEntry {
        pub device: PathBuf,
        pub mount_point: PathBuf,
    }

    pub fn parse_mounts(raw: &str) -> Vec<MountEntry> {
        raw.lines()
            .filter_map(|line| {
                let mut it = line.split_whitespace();
                let device = it.next()?;
                let mount_point = it.next()?;
                Some(MountEntry {
                    device: PathBuf::from(unescape(device)),
                    mount_point: PathBuf::from(unescape(mount_point)),
                })
            })
            .collect()
    }

    /// Decodes `\040`-style escapes used for space, tab, newline and backslash.
    pub fn unescape(field: &str) -> String {
        let bytes = field.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'\\'
                && i + 3 < bytes.len()
                && bytes[i + 1..=i + 3].iter().all(|b| (b'0'..=b'7').contains(b))
            {
                let oct = std::str::from_utf8(&bytes[i + 1..=i + 3]).unwrap_or("0");
                if let Ok(v) = u8::from_str_radix(oct, 8) {
                    out.push(v);
                    i += 4;
                    continue;
                }
            }
            out.push(bytes[i]);
            i += 1;
        }
        String::from_utf8_lossy(&out).into_owned()
    }

    /// Resolves symlinks when the path exists; otherwise keeps it verbatim.
    #[inline]
    pub fn canonical(p: &Path) -> PathBuf {
        std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf())
    }

}
