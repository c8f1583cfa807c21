use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    path::PathBuf,
};

use crate::error::ActivateError;

pub const TAG_OSD_ID: &str = "ceph.osd_id";
pub const TAG_OSD_FSID: &str = "ceph.osd_fsid";
pub const TAG_TYPE: &str = "ceph.type";
pub const TAG_JOURNAL_UUID: &str = "ceph.journal_uuid";
pub const TAG_JOURNAL_DEVICE: &str = "ceph.journal_device";
pub const TAG_PREFIX: &str = "ceph.";

/// Key/value tags of one logical volume, as written at prepare time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Parses the `lv_tags` column (`k1=v1,k2=v2`). Entries without `=` are
    /// returned separately so the caller can report them.
    pub fn parse(raw: &str) -> (Self, Vec<String>) {
        let mut map = BTreeMap::new();
        let mut rejected = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match entry.split_once('=') {
                Some((k, v)) if !k.trim().is_empty() => {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
                _ => rejected.push(entry.to_string()),
            }
        }
        (Self(map), rejected)
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn has_ceph_tags(&self) -> bool {
        self.0.keys().any(|k| k.starts_with(TAG_PREFIX))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    /// LV name (e.g. "osd-data-0")
    pub name: String,
    /// Owning volume group
    pub vg: String,
    /// Device path as reported by LVM (e.g. /dev/ceph-vg/osd-data-0)
    pub path: PathBuf,
    pub tags: Tags,
}

impl Volume {
    #[inline]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key)
    }
}

/// Conjunction of exact `tag = value` predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter(BTreeSet<(String, String)>);

impl TagFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert((key.into(), value.into()));
        self
    }

    /// Both filters at once. Two values for one key match nothing.
    #[must_use]
    pub fn and(&self, other: &TagFilter) -> TagFilter {
        TagFilter(self.0.union(&other.0).cloned().collect())
    }

    pub fn matches(&self, tags: &Tags) -> bool {
        self.0.iter().all(|(k, v)| tags.get(k) == Some(v.as_str()))
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Snapshot of discovered volumes. Narrowing returns a new set; the
/// original is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeSet {
    vols: Vec<Volume>,
}

impl VolumeSet {
    pub fn new(vols: Vec<Volume>) -> Self {
        Self { vols }
    }

    #[must_use]
    pub fn filter(&self, f: &TagFilter) -> VolumeSet {
        self.vols
            .iter()
            .filter(|v| f.matches(&v.tags))
            .cloned()
            .collect()
    }

    /// Exactly one volume must match.
    pub fn get(&self, f: &TagFilter) -> Result<&Volume, ActivateError> {
        match self.find(f)? {
            Some(v) => Ok(v),
            None => Err(ActivateError::NotFound {
                what: format!("volume with tags {f}"),
            }),
        }
    }

    /// Zero or one volume may match; more than one is an error.
    pub fn find(&self, f: &TagFilter) -> Result<Option<&Volume>, ActivateError> {
        let mut hits = self.vols.iter().filter(|v| f.matches(&v.tags));
        let first = hits.next();
        let rest = hits.count();
        if rest > 0 {
            return Err(ActivateError::Ambiguous {
                filter: f.to_string(),
                count: rest + 1,
            });
        }
        Ok(first)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vols.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vols.len()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Volume> {
        self.vols.iter()
    }
}

impl FromIterator<Volume> for VolumeSet {
    fn from_iter<T: IntoIterator<Item = Volume>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
pub(crate) fn lv(path: &str, tags: &[(&str, &str)]) -> Volume {
    let p = std::path::Path::new(path);
    Volume {
        name: p
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        vg: p
            .parent()
            .and_then(|d| d.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: p.to_path_buf(),
        tags: tags.iter().copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VolumeSet {
        VolumeSet::new(vec![
            lv(
                "/dev/vg0/data0",
                &[(TAG_OSD_ID, "0"), (TAG_OSD_FSID, "aaa"), (TAG_TYPE, "data")],
            ),
            lv(
                "/dev/vg0/journal0",
                &[(TAG_OSD_ID, "0"), (TAG_OSD_FSID, "aaa"), (TAG_TYPE, "journal")],
            ),
            lv(
                "/dev/vg1/data1",
                &[(TAG_OSD_ID, "1"), (TAG_OSD_FSID, "bbb"), (TAG_TYPE, "data")],
            ),
            lv("/dev/vg1/home", &[]),
        ])
    }

    #[test]
    fn parse_tags_skips_malformed_entries() {
        let (tags, bad) = Tags::parse("ceph.osd_id=3,broken,ceph.type=data,,=x");
        assert_eq!(tags.get(TAG_OSD_ID), Some("3"));
        assert_eq!(tags.get(TAG_TYPE), Some("data"));
        assert_eq!(bad, vec!["broken".to_string(), "=x".to_string()]);
    }

    #[test]
    fn parse_tags_keeps_equals_in_value() {
        let (tags, bad) = Tags::parse("ceph.journal_device=/dev/disk/by-id/a=b");
        assert!(bad.is_empty());
        assert_eq!(tags.get(TAG_JOURNAL_DEVICE), Some("/dev/disk/by-id/a=b"));
    }

    #[test]
    fn filter_leaves_original_untouched() {
        let all = sample();
        let narrowed = all.filter(&TagFilter::new().tag(TAG_OSD_ID, "0"));
        assert_eq!(narrowed.len(), 2);
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn filter_composition_equals_conjunction() {
        let all = sample();
        let p1 = TagFilter::new().tag(TAG_OSD_FSID, "aaa");
        let p2 = TagFilter::new().tag(TAG_TYPE, "data");

        let chained = all.filter(&p1).filter(&p2);
        let joint = all.filter(&p1.and(&p2));
        assert_eq!(chained, joint);
        assert_eq!(joint.len(), 1);
        assert_eq!(joint.iter().next().unwrap().path, PathBuf::from("/dev/vg0/data0"));
    }

    #[test]
    fn filter_never_grows() {
        let all = sample();
        let once = all.filter(&TagFilter::new().tag(TAG_TYPE, "data"));
        let twice = once.filter(&TagFilter::new());
        assert!(once.len() <= all.len());
        assert_eq!(twice, once);
    }

    #[test]
    fn and_with_conflicting_values_matches_nothing() {
        let all = sample();
        let f = TagFilter::new()
            .tag(TAG_OSD_ID, "0")
            .and(&TagFilter::new().tag(TAG_OSD_ID, "1"));
        assert!(all.filter(&f).is_empty());
        assert!(
            all.filter(&TagFilter::new().tag(TAG_OSD_ID, "0"))
                .filter(&TagFilter::new().tag(TAG_OSD_ID, "1"))
                .is_empty()
        );
    }

    #[test]
    fn get_zero_one_many() {
        let all = sample();

        let none = all.get(&TagFilter::new().tag(TAG_OSD_ID, "9")).unwrap_err();
        assert!(matches!(none, ActivateError::NotFound { .. }));

        let one = all
            .get(&TagFilter::new().tag(TAG_OSD_ID, "1"))
            .unwrap();
        assert_eq!(one.name, "data1");
        assert_eq!(one.vg, "vg1");

        let many = all.get(&TagFilter::new().tag(TAG_TYPE, "data")).unwrap_err();
        assert_eq!(
            many,
            ActivateError::Ambiguous {
                filter: "{ceph.type=data}".into(),
                count: 2
            }
        );
    }

    #[test]
    fn find_tolerates_absence_only() {
        let all = sample();
        assert!(
            all.find(&TagFilter::new().tag(TAG_TYPE, "journal").tag(TAG_OSD_ID, "1"))
                .unwrap()
                .is_none()
        );
        assert!(all.find(&TagFilter::new().tag(TAG_TYPE, "data")).is_err());
    }

    #[test]
    fn get_does_not_narrow_the_set() {
        let all = sample();
        let _ = all.get(&TagFilter::new().tag(TAG_OSD_ID, "1"));
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn ceph_tag_detection() {
        let set = sample();
        let flags: Vec<bool> = set.iter().map(|v| v.tags.has_ceph_tags()).collect();
        assert_eq!(flags, vec![true, true, true, false]);
    }
}
