use thiserror::Error;

/// Failures of the activation workflow that callers may want to tell apart.
///
/// Command failures (mount, chown, systemctl...) are not listed here: they
/// travel as `anyhow` errors with the failing command and step attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActivateError {
    #[error("could not find {what}")]
    NotFound { what: String },

    #[error("{count} volumes match {filter}, expected exactly one")]
    Ambiguous { filter: String, count: usize },

    #[error("unable to detect an lv or device journal for OSD {osd_id}")]
    JournalNotFound { osd_id: String },

    #[error("volume {path} is missing required tag {tag}")]
    MissingTag { path: String, tag: &'static str },

    #[error("this command needs root privileges (effective uid {euid})")]
    Permission { euid: u32 },

    #[error("volume discovery failed: {reason}")]
    Discovery { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_message_carries_count() {
        let e = ActivateError::Ambiguous {
            filter: "{ceph.type=data}".into(),
            count: 2,
        };
        assert_eq!(
            e.to_string(),
            "2 volumes match {ceph.type=data}, expected exactly one"
        );
    }

    #[test]
    fn downcast_through_anyhow() {
        let err: anyhow::Error = ActivateError::JournalNotFound {
            osd_id: "7".into(),
        }
        .into();
        let err = err.context("[activate] osd.7: resolve journal");
        assert!(matches!(
            err.downcast_ref::<ActivateError>(),
            Some(ActivateError::JournalNotFound { osd_id }) if osd_id == "7"
        ));
    }
}
