//! Bounded activity feed, most recent first.
use std::{collections::VecDeque, fmt};

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityTag {
    Boot,
    Sync,
    Scan,
    Access,
    Deny,
    Cast,
    Live,
}

impl ActivityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityTag::Boot => "BOOT",
            ActivityTag::Sync => "SYNC",
            ActivityTag::Scan => "SCAN",
            ActivityTag::Access => "ACCESS",
            ActivityTag::Deny => "DENY",
            ActivityTag::Cast => "CAST",
            ActivityTag::Live => "LIVE",
        }
    }
}

impl fmt::Display for ActivityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActivityEntry {
    pub tag: ActivityTag,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    cap: usize,
}

impl ActivityLog {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(cap + 1),
            cap,
        }
    }

    pub fn push(&mut self, tag: ActivityTag, message: impl Into<String>) {
        self.entries.push_front(ActivityEntry {
            tag,
            message: message.into(),
        });

        self.entries.truncate(self.cap);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn latest(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_most_recent_first() {
        let mut log = ActivityLog::new(9);
        log.push(ActivityTag::Boot, "Interface online");
        log.push(ActivityTag::Scan, "Fingerprint pattern requested");

        let tags: Vec<_> = log.iter().map(|entry| entry.tag).collect();
        assert_eq!(tags, [ActivityTag::Scan, ActivityTag::Boot]);
        assert_eq!(log.latest().unwrap().message, "Fingerprint pattern requested");
    }

    #[test]
    fn test_evicts_oldest() {
        let mut log = ActivityLog::new(9);
        for i in 0..12 {
            log.push(ActivityTag::Live, format!("packet {i}"));
        }

        assert_eq!(log.len(), 9);
        assert_eq!(log.latest().unwrap().message, "packet 11");
        assert_eq!(log.iter().last().unwrap().message, "packet 3");
    }

    #[test]
    fn test_tag_labels() {
        assert_eq!(ActivityTag::Access.to_string(), "ACCESS");
        assert_eq!(
            serde_json::to_string(&ActivityTag::Live).unwrap(),
            "\"LIVE\""
        );
    }

    proptest! {
        #[test]
        fn property_log_never_exceeds_cap(cap in 1usize..16, pushes in 0usize..64) {
            let mut log = ActivityLog::new(cap);
            for i in 0..pushes {
                log.push(ActivityTag::Live, i.to_string());
                prop_assert!(log.len() <= cap);
            }

            prop_assert_eq!(log.len(), pushes.min(cap));

            let order: Vec<usize> = log.iter().map(|e| e.message.parse().unwrap()).collect();
            let expected: Vec<usize> = (0..pushes).rev().take(cap).collect();
            prop_assert_eq!(order, expected);
        }
    }
}
