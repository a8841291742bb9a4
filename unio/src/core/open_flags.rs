//! Open option tags for `open`.
//!
//! The `(def ...)` line comments on [`OpenFlag`] are manifest directives:
//! `unio-manifest` extracts them so other runtimes share the same tag values.
//! Plain `//` comments in this file are therefore reserved for directives.

use serde::{Deserialize, Serialize};

/// One option tag in the set passed to `open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum OpenFlag {
    // (def open_read 0)
    Read = 0,
    // (def open_write 1)
    Write = 1,
    // (def open_append 2)
    Append = 2,
    // (def open_truncate 3)
    Truncate = 3,
    // (def open_create 4)
    Create = 4,
    // (def open_create_new 5)
    CreateNew = 5,
}

impl OpenFlag {
    pub const ALL: [OpenFlag; 6] = [
        OpenFlag::Read,
        OpenFlag::Write,
        OpenFlag::Append,
        OpenFlag::Truncate,
        OpenFlag::Create,
        OpenFlag::CreateNew,
    ];

    /// Wire tag shared with the manifest.
    pub const fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.tag() == tag)
    }
}

/// Resolved access mode for the platform open call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenMode {
    pub read: bool,
    pub write: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    pub create_new: bool,
}

impl OpenMode {
    /// Collapse an optional flag set into a mode. `None` means read-only.
    pub fn from_flags(flags: Option<&[OpenFlag]>) -> Self {
        let Some(flags) = flags else {
            return Self {
                read: true,
                ..Self::default()
            };
        };
        let has = |flag: OpenFlag| flags.contains(&flag);
        Self {
            read: has(OpenFlag::Read),
            write: has(OpenFlag::Write),
            append: has(OpenFlag::Append),
            truncate: has(OpenFlag::Truncate),
            create: has(OpenFlag::Create),
            create_new: has(OpenFlag::CreateNew),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_flags_mean_read_only() {
        let mode = OpenMode::from_flags(None);
        assert_eq!(
            mode,
            OpenMode {
                read: true,
                ..OpenMode::default()
            }
        );
    }

    #[test]
    fn explicit_flags_do_not_imply_read() {
        let mode = OpenMode::from_flags(Some(&[OpenFlag::Write, OpenFlag::Create]));
        assert!(!mode.read);
        assert!(mode.write);
        assert!(mode.create);
        assert!(!mode.truncate);
    }

    #[test]
    fn tags_match_declared_values() {
        let tags: Vec<u8> = OpenFlag::ALL.iter().map(|flag| flag.tag()).collect();
        assert_eq!(tags, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(OpenFlag::from_tag(5), Some(OpenFlag::CreateNew));
        assert_eq!(OpenFlag::from_tag(6), None);
    }
}
