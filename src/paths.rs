/// Native database file extension.
pub const FILE_EXTENSION: &str = ".fmp12";

/// Host-OS tag the server puts in front of paths it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformTag {
    Windows,
    Mac,
    Linux,
    Untagged,
}

impl PlatformTag {
    const TAGGED: [PlatformTag; 3] = [PlatformTag::Windows, PlatformTag::Mac, PlatformTag::Linux];

    pub fn prefix(self) -> &'static str {
        match self {
            PlatformTag::Windows => "filewin:",
            PlatformTag::Mac => "filemac:",
            PlatformTag::Linux => "filelinux:",
            PlatformTag::Untagged => "",
        }
    }

    /// Splits `path` into its tag and the remainder.
    pub fn split(path: &str) -> (PlatformTag, &str) {
        Self::TAGGED
            .iter()
            .find_map(|tag| path.strip_prefix(tag.prefix()).map(|rest| (*tag, rest)))
            .unwrap_or((PlatformTag::Untagged, path))
    }
}

pub fn canonicalize(path: &str) -> &str {
    let (_, rest) = PlatformTag::split(path);
    rest.strip_suffix(FILE_EXTENSION).unwrap_or(rest)
}

/// Whether two spellings denote the same file: platform tag and extension are
/// ignored, everything else must match exactly.
pub fn equivalent(a: &str, b: &str) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Whether a user-supplied target selects a file the server reported as
/// `filename` inside `folder`. A target naming the folder selects every file
/// in it.
pub fn matches_file(target: &str, folder: &str, filename: &str) -> bool {
    if equivalent(target, filename) {
        return true;
    }
    if folder.is_empty() {
        return false;
    }
    equivalent(target, &format!("{folder}{filename}")) || equivalent(target, folder)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIR: &str = "/opt/FileMaker/FileMaker Server/Data/Databases/";

    fn tagged(tag: PlatformTag, rest: &str) -> String {
        format!("{}{rest}", tag.prefix())
    }

    #[test]
    fn bare_names() {
        assert!(!equivalent("TestDB", "TestDB2"));
        assert!(equivalent("TestDB", "TestDB"));
        assert!(equivalent("TestDB.fmp12", "TestDB.fmp12"));
        assert!(equivalent("TestDB", "TestDB.fmp12"));
        assert!(equivalent("TestDB.fmp12", "TestDB"));
    }

    #[test]
    fn directories_compare_whole() {
        for tag in PlatformTag::TAGGED {
            let dir = tagged(tag, DIR);
            assert!(equivalent(&dir, &dir));
            assert!(equivalent(&dir, DIR));
        }
    }

    #[test]
    fn tagged_paths_with_and_without_extension() {
        let plain = format!("{DIR}TestDB");
        let ext = format!("{DIR}TestDB.fmp12");
        for tag in PlatformTag::TAGGED {
            assert!(equivalent(&tagged(tag, &plain), &tagged(tag, &plain)));
            assert!(equivalent(&tagged(tag, &ext), &tagged(tag, &ext)));
            assert!(equivalent(&tagged(tag, &plain), &tagged(tag, &ext)));
            assert!(equivalent(&tagged(tag, &ext), &tagged(tag, &plain)));

            assert!(equivalent(&plain, &tagged(tag, &plain)));
            assert!(equivalent(&plain, &tagged(tag, &ext)));
            assert!(equivalent(&tagged(tag, &ext), &plain));
            assert!(equivalent(&tagged(tag, &ext), &ext));
        }
        assert!(equivalent(&plain, &ext));
        assert!(equivalent("filelinux:/a/b/TestDB", "/a/b/TestDB.fmp12"));
    }

    #[test]
    fn same_name_in_other_directory_differs() {
        assert!(!equivalent("/a/TestDB.fmp12", "/b/TestDB.fmp12"));
        assert!(!equivalent("TestDB", "/a/TestDB.fmp12"));
    }

    #[test]
    fn tag_match_is_case_sensitive() {
        assert!(!equivalent("FILELINUX:/a/TestDB", "/a/TestDB"));
        assert_eq!(PlatformTag::split("fileLinux:/a").0, PlatformTag::Untagged);
    }

    #[test]
    fn split_reports_tag() {
        assert_eq!(
            PlatformTag::split("filewin:/x"),
            (PlatformTag::Windows, "/x")
        );
        assert_eq!(PlatformTag::split("filemac:/x"), (PlatformTag::Mac, "/x"));
        assert_eq!(
            PlatformTag::split("/x"),
            (PlatformTag::Untagged, "/x")
        );
    }

    #[test]
    fn matches_file_by_name_path_or_folder() {
        let folder = format!("filelinux:{DIR}");
        assert!(matches_file("TestDB", &folder, "TestDB.fmp12"));
        assert!(matches_file(&format!("{DIR}TestDB"), &folder, "TestDB.fmp12"));
        assert!(matches_file(DIR, &folder, "TestDB.fmp12"));
        assert!(!matches_file("/other/TestDB", &folder, "TestDB.fmp12"));
        assert!(!matches_file("Sample", "", "TestDB.fmp12"));
    }
}
