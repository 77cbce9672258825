/// Exit status used for remote codes the catalog does not know.
pub const UNCLASSIFIED_EXIT: i32 = 1;

pub const UNAVAILABLE_COMMAND: i64 = 3;
pub const REQUESTED_OBJECT_MISSING: i64 = 10007;
pub const NO_APPLICABLE_FILES: i64 = 10904;
pub const INVALID_COMMAND: i64 = 11000;

struct Entry {
    code: i64,
    description: &'static str,
    exit: i32,
}

const fn entry(code: i64, description: &'static str, exit: i32) -> Entry {
    Entry {
        code,
        description,
        exit,
    }
}

// Exit statuses follow the server's own tooling: the code truncated to a byte.
static CATALOG: &[Entry] = &[
    entry(-1, "Internal error", 255),
    entry(3, "Unavailable command", 3),
    entry(4, "Command is unknown", 4),
    entry(8, "Empty result", 8),
    entry(9, "Access denied", 9),
    entry(10, "Requested data is missing", 10),
    entry(
        212,
        "Invalid user account and/or password; please try again",
        212,
    ),
    entry(802, "Unable to open the file", 34),
    entry(958, "Parameter missing", 190),
    entry(960, "Parameter is invalid", 192),
    entry(10006, "Service already running", 22),
    entry(10007, "Requested object does not exist", 23),
    entry(10502, "Host unreachable", 6),
    entry(10600, "Schedule at specified index no longer exists", 104),
    entry(
        10601,
        "Schedule is misconfigured; invalid taskType or run status",
        105,
    ),
    entry(10603, "Schedule can't be created or duplicated", 107),
    entry(10604, "Cannot enable schedule", 108),
    entry(10610, "No schedules created in configuration file", 114),
    entry(10611, "Schedule name is already used", 115),
    entry(10904, "No applicable files for this operation", 152),
    entry(10906, "Script is missing", 154),
    entry(10908, "System script aborted", 156),
    entry(11000, "Invalid command", 248),
    entry(11002, "Unable to create command", 250),
    entry(11005, "Disconnect Client invalid ID", 253),
    entry(25004, "Parameters are invalid", 172),
    entry(25006, "Invalid session error", 174),
];

fn lookup(code: i64) -> Option<&'static Entry> {
    CATALOG.iter().find(|e| e.code == code)
}

/// Human-readable text for a remote result code; empty for success and for
/// codes the catalog does not know.
pub fn describe(code: i64) -> &'static str {
    lookup(code).map_or("", |e| e.description)
}

pub fn exit_status(code: i64) -> i32 {
    if code == 0 {
        return 0;
    }
    lookup(code).map_or(UNCLASSIFIED_EXIT, |e| e.exit)
}

/// Failures decided locally, before anything is sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalFailure {
    InvalidCommand,
    InvalidOption,
    NotImplemented,
}

impl LocalFailure {
    pub fn exit_status(self) -> i32 {
        match self {
            LocalFailure::InvalidCommand => 248,
            LocalFailure::InvalidOption => 249,
            LocalFailure::NotImplemented => 10001,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_success_is_empty() {
        assert_eq!(describe(0), "");
    }

    #[test]
    fn describe_known_codes() {
        assert_eq!(describe(-1), "Internal error");
        assert_eq!(describe(3), "Unavailable command");
        assert_eq!(describe(4), "Command is unknown");
        assert_eq!(describe(8), "Empty result");
        assert_eq!(describe(9), "Access denied");
        assert_eq!(
            describe(212),
            "Invalid user account and/or password; please try again"
        );
        assert_eq!(describe(802), "Unable to open the file");
        assert_eq!(describe(958), "Parameter missing");
        assert_eq!(describe(960), "Parameter is invalid");
        assert_eq!(describe(10006), "Service already running");
        assert_eq!(
            describe(10600),
            "Schedule at specified index no longer exists"
        );
        assert_eq!(
            describe(10601),
            "Schedule is misconfigured; invalid taskType or run status"
        );
        assert_eq!(describe(10603), "Schedule can't be created or duplicated");
        assert_eq!(describe(10604), "Cannot enable schedule");
        assert_eq!(
            describe(10610),
            "No schedules created in configuration file"
        );
        assert_eq!(describe(10611), "Schedule name is already used");
        assert_eq!(describe(10904), "No applicable files for this operation");
        assert_eq!(describe(10906), "Script is missing");
        assert_eq!(describe(10908), "System script aborted");
        assert_eq!(describe(11000), "Invalid command");
        assert_eq!(describe(11002), "Unable to create command");
        assert_eq!(describe(11005), "Disconnect Client invalid ID");
        assert_eq!(describe(25004), "Parameters are invalid");
        assert_eq!(describe(25006), "Invalid session error");
    }

    #[test]
    fn describe_unmapped_is_empty() {
        assert_eq!(describe(99999), "");
    }

    #[test]
    fn exit_status_truncates_like_server_tooling() {
        for e in CATALOG {
            assert_eq!(e.exit, e.code.rem_euclid(256) as i32, "code {}", e.code);
        }
    }

    #[test]
    fn exit_status_known_and_unknown() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(3), 3);
        assert_eq!(exit_status(10007), 23);
        assert_eq!(exit_status(10600), 104);
        assert_eq!(exit_status(11000), 248);
        assert_eq!(exit_status(99999), UNCLASSIFIED_EXIT);
    }

    #[test]
    fn local_failures_have_fixed_statuses() {
        assert_eq!(LocalFailure::InvalidCommand.exit_status(), 248);
        assert_eq!(LocalFailure::InvalidOption.exit_status(), 249);
        assert_eq!(LocalFailure::NotImplemented.exit_status(), 10001);
    }
}
