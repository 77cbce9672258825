//! Usage texts shown by `fmcsadmin help`, `-h` and on invalid input.

pub const USAGE: &str = "Usage: fmcsadmin [options] [COMMAND]

Description:
    fmcsadmin is the command line tool to administer the Database Server
    component via the Admin API. When --fqdn is given the server is
    administered remotely over HTTPS.

    Type \"fmcsadmin HELP COMMANDS\" for a list of commands.
    Type \"fmcsadmin HELP OPTIONS\" for a list of options.
    Type \"fmcsadmin HELP [COMMAND]\" for help on a specific command.
";

pub const OPTIONS: &str = "Many fmcsadmin commands take options and parameters.

Options that apply to all commands:
    --fqdn          Specify the fully qualified domain name of the remote server.
    -h, --help      Print this page.
    -p pass, --password pass   Password to use to authenticate with the server.
    -u user, --username user   Username to use to authenticate with the server.
    -v, --version   Print version information.
    -y, --yes       Automatically answer yes to all command prompts.

Options that apply to specific commands:
    -c NUM, --client NUM       Specify a client number to send a message.
    --key encryptpass          Specify the database encryption password.
    -m msg, --message msg      Specify a text message to send to clients.
    -s, --stats                Return additional fields for files or clients.
    -t sec, --grace-time sec   Specify time in seconds before clients are
                               forcefully disconnected (default 90).
";

struct Topic {
    command: &'static str,
    summary: &'static str,
    usage: &'static str,
}

static TOPICS: &[Topic] = &[
    Topic {
        command: "close",
        summary: "Close databases",
        usage: "Usage: fmcsadmin CLOSE [FILE...] [PATH...] [options]

Description:
    Closes the specified databases (FILE) or all the hosted databases in the
    specified folders (PATH). If no FILE or PATH is specified, closes all
    hosted databases.

    To specify a database by its ID rather than its filename, first use the
    LIST FILES -s command to get a list of databases and their IDs.

Options:
    -m message, --message message
        Specifies a text message to send to the clients being disconnected.
",
    },
    Topic {
        command: "disable",
        summary: "Disable schedules",
        usage: "Usage: fmcsadmin DISABLE [TYPE] [SCHEDULE_NUMBER]

Description:
    Disables a schedule.

    Valid TYPEs:
        SCHEDULE    Disables a schedule. Use the LIST SCHEDULES command to
                    obtain a list of schedules and their numbers.
",
    },
    Topic {
        command: "disconnect",
        summary: "Disconnect clients",
        usage: "Usage: fmcsadmin DISCONNECT CLIENT [CLIENT_NUMBER] [options]

Description:
    Disconnects the specified client. The CLIENT_NUMBER is the ID number of
    the client. Use the LIST CLIENTS command to obtain a list of clients and
    their IDs. If no CLIENT_NUMBER is specified, all clients are disconnected.

Options:
    -m message, --message message
        Specifies a text message to send to the clients being disconnected.
    -t seconds, --grace-time seconds
        Specifies the total time in seconds to wait before the clients are
        forcefully disconnected. The default is 90 seconds.
",
    },
    Topic {
        command: "enable",
        summary: "Enable schedules",
        usage: "Usage: fmcsadmin ENABLE [TYPE] [SCHEDULE_NUMBER]

Description:
    Enables a schedule.

    Valid TYPEs:
        SCHEDULE    Enables a schedule. Use the LIST SCHEDULES command to
                    obtain a list of schedules and their numbers.
",
    },
    Topic {
        command: "get",
        summary: "Retrieve server or CWP configuration settings",
        usage: "Usage: fmcsadmin GET [TYPE]

Description:
    Retrieves configuration settings.

    Valid TYPEs:
        CWPCONFIG       Retrieves Custom Web Publishing settings.
        SERVERCONFIG    Retrieves server configuration settings.
",
    },
    Topic {
        command: "help",
        summary: "Get help pages",
        usage: "Usage: fmcsadmin HELP COMMANDS
       fmcsadmin HELP [COMMAND]
       fmcsadmin HELP OPTIONS

Description:
    Shows the list of commands, the help page of one command, or the list
    of options.
",
    },
    Topic {
        command: "list",
        summary: "List clients, databases, or schedules",
        usage: "Usage: fmcsadmin LIST [TYPE] [options]

Description:
    Lists items of the specified TYPE.

    Valid TYPEs:
        CLIENTS     Lists the connected clients.
        FILES       Lists the hosted databases.
        SCHEDULES   Lists the schedules.

Options:
    -s, --stats
        Return additional fields for CLIENTS or FILES.
",
    },
    Topic {
        command: "open",
        summary: "Open databases",
        usage: "Usage: fmcsadmin OPEN [options] [FILE...] [PATH...]

Description:
    Opens the specified databases (FILE) or all the databases in the
    specified folders (PATH). If no FILE or PATH is specified, opens all
    databases in the default and additional database folders.

Options:
    --key encryptpass
        Specifies the database encryption password.
",
    },
    Topic {
        command: "pause",
        summary: "Temporarily stop database access",
        usage: "Usage: fmcsadmin PAUSE [FILE...] [PATH...]

Description:
    Pauses the specified databases (FILE) or all the hosted databases in the
    specified folders (PATH). If no FILE or PATH is specified, pauses all
    hosted databases.
",
    },
    Topic {
        command: "restart",
        summary: "Restart a server process",
        usage: "Usage: fmcsadmin RESTART [TYPE]

Description:
    Restarts the server of the specified TYPE. The process is stopped and
    then started again.
",
    },
    Topic {
        command: "resume",
        summary: "Make paused databases available",
        usage: "Usage: fmcsadmin RESUME [FILE...] [PATH...]

Description:
    Resumes the specified databases (FILE) or all the paused databases in
    the specified folders (PATH). If no FILE or PATH is specified, resumes
    all paused databases.
",
    },
    Topic {
        command: "run",
        summary: "Run a schedule",
        usage: "Usage: fmcsadmin RUN SCHEDULE [SCHEDULE_NUMBER]

Description:
    Manually runs a schedule specified by its SCHEDULE_NUMBER. Use the LIST
    SCHEDULES command to obtain a list of schedules.
",
    },
    Topic {
        command: "send",
        summary: "Send a message",
        usage: "Usage: fmcsadmin SEND [options] [CLIENT_NUMBER] [FILE...] [PATH...]

Description:
    Sends a text message to the client specified with -c, to the clients
    connected to the specified databases, or to all connected clients.

Options:
    -c NUM, --client NUM
        Specifies a client number to send the message to.
    -m message, --message message
        Specifies the text message to send.
",
    },
    Topic {
        command: "set",
        summary: "Change server or CWP configuration settings",
        usage: "Usage: fmcsadmin SET [TYPE] [NAME=VALUE]

Description:
    Changes configuration settings.

    Valid TYPEs:
        CWPCONFIG       Changes Custom Web Publishing settings.
        SERVERCONFIG    Changes server configuration settings.
",
    },
    Topic {
        command: "start",
        summary: "Start a server process",
        usage: "Usage: fmcsadmin START [TYPE]

Description:
    Starts the server of the specified TYPE.

    Valid TYPEs:
        SERVER      Starts the Database Server.
",
    },
    Topic {
        command: "status",
        summary: "Get status of clients or databases",
        usage: "Usage: fmcsadmin STATUS [TYPE] [CLIENT_NUMBER] [FILE...]

Description:
    Retrieves the status of a client or databases.

    Valid TYPEs:
        CLIENT      Retrieves the status of a client specified by CLIENT_NUMBER.
        FILE        Retrieves the status of the databases specified by FILE.
",
    },
    Topic {
        command: "stop",
        summary: "Stop a server process",
        usage: "Usage: fmcsadmin STOP [TYPE] [options]

Description:
    Stops the server of the specified TYPE.

    Valid TYPEs:
        SERVER      Stops the Database Server. Clients are disconnected.
",
    },
];

pub fn commands() -> String {
    let mut text = String::from("fmcsadmin commands are:\n\n");
    for topic in TOPICS {
        text.push_str(&format!(
            "    {:<12}{}\n",
            topic.command.to_uppercase(),
            topic.summary
        ));
    }
    text
}

pub fn command_usage(command: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|t| t.command.eq_ignore_ascii_case(command))
        .map(|t| t.usage)
}

/// Text for `fmcsadmin help [TOPIC]`. Unknown topics fall back to the
/// top-level usage.
pub fn render(topic: Option<&str>) -> String {
    match topic {
        None => USAGE.to_string(),
        Some(t) if t.eq_ignore_ascii_case("commands") => commands(),
        Some(t) if t.eq_ignore_ascii_case("options") => OPTIONS.to_string(),
        Some(t) => command_usage(t).unwrap_or(USAGE).to_string(),
    }
}

pub fn version() -> String {
    format!("fmcsadmin {}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_usage() {
        assert!(render(None).contains("Usage: fmcsadmin [options] [COMMAND]"));
        assert!(render(Some("invalidoption")).contains("Usage: fmcsadmin [options] [COMMAND]"));
    }

    #[test]
    fn commands_and_options() {
        assert!(render(Some("commands")).contains("fmcsadmin commands are:"));
        assert!(render(Some("COMMANDS")).contains("CLOSE"));
        assert!(render(Some("options"))
            .contains("Many fmcsadmin commands take options and parameters."));
    }

    #[test]
    fn per_command_usage() {
        let cases = [
            ("close", "Usage: fmcsadmin CLOSE [FILE...] [PATH...] [options]"),
            ("disable", "Usage: fmcsadmin DISABLE [TYPE] [SCHEDULE_NUMBER]"),
            ("disconnect", "Usage: fmcsadmin DISCONNECT CLIENT [CLIENT_NUMBER] [options]"),
            ("enable", "Usage: fmcsadmin ENABLE [TYPE] [SCHEDULE_NUMBER]"),
            ("list", "Usage: fmcsadmin LIST [TYPE] [options]"),
            ("open", "Usage: fmcsadmin OPEN [options] [FILE...] [PATH...]"),
            ("pause", "Usage: fmcsadmin PAUSE [FILE...] [PATH...]"),
            ("restart", "Usage: fmcsadmin RESTART [TYPE]"),
            ("resume", "Usage: fmcsadmin RESUME [FILE...] [PATH...]"),
            ("run", "Usage: fmcsadmin RUN SCHEDULE [SCHEDULE_NUMBER]"),
            ("send", "Usage: fmcsadmin SEND [options] [CLIENT_NUMBER] [FILE...] [PATH...]"),
            ("start", "Usage: fmcsadmin START [TYPE]"),
            ("status", "Usage: fmcsadmin STATUS [TYPE] [CLIENT_NUMBER] [FILE...]"),
            ("stop", "Usage: fmcsadmin STOP [TYPE] [options]"),
        ];
        for (command, expected) in cases {
            assert!(render(Some(command)).contains(expected), "{command}");
        }
    }

    #[test]
    fn every_routed_command_has_help_except_stubs() {
        for keyword in crate::router::keywords() {
            if keyword == "delete" {
                assert!(command_usage(keyword).is_none());
            } else {
                assert!(command_usage(keyword).is_some(), "{keyword}");
            }
        }
    }

    #[test]
    fn version_names_program() {
        assert!(version().starts_with("fmcsadmin "));
    }
}
