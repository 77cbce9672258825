use std::io::{self, IsTerminal, Write};

use indicatif::{ProgressBar, ProgressFinish, ProgressStyle};

use crate::catalog;
use crate::client::{AdminClient, DatabaseFile};
use crate::config;
use crate::endpoint;
use crate::error::{FmcsError, Result};
use crate::format;
use crate::grammar::{self, OptionSet};
use crate::help;
use crate::paths;
use crate::prompt::Prompt;
use crate::router::{self, Command, ListKind, Lookup, RemoteCall, Routed, Target};

/// Everything one invocation reads from or writes to besides argv.
pub struct Invocation<'a> {
    pub defaults: OptionSet,
    /// Overrides the host resolved from `--fqdn`.
    pub host_url: Option<String>,
    pub out: &'a mut dyn Write,
    pub prompt: &'a mut dyn Prompt,
}

/// Runs one invocation and returns its exit status. Diagnostics are written
/// to `inv.out` like regular output.
pub fn run(args: &[String], inv: &mut Invocation<'_>) -> i32 {
    match dispatch(args, inv) {
        Ok(status) => status,
        Err(err) => {
            if let FmcsError::Transport(source) = &err {
                tracing::debug!(error = %source, "server unreachable");
            }
            tracing::debug!(error = ?err, "invocation failed");
            let _ = report(inv.out, &err);
            err.exit_status()
        }
    }
}

fn report(out: &mut dyn Write, err: &FmcsError) -> io::Result<()> {
    match err {
        FmcsError::Grammar(e) => {
            writeln!(out, "fmcsadmin: {e}")?;
            write!(out, "{}", help::USAGE)
        }
        FmcsError::UnknownCommand(_) => write!(out, "{}", help::USAGE),
        other => writeln!(out, "{other}"),
    }
}

fn dispatch(args: &[String], inv: &mut Invocation<'_>) -> Result<i32> {
    let parsed = grammar::parse(args, &inv.defaults)?;
    let options = &parsed.options;

    if options.version {
        writeln!(inv.out, "{}", help::version())?;
        return Ok(0);
    }
    if options.help {
        write!(inv.out, "{}", help::render(parsed.command()))?;
        return Ok(0);
    }
    if parsed.positionals.is_empty() {
        write!(inv.out, "{}", help::USAGE)?;
        return Ok(0);
    }

    match router::route(&parsed.positionals, options, inv.prompt)? {
        Routed::Help(topic) => {
            write!(inv.out, "{}", help::render(topic.as_deref()))?;
            Ok(0)
        }
        Routed::Declined => Ok(0),
        Routed::Remote(command) => execute(&command, options, inv),
    }
}

fn execute(command: &Command, options: &OptionSet, inv: &mut Invocation<'_>) -> Result<i32> {
    let (host_url, base_path) = match &inv.host_url {
        Some(url) => (url.clone(), endpoint::base_path(url)),
        None => {
            let resolved = endpoint::resolve(&options.fqdn);
            (resolved.url(), resolved.base_path())
        }
    };
    tracing::debug!(host = %host_url, base_path, "resolved endpoint");

    let mut client = AdminClient::new(&host_url)?;
    let credentials = config::resolve_credentials(options, inv.prompt)?;
    client.login(base_path, &credentials)?;

    let outcome = perform(&client, base_path, command, options, inv.out);
    if let Err(err) = client.logout(base_path) {
        tracing::warn!(error = %err, "logout failed");
    }
    outcome
}

fn perform(
    client: &AdminClient,
    base_path: &str,
    command: &Command,
    options: &OptionSet,
    out: &mut dyn Write,
) -> Result<i32> {
    match command {
        Command::List(kind) => {
            for call in command.calls(base_path, &[]) {
                let resp = client.send(&call)?;
                let lines = match kind {
                    ListKind::Files => format::file_lines(&resp.files.files, options.stats),
                    ListKind::Clients => {
                        format::client_lines(&resp.clients.clients, options.stats)
                    }
                    ListKind::Schedules => format::schedule_lines(&resp.schedules),
                };
                print_lines(out, &lines)?;
            }
            Ok(0)
        }
        Command::ClientStatus(id) => {
            let resp = client.send(&RemoteCall::get(base_path, "clients"))?;
            let found = resp.clients.clients.iter().find(|c| c.id == *id);
            let Some(connected) = found else {
                return Err(FmcsError::Remote {
                    code: catalog::REQUESTED_OBJECT_MISSING,
                });
            };
            print_lines(out, &format::client_status_lines(connected))?;
            Ok(0)
        }
        Command::FileStatus(targets) => {
            let files = fetch_files(client, base_path)?;
            let selection = select_files(&files, targets);
            for file in &selection.files {
                writeln!(out, "{}", format::file_status_line(file))?;
            }
            report_unmatched(out, &selection.unmatched)
        }
        Command::Get(_) => {
            for call in command.calls(base_path, &[]) {
                let resp = client.send(&call)?;
                print_lines(out, &format::config_lines(&resp.extra))?;
            }
            Ok(0)
        }
        Command::Schedule { .. } | Command::Service { .. } => {
            for call in command.calls(base_path, &[]) {
                client.send(&call)?;
            }
            Ok(0)
        }
        Command::Files { action, targets, .. } => {
            let files = fetch_files(client, base_path)?;
            let selection = select_files(&files, targets);
            let mut status = report_unmatched(out, &selection.unmatched)?;
            if selection.files.is_empty() {
                return Ok(status);
            }
            let ids: Vec<u32> = selection.files.iter().map(|f| f.id).collect();
            let labels: Vec<String> = selection
                .files
                .iter()
                .map(|f| format!("File {}: {}", action.progress(), f.filename))
                .collect();
            let calls = command.calls(base_path, &ids);
            status = first_failure(status, apply(client, &calls, &labels, out)?);
            Ok(status)
        }
        Command::Send { targets, .. } => match command.lookup() {
            Lookup::Files => {
                let files = fetch_files(client, base_path)?;
                let selection = select_files(&files, targets);
                let status = report_unmatched(out, &selection.unmatched)?;
                let ids: Vec<u32> = selection.files.iter().map(|f| f.id).collect();
                let labels: Vec<String> = selection
                    .files
                    .iter()
                    .map(|f| format!("Sending message to clients of {}", f.filename))
                    .collect();
                let calls = command.calls(base_path, &ids);
                Ok(first_failure(status, apply(client, &calls, &labels, out)?))
            }
            _ => {
                let calls = command.calls(base_path, &[]);
                apply(client, &calls, &[], out)
            }
        },
        Command::Disconnect { .. } => {
            let (ids, labels): (Vec<u32>, Vec<String>) = match command.lookup() {
                Lookup::Clients => {
                    let resp = client.send(&RemoteCall::get(base_path, "clients"))?;
                    resp.clients
                        .clients
                        .iter()
                        .map(|c| (c.id, format!("Disconnecting client {}: {}", c.id, c.user_name)))
                        .unzip()
                }
                _ => (Vec::new(), Vec::new()),
            };
            let calls = command.calls(base_path, &ids);
            apply(client, &calls, &labels, out)
        }
    }
}

fn print_lines(out: &mut dyn Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

fn fetch_files(client: &AdminClient, base_path: &str) -> Result<Vec<DatabaseFile>> {
    let resp = client.send(&RemoteCall::get(base_path, "databases"))?;
    tracing::debug!(
        count = resp.files.files.len(),
        total = resp.total_db_count,
        "hosted files"
    );
    Ok(resp.files.files)
}

/// Files picked by the command line targets, in server order without
/// duplicates, plus the targets that selected nothing.
#[derive(Debug)]
struct Selection<'a> {
    files: Vec<&'a DatabaseFile>,
    unmatched: Vec<String>,
}

fn select_files<'a>(files: &'a [DatabaseFile], targets: &[Target]) -> Selection<'a> {
    if targets.is_empty() {
        return Selection {
            files: files.iter().collect(),
            unmatched: Vec::new(),
        };
    }

    let mut picked = vec![false; files.len()];
    let mut unmatched = Vec::new();
    for target in targets {
        let mut hit = false;
        for (i, file) in files.iter().enumerate() {
            let selected = match target {
                Target::Index(id) => file.id == *id,
                Target::Name(name) => paths::matches_file(name, &file.folder, &file.filename),
            };
            if selected {
                picked[i] = true;
                hit = true;
            }
        }
        if !hit {
            let shown = match target {
                Target::Index(id) => id.to_string(),
                Target::Name(name) => name.clone(),
            };
            tracing::debug!(target = %shown, "target matched no hosted file");
            unmatched.push(shown);
        }
    }

    Selection {
        files: files
            .iter()
            .zip(picked)
            .filter_map(|(f, p)| p.then_some(f))
            .collect(),
        unmatched,
    }
}

fn report_unmatched(out: &mut dyn Write, unmatched: &[String]) -> Result<i32> {
    if unmatched.is_empty() {
        return Ok(0);
    }
    let err = FmcsError::Remote {
        code: catalog::NO_APPLICABLE_FILES,
    };
    for target in unmatched {
        writeln!(out, "{err}: {target}")?;
    }
    Ok(err.exit_status())
}

fn first_failure(current: i32, next: i32) -> i32 {
    if current != 0 {
        current
    } else {
        next
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    if len < 2 || !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64).with_finish(ProgressFinish::AndClear);
    if let Ok(style) = ProgressStyle::with_template("{spinner} {bar:30} {pos}/{len} [{elapsed}]") {
        pb.set_style(style);
    }
    pb
}

/// Sends `calls` one after another. A failing call is reported and the rest
/// still run; the status of the first failure is returned.
fn apply(
    client: &AdminClient,
    calls: &[RemoteCall],
    labels: &[String],
    out: &mut dyn Write,
) -> Result<i32> {
    let pb = progress_bar(calls.len());
    let mut status = 0;
    for (i, call) in calls.iter().enumerate() {
        if let Some(label) = labels.get(i) {
            writeln!(out, "{label}")?;
        }
        if let Err(err) = client.send(call) {
            tracing::warn!(path = %call.path, error = %err, "request failed");
            writeln!(out, "{err}")?;
            status = first_failure(status, err.exit_status());
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    Ok(status)
}
