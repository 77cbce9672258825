//! Command registry: validates the positional shape of each command and
//! describes the remote calls it needs. Nothing here touches the network.

use serde_json::{Map, Value};

use crate::error::{FmcsError, Result};
use crate::grammar::OptionSet;
use crate::prompt::Prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

/// One request for the transport: method, path below the host, JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteCall {
    pub method: Method,
    pub path: String,
    pub body: Option<Map<String, Value>>,
}

impl RemoteCall {
    pub fn get(base_path: &str, resource: &str) -> Self {
        Self {
            method: Method::Get,
            path: format!("{base_path}/{resource}"),
            body: None,
        }
    }

    pub fn put(base_path: &str, resource: &str, body: Map<String, Value>) -> Self {
        Self {
            method: Method::Put,
            path: format!("{base_path}/{resource}"),
            body: Some(body),
        }
    }
}

/// A file, client or schedule named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Index(u32),
    Name(String),
}

impl Target {
    pub fn parse(token: &str) -> Self {
        match token.parse::<u32>() {
            Ok(id) => Target::Index(id),
            Err(_) => Target::Name(token.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Clients,
    Files,
    Schedules,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Close,
    Open,
    Pause,
    Resume,
}

impl FileAction {
    pub fn verb(self) -> &'static str {
        match self {
            FileAction::Close => "close",
            FileAction::Open => "open",
            FileAction::Pause => "pause",
            FileAction::Resume => "resume",
        }
    }

    /// Progressive form used when reporting per file.
    pub fn progress(self) -> &'static str {
        match self {
            FileAction::Close => "Closing",
            FileAction::Open => "Opening",
            FileAction::Pause => "Pausing",
            FileAction::Resume => "Resuming",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleAction {
    Run,
    Enable,
    Disable,
}

impl ScheduleAction {
    pub fn verb(self) -> &'static str {
        match self {
            ScheduleAction::Run => "run",
            ScheduleAction::Enable => "enable",
            ScheduleAction::Disable => "disable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Cwp,
    Server,
}

/// What has to be fetched before the calls of a command can be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Nothing,
    Files,
    Clients,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List(ListKind),
    Files {
        action: FileAction,
        targets: Vec<Target>,
        message: String,
        key: String,
    },
    Schedule {
        action: ScheduleAction,
        id: u32,
    },
    Disconnect {
        client: Option<u32>,
        message: String,
        grace_time: u32,
    },
    Send {
        client: Option<u32>,
        targets: Vec<Target>,
        message: String,
    },
    ClientStatus(u32),
    FileStatus(Vec<Target>),
    Get(ConfigKind),
    Service {
        action: ServiceAction,
        kind: String,
    },
}

fn message_body(message: &str) -> Map<String, Value> {
    let mut body = Map::new();
    if !message.is_empty() {
        body.insert("message".into(), Value::from(message));
    }
    body
}

fn key_body(key: &str) -> Map<String, Value> {
    let mut body = Map::new();
    if !key.is_empty() {
        body.insert("key".into(), Value::from(key));
    }
    body
}

impl Command {
    pub fn lookup(&self) -> Lookup {
        match self {
            Command::Files { .. } | Command::Send { client: None, .. } => Lookup::Files,
            Command::Disconnect { client: None, .. } => Lookup::Clients,
            _ => Lookup::Nothing,
        }
    }

    /// Targets that still have to be reconciled against the server's files.
    pub fn targets(&self) -> &[Target] {
        match self {
            Command::Files { targets, .. }
            | Command::Send { targets, .. }
            | Command::FileStatus(targets) => targets,
            _ => &[],
        }
    }

    /// Builds the requests for this command. `ids` holds the files or clients
    /// selected by the lookup, in order; it is ignored by commands without one.
    pub fn calls(&self, base_path: &str, ids: &[u32]) -> Vec<RemoteCall> {
        match self {
            Command::List(ListKind::Clients) | Command::ClientStatus(_) => {
                vec![RemoteCall::get(base_path, "clients")]
            }
            Command::List(ListKind::Files) | Command::FileStatus(_) => {
                vec![RemoteCall::get(base_path, "databases")]
            }
            Command::List(ListKind::Schedules) => vec![RemoteCall::get(base_path, "schedules")],
            Command::Files {
                action,
                message,
                key,
                ..
            } => {
                let body = match action {
                    FileAction::Close => message_body(message),
                    FileAction::Open => key_body(key),
                    _ => Map::new(),
                };
                ids.iter()
                    .map(|id| {
                        RemoteCall::put(
                            base_path,
                            &format!("databases/{id}/{}", action.verb()),
                            body.clone(),
                        )
                    })
                    .collect()
            }
            Command::Schedule { action, id } => vec![RemoteCall::put(
                base_path,
                &format!("schedules/{id}/{}", action.verb()),
                Map::new(),
            )],
            Command::Disconnect {
                client,
                message,
                grace_time,
            } => {
                let mut body = message_body(message);
                body.insert("graceTime".into(), Value::from(*grace_time));
                let ids: Vec<u32> = match client {
                    Some(id) => vec![*id],
                    None => ids.to_vec(),
                };
                ids.iter()
                    .map(|id| {
                        RemoteCall::put(base_path, &format!("clients/{id}/disconnect"), body.clone())
                    })
                    .collect()
            }
            Command::Send {
                client, message, ..
            } => {
                let body = message_body(message);
                match client {
                    Some(id) => vec![RemoteCall::put(
                        base_path,
                        &format!("clients/{id}/message"),
                        body,
                    )],
                    None => ids
                        .iter()
                        .map(|id| {
                            RemoteCall::put(
                                base_path,
                                &format!("databases/{id}/message"),
                                body.clone(),
                            )
                        })
                        .collect(),
                }
            }
            Command::Get(ConfigKind::Server) => {
                vec![RemoteCall::get(base_path, "server/config/general")]
            }
            Command::Get(ConfigKind::Cwp) => vec![
                RemoteCall::get(base_path, "php/config"),
                RemoteCall::get(base_path, "xml/config"),
            ],
            Command::Service { action, kind } => {
                let status = |running: bool| {
                    let mut body = Map::new();
                    body.insert("running".into(), Value::from(running));
                    RemoteCall::put(base_path, &format!("{kind}/status"), body)
                };
                match action {
                    ServiceAction::Start => vec![status(true)],
                    ServiceAction::Stop => vec![status(false)],
                    ServiceAction::Restart => vec![status(false), status(true)],
                }
            }
        }
    }
}

/// Outcome of routing one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    /// Render help; the topic is the word after `help`, if any.
    Help(Option<String>),
    Remote(Command),
    /// The user declined the confirmation prompt.
    Declined,
}

type Shape = fn(&[String], &OptionSet) -> Result<Routed>;

struct Entry {
    keyword: &'static str,
    shape: Shape,
    confirm: Option<&'static str>,
}

static REGISTRY: &[Entry] = &[
    Entry {
        keyword: "close",
        shape: close_shape,
        confirm: Some("really close database(s)?"),
    },
    Entry {
        keyword: "delete",
        shape: delete_shape,
        confirm: None,
    },
    Entry {
        keyword: "disable",
        shape: disable_shape,
        confirm: Some("really disable a schedule?"),
    },
    Entry {
        keyword: "disconnect",
        shape: disconnect_shape,
        confirm: Some("really disconnect client(s)?"),
    },
    Entry {
        keyword: "enable",
        shape: enable_shape,
        confirm: None,
    },
    Entry {
        keyword: "get",
        shape: get_shape,
        confirm: None,
    },
    Entry {
        keyword: "help",
        shape: help_shape,
        confirm: None,
    },
    Entry {
        keyword: "list",
        shape: list_shape,
        confirm: None,
    },
    Entry {
        keyword: "open",
        shape: open_shape,
        confirm: None,
    },
    Entry {
        keyword: "pause",
        shape: pause_shape,
        confirm: Some("really pause database(s)?"),
    },
    Entry {
        keyword: "restart",
        shape: restart_shape,
        confirm: Some("really restart?"),
    },
    Entry {
        keyword: "resume",
        shape: resume_shape,
        confirm: None,
    },
    Entry {
        keyword: "run",
        shape: run_shape,
        confirm: None,
    },
    Entry {
        keyword: "send",
        shape: send_shape,
        confirm: None,
    },
    Entry {
        keyword: "set",
        shape: set_shape,
        confirm: None,
    },
    Entry {
        keyword: "start",
        shape: start_shape,
        confirm: None,
    },
    Entry {
        keyword: "status",
        shape: status_shape,
        confirm: None,
    },
    Entry {
        keyword: "stop",
        shape: stop_shape,
        confirm: Some("really stop?"),
    },
];

#[cfg(test)]
pub fn keywords() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|e| e.keyword)
}

/// Validates `positionals` (command keyword first) and asks for
/// confirmation where the command changes server state.
pub fn route(positionals: &[String], options: &OptionSet, prompt: &mut dyn Prompt) -> Result<Routed> {
    let keyword = positionals.first().ok_or(FmcsError::InvalidCommand)?;
    let entry = REGISTRY
        .iter()
        .find(|e| e.keyword == keyword.as_str())
        .ok_or_else(|| FmcsError::UnknownCommand(keyword.clone()))?;

    let routed = (entry.shape)(&positionals[1..], options)?;
    if let (Routed::Remote(_), Some(question)) = (&routed, entry.confirm) {
        if !options.yes && !prompt.confirm(&format!("fmcsadmin: {question} (y, n) "))? {
            return Ok(Routed::Declined);
        }
    }
    Ok(routed)
}

fn remote(command: Command) -> Result<Routed> {
    Ok(Routed::Remote(command))
}

fn number(token: &str) -> Result<u32> {
    token.parse().map_err(|_| FmcsError::InvalidCommand)
}

fn targets(args: &[String]) -> Vec<Target> {
    args.iter().map(|a| Target::parse(a)).collect()
}

fn files_shape(action: FileAction, args: &[String], options: &OptionSet) -> Result<Routed> {
    remote(Command::Files {
        action,
        targets: targets(args),
        message: options.message.clone(),
        key: options.key.clone(),
    })
}

fn close_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    files_shape(FileAction::Close, args, options)
}

fn open_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    files_shape(FileAction::Open, args, options)
}

fn pause_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    files_shape(FileAction::Pause, args, options)
}

fn resume_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    files_shape(FileAction::Resume, args, options)
}

fn schedule_shape(action: ScheduleAction, args: &[String]) -> Result<Routed> {
    match args {
        [kind, id] if kind == "schedule" => remote(Command::Schedule {
            action,
            id: number(id)?,
        }),
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn disable_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    schedule_shape(ScheduleAction::Disable, args)
}

fn enable_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    schedule_shape(ScheduleAction::Enable, args)
}

fn run_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    schedule_shape(ScheduleAction::Run, args)
}

fn disconnect_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    let client = match args {
        [kind] if kind == "client" => None,
        [kind, id] if kind == "client" => Some(number(id)?),
        _ => return Err(FmcsError::InvalidCommand),
    };
    remote(Command::Disconnect {
        client,
        message: options.message.clone(),
        grace_time: options.grace_time,
    })
}

fn list_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    let kind = match args {
        [kind] => match kind.as_str() {
            "clients" => ListKind::Clients,
            "files" => ListKind::Files,
            "schedules" => ListKind::Schedules,
            _ => return Err(FmcsError::InvalidCommand),
        },
        _ => return Err(FmcsError::InvalidCommand),
    };
    remote(Command::List(kind))
}

fn status_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    match args {
        [kind, id] if kind == "client" => remote(Command::ClientStatus(number(id)?)),
        [kind, names @ ..] if kind == "file" && !names.is_empty() => {
            remote(Command::FileStatus(targets(names)))
        }
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn send_shape(args: &[String], options: &OptionSet) -> Result<Routed> {
    if options.message.is_empty() {
        return Err(FmcsError::InvalidCommand);
    }
    remote(Command::Send {
        client: options.client,
        targets: targets(args),
        message: options.message.clone(),
    })
}

fn get_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    match args {
        [kind] if kind == "cwpconfig" => remote(Command::Get(ConfigKind::Cwp)),
        [kind] if kind == "serverconfig" => remote(Command::Get(ConfigKind::Server)),
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn service_shape(action: ServiceAction, args: &[String]) -> Result<Routed> {
    match args {
        [kind] => remote(Command::Service {
            action,
            kind: kind.clone(),
        }),
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn start_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    service_shape(ServiceAction::Start, args)
}

fn stop_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    service_shape(ServiceAction::Stop, args)
}

fn restart_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    service_shape(ServiceAction::Restart, args)
}

fn set_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    match args.first().map(String::as_str) {
        Some(kind @ ("cwpconfig" | "serverconfig")) => {
            Err(FmcsError::NotImplemented(format!("set {kind}")))
        }
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn delete_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    match args {
        [kind, id] if kind == "schedule" => {
            number(id)?;
            Err(FmcsError::NotImplemented("delete schedule".into()))
        }
        _ => Err(FmcsError::InvalidCommand),
    }
}

fn help_shape(args: &[String], _: &OptionSet) -> Result<Routed> {
    Ok(Routed::Help(args.first().cloned()))
}
