//! Tokenizer for `fmcsadmin [options] COMMAND [args...] [options]`.
//!
//! Options may appear anywhere: before the command keyword, between
//! positionals or after all of them. A single left-to-right scan splits the
//! token stream into the option record and the ordered positionals.

use std::fmt;

pub const DEFAULT_GRACE_TIME: u32 = 90;

/// Options recognised anywhere in the token stream. Empty strings mean unset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSet {
    pub help: bool,
    pub version: bool,
    pub yes: bool,
    pub stats: bool,
    pub fqdn: String,
    pub username: String,
    pub password: String,
    pub key: String,
    pub message: String,
    pub client: Option<u32>,
    pub grace_time: u32,
}

impl Default for OptionSet {
    fn default() -> Self {
        Self {
            help: false,
            version: false,
            yes: false,
            stats: false,
            fqdn: String::new(),
            username: String::new(),
            password: String::new(),
            key: String::new(),
            message: String::new(),
            client: None,
            grace_time: DEFAULT_GRACE_TIME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArgs {
    pub positionals: Vec<String>,
    pub options: OptionSet,
}

impl ParsedArgs {
    pub fn command(&self) -> Option<&str> {
        self.positionals.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    UnknownOption(String),
    MissingValue(&'static str),
    InvalidValue { flag: &'static str, value: String },
}

/// A malformed token, together with whether the command keyword had already
/// been read when it was hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub after_command: bool,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnknownOption(opt) => write!(f, "illegal option -- {opt}"),
            ParseErrorKind::MissingValue(flag) => {
                write!(f, "option requires an argument -- {flag}")
            }
            ParseErrorKind::InvalidValue { flag, value } => {
                write!(f, "invalid value \"{value}\" for option {flag}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy)]
enum Switch {
    Help,
    Version,
    Yes,
    Stats,
}

#[derive(Clone, Copy)]
enum Valued {
    Fqdn,
    Username,
    Password,
    Key,
    Message,
    GraceTime,
    Client,
}

enum Flag {
    Switch(Switch),
    Valued(Valued, &'static str),
}

fn lookup_flag(token: &str) -> Option<Flag> {
    let flag = match token {
        "-h" | "--help" => Flag::Switch(Switch::Help),
        "-v" | "--version" => Flag::Switch(Switch::Version),
        "-y" | "--yes" => Flag::Switch(Switch::Yes),
        "-s" | "--stats" => Flag::Switch(Switch::Stats),
        "--fqdn" => Flag::Valued(Valued::Fqdn, "--fqdn"),
        "-u" | "--username" => Flag::Valued(Valued::Username, "--username"),
        "-p" | "--password" => Flag::Valued(Valued::Password, "--password"),
        "--key" => Flag::Valued(Valued::Key, "--key"),
        "-m" | "--message" => Flag::Valued(Valued::Message, "--message"),
        "-t" | "--grace-time" => Flag::Valued(Valued::GraceTime, "--grace-time"),
        "-c" | "--client" => Flag::Valued(Valued::Client, "--client"),
        _ => return None,
    };
    Some(flag)
}

fn parse_number(flag: &'static str, value: &str) -> Result<u32, ParseErrorKind> {
    value
        .parse::<u32>()
        .map_err(|_| ParseErrorKind::InvalidValue {
            flag,
            value: value.to_string(),
        })
}

fn apply_value(
    options: &mut OptionSet,
    target: Valued,
    flag: &'static str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    match target {
        Valued::Fqdn => options.fqdn = value.to_string(),
        Valued::Username => options.username = value.to_string(),
        Valued::Password => options.password = value.to_string(),
        Valued::Key => options.key = value.to_string(),
        Valued::Message => options.message = value.to_string(),
        Valued::GraceTime => options.grace_time = parse_number(flag, value)?,
        Valued::Client => options.client = Some(parse_number(flag, value)?),
    }
    Ok(())
}

pub fn parse<S: AsRef<str>>(
    tokens: &[S],
    defaults: &OptionSet,
) -> Result<ParsedArgs, ParseError> {
    let mut options = defaults.clone();
    let mut positionals: Vec<String> = Vec::new();
    let mut iter = tokens.iter().map(AsRef::as_ref);

    while let Some(token) = iter.next() {
        let fail = |kind| ParseError {
            kind,
            after_command: !positionals.is_empty(),
        };
        match lookup_flag(token) {
            Some(Flag::Switch(switch)) => match switch {
                Switch::Help => options.help = true,
                Switch::Version => options.version = true,
                Switch::Yes => options.yes = true,
                Switch::Stats => options.stats = true,
            },
            Some(Flag::Valued(target, flag)) => {
                let value = iter
                    .next()
                    .ok_or_else(|| fail(ParseErrorKind::MissingValue(flag)))?;
                apply_value(&mut options, target, flag, value).map_err(fail)?;
            }
            None if token.starts_with('-') => {
                return Err(fail(ParseErrorKind::UnknownOption(token.to_string())));
            }
            None => positionals.push(token.to_string()),
        }
    }

    Ok(ParsedArgs {
        positionals,
        options,
    })
}
