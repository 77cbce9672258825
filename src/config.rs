use crate::error::Result;
use crate::grammar::OptionSet;
use crate::prompt::Prompt;

pub const FQDN_ENV: &str = "FMCSADMIN_FQDN";
pub const USERNAME_ENV: &str = "FMCSADMIN_USERNAME";
pub const PASSWORD_ENV: &str = "FMCSADMIN_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn resolve_from_env(env_var: &str) -> String {
    std::env::var(env_var)
        .ok()
        .as_deref()
        .and_then(non_empty)
        .map(str::to_owned)
        .unwrap_or_default()
}

/// Option defaults for one invocation. Values from the environment act as
/// defaults, so anything given on the command line overrides them.
pub fn defaults_from_env() -> OptionSet {
    OptionSet {
        fqdn: resolve_from_env(FQDN_ENV),
        username: resolve_from_env(USERNAME_ENV),
        password: resolve_from_env(PASSWORD_ENV),
        ..OptionSet::default()
    }
}

/// Fills in whatever the options left unset by asking interactively.
pub fn resolve_credentials(options: &OptionSet, prompt: &mut dyn Prompt) -> Result<Credentials> {
    let username = match non_empty(&options.username) {
        Some(u) => u.to_string(),
        None => prompt.ask("username: ")?.trim().to_string(),
    };
    let password = if options.password.is_empty() {
        prompt.ask_secret("password: ")?
    } else {
        options.password.clone()
    };
    Ok(Credentials { username, password })
}

/// Masks all but the last four characters.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = value.chars().skip(count - 4).collect();
    format!("{}{tail}", "*".repeat(count - 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;
    use crate::prompt::ScriptedPrompt;
    use serial_test::serial;

    #[test]
    #[serial]
    fn env_values_become_defaults() {
        std::env::set_var(USERNAME_ENV, "envuser");
        std::env::set_var(FQDN_ENV, "env.example.jp");
        std::env::remove_var(PASSWORD_ENV);
        let defaults = defaults_from_env();
        std::env::remove_var(USERNAME_ENV);
        std::env::remove_var(FQDN_ENV);
        assert_eq!(defaults.username, "envuser");
        assert_eq!(defaults.fqdn, "env.example.jp");
        assert_eq!(defaults.password, "");
        assert_eq!(defaults.grace_time, grammar::DEFAULT_GRACE_TIME);
    }

    #[test]
    #[serial]
    fn args_override_env() {
        std::env::set_var(USERNAME_ENV, "envuser");
        let defaults = defaults_from_env();
        std::env::remove_var(USERNAME_ENV);
        let parsed = grammar::parse(&["-u", "arguser", "list", "files"], &defaults).unwrap();
        assert_eq!(parsed.options.username, "arguser");
    }

    #[test]
    #[serial]
    fn blank_env_is_unset() {
        std::env::set_var(PASSWORD_ENV, "   ");
        let defaults = defaults_from_env();
        std::env::remove_var(PASSWORD_ENV);
        assert_eq!(defaults.password, "");
    }

    #[test]
    fn credentials_from_options() {
        let options = OptionSet {
            username: "USERNAME".into(),
            password: "PASSWORD".into(),
            ..Default::default()
        };
        let mut prompt = ScriptedPrompt::answering(&[]);
        let creds = resolve_credentials(&options, &mut prompt).unwrap();
        assert_eq!(creds.username, "USERNAME");
        assert_eq!(creds.password, "PASSWORD");
        assert!(prompt.questions.is_empty());
    }

    #[test]
    fn credentials_prompted_when_missing() {
        let mut prompt = ScriptedPrompt::answering(&[]).with_answers(&["admin ", "secret"]);
        let creds = resolve_credentials(&OptionSet::default(), &mut prompt).unwrap();
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
        assert_eq!(prompt.questions, ["username: ", "password: "]);
        assert_eq!(prompt.secrets_asked, 1);
    }

    #[test]
    fn mask_secret_empty() {
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn mask_secret_short() {
        assert_eq!(mask_secret("abc"), "***");
    }

    #[test]
    fn mask_secret_longer() {
        assert_eq!(mask_secret("abcdef"), "**cdef");
    }

    #[test]
    fn mask_secret_counts_characters() {
        assert_eq!(mask_secret("ééa"), "***");
        assert_eq!(mask_secret("pässwörd"), "****wörd");
    }
}
