use std::io::{self, BufRead, IsTerminal, Write};

/// Interactive questions asked during an invocation.
pub trait Prompt {
    /// Asks a yes/no question; only an answer starting with `y` or `Y` is a yes.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;

    /// Asks for a free-text value such as a user name.
    fn ask(&mut self, label: &str) -> io::Result<String>;

    /// Asks for a value that must not be echoed, such as a password.
    fn ask_secret(&mut self, label: &str) -> io::Result<String>;
}

/// Reads answers from standard input, writes questions to standard output.
pub struct StdinPrompt;

impl StdinPrompt {
    fn read_line(label: &str) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{label}")?;
        stdout.flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = Self::read_line(question)?;
        Ok(is_yes(&answer))
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        Self::read_line(label)
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        if io::stdin().is_terminal() {
            rpassword::prompt_password(label)
        } else {
            Self::read_line(label)
        }
    }
}

pub fn is_yes(answer: &str) -> bool {
    answer.trim_start().starts_with(['y', 'Y'])
}

/// Replays canned answers and records every question asked.
#[cfg(test)]
pub struct ScriptedPrompt {
    confirms: std::collections::VecDeque<bool>,
    answers: std::collections::VecDeque<String>,
    pub questions: Vec<String>,
    /// How many of `questions` went through `ask_secret`.
    pub secrets_asked: usize,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn answering(confirms: &[bool]) -> Self {
        Self {
            confirms: confirms.iter().copied().collect(),
            answers: Default::default(),
            questions: Vec::new(),
            secrets_asked: 0,
        }
    }

    pub fn with_answers(mut self, answers: &[&str]) -> Self {
        self.answers = answers.iter().map(|a| a.to_string()).collect();
        self
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        self.questions.push(question.to_string());
        Ok(self.confirms.pop_front().unwrap_or(false))
    }

    fn ask(&mut self, label: &str) -> io::Result<String> {
        self.questions.push(label.to_string());
        Ok(self.answers.pop_front().unwrap_or_default())
    }

    fn ask_secret(&mut self, label: &str) -> io::Result<String> {
        self.secrets_asked += 1;
        self.ask(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes("Yes"));
        assert!(is_yes("  y"));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
        assert!(!is_yes("sure"));
    }

    #[test]
    fn scripted_prompt_defaults_to_no() {
        let mut prompt = ScriptedPrompt::answering(&[true]);
        assert!(prompt.confirm("first?").unwrap());
        assert!(!prompt.confirm("second?").unwrap());
        assert_eq!(prompt.questions, ["first?", "second?"]);
    }

    #[test]
    fn scripted_prompt_counts_secrets() {
        let mut prompt = ScriptedPrompt::answering(&[]).with_answers(&["admin", "secret"]);
        assert_eq!(prompt.ask("username: ").unwrap(), "admin");
        assert_eq!(prompt.ask_secret("password: ").unwrap(), "secret");
        assert_eq!(prompt.secrets_asked, 1);
    }
}
