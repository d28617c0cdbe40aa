//! Output for taskpad commands: a plain-text report for people, or one JSON
//! envelope per run for scripts.
//!
//! ```text
//! {"schema_version":"taskpad.v1","command":"add","status":"success","data":{..}}
//! {"schema_version":"taskpad.v1","command":"add","status":"error","kind":"user_error","error":{..}}
//! ```

use std::fmt;

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "taskpad.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Plain-text report: a header line followed by optional bullet sections
#[derive(Debug, Clone, Default)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    /// `- key: value`, or `- key` when `value` is empty
    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, line: impl Into<String>) {
        self.details.push(line.into());
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn push_next_step(&mut self, step: impl Into<String>) {
        self.next_steps.push(step.into());
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;

        let summary: Vec<String> = self
            .summary
            .iter()
            .map(|(key, value)| match value.as_str() {
                "" => key.clone(),
                value => format!("{key}: {value}"),
            })
            .collect();

        for (title, items) in [
            ("Summary", &summary),
            ("Details", &self.details),
            ("Warnings", &self.warnings),
            ("Next steps", &self.next_steps),
        ] {
            if items.is_empty() {
                continue;
            }
            write!(f, "\n\n{title}:")?;
            for item in items {
                write!(f, "\n- {item}")?;
            }
        }
        Ok(())
    }
}

pub fn format_human(output: &HumanOutput) -> String {
    output.to_string()
}

#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Success,
    Error,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
    #[serde(skip_serializing_if = "no_items")]
    warnings: &'a [String],
    #[serde(skip_serializing_if = "no_items")]
    next_steps: &'a [String],
}

fn no_items(items: &&[String]) -> bool {
    items.is_empty()
}

impl<'a, T: Serialize> Envelope<'a, T> {
    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

/// Report a successful command; the human report also feeds the envelope's
/// `warnings` and `next_steps`
pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Success,
            kind: None,
            data: Some(data),
            error: None,
            warnings: human.map_or(&[][..], |h| h.warnings.as_slice()),
            next_steps: human.map_or(&[][..], |h| h.next_steps.as_slice()),
        }
        .print();
    }

    match human {
        Some(human) if !options.quiet => println!("{human}"),
        _ => {}
    }
    Ok(())
}

/// Report a failed command: an error envelope on stdout with `--json`,
/// otherwise `error:` and `hint:` lines on stderr
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hints = error_hints(err);
    if json {
        return Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            status: Status::Error,
            kind: Some(err.kind()),
            data: None,
            error: Some(JsonError::from(err)),
            warnings: &[],
            next_steps: &hints,
        }
        .print();
    }

    eprintln!("error: {err}");
    for hint in &hints {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

fn error_hints(err: &Error) -> Vec<String> {
    let hint = match err {
        Error::InvalidArgument(message) if message.starts_with("ambiguous task id") => {
            "run `taskpad list` and use a longer id prefix"
        }
        Error::InvalidArgument(message) if message.starts_with("task not found") => {
            "run `taskpad list --filter all` to see every id"
        }
        Error::InvalidConfig(_) => "fix config.toml then retry",
        Error::LockFailed(_) => "retry once other taskpad processes finish",
        _ => return Vec::new(),
    };
    vec![hint.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn hints_follow_error_type() {
        let ambiguous = Error::InvalidArgument("ambiguous task id 'a': a-1, a-2".to_string());
        assert!(error_hints(&ambiguous)[0].contains("taskpad list"));

        let locked = Error::LockFailed(PathBuf::from("tasks.json.lock"));
        assert_eq!(error_hints(&locked).len(), 1);

        let other = Error::InvalidArgument("title cannot be empty".to_string());
        assert!(error_hints(&other).is_empty());
    }

    #[test]
    fn error_envelope_shape() {
        let err = Error::InvalidArgument("title cannot be empty".to_string());
        let envelope = Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command: "add",
            status: Status::Error,
            kind: Some(err.kind()),
            data: None,
            error: Some(JsonError::from(&err)),
            warnings: &[],
            next_steps: &[],
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["kind"], "user_error");
        assert_eq!(value["error"]["code"], 2);
        assert!(value.get("data").is_none());
        assert!(value.get("next_steps").is_none());
    }
}
