//! Dockerfile directives.
//!
//! Each instruction kind is a plain value type that renders itself to the
//! exact Dockerfile text via `render()`. [`Directive`] is the closed sum over
//! all of them and the single dispatch point used by stages.
//!
//! Directives perform no validation and no escaping: field values are
//! emitted verbatim. Optional qualifiers (platform, alias, `--from`,
//! `--chown`, group, protocol) are emitted only when present and non-empty.
//!
//! # Supported Instructions
//!
//! FROM, RUN, COPY, ADD, WORKDIR, USER, EXPOSE, ENTRYPOINT, CMD, ARG, ENV,
//! LABEL, VOLUME, SHELL, HEALTHCHECK, plus comments and blank lines.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::labels::Labels;

pub const DEFAULT_HEALTHCHECK_INTERVAL_SECONDS: u32 = 10;
pub const DEFAULT_HEALTHCHECK_TIMEOUT_SECONDS: u32 = 5;
pub const DEFAULT_HEALTHCHECK_START_PERIOD_SECONDS: u32 = 30;
pub const DEFAULT_HEALTHCHECK_RETRIES: u32 = 3;

/// A single Dockerfile instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Directive {
    /// `# <text>`
    Comment(Comment),
    /// An empty line
    Blank,
    /// `FROM [--platform=<platform>] <image> [AS <alias>]`
    From(FromImage),
    /// `RUN <command>` (shell form)
    Run(Run),
    /// `COPY [--from=<stage>] [--chown=<owner>] <src> <dst>`
    Copy(CopyFiles),
    /// `ADD [--chown=<owner>] <src> <dst>`
    Add(Add),
    /// `WORKDIR <path>`
    Workdir(Workdir),
    /// `USER <user>[:<group>]`
    User(User),
    /// `EXPOSE <port>[/<proto>]`
    Expose(Expose),
    /// `ENTRYPOINT ["exec", "form"]`
    Entrypoint(Entrypoint),
    /// `CMD ["exec", "form"]`
    Cmd(Cmd),
    /// `ARG <name>[=<default>]`
    Arg(Arg),
    /// `ENV <key>="<value>"`
    Env(Env),
    /// `LABEL <key>="<value>" ...`
    Label(Label),
    /// `VOLUME <path>` or `VOLUME ["a", "b"]`
    Volume(Volume),
    /// `SHELL ["exec", "form"]`
    Shell(Shell),
    /// `HEALTHCHECK --interval=... CMD <command>`
    #[serde(rename = "healthcheck")]
    HealthCheck(HealthCheck),
    /// `HEALTHCHECK NONE`
    #[serde(rename = "healthcheck_none")]
    HealthCheckNone,
}

impl Directive {
    /// Render this directive to Dockerfile text.
    ///
    /// Most directives render to one line; `LABEL` with several entries and
    /// `HEALTHCHECK` use backslash continuation lines.
    pub fn render(&self) -> String {
        match self {
            Directive::Comment(d) => d.render(),
            Directive::Blank => String::new(),
            Directive::From(d) => d.render(),
            Directive::Run(d) => d.render(),
            Directive::Copy(d) => d.render(),
            Directive::Add(d) => d.render(),
            Directive::Workdir(d) => d.render(),
            Directive::User(d) => d.render(),
            Directive::Expose(d) => d.render(),
            Directive::Entrypoint(d) => d.render(),
            Directive::Cmd(d) => d.render(),
            Directive::Arg(d) => d.render(),
            Directive::Env(d) => d.render(),
            Directive::Label(d) => d.render(),
            Directive::Volume(d) => d.render(),
            Directive::Shell(d) => d.render(),
            Directive::HealthCheck(d) => d.render(),
            Directive::HealthCheckNone => "HEALTHCHECK NONE".to_string(),
        }
    }

    /// Instruction keyword, e.g. `"COPY"`. Comments and blank lines have none.
    pub fn keyword(&self) -> Option<&'static str> {
        let keyword = match self {
            Directive::Comment(_) | Directive::Blank => return None,
            Directive::From(_) => "FROM",
            Directive::Run(_) => "RUN",
            Directive::Copy(_) => "COPY",
            Directive::Add(_) => "ADD",
            Directive::Workdir(_) => "WORKDIR",
            Directive::User(_) => "USER",
            Directive::Expose(_) => "EXPOSE",
            Directive::Entrypoint(_) => "ENTRYPOINT",
            Directive::Cmd(_) => "CMD",
            Directive::Arg(_) => "ARG",
            Directive::Env(_) => "ENV",
            Directive::Label(_) => "LABEL",
            Directive::Volume(_) => "VOLUME",
            Directive::Shell(_) => "SHELL",
            Directive::HealthCheck(_) | Directive::HealthCheckNone => "HEALTHCHECK",
        };
        Some(keyword)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

macro_rules! impl_into_directive {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Directive {
                fn from(d: $ty) -> Self {
                    Directive::$variant(d)
                }
            }
        )*
    };
}

impl_into_directive! {
    Comment => Comment,
    FromImage => From,
    Run => Run,
    CopyFiles => Copy,
    Add => Add,
    Workdir => Workdir,
    User => User,
    Expose => Expose,
    Entrypoint => Entrypoint,
    Cmd => Cmd,
    Arg => Arg,
    Env => Env,
    Label => Label,
    Volume => Volume,
    Shell => Shell,
    HealthCheck => HealthCheck,
}

/// Optional qualifier that is only emitted when set and non-empty.
fn qualifier(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Render an argument list as a bracketed, quoted exec-form array.
fn exec_form(args: &[String]) -> String {
    let quoted: Vec<String> = args.iter().map(|a| format!("\"{a}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

fn to_strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// A comment line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub text: String,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn render(&self) -> String {
        format!("# {}", self.text)
    }
}

/// `FROM` instruction, the origin of every stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromImage {
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

impl FromImage {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            alias: None,
            platform: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::from("FROM ");
        if let Some(platform) = qualifier(&self.platform) {
            out.push_str(&format!("--platform={platform} "));
        }
        out.push_str(&self.image);
        if let Some(alias) = qualifier(&self.alias) {
            out.push_str(&format!(" AS {alias}"));
        }
        out
    }
}

/// `RUN` instruction. The command is emitted unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub command: String,
}

impl Run {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("RUN {}", self.command)
    }
}

/// `COPY` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyFiles {
    pub src: String,
    pub dst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chown: Option<String>,
}

impl CopyFiles {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            from_stage: None,
            chown: None,
        }
    }

    pub fn from_stage(mut self, stage: impl Into<String>) -> Self {
        self.from_stage = Some(stage.into());
        self
    }

    pub fn chown(mut self, owner: impl Into<String>) -> Self {
        self.chown = Some(owner.into());
        self
    }

    pub fn render(&self) -> String {
        let mut parts = vec!["COPY".to_string()];
        if let Some(stage) = qualifier(&self.from_stage) {
            parts.push(format!("--from={stage}"));
        }
        if let Some(owner) = qualifier(&self.chown) {
            parts.push(format!("--chown={owner}"));
        }
        parts.push(self.src.clone());
        parts.push(self.dst.clone());
        parts.join(" ")
    }
}

/// `ADD` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Add {
    pub src: String,
    pub dst: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chown: Option<String>,
}

impl Add {
    pub fn new(src: impl Into<String>, dst: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            chown: None,
        }
    }

    pub fn chown(mut self, owner: impl Into<String>) -> Self {
        self.chown = Some(owner.into());
        self
    }

    pub fn render(&self) -> String {
        let mut parts = vec!["ADD".to_string()];
        if let Some(owner) = qualifier(&self.chown) {
            parts.push(format!("--chown={owner}"));
        }
        parts.push(self.src.clone());
        parts.push(self.dst.clone());
        parts.join(" ")
    }
}

/// `WORKDIR` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workdir {
    pub path: String,
}

impl Workdir {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn render(&self) -> String {
        format!("WORKDIR {}", self.path)
    }
}

/// `USER` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl User {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: None,
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn render(&self) -> String {
        match qualifier(&self.group) {
            Some(group) => format!("USER {}:{}", self.user, group),
            None => format!("USER {}", self.user),
        }
    }
}

/// `EXPOSE` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expose {
    pub port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl Expose {
    pub fn new(port: i32) -> Self {
        Self {
            port,
            protocol: None,
        }
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn render(&self) -> String {
        match qualifier(&self.protocol) {
            Some(protocol) => format!("EXPOSE {}/{}", self.port, protocol),
            None => format!("EXPOSE {}", self.port),
        }
    }
}

/// `ENTRYPOINT` instruction, always in exec form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrypoint {
    pub args: Vec<String>,
}

impl Entrypoint {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: to_strings(args),
        }
    }

    pub fn render(&self) -> String {
        format!("ENTRYPOINT {}", exec_form(&self.args))
    }
}

/// `CMD` instruction, always in exec form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cmd {
    pub args: Vec<String>,
}

impl Cmd {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: to_strings(args),
        }
    }

    pub fn render(&self) -> String {
        format!("CMD {}", exec_form(&self.args))
    }
}

/// `ARG` instruction.
///
/// Unlike the other qualifiers, an empty default is still emitted
/// (`ARG NAME=`), since it declares an explicitly empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Arg {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn render(&self) -> String {
        match &self.default {
            Some(default) => format!("ARG {}={}", self.name, default),
            None => format!("ARG {}", self.name),
        }
    }
}

/// `ENV` instruction. The value is always double-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Env {
    pub key: String,
    pub value: String,
}

impl Env {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("ENV {}=\"{}\"", self.key, self.value)
    }
}

/// `LABEL` instruction with one or more key-value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub labels: Labels,
}

impl Label {
    pub fn new(labels: Labels) -> Self {
        Self { labels }
    }

    /// Single entries render inline; several entries render as a
    /// continuation block in insertion order. An empty map renders as an
    /// empty line.
    pub fn render(&self) -> String {
        let count = self.labels.len();
        match count {
            0 => String::new(),
            1 => {
                let (k, v) = self.labels.iter().next().unwrap_or_default();
                format!("LABEL {k}=\"{v}\"")
            }
            _ => {
                let mut lines = vec!["LABEL \\".to_string()];
                for (i, (k, v)) in self.labels.iter().enumerate() {
                    let suffix = if i + 1 < count { " \\" } else { "" };
                    lines.push(format!("      {k}=\"{v}\"{suffix}"));
                }
                lines.join("\n")
            }
        }
    }
}

/// `VOLUME` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Volume {
    pub paths: Vec<String>,
}

impl Volume {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: to_strings(paths),
        }
    }

    pub fn render(&self) -> String {
        match self.paths.as_slice() {
            [single] => format!("VOLUME {single}"),
            paths => format!("VOLUME {}", exec_form(paths)),
        }
    }
}

/// `SHELL` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shell {
    pub args: Vec<String>,
}

impl Shell {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: to_strings(args),
        }
    }

    pub fn render(&self) -> String {
        format!("SHELL {}", exec_form(&self.args))
    }
}

fn default_interval() -> u32 {
    DEFAULT_HEALTHCHECK_INTERVAL_SECONDS
}

fn default_timeout() -> u32 {
    DEFAULT_HEALTHCHECK_TIMEOUT_SECONDS
}

fn default_start_period() -> u32 {
    DEFAULT_HEALTHCHECK_START_PERIOD_SECONDS
}

fn default_retries() -> u32 {
    DEFAULT_HEALTHCHECK_RETRIES
}

/// `HEALTHCHECK` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub command: String,
    #[serde(default = "default_interval")]
    pub interval_seconds: u32,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    #[serde(default = "default_start_period")]
    pub start_period_seconds: u32,
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl HealthCheck {
    /// Health check with the default timings (10s / 5s / 30s / 3 retries).
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            interval_seconds: DEFAULT_HEALTHCHECK_INTERVAL_SECONDS,
            timeout_seconds: DEFAULT_HEALTHCHECK_TIMEOUT_SECONDS,
            start_period_seconds: DEFAULT_HEALTHCHECK_START_PERIOD_SECONDS,
            retries: DEFAULT_HEALTHCHECK_RETRIES,
        }
    }

    pub fn interval_seconds(mut self, seconds: u32) -> Self {
        self.interval_seconds = seconds;
        self
    }

    pub fn timeout_seconds(mut self, seconds: u32) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn start_period_seconds(mut self, seconds: u32) -> Self {
        self.start_period_seconds = seconds;
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    pub fn render(&self) -> String {
        format!(
            "HEALTHCHECK --interval={}s --timeout={}s --start-period={}s --retries={} \\\n  CMD {}",
            self.interval_seconds,
            self.timeout_seconds,
            self.start_period_seconds,
            self.retries,
            self.command
        )
    }
}
