//! Process-wide tracing setup.
//!
//! Settings come from `AUTOSNAP_LOG_*` environment variables. Console output
//! always goes to stderr; stdout belongs to command output.

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::Subscriber;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt,
    EnvFilter, Layer,
};

pub const DEFAULT_LOG_FILE: &str = "/var/log/pve-autosnap/autosnap.log";

// --- Writer that duplicates every line to two sinks ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A: Write, B: Write> Write for Tee<A, B> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write_all(buf);
        let res_b = self.b.write_all(buf);
        res_a.or(res_b).map(|_| buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a>,
    B: MakeWriter<'a>,
{
    type Writer = Tee<A::Writer, B::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    /// Logging disabled
    None,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            "none" | "off" => LogOutput::None,
            _ => LogOutput::Console,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Human,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Human
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// `EnvFilter` directive string, e.g. `info` or `autosnap_provider=debug`
    pub level: String,
    pub output: LogOutput,
    pub format: LogFormat,
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: LogOutput::Console,
            format: LogFormat::Human,
            file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl LogSettings {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`. `RUST_LOG` beats `AUTOSNAP_LOG_LEVEL`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            level: present("RUST_LOG")
                .or_else(|| present("AUTOSNAP_LOG_LEVEL"))
                .unwrap_or(defaults.level),
            output: present("AUTOSNAP_LOG_OUTPUT")
                .map(|v| LogOutput::parse(&v))
                .unwrap_or(defaults.output),
            format: present("AUTOSNAP_LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or(defaults.format),
            file: present("AUTOSNAP_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.file),
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.level).unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Directory and file name prefix for the daily rolling log file.
    fn file_parts(&self) -> (PathBuf, String) {
        let dir = self
            .file
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "autosnap.log".to_string());
        (dir, name)
    }
}

fn fmt_layer<S, W>(writer: W, format: LogFormat, ansi: bool) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + 'static,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    match format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Human => layer.with_target(false).boxed(),
    }
}

fn file_writer(settings: &LogSettings) -> Option<(NonBlocking, WorkerGuard)> {
    let (dir, name) = settings.file_parts();
    match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(name)
        .build(&dir)
    {
        Ok(appender) => Some(tracing_appender::non_blocking(appender)),
        Err(e) => {
            eprintln!(
                "⚠️  Cannot open log file in {}: {}; logging to console",
                dir.display(),
                e
            );
            None
        }
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive until exit, otherwise buffered file output
/// is lost. Calling this twice leaves the first subscriber in place.
pub fn init_subscriber(settings: &LogSettings) -> Option<WorkerGuard> {
    let registry = tracing_subscriber::registry().with(settings.env_filter());

    let (layer, guard) = match settings.output {
        LogOutput::None => (None, None),
        LogOutput::Console => (Some(fmt_layer(io::stderr, settings.format, true)), None),
        LogOutput::File => match file_writer(settings) {
            Some((writer, guard)) => (Some(fmt_layer(writer, settings.format, false)), Some(guard)),
            None => (Some(fmt_layer(io::stderr, settings.format, true)), None),
        },
        LogOutput::Both => match file_writer(settings) {
            Some((writer, guard)) => {
                let tee = MakeTee {
                    make_a: io::stderr,
                    make_b: writer,
                };
                (Some(fmt_layer(tee, settings.format, false)), Some(guard))
            }
            None => (Some(fmt_layer(io::stderr, settings.format, true)), None),
        },
    };

    // Err only means a subscriber is already installed.
    let _ = registry.with(layer).try_init();
    guard
}
