use std::{
    borrow::Cow,
    fs::{self, File, OpenOptions},
    io::{self, BufWriter, Read as _, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use cellquest_engine::{FactionCounts, RoundOverrides};
use chrono::{DateTime, Local};

/// How a JSON document is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Indented, for snapshots and reports read by people.
    Pretty,
    /// One line, for client replies such as `{"error":"No state found"}`.
    Compact,
}

/// Destination of command output: stdout, or a file created or appended at a path.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    /// Writes `value` as pretty JSON to `output_path`, or to stdout when it is `None`.
    pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        Output::target(output_path)?.write_json(value, Layout::Pretty)
    }

    pub fn target(output_path: Option<&Path>) -> anyhow::Result<Self> {
        output_path.map_or_else(|| Ok(Output::stdout()), Output::create)
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    /// Truncates or creates the file at `path`.
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::file(file, path))
    }

    /// Opens the file at `path` for appending, creating it when missing.
    pub fn append(path: &Path) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open {} for appending", path.display()))?;
        Ok(Output::file(file, path))
    }

    fn file(file: File, path: &Path) -> Self {
        Output::File {
            writer: BufWriter::new(file),
            path: path.to_owned(),
        }
    }

    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Output::Stdout { .. } => Cow::Borrowed("stdout"),
            Output::File { path, .. } => path.to_string_lossy(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T, layout: Layout) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let result = match layout {
            Layout::Pretty => serde_json::to_writer_pretty(&mut *self, value),
            Layout::Compact => serde_json::to_writer(&mut *self, value),
        };
        result.with_context(|| format!("Failed to write JSON to {}", self.name()))?;
        self.write_text("\n")
    }

    /// Writes `text` as is and flushes.
    pub fn write_text(&mut self, text: &str) -> anyhow::Result<()> {
        self.write_all(text.as_bytes())
            .and_then(|()| self.flush())
            .with_context(|| format!("Failed to write to {}", self.name()))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Reads round overrides from a JSON file, or from stdin when `path` is `-`.
///
/// A body that is not a JSON object is ignored like any other malformed override.
pub fn read_overrides(path: &Path) -> anyhow::Result<RoundOverrides> {
    let text = if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read overrides from stdin")?;
        text
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read overrides file: {}", path.display()))?
    };
    Ok(parse_overrides(&text))
}

fn parse_overrides(text: &str) -> RoundOverrides {
    serde_json::from_str(text).unwrap_or_else(|error| {
        tracing::debug!(%error, "ignoring unreadable override body");
        RoundOverrides::none()
    })
}

/// Formats one win log line: `YYYY-mm-dd HH:MM:SS -- {counts}`.
pub fn win_log_line(timestamp: &DateTime<Local>, counts: &FactionCounts) -> anyhow::Result<String> {
    let counts = serde_json::to_string(counts).context("Failed to encode faction counts")?;
    Ok(format!("{} -- {counts}\n", timestamp.format("%Y-%m-%d %H:%M:%S")))
}

/// Appends a finished episode's counts to the win log.
pub fn append_win_log(path: &Path, counts: &FactionCounts) -> anyhow::Result<()> {
    let line = win_log_line(&Local::now(), counts)?;
    Output::append(path)?.write_text(&line)
}
