use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    command::Format,
    schema::sample::{SampleColumns, SurvivalRecord},
};

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
    /// Writes `value` in the requested format.
    ///
    /// `write_table` renders the plain-text form; JSON output uses the
    /// `Serialize` implementation.
    pub fn save_report<T, F>(
        value: &T,
        format: Format,
        output_path: Option<PathBuf>,
        write_table: F,
    ) -> anyhow::Result<()>
    where
        T: serde::Serialize,
        F: FnOnce(&mut dyn io::Write, &T) -> io::Result<()>,
    {
        let mut output = Output::from_output_path(output_path)?;
        match format {
            Format::Json => output.write_json(value),
            Format::Table => output.write_table(value, write_table),
        }
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        log::info!("Report written to {}", self.display_path());
        Ok(())
    }

    fn write_table<T, F>(&mut self, value: &T, write_table: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut dyn io::Write, &T) -> io::Result<()>,
    {
        write_table(&mut *self, value)
            .with_context(|| format!("Failed to write table to {}", self.display_path()))?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        log::info!("Report written to {}", self.display_path());
        Ok(())
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

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read survival records from a JSON file and split them into columns
///
/// # Arguments
///
/// * `file_kind` - Role of the file in the command (e.g. "train", "test"), used in messages
/// * `path` - Path to a JSON array of survival records
///
/// # Errors
///
/// Returns error if the file cannot be opened or parsed, is empty, or
/// carries `entry`/`estimate` on only some of the records
pub fn read_samples_file<P>(file_kind: &str, path: P) -> anyhow::Result<SampleColumns>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    log::info!("Loading {file_kind} samples from {}", path.display());
    let records: Vec<SurvivalRecord> = read_json_file(file_kind, path)?;
    let columns = SampleColumns::from_records(&records)
        .with_context(|| format!("Invalid {file_kind} samples in {}", path.display()))?;
    log::info!(
        "Loaded {} samples ({} events)",
        columns.event.len(),
        columns.event.iter().filter(|&&e| e).count()
    );
    Ok(columns)
}
