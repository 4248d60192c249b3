//! Builds a word list from saved HTTP responses or HTML files.
//!
//! Each input file holds one raw response (status line, headers, body) or a
//! bare HTML document. Words are printed one per line in sorted order, or as
//! a JSON array with `--json`.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use html_wordlist::{
    Error, ExtractionTask, HttpMessage, HttpResponseInspector, MessageSource, Options, Result,
    RunOutcome, WordExtractor, WordSet, WordSink,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "extract_words")]
#[command(about = "Build a word list from captured HTML responses")]
struct Args {
    /// Files holding raw HTTP responses or bare HTML ("-" reads stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// JSON file with extraction options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lowercase every word
    #[arg(long)]
    lowercase: bool,

    /// Track <script> regions (script text is still extracted)
    #[arg(long)]
    ignore_scripts: bool,

    /// Leave out text inside <style> elements
    #[arg(long)]
    ignore_styles: bool,

    /// Leave out HTML comments
    #[arg(long)]
    ignore_comments: bool,

    /// Read every response regardless of its Content-Type
    #[arg(long)]
    no_content_type_check: bool,

    /// Regular expression defining a word
    #[arg(long)]
    pattern: Option<String>,

    /// Print the words as a JSON array
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn options(&self) -> Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_json_file(path)?,
            None => Options::default(),
        };
        options.force_lowercase |= self.lowercase;
        options.ignore_script_tags |= self.ignore_scripts;
        options.ignore_style_tags |= self.ignore_styles;
        options.ignore_comments |= self.ignore_comments;
        if self.no_content_type_check {
            options.check_content_type = false;
        }
        if let Some(pattern) = &self.pattern {
            options.token_pattern.clone_from(pattern);
        }
        Ok(options)
    }
}

/// Reads input files lazily, one message per file.
struct FileSource {
    inputs: std::vec::IntoIter<PathBuf>,
}

impl MessageSource for FileSource {
    fn next_message(&mut self) -> Result<Option<HttpMessage>> {
        let Some(path) = self.inputs.next() else {
            return Ok(None);
        };
        let bytes = if path.as_os_str() == "-" {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| Error::Source(format!("stdin: {e}")))?;
            buf
        } else {
            std::fs::read(&path).map_err(|e| Error::Source(format!("{}: {e}", path.display())))?
        };
        Ok(Some(HttpMessage::new(bytes)))
    }
}

/// Writes the final word list to stdout.
struct StdoutSink {
    json: bool,
}

impl WordSink for StdoutSink {
    fn add_words(&mut self, words: WordSet) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let written = if self.json {
            serde_json::to_writer_pretty(&mut out, &words)
                .map_err(io::Error::from)
                .and_then(|()| writeln!(out))
        } else {
            words.iter().try_for_each(|word| writeln!(out, "{word}"))
        };
        written
            .and_then(|()| out.flush())
            .map_err(|e| Error::Sink(e.to_string()))
    }
}

fn init_logging(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args).await {
        Ok(RunOutcome::Completed(summary)) => {
            if summary.documents_failed > 0 {
                eprintln!(
                    "{} of {} documents could not be parsed",
                    summary.documents_failed, summary.documents_seen
                );
            }
            ExitCode::SUCCESS
        }
        Ok(RunOutcome::Cancelled) => {
            eprintln!("cancelled");
            ExitCode::from(130)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<RunOutcome> {
    let extractor = WordExtractor::new(args.options()?)?;
    let source = FileSource {
        inputs: args.inputs.into_iter(),
    };
    let sink = StdoutSink { json: args.json };

    let task = ExtractionTask::spawn(extractor, source, HttpResponseInspector, sink);
    let cancel = task.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    task.join().await
}
