//! Synthetic WXR export generator.
//!
//! This binary delegates to `wxr_fixtures::cli` for parsing and generation,
//! keeping the behaviour testable without spawning a process. The document
//! goes to stdout (or `--output`); diagnostics go to stderr.

use std::env;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use mockable::DefaultClock;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::util::SubscriberInitExt;
use wxr_fixtures::cli::{ParseOutcome, RunError, parse_args, run as run_invocation};

const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "Error: {err}") {
                drop(write_err);
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let ansi = io::stderr().is_terminal();
    if let Err(err) = log_subscriber(filter, ansi, io::stderr).try_init() {
        drop(err);
    }
}

/// Colour codes are only emitted when `ansi` is set, so redirected stderr
/// stays plain text.
fn log_subscriber<W>(
    filter: EnvFilter,
    ansi: bool,
    writer: W,
) -> fmt::Subscriber<DefaultFields, Format, EnvFilter, W>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    fmt::fmt()
        .with_env_filter(filter)
        .with_ansi(ansi)
        .with_writer(writer)
        .finish()
}

fn run() -> Result<(), RunError> {
    match parse_args(env::args().skip(1))? {
        ParseOutcome::Help => {
            print_usage(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Version => {
            print_version(io::stdout().lock());
            Ok(())
        }
        ParseOutcome::Run(invocation) => {
            run_invocation(&invocation, &DefaultClock, io::stdout().lock())
        }
    }
}

fn print_usage(mut out: impl Write) {
    let usage = concat!(
        "Usage: make-wxr [options] > export.xml\n",
        "\n",
        "Generates a WordPress eXtended RSS (WXR) file of placeholder content.\n",
        "Options may be written --name=value, --name value or --name-with-hyphens.\n",
        "\n",
        "Options:\n",
        "  --site_title <title>       Channel title (default: Just Another WordPress Site)\n",
        "  --site_url <url>           Base URL for links (default: http://wordpress.org/)\n",
        "  --post_count <n>           Number of posts (default: 10)\n",
        "  --comments_per_post <n>    Comments on every post (default: 2)\n",
        "  --tag_count <n>            Number of tags (default: 3)\n",
        "  --cat_count <n>            Number of categories (default: 3)\n",
        "  --tags_per_post <n>        Most tags on one post (default: 5)\n",
        "  --cats_per_post <n>        Most categories on one post (default: 5)\n",
        "  --author_count <n>         Number of authors (default: 1)\n",
        "  --nest_comments[=true]     Give comments a parent comment\n",
        "  --seed <n>                 RNG seed for reproducible output\n",
        "  --wp_version <version>     WordPress version to advertise (default: 6.5)\n",
        "  --config <path>            JSON file of option values\n",
        "  --output <path>            Write to a file instead of stdout\n",
        "  -h, --help                 Print this help output\n",
        "  -V, --version              Print the version\n",
    );
    if let Err(err) = out.write_all(usage.as_bytes()) {
        drop(err);
    }
}

fn print_version(mut out: impl Write) {
    if let Err(err) = writeln!(out, "make-wxr {}", env!("CARGO_PKG_VERSION")) {
        drop(err);
    }
}
