//! Synthetic WordPress eXtended RSS (WXR) export generation.
//!
//! This crate produces WXR 1.1 documents full of believable placeholder
//! content: authors, categories, tags, posts and comments. The output is
//! meant for seeding WordPress test sites and exercising importers.
//!
//! # Overview
//!
//! A run goes through three stages:
//!
//! - Raw option layers ([`RawOptions`]) from a JSON config file and the
//!   command line are merged and checked into [`Settings`]
//! - A [`GenerationContext`] assembles authors, terms, posts and comments
//! - A [`WxrWriter`] streams the document to any [`std::io::Write`] sink
//!
//! Supplying a `seed` together with a fixed clock makes the output
//! byte-for-byte reproducible.
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use wxr_fixtures::{RawOptions, Settings, write_wxr_with_rng};
//!
//! let options: RawOptions = [("post_count", "2"), ("comments_per_post", "1")]
//!     .into_iter()
//!     .collect();
//! let settings = Settings::from_options(&options).expect("valid options");
//! let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("valid date");
//!
//! let bytes = write_wxr_with_rng(&settings, ChaCha8Rng::seed_from_u64(1), now, Vec::new())
//!     .expect("in-memory write succeeds");
//! let xml = String::from_utf8(bytes).expect("utf-8 output");
//!
//! assert_eq!(xml.matches("<item>").count(), 2);
//! assert!(xml.contains("<wp:comment_id>2</wp:comment_id>"));
//! ```

mod atomic_io;
pub mod cli;
mod content;
mod document;
mod error;
pub mod lorem;
mod options;
mod settings;
mod terms;

use std::io::Write;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use content::{Author, Comment, GenerationContext, POST_WINDOW_DAYS, Post, authors};
pub use document::{NAMESPACES, WXR_VERSION, WxrWriter};
pub use error::{ConfigError, FieldError, WxrError};
pub use options::RawOptions;
pub use settings::{
    DEFAULT_SITE_TITLE, DEFAULT_SITE_URL, DEFAULT_WP_VERSION, OPTION_NAMES, Settings,
};
pub use terms::{Taxonomy, Term, TermPool, TermRegistry};

/// Writes one complete document to `sink` and hands the sink back.
///
/// The RNG is seeded from [`Settings::seed`], or from a freshly drawn seed
/// that is logged at `info` level so the run can be repeated. "Now" is read
/// from `clock` once and used for every date in the document.
///
/// # Errors
///
/// Returns [`WxrError`] if the sink rejects a write.
pub fn write_wxr<W: Write>(
    settings: &Settings,
    clock: &dyn Clock,
    sink: W,
) -> Result<W, WxrError> {
    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        seed,
        posts = settings.post_count,
        comments_per_post = settings.comments_per_post,
        authors = settings.author_count,
        "generating WXR document"
    );
    write_wxr_with_rng(settings, ChaCha8Rng::seed_from_u64(seed), clock.utc(), sink)
}

/// Writes one complete document using a caller-supplied RNG and time.
///
/// Sections are emitted in a fixed order: channel metadata, authors,
/// categories, tags, then posts. Each post is written as soon as it has been
/// assembled.
///
/// # Errors
///
/// Returns [`WxrError`] if the sink rejects a write.
pub fn write_wxr_with_rng<W: Write, R: Rng>(
    settings: &Settings,
    rng: R,
    now: DateTime<Utc>,
    sink: W,
) -> Result<W, WxrError> {
    let mut ctx = GenerationContext::new(settings, rng, now);
    let mut writer = WxrWriter::new(sink);

    writer.start(settings, ctx.now())?;
    for author in ctx.authors() {
        writer.author(author)?;
    }
    for term in ctx.category_listing() {
        writer.category(&term)?;
    }
    for term in ctx.tag_listing() {
        writer.tag(&term)?;
    }
    for id in 1..=settings.post_count {
        let post = ctx.post(id);
        debug!(
            post = id,
            comments = post.comments.len(),
            categories = post.categories.len(),
            tags = post.tags.len(),
            "writing post"
        );
        writer.post(&post, &settings.site_url)?;
    }

    writer.finish()
}

/// Writes one complete document to `path`, replacing it atomically.
///
/// Nothing is left at `path` (and no temp file remains) when generation
/// fails part way.
///
/// # Errors
///
/// Returns [`WxrError::Output`] if the target directory cannot be opened or
/// the file cannot be written and renamed into place.
pub fn write_wxr_file(
    settings: &Settings,
    clock: &dyn Clock,
    path: &Utf8Path,
) -> Result<(), WxrError> {
    let output_error = |message: String| WxrError::Output {
        path: path.to_path_buf(),
        message,
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| output_error("output path must be a file".to_owned()))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| output_error(err.to_string()))?;

    atomic_io::write_atomic(&dir, Utf8Path::new(file_name), |sink| {
        write_wxr(settings, clock, sink).map(drop)
    })
}
