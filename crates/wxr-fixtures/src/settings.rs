//! Validated generation settings.
//!
//! [`Settings::from_options`] walks a fixed table of option rules in order.
//! Every rule whose option is present gets a chance to reject its value; all
//! failures are logged and collected so the caller sees every problem in one
//! run instead of fixing them one at a time.

use tracing::{debug, warn};
use url::Url;

use crate::error::{ConfigError, FieldError};
use crate::options::RawOptions;
use crate::terms::TermPool;

/// Default channel title.
pub const DEFAULT_SITE_TITLE: &str = "Just Another WordPress Site";

/// Default base URL for permalinks.
pub const DEFAULT_SITE_URL: &str = "http://wordpress.org/";

/// Default WordPress version advertised by the generator comment.
pub const DEFAULT_WP_VERSION: &str = "6.5";

/// Option names recognised by [`Settings::from_options`], in check order.
pub const OPTION_NAMES: [&str; 12] = [
    "site_title",
    "site_url",
    "post_count",
    "comments_per_post",
    "tag_count",
    "cat_count",
    "tags_per_post",
    "cats_per_post",
    "author_count",
    "nest_comments",
    "seed",
    "wp_version",
];

/// Everything one generation run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Channel title and description.
    pub site_title: String,
    /// Base URL for permalinks, GUIDs and comment author URLs.
    pub site_url: String,
    /// Number of posts.
    pub post_count: usize,
    /// Number of comments attached to every post.
    pub comments_per_post: usize,
    /// Number of tags in the tag listing.
    pub tag_count: usize,
    /// Number of categories in the category listing.
    pub cat_count: usize,
    /// Upper bound on tags referenced by one post.
    pub tags_per_post: usize,
    /// Upper bound on categories referenced by one post.
    pub cats_per_post: usize,
    /// Number of authors.
    pub author_count: usize,
    /// Whether comments get a parent reference.
    pub nest_comments: bool,
    /// Fixed RNG seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    /// Version string for the generator comment and `<generator>` URL.
    pub wp_version: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            site_title: DEFAULT_SITE_TITLE.to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
            post_count: 10,
            comments_per_post: 2,
            tag_count: 3,
            cat_count: 3,
            tags_per_post: 5,
            cats_per_post: 5,
            author_count: 1,
            nest_comments: false,
            seed: None,
            wp_version: DEFAULT_WP_VERSION.to_owned(),
        }
    }
}

struct OptionRule {
    name: &'static str,
    apply: fn(&mut Settings, &str) -> Result<(), FieldError>,
}

fn option_rules() -> [OptionRule; 12] {
    [
        OptionRule {
            name: "site_title",
            apply: |settings, raw| {
                raw.clone_into(&mut settings.site_title);
                Ok(())
            },
        },
        OptionRule {
            name: "site_url",
            apply: |settings, raw| {
                settings.site_url = check_site_url(raw)?;
                Ok(())
            },
        },
        OptionRule {
            name: "post_count",
            apply: |settings, raw| {
                settings.post_count = check_count("post_count", raw, "Post count")?;
                Ok(())
            },
        },
        OptionRule {
            name: "comments_per_post",
            apply: |settings, raw| {
                settings.comments_per_post =
                    check_count("comments_per_post", raw, "Comments per post count")?;
                Ok(())
            },
        },
        OptionRule {
            name: "tag_count",
            apply: |settings, raw| {
                settings.tag_count = check_count("tag_count", raw, "Tag count")?;
                Ok(())
            },
        },
        OptionRule {
            name: "cat_count",
            apply: |settings, raw| {
                settings.cat_count = check_count("cat_count", raw, "Category count")?;
                Ok(())
            },
        },
        OptionRule {
            name: "tags_per_post",
            apply: |settings, raw| {
                settings.tags_per_post =
                    check_count("tags_per_post", raw, "Tag count per post")?;
                Ok(())
            },
        },
        OptionRule {
            name: "cats_per_post",
            apply: |settings, raw| {
                settings.cats_per_post =
                    check_count("cats_per_post", raw, "Category count per post")?;
                Ok(())
            },
        },
        OptionRule {
            name: "author_count",
            apply: |settings, raw| {
                settings.author_count = check_count("author_count", raw, "Author count")?;
                Ok(())
            },
        },
        OptionRule {
            name: "nest_comments",
            apply: |settings, raw| {
                settings.nest_comments = raw.trim() == "true";
                Ok(())
            },
        },
        OptionRule {
            name: "seed",
            apply: |settings, raw| {
                let seed = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| FieldError::new("seed", "Seed should be numeric."))?;
                settings.seed = Some(seed);
                Ok(())
            },
        },
        OptionRule {
            name: "wp_version",
            apply: |settings, raw| {
                let version = raw.trim();
                if version.is_empty() {
                    return Err(FieldError::new(
                        "wp_version",
                        "WordPress version should not be empty.",
                    ));
                }
                version.clone_into(&mut settings.wp_version);
                Ok(())
            },
        },
    ]
}

fn check_count(option: &'static str, raw: &str, label: &str) -> Result<usize, FieldError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| FieldError::new(option, format!("{label} should be numeric.")))
}

fn check_site_url(raw: &str) -> Result<String, FieldError> {
    let reject = || FieldError::new("site_url", "Site url should be a url.");
    let url = Url::parse(raw.trim()).map_err(|_| reject())?;
    if !url.has_host() {
        return Err(reject());
    }
    Ok(raw.trim().to_owned())
}

impl Settings {
    /// Checks every recognised option present in `options` and applies it
    /// over the defaults.
    ///
    /// Unrecognised options are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] listing every option that failed its
    /// check, in [`OPTION_NAMES`] order.
    ///
    /// # Example
    ///
    /// ```
    /// use wxr_fixtures::{ConfigError, RawOptions, Settings};
    ///
    /// let options: RawOptions = [("post_count", "abc"), ("site_url", "not a url")]
    ///     .into_iter()
    ///     .collect();
    ///
    /// let Err(ConfigError::Invalid { failures }) = Settings::from_options(&options) else {
    ///     panic!("expected validation failure");
    /// };
    /// let names: Vec<_> = failures.iter().map(|f| f.option).collect();
    /// assert_eq!(names, ["site_url", "post_count"]);
    /// ```
    pub fn from_options(options: &RawOptions) -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        let mut failures = Vec::new();

        for rule in option_rules() {
            let Some(raw) = options.get(rule.name) else {
                continue;
            };
            if let Err(failure) = (rule.apply)(&mut settings, raw) {
                warn!(option = failure.option, "{}", failure.message);
                failures.push(failure);
            }
        }

        for name in options.names().filter(|name| !OPTION_NAMES.contains(name)) {
            debug!(option = name, "ignoring unrecognised option");
        }

        if failures.is_empty() {
            Ok(settings)
        } else {
            Err(ConfigError::Invalid { failures })
        }
    }

    /// Category ids available to posts.
    #[must_use]
    pub fn category_pool(&self) -> TermPool {
        TermPool::categories(self.cat_count)
    }

    /// Tag ids available to posts.
    #[must_use]
    pub fn tag_pool(&self) -> TermPool {
        TermPool::tags(self.tag_count)
    }

    /// Number of comments the document will contain.
    #[must_use]
    pub fn total_comments(&self) -> usize {
        self.post_count.saturating_mul(self.comments_per_post)
    }
}
