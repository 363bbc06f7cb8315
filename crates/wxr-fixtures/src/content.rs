//! Authors, posts and comments.
//!
//! [`GenerationContext`] owns the RNG, the term prefix cache and the running
//! comment id for one run. Listings and posts are returned as values so the
//! writer can stream each post as soon as it is assembled.

use chrono::{DateTime, Local, TimeDelta, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::lorem;
use crate::settings::Settings;
use crate::terms::{Taxonomy, Term, TermPool, TermRegistry};

/// How far back post dates reach.
pub const POST_WINDOW_DAYS: i64 = 60;

const SECONDS_PER_DAY: i64 = 86_400;

/// A site author, named after its 1-based id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Author {
    /// Sequential id starting at 1.
    pub id: usize,
}

impl Author {
    /// Login name, e.g. `author3`.
    #[must_use]
    pub fn login(&self) -> String {
        format!("author{}", self.id)
    }

    /// Display name, e.g. `Author 3`.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("Author {}", self.id)
    }
}

/// Builds the author list `1..=count`.
#[must_use]
pub fn authors(count: usize) -> Vec<Author> {
    (1..=count).map(|id| Author { id }).collect()
}

/// A comment attached to a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Document-wide id; never reset between posts.
    pub id: usize,
    /// Author, absent when the run has no authors.
    pub author: Option<Author>,
    /// Somewhere between the post date and "now".
    pub date: DateTime<Utc>,
    /// Lorem body text.
    pub content: String,
    /// Always `true` for generated comments.
    pub approved: bool,
    /// Parent comment reference, `0` when nesting is off.
    pub parent: usize,
}

/// A published post with its terms and comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Sequential id starting at 1.
    pub id: usize,
    /// Publish date inside the [`POST_WINDOW_DAYS`] window.
    pub date: DateTime<Utc>,
    /// Author, absent when the run has no authors.
    pub author: Option<Author>,
    /// Referenced categories, ascending by id.
    pub categories: Vec<Term>,
    /// Referenced tags, ascending by id.
    pub tags: Vec<Term>,
    /// Lorem body text.
    pub content: String,
    /// Comments in emission order.
    pub comments: Vec<Comment>,
}

impl Post {
    /// Post title, e.g. `Post Number 4`.
    #[must_use]
    pub fn title(&self) -> String {
        format!("Post Number {}", self.id)
    }

    /// Post slug, e.g. `post-number-4`.
    #[must_use]
    pub fn slug(&self) -> String {
        format!("post-number-{}", self.id)
    }

    /// Date-based permalink below `site_url`.
    ///
    /// The year and month are taken in local time, matching `wp:post_date`.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use wxr_fixtures::Post;
    ///
    /// let post = Post {
    ///     id: 4,
    ///     date: Utc.with_ymd_and_hms(2026, 3, 9, 12, 0, 0).single().expect("valid date"),
    ///     author: None,
    ///     categories: vec![],
    ///     tags: vec![],
    ///     content: String::new(),
    ///     comments: vec![],
    /// };
    ///
    /// assert_eq!(
    ///     post.permalink("http://example.test"),
    ///     "http://example.test/2026/03/post-number-4/"
    /// );
    /// ```
    #[must_use]
    pub fn permalink(&self, site_url: &str) -> String {
        let base = site_url.trim_end_matches('/');
        let month = self.date.with_timezone(&Local).format("%Y/%m");
        format!("{base}/{month}/{}/", self.slug())
    }

    /// Non-permalink GUID: the site URL with a `p` query argument.
    #[must_use]
    pub fn guid(&self, site_url: &str) -> String {
        let separator = if site_url.contains('?') { '&' } else { '?' };
        format!("{site_url}{separator}p={}", self.id)
    }
}

/// Mutable state shared by every stage of one generation run.
#[derive(Debug)]
pub struct GenerationContext<R> {
    rng: R,
    now: DateTime<Utc>,
    terms: TermRegistry,
    authors: Vec<Author>,
    categories: TermPool,
    tags: TermPool,
    cats_per_post: usize,
    tags_per_post: usize,
    comments_per_post: usize,
    nest_comments: bool,
    comments_emitted: usize,
}

impl<R: Rng> GenerationContext<R> {
    /// Prepares a run for `settings`, treating `now` as the current time.
    #[must_use]
    pub fn new(settings: &Settings, rng: R, now: DateTime<Utc>) -> Self {
        Self {
            rng,
            now,
            terms: TermRegistry::new(),
            authors: authors(settings.author_count),
            categories: settings.category_pool(),
            tags: settings.tag_pool(),
            cats_per_post: settings.cats_per_post,
            tags_per_post: settings.tags_per_post,
            comments_per_post: settings.comments_per_post,
            nest_comments: settings.nest_comments,
            comments_emitted: 0,
        }
    }

    /// The run's authors, ascending by id.
    #[must_use]
    pub fn authors(&self) -> &[Author] {
        &self.authors
    }

    /// The time treated as "now" for this run.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Number of comments assembled so far.
    #[must_use]
    pub const fn comments_emitted(&self) -> usize {
        self.comments_emitted
    }

    /// Every category, resolved through the prefix cache.
    pub fn category_listing(&mut self) -> Vec<Term> {
        let pool = self.categories.clone();
        self.listing(&pool)
    }

    /// Every tag, resolved through the prefix cache.
    pub fn tag_listing(&mut self) -> Vec<Term> {
        let pool = self.tags.clone();
        self.listing(&pool)
    }

    fn listing(&mut self, pool: &TermPool) -> Vec<Term> {
        pool.ids()
            .map(|id| self.terms.term(&mut self.rng, pool.taxonomy(), id))
            .collect()
    }

    /// Assembles post `id` with its terms and comments.
    pub fn post(&mut self, id: usize) -> Post {
        let offset = self
            .rng
            .random_range(0..=POST_WINDOW_DAYS * SECONDS_PER_DAY);
        let date = self.now - TimeDelta::seconds(offset);
        let author = self.pick_author();
        let content = lorem::text(&mut self.rng);

        let category_ids = self.categories.sample(&mut self.rng, self.cats_per_post);
        let categories = self.resolve(self.categories.taxonomy(), category_ids);
        let tag_ids = self.tags.sample(&mut self.rng, self.tags_per_post);
        let tags = self.resolve(self.tags.taxonomy(), tag_ids);

        let comments = self.comments(date);

        Post {
            id,
            date,
            author,
            categories,
            tags,
            content,
            comments,
        }
    }

    fn resolve(&mut self, taxonomy: Taxonomy, ids: Vec<usize>) -> Vec<Term> {
        ids.into_iter()
            .map(|id| self.terms.term(&mut self.rng, taxonomy, id))
            .collect()
    }

    fn pick_author(&mut self) -> Option<Author> {
        self.authors.choose(&mut self.rng).copied()
    }

    /// Comments count down from `comments_per_post`; with nesting on, the
    /// parent is drawn from `1..=remaining` and is not checked against ids
    /// that were actually emitted.
    fn comments(&mut self, published: DateTime<Utc>) -> Vec<Comment> {
        let span = (self.now - published).num_seconds().max(0);

        (1..=self.comments_per_post)
            .rev()
            .map(|remaining| {
                self.comments_emitted += 1;
                let date = published + TimeDelta::seconds(self.rng.random_range(0..=span));
                let parent = if self.nest_comments {
                    self.rng.random_range(1..=remaining)
                } else {
                    0
                };
                Comment {
                    id: self.comments_emitted,
                    author: self.pick_author(),
                    date,
                    content: lorem::text(&mut self.rng),
                    approved: true,
                    parent,
                }
            })
            .collect()
    }
}
