//! Category and tag naming.
//!
//! Every term carries a short random prefix so generated sites do not end up
//! with a wall of `Category 1`, `Category 2` labels. The prefix is drawn once
//! per `(taxonomy, id)` and then frozen for the rest of the run, which keeps
//! the top-level term listing and every per-post reference in agreement.

use std::collections::HashMap;
use std::ops::Range;

use rand::Rng;
use rand::seq::{SliceRandom, index};
use sha2::{Digest, Sha256};

/// Number of characters in a term prefix.
pub const PREFIX_LEN: usize = 10;

/// Lowest category id handed out.
pub const CATEGORY_MIN_ID: usize = 1;

/// Lowest tag id handed out.
pub const TAG_MIN_ID: usize = 1;

/// Term classification scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Taxonomy {
    /// Hierarchical post categories.
    Category,
    /// Flat post tags.
    Tag,
}

impl Taxonomy {
    /// Lower-case key used in slugs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }

    /// Capitalised key used in display names.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Tag => "Tag",
        }
    }

    /// WXR `domain` attribute for per-post references.
    #[must_use]
    pub const fn domain(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "post_tag",
        }
    }
}

/// A resolved category or tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Scheme the term belongs to.
    pub taxonomy: Taxonomy,
    /// Term id within its taxonomy.
    pub id: usize,
    /// Display name, e.g. `Category 3f9a0c1e2b 1`.
    pub name: String,
    /// URL slug, e.g. `category-3f9a0c1e2b-1`.
    pub slug: String,
}

/// Run-scoped cache of term prefixes.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use wxr_fixtures::{Taxonomy, TermRegistry};
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let mut terms = TermRegistry::new();
///
/// let first = terms.slug(&mut rng, Taxonomy::Tag, 2);
/// let again = terms.slug(&mut rng, Taxonomy::Tag, 2);
///
/// assert_eq!(first, again);
/// assert!(first.starts_with("tag-"));
/// assert!(first.ends_with("-2"));
/// ```
#[derive(Debug, Default)]
pub struct TermRegistry {
    prefixes: HashMap<(Taxonomy, usize), String>,
}

impl TermRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prefix for a term, drawing it on first use.
    pub fn prefix<R: Rng>(&mut self, rng: &mut R, taxonomy: Taxonomy, id: usize) -> &str {
        self.prefixes
            .entry((taxonomy, id))
            .or_insert_with(|| random_prefix(rng, taxonomy, id))
    }

    /// Display name: capitalised taxonomy, prefix, id.
    pub fn name<R: Rng>(&mut self, rng: &mut R, taxonomy: Taxonomy, id: usize) -> String {
        let prefix = self.prefix(rng, taxonomy, id);
        format!("{} {prefix} {id}", taxonomy.label())
    }

    /// Slug: taxonomy, prefix, id joined with hyphens.
    pub fn slug<R: Rng>(&mut self, rng: &mut R, taxonomy: Taxonomy, id: usize) -> String {
        let prefix = self.prefix(rng, taxonomy, id);
        format!("{}-{prefix}-{id}", taxonomy.as_str())
    }

    /// Resolves both the name and slug of a term.
    pub fn term<R: Rng>(&mut self, rng: &mut R, taxonomy: Taxonomy, id: usize) -> Term {
        Term {
            taxonomy,
            id,
            name: self.name(rng, taxonomy, id),
            slug: self.slug(rng, taxonomy, id),
        }
    }

    /// Number of prefixes drawn so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns `true` when no prefix has been drawn yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Hashes the term key with a random salt, shuffles the hex digest and keeps
/// the first [`PREFIX_LEN`] characters.
fn random_prefix<R: Rng>(rng: &mut R, taxonomy: Taxonomy, id: usize) -> String {
    let salt: u32 = rng.random();
    let digest = Sha256::digest(format!("{}{id}{salt}", taxonomy.as_str()).as_bytes());
    let mut chars: Vec<char> = hex::encode(digest).chars().collect();
    chars.shuffle(rng);
    chars.into_iter().take(PREFIX_LEN).collect()
}

/// The contiguous id range of one taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermPool {
    taxonomy: Taxonomy,
    ids: Range<usize>,
}

impl TermPool {
    /// Creates a pool of `count` ids starting at `min_id`.
    #[must_use]
    pub fn new(taxonomy: Taxonomy, min_id: usize, count: usize) -> Self {
        Self {
            taxonomy,
            ids: min_id..min_id.saturating_add(count),
        }
    }

    /// Category pool using [`CATEGORY_MIN_ID`].
    #[must_use]
    pub fn categories(count: usize) -> Self {
        Self::new(Taxonomy::Category, CATEGORY_MIN_ID, count)
    }

    /// Tag pool using [`TAG_MIN_ID`].
    #[must_use]
    pub fn tags(count: usize) -> Self {
        Self::new(Taxonomy::Tag, TAG_MIN_ID, count)
    }

    /// Taxonomy of every id in the pool.
    #[must_use]
    pub const fn taxonomy(&self) -> Taxonomy {
        self.taxonomy
    }

    /// Every id in the pool, ascending.
    #[must_use]
    pub fn ids(&self) -> Range<usize> {
        self.ids.clone()
    }

    /// Number of ids in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` when the pool holds no ids.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Draws up to `amount` distinct ids, capped at the pool size, returned
    /// in ascending order.
    pub fn sample<R: Rng>(&self, rng: &mut R, amount: usize) -> Vec<usize> {
        let capped = amount.min(self.len());
        let mut picked: Vec<usize> = index::sample(rng, self.len(), capped)
            .into_iter()
            .map(|offset| self.ids.start + offset)
            .collect();
        picked.sort_unstable();
        picked
    }
}

#[cfg(test)]
mod tests {
    //! Covers prefix memoisation, naming formats and pool sampling.

    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[rstest]
    fn prefix_is_memoised(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        let first = terms.prefix(&mut rng, Taxonomy::Category, 1).to_owned();
        let second = terms.prefix(&mut rng, Taxonomy::Category, 1).to_owned();

        assert_eq!(first, second);
        assert_eq!(terms.len(), 1);
    }

    #[rstest]
    fn prefix_is_short_lowercase_hex(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        let prefix = terms.prefix(&mut rng, Taxonomy::Tag, 9);

        assert_eq!(prefix.len(), PREFIX_LEN);
        assert!(prefix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn taxonomies_do_not_share_prefixes(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        terms.prefix(&mut rng, Taxonomy::Category, 1);
        terms.prefix(&mut rng, Taxonomy::Tag, 1);

        assert_eq!(terms.len(), 2);
    }

    #[rstest]
    fn name_and_slug_share_the_prefix(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        let term = terms.term(&mut rng, Taxonomy::Category, 4);
        let prefix = terms.prefix(&mut rng, Taxonomy::Category, 4).to_owned();

        assert_eq!(term.name, format!("Category {prefix} 4"));
        assert_eq!(term.slug, format!("category-{prefix}-4"));
    }

    #[rstest]
    fn repeated_lookups_are_identical(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        let listing = terms.term(&mut rng, Taxonomy::Tag, 3);

        for _ in 0..10 {
            assert_eq!(terms.term(&mut rng, Taxonomy::Tag, 3), listing);
        }
    }

    #[rstest]
    fn different_ids_get_different_slugs(mut rng: ChaCha8Rng) {
        let mut terms = TermRegistry::new();
        let slugs: HashSet<String> = (1..=50)
            .map(|id| terms.slug(&mut rng, Taxonomy::Category, id))
            .collect();

        assert_eq!(slugs.len(), 50);
    }

    #[rstest]
    #[case(Taxonomy::Category, "category", "Category", "category")]
    #[case(Taxonomy::Tag, "tag", "Tag", "post_tag")]
    fn taxonomy_spellings(
        #[case] taxonomy: Taxonomy,
        #[case] key: &str,
        #[case] label: &str,
        #[case] domain: &str,
    ) {
        assert_eq!(taxonomy.as_str(), key);
        assert_eq!(taxonomy.label(), label);
        assert_eq!(taxonomy.domain(), domain);
    }

    #[test]
    fn pool_covers_contiguous_range() {
        let pool = TermPool::new(Taxonomy::Tag, 5, 3);

        assert_eq!(pool.ids().collect::<Vec<_>>(), vec![5, 6, 7]);
        assert_eq!(pool.len(), 3);
    }

    #[rstest]
    #[case(3, 5, 3)]
    #[case(10, 4, 4)]
    #[case(0, 5, 0)]
    #[case(6, 0, 0)]
    fn sample_size_is_capped_by_pool(
        mut rng: ChaCha8Rng,
        #[case] pool_size: usize,
        #[case] requested: usize,
        #[case] expected: usize,
    ) {
        let pool = TermPool::categories(pool_size);

        for _ in 0..20 {
            let picked = pool.sample(&mut rng, requested);
            assert_eq!(picked.len(), expected);
        }
    }

    #[rstest]
    fn sample_is_distinct_sorted_and_in_range(mut rng: ChaCha8Rng) {
        let pool = TermPool::tags(12);

        for _ in 0..50 {
            let picked = pool.sample(&mut rng, 5);
            let unique: HashSet<_> = picked.iter().collect();

            assert_eq!(unique.len(), picked.len());
            assert!(picked.windows(2).all(|pair| pair.first() < pair.get(1)));
            assert!(picked.iter().all(|id| pool.ids().contains(id)));
        }
    }
}
