//! Document-level tests: the generated export is read back with
//! `quick_xml::Reader` and checked for counts, references and ordering.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]


use std::collections::HashSet;

use rstest::{fixture, rstest};
use test_support::{FixtureClock, ParsedDocument, fixture_timestamp, parse_document};
use wxr_fixtures::{NAMESPACES, POST_WINDOW_DAYS, RawOptions, Settings, write_wxr};

fn settings_from(pairs: &[(&str, &str)]) -> Settings {
    let options: RawOptions = pairs.iter().copied().collect();
    Settings::from_options(&options).expect("valid options")
}

fn render(settings: &Settings) -> String {
    let bytes = write_wxr(settings, &FixtureClock::new(), Vec::new()).expect("write succeeds");
    String::from_utf8(bytes).expect("utf-8 output")
}

fn parse(settings: &Settings) -> ParsedDocument {
    parse_document(&render(settings)).expect("well-formed document")
}

#[fixture]
fn busy_settings() -> Settings {
    settings_from(&[
        ("post_count", "12"),
        ("comments_per_post", "4"),
        ("tag_count", "6"),
        ("cat_count", "4"),
        ("tags_per_post", "3"),
        ("cats_per_post", "2"),
        ("author_count", "3"),
        ("seed", "20260224"),
    ])
}

#[test]
fn small_site_has_expected_shape() {
    let settings = settings_from(&[
        ("post_count", "2"),
        ("comments_per_post", "1"),
        ("tag_count", "1"),
        ("cat_count", "1"),
        ("author_count", "1"),
        ("seed", "1"),
    ]);

    let doc = parse(&settings);

    assert_eq!(doc.count("wp:author"), 1);
    assert_eq!(doc.count("wp:category"), 1);
    assert_eq!(doc.count("wp:term"), 1);
    assert_eq!(doc.count("item"), 2);
    assert_eq!(doc.count("wp:comment"), 2);
    assert_eq!(doc.texts("wp:comment_id"), ["1", "2"]);
    assert_eq!(doc.texts("wp:comment_parent"), ["0", "0"]);
}

#[test]
fn fixed_seed_and_clock_reproduce_the_document() {
    let settings = settings_from(&[("post_count", "5"), ("seed", "77")]);

    assert_eq!(render(&settings), render(&settings));
}

#[test]
fn different_seeds_change_the_content() {
    let first = settings_from(&[("post_count", "5"), ("seed", "1")]);
    let second = settings_from(&[("post_count", "5"), ("seed", "2")]);

    assert_ne!(render(&first), render(&second));
}

#[test]
fn channel_metadata_describes_the_site() {
    let settings = settings_from(&[
        ("site_title", "Fish & <Chips>"),
        ("site_url", "https://example.test/blog/"),
        ("wp_version", "6.4.2"),
        ("post_count", "0"),
    ]);

    let xml = render(&settings);
    let doc = parse_document(&xml).expect("well-formed document");
    let rss = doc.named("rss").next().expect("root element");

    assert!(xml.contains("<!-- generator=\"WordPress/6.4.2\" created=\""));
    assert_eq!(rss.attribute("version"), Some("2.0"));
    for (name, uri) in NAMESPACES {
        assert_eq!(rss.attribute(name), Some(uri), "namespace {name}");
    }
    assert_eq!(doc.first_text("title").as_deref(), Some("Fish & <Chips>"));
    assert_eq!(doc.first_text("description").as_deref(), Some("Fish & <Chips>"));
    assert_eq!(
        doc.first_text("wp:base_site_url").as_deref(),
        Some("https://example.test/blog/")
    );
    assert_eq!(
        doc.first_text("generator").as_deref(),
        Some("http://wordpress.org/?v=6.4.2")
    );
    assert_eq!(doc.first_text("wp:wxr_version").as_deref(), Some("1.1"));
    assert_eq!(doc.count("item"), 0);
}

#[rstest]
fn posts_are_numbered_and_linked(busy_settings: Settings) {
    let doc = parse(&busy_settings);

    let ids = doc.texts("wp:post_id");
    let expected: Vec<String> = (1..=busy_settings.post_count)
        .map(|id| id.to_string())
        .collect();
    assert_eq!(ids, expected);

    for (id, link) in ids.iter().zip(doc.texts("link").iter().skip(1)) {
        assert!(link.starts_with("http://wordpress.org/20"), "link {link}");
        assert!(link.ends_with(&format!("/post-number-{id}/")), "link {link}");
    }
    for (id, guid) in ids.iter().zip(doc.texts("guid")) {
        assert_eq!(guid, format!("http://wordpress.org/?p={id}"));
    }
}

#[rstest]
fn comment_ids_cover_every_comment(busy_settings: Settings) {
    let doc = parse(&busy_settings);

    let expected: Vec<String> = (1..=busy_settings.total_comments())
        .map(|id| id.to_string())
        .collect();
    assert_eq!(doc.texts("wp:comment_id"), expected);
}

#[rstest]
fn term_references_point_at_listed_terms(busy_settings: Settings) {
    let doc = parse(&busy_settings);
    let listed_categories: HashSet<String> =
        doc.texts("wp:category_nicename").into_iter().collect();
    let listed_tags: HashSet<String> = doc.texts("wp:term_slug").into_iter().collect();

    assert_eq!(listed_categories.len(), busy_settings.cat_count);
    assert_eq!(listed_tags.len(), busy_settings.tag_count);

    let references: Vec<_> = doc.named("category").collect();
    assert!(!references.is_empty());
    for reference in references {
        let nicename = reference.attribute("nicename").expect("nicename attribute");
        match reference.attribute("domain") {
            Some("category") => assert!(listed_categories.contains(nicename), "{nicename}"),
            Some("post_tag") => assert!(listed_tags.contains(nicename), "{nicename}"),
            other => panic!("unexpected domain {other:?}"),
        }
    }
}

#[rstest]
fn dates_stay_inside_the_window(busy_settings: Settings) {
    let doc = parse(&busy_settings);
    let now = fixture_timestamp();
    let earliest = (now - chrono::TimeDelta::days(POST_WINDOW_DAYS))
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let latest = now.format("%Y-%m-%d %H:%M:%S").to_string();

    let mut current_post: Option<String> = None;
    for element in &doc.elements {
        match element.name.as_str() {
            "wp:post_date_gmt" => {
                assert!(element.text >= earliest, "post at {}", element.text);
                assert!(element.text <= latest, "post at {}", element.text);
                current_post = Some(element.text.clone());
            }
            "wp:comment_date_gmt" => {
                let published = current_post.as_deref().expect("comment follows its post");
                assert!(element.text.as_str() >= published, "comment before post");
                assert!(element.text <= latest, "comment in the future");
            }
            _ => {}
        }
    }
}

#[test]
fn nested_comment_parents_stay_in_range() {
    let settings = settings_from(&[
        ("post_count", "10"),
        ("comments_per_post", "5"),
        ("nest_comments", "true"),
        ("seed", "5"),
    ]);

    let doc = parse(&settings);

    for parent in doc.texts("wp:comment_parent") {
        let value: usize = parent.parse().expect("numeric parent");
        assert!((1..=5).contains(&value), "parent {value}");
    }
}

#[test]
fn zero_authors_leave_creators_empty() {
    let settings = settings_from(&[
        ("author_count", "0"),
        ("post_count", "2"),
        ("seed", "8"),
    ]);

    let doc = parse(&settings);

    assert_eq!(doc.count("wp:author"), 0);
    assert!(doc.texts("dc:creator").iter().all(String::is_empty));
    assert!(doc.texts("wp:comment_author").iter().all(String::is_empty));
}

#[test]
fn post_bodies_are_lorem_paragraphs() {
    let settings = settings_from(&[("post_count", "3"), ("seed", "11")]);

    let doc = parse(&settings);

    for body in doc.texts("content:encoded") {
        for sentence in body.split("\n\n") {
            assert!(sentence.ends_with('.'), "sentence {sentence:?}");
            assert!(
                sentence.chars().next().is_some_and(char::is_uppercase),
                "sentence {sentence:?}"
            );
        }
    }
}
