//! Streaming WXR 1.1 writer.
//!
//! The element layout here is what WordPress importers key on, so names and
//! nesting must not drift. Element text and attribute values go through the
//! XML writer's escaping; CDATA bodies are written verbatim.

use std::io::Write;

use chrono::{DateTime, Local, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::content::{Author, Comment, Post};
use crate::error::WxrError;
use crate::settings::Settings;
use crate::terms::Term;

/// WXR format version written to `wp:wxr_version`.
pub const WXR_VERSION: &str = "1.1";

/// Namespace declarations on the root `rss` element.
pub const NAMESPACES: [(&str, &str); 5] = [
    ("xmlns:excerpt", "http://wordpress.org/export/1.1/excerpt/"),
    ("xmlns:content", "http://purl.org/rss/1.0/modules/content/"),
    ("xmlns:wfw", "http://wellformedweb.org/CommentAPI/"),
    ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
    ("xmlns:wp", "http://wordpress.org/export/1.1/"),
];

const WP_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CDATA_END: &str = "]]>";

/// Writes one WXR document section by section.
///
/// Call [`start`](Self::start) first, then authors, categories, tags and
/// posts in that order, and finally [`finish`](Self::finish).
pub struct WxrWriter<W: Write> {
    xml: Writer<W>,
}

impl<W: Write> WxrWriter<W> {
    /// Wraps `sink`; output is tab-indented.
    #[must_use]
    pub fn new(sink: W) -> Self {
        Self {
            xml: Writer::new_with_indent(sink, b'\t', 1),
        }
    }

    /// Writes the declaration, generator comment, root element and channel
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write.
    pub fn start(&mut self, settings: &Settings, now: DateTime<Utc>) -> Result<(), WxrError> {
        let local_now = now.with_timezone(&Local);
        let version = comment_safe(&settings.wp_version);

        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.xml.write_event(Event::Comment(BytesText::from_escaped(format!(
            " generator=\"WordPress/{version}\" created=\"{}\" ",
            local_now.format(WP_DATE_FORMAT)
        ))))?;

        let mut root = BytesStart::new("rss").with_attributes([("version", "2.0")]);
        root.extend_attributes(NAMESPACES);
        self.xml.write_event(Event::Start(root))?;
        self.open("channel")?;

        self.text("title", &settings.site_title)?;
        self.text("link", &settings.site_url)?;
        self.text("description", &settings.site_title)?;
        self.text("pubDate", &local_now.to_rfc2822())?;
        self.text("language", "en")?;
        self.text("wp:wxr_version", WXR_VERSION)?;
        self.text("wp:base_site_url", &settings.site_url)?;
        self.text("wp:base_blog_url", &settings.site_url)?;
        self.text(
            "generator",
            &format!("http://wordpress.org/?v={}", settings.wp_version),
        )
    }

    /// Writes one `wp:author` block.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write.
    pub fn author(&mut self, author: &Author) -> Result<(), WxrError> {
        self.open("wp:author")?;
        self.text("wp:author_id", &author.id.to_string())?;
        self.text("wp:author_login", &author.login())?;
        self.text("wp:author_email", "")?;
        self.cdata("wp:author_display_name", &author.display_name())?;
        self.cdata("wp:author_first_name", "")?;
        self.cdata("wp:author_last_name", "")?;
        self.close("wp:author")
    }

    /// Writes one `wp:category` block.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write.
    pub fn category(&mut self, term: &Term) -> Result<(), WxrError> {
        self.open("wp:category")?;
        self.text("wp:term_id", &term.id.to_string())?;
        self.text("wp:category_nicename", &term.slug)?;
        self.text("wp:category_parent", "")?;
        self.cdata("wp:cat_name", &term.name)?;
        self.close("wp:category")
    }

    /// Writes one `wp:term` block in the `post_tag` taxonomy.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write.
    pub fn tag(&mut self, term: &Term) -> Result<(), WxrError> {
        self.open("wp:term")?;
        self.text("wp:term_id", &term.id.to_string())?;
        self.text("wp:term_taxonomy", term.taxonomy.domain())?;
        self.text("wp:term_slug", &term.slug)?;
        self.cdata("wp:term_name", &term.name)?;
        self.close("wp:term")
    }

    /// Writes one `item` block with its term references and comments.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write.
    pub fn post(&mut self, post: &Post, site_url: &str) -> Result<(), WxrError> {
        let login = post.author.as_ref().map(Author::login).unwrap_or_default();

        self.open("item")?;
        self.text("title", &post.title())?;
        self.text("link", &post.permalink(site_url))?;
        self.text("pubDate", &post.date.with_timezone(&Local).to_rfc2822())?;
        self.text("dc:creator", &login)?;
        self.text_with("guid", &[("isPermaLink", "false")], &post.guid(site_url))?;
        self.text("description", "")?;
        self.cdata("content:encoded", &post.content)?;
        self.cdata("excerpt:encoded", "")?;
        self.text("wp:post_id", &post.id.to_string())?;
        self.text("wp:post_date", &local_date(post.date))?;
        self.text("wp:post_date_gmt", &gmt_date(post.date))?;
        self.text("wp:comment_status", "open")?;
        self.text("wp:ping_status", "open")?;
        self.text("wp:post_name", &post.slug())?;
        self.text("wp:status", "publish")?;
        self.text("wp:post_parent", "0")?;
        self.text("wp:menu_order", "0")?;
        self.text("wp:post_type", "post")?;
        self.text("wp:post_password", "")?;
        self.text("wp:is_sticky", "0")?;

        for term in post.categories.iter().chain(&post.tags) {
            self.cdata_with(
                "category",
                &[("domain", term.taxonomy.domain()), ("nicename", term.slug.as_str())],
                &term.name,
            )?;
        }

        for comment in &post.comments {
            self.comment(comment, site_url)?;
        }

        self.close("item")
    }

    fn comment(&mut self, comment: &Comment, site_url: &str) -> Result<(), WxrError> {
        let login = comment
            .author
            .as_ref()
            .map(Author::login)
            .unwrap_or_default();

        self.open("wp:comment")?;
        self.text("wp:comment_id", &comment.id.to_string())?;
        self.cdata("wp:comment_author", &login)?;
        self.text("wp:comment_author_email", "")?;
        self.text("wp:comment_author_url", site_url)?;
        self.text("wp:comment_author_IP", "")?;
        self.text("wp:comment_date", &local_date(comment.date))?;
        self.text("wp:comment_date_gmt", &gmt_date(comment.date))?;
        self.cdata("wp:comment_content", &comment.content)?;
        self.text("wp:comment_approved", if comment.approved { "1" } else { "0" })?;
        self.text("wp:comment_type", "")?;
        self.text("wp:comment_parent", &comment.parent.to_string())?;
        self.text("wp:comment_user_id", "0")?;
        self.close("wp:comment")
    }

    /// Closes the channel and root elements, flushes and returns the sink.
    ///
    /// # Errors
    ///
    /// Returns [`WxrError`] if the sink rejects a write or the flush.
    pub fn finish(mut self) -> Result<W, WxrError> {
        self.close("channel")?;
        self.close("rss")?;
        self.xml.get_mut().write_all(b"\n")?;
        self.xml.get_mut().flush()?;
        Ok(self.xml.into_inner())
    }

    fn open(&mut self, name: &str) -> Result<(), WxrError> {
        self.xml.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), WxrError> {
        self.xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn text(&mut self, name: &str, value: &str) -> Result<(), WxrError> {
        self.text_with(name, &[], value)
    }

    fn text_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        value: &str,
    ) -> Result<(), WxrError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.xml.write_event(Event::Start(start))?;
        self.xml.write_event(Event::Text(BytesText::new(value)))?;
        self.close(name)
    }

    fn cdata(&mut self, name: &str, value: &str) -> Result<(), WxrError> {
        self.cdata_with(name, &[], value)
    }

    fn cdata_with(
        &mut self,
        name: &str,
        attributes: &[(&str, &str)],
        value: &str,
    ) -> Result<(), WxrError> {
        let start = BytesStart::new(name).with_attributes(attributes.iter().copied());
        self.xml.write_event(Event::Start(start))?;
        for section in cdata_sections(value) {
            self.xml.write_event(Event::CData(BytesCData::new(section)))?;
        }
        self.close(name)
    }
}

/// Splits `value` so no section contains the CDATA terminator; the `]]`
/// stays in one section and the `>` opens the next.
fn cdata_sections(value: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = value;
    while let Some(position) = rest.find(CDATA_END) {
        let (head, tail) = rest.split_at(position + 2);
        sections.push(head);
        rest = tail;
    }
    sections.push(rest);
    sections
}

/// XML comments may not contain `--`.
fn comment_safe(value: &str) -> String {
    let mut out = value.to_owned();
    while out.contains("--") {
        out = out.replace("--", "-");
    }
    out
}

fn local_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&Local).format(WP_DATE_FORMAT).to_string()
}

fn gmt_date(date: DateTime<Utc>) -> String {
    date.format(WP_DATE_FORMAT).to_string()
}
