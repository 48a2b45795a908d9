//! Turns free text (revision notes, annotations) into markup with clickable
//! links that is safe to render.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::{DEFAULT_LINK_REL, DEFAULT_LINK_SCHEME, DEFAULT_LINK_TARGET, prelude::*};

/// Scheme URLs (`http://`, `ftp:`), bare `www.` hosts and `user@host`
/// strings, each followed by an optional path, query and fragment.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(([A-Za-z]{3,9}:(?://)?)(?:[-;:&=+$,A-Za-z0-9_]+@)?[A-Za-z0-9.-]+",
        r"|(?:www\.|[-;:&=+$,A-Za-z0-9_]+@)[A-Za-z0-9.-]+)",
        r"((?:/[+~%/.A-Za-z0-9_-]*)?\??(?:[-+=&;%~*@.A-Za-z0-9_]*)#?(?:[.!/\\A-Za-z0-9_]*))?",
    ))
    .expect("URL pattern is a valid regex")
});

static DEFAULT_POLICY: LazyLock<MarkupPolicy> = LazyLock::new(MarkupPolicy::default);

static DEFAULT_SANITIZER: LazyLock<ammonia::Builder<'static>> =
    LazyLock::new(|| sanitizer(DEFAULT_LINK_REL));

/// Sanitized HTML fragment. Only produced by [`MarkupPolicy::linkify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, Serialize)]
#[serde(transparent)]
pub struct SafeMarkup(String);

impl SafeMarkup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// How generated links are written.
///
/// Deserializes from any serde format; missing fields take the defaults,
/// which open links in a new tab without leaking the opener or referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupPolicy {
    /// Value of the `target` attribute on generated anchors
    pub link_target: String,
    /// `rel` value forced onto every anchor; empty disables it
    pub link_rel: String,
    /// Prepended to the href of bare `www.` links
    pub bare_host_scheme: String,
}

impl Default for MarkupPolicy {
    fn default() -> Self {
        Self {
            link_target: DEFAULT_LINK_TARGET.to_owned(),
            link_rel: DEFAULT_LINK_REL.to_owned(),
            bare_host_scheme: DEFAULT_LINK_SCHEME.to_owned(),
        }
    }
}

impl MarkupPolicy {
    /// Wraps every URL-like substring of `content` in an anchor and
    /// sanitizes the result. The visible text of each link is the matched
    /// substring; everything else passes through the sanitizer unchanged
    /// apart from escaping and the removal of disallowed tags/attributes.
    pub fn linkify(&self, content: &str) -> SafeMarkup {
        let mut links = 0_usize;
        let linked = URL_PATTERN.replace_all(content, |caps: &Captures<'_>| {
            links += 1;
            let url = &caps[0];
            let href = if url.starts_with("www.") {
                format!("{}{url}", self.bare_host_scheme)
            } else {
                url.to_owned()
            };
            format!(r#"<a href="{href}" target="{}">{url}</a>"#, self.link_target)
        });
        tracing::trace!(links, "linkified free text");

        let cleaned = if self.link_rel == DEFAULT_LINK_REL {
            DEFAULT_SANITIZER.clean(&linked)
        } else {
            sanitizer(&self.link_rel).clean(&linked)
        };
        SafeMarkup(cleaned.to_string())
    }
}

/// Link-ifies and sanitizes free text with the default [`MarkupPolicy`].
pub fn linkify_and_sanitize(content: &str) -> SafeMarkup {
    DEFAULT_POLICY.linkify(content)
}

/// Default allow-list plus `target` on anchors.
fn sanitizer(link_rel: &str) -> ammonia::Builder<'_> {
    let mut builder = ammonia::Builder::default();
    builder
        .add_tag_attributes("a", &["target"])
        .link_rel((!link_rel.is_empty()).then_some(link_rel));
    builder
}
