//! Minimal scanner for the arrivals board markup.
//!
//! Only understands what the board needs: opening tags, their `class`
//! attribute and the text between a tag and its matching close. Tag and
//! attribute names are matched case-insensitively (ASCII).

use flightstats_core::RawFlightFragment;

const CARD_CLASS: &str = "flight-card";
const TIME_CLASS: &str = "latest-time";
const STATUS_CONTAINER_CLASS: &str = "status-container";
const STATUS_CLASS: &str = "status";
const FLAGGED_CLASS: &str = "red";
const AIRLINE_CLASS: &str = "with-image";

#[derive(Debug, Clone)]
pub struct Tag<'a> {
    pub name: String,
    pub classes: Vec<&'a str>,
    /// Byte offset of `<`.
    pub start: usize,
    /// Byte offset just past `>`.
    pub end: usize,
}

impl Tag<'_> {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }
}

pub struct Document<'a> {
    html: &'a str,
    lower: String,
    tags: Vec<Tag<'a>>,
}

impl<'a> Document<'a> {
    pub fn parse(html: &'a str) -> Self {
        let lower = html.to_ascii_lowercase();
        let tags = scan_tags(html, &lower);
        Self { html, lower, tags }
    }

    pub fn tags(&self) -> &[Tag<'a>] {
        &self.tags
    }

    /// Text content of the element opened by `tag`, tags stripped.
    pub fn text(&self, tag: &Tag<'_>) -> String {
        let close = self.close_of(tag);
        let inner = &self.html[tag.end.min(close)..close];
        normalize_ws(&decode_entities(&strip_tags(inner)))
    }

    /// Offset of the closing tag for `tag`, or the end of the document when unclosed.
    pub fn close_of(&self, tag: &Tag<'_>) -> usize {
        self.matching_close(tag).unwrap_or(self.html.len())
    }

    fn matching_close(&self, tag: &Tag<'_>) -> Option<usize> {
        let open = format!("<{}", tag.name);
        let close = format!("</{}", tag.name);
        let mut depth = 1usize;
        let mut pos = tag.end;

        while pos < self.lower.len() {
            let next_close = self.lower[pos..].find(&close).map(|i| i + pos)?;
            let next_open = self.lower[pos..]
                .match_indices(&open)
                .map(|(i, _)| i + pos)
                .find(|&i| is_name_boundary(&self.lower, i + open.len()));

            match next_open {
                Some(o) if o < next_close => {
                    depth += 1;
                    pos = o + open.len();
                }
                _ => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(next_close);
                    }
                    pos = next_close + close.len();
                }
            }
        }
        None
    }
}

/// Cuts the board page into one raw fragment per flight card.
pub fn extract_fragments(html: &str) -> Vec<RawFlightFragment> {
    let doc = Document::parse(html);
    let tags = doc.tags();

    let card_starts: Vec<usize> = tags
        .iter()
        .enumerate()
        .filter(|(_, t)| t.has_class(CARD_CLASS))
        .map(|(i, _)| i)
        .collect();

    card_starts
        .iter()
        .enumerate()
        .map(|(n, &first)| {
            let last = card_starts.get(n + 1).copied().unwrap_or(tags.len());
            card_fragment(&doc, &tags[first..last])
        })
        .collect()
}

fn card_fragment(doc: &Document<'_>, card: &[Tag<'_>]) -> RawFlightFragment {
    // `.latest-time div`
    let scheduled_time = descendant(doc, card, TIME_CLASS, |t| t.name == "div")
        .map(|t| doc.text(t))
        .unwrap_or_default();

    // `.status-container .status`
    let status_tag = descendant(doc, card, STATUS_CONTAINER_CLASS, |t| t.has_class(STATUS_CLASS));

    let airline = card
        .iter()
        .find(|t| t.name == "span" && t.has_class(AIRLINE_CLASS))
        .map(|t| doc.text(t))
        .unwrap_or_default();

    RawFlightFragment {
        scheduled_time,
        status: status_tag.map(|t| doc.text(t)),
        flagged: status_tag.is_some_and(|t| t.has_class(FLAGGED_CLASS)),
        airline,
    }
}

/// First tag matching `wanted` inside the first element of `card` with class `container`.
fn descendant<'t, 'a>(
    doc: &Document<'_>,
    card: &'t [Tag<'a>],
    container: &str,
    wanted: impl Fn(&Tag<'a>) -> bool,
) -> Option<&'t Tag<'a>> {
    let i = card.iter().position(|t| t.has_class(container))?;
    let close = doc.close_of(&card[i]);
    card[i + 1..]
        .iter()
        .take_while(|t| t.start < close)
        .find(|t| wanted(t))
}

fn scan_tags<'a>(html: &'a str, lower: &str) -> Vec<Tag<'a>> {
    let mut tags = Vec::new();
    let mut pos = 0;

    while let Some(rel) = html[pos..].find('<') {
        let start = pos + rel;

        if lower[start..].starts_with("<!--") {
            pos = lower[start..].find("-->").map_or(html.len(), |i| start + i + 3);
            continue;
        }

        // a bare `<` in text
        let opens_markup = html
            .as_bytes()
            .get(start + 1)
            .is_some_and(|b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'));
        if !opens_markup {
            pos = start + 1;
            continue;
        }

        let Some(end) = tag_end(html, start) else {
            pos = start + 1;
            continue;
        };
        let inner = &html[start + 1..end - 1];
        pos = end;

        if !inner.starts_with(|c: char| c.is_ascii_alphabetic()) {
            continue;
        }

        let name_len = inner
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(inner.len());
        let name = inner[..name_len].to_ascii_lowercase();

        if name == "script" || name == "style" {
            let close = format!("</{}", name);
            pos = lower[end..].find(&close).map_or(html.len(), |i| end + i);
        }

        let classes = attribute(&inner[name_len..], "class")
            .map(|v| v.split_ascii_whitespace().collect())
            .unwrap_or_default();

        tags.push(Tag { name, classes, start, end });
    }

    tags
}

/// Offset just past the `>` closing the tag at `start`, skipping quoted values.
fn tag_end(html: &str, start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in html.as_bytes()[start..].iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"') | (None, b'\'') => quote = Some(b),
            (None, b'>') => return Some(start + i + 1),
            _ => {}
        }
    }
    None
}

fn attribute<'a>(attrs: &'a str, wanted: &str) -> Option<&'a str> {
    let bytes = attrs.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' && bytes[i] != b'/' {
            i += 1;
        }
        let name = &attrs[name_start..i];
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = "";
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i];
                let value_start = i + 1;
                i = value_start;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                value = &attrs[value_start..i];
                i += 1;
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = &attrs[value_start..i];
            }
        }

        if !name.is_empty() && name.eq_ignore_ascii_case(wanted) {
            return Some(value);
        }
        if name.is_empty() && i == name_start {
            i += 1;
        }
    }
    None
}

fn is_name_boundary(lower: &str, at: usize) -> bool {
    lower
        .as_bytes()
        .get(at)
        .map_or(true, |b| !b.is_ascii_alphanumeric() && *b != b'-')
}

pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => {
                in_tag = true;
                out.push(' ');
            }
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

pub fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
