//! Bold markup inside event details.
//!
//! Assets mark emphasis with the ANSI bold sequence `ESC[1m ... ESC[0m`. Some
//! files carry the escape as the literal text `\033` instead of the byte, so
//! both spellings are recognised. The first spelling that matches anywhere in
//! the text wins; a detail with neither is a single plain span.

/// A run of detail text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub bold: bool,
}

const MARKERS: [(&str, &str); 2] = [("\x1b[1m", "\x1b[0m"), ("\\033[1m", "\\033[0m")];

pub fn parse_detail(text: &str) -> Vec<Span<'_>> {
    for (open, close) in MARKERS {
        if let Some(spans) = split_marked(text, open, close) {
            return spans;
        }
    }
    plain(text)
}

fn plain(text: &str) -> Vec<Span<'_>> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Span { text, bold: false }]
    }
}

/// `None` when no complete open/close pair occurs
fn split_marked<'a>(text: &'a str, open: &str, close: &str) -> Option<Vec<Span<'a>>> {
    let mut spans = Vec::new();
    let mut rest = text;
    let mut matched = false;

    while let Some(start) = rest.find(open) {
        let inner_start = start + open.len();
        let Some(len) = rest[inner_start..].find(close) else {
            break;
        };
        matched = true;
        if start > 0 {
            spans.push(Span {
                text: &rest[..start],
                bold: false,
            });
        }
        let inner = &rest[inner_start..inner_start + len];
        if !inner.is_empty() {
            spans.push(Span {
                text: inner,
                bold: true,
            });
        }
        rest = &rest[inner_start + len + close.len()..];
    }

    if !matched {
        return None;
    }
    if !rest.is_empty() {
        spans.push(Span {
            text: rest,
            bold: false,
        });
    }
    Some(spans)
}

/// Detail text with every marker removed
pub fn strip_markup(text: &str) -> String {
    parse_detail(text).iter().map(|span| span.text).collect()
}
