use scraper::{ElementRef, Html, Node};

/// Turns raw fetched HTML into a canonical comparable string.
///
/// Serializes the contents of the document root element with `<script>` and
/// `<style>` subtrees dropped, comments and doctypes dropped, and every
/// attribute stripped except `src` on `img`. Volatile markup (analytics
/// tokens, CSRF nonces, inline styles) therefore never registers as a
/// change. Pure and deterministic; malformed input degrades through the
/// HTML5 parser's error recovery instead of failing.
pub fn normalize(raw_html: &str) -> String {
    let doc = Html::parse_document(raw_html);
    let mut out = String::new();
    for child in doc.root_element().children() {
        match child.value() {
            Node::Text(t) => push_escaped_text(&mut out, &t.text),
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    write_element(&mut out, el);
                }
            }
            _ => {}
        }
    }
    out
}

fn write_element(out: &mut String, el: ElementRef<'_>) {
    let name = el.value().name();
    if name == "script" || name == "style" {
        return;
    }

    out.push('<');
    out.push_str(name);
    if name == "img" {
        if let Some(src) = el.value().attr("src") {
            out.push_str(" src=\"");
            push_escaped_attr(out, src);
            out.push('"');
        }
    }
    out.push('>');

    if is_void(name) {
        return;
    }

    for child in el.children() {
        match child.value() {
            Node::Text(t) => push_escaped_text(out, &t.text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    write_element(out, child_el);
                }
            }
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_volatile_attributes() {
        let a = normalize(r#"<html><body><p class="x" data-ts="123">Hi</p></body></html>"#);
        let b = normalize(r#"<html><body><p class="y" data-ts="999">Hi</p></body></html>"#);
        assert_eq!(a, b);
        assert!(a.contains("<p>Hi</p>"));
    }

    #[test]
    fn drops_script_and_style_entirely() {
        let out = normalize(
            "<html><head><style>p{color:red}</style></head>\
             <body><script>track()</script><p>Hi</p></body></html>",
        );
        assert!(!out.contains("script"));
        assert!(!out.contains("track()"));
        assert!(!out.contains("color:red"));
        assert!(out.contains("<p>Hi</p>"));
    }

    #[test]
    fn img_keeps_only_src() {
        let out = normalize(
            r#"<html><body><img src="/a.png" class="hero" alt="x" id="i1"></body></html>"#,
        );
        assert!(out.contains(r#"<img src="/a.png">"#));
        assert!(!out.contains("hero"));
        assert!(!out.contains("alt"));
    }

    #[test]
    fn drops_comments_and_doctype() {
        let out = normalize("<!DOCTYPE html><html><body><!-- ad slot 42 --><p>Hi</p></body></html>");
        assert!(!out.contains("ad slot"));
        assert!(!out.contains("DOCTYPE"));
    }

    #[test]
    fn deterministic_and_stable_under_renormalization() {
        let raw = "<html><body><p>Hi &amp; bye</p></body></html>";
        let once = normalize(raw);
        assert_eq!(once, normalize(raw));
        assert_eq!(once, normalize(&once));
    }

    #[test]
    fn malformed_markup_degrades_gracefully() {
        let out = normalize("<p>unclosed <b>bold");
        assert!(out.contains("unclosed"));
        assert!(out.contains("bold"));
    }
}
