use similar::{ChangeTag, TextDiff};

use super::{ChangeEvent, ChangeSpan, PageUrl, Snapshot, SpanKind, Verdict};

/// Compares the stored snapshot against the freshly normalized one.
///
/// An absent previous snapshot always yields `Unchanged`: the first
/// observation establishes the baseline and is never reported. Byte-equal
/// snapshots are `Unchanged`. Anything else is `Changed` with a word-level
/// edit script covering both sides in full.
pub fn compare(url: &PageUrl, previous: Option<&Snapshot>, current: &Snapshot) -> Verdict {
    let previous = match previous {
        Some(p) => p,
        None => return Verdict::Unchanged,
    };
    if previous == current {
        return Verdict::Unchanged;
    }

    let diff = TextDiff::from_words(previous.as_str(), current.as_str());
    let mut spans: Vec<ChangeSpan> = Vec::new();
    for change in diff.iter_all_changes() {
        let kind = match change.tag() {
            ChangeTag::Equal => SpanKind::Unchanged,
            ChangeTag::Delete => SpanKind::Removed,
            ChangeTag::Insert => SpanKind::Added,
        };
        // merge runs of same-tagged word tokens into one span
        match spans.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(change.value()),
            _ => spans.push(ChangeSpan {
                kind,
                text: change.value().to_string(),
            }),
        }
    }

    Verdict::Changed(ChangeEvent {
        url: url.clone(),
        spans,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpanKind;

    fn url() -> PageUrl {
        PageUrl::parse("https://a.test").unwrap()
    }

    fn snap(s: &str) -> Snapshot {
        Snapshot::new(s.to_string())
    }

    #[test]
    fn absent_previous_is_always_unchanged() {
        let verdict = compare(&url(), None, &snap("<p>anything at all</p>"));
        assert_eq!(verdict, Verdict::Unchanged);
        let verdict = compare(&url(), None, &snap(""));
        assert_eq!(verdict, Verdict::Unchanged);
    }

    #[test]
    fn byte_equal_is_unchanged() {
        let verdict = compare(&url(), Some(&snap("<p>Hi</p>")), &snap("<p>Hi</p>"));
        assert!(!verdict.is_changed());
    }

    #[test]
    fn change_produces_tagged_spans() {
        let verdict = compare(&url(), Some(&snap("<p>Hi</p>")), &snap("<p>Hi there</p>"));
        let event = match verdict {
            Verdict::Changed(e) => e,
            Verdict::Unchanged => panic!("expected changed verdict"),
        };
        let added: String = event.added().collect();
        assert!(added.contains("there"));
    }

    #[test]
    fn spans_reconstruct_both_sides() {
        let prev = snap("the quick brown fox jumps over the lazy dog");
        let cur = snap("the slow brown fox strolls past the lazy dog");
        let event = match compare(&url(), Some(&prev), &cur) {
            Verdict::Changed(e) => e,
            Verdict::Unchanged => panic!("expected changed verdict"),
        };

        let mut rebuilt_current = String::new();
        let mut rebuilt_previous = String::new();
        for span in &event.spans {
            match span.kind {
                SpanKind::Unchanged => {
                    rebuilt_current.push_str(&span.text);
                    rebuilt_previous.push_str(&span.text);
                }
                SpanKind::Added => rebuilt_current.push_str(&span.text),
                SpanKind::Removed => rebuilt_previous.push_str(&span.text),
            }
        }
        assert_eq!(rebuilt_current, cur.as_str());
        assert_eq!(rebuilt_previous, prev.as_str());
    }

    #[test]
    fn summary_names_removed_and_added_words() {
        let event = match compare(&url(), Some(&snap("price: 10 eur")), &snap("price: 12 eur")) {
            Verdict::Changed(e) => e,
            Verdict::Unchanged => panic!("expected changed verdict"),
        };
        let summary = event.summary();
        assert!(summary.contains("10"));
        assert!(summary.contains("12"));
    }
}
