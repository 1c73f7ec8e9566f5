use serde::{Deserialize, Serialize};

use super::PageUrl;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    Added,
    Removed,
    Unchanged,
}

/// One run of words the differ tagged the same way.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSpan {
    pub kind: SpanKind,
    pub text: String,
}

/// Word-level edit script between two snapshots of the same page.
///
/// The spans cover both sides in full: unchanged + added spans concatenate
/// to the current snapshot, unchanged + removed spans to the previous one.
/// Ephemeral; consumed by the notifier and the log renderer, never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub url: PageUrl,
    pub spans: Vec<ChangeSpan>,
}

impl ChangeEvent {
    pub fn added(&self) -> impl Iterator<Item = &str> {
        self.spans_of(SpanKind::Added)
    }

    pub fn removed(&self) -> impl Iterator<Item = &str> {
        self.spans_of(SpanKind::Removed)
    }

    pub fn unchanged(&self) -> impl Iterator<Item = &str> {
        self.spans_of(SpanKind::Unchanged)
    }

    fn spans_of(&self, kind: SpanKind) -> impl Iterator<Item = &str> {
        self.spans
            .iter()
            .filter(move |s| s.kind == kind)
            .map(|s| s.text.as_str())
    }

    /// Compact one-line rendering of only the changed spans, for logs:
    /// `-"old words" +"new words"`.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        for span in &self.spans {
            match span.kind {
                SpanKind::Removed => parts.push(format!("-{:?}", span.text)),
                SpanKind::Added => parts.push(format!("+{:?}", span.text)),
                SpanKind::Unchanged => {}
            }
        }
        parts.join(" ")
    }

    pub fn notification_text(&self) -> String {
        format!("Detected an update on monitored page: {}", self.url)
    }
}

/// Outcome of comparing the previous and current snapshot of one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Unchanged,
    Changed(ChangeEvent),
}

impl Verdict {
    pub fn is_changed(&self) -> bool {
        matches!(self, Verdict::Changed(_))
    }
}
