//! Malformation reporting.
//!
//! The filter absorbs structural errors instead of failing; each recovery is
//! surfaced here. Diagnostics are per-instance (a counter plus an optional
//! injected callback), so concurrent filters never share mutable state.

/// Kinds of recoverable markup anomalies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformationKind {
    /// An end tag arrived while its tag was not awaited; it was parked as a
    /// recovery frame.
    UnmatchedEndTag,
    /// A parked recovery frame was discarded before its start tag
    /// reappeared (either mid-stream or left over at end of input).
    AbandonedRecovery,
}

/// One recoverable anomaly observed while filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Malformation {
    /// What went wrong.
    pub kind: MalformationKind,
    /// Tag name involved.
    pub tag: String,
}

/// Callback receiving each [`Malformation`] as it is recorded.
pub type MalformationHook = Box<dyn FnMut(&Malformation)>;

pub(crate) struct Diagnostics {
    count: usize,
    hook: Option<MalformationHook>,
}

impl Diagnostics {
    pub(crate) fn new(hook: Option<MalformationHook>) -> Self {
        Self { count: 0, hook }
    }

    pub(crate) fn record(&mut self, kind: MalformationKind, tag: &str) {
        match kind {
            MalformationKind::UnmatchedEndTag => {
                log::warn!("unmatched </{tag}>, awaiting a matching start tag");
            }
            MalformationKind::AbandonedRecovery => {
                log::warn!("no start tag ever matched stray </{tag}>");
            }
        }
        self.count += 1;
        if let Some(hook) = self.hook.as_mut() {
            let event = Malformation {
                kind,
                tag: tag.to_string(),
            };
            hook(&event);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn counts_without_hook() {
        let mut diagnostics = Diagnostics::new(None);
        diagnostics.record(MalformationKind::UnmatchedEndTag, "p");
        diagnostics.record(MalformationKind::AbandonedRecovery, "p");
        assert_eq!(diagnostics.count(), 2);
    }

    #[test]
    fn hook_sees_every_event() {
        let seen: Rc<RefCell<Vec<Malformation>>> = Rc::default();
        let sink = Rc::clone(&seen);
        let mut diagnostics = Diagnostics::new(Some(Box::new(move |event| {
            sink.borrow_mut().push(event.clone());
        })));
        diagnostics.record(MalformationKind::UnmatchedEndTag, "p");
        assert_eq!(
            *seen.borrow(),
            vec![Malformation {
                kind: MalformationKind::UnmatchedEndTag,
                tag: "p".to_string()
            }]
        );
    }
}
