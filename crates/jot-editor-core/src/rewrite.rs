//! Emoji rewrite planning.
//!
//! Decides which page text is eligible for emoji replacement and splits it
//! into the fragments the DOM layer swaps in: runs of plain text and one
//! entry per emoji cluster. Keeping this free of DOM types lets the rules be
//! tested natively.

use smol_str::SmolStr;

use crate::emoji::{EmojiClassifier, emoji_key};
use crate::platform::Capabilities;
use crate::segment::Segmenter;

/// Parent tags whose text is never rewritten.
pub const DEFAULT_SKIP_TAGS: &[&str] = &["script", "style", "textarea", "code", "pre", "svg"];

/// One piece of a rewritten text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Plain text, adjacent non-emoji clusters merged.
    Text(String),
    /// A single emoji cluster and its image key.
    Emoji { cluster: String, key: SmolStr },
}

/// What the planner needs to know about a text node's parent.
#[derive(Debug, Clone, Copy)]
pub struct ParentInfo<'a> {
    /// Lowercase tag name.
    pub tag: &'a str,
    /// Whether the parent is editable by the user.
    pub editable: bool,
}

/// Plans emoji rewrites for page text.
#[derive(Debug, Clone)]
pub struct RewritePlanner {
    segmenter: Segmenter,
    classifier: EmojiClassifier,
    skip_tags: Vec<SmolStr>,
}

impl Default for RewritePlanner {
    fn default() -> Self {
        Self::new(Segmenter::default(), EmojiClassifier::default())
    }
}

impl RewritePlanner {
    pub fn new(segmenter: Segmenter, classifier: EmojiClassifier) -> Self {
        Self {
            segmenter,
            classifier,
            skip_tags: DEFAULT_SKIP_TAGS.iter().map(|t| SmolStr::new(t)).collect(),
        }
    }

    pub fn from_capabilities(caps: &Capabilities) -> Self {
        Self::new(
            Segmenter::from_capabilities(caps),
            EmojiClassifier::from_capabilities(caps),
        )
    }

    /// Replace the list of parent tags to skip. Tags compare case-insensitively.
    pub fn with_skip_tags(mut self, tags: impl IntoIterator<Item = SmolStr>) -> Self {
        self.skip_tags = tags
            .into_iter()
            .map(|t| SmolStr::new(t.to_ascii_lowercase()))
            .collect();
        self
    }

    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    pub fn classifier(&self) -> &EmojiClassifier {
        &self.classifier
    }

    /// Whether a parent rules out rewriting its text.
    pub fn skips_parent(&self, parent: Option<ParentInfo<'_>>) -> bool {
        let Some(parent) = parent else {
            return true;
        };
        if parent.editable {
            return true;
        }
        self.skip_tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(parent.tag))
    }

    /// Whether a text node should be considered at all: non-blank, under an
    /// eligible element parent, and passing the emoji pre-check.
    pub fn is_eligible(&self, text: &str, parent: Option<ParentInfo<'_>>) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        if self.skips_parent(parent) {
            return false;
        }
        self.classifier.contains_emoji(text)
    }

    /// Split `text` into fragments, or `None` when it holds no emoji and
    /// should be left alone.
    pub fn plan(&self, text: &str) -> Option<Vec<Fragment>> {
        if !self.classifier.contains_emoji(text) {
            return None;
        }

        let mut fragments = Vec::new();
        let mut plain = String::new();
        let mut replaced = false;

        for cluster in self.segmenter.segment(text) {
            if self.classifier.is_emoji(cluster) {
                replaced = true;
                if !plain.is_empty() {
                    fragments.push(Fragment::Text(std::mem::take(&mut plain)));
                }
                fragments.push(Fragment::Emoji {
                    cluster: cluster.to_string(),
                    key: emoji_key(cluster),
                });
            } else {
                plain.push_str(cluster);
            }
        }
        if !plain.is_empty() {
            fragments.push(Fragment::Text(plain));
        }

        replaced.then_some(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::EmojiTest;
    use crate::segment::SegmentMode;

    fn para() -> Option<ParentInfo<'static>> {
        Some(ParentInfo {
            tag: "p",
            editable: false,
        })
    }

    #[test]
    fn test_plan_splits_around_emoji() {
        let plan = RewritePlanner::default().plan("Hi 😀 there").unwrap();
        assert_eq!(
            plan,
            vec![
                Fragment::Text("Hi ".into()),
                Fragment::Emoji {
                    cluster: "😀".into(),
                    key: "1f600".into()
                },
                Fragment::Text(" there".into()),
            ]
        );
    }

    #[test]
    fn test_plan_is_idempotent_on_its_output() {
        let planner = RewritePlanner::default();
        let plan = planner.plan("Hi 😀 there").unwrap();
        for fragment in plan {
            if let Fragment::Text(text) = fragment {
                assert_eq!(planner.plan(&text), None);
                assert!(!planner.is_eligible(&text, para()));
            }
        }
    }

    #[test]
    fn test_plan_leaves_plain_text_alone() {
        let planner = RewritePlanner::default();
        assert_eq!(planner.plan("no emoji here, 42 #tags *"), None);
        // Passes the pre-check but has no emoji cluster.
        assert_eq!(planner.plan("a\u{200d}b"), None);
    }

    #[test]
    fn test_plan_adjacent_emoji() {
        let plan = RewritePlanner::default().plan("👍🏽🎉").unwrap();
        let keys: Vec<_> = plan
            .iter()
            .map(|f| match f {
                Fragment::Emoji { key, .. } => key.as_str(),
                Fragment::Text(t) => t.as_str(),
            })
            .collect();
        assert_eq!(keys, vec!["1f44d-1f3fd", "1f389"]);
    }

    #[test]
    fn test_plan_code_point_fallback_splits_modifiers() {
        let planner = RewritePlanner::new(
            Segmenter::new(SegmentMode::CodePoints),
            EmojiClassifier::new(EmojiTest::RangeHeuristic),
        );
        let plan = planner.plan("👍🏽").unwrap();
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_eligibility_rules() {
        let planner = RewritePlanner::default();
        assert!(planner.is_eligible("Hi 😀", para()));
        assert!(!planner.is_eligible("   ", para()));
        assert!(!planner.is_eligible("Hi", para()));
        assert!(!planner.is_eligible("Hi 😀", None));
        for tag in ["script", "STYLE", "textarea", "code", "pre", "svg"] {
            let parent = Some(ParentInfo {
                tag,
                editable: false,
            });
            assert!(!planner.is_eligible("😀", parent), "{tag}");
        }
        let editable = Some(ParentInfo {
            tag: "div",
            editable: true,
        });
        assert!(!planner.is_eligible("😀", editable));
    }

    #[test]
    fn test_custom_skip_tags() {
        let planner = RewritePlanner::default().with_skip_tags(["KBD".into()]);
        let kbd = Some(ParentInfo {
            tag: "kbd",
            editable: false,
        });
        let code = Some(ParentInfo {
            tag: "code",
            editable: false,
        });
        assert!(!planner.is_eligible("😀", kbd));
        assert!(planner.is_eligible("😀", code));
    }
}
