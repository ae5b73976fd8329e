//! Outline Planner
//!
//! Turns a topic and target length into an ordered outline of sized sections:
//! Introduction, a word-count-dependent number of body H2s (some with an H3
//! child), then Conclusion.

use crate::constants::outline as sizing;
use crate::types::{Level, OutlineNode};

pub const INTRODUCTION: &str = "Introduction";
pub const CONCLUSION: &str = "Conclusion";

/// Body section title patterns; `{topic}` is substituted
const BODY_TITLES: [&str; 9] = [
    "Understanding {topic}",
    "Key Benefits of {topic}",
    "Core Concepts and Terminology",
    "How to Get Started with {topic}",
    "Best Practices for {topic}",
    "Common Pitfalls and How to Avoid Them",
    "Tools and Resources for {topic}",
    "Advanced Tips and Strategies",
    "Real-World Examples and Case Studies",
];

const SUBSECTION_TITLES: [&str; 5] = [
    "Key Takeaways",
    "Action Steps",
    "Quick Checklist",
    "Pro Tips",
    "Summary Points",
];

/// Number of body H2 sections for a target word count
///
/// 5 at or below 700 words, 10 at or above 3000, floored linear interpolation between.
pub fn body_section_count(target_word_count: usize) -> usize {
    if target_word_count <= sizing::MIN_WORDS {
        return sizing::MIN_SECTIONS;
    }
    if target_word_count >= sizing::MAX_WORDS {
        return sizing::MAX_SECTIONS;
    }

    let span = (sizing::MAX_SECTIONS - sizing::MIN_SECTIONS) as f64;
    let ratio = (target_word_count - sizing::MIN_WORDS) as f64
        / (sizing::MAX_WORDS - sizing::MIN_WORDS) as f64;
    let count = (sizing::MIN_SECTIONS as f64 + ratio * span).floor() as usize;
    count.clamp(sizing::MIN_SECTIONS, sizing::MAX_SECTIONS)
}

/// Plan the outline for an article
pub fn plan_outline(topic: &str, target_word_count: usize) -> Vec<OutlineNode> {
    let num_h2 = body_section_count(target_word_count);

    let bookend =
        ((target_word_count as f64 * sizing::BOOKEND_SHARE) as usize).max(sizing::MIN_BOOKEND_WORDS);
    let body = target_word_count
        .saturating_sub(2 * bookend)
        .max(sizing::MIN_BODY_WORDS);
    let per_h2 = (body / num_h2).max(sizing::MIN_SECTION_WORDS);
    let per_h3 =
        ((per_h2 as f64 * sizing::SUBSECTION_SHARE) as usize).max(sizing::MIN_SUBSECTION_WORDS);
    let with_subsection = (num_h2 / 3).max(1);

    let mut outline = Vec::with_capacity(num_h2 + with_subsection + 2);
    outline.push(OutlineNode::h2(INTRODUCTION, bookend));

    for i in 0..num_h2 {
        let title = BODY_TITLES[i % BODY_TITLES.len()].replace("{topic}", topic);
        outline.push(OutlineNode::h2(title, per_h2));
        if i < with_subsection {
            let sub = SUBSECTION_TITLES[i % SUBSECTION_TITLES.len()];
            outline.push(OutlineNode::h3(sub, per_h3));
        }
    }

    outline.push(OutlineNode::h2(CONCLUSION, bookend));
    outline
}

/// Titles of all H2 nodes in reading order
pub fn h2_titles(outline: &[OutlineNode]) -> Vec<String> {
    outline
        .iter()
        .filter(|n| n.level == Level::H2)
        .map(|n| n.title.clone())
        .collect()
}

/// Whether a node is a body H2 (not Introduction / Conclusion)
pub fn is_body_h2(node: &OutlineNode) -> bool {
    node.level == Level::H2 && node.title != INTRODUCTION && node.title != CONCLUSION
}
