//! Global Constants
//!
//! Centralized constants for sizing heuristics and service tuning.
//! All magic numbers should be defined here with documentation.

/// Outline planning constants
pub mod outline {
    /// Body H2 count at or below `MIN_WORDS`
    pub const MIN_SECTIONS: usize = 5;

    /// Body H2 count at or above `MAX_WORDS`
    pub const MAX_SECTIONS: usize = 10;

    /// Word count at which the section count starts to grow
    pub const MIN_WORDS: usize = 700;

    /// Word count at which the section count stops growing
    pub const MAX_WORDS: usize = 3000;

    /// Share of the target reserved for each of Introduction and Conclusion
    pub const BOOKEND_SHARE: f64 = 0.12;

    /// Floor for Introduction / Conclusion budgets
    pub const MIN_BOOKEND_WORDS: usize = 120;

    /// Floor for the whole body budget
    pub const MIN_BODY_WORDS: usize = 200;

    /// Floor for a single body H2 budget
    pub const MIN_SECTION_WORDS: usize = 120;

    /// H3 budget as a share of its parent's budget
    pub const SUBSECTION_SHARE: f64 = 0.35;

    /// Floor for an H3 budget
    pub const MIN_SUBSECTION_WORDS: usize = 80;
}

/// Evidence curation constants
pub mod evidence {
    /// Maximum sources considered and items retained
    pub const MAX_ITEMS: usize = 12;
}

/// Generation sampling constants
pub mod generation {
    /// Temperature used for section drafting
    pub const SECTION_TEMPERATURE: f32 = 0.7;

    /// Top-p used for section drafting
    pub const SECTION_TOP_P: f32 = 0.9;

    /// Temperature for paraphrase repair
    pub const PARAPHRASE_TEMPERATURE: f32 = 0.7;

    /// Temperature for takeaway synthesis
    pub const TAKEAWAY_TEMPERATURE: f32 = 0.3;

    /// Temperature for the whole-article rewrite
    pub const MICRO_REFINE_TEMPERATURE: f32 = 0.6;

    /// Top-p shared by the editorial requests
    pub const EDITORIAL_TOP_P: f32 = 0.9;
}

/// Deduplication constants
pub mod dedupe {
    /// Cosine similarity at or above which two sections collide
    pub const DEFAULT_THRESHOLD: f32 = 0.9;
}

/// Editorial refinement constants
pub mod refine {
    /// Maximum bullets in a synthesized takeaway list
    pub const MAX_TAKEAWAYS: usize = 5;

    /// Title of synthesized takeaway subsections
    pub const TAKEAWAYS_TITLE: &str = "Key Takeaways";
}

/// SEO metadata constants
pub mod seo {
    /// Maximum title tag length (characters)
    pub const TITLE_MAX_CHARS: usize = 60;

    /// Maximum meta description length (characters)
    pub const DESCRIPTION_MAX_CHARS: usize = 160;

    /// Maximum research-derived primary keywords
    pub const MAX_PRIMARY_KEYWORDS: usize = 5;

    /// Maximum secondary keywords
    pub const MAX_SECONDARY_KEYWORDS: usize = 8;
}

/// Research assembly constants
pub mod research {
    /// Results requested in basic mode
    pub const BASIC_MAX_RESULTS: usize = 5;

    /// Results requested in deep mode
    pub const DEEP_MAX_RESULTS: usize = 15;

    /// Sources mined for insights and keywords
    pub const MINED_SOURCES: usize = 8;

    /// Maximum insights kept in a bundle
    pub const MAX_INSIGHTS: usize = 20;

    /// Maximum keywords kept in a bundle
    pub const MAX_KEYWORDS: usize = 30;

    /// Accepted keyword length range (characters)
    pub const KEYWORD_MIN_CHARS: usize = 5;
    pub const KEYWORD_MAX_CHARS: usize = 30;
}
