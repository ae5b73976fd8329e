//! Prompt Builder System
//!
//! Standardized directive construction for every generation request the pipeline
//! issues (section drafting, paraphrase, takeaway synthesis, micro-refinement).
//!
//! ## Layout
//!
//! 1. **Role**: who the model writes as
//! 2. **Objectives**: numbered goals
//! 3. **Context**: ordered key-value facts about the request
//! 4. **Text**: free sections with an optional header
//! 5. **Restrictions**: hard rules the output must respect

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Role definition
    Role { expertise: String, task: String },
    /// Numbered objectives
    Objectives(Vec<String>),
    /// Ordered key-value pairs
    Context(Vec<(String, String)>),
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Hard rules
    Restrictions(Vec<String>),
}

/// Prompt builder for consistent directive construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a role definition section
    pub fn role(mut self, expertise: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            expertise: expertise.to_string(),
            task: task.to_string(),
        });
        self
    }

    /// Add objectives section
    pub fn objectives(mut self, objectives: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Objectives(
            objectives.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Add a context item; consecutive items share one context block
    pub fn context_item(mut self, key: &str, value: &str) -> Self {
        if let Some(PromptSection::Context(ctx)) = self.sections.last_mut() {
            ctx.push((key.to_string(), value.to_string()));
        } else {
            self.sections.push(PromptSection::Context(vec![(
                key.to_string(),
                value.to_string(),
            )]));
        }
        self
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add restrictions section
    pub fn restrictions(mut self, rules: Vec<&str>) -> Self {
        self.sections.push(PromptSection::Restrictions(
            rules.into_iter().map(String::from).collect(),
        ));
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { expertise, task } => {
                    prompt.push_str(&format!("You are {} {}.\n\n", expertise, task));
                }
                PromptSection::Objectives(objectives) => {
                    prompt.push_str("Goals:\n");
                    for (i, obj) in objectives.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, obj));
                    }
                    prompt.push('\n');
                }
                PromptSection::Context(ctx) => {
                    for (key, value) in ctx {
                        prompt.push_str(&format!("{}: {}\n", key, value));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("{}:\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Restrictions(rules) => {
                    prompt.push_str("Rules:\n");
                    for rule in rules {
                        prompt.push_str(&format!("- {}\n", rule));
                    }
                    prompt.push('\n');
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Preset directives for each generation request the pipeline makes
pub struct PromptTemplates;

impl PromptTemplates {
    /// System directive shared by every prose-producing request
    pub fn writer_system() -> String {
        PromptBuilder::new()
            .role(
                "a senior editor and SEO writer",
                "who writes natural, human-sounding long-form articles",
            )
            .restrictions(vec![
                "Write flowing prose that does not read like a template",
                "Never emit markdown headings, '#' markers, '**' emphasis or other raw markup tokens",
                "Do not repeat the section heading as the first line",
                "Integrate keywords naturally; never stuff them",
            ])
            .build()
    }

    /// User directive skeleton for drafting one section
    pub fn section_draft(heading: &str, title: &str, level: &str, words: usize) -> PromptBuilder {
        PromptBuilder::new()
            .text(&format!(
                "Write roughly {} words for the {} section \"{}\" of the article \"{}\".",
                words, level, title, heading
            ))
            .objectives(vec![
                "Open differently from a generic introduction",
                "Ground claims in the evidence below where it fits",
                "Prefer concrete explanations, examples and steps over filler",
            ])
    }

    /// Directive asking for a meaning-preserving rewrite
    pub fn paraphrase(text: &str) -> String {
        PromptBuilder::new()
            .text("Rewrite the passage below so it keeps its meaning and facts but shares as little wording and sentence structure as possible with the original. Return only the rewritten passage.")
            .section("Passage", text)
            .build()
    }

    /// Directive asking for 3-5 takeaway bullets
    pub fn takeaways(title: &str, text: &str) -> String {
        PromptBuilder::new()
            .text(&format!(
                "Summarize the section \"{}\" as 3 to 5 key takeaways. Return one takeaway per line, each starting with \"- \".",
                title
            ))
            .section("Section", text)
            .build()
    }

    /// Directive for the global whole-article rewrite
    pub fn micro_refine(payload: &str) -> String {
        PromptBuilder::new()
            .text("Refine the whole article below as one piece of writing.")
            .objectives(vec![
                "Give every section a different opener: no two sections may share their first three words, and mix questions, anecdotes, bold claims and statistics",
                "Vary sentence rhythm by mixing short punchy sentences with longer ones",
                "Vary how lists are presented: prose enumerations, numbered steps or simple comparisons",
                "Add a one-sentence micro-insight where it bridges two sections",
                "Simplify the metadata and remove redundant keywords",
                "End the final section on a warm, encouraging closing",
            ])
            .restrictions(vec![
                "Never emit markdown headings, '#' markers or '**' emphasis inside text",
                "Return JSON only: {\"metadata\": {...}, \"sections\": [{\"title\": ..., \"level\": \"h2\"|\"h3\", \"text\": ...}]}",
            ])
            .section("Article", payload)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_prompt() {
        let prompt = PromptBuilder::new()
            .role("a writer", "for developers")
            .objectives(vec!["Explain", "Inform"])
            .build();

        assert!(prompt.starts_with("You are a writer for developers."));
        assert!(prompt.contains("1. Explain"));
        assert!(prompt.contains("2. Inform"));
    }

    #[test]
    fn test_context_items_keep_order() {
        let prompt = PromptBuilder::new()
            .context_item("Audience", "beginners")
            .context_item("Style", "story hook")
            .build();

        let audience = prompt.find("Audience: beginners").unwrap();
        let style = prompt.find("Style: story hook").unwrap();
        assert!(audience < style);
    }

    #[test]
    fn test_restrictions() {
        let prompt = PromptBuilder::new()
            .restrictions(vec!["No markup", "No fluff"])
            .build();
        assert!(prompt.contains("Rules:\n- No markup\n- No fluff"));
    }

    #[test]
    fn test_templates_embed_inputs() {
        assert!(PromptTemplates::writer_system().contains("'#' markers"));
        assert!(PromptTemplates::paraphrase("Original words").ends_with("Original words"));
        assert!(PromptTemplates::takeaways("Basics", "Body").contains("\"Basics\""));
        assert!(PromptTemplates::micro_refine("{}").contains("first three words"));

        let draft = PromptTemplates::section_draft("Guide", "Intro", "H2", 180).build();
        assert!(draft.contains("roughly 180 words for the H2 section \"Intro\""));
    }
}
