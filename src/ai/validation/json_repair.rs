//! JSON extraction for LLM responses
//!
//! Handles the cosmetic issues models add around otherwise valid JSON:
//! - Markdown code fence wrapping (```json ... ```)
//! - Byte order mark
//! - Trailing commas
//! - JSON embedded in explanatory text
//!
//! Truncated output is never completed: a response cut off mid-article must fail
//! to parse rather than come back as a shorter article.

use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{Result, WeaveError};

/// Extract and parse JSON from an LLM response
pub fn extract_json_from_response(content: &str) -> Result<Value> {
    JsonRepairer::new().parse_or_repair(content).map(|(value, _)| value)
}

/// JSON repair strategies
#[derive(Debug, Default)]
pub struct JsonRepairer;

impl JsonRepairer {
    pub fn new() -> Self {
        Self
    }

    /// Parse JSON, attempting light repair if the initial parse fails
    ///
    /// Returns (Value, was_repaired)
    pub fn parse_or_repair(&self, raw: &str) -> Result<(Value, bool)> {
        let cleaned = self.preprocess(raw);

        let first_error = match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => return Ok((value, false)),
            Err(e) => e,
        };

        debug!("Initial JSON parse failed, attempting repair");

        let without_commas = self.fix_trailing_commas(&cleaned);
        if let Ok(value) = serde_json::from_str::<Value>(&without_commas) {
            warn!("JSON repaired by removing trailing commas");
            return Ok((value, true));
        }

        if let Some(extracted) = self.extract_json_from_mixed(&without_commas)
            && let Ok(value) = serde_json::from_str::<Value>(&extracted)
        {
            warn!("JSON extracted from mixed content");
            return Ok((value, true));
        }

        Err(WeaveError::Json(first_error))
    }

    /// Preprocess raw input
    fn preprocess(&self, raw: &str) -> String {
        let s = raw.trim().trim_start_matches('\u{feff}');
        self.strip_code_fences(s).trim().to_string()
    }

    /// Strip markdown code fences
    fn strip_code_fences(&self, s: &str) -> String {
        let mut result = s;

        if result.starts_with("```")
            && let Some(first_newline) = result.find('\n')
        {
            result = &result[first_newline + 1..];
        }

        if let Some(stripped) = result.trim_end().strip_suffix("```") {
            result = stripped.trim_end();
        }

        result.to_string()
    }

    /// Remove commas directly before `]` or `}` outside of strings
    fn fix_trailing_commas(&self, s: &str) -> String {
        let chars: Vec<char> = s.chars().collect();
        let mut result = String::with_capacity(s.len());
        let mut in_string = false;
        let mut escape = false;

        for (i, &ch) in chars.iter().enumerate() {
            if in_string {
                result.push(ch);
                if escape {
                    escape = false;
                } else if ch == '\\' {
                    escape = true;
                } else if ch == '"' {
                    in_string = false;
                }
                continue;
            }

            if ch == '"' {
                in_string = true;
            } else if ch == ',' {
                let next = chars[i + 1..].iter().find(|c| !c.is_whitespace());
                if matches!(next, Some(']') | Some('}')) {
                    continue;
                }
            }
            result.push(ch);
        }

        result
    }

    /// Take the outermost `{ ... }` span out of surrounding prose
    fn extract_json_from_mixed(&self, s: &str) -> Option<String> {
        let start = s.find('{')?;
        let end = s.rfind('}')?;
        (end > start).then(|| s[start..=end].to_string())
    }
}
