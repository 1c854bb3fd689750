//! Tolerant parsing cascade turning a raw LLM response into an `Analysis`.
//!
//! Three tiers, each falling through to the next on failure: strict JSON
//! deserialization, then the largest plausible JSON object pulled from the
//! surrounding text, then heuristic section extraction by labeled headings.
//! The cascade never fails outright; the heuristic tier returns empty
//! strings/lists for anything it cannot find, matching the Analysis
//! invariant that every field is present.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial three-tier parsing cascade.

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisExtraction {
    #[serde(default)]
    title: std::string::String,
    #[serde(default)]
    functionality: std::string::String,
    #[serde(default)]
    components: std::vec::Vec<std::string::String>,
    #[serde(default)]
    inputs_outputs: std::string::String,
    #[serde(default)]
    dependencies: std::string::String,
    #[serde(default)]
    file_structure: std::vec::Vec<std::string::String>,
    #[serde(default)]
    implementation_strategy: std::option::Option<std::string::String>,
}

impl std::convert::From<AnalysisExtraction> for requirement_store::domain::analysis::Analysis {
    fn from(extraction: AnalysisExtraction) -> Self {
        requirement_store::domain::analysis::Analysis {
            title: extraction.title,
            functionality: extraction.functionality,
            components: extraction.components,
            inputs_outputs: extraction.inputs_outputs,
            dependencies: extraction.dependencies,
            file_structure: extraction.file_structure.into_iter().map(|path| path.replace('\\', "/")).collect(),
            implementation_strategy: extraction.implementation_strategy,
        }
    }
}

/// Parses the Analyzer's raw LLM response into an `Analysis`, trying strict
/// JSON, then a largest-JSON-block extraction, then heuristic section
/// extraction, in that order.
pub fn parse_analysis_response(raw: &str) -> requirement_store::domain::analysis::Analysis {
    if let std::option::Option::Some(analysis) = parse_strict(raw) {
        return analysis;
    }
    if let std::option::Option::Some(analysis) = parse_largest_json_block(raw) {
        return analysis;
    }
    parse_heuristic_sections(raw)
}

fn parse_strict(raw: &str) -> std::option::Option<requirement_store::domain::analysis::Analysis> {
    serde_json::from_str::<AnalysisExtraction>(raw.trim()).ok().map(std::convert::Into::into)
}

fn parse_largest_json_block(raw: &str) -> std::option::Option<requirement_store::domain::analysis::Analysis> {
    let candidate = extract_fenced_json(raw).or_else(|| extract_brace_block(raw))?;

    if let std::result::Result::Ok(extraction) = serde_json::from_str::<AnalysisExtraction>(&candidate) {
        return std::option::Option::Some(extraction.into());
    }

    let value: serde_json::Value = serde_json::from_str(&candidate).ok()?;
    let object = value.as_object()?;
    std::option::Option::Some(requirement_store::domain::analysis::Analysis {
        title: extract_string_alias(object, &["title", "name"]).unwrap_or_default(),
        functionality: extract_string_alias(object, &["functionality", "description", "summary"]).unwrap_or_default(),
        components: extract_string_array_alias(object, &["components", "modules"]),
        inputs_outputs: extract_string_alias(object, &["inputsOutputs", "inputs_outputs", "io"]).unwrap_or_default(),
        dependencies: extract_string_alias(object, &["dependencies", "constraints"]).unwrap_or_default(),
        file_structure: extract_string_array_alias(object, &["fileStructure", "file_structure", "files"])
            .into_iter()
            .map(|path| path.replace('\\', "/"))
            .collect(),
        implementation_strategy: extract_string_alias(object, &["implementationStrategy", "implementation_strategy", "strategy"]),
    })
}

fn extract_fenced_json(raw: &str) -> std::option::Option<std::string::String> {
    let start_idx = raw.find("```json")?;
    let json_start = start_idx + 7;
    let relative_end = raw[json_start..].find("```")?;
    std::option::Option::Some(raw[json_start..json_start + relative_end].trim().to_string())
}

fn extract_brace_block(raw: &str) -> std::option::Option<std::string::String> {
    let start_idx = raw.find('{')?;
    let end_idx = raw.rfind('}')?;
    if end_idx < start_idx {
        return std::option::Option::None;
    }
    std::option::Option::Some(raw[start_idx..=end_idx].to_string())
}

fn extract_string_alias(object: &serde_json::Map<std::string::String, serde_json::Value>, keys: &[&str]) -> std::option::Option<std::string::String> {
    for key in keys {
        if let std::option::Option::Some(serde_json::Value::String(s)) = object.get(*key) {
            if !s.trim().is_empty() {
                return std::option::Option::Some(s.trim().to_string());
            }
        }
    }
    std::option::Option::None
}

fn extract_string_array_alias(object: &serde_json::Map<std::string::String, serde_json::Value>, keys: &[&str]) -> std::vec::Vec<std::string::String> {
    for key in keys {
        if let std::option::Option::Some(serde_json::Value::Array(items)) = object.get(*key) {
            let out: std::vec::Vec<std::string::String> = items
                .iter()
                .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
                .filter(|s| !s.is_empty())
                .collect();
            if !out.is_empty() {
                return out;
            }
        }
    }
    std::vec::Vec::new()
}

const SECTION_LABELS: [(&str, &str); 7] = [
    ("title", r"(?im)^\s*#{0,3}\s*title\s*:?\s*"),
    ("functionality", r"(?im)^\s*#{0,3}\s*(?:main\s+)?functionality\s*:?\s*"),
    ("components", r"(?im)^\s*#{0,3}\s*(?:components|modules)\s*:?\s*"),
    ("inputs_outputs", r"(?im)^\s*#{0,3}\s*inputs?\s*(?:and|/|&)\s*outputs?\s*:?\s*"),
    ("dependencies", r"(?im)^\s*#{0,3}\s*dependencies(?:\s+or\s+constraints)?\s*:?\s*"),
    ("file_structure", r"(?im)^\s*#{0,3}\s*file\s+structure\s*:?\s*"),
    ("implementation_strategy", r"(?im)^\s*#{0,3}\s*implementation\s+strategy\s*:?\s*"),
];

fn extract_labeled_sections(raw: &str) -> std::collections::HashMap<&'static str, std::string::String> {
    struct Hit {
        field: &'static str,
        content_start: usize,
    }

    let mut hits: std::vec::Vec<Hit> = std::vec::Vec::new();
    for (field, pattern) in SECTION_LABELS.iter() {
        let regex = regex::Regex::new(pattern).expect("static section label pattern is valid");
        if let std::option::Option::Some(m) = regex.find(raw) {
            hits.push(Hit { field, content_start: m.end() });
        }
    }
    hits.sort_by_key(|h| h.content_start);

    let mut sections: std::collections::HashMap<&'static str, std::string::String> = std::collections::HashMap::new();
    for (i, hit) in hits.iter().enumerate() {
        let content_end = hits.get(i + 1).map(|next| {
            // next.content_start points past the next label's own match; walk
            // back to the start of that label's line so it is excluded here.
            raw[..next.content_start].rfind('\n').map(|p| p + 1).unwrap_or(0)
        }).unwrap_or(raw.len());
        let content_end = std::cmp::max(content_end, hit.content_start);
        let content = raw[hit.content_start..content_end].trim().to_string();
        sections.insert(hit.field, content);
    }
    sections
}

/// Splits a section's free text into list items by bullet marker
/// (`-`, `*`, `•`) or numbered-list marker (`\n\s*\d+\.\s+`).
fn split_list_items(text: &str) -> std::vec::Vec<std::string::String> {
    let bullet_re = regex::Regex::new(r"(?m)^\s*[-*\u{2022}]\s+").expect("static bullet pattern is valid");
    let bullet_items: std::vec::Vec<std::string::String> = bullet_re
        .split(text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !bullet_items.is_empty() {
        return bullet_items;
    }

    let numbered_re = regex::Regex::new(r"(?m)^\s*\d+\.\s+").expect("static numbered-list pattern is valid");
    let numbered_items: std::vec::Vec<std::string::String> = numbered_re
        .split(text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !numbered_items.is_empty() {
        return numbered_items;
    }

    if text.trim().is_empty() {
        std::vec::Vec::new()
    } else {
        std::vec![text.trim().to_string()]
    }
}

fn parse_heuristic_sections(raw: &str) -> requirement_store::domain::analysis::Analysis {
    let sections = extract_labeled_sections(raw);
    requirement_store::domain::analysis::Analysis {
        title: sections.get("title").cloned().unwrap_or_default(),
        functionality: sections.get("functionality").cloned().unwrap_or_default(),
        components: sections.get("components").map(|s| split_list_items(s)).unwrap_or_default(),
        inputs_outputs: sections.get("inputs_outputs").cloned().unwrap_or_default(),
        dependencies: sections.get("dependencies").cloned().unwrap_or_default(),
        file_structure: sections
            .get("file_structure")
            .map(|s| split_list_items(s))
            .unwrap_or_default()
            .into_iter()
            .map(|path| path.replace('\\', "/"))
            .collect(),
        implementation_strategy: sections.get("implementation_strategy").filter(|s| !s.is_empty()).cloned(),
    }
}

/// Classifies each dependency/constraint line by type, preserving
/// `security` as distinct from `business` per the normalization contract.
pub fn tag_constraint_lines(dependencies: &str) -> std::vec::Vec<(requirement_store::domain::analysis::ConstraintType, std::string::String)> {
    split_list_items(dependencies)
        .into_iter()
        .map(|line| (requirement_store::domain::analysis::ConstraintType::normalize(&line), line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strict_json() {
        let raw = r#"{"title":"Auth Module","functionality":"Handles login","components":["AuthService","AuthController"],"inputsOutputs":"username/password in, JWT out","dependencies":"security: passwords must be hashed","fileStructure":["src/auth.service.ts","src/auth.controller.ts"],"implementationStrategy":"Use bcrypt"}"#;
        let analysis = parse_analysis_response(raw);
        assert_eq!(analysis.title, "Auth Module");
        assert_eq!(analysis.components.len(), 2);
        assert_eq!(analysis.file_structure, std::vec!["src/auth.service.ts".to_string(), "src/auth.controller.ts".to_string()]);
        assert_eq!(analysis.implementation_strategy.as_deref(), Some("Use bcrypt"));
    }

    #[test]
    fn test_parse_fenced_json_block() {
        let raw = "Here is the analysis:\n```json\n{\"title\":\"Todo App\",\"functionality\":\"manage todos\",\"components\":[],\"inputsOutputs\":\"\",\"dependencies\":\"\",\"fileStructure\":[]}\n```\nLet me know if you need changes.";
        let analysis = parse_analysis_response(raw);
        assert_eq!(analysis.title, "Todo App");
    }

    #[test]
    fn test_parse_loose_value_with_aliases() {
        let raw = r#"{"name":"Todo App","description":"manage todos","modules":["TodoService"],"files":["src/todo.ts"]}"#;
        let analysis = parse_analysis_response(raw);
        assert_eq!(analysis.title, "Todo App");
        assert_eq!(analysis.functionality, "manage todos");
        assert_eq!(analysis.components, std::vec!["TodoService".to_string()]);
        assert_eq!(analysis.file_structure, std::vec!["src/todo.ts".to_string()]);
    }

    #[test]
    fn test_parse_heuristic_sections_from_plain_text() {
        let raw = "Title: Inventory Tracker\n\nMain Functionality\nTracks stock levels across warehouses.\n\nComponents\n- StockService\n- WarehouseController\n\nFile Structure\n- src/stock.service.ts\n- src/warehouse.controller.ts\n\nImplementation Strategy\nUse an event-sourced ledger.";
        let analysis = parse_analysis_response(raw);
        assert_eq!(analysis.title, "Inventory Tracker");
        assert!(analysis.functionality.contains("Tracks stock levels"));
        assert_eq!(analysis.components, std::vec!["StockService".to_string(), "WarehouseController".to_string()]);
        assert_eq!(analysis.file_structure, std::vec!["src/stock.service.ts".to_string(), "src/warehouse.controller.ts".to_string()]);
        assert_eq!(analysis.implementation_strategy.as_deref(), Some("Use an event-sourced ledger."));
    }

    #[test]
    fn test_parse_unparseable_text_yields_empty_analysis() {
        let analysis = parse_analysis_response("I could not understand the request.");
        assert_eq!(analysis.title, "");
        assert!(analysis.components.is_empty());
        assert!(analysis.file_structure.is_empty());
    }

    #[test]
    fn test_tag_constraint_lines_preserves_security_distinct_from_business() {
        let tags = tag_constraint_lines("- All inputs must satisfy security review\n- Must stay within the quarterly business budget");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].0, requirement_store::domain::analysis::ConstraintType::Security);
        assert_eq!(tags[1].0, requirement_store::domain::analysis::ConstraintType::Business);
    }
}
