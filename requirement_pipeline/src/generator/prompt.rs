//! Builds the Generator's prompt text, including a per-language context
//! block.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial prompt builder with per-language context table.

/// Returns a short block of language-specific generation guidance. Falls
/// back to a generic idiom-agnostic instruction for languages without a
/// dedicated entry.
fn language_context(language: requirement_store::domain::language::Language) -> &'static str {
    match language {
        requirement_store::domain::language::Language::TypeScript => {
            "Use modern TypeScript with explicit types, ES modules, and async/await. Prefer composition over inheritance."
        }
        requirement_store::domain::language::Language::JavaScript => {
            "Use modern JavaScript with ES modules and async/await. Avoid var; prefer const and let."
        }
        requirement_store::domain::language::Language::Python => {
            "Use Python 3 with type hints and PEP 8 naming. Prefer dataclasses or pydantic models for structured data."
        }
        requirement_store::domain::language::Language::Java => {
            "Use modern Java with records where appropriate, and standard Maven-style package layout."
        }
        _ => "Follow the idioms and conventions most common in this language's ecosystem.",
    }
}

/// Builds the code-generation prompt for the given analysis and language.
pub fn build_generation_prompt(
    analysis: &requirement_store::domain::analysis::Analysis,
    requirement_text: &str,
    language: requirement_store::domain::language::Language,
    additional_context: std::option::Option<&str>,
) -> std::string::String {
    let mut prompt = std::string::String::new();

    prompt.push_str(&std::format!("You are generating production code in {}.\n\n", language.as_str()));
    prompt.push_str(language_context(language));
    prompt.push_str("\n\n");

    prompt.push_str("# Requirement\n\n");
    prompt.push_str(requirement_text);
    prompt.push_str("\n\n");

    prompt.push_str("# Analysis\n\n");
    prompt.push_str(&std::format!("Title: {}\n", analysis.title));
    prompt.push_str(&std::format!("Functionality: {}\n", analysis.functionality));
    if !analysis.components.is_empty() {
        prompt.push_str(&std::format!("Components: {}\n", analysis.components.join(", ")));
    }
    if !analysis.inputs_outputs.is_empty() {
        prompt.push_str(&std::format!("Inputs/Outputs: {}\n", analysis.inputs_outputs));
    }
    if !analysis.dependencies.is_empty() {
        prompt.push_str(&std::format!("Dependencies/Constraints: {}\n", analysis.dependencies));
    }
    if !analysis.file_structure.is_empty() {
        prompt.push_str(&std::format!("Suggested file structure: {}\n", analysis.file_structure.join(", ")));
    }
    if let std::option::Option::Some(strategy) = &analysis.implementation_strategy {
        prompt.push_str(&std::format!("Implementation strategy: {}\n", strategy));
    }
    prompt.push_str("\n");

    if let std::option::Option::Some(context) = additional_context {
        if !context.trim().is_empty() {
            prompt.push_str("# Additional Context\n\n");
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }
    }

    prompt.push_str("Generate the complete implementation. Respond with a single JSON object mapping each relative file path to its full file content, e.g. {\"src/index.ts\": \"...\"}. Include every file needed to satisfy the analysis. Respond with only the JSON object, no surrounding prose.\n");

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_language_context_and_analysis_title() {
        let analysis = requirement_store::domain::analysis::Analysis {
            title: "Todo API".to_string(),
            ..requirement_store::domain::analysis::Analysis::default()
        };
        let prompt = build_generation_prompt(&analysis, "Build a todo API", requirement_store::domain::language::Language::Python, std::option::Option::None);
        assert!(prompt.contains("Todo API"));
        assert!(prompt.contains("type hints"));
    }

    #[test]
    fn test_prompt_generic_fallback_for_uncontextualized_language() {
        let analysis = requirement_store::domain::analysis::Analysis::default();
        let prompt = build_generation_prompt(&analysis, "Build a service", requirement_store::domain::language::Language::Go, std::option::Option::None);
        assert!(prompt.contains("idioms and conventions"));
    }
}
