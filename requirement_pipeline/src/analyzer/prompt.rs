//! Builds the Analyzer's prompt text.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial prompt builder.

/// Builds the analysis prompt for the given requirement text and target
/// language, optionally folding in caller-supplied additional context and
/// template content.
pub fn build_analysis_prompt(
    requirement_text: &str,
    language: requirement_store::domain::language::Language,
    additional_context: std::option::Option<&str>,
    template_content: std::option::Option<&str>,
) -> std::string::String {
    let mut prompt = std::string::String::new();

    prompt.push_str(&std::format!(
        "You are analyzing a software requirement to be implemented in {}.\n\n",
        language.as_str()
    ));
    prompt.push_str("# Requirement\n\n");
    prompt.push_str(requirement_text);
    prompt.push_str("\n\n");

    if let std::option::Option::Some(context) = additional_context {
        if !context.trim().is_empty() {
            prompt.push_str("# Additional Context\n\n");
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }
    }

    if let std::option::Option::Some(template) = template_content {
        if !template.trim().is_empty() {
            prompt.push_str("# Reference Template\n\n");
            prompt.push_str(template);
            prompt.push_str("\n\n");
        }
    }

    prompt.push_str("Decompose this requirement into a structured analysis. Respond with a single JSON object with exactly these keys:\n");
    prompt.push_str("- \"title\": a short descriptive title\n");
    prompt.push_str("- \"functionality\": a paragraph describing the main functionality\n");
    prompt.push_str("- \"components\": an ordered array of the components or modules needed\n");
    prompt.push_str("- \"inputsOutputs\": a paragraph describing inputs and outputs\n");
    prompt.push_str("- \"dependencies\": a paragraph describing dependencies or constraints, noting whether each is technical, business, or security in nature\n");
    prompt.push_str("- \"fileStructure\": an ordered array of suggested relative file paths\n");
    prompt.push_str("- \"implementationStrategy\": a paragraph describing the implementation approach\n\n");
    prompt.push_str("Respond with only the JSON object, no surrounding prose.\n");

    prompt
}
