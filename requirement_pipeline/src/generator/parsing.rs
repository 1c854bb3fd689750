//! Tolerant parsing cascade turning a raw LLM response into a generated
//! code artifact: a map of relative file path to file content.
//!
//! Extends the Analyzer's strict-JSON / largest-JSON-block cascade with two
//! Generator-specific fallbacks: fenced code blocks whose first line is a
//! file path, and Markdown filename headers paired in order against a
//! sequence of fenced code blocks.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial generator parsing cascade.

pub type Artifact = std::collections::HashMap<std::string::String, std::string::String>;

/// Parses the Generator's raw LLM response into a path-to-content map,
/// trying each tier in turn and returning the first one that yields a
/// non-empty artifact.
pub fn parse_generation_response(raw: &str) -> Artifact {
    if let std::option::Option::Some(artifact) = parse_strict_object(raw) {
        if !artifact.is_empty() {
            return artifact;
        }
    }
    if let std::option::Option::Some(artifact) = parse_largest_json_block(raw) {
        if !artifact.is_empty() {
            return artifact;
        }
    }
    let path_headered = parse_path_headered_fences(raw);
    if !path_headered.is_empty() {
        return path_headered;
    }
    parse_markdown_header_paired_fences(raw)
}

fn parse_strict_object(raw: &str) -> std::option::Option<Artifact> {
    serde_json::from_str::<Artifact>(raw.trim()).ok()
}

fn parse_largest_json_block(raw: &str) -> std::option::Option<Artifact> {
    let candidate = extract_fenced_json(raw).or_else(|| extract_brace_block(raw))?;

    if let std::result::Result::Ok(artifact) = serde_json::from_str::<Artifact>(&candidate) {
        return std::option::Option::Some(artifact);
    }

    let value: serde_json::Value = serde_json::from_str(&candidate).ok()?;
    let object = value.as_object()?;
    let mut artifact = Artifact::new();
    for (path, content) in object.iter() {
        let rendered = match content {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        artifact.insert(path.replace('\\', "/"), rendered);
    }
    std::option::Option::Some(artifact)
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

/// Matches a line that plausibly names a file: no whitespace, contains a
/// `.` followed by a short alphabetic extension.
fn looks_like_path(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.contains(' ') || trimmed.contains('`') {
        return false;
    }
    match trimmed.rsplit_once('.') {
        std::option::Option::Some((_, ext)) => !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()),
        std::option::Option::None => false,
    }
}

/// Fenced code blocks whose first content line is itself a file path, e.g.
/// ` ```ts\nsrc/index.ts\nexport const x = 1;\n``` `.
fn parse_path_headered_fences(raw: &str) -> Artifact {
    let fence_re = regex::Regex::new(r"(?s)```[a-zA-Z0-9_+-]*\n(.*?)```").expect("static fence pattern is valid");
    let mut artifact = Artifact::new();
    for capture in fence_re.captures_iter(raw) {
        let block = &capture[1];
        if let std::option::Option::Some((first_line, rest)) = block.split_once('\n') {
            if looks_like_path(first_line) {
                artifact.insert(first_line.trim().replace('\\', "/"), rest.trim_start_matches('\n').to_string());
            }
        }
    }
    artifact
}

/// Markdown filename headers (`#` through `###`) paired in document order
/// against the sequence of fenced code blocks that follow them.
fn parse_markdown_header_paired_fences(raw: &str) -> Artifact {
    let header_re = regex::Regex::new(r"(?m)^#{1,3}\s+(\S+)\s*$").expect("static header pattern is valid");
    let fence_re = regex::Regex::new(r"(?s)```[a-zA-Z0-9_+-]*\n(.*?)```").expect("static fence pattern is valid");

    let headers: std::vec::Vec<(usize, std::string::String)> = header_re
        .captures_iter(raw)
        .filter(|c| looks_like_path(&c[1]))
        .map(|c| (c.get(0).expect("whole match exists").start(), c[1].trim().replace('\\', "/")))
        .collect();
    let fences: std::vec::Vec<(usize, std::string::String)> = fence_re
        .captures_iter(raw)
        .map(|c| (c.get(0).expect("whole match exists").start(), c[1].trim().to_string()))
        .collect();

    let mut artifact = Artifact::new();
    for (header_pos, path) in headers.iter() {
        if let std::option::Option::Some((_, content)) = fences.iter().find(|(fence_pos, _)| fence_pos > header_pos) {
            artifact.insert(path.clone(), content.clone());
        }
    }
    artifact
}
