//! Defines the Language enum for Generator and Quality Checker targeting.
//!
//! Revision History
//! - 2026-02-02T00:00:00Z @AI: Initial Language enum with default output path and extension mapping.

/// Target programming language for a requirement task.
#[derive(Debug, Clone, Copy, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
    Java,
    CSharp,
    Go,
    Ruby,
    Php,
}

impl Language {
    /// Per-language default output path used when the Analysis supplied no
    /// file-structure entries.
    pub fn default_output_path(&self) -> &'static str {
        match self {
            Language::TypeScript | Language::JavaScript | Language::Python | Language::CSharp | Language::Php => "src",
            Language::Java => "src/main/java",
            Language::Go => "pkg",
            Language::Ruby => "lib",
        }
    }

    /// File extensions (without the leading dot) recognized as code files
    /// for this language, used by the Quality Checker's syntax validity pass.
    pub fn code_extensions(&self) -> &'static [&'static str] {
        match self {
            Language::TypeScript => &["ts", "tsx"],
            Language::JavaScript => &["js", "jsx"],
            Language::Python => &["py"],
            Language::Java => &["java"],
            Language::CSharp => &["cs"],
            Language::Go => &["go"],
            Language::Ruby => &["rb"],
            Language::Php => &["php"],
        }
    }

    /// Lower-cased canonical name, as used to key the per-language context
    /// table and to parse the `language` request field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Ruby => "ruby",
            Language::Php => "php",
        }
    }

    /// Parses a lower-cased language name, defaulting to `TypeScript`
    /// when the value is empty or unrecognized.
    pub fn parse_or_default(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "javascript" => Language::JavaScript,
            "python" => Language::Python,
            "java" => Language::Java,
            "csharp" | "c#" => Language::CSharp,
            "go" | "golang" => Language::Go,
            "ruby" => Language::Ruby,
            "php" => Language::Php,
            _ => Language::TypeScript,
        }
    }
}

impl std::default::Default for Language {
    fn default() -> Self {
        Language::TypeScript
    }
}
