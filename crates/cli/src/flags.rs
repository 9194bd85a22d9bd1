use clap::ValueEnum;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Full canonical context (internal fields included)
    Canonical,
    /// Allow-listed public projection
    #[default]
    Public,
    Markdown,
    /// Grounded LLM prompt
    Prompt,
    /// Canonical context plus every intermediate stage record
    Report,
}

impl OutputFormat {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Canonical => "canonical",
            OutputFormat::Public => "public",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Prompt => "prompt",
            OutputFormat::Report => "report",
        }
    }
}
