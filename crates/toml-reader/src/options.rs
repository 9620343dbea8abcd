/// Decoder configuration.
#[derive(Debug, Clone)]
pub struct Options {
    /// Maximum nesting of arrays and inline tables inside one value.
    pub max_depth: usize,
    /// Reject a second `[header]` for a table that was already declared.
    /// When disabled the second body is merged into the first one.
    pub strict_tables: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: 128,
            strict_tables: true,
        }
    }
}
