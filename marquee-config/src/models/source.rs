use std::path::PathBuf;

/// Source that produced the interaction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionConfigSource {
    /// Built-in defaults; nothing was found
    #[default]
    Default,
    /// File named by `$MARQUEE_CONFIG_PATH`
    EnvPath(PathBuf),
    /// Inline JSON from `$MARQUEE_CONFIG_JSON`
    EnvInline,
    /// First default candidate file that exists
    File(PathBuf),
    /// Path given explicitly by the caller, e.g. a `--config` flag.
    Explicit(PathBuf),
}

impl std::fmt::Display for InteractionConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => f.write_str("built-in defaults"),
            Self::EnvPath(path) => {
                write!(f, "$MARQUEE_CONFIG_PATH ({})", path.display())
            }
            Self::EnvInline => f.write_str("$MARQUEE_CONFIG_JSON"),
            Self::File(path) | Self::Explicit(path) => {
                write!(f, "{}", path.display())
            }
        }
    }
}
