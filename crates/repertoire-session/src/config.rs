//! Application configuration.

/// Knobs for the session layer. The binary fills these from its command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Key the repertoire is stored under.
    pub repertoire_key: String,
    /// Name prefix for lines saved without a name (`"Line"` gives `Line 3`).
    pub auto_name_prefix: String,
    /// Draw practice lines in shuffled order instead of saved order.
    pub shuffle_practice: bool,
    /// Seed for the practice shuffle; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repertoire_key: String::from("chess_repertoire"),
            auto_name_prefix: String::from("Line"),
            shuffle_practice: true,
            seed: None,
        }
    }
}
