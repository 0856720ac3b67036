use serde::{Deserialize, Serialize};

pub mod exam;
pub mod history;
pub mod question;
pub mod session;
pub mod timer;

/// Display language for prompts, options and answer comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Malayalam,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Malayalam => "malayalam",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Language::English => Language::Malayalam,
            Language::Malayalam => Language::English,
        }
    }
}
