use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Model the chat page opens with. `Default` leaves the choice to the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Model {
    #[default]
    #[serde(rename = "default")]
    Default,
    #[serde(rename = "gpt-4o")]
    Gpt4o,
    #[serde(rename = "o3")]
    O3,
    #[serde(rename = "o4-mini")]
    O4Mini,
    #[serde(rename = "o4-mini-high")]
    O4MiniHigh,
    #[serde(rename = "gpt-4-5")]
    Gpt45,
    #[serde(rename = "gpt-4-1")]
    Gpt41,
    #[serde(rename = "gpt-4-1-mini")]
    Gpt41Mini,
}

impl Model {
    /// Every model, in menu order.
    pub const ALL: [Model; 8] = [
        Model::Default,
        Model::Gpt4o,
        Model::O3,
        Model::O4Mini,
        Model::O4MiniHigh,
        Model::Gpt45,
        Model::Gpt41,
        Model::Gpt41Mini,
    ];

    /// Value used both in the settings file and in the `model` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Model::Default => "default",
            Model::Gpt4o => "gpt-4o",
            Model::O3 => "o3",
            Model::O4Mini => "o4-mini",
            Model::O4MiniHigh => "o4-mini-high",
            Model::Gpt45 => "gpt-4-5",
            Model::Gpt41 => "gpt-4-1",
            Model::Gpt41Mini => "gpt-4-1-mini",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Model::Default => "Default model",
            Model::Gpt4o => "GPT-4o",
            Model::O3 => "GPT-o3",
            Model::O4Mini => "GPT-o4-mini",
            Model::O4MiniHigh => "GPT-o4-mini-high",
            Model::Gpt45 => "GPT-4-5",
            Model::Gpt41 => "GPT-4-1",
            Model::Gpt41Mini => "GPT-4-1-mini",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Model {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown model: {}", s))
    }
}

/// User preferences, persisted as `settings.json` in the per-user config
/// directory.
///
/// Keys the application does not know about are kept in `extra` so a file
/// written by a newer version survives a round trip through an older one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub temporary_chat: bool,
    pub model: Model,
    pub ready_to_show: bool,
    pub maximize_window: bool,
    pub external_links_in_browser: bool,
    pub internal_domains: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            temporary_chat: false,
            model: Model::Default,
            ready_to_show: true,
            maximize_window: false,
            external_links_in_browser: true,
            internal_domains: vec![
                String::from("chatgpt.com"),
                String::from("chat.openai.com"),
                String::from("auth.openai.com"),
                String::from("auth0.openai.com"),
            ],
            extra: Map::new(),
        }
    }
}

/// The default record as a JSON object, one entry per known key.
pub fn default_document() -> Map<String, Value> {
    match serde_json::to_value(Preferences::default()) {
        Ok(Value::Object(map)) => map,
        // Preferences always serializes to an object.
        _ => Map::new(),
    }
}
