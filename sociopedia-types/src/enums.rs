use serde::{Deserialize, Serialize};

/// Path segment selecting the like endpoint direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Dislike,
}

impl LikeAction {
    /// Action to send given whether the viewer currently likes the post
    pub fn for_liked(liked: bool) -> Self {
        if liked {
            LikeAction::Dislike
        } else {
            LikeAction::Like
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LikeAction::Like => "like",
            LikeAction::Dislike => "dislike",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ColorScheme {
    #[default]
    Default,
    Dark,
    Light,
    Solarized,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Default => "Default",
            ColorScheme::Dark => "Dark",
            ColorScheme::Light => "Light",
            ColorScheme::Solarized => "Solarized",
        }
    }

    /// Next scheme in display order, wrapping around
    pub fn next(&self) -> Self {
        match self {
            ColorScheme::Default => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
            ColorScheme::Light => ColorScheme::Solarized,
            ColorScheme::Solarized => ColorScheme::Default,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default" => Some(ColorScheme::Default),
            "dark" => Some(ColorScheme::Dark),
            "light" => Some(ColorScheme::Light),
            "solarized" => Some(ColorScheme::Solarized),
            _ => None,
        }
    }
}
