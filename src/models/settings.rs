use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

use crate::error::GenerationError;

pub const PAGE_COUNT_RANGE: RangeInclusive<u32> = 1..=10;
pub const PANELS_PER_PAGE_RANGE: RangeInclusive<u32> = 2..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Genre {
    #[default]
    #[serde(rename = "school")]
    School,
    #[serde(rename = "romance")]
    Romance,
    #[serde(rename = "dark fantasy")]
    DarkFantasy,
    #[serde(rename = "isekai")]
    Isekai,
    #[serde(rename = "horror")]
    Horror,
    #[serde(rename = "comedy")]
    Comedy,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::School,
        Genre::Romance,
        Genre::DarkFantasy,
        Genre::Isekai,
        Genre::Horror,
        Genre::Comedy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::School => "school",
            Genre::Romance => "romance",
            Genre::DarkFantasy => "dark fantasy",
            Genre::Isekai => "isekai",
            Genre::Horror => "horror",
            Genre::Comedy => "comedy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Goofy,
    #[default]
    Serious,
    Edgy,
    Emotional,
}

impl Tone {
    pub const ALL: [Tone; 4] = [Tone::Goofy, Tone::Serious, Tone::Edgy, Tone::Emotional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Goofy => "goofy",
            Tone::Serious => "serious",
            Tone::Edgy => "edgy",
            Tone::Emotional => "emotional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TwistIntensity {
    #[default]
    #[serde(rename = "light twist")]
    Light,
    #[serde(rename = "big betrayal")]
    BigBetrayal,
    #[serde(rename = "time loop")]
    TimeLoop,
    #[serde(rename = "death")]
    Death,
}

impl TwistIntensity {
    pub const ALL: [TwistIntensity; 4] = [
        TwistIntensity::Light,
        TwistIntensity::BigBetrayal,
        TwistIntensity::TimeLoop,
        TwistIntensity::Death,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TwistIntensity::Light => "light twist",
            TwistIntensity::BigBetrayal => "big betrayal",
            TwistIntensity::TimeLoop => "time loop",
            TwistIntensity::Death => "death",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Genre, Tone, TwistIntensity);

/// User-entered parameters for one story generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Free-text premise the story is expanded from.
    pub prompt: String,
    #[serde(default)]
    pub genre: Genre,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub twist_intensity: TwistIntensity,
    #[serde(default = "default_count")]
    pub page_count: u32,
    #[serde(default = "default_count")]
    pub panels_per_page: u32,
}

fn default_count() -> u32 {
    3
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            genre: Genre::default(),
            tone: Tone::default(),
            twist_intensity: TwistIntensity::default(),
            page_count: default_count(),
            panels_per_page: default_count(),
        }
    }
}

impl GenerationConfig {
    /// Rejects configurations that must never reach a backend.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::Validation(
                "prompt must not be empty".to_string(),
            ));
        }
        if !PAGE_COUNT_RANGE.contains(&self.page_count) {
            return Err(GenerationError::Validation(format!(
                "pageCount must be between {} and {}, got {}",
                PAGE_COUNT_RANGE.start(),
                PAGE_COUNT_RANGE.end(),
                self.page_count
            )));
        }
        if !PANELS_PER_PAGE_RANGE.contains(&self.panels_per_page) {
            return Err(GenerationError::Validation(format!(
                "panelsPerPage must be between {} and {}, got {}",
                PANELS_PER_PAGE_RANGE.start(),
                PANELS_PER_PAGE_RANGE.end(),
                self.panels_per_page
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prompt: &str) -> GenerationConfig {
        GenerationConfig {
            prompt: prompt.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn enum_values_use_display_spelling_on_the_wire() {
        let json = serde_json::to_value(GenerationConfig {
            genre: Genre::DarkFantasy,
            twist_intensity: TwistIntensity::BigBetrayal,
            ..config("x")
        })
        .unwrap();

        assert_eq!(json["genre"], "dark fantasy");
        assert_eq!(json["tone"], "serious");
        assert_eq!(json["twistIntensity"], "big betrayal");
        assert_eq!(json["pageCount"], 3);
        assert_eq!(json["panelsPerPage"], 3);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: GenerationConfig =
            serde_json::from_str(r#"{"prompt":"a fox demon pact"}"#).unwrap();
        assert_eq!(parsed.genre, Genre::School);
        assert_eq!(parsed.tone, Tone::Serious);
        assert_eq!(parsed.twist_intensity, TwistIntensity::Light);
        assert_eq!(parsed.page_count, 3);
    }

    #[test]
    fn unknown_genre_is_rejected() {
        let parsed = serde_json::from_str::<GenerationConfig>(r#"{"prompt":"x","genre":"western"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn blank_prompt_fails_validation() {
        assert!(matches!(
            config("   ").validate(),
            Err(GenerationError::Validation(_))
        ));
        assert!(config("a broke high-schooler").validate().is_ok());
    }

    #[test]
    fn counts_outside_bounds_fail_validation() {
        let too_many_pages = GenerationConfig {
            page_count: 11,
            ..config("x")
        };
        let zero_pages = GenerationConfig {
            page_count: 0,
            ..config("x")
        };
        let one_panel = GenerationConfig {
            panels_per_page: 1,
            ..config("x")
        };
        let six_panels = GenerationConfig {
            panels_per_page: 6,
            page_count: 10,
            ..config("x")
        };

        assert!(too_many_pages.validate().is_err());
        assert!(zero_pages.validate().is_err());
        assert!(one_panel.validate().is_err());
        assert!(six_panels.validate().is_ok());
    }

    #[test]
    fn display_matches_serialized_value() {
        for genre in Genre::ALL {
            let json = serde_json::to_value(genre).unwrap();
            assert_eq!(json, genre.to_string());
        }
        for twist in TwistIntensity::ALL {
            let json = serde_json::to_value(twist).unwrap();
            assert_eq!(json, twist.to_string());
        }
    }
}
