use log::error;
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, String>;
    async fn set_settings(&self, settings: Settings) -> Result<(), String>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

/// User preferences kept on the device.
///
/// The theme is stored separately from the other preferences.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    #[serde(skip)]
    pub theme: Theme,
    pub weight_unit: WeightUnit,
    /// Rest between sets in seconds.
    pub rest_timer: u32,
}

impl Settings {
    #[must_use]
    pub fn current_theme(&self) -> Theme {
        match self.theme {
            Theme::System => match web_sys::window()
                .map(|window| window.match_media("(prefers-color-scheme: dark)"))
            {
                Some(Ok(Some(prefers_dark_scheme))) => {
                    if prefers_dark_scheme.matches() {
                        Theme::Dark
                    } else {
                        Theme::Light
                    }
                }
                _ => {
                    error!("failed to determine preferred color scheme");
                    Theme::Light
                }
            },
            Theme::Light | Theme::Dark => self.theme,
        }
    }

    /// Sets the resolved theme as `data-theme` attribute of the document element.
    pub fn apply_theme(&self) {
        let theme = self.current_theme();
        match gloo_utils::document().document_element() {
            Some(element) => {
                if let Err(err) = element.set_attribute("data-theme", theme.as_ref()) {
                    error!("failed to apply theme: {err:?}");
                }
            }
            None => error!("failed to access document element to apply theme"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            weight_unit: WeightUnit::Kg,
            rest_timer: 90,
        }
    }
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(
    serde::Serialize,
    serde::Deserialize,
    AsRefStr,
    Display,
    EnumString,
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    const POUNDS_PER_KILOGRAM: f32 = 2.204_622_6;

    /// Converts a weight in kg into this unit.
    #[must_use]
    pub fn in_unit(self, weight: f32) -> f32 {
        match self {
            WeightUnit::Kg => weight,
            WeightUnit::Lb => weight * Self::POUNDS_PER_KILOGRAM,
        }
    }

    /// Converts a weight in this unit into kg.
    #[must_use]
    pub fn in_kg(self, weight: f32) -> f32 {
        match self {
            WeightUnit::Kg => weight,
            WeightUnit::Lb => weight / Self::POUNDS_PER_KILOGRAM,
        }
    }
}
