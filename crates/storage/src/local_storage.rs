use std::{collections::VecDeque, str::FromStr};

use forma_web_app::{
    BrandingRepository, Settings, SettingsRepository, Theme, TokenRepository, log,
};
use gloo_storage::Storage as GlooStorage;

const KEY_TOKEN: &str = "auth_token";
const KEY_THEME: &str = "theme";
const KEY_PARTNER: &str = "partner";
const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

fn read_raw(key: &str) -> Option<String> {
    gloo_storage::LocalStorage::raw()
        .get_item(key)
        .ok()
        .flatten()
        .filter(|value| !value.is_empty())
}

fn write_raw(key: &str, value: &str) -> Result<(), String> {
    gloo_storage::LocalStorage::raw()
        .set_item(key, value)
        .map_err(|err| format!("failed to write {key}: {err:?}"))
}

pub struct Token;

impl TokenRepository for Token {
    fn read_token(&self) -> Option<String> {
        read_raw(KEY_TOKEN)
    }

    fn write_token(&self, token: &str) -> Result<(), String> {
        write_raw(KEY_TOKEN, token)
    }

    fn delete_token(&self) {
        gloo_storage::LocalStorage::delete(KEY_TOKEN);
    }
}

pub struct UI;

impl SettingsRepository for UI {
    async fn read_settings(&self) -> Result<Settings, String> {
        let mut settings: Settings = match gloo_storage::LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(Settings::default()),
                err => Err(err),
            },
        }
        .map_err(|err| err.to_string())?;
        settings.theme = match read_raw(KEY_THEME) {
            Some(theme) => Theme::from_str(&theme).unwrap_or_else(|_| {
                ::log::warn!("ignoring invalid theme: {theme}");
                Theme::default()
            }),
            None => Theme::default(),
        };
        Ok(settings)
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())?;
        write_raw(KEY_THEME, settings.theme.as_ref())
    }
}

impl BrandingRepository for UI {
    async fn read_partner(&self) -> Result<Option<String>, String> {
        Ok(read_raw(KEY_PARTNER))
    }

    async fn write_partner(&self, partner: Option<String>) -> Result<(), String> {
        match partner {
            Some(partner) => write_raw(KEY_PARTNER, &partner),
            None => {
                gloo_storage::LocalStorage::delete(KEY_PARTNER);
                Ok(())
            }
        }
    }
}

pub struct Log;

impl log::Repository for Log {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    mod wasm {
        use forma_web_app::{Branding, BrandingService, Service, SettingsService, WeightUnit};
        use pretty_assertions::assert_eq;
        use wasm_bindgen_test::wasm_bindgen_test;

        use super::*;

        #[wasm_bindgen_test]
        fn test_token() {
            Token.delete_token();
            assert_eq!(Token.read_token(), None);

            Token.write_token("secret").unwrap();
            assert_eq!(Token.read_token(), Some("secret".to_string()));
            assert_eq!(
                gloo_storage::LocalStorage::raw()
                    .get_item(KEY_TOKEN)
                    .unwrap(),
                Some("secret".to_string())
            );

            Token.delete_token();
            assert_eq!(Token.read_token(), None);
        }

        #[wasm_bindgen_test]
        async fn test_settings_store_theme_separately() {
            let settings = Settings {
                theme: Theme::Dark,
                weight_unit: WeightUnit::Lb,
                rest_timer: 120,
            };

            UI.write_settings(settings).await.unwrap();

            assert_eq!(read_raw(KEY_THEME), Some("dark".to_string()));
            assert_eq!(UI.read_settings().await.unwrap(), settings);
        }

        #[wasm_bindgen_test]
        async fn test_invalid_theme_selects_default() {
            write_raw(KEY_THEME, "neon").unwrap();

            assert_eq!(UI.read_settings().await.unwrap().theme, Theme::System);
        }

        #[wasm_bindgen_test]
        async fn test_branding() {
            let service = Service::new(UI);

            service
                .set_branding(Branding::from_slug(Some("acme")))
                .await
                .unwrap();
            assert_eq!(read_raw(KEY_PARTNER), Some("acme".to_string()));
            assert_eq!(
                service.get_branding().await.unwrap().manifest_url(),
                "/manifests/acme.webmanifest"
            );

            service.set_branding(Branding::default()).await.unwrap();
            assert_eq!(read_raw(KEY_PARTNER), None);
            assert_eq!(service.get_branding().await.unwrap(), Branding::default());
        }

        #[wasm_bindgen_test]
        fn test_log_keeps_last_entries() {
            gloo_storage::LocalStorage::delete(KEY_LOG);

            for i in 0..=log::MAX_ENTRIES {
                log::Repository::write_entry(
                    &Log,
                    log::Entry {
                        time: String::new(),
                        level: ::log::Level::Info,
                        message: i.to_string(),
                    },
                )
                .unwrap();
            }

            let entries = log::Repository::read_entries(&Log).unwrap();
            assert_eq!(entries.len(), log::MAX_ENTRIES);
            assert_eq!(
                entries.front().map(|entry| entry.message.clone()),
                Some(log::MAX_ENTRIES.to_string())
            );
        }
    }
}
