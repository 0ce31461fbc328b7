//! Event-driven provider host.
//!
//! Instead of loading inline, the delegate emits a
//! [`LocaleEvent::LoadRequested`] event. A single event loop task consumes
//! events in order and publishes progress on a `watch` channel, so loads
//! never overlap.

use crate::error::{I18nError, Result};
use crate::i18n::{Locale, LocaleHost, LocaleProvider, TranslationTable};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Events understood by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleEvent {
    LoadRequested(Locale),
}

/// Progress of the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading(Locale),
    Loaded { locale: Locale, keys: usize },
    /// The manifest had no entry for the locale, or its files were empty
    Missing(Locale),
    Failed { locale: Locale, error: String },
}

/// A provider driven through an event channel.
pub struct EventedLocaleProvider {
    provider: Arc<LocaleProvider>,
    events: mpsc::UnboundedSender<LocaleEvent>,
    state: watch::Receiver<LoadState>,
}

impl EventedLocaleProvider {
    /// Start the event loop on the current tokio runtime.
    ///
    /// The loop stops once this value is dropped.
    pub fn spawn(provider: Arc<LocaleProvider>) -> (Self, JoinHandle<()>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let (state_tx, state) = watch::channel(LoadState::Idle);

        let handle = tokio::spawn(run_event_loop(Arc::clone(&provider), receiver, state_tx));

        (
            Self {
                provider,
                events,
                state,
            },
            handle,
        )
    }

    /// The provider the event loop loads into.
    pub fn provider_handle(&self) -> &Arc<LocaleProvider> {
        &self.provider
    }

    /// Send an event to the loop.
    pub fn emit(&self, event: LocaleEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| I18nError::EventLoopClosed)
    }

    /// Watch load progress.
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.clone()
    }

    /// Current load progress.
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }
}

#[async_trait]
impl LocaleHost for EventedLocaleProvider {
    fn provider(&self) -> &LocaleProvider {
        &self.provider
    }

    /// Emits the request and returns immediately; the table arrives later
    /// through the state channel.
    async fn request_load(&self, locale: Locale) -> Result<Option<TranslationTable>> {
        self.emit(LocaleEvent::LoadRequested(locale))?;
        Ok(None)
    }
}

async fn run_event_loop(
    provider: Arc<LocaleProvider>,
    mut events: mpsc::UnboundedReceiver<LocaleEvent>,
    state: watch::Sender<LoadState>,
) {
    while let Some(event) = events.recv().await {
        match event {
            LocaleEvent::LoadRequested(locale) => {
                state.send_replace(LoadState::Loading(locale.clone()));

                let next = match provider.load(Some(locale.clone())).await {
                    Ok(Some(table)) => LoadState::Loaded {
                        locale,
                        keys: table.len(),
                    },
                    Ok(None) => LoadState::Missing(locale),
                    Err(e) => {
                        warn!("Event-driven load of {} failed: {}", locale, e);
                        LoadState::Failed {
                            locale,
                            error: e.to_string(),
                        }
                    }
                };
                state.send_replace(next);
            }
        }
    }

    debug!("Locale event loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::config::I18nConfig;
    use crate::device::FixedLocales;
    use crate::i18n::{LocalizationDelegate, TranslationsDelegate};
    use crate::store::MemoryStore;

    fn provider() -> Arc<LocaleProvider> {
        let assets = MemoryAssets::new()
            .with_file(
                "assets/lang/config.json",
                r#"{"en": ["en.json"], "es": ["es.json"], "fr": ["fr.json"]}"#,
            )
            .with_file("assets/lang/en.json", r#"{"hi": "Hello", "bye": "Bye"}"#)
            .with_file("assets/lang/es.json", r#"{"hi": "Hola"}"#);

        Arc::new(
            LocaleProvider::new(
                I18nConfig::with_locales(vec![
                    Locale::new("en"),
                    Locale::new("es"),
                    Locale::new("fr"),
                    Locale::new("de"),
                ]),
                Arc::new(assets),
                Arc::new(MemoryStore::new()),
                Arc::new(FixedLocales::unknown()),
            )
            .expect("Should construct"),
        )
    }

    #[tokio::test]
    async fn test_delegate_emits_and_loop_loads() {
        let (host, _handle) = EventedLocaleProvider::spawn(provider());
        let host = Arc::new(host);
        let mut state = host.subscribe();
        let delegate = TranslationsDelegate::new(host.clone());

        let result = delegate.load(Some(Locale::new("en"))).await.unwrap();
        assert!(result.is_none());

        let loaded = state
            .wait_for(|s| matches!(s, LoadState::Loaded { .. }))
            .await
            .expect("Loop should be running")
            .clone();
        assert_eq!(
            loaded,
            LoadState::Loaded {
                locale: Locale::new("en"),
                keys: 2
            }
        );
        assert_eq!(host.provider_handle().t("hi", None), "Hello");
        assert_eq!(host.provider_handle().locale(), Some(Locale::new("en")));
    }

    #[tokio::test]
    async fn test_events_are_processed_in_order() {
        let (host, _handle) = EventedLocaleProvider::spawn(provider());
        let mut state = host.subscribe();

        host.emit(LocaleEvent::LoadRequested(Locale::new("en"))).unwrap();
        host.emit(LocaleEvent::LoadRequested(Locale::new("es"))).unwrap();

        state
            .wait_for(|s| {
                matches!(s, LoadState::Loaded { locale, .. } if *locale == Locale::new("es"))
            })
            .await
            .expect("Loop should be running");

        let sentences = host.provider_handle().sentences();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences["hi"], "Hola");
    }

    #[tokio::test]
    async fn test_missing_and_failed_states() {
        let (host, _handle) = EventedLocaleProvider::spawn(provider());
        let mut state = host.subscribe();

        host.emit(LocaleEvent::LoadRequested(Locale::new("de"))).unwrap();
        state
            .wait_for(|s| matches!(s, LoadState::Missing(_)))
            .await
            .expect("Loop should be running");

        host.emit(LocaleEvent::LoadRequested(Locale::new("fr"))).unwrap();
        let failed = state
            .wait_for(|s| matches!(s, LoadState::Failed { .. }))
            .await
            .expect("Loop should be running")
            .clone();
        match failed {
            LoadState::Failed { locale, error } => {
                assert_eq!(locale, Locale::new("fr"));
                assert!(error.contains("fr.json"));
            }
            other => panic!("Unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_loop_stops_when_host_dropped() {
        let (host, handle) = EventedLocaleProvider::spawn(provider());
        assert_eq!(host.state(), LoadState::Idle);

        drop(host);
        handle.await.expect("Loop should exit cleanly");
    }
}
