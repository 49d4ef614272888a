//! Shared application state: running games, the track resolver and the event hub.

pub mod game;
mod events;
pub mod track;

use std::sync::Arc;

use dashmap::DashMap;

use crate::{
    config::AppConfig,
    player::PlayerClient,
    services::{
        notifier::{HubNotifier, Notifier},
        track_resolver::TrackResolver,
    },
    state::game::Game,
};

pub use self::events::EventHub;

/// Shared handle on the application state.
pub type SharedState = Arc<AppState>;

/// Central application state: running games, the track resolver and the event hub.
pub struct AppState {
    config: AppConfig,
    games: DashMap<String, Game>,
    resolver: Arc<TrackResolver>,
    events: EventHub,
    notifier: Arc<dyn Notifier>,
}

impl AppState {
    /// Construct a new [`AppState`] publishing notifications onto its own SSE hub.
    pub fn new(config: AppConfig, player: Arc<dyn PlayerClient>) -> SharedState {
        let events = EventHub::new(config.event_capacity());
        let notifier = Arc::new(HubNotifier::new(events.clone()));
        Self::build(config, player, events, notifier)
    }

    /// Construct a new [`AppState`] routing notifications through `notifier`.
    pub fn with_notifier(
        config: AppConfig,
        player: Arc<dyn PlayerClient>,
        notifier: Arc<dyn Notifier>,
    ) -> SharedState {
        let events = EventHub::new(config.event_capacity());
        Self::build(config, player, events, notifier)
    }

    fn build(
        config: AppConfig,
        player: Arc<dyn PlayerClient>,
        events: EventHub,
        notifier: Arc<dyn Notifier>,
    ) -> SharedState {
        let resolver = Arc::new(TrackResolver::with_settings(
            player,
            config.track_cache_lifetime(),
            config.recent_tracks(),
        ));
        Arc::new(Self {
            config,
            games: DashMap::new(),
            resolver,
            events,
            notifier,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Running games keyed by channel.
    pub fn games(&self) -> &DashMap<String, Game> {
        &self.games
    }

    /// Current-track resolver shared by every game.
    pub fn resolver(&self) -> &Arc<TrackResolver> {
        &self.resolver
    }

    /// Broadcast hub feeding the SSE stream.
    pub fn events(&self) -> &EventHub {
        &self.events
    }

    /// Outbound notification sink handed to new games.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }
}
