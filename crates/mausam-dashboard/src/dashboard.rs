//! Dashboard runner: feeds actions through the reducer and runs effects

use crate::loader::{load_snapshot, locate_with_timeout, resolve_place};
use crate::state::{reduce, Action, DashboardState, Effect};
use mausam_core::{Geocoder, LocationProvider, UnitSystem, WeatherSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Collaborators the dashboard talks to
#[derive(Clone)]
pub struct Services {
    pub weather: Arc<dyn WeatherSource>,
    pub geocoder: Arc<dyn Geocoder>,
    pub locator: Arc<dyn LocationProvider>,
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardSettings {
    pub units: UnitSystem,
    pub forecast_days: usize,
    pub locate_timeout: Duration,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            units: UnitSystem::Metric,
            forecast_days: mausam_core::DEFAULT_FORECAST_DAYS,
            locate_timeout: Duration::from_secs(15),
        }
    }
}

pub struct Dashboard {
    state: Mutex<DashboardState>,
    services: Services,
    settings: DashboardSettings,
}

impl Dashboard {
    pub fn new(services: Services, settings: DashboardSettings) -> Self {
        Self {
            state: Mutex::new(DashboardState::new(settings.units)),
            services,
            settings,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub async fn state(&self) -> DashboardState {
        self.state.lock().await.clone()
    }

    /// Apply a user action and run the effects it triggers to completion.
    /// The state lock is released while effects run.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, action: Action) -> DashboardState {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            let effect = {
                let mut state = self.state.lock().await;
                reduce(&mut state, action)
            };
            if let Some(effect) = effect {
                debug!(?effect, "running effect");
                next = Some(self.run(effect).await);
            }
        }
        self.state().await
    }

    async fn run(&self, effect: Effect) -> Action {
        match effect {
            Effect::Load {
                request,
                coords,
                units,
            } => match load_snapshot(
                self.services.weather.as_ref(),
                coords,
                units,
                self.settings.forecast_days,
            )
            .await
            {
                Ok(snapshot) => Action::Loaded {
                    request,
                    snapshot: Box::new(snapshot),
                },
                Err(e) => {
                    tracing::warn!(error = %e, "weather load failed");
                    Action::LoadFailed {
                        request,
                        message: e.to_string(),
                    }
                }
            },
            Effect::ResolvePlace { request, coords } => Action::PlaceResolved {
                request,
                target: resolve_place(self.services.geocoder.as_ref(), coords).await,
            },
            Effect::Locate { request } => Action::Located {
                request,
                result: locate_with_timeout(
                    self.services.locator.as_ref(),
                    self.settings.locate_timeout,
                )
                .await,
            },
        }
    }
}
