//! Dashboard state and the reducer that owns every transition
//!
//! `reduce` is the only place `DashboardState` changes. It is pure: any I/O
//! it needs is returned as an [`Effect`] for the caller to run, whose outcome
//! comes back as another [`Action`].

use mausam_core::{
    Coordinates, CurrentConditions, DailySummary, Location, LocationError, UnitSystem,
};
use serde::Serialize;

/// What the dashboard is showing weather for
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Target {
    /// A geocoded place
    Place(Location),
    /// Raw device coordinates that could not be named
    Coordinates(Coordinates),
}

impl Target {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Target::Place(loc) => loc.coordinates(),
            Target::Coordinates(c) => *c,
        }
    }
}

/// Data behind a ready dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub units: UnitSystem,
    pub current: CurrentConditions,
    pub daily: Vec<DailySummary>,
}

/// Display phase
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Failed {
        message: String,
    },
    Ready(Box<Snapshot>),
}

impl Phase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            Phase::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub units: UnitSystem,
    pub target: Option<Target>,
    pub phase: Phase,
    /// Id of the newest request; results tagged with an older id are dropped
    pub request: u64,
}

impl DashboardState {
    pub fn new(units: UnitSystem) -> Self {
        Self {
            units,
            ..Default::default()
        }
    }

    fn begin(&mut self) -> u64 {
        self.request += 1;
        self.phase = Phase::Loading;
        self.request
    }

    fn is_current(&self, request: u64) -> bool {
        request == self.request
    }
}

/// User intents and async results
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A place was picked from search
    SelectLocation(Location),
    /// The device reported its position
    DeviceLocated(Coordinates),
    /// The device could not report its position
    DeviceLocationFailed(LocationError),
    /// The location provider answered a `Locate` effect
    Located {
        request: u64,
        result: Result<Coordinates, LocationError>,
    },
    /// Reverse geocoding of device coordinates finished
    PlaceResolved { request: u64, target: Target },
    ToggleUnits,
    Retry,
    Loaded { request: u64, snapshot: Box<Snapshot> },
    LoadFailed { request: u64, message: String },
}

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch current conditions and forecast together
    Load {
        request: u64,
        coords: Coordinates,
        units: UnitSystem,
    },
    /// Name device coordinates before loading
    ResolvePlace { request: u64, coords: Coordinates },
    /// Ask the location provider for a position
    Locate { request: u64 },
}

pub const LOCATION_FAILED_PREFIX: &str = "Unable to get your location.";
pub const LOAD_FAILED_PREFIX: &str = "Failed to load weather data.";

fn load(state: &mut DashboardState, target: Target) -> Effect {
    let coords = target.coordinates();
    state.target = Some(target);
    Effect::Load {
        request: state.begin(),
        coords,
        units: state.units,
    }
}

/// Apply an action, returning the effect to run next, if any
pub fn reduce(state: &mut DashboardState, action: Action) -> Option<Effect> {
    match action {
        Action::SelectLocation(location) => Some(load(state, Target::Place(location))),

        Action::DeviceLocated(coords) => Some(Effect::ResolvePlace {
            request: state.begin(),
            coords,
        }),

        Action::DeviceLocationFailed(err) => {
            // cancels whatever was in flight
            state.request += 1;
            state.phase = Phase::Failed {
                message: format!("{} {}", LOCATION_FAILED_PREFIX, err.user_message()),
            };
            None
        }

        Action::Located { request, result } => {
            if !state.is_current(request) {
                return None;
            }
            match result {
                Ok(coords) => Some(Effect::ResolvePlace { request, coords }),
                Err(err) => {
                    state.phase = Phase::Failed {
                        message: format!("{} {}", LOCATION_FAILED_PREFIX, err.user_message()),
                    };
                    None
                }
            }
        }

        Action::PlaceResolved { request, target } => {
            if !state.is_current(request) {
                return None;
            }
            let coords = target.coordinates();
            state.target = Some(target);
            Some(Effect::Load {
                request,
                coords,
                units: state.units,
            })
        }

        Action::ToggleUnits => {
            state.units = state.units.toggle();
            let target = state.target.clone()?;
            Some(load(state, target))
        }

        Action::Retry => match state.target.clone() {
            Some(target) => Some(load(state, target)),
            None => Some(Effect::Locate {
                request: state.begin(),
            }),
        },

        Action::Loaded { request, snapshot } => {
            if state.is_current(request) {
                state.phase = Phase::Ready(snapshot);
            }
            None
        }

        Action::LoadFailed { request, message } => {
            if state.is_current(request) {
                state.phase = Phase::Failed {
                    message: format!("{} {}", LOAD_FAILED_PREFIX, message),
                };
            }
            None
        }
    }
}
