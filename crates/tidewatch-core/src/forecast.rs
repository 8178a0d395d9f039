//! Bridge conflict forecast and tide estimate.
//!
//! Both are cheap per-frame estimates. The bridge forecast assumes every
//! visible vessel heads for the watched bridge at a fixed speed and turns the
//! smallest ETA into a risk score. The tide model is a plain semi-diurnal
//! sine used for frames that have no live gauge reading.

use std::f64::consts::TAU;

use tidewatch_types::{BridgeForecast, GeoPoint, VisibleShip};

use crate::config::{ForecastConfig, TideConfig};

/// Kilometres per degree of latitude.
const KM_PER_DEGREE: f64 = 111.0;

/// Kilometres per hour in one knot.
const KMH_PER_KNOT: f64 = 1.852;

// ---------------------------------------------------------------------------
// Bridge forecast
// ---------------------------------------------------------------------------

/// ETA-based closure risk for one bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeWatch {
    name: String,
    bridge: GeoPoint,
    speed_kmh: f64,
    alert_minutes: f64,
    critical_minutes: f64,
}

impl BridgeWatch {
    /// Create a watch from the forecast configuration.
    pub fn new(config: &ForecastConfig) -> Self {
        Self {
            name: config.bridge_name.clone(),
            bridge: config.bridge,
            speed_kmh: config.assumed_speed_knots * KMH_PER_KNOT,
            alert_minutes: config.alert_minutes,
            critical_minutes: config.critical_minutes,
        }
    }

    /// Minutes until a vessel at `position` reaches the bridge.
    ///
    /// Uses a flat-earth distance, which is accurate enough inside the port.
    pub fn eta_minutes(&self, position: GeoPoint) -> f64 {
        let dy = (position.lat - self.bridge.lat) * KM_PER_DEGREE;
        let dx = (position.lng - self.bridge.lng)
            * KM_PER_DEGREE
            * self.bridge.lat.to_radians().cos();
        let distance_km = dx.hypot(dy);
        distance_km / self.speed_kmh * 60.0
    }

    /// Risk for a given ETA: 1.0 below the critical threshold, falling
    /// linearly to 0.0 at the alert threshold.
    pub fn risk_for_eta(&self, eta_minutes: f64) -> f64 {
        let risk = if eta_minutes < self.critical_minutes {
            1.0
        } else if eta_minutes < self.alert_minutes {
            1.0 - (eta_minutes - self.critical_minutes)
                / (self.alert_minutes - self.critical_minutes)
        } else {
            0.0
        };
        risk.clamp(0.0, 1.0)
    }

    /// Forecast over every vessel in a frame.
    pub fn forecast(&self, ships: &[VisibleShip]) -> BridgeForecast {
        let nearest = ships
            .iter()
            .map(|ship| (ship, self.eta_minutes(GeoPoint::new(ship.lat, ship.lng))))
            .filter(|(_, eta)| eta.is_finite())
            .min_by(|(_, a), (_, b)| a.total_cmp(b));

        match nearest {
            Some((ship, eta)) => BridgeForecast {
                bridge: self.name.clone(),
                risk_score: self.risk_for_eta(eta),
                eta_minutes: Some(eta),
                trigger_ship: Some(ship.id.clone()),
            },
            None => BridgeForecast {
                bridge: self.name.clone(),
                ..BridgeForecast::default()
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tide
// ---------------------------------------------------------------------------

/// Semi-diurnal tide estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TideModel {
    mean_level_m: f64,
    amplitude_m: f64,
    period_seconds: f64,
    reference_timestamp: f64,
}

impl TideModel {
    /// Create a model from the tide configuration.
    pub fn new(config: &TideConfig) -> Self {
        Self {
            mean_level_m: config.mean_level_m,
            amplitude_m: config.amplitude_m,
            period_seconds: config.period_hours * 3600.0,
            reference_timestamp: config.reference_timestamp,
        }
    }

    /// Estimated water level at `timestamp`, in metres.
    pub fn level_at(&self, timestamp: f64) -> f64 {
        if self.period_seconds <= 0.0 {
            return self.mean_level_m;
        }
        let phase = TAU * (timestamp - self.reference_timestamp) / self.period_seconds;
        self.amplitude_m.mul_add(phase.sin(), self.mean_level_m)
    }
}
