//! Outbound request execution
//!
//! The app describes each request as a `Command` stamped with a sequence
//! number. `Pipeline` runs it on a spawned task and reports the result as a
//! `PipelineEvent` over a channel. Dispatching a new command aborts the one
//! still in flight; the app drops events whose sequence number is stale.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::data::{
    ForecastClient, ForecastError, ForecastSnapshot, GeocodeError, GeocodeOutcome, GeocoderClient,
};

/// Identifies one request issued by the app
pub type Seq = u64;

/// A request the app wants executed
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Geocode a parsed location
    Geocode { seq: Seq, city: String, state: String },
    /// Fetch the forecast for a coordinate pair
    Forecast { seq: Seq, latitude: f64, longitude: f64 },
}

impl Command {
    /// Sequence number of the command
    pub fn seq(&self) -> Seq {
        match self {
            Command::Geocode { seq, .. } | Command::Forecast { seq, .. } => *seq,
        }
    }
}

/// Completion of a `Command`
#[derive(Debug)]
pub enum PipelineEvent {
    /// A geocoding lookup finished
    Geocoded {
        seq: Seq,
        result: Result<GeocodeOutcome, GeocodeError>,
    },
    /// A forecast fetch finished
    Forecasted {
        seq: Seq,
        result: Result<ForecastSnapshot, ForecastError>,
    },
}

impl PipelineEvent {
    /// Sequence number of the command this event completes
    pub fn seq(&self) -> Seq {
        match self {
            PipelineEvent::Geocoded { seq, .. } | PipelineEvent::Forecasted { seq, .. } => *seq,
        }
    }
}

/// Runs a single command to completion
pub async fn execute(
    geocoder: &GeocoderClient,
    forecaster: &ForecastClient,
    command: Command,
) -> PipelineEvent {
    match command {
        Command::Geocode { seq, city, state } => {
            tracing::debug!(seq, %city, %state, "geocoding");
            let result = geocoder.resolve(&city, &state).await;
            if let Err(e) = &result {
                tracing::warn!(seq, error = %e, "geocoding failed");
            }
            PipelineEvent::Geocoded { seq, result }
        }
        Command::Forecast {
            seq,
            latitude,
            longitude,
        } => {
            tracing::debug!(seq, latitude, longitude, "fetching forecast");
            let result = forecaster.fetch(latitude, longitude).await;
            if let Err(e) = &result {
                tracing::warn!(seq, error = %e, "forecast failed");
            }
            PipelineEvent::Forecasted { seq, result }
        }
    }
}

/// Executes commands in the background and collects their events
pub struct Pipeline {
    geocoder: GeocoderClient,
    forecaster: ForecastClient,
    sender: mpsc::Sender<PipelineEvent>,
    receiver: mpsc::Receiver<PipelineEvent>,
    in_flight: Option<JoinHandle<()>>,
}

impl Pipeline {
    /// Creates a pipeline around the two clients
    pub fn new(geocoder: GeocoderClient, forecaster: ForecastClient) -> Self {
        let (sender, receiver) = mpsc::channel(8);
        Self {
            geocoder,
            forecaster,
            sender,
            receiver,
            in_flight: None,
        }
    }

    /// Starts `command`, aborting whatever request is still running
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, command: Command) {
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                tracing::debug!(seq = command.seq(), "cancelling superseded request");
                previous.abort();
            }
        }

        let geocoder = self.geocoder.clone();
        let forecaster = self.forecaster.clone();
        let sender = self.sender.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let event = execute(&geocoder, &forecaster, command).await;
            let _ = sender.send(event).await;
        }));
    }

    /// Returns a finished event without blocking, if one is pending
    pub fn try_recv(&mut self) -> Option<PipelineEvent> {
        self.receiver.try_recv().ok()
    }

    /// Waits for the next finished event
    pub async fn recv(&mut self) -> Option<PipelineEvent> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_seq() {
        let geocode = Command::Geocode {
            seq: 3,
            city: "Austin".to_string(),
            state: "TX".to_string(),
        };
        let forecast = Command::Forecast {
            seq: 4,
            latitude: 30.27,
            longitude: -97.74,
        };
        assert_eq!(geocode.seq(), 3);
        assert_eq!(forecast.seq(), 4);
    }

    #[test]
    fn test_event_seq() {
        let event = PipelineEvent::Geocoded {
            seq: 9,
            result: Ok(GeocodeOutcome::NotFound),
        };
        assert_eq!(event.seq(), 9);
    }

    #[tokio::test]
    async fn test_try_recv_empty_without_commands() {
        let mut pipeline = Pipeline::new(GeocoderClient::new(), ForecastClient::new());
        assert!(pipeline.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_failed_request_reports_event() {
        // Nothing listens on port 9 on loopback, so the request fails fast
        let geocoder = GeocoderClient::with_base_url("http://127.0.0.1:9/v1/search");
        let mut pipeline = Pipeline::new(geocoder, ForecastClient::new());

        pipeline.dispatch(Command::Geocode {
            seq: 1,
            city: "Austin".to_string(),
            state: String::new(),
        });

        match pipeline.recv().await {
            Some(PipelineEvent::Geocoded { seq, result }) => {
                assert_eq!(seq, 1);
                assert!(matches!(result, Err(GeocodeError::RequestFailed(_))));
            }
            other => panic!("expected a geocoding event, got {:?}", other),
        }
    }
}
