//! Ordered fetch pipeline: current conditions first, then the daily and
//! hourly forecasts for the city the provider echoed back.
//!
//! Results travel back to the UI loop over a channel, tagged with the
//! generation of the search that produced them. Starting a new search aborts
//! the previous pipeline and bumps the generation, so any result already in
//! the channel from the old one can be recognized as stale and dropped.

use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::locate::{Coords, LocateError};
use crate::openweather::{FetchError, Query, WeatherClient};
use crate::weather::{ForecastEntry, WeatherSnapshot};

/// Identifies one search. Higher is newer.
pub type Generation = u64;

/// Result messages sent to the UI loop
#[derive(Debug)]
pub enum Update {
    Current {
        generation: Generation,
        result: Result<WeatherSnapshot, FetchError>,
    },
    Daily {
        generation: Generation,
        result: Result<Vec<ForecastEntry>, FetchError>,
    },
    Hourly {
        generation: Generation,
        result: Result<Vec<ForecastEntry>, FetchError>,
    },
    /// A location lookup, tagged with the generation current when it was
    /// asked for. A search started meanwhile makes it stale.
    Located {
        generation: Generation,
        result: Result<Coords, LocateError>,
    },
}

impl Update {
    pub fn generation(&self) -> Generation {
        match self {
            Update::Current { generation, .. }
            | Update::Daily { generation, .. }
            | Update::Hourly { generation, .. }
            | Update::Located { generation, .. } => *generation,
        }
    }
}

pub struct Fetcher {
    client: WeatherClient,
    tx: mpsc::UnboundedSender<Update>,
    generation: Generation,
    in_flight: Option<AbortHandle>,
}

impl Fetcher {
    pub fn new(client: WeatherClient, tx: mpsc::UnboundedSender<Update>) -> Self {
        Self {
            client,
            tx,
            generation: 0,
            in_flight: None,
        }
    }

    /// Generation of the most recent search. Location lookups are tagged
    /// with it.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether an update belongs to the most recent search
    pub fn is_current(&self, update: &Update) -> bool {
        update.generation() == self.generation
    }

    /// Start a search, cancelling whatever pipeline is still running
    pub fn search(&mut self, query: Query) -> Generation {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        info!(%query, generation, "Starting weather search");

        let client = self.client.clone();
        let tx = self.tx.clone();
        let handle = tokio::spawn(run(client, query, generation, tx));
        self.in_flight = Some(handle.abort_handle());
        generation
    }

    /// Abort the in-flight pipeline, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!(generation = self.generation, "Cancelling weather search");
            }
            handle.abort();
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run(
    client: WeatherClient,
    query: Query,
    generation: Generation,
    tx: mpsc::UnboundedSender<Update>,
) {
    let result = client.current(&query).await;
    let city = result.as_ref().ok().map(|snapshot| snapshot.city.clone());
    // Receiver gone means the app is shutting down
    if tx.send(Update::Current { generation, result }).is_err() {
        return;
    }
    let Some(city) = city else {
        return;
    };

    let daily = async {
        let result = client.forecast(&city).await;
        let _ = tx.send(Update::Daily { generation, result });
    };
    let hourly = async {
        let result = client.forecast(&city).await;
        let _ = tx.send(Update::Hourly { generation, result });
    };
    tokio::join!(daily, hourly);
}
