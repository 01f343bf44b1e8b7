use log::{debug, warn};

use crate::{
    error::ApiError,
    model::{Coordinate, Slice, ViewModel},
    provider::WeatherSource,
};

/// Result of one fetch cycle: whatever succeeded, plus the error to show.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchOutcome {
    pub view: ViewModel,
    /// Message of the first failed request in `current, predict, daily` order.
    pub error: Option<String>,
    pub failed: Vec<Slice>,
}

/// Request all three slices for `at` concurrently and wait for every one of
/// them; a failure leaves its slice empty without affecting the others.
pub async fn fetch_all<S: WeatherSource + ?Sized>(source: &S, at: Coordinate) -> FetchOutcome {
    debug!("Fetching all slices for {at}");

    let (current, predict, daily) =
        tokio::join!(source.current(at), source.predict(at), source.daily(at));

    let mut outcome = FetchOutcome::default();
    outcome.view.current = settle(Slice::Current, current, &mut outcome);
    outcome.view.predict = settle(Slice::Predict, predict, &mut outcome);
    outcome.view.daily = settle(Slice::Daily, daily, &mut outcome);

    debug!(
        "Fetch for {at} settled: {} of {} slices",
        outcome.view.populated(),
        Slice::all().len()
    );
    outcome
}

fn settle<T>(slice: Slice, result: Result<T, ApiError>, outcome: &mut FetchOutcome) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{slice:?} request failed: {err}");
            outcome.failed.push(slice);
            if outcome.error.is_none() {
                outcome.error = Some(err.user_message());
            }
            None
        }
    }
}
