use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{PlaneError, TransportError};

/// Drive a transport call until it finishes, `token` fires, or `limit`
/// elapses. The latter two drop the in-flight future and report
/// [`PlaneError::Cancelled`].
pub(crate) async fn run_cancellable<T, F>(
    token: &CancellationToken,
    limit: Option<Duration>,
    call: F,
) -> Result<T, PlaneError>
where
    F: Future<Output = Result<T, TransportError>>,
{
    let bounded = async {
        match limit {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result.map_err(PlaneError::from),
                Err(_) => Err(PlaneError::Cancelled),
            },
            None => call.await.map_err(PlaneError::from),
        }
    };

    tokio::select! {
        biased;
        () = token.cancelled() => Err(PlaneError::Cancelled),
        result = bounded => result,
    }
}
