//! Time-bounded mail delivery.

use crate::notification::{
    domain::OutgoingMail,
    ports::{MailTransport, MailTransportError, MailTransportResult},
};
use std::time::Duration;

/// Sends `mail` through `transport`, giving up after `limit`.
///
/// # Errors
///
/// Returns the transport's error, or [`MailTransportError::TimedOut`] when
/// the attempt does not finish in time.
pub async fn deliver_with_timeout<M>(
    transport: &M,
    mail: &OutgoingMail,
    limit: Duration,
) -> MailTransportResult<()>
where
    M: MailTransport + ?Sized,
{
    tokio::time::timeout(limit, transport.send(mail))
        .await
        .map_err(|_| MailTransportError::TimedOut(limit))?
}
