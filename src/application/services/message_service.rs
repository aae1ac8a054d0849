//! Channel-level message operations

use crate::application::errors::BotError;
use crate::domain::traits::Messageable;

/// Delete up to `limit` recent messages from a channel.
///
/// A message the platform already reports as gone counts as deleted; any
/// other failure is re-raised to the caller.
pub async fn purge(channel: &dyn Messageable, limit: usize) -> Result<usize, BotError> {
    let handles = channel.recent(limit).await?;
    let mut deleted = 0;

    for handle in &handles {
        match channel.delete(handle).await {
            Ok(()) => deleted += 1,
            Err(err) if err.is_not_found() => deleted += 1,
            Err(err) => return Err(err),
        }
    }

    Ok(deleted)
}
