use anyhow::anyhow;

use shelf_domain::id::SequenceId;
use shelf_domain::kind::EntityKind;

use crate::domain::repository::SequencePort;
use crate::error::CatalogError;

/// Allocate the next id of type `I`.
///
/// Call only after every validation for the record has passed: a value handed
/// out here is consumed even if the insert that follows never happens.
pub async fn next_id<I, S>(sequence: &S) -> Result<I, CatalogError>
where
    I: SequenceId,
    S: SequencePort,
{
    let seq = sequence.next(I::KIND).await?;
    if seq == 0 {
        // Counters start at 0 and are incremented before being returned.
        return Err(anyhow!("{} counter returned 0 after increment", I::KIND).into());
    }
    tracing::debug!(kind = %I::KIND, seq, "allocated id");
    Ok(I::from_seq(seq))
}

// ── CurrentSequence ──────────────────────────────────────────────────────────

pub struct CurrentSequenceUseCase<S: SequencePort> {
    pub sequence: S,
}

impl<S: SequencePort> CurrentSequenceUseCase<S> {
    /// Current counter value for every kind, in `EntityKind::ALL` order.
    pub async fn execute(&self) -> Result<Vec<(EntityKind, u64)>, CatalogError> {
        let mut out = Vec::with_capacity(EntityKind::ALL.len());
        for kind in EntityKind::ALL {
            out.push((kind, self.sequence.current(kind).await?));
        }
        Ok(out)
    }
}
