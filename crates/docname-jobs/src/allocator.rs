//! Activity counter seeding and agenda planning
//!
//! A run starts from the highest number the store already knows for the
//! meeting's year, one lookup per track and purpose. From then on the
//! counters live in memory only.
//!
//! [`plan_agenda`] decides the number of every agenda item. The preview and
//! the commit flow both go through it, so they hand out the same numbers for
//! the same store state.

use crate::error::JobError;
use docname_core::{
    append_ratification, AgendaId, Agendaitem, CounterState, Meeting, Piece, PieceId, Purpose,
    Track,
};
use docname_store::DocumentStore;

/// Seed the counters for a meeting's year
///
/// # Errors
/// - `JobError::MissingPlannedStart` when the meeting has no date
/// - `JobError::Store` when a lookup fails
pub async fn seed_counters(
    store: &dyn DocumentStore,
    meeting: &Meeting,
) -> Result<CounterState, JobError> {
    let year = meeting
        .year()
        .ok_or_else(|| JobError::MissingPlannedStart(meeting.id.clone()))?;

    let mut seeds = Vec::with_capacity(Track::ALL.len() * Purpose::ALL.len());
    for track in Track::ALL {
        for purpose in Purpose::ALL {
            let max = store
                .max_activity_number(year, purpose, track)
                .await?
                .unwrap_or(0);
            tracing::debug!(year, %track, %purpose, max, "seeded activity counter");
            seeds.push((track, purpose, max));
        }
    }
    Ok(CounterState::seeded(year, seeds))
}

/// Numbering decided for one agenda item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPlan {
    /// The agenda item as stored
    pub item: Agendaitem,
    /// Purpose of its documents
    pub purpose: Purpose,
    /// Pieces in position order, ratification last
    pub pieces: Vec<Piece>,
    /// Ratification piece and the position it was given
    pub ratification: Option<(PieceId, u32)>,
    /// Stored number, or the one allocated in this plan
    pub activity_number: Option<u32>,
}

impl ItemPlan {
    /// Number allocated by this plan and not yet stored on the item
    #[inline]
    #[must_use]
    pub fn allocates_number(&self) -> bool {
        self.item.activity_number.is_none() && self.activity_number.is_some()
    }
}

/// Fetch an agenda's items with their pieces and decide their numbers
///
/// Numbers already carried by items of the agenda are accounted for first.
/// Then, in position order, every item without a number that still has an
/// unnamed piece gets the next one. Without counters nothing is allocated.
///
/// # Errors
/// `JobError::Store` when a read fails
pub async fn plan_agenda(
    store: &dyn DocumentStore,
    meeting: &Meeting,
    agenda: &AgendaId,
    mut counters: Option<&mut CounterState>,
) -> Result<Vec<ItemPlan>, JobError> {
    let items = store.fetch_sorted_agendaitems(agenda).await?;
    if let Some(counters) = counters.as_deref_mut() {
        for item in &items {
            if let Some(number) = item.activity_number {
                counters.observe(meeting.track, item.purpose(), number);
            }
        }
    }

    let mut plan = Vec::with_capacity(items.len());
    for item in items {
        let purpose = item.purpose();
        let mut pieces = store.fetch_pieces(&item.id).await?;
        let mut ratification = None;
        if purpose.has_ratification() {
            if let Some(piece) = store.fetch_ratification(&item.id).await? {
                let id = piece.id.clone();
                ratification = Some((id, append_ratification(&mut pieces, piece)));
            }
        }

        let needs_number = pieces.iter().any(|p| !p.is_named());
        let activity_number = match (counters.as_deref_mut(), item.activity_number) {
            (_, Some(existing)) => Some(existing),
            (Some(counters), None) if needs_number => {
                let number = counters.allocate(meeting.track, purpose);
                tracing::debug!(agendaitem = %item.id, number, %purpose, "planned activity number");
                Some(number)
            }
            _ => None,
        };

        plan.push(ItemPlan {
            item,
            purpose,
            pieces,
            ratification,
            activity_number,
        });
    }
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use docname_core::{Agenda, AgendaitemType, SubcaseType};
    use docname_store::{InMemoryStore, PieceRecord, Snapshot};

    #[tokio::test]
    async fn seeds_from_history() {
        let store = InMemoryStore::from_snapshot(
            Snapshot::new()
                .with_history(2024, Track::Regular, Purpose::Document, 11)
                .with_history(2024, Track::Special, Purpose::Decree, 3)
                .with_history(2023, Track::Regular, Purpose::Document, 99),
        );
        let meeting = Meeting::new("m1", Track::Regular, NaiveDate::from_ymd_opt(2024, 5, 1));

        let mut counters = seed_counters(&store, &meeting).await.unwrap();
        assert_eq!(counters.year(), 2024);
        assert_eq!(counters.allocate(Track::Regular, Purpose::Document), 12);
        assert_eq!(counters.allocate(Track::Special, Purpose::Decree), 4);
        assert_eq!(counters.allocate(Track::Regular, Purpose::Announcement), 1);
    }

    #[tokio::test]
    async fn missing_planned_start_is_fatal() {
        let store = InMemoryStore::new();
        let meeting = Meeting::new("m1", Track::Regular, None);
        assert!(matches!(
            seed_counters(&store, &meeting).await,
            Err(JobError::MissingPlannedStart(_))
        ));
    }

    #[tokio::test]
    async fn numbers_on_the_agenda_are_not_handed_out_again() {
        let store = InMemoryStore::from_snapshot(
            Snapshot::new()
                .with_meeting(Meeting::new("m1", Track::Regular, NaiveDate::from_ymd_opt(2024, 5, 1)))
                .with_agenda(Agenda::new("a1", "m1"))
                .with_agendaitem(
                    "a1",
                    Agendaitem::new("i1", 1, AgendaitemType::Note, SubcaseType::Other).formally_ok(),
                )
                .with_agendaitem(
                    "a1",
                    Agendaitem::new("i2", 2, AgendaitemType::Note, SubcaseType::Other)
                        .with_activity_number(5)
                        .formally_ok(),
                )
                .with_piece(PieceRecord::new("i1", Piece::new("p1", "First", 1)))
                .with_piece(PieceRecord::new("i2", Piece::new("p2", "Second", 1)))
                .with_history(2024, Track::Regular, Purpose::Document, 2),
        );
        let meeting = store.fetch_meeting(&"m1".into()).await.unwrap().unwrap();
        let mut counters = seed_counters(&store, &meeting).await.unwrap();

        let plan = plan_agenda(&store, &meeting, &"a1".into(), Some(&mut counters))
            .await
            .unwrap();
        let numbers: Vec<_> = plan.iter().map(|p| p.activity_number).collect();
        assert_eq!(numbers, vec![Some(6), Some(5)]);
        assert!(plan[0].allocates_number());
        assert!(!plan[1].allocates_number());
    }

    #[tokio::test]
    async fn plan_without_counters_allocates_nothing() {
        let store = InMemoryStore::from_snapshot(
            Snapshot::new()
                .with_agendaitem(
                    "a1",
                    Agendaitem::new("i1", 1, AgendaitemType::Communication, SubcaseType::Other)
                        .formally_ok(),
                )
                .with_piece(PieceRecord::new("i1", Piece::new("p1", "First", 1))),
        );
        let meeting = Meeting::new("m1", Track::Regular, None);
        let plan = plan_agenda(&store, &meeting, &"a1".into(), None).await.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].activity_number, None);
        assert_eq!(plan[0].purpose, Purpose::Announcement);
    }
}
