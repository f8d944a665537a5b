use crate::model::bucket::Bucket;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Ascending by date, with the backup each bucket ended up holding.
    pub buckets: Vec<Bucket>,
    /// Backups no bucket accepted, newest first.
    pub unmatched: Vec<NaiveDateTime>,
}

impl MatchResult {
    pub fn filled_count(&self) -> usize {
        self.buckets.iter().filter(|bucket| bucket.is_filled()).count()
    }

    pub fn newest(&self) -> Option<&Bucket> {
        self.buckets.last()
    }

    pub fn newest_is_unfilled(&self) -> bool {
        self.newest().is_some_and(|bucket| !bucket.is_filled())
    }
}

/// Assigns backups to buckets.
///
/// Backups are taken newest first. Each one goes to the newest bucket dated
/// at or before it that is empty or holds a strictly older backup; a
/// displaced backup is placed again the same way. Backups left without a
/// bucket are unmatched. Backups already assigned in `buckets` take part as
/// incumbents.
pub fn match_backups(buckets: &[Bucket], backups: &[NaiveDateTime]) -> MatchResult {
    let mut slots = buckets.to_vec();
    slots.sort_by_key(|bucket| bucket.date);

    let mut pending = backups.to_vec();
    pending.sort_unstable_by(|a, b| b.cmp(a));

    let mut unmatched = Vec::new();
    for backup in pending {
        let mut candidate = Some(backup);
        while let Some(current) = candidate {
            let slot = slots.iter_mut().rev().find(|slot| {
                slot.date <= current && slot.backup.is_none_or(|incumbent| incumbent < current)
            });
            candidate = match slot {
                Some(slot) => slot.backup.replace(current),
                None => {
                    unmatched.push(current);
                    None
                }
            };
        }
    }
    unmatched.sort_unstable_by(|a, b| b.cmp(a));

    MatchResult {
        buckets: slots,
        unmatched,
    }
}
