use depot_core::{LastService, Result, ServiceRecord, Tier};

/// Most recent last-performed date across all tiers.
///
/// On equal dates the higher tier wins: a high-caliber and a low-caliber
/// service on the same day is reported as the high-caliber one. Returns
/// `None` when no tier has ever been performed.
pub fn recompute_last_service(record: &ServiceRecord) -> Result<Option<LastService>> {
    record.check_pairing()?;

    let mut best: Option<LastService> = None;
    for tier in Tier::ALL {
        let Some(date) = record.last_performed(tier) else {
            continue;
        };
        // Tiers ascend, so `>=` hands ties to the later (higher) tier.
        if best.map_or(true, |b| date >= b.date) {
            best = Some(LastService { date, tier });
        }
    }
    Ok(best)
}
