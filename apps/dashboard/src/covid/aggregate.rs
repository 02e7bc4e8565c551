//! Reduces daily record sequences into the four display numbers.
//!
//! The window offsets are positional conventions of the feed's
//! most-recent-first ordering: the newest specimen-date rows are incomplete,
//! so the local window starts one record in, while publish-date counts are
//! usable immediately. The offsets must not change or the figures drift from
//! the published dashboard values.

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::covid::client::{CovidApiClient, CovidApiError, DailyRecord};

/// The four display numbers. Recomputed wholesale on every refresh; there is
/// no partial update.
#[derive(Debug, Clone, Serialize)]
pub struct CovidSnapshot {
    pub local_seven_day_cases: i64,
    pub national_seven_day_cases: i64,
    /// Latest reported hospital occupancy; `None` if the feed had no
    /// non-null value.
    pub hospital_cases: Option<i64>,
    /// Latest reported cumulative deaths; `None` if the feed had no
    /// non-null value.
    pub total_deaths: Option<i64>,
}

/// Sum of `newCasesBySpecimenDate` over records at offsets 1..=7, skipping
/// unreported values.
pub fn local_cases_last_week(records: &[DailyRecord]) -> i64 {
    records
        .iter()
        .skip(1)
        .take(7)
        .filter_map(|r| r.new_cases_by_specimen_date)
        .sum()
}

/// Sum of `newCasesByPublishDate` over records at offsets 0..=6, skipping
/// unreported values.
pub fn national_cases_last_week(records: &[DailyRecord]) -> i64 {
    records
        .iter()
        .take(7)
        .filter_map(|r| r.new_cases_by_publish_date)
        .sum()
}

/// First non-null hospital occupancy scanning from the most recent record.
pub fn latest_hospital_cases(records: &[DailyRecord]) -> Option<i64> {
    records.iter().find_map(|r| r.hospital_cases)
}

/// First non-null cumulative death count scanning from the most recent record.
pub fn latest_total_deaths(records: &[DailyRecord]) -> Option<i64> {
    records.iter().find_map(|r| r.cum_deaths)
}

/// Queries the feed twice (local area, then nation) and reduces the results
/// to a fresh snapshot.
pub async fn fetch_snapshot(
    client: &CovidApiClient,
    config: &Config,
) -> Result<CovidSnapshot, CovidApiError> {
    let local = client
        .daily_records(&config.location, &config.location_type)
        .await?;
    let national = client.daily_records(&config.nation, "nation").await?;

    let snapshot = CovidSnapshot {
        local_seven_day_cases: local_cases_last_week(&local),
        national_seven_day_cases: national_cases_last_week(&national),
        hospital_cases: latest_hospital_cases(&national),
        total_deaths: latest_total_deaths(&national),
    };
    info!(
        "snapshot: {} local / {} national cases over 7 days",
        snapshot.local_seven_day_cases, snapshot.national_seven_day_cases
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        publish: Option<i64>,
        specimen: Option<i64>,
        deaths: Option<i64>,
        hospital: Option<i64>,
    ) -> DailyRecord {
        DailyRecord {
            date: "2021-12-08".to_string(),
            area_name: "Exeter".to_string(),
            new_cases_by_publish_date: publish,
            new_cases_by_specimen_date: specimen,
            cum_deaths: deaths,
            hospital_cases: hospital,
        }
    }

    #[test]
    fn local_sum_skips_unreported_values() {
        let records = vec![
            record(Some(93), None, None, None),
            record(Some(133), Some(21), None, None),
        ];
        assert_eq!(local_cases_last_week(&records), 21);
    }

    #[test]
    fn national_sum_skips_unreported_values() {
        let records = vec![
            record(Some(93), None, None, None),
            record(Some(133), Some(21), None, None),
        ];
        assert_eq!(national_cases_last_week(&records), 226);
    }

    #[test]
    fn local_window_excludes_most_recent_record() {
        // offset 0 carries an incomplete specimen count and must not be summed
        let mut records = vec![record(None, Some(1000), None, None)];
        records.extend((0..7).map(|_| record(None, Some(1), None, None)));
        records.push(record(None, Some(500), None, None)); // offset 8, past the window
        assert_eq!(local_cases_last_week(&records), 7);
    }

    #[test]
    fn national_window_is_the_seven_most_recent() {
        let mut records: Vec<_> = (0..7).map(|_| record(Some(10), None, None, None)).collect();
        records.push(record(Some(999), None, None, None)); // offset 7, past the window
        assert_eq!(national_cases_last_week(&records), 70);
    }

    #[test]
    fn hospital_occupancy_takes_first_non_null() {
        let records = vec![
            record(None, None, None, Some(6053)),
            record(None, None, None, Some(6027)),
        ];
        assert_eq!(latest_hospital_cases(&records), Some(6053));
    }

    #[test]
    fn deaths_scan_skips_leading_null() {
        let records = vec![
            record(None, None, None, None),
            record(None, None, Some(146_563), None),
        ];
        assert_eq!(latest_total_deaths(&records), Some(146_563));
    }

    #[test]
    fn all_null_metrics_stay_absent() {
        let records = vec![record(None, None, None, None)];
        assert_eq!(latest_hospital_cases(&records), None);
        assert_eq!(latest_total_deaths(&records), None);
    }
}
