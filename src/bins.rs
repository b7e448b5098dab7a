use chrono::{Datelike, Duration, NaiveDate};

/// Anchor for the fortnightly recycling/landfill rotation (a recycling week).
pub fn initial_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 4).expect("valid calendar date")
}

/// Anchor for the 28-day glass cycle.
pub fn glass_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 18).expect("valid calendar date")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinCategory {
    Organics,
    Recycling,
    Landfill,
    Glass,
}

impl BinCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinCategory::Organics => "Organics (Green Lid)",
            BinCategory::Recycling => "Recycling (Yellow Lid)",
            BinCategory::Landfill => "Landfill (Red Lid)",
            BinCategory::Glass => "Glass (Purple Lid)",
        }
    }
}

impl std::fmt::Display for BinCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The Tuesday a bin computation targets.
///
/// Weekday numbering is Monday=0..Sunday=6. The upcoming Tuesday is
/// `today + ((1 - weekday) mod 7)` days (today itself on a Tuesday); when
/// `for_next_week` is set, or today is already past Tuesday, the target
/// skips one further week.
pub fn collection_tuesday(today: NaiveDate, for_next_week: bool) -> NaiveDate {
    let weekday = i64::from(today.weekday().num_days_from_monday());
    let mut target = today + Duration::days((1 - weekday).rem_euclid(7));
    if for_next_week || weekday > 1 {
        target += Duration::days(7);
    }
    target
}

/// Which bins go out for the collection targeted from `reference_today`.
///
/// Organics goes out every week. Recycling and landfill alternate
/// fortnightly against `initial_date` (exactly one of the two each week).
/// Glass runs on an independent 28-day cycle against `glass_start_date`.
/// Euclidean remainders keep the arithmetic consistent for dates before
/// either anchor. Returned in fixed order.
pub fn determine_bins(reference_today: NaiveDate, for_next_week: bool) -> Vec<BinCategory> {
    let target_day = collection_tuesday(reference_today, for_next_week);

    let days_since_initial = (target_day - initial_date()).num_days();
    let days_since_glass_start = (target_day - glass_start_date()).num_days();
    let week_num = days_since_initial.div_euclid(7);

    let recycling = week_num.rem_euclid(2) == 0;
    let glass = days_since_glass_start.rem_euclid(28) == 0;

    let mut bins_out = vec![BinCategory::Organics];
    if recycling {
        bins_out.push(BinCategory::Recycling);
    } else {
        bins_out.push(BinCategory::Landfill);
    }
    if glass {
        bins_out.push(BinCategory::Glass);
    }
    bins_out
}
