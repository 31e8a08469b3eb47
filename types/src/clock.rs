use chrono::{DateTime, SubsecRound, Utc};

/// Current instant at millisecond precision, the resolution stored records carry.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
