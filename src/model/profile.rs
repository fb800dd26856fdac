//! Clock-hour charging profile derived from a charging window.

use super::reference::HOURS_PER_DAY;

/// Which clock hours belong to the charging window, and the share of
/// daily energy drawn in each.
///
/// Energy is spread uniformly over the flagged hours; no intra-window
/// demand curve is modelled.
///
/// # Examples
///
/// ```
/// use ev_fleet_model::model::profile::HourlyProfile;
///
/// let p = HourlyProfile::from_window(22, 6);
/// assert_eq!(p.flagged_hours(), 8);
/// assert!(p.is_flagged(23) && p.is_flagged(0) && !p.is_flagged(6));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile {
    flags: [u8; HOURS_PER_DAY],
    shares: [f64; HOURS_PER_DAY],
}

impl HourlyProfile {
    /// Builds the profile for a window opening at `start_hour` and closing
    /// at `end_hour` (exclusive).
    ///
    /// Hours are taken modulo 24. A window with `start > end` wraps past
    /// midnight; `start == end` covers the full day.
    pub fn from_window(start_hour: usize, end_hour: usize) -> Self {
        let start = start_hour % HOURS_PER_DAY;
        let end = end_hour % HOURS_PER_DAY;

        let mut flags = [0u8; HOURS_PER_DAY];
        for (h, flag) in flags.iter_mut().enumerate() {
            let inside = if start < end {
                (start..end).contains(&h)
            } else if start > end {
                h >= start || h < end
            } else {
                true
            };
            *flag = u8::from(inside);
        }

        let total: u32 = flags.iter().map(|&f| u32::from(f)).sum();
        let mut shares = [0.0; HOURS_PER_DAY];
        if total > 0 {
            let weight = 1.0 / f64::from(total);
            for (share, &flag) in shares.iter_mut().zip(&flags) {
                if flag == 1 {
                    *share = weight;
                }
            }
        }

        Self { flags, shares }
    }

    /// 0/1 membership of each clock hour.
    pub fn flags(&self) -> &[u8; HOURS_PER_DAY] {
        &self.flags
    }

    /// Share of daily energy drawn in each clock hour.
    pub fn shares(&self) -> &[f64; HOURS_PER_DAY] {
        &self.shares
    }

    pub fn is_flagged(&self, hour: usize) -> bool {
        self.flags.get(hour).is_some_and(|&f| f == 1)
    }

    /// Number of clock hours inside the window.
    pub fn flagged_hours(&self) -> u32 {
        self.flags.iter().map(|&f| u32::from(f)).sum()
    }

    /// Share-weighted average of an hourly curve.
    pub fn weighted(&self, curve: &[f64; HOURS_PER_DAY]) -> f64 {
        curve.iter().zip(&self.shares).map(|(v, s)| v * s).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn share_sum(p: &HourlyProfile) -> f64 {
        p.shares().iter().sum()
    }

    #[test]
    fn daytime_window() {
        let p = HourlyProfile::from_window(6, 20);
        assert_eq!(p.flagged_hours(), 14);
        for h in 0..24 {
            if (6..20).contains(&h) {
                assert!((p.shares()[h] - 1.0 / 14.0).abs() < 1e-12);
            } else {
                assert_eq!(p.shares()[h], 0.0);
            }
        }
    }

    #[test]
    fn wrapping_window() {
        let p = HourlyProfile::from_window(20, 4);
        assert_eq!(p.flagged_hours(), 8);
        assert!(p.is_flagged(20) && p.is_flagged(3));
        assert!(!p.is_flagged(4) && !p.is_flagged(19));
    }

    #[test]
    fn equal_hours_is_full_day() {
        for h in 0..24 {
            let p = HourlyProfile::from_window(h, h);
            assert_eq!(p.flagged_hours(), 24);
            assert!(p.shares().iter().all(|&s| (s - 1.0 / 24.0).abs() < 1e-12));
        }
    }

    #[test]
    fn shares_sum_to_one_for_every_window() {
        for start in 0..24 {
            for end in 0..24 {
                let p = HourlyProfile::from_window(start, end);
                assert!(p.flagged_hours() > 0);
                assert!(
                    (share_sum(&p) - 1.0).abs() < 1e-9,
                    "window {start}->{end} sums to {}",
                    share_sum(&p)
                );
            }
        }
    }

    #[test]
    fn out_of_range_hours_wrap() {
        assert_eq!(
            HourlyProfile::from_window(30, 44),
            HourlyProfile::from_window(6, 20)
        );
    }
}
