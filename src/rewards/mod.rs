//! Reward engine: token accrual and the badge threshold catalog
//!
//! Pure computation only; persistence lives in the services. Token counts
//! and amounts share the same integer minor-unit domain.

/// Tokens minted per minor unit donated
pub const TOKENS_PER_UNIT: i64 = 10;

/// Tokens earned by a donation of the given amount
pub fn tokens_for_amount(amount: i64) -> i64 {
    amount.saturating_mul(TOKENS_PER_UNIT)
}

/// A badge definition: cumulative token threshold plus display metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    pub name: &'static str,
    pub threshold: i64,
    pub description: &'static str,
    pub picture_url: &'static str,
}

/// Fallback picture for badge names outside the catalog
pub const NO_BADGE_PIC: &str = "No Badge";

/// The badge catalog, loaded once at compile time. Thresholds are cumulative
/// token totals; every qualifying badge is considered each time tokens
/// change, independent of catalog order.
pub const BADGE_CATALOG: &[BadgeSpec] = &[
    BadgeSpec {
        name: "Silver Contributor",
        threshold: 100,
        description: "The user donated 10$ in total!",
        picture_url: "https://st.depositphotos.com/1575949/1824/v/950/depositphotos_18244417-stock-illustration-silver-prize-ribbon.jpg",
    },
    BadgeSpec {
        name: "Bronze Contributor",
        threshold: 5000,
        description: "The user donated 500$ in total!",
        picture_url: "https://www.shutterstock.com/image-illustration/golden-seal-ribbons-isolated-on-600nw-1556748107.jpg",
    },
];

/// Badges whose threshold the given cumulative token total meets
pub fn badges_earned(total_tokens: i64) -> impl Iterator<Item = &'static BadgeSpec> {
    BADGE_CATALOG
        .iter()
        .filter(move |spec| total_tokens >= spec.threshold)
}

/// Picture URL for a badge name, with a fallback for unknown names
pub fn badge_picture_url(badge_name: &str) -> &'static str {
    BADGE_CATALOG
        .iter()
        .find(|spec| spec.name == badge_name)
        .map(|spec| spec.picture_url)
        .unwrap_or(NO_BADGE_PIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_for_amount() {
        assert_eq!(tokens_for_amount(1), 10);
        assert_eq!(tokens_for_amount(100), 1000);
        assert_eq!(tokens_for_amount(0), 0);
    }

    #[test]
    fn test_tokens_for_amount_saturates() {
        assert_eq!(tokens_for_amount(i64::MAX), i64::MAX);
    }

    #[test]
    fn test_no_badges_below_first_threshold() {
        assert_eq!(badges_earned(0).count(), 0);
        assert_eq!(badges_earned(99).count(), 0);
    }

    #[test]
    fn test_threshold_boundaries() {
        let at_silver: Vec<_> = badges_earned(100).map(|s| s.name).collect();
        assert_eq!(at_silver, vec!["Silver Contributor"]);

        let below_bronze: Vec<_> = badges_earned(4999).map(|s| s.name).collect();
        assert_eq!(below_bronze, vec!["Silver Contributor"]);

        let at_bronze: Vec<_> = badges_earned(5000).map(|s| s.name).collect();
        assert_eq!(at_bronze, vec!["Silver Contributor", "Bronze Contributor"]);
    }

    #[test]
    fn test_badge_picture_lookup() {
        assert!(badge_picture_url("Silver Contributor").contains("silver"));
        assert!(badge_picture_url("Bronze Contributor").contains("golden"));
        assert_eq!(badge_picture_url("Mystery Badge"), NO_BADGE_PIC);
    }

    #[test]
    fn test_catalog_thresholds_are_positive_and_distinct() {
        for spec in BADGE_CATALOG {
            assert!(spec.threshold > 0);
        }
        let names: Vec<_> = BADGE_CATALOG.iter().map(|s| s.name).collect();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped);
    }
}
