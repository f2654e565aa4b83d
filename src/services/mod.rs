//! Business logic services for the PalHope backend

pub mod aggregate;
pub mod badges;
pub mod campaigns;
pub mod donations;
pub mod leaderboard;
pub mod sub_campaigns;
pub mod users;

pub use badges::BadgeService;
pub use campaigns::CampaignService;
pub use donations::DonationService;
pub use leaderboard::LeaderboardService;
pub use sub_campaigns::SubCampaignService;
pub use users::UserService;
