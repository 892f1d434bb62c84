pub mod daily_stats;
pub mod geographic_stats;
pub mod referral_channel;
pub mod user;
pub mod waitlist_entry;

pub use daily_stats::Entity as DailyStatsEntity;
pub use geographic_stats::Entity as GeographicStatsEntity;
pub use referral_channel::Entity as ReferralChannelEntity;
pub use user::Entity as UserEntity;
pub use waitlist_entry::Entity as WaitlistEntryEntity;
