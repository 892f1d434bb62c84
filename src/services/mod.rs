pub mod analytics_service;
pub mod chat_service;
pub mod waitlist_service;

pub use analytics_service::{
    AnalyticsService, ChannelStats, DailyStats, ExportDataset, OverviewData, RegionStats,
    TopReferrer,
};
pub use chat_service::ChatService;
pub use waitlist_service::{CreateEntryRequest, ReferralLookup, WaitlistService};
