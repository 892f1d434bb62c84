mod auth;
mod rate_limit;
mod request_id;

pub use auth::{API_KEY_HEADER, ApiKeyAuth};
pub use rate_limit::{ClientIpKeyExtractor, public_rate_limiter};
pub use request_id::{RequestId, RequestIdMiddleware};
