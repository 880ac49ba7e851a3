//! One operation group per backend resource.
//!
//! Groups borrow the [`super::ApiClient`] and are pure pass-throughs: they
//! fill in the descriptor and request parts and hand back the decoded body.
//! Only `auth` returns typed values, since the session manager depends on it.

mod auth;
mod dashboard;
mod leases;
mod maintenance;
mod messages;
mod payments;
mod properties;
mod units;
mod users;

pub use self::auth::Auth;
pub use self::dashboard::{Dashboard, DashboardOverview};
pub use self::leases::{DOCUMENT_FIELD, Leases};
pub use self::maintenance::{MAX_RATING, MIN_RATING, Maintenance, PHOTO_FIELD};
pub use self::messages::{ATTACHMENT_FIELD, Messages};
pub use self::payments::Payments;
pub use self::properties::Properties;
pub use self::units::Units;
pub use self::users::Users;
