//! Coupon use cases: administration, lookup, and the claim protocol.

pub mod claim;
pub mod name;
pub mod resync;
pub mod service;

pub use claim::{ClaimCoupon, ClaimService};
pub use resync::StockReconciler;
pub use service::{CouponDetail, CouponService, StoreCoupon};
