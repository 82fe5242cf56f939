//! Coupon handlers: listing, detail, store, and claim.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use couponhub_core::types::pagination::{PageRequest, PageResponse};
use couponhub_service::{ClaimCoupon, StoreCoupon};

use crate::dto::request::{ClaimCouponRequest, FilterCouponQuery, StoreCouponRequest};
use crate::dto::response::{ApiResponse, CouponDetailResponse, CouponResponse, MessageResponse};
use crate::error::ApiResult;
use crate::handlers::validate;
use crate::state::AppState;

/// GET /api/coupons
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<FilterCouponQuery>,
) -> ApiResult<Json<ApiResponse<PageResponse<CouponResponse>>>> {
    let page = PageRequest::new(query.page.unwrap_or(1), query.page_size.unwrap_or(25));

    let coupons = state
        .coupon_service
        .filter(query.search.as_deref(), &page)
        .await?;

    Ok(Json(ApiResponse::ok(coupons.map(CouponResponse::from))))
}

/// GET /api/coupons/{name}
pub async fn get_coupon(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ApiResponse<CouponDetailResponse>>> {
    let detail = state.coupon_service.detail(&name).await?;
    Ok(Json(ApiResponse::ok(detail.into())))
}

/// POST /api/coupons
pub async fn store_coupon(
    State(state): State<AppState>,
    Json(input): Json<StoreCouponRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CouponResponse>>)> {
    validate(&input)?;

    let coupon = state
        .coupon_service
        .store(&StoreCoupon {
            coupon_name: input.coupon_name,
            amount: input.amount,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(coupon.into()))))
}

/// POST /api/coupons/claim
pub async fn claim_coupon(
    State(state): State<AppState>,
    Json(input): Json<ClaimCouponRequest>,
) -> ApiResult<Json<ApiResponse<MessageResponse>>> {
    validate(&input)?;

    state
        .claim_service
        .claim(&ClaimCoupon {
            username: input.username.clone(),
            coupon_name: input.coupon_name.clone(),
        })
        .await?;

    Ok(Json(ApiResponse::ok(MessageResponse {
        message: format!(
            "Coupon {} is successfully claimed by user {}.",
            input.coupon_name, input.username
        ),
    })))
}
