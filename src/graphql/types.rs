//! GraphQL 对象与输入类型

use async_graphql::{
    ComplexObject, InputObject, InputValueError, InputValueResult, Scalar, ScalarType,
    SimpleObject, Value, ID,
};
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

use crate::handlers::assets::QR_CODES_MOUNT;
use crate::models::{BookingRecord, FeedbackRecord, NewBooking, NewFeedback, RouteRecord};
use crate::services::routes::RoutePage;

/// `Date` 标量：输出 RFC 3339，输入接受 RFC 3339 字符串或毫秒时间戳
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(pub DateTime<Utc>);

#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        if let Value::String(raw) = &value {
            return DateTime::parse_from_rfc3339(raw)
                .map(|parsed| Date(parsed.with_timezone(&Utc)))
                .map_err(InputValueError::custom);
        }
        if let Value::Number(number) = &value {
            return number
                .as_i64()
                .and_then(|millis| Utc.timestamp_millis_opt(millis).single())
                .map(Date)
                .ok_or_else(|| InputValueError::custom("timestamp out of range"));
        }
        Err(InputValueError::expected_type(value))
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<DateTime<Utc>> for Date {
    fn from(value: DateTime<Utc>) -> Self {
        Date(value)
    }
}

// ===== 反馈 =====

#[derive(SimpleObject, Debug, Clone)]
pub struct Feedback {
    pub id: ID,
    pub reason: String,
    pub reply_to: String,
    pub message: String,
    pub created_at: Date,
    pub updated_at: Date,
}

impl From<FeedbackRecord> for Feedback {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: ID(record.id),
            reason: record.reason,
            reply_to: record.reply_to,
            message: record.message,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateFeedbackInput {
    pub reason: String,
    pub reply_to: String,
    pub message: String,
}

impl From<CreateFeedbackInput> for NewFeedback {
    fn from(input: CreateFeedbackInput) -> Self {
        Self {
            reason: input.reason,
            reply_to: input.reply_to,
            message: input.message,
        }
    }
}

// ===== 路线 =====

/// 路线；前端的 “Route” 即分页结果中的单个节点
#[derive(SimpleObject, Debug, Clone)]
#[graphql(complex)]
pub struct Route {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: Date,
    pub updated_at: Date,
}

#[ComplexObject]
impl Route {
    /// 二维码图片的访问路径
    async fn qr_code_url(&self) -> Option<String> {
        self.qr_code
            .as_ref()
            .map(|file| format!("{}/{}", QR_CODES_MOUNT, file))
    }
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        Self {
            id: ID(record.id),
            title: record.title,
            description: record.description,
            qr_code: record.qr_code,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

/// 无限滚动分页结果
#[derive(SimpleObject, Debug)]
pub struct RoutesPage {
    pub routes: Vec<Route>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl From<RoutePage> for RoutesPage {
    fn from(page: RoutePage) -> Self {
        let has_more = page.has_more();
        Self {
            routes: page.routes.into_iter().map(Route::from).collect(),
            next_cursor: page.next_cursor,
            has_more,
        }
    }
}

// ===== 预约 =====

#[derive(SimpleObject, Debug, Clone)]
pub struct Booking {
    pub id: ID,
    pub route_id: ID,
    pub user_id: ID,
    pub date: Date,
    pub guests: i32,
    pub comment: Option<String>,
    pub created_at: Date,
    pub updated_at: Date,
}

impl From<BookingRecord> for Booking {
    fn from(record: BookingRecord) -> Self {
        Self {
            id: ID(record.id),
            route_id: ID(record.route_id),
            user_id: ID(record.user_id),
            date: record.date.into(),
            guests: i32::try_from(record.guests).unwrap_or(i32::MAX),
            comment: record.comment,
            created_at: record.created_at.into(),
            updated_at: record.updated_at.into(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateBookingInput {
    pub route_id: ID,
    pub date: Date,
    pub guests: i32,
    pub comment: Option<String>,
}

impl From<CreateBookingInput> for NewBooking {
    fn from(input: CreateBookingInput) -> Self {
        Self {
            route_id: input.route_id.0,
            date: input.date.0,
            guests: i64::from(input.guests),
            comment: input.comment,
        }
    }
}
