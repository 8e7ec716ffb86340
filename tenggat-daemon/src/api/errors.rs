use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use std::fmt::{Debug, Display};
use tenggat_types::ErrorBody;

#[derive(Debug, Default)]
pub enum ApiErrorKind {
    #[default]
    Internal,
    NotFound,
    BadRequest,
}

impl Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Internal => "Internal Server Error",
                Self::NotFound => "Not Found",
                Self::BadRequest => "Bad Request",
            }
        )
    }
}

impl ApiErrorKind {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
        }
    }
}

pub struct ApiError {
    pub inner: anyhow::Error,
    pub kind: ApiErrorKind,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, inner: anyhow::Error) -> Self {
        Self { inner, kind }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.inner)
    }
}

impl Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.kind, self.inner)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: format!("{:#}", self.inner),
        };
        (self.kind.status_code(), Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::new(ApiErrorKind::default(), value)
    }
}

pub type ApiResult<T> = Result<(StatusCode, Json<T>), ApiError>;
