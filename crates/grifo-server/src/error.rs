use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grifo_core::error::GrifoError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<GrifoError>() {
            match e {
                GrifoError::NotInitialized => StatusCode::BAD_REQUEST,
                GrifoError::ObraNotFound(_)
                | GrifoError::WeekNotFound(_)
                | GrifoError::TaskNotFound(_)
                | GrifoError::PlaybookNotFound(_)
                | GrifoError::ChecklistNotFound(_)
                | GrifoError::ChecklistItemNotFound(_)
                | GrifoError::AgendaEventNotFound(_)
                | GrifoError::PartnerNotFound(_)
                | GrifoError::ProfileNotFound(_) => StatusCode::NOT_FOUND,
                GrifoError::ObraExists(_)
                | GrifoError::WeekExists(_)
                | GrifoError::PartnerExists(_) => StatusCode::CONFLICT,
                GrifoError::InvalidSlug(_)
                | GrifoError::InvalidWeek(_)
                | GrifoError::InvalidWeekday(_)
                | GrifoError::InvalidDayStatus(_)
                | GrifoError::InvalidPlaybookLevel(_)
                | GrifoError::InvalidCoefficient(_)
                | GrifoError::InvalidCategory(_)
                | GrifoError::InvalidRating(_)
                | GrifoError::InvalidDate(_) => StatusCode::BAD_REQUEST,
                GrifoError::DayNotPlanned { .. }
                | GrifoError::MissingCause
                | GrifoError::PlaybookImport { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                GrifoError::Io(_) | GrifoError::Yaml(_) | GrifoError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn obra_not_found_maps_to_404() {
        let err = AppError(GrifoError::ObraNotFound("torre".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn week_not_found_maps_to_404() {
        let err = AppError(GrifoError::WeekNotFound("torre/2026-W35".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn obra_exists_maps_to_409() {
        let err = AppError(GrifoError::ObraExists("torre".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn invalid_slug_maps_to_400() {
        let err = AppError(GrifoError::InvalidSlug("BAD SLUG".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_week_maps_to_400() {
        let err = AppError(GrifoError::InvalidWeek("2026-W99".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn day_not_planned_maps_to_422() {
        let err = AppError(
            GrifoError::DayNotPlanned {
                task: "T1".into(),
                day: "sun".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_cause_maps_to_422() {
        let err = AppError(GrifoError::MissingCause.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn playbook_import_maps_to_422() {
        let err = AppError(
            GrifoError::PlaybookImport {
                line: 3,
                reason: "invalid quantity".into(),
            }
            .into(),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn not_initialized_maps_to_400() {
        let err = AppError(GrifoError::NotInitialized.into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(GrifoError::Io(io_err).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_grifo_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json() {
        let err = AppError(GrifoError::ObraNotFound("torre".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
