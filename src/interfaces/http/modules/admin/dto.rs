//! Admin request DTOs

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::{VillaImage, VillaInput};
use crate::interfaces::http::common::validated_json::validation_message;
use crate::interfaces::http::common::ApiResponse;

/// Largest accepted villa form, image included
pub const MAX_VILLA_FORM_BYTES: usize = 10 * 1024 * 1024;

/// `multipart/form-data` body for creating or updating a villa
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct VillaUpload {
    /// `VillaInput` encoded as JSON
    #[schema(
        example = r#"{"title":"Forest lodge","city":"Masuleh","address":"Hill path 4","base_capacity":2,"maximum_capacity":5,"area":140.0,"bed_count":2,"base_price_per_night":800000,"extra_person_price":150000}"#
    )]
    villa: String,
    /// Villa picture. Required on create; on update the current images are
    /// kept when omitted.
    #[schema(value_type = Option<String>, format = Binary)]
    image: Option<Vec<u8>>,
}

/// Extracts a `villa` JSON field and an optional `image` file from a
/// multipart body.
///
/// Malformed forms and unparseable `villa` JSON are rejected with 400,
/// attributes that parse but fail validation with 422.
#[derive(Debug)]
pub struct VillaForm {
    pub input: VillaInput,
    pub image: Option<VillaImage>,
}

fn reject(status: StatusCode, message: String) -> Response {
    (status, Json(ApiResponse::<()>::error(message))).into_response()
}

impl<S> FromRequest<S> for VillaForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| reject(e.status(), format!("Invalid form: {}", e.body_text())))?;

        let mut villa = None;
        let mut image = None;
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| reject(e.status(), format!("Invalid form: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "villa" => {
                    let text = field.text().await.map_err(|e| {
                        reject(e.status(), format!("Invalid form: {}", e.body_text()))
                    })?;
                    villa = Some(text);
                }
                "image" => {
                    let file_name = field.file_name().unwrap_or("image").to_string();
                    let content_type = field.content_type().map(String::from);
                    let bytes = field.bytes().await.map_err(|e| {
                        reject(e.status(), format!("Invalid form: {}", e.body_text()))
                    })?;
                    // browsers send an empty part when no file was chosen
                    if !bytes.is_empty() {
                        image = Some(VillaImage {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        let villa = villa.ok_or_else(|| {
            reject(StatusCode::BAD_REQUEST, "Missing 'villa' form field".into())
        })?;
        let input: VillaInput = serde_json::from_str(&villa).map_err(|e| {
            reject(StatusCode::BAD_REQUEST, format!("Invalid villa JSON: {}", e))
        })?;
        input
            .validate()
            .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, validation_message(&e)))?;

        Ok(Self { input, image })
    }
}
