//! Villa service client

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::client::ServiceClient;
use crate::domain::{
    AppError, AppResult, Credentials, DomainError, Villa, VillaCatalog, VillaFilter, VillaImage,
    VillaInput,
};
use crate::shared::errors::InfraError;

pub struct HttpVillaCatalog {
    client: ServiceClient,
}

impl HttpVillaCatalog {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }
}

/// The villa service takes the attributes as a JSON `villa` form field and
/// the picture as an `image` file part.
fn villa_form(input: &VillaInput, image: Option<&VillaImage>) -> AppResult<Form> {
    let json = serde_json::to_string(input).map_err(InfraError::from)?;
    let form = Form::new().text("villa", json);
    let Some(image) = image else {
        return Ok(form);
    };

    let mut part = Part::bytes(image.bytes.clone()).file_name(image.file_name.clone());
    if let Some(content_type) = &image.content_type {
        part = part.mime_str(content_type).map_err(InfraError::from)?;
    }
    Ok(form.part("image", part))
}

/// Upstream 404s on `/villas/{id}` name the path; report the villa instead.
fn villa_not_found<T>(id: i64, result: AppResult<T>) -> AppResult<T> {
    match result {
        Err(AppError::Domain(DomainError::NotFound { .. })) => {
            Err(DomainError::not_found("Villa", "id", id).into())
        }
        other => other,
    }
}

#[async_trait]
impl VillaCatalog for HttpVillaCatalog {
    async fn list(&self, filter: &VillaFilter) -> AppResult<Vec<Villa>> {
        self.client
            .get("/villas/", &filter.query_pairs(), None)
            .await
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Villa>> {
        self.client
            .get_optional(&format!("/villas/{}", id), &[], None)
            .await
    }

    async fn create(
        &self,
        input: &VillaInput,
        image: &VillaImage,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        let form = villa_form(input, Some(image))?;
        self.client
            .send_form(Method::POST, "/villas/", form, Some(credentials))
            .await
    }

    async fn update(
        &self,
        id: i64,
        input: &VillaInput,
        image: Option<&VillaImage>,
        credentials: &Credentials,
    ) -> AppResult<Villa> {
        let form = villa_form(input, image)?;
        let result = self
            .client
            .send_form(Method::PUT, &format!("/villas/{}", id), form, Some(credentials))
            .await;
        villa_not_found(id, result)
    }

    async fn delete(&self, id: i64, credentials: &Credentials) -> AppResult<()> {
        let result = self
            .client
            .delete(&format!("/villas/{}", id), Some(credentials))
            .await;
        villa_not_found(id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::extract::{Multipart, Path};
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{post, put};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use crate::domain::villa::model::tests::sample_input;
    use crate::shared::retry::RetryConfig;

    /// `villa` field parsed as JSON, plus the image file name if one came
    async fn read_form(mut multipart: Multipart) -> (Value, Option<String>) {
        let mut villa = Value::Null;
        let mut image = None;
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "villa" => villa = serde_json::from_str(&field.text().await.unwrap()).unwrap(),
                "image" => image = field.file_name().map(String::from),
                _ => {}
            }
        }
        (villa, image)
    }

    fn villa_body(id: i64, mut villa: Value, images: &str) -> Value {
        villa["id"] = json!(id);
        villa["images"] = json!(images);
        villa
    }

    /// Stand-in for the villa service's admin endpoints
    async fn spawn_upstream() -> String {
        async fn create(headers: HeaderMap, multipart: Multipart) -> (StatusCode, Json<Value>) {
            if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer adm") {
                return (StatusCode::FORBIDDEN, Json(json!({"detail": "Admin access required"})));
            }
            let (villa, image) = read_form(multipart).await;
            match image {
                Some(name) => {
                    let body = villa_body(9, villa, &format!("/media/{}", name));
                    (StatusCode::OK, Json(body))
                }
                None => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({"detail": "image required"})),
                ),
            }
        }

        async fn update(Path(id): Path<i64>, multipart: Multipart) -> (StatusCode, Json<Value>) {
            if id != 1 {
                return (StatusCode::NOT_FOUND, Json(json!({"detail": "Villa not found"})));
            }
            let (villa, image) = read_form(multipart).await;
            let images = image
                .map(|n| format!("/media/{}", n))
                .unwrap_or_else(|| "/media/old.jpg".into());
            (StatusCode::OK, Json(villa_body(id, villa, &images)))
        }

        let app = Router::new()
            .route("/villas/", post(create))
            .route("/villas/{id}", put(update));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn catalog(base_url: String) -> HttpVillaCatalog {
        HttpVillaCatalog::new(
            ServiceClient::new("villa", base_url, Duration::from_secs(5), RetryConfig::default())
                .unwrap(),
        )
    }

    fn photo() -> VillaImage {
        VillaImage {
            file_name: "lodge.jpg".into(),
            content_type: Some("image/jpeg".into()),
            bytes: vec![0xff, 0xd8, 0xff, 0xe0],
        }
    }

    #[tokio::test]
    async fn create_uploads_villa_field_and_image() {
        let c = catalog(spawn_upstream().await);
        let villa = c
            .create(&sample_input(), &photo(), &Credentials::bearer("adm"))
            .await
            .unwrap();
        assert_eq!(villa.id, 9);
        assert_eq!(villa.title, "Forest lodge");
        assert_eq!(villa.base_capacity, 2);
        assert_eq!(villa.images, vec!["/media/lodge.jpg".to_string()]);

        let err = c
            .create(&sample_input(), &photo(), &Credentials::bearer("guest"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::Forbidden(_))));
    }

    #[tokio::test]
    async fn update_without_image_and_missing_villa() {
        let c = catalog(spawn_upstream().await);
        let admin = Credentials::bearer("adm");

        let villa = c.update(1, &sample_input(), None, &admin).await.unwrap();
        assert_eq!(villa.images, vec!["/media/old.jpg".to_string()]);

        let villa = c
            .update(1, &sample_input(), Some(&photo()), &admin)
            .await
            .unwrap();
        assert_eq!(villa.images, vec!["/media/lodge.jpg".to_string()]);

        match c.update(3, &sample_input(), None, &admin).await {
            Err(AppError::Domain(DomainError::NotFound { entity, value, .. })) => {
                assert_eq!(entity, "Villa");
                assert_eq!(value, "3");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_bad_image_content_type() {
        let mut image = photo();
        image.content_type = Some("not a mime".into());
        assert!(villa_form(&sample_input(), Some(&image)).is_err());
        assert!(villa_form(&sample_input(), None).is_ok());
    }
}
