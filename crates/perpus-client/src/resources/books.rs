//! # Books
//!
//! `/book`, readable without a token. Drafts are sent as multipart so a
//! cover image can ride along; since multipart cannot be `PUT`, updates go
//! out as `POST /book/{id}?_method=PUT`.
//!
//! ```text
//! title=Laskar Pelangi
//! summary=...
//! stock=3
//! category_id=2
//! image=<bytes; filename="cover.jpg"; Content-Type: image/jpeg>
//! ```

use reqwest::multipart::{Form, Part};

use perpus_core::{Book, Id};

use super::{Resource, ResourceDraft, ResourceStore, UpdateMethod};
use crate::error::ClientResult;
use crate::http::RequestBody;

/// Store over `/book`.
pub type BookStore = ResourceStore<Book>;

/// A cover image to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl ImageUpload {
    /// Guesses the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        let mime = match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => "application/octet-stream",
        };
        ImageUpload {
            file_name,
            bytes,
            mime: mime.to_string(),
        }
    }
}

/// Create/update payload for a book.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookDraft {
    pub title: String,
    pub summary: Option<String>,
    pub stock: i64,
    pub category_id: Option<Id>,
    /// Left out on update to keep the current cover.
    pub image: Option<ImageUpload>,
}

impl BookDraft {
    pub fn new(title: impl Into<String>) -> Self {
        BookDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Text fields in the order they are sent.
    fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("title", self.title.clone())];
        if let Some(summary) = &self.summary {
            fields.push(("summary", summary.clone()));
        }
        fields.push(("stock", self.stock.to_string()));
        if let Some(category_id) = &self.category_id {
            fields.push(("category_id", category_id.to_string()));
        }
        fields
    }
}

impl ResourceDraft for BookDraft {
    fn into_body(self) -> ClientResult<RequestBody> {
        let mut form = Form::new();
        for (name, value) in self.text_fields() {
            form = form.text(name, value);
        }
        if let Some(image) = self.image {
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(&image.mime)?;
            form = form.part("image", part);
        }
        Ok(RequestBody::Multipart(form))
    }
}

impl Resource for Book {
    const STORE: &'static str = "book";
    const COLLECTION: &'static str = "/book";
    const PUBLIC_READS: bool = true;
    const UPDATE: UpdateMethod = UpdateMethod::PostOverride;

    type Draft = BookDraft;

    fn id(&self) -> &Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::testing::{anonymous, signed_in};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn book_json(id: u32, title: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "summary": "Kisah sepuluh anak Belitung",
            "image": "https://cdn.example.com/cover.jpg",
            "stock": 3,
            "category_id": 1
        })
    }

    fn draft() -> BookDraft {
        BookDraft {
            title: "Laskar Pelangi".to_string(),
            summary: Some("Kisah sepuluh anak Belitung".to_string()),
            stock: 3,
            category_id: Some(Id::from("1")),
            image: Some(ImageUpload::new("cover.JPG", b"jpeg-bytes".to_vec())),
        }
    }

    #[test]
    fn test_image_mime_guess() {
        assert_eq!(ImageUpload::new("cover.JPG", vec![]).mime, "image/jpeg");
        assert_eq!(ImageUpload::new("a.b.png", vec![]).mime, "image/png");
        assert_eq!(ImageUpload::new("cover", vec![]).mime, "application/octet-stream");
    }

    #[test]
    fn test_text_fields_skip_unset() {
        let fields = BookDraft::new("Bumi").text_fields();
        assert_eq!(
            fields,
            vec![("title", "Bumi".to_string()), ("stock", "0".to_string())]
        );
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/book"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [book_json(1, "Laskar Pelangi"), book_json(2, "Bumi Manusia")]
            })))
            .mount(&server)
            .await;

        let store = BookStore::new(anonymous(&server));
        let books = store.list().await.unwrap();

        assert_eq!(books.len(), 2);
        assert_eq!(books[1].title, "Bumi Manusia");
        assert_eq!(books[0].category_id, Some(Id::from("1")));
    }

    #[tokio::test]
    async fn test_create_is_multipart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/book"))
            .and(header("authorization", "Bearer tok"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("Laskar Pelangi"))
            .and(body_string_contains("filename=\"cover.JPG\""))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": book_json(5, "Laskar Pelangi")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = BookStore::new(signed_in(&server, "owner"));
        let book = store.create(draft()).await.unwrap();

        assert_eq!(book.id, "5");
        assert_eq!(store.items().await, vec![book]);
    }

    #[tokio::test]
    async fn test_update_uses_method_override() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/book"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [book_json(1, "Laskar Pelangi"), book_json(2, "Bumi Manusia")]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/book/2"))
            .and(query_param("_method", "PUT"))
            .and(header("authorization", "Bearer tok"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": book_json(2, "Bumi Manusia (Cetakan Baru)")
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = BookStore::new(signed_in(&server, "owner"));
        store.list().await.unwrap();

        let mut update = BookDraft::new("Bumi Manusia (Cetakan Baru)");
        update.stock = 3;
        store.update(&Id::from("2"), update).await.unwrap();

        let titles: Vec<String> = store.items().await.into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Laskar Pelangi", "Bumi Manusia (Cetakan Baru)"]);
    }

    #[tokio::test]
    async fn test_update_refreshes_current() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/book/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": book_json(1, "Laskar Pelangi")
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/book/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": book_json(1, "Sang Pemimpi")
            })))
            .mount(&server)
            .await;

        let store = BookStore::new(signed_in(&server, "owner"));
        store.get_by_id(&Id::from("1")).await.unwrap();
        store
            .update(&Id::from("1"), BookDraft::new("Sang Pemimpi"))
            .await
            .unwrap();

        assert_eq!(store.current().await.unwrap().title, "Sang Pemimpi");
    }
}
