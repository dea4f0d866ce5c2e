//! Thin client for the two Drive v3 endpoints this tool needs

use crate::error::{RemoteError, SetupError};
use async_trait::async_trait;

/// The mime type Drive uses to mark an entry as a folder
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com";

/// A file or folder as returned by `files.list` or `files.update`
///
/// Only the attributes that were requested are present on the wire, the
/// rest default to empty. Anything beyond the four core attributes ends up
/// in `metadata`, which is only populated when all fields are requested.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
    #[serde(default)]
    pub mime_type: String,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl File {
    #[inline]
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

/// A single page of a `files.list` response
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<File>,
    pub next_page_token: Option<String>,
}

/// Which attributes of each entry the listing should populate
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fields {
    /// `id`, `name`, `parents` and `mimeType`, plus the continuation token
    Basic,
    /// Every attribute Drive knows about
    All,
}

impl Fields {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "nextPageToken, files(id, name, parents, mimeType)",
            Self::All => "*",
        }
    }
}

/// Lists the direct children of a single folder
#[derive(Copy, Clone, Debug)]
pub struct ListQuery<'a> {
    pub parent: &'a str,
    pub fields: Fields,
    pub page_token: Option<&'a str>,
}

impl<'a> ListQuery<'a> {
    pub fn children(parent: &'a str) -> Self {
        Self {
            parent,
            fields: Fields::Basic,
            page_token: None,
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_page_token(mut self, page_token: Option<&'a str>) -> Self {
        self.page_token = page_token;
        self
    }

    /// The Drive search expression, `'<parent>' in parents`
    pub fn q(&self) -> String {
        let mut q = String::with_capacity(self.parent.len() + 14);
        q.push('\'');
        for c in self.parent.chars() {
            if matches!(c, '\'' | '\\') {
                q.push('\\');
            }
            q.push(c);
        }
        q.push_str("' in parents");
        q
    }
}

#[async_trait]
pub trait ListFiles {
    async fn list(&self, query: &ListQuery<'_>) -> Result<FileList, RemoteError>;
}

#[async_trait]
pub trait UpdateFiles {
    /// Replaces the content of `file_id`, leaving its metadata untouched
    async fn update_content(
        &self,
        file_id: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<File, RemoteError>;
}

/// An authenticated handle to the Drive API
#[derive(Clone)]
pub struct DriveClient {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl DriveClient {
    /// Wraps a client that already carries an `Authorization` header,
    /// sending requests to `endpoint` instead of [`DEFAULT_ENDPOINT`]
    pub fn with_endpoint(client: reqwest::Client, endpoint: &str) -> Result<Self, SetupError> {
        let endpoint = url::Url::parse(endpoint)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| SetupError::Endpoint(endpoint.to_owned()))?;

        Ok(Self { client, endpoint })
    }

    fn make_url(&self, segments: &[&str]) -> url::Url {
        let mut url = self.endpoint.clone();
        // with_endpoint rejects urls that can't be a base
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn get_bytes(req: reqwest::RequestBuilder) -> Result<bytes::Bytes, RemoteError> {
    let res = req.send().await?;

    let code = res.status();
    let buffer = res.bytes().await?;

    if code.is_success() {
        Ok(buffer)
    } else {
        Err(RemoteError::Status {
            status: code,
            body: String::from_utf8_lossy(&buffer).into_owned(),
        })
    }
}

/// <https://developers.google.com/drive/api/reference/rest/v3/files/list>
#[async_trait]
impl ListFiles for DriveClient {
    async fn list(&self, query: &ListQuery<'_>) -> Result<FileList, RemoteError> {
        let mut params = vec![("q", query.q()), ("fields", query.fields.as_str().to_owned())];
        if let Some(page_token) = query.page_token {
            params.push(("pageToken", page_token.to_owned()));
        }

        tracing::debug!(parent = query.parent, page_token = ?query.page_token, "listing children");

        let body = get_bytes(
            self.client
                .get(self.make_url(&["drive", "v3", "files"]))
                .header(http::header::ACCEPT, "application/json")
                .query(&params),
        )
        .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}

/// <https://developers.google.com/drive/api/guides/manage-uploads#simple>
#[async_trait]
impl UpdateFiles for DriveClient {
    async fn update_content(
        &self,
        file_id: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<File, RemoteError> {
        let mut url = self.make_url(&["upload", "drive", "v3", "files", file_id]);
        url.query_pairs_mut().append_pair("uploadType", "media");

        tracing::debug!(file_id, content_type, len = content.len(), "uploading content");

        let body = get_bytes(
            self.client
                .patch(url)
                .header(http::header::CONTENT_TYPE, content_type)
                .body(content),
        )
        .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
