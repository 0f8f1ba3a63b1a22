// Browser backend implementation (anchor-click download)

use super::{DownloadBackend, DownloadError, DownloadFile};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, Document, HtmlAnchorElement, Node, Url};

/// Triggers the browser's file download through a temporary `<a download>` element
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserBackend;

impl BrowserBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Object URL revoked on drop
pub(crate) struct ObjectUrl(String);

impl ObjectUrl {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.0);
    }
}

/// Anchor detached from the document on drop
struct AttachedAnchor(HtmlAnchorElement);

impl Drop for AttachedAnchor {
    fn drop(&mut self) {
        self.0.remove();
    }
}

/// Result of one anchor-click download, with the object URL it minted (if any)
pub(crate) struct AnchorDownload {
    pub(crate) object_url: Option<String>,
    pub(crate) result: Result<(), DownloadError>,
}

fn js_error(value: JsValue) -> DownloadError {
    DownloadError::Browser(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Wrap the file contents in a typed Blob and mint an object URL for it
pub(crate) fn mint_object_url(file: &DownloadFile) -> Result<ObjectUrl, DownloadError> {
    let blob_parts = js_sys::Array::new();
    let uint8_array = js_sys::Uint8Array::from(&file.contents[..]);
    blob_parts.push(&uint8_array);

    let options = BlobPropertyBag::new();
    options.set_type(&file.mime_type);

    let blob =
        Blob::new_with_u8_array_sequence_and_options(&blob_parts, &options).map_err(js_error)?;
    Ok(ObjectUrl(Url::create_object_url_with_blob(&blob).map_err(js_error)?))
}

/// Attach a hidden anchor under `parent`, click it, then detach it and revoke the URL
pub(crate) fn anchor_download(document: &Document, parent: &Node, file: &DownloadFile) -> AnchorDownload {
    let mut object_url = None;
    let result = click_anchor(document, parent, file, &mut object_url);
    AnchorDownload { object_url, result }
}

fn click_anchor(
    document: &Document,
    parent: &Node,
    file: &DownloadFile,
    minted: &mut Option<String>,
) -> Result<(), DownloadError> {
    let url = mint_object_url(file)?;
    *minted = Some(url.as_str().to_string());

    let anchor = document
        .create_element("a")
        .map_err(js_error)?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|_| DownloadError::Browser("アンカー要素を作成できません".to_string()))?;

    anchor.set_href(url.as_str());
    anchor.set_download(&file.filename);
    anchor.style().set_property("display", "none").map_err(js_error)?;

    parent.append_child(&anchor).map_err(js_error)?;
    let anchor = AttachedAnchor(anchor);

    anchor.0.click();

    // anchor is removed before url is revoked (reverse declaration order)
    Ok(())
}

impl DownloadBackend for BrowserBackend {
    fn save(&self, file: &DownloadFile) -> Result<(), DownloadError> {
        let window = web_sys::window()
            .ok_or_else(|| DownloadError::Browser("windowが取得できません".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| DownloadError::Browser("documentが取得できません".to_string()))?;
        let body = document
            .body()
            .ok_or_else(|| DownloadError::Browser("bodyが取得できません".to_string()))?;

        let outcome = anchor_download(&document, &body, file);
        tracing::debug!(object_url = ?outcome.object_url, "Anchor download finished");
        outcome.result
    }
}
