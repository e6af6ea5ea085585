use url::Url;

use crate::model::CatalogItem;

/// Ordered candidate URLs for an item's display image.
///
/// The first candidate is `{base}/images/{folder}/{file}` with the filename
/// percent-encoded by the path-segment writer. When the filename ends in one
/// of the two conventional JPEG extensions, a second candidate with the
/// extension toggled follows; the presentation layer tries the sequence in
/// order and treats exhaustion as a silent broken-image state.
#[must_use]
pub fn image_candidates(base: &Url, item: &CatalogItem) -> Vec<Url> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(primary) = resolve(base, &item.folder, item.id.as_str()) {
        candidates.push(primary);
    }
    if let Some(alternate) = toggled_extension(item.id.as_str())
        .and_then(|file| resolve(base, &item.folder, &file))
    {
        candidates.push(alternate);
    }
    candidates
}

fn resolve(base: &Url, folder: &str, file: &str) -> Option<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .ok()?
        .push("images")
        .push(folder)
        .push(file);
    Some(url)
}

fn toggled_extension(file: &str) -> Option<String> {
    if let Some(stem) = file.strip_suffix(".jpeg") {
        Some(format!("{stem}.jpg"))
    } else {
        file.strip_suffix(".jpg").map(|stem| format!("{stem}.jpeg"))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogEntry;

    fn item(folder: &str, file: &str) -> CatalogItem {
        CatalogItem::from_entry(CatalogEntry {
            folder: folder.to_string(),
            file: file.to_string(),
            title: String::new(),
        })
    }

    fn base() -> Url {
        Url::parse("https://lexicon.example").unwrap()
    }

    #[test]
    fn primary_then_toggled_extension() {
        let urls = image_candidates(&base(), &item("Se4w5", "a.jpg"));
        assert_eq!(urls.len(), 2);
        assert_eq!(
            urls[0].as_str(),
            "https://lexicon.example/images/Se4w5/a.jpg"
        );
        assert_eq!(
            urls[1].as_str(),
            "https://lexicon.example/images/Se4w5/a.jpeg"
        );
    }

    #[test]
    fn jpeg_toggles_back_to_jpg() {
        let urls = image_candidates(&base(), &item("So9", "b.jpeg"));
        assert_eq!(urls.len(), 2);
        assert!(urls[0].as_str().ends_with("/b.jpeg"));
        assert!(urls[1].as_str().ends_with("/b.jpg"));
    }

    #[test]
    fn other_extensions_get_a_single_candidate() {
        let urls = image_candidates(&base(), &item("So9", "c.png"));
        assert_eq!(urls.len(), 1);
    }

    #[test]
    fn filenames_are_percent_encoded() {
        let urls = image_candidates(&base(), &item("Se4w5", "a b.jpg"));
        assert_eq!(
            urls[0].as_str(),
            "https://lexicon.example/images/Se4w5/a%20b.jpg"
        );
    }
}
