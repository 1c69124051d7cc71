//! Plain-text extraction from PDF bytes via `lopdf`.

use lopdf::Document;

use super::DocumentError;

/// Text pulled from a document, with the number of pages visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    pub pages: usize,
}

/// Concatenate the text of every page in page order.
///
/// Any page that fails to extract fails the whole document, as does a
/// document that cannot be parsed at all.
pub fn extract_text(bytes: &[u8]) -> Result<ExtractedText, DocumentError> {
    let doc = Document::load_mem(bytes).map_err(|e| DocumentError::Extract(e.to_string()))?;

    let mut extracted = ExtractedText::default();
    for page_number in doc.get_pages().into_keys() {
        let text = doc
            .extract_text(&[page_number])
            .map_err(|e| DocumentError::Extract(format!("page {page_number}: {e}")))?;
        extracted.text.push_str(&text);
        extracted.pages += 1;
    }

    Ok(extracted)
}

/// Build a PDF with one line of text per page. Pages listed in `broken`
/// point their content at an object that does not exist.
#[cfg(test)]
pub(crate) fn pdf_fixture(pages: &[&str], broken: &[usize]) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for (i, line) in pages.iter().enumerate() {
        let contents: Object = if broken.contains(&i) {
            Object::Reference((9999, 0))
        } else {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let stream = Stream::new(dictionary! {}, content.encode().unwrap());
            doc.add_object(stream).into()
        };
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => contents,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = extract_text(b"<html>quota exceeded</html>").unwrap_err();
        assert!(matches!(err, DocumentError::Extract(_)));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(extract_text(&[]).is_err());
    }

    #[test]
    fn pages_are_concatenated_in_order() {
        let extracted = extract_text(&pdf_fixture(&["Alpha", "Bravo"], &[])).unwrap();
        assert_eq!(extracted.pages, 2);
        let alpha = extracted.text.find("Alpha").unwrap();
        let bravo = extracted.text.find("Bravo").unwrap();
        assert!(alpha < bravo, "{:?}", extracted.text);
    }

    #[test]
    fn unreadable_page_fails_whole_document() {
        let err = extract_text(&pdf_fixture(&["Alpha", "Bravo"], &[1])).unwrap_err();
        match err {
            DocumentError::Extract(reason) => assert!(reason.starts_with("page 2:"), "{reason}"),
            other => panic!("expected Extract, got {other:?}"),
        }
    }
}
