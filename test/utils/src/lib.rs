/// Smallest document most viewers will still open. Only the `%PDF-` header
/// matters to the client.
pub fn pdf_fixture() -> &'static [u8] {
    return b"%PDF-1.4
1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj
2 0 obj << /Type /Pages /Kids [] /Count 0 >> endobj
trailer << /Root 1 0 R >>
%%EOF
";
}

pub fn chat_reply_fixture() -> &'static str {
    return r#"{
    "answer": "Photosynthesis turns light into chemical energy.",
    "relevant_chunks": ["Chapter 2: light reactions", "Chapter 3: Calvin cycle"],
    "image_id": "img-2",
    "image_filename": "fig1.png",
    "image_title": "Light reactions"
}"#;
}

pub fn topic_images_fixture() -> &'static str {
    return r#"{
    "topic_id": "t1",
    "images": [
        {
            "id": "img-1",
            "filename": "fig1.png",
            "title": "Light reactions",
            "keywords": ["light", "chlorophyll"],
            "description": "Thylakoid membrane diagram"
        },
        {
            "id": "img-2",
            "filename": "fig2.png",
            "title": "Calvin cycle",
            "keywords": ["carbon"],
            "description": "Carbon fixation loop"
        }
    ]
}"#;
}
