//! HTML pages for the upload form.

use crate::upload::FileRecord;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
</head>
<body>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    let mut html = PAGE_HEAD.replace("{{title}}", &escape_html(title));
    html.push_str(body);
    html.push_str(PAGE_TAIL);
    html
}

/// Percent-encode the last path segment so names with spaces or `#` link correctly.
fn href_for(filepath: &str) -> String {
    match filepath.rsplit_once('/') {
        Some((dir, name)) => format!("{}/{}", dir, urlencoding::encode(name)),
        None => urlencoding::encode(filepath).into_owned(),
    }
}

fn format_size(size: i64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;

    let bytes = size as f64;
    if bytes >= MB {
        format!("{:.1} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{size} bytes")
    }
}

/// The upload form, with an optional error message above it.
pub fn upload_page(error: Option<&str>) -> String {
    let mut body = String::from("<h1>Upload an image</h1>\n");

    if let Some(message) = error {
        body.push_str(&format!(
            "<p class=\"error\" role=\"alert\">{}</p>\n",
            escape_html(message)
        ));
    }

    body.push_str(
        r#"<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept="image/*">
<button type="submit">Upload</button>
</form>
"#,
    );

    page("Upload an image", &body)
}

/// The page shown after a successful upload.
pub fn success_page(record: &FileRecord) -> String {
    let href = escape_html(&href_for(&record.filepath));
    let filename = escape_html(&record.filename);

    let body = format!(
        r#"<h1>File uploaded</h1>
<dl>
<dt>Name</dt><dd>{filename}</dd>
<dt>Type</dt><dd>{filetype}</dd>
<dt>Size</dt><dd>{size}</dd>
<dt>Uploaded</dt><dd>{uploaded_at}</dd>
<dt>Path</dt><dd><a href="{href}">{filepath}</a></dd>
</dl>
<img src="{href}" alt="{filename}">
<p><a href="/">Upload another file</a></p>
"#,
        filetype = escape_html(&record.filetype),
        size = format_size(record.size),
        uploaded_at = record.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC"),
        filepath = escape_html(&record.filepath),
    );

    page("File uploaded", &body)
}
