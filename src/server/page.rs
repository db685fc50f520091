pub const TITLE: &str = "YOLO Text and Figure Detection";
pub const DESCRIPTION: &str = "Upload an image of a PDF page, and the YOLO model will detect text and figures. \
The output includes an annotated image and detailed detection information.";

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2em auto;padding:0 1em}\
pre{background:#f4f4f4;padding:1em;white-space:pre-wrap}\
img{max-width:100%;border:1px solid #ccc}";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

fn layout(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<h1>{TITLE}</h1>\n<p>{DESCRIPTION}</p>\n{body}\n</body>\n</html>\n"
    )
}

fn form() -> &'static str {
    "<form action=\"/detect\" method=\"post\" enctype=\"multipart/form-data\">\n\
<label for=\"image\">Input Image</label>\n\
<input type=\"file\" id=\"image\" name=\"image\" accept=\"image/*\" required>\n\
<button type=\"submit\">Detect</button>\n\
</form>"
}

pub fn render_form() -> String {
    layout(form())
}

/// Result page: the annotated image when there is one, then the details text.
pub fn render_result(image_base64: Option<&str>, details: &str) -> String {
    let image = match image_base64 {
        Some(data) => format!(
            "<h2>Annotated Image</h2>\n<img alt=\"Annotated Image\" src=\"data:image/png;base64,{data}\">\n"
        ),
        None => String::new(),
    };
    let body = format!(
        "{}\n{}<h2>Detection Details</h2>\n<pre id=\"details\">{}</pre>",
        form(),
        image,
        escape_html(details)
    );
    layout(&body)
}
