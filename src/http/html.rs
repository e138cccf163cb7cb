//! HTML helpers shared by listings and error pages

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the body of an error response
pub fn error_page(code: u16, reason: &str, message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<title>Error response</title>\n\
</head>\n\
<body>\n\
<h1>Error response</h1>\n\
<p>Error code: {code} {reason}</p>\n\
<p>Message: {message}.</p>\n\
</body>\n\
</html>\n",
        reason = escape(reason),
        message = escape(message),
    )
}
