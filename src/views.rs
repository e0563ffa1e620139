//! HTML pages: the upload form and the two result views

use crate::models::{ClothingType, ResultQuery};

const INDEX_HTML: &str = include_str!("../static/index.html");

pub fn landing_page() -> &'static str {
    INDEX_HTML
}

/// Renders the result view for one garment category.
///
/// Top and bottom views share the layout and differ only in their headings.
pub fn result_page(clothing_type: ClothingType, query: &ResultQuery) -> String {
    let heading = match clothing_type {
        ClothingType::Top => "Top analysis",
        ClothingType::Bottom => "Bottom analysis",
    };
    let partner = match clothing_type {
        ClothingType::Top => "Bottoms that go with it",
        ClothingType::Bottom => "Tops that go with it",
    };

    let label = escape_html(query.label.as_deref().unwrap_or_default());
    let color = escape_html(query.color.as_deref().unwrap_or_default());
    let image = match query.image_url.as_deref() {
        Some(url) if !url.is_empty() => format!(
            r#"<img src="{}" alt="Uploaded garment">"#,
            escape_html(url)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Wardrobe - {heading}</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background: #f6f4f1;
            color: #222;
            margin: 0;
        }}
        main {{
            max-width: 640px;
            margin: 40px auto;
            padding: 32px;
            background: #fff;
            border-radius: 8px;
        }}
        img {{
            max-width: 100%;
            border-radius: 4px;
        }}
        .result {{
            font-weight: 600;
        }}
    </style>
</head>
<body>
<main>
    <h1>{heading}</h1>
    {image}
    <p>Garment: <span class="result" id="clothing-result">{label}</span></p>
    <p>Color: <span class="result" id="color-result">{color}</span></p>
    <h2>{partner}</h2>
    {clothing_list}
    <h2>Colors that go with it</h2>
    {color_list}
    <p><a href="/">Analyze another garment</a></p>
</main>
</body>
</html>
"#,
        heading = heading,
        partner = partner,
        image = image,
        label = label,
        color = color,
        clothing_list = render_list("clothing-recommendations", &query.clothing_recommendations()),
        color_list = render_list("color-recommendations", &query.color_recommendations()),
    )
}

fn render_list(id: &str, items: &[String]) -> String {
    if items.is_empty() {
        return format!(r#"<p id="{}">No recommendations available.</p>"#, id);
    }

    let entries: String = items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect();

    format!(r#"<ul id="{}">{}</ul>"#, id, entries)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            other => escaped.push(other),
        }
    }
    escaped
}
