use criterion::{black_box, criterion_group, criterion_main, Criterion};
use notebridge_document::{html_to_tiptap, tiptap_to_html, validate};

fn note_html(paragraphs: usize) -> String {
    let mut html = String::from("<h1>Project log</h1>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Step {i}: <strong>done</strong> with <em>notes</em> at <a href=\"https://example.com/{i}\">ticket</a>.</p>"
        ));
        if i % 10 == 0 {
            html.push_str("<ul><li><p>one</p><ul><li><p>nested</p></li></ul></li><li><p>two</p></li></ul>");
        }
        if i % 25 == 0 {
            html.push_str("<table><tr><th>A</th><th>B</th></tr><tr><td>1</td><td>2</td></tr></table>");
        }
    }
    html
}

fn convert_html(c: &mut Criterion) {
    let html = note_html(200);
    c.bench_function("html_to_tiptap", |b| b.iter(|| html_to_tiptap(black_box(Some(&html)))));
}

fn serialize_document(c: &mut Criterion) {
    let doc = html_to_tiptap(Some(&note_html(200)));
    c.bench_function("tiptap_to_html", |b| b.iter(|| tiptap_to_html(black_box(&doc))));
}

fn validate_json(c: &mut Criterion) {
    let value = html_to_tiptap(Some(&note_html(200))).to_json_value();
    c.bench_function("validate", |b| b.iter(|| validate(black_box(&value))));
}

criterion_group!(benches, convert_html, serialize_document, validate_json);
criterion_main!(benches);
