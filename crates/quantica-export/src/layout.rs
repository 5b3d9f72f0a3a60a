//! Pure pagination arithmetic for the local PDF engine. Kept free of
//! printpdf types so the page-break rules are testable directly.

/// Split `row_count` data rows into `(start, end)` page chunks. The
/// first page holds `first_capacity` rows; every continuation page
/// repeats the header row and holds `cont_capacity` rows.
pub fn table_page_plan(
    row_count: usize,
    first_capacity: usize,
    cont_capacity: usize,
) -> Vec<(usize, usize)> {
    if row_count == 0 {
        return Vec::new();
    }
    let mut pages = Vec::new();
    let first = first_capacity.max(1).min(row_count);
    pages.push((0, first));
    let per = cont_capacity.max(1);
    let mut start = first;
    while start < row_count {
        let end = (start + per).min(row_count);
        pages.push((start, end));
        start = end;
    }
    pages
}

/// Whether a data row gets the zebra fill. Counted over data rows only —
/// the header row never stripes.
pub fn zebra_row(index: usize) -> bool {
    index % 2 == 1
}

/// Rule thickness drawn under a data row. Reads like a uniform
/// every-row rule, but the true last row is special-cased so the table
/// always closes with a visible bottom border, even when the last row
/// lands exactly on a page boundary.
pub fn row_rule_width(index: usize, last_index: usize) -> f64 {
    if index == last_index { 0.6 } else { 0.1 }
}

/// Page chunks for the critical-field cards: at most `page_limit` cards
/// per page; everything past the first chunk goes to labeled
/// continuation pages.
pub fn critical_chunks(count: usize, page_limit: usize) -> Vec<(usize, usize)> {
    table_page_plan(count, page_limit, page_limit)
}

/// Cards in the left column when a chunk renders two-column.
pub fn column_split(count: usize) -> usize {
    count.div_ceil(2)
}

/// Greedy word wrap by character budget. The local engine only carries
/// the PDF builtin fonts, so a character estimate stands in for real
/// glyph metrics.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
