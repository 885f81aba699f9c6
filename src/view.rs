//! Plain-text rendering of the filtered view and the edit modal.

use std::io::Write;

use tabwriter::TabWriter;

use crate::record::{Field, Record};
use crate::session::EditSession;

/// Placeholder shown in the search box when no query is set.
pub const SEARCH_PLACEHOLDER: &str = "Search Here";

/// The filtered view as an aligned table. Rows are numbered from 1 in view
/// order; that number is what row actions take.
pub fn render_table(view: &[Record]) -> String {
    let mut tw = TabWriter::new(Vec::new()).padding(2);
    let _ = writeln!(tw, "#\tName\tAge\tProfession");
    for (index, record) in view.iter().enumerate() {
        let _ = writeln!(
            tw,
            "{}\t{}\t{}\t{}",
            index + 1,
            record.name,
            record.age,
            record.profession
        );
    }
    let _ = tw.flush();
    let mut rendered = match tw.into_inner() {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => String::new(),
    };
    if view.is_empty() {
        rendered.push_str("(no users)\n");
    }
    rendered
}

/// The modal form, or `None` when the session is closed.
pub fn render_modal(session: &EditSession) -> Option<String> {
    let draft = session.draft()?;
    let title = session.title().unwrap_or_default();
    let submit = session.submit_label().unwrap_or_default();

    let mut out = format!("+-- {} --+\n", title);
    for field in Field::ALL {
        out.push_str(&format!("  {}: {}\n", field.label(), draft.get(field)));
    }
    out.push_str(&format!("  [ {} ]  [ Cancel ]\n", submit));
    Some(out)
}

/// Search line, table and (when open) the modal.
pub fn render(query: &str, view: &[Record], session: &EditSession) -> String {
    let search = if query.is_empty() {
        format!("Search: <{}>\n", SEARCH_PLACEHOLDER)
    } else {
        format!("Search: {}\n", query)
    };
    let mut out = search;
    out.push_str(&render_table(view));
    if let Some(modal) = render_modal(session) {
        out.push('\n');
        out.push_str(&modal);
    }
    out
}
