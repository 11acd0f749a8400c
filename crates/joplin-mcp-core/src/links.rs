//! Markdown links to attachments inside note bodies.
//!
//! Joplin references a resource from a note with a Markdown link whose target
//! is `:/<resource id>`: `[text](:/id)` for a plain link, `![text](:/id)` for
//! an inline embed. Both edits here are whole-body rewrites; the caller sends
//! the full new body back to the backend.

/// Build the link snippet for a resource. `text` defaults to the resource id.
#[must_use]
pub fn resource_link(resource_id: &str, text: Option<&str>, embed: bool) -> String {
    let text = text.unwrap_or(resource_id);
    let bang = if embed { "!" } else { "" };
    format!("{bang}[{text}](:/{resource_id})")
}

/// Append a link to `resource_id` after a blank line.
///
/// Returns `body` unchanged when the exact snippet is already present. A link
/// to the same resource with different text or embed flag is a different
/// snippet and gets appended.
#[must_use]
pub fn attach_resource_link(
    body: &str,
    resource_id: &str,
    text: Option<&str>,
    embed: bool,
) -> String {
    let snippet = resource_link(resource_id, text, embed);
    if body.contains(&snippet) {
        return body.to_string();
    }
    format!("{}\n\n{snippet}\n", body.trim_end())
}

/// Remove every line that references `resource_id`.
///
/// Any line containing `(:/<id>)` is dropped whole, including unrelated text
/// sharing that line. The result is right-trimmed and ends with one newline.
#[must_use]
pub fn detach_resource_link(body: &str, resource_id: &str) -> String {
    let needle = format!("(:/{resource_id})");
    let kept = body
        .lines()
        .filter(|line| !line.contains(&needle))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n", kept.trim_end())
}
