/// Build the user prompt for one panel's insight request.
pub fn insight_request(title: &str, summary: &str) -> String {
    format!(
        r#"You are a media analytics assistant. The dashboard chart "{title}" aggregates uploaded media-mention records.

DATA:
{summary}

Return up to 3 short, concrete insights about this data.

CONSTRAINTS:
- Respond with a JSON array of strings only.
- One sentence per insight; no markdown, no numbering."#
    )
}
