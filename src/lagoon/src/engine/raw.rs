/// Keywords that mark a raw statement as potentially mutating. The sniffer
/// is deliberately coarse: a keyword anywhere in the text trips it, and
/// `unsafe_exec` exists for statements it wrongly rejects.
const WRITE_KEYWORDS: &[&str] = &[
    "alter", "attach", "commit", "create", "delete", "detach", "drop", "insert", "pragma",
    "reindex", "release", "replace", "rollback", "savepoint", "update", "vacuum",
];

pub(crate) fn is_potentially_dangerous(sql: &str) -> bool {
    sql.split(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .any(|token| WRITE_KEYWORDS.contains(&token.to_ascii_lowercase().as_str()))
}
