//! Builds parameterized INSERT, SELECT, UPDATE, DELETE statements.

pub const ACCOUNTS: &str = "accounts";
pub const SHEETS: &str = "sheets";
pub const ENTRIES: &str = "entries";

pub const ACCOUNT_COLUMNS: &[&str] = &["id", "name", "surname", "email", "password", "created_at"];
pub const SHEET_COLUMNS: &[&str] = &["id", "user_id", "name", "created_at"];
pub const ENTRY_COLUMNS: &[&str] = &["id", "sheet_id", "name", "mark_count", "last_mark", "created_at"];

/// Quote identifier for PostgreSQL.
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn column_list(columns: &[&str]) -> String {
    columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

/// `INSERT INTO table (cols) VALUES ($1, ..) RETURNING returning`.
pub fn insert(table: &str, columns: &[&str], returning: &[&str]) -> String {
    let placeholders: Vec<String> = (1..=columns.len()).map(|n| format!("${}", n)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table),
        column_list(columns),
        placeholders.join(", "),
        column_list(returning)
    )
}

/// `SELECT cols FROM table WHERE key = $1`, ordered by creation.
pub fn select_where(table: &str, columns: &[&str], key: &str) -> String {
    format!(
        "SELECT {} FROM {} WHERE {} = $1 ORDER BY {}, {}",
        column_list(columns),
        quoted(table),
        quoted(key),
        quoted("created_at"),
        quoted("id")
    )
}

/// `UPDATE table SET column = $1 WHERE id = $2 [AND owner = $3]`.
pub fn update_field(table: &str, column: &str, owner: Option<&str>) -> String {
    let mut sql = format!(
        "UPDATE {} SET {} = $1 WHERE {} = $2",
        quoted(table),
        quoted(column),
        quoted("id")
    );
    if let Some(owner) = owner {
        sql.push_str(&format!(" AND {} = $3", quoted(owner)));
    }
    sql
}

/// `DELETE FROM table WHERE id = $1 [AND owner = $2]`.
pub fn delete(table: &str, owner: Option<&str>) -> String {
    let mut sql = format!("DELETE FROM {} WHERE {} = $1", quoted(table), quoted("id"));
    if let Some(owner) = owner {
        sql.push_str(&format!(" AND {} = $2", quoted(owner)));
    }
    sql
}
