use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use rusqlite::Connection;

const OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    match Regex::new(r"\x1B\[[0-9;]*[mK]") {
        Ok(re) => re.replace_all(s, "").into_owned(),
        Err(_) => s.to_string(),
    }
}

/// Colour of an operation in the log listing.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "teacher_add" | "class_add" => Colour::Green,
        "teacher_delete" | "class_delete" | "class_remove" => Colour::Red,
        "teacher_rename" | "class_rename" | "class_save" => Colour::Yellow,
        "migration_applied" => Colour::Purple,
        "remote_fallback" | "subscribe_failed" | "remote_sync_failed" => Colour::RGB(255, 153, 51),
        "remote_sync" => Colour::Cyan,
        "init" => Colour::Blue,
        _ => Colour::White,
    }
}

/// Cut to `OP_WIDTH` visible characters, keeping only the operation coloured.
fn render_op(operation: &str, target: &str) -> String {
    let color = color_for_operation(operation);
    let visible = if target.is_empty() {
        operation.to_string()
    } else {
        format!("{operation} ({target})")
    };

    let truncated = if visible.chars().count() > OP_WIDTH {
        let mut s: String = visible.chars().take(OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };

    let recolored = match truncated.split_once(' ') {
        Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
        None => color.paint(truncated.as_str()).to_string(),
    };

    let padding = " ".repeat(OP_WIDTH.saturating_sub(strip_ansi(&recolored).chars().count()));
    format!("{recolored}{padding}")
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(conn: &Connection) -> AppResult<()> {
        let mut stmt = conn.prepare_cached(
            "SELECT id, date, operation, IFNULL(target, ''), message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let id: i64 = row.get(0)?;
            let raw_date: String = row.get(1)?;
            let operation: String = row.get(2)?;
            let target: String = row.get(3)?;
            let message: String = row.get(4)?;

            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%F %T").to_string())
                .unwrap_or(raw_date);

            Ok((id, date, operation, target, message))
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|(id, ..)| id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries
            .iter()
            .map(|(_, date, ..)| date.len())
            .max()
            .unwrap_or(10);

        println!("📜 Internal log:\n");

        for (id, date, operation, target, message) in entries {
            println!(
                "{:>id_w$}: {:<date_w$} | {} => {}",
                id,
                date,
                render_op(&operation, &target),
                message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
