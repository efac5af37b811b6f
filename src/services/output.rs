use crate::domain::models::JsonOut;
use serde::Serialize;

pub fn print_json<T: Serialize>(ok: bool, data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok, data })?);
    Ok(())
}

pub fn print_rows<T: Serialize>(
    json: bool,
    data: &[T],
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return print_json(true, data);
    }
    for d in data {
        println!("{}", row(d));
    }
    Ok(())
}

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        return print_json(true, data);
    }
    println!("{}", row(&data));
    Ok(())
}

/// Error envelope: stdout JSON under `--json`, a plain stderr line otherwise.
pub fn print_error(json: bool, code: &str, message: &str) {
    if json {
        let body = serde_json::json!({
            "ok": false,
            "error": { "code": code, "message": message }
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string()));
    } else {
        eprintln!("error: {}", message);
    }
}
