use chrono::{Local, NaiveDateTime, TimeZone};
use serde_json::{Map, Value};

use crate::client::{ConnectedClient, DatabaseFile, Schedule};

const SERVER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Converts a server timestamp (`2006-01-02 15:04:05`, UTC, optionally
/// suffixed with ` GMT`) to `2006/01/03 00:04` in `tz`. Empty or zeroed
/// timestamps render as an empty string.
pub fn datetime_in<Tz: TimeZone>(value: &str, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let trimmed = value.trim();
    let trimmed = trimmed.strip_suffix("GMT").unwrap_or(trimmed).trim_end();
    match NaiveDateTime::parse_from_str(trimmed, SERVER_TIME_FORMAT) {
        Ok(naive) => naive
            .and_utc()
            .with_timezone(tz)
            .format("%Y/%m/%d %H:%M")
            .to_string(),
        Err(_) => String::new(),
    }
}

pub fn local_datetime(value: &str) -> String {
    datetime_in(value, &Local)
}

/// Left-aligned columns separated by two spaces; trailing padding trimmed.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![line(headers.to_vec())];
    for row in rows {
        lines.push(line(row.iter().map(String::as_str).collect()));
    }
    lines
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "Yes" } else { "No" };
    text.to_string()
}

pub fn file_lines(files: &[DatabaseFile], stats: bool) -> Vec<String> {
    if stats {
        let rows: Vec<Vec<String>> = files
            .iter()
            .map(|f| {
                vec![
                    f.id.to_string(),
                    f.filename.clone(),
                    f.clients.to_string(),
                    f.size.to_string(),
                    f.status.clone(),
                    f.enabled_ext_privileges.join(" "),
                    yes_no(f.is_encrypted),
                ]
            })
            .collect();
        render_table(
            &["ID", "File", "Clients", "Size", "Status", "Enabled Extended Privileges", "Encrypted"],
            &rows,
        )
    } else {
        let rows: Vec<Vec<String>> = files
            .iter()
            .map(|f| vec![f.id.to_string(), format!("{}{}", f.folder, f.filename)])
            .collect();
        render_table(&["ID", "File"], &rows)
    }
}

pub fn client_lines(clients: &[ConnectedClient], stats: bool) -> Vec<String> {
    let rows: Vec<Vec<String>> = clients
        .iter()
        .map(|c| {
            let mut row = vec![
                c.id.to_string(),
                c.user_name.clone(),
                c.computer_name.clone(),
                c.extpriv.clone(),
            ];
            if stats {
                row.extend([
                    c.ipaddress.clone(),
                    c.app_version.clone(),
                    local_datetime(&c.connect_time),
                    c.connect_duration.clone(),
                ]);
            }
            row
        })
        .collect();
    let mut headers = vec!["Client ID", "User Name", "Computer Name", "Ext Privilege"];
    if stats {
        headers.extend(["IP Address", "FM Version", "Connect Time", "Duration"]);
    }
    render_table(&headers, &rows)
}

pub fn schedule_lines(schedules: &[Schedule]) -> Vec<String> {
    let rows: Vec<Vec<String>> = schedules
        .iter()
        .map(|s| {
            vec![
                s.id.to_string(),
                s.name.clone(),
                s.task_type.clone(),
                local_datetime(&s.last_run),
                local_datetime(&s.next_run),
                s.status.clone(),
                yes_no(s.enabled),
            ]
        })
        .collect();
    render_table(
        &["ID", "Name", "Type", "Last Completed", "Next Run", "Status", "Enabled"],
        &rows,
    )
}

pub fn client_status_lines(client: &ConnectedClient) -> Vec<String> {
    let mut lines = vec![
        format!("Client ID: {}", client.id),
        format!("User Name: {}", client.user_name),
        format!("Computer Name: {}", client.computer_name),
        format!("IP Address: {}", client.ipaddress),
        format!("MAC Address: {}", client.mac_address),
        format!("Connect Time: {}", local_datetime(&client.connect_time)),
        format!("Duration: {}", client.connect_duration),
        format!("Version: {}", client.app_version),
    ];
    for file in &client.guest_files {
        lines.push(format!("File Name: {}", file.filename));
    }
    lines
}

pub fn file_status_line(file: &DatabaseFile) -> String {
    format!("File {} is {}", file.filename, file.status)
}

/// `key = value` lines for a configuration object, envelope fields skipped.
pub fn config_lines(values: &Map<String, Value>) -> Vec<String> {
    values
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "result" | "token"))
        .map(|(k, v)| match v {
            Value::String(s) => format!("{k} = {s}"),
            other => format!("{k} = {other}"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tokyo() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn datetime_empty_and_zero() {
        assert_eq!(datetime_in("", &tokyo()), "");
        assert_eq!(datetime_in("0000-00-00 00:00:00", &tokyo()), "");
        assert_eq!(datetime_in("0000-00-00 00:00:00 GMT", &tokyo()), "");
    }

    #[test]
    fn datetime_converts_to_zone() {
        assert_eq!(datetime_in("2006-01-02 15:04:05", &tokyo()), "2006/01/03 00:04");
        assert_eq!(
            datetime_in("2006-01-02 15:04:05 GMT", &tokyo()),
            "2006/01/03 00:04"
        );
    }

    #[test]
    fn table_alignment() {
        let rows = vec![
            vec!["1".to_string(), "TestDB.fmp12".to_string()],
            vec!["12".to_string(), "A".to_string()],
        ];
        let lines = render_table(&["ID", "File"], &rows);
        assert_eq!(lines, ["ID  File", "1   TestDB.fmp12", "12  A"]);
    }

    #[test]
    fn file_lines_with_and_without_stats() {
        let files = vec![DatabaseFile {
            id: 1,
            filename: "TestDB.fmp12".into(),
            folder: "filelinux:/data/".into(),
            status: "NORMAL".into(),
            clients: 2,
            size: 4096,
            ..Default::default()
        }];
        let plain = file_lines(&files, false);
        assert_eq!(plain[1], "1   filelinux:/data/TestDB.fmp12");

        let stats = file_lines(&files, true);
        assert!(stats[0].starts_with("ID  File"));
        assert!(stats[1].contains("NORMAL"));
        assert!(stats[1].contains("4096"));
    }

    #[test]
    fn client_lines_add_stats_columns() {
        let clients = vec![ConnectedClient {
            id: 5,
            user_name: "admin".into(),
            ipaddress: "10.0.0.2".into(),
            ..Default::default()
        }];
        assert!(!client_lines(&clients, false)[1].contains("10.0.0.2"));
        assert!(client_lines(&clients, true)[1].contains("10.0.0.2"));
        assert!(client_lines(&clients, true)[0].contains("IP Address"));
    }

    #[test]
    fn config_lines_skip_envelope() {
        let mut values = Map::new();
        values.insert("result".into(), Value::from(0));
        values.insert("cacheSize".into(), Value::from(512));
        values.insert("name".into(), Value::from("main"));
        assert_eq!(config_lines(&values), ["cacheSize = 512", "name = main"]);
    }

    #[test]
    fn status_lines() {
        let file = DatabaseFile {
            filename: "TestDB.fmp12".into(),
            status: "NORMAL".into(),
            ..Default::default()
        };
        assert_eq!(file_status_line(&file), "File TestDB.fmp12 is NORMAL");
        let client = ConnectedClient {
            id: 3,
            guest_files: vec![crate::client::GuestFile {
                filename: "TestDB.fmp12".into(),
            }],
            ..Default::default()
        };
        let lines = client_status_lines(&client);
        assert_eq!(lines[0], "Client ID: 3");
        assert_eq!(lines.last().unwrap(), "File Name: TestDB.fmp12");
    }
}
