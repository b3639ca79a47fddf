use std::path::Path;

use crate::error::Result;
use crate::model::calendar::format_date;
use crate::model::{Task, User};

/// Export tasks to a semicolon-delimited CSV file.
///
/// Columns: Task ; Assignee ; Start ; End ; Working Days ; Status
/// Dates are formatted as YYYY-MM-DD.
/// Returns the number of tasks written.
pub fn export_csv(tasks: &[Task], users: &[User], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_path(path)?;
    write_tasks(&mut wtr, tasks, users)?;
    wtr.flush()?;
    Ok(tasks.len())
}

fn write_tasks<W: std::io::Write>(
    wtr: &mut csv::Writer<W>,
    tasks: &[Task],
    users: &[User],
) -> Result<()> {
    wtr.write_record(["Task", "Assignee", "Start", "End", "Working Days", "Status"])?;

    for task in tasks {
        let assignee = users
            .iter()
            .find(|u| u.id == task.assigned_to)
            .map(|u| u.name.clone())
            .or_else(|| task.user.as_ref().map(|u| u.name.clone()))
            .unwrap_or_default();
        let start = format_date(task.start_date);
        let end = format_date(task.end_date);
        let working_days = task.working_days().to_string();
        wtr.write_record([
            task.name.as_str(),
            assignee.as_str(),
            start.as_str(),
            end.as_str(),
            working_days.as_str(),
            task.status.label(),
        ])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn writes_header_and_rows() {
        let ana = User::new("Ana", None);
        let task = Task::new(
            "Build; test",
            NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ana.id,
        );

        let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(Vec::new());
        write_tasks(&mut wtr, &[task], &[ana]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("Task;Assignee;Start;End;Working Days;Status"));
        assert_eq!(
            lines.next(),
            Some("\"Build; test\";Ana;2024-01-08;2024-01-10;3;Pending")
        );
    }
}
