use chrono::{Datelike, Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::board::TaskBoard;
use crate::calendar::{self, DayCell, MonthRef, WEEKDAY_NAMES};
use crate::filters::{due_on, progress, urgent_pending, TaskFilter};
use crate::models::{Category, Recurrence, Task, TaskDraft, Urgency};
use crate::repository::TaskRepository;
use crate::seasonal::planting_suggestions;

/// Fields accepted by `add`, before validation.
#[derive(Debug, Clone, Default)]
pub struct AddArgs {
    pub title: String,
    pub description: Option<String>,
    pub category: Category,
    pub urgency: Urgency,
    pub recurrence: Recurrence,
    /// YYYY-MM-DD
    pub date: Option<String>,
    pub month: Option<u8>,
}

/// Adds a new task.
///
/// Returns the saved task, or `None` if the input was invalid or the save failed.
pub async fn cmd_add(repo: &TaskRepository, args: AddArgs, silent: bool) -> Option<Task> {
    let specific_date = match args.date.as_deref().map(parse_date).transpose() {
        Ok(d) => d,
        Err(msg) => {
            if !silent { eprintln!("{}", msg); }
            return None;
        }
    };

    let draft = TaskDraft {
        title: args.title,
        description: args.description.filter(|d| !d.trim().is_empty()),
        recurrence: args.recurrence,
        urgency: args.urgency,
        specific_date,
        month_reference: args.month,
        category: args.category,
    };
    if let Err(e) = draft.validate() {
        if !silent { eprintln!("{}", e); }
        return None;
    }

    let created = repo.create(draft).await;
    match &created {
        Some(task) => { if !silent { println!("Task added (id = {})", task.id); } }
        None => { if !silent { eprintln!("Failed to save task."); } }
    }
    created
}

/// Marks a task as done or not done.
pub async fn cmd_set_done(repo: &TaskRepository, id: &str, done: bool, silent: bool) {
    let mut board = TaskBoard::load(repo).await;
    match board.set_completion(repo, id, done).await {
        Ok(true) => {
            if !silent {
                let state = if done { "complete" } else { "pending" };
                println!("Task {} marked as {}.", id, state);
            }
        }
        Ok(false) => { if !silent { eprintln!("Task {} not found.", id); } }
        Err(e) => { if !silent { eprintln!("Failed to update task {}: {}", id, e); } }
    }
}

/// Flips a task between done and pending.
pub async fn cmd_toggle(repo: &TaskRepository, id: &str, silent: bool) {
    let mut board = TaskBoard::load(repo).await;
    match board.toggle(repo, id).await {
        Ok(Some(done)) => {
            if !silent {
                let state = if done { "complete" } else { "pending" };
                println!("Task {} marked as {}.", id, state);
            }
        }
        Ok(None) => { if !silent { eprintln!("Task {} not found.", id); } }
        Err(e) => { if !silent { eprintln!("Failed to update task {}: {}", id, e); } }
    }
}

/// Removes a task by ID.
pub async fn cmd_remove(repo: &TaskRepository, id: &str, silent: bool) {
    let mut board = TaskBoard::load(repo).await;
    match board.remove(repo, id).await {
        Ok(true) => { if !silent { println!("Task {} removed.", id); } }
        Ok(false) => { if !silent { eprintln!("Task {} not found.", id); } }
        Err(e) => { if !silent { eprintln!("Failed to remove task {}: {}", id, e); } }
    }
}

/// Lists tasks newest first, narrowed by the filter.
///
/// By default, shows completed tasks too unless `pending_only` is set.
pub async fn cmd_list(repo: &TaskRepository, filter: TaskFilter, pending_only: bool) {
    let tasks = repo.load_all().await;
    let shown: Vec<&Task> = filter
        .apply(&tasks)
        .into_iter()
        .filter(|t| !pending_only || !t.is_completed)
        .collect();
    if shown.is_empty() {
        println!("No tasks found.");
        return;
    }
    println!("{}", task_table(&shown));
    println!("{} of {} tasks", shown.len(), tasks.len());
}

/// Lists tasks scheduled for today.
pub async fn cmd_today(repo: &TaskRepository) {
    let tasks = repo.load_all().await;
    let today = Local::now().date_naive();
    let shown = due_on(&tasks, today);
    if shown.is_empty() {
        println!("Nothing scheduled for today.");
        return;
    }
    println!("{}", task_table(&shown));
}

/// Lists high-urgency tasks that are still open.
pub async fn cmd_urgent(repo: &TaskRepository) {
    let tasks = repo.load_all().await;
    let shown = urgent_pending(&tasks);
    if shown.is_empty() {
        println!("No urgent tasks.");
        return;
    }
    println!("{}", task_table(&shown));
}

/// Prints the month grid with the number of tasks on each day.
pub async fn cmd_calendar(repo: &TaskRepository, month: MonthRef) {
    let tasks = repo.load_all().await;
    let cells = calendar::build(month.month, month.year, &tasks);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(WEEKDAY_NAMES.iter().map(|d| Cell::new(d).add_attribute(Attribute::Bold)));
    for week in cells.chunks(7) {
        table.add_row(week.iter().map(day_cell));
    }

    println!("{}", month);
    println!("{table}");

    let dated: Vec<&Task> = cells.iter().flat_map(|c| c.tasks().iter().copied()).collect();
    if !dated.is_empty() {
        println!("{}", task_table(&dated));
    }
}

/// Summary view: progress, today's work, urgent work, what to plant, recent diary entries.
pub async fn cmd_dashboard(repo: &TaskRepository) {
    let tasks = repo.load_all().await;
    let today = Local::now().date_naive();
    let counts = progress(&tasks);

    let mode = if repo.is_remote() { "Synced" } else { "Local mode" };
    println!("[{}] {} pending, {} done", mode, counts.pending, counts.done);

    let for_today: Vec<&Task> = due_on(&tasks, today)
        .into_iter()
        .filter(|t| !t.is_completed)
        .collect();
    println!("\nFor today");
    if for_today.is_empty() {
        println!("No tasks scheduled for today.");
    } else {
        println!("{}", task_table(&for_today));
    }

    let urgent = urgent_pending(&tasks);
    if !urgent.is_empty() {
        println!("\nUrgent");
        println!("{}", task_table(&urgent));
    }

    let month = MonthRef::current();
    println!(
        "\nWhat to plant in {}: {}",
        month.name(),
        planting_suggestions(month.month).join(", ")
    );

    let logs = repo.latest_logs().await;
    if !logs.is_empty() {
        println!("\nFarm diary");
        for log in logs {
            println!("  {}  {}", log.log_date, log.content);
        }
    }
}

/// Appends an entry to the farm diary.
pub async fn cmd_log_add(repo: &TaskRepository, content: &str, silent: bool) {
    if content.trim().is_empty() {
        if !silent { eprintln!("Diary entry is empty."); }
        return;
    }
    match repo.append_log(content).await {
        Some(log) => { if !silent { println!("Diary entry saved for {}.", log.log_date); } }
        None => { if !silent { eprintln!("Failed to save diary entry."); } }
    }
}

/// Shows the latest diary entries.
pub async fn cmd_log_list(repo: &TaskRepository) {
    let logs = repo.latest_logs().await;
    if logs.is_empty() {
        println!("No diary entries.");
        return;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Entry"]);
    for log in logs {
        table.add_row(vec![log.log_date.to_string(), log.content]);
    }
    println!("{table}");
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}. Use YYYY-MM-DD.", raw, e))
}

fn day_cell(cell: &DayCell<'_>) -> Cell {
    match cell {
        DayCell::Blank => Cell::new(""),
        DayCell::Day { date, tasks } => {
            let pending = tasks.iter().filter(|t| !t.is_completed).count();
            let text = if tasks.is_empty() {
                date.day().to_string()
            } else {
                format!("{} ({})", date.day(), tasks.len())
            };
            let cell = Cell::new(text);
            if pending > 0 {
                cell.fg(Color::Green).add_attribute(Attribute::Bold)
            } else if !tasks.is_empty() {
                cell.fg(Color::Grey)
            } else {
                cell
            }
        }
    }
}

fn task_table(tasks: &[&Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Urgency").add_attribute(Attribute::Bold),
            Cell::new("Date").add_attribute(Attribute::Bold),
            Cell::new("Repeats").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let urgency_color = if t.is_completed {
            Color::Grey
        } else {
            match t.urgency {
                Urgency::High => Color::Red,
                Urgency::Medium => Color::Yellow,
                Urgency::Low => Color::Green,
            }
        };

        let when = match (t.specific_date, t.month_reference) {
            (Some(d), _) => d.to_string(),
            (None, Some(m)) => calendar::MONTH_NAMES
                .get(usize::from(m).saturating_sub(1))
                .copied()
                .unwrap_or("-")
                .to_string(),
            (None, None) => "-".to_string(),
        };

        let status = if t.is_completed { "Done" } else { "Pending" };
        let status_color = if t.is_completed { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(&t.title),
            Cell::new(t.category.label()),
            Cell::new(t.urgency).fg(urgency_color),
            Cell::new(when),
            Cell::new(t.recurrence),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}
