//! Line-oriented front end: one command per line, state re-printed after each.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::Path;

use fasttrack_core::model::{CvField, QuestionId, TaskId, WeekNumber};
use services::AppServices;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Status,
    Week(Option<WeekNumber>),
    Next,
    Prev,
    Toggle(TaskId),
    Add(String),
    Checklist,
    Reset,
    Export,
    Cv,
    CvSet(CvField, String),
    CvCopy,
    CvSave,
    Quiz,
    /// Question id and 0-based option index.
    Answer(QuestionId, usize),
    Submit,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellParseError {
    Unknown(String),
    Usage(&'static str),
}

impl fmt::Display for ShellParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellParseError::Unknown(cmd) => write!(f, "unknown command: {cmd} (try `help`)"),
            ShellParseError::Usage(usage) => write!(f, "usage: {usage}"),
        }
    }
}

impl std::error::Error for ShellParseError {}

impl ShellCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (head, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(head, rest)| (head, rest.trim()));

        let cmd = match head {
            "help" | "?" => Self::Help,
            "status" => Self::Status,
            "week" if rest.is_empty() => Self::Week(None),
            "week" => Self::Week(Some(
                rest.parse()
                    .map_err(|_| ShellParseError::Usage("week [1-24]"))?,
            )),
            "next" => Self::Next,
            "prev" => Self::Prev,
            "toggle" => Self::Toggle(
                rest.parse()
                    .map_err(|_| ShellParseError::Usage("toggle <task-id>"))?,
            ),
            "add" => Self::Add(rest.to_string()),
            "checklist" => Self::Checklist,
            "reset" => Self::Reset,
            "export" => Self::Export,
            "cv" => Self::parse_cv(rest)?,
            "quiz" => Self::Quiz,
            "answer" => Self::parse_answer(rest)?,
            "submit" => Self::Submit,
            "quit" | "exit" => Self::Quit,
            other => return Err(ShellParseError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }

    fn parse_cv(rest: &str) -> Result<Self, ShellParseError> {
        const USAGE: &str = "cv [copy | save | set <field> <text>]";
        let (sub, tail) = rest
            .split_once(char::is_whitespace)
            .map_or((rest, ""), |(sub, tail)| (sub, tail.trim_start()));
        match sub {
            "" => Ok(Self::Cv),
            "copy" => Ok(Self::CvCopy),
            "save" => Ok(Self::CvSave),
            "set" => {
                let (field, value) = tail
                    .split_once(char::is_whitespace)
                    .map_or((tail, ""), |(field, value)| (field, value.trim_start()));
                let field = field.parse().map_err(|_| ShellParseError::Usage(USAGE))?;
                Ok(Self::CvSet(field, value.replace("\\n", "\n")))
            }
            _ => Err(ShellParseError::Usage(USAGE)),
        }
    }

    fn parse_answer(rest: &str) -> Result<Self, ShellParseError> {
        const USAGE: &str = "answer <question> <option 1-4>";
        let mut parts = rest.split_whitespace();
        let question = parts
            .next()
            .and_then(|raw| raw.parse::<QuestionId>().ok())
            .ok_or(ShellParseError::Usage(USAGE))?;
        let option = parts
            .next()
            .and_then(|raw| raw.parse::<usize>().ok())
            .and_then(|n| n.checked_sub(1))
            .ok_or(ShellParseError::Usage(USAGE))?;
        if parts.next().is_some() {
            return Err(ShellParseError::Usage(USAGE));
        }
        Ok(Self::Answer(question, option))
    }
}

const HELP: &str = "\
commands:
  status                     overall progress
  week [n]                   show the selected week, or select week n (1-24)
  next | prev                move between weeks
  toggle <id>                mark a task or checklist item done / not done
  add <title>                add a task to the selected week (this session only)
  checklist                  show the evidence checklist
  reset                      clear all progress
  export                     write fintech_fasttrack_export.json
  cv                         preview the CV
  cv set <field> <text>      edit name|title|summary|experience|education|skills (\\n for new lines)
  cv copy                    print the CV text exactly as saved
  cv save                    write cv.txt
  quiz                       show the practice quiz
  answer <q> <option>        pick an option (1-4) for question q
  submit                     score the quiz
  quit                       leave";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Run one command against the planner and print the resulting view.
///
/// Planner errors are reported to the user and the session continues.
///
/// # Errors
///
/// Returns `io::Error` only if writing to `out` fails.
pub async fn execute<W: Write>(
    planner: &mut AppServices,
    cmd: ShellCommand,
    out_dir: &Path,
    out: &mut W,
) -> io::Result<Flow> {
    match cmd {
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::Status => render_status(planner, out)?,
        ShellCommand::Week(week) => {
            if let Some(week) = week {
                planner.select_week(week);
            }
            render_week(planner, out)?;
        }
        ShellCommand::Next => {
            planner.next_week();
            render_week(planner, out)?;
        }
        ShellCommand::Prev => {
            planner.prev_week();
            render_week(planner, out)?;
        }
        ShellCommand::Toggle(id) => match planner.toggle(&id).await {
            Ok(state) => {
                let mark = if state.is_completed(&id) { "done" } else { "not done" };
                writeln!(out, "{id}: {mark} ({}% completed)", state.percent())?;
            }
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Add(title) => match planner.add_task(&title) {
            Ok(task) => {
                writeln!(out, "added {} to week {}", task.id(), planner.current_week())?;
                render_week(planner, out)?;
            }
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Checklist => render_checklist(planner, out)?,
        ShellCommand::Reset => match planner.reset_progress().await {
            Ok(state) => writeln!(out, "progress reset ({}% completed)", state.percent())?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Export => match planner.write_export(out_dir) {
            Ok(path) => writeln!(out, "exported to {}", path.display())?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Cv | ShellCommand::CvCopy => write!(out, "{}", planner.cv_text())?,
        ShellCommand::CvSet(field, value) => {
            planner.set_cv_field(field, value);
            writeln!(out, "{field} updated")?;
        }
        ShellCommand::CvSave => match planner.save_cv(out_dir) {
            Ok(path) => writeln!(out, "saved {}", path.display())?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Quiz => render_quiz(planner, out)?,
        ShellCommand::Answer(question, option) => match planner.answer_quiz(question, option) {
            Ok(()) => writeln!(out, "question {question}: option {} selected", option + 1)?,
            Err(err) => writeln!(out, "error: {err}")?,
        },
        ShellCommand::Submit => {
            let score = planner.submit_quiz();
            writeln!(out, "Score: {score}")?;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

/// Read commands from `input` until `quit` or end of input.
///
/// # Errors
///
/// Returns `io::Error` if reading input or writing output fails.
pub async fn run<R: BufRead, W: Write>(
    planner: &mut AppServices,
    input: R,
    out_dir: &Path,
    out: &mut W,
) -> io::Result<()> {
    render_status(planner, out)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        match ShellCommand::parse(&line) {
            Ok(Some(cmd)) => {
                if execute(planner, cmd, out_dir, out).await? == Flow::Quit {
                    return Ok(());
                }
            }
            Ok(None) => {}
            Err(err) => writeln!(out, "{err}")?,
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

// ─── Views ─────────────────────────────────────────────────────────────────────

pub fn render_status<W: Write>(planner: &AppServices, out: &mut W) -> io::Result<()> {
    let state = planner.progress();
    let percent = usize::from(state.percent());
    let filled = percent / 5;
    writeln!(
        out,
        "Overall progress [{}{}] {}% completed",
        "#".repeat(filled),
        "-".repeat(20 - filled),
        percent
    )?;
    writeln!(
        out,
        "Week {} of {}",
        planner.current_week(),
        WeekNumber::LAST
    )
}

pub fn render_week<W: Write>(planner: &AppServices, out: &mut W) -> io::Result<()> {
    let week = planner.current_week();
    writeln!(out, "Tasks for Week {week}")?;
    let tasks = planner.tasks_for_week(week);
    if tasks.is_empty() {
        writeln!(out, "  No preset tasks - add your own")?;
    }
    for task in tasks {
        let mark = if planner.is_completed(task.id()) { 'x' } else { ' ' };
        if task.estimated_effort().is_empty() {
            writeln!(out, "  [{mark}] {:<8} {}", task.id(), task.title())?;
        } else {
            writeln!(
                out,
                "  [{mark}] {:<8} {} ({})",
                task.id(),
                task.title(),
                task.estimated_effort()
            )?;
        }
    }
    Ok(())
}

pub fn render_checklist<W: Write>(planner: &AppServices, out: &mut W) -> io::Result<()> {
    writeln!(out, "Global Talent Visa Checklist")?;
    for item in planner.catalog().checklist() {
        let mark = if planner.is_completed(item.id()) { 'x' } else { ' ' };
        writeln!(out, "  [{mark}] {:<4} {}", item.id(), item.text())?;
    }
    Ok(())
}

pub fn render_quiz<W: Write>(planner: &AppServices, out: &mut W) -> io::Result<()> {
    let quiz = planner.quiz();
    for question in quiz.bank().questions() {
        writeln!(out, "{}. {}", question.id(), question.prompt())?;
        let selected = quiz.answers().get(&question.id()).copied();
        for (idx, option) in question.options().iter().enumerate() {
            let mark = if selected == Some(idx) { '*' } else { ' ' };
            writeln!(out, "   {mark} {}) {option}", idx + 1)?;
        }
    }
    match quiz.score() {
        Some(score) => writeln!(out, "Score: {score}"),
        None => writeln!(out, "Score: -"),
    }
}
