use clap::{Parser, Subcommand};

/// Command-line interface definition for rTaskclock
/// CLI application to clock working time and track task progress with SQLite
#[derive(Parser)]
#[command(
    name = "rtaskclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Clock in/out, track tasks and subtasks, and summarize worked hours using SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "last", help = "Only the newest N rows")]
        last: Option<usize>,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage departments
    Dept {
        #[command(subcommand)]
        action: DeptAction,
    },

    /// Manage projects
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage tasks and subtasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },

    /// Clock in/out and correct time sessions
    Clock {
        #[command(subcommand)]
        action: ClockAction,
    },

    /// Employee hour summary, or the admin week overview with --week
    Dashboard {
        /// User id (employee summary)
        #[arg(required_unless_present = "week")]
        user: Option<i64>,

        #[arg(long = "week", value_name = "DATE", help = "Week overview for the week containing DATE")]
        week: Option<String>,

        #[arg(long = "now", value_name = "TS", help = "Reference instant (default: now)")]
        now: Option<String>,

        #[arg(long = "tasks", default_value_t = 5, help = "Number of recent tasks to list")]
        tasks: usize,

        #[arg(long = "json", help = "Print the summary as JSON")]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UserAction {
    /// Create a user
    Add {
        name: String,

        #[arg(long = "dept", help = "Department id")]
        dept: Option<i64>,
    },

    /// List users
    List,
}

#[derive(Subcommand)]
pub enum DeptAction {
    /// Create a department
    Add {
        name: String,

        #[arg(long = "color", help = "Colour as #RRGGBB")]
        color: Option<String>,
    },

    /// Show computed department statistics
    Show {
        id: i64,

        #[arg(long = "now", value_name = "TS")]
        now: Option<String>,
    },

    /// Delete a department without users or projects
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a project
    Add {
        name: String,

        #[arg(long = "dept", help = "Department id")]
        dept: i64,

        #[arg(long = "estimate", help = "Estimated hours")]
        estimate: Option<f64>,

        #[arg(
            long = "status",
            default_value = "not_started",
            help = "not_started, in_progress, completed or archived"
        )]
        status: String,
    },

    /// Show progress, total and remaining hours
    Show { id: i64 },

    /// Change the project status
    Status { id: i64, status: String },
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a task
    Add {
        title: String,

        #[arg(long = "user", help = "Owner user id")]
        user: i64,

        #[arg(long = "date", help = "Task date (YYYY-MM-DD)")]
        date: String,

        #[arg(long = "project", help = "Project id")]
        project: Option<i64>,

        #[arg(long = "estimate", help = "Estimated hours")]
        estimate: Option<f64>,

        #[arg(long = "hours", default_value_t = 0.0, help = "Hours worked")]
        hours: f64,

        #[arg(long = "subtask", help = "Subtask title (repeatable)")]
        subtasks: Vec<String>,
    },

    /// Change the task status (todo, in_progress, done; pending/completed accepted)
    Status { id: i64, status: String },

    /// Set the hours worked on a task
    Hours { id: i64, hours: f64 },

    /// Add a subtask to a task
    Subtask { id: i64, title: String },

    /// Mark a subtask completed
    Done {
        subtask_id: i64,

        #[arg(long = "undo", help = "Mark the subtask not completed")]
        undo: bool,
    },

    /// Show a task with progress and remaining hours
    Show { id: i64 },

    /// Delete a task and its subtasks
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum ClockAction {
    /// Open a session
    In {
        user: i64,

        #[arg(long = "at", value_name = "TS")]
        at: Option<String>,
    },

    /// Close the open session
    Out {
        user: i64,

        #[arg(long = "at", value_name = "TS")]
        at: Option<String>,
    },

    /// Is the user clocked in, and since when
    Status {
        user: i64,

        #[arg(long = "now", value_name = "TS")]
        now: Option<String>,
    },

    /// Correct a session's clock-in and/or clock-out
    Fix {
        session: i64,

        #[arg(long = "in", value_name = "TS")]
        clock_in: Option<String>,

        #[arg(long = "out", value_name = "TS")]
        clock_out: Option<String>,
    },

    /// List the user's sessions, newest first
    List {
        user: i64,

        #[arg(long = "limit", default_value_t = 10)]
        limit: usize,
    },
}
