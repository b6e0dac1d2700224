use clap::{Parser, Subcommand};

/// Command-line interface definition for CruxLog
/// CLI application to log bouldering problems and sessions with SQLite
#[derive(Parser)]
#[command(
    name = "cruxlog",
    version = env!("CARGO_PKG_VERSION"),
    about = "A bouldering log CLI: track problems and sessions, chart your grades, earn XP",
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
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Add a problem
    Add {
        /// Problem name
        name: String,

        #[arg(long, short, help = "Grade, e.g. C4 or V3 (default C1)")]
        grade: Option<String>,

        #[arg(long, short, help = "Gym, wall or crag")]
        area: Option<String>,

        #[arg(long, help = "Free-form notes")]
        notes: Option<String>,

        #[arg(long = "photo", value_name = "URL", help = "Photo URL")]
        photo: Option<String>,
    },

    /// Edit a problem (or a session with --session)
    Edit {
        /// Problem id or name; a session id with --session
        target: String,

        #[arg(long, help = "Edit the session with this id instead of a problem")]
        session: bool,

        #[arg(long, conflicts_with = "session")]
        name: Option<String>,

        #[arg(long, short, conflicts_with = "session")]
        grade: Option<String>,

        #[arg(long, short, conflicts_with = "session")]
        area: Option<String>,

        #[arg(long = "photo", value_name = "URL", conflicts_with = "session", help = "Photo URL (empty to remove)")]
        photo: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long, requires = "session", help = "Session date (YYYY-MM-DD or RFC 3339)")]
        date: Option<String>,

        #[arg(long, requires = "session")]
        location: Option<String>,
    },

    /// Delete a problem, a session or a single attempt
    Del {
        #[arg(long, value_name = "ID", help = "Problem id or name")]
        problem: Option<String>,

        #[arg(long, value_name = "ID", help = "Session id")]
        session: Option<String>,

        #[arg(long, value_name = "SESSION:ATTEMPT", help = "Attempt to remove from a session")]
        attempt: Option<String>,

        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Log a session of attempts
    Session {
        #[arg(
            long = "attempt",
            short = 'a',
            value_name = "PROBLEM[:send|:attempt]",
            help = "Attempt on a problem (id or name); repeat for each go"
        )]
        attempts: Vec<String>,

        #[arg(long, help = "Session date (YYYY-MM-DD or RFC 3339, default now)")]
        date: Option<String>,

        #[arg(long, short)]
        location: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long = "from-draft", help = "Use the attempts of the draft session")]
        from_draft: bool,
    },

    /// Flip an attempt between send and attempt
    Toggle {
        /// Session id
        session: String,
        /// Attempt id
        attempt: String,
    },

    /// List problems and sessions
    List {
        #[arg(long, help = "List problems only")]
        problems: bool,

        #[arg(long, help = "List sessions only")]
        sessions: bool,
    },

    /// Grade trend and histogram of sent problems
    Insights {
        #[arg(long, help = "Grading system: C or V")]
        prefix: Option<String>,

        #[arg(long, help = "Time range: 7d, 30d, 1y or all")]
        range: Option<String>,
    },

    /// Level card and achievements
    Progress {
        #[arg(long, help = "Also show locked achievements")]
        all: bool,
    },

    /// View or change settings
    Settings {
        #[arg(long, help = "Theme: light or dark")]
        theme: Option<String>,

        #[arg(long, help = "Grading system: C or V")]
        prefix: Option<String>,

        #[arg(long, help = "Print all settings")]
        print: bool,
    },

    /// Build a session over several commands
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },

    /// Export all data to a JSON backup
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Compress the backup into a zip archive")]
        compress: bool,

        #[arg(long, help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Import a JSON backup
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, default_value = "replace", help = "replace (clear first) or merge")]
        mode: String,

        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Delete every problem, session and setting (XP included)
    Reset {
        #[arg(long, short, help = "Do not ask for confirmation")]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum DraftAction {
    /// Append an attempt to the draft
    Add {
        /// Problem id or name
        problem: String,

        #[arg(long, help = "Mark the attempt as a send")]
        send: bool,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Set the draft location or notes
    Set {
        #[arg(long, short)]
        location: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show the draft
    Show,

    /// Throw the draft away
    Discard,
}
