/*!
 * Input classification
 *
 * Splits a submitted line into SQL or a dot-command, and maps the listing
 * commands to the catalog queries they run.
 */

/// Dot-commands, in the order completion offers them.
pub const META_COMMANDS: [&str; 7] = [
    ".tables",
    ".schema",
    ".help",
    ".indexes",
    ".alltables",
    ".allindexes",
    ".vertical",
];

const USER_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type ='table' AND \
                               name NOT LIKE 'sqlite_%' AND name NOT LIKE 'resql_%'";
const ALL_TABLES_SQL: &str = "SELECT name FROM sqlite_master WHERE type ='table'";
const USER_INDEXES_SQL: &str = "SELECT name FROM sqlite_master WHERE type ='index' AND \
                                name NOT LIKE 'sqlite_%' AND name NOT LIKE 'resql_%'";
const ALL_INDEXES_SQL: &str = "SELECT name FROM sqlite_master WHERE type ='index'";

/// Client-side command entered with a leading '.'.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaCommand {
    Help,
    ToggleVertical,
    Tables,
    AllTables,
    Indexes,
    AllIndexes,
    /// `.schema <table>`; `None` when the table name is missing.
    Schema(Option<String>),
    Unrecognized(String),
}

/// Classified input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Empty,
    Meta(MetaCommand),
    Sql(String),
}

impl Input {
    pub fn classify(line: &str) -> Input {
        let line = line.trim();
        if line.is_empty() {
            return Input::Empty;
        }
        if !line.starts_with('.') {
            return Input::Sql(line.to_string());
        }

        let mut words = line.split_whitespace();
        let command = match words.next().unwrap_or_default() {
            ".help" => MetaCommand::Help,
            ".vertical" => MetaCommand::ToggleVertical,
            ".tables" => MetaCommand::Tables,
            ".alltables" => MetaCommand::AllTables,
            ".indexes" => MetaCommand::Indexes,
            ".allindexes" => MetaCommand::AllIndexes,
            ".schema" => MetaCommand::Schema(words.last().map(str::to_string)),
            _ => MetaCommand::Unrecognized(line.to_string()),
        };
        Input::Meta(command)
    }
}

impl MetaCommand {
    /// SQL run on the server for listing commands.
    pub fn sql(&self) -> Option<String> {
        match self {
            MetaCommand::Tables => Some(USER_TABLES_SQL.to_string()),
            MetaCommand::AllTables => Some(ALL_TABLES_SQL.to_string()),
            MetaCommand::Indexes => Some(USER_INDEXES_SQL.to_string()),
            MetaCommand::AllIndexes => Some(ALL_INDEXES_SQL.to_string()),
            MetaCommand::Schema(Some(table)) => Some(format!("PRAGMA table_info([{}])", table)),
            _ => None,
        }
    }
}

pub fn help_text() -> &'static str {
    concat!(
        "\n",
        "You can type SQL queries. Commands starts with '.' \n",
        "character, they are not interpreted as SQL. \n\n",
        " .tables                 Print user tables only                  \n",
        " .indexes                Print user indexes only                 \n",
        " .schema <table>         Print table schema                      \n",
        " .alltables              Print all tables                        \n",
        " .allindexes             Print all indexes                       \n",
        " .vertical               Flip vertical table print flag, default \n",
        "                         is automatic, if table does not fit the \n",
        "                         screen, it will be printed vertical     \n",
        " .help                   Print help screen \n",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_builtins() {
        assert_eq!(Input::classify(".help"), Input::Meta(MetaCommand::Help));
        assert_eq!(
            Input::classify("  .vertical "),
            Input::Meta(MetaCommand::ToggleVertical)
        );
        assert_eq!(Input::classify(".tables"), Input::Meta(MetaCommand::Tables));
        assert_eq!(
            Input::classify(".alltables"),
            Input::Meta(MetaCommand::AllTables)
        );
        assert_eq!(Input::classify(".indexes"), Input::Meta(MetaCommand::Indexes));
        assert_eq!(
            Input::classify(".allindexes"),
            Input::Meta(MetaCommand::AllIndexes)
        );
    }

    #[test]
    fn test_classify_schema_argument() {
        assert_eq!(
            Input::classify(".schema users"),
            Input::Meta(MetaCommand::Schema(Some("users".to_string())))
        );
        assert_eq!(
            Input::classify(".schema"),
            Input::Meta(MetaCommand::Schema(None))
        );
        assert_eq!(
            Input::classify(".schema   "),
            Input::Meta(MetaCommand::Schema(None))
        );
    }

    #[test]
    fn test_classify_sql_and_unknown() {
        assert_eq!(Input::classify(""), Input::Empty);
        assert_eq!(Input::classify("   "), Input::Empty);
        assert_eq!(
            Input::classify("SELECT 1"),
            Input::Sql("SELECT 1".to_string())
        );
        assert_eq!(
            Input::classify(".tablez"),
            Input::Meta(MetaCommand::Unrecognized(".tablez".to_string()))
        );
    }

    #[test]
    fn test_builtin_sql() {
        assert_eq!(
            MetaCommand::Schema(Some("users".to_string())).sql().unwrap(),
            "PRAGMA table_info([users])"
        );
        assert!(MetaCommand::Tables
            .sql()
            .unwrap()
            .contains("NOT LIKE 'resql_%'"));
        assert!(!MetaCommand::AllIndexes.sql().unwrap().contains("NOT LIKE"));
        assert_eq!(MetaCommand::Schema(None).sql(), None);
        assert_eq!(MetaCommand::Help.sql(), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        for command in META_COMMANDS {
            assert!(help_text().contains(command), "{} missing", command);
        }
    }
}
