use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Print the grouped query descriptor for the given arguments as JSON
    Describe {
        #[arg(long, default_value = "me", help = "Alias of the base relation")]
        alias: String,

        /// Columns and aggregates, e.g. `name`, `sum(cost) as total_cost`
        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Render the SQL a stats query would run, with its bind parameters
    Sql {
        #[arg(long, help = "Table to aggregate")]
        table: String,

        #[arg(long, help = "Schema the table lives in")]
        schema: Option<String>,

        #[arg(long, default_value = "me", help = "Alias of the base relation")]
        alias: String,

        /// SQL dialect: "pg" or "mysql"
        #[arg(long, default_value = "pg")]
        dialect: String,

        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Run a stats query against PostgreSQL and print the rows
    Run {
        #[arg(long, help = "Table to aggregate")]
        table: String,

        #[arg(long, help = "Schema the table lives in")]
        schema: Option<String>,

        #[arg(long, default_value = "me", help = "Alias of the base relation")]
        alias: String,

        #[arg(
            long,
            help = "Connection string; falls back to SIMPLE_STATS_CONN_STR"
        )]
        conn_str: Option<String>,

        #[arg(long, help = "Env file to read SIMPLE_STATS_CONN_STR from")]
        env_file: Option<String>,

        #[arg(long, help = "Print rows as JSON instead of a table")]
        json: bool,

        #[arg(required = true)]
        args: Vec<String>,
    },
    /// Test a PostgreSQL connection string
    TestConn {
        #[arg(
            long,
            help = "Connection string; falls back to SIMPLE_STATS_CONN_STR"
        )]
        conn_str: Option<String>,

        #[arg(long, help = "Env file to read SIMPLE_STATS_CONN_STR from")]
        env_file: Option<String>,
    },
}
