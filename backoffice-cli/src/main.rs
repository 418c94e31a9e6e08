//! Back-office command line client.
//!
//! Lists and creates customers and products against the back-office API.

mod paths;
mod render;
mod settings;

use std::fs;
use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use backoffice_lib::columns::ColumnResolver;
use backoffice_lib::columns::Locale;
use backoffice_lib::model::TableData;
use backoffice_lib::service::NewCustomer;
use backoffice_lib::service::NewProduct;
use backoffice_lib::service::RecordService;
use backoffice_lib::service::Resource;
use backoffice_lib::service::ResourcePage;
use backoffice_lib::table::TableEngine;
use backoffice_lib::table::ViewState;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use rust_decimal::Decimal;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::WriteLogger;

use render::ConsoleNotifier;
use settings::Settings;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Browse and create back-office records", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one page of a resource table
    List {
        /// customers or products
        #[arg(value_name = "RESOURCE")]
        resource: Resource,

        /// Case-insensitive text filter over all columns
        #[arg(long)]
        search: Option<String>,

        /// Sort by field; repeating a field flips the direction
        #[arg(long, value_name = "FIELD")]
        sort: Vec<String>,

        /// Page number, 1-based
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Rows per page (defaults to the settings file)
        #[arg(long)]
        page_size: Option<usize>,

        /// Number and date formatting
        #[arg(long, value_enum, default_value = "en")]
        locale: LocaleArg,
    },

    /// Create a record
    Create {
        #[command(subcommand)]
        record: CreateCommand,
    },
}

#[derive(Subcommand)]
enum CreateCommand {
    /// Create a customer
    Customer {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Create the customer as inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Create a product
    Product {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: Decimal,

        #[arg(long)]
        quantity: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LocaleArg {
    En,
    Ru,
}

/// Terminal output shows timestamps in the user's own timezone.
impl From<LocaleArg> for Locale {
    fn from(arg: LocaleArg) -> Self {
        let locale = match arg {
            LocaleArg::En => Locale::en(),
            LocaleArg::Ru => Locale::ru(),
        };
        locale.with_system_timezone()
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    paths::rotate_logs();
    let Some(path) = paths::log_file() else { return };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    match File::create(&path) {
        Ok(file) => {
            let _ = WriteLogger::init(level, Config::default(), file);
        }
        Err(e) => eprintln!("Warning: cannot write log file {}: {}", path.display(), e),
    }
}

fn open_page(settings: &Settings, resource: Resource, table: TableEngine) -> anyhow::Result<ResourcePage> {
    let service = RecordService::connect(resource, &settings.api_origin, &settings.client_template())
        .with_context(|| format!("invalid API origin '{}'", settings.api_origin))?;
    Ok(ResourcePage::with_table(service, Arc::new(ConsoleNotifier), table))
}

struct ListArgs {
    resource: Resource,
    search: Option<String>,
    sort: Vec<String>,
    page: usize,
    page_size: Option<usize>,
    locale: Locale,
}

async fn list(settings: &Settings, args: ListArgs) -> anyhow::Result<ExitCode> {
    let page_size = args.page_size.unwrap_or(settings.page_size);
    let table = TableEngine::with_options(
        TableData::default(),
        ColumnResolver::new(),
        args.locale,
        ViewState::new(page_size),
    );
    let page = open_page(settings, args.resource, table)?;

    // Failures were already reported by the notifier.
    if page.load().await.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let mut table = page.table();
    if let Some(search) = args.search {
        table.set_search(search);
    }
    for field in &args.sort {
        table.set_sort(field);
    }
    table.set_page(args.page);

    println!("{}", args.resource.title());
    print!("{}", render::page(&table));
    println!("{}", render::summary(&table));
    println!("Page {}", render::pager(&table));
    Ok(ExitCode::SUCCESS)
}

async fn create(settings: &Settings, command: CreateCommand) -> anyhow::Result<ExitCode> {
    let result = match command {
        CreateCommand::Customer { name, email, inactive } => {
            let page = open_page(settings, Resource::Customers, TableEngine::empty())?;
            page.create(&NewCustomer::new(name, email).with_active(!inactive))
                .await
        }
        CreateCommand::Product { name, price, quantity } => {
            let page = open_page(settings, Resource::Products, TableEngine::empty())?;
            page.create(&NewProduct::new(name, price, quantity)).await
        }
    };

    match result {
        Ok(row) => {
            println!("{}", serde_json::to_string_pretty(&row)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => Ok(ExitCode::FAILURE),
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let settings = Settings::load()?;
    match cli.command {
        Commands::List {
            resource,
            search,
            sort,
            page,
            page_size,
            locale,
        } => {
            let args = ListArgs {
                resource,
                search,
                sort,
                page,
                page_size,
                locale: locale.into(),
            };
            list(&settings, args).await
        }
        Commands::Create { record } => create(&settings, record).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
