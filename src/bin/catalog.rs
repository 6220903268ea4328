use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use dotenvy::dotenv;
use sqlx::SqlitePool;
use tracing_subscriber::EnvFilter;

use campusconnect::config::Config;
use campusconnect::database::{self, interests_repo, opportunity_types_repo};
use campusconnect::error::AppError;
use campusconnect::services::catalog_service;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let matches = build_cli().get_matches();

    let database_url = match matches.get_one::<String>("database-url") {
        Some(url) => url.clone(),
        None => Config::load()?.database_url,
    };
    let pool = database::connect(&database_url)
        .await
        .with_context(|| format!("cannot open {}", database_url))?;
    database::migrate(&pool).await?;

    match matches.subcommand() {
        Some(("add-interest", sub)) => add_interest(&pool, sub).await?,
        Some(("rename-interest", sub)) => rename_interest(&pool, sub).await?,
        Some(("add-opportunity-type", sub)) => add_opportunity_type(&pool, sub).await?,
        Some(("seed-interests", _)) => seed_interests(&pool).await?,
        Some(("list", _)) => list(&pool).await?,
        _ => {
            build_cli().print_help()?;
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_cli() -> Command {
    Command::new("catalog")
        .about("Manage the CampusConnect interest and opportunity type catalogs")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("database-url")
                .short('d')
                .long("database-url")
                .value_name("URL")
                .global(true)
                .help("SQLite database URL (defaults to DATABASE_URL)"),
        )
        .subcommand(
            Command::new("add-interest")
                .about("Add an interest; the slug is derived from the name unless given")
                .arg(Arg::new("name").required(true).value_name("NAME"))
                .arg(
                    Arg::new("slug")
                        .short('s')
                        .long("slug")
                        .value_name("SLUG")
                        .help("Explicit slug"),
                ),
        )
        .subcommand(
            Command::new("rename-interest")
                .about("Rename an interest; its slug stays the same")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_name("ID")
                        .value_parser(clap::value_parser!(i64)),
                )
                .arg(Arg::new("name").required(true).value_name("NAME")),
        )
        .subcommand(
            Command::new("add-opportunity-type")
                .about("Add an opportunity type offered by finders")
                .arg(Arg::new("name").required(true).value_name("NAME")),
        )
        .subcommand(Command::new("seed-interests").about("Insert the default interests"))
        .subcommand(Command::new("list").about("Print both catalogs"))
}

fn describe(err: AppError) -> anyhow::Error {
    match err {
        AppError::Validation(errors) => anyhow::anyhow!("{}", errors),
        other => other.into(),
    }
}

async fn add_interest(pool: &SqlitePool, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .context("missing interest name")?;
    let slug = matches.get_one::<String>("slug").map(String::as_str);

    let (interest, created) = catalog_service::create_interest(pool, name, slug)
        .await
        .map_err(describe)?;

    if created {
        println!("added interest #{} {} ({})", interest.id, interest.name, interest.slug);
    } else {
        println!(
            "interest already exists: #{} {} ({})",
            interest.id, interest.name, interest.slug
        );
    }
    Ok(())
}

async fn rename_interest(pool: &SqlitePool, matches: &ArgMatches) -> Result<()> {
    let id = *matches.get_one::<i64>("id").context("missing interest id")?;
    let name = matches
        .get_one::<String>("name")
        .context("missing interest name")?;

    match catalog_service::rename_interest(pool, id, name)
        .await
        .map_err(describe)?
    {
        Some(interest) => println!(
            "renamed interest #{} to {} ({})",
            interest.id, interest.name, interest.slug
        ),
        None => anyhow::bail!("no interest with id {}", id),
    }
    Ok(())
}

async fn add_opportunity_type(pool: &SqlitePool, matches: &ArgMatches) -> Result<()> {
    let name = matches
        .get_one::<String>("name")
        .context("missing opportunity type name")?;

    let (kind, created) = catalog_service::create_opportunity_type(pool, name)
        .await
        .map_err(describe)?;

    if created {
        println!("added opportunity type #{} {}", kind.id, kind.name);
    } else {
        println!("opportunity type already exists: #{} {}", kind.id, kind.name);
    }
    Ok(())
}

async fn seed_interests(pool: &SqlitePool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    let inserted = catalog_service::seed_default_interests(&mut conn).await?;
    println!(
        "seeded {} of {} default interests",
        inserted,
        catalog_service::DEFAULT_INTERESTS.len()
    );
    Ok(())
}

async fn list(pool: &SqlitePool) -> Result<()> {
    println!("Interests:");
    for interest in interests_repo::list_all(pool).await? {
        println!("  #{:<4} {:<40} {}", interest.id, interest.name, interest.slug);
    }

    println!("Opportunity types:");
    for kind in opportunity_types_repo::list_all(pool).await? {
        println!("  #{:<4} {}", kind.id, kind.name);
    }
    Ok(())
}
