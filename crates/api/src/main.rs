//! Cinelog - movie catalog client
//!
//! Command-line entry point. Credentials persist in a cookie-jar file between
//! invocations, so `sign-in` once and then use the other commands.
//!
//! This is a CLI tool, so `println!` and `eprintln!` are used for user-facing
//! output; diagnostics go through `tracing` on stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use cinelog_core::{RouteDecision, SessionEvent};
use cinelog_infra::config::env_bool;
use cinelog_lib::commands;
use cinelog_lib::utils::logging::init_tracing;
use cinelog_lib::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    init_tracing(env_bool("CINELOG_LOG_JSON", false));
    match dotenv {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) => tracing::debug!(error = %e, "no .env file loaded"),
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let result = run(&args).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let command = args.first().map(String::as_str);
    if matches!(command, Some("help" | "--help" | "-h") | None) {
        print_help();
        return Ok(());
    }

    let ctx = AppContext::new().context("Failed to initialise cinelog")?;
    let mut events = ctx.events.subscribe();
    let rest = &args[1..];

    let outcome = dispatch(&ctx, command.unwrap_or_default(), rest).await;

    while let Ok(event) = events.try_recv() {
        if let SessionEvent::SignInRequired { redirect_to } = event {
            eprintln!("Session ended; sign in again ({redirect_to})");
        }
    }

    outcome
}

async fn dispatch(ctx: &AppContext, command: &str, rest: &[String]) -> anyhow::Result<()> {
    match command {
        "sign-in" => {
            let remember = rest.iter().any(|a| a == "--remember");
            let positional: Vec<&str> =
                rest.iter().map(String::as_str).filter(|a| !a.starts_with("--")).collect();
            let (email, password) = match positional.as_slice() {
                [email, password] => ((*email).to_string(), *password),
                [password] => (
                    ctx.auth.remembered_email().ok_or_else(|| anyhow!("Email is required"))?,
                    *password,
                ),
                _ => bail!("usage: cinelog sign-in <email> <password> [--remember]"),
            };
            let report = commands::sign_in(ctx, &email, password, remember).await?;
            println!("{report}");
        }
        "sign-out" => {
            commands::sign_out(ctx)?;
            println!("Logged out successfully");
        }
        "movies" => {
            let page = match rest.first() {
                Some(raw) => raw.parse::<u32>().with_context(|| format!("Invalid page: {raw}"))?,
                None => 1,
            };
            print!("{}", commands::list_movies(ctx, page).await?);
        }
        "add" => {
            let [title, year, poster @ ..] = rest else {
                bail!("usage: cinelog add <title> <year> [poster-path]");
            };
            let poster = poster.first().map(Path::new);
            let movie = commands::add_movie(ctx, title, year, poster).await?;
            println!("Movie added successfully: {} ({})", movie.title, movie.published_year);
        }
        "edit" => {
            let [id, title, year, poster @ ..] = rest else {
                bail!("usage: cinelog edit <id> <title> <year> [poster-path]");
            };
            let poster = poster.first().map(Path::new);
            let movie = commands::edit_movie(ctx, id, title, year, poster).await?;
            println!("Movie updated successfully: {} ({})", movie.title, movie.published_year);
        }
        "route" => {
            let path = rest.first().ok_or_else(|| anyhow!("usage: cinelog route <path>"))?;
            match commands::check_route(ctx, path) {
                RouteDecision::Continue => println!("continue {path}"),
                RouteDecision::Redirect(to) => println!("redirect {to}"),
            }
        }
        unknown => {
            eprintln!("Unknown command: {unknown}");
            eprintln!();
            print_help();
            bail!("Unknown command");
        }
    }
    Ok(())
}

fn print_help() {
    println!("Cinelog movie catalog client");
    println!();
    println!("USAGE:");
    println!("    cinelog <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    sign-in <email> <password> [--remember]   Sign in (email may be omitted if remembered)");
    println!("    sign-out                                  Clear stored credentials");
    println!("    movies [page]                             List your movies, 8 per page");
    println!("    add <title> <year> [poster-path]          Create a movie");
    println!("    edit <id> <title> <year> [poster-path]    Update a movie");
    println!("    route <path>                              Show the route gate decision for a path");
    println!("    help                                      Show this help message");
    println!();
    println!("ENVIRONMENT:");
    println!("    CINELOG_API_URL        Base URL of the movie API");
    println!("    CINELOG_COOKIE_JAR     Cookie jar file (default: cinelog-cookies.json)");
    println!("    CINELOG_LOG_JSON       Emit JSON logs on stderr");
}
