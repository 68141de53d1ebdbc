use std::process;

use fanhub::{
    application::{
        access::{AccessError, assert_role, can_act, require_tenant},
        error::AppError,
    },
    cache::{CacheConfig, CacheProvider},
    config::{self, CheckRoleArgs, Command},
    domain::roles::Session,
    infra::{logging::Logger, telemetry},
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    telemetry::init(&settings.logging)?;

    let logger = Logger::default();
    let provider = CacheProvider::new(CacheConfig::from(&settings.cache), logger);

    match cli_args.command.unwrap_or(Command::Ping) {
        Command::Ping => run_ping(&provider).await,
        Command::CheckRole(args) => run_check_role(args),
    }
}

async fn run_ping(provider: &CacheProvider) -> Result<(), AppError> {
    let client = provider.client();
    let reply = client.ping().await?;

    info!(enabled = client.enabled(), reply = %reply, "cache ping");
    println!(
        "{} {}",
        if client.enabled() { "live" } else { "fallback" },
        reply
    );
    Ok(())
}

fn run_check_role(args: CheckRoleArgs) -> Result<(), AppError> {
    let mut session = Session::new(args.role);
    if let Some(tenant) = args.tenant {
        session = session.with_tenant(tenant);
    }
    if let Some(user) = args.user {
        session = session.with_user(user);
    }

    let tenant = require_tenant(&session)?;
    if !args.allowed.is_empty() {
        assert_role(&session, &args.allowed)?;
    }
    let permitted = args
        .minimum
        .map(|minimum| can_act(&session, minimum))
        .unwrap_or(true);

    info!(
        tenant,
        user = session.user_id.as_deref(),
        role = %session.role,
        permitted,
        "role check"
    );
    if !permitted {
        return Err(AccessError::Forbidden { role: session.role }.into());
    }
    println!(
        "ok {tenant} {} ({})",
        session.role,
        session.role.display_name()
    );
    Ok(())
}
