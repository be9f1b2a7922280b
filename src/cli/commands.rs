//! Command handlers behind the CLI

use std::io;

use clap::CommandFactory;
use tracing::{debug, instrument};

use crate::application::P4Client;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::domain::{split_channel_suffix, Channel};
use crate::exitcode;
use crate::infrastructure::InfraError;

/// Indentation for changelist descriptions.
const INDENT: &str = "    ";

/// Run the selected subcommand; returns the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    if let Some(dir) = &cli.dir {
        std::env::set_current_dir(dir)
            .map_err(|e| InfraError::io(format!("change directory to {}", dir.display()), e))?;
    }

    let mut client = P4Client::new();
    match &cli.command {
        Some(Commands::Run {
            command,
            channel,
            args,
        }) => run(&mut client, command, *channel, args),
        Some(Commands::Ping { strict }) => ping(&mut client, *strict),
        Some(Commands::Config { command }) => config(&mut client, command),
        Some(Commands::Default { files }) => default_change(&mut client, *files),
        Some(Commands::Pending { long }) => pending(&mut client, *long),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(*shell, &mut cmd, "p4s", &mut io::stdout());
            Ok(exitcode::OK)
        }
        None => Err(CliError::Usage(
            "no command given, see p4s --help".to_string(),
        )),
    }
}

#[instrument(level = "debug", skip(client))]
fn run(
    client: &mut P4Client,
    name: &str,
    channel: Option<Channel>,
    args: &[String],
) -> CliResult<i32> {
    let (command, suffix_channel) = split_channel_suffix(name).map_err(|e| {
        CliError::InvalidArgs(format!("{name}: {e}"))
    })?;
    let channel = channel.unwrap_or(suffix_channel);
    debug!("dispatching {} on {}", command, channel);

    client.invoke_each(command, channel, args, |line| output::info(line))?;
    Ok(exitcode::OK)
}

fn ping(client: &mut P4Client, strict: bool) -> CliResult<i32> {
    if strict {
        client.ping()?;
        output::success("p4 is UP");
        return Ok(exitcode::OK);
    }
    if client.is_alive()? {
        output::success("p4 is UP");
        Ok(exitcode::OK)
    } else {
        output::failure("p4 is DOWN");
        Ok(exitcode::UNAVAILABLE)
    }
}

fn config(client: &mut P4Client, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Get { key } => match client.resolve(key)? {
            Some(value) => {
                output::info(&value);
                Ok(exitcode::OK)
            }
            None => {
                output::warning(&format!("{key} is not set"));
                Ok(exitcode::CONFIG)
            }
        },
        ConfigCommands::Show => {
            let config = client.config()?;
            match config.source() {
                Some(path) => output::header(&format!("# {}", path.display())),
                None => output::header("# no config file"),
            }
            for (key, value) in config.iter() {
                output::info(&format!("{key}={value}"));
            }
            Ok(exitcode::OK)
        }
    }
}

fn default_change(client: &mut P4Client, files: bool) -> CliResult<i32> {
    let entries = if files {
        client.default_changelist_files()?
    } else {
        client.default_changelist_filespecs()?
    };
    for entry in &entries {
        output::info(entry);
    }
    Ok(exitcode::OK)
}

fn pending(client: &mut P4Client, long: bool) -> CliResult<i32> {
    if long {
        for block in client.pending_changelist_descriptions()? {
            output::info(&block.render(INDENT));
        }
    } else {
        for number in client.pending_changelist_numbers()? {
            output::info(&number);
        }
    }
    Ok(exitcode::OK)
}
